//! HCP profile upload record.
//! Created when a user submits HCP text, with or without a reference document.

use crate::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    #[serde(skip_deserializing)]
    pub id: Id,

    pub user_id: Id,

    /// Raw HCP profile text exactly as submitted
    pub hcp_text: String,

    /// Object-store path of an uploaded reference document, if one was supplied
    pub document_path: Option<String>,

    #[serde(skip_deserializing)]
    pub created_at: DateTime<Utc>,
}
