//! Upload profile operations.

use crate::error::Error;
use entity::{uploads, Id};
use entity_api::store::{NewUpload, Store};
use log::*;

/// Creates an upload record for submitted HCP text. Records are immutable
/// once created and are never deleted automatically.
pub async fn create(
    store: &dyn Store,
    user_id: Id,
    hcp_text: String,
    document_path: Option<String>,
) -> Result<uploads::Model, Error> {
    info!("Creating upload for user: {user_id}");
    Ok(store
        .create_upload(NewUpload {
            user_id,
            hcp_text,
            document_path,
        })
        .await?)
}

pub async fn find_by_id(store: &dyn Store, id: Id) -> Result<uploads::Model, Error> {
    Ok(store.get_upload(id).await?)
}
