//! One-shot pipeline runner: resolves configuration, wires the injected
//! collaborators, executes a single generation request, and prints the
//! persisted video record plus the aggregate compliance stats.

use domain::error::{DomainErrorKind, Error, InternalErrorKind};
use domain::pipeline::{GenerationPipeline, GenerationRequest};
use domain::{Id, InMemoryStore, Store};
use log::*;
use service::config::Config;
use service::logging::Logger;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    info!("Starting generation run ({})", config.runtime_env());

    if let Err(e) = run(config).await {
        error!("Generation run failed: {e}");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Error> {
    let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
    let pipeline = GenerationPipeline::from_config(&config, store.clone())?;

    let user_id = match config.user_id() {
        Some(raw) => parse_id(&raw)?,
        None => Id::new_v4(),
    };
    let upload_id = config.upload_id().map(|raw| parse_id(&raw)).transpose()?;

    let outcome = pipeline
        .run(GenerationRequest {
            user_id,
            prompt: config.prompt().unwrap_or_default(),
            upload_id,
            hcp_text: config.hcp_text(),
            document_path: config.document_path(),
        })
        .await?;

    for warning in &outcome.warnings {
        warn!("{warning}");
    }

    match serde_json::to_string_pretty(&outcome.video) {
        Ok(json) => println!("{json}"),
        Err(e) => warn!("Failed to serialize video record: {e}"),
    }

    let stats = domain::stats::compliance_stats(store.as_ref()).await?;
    match serde_json::to_string_pretty(&stats) {
        Ok(json) => println!("{json}"),
        Err(e) => warn!("Failed to serialize compliance stats: {e}"),
    }

    Ok(())
}

fn parse_id(raw: &str) -> Result<Id, Error> {
    Id::parse_str(raw).map_err(|e| Error {
        source: Some(Box::new(e)),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Validation(format!(
            "Invalid id: {raw}"
        ))),
    })
}
