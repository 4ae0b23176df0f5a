use anyhow::{Context as _, Result};
use registrar_config::{AppConfig, LookupFailure, StoreBackend, StoreConfig};
use registrar_sheets::{FileSheet, GoogleSheets, DEFAULT_ENDPOINT};
use registrar_store::{
    paths, LookupPolicy, RecordStore, SheetStore, SqliteStore, StoreTarget, SubmissionWriter,
    DEFAULT_SHEET_NAME,
};
use std::sync::Arc;
use tracing::info;

pub fn build_writer(config: &AppConfig) -> Result<SubmissionWriter> {
    let primary = build_target(&config.primary)?;
    let secondaries = config
        .secondaries
        .iter()
        .map(build_target)
        .collect::<Result<Vec<_>>>()?;
    Ok(SubmissionWriter::new(primary, secondaries))
}

pub fn build_target(config: &StoreConfig) -> Result<StoreTarget> {
    let lookup = match config.on_lookup_error {
        LookupFailure::Allow => LookupPolicy::FailOpen,
        LookupFailure::Reject => LookupPolicy::FailClosed,
    };

    let store: Arc<dyn RecordStore> = match &config.backend {
        StoreBackend::Sheets {
            spreadsheet_id,
            sheet_name,
            credentials_path,
            endpoint,
        } => {
            let sheets = GoogleSheets::from_service_account_file(
                endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT),
                spreadsheet_id.clone(),
                credentials_path,
            )
            .with_context(|| format!("store {}: open spreadsheet", config.name))?;
            Arc::new(SheetStore::new(sheets, sheet_name_or_default(sheet_name)))
        }
        StoreBackend::File { path, sheet_name } => Arc::new(SheetStore::new(
            FileSheet::new(path),
            sheet_name_or_default(sheet_name),
        )),
        StoreBackend::Sqlite { path } => {
            let path = paths::resolve_db_path(path.clone())
                .with_context(|| format!("store {}: resolve database path", config.name))?;
            let store = SqliteStore::open(&path)
                .with_context(|| format!("store {}: open database {}", config.name, path.display()))?;
            Arc::new(store)
        }
    };

    info!(
        store = %config.name,
        backend = store.backend_name(),
        lookup = ?lookup,
        "store ready"
    );
    Ok(StoreTarget::new(config.name.clone(), store, lookup))
}

fn sheet_name_or_default(sheet_name: &Option<String>) -> String {
    sheet_name
        .clone()
        .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string())
}
