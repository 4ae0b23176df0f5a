use anyhow::Result;
use registrar_config::AppConfig;
use registrar_core::Schema;
use registrar_store::SubmissionWriter;
use std::sync::Arc;

use crate::stores::build_writer;

pub struct AppState {
    pub schema: Schema,
    pub writer: Arc<SubmissionWriter>,
}

impl AppState {
    pub fn new(schema: Schema, writer: SubmissionWriter) -> Arc<Self> {
        Arc::new(Self {
            schema,
            writer: Arc::new(writer),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Arc<Self>> {
        let schema = Schema::new(
            config.schema.variant,
            config.schema.phone_policy,
            config.schema.enrollment_types.clone(),
        );
        let writer = build_writer(config)?;
        Ok(Self::new(schema, writer))
    }
}
