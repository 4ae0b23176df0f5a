use anyhow::Error;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use registrar_config::ConfigError;
use registrar_core::ValidationError;
use registrar_store::{StoreError, StoreErrorKind, SubmitError};
use serde_json::json;
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_INVALID_INPUT: u8 = 3;

pub const CONFLICT_MESSAGE: &str = "this phone number is already registered";
pub const NOT_SAVED_MESSAGE: &str = "record was not saved";
pub const INTERNAL_MESSAGE: &str = "internal server error";
pub const MALFORMED_MESSAGE: &str = "request body must be a JSON object";

#[derive(Debug, ThisError)]
pub enum ApiError {
    #[error("request body must be a JSON object")]
    MalformedPayload,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("this phone number is already registered")]
    Conflict,
    #[error("unknown store: {0}")]
    UnknownStore(String),
    #[error("record was not saved: {0}")]
    NotSaved(String),
    #[error("internal server error: {0}")]
    Internal(String),
}

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Conflict(_) => ApiError::Conflict,
            SubmitError::Store { source, .. } => ApiError::NotSaved(source.reason()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.reason())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::MalformedPayload => {
                (StatusCode::BAD_REQUEST, json!({ "error": MALFORMED_MESSAGE }))
            }
            ApiError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": err.message, "field": err.field }),
            ),
            ApiError::Conflict => (StatusCode::CONFLICT, json!({ "error": CONFLICT_MESSAGE })),
            ApiError::UnknownStore(name) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": format!("unknown store: {name}") }),
            ),
            ApiError::NotSaved(reason) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": NOT_SAVED_MESSAGE, "reason": reason }),
            ),
            ApiError::Internal(reason) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": INTERNAL_MESSAGE, "reason": reason }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(_config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            return ExitCode::from(store_exit_code(store_err));
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn store_exit_code(err: &StoreError) -> u8 {
    match err.kind() {
        StoreErrorKind::InvalidDataPath | StoreErrorKind::MissingHomeDir => EXIT_INVALID_INPUT,
        StoreErrorKind::Io
        | StoreErrorKind::Sql
        | StoreErrorKind::Sheet
        | StoreErrorKind::Migration
        | StoreErrorKind::DuplicatePhone
        | StoreErrorKind::InvalidData
        | StoreErrorKind::Unavailable => EXIT_FAILURE,
    }
}
