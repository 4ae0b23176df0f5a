use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid range: {0}")]
    InvalidRange(String),
    #[error("sheet service returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String> },
    #[error("sheet unavailable: {0}")]
    Unavailable(String),
    #[error("sheet authentication failed: {0}")]
    Auth(String),
    #[cfg(feature = "google-sheets")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[cfg(feature = "google-sheets")]
    #[error("url error: {0}")]
    Url(#[from] url::ParseError),
    #[cfg(feature = "google-sheets")]
    #[error("service account key error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

pub type Result<T> = std::result::Result<T, SheetError>;

pub const FORBIDDEN_REASON: &str =
    "permission denied: share the spreadsheet with the service account's client_email as an Editor";
pub const NOT_FOUND_REASON: &str = "spreadsheet id or sheet name is wrong";

impl SheetError {
    pub fn status(&self) -> Option<u16> {
        match self {
            SheetError::Status { status, .. } => Some(*status),
            #[cfg(feature = "google-sheets")]
            SheetError::Http(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// Human-readable explanation for callers of a failed sheet operation.
    pub fn reason(&self) -> String {
        match self.status() {
            Some(403) => return FORBIDDEN_REASON.to_string(),
            Some(404) => return NOT_FOUND_REASON.to_string(),
            _ => {}
        }
        match self {
            SheetError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            SheetError::Status { status, .. } => format!("unexpected status: {status}"),
            other => other.to_string(),
        }
    }
}
