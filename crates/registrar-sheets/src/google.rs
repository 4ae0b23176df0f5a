use crate::auth::TokenSource;
use crate::service::{Row, SheetService};
use crate::{Result, SheetError};
use std::path::Path;

pub const DEFAULT_ENDPOINT: &str = "https://sheets.googleapis.com";
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

#[cfg(feature = "google-sheets")]
mod imp {
    use super::{Path, Result, Row, SheetError, SheetService, TokenSource, SHEETS_SCOPE};
    use crate::auth::{AccessToken, TokenCache};
    use jsonwebtoken::{Algorithm, EncodingKey, Header};
    use reqwest::blocking::{Client, RequestBuilder, Response};
    use reqwest::StatusCode;
    use serde::{Deserialize, Serialize};
    use serde_json::{json, Value};
    use std::fmt;
    use std::fs;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};
    use url::Url;

    const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
    const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
    const ASSERTION_LIFETIME_SECS: u64 = 3600;

    #[derive(Debug, Deserialize)]
    struct ValueRange {
        #[serde(default)]
        values: Vec<Vec<Value>>,
    }

    #[derive(Debug, Deserialize)]
    struct ErrorEnvelope {
        error: ErrorBody,
    }

    #[derive(Debug, Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    #[derive(Deserialize)]
    struct ServiceAccountKey {
        client_email: String,
        private_key: String,
        #[serde(default = "default_token_uri")]
        token_uri: String,
    }

    fn default_token_uri() -> String {
        DEFAULT_TOKEN_URI.to_string()
    }

    #[derive(Debug, Serialize)]
    struct Claims<'a> {
        iss: &'a str,
        scope: &'a str,
        aud: &'a str,
        iat: u64,
        exp: u64,
    }

    #[derive(Debug, Deserialize)]
    struct TokenResponse {
        access_token: String,
        expires_in: u64,
    }

    #[derive(Debug, Deserialize)]
    struct TokenError {
        error: String,
        error_description: Option<String>,
    }

    /// Service-account credential: signs a JWT assertion with the account's
    /// private key and trades it for an access token at `token_uri`.
    pub struct ServiceAccount {
        client: Client,
        client_email: String,
        token_uri: String,
        key: EncodingKey,
    }

    impl ServiceAccount {
        pub fn from_key_file(client: Client, path: &Path) -> Result<Self> {
            let text = fs::read_to_string(path)?;
            Self::from_key_json(client, &text)
        }

        pub fn from_key_json(client: Client, json: &str) -> Result<Self> {
            let key: ServiceAccountKey = serde_json::from_str(json)?;
            if key.client_email.trim().is_empty() {
                return Err(SheetError::Auth(
                    "service account key has no client_email".to_string(),
                ));
            }
            let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
            Ok(Self {
                client,
                client_email: key.client_email,
                token_uri: key.token_uri,
                key: encoding_key,
            })
        }

        pub fn client_email(&self) -> &str {
            &self.client_email
        }

        fn assertion(&self, issued_at: u64) -> Result<String> {
            let claims = Claims {
                iss: &self.client_email,
                scope: SHEETS_SCOPE,
                aud: &self.token_uri,
                iat: issued_at,
                exp: issued_at + ASSERTION_LIFETIME_SECS,
            };
            Ok(jsonwebtoken::encode(
                &Header::new(Algorithm::RS256),
                &claims,
                &self.key,
            )?)
        }
    }

    impl TokenSource for ServiceAccount {
        fn fetch(&self) -> Result<AccessToken> {
            let assertion = self.assertion(unix_now()?)?;
            let response = self
                .client
                .post(&self.token_uri)
                .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
                .send()?;

            let status = response.status();
            if !status.is_success() {
                let detail = response
                    .text()
                    .ok()
                    .and_then(|body| serde_json::from_str::<TokenError>(&body).ok())
                    .map(|err| match err.error_description {
                        Some(description) => format!("{}: {description}", err.error),
                        None => err.error,
                    })
                    .unwrap_or_else(|| format!("unexpected status: {}", status.as_u16()));
                return Err(SheetError::Auth(detail));
            }

            let body: TokenResponse = response.json()?;
            Ok(AccessToken::new(
                body.access_token,
                Duration::from_secs(body.expires_in),
            ))
        }
    }

    impl fmt::Debug for ServiceAccount {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("ServiceAccount")
                .field("client_email", &self.client_email)
                .field("token_uri", &self.token_uri)
                .finish_non_exhaustive()
        }
    }

    fn unix_now() -> Result<u64> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .map_err(|_| SheetError::Auth("system clock is before the unix epoch".to_string()))
    }

    pub fn http_client() -> Result<Client> {
        Ok(Client::builder()
            .user_agent("registrar")
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?)
    }

    /// Google Sheets v4 values API.
    #[derive(Debug)]
    pub struct GoogleSheets {
        client: Client,
        endpoint: Url,
        spreadsheet_id: String,
        tokens: TokenCache,
    }

    impl GoogleSheets {
        pub fn new(
            endpoint: &str,
            spreadsheet_id: String,
            tokens: impl TokenSource + 'static,
        ) -> Result<Self> {
            Self::with_client(http_client()?, endpoint, spreadsheet_id, tokens)
        }

        pub fn with_client(
            client: Client,
            endpoint: &str,
            spreadsheet_id: String,
            tokens: impl TokenSource + 'static,
        ) -> Result<Self> {
            let endpoint = Url::parse(endpoint)?;
            if endpoint.cannot_be_a_base() {
                return Err(SheetError::Unavailable(format!(
                    "sheets endpoint cannot be a base url: {endpoint}"
                )));
            }
            Ok(Self {
                client,
                endpoint,
                spreadsheet_id,
                tokens: TokenCache::new(tokens),
            })
        }

        /// Loads the key once; access tokens are minted from it on demand.
        pub fn from_service_account_file(
            endpoint: &str,
            spreadsheet_id: String,
            key_path: &Path,
        ) -> Result<Self> {
            let client = http_client()?;
            let account = ServiceAccount::from_key_file(client.clone(), key_path)?;
            Self::with_client(client, endpoint, spreadsheet_id, account)
        }

        fn values_url(&self, segment: &str) -> Result<Url> {
            let mut url = self.endpoint.clone();
            url.path_segments_mut()
                .map_err(|_| SheetError::Unavailable("invalid sheets endpoint".to_string()))?
                .pop_if_empty()
                .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values"])
                .push(segment);
            Ok(url)
        }

        // A 401 means the cached token was revoked or expired early: drop it
        // and retry once with a fresh one.
        fn send(&self, request: impl Fn(&str) -> RequestBuilder) -> Result<Response> {
            let response = request(&self.tokens.bearer()?).send()?;
            if response.status() != StatusCode::UNAUTHORIZED {
                return check_status(response);
            }
            self.tokens.invalidate();
            check_status(request(&self.tokens.bearer()?).send()?)
        }
    }

    impl SheetService for GoogleSheets {
        fn service_name(&self) -> &'static str {
            "google-sheets"
        }

        fn get(&self, range: &str) -> Result<Vec<Row>> {
            let url = self.values_url(range)?;
            let response = self.send(|token| self.client.get(url.clone()).bearer_auth(token))?;
            let body: ValueRange = response.json()?;
            Ok(body
                .values
                .into_iter()
                .map(|row| row.into_iter().map(cell_text).collect())
                .collect())
        }

        fn append(&self, range: &str, row: Row) -> Result<()> {
            let mut url = self.values_url(&format!("{range}:append"))?;
            url.query_pairs_mut()
                .append_pair("valueInputOption", "RAW")
                .append_pair("insertDataOption", "INSERT_ROWS");
            let body = json!({ "values": [row] });
            self.send(|token| {
                self.client
                    .post(url.clone())
                    .bearer_auth(token)
                    .json(&body)
            })?;
            Ok(())
        }
    }

    fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .ok()
            .and_then(|body| serde_json::from_str::<ErrorEnvelope>(&body).ok())
            .and_then(|envelope| envelope.error.message);
        Err(SheetError::Status {
            status: status.as_u16(),
            message,
        })
    }

    fn cell_text(value: Value) -> String {
        match value {
            Value::String(text) => text,
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

}

#[cfg(not(feature = "google-sheets"))]
mod imp {
    use super::{Path, Result, Row, SheetError, SheetService, TokenSource};
    use std::fs;

    #[derive(Debug)]
    pub struct GoogleSheets {
        spreadsheet_id: String,
    }

    impl GoogleSheets {
        pub fn new(
            _endpoint: &str,
            spreadsheet_id: String,
            _tokens: impl TokenSource + 'static,
        ) -> Result<Self> {
            Ok(Self { spreadsheet_id })
        }

        pub fn from_service_account_file(
            _endpoint: &str,
            spreadsheet_id: String,
            key_path: &Path,
        ) -> Result<Self> {
            fs::metadata(key_path)?;
            Ok(Self { spreadsheet_id })
        }

        fn unavailable(&self) -> SheetError {
            SheetError::Unavailable(format!(
                "spreadsheet {} requires the google-sheets feature",
                self.spreadsheet_id
            ))
        }
    }

    impl SheetService for GoogleSheets {
        fn service_name(&self) -> &'static str {
            "google-sheets"
        }

        fn get(&self, _range: &str) -> Result<Vec<Row>> {
            Err(self.unavailable())
        }

        fn append(&self, _range: &str, _row: Row) -> Result<()> {
            Err(self.unavailable())
        }
    }
}

#[cfg(feature = "google-sheets")]
pub use imp::ServiceAccount;
pub use imp::GoogleSheets;
