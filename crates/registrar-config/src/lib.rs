use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use registrar_core::{PhonePolicy, SchemaVariant, DEFAULT_ENROLLMENT_TYPES};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

const APP_DIR: &str = "registrar";
const CONFIG_FILENAME: &str = "config.toml";
const PORT_ENV: &str = "PORT";

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_PRIMARY_NAME: &str = "primary";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: String,
    pub port: u16,
    pub allowed_origin: String,
    pub schema: SchemaConfig,
    pub primary: StoreConfig,
    pub secondaries: Vec<StoreConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaConfig {
    pub variant: SchemaVariant,
    pub phone_policy: PhonePolicy,
    pub enrollment_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub name: String,
    pub backend: StoreBackend,
    pub on_lookup_error: LookupFailure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Sheets {
        spreadsheet_id: String,
        sheet_name: Option<String>,
        credentials_path: PathBuf,
        endpoint: Option<String>,
    },
    File {
        path: PathBuf,
        sheet_name: Option<String>,
    },
    Sqlite {
        path: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Sheets,
    File,
    Sqlite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupFailure {
    Allow,
    Reject,
}

impl StoreKind {
    fn default_lookup_failure(self) -> LookupFailure {
        match self {
            StoreKind::Sqlite => LookupFailure::Reject,
            StoreKind::Sheets | StoreKind::File => LookupFailure::Allow,
        }
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            variant: SchemaVariant::Extended,
            phone_policy: PhonePolicy::Normalize,
            enrollment_types: DEFAULT_ENROLLMENT_TYPES
                .iter()
                .map(|value| value.to_string())
                .collect(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            schema: SchemaConfig::default(),
            primary: StoreConfig {
                name: DEFAULT_PRIMARY_NAME.to_string(),
                backend: StoreBackend::Sqlite { path: None },
                on_lookup_error: LookupFailure::Reject,
            },
            secondaries: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid allowed_origin value: {0}")]
    InvalidAllowedOrigin(String),
    #[error("enrollment_types must list at least one non-empty value")]
    InvalidEnrollmentTypes,
    #[error("invalid store name: {0}")]
    InvalidStoreName(String),
    #[error("duplicate store name: {0}")]
    DuplicateStoreName(String),
    #[error("store {store}: {field}")]
    InvalidStoreField { store: String, field: String },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    bind: Option<String>,
    port: Option<u16>,
    allowed_origin: Option<String>,
    schema: Option<SchemaFile>,
    primary: Option<StoreFile>,
    #[serde(default)]
    secondary: Vec<StoreFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaFile {
    variant: Option<SchemaVariant>,
    phone_policy: Option<PhonePolicy>,
    enrollment_types: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StoreFile {
    name: String,
    kind: StoreKind,
    on_lookup_error: Option<LookupFailure>,
    spreadsheet_id: Option<String>,
    sheet_name: Option<String>,
    credentials_path: Option<PathBuf>,
    endpoint: Option<String>,
    path: Option<PathBuf>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return apply_env(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => {
            return apply_env(AppConfig::default())
        }
        Err(err) => return Err(err),
    };
    let config = load_at_path(&path, required)?.unwrap_or_default();
    apply_env(config)
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn apply_env(config: AppConfig) -> Result<AppConfig> {
    Ok(apply_port_override(config, env::var(PORT_ENV).ok()))
}

fn apply_port_override(mut config: AppConfig, port: Option<String>) -> AppConfig {
    let Some(raw) = port else {
        return config;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return config;
    }
    match trimmed.parse() {
        Ok(port) => config.port = port,
        Err(_) => warn!(value = %raw, port = config.port, "ignoring unparseable PORT"),
    }
    config
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(bind) = parsed.bind {
        config.bind = bind;
    }
    if let Some(port) = parsed.port {
        config.port = port;
    }
    if let Some(origin) = parsed.allowed_origin {
        let trimmed = origin.trim();
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::InvalidAllowedOrigin(origin));
        }
        config.allowed_origin = trimmed.trim_end_matches('/').to_string();
    }

    if let Some(schema) = parsed.schema {
        if let Some(variant) = schema.variant {
            config.schema.variant = variant;
        }
        if let Some(policy) = schema.phone_policy {
            config.schema.phone_policy = policy;
        }
        if let Some(values) = schema.enrollment_types {
            let values: Vec<String> = values
                .iter()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .collect();
            if values.is_empty() {
                return Err(ConfigError::InvalidEnrollmentTypes);
            }
            config.schema.enrollment_types = values;
        }
    }

    let mut seen = HashSet::new();
    if let Some(primary) = parsed.primary {
        config.primary = store_config(primary)?;
    }
    seen.insert(config.primary.name.clone());

    for secondary in parsed.secondary {
        let store = store_config(secondary)?;
        if !seen.insert(store.name.clone()) {
            return Err(ConfigError::DuplicateStoreName(store.name));
        }
        config.secondaries.push(store);
    }

    Ok(config)
}

fn store_config(file: StoreFile) -> Result<StoreConfig> {
    let name = file.name.trim().to_string();
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidStoreName(file.name));
    }

    let backend = match file.kind {
        StoreKind::Sheets => StoreBackend::Sheets {
            spreadsheet_id: required_text(&name, "spreadsheet_id", file.spreadsheet_id)?,
            sheet_name: optional_text(&name, "sheet_name", file.sheet_name)?,
            credentials_path: required_path(&name, "credentials_path", file.credentials_path)?,
            endpoint: optional_text(&name, "endpoint", file.endpoint)?,
        },
        StoreKind::File => StoreBackend::File {
            path: required_path(&name, "path", file.path)?,
            sheet_name: optional_text(&name, "sheet_name", file.sheet_name)?,
        },
        StoreKind::Sqlite => StoreBackend::Sqlite {
            path: match file.path {
                Some(path) => Some(required_path(&name, "path", Some(path))?),
                None => None,
            },
        },
    };

    Ok(StoreConfig {
        on_lookup_error: file
            .on_lookup_error
            .unwrap_or_else(|| file.kind.default_lookup_failure()),
        name,
        backend,
    })
}

fn required_text(store: &str, field: &str, value: Option<String>) -> Result<String> {
    match optional_text(store, field, value)? {
        Some(value) => Ok(value),
        None => Err(invalid_field(store, format!("{field} is required"))),
    }
}

fn optional_text(store: &str, field: &str, value: Option<String>) -> Result<Option<String>> {
    match value {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(invalid_field(store, format!("{field} cannot be empty")));
            }
            Ok(Some(trimmed.to_string()))
        }
        None => Ok(None),
    }
}

fn required_path(store: &str, field: &str, value: Option<PathBuf>) -> Result<PathBuf> {
    match value {
        Some(path) if !path.as_os_str().is_empty() => Ok(path),
        Some(_) => Err(invalid_field(store, format!("{field} cannot be empty"))),
        None => Err(invalid_field(store, format!("{field} is required"))),
    }
}

fn invalid_field(store: &str, field: String) -> ConfigError {
    ConfigError::InvalidStoreField {
        store: store.to_string(),
        field,
    }
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        apply_port_override, load_at_path, AppConfig, ConfigError, LookupFailure, StoreBackend,
    };
    use registrar_core::{PhonePolicy, SchemaVariant};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn restrict_permissions(path: &Path) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path).expect("metadata").permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).expect("chmod");
        }
    }

    fn write_config(temp: &TempDir, contents: &str) -> PathBuf {
        let path = temp.path().join("config.toml");
        fs::write(&path, contents).expect("write config");
        restrict_permissions(&path);
        path
    }

    #[test]
    fn defaults_use_sqlite_primary() {
        let config = AppConfig::default();
        assert_eq!(config.port, 3001);
        assert_eq!(config.primary.backend, StoreBackend::Sqlite { path: None });
        assert_eq!(config.primary.on_lookup_error, LookupFailure::Reject);
        assert_eq!(config.schema.variant, SchemaVariant::Extended);
        assert!(config.secondaries.is_empty());
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("config file not found"));
    }

    #[test]
    fn load_at_path_parses_stores() {
        let temp = TempDir::new().expect("tempdir");
        let path = write_config(
            &temp,
            r#"
port = 8080
allowed_origin = "https://apply.example.uz/"

[schema]
variant = "basic"
phone_policy = "prefixed"

[primary]
name = "db"
kind = "sqlite"
path = "/var/lib/registrar/db.sqlite3"

[[secondary]]
name = "sheet"
kind = "sheets"
spreadsheet_id = "abc123"
credentials_path = "/run/secrets/sheets_service_account.json"
"#,
        );

        let config = load_at_path(&path, true).expect("load").expect("config");
        assert_eq!(config.port, 8080);
        assert_eq!(config.allowed_origin, "https://apply.example.uz");
        assert_eq!(config.schema.variant, SchemaVariant::Basic);
        assert_eq!(config.schema.phone_policy, PhonePolicy::Prefixed);
        assert_eq!(config.primary.name, "db");
        assert_eq!(config.primary.on_lookup_error, LookupFailure::Reject);
        assert_eq!(config.secondaries.len(), 1);
        let secondary = &config.secondaries[0];
        assert_eq!(secondary.on_lookup_error, LookupFailure::Allow);
        assert_eq!(
            secondary.backend,
            StoreBackend::Sheets {
                spreadsheet_id: "abc123".to_string(),
                sheet_name: None,
                credentials_path: PathBuf::from("/run/secrets/sheets_service_account.json"),
                endpoint: None,
            }
        );
    }

    #[test]
    fn lookup_policy_can_be_overridden() {
        let temp = TempDir::new().expect("tempdir");
        let path = write_config(
            &temp,
            "[primary]\nname = \"sheet\"\nkind = \"file\"\npath = \"rows.json\"\non_lookup_error = \"reject\"\n",
        );
        let config = load_at_path(&path, true).expect("load").expect("config");
        assert_eq!(config.primary.on_lookup_error, LookupFailure::Reject);
    }

    #[test]
    fn sheets_store_requires_spreadsheet_id() {
        let temp = TempDir::new().expect("tempdir");
        let path = write_config(
            &temp,
            "[primary]\nname = \"sheet\"\nkind = \"sheets\"\ncredentials_path = \"key.json\"\n",
        );
        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStoreField { .. }));
        assert_eq!(err.to_string(), "store sheet: spreadsheet_id is required");
    }

    #[test]
    fn duplicate_store_names_are_rejected() {
        let temp = TempDir::new().expect("tempdir");
        let path = write_config(
            &temp,
            "[primary]\nname = \"main\"\nkind = \"sqlite\"\n\n[[secondary]]\nname = \"main\"\nkind = \"file\"\npath = \"rows.json\"\n",
        );
        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateStoreName(ref name) if name == "main"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let temp = TempDir::new().expect("tempdir");
        let path = write_config(&temp, "listen = \"0.0.0.0:80\"\n");
        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn empty_enrollment_types_are_rejected() {
        let temp = TempDir::new().expect("tempdir");
        let path = write_config(&temp, "[schema]\nenrollment_types = [\"  \"]\n");
        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnrollmentTypes));
    }

    #[cfg(unix)]
    #[test]
    fn world_readable_config_is_rejected() {
        use std::os::unix::fs::PermissionsExt;
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "port = 1\n").expect("write");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("chmod");
        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::InsecurePermissions(_)));
    }

    #[test]
    fn port_override_applies_when_parseable() {
        let config = apply_port_override(AppConfig::default(), Some(" 4000 ".to_string()));
        assert_eq!(config.port, 4000);

        let config = apply_port_override(AppConfig::default(), None);
        assert_eq!(config.port, 3001);
    }

    #[test]
    fn unparseable_port_override_keeps_configured_port() {
        let mut base = AppConfig::default();
        base.port = 8080;

        let config = apply_port_override(base.clone(), Some("http".to_string()));
        assert_eq!(config.port, 8080);

        let config = apply_port_override(base.clone(), Some("70000".to_string()));
        assert_eq!(config.port, 8080);

        let config = apply_port_override(base, Some("   ".to_string()));
        assert_eq!(config.port, 8080);
    }
}
