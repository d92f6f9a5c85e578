use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub join: JoinConfig,
    pub output: OutputConfig,
    pub mail: MailConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    pub transactions_path: PathBuf,
    pub stores_path: PathBuf,
    pub managers_path: PathBuf,
    /// Delimiter of the transactions and manager files
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// The store directory comes out of a different export with its own format
    #[serde(default = "default_stores_delimiter")]
    pub stores_delimiter: char,
    #[serde(default)]
    pub stores_encoding: TextEncoding,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextEncoding {
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    #[default]
    #[serde(rename = "latin-1", alias = "latin1", alias = "iso-8859-1")]
    Latin1,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct JoinConfig {
    /// Excluded rows allowed before a warning is raised
    #[serde(default)]
    pub orphan_tolerance: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MailProvider {
    #[default]
    Log,
    Outbox,
    Smtp,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    #[serde(default)]
    pub provider: MailProvider,
    pub from_email: String,
    pub from_name: String,
    pub executive_email: String,
    pub executive_name: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_outbox_dir")]
    pub outbox_dir: PathBuf,
    pub smtp: Option<SmtpSettings>,
}

/// Credentials are never stored in the file, only the names of the
/// environment variables holding them.
#[derive(Debug, Deserialize, Clone)]
pub struct SmtpSettings {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username_env: String,
    pub password_env: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
        }
    }
}

fn default_delimiter() -> char {
    ','
}

fn default_stores_delimiter() -> char {
    ';'
}

fn default_currency() -> String {
    "R$".into()
}

fn default_outbox_dir() -> PathBuf {
    PathBuf::from("target/outbox")
}

fn default_smtp_port() -> u16 {
    465
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("target/logs")
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[data]
transactions_path = "data/sales.csv"
stores_path = "data/stores.csv"
managers_path = "data/managers.csv"

[join]
orphan_tolerance = 0

[output]
dir = "target/reports"

[mail]
provider = "log"
from_email = "reports@example.com"
from_name = "Sales Report Bot"
executive_email = "board@example.com"
executive_name = "Board"
"#;

/// Load configuration.
///
/// Search order:
/// 1. Explicit path (first command line argument)
/// 2. config.toml in the working directory
/// 3. config.toml next to the executable
/// 4. Embedded default config
///
/// Relative paths inside a file are resolved against that file's directory.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = explicit {
        tracing::info!("Loading config from: {}", path.display());
        return load_from_file(path);
    }

    let mut candidates = vec![PathBuf::from("config.toml")];
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.push(exe_dir.join("config.toml"));
        }
    }

    for candidate in candidates {
        if candidate.exists() {
            tracing::info!("Loading config from: {}", candidate.display());
            return load_from_file(&candidate);
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

fn load_from_file(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read config {}: {}", path.display(), e))?;
    let mut config: Config = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))?;

    if let Some(base) = path.parent() {
        config.resolve_relative_to(base);
    }
    Ok(config)
}

impl Config {
    fn resolve_relative_to(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.data.transactions_path);
        resolve(&mut self.data.stores_path);
        resolve(&mut self.data.managers_path);
        resolve(&mut self.output.dir);
        resolve(&mut self.mail.outbox_dir);
        resolve(&mut self.logging.dir);
    }
}
