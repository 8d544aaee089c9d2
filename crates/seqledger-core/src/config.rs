use config::{Config, ConfigError, File as ConfigFile};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Delivery (ticket) directory containing one subdirectory per patient.
    #[serde(default)]
    pub input_path: Option<String>,
    #[serde(default = "default_db_path")]
    pub db_path: String,
    #[serde(default = "default_report_path")]
    pub report_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_path: None,
            db_path: default_db_path(),
            report_path: default_report_path(),
        }
    }
}

fn default_db_path() -> String {
    "seqledger.db".to_string()
}

fn default_report_path() -> String {
    "seqledger_report.txt".to_string()
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
