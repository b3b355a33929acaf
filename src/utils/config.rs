use std::env;
use std::path::PathBuf;

/// Server configuration loaded from environment variables (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    pub service_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3000,
            data_dir: PathBuf::from("data"),
            export_dir: PathBuf::from("export"),
            service_name: "Unknown".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| format!("PORT must be a valid port number, got {:?}", raw))?,
            Err(_) => defaults.port,
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port,
            data_dir: env::var("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            export_dir: env::var("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
            service_name: env::var("SERVICE_NAME").unwrap_or(defaults.service_name),
        })
    }
}
