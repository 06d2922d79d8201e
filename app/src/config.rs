use std::path::PathBuf;

/// Filesystem layout and environment-derived settings.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub data_path: PathBuf,
}

impl PlatformConfig {
    /// Load from environment variables, reading a `.env` file first when
    /// one exists.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let data_path = std::env::var("DATA_PATH").unwrap_or_else(|_| "./data".to_string());
        Self {
            data_path: PathBuf::from(data_path),
        }
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_path.join("logs")
    }

    pub fn audit_trail_path(&self) -> PathBuf {
        self.data_path.join("audit").join("trail.jsonl")
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("./data"),
        }
    }
}
