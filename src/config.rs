use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    pub attachments_dir: String,
    #[serde(default = "default_expected_hours")]
    pub default_expected_hours: f64,
    #[serde(default = "default_min_break")]
    pub default_min_break_minutes: i64,
    #[serde(default = "default_entry_time")]
    pub default_entry_time: String,
    #[serde(default = "default_exit_time")]
    pub default_exit_time: String,
}

fn default_expected_hours() -> f64 {
    8.0
}
fn default_min_break() -> i64 {
    60
}
fn default_entry_time() -> String {
    "09:00".to_string()
}
fn default_exit_time() -> String {
    "18:00".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            attachments_dir: Self::attachments_dir_path().to_string_lossy().to_string(),
            default_expected_hours: default_expected_hours(),
            default_min_break_minutes: default_min_break(),
            default_entry_time: default_entry_time(),
            default_exit_time: default_exit_time(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".timebank")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("timebank.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("timebank.sqlite")
    }

    /// Default directory for justification / manual-punch attachments
    pub fn attachments_dir_path() -> PathBuf {
        Self::config_dir().join("attachments")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Self {
        let path = Self::config_file();

        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
                Err(_) => Config::default(),
            }
        } else {
            Config::default()
        }
    }

    /// Initialize configuration, database and attachment files/directories.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> io::Result<()> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let db_path = if let Some(name) = custom_db {
            let p = std::path::Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::database_file()
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Test mode never touches the real config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| io::Error::other(e.to_string()))?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            fs::create_dir_all(Self::attachments_dir_path())?;
        }

        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(())
    }
}
