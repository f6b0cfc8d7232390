use std::env;
use std::path::PathBuf;

pub const DEFAULT_REALM: &str = "Rihua API";
pub const DEFAULT_LANGUAGE: &str = "zh-CN";
pub const DEFAULT_LOG_DIR: &str = "storage/logs";

/// HTTP server and request-handling settings.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Realm advertised in `WWW-Authenticate` challenges
    pub realm: String,
    /// Locale used when a token or user carries none
    pub default_language: String,
    /// Optional JSON file of users loaded into the credential store
    pub seed_users_file: Option<PathBuf>,
    pub log_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            realm: DEFAULT_REALM.to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
            seed_users_file: None,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: non_empty_var("HOST").unwrap_or(defaults.host),
            port: non_empty_var("PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            realm: non_empty_var("AUTH_REALM").unwrap_or(defaults.realm),
            default_language: non_empty_var("DEFAULT_LANGUAGE")
                .unwrap_or(defaults.default_language),
            seed_users_file: non_empty_var("SEED_USERS_FILE").map(PathBuf::from),
            log_dir: non_empty_var("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
