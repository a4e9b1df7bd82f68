use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub pages: ErrorPagesConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Page paths served for status-only failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPagesConfig {
    pub not_found: String,
    pub internal_error: String,
    pub panic: String,
}

impl Default for ErrorPagesConfig {
    fn default() -> Self {
        Self {
            not_found: "/error-page/404".to_string(),
            internal_error: "/error-page/500".to_string(),
            panic: "/error-page/500".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Config {
            server: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("API_PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .context("API_PORT must be a valid port number")?,
            },
            pages: Self::pages_config_from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn pages_config_from_env() -> Result<ErrorPagesConfig> {
        let defaults = ErrorPagesConfig::default();

        let not_found = page_path_var("ERROR_PAGE_404", defaults.not_found)?;
        let internal_error = page_path_var("ERROR_PAGE_500", defaults.internal_error)?;
        // A panic is served the 500 page unless configured separately
        let panic = page_path_var("ERROR_PAGE_PANIC", internal_error.clone())?;

        Ok(ErrorPagesConfig {
            not_found,
            internal_error,
            panic,
        })
    }
}

fn page_path_var(key: &str, default: String) -> Result<String> {
    let path = env::var(key).unwrap_or(default);
    validate_page_path(&path).with_context(|| format!("{} must be an absolute path", key))?;
    Ok(path)
}

fn validate_page_path(path: &str) -> Result<()> {
    if path.starts_with('/') {
        Ok(())
    } else {
        anyhow::bail!("invalid page path: {:?}", path)
    }
}
