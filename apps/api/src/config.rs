use crate::errors::AppError;

/// Application configuration loaded from environment variables.
/// The service refuses to start if the LLM credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub together_api_key: String,
    pub portfolio_csv: String,
    pub vectorstore_dir: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            together_api_key: require_env("TOGETHER_API_KEY")?,
            portfolio_csv: std::env::var("PORTFOLIO_CSV")
                .unwrap_or_else(|_| "resources/portfolio.csv".to_string()),
            vectorstore_dir: std::env::var("VECTORSTORE_DIR")
                .unwrap_or_else(|_| "vectorstore".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("PORT must be a valid port number".to_string()))?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String, AppError> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::Config(format!(
            "Required environment variable '{key}' is not set"
        ))),
    }
}
