use anyhow::{Context, Result};

const DEFAULT_AI_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub ai_gateway_url: String,
    pub ai_gateway_api_key: String,
    pub auth_service_url: String,
    pub auth_service_key: String,
    pub github_api_url: String,
    pub github_token: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            ai_gateway_url: optional_env("AI_GATEWAY_URL")
                .unwrap_or_else(|| DEFAULT_AI_GATEWAY_URL.to_string()),
            ai_gateway_api_key: require_env("AI_GATEWAY_API_KEY")?,
            auth_service_url: require_env("AUTH_SERVICE_URL")?,
            auth_service_key: require_env("AUTH_SERVICE_KEY")?,
            github_api_url: optional_env("GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            github_token: optional_env("GITHUB_TOKEN"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Treats an empty value the same as an unset one.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
