use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres URL. Without it the server runs on the in-memory store.
    pub database_url: Option<String>,
    pub port: u16,
    pub jwt_secret: String,
    pub allowed_origins: Vec<String>,
    pub rate_limit_per_minute: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| AppError::EnvError("JWT_SECRET must be set".into()))?;
        if jwt_secret.is_empty() {
            return Err(AppError::EnvError("JWT_SECRET must not be empty".into()));
        }

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|s| !s.is_empty()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(3001),
            jwt_secret,
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            rate_limit_per_minute: std::env::var("RATE_LIMIT_PER_MINUTE")
                .ok()
                .and_then(|s| s.parse::<u32>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(1000),
        })
    }
}
