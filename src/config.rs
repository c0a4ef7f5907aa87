use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_days: i64,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub client_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Read configuration from environment variables without touching .env
    /// files. Used by tests that control the environment directly.
    pub fn from_env_only() -> Result<Self> {
        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://@localhost:5432/hrms".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                "your-super-secret-jwt-key-change-this-in-production-12345".to_string()
            }),
            jwt_expiration_days: env::var("JWT_EXPIRATION_DAYS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .unwrap_or(1),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            client_base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    #[test]
    #[serial]
    fn defaults_when_env_is_empty() {
        env::remove_var("PORT");
        env::remove_var("ENVIRONMENT");
        env::remove_var("JWT_EXPIRATION_DAYS");

        let config = Config::from_env_only().unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, "development");
        assert_eq!(config.jwt_expiration_days, 1);
        assert!(!config.is_production());
    }

    #[test]
    #[serial]
    fn reads_overrides_from_env() {
        env::set_var("PORT", "9999");
        env::set_var("ENVIRONMENT", "production");

        let config = Config::from_env_only().unwrap();

        assert_eq!(config.port, 9999);
        assert!(config.is_production());
        assert_eq!(config.server_address(), "127.0.0.1:9999");

        env::remove_var("PORT");
        env::remove_var("ENVIRONMENT");
    }
}
