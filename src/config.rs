// config.rs
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in minutes for a regular login.
    pub jwt_maxage: i64,
    pub port: u16,
    pub session_idle_minutes: i64,
    pub remember_me_days: i64,
    pub log_level: LevelFilter,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let jwt_maxage = std::env::var("JWT_MAXAGE").unwrap_or_else(|_| "120".to_string());

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8000);

        let session_idle_minutes = std::env::var("SESSION_IDLE_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(120);
        let remember_me_days = std::env::var("REMEMBER_ME_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(30);

        let log_level = std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|v| v.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::DEBUG);

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173,http://localhost:8000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Config {
            database_url,
            jwt_secret,
            jwt_maxage: jwt_maxage.parse::<i64>().expect("JWT_MAXAGE must be a number of minutes"),
            port,
            session_idle_minutes,
            remember_me_days,
            log_level,
            allowed_origins,
        }
    }

    /// Token lifetime in minutes, stretched when the user asked to be remembered.
    pub fn token_lifetime_minutes(&self, remember_me: bool) -> i64 {
        if remember_me {
            self.remember_me_days * 24 * 60
        } else {
            self.jwt_maxage
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            database_url: "postgres://localhost/wasel".to_string(),
            jwt_secret: "secret".to_string(),
            jwt_maxage: 120,
            port: 8000,
            session_idle_minutes: 120,
            remember_me_days: 30,
            log_level: LevelFilter::INFO,
            allowed_origins: vec![],
        }
    }

    #[test]
    fn remember_me_extends_token_lifetime() {
        let config = config();
        assert_eq!(config.token_lifetime_minutes(false), 120);
        assert_eq!(config.token_lifetime_minutes(true), 30 * 24 * 60);
    }
}
