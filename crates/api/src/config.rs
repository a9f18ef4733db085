use std::str::FromStr;

/// Which [`ProjectStore`](roombrief_db::ProjectStore) backend to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(format!(
                "Invalid STORE_BACKEND '{other}'. Must be one of: memory, postgres"
            )),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for background tasks, in seconds (default: `10`).
    pub shutdown_timeout_secs: u64,
    /// Largest accepted request body, for image uploads (default: 25 MiB).
    pub max_upload_bytes: usize,
    pub store_backend: StoreBackend,
    /// Required when `store_backend` is `Postgres`.
    pub database_url: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `10`                    |
    /// | `MAX_UPLOAD_MB`         | `25`                    |
    /// | `STORE_BACKEND`         | `memory`                |
    /// | `DATABASE_URL`          | unset                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let max_upload_mb: usize = std::env::var("MAX_UPLOAD_MB")
            .unwrap_or_else(|_| "25".into())
            .parse()
            .expect("MAX_UPLOAD_MB must be a valid usize");

        let store_backend: StoreBackend = std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "memory".into())
            .parse()
            .unwrap_or_else(|e: String| panic!("{e}"));

        let database_url = std::env::var("DATABASE_URL").ok();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            store_backend,
            database_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_backend_parses_known_names() {
        assert_eq!("memory".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert_eq!(
            " Postgres ".parse::<StoreBackend>(),
            Ok(StoreBackend::Postgres)
        );
        assert!("sqlite".parse::<StoreBackend>().is_err());
    }
}
