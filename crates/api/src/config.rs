/// Server configuration loaded from environment variables.
///
/// All fields except the database URL have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Upper bound of the connection pool (default: `10`).
    pub db_max_connections: u32,
    /// Recreate the schema and load sample films at startup (default: `false`).
    pub db_populate: bool,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default    |
    /// |------------------------|------------|
    /// | `HOST`                 | `0.0.0.0`  |
    /// | `PORT`                 | `3000`     |
    /// | `DATABASE_URL`         | required   |
    /// | `DB_MAX_CONNECTIONS`   | `10`       |
    /// | `DB_POPULATE`          | `false`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`       |
    ///
    /// Panics on missing or malformed values so misconfiguration fails at
    /// startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let db_max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        let db_populate: bool = std::env::var("DB_POPULATE")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("DB_POPULATE must be true or false");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            database_url,
            db_max_connections,
            db_populate,
            request_timeout_secs,
        }
    }
}
