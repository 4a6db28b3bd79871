use clap::{Parser, command};
use serde::{Deserialize, Serialize};

use crate::model::storage::StorageConfig;

/**
 * Command-line arguments for the application.
 */
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct ApplicationArguments {
    /**
     * Path to the configuration file.
     */
    #[arg(short, long)]
    pub config_file: String,
}

/**
 * Represents the configuration for the application.
 */
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /**
     * Logging configuration for the application.
     */
    pub logging: LoggingConfig,
    /**
     * Security configuration for the application.
     */
    pub security: AppSecurity,
    /**
     * Server configuration for the application.
     */
    pub server: Server,
    /**
     * Database configuration for the application.
     */
    pub database: Database,
    /**
     * Object storage areas for static assets and media uploads.
     */
    pub storage: Option<StorageConfig>,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /**
     * Whether to log the target of the log message.
     */
    pub target: bool,
    /**
     * Whether to log thread IDs .
     */
    pub thread_ids: bool,
    /**
     * Whether to log thread names.
     */
    pub thread_names: bool,
    /**
     * Whether to log line numbers.
     */
    pub line_number: bool,
    /**
     * Whether to log the log level.
     */
    pub level: bool,
    /**
     * Whether to use ANSI colors in logs.
     */
    pub ansi: bool,
    /**
     * Whether to also write logs to `logfile`.
     */
    pub file: bool,
    /**
     * Path to the log file.
     */
    pub logfile: String,
    /**
     * Additional directives for logging configuration, e.g. `sqlx=warn`.
     */
    pub directives: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig { target: true, thread_ids: true, thread_names: true, line_number: true, level: true, ansi: true, file: false, logfile: "/tmp/honey_lab_api.log".to_string(), directives: vec![] }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    /**
     * Type of the database (e.g., `PostgreSQL`).
     */
    pub db_type: DatabaseType,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DatabaseType {
    /**
     * `PostgreSQL` database type. Timeouts are in milliseconds.
     */
    #[serde(rename_all = "camelCase")]
    Postgresql { connection_string: String, max_connections: u32, min_connections: u32, acquire_timeout: u64, acquire_slow_threshold: u64, idle_timeout: u64, max_lifetime: u64 },
}

/**
 * Bearer token verification settings.
 */
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AppSecurity {
    /**
     * Path to the PEM public key, or the shared secret file for HMAC algorithms.
     */
    pub jwt_key_file: String,
    /**
     * JWT algorithm, e.g. `RS256`.
     */
    pub jwt_algorithm: String,
}

/**
 * Represents the server configuration for the application.
 */
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    /**
     * Number of worker threads for the server.
     */
    pub workers: usize,
    /**
     * Address to bind to. Defaults to loopback.
     */
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /**
     * HTTP port for the server.
     */
    pub http_port: Option<u16>,
    /**
     * HTTPS configuration for the server.
     */
    pub https_config: Option<HttpsConfig>,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

/**
 * Represents the HTTPS configuration for the server.
 */
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpsConfig {
    /**
     * Port for the HTTPS server.
     */
    pub port: u16,
    /**
     * Path to the certificate file.
     */
    pub certificate_file: String,
    /**
     * Path to the private key file.
     */
    pub private_key_file: String,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::storage::{ObjectAcl, StorageArea};

    #[test]
    fn test_config_serialization() {
        let config = Config {
            logging: LoggingConfig::default(),
            database: Database {
                db_type: DatabaseType::Postgresql {
                    connection_string: "postgres://honeylab@localhost/honeylab".to_string(),
                    max_connections: 5,
                    min_connections: 1,
                    acquire_timeout: 30,
                    acquire_slow_threshold: 60,
                    idle_timeout: 300,
                    max_lifetime: 3600,
                },
            },
            security: AppSecurity { jwt_key_file: "./test_config/public_keys/jwt.pem".to_string(), jwt_algorithm: "RS256".to_string() },
            server: Server { workers: 4, bind_address: "0.0.0.0".to_string(), http_port: Some(8080), https_config: None },
            storage: Some(StorageConfig { bucket: "honey-lab".to_string(), static_area: StorageArea::static_assets(), media_area: StorageArea::media() }),
        };
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.logging.target, deserialized.logging.target);
        assert_eq!(config.logging.thread_ids, deserialized.logging.thread_ids);
        assert_eq!(config.logging.line_number, deserialized.logging.line_number);
        assert_eq!(config.logging.file, deserialized.logging.file);
        assert_eq!(config.logging.logfile, deserialized.logging.logfile);
        assert_eq!(config.logging.directives, deserialized.logging.directives);
        assert_eq!(config.server.workers, deserialized.server.workers);
        assert_eq!(config.server.http_port, deserialized.server.http_port);
        assert_eq!(deserialized.server.bind_address, "0.0.0.0");
        assert!(deserialized.server.https_config.is_none());
        assert_eq!(deserialized.security, config.security);
        assert_eq!(deserialized.storage, config.storage);
    }

    #[test]
    fn test_config_from_toml_document() {
        let document = r#"
            [logging]
            target = true
            threadIds = false
            threadNames = false
            lineNumber = true
            level = true
            ansi = false
            file = false
            logfile = "/tmp/honey.log"
            directives = ["sqlx=warn"]

            [security]
            jwtKeyFile = "/etc/honey/jwt.pem"
            jwtAlgorithm = "RS256"

            [server]
            workers = 2
            httpPort = 8080

            [database.dbType.postgresql]
            connectionString = "postgres://localhost/honeylab"
            maxConnections = 10
            minConnections = 1
            acquireTimeout = 5000
            acquireSlowThreshold = 1000
            idleTimeout = 60000
            maxLifetime = 600000

            [storage]
            bucket = "honey-lab"

            [storage.mediaArea]
            location = "uploads"
            defaultAcl = "private"
            fileOverwrite = false
        "#;
        let config: Config = toml::from_str(document).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1");
        assert_eq!(config.logging.directives, vec!["sqlx=warn".to_string()]);
        let storage = config.storage.unwrap();
        assert_eq!(storage.media_area.location, "uploads");
        assert_eq!(storage.static_area.default_acl, ObjectAcl::PublicRead);
        let DatabaseType::Postgresql { max_connections, .. } = config.database.db_type;
        assert_eq!(max_connections, 10);
    }
}
