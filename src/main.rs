mod api;
mod dao;
mod model;
mod service;

use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::Duration;
use std::{fs, thread};

use crate::api::endpoints::configure;
use crate::api::middleware::timing_middleware;
use crate::api::security::JwtSecurityService;
use crate::api::state::AppState;
use crate::dao::{analysis::AnalysisDao, beekeeping::BeekeepingDao, laboratory::LaboratoryDao, statistics::StatisticsDao};
use crate::model::apperror::{ApplicationError, ErrorType};
use crate::model::config::{AppSecurity, ApplicationArguments, Config, DatabaseType, HttpsConfig, LoggingConfig};
use crate::model::storage::StorageConfig;
use crate::service::{analysis::AnalysisService, beekeeping::BeekeepingService, laboratory::LaboratoryService, statistics::StatisticsService};

use actix_web::middleware::from_fn;
use actix_web::{App, HttpServer, web};
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use clap::Parser;
use prometheus::IntGauge;
use rustls::pki_types::PrivateKeyDer;
use rustls::{ServerConfig, SupportedProtocolVersion};
use rustls_pemfile::{certs, pkcs8_private_keys};
use sqlx::{Pool, Postgres, pool};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/**
 * Entry point for the honey lab API.
 */
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = ApplicationArguments::parse();

    let config = get_config(&args.config_file)?;

    init_tracing(&config.logging)?;

    let connection_pool: Pool<Postgres> = match config.clone().database.db_type {
        DatabaseType::Postgresql { connection_string, max_connections, min_connections, acquire_timeout, acquire_slow_threshold, idle_timeout, max_lifetime } => pool::PoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_millis(acquire_timeout))
            .acquire_slow_threshold(Duration::from_millis(acquire_slow_threshold))
            .idle_timeout(Duration::from_millis(idle_timeout))
            .max_lifetime(Duration::from_millis(max_lifetime))
            .connect(connection_string.as_str())
            .await
            .map_err(|err| std::io::Error::other(format!("Failed to create database pool: {err}")))?,
    };

    let jwt_service = get_security_service(&config.security)?;

    if let Some(storage) = &config.storage {
        storage.validate().map_err(|err| std::io::Error::other(format!("Invalid storage configuration: {err}")))?;
        log_storage_config(storage);
    }

    let beekeeping_service = BeekeepingService::new(BeekeepingDao::new(), Some(connection_pool.clone()));
    let laboratory_service = LaboratoryService::new(LaboratoryDao::new(), BeekeepingDao::new(), Some(connection_pool.clone()));
    let analysis_service = AnalysisService::new(AnalysisDao::new(), LaboratoryDao::new(), BeekeepingDao::new(), Some(connection_pool.clone()));
    let statistics_service = StatisticsService::new(StatisticsDao::new(), Some(connection_pool.clone()));

    let state = web::Data::new(AppState::new(jwt_service, beekeeping_service, laboratory_service, analysis_service, statistics_service));

    let prometheus = PrometheusMetricsBuilder::new("")
        .endpoint("/metrics")
        .mask_unmatched_patterns("UNKNOWN")
        .build()
        .map_err(|err| std::io::Error::other(format!("Failed to create Prometheus metrics: {err}")))?;

    let max_connections_gauge = IntGauge::new("max_connections", "Connection pool maximum").map_err(|err| std::io::Error::other(format!("Failed to create max_connections gauge: {err}")))?;
    let min_connections_gauge = IntGauge::new("min_connections", "Connection pool minimum").map_err(|err| std::io::Error::other(format!("Failed to create min_connections gauge: {err}")))?;
    let active_connections_gauge = IntGauge::new("active_connections", "Connection pool active").map_err(|err| std::io::Error::other(format!("Failed to create active_connections gauge: {err}")))?;
    let idle_connections_gauge = IntGauge::new("idle_connections", "Connection pool idle").map_err(|err| std::io::Error::other(format!("Failed to create idle_connections gauge: {err}")))?;
    register_prometheus_metrics(&prometheus, &max_connections_gauge)?;
    register_prometheus_metrics(&prometheus, &min_connections_gauge)?;
    register_prometheus_metrics(&prometheus, &active_connections_gauge)?;
    register_prometheus_metrics(&prometheus, &idle_connections_gauge)?;

    gather_db_metrics(max_connections_gauge, min_connections_gauge, active_connections_gauge, idle_connections_gauge, connection_pool);

    let server_init = HttpServer::new(move || App::new().wrap(prometheus.clone()).wrap(from_fn(timing_middleware)).app_data(state.clone()).configure(configure));

    let bind_address = config.server.bind_address.as_str();
    let server_init = if let Some(http_port) = config.server.http_port {
        info!("Listening for HTTP on {bind_address}:{http_port}");
        server_init.bind((bind_address, http_port))?
    } else {
        server_init
    };
    let server_init = if let Some(https_config) = &config.server.https_config {
        let ssl_builder = ssl_builder(https_config).map_err(|err| std::io::Error::other(format!("Failed to create SSL/TLS configuration: {err}")))?;
        info!("Listening for HTTPS on {bind_address}:{}", https_config.port);
        server_init.bind_rustls_0_23((bind_address, https_config.port), ssl_builder).map_err(|err| std::io::Error::other(format!("Failed to bind HTTPS server: {err}")))?
    } else {
        server_init
    };

    server_init.workers(config.server.workers).run().await
}

/**
 * Initializes the tracing subscriber.
 *
 * `RUST_LOG` is read first and the configured directives are added on top. Logs always go to stdout
 * and, when enabled, also to the configured log file.
 *
 * #Arguments
 * `logging`: The logging section of the configuration.
 *
 * #Returns
 * A `Result` indicating success or failure.
 */
fn init_tracing(logging: &LoggingConfig) -> Result<(), std::io::Error> {
    let mut env_filter = EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy();
    for directive in &logging.directives {
        env_filter = env_filter.add_directive(directive.parse().map_err(|err| std::io::Error::other(format!("Invalid logging directive {directive}: {err}")))?);
    }

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(logging.target)
        .with_thread_ids(logging.thread_ids)
        .with_thread_names(logging.thread_names)
        .with_line_number(logging.line_number)
        .with_level(logging.level)
        .with_ansi(logging.ansi);

    let file_layer = if logging.file {
        let logfile = OpenOptions::new().create(true).append(true).open(&logging.logfile).map_err(|err| std::io::Error::other(format!("Failed to open log file {}: {err}", logging.logfile)))?;
        Some(
            tracing_subscriber::fmt::layer()
                .with_target(logging.target)
                .with_thread_ids(logging.thread_ids)
                .with_thread_names(logging.thread_names)
                .with_line_number(logging.line_number)
                .with_level(logging.level)
                .with_ansi(false)
                .with_writer(Mutex::new(logfile)),
        )
    } else {
        None
    };

    tracing_subscriber::registry().with(env_filter).with(stdout_layer).with(file_layer).init();
    Ok(())
}

/**
 * Logs the storage areas in use. Uploads go through an external storage client.
 */
fn log_storage_config(storage: &StorageConfig) {
    info!(
        "Storage bucket {} with static area {} ({:?}, overwrite {}) and media area {} ({:?}, overwrite {})",
        storage.bucket,
        storage.static_area.location,
        storage.static_area.default_acl,
        storage.static_area.file_overwrite,
        storage.media_area.location,
        storage.media_area.default_acl,
        storage.media_area.file_overwrite
    );
}

/**
 * Registers custom Prometheus metrics.
 *
 * #Arguments
 * `prometheus_metrics`: The Prometheus metrics instance to register the gauge with.
 * `gauge`: The gauge to register.
 */
fn register_prometheus_metrics(prometheus_metrics: &PrometheusMetrics, gauge: &IntGauge) -> Result<(), std::io::Error> {
    prometheus_metrics.registry.register(Box::new(gauge.clone())).map_err(|err| std::io::Error::other(format!("Failed to register Prometheus gauge: {err}")))?;
    Ok(())
}

/**
 * Publishes connection pool gauges once per second from a separate thread.
 *
 * #Arguments
 * `max_connections_gauge`: Gauge for maximum connections.
 * `min_connections_gauge`: Gauge for minimum connections.
 * `active_connections_gauge`: Gauge for active connections.
 * `idle_connections_gauge`: Gauge for idle connections.
 * `connection_pool`: The connection pool to gather metrics from.
 */
fn gather_db_metrics(max_connections_gauge: IntGauge, min_connections_gauge: IntGauge, active_connections_gauge: IntGauge, idle_connections_gauge: IntGauge, connection_pool: Pool<Postgres>) {
    thread::spawn(move || {
        loop {
            max_connections_gauge.set(i64::from(connection_pool.options().get_max_connections()));
            min_connections_gauge.set(i64::from(connection_pool.options().get_min_connections()));
            active_connections_gauge.set(i64::from(connection_pool.size()));
            #[allow(clippy::cast_possible_wrap)]
            idle_connections_gauge.set(connection_pool.num_idle() as i64);
            thread::sleep(Duration::from_secs(1));
        }
    });
}

/**
 * Initializes the SSL/TLS configuration for the server.
 *
 * #Arguments
 * `https_config`: The HTTPS configuration containing the certificate and private key files.
 *
 * #Returns
 * A `Result` containing the initialized `ServerConfig` or an `ApplicationError` if initialization fails.
 */
fn ssl_builder(https_config: &HttpsConfig) -> Result<ServerConfig, ApplicationError> {
    let config_builder = ServerConfig::builder_with_protocol_versions(&get_protocol_versions());
    let cert_file = &mut std::io::BufReader::new(
        fs::File::open(&https_config.certificate_file).map_err(|err| ApplicationError::new(ErrorType::Initialization, format!("Failed to read certificate file: {err}")))?,
    );
    let key_file = &mut std::io::BufReader::new(
        fs::File::open(&https_config.private_key_file).map_err(|err| ApplicationError::new(ErrorType::Initialization, format!("Failed to read private key file: {err}")))?,
    );
    let cert_chain = certs(cert_file).collect::<Result<Vec<_>, _>>().map_err(|err| ApplicationError::new(ErrorType::Initialization, format!("Failed to convert certificate to der: {err}")))?;
    let private_key = pkcs8_private_keys(key_file)
        .map(|key| key.map(PrivateKeyDer::Pkcs8))
        .next()
        .ok_or_else(|| ApplicationError::new(ErrorType::Initialization, "No PKCS#8 private key found".to_string()))?
        .map_err(|err| ApplicationError::new(ErrorType::Initialization, format!("Failed to convert private key to der: {err}")))?;
    let config = config_builder
        .with_no_client_auth()
        .with_single_cert(cert_chain, private_key)
        .map_err(|err| ApplicationError::new(ErrorType::Initialization, format!("Failed to create server config: {err}")))?;
    Ok(config)
}

/**
 * Returns the supported TLS protocol versions.
 */
fn get_protocol_versions() -> Vec<&'static SupportedProtocolVersion> {
    vec![&rustls::version::TLS13]
}

/**
 * Reads the configuration from the specified file.
 *
 * #Arguments
 * `config_file`: The path to the configuration file.
 *
 * #Returns
 * A `Result` containing the parsed `Config` or an `std::io::Error` if reading or parsing fails.
*/
fn get_config(config_file: &str) -> Result<Config, std::io::Error> {
    let config_str: String = fs::read_to_string(config_file).map_err(|err| std::io::Error::other(format!("Failed to read config file: {err}")))?;
    let config: Config = toml::from_str(&config_str).map_err(|err| std::io::Error::other(format!("Failed to parse config file: {err}")))?;
    Ok(config)
}

/**
 * Initializes the bearer token verification.
 *
 * #Arguments
 * `app_security`: Path of the key file and the algorithm to verify with.
 *
 * #Returns
 * A `Result` containing the initialized `JwtSecurityService` or an `std::io::Error` if initialization fails.
 */
fn get_security_service(app_security: &AppSecurity) -> Result<JwtSecurityService, std::io::Error> {
    let key = fs::read_to_string(&app_security.jwt_key_file).map_err(|err| std::io::Error::other(format!("Failed to read JWT key file: {err}")))?;
    JwtSecurityService::new(key.trim_end(), &app_security.jwt_algorithm).map_err(|err| std::io::Error::other(format!("Failed to initialize JWT validation: {err}")))
}
