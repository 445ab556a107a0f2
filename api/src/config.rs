use std::time::Duration;

use clap::Parser;
use clap::ValueEnum;
use notifications_core::{JobOptions, PushOptions};
use sqlx::postgres::PgConnectOptions;

#[derive(Clone, Parser, Debug, Default)]
#[command(name = "notifications-api")]
#[command(about = "Notifications API Server", long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub database: DatabaseConfig,

    #[command(flatten)]
    pub jwt: JwtConfig,

    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub internal: InternalConfig,

    #[command(flatten)]
    pub push: PushConfig,

    #[command(flatten)]
    pub jobs: JobsConfig,

    #[arg(
        long = "environment",
        env = "ENVIRONMENT",
        default_value = "development"
    )]
    pub environment: Environment,
}

#[derive(Clone, Parser, Debug, Default)]
pub struct DatabaseConfig {
    #[arg(
        long = "database-host",
        env = "DATABASE_HOST",
        default_value = "localhost"
    )]
    pub host: String,

    #[arg(long = "database-port", env = "DATABASE_PORT", default_value = "5432")]
    pub port: u16,

    #[arg(
        long = "database-user",
        env = "DATABASE_USER",
        default_value = "postgres"
    )]
    pub user: String,

    #[arg(
        long = "database-password",
        env = "DATABASE_PASSWORD",
        value_name = "database_password"
    )]
    pub password: String,

    #[arg(
        long = "database-name",
        env = "DATABASE_NAME",
        default_value = "notifications",
        value_name = "database_name"
    )]
    pub db_name: String,

    #[arg(
        long = "database-max-connections",
        env = "DATABASE_MAX_CONNECTIONS",
        default_value = "5"
    )]
    pub max_connections: u32,
}

impl From<DatabaseConfig> for PgConnectOptions {
    fn from(config: DatabaseConfig) -> Self {
        PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.db_name)
    }
}

#[derive(Clone, Parser, Debug, Default)]
pub struct JwtConfig {
    #[arg(
        long = "jwt-secret-key",
        env = "JWT_SECRET_KEY",
        name = "jwt_secret_key"
    )]
    pub secret_key: String,
}

#[derive(Clone, Parser, Debug, Default)]
pub struct InternalConfig {
    /// Shared key upstream services send to raise notifications. Empty disables ingestion.
    #[arg(
        long = "internal-api-key",
        env = "INTERNAL_API_KEY",
        default_value = ""
    )]
    pub api_key: String,
}

#[derive(Clone, Parser, Debug, Default)]
pub struct ServerConfig {
    #[arg(
        long = "server-api-port",
        env = "API_PORT",
        default_value = "8080",
        name = "api_port"
    )]
    pub api_port: u16,

    #[arg(
        long = "server-health-port",
        env = "HEALTH_PORT",
        default_value = "8081"
    )]
    pub health_port: u16,
}

#[derive(Clone, Parser, Debug, Default)]
pub struct PushConfig {
    #[arg(
        long = "push-enabled",
        env = "PUSH_ENABLED",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub enabled: bool,

    #[arg(
        long = "push-timeout-secs",
        env = "PUSH_TIMEOUT_SECS",
        default_value = "5"
    )]
    pub timeout_secs: u64,
}

impl From<PushConfig> for PushOptions {
    fn from(config: PushConfig) -> Self {
        PushOptions {
            enabled: config.enabled,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

#[derive(Clone, Parser, Debug, Default)]
pub struct JobsConfig {
    /// Read notifications older than this many days are deleted. 0 keeps them forever.
    #[arg(
        long = "notification-retention-days",
        env = "NOTIFICATION_RETENTION_DAYS",
        default_value = "90",
        value_parser = clap::value_parser!(u32).range(0..=36500)
    )]
    pub retention_days: u32,

    #[arg(
        long = "retention-interval-secs",
        env = "RETENTION_INTERVAL_SECS",
        default_value = "3600"
    )]
    pub retention_interval_secs: u64,
}

impl From<JobsConfig> for JobOptions {
    fn from(config: JobsConfig) -> Self {
        JobOptions {
            retention_days: config.retention_days,
            retention_interval: Duration::from_secs(config.retention_interval_secs.max(1)),
        }
    }
}

#[derive(Clone, Debug, ValueEnum, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}
