use clap::Parser;
use once_cell::sync::{Lazy, OnceCell};

static INSTALLED: OnceCell<Config> = OnceCell::new();

/// Installed configuration if any, otherwise flags and environment.
pub static APP_CONFIG: Lazy<Config> =
    Lazy::new(|| INSTALLED.get().cloned().unwrap_or_else(Config::parse));

/// Fixes the configuration before `APP_CONFIG` is first read. Returns false
/// when a configuration was already installed.
pub fn install(config: Config) -> bool {
    INSTALLED.set(config).is_ok()
}

#[derive(Debug, Parser, Clone)]
pub struct Config {
    #[clap(long, env, default_value_t = 8080)]
    pub port: u16,

    #[clap(long, env, default_value_t = true)]
    pub swagger_enabled: bool,

    #[clap(long, env, default_value = "info")]
    pub log_level: String,

    #[clap(long, env)]
    pub database_url: String,

    #[clap(long, env, default_value_t = 5)]
    pub db_connect_timeout_secs: u64,

    #[clap(long, env, default_value_t = 5)]
    pub db_acquire_timeout_secs: u64,

    #[clap(long, env, default_value_t = 10)]
    pub db_max_connections: u32,

    #[clap(long, env)]
    pub jwt_secret: String,

    #[clap(long, env, default_value_t = 86400)]
    pub jwt_expires_in_secs: i64,

    #[clap(long, env, default_value = "./media")]
    pub media_root: String,

    /// 25 MiB
    #[clap(long, env, default_value_t = 26_214_400)]
    pub max_upload_bytes: usize,

    #[clap(long, env)]
    pub admin_email: String,

    #[clap(long, env, default_value = "admin")]
    pub admin_username: String,

    #[clap(long, env)]
    pub admin_password: String,

    #[clap(long, env, default_value = "*")]
    pub cors_allowed_origins: String,

    #[clap(long, env, default_value = "local")]
    pub app_env: String,

    #[clap(long, env, default_value_t = true, action = clap::ArgAction::Set)]
    pub run_migrations: bool,
}
