use std::{net::SocketAddr, path::Path, sync::Arc};

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;
use service::system::{repo::seaorm::SeaOrmSystemRepository, SystemRepository};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Where the running configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(String),
    /// No config file at this path; environment variables were used.
    Env { missing_file: String },
}

/// Load `config.toml` (or `CONFIG_PATH`); without a file, fall back to environment variables.
/// A file that exists but does not validate is an error.
///
/// Nothing is logged here: the caller may not have a subscriber yet, so it logs the returned source.
pub fn load_config() -> Result<(AppConfig, ConfigSource), StartupError> {
    load_config_from(&configs::config_path())
}

fn load_config_from(path: &str) -> Result<(AppConfig, ConfigSource), StartupError> {
    if Path::new(path).exists() {
        let cfg = AppConfig::load_and_validate_from(path)
            .map_err(|e| StartupError::InvalidConfig(format!("{path}: {e}")))?;
        Ok((cfg, ConfigSource::File(path.to_string())))
    } else {
        let cfg = AppConfig::from_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
        Ok((cfg, ConfigSource::Env { missing_file: path.to_string() }))
    }
}

/// Log the outcome of [`load_config`] once a subscriber is installed.
pub fn log_config_source(source: &ConfigSource) {
    match source {
        ConfigSource::File(path) => info!(%path, "configuration loaded from file"),
        ConfigSource::Env { missing_file } => {
            warn!(path = %missing_file, "config file not found; using environment variables")
        }
    }
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Connect, migrate and assemble the router over the database-backed repository.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    models::db::test_connection(&db)
        .await
        .map_err(|e| StartupError::Runtime(format!("database not reachable: {e}")))?;

    if cfg.database.run_migrations {
        migration::Migrator::up(&db, None)
            .await
            .map_err(|e| StartupError::Runtime(format!("migration failed: {e}")))?;
        info!("database migrations applied");
    }

    let repo: Arc<dyn SystemRepository> = Arc::new(SeaOrmSystemRepository::new(db));
    let state = ServerState::new(repo, &cfg.auth);
    Ok(routes::build_router(state, build_cors()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; running until killed");
        std::future::pending::<()>().await;
    }
    info!(service = "systems", event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Serve until Ctrl+C, letting in-flight requests finish.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;
    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "systems api listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Public entry: load configuration and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    let (cfg, source) = load_config()?;
    log_config_source(&source);
    run_with_config(cfg).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reports_env_source() {
        let path = "/nonexistent/systems-config.toml";
        // 结果取决于进程环境变量：成功时来源必须是 Env，失败时只能是环境变量校验错误
        match load_config_from(path) {
            Ok((_, source)) => assert_eq!(source, ConfigSource::Env { missing_file: path.to_string() }),
            Err(StartupError::InvalidConfig(msg)) => assert!(!msg.contains(path), "{msg}"),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn existing_file_reports_file_source() {
        let path = std::env::temp_dir().join(format!("systems-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[database]\nurl = \"postgres://u:p@localhost:5432/systems\"\n[auth]\njwt_secret = \"k\"\n",
        )
        .unwrap();
        let path_str = path.to_string_lossy().to_string();
        let (cfg, source) = load_config_from(&path_str).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(source, ConfigSource::File(path_str));
        assert_eq!(cfg.auth.jwt_secret, "k");
    }

    #[test]
    fn invalid_file_is_rejected() {
        let path = std::env::temp_dir().join(format!("systems-bad-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[database]\nurl = \"mysql://localhost/x\"\n[auth]\njwt_secret = \"k\"\n").unwrap();
        let res = load_config_from(&path.to_string_lossy());
        std::fs::remove_file(&path).ok();
        assert!(matches!(res, Err(StartupError::InvalidConfig(_))));
    }

    #[test]
    fn bind_addr_rejects_bad_host() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "not a host".into();
        assert!(matches!(bind_addr(&cfg), Err(StartupError::InvalidConfig(_))));
    }

    #[test]
    fn bind_addr_uses_host_and_port() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "0.0.0.0".into();
        cfg.server.port = 9000;
        assert_eq!(bind_addr(&cfg).unwrap(), "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
    }
}
