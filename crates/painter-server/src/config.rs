use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::http::HeaderValue;

/// Server settings read from `PAINTER_*` environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    /// Origin of the drawing frontend allowed to call the API cross-origin.
    pub cors_origin: HeaderValue,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.into());

        let host = var("PAINTER_HOST", "0.0.0.0");
        let port: u16 = var("PAINTER_PORT", "8080")
            .parse()
            .context("PAINTER_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", host, port))?;

        let db_path: PathBuf = var("PAINTER_DB_PATH", "painter.db").into();

        let origin = var("PAINTER_CORS_ORIGIN", "http://localhost:3000");
        let cors_origin = HeaderValue::from_str(&origin)
            .with_context(|| format!("PAINTER_CORS_ORIGIN is not a valid origin: {}", origin))?;

        Ok(Self { addr, db_path, cors_origin })
    }
}
