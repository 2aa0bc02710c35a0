//! The `glimpse serve` command: start the HTTP relay.

use clap::Args;
use glimpse_core::{Config, Relay};
use tokio::net::TcpListener;

use super::load_config;
use crate::server::{self, AppState};

/// Arguments for the `serve` command.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Interface to bind (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Comma-separated CORS origins (overrides server.allowed_origins)
    #[arg(long, env = "ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Option<Vec<String>>,

    /// Upstream API key (overrides upstream.api_key)
    #[arg(long, env = "HUGGINGFACE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Upstream model identifier (overrides upstream.model)
    #[arg(long)]
    pub model: Option<String>,
}

impl ServeArgs {
    /// Apply CLI overrides on top of the loaded config.
    fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(origins) = &self.allowed_origins {
            config.server.allowed_origins = origins
                .iter()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if let Some(model) = &self.model {
            config.upstream.model = model.clone();
        }
    }
}

/// Execute the serve command.
///
/// The credential is resolved before the listener is bound, so a missing key
/// stops the process before it accepts any traffic.
pub async fn execute(args: ServeArgs, path_override: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(path_override)?;
    args.apply(&mut config);
    config.check()?;

    let credential = config.credential(args.api_key.as_deref())?;
    let relay = Relay::from_config(&config, credential)?;
    let app = server::router(AppState::new(relay), &config.server)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        model = %config.upstream.model,
        "Glimpse listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Glimpse stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply() {
        let mut config = Config::default();
        let args = ServeArgs {
            host: Some("127.0.0.1".to_string()),
            port: Some(9000),
            allowed_origins: Some(vec![
                "https://a.example".to_string(),
                " https://b.example ".to_string(),
                String::new(),
            ]),
            model: Some("other/model".to_string()),
            ..ServeArgs::default()
        };
        args.apply(&mut config);

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.server.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.upstream.model, "other/model");
    }

    #[tokio::test]
    async fn test_missing_credential_refuses_to_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[upstream]\napi_key = \"${DEFINITELY_NOT_SET_GLIMPSE_SERVE_KEY}\"\n\n[server]\nport = 0\n",
        )
        .unwrap();

        let err = execute(ServeArgs::default(), path.to_str())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("API key not set"));
    }
}
