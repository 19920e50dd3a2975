//! Courier application entry point.
//!
//! Composition root: loads configuration, builds the registry, language
//! model client and handlers, then runs the chosen subcommand.

mod cli;

use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use courier_action::{Agent, Dispatcher, HandlerMap, WebhookConfig};
use courier_api::AppState;
use courier_core::CourierConfig;
use courier_core::OperationRegistry;
use courier_intent::{
    DisabledClient, IntentResolver, LanguageModelClient, OllamaClient, TimeoutClient,
};

use cli::{CliArgs, Command};

/// Build the language model client named by `[llm]`, bounded by its timeout.
fn build_client(config: &CourierConfig) -> Result<Arc<dyn LanguageModelClient>, Box<dyn Error>> {
    let inner: Box<dyn LanguageModelClient> = match config.llm.provider.as_str() {
        "ollama" => Box::new(OllamaClient::new(&config.llm)?),
        _ => Box::new(DisabledClient),
    };
    tracing::info!(client = inner.name(), "Language model client ready");
    Ok(Arc::new(TimeoutClient::new(
        inner,
        Duration::from_secs(config.llm.timeout_secs),
    )))
}

/// Build the handler map named by `[handlers]` and check it covers the registry.
fn build_handlers(
    config: &CourierConfig,
    registry: &OperationRegistry,
) -> Result<HandlerMap, Box<dyn Error>> {
    let handlers = match config.handlers.mode.as_str() {
        "webhook" => {
            let webhook = WebhookConfig::from_config(&config.handlers)?;
            HandlerMap::webhook(registry, &webhook)?
        }
        _ => HandlerMap::preview(registry),
    };
    handlers.verify(registry)?;
    tracing::info!(mode = %config.handlers.mode, handlers = handlers.len(), "Handlers ready");
    Ok(handlers)
}

/// Load the config file, or defaults when there is none.
///
/// A file that exists but does not parse is an error rather than a silent
/// fallback, so a typo never starts the agent with different settings.
fn load_config(path: &Path) -> Result<CourierConfig, Box<dyn Error>> {
    if !path.exists() {
        return Ok(CourierConfig::default());
    }
    Ok(CourierConfig::load(path)?)
}

/// Assemble the agent from a validated configuration.
fn build_agent(config: &CourierConfig) -> Result<Agent, Box<dyn Error>> {
    config.validate()?;
    let registry = Arc::new(OperationRegistry::from_catalogs(config.agent.catalogs.as_slice())?);
    tracing::info!(operations = registry.len(), "Operation registry built");

    let client = build_client(config)?;
    let handlers = build_handlers(config, &registry)?;

    let resolver = IntentResolver::new(registry, client);
    let dispatcher = Dispatcher::new(Arc::new(handlers));
    Ok(Agent::new(resolver, dispatcher).with_max_query_length(config.agent.max_query_length))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = CliArgs::parse();

    let config_file = args.resolve_config_path();
    let config = load_config(&config_file)?;

    // Tracing. RUST_LOG wins over the flag and the config file.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        path = %config_file.display(),
        exists = config_file.exists(),
        "Starting Courier v{}",
        env!("CARGO_PKG_VERSION")
    );

    match args.command {
        Command::Operations => {
            config.validate()?;
            let registry = OperationRegistry::from_catalogs(config.agent.catalogs.as_slice())?;
            for spec in registry.describe() {
                println!("{}: {}", spec.signature(), spec.description);
            }
        }
        Command::Ask { text } => {
            let agent = build_agent(&config)?;
            let envelope = agent.handle(&cli::join_text(&text)).await;
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            if !envelope.is_success() {
                std::process::exit(1);
            }
        }
        Command::Serve { port } => {
            let agent = build_agent(&config)?;
            let mut server = config.server.clone();
            server.port = cli::resolve_port(port, server.port);
            let state = AppState::new(agent, server.clone());
            if let Err(e) = courier_api::start_server(&server, state).await {
                tracing::error!(
                    addr = %format!("{}:{}", server.host, server.port),
                    error = %e,
                    "Server stopped, is another instance running?"
                );
                return Err(e.into());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn test_agent_from_config_file() {
        let (_dir, path) = write_config(
            r#"
[agent]
catalogs = ["photos"]

[llm]
provider = "disabled"
"#,
        );
        let config = CourierConfig::load(&path).unwrap();
        let agent = build_agent(&config).unwrap();
        assert_eq!(agent.registry().len(), 4);

        let env = agent.handle("list photos").await;
        assert_eq!(env.status(), 200);
        assert_eq!(env.response_text(), "Preview: list_photos");

        // Needs the model, which is disabled.
        let env = agent.handle("post a tweet").await;
        assert_eq!(env.status(), 500);
    }

    #[tokio::test]
    async fn test_catalog_subset_hides_other_operations() {
        let (_dir, path) = write_config(
            r#"
[agent]
catalogs = ["github"]

[llm]
provider = "disabled"
"#,
        );
        let config = CourierConfig::load(&path).unwrap();
        let agent = build_agent(&config).unwrap();
        assert!(agent.registry().lookup("list_photos").is_none());

        // Without the photos catalog the matcher has no photo rule to fire.
        let env = agent.handle("list photos").await;
        assert_ne!(env.operation(), Some("list_photos"));
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.port, CourierConfig::default().server.port);
    }

    #[test]
    fn test_load_config_broken_file_is_fatal() {
        let (_dir, path) = write_config("[agent\ncatalogs = 3");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let (_dir, path) = write_config(
            r#"
[handlers]
mode = "webhook"
"#,
        );
        let config = CourierConfig::load(&path).unwrap();
        assert!(build_agent(&config).is_err());
    }

    #[test]
    fn test_max_query_length_applied() {
        let mut config = CourierConfig::default();
        config.llm.provider = "disabled".to_string();
        config.agent.max_query_length = 64;
        let agent = build_agent(&config).unwrap();
        assert_eq!(agent.max_query_length(), 64);
    }

    #[test]
    fn test_webhook_mode_builds() {
        let mut config = CourierConfig::default();
        config.llm.provider = "disabled".to_string();
        config.handlers.mode = "webhook".to_string();
        config.handlers.webhook_url = Some("http://127.0.0.1:9/hook".to_string());
        let agent = build_agent(&config).unwrap();
        assert_eq!(agent.registry().len(), OperationRegistry::standard().unwrap().len());
    }
}
