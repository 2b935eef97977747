use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use tickerdesk::{
    apis::HttpUpstream,
    arguments::{Cli, Command},
    config::{Config, ConfigStore},
    constants::PLUGIN_NAME,
    host::ConfigHost,
    logger::{self, LogTag},
    plugin::TickerPlugin,
};

/// Main entry point for the standalone host
///
/// Loads the config, builds the plugin over a real HTTP upstream and runs
/// the requested command. Exit code 1 on any startup or tool failure.
#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logger::init(&cli.logger_flags());

    let code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            logger::error(LogTag::System, &format!("{:#}", e));
            1
        }
    };

    logger::flush();
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<()> {
    let store = Arc::new(
        ConfigStore::load(&cli.config)
            .with_context(|| format!("Failed to load config from {}", cli.config.display()))?,
    );
    let config = store.snapshot();
    logger::apply_settings(
        &config.logging.min_level,
        &config.logging.debug_tags,
        config.logging.file_path.as_deref(),
    );

    let upstream = HttpUpstream::new(&config.upstream.base_url, config.upstream.timeout_secs)
        .map_err(anyhow::Error::msg)
        .context("Failed to create upstream client")?;
    let plugin = Arc::new(TickerPlugin::new(
        Arc::new(ConfigHost::new(store.clone())),
        Arc::new(upstream),
        Duration::from_secs(config.cache.ttl_secs),
    ));

    match cli.command() {
        Command::Tools => {
            for def in plugin.tool_definitions() {
                let required = def.required_fields().join(", ");
                println!("{:<16} [{}] {}", def.name, def.category, def.description);
                if !required.is_empty() {
                    println!("{:<16} required: {}", "", required);
                }
            }
            Ok(())
        }
        Command::Call { tool, args } => {
            let params = match args {
                Some(raw) => serde_json::from_str::<Value>(&raw)
                    .context("Tool arguments must be valid JSON")?,
                None => Value::Null,
            };

            plugin.activate();
            let result = plugin.invoke_tool(&tool, params).await;
            plugin.deactivate();

            println!("{}", result.text());
            if result.is_error {
                bail!("Tool '{}' returned an error", tool);
            }
            Ok(())
        }
        Command::Serve => serve(plugin, store, &config).await,
    }
}

#[cfg(feature = "web")]
async fn serve(plugin: Arc<TickerPlugin>, store: Arc<ConfigStore>, config: &Config) -> Result<()> {
    use tickerdesk::webserver;

    if !config.webserver.enabled {
        bail!("Webserver is disabled (webserver.enabled = false); nothing to serve");
    }

    plugin.activate();
    logger::info(LogTag::System, &format!("{} starting", PLUGIN_NAME));

    let mut server = {
        let plugin = plugin.clone();
        let web_config = config.webserver.clone();
        tokio::spawn(async move { webserver::start_server(plugin, &web_config).await })
    };
    let reload = tokio::spawn(reload_on_hangup(store));

    // The server only ends on its own after a bind failure or fatal error
    let finished = tokio::select! {
        joined = &mut server => Some(joined),
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            None
        }
    };
    let joined = match finished {
        Some(joined) => joined,
        None => {
            logger::info(LogTag::System, "Shutdown requested");
            webserver::shutdown();
            server.await
        }
    };

    reload.abort();
    plugin.deactivate();
    joined
        .context("Webserver task panicked")?
        .map_err(anyhow::Error::msg)
}

#[cfg(not(feature = "web"))]
async fn serve(_plugin: Arc<TickerPlugin>, _store: Arc<ConfigStore>, _config: &Config) -> Result<()> {
    bail!("{} was built without the `web` feature; use `call` or `tools`", PLUGIN_NAME)
}

/// Re-read the config file on SIGHUP so a new API key applies without restart
#[cfg(all(feature = "web", unix))]
async fn reload_on_hangup(store: Arc<ConfigStore>) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(stream) => stream,
        Err(e) => {
            logger::warning(LogTag::Config, &format!("SIGHUP reload unavailable: {}", e));
            return;
        }
    };
    while hangup.recv().await.is_some() {
        if let Err(e) = store.reload() {
            logger::error(LogTag::Config, &format!("Config reload failed: {}", e));
        }
    }
}

#[cfg(all(feature = "web", not(unix)))]
async fn reload_on_hangup(_store: Arc<ConfigStore>) {}
