use anyhow::{Context, Result};
use clap::Parser;
use textgate::cli::{Cli, Commands};
use textgate::config::{AppConfig, StorageKind};
use textgate::logging::{init_logging, LogConfig};
use textgate::server::{HttpServer, ServerHandle};
use textgate::{build_in_memory, build_service, ServiceOptions};
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_env())?;

    match cli.command {
        Commands::Routes => {
            let service = build_in_memory(ServiceOptions::default())?;
            for path in service.router().paths() {
                println!("{path}");
            }
            Ok(())
        }
        Commands::Serve {
            config,
            addr,
            data_dir,
            memory,
            debug,
        } => {
            let mut config = AppConfig::load(config.as_deref())?;
            if let Some(addr) = addr {
                config.addr = addr;
            }
            if let Some(dir) = data_dir {
                config.data_dir = dir;
            }
            if memory {
                config.storage = StorageKind::Memory;
            }
            config.debug |= debug;

            may::config().set_stack_size(config.stack_size);
            info!(stack_size = config.stack_size, "Coroutine runtime configured");

            let service = build_service(&config)?;
            let handle = HttpServer(service)
                .start(config.addr.as_str())
                .with_context(|| format!("failed to bind {}", config.addr))?;
            wait_for_shutdown(handle)
        }
    }
}

#[cfg(unix)]
fn wait_for_shutdown(handle: ServerHandle) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM]).context("failed to install signal handlers")?;
    if let Some(signal) = signals.forever().next() {
        info!(signal, "Shutdown signal received");
    }
    handle.stop();
    Ok(())
}

#[cfg(not(unix))]
fn wait_for_shutdown(handle: ServerHandle) -> Result<()> {
    handle
        .join()
        .map_err(|e| anyhow::anyhow!("server failed: {e:?}"))
}
