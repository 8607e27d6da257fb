//! Xaheen CLI Binary
//!
//! Parses argv, dispatches through the command parser, and maps the result to
//! an exit code. Ctrl-C and SIGTERM end the process cleanly with code 0.

use serde_json::json;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{error, info, warn};
use xaheen::cli::{map_error, AppContext, CommandParser, DispatchOutcome, GlobalFlags};
use xaheen::config::{ConfigLoader, XaheenConfig};
use xaheen::error::CliError;
use xaheen::handler::{DependencyBag, HandlerFactory};
use xaheen::logging::{init_logging, LoggingConfig};

fn main() {
    let argv: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let flags = GlobalFlags::scan(&argv);

    let loaded = load_config(&flags);
    let logging_config = build_logging_config(&flags, loaded.as_ref().ok());
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    let config = match loaded {
        Ok(config) => config,
        Err(e) if flags.config.is_some() => {
            error!(code = e.code().unwrap_or("UNKNOWN"), "Failed to load configuration: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
        Err(e) => {
            warn!("Ignoring configuration: {}", e);
            XaheenConfig::default()
        }
    };

    info!(version = env!("CARGO_PKG_VERSION"), "Xaheen CLI starting");

    let factory = Arc::new(HandlerFactory::new());
    factory.set_global_dependencies(base_dependencies().merged(Some(&config.dependencies)));
    let mut app = AppContext::new(factory).with_aliases(config.aliases);
    let parser = app.command_parser();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start async runtime: {}", e);
            eprintln!("{}", map_error(&CliError::IoError(e)));
            process::exit(1);
        }
    };

    let code = runtime.block_on(run(parser, argv));
    process::exit(code);
}

async fn run(parser: Arc<CommandParser>, argv: Vec<String>) -> i32 {
    tokio::select! {
        result = parser.dispatch(argv) => report(result),
        _ = shutdown_signal() => {
            info!("Interrupted; exiting");
            0
        }
    }
}

fn report(result: Result<DispatchOutcome, CliError>) -> i32 {
    match result {
        Ok(DispatchOutcome::Rendered(text)) => {
            println!("{}", text.trim_end());
            0
        }
        Ok(outcome @ DispatchOutcome::Completed { .. }) => {
            info!("Command completed successfully");
            outcome.exit_code()
        }
        Ok(outcome @ DispatchOutcome::Unresolved { .. }) => outcome.exit_code(),
        Err(e) => {
            match e.code() {
                Some(code) => error!(code, "Command failed: {}", e),
                None => error!("Command failed: {}", e),
            }
            eprintln!("{}", map_error(&e));
            e.exit_code()
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// `--config` loads exactly that file; otherwise the layered sources for the current directory.
fn load_config(flags: &GlobalFlags) -> Result<XaheenConfig, CliError> {
    match &flags.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => {
            let workspace = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            ConfigLoader::load(&workspace)
        }
    }
}

/// Logging settings from the config file, raised to debug by `--verbose`.
fn build_logging_config(flags: &GlobalFlags, config: Option<&XaheenConfig>) -> LoggingConfig {
    config
        .map(|c| c.logging.clone())
        .unwrap_or_default()
        .with_verbose(flags.verbose)
}

fn base_dependencies() -> DependencyBag {
    DependencyBag::new()
        .with("cli_name", json!("xaheen"))
        .with("version", json!(env!("CARGO_PKG_VERSION")))
}
