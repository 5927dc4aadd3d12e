mod cli;
mod env;
mod repl;
mod setup;

use std::process::ExitCode;

use scout_common::ScoutError;
use scout_config::schema::LogLevel;
use scout_config::ScoutConfig;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

fn main() -> ExitCode {
    // Load .env before anything reads the environment
    env::load_dotenv();

    let args = cli::parse();

    let cli_level = args
        .log_level
        .as_deref()
        .and_then(|level| match checked_directive(level) {
            Ok(directive) => Some(directive),
            Err(e) => {
                eprintln!("scout: ignoring --log-level {level}: {e}");
                None
            }
        });

    // Logging starts before the config loads so loader events are kept;
    // the configured level is applied once it is known.
    let reload_handle = init_logging(cli_level.as_deref(), LogLevel::default());

    let mut config = match scout_config::load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("scout: {e}");
            return ExitCode::FAILURE;
        }
    };

    let filter = log_filter(cli_level.as_deref(), config.logging.level);
    if let Err(e) = reload_handle.reload(filter) {
        tracing::warn!(error = %e, "failed to apply configured log level");
    }

    if let Some(model) = args.model {
        config.model.name = model;
    }

    if args.print_config {
        println!("{}", scout_config::config_to_json(&config));
        return ExitCode::SUCCESS;
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("scout: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(&config, args.prompt.as_deref())) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "scout exited with an error");
            eprintln!("scout: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &ScoutConfig, prompt: Option<&str>) -> Result<(), ScoutError> {
    let api_key = env::resolve_api_key(|var| std::env::var(var).ok())?;
    let session = setup::build_session(config, api_key)?;

    tracing::info!(
        session = %session.id(),
        model = %config.model.name,
        tools = config.model.tools.len(),
        "session ready"
    );

    match prompt {
        Some(prompt) => repl::one_shot(&session, prompt).await,
        None => repl::run(&session).await,
    }
}

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Install the stderr subscriber and return a handle for changing its filter.
fn init_logging(cli_level: Option<&str>, config_level: LogLevel) -> FilterHandle {
    let (filter, handle) = reload::Layer::new(log_filter(cli_level, config_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
    handle
}

/// `RUST_LOG` wins, then `--log-level`, then the config file.
fn log_filter(cli_level: Option<&str>, config_level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(cli_level.unwrap_or(config_level.directive())))
        .unwrap_or_else(|_| EnvFilter::new(config_level.directive()))
}

/// Turn a `--log-level` value into a filter directive, rejecting ones
/// `EnvFilter` cannot parse.
fn checked_directive(level: &str) -> Result<String, String> {
    let directive = cli_directive(level);
    EnvFilter::try_new(&directive)
        .map(|_| directive)
        .map_err(|e| e.to_string())
}

/// A bare level applies to the scout crates; anything else is a full directive.
/// Bare levels accept the config file spelling (`WARNING`) too.
fn cli_directive(level: &str) -> String {
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }

    let level = match level.to_ascii_lowercase().as_str() {
        "warning" => "warn".to_string(),
        other => other.to_string(),
    };
    ["scout_app", "scout_ai", "scout_config"]
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}
