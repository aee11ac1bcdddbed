//! Probe service entry point.

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use utoipa::OpenApi;

use probe_service::api::docs::{openapi_json, ApiDoc, OPENAPI_PATH, SWAGGER_PATH};
use probe_service::api::{create_router, AppState};
use probe_service::config::Config;
use probe_service::metrics;
use probe_service::server::Server;
use probe_service::utils::{ShutdownSignal, ShutdownToken};

/// Health and readiness probe HTTP service.
#[derive(Parser, Debug)]
#[command(name = "probe-service")]
#[command(about = "Health/readiness probe service with Swagger UI")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Address to listen on (overrides BIND_ADDR).
    #[arg(short, long, global = true)]
    addr: Option<String>,

    /// Seconds to wait for in-flight requests at shutdown.
    #[arg(long, global = true)]
    shutdown_timeout: Option<u64>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    /// Expose Prometheus metrics at /metrics.
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,

    /// Check configuration validity.
    CheckConfig,

    /// Print the OpenAPI document as JSON.
    Openapi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    match args.command {
        Some(Command::Openapi) => cmd_openapi(),
        Some(Command::CheckConfig) => cmd_check_config(&load_config(&args)?),
        Some(Command::Serve) | None => {
            let config = load_config(&args)?;
            init_logging(&config);
            cmd_serve(config).await
        }
    }
}

/// Load configuration from the environment, then apply CLI overrides.
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    if let Some(addr) = &args.addr {
        config.bind_addr = addr.clone();
    }
    if let Some(secs) = args.shutdown_timeout {
        config.shutdown_timeout_secs = secs;
    }
    config.verbose |= args.verbose;
    config.log_json |= args.json_logs;
    config.metrics_enabled |= args.metrics;
    Ok(config)
}

/// Build the explicit subscriber stack from configuration.
fn init_logging(config: &Config) {
    let filter = if config.verbose {
        EnvFilter::new("probe_service=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("PROBE SERVICE - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Bind Address: {}", config.bind_addr);
    println!("  Shutdown Timeout: {}s", config.shutdown_timeout_secs);
    println!("  Log Filter: {}", config.rust_log);
    println!("  Log Format: {}", if config.log_json { "JSON" } else { "Text" });
    println!("  Metrics: {}", if config.metrics_enabled { "Enabled" } else { "Disabled" });
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Print the generated OpenAPI document.
fn cmd_openapi() -> anyhow::Result<()> {
    println!("{}", openapi_json()?);
    Ok(())
}

/// Run the server until SIGINT/SIGTERM, then drain.
async fn cmd_serve(config: Config) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }
    let addr = config.resolve_addr().await?;

    let state = if config.metrics_enabled {
        info!("Metrics enabled at /metrics");
        AppState::with_metrics(metrics::install_recorder()?)
    } else {
        AppState::new()
    };

    // Handlers go in before the listener reports it is up.
    let token = ShutdownToken::new();
    ShutdownSignal::install()?.spawn(token.clone());

    let router = create_router(state);
    info!(
        "Serving Swagger UI at {} for API {} (document at {})",
        SWAGGER_PATH,
        ApiDoc::openapi().info.title,
        OPENAPI_PATH
    );

    let server = Server::bind(addr, router, config.shutdown_timeout()).await?;
    server.run(token).await?;

    Ok(())
}
