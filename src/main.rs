//! Electoral API entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use electoral_api::api::{create_router, AppState};
use electoral_api::config::Config;
use electoral_api::election::ElectoralService;
use electoral_api::utils::shutdown_signal;

/// Electoral projection API server.
#[derive(Parser, Debug)]
#[command(name = "electoral-api")]
#[command(about = "Backend de proyección parlamentaria con método D'Hondt")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// List the electoral districts from the Emol zone database.
    Distritos,

    /// Compute the D'Hondt allocation for one district and print it as JSON.
    Dhondt {
        /// District number (1-28). Accepts "10" or "D10".
        distrito: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("electoral_api=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::Distritos) => cmd_distritos().await,
        Some(Command::Dhondt { distrito }) => cmd_dhondt(&distrito).await,
        Some(Command::Serve { port }) => cmd_serve(port).await,
        None => cmd_serve(args.port).await,
    }
}

/// Load and validate configuration, applying an optional port override.
fn load_config(port_override: Option<u16>) -> anyhow::Result<Config> {
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Some(port) = port_override {
        config.port = port;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    Ok(config)
}

/// Run the HTTP server.
async fn cmd_serve(port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let config = load_config(port_override)?;

    info!("Configuration loaded successfully");
    info!("Roster feed: {}", config.emol_csv_url);
    info!("Match threshold: {}", config.match_threshold);

    let service = ElectoralService::load(&config).await;
    let state = AppState {
        service: Arc::new(service),
    };

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    info!("Swagger UI available at http://{}/docs", addr);

    let router = create_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("API ELECTORAL - CONFIGURATION CHECK");
    println!("======================================================================");

    // Load configuration
    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    // Validate configuration
    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    // Show configuration summary
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Bind Address: {}:{}", config.host, config.port);
    println!("  Roster CSV: {}", config.emol_csv_url);
    println!("  Zone DB: {}", config.emol_db_url);
    println!("  Poll API: {}", config.encuestas_url);
    println!("  Pact Registry: {}", config.pactos_path);
    println!("  Match Threshold: {}", config.match_threshold);
    println!("  Default Seats: {}", config.default_seats);
    println!("  HTTP Timeout: {}ms", config.http_timeout_ms);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// List the electoral districts from the Emol zone database.
async fn cmd_distritos() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("API ELECTORAL - DISTRITOS");
    println!("======================================================================");

    let config = load_config(None)?;
    let service = ElectoralService::load(&config).await;

    let districts = service.districts().await;
    for district in &districts {
        println!("  {:>2}  {}", district.numero, district.nombre);
    }

    println!("----------------------------------------------------------------------");
    println!("  {} distritos", districts.len());
    println!("======================================================================");

    Ok(())
}

/// Compute the D'Hondt allocation for one district and print it as JSON.
async fn cmd_dhondt(distrito: &str) -> anyhow::Result<()> {
    let config = load_config(None)?;
    let service = ElectoralService::load(&config).await;

    match service.compute_dhondt(distrito).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            error!("D'Hondt computation failed: {}", e);
            Err(anyhow::anyhow!("computation failed: {}", e))
        }
    }
}
