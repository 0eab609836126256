mod console;
mod logging;
mod render;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use gatepass_controller::ValidationController;
use gatepass_gateway::{GatewayConfig, HttpGateway, ValidationGateway, NETWORK_ERROR_MESSAGE};
use gatepass_model::Envelope;
use tokio::runtime::Runtime;

use crate::render::{exit_code, report_error, EXIT_ERROR};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Checkpoint access validation client.
#[derive(Parser)]
#[command(
    name = "gatepass",
    version,
    about = "Checkpoint access validation client"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Path to a TOML config file (overrides GATEPASS_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config file and GATEPASS_API_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a manually typed access code
    Validate {
        /// The access code, sent exactly as typed
        code: String,
    },

    /// Validate the decoded contents of a visitor's QR code
    Scan {
        /// Raw QR payload, forwarded verbatim
        qr_data: String,
    },

    /// Show your recent validations
    History,

    /// Start an interactive checkpoint console
    Console,
}

fn main() {
    let cli = Cli::parse();
    logging::init();

    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(msg) => {
            report_error(&msg, cli.output);
            process::exit(EXIT_ERROR);
        }
    };

    let rt = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            report_error(&format!("failed to start async runtime: {}", e), cli.output);
            process::exit(EXIT_ERROR);
        }
    };

    tracing::debug!(
        base_url = %config.base_url,
        authenticated = config.auth_token.is_some(),
        "gateway configuration resolved"
    );
    let gateway = HttpGateway::new(config);
    let code = match cli.command {
        Commands::Validate { code } => cmd_validate(&rt, gateway, &code, false, cli.output),
        Commands::Scan { qr_data } => cmd_validate(&rt, gateway, &qr_data, true, cli.output),
        Commands::History => cmd_history(&rt, &gateway, cli.output),
        Commands::Console => console::run_console(&rt, gateway, cli.output),
    };
    process::exit(code);
}

fn load_config(cli: &Cli) -> Result<GatewayConfig, String> {
    let mut config = GatewayConfig::resolve(cli.config.as_deref()).map_err(|e| e.to_string())?;
    if let Some(ref url) = cli.base_url {
        config.set_base_url(url).map_err(|e| e.to_string())?;
    }
    Ok(config)
}

fn cmd_validate(
    rt: &Runtime,
    gateway: HttpGateway,
    input: &str,
    qr: bool,
    output: OutputFormat,
) -> i32 {
    let controller = ValidationController::new(gateway);
    rt.block_on(async {
        if qr {
            controller.validate_qr(input).await;
        } else {
            controller.validate(input).await;
        }
    });

    let snap = controller.snapshot();
    match output {
        OutputFormat::Text => println!("{}", render::verdict_text(&snap)),
        OutputFormat::Json => render::print_json(&snap),
    }
    exit_code(snap.state)
}

fn cmd_history(rt: &Runtime, gateway: &HttpGateway, output: OutputFormat) -> i32 {
    match rt.block_on(gateway.fetch_history()) {
        Ok(Envelope::Success(page)) => {
            match output {
                OutputFormat::Text => println!("{}", render::history_text(&page.entries)),
                OutputFormat::Json => render::print_json(&page),
            }
            0
        }
        Ok(Envelope::Failure(err)) => {
            let msg = if err.message.is_empty() {
                "could not load recent validations".to_string()
            } else {
                err.message
            };
            report_error(&msg, output);
            EXIT_ERROR
        }
        Err(_) => {
            report_error(NETWORK_ERROR_MESSAGE, output);
            EXIT_ERROR
        }
    }
}
