use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use qrpos::application::terminal::Terminal;
use qrpos::config::{DEFAULT_GATEWAY_URL, DEFAULT_POLL_INTERVAL_MS, GatewayConfig};
use qrpos::domain::ports::GatewayHandle;
use qrpos::domain::status::PaymentStatus;
use qrpos::infrastructure::http::HttpGateway;
use qrpos::infrastructure::in_memory::InMemoryGateway;
use qrpos::interfaces::display;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Fixed-QR point-of-sale terminal", long_about = None)]
struct Cli {
    /// Base URL of the payment gateway API
    #[arg(long, env = "QRPOS_GATEWAY_URL", default_value = DEFAULT_GATEWAY_URL, global = true)]
    gateway_url: String,

    /// Milliseconds between payment status checks
    #[arg(long, env = "QRPOS_POLL_INTERVAL_MS", default_value_t = DEFAULT_POLL_INTERVAL_MS, global = true)]
    poll_interval_ms: u64,

    /// Run against a simulated gateway that approves every payment
    #[arg(long, global = true)]
    demo: bool,

    /// Log order and polling activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the fixed QR customers scan
    Qr,
    /// Load an amount onto the QR and wait for the payment.
    /// Exits non-zero unless the payment is approved.
    Charge {
        /// Amount to charge, e.g. 150.50
        amount: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // `RUST_LOG` wins when set; otherwise `-v` picks between warn and info.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "info" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = GatewayConfig::new(&cli.gateway_url, cli.poll_interval_ms).into_diagnostic()?;
    let gateway: GatewayHandle = if cli.demo {
        Arc::new(demo_gateway().await)
    } else {
        Arc::new(HttpGateway::new(&config))
    };
    let mut terminal = Terminal::new(gateway, &config).into_diagnostic()?;

    let code = match cli.command {
        Commands::Qr => match terminal.qr_info().await {
            Ok(info) => {
                println!("{}", display::qr_block(&info));
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Could not load QR information: {e}");
                ExitCode::FAILURE
            }
        },
        Commands::Charge { amount } => charge(&mut terminal, &amount).await,
    };

    Ok(code)
}

async fn demo_gateway() -> InMemoryGateway {
    let gateway = InMemoryGateway::new();
    gateway.push_status(PaymentStatus::Pending).await;
    gateway.push_status(PaymentStatus::InProcess).await;
    gateway.push_status(PaymentStatus::Approved).await;
    gateway
}

async fn charge(terminal: &mut Terminal, amount: &str) -> ExitCode {
    match terminal.qr_info().await {
        Ok(info) => println!("{}\n", display::qr_block(&info)),
        Err(e) => warn!(error = %e, "could not load QR information"),
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let order = match terminal
        .submit(amount, move |update| {
            let _ = tx.send(update);
        })
        .await
    {
        Ok(order) => order,
        Err(e) => {
            eprintln!("{}", display::error_message(&e));
            return ExitCode::FAILURE;
        }
    };

    println!("{}", display::order_message(&order));
    if let Some(note) = display::gateway_note(&order) {
        println!("{note}");
    }
    let Some(reference) = &order.reference else {
        println!("The gateway returned no tracking reference; the payment will not be followed.");
        return ExitCode::SUCCESS;
    };
    println!("Order reference: {reference}");

    loop {
        tokio::select! {
            update = rx.recv() => {
                let Some(update) = update else {
                    return ExitCode::FAILURE;
                };
                println!("Payment status: {}", display::status_label(&update.status));
                if let Some(message) = display::update_message(&update) {
                    println!("{message}");
                }
                if update.status.is_terminal() {
                    return if update.status == PaymentStatus::Approved {
                        ExitCode::SUCCESS
                    } else {
                        ExitCode::FAILURE
                    };
                }
            }
            _ = tokio::signal::ctrl_c() => {
                terminal.stop();
                println!("Stopped waiting for the payment.");
                return ExitCode::FAILURE;
            }
        }
    }
}
