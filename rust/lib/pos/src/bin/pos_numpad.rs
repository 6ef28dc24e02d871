//! `pos-numpad` — drive an item cart from the terminal.
//!
//! Usage:
//!   pos-numpad [-c <config.toml>] [--invoice <snapshot.json>]
//!
//! Reads one command per line from stdin:
//!   qty | rate | discount_percentage | 0-9 | . | delete | done | remove
//!   numpad on|off, checkout, edit, payment open|closed, quit
//!
//! Host intents are printed as `event {json}`, view changes as
//! `view <path> {json}`. Logs go to stderr.

use std::path::PathBuf;

use clap::Parser;
use openerp_pos::view::json;
use openerp_pos::{EventQueue, InvoiceSnapshot, ItemCart, PosConfig, TokioFlashScheduler};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// Numpad cart console.
#[derive(Parser, Debug)]
#[command(name = "pos-numpad", about = "Drive a POS item cart from stdin")]
struct Cli {
    /// Path to the cart config file.
    #[arg(short = 'c', long = "config", default_value = "pos.toml")]
    config: PathBuf,

    /// Invoice snapshot (JSON) to load before reading input.
    #[arg(long = "invoice")]
    invoice: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = PosConfig::load(&cli.config)?;
    info!(
        "Loaded config from {} (discount limit {}%, flash {}ms)",
        cli.config.display(),
        config.discount_limit,
        config.flash_ms
    );

    let (scheduler, mut expired) = TokioFlashScheduler::new()?;
    let mut cart = ItemCart::new(config, EventQueue::new(), scheduler);
    cart.store_mut().subscribe("#", |path, value| {
        if let Some(json) = json::to_json(path, value) {
            println!("view {} {}", path, json);
        }
    });

    if let Some(path) = &cli.invoice {
        let content = std::fs::read_to_string(path)?;
        let invoice: InvoiceSnapshot = serde_json::from_str(&content)?;
        cart.load_invoice(invoice);
        flush_events(&mut cart)?;
    }

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = input.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "quit" {
                    break;
                }
                run_command(&mut cart, line);
                flush_events(&mut cart)?;
            }
            Some(token) = expired.recv() => {
                cart.flash_elapsed(token);
            }
        }
    }

    info!("Bye");
    Ok(())
}

fn run_command(cart: &mut ItemCart<EventQueue, TokioFlashScheduler>, line: &str) {
    let mut words = line.split_whitespace();
    match (words.next(), words.next()) {
        (Some("numpad"), Some(state)) => cart.show_numpad(state == "on"),
        (Some("payment"), Some(state)) => cart.set_payment_open(state == "open"),
        (Some("checkout"), None) => {
            cart.checkout_clicked();
        }
        (Some("edit"), None) => {
            cart.edit_cart_clicked();
        }
        _ => {
            if let Err(e) = cart.press_button(line) {
                warn!(code = e.error_code(), "{}", e);
            }
        }
    }
}

fn flush_events(cart: &mut ItemCart<EventQueue, TokioFlashScheduler>) -> anyhow::Result<()> {
    for event in cart.host_mut().drain() {
        println!("event {}", serde_json::to_string(&event)?);
    }
    Ok(())
}
