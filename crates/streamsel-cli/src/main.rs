//! `streamsel` – stream profile negotiation shell
//!
//! This binary wires a device (a simulated preset or a TOML description) to
//! the negotiation core and a live parameter server.  It:
//!
//! 1. Loads `~/.streamsel/config.toml`, writing a default one on first run.
//! 2. Builds the device and registers every sensor module's parameters,
//!    seeded with the `[parameters]` table from the config.
//! 3. Prints the initial negotiation.
//! 4. Drops the user into an **interactive REPL** (`/select`, `/set`, …).
//! 5. Intercepts **Ctrl-C** to leave the REPL cleanly.

mod config;
mod repl;
mod session;

use colored::Colorize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

use streamsel_hal::catalog_file::load_device;
use streamsel_hal::{Device, SimSensor};

use crate::config::Config;
use crate::session::Session;

fn main() {
    // ── Structured logging ────────────────────────────────────────────────
    // RUST_LOG selects the filter (defaults to "info").  Set
    // STREAMSEL_LOG_FORMAT=json for newline-delimited JSON logs.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("STREAMSEL_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .init();
    }

    print_banner();

    // ── Shared shutdown flag ──────────────────────────────────────────────
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "⚠  Ctrl-C received – leaving streamsel …".yellow().bold());
        shutdown_clone.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler; graceful shutdown on Ctrl-C will not be available");
    }

    // ── Configuration ─────────────────────────────────────────────────────
    let cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => write_default_config(),
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            let mut cfg = Config::default();
            config::apply_env_overrides(&mut cfg);
            cfg
        }
    };

    // ── Device ────────────────────────────────────────────────────────────
    let device = open_device(&cfg);
    println!(
        "  Device {} with {} module(s)",
        device.name().bold(),
        device.len()
    );

    let session = match Session::start(device, cfg.overrides()) {
        Ok(session) => session,
        Err(e) => {
            println!("{}: {}", "Failed to register profile parameters".red(), e);
            return;
        }
    };

    println!();
    println!("{}", "Initial selection".bold().underline());
    repl::print_negotiations(&session.negotiate());

    println!();
    println!(
        "  Type {} for a list of commands.\n",
        "/help".bold().cyan()
    );

    // ── Interactive REPL ──────────────────────────────────────────────────
    repl::run(session, cfg, shutdown);
}

/// Open the configured catalog file, or the simulated preset when none is
/// configured.  Falls back to the `d435i` preset on any error.
fn open_device(cfg: &Config) -> Device {
    let opened = match &cfg.catalog_path {
        Some(path) => load_device(path),
        None => SimSensor::device(&cfg.device),
    };
    match opened {
        Ok(device) => device,
        Err(e) => {
            println!("{}: {}", "Device error".red(), e);
            println!("  Falling back to the simulated {} preset.", "d435i".bold());
            match SimSensor::device("d435i") {
                Ok(device) => device,
                Err(_) => Device::new("empty"),
            }
        }
    }
}

fn write_default_config() -> Config {
    let mut cfg = Config::default();
    match config::save(&cfg) {
        Ok(()) => println!(
            "  {} Default config written to {}",
            "✓".green().bold(),
            config::config_path().display().to_string().bold()
        ),
        Err(e) => println!("{}: {}", "Error saving config".red(), e),
    }
    config::apply_env_overrides(&mut cfg);
    cfg
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("{}", r#"      _                                  _ "#.bold().cyan());
    println!("{}", r#"  ___| |_ _ __ ___  __ _ _ __ ___  ___  ___| |"#.bold().cyan());
    println!("{}", r#" / __| __| '__/ _ \/ _` | '_ ` _ \/ __|/ _ \ |"#.bold().cyan());
    println!("{}", r#" \__ \ |_| | |  __/ (_| | | | | | \__ \  __/ |"#.bold().cyan());
    println!("{}", r#" |___/\__|_|  \___|\__,_|_| |_| |_|___/\___|_|"#.bold().cyan());
    println!();
    println!("  {} {}",
        "streamsel".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Sensor stream profile negotiation");
    println!();
}
