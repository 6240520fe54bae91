//! REPL – Read-Eval-Print Loop for the streamsel interactive shell.
//!
//! Supported slash-commands:
//!   /help               – show this list
//!   /select             – negotiate every enabled module and print the result
//!   /params             – list dynamic parameters and their values
//!   /set <name> <value> – change a parameter (restarts affected modules)
//!   /catalog            – list every profile the device offers
//!   /schema             – print the JSON schema of a catalog file
//!   /save               – persist current parameters to `~/.streamsel/config.toml`
//!   /quit | /exit       – exit the CLI

use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use streamsel_profiles::{Negotiation, describe_profile};
use streamsel_types::Catalog;

use crate::config::{self, Config};
use crate::session::Session;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Select,
    Params,
    Set { name: String, value: String },
    Catalog,
    Schema,
    Save,
    Quit,
    Usage(&'static str),
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Command::Unknown(String::new());
        };
        match head {
            "/help" => Command::Help,
            "/select" => Command::Select,
            "/params" => Command::Params,
            "/catalog" => Command::Catalog,
            "/schema" => Command::Schema,
            "/save" => Command::Save,
            "/quit" | "/exit" => Command::Quit,
            "/set" => match (words.next(), words.next()) {
                (Some(name), Some(value)) => Command::Set {
                    name: name.to_string(),
                    value: value.to_string(),
                },
                _ => Command::Usage("/set <name> <value>"),
            },
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Entry point for the interactive REPL.
///
/// `shutdown` is polled each iteration; when set the REPL exits cleanly.
pub fn run(session: Session, mut cfg: Config, shutdown: Arc<AtomicBool>) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        print!("{} ", "streamsel>".bold().cyan());
        stdout.flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("{}: {}", "Read error".red(), e);
                break;
            }
        }

        if line.trim().is_empty() {
            continue;
        }

        match Command::parse(&line) {
            Command::Help => cmd_help(),
            Command::Select => print_negotiations(&session.negotiate()),
            Command::Params => cmd_params(&session),
            Command::Set { name, value } => cmd_set(&session, &name, &value),
            Command::Catalog => cmd_catalog(&session),
            Command::Schema => cmd_schema(),
            Command::Save => cmd_save(&session, &mut cfg),
            Command::Quit => {
                println!("{}", "Goodbye.".green());
                shutdown.store(true, Ordering::SeqCst);
                break;
            }
            Command::Usage(usage) => {
                println!("{} {}", "Usage:".yellow(), usage.bold());
            }
            Command::Unknown(other) => {
                println!(
                    "{} '{}'. Type {} for available commands.",
                    "Unknown command:".red(),
                    other.yellow(),
                    "/help".bold()
                );
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Command handlers
// ─────────────────────────────────────────────────────────────────────────────

fn cmd_help() {
    println!();
    println!("{}", "streamsel Commands".bold().underline());
    println!("  {}              – negotiate and print selected profiles", "/select".bold().cyan());
    println!("  {}              – list dynamic parameters", "/params".bold().cyan());
    println!("  {}  – change a parameter", "/set <name> <value>".bold().cyan());
    println!("  {}             – list every offered profile", "/catalog".bold().cyan());
    println!("  {}              – JSON schema of catalog files", "/schema".bold().cyan());
    println!("  {}                – save parameters to the config file", "/save".bold().cyan());
    println!("  {}         – exit the CLI", "/quit  /exit".bold().cyan());
    println!();
}

fn cmd_params(session: &Session) {
    println!("{}", "Parameters".bold().underline());
    for param in session.parameters() {
        println!(
            "  {:<28} {} {}",
            param.name.bold(),
            param.value.to_string().yellow(),
            format!("({})", param.value.type_name()).dimmed()
        );
    }
}

fn cmd_set(session: &Session, name: &str, value: &str) {
    match session.set(name, value) {
        Ok(restarted) => {
            println!("{} {} = {}", "✓".green().bold(), name.bold(), value.yellow());
            if restarted.is_empty() {
                println!(
                    "  {}",
                    "No module restarted; run /select to see the effect.".dimmed()
                );
            } else {
                print_negotiations(&restarted);
            }
        }
        Err(e) => println!("{}: {}", "Rejected".red(), e),
    }
}

fn cmd_catalog(session: &Session) {
    let device = session.device();
    println!(
        "{} {}",
        "Device".bold().underline(),
        device.name().bold()
    );
    for module in device.modules() {
        println!("  {}", module.name().bold().cyan());
        match module.enumerate_profiles() {
            Ok(catalog) => {
                let enabled = session.enabled_streams(module.name());
                let streams: Vec<String> = catalog
                    .keys()
                    .into_iter()
                    .map(|key| {
                        let name = key.stream_name();
                        if enabled.contains(&key) {
                            name.green().to_string()
                        } else {
                            name.dimmed().to_string()
                        }
                    })
                    .collect();
                println!("    streams: {}", streams.join(", "));
                for profile in &catalog {
                    let marker = if profile.is_default { "★" } else { " " };
                    println!("    {} {}", marker.green(), describe_profile(profile));
                }
            }
            Err(e) => println!("    {}: {}", "Enumeration failed".red(), e),
        }
    }
}

fn cmd_schema() {
    let schema = schemars::schema_for!(Catalog);
    match serde_json::to_string_pretty(&schema) {
        Ok(json) => println!("{json}"),
        Err(e) => println!("{}: {}", "Error rendering schema".red(), e),
    }
}

fn cmd_save(session: &Session, cfg: &mut Config) {
    cfg.parameters = session
        .parameters()
        .into_iter()
        .map(|p| (p.name, p.value))
        .collect();
    match config::save(cfg) {
        Ok(()) => println!(
            "{} {}",
            "✓ Parameters saved to".green(),
            config::config_path().display().to_string().bold()
        ),
        Err(e) => println!("{}: {}", "Error saving config".red(), e),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Print the outcome of one negotiation pass per module.
pub fn print_negotiations(results: &[(String, Negotiation)]) {
    if results.is_empty() {
        println!("  {}", "No module has an enabled stream.".yellow());
        return;
    }
    for (module, negotiation) in results {
        println!("  {}", module.bold().cyan());
        for notice in &negotiation.notices {
            println!("    {} {}", "⚠".yellow(), notice.to_string().yellow());
        }
        if negotiation.profiles.is_empty() {
            println!("    {}", "(nothing selected)".dimmed());
        }
        for profile in &negotiation.profiles {
            println!("    {} {}", "▶".green(), describe_profile(profile));
        }
    }
}
