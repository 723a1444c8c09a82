//! `rejoinder-cli` – Rejoinder Command Line Interface
//!
//! This binary is the interactive front end for the Rejoinder chat bot.  It:
//!
//! 1. Checks for `~/.rejoinder/config.toml`; runs a **First-Run Wizard** when
//!    the file is absent.
//! 2. Opens the configured statement storage and comparator.
//! 3. Optionally trains on corpus files given as arguments.
//! 4. Drops the user into an **interactive REPL** where plain lines are
//!    answered by the bot and slash-commands (`/train`, `/stats`,
//!    `/responses`, `/help`) inspect and extend it.
//! 5. Intercepts **Ctrl-C** and stops the REPL cleanly.

mod config;
mod corpus;
mod repl;

use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, warn};

use rejoinder_runtime::{AdapterKind, ChatBot, ComparatorKind};

fn main() {
    // ── Structured logging ────────────────────────────────────────────────
    // RUST_LOG controls the filter (default "info"); REJOINDER_LOG_FORMAT=json
    // switches to newline-delimited JSON.  Chat output itself uses println!.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("REJOINDER_LOG_FORMAT").as_deref() == Ok("json") {
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
        println!("{}", "⚠  Ctrl-C received – finishing up …".yellow().bold());
        shutdown_clone.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler; graceful shutdown on Ctrl-C will not be available");
    }

    // ── First-Run Wizard ──────────────────────────────────────────────────
    let cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => run_first_run_wizard(),
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            let mut cfg = config::Config::default();
            config::apply_env_overrides(&mut cfg);
            cfg
        }
    };

    // ── Chat bot ──────────────────────────────────────────────────────────
    let mut bot = match ChatBot::from_config(&cfg.bot) {
        Ok(bot) => bot,
        Err(e) => {
            error!(error = %e, "Failed to start chat bot");
            println!("{}: {}", "Startup error".red(), e);
            std::process::exit(1);
        }
    };
    println!(
        "  Storage: {}  Comparator: {}",
        cfg.bot.adapter.to_string().bold(),
        cfg.bot.comparator.to_string().bold()
    );

    for corpus_path in std::env::args().skip(1) {
        repl::train_file(&mut bot, Path::new(&corpus_path));
    }

    println!();
    println!(
        "  Say something, or type {} for a list of commands.\n",
        "/help".bold().cyan()
    );

    // ── Interactive REPL ──────────────────────────────────────────────────
    repl::run(&mut bot, &cfg.bot, &cfg.user_name, shutdown);
}

// ─────────────────────────────────────────────────────────────────────────────
// First-Run Wizard
// ─────────────────────────────────────────────────────────────────────────────

fn run_first_run_wizard() -> config::Config {
    println!();
    println!("{}", "  ╔══════════════════════════════════════╗".bold().cyan());
    println!("{}", "  ║      Rejoinder First-Run Wizard      ║".bold().cyan());
    println!("{}", "  ╚══════════════════════════════════════╝".bold().cyan());
    println!();
    println!("  No configuration found.  Let's set up Rejoinder.\n");

    let mut cfg = config::Config::default();

    println!("  Where should statements be stored?");
    println!("    1) SQLite database  (default, survives restarts)");
    println!("    2) JSON file");
    println!("    3) Memory only      (forgotten on exit)");
    let choice = prompt_line("  Enter choice [1]: ", "1");
    cfg.bot.adapter = match choice.trim() {
        "2" => AdapterKind::Json,
        "3" => AdapterKind::Memory,
        _ => AdapterKind::Sqlite,
    };

    if cfg.bot.adapter != AdapterKind::Memory {
        let mut default_db = config::default_database_path();
        if cfg.bot.adapter == AdapterKind::Json {
            default_db.set_extension("json");
        }
        let db = prompt_line(
            &format!("  Database path [{}]: ", default_db.display()),
            &default_db.to_string_lossy(),
        );
        cfg.bot.database = db.into();
    }

    println!("  How should input be matched against known statements?");
    println!("    1) Spelling similarity  (levenshtein, default)");
    println!("    2) Word meaning         (synset)");
    println!("    3) Shared word stems    (jaccard)");
    let choice = prompt_line("  Enter choice [1]: ", "1");
    cfg.bot.comparator = match choice.trim() {
        "2" => ComparatorKind::Synset,
        "3" => ComparatorKind::Jaccard,
        _ => ComparatorKind::Levenshtein,
    };

    cfg.user_name = prompt_line(
        &format!("  Your name [{}]: ", cfg.user_name),
        &cfg.user_name,
    );

    match config::save(&cfg) {
        Ok(()) => println!(
            "\n  {} Config saved to {}\n",
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
    println!("{}", r#"    ___      _       _           __         "#.bold().cyan());
    println!("{}", r#"   / _ \___ (_)___  (_)__  ___/ /__ ____   "#.bold().cyan());
    println!("{}", r#"  / , _/ -_) / _ \/ / _ \/ _  / -_) __/   "#.bold().cyan());
    println!("{}", r#" /_/|_|\__/ /\___/_/_//_/\_,_/\__/_/      "#.bold().cyan());
    println!("{}", r#"       |___/                               "#.bold().cyan());
    println!();
    println!(
        "  {} {}",
        "Rejoinder".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  A chat bot that learns replies from conversations");
    println!();
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn prompt_line(msg: &str, default: &str) -> String {
    use std::io::{BufRead, Write};
    print!("{}", msg);
    std::io::stdout().flush().ok();
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(_) => {
            let t = line.trim().to_string();
            if t.is_empty() { default.to_string() } else { t }
        }
        Err(_) => default.to_string(),
    }
}
