//! REPL – Read-Eval-Print Loop for the Rejoinder chat shell.
//!
//! Plain lines are sent to the bot and its reply is printed.  An empty line
//! lets the bot open the conversation with a stored statement of its own.
//!
//! Supported slash-commands:
//!   /help              – show this list
//!   /train <file>      – train on a JSON corpus
//!   /stats             – storage and session summary
//!   /responses <text>  – replies recorded for a statement
//!   /quit | /exit      – gracefully exit the CLI

use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rejoinder_runtime::{ChatBot, ChatConfig};
use tracing::{info, warn};

use crate::corpus;

/// One parsed REPL line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Say(&'a str),
    Help,
    Train(&'a str),
    Stats,
    Responses(&'a str),
    Quit,
    /// A known command missing its argument.
    Usage(&'static str),
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if !line.starts_with('/') {
            return Command::Say(line);
        }
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };
        match name {
            "/help" => Command::Help,
            "/stats" => Command::Stats,
            "/quit" | "/exit" => Command::Quit,
            "/train" if arg.is_empty() => Command::Usage("/train <file>"),
            "/train" => Command::Train(arg),
            "/responses" if arg.is_empty() => Command::Usage("/responses <text>"),
            "/responses" => Command::Responses(arg),
            other => Command::Unknown(other),
        }
    }
}

/// Entry point for the interactive REPL.
///
/// `shutdown` is polled each iteration; when set the REPL exits cleanly.
pub fn run(bot: &mut ChatBot, config: &ChatConfig, user_name: &str, shutdown: Arc<AtomicBool>) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        print!("{} ", format!("{user_name}>").bold().cyan());
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

        match Command::parse(&line) {
            Command::Say(text) => cmd_say(bot, text, user_name),
            Command::Help => cmd_help(),
            Command::Train(path) => train_file(bot, Path::new(path)),
            Command::Stats => cmd_stats(bot, config),
            Command::Responses(text) => cmd_responses(bot, text),
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

fn cmd_say(bot: &mut ChatBot, text: &str, user_name: &str) {
    match bot.get_response(text, user_name) {
        Ok(reply) => println!("{} {}", format!("{}:", bot.name()).bold().green(), reply),
        Err(e) => println!("{}: {}", "Error".red(), e),
    }
}

fn cmd_help() {
    println!();
    println!("{}", "Rejoinder Commands".bold().underline());
    println!("  {}     – train on a JSON corpus file", "/train <file>".bold().cyan());
    println!("  {}            – storage and session summary", "/stats".bold().cyan());
    println!("  {} – replies recorded for a statement", "/responses <text>".bold().cyan());
    println!("  {}      – exit the CLI", "/quit  /exit".bold().cyan());
    println!("  Anything else is sent to the bot; an empty line lets it speak first.");
    println!();
}

/// Train `bot` on every conversation in the corpus at `path`, reporting
/// progress on stdout.
pub fn train_file(bot: &mut ChatBot, path: &Path) {
    let conversations = match corpus::load_corpus(path) {
        Ok(c) => c,
        Err(e) => {
            println!("{}: {}", "Corpus error".red(), e);
            return;
        }
    };

    let mut trained = 0usize;
    for conversation in &conversations {
        if let Err(e) = bot.train(conversation) {
            warn!(error = %e, "Training stopped early");
            println!("{}: {}", "Training error".red(), e);
            break;
        }
        trained += 1;
    }
    info!(path = %path.display(), conversations = trained, "Trained corpus");
    println!(
        "{} Trained on {} of {} conversation(s) from {}",
        "✓".green().bold(),
        trained,
        conversations.len(),
        path.display().to_string().bold()
    );
}

fn cmd_stats(bot: &ChatBot, config: &ChatConfig) {
    println!("{}", "Statistics".bold().underline());
    match bot.memory().len() {
        Ok(n) => println!("  Statements   : {}", n.to_string().yellow()),
        Err(e) => println!("  Statements   : {} ({})", "unavailable".red(), e),
    }
    println!("  Adapter      : {}", config.adapter.to_string().yellow());
    if config.adapter != rejoinder_runtime::AdapterKind::Memory {
        println!("  Database     : {}", config.database.display());
    }
    println!("  Comparator   : {}", bot.comparator().name().yellow());
    println!("  Tie-break    : {}", bot.memory().tie_break().to_string().yellow());
    println!("  Session      : {} ({} statement(s))", bot.session().id(), bot.session().len());
    if let Some(last) = bot.last_statement() {
        println!("  Last         : {}", last.dimmed());
    }
}

fn cmd_responses(bot: &ChatBot, text: &str) {
    let replies = match bot.memory().statements_in_response_to(text) {
        Ok(r) => r,
        Err(e) => {
            println!("{}: {}", "Error".red(), e);
            return;
        }
    };
    if replies.is_empty() {
        println!("  No recorded replies to '{}'.", text.yellow());
        return;
    }
    println!("{} '{}'", "Replies to".bold().underline(), text.yellow());
    for reply in replies {
        let seen = reply
            .fields
            .date
            .map(|d| d.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "  {:>4}×  {}  {}",
            reply.fields.occurrence.unwrap_or(1),
            reply.text.bold(),
            seen.dimmed()
        );
    }
}
