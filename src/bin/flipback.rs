//! # Flipback CLI - reversible override toggling
//!
//! A thin, stateless front end over the flipback engine.
//!
//! ## Usage
//! ```bash
//! # Flip all recognized override flags to false (creates a backup first)
//! flipback apply ApplicationStorage.json
//!
//! # Lock the file read-only after modifying it
//! flipback apply --read-only ApplicationStorage.json
//!
//! # Put the original content back
//! flipback revert ApplicationStorage.json
//!
//! # Inspect the baseline state
//! flipback status ApplicationStorage.json
//! ```

use clap::{Parser, Subcommand};
use colored::*;
use flipback::{hashing, BackupStore, Flipback, FlipbackError, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Flipback CLI - flip override flags with a safety net
#[derive(Parser)]
#[command(name = "flipback")]
#[command(version)]
#[command(about = "Safely flip boolean override flags in a JSON document, with backup and revert")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flip all recognized override flags in the file to false
    #[command(alias = "a")]
    Apply {
        /// Path to the JSON document
        file: PathBuf,

        /// Set the file read-only after a successful modification
        #[arg(long)]
        read_only: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Restore the file from its backup
    #[command(alias = "rv")]
    Revert {
        /// Path to the JSON document
        file: PathBuf,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the baseline state for the file
    Status {
        /// Path to the JSON document
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    // Disable colors if needed
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e.user_message());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Apply {
            file,
            read_only,
            yes,
        } => cmd_apply(file, read_only, yes),
        Commands::Revert { file, yes } => cmd_revert(file, yes),
        Commands::Status { file } => cmd_status(file),
    }
}

/// Print one audit-trail line from the engine
fn audit_line(line: &str) {
    println!("  {}", line.dimmed());
}

fn require_file(file: &Path) -> Result<()> {
    if !file.exists() {
        return Err(FlipbackError::internal(format!(
            "File not found: {}",
            file.display()
        )));
    }
    Ok(())
}

/// Ask a y/N question on stdin unless `--yes` was given
fn confirm(question: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{} [y/N] ", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}

fn cmd_apply(file: PathBuf, read_only: bool, yes: bool) -> Result<()> {
    require_file(&file)?;
    if !confirm(
        &format!("Are you sure you want to modify {}?", file.display()),
        yes,
    )? {
        println!("Operation cancelled by user.");
        return Ok(());
    }

    let mut engine = Flipback::new(&file).read_only_after_modify(read_only);
    let mut sink = audit_line;
    let outcome = engine.modify(&mut sink)?;

    if outcome.changed {
        println!(
            "{} Flipped flags under {} identifier{}",
            "✓".green().bold(),
            outcome.report.len(),
            if outcome.report.len() == 1 { "" } else { "s" }
        );
    } else {
        println!("No changes were needed.");
    }
    if engine.session_changed(&mut sink) {
        println!(
            "{}",
            "Reboot recommended for changes to take effect.".yellow()
        );
    }
    Ok(())
}

fn cmd_revert(file: PathBuf, yes: bool) -> Result<()> {
    require_file(&file)?;
    if !confirm(
        &format!(
            "Are you sure you want to revert changes to {}?",
            file.display()
        ),
        yes,
    )? {
        println!("Revert cancelled by user.");
        return Ok(());
    }

    let mut engine = Flipback::new(&file);
    let mut sink = audit_line;
    engine.revert(&mut sink)?;

    println!("{} Revert successful", "✓".green().bold());
    if engine.session_changed(&mut sink) {
        println!(
            "{}",
            "Reboot recommended for changes to take effect.".yellow()
        );
    }
    Ok(())
}

fn cmd_status(file: PathBuf) -> Result<()> {
    require_file(&file)?;
    let store = BackupStore::new(&file);
    let mut sink = audit_line;

    println!("File:    {}", file.display().to_string().cyan());
    println!("Backup:  {}", store.backup_path().display().to_string().cyan());

    if !store.backup_exists() || !store.metadata_exists() {
        println!("State:   {}", "no backup (next apply creates one)".yellow());
        return Ok(());
    }
    let Some(metadata) = store.load_metadata() else {
        println!(
            "State:   {}",
            "metadata invalid (next apply re-baselines)".yellow()
        );
        return Ok(());
    };

    let current = hashing::file_digest(store.main_path(), &mut sink);
    if current != metadata.modified_hash {
        println!(
            "State:   {}",
            "externally modified since last update (revert unavailable)".red()
        );
    } else if metadata.is_pristine() {
        println!("State:   {}", "pristine (file matches its backup)".green());
    } else {
        println!("State:   {}", "modified by flipback (revert available)".green());
    }
    Ok(())
}
