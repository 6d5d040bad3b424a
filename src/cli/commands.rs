// Tokensync — CLI Command Handlers
//
// Each function handles one CLI subcommand. They resolve the configuration,
// discover the token files, and hand the work to the sync engine. Output is
// plain text by default, JSON with `--json`.

use std::io::{self, BufRead, Write};

use serde::Serialize;

use crate::config::SyncConfig;
use crate::engine::{CancelReason, Confirmation, MutationOutcome, NumberIndex, SyncEngine};
use crate::error::TokensyncError;
use crate::store::{discover_stores, JsonFileStore};

use super::{Cli, Commands};

/// Execute the parsed CLI command.
pub fn execute(cli: Cli) -> Result<(), TokensyncError> {
    let config = SyncConfig::resolve(cli.root, cli.file_name);
    let json = cli.json;

    match cli.command {
        Commands::Sync => cmd_sync(&config, json),
        Commands::Status => cmd_status(&config, json),
        Commands::List => cmd_list(&config, json),
        Commands::Rename { selection, name } => cmd_rename(&config, &selection, &name, json),
        Commands::Delete { selection, yes } => cmd_delete(&config, &selection, yes, json),
    }
}

// ─── Sync / Status ───────────────────────────────────────────────────────────

fn cmd_sync(config: &SyncConfig, json: bool) -> Result<(), TokensyncError> {
    let engine = open_engine(config)?;

    if engine.stores().is_empty() {
        if json {
            return print_json(&engine.sync()?);
        }
        println!("No {} found under {}", config.file_name, config.root.display());
        return Ok(());
    }

    let report = engine.sync()?;
    if json {
        return print_json(&report);
    }

    println!("✓ Sync completed\n");
    println!("{}", report);
    Ok(())
}

fn cmd_status(config: &SyncConfig, json: bool) -> Result<(), TokensyncError> {
    let engine = open_engine(config)?;
    let statuses = engine.statuses();

    if json {
        return print_json(&statuses);
    }

    if statuses.is_empty() {
        println!("No {} found under {}", config.file_name, config.root.display());
        return Ok(());
    }

    println!("Token files ({}):\n", statuses.len());
    for status in &statuses {
        let state = if status.was_valid { "ok" } else { "unreadable" };
        println!(
            "  {:10} │ {:5} records │ {:3} duplicates │ {:3} discarded │ {}",
            state, status.records, status.duplicates, status.discarded, status.location,
        );
    }
    Ok(())
}

// ─── List ────────────────────────────────────────────────────────────────────

fn cmd_list(config: &SyncConfig, json: bool) -> Result<(), TokensyncError> {
    let engine = open_engine(config)?;
    let index = engine.index();

    if json {
        return print_json(&index);
    }

    if index.is_empty() {
        println!("No user data found.");
        return Ok(());
    }

    println!("Numbers ({}):\n", index.len());
    for (position, (number, name)) in index.entries().enumerate() {
        println!(
            "  {:>3} │ {:16} │ {}",
            position + 1,
            number,
            if name.is_empty() { "-" } else { name }
        );
    }
    Ok(())
}

// ─── Rename ──────────────────────────────────────────────────────────────────

fn cmd_rename(
    config: &SyncConfig,
    selection: &str,
    name: &str,
    json: bool,
) -> Result<(), TokensyncError> {
    let engine = open_engine(config)?;

    let outcome = if name.trim().is_empty() {
        MutationOutcome::cancelled(CancelReason::EmptyName)
    } else {
        match resolve_target(&engine.index(), selection) {
            Ok(number) => engine.rename(&number, name)?,
            Err(reason) => MutationOutcome::cancelled(reason),
        }
    };

    report_outcome(&outcome, "renamed", json)
}

// ─── Delete ──────────────────────────────────────────────────────────────────

fn cmd_delete(
    config: &SyncConfig,
    selection: &str,
    yes: bool,
    json: bool,
) -> Result<(), TokensyncError> {
    let engine = open_engine(config)?;
    let stdin = io::stdin();
    // The prompt goes to stderr so `--json` output on stdout stays parseable.
    let outcome = delete_selected(&engine, selection, yes, &mut stdin.lock(), &mut io::stderr())?;
    report_outcome(&outcome, "deleted", json)
}

/// Resolve the selection, ask for confirmation unless `yes`, then delete.
fn delete_selected<R: BufRead, W: Write>(
    engine: &SyncEngine<JsonFileStore>,
    selection: &str,
    yes: bool,
    input: &mut R,
    prompt_out: &mut W,
) -> Result<MutationOutcome, TokensyncError> {
    let number = match resolve_target(&engine.index(), selection) {
        Ok(number) => number,
        Err(reason) => return Ok(MutationOutcome::cancelled(reason)),
    };

    let confirmation = if yes {
        Confirmation::Confirmed
    } else {
        confirm(
            input,
            prompt_out,
            &format!("Delete ALL records for number {}? (y/n): ", number),
        )?
    };

    Ok(engine.delete(&number, confirmation)?)
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Discover the token files and build an engine over them.
fn open_engine(config: &SyncConfig) -> Result<SyncEngine<JsonFileStore>, TokensyncError> {
    let stores = discover_stores(config)?;
    tracing::debug!(root = %config.root.display(), stores = stores.len(), "Opened token files");
    Ok(SyncEngine::new(stores))
}

/// Turn operator input into a known number.
fn resolve_target(index: &NumberIndex, selection: &str) -> Result<String, CancelReason> {
    if index.is_empty() {
        return Err(CancelReason::NoData);
    }
    index
        .select(selection)
        .ok_or_else(|| CancelReason::InvalidSelection(selection.trim().to_string()))
}

/// Ask a yes/no question; anything but `y` declines.
fn confirm<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<Confirmation, TokensyncError> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(Confirmation::from_answer(&answer))
}

fn report_outcome(outcome: &MutationOutcome, verb: &str, json: bool) -> Result<(), TokensyncError> {
    if json {
        return print_json(outcome);
    }

    match outcome {
        MutationOutcome::Applied { number, affected } => {
            println!("✓ {} record(s) {} for number {}", affected, verb, number);
        }
        MutationOutcome::Cancelled { reason } => {
            println!("Cancelled: {}", reason);
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), TokensyncError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
