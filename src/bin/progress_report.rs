use std::{env, fs};

use anyhow::{anyhow, Context, Result};
use mathlearn::engine::ProgressionEngine;
use mathlearn::settings::load_or_default;
use mathlearn::{FileStore, Grade, ProgressStore};
use tracing_subscriber::EnvFilter;

enum Command {
    Show,
    Export(String),
    Import(String),
    Reset,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let command = parse_command()?;
    let config = load_or_default()?;
    let storage = FileStore::in_workspace()?;
    let mut store = ProgressStore::with_policy(storage, config.progression.grade_unlock);

    match command {
        Command::Show => print_report(&mut store),
        Command::Export(path) => {
            let json = store.export_document()?;
            fs::write(&path, json).with_context(|| format!("Failed to write {path}"))?;
            println!("Progress exported to {path}");
        }
        Command::Import(path) => {
            let json =
                fs::read_to_string(&path).with_context(|| format!("Failed to read {path}"))?;
            store.import_document(&json)?;
            println!("Progress imported from {path}");
            print_report(&mut store);
        }
        Command::Reset => {
            store.reset_progress();
            println!("Progress reset to defaults.");
        }
    }
    Ok(())
}

fn parse_command() -> Result<Command> {
    let mut args = env::args().skip(1);
    let command = match args.next().as_deref() {
        None | Some("show") => Command::Show,
        Some("export") => Command::Export(
            args.next()
                .context("Usage: progress_report export <file.json>")?,
        ),
        Some("import") => Command::Import(
            args.next()
                .context("Usage: progress_report import <file.json>")?,
        ),
        Some("reset") => Command::Reset,
        Some(other) => {
            return Err(anyhow!(
                "Unknown command '{other}'. Expected show, export, import or reset."
            ))
        }
    };
    Ok(command)
}

fn print_report(store: &mut ProgressStore<FileStore>) {
    let engine = ProgressionEngine::new(store);
    let summary = engine.summary();
    println!(
        "Operations completed: {}/{} ({}%)",
        summary.completed_operations, summary.total_operations, summary.completion_percentage
    );
    println!(
        "Stars: {}/{} ({}%)",
        summary.total_stars, summary.max_stars, summary.star_percentage
    );
    println!(
        "Exercises answered: {} ({} correct)",
        summary.total_exercises, summary.total_correct
    );
    for grade in Grade::ALL {
        let lock = if engine.store().is_grade_unlocked(grade) {
            ""
        } else {
            " [locked]"
        };
        println!("\nGrade {grade}{lock}");
        for card in engine.grade_overview(grade) {
            let state = match (card.unlocked, card.completed) {
                (false, _) => "locked",
                (true, true) => "done",
                (true, false) => "open",
            };
            println!(
                "  {:<15} {:<6} {:<3} {}",
                card.name,
                state,
                "*".repeat(usize::from(card.stars)),
                card.precision.text
            );
        }
    }
}
