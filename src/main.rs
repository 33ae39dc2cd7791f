use std::io::Write;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notes_core::models::{Importance, Rgb, DATE_FORMAT};
use notes_core::Notebook;

mod commands;

#[derive(Parser)]
#[command(name = "notes")]
#[command(about = "Titled, colored notes with optional self-destruction dates")]
struct Cli {
    /// Notebook file (defaults to notes.json in the documents directory)
    #[arg(short, long, global = true, env = "NOTES_FILE")]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all notes
    List {
        /// Print the notes in their stored JSON form
        #[arg(long)]
        json: bool,
    },
    /// Show a single note
    Show { uid: String },
    /// Compose a new note and store it
    Add {
        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        content: String,

        /// Use this uid instead of a generated one
        #[arg(long)]
        uid: Option<String>,

        /// low, normal or high
        #[arg(short, long, default_value = "normal")]
        importance: Importance,

        /// Color as #RRGGBB
        #[arg(long, default_value = "#FFFFFF")]
        color: Rgb,

        /// Self-destruction date as yyyy-MM-ddTHH:mm:ss (local time)
        #[arg(long, value_parser = parse_date)]
        destroy_at: Option<NaiveDateTime>,
    },
    /// Remove a note
    Remove { uid: String },
}

fn parse_date(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| format!("expected yyyy-MM-ddTHH:mm:ss: {}", e))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "notes=info,notes_core=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut notebook = commands::open(cli.file)?;
    let mut out = std::io::stdout().lock();

    run(cli.command, &mut notebook, &mut out)
}

fn run(
    command: Option<Commands>,
    notebook: &mut Notebook,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Some(Commands::List { json }) => commands::list(notebook, json, out)?,
        Some(Commands::Show { uid }) => commands::show(notebook, &uid, out)?,
        Some(Commands::Add {
            title,
            content,
            uid,
            importance,
            color,
            destroy_at,
        }) => {
            let draft = commands::Draft {
                uid,
                title,
                content,
                importance,
                color,
                self_destruction_date: destroy_at,
            };
            commands::add(notebook, draft, out)?;
        }
        Some(Commands::Remove { uid }) => {
            commands::remove(notebook, &uid, out)?;
        }
        None => commands::list(notebook, false, out)?,
    }

    Ok(())
}
