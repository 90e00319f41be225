use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

use summarist::cli::commands::{self, NotesSource};
use summarist::config::Settings;
use summarist::prompt::SummaryKind;

#[derive(Parser)]
#[command(name = "summarist")]
#[command(about = "Summarist - Clinical Note Summaries\nGenerate record and consultation summaries and keep every result")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
  /// Path to a YAML settings file (defaults to ./summarist.yaml when present)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Create the record spreadsheet if it does not exist
  Init,
  /// Generate one summary and record it
  #[command(group(ArgGroup::new("notes_input").required(true).args(["notes", "notes_file"])))]
  Generate {
    /// Which summary to produce
    #[arg(short, long, value_enum)]
    kind: SummaryKind,
    /// Instruction for the custom kind
    #[arg(short, long)]
    instruction: Option<String>,
    /// Clinical notes as text
    #[arg(short, long)]
    notes: Option<String>,
    /// Read clinical notes from a file
    #[arg(long)]
    notes_file: Option<PathBuf>,
  },
  /// Export the record spreadsheet as CSV
  Export {
    /// Access phrase
    #[arg(short, long, env = "SUMMARIST_EXPORT_PHRASE")]
    phrase: String,
    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
  },
}

async fn handle(command: Command, settings: &Settings) -> Result<()> {
  match command {
    Command::Init => commands::init(settings),
    Command::Generate { kind, instruction, notes, notes_file } => {
      let source = match (&notes, &notes_file) {
        (Some(text), _) => NotesSource::Inline(text),
        (None, Some(path)) => NotesSource::File(path),
        (None, None) => NotesSource::Inline(""),
      };
      commands::generate(settings, kind, instruction.as_deref(), source).await
    }
    Command::Export { phrase, output } => commands::export(settings, &phrase, output.as_deref()),
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  let settings = Settings::load(cli.config.as_deref())?;

  handle(cli.command, &settings).await
}
