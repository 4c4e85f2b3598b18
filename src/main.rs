use clap::{Parser, Subcommand};

use gelv::batch::{self, ExtractArgs, ScoreArgs};

#[derive(Parser)]
#[command(name = "gelv")]
#[command(version = "0.1.0")]
#[command(about = "Scores classical Chinese poems for form, tone pattern and rhyme", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score every poem in a dataset, writing per-record scores and a summary.
    Score(ScoreArgs),
    /// Score a dataset and keep only the top samples per form.
    Extract(ExtractArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Score(args) => batch::run_score(&args),
        Command::Extract(args) => batch::run_extract(&args),
    }
}
