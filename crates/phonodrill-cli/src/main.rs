//! phonodrill CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "phonodrill", version, about = "Pronunciation practice scoring engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a pronunciation attempt
    Score {
        /// The curriculum word or phrase being practiced
        #[arg(long)]
        word: String,

        /// Observed phonemes, space-separated (e.g. "K AE1 T")
        #[arg(long, conflicts_with = "spoken")]
        phonemes: Option<String>,

        /// Recognized text for word-by-word comparison
        #[arg(long)]
        spoken: Option<String>,

        /// User id (UUID); defaults to the local single user
        #[arg(long)]
        user: Option<String>,

        /// Seconds spent on the attempt
        #[arg(long, default_value = "0.0")]
        time: f64,

        /// Write a full JSON report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Curriculum file or directory (overrides config)
        #[arg(long)]
        curriculum: Option<PathBuf>,
    },

    /// Recommend the next word to practice
    Next {
        /// User id (UUID); defaults to the local single user
        #[arg(long)]
        user: Option<String>,

        /// Scope the recommendation to one level (weighted policy)
        #[arg(long)]
        level: Option<String>,

        /// Recommendation policy: two_tier or weighted_priority
        #[arg(long)]
        policy: Option<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Curriculum file or directory (overrides config)
        #[arg(long)]
        curriculum: Option<PathBuf>,
    },

    /// Show completion stats for a level
    Status {
        /// Level name
        #[arg(long)]
        level: String,

        /// User id (UUID); defaults to the local single user
        #[arg(long)]
        user: Option<String>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Curriculum file or directory (overrides config)
        #[arg(long)]
        curriculum: Option<PathBuf>,
    },

    /// Show or reset a user's progress
    Progress {
        /// User id (UUID); defaults to the local single user
        #[arg(long)]
        user: Option<String>,

        /// Reset this word's progress instead of listing
        #[arg(long)]
        reset: Option<String>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Curriculum file or directory (overrides config)
        #[arg(long)]
        curriculum: Option<PathBuf>,
    },

    /// Validate curriculum TOML files
    Validate {
        /// Curriculum file or directory
        #[arg(long)]
        curriculum: PathBuf,
    },

    /// Create starter config and example curriculum
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("phonodrill=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            word,
            phonemes,
            spoken,
            user,
            time,
            report,
            json,
            config,
            curriculum,
        } => {
            commands::score::execute(
                word, phonemes, spoken, user, time, report, json, config, curriculum,
            )
            .await
        }
        Commands::Next {
            user,
            level,
            policy,
            json,
            config,
            curriculum,
        } => commands::next::execute(user, level, policy, json, config, curriculum).await,
        Commands::Status {
            level,
            user,
            json,
            config,
            curriculum,
        } => commands::status::execute(level, user, json, config, curriculum).await,
        Commands::Progress {
            user,
            reset,
            json,
            config,
            curriculum,
        } => commands::progress::execute(user, reset, json, config, curriculum).await,
        Commands::Validate { curriculum } => commands::validate::execute(curriculum),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
