// ABOUTME: Overload CLI - command-line driver for the workout analysis pipeline
// ABOUTME: Record, analyze, track, and browse progression without the web UI
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Overload Progress

//! Command-line driver for the workout analysis pipeline.
//!
//! Usage:
//! ```bash
//! # Record a synthetic capture session from a local video file
//! overload-cli record --input workout.webm --output staged.webm
//!
//! # Upload and analyze a recording (generic analysis)
//! overload-cli analyze --video staged.webm --exercise tiron_pecho
//!
//! # Full pipeline: analyze and persist the progression entry
//! overload-cli track --video staged.webm --user uid123 --weight 20
//!
//! # Select the exercise used when the service omits one
//! overload-cli select --user uid123 --exercise bicep
//!
//! # Browse progression history and overload stats
//! overload-cli history --user uid123 --exercise overhead-press
//! overload-cli stats --user uid123
//! ```

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use overload_progress::config::ClientConfig;
use overload_progress::logging;
use overload_progress::store::Database;
use overload_progress::upload::TestEndpoint;

#[derive(Parser)]
#[command(
    name = "overload-cli",
    about = "Overload Progress client CLI",
    long_about = "Drive the capture/upload/reconcile pipeline against the exercise analysis service."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override (`sqlite:<path>` or `memory`)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Analysis service URL override
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a capture session fed from a local video file
    Record {
        /// Source video file
        #[arg(long)]
        input: PathBuf,

        /// Where to write the finalized blob (defaults to `recording.webm`)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Fragment size in bytes fed to the recorder
        #[arg(long, default_value = "65536")]
        chunk_size: usize,
    },

    /// Upload a video and print the analysis result
    Analyze {
        /// Video file to upload
        #[arg(long)]
        video: PathBuf,

        /// Analysis-service exercise code
        #[arg(long, default_value = "tiron_pecho")]
        exercise: String,

        /// Use a named test endpoint instead of generic analysis
        #[arg(long, value_enum)]
        endpoint: Option<EndpointArg>,
    },

    /// Upload, analyze, and persist a progression entry
    Track {
        /// Video file to upload
        #[arg(long)]
        video: PathBuf,

        /// User id owning the entry
        #[arg(long)]
        user: String,

        /// Weight lifted (required)
        #[arg(long)]
        weight: String,

        /// Analysis-service exercise code (defaults to the user's selected
        /// exercise)
        #[arg(long)]
        exercise: Option<String>,
    },

    /// Run the service's stored bicep-curl sample test
    SampleTest,

    /// Set the user's selected exercise
    Select {
        /// User id
        #[arg(long)]
        user: String,

        /// Analysis-service exercise code or catalog exercise id
        #[arg(long)]
        exercise: String,
    },

    /// Print the exercise catalog, with a user's history attached
    Catalog {
        /// User id whose progression history to attach
        #[arg(long)]
        user: Option<String>,
    },

    /// Print the most recent entry for an exercise, across all users
    Last {
        /// Catalog exercise id (e.g. `overhead-press`)
        #[arg(long)]
        exercise: String,
    },

    /// Print a user's progression history for one exercise
    History {
        /// User id
        #[arg(long)]
        user: String,

        /// Catalog exercise id (e.g. `overhead-press`)
        #[arg(long)]
        exercise: String,
    },

    /// Print overload summaries and heart-rate history
    Stats {
        /// User id
        #[arg(long)]
        user: String,
    },
}

/// Named test endpoint selector.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum EndpointArg {
    /// `POST /test_video`
    TestVideo,
    /// `POST /overhead-press`
    OverheadPress,
    /// `POST /bicep-curl`
    BicepCurl,
}

impl From<EndpointArg> for TestEndpoint {
    fn from(arg: EndpointArg) -> Self {
        match arg {
            EndpointArg::TestVideo => Self::TestVideo,
            EndpointArg::OverheadPress => Self::OverheadPress,
            EndpointArg::BicepCurl => Self::BicepCurl,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_from_env();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url.trim_end_matches('/').to_owned();
    }
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }

    match cli.command {
        Command::Record {
            input,
            output,
            chunk_size,
        } => commands::record(&input, output.as_deref(), chunk_size).await,
        Command::Analyze {
            video,
            exercise,
            endpoint,
        } => commands::analyze(&config, &video, &exercise, endpoint.map(Into::into)).await,
        Command::Track {
            video,
            user,
            weight,
            exercise,
        } => {
            let store = Database::new(&config.database_url).await?;
            commands::track(&config, store, &video, &user, &weight, exercise.as_deref()).await
        }
        Command::SampleTest => commands::sample_test(&config).await,
        Command::Select { user, exercise } => {
            let store = Database::new(&config.database_url).await?;
            commands::select(store, &user, &exercise).await
        }
        Command::Catalog { user } => {
            let store = Database::new(&config.database_url).await?;
            commands::catalog(store, user.as_deref()).await
        }
        Command::Last { exercise } => {
            let store = Database::new(&config.database_url).await?;
            commands::last(store, &exercise).await
        }
        Command::History { user, exercise } => {
            let store = Database::new(&config.database_url).await?;
            commands::history(store, &user, &exercise).await
        }
        Command::Stats { user } => {
            let store = Database::new(&config.database_url).await?;
            commands::stats(store, &user).await
        }
    }
}
