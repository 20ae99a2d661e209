// ABOUTME: Demo data seeder for progression history and heart-rate samples
// ABOUTME: Generates weekly overload time series for the default chart exercises
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Overload Progress

//! Progression history seeder.
//!
//! Populates the store with a believable progressive-overload history so the
//! statistics views have something to chart.
//!
//! Usage:
//! ```bash
//! # Seed 12 weeks of history for a user
//! cargo run --bin seed-progression -- --user uid123
//!
//! # Deterministic output, custom length, heart-rate samples included
//! cargo run --bin seed-progression -- --user uid123 --weeks 8 --seed 42 --with-bpm
//! ```

use anyhow::Result;
use chrono::{Duration, Local};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use overload_progress::config::ClientConfig;
use overload_progress::logging;
use overload_progress::models::{BpmSample, ProgressionEntry};
use overload_progress::store::{Database, ProgressionKey, ProgressionStore};

/// (muscle group, exercise, starting weight kg, weekly increment kg)
const SEED_EXERCISES: [(&str, &str, f64, f64); 3] = [
    ("chest", "bench-press", 60.0, 1.25),
    ("arms", "bicep-curl", 12.5, 0.5),
    ("shoulders", "overhead-press", 40.0, 1.0),
];

const SEED_NOTES: [&str; 4] = [
    "felt strong",
    "slow negatives",
    "grip gave out on last set",
    "deload next week",
];

#[derive(Parser)]
#[command(
    name = "seed-progression",
    about = "Overload Progress demo data seeder",
    long_about = "Populate the progression store with weekly overload history for the default chart exercises"
)]
struct SeedArgs {
    /// User id to own the generated entries
    #[arg(long)]
    user: String,

    /// Number of weekly sessions per exercise
    #[arg(long, default_value = "12")]
    weeks: u32,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// RNG seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Also generate heart-rate samples
    #[arg(long)]
    with_bpm: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_from_env();
    let args = SeedArgs::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = args.database_url {
        config.database_url = url;
    }

    let store = Database::new(&config.database_url).await?;
    info!(backend = store.backend_info(), "seeding progression data");

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let today = Local::now().date_naive();
    let mut total = 0usize;

    for (muscle_group, exercise, start_weight, increment) in SEED_EXERCISES {
        let key = ProgressionKey::new(muscle_group, exercise);
        for week in 0..args.weeks {
            // Linear overload with a little session-to-session noise.
            let jitter = rng.gen_range(-0.5..=0.5);
            let weight =
                (start_weight + increment * f64::from(week) + jitter).max(0.0);
            let date = today - Duration::weeks(i64::from(args.weeks - week));

            let notes = (rng.gen_range(0..5) == 0)
                .then(|| SEED_NOTES[rng.gen_range(0..SEED_NOTES.len())].to_owned());

            let entry = ProgressionEntry {
                date,
                weight: (weight * 4.0).round() / 4.0,
                reps: Some(rng.gen_range(6..=12)),
                sets: Some(rng.gen_range(3..=5)),
                notes,
                user_id: args.user.clone(),
                exercise: exercise.to_owned(),
            };
            store.append_entry(&key, &entry).await?;
            total += 1;
        }
        info!(muscle_group, exercise, weeks = args.weeks, "seeded exercise history");
    }

    if args.with_bpm {
        for day in 0..i64::from(args.weeks) * 7 {
            if rng.gen_range(0..3) == 0 {
                continue;
            }
            let sample = BpmSample {
                user_id: args.user.clone(),
                bpm: rng.gen_range(95..=165),
                date: today - Duration::days(day),
            };
            store.append_bpm(&sample).await?;
        }
        info!("seeded heart-rate samples");
    }

    info!(total, user = %args.user, "seeding complete");
    Ok(())
}
