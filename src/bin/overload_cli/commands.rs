// ABOUTME: Command implementations for the Overload CLI
// ABOUTME: Wires files and flags into the capture/upload/reconcile pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Overload Progress

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use bytes::Bytes;
use tracing::info;

use overload_progress::capture::{MediaBlob, Recorder, SyntheticCamera, WEBM_MIME};
use overload_progress::catalog::{catalog_with_history, muscle_group_for, normalize_exercise_code};
use overload_progress::config::ClientConfig;
use overload_progress::models::UserContext;
use overload_progress::pipeline::WorkoutPipeline;
use overload_progress::stats::{bpm_series, overload_summary, progression_series, DEFAULT_CHARTS};
use overload_progress::store::{Database, ProgressionKey, ProgressionStore};
use overload_progress::upload::{
    AnalysisApiClient, AnalysisApiConfig, ExerciseKind, TestEndpoint, UploadCoordinator,
};

fn api_client(config: &ClientConfig) -> Arc<AnalysisApiClient> {
    Arc::new(AnalysisApiClient::new(AnalysisApiConfig::from(config)))
}

async fn read_blob(path: &Path) -> Result<MediaBlob> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(MediaBlob {
        data: Bytes::from(data),
        mime: WEBM_MIME.to_owned(),
    })
}

/// Feed a local file through the recorder in fragments, as the browser's
/// data-available events would, and write out the finalized blob.
pub async fn record(input: &Path, output: Option<&Path>, chunk_size: usize) -> Result<()> {
    anyhow::ensure!(chunk_size > 0, "chunk size must be positive");

    let data = tokio::fs::read(input)
        .await
        .with_context(|| format!("reading {}", input.display()))?;

    let mut recorder = Recorder::new(Arc::new(SyntheticCamera::new()));
    recorder.start()?;
    for chunk in data.chunks(chunk_size) {
        recorder.push_fragment(Bytes::copy_from_slice(chunk));
    }
    let blob = recorder
        .stop()
        .context("recorder produced no blob")?;

    let out = output.unwrap_or_else(|| Path::new("recording.webm"));
    tokio::fs::write(out, &blob.data)
        .await
        .with_context(|| format!("writing {}", out.display()))?;

    info!(
        input = %input.display(),
        output = %out.display(),
        bytes = blob.len(),
        "capture session finalized"
    );
    Ok(())
}

pub async fn analyze(
    config: &ClientConfig,
    video: &Path,
    exercise: &str,
    endpoint: Option<TestEndpoint>,
) -> Result<()> {
    let blob = read_blob(video).await?;
    let kind = match endpoint {
        Some(endpoint) => ExerciseKind::named_test(endpoint, exercise),
        None => ExerciseKind::generic(exercise),
    };

    let coordinator = UploadCoordinator::new(api_client(config));
    let result = coordinator.upload(&blob, &kind).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub async fn track(
    config: &ClientConfig,
    store: Database,
    video: &Path,
    user: &str,
    weight: &str,
    exercise: Option<&str>,
) -> Result<()> {
    let blob = read_blob(video).await?;
    let user_context = UserContext::new(user);

    let hint = match exercise {
        Some(code) => Some(code.to_owned()),
        None => store.selected_exercise(user).await?,
    };
    let code = hint
        .clone()
        .context("no exercise given and none selected; run `overload-cli select` first")?;

    let store: Arc<dyn ProgressionStore> = Arc::new(store);
    let pipeline = WorkoutPipeline::new(api_client(config), store);
    let outcome = pipeline
        .analyze_and_record(
            &blob,
            &ExerciseKind::generic(&code),
            hint.as_deref(),
            weight,
            Some(&user_context),
        )
        .await?;

    println!("{}", serde_json::to_string_pretty(&outcome.analysis)?);
    match outcome.entry {
        Some(entry) => info!(
            exercise = %entry.exercise,
            weight = entry.weight,
            reps = ?entry.reps,
            "progression entry saved"
        ),
        None => info!("analysis failed; nothing persisted"),
    }
    Ok(())
}

pub async fn sample_test(config: &ClientConfig) -> Result<()> {
    let coordinator = UploadCoordinator::new(api_client(config));
    let result = coordinator.stored_sample_test().await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub async fn select(store: Database, user: &str, exercise: &str) -> Result<()> {
    store.set_selected_exercise(user, exercise).await?;
    info!(user, exercise, "selected exercise updated");
    Ok(())
}

pub async fn catalog(store: Database, user: Option<&str>) -> Result<()> {
    let groups = match user {
        Some(user_id) => {
            catalog_with_history(&store, &UserContext::new(user_id)).await?
        }
        None => overload_progress::catalog::catalog().to_vec(),
    };

    for group in &groups {
        println!("{} ({})", group.name, group.id);
        for exercise in &group.exercises {
            print!("  {} ({})", exercise.name, exercise.id);
            match exercise.progression_history.last() {
                Some(latest) => println!(
                    "  last: {:.1} kg on {}  ({} sessions)",
                    latest.weight,
                    latest.date,
                    exercise.progression_history.len()
                ),
                None => println!(),
            }
        }
    }
    Ok(())
}

pub async fn last(store: Database, exercise: &str) -> Result<()> {
    let exercise = normalize_exercise_code(exercise);
    let key = ProgressionKey::new(muscle_group_for(exercise), exercise);
    match store.last_entry(&key).await? {
        Some(entry) => println!(
            "{}  {:.1} kg  user: {}",
            entry.date, entry.weight, entry.user_id
        ),
        None => println!("No progression entries for {exercise}."),
    }
    Ok(())
}

pub async fn history(store: Database, user: &str, exercise: &str) -> Result<()> {
    let exercise = normalize_exercise_code(exercise);
    let key = ProgressionKey::new(muscle_group_for(exercise), exercise);
    let entries = store.history(&key, user).await?;

    if entries.is_empty() {
        println!("No progression entries for {exercise}.");
        return Ok(());
    }
    for entry in &entries {
        println!(
            "{}  {:>6.1} kg  reps: {}  sets: {}{}",
            entry.date,
            entry.weight,
            entry.reps.map_or_else(|| "-".into(), |r| r.to_string()),
            entry.sets.map_or_else(|| "-".into(), |s| s.to_string()),
            entry
                .notes
                .as_deref()
                .map(|n| format!("  ({n})"))
                .unwrap_or_default()
        );
    }
    if let Some(summary) = overload_summary(&entries) {
        println!(
            "\n{} sessions {} → {}: {:+.1} kg{}",
            summary.total_sessions,
            summary.start_date,
            summary.end_date,
            summary.weight_delta,
            summary
                .weight_delta_pct
                .map(|p| format!(" ({p:+.1}%)"))
                .unwrap_or_default()
        );
    }
    Ok(())
}

pub async fn stats(store: Database, user: &str) -> Result<()> {
    for chart in &DEFAULT_CHARTS {
        let entries = progression_series(&store, chart, user).await?;
        println!("{}", chart.label);
        match overload_summary(&entries) {
            Some(summary) => println!(
                "  {} sessions, {:+.1} kg since {}",
                summary.total_sessions, summary.weight_delta, summary.start_date
            ),
            None => println!("  No data available."),
        }
    }

    let bpm = bpm_series(&store, user).await?;
    if !bpm.is_empty() {
        println!("Heart rate ({} samples)", bpm.len());
        for sample in bpm.iter().rev().take(5) {
            println!("  {}  {} bpm", sample.date, sample.bpm);
        }
    }
    Ok(())
}
