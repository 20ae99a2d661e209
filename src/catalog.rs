// ABOUTME: Static exercise catalog grouped by muscle with progression lookups
// ABOUTME: Maps analysis-service exercise codes onto catalog exercise ids
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Overload Progress

//! Static catalog of muscle groups and exercises.
//!
//! The catalog is fixed client-side data; only the per-exercise progression
//! history is fetched from the store. The analysis service reports exercises
//! under its own codes, which [`normalize_exercise_code`] translates to
//! catalog ids before anything is persisted.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::models::{ProgressionEntry, UserContext};
use crate::store::{ProgressionKey, ProgressionStore};

/// Muscle group used when an exercise id has no catalog mapping.
pub const DEFAULT_MUSCLE_GROUP: &str = "arms";

/// One exercise in the static catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    /// Catalog id (e.g. `bench-press`)
    pub id: String,
    /// Display name
    pub name: String,
    /// Short description
    pub description: String,
    /// Primary muscles targeted
    pub primary_muscles: Vec<String>,
    /// Secondary muscles targeted
    pub secondary_muscles: Vec<String>,
    /// Step-by-step instructions
    pub instructions: Vec<String>,
    /// Per-user progression history, filled by [`catalog_with_history`]
    pub progression_history: Vec<ProgressionEntry>,
}

/// Top-level muscle group containing exercises.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuscleGroup {
    /// Group id (e.g. `chest`)
    pub id: String,
    /// Display name
    pub name: String,
    /// Exercises in this group
    pub exercises: Vec<Exercise>,
}

fn exercise(
    id: &str,
    name: &str,
    description: &str,
    primary: &[&str],
    secondary: &[&str],
    instructions: &[&str],
) -> Exercise {
    Exercise {
        id: id.to_owned(),
        name: name.to_owned(),
        description: description.to_owned(),
        primary_muscles: primary.iter().map(|s| (*s).to_owned()).collect(),
        secondary_muscles: secondary.iter().map(|s| (*s).to_owned()).collect(),
        instructions: instructions.iter().map(|s| (*s).to_owned()).collect(),
        progression_history: Vec::new(),
    }
}

fn build_catalog() -> Vec<MuscleGroup> {
    vec![
        MuscleGroup {
            id: "chest".into(),
            name: "Chest".into(),
            exercises: vec![
                exercise(
                    "bench-press",
                    "Bench Press",
                    "A compound exercise that targets the chest muscles, shoulders, and triceps.",
                    &["Chest"],
                    &["Shoulders", "Triceps"],
                    &[
                        "Lie on a flat bench with your feet firmly on the ground",
                        "Grip the barbell slightly wider than shoulder-width apart",
                        "Lower the bar to your mid-chest",
                        "Press the bar back up to the starting position",
                    ],
                ),
                exercise(
                    "incline-press",
                    "Incline Dumbbell Press",
                    "Targets the upper chest muscles.",
                    &["Upper Chest"],
                    &["Shoulders", "Triceps"],
                    &[
                        "Set an adjustable bench to a 30-45 degree incline",
                        "Hold a dumbbell in each hand at shoulder level",
                        "Press the dumbbells upward until your arms are extended",
                        "Lower the dumbbells back to shoulder level",
                    ],
                ),
            ],
        },
        MuscleGroup {
            id: "back".into(),
            name: "Back".into(),
            exercises: vec![
                exercise(
                    "pull-up",
                    "Pull-up",
                    "A bodyweight exercise that targets the upper back and biceps.",
                    &["Latissimus Dorsi"],
                    &["Biceps", "Rhomboids"],
                    &[
                        "Hang from a pull-up bar with hands slightly wider than shoulder-width",
                        "Pull your body up until your chin is over the bar",
                        "Lower yourself back down to the starting position",
                    ],
                ),
                exercise(
                    "deadlift",
                    "Deadlift",
                    "A compound exercise that targets the entire posterior chain.",
                    &["Lower Back", "Hamstrings"],
                    &["Glutes", "Traps", "Forearms"],
                    &[
                        "Stand with feet shoulder-width apart",
                        "Bend at the hips and knees to grip the barbell",
                        "Lift the bar by extending hips and knees",
                        "Return the bar to the floor by hinging at the hips",
                    ],
                ),
            ],
        },
        MuscleGroup {
            id: "legs".into(),
            name: "Legs".into(),
            exercises: vec![exercise(
                "squat",
                "Barbell Squat",
                "A compound exercise that primarily targets the quadriceps, hamstrings, and glutes.",
                &["Quadriceps", "Glutes"],
                &["Hamstrings", "Lower Back"],
                &[
                    "Place the barbell on your upper back",
                    "Stand with feet shoulder-width apart",
                    "Bend knees and hips to lower your body",
                    "Return to standing position",
                ],
            )],
        },
        MuscleGroup {
            id: "shoulders".into(),
            name: "Shoulders".into(),
            exercises: vec![exercise(
                "overhead-press",
                "Overhead Press",
                "A compound exercise that targets the shoulders and triceps.",
                &["Deltoids"],
                &["Triceps", "Upper Chest"],
                &[
                    "Stand with feet shoulder-width apart",
                    "Hold a barbell at shoulder height",
                    "Press the barbell overhead until arms are fully extended",
                    "Lower the barbell back to shoulder height",
                ],
            )],
        },
        MuscleGroup {
            id: "arms".into(),
            name: "Arms".into(),
            exercises: vec![
                exercise(
                    "bicep-curl",
                    "Bicep Curl",
                    "An isolation exercise that targets the biceps.",
                    &["Biceps"],
                    &["Forearms"],
                    &[
                        "Stand with feet shoulder-width apart",
                        "Hold dumbbells with arms extended",
                        "Curl the dumbbells toward your shoulders",
                        "Lower the dumbbells back to the starting position",
                    ],
                ),
                exercise(
                    "tricep-extension",
                    "Tricep Extension",
                    "An isolation exercise that targets the triceps.",
                    &["Triceps"],
                    &[],
                    &[
                        "Stand or sit with a dumbbell held with both hands",
                        "Raise the dumbbell overhead",
                        "Lower the dumbbell behind your head by bending your elbows",
                        "Extend your arms to raise the dumbbell back overhead",
                    ],
                ),
            ],
        },
        MuscleGroup {
            id: "core".into(),
            name: "Core".into(),
            exercises: vec![exercise(
                "plank",
                "Plank",
                "A bodyweight exercise that targets the entire core.",
                &["Abs", "Obliques"],
                &["Lower Back", "Shoulders"],
                &[
                    "Start in a push-up position",
                    "Lower onto your forearms",
                    "Keep your body in a straight line from head to heels",
                    "Hold the position",
                ],
            )],
        },
    ]
}

/// The static catalog, with empty progression histories.
pub fn catalog() -> &'static [MuscleGroup] {
    static CATALOG: OnceLock<Vec<MuscleGroup>> = OnceLock::new();
    CATALOG.get_or_init(build_catalog)
}

/// Translate an analysis-service exercise code to a catalog exercise id.
///
/// Unrecognized codes pass through unchanged so new server-side models keep
/// working without a client update.
#[must_use]
pub fn normalize_exercise_code(code: &str) -> &str {
    match code {
        "tiron_pecho" => "overhead-press",
        "bicep" => "bicep-curl",
        other => other,
    }
}

/// Muscle group owning an exercise id, or [`DEFAULT_MUSCLE_GROUP`] when the
/// exercise is not in the catalog.
#[must_use]
pub fn muscle_group_for(exercise_id: &str) -> &str {
    catalog()
        .iter()
        .find(|group| group.exercises.iter().any(|e| e.id == exercise_id))
        .map_or(DEFAULT_MUSCLE_GROUP, |group| group.id.as_str())
}

/// Look up a catalog exercise by id.
#[must_use]
pub fn find_exercise(exercise_id: &str) -> Option<&'static Exercise> {
    catalog()
        .iter()
        .flat_map(|group| group.exercises.iter())
        .find(|e| e.id == exercise_id)
}

/// Clone the catalog and attach the user's progression history to every
/// exercise.
///
/// # Errors
///
/// Returns an error if a history read fails.
pub async fn catalog_with_history(
    store: &dyn ProgressionStore,
    user: &UserContext,
) -> anyhow::Result<Vec<MuscleGroup>> {
    let mut groups = catalog().to_vec();
    for group in &mut groups {
        for exercise in &mut group.exercises {
            let key = ProgressionKey::new(&group.id, &exercise.id);
            exercise.progression_history = store.history(&key, &user.user_id).await?;
        }
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_catalog_ids() {
        assert_eq!(normalize_exercise_code("tiron_pecho"), "overhead-press");
        assert_eq!(normalize_exercise_code("bicep"), "bicep-curl");
        assert_eq!(normalize_exercise_code("sentadilla"), "sentadilla");
    }

    #[test]
    fn every_exercise_resolves_to_its_group() {
        assert_eq!(muscle_group_for("bench-press"), "chest");
        assert_eq!(muscle_group_for("deadlift"), "back");
        assert_eq!(muscle_group_for("squat"), "legs");
        assert_eq!(muscle_group_for("overhead-press"), "shoulders");
        assert_eq!(muscle_group_for("bicep-curl"), "arms");
        assert_eq!(muscle_group_for("plank"), "core");
    }

    #[test]
    fn unmapped_exercise_falls_back_to_default_group() {
        assert_eq!(muscle_group_for("mystery-lift"), DEFAULT_MUSCLE_GROUP);
    }

    #[test]
    fn catalog_has_six_groups() {
        assert_eq!(catalog().len(), 6);
        assert!(find_exercise("incline-press").is_some());
        assert!(find_exercise("nope").is_none());
    }
}
