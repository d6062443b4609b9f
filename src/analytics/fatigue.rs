//! Session fatigue classification
//!
//! An exercise is a fatigue signal when performance dropped noticeably
//! (score >= 3) or pain is unrecovered (score >= 3).

use crate::exercises::MuscleGroup;
use crate::models::{Exercise, TrainingLog};

const FATIGUE_SCORE: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FatigueSignal {
    /// Nothing logged yet
    NoData,
    /// No excessive fatigue
    None,
    /// One muscle group: lighter recovery session for it
    Localized(MuscleGroup),
    /// Several muscle groups: deload next week
    Generalized(Vec<MuscleGroup>),
}

impl FatigueSignal {
    pub fn message(&self) -> String {
        match self {
            FatigueSignal::NoData => {
                "Log your first session to get fatigue suggestions.".to_string()
            }
            FatigueSignal::None => {
                "On track! No excessive fatigue detected in your last session.".to_string()
            }
            FatigueSignal::Localized(group) => format!(
                "Localized fatigue in {}. Try a recovery session (train at maintenance volume) \
                 for this muscle before your next heavy session.",
                group
            ),
            FatigueSignal::Generalized(groups) => {
                let names: Vec<_> = groups.iter().map(|g| g.name()).collect();
                format!(
                    "Generalized fatigue in {}! Consider a deload next week, reducing volume and load.",
                    names.join(", ")
                )
            }
        }
    }
}

pub fn is_fatigued(exercise: &Exercise) -> bool {
    exercise.performance_score.is_some_and(|s| s >= FATIGUE_SCORE)
        || exercise.pain_score.is_some_and(|s| s >= FATIGUE_SCORE)
}

/// Classify the most recent session
pub fn detect_fatigue(latest: Option<&TrainingLog>) -> FatigueSignal {
    let Some(log) = latest else {
        return FatigueSignal::NoData;
    };

    // Distinct groups, in the order they were logged
    let mut flagged: Vec<MuscleGroup> = Vec::new();
    for exercise in log.exercises.iter().filter(|e| is_fatigued(e)) {
        if !flagged.contains(&exercise.muscle_group) {
            flagged.push(exercise.muscle_group);
        }
    }

    match flagged.as_slice() {
        [] => FatigueSignal::None,
        [group] => FatigueSignal::Localized(*group),
        _ => FatigueSignal::Generalized(flagged),
    }
}
