//! Rule-based progression advice for one exercise outcome

use std::collections::BTreeMap;

use crate::exercises::{MuscleGroup, PriorityTier};
use crate::models::{Exercise, PriorityMuscles, TrainingLog};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progression {
    /// Not in any priority tier: watch rep strength over the long term
    NonPriority,
    /// Performance or pain score missing
    InsufficientData,
    /// Add 1-2 sets or a little load/reps next equivalent session
    Progress,
    /// Hold current volume, work on technique and effort
    Maintain,
    /// Recoverable volume ceiling likely reached
    VolumeMaximumReached,
}

impl Progression {
    /// Long form, shown after logging a session
    pub fn advice(&self, group: MuscleGroup) -> String {
        match self {
            Progression::NonPriority => format!(
                "{} is not a priority muscle. Monitor your rep strength over the long term \
                 to make sure maintenance volume is enough.",
                group
            ),
            Progression::InsufficientData => {
                "Enter performance and pain scores to get a recommendation.".to_string()
            }
            Progression::Progress => format!(
                "Great progress on {}! Next equivalent session, add 1-2 sets \
                 or slightly increase load/reps.",
                group
            ),
            Progression::Maintain => format!(
                "Good performance on {}. Next equivalent session, keep the current volume. \
                 Focus on technique and effort.",
                group
            ),
            Progression::VolumeMaximumReached => format!(
                "You have likely reached your VMR for {}. Performance dropped or recovery \
                 is insufficient: you need a fatigue management strategy.",
                group
            ),
        }
    }

    /// One-liner for the dashboard
    pub fn short(&self) -> &'static str {
        match self {
            Progression::NonPriority => "Not a priority, monitor long term.",
            Progression::InsufficientData => "Missing scores.",
            Progression::Progress => "Excellent! Add 1-2 sets.",
            Progression::Maintain => "Keep current volume.",
            Progression::VolumeMaximumReached => "VMR reached! Manage fatigue.",
        }
    }
}

/// Advice for one muscle group, with the tier it was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recommendation {
    pub group: MuscleGroup,
    pub tier: Option<PriorityTier>,
    pub progression: Progression,
}

/// Classify one outcome; the priority check short-circuits, then first match wins
pub fn recommend(
    group: MuscleGroup,
    performance: Option<u8>,
    pain: Option<u8>,
    priorities: &PriorityMuscles,
) -> Recommendation {
    let tier = priorities.tier_of(group);
    let progression = match (tier, performance, pain) {
        (None, _, _) => Progression::NonPriority,
        (_, None, _) | (_, _, None) => Progression::InsufficientData,
        (_, Some(perf), Some(pain)) if perf <= 1 && pain <= 1 => Progression::Progress,
        (_, Some(perf), Some(pain)) if perf <= 2 && pain <= 2 => Progression::Maintain,
        // Scores above 2 on either side
        _ => Progression::VolumeMaximumReached,
    };
    Recommendation { group, tier, progression }
}

pub fn recommend_for_exercise(exercise: &Exercise, priorities: &PriorityMuscles) -> Recommendation {
    recommend(
        exercise.muscle_group,
        exercise.performance_score,
        exercise.pain_score,
        priorities,
    )
}

/// Dashboard summary of a session: prioritized groups with both scores only.
/// Later exercises of the same group replace earlier ones.
pub fn summarize_session(log: &TrainingLog, priorities: &PriorityMuscles) -> BTreeMap<MuscleGroup, Recommendation> {
    let mut summary = BTreeMap::new();
    for exercise in &log.exercises {
        let rec = recommend_for_exercise(exercise, priorities);
        if matches!(rec.progression, Progression::NonPriority | Progression::InsufficientData) {
            continue;
        }
        summary.insert(rec.group, rec);
    }
    summary
}
