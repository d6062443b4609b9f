//! Prompts sent to the text-generation service

use crate::error::ValidationError;
use crate::models::{Exercise, TrainingLog};

const COACH_ROLE: &str = "You are an expert hypertrophy coach following Renaissance Periodization principles.";

fn score_or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

fn average(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}

fn describe_exercise(ex: &Exercise) -> String {
    let n = ex.sets.len();
    let avg_reps = average(ex.sets.iter().map(|s| f64::from(s.reps())), n);
    let avg_load = average(ex.sets.iter().map(|s| s.load()), n);
    // Sets without RIR count as 0
    let avg_rir = average(ex.sets.iter().map(|s| f64::from(s.rir.unwrap_or(0))), n);
    let first = ex.sets.first();

    let notes = if ex.notes.trim().is_empty() { "None." } else { ex.notes.trim() };

    format!(
        "- {} ({}): {} sets.\n  \
         Avg reps/load/RIR: {:.1}/{:.1}kg/{:.1}.\n  \
         Mind-muscle: {}, Pump: {}, Muscle perturbation: {}.\n  \
         Performance score: {}, Pain score: {}.\n  \
         Notes: {}",
        ex.name,
        ex.muscle_group,
        n,
        avg_reps,
        avg_load,
        avg_rir,
        score_or_na(first.and_then(|s| s.mind_muscle)),
        score_or_na(first.and_then(|s| s.pump)),
        score_or_na(first.and_then(|s| s.muscle_perturbation)),
        score_or_na(ex.performance_score),
        score_or_na(ex.pain_score),
        notes,
    )
}

/// Ask for a short, actionable review of one session
pub fn session_analysis_prompt(log: &TrainingLog) -> String {
    let details: Vec<String> = log.exercises.iter().map(describe_exercise).collect();

    format!(
        "{} Analyze the following training session and give a concise, actionable reflection, \
         highlighting the key points and suggesting an approach for the next equivalent session. \
         Use a motivating, professional tone.\n\n\
         Session details:\n\
         Date: {}\n\
         {}\n\n\
         Please focus on progression and fatigue management according to RP principles.",
        COACH_ROLE,
        log.date.format("%Y-%m-%d"),
        details.join("\n")
    )
}

/// Ask for alternatives to a muscle group or exercise
pub fn alternatives_prompt(target: &str) -> Result<String, ValidationError> {
    let target = target.trim();
    if target.is_empty() {
        return Err(ValidationError::missing("muscle or exercise"));
    }

    Ok(format!(
        "{} Based on the principles of specificity, full range of motion and mind-muscle connection, \
         suggest 3-5 alternative exercises for {}. For each suggestion, briefly explain why it is a \
         good alternative and which muscle(s) it mainly works. Make sure the alternatives target \
         hypertrophy and are not the same exercise that was requested.",
        COACH_ROLE, target
    ))
}
