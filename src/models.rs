//! Training records - logged sets, exercises, sessions and the user profile
//!
//! Documents coming from the store or from a session form are read into the
//! lenient `Raw*` shapes first (every field optional, numbers may arrive as
//! strings) and only become records after validation.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::analytics::one_rep_max::estimate_one_rep_max;
use crate::error::ValidationError;
use crate::exercises::{MuscleGroup, PriorityTier};

/// Brzycki stops making sense past 36 reps
pub const REPS_RANGE: (i64, i64) = (0, 36);
pub const RIR_RANGE: (i64, i64) = (0, 5);
pub const SUBJECTIVE_RANGE: (i64, i64) = (0, 3);
pub const PERFORMANCE_RANGE: (i64, i64) = (0, 4);
pub const PAIN_RANGE: (i64, i64) = (0, 3);

/// One logged set
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSet {
    reps: u32,
    load: f64,
    pub rir: Option<i32>,
    pub mind_muscle: Option<u8>,
    pub pump: Option<u8>,
    pub muscle_perturbation: Option<u8>,
    #[serde(rename = "estimated1RM")]
    estimated_1rm: f64,
}

impl TrainingSet {
    pub fn new(reps: u32, load: f64) -> Self {
        Self {
            reps,
            load,
            rir: None,
            mind_muscle: None,
            pump: None,
            muscle_perturbation: None,
            estimated_1rm: estimate_one_rep_max(load, reps),
        }
    }

    pub fn with_rir(mut self, rir: i32) -> Self {
        self.rir = Some(rir);
        self
    }

    pub fn reps(&self) -> u32 {
        self.reps
    }

    pub fn load(&self) -> f64 {
        self.load
    }

    pub fn estimated_1rm(&self) -> f64 {
        self.estimated_1rm
    }

    /// Counts toward weekly volume only with a recorded RIR in 0..=5
    pub fn is_effective(&self) -> bool {
        self.rir
            .is_some_and(|rir| (RIR_RANGE.0..=RIR_RANGE.1).contains(&i64::from(rir)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    pub muscle_group: MuscleGroup,
    pub sets: Vec<TrainingSet>,
    pub performance_score: Option<u8>,
    pub pain_score: Option<u8>,
    pub notes: String,
}

impl Exercise {
    pub fn new(name: impl Into<String>, muscle_group: MuscleGroup, sets: Vec<TrainingSet>) -> Self {
        Self {
            name: name.into(),
            muscle_group,
            sets,
            performance_score: None,
            pain_score: None,
            notes: String::new(),
        }
    }

    pub fn with_scores(mut self, performance: u8, pain: u8) -> Self {
        self.performance_score = Some(performance);
        self.pain_score = Some(pain);
        self
    }

    pub fn effective_sets(&self) -> usize {
        self.sets.iter().filter(|s| s.is_effective()).count()
    }

    /// Best estimated 1RM across the sets
    pub fn best_estimated_1rm(&self) -> Option<f64> {
        self.sets.iter().map(|s| s.estimated_1rm()).reduce(f64::max)
    }
}

/// A logged training session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingLog {
    /// Assigned by the store, `None` until persisted
    #[serde(skip)]
    pub id: Option<String>,
    pub date: NaiveDate,
    pub exercises: Vec<Exercise>,
}

impl TrainingLog {
    pub fn new(date: NaiveDate, exercises: Vec<Exercise>) -> Self {
        Self { id: None, date, exercises }
    }
}

/// Muscle names per priority tier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorityMuscles(BTreeMap<PriorityTier, Vec<String>>);

impl PriorityMuscles {
    /// Replace a tier's muscles; blank names are dropped
    pub fn set_tier(&mut self, tier: PriorityTier, muscles: Vec<String>) {
        let muscles = muscles
            .into_iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        self.0.insert(tier, muscles);
    }

    pub fn tier(&self, tier: PriorityTier) -> &[String] {
        self.0.get(&tier).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Highest tier listing the group (tiers iterate max first)
    pub fn tier_of(&self, group: MuscleGroup) -> Option<PriorityTier> {
        self.0
            .iter()
            .find(|(_, names)| names.iter().any(|n| MuscleGroup::parse(n) == Some(group)))
            .map(|(tier, _)| *tier)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    fn merge(&mut self, other: PriorityMuscles) {
        self.0.extend(other.0);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    #[serde(skip)]
    pub user_id: String,
    pub objectives: String,
    pub priority_muscles: PriorityMuscles,
    #[serde(rename = "initialVME", deserialize_with = "lenient_counts")]
    pub initial_vme: BTreeMap<String, u32>,
    pub time_constraints: String,
}

impl UserProfile {
    /// Initial VME set count configured for a muscle group
    pub fn baseline_for(&self, group: MuscleGroup) -> Option<u32> {
        self.initial_vme
            .iter()
            .find(|(name, _)| MuscleGroup::parse(name) == Some(group))
            .map(|(_, sets)| *sets)
    }

    /// Merge a settings save into the profile; absent fields stay untouched
    pub fn apply(&mut self, patch: ProfilePatch) {
        if let Some(objectives) = patch.objectives {
            self.objectives = objectives;
        }
        if let Some(priorities) = patch.priority_muscles {
            self.priority_muscles.merge(priorities);
        }
        if let Some(vme) = patch.initial_vme {
            self.initial_vme.extend(vme);
        }
        if let Some(constraints) = patch.time_constraints {
            self.time_constraints = constraints;
        }
    }
}

/// Partial profile update
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub objectives: Option<String>,
    pub priority_muscles: Option<PriorityMuscles>,
    pub initial_vme: Option<BTreeMap<String, u32>>,
    pub time_constraints: Option<String>,
}

// ---------------------------------------------------------------------------
// Raw documents
// ---------------------------------------------------------------------------

/// How strict validation is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// Required fields only; used on documents read back from the store
    Structural,
    /// Required fields plus value ranges; used before a write
    Submission,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSet {
    #[serde(default, deserialize_with = "lenient_int")]
    pub reps: Option<i64>,
    #[serde(default, deserialize_with = "lenient_float")]
    pub load: Option<f64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub rir: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub mind_muscle: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub pump: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub muscle_perturbation: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExercise {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub muscle_group: Option<String>,
    #[serde(default)]
    pub sets: Vec<RawSet>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub performance_score: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub pain_score: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTrainingLog {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub exercises: Vec<RawExercise>,
}

impl RawSet {
    fn validate(&self, field: &str, level: Validation) -> Result<TrainingSet, ValidationError> {
        let reps = self
            .reps
            .ok_or_else(|| ValidationError::missing(format!("{} reps", field)))?;
        let reps = u32::try_from(reps).map_err(|_| {
            ValidationError::out_of_range(format!("{} reps", field), reps as f64, 0.0, f64::from(u32::MAX))
        })?;

        let load = self
            .load
            .ok_or_else(|| ValidationError::missing(format!("{} load", field)))?;
        if !load.is_finite() || load < 0.0 {
            return Err(ValidationError::out_of_range(
                format!("{} load", field),
                load,
                0.0,
                f64::MAX,
            ));
        }

        if level == Validation::Submission {
            check_range(&format!("{} reps", field), self.reps, REPS_RANGE)?;
            check_range(&format!("{} rir", field), self.rir, RIR_RANGE)?;
            check_range(&format!("{} mindMuscle", field), self.mind_muscle, SUBJECTIVE_RANGE)?;
            check_range(&format!("{} pump", field), self.pump, SUBJECTIVE_RANGE)?;
            check_range(
                &format!("{} musclePerturbation", field),
                self.muscle_perturbation,
                SUBJECTIVE_RANGE,
            )?;
        }

        let mut set = TrainingSet::new(reps, load);
        set.rir = self.rir.and_then(|v| i32::try_from(v).ok());
        set.mind_muscle = self.mind_muscle.and_then(|v| u8::try_from(v).ok());
        set.pump = self.pump.and_then(|v| u8::try_from(v).ok());
        set.muscle_perturbation = self.muscle_perturbation.and_then(|v| u8::try_from(v).ok());
        Ok(set)
    }
}

impl RawExercise {
    pub fn validate(&self, level: Validation) -> Result<Exercise, ValidationError> {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ValidationError::missing("exercise name"))?;

        let muscle_group: MuscleGroup = self
            .muscle_group
            .as_deref()
            .filter(|g| !g.trim().is_empty())
            .ok_or_else(|| ValidationError::missing(format!("{} muscle group", name)))?
            .parse()?;

        if self.sets.is_empty() {
            return Err(ValidationError::NoSets(name.to_string()));
        }

        let sets = self
            .sets
            .iter()
            .enumerate()
            .map(|(i, s)| s.validate(&format!("{} set {}", name, i + 1), level))
            .collect::<Result<Vec<_>, _>>()?;

        if level == Validation::Submission {
            check_range(&format!("{} performanceScore", name), self.performance_score, PERFORMANCE_RANGE)?;
            check_range(&format!("{} painScore", name), self.pain_score, PAIN_RANGE)?;
        }

        Ok(Exercise {
            name: name.to_string(),
            muscle_group,
            sets,
            performance_score: self.performance_score.and_then(|v| u8::try_from(v).ok()),
            pain_score: self.pain_score.and_then(|v| u8::try_from(v).ok()),
            notes: self.notes.clone().unwrap_or_default(),
        })
    }
}

impl RawTrainingLog {
    pub fn validate(&self, level: Validation) -> Result<TrainingLog, ValidationError> {
        let date = self
            .date
            .as_deref()
            .ok_or_else(|| ValidationError::missing("date"))
            .and_then(parse_date)?;

        if self.exercises.is_empty() {
            return Err(ValidationError::NoExercises);
        }

        let exercises = self
            .exercises
            .iter()
            .map(|e| e.validate(level))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TrainingLog::new(date, exercises))
    }
}

/// Compact set notation used on the command line: `LOADxREPS` or `LOADxREPS@RIR`
impl FromStr for RawSet {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidSetSpec(s.to_string());

        let (body, rir) = match s.trim().split_once('@') {
            Some((body, rir)) => (body, Some(rir.trim().parse::<i64>().map_err(|_| invalid())?)),
            None => (s.trim(), None),
        };
        let (load, reps) = body
            .split_once(['x', 'X'])
            .ok_or_else(invalid)?;

        Ok(RawSet {
            reps: Some(reps.trim().parse().map_err(|_| invalid())?),
            load: Some(load.trim().parse().map_err(|_| invalid())?),
            rir,
            ..Default::default()
        })
    }
}

/// Calendar date from `YYYY-MM-DD`, or the UTC date of an RFC 3339 timestamp
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|d| d.with_timezone(&Utc).date_naive()))
        .map_err(|_| ValidationError::InvalidDate(s.to_string()))
}

fn check_range(field: &str, value: Option<i64>, (min, max): (i64, i64)) -> Result<(), ValidationError> {
    match value {
        Some(v) if v < min || v > max => Err(ValidationError::out_of_range(
            field,
            v as f64,
            min as f64,
            max as f64,
        )),
        _ => Ok(()),
    }
}

// Stored documents may carry numbers as strings, empty strings or nulls.
fn loose_number(value: Option<Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn lenient_float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(loose_number(Option::<Value>::deserialize(deserializer)?))
}

fn lenient_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(loose_number(Option::<Value>::deserialize(deserializer)?).map(|v| v.trunc() as i64))
}

fn lenient_counts<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BTreeMap<String, u32>, D::Error> {
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|(muscle, v)| {
            let sets = loose_number(Some(v))?;
            (sets >= 0.0).then(|| (muscle, sets.trunc() as u32))
        })
        .collect())
}
