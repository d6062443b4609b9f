//! Training analytics engine
//!
//! Features:
//! - Estimated one-rep max per set (Brzycki)
//! - Weekly effective-set volume per muscle group
//! - Progression advice from performance/pain scores
//! - Session fatigue classification
//! - 1RM trend using linear regression (linfa)
//!
//! Everything here is pure: it works on whatever snapshot of logs and
//! profile it is given and never touches the store.

pub mod fatigue;
pub mod one_rep_max;
pub mod progression;
pub mod trend;
pub mod volume;

pub use fatigue::{FatigueSignal, detect_fatigue};
pub use one_rep_max::estimate_one_rep_max;
pub use progression::{Progression, Recommendation, recommend, recommend_for_exercise};
pub use trend::{OneRepMaxPoint, OneRepMaxTrend, one_rep_max_history};
pub use volume::{VolumeReport, WeeklyVolume, week_key};

use std::collections::BTreeMap;

use crate::exercises::{MuscleGroup, same_exercise};
use crate::models::{TrainingLog, UserProfile};

/// Analytics over one snapshot of a user's data
pub struct Analytics<'a> {
    logs: &'a [TrainingLog],
    profile: Option<&'a UserProfile>,
}

impl<'a> Analytics<'a> {
    /// `logs` must be ordered by date, oldest first
    pub fn new(logs: &'a [TrainingLog], profile: Option<&'a UserProfile>) -> Self {
        Self { logs, profile }
    }

    pub fn latest_log(&self) -> Option<&'a TrainingLog> {
        self.logs.last()
    }

    pub fn weekly_volume(&self) -> VolumeReport {
        VolumeReport::from_logs(self.logs)
    }

    pub fn fatigue(&self) -> FatigueSignal {
        detect_fatigue(self.latest_log())
    }

    /// Per-muscle advice for the latest session; empty without a profile
    pub fn latest_recommendations(&self) -> BTreeMap<MuscleGroup, Recommendation> {
        match (self.latest_log(), self.profile) {
            (Some(log), Some(profile)) => progression::summarize_session(log, &profile.priority_muscles),
            _ => BTreeMap::new(),
        }
    }

    /// Advice for the last exercise of a session
    pub fn recommendation_after(&self, log: &TrainingLog) -> Option<Recommendation> {
        let exercise = log.exercises.last()?;
        let priorities = self.profile.map(|p| p.priority_muscles.clone()).unwrap_or_default();
        Some(recommend_for_exercise(exercise, &priorities))
    }

    pub fn one_rep_max_trend(&self, exercise: &str) -> Option<OneRepMaxTrend> {
        OneRepMaxTrend::fit(self.logs, exercise)
    }

    /// Distinct exercise names, in first-logged order
    pub fn exercise_names(&self) -> Vec<&'a str> {
        let mut names: Vec<&str> = Vec::new();
        for ex in self.logs.iter().flat_map(|l| &l.exercises) {
            if !names.iter().any(|n| same_exercise(n, &ex.name)) {
                names.push(&ex.name);
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::PriorityTier;
    use crate::models::{Exercise, TrainingSet};
    use chrono::NaiveDate;

    fn bench_session() -> TrainingLog {
        let sets = [0, 1, 2]
            .iter()
            .map(|&rir| TrainingSet::new(8, 60.0).with_rir(rir))
            .collect();
        TrainingLog::new(
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            vec![Exercise::new("Bench", MuscleGroup::Chest, sets).with_scores(1, 0)],
        )
    }

    fn chest_priority() -> UserProfile {
        let mut profile = UserProfile::default();
        profile.priority_muscles.set_tier(PriorityTier::Max, vec!["Chest".into()]);
        profile
    }

    #[test]
    fn test_empty_snapshot() {
        let analytics = Analytics::new(&[], None);
        assert!(analytics.latest_log().is_none());
        assert_eq!(analytics.fatigue(), FatigueSignal::NoData);
        assert!(analytics.weekly_volume().weeks().is_empty());
        assert!(analytics.latest_recommendations().is_empty());
    }

    #[test]
    fn test_bench_session_end_to_end() {
        let logs = vec![bench_session()];
        let profile = chest_priority();
        let analytics = Analytics::new(&logs, Some(&profile));

        for set in &logs[0].exercises[0].sets {
            assert_eq!(set.estimated_1rm(), 74.5);
        }
        assert_eq!(analytics.weekly_volume().week("2024-01").unwrap().get(MuscleGroup::Chest), 3);
        assert_eq!(analytics.fatigue(), FatigueSignal::None);

        let recs = analytics.latest_recommendations();
        assert_eq!(recs[&MuscleGroup::Chest].progression, Progression::Progress);
    }

    #[test]
    fn test_recommendation_after_without_profile() {
        let log = bench_session();
        let analytics = Analytics::new(&[], None);
        let rec = analytics.recommendation_after(&log).unwrap();
        assert_eq!(rec.progression, Progression::NonPriority);
    }

    #[test]
    fn test_exercise_names_distinct() {
        let mut second = bench_session();
        second.exercises[0].name = "bench".into();
        let logs = vec![bench_session(), second];
        let analytics = Analytics::new(&logs, None);
        assert_eq!(analytics.exercise_names(), vec!["Bench"]);
    }

    #[test]
    fn test_exercise_names_non_ascii_case() {
        let mut first = bench_session();
        first.exercises[0].name = "Jalón".into();
        let mut second = bench_session();
        second.exercises[0].name = "JALÓN".into();
        let logs = vec![first, second];
        let analytics = Analytics::new(&logs, None);
        assert_eq!(analytics.exercise_names(), vec!["Jalón"]);
    }
}
