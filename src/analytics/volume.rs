//! Weekly volume per muscle group, keyed by ISO week

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};

use crate::exercises::MuscleGroup;
use crate::models::{TrainingLog, UserProfile};

/// `{ISO year}-{ISO week}`, zero padded so keys sort chronologically
pub fn week_key(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{:04}-{:02}", week.year(), week.week())
}

/// Effective sets per muscle group for one ISO week
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyVolume {
    pub week: String,
    /// Only groups trained that week are present
    pub sets: BTreeMap<MuscleGroup, u32>,
}

impl WeeklyVolume {
    pub fn get(&self, group: MuscleGroup) -> u32 {
        self.sets.get(&group).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.sets.values().sum()
    }
}

/// Weekly volume against the user's initial VME
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineStatus {
    NoBaseline,
    Below,
    At,
    Above,
}

impl BaselineStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BaselineStatus::NoBaseline => "-",
            BaselineStatus::Below => "below VME",
            BaselineStatus::At => "at VME",
            BaselineStatus::Above => "above VME",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineComparison {
    pub group: MuscleGroup,
    pub sets: u32,
    pub baseline: Option<u32>,
    pub status: BaselineStatus,
}

/// Weekly volume time series over a full log collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeReport {
    weeks: Vec<WeeklyVolume>,
    muscle_groups: Vec<MuscleGroup>,
}

impl VolumeReport {
    /// Aggregate every log; sets without a valid RIR are not counted
    pub fn from_logs(logs: &[TrainingLog]) -> Self {
        let mut weeks: BTreeMap<String, BTreeMap<MuscleGroup, u32>> = BTreeMap::new();
        let mut groups: BTreeSet<MuscleGroup> = BTreeSet::new();

        for log in logs {
            let week = weeks.entry(week_key(log.date)).or_default();
            for exercise in &log.exercises {
                groups.insert(exercise.muscle_group);
                *week.entry(exercise.muscle_group).or_insert(0) += exercise.effective_sets() as u32;
            }
        }

        Self {
            weeks: weeks
                .into_iter()
                .map(|(week, sets)| WeeklyVolume { week, sets })
                .collect(),
            muscle_groups: groups.into_iter().collect(),
        }
    }

    /// Weeks in ascending order
    pub fn weeks(&self) -> &[WeeklyVolume] {
        &self.weeks
    }

    /// Every muscle group seen anywhere in the input
    pub fn muscle_groups(&self) -> &[MuscleGroup] {
        &self.muscle_groups
    }

    pub fn week(&self, key: &str) -> Option<&WeeklyVolume> {
        self.weeks.iter().find(|w| w.week == key)
    }

    pub fn latest(&self) -> Option<&WeeklyVolume> {
        self.weeks.last()
    }

    /// Compare the most recent week to the profile's initial VME
    pub fn compare_to_baseline(&self, profile: &UserProfile) -> Vec<BaselineComparison> {
        let Some(latest) = self.latest() else {
            return Vec::new();
        };

        self.muscle_groups
            .iter()
            .map(|&group| {
                let sets = latest.get(group);
                let baseline = profile.baseline_for(group);
                let status = match baseline {
                    None => BaselineStatus::NoBaseline,
                    Some(b) if sets < b => BaselineStatus::Below,
                    Some(b) if sets == b => BaselineStatus::At,
                    Some(_) => BaselineStatus::Above,
                };
                BaselineComparison { group, sets, baseline, status }
            })
            .collect()
    }
}
