//! Estimated 1RM progression using linear regression (linfa)

use chrono::NaiveDate;
use linfa::prelude::*;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2};

use crate::exercises::same_exercise;
use crate::models::TrainingLog;

/// Minimum sessions required for a trend
const MIN_DATA_POINTS: usize = 3;

/// One set's estimated 1RM, for charting
#[derive(Debug, Clone, PartialEq)]
pub struct OneRepMaxPoint {
    pub date: NaiveDate,
    pub exercise: String,
    pub estimated_1rm: f64,
}

/// Every set of the last `limit` logs (logs are ordered by date)
pub fn one_rep_max_history(logs: &[TrainingLog], limit: usize) -> Vec<OneRepMaxPoint> {
    let start = logs.len().saturating_sub(limit);
    logs[start..]
        .iter()
        .flat_map(|log| {
            log.exercises.iter().flat_map(move |ex| {
                ex.sets.iter().map(move |set| OneRepMaxPoint {
                    date: log.date,
                    exercise: ex.name.clone(),
                    estimated_1rm: set.estimated_1rm(),
                })
            })
        })
        .collect()
}

/// Linear trend of the best estimated 1RM per session for one exercise
#[derive(Debug, Clone)]
pub struct OneRepMaxTrend {
    slope: f64,
    intercept: f64,
    r2_score: f64,
    data_points: usize,
    first_date: NaiveDate,
    last_date: NaiveDate,
    latest_best: f64,
}

impl OneRepMaxTrend {
    /// Fit from the full history; exercise names match case-insensitively
    pub fn fit(logs: &[TrainingLog], exercise: &str) -> Option<Self> {
        // (date, best estimate of that session)
        let sessions: Vec<(NaiveDate, f64)> = logs
            .iter()
            .filter_map(|log| {
                log.exercises
                    .iter()
                    .filter(|e| same_exercise(&e.name, exercise))
                    .filter_map(|e| e.best_estimated_1rm())
                    .reduce(f64::max)
                    .map(|best| (log.date, best))
            })
            .collect();

        if sessions.len() < MIN_DATA_POINTS {
            return None;
        }

        let first_date = sessions.iter().map(|(d, _)| *d).min()?;
        let (last_date, latest_best) = *sessions.iter().max_by_key(|(d, _)| *d)?;

        let x_data: Vec<f64> = sessions
            .iter()
            .map(|(d, _)| (*d - first_date).num_days() as f64)
            .collect();
        let y_data: Vec<f64> = sessions.iter().map(|(_, v)| *v).collect();
        let n_samples = x_data.len();

        let records = Array2::from_shape_vec((n_samples, 1), x_data).ok()?;
        let targets = Array1::from_vec(y_data);
        let dataset = Dataset::new(records, targets);

        // Fails when every session falls on the same day
        let model = LinearRegression::default().fit(&dataset).ok()?;

        let slope = model.params()[0];
        let intercept = model.intercept();

        let predictions = model.predict(&dataset);
        let r2_score = predictions.r2(&dataset).unwrap_or(0.0);

        Some(Self {
            slope,
            intercept,
            r2_score,
            data_points: n_samples,
            first_date,
            last_date,
            latest_best,
        })
    }

    /// kg per day
    pub fn daily_progress(&self) -> f64 {
        self.slope
    }

    pub fn r2_score(&self) -> f64 {
        self.r2_score
    }

    pub fn data_points(&self) -> usize {
        self.data_points
    }

    pub fn latest_best(&self) -> f64 {
        self.latest_best
    }

    /// Projected estimate `days` after the last session
    pub fn project(&self, days: i64) -> f64 {
        let x = (self.last_date - self.first_date).num_days() + days;
        self.slope * x as f64 + self.intercept
    }

    pub fn format(&self) -> String {
        let trend = if self.slope >= 0.0 {
            format!("+{:.2}", self.slope * 7.0)
        } else {
            format!("{:.2}", self.slope * 7.0)
        };
        format!(
            "Best e1RM: {:.1} kg | Trend: {} kg/week | In 4 weeks: ~{:.1} kg | R2: {:.2} ({} sessions)",
            self.latest_best,
            trend,
            self.project(28),
            self.r2_score,
            self.data_points
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::MuscleGroup;
    use crate::models::{Exercise, TrainingSet};

    fn session(days: i64, name: &str, load: f64) -> TrainingLog {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(days);
        TrainingLog::new(
            date,
            vec![Exercise::new(name, MuscleGroup::Chest, vec![
                TrainingSet::new(1, load).with_rir(0),
                TrainingSet::new(1, load - 10.0).with_rir(2),
            ])],
        )
    }

    #[test]
    fn test_insufficient_data() {
        let logs = vec![session(0, "Bench", 100.0), session(7, "Bench", 102.0)];
        assert!(OneRepMaxTrend::fit(&logs, "Bench").is_none());
    }

    #[test]
    fn test_no_matching_exercise() {
        let logs = vec![session(0, "Squat", 100.0), session(7, "Squat", 105.0), session(14, "Squat", 110.0)];
        assert!(OneRepMaxTrend::fit(&logs, "Bench").is_none());
    }

    #[test]
    fn test_linear_trend() {
        // 100, 107, 114 over 14 days = 1 kg/day
        let logs = vec![session(0, "Bench", 100.0), session(14, "bench", 114.0), session(7, "Bench", 107.0)];
        let trend = OneRepMaxTrend::fit(&logs, "BENCH").unwrap();

        assert!((trend.daily_progress() - 1.0).abs() < 1e-6, "Slope: {}", trend.daily_progress());
        assert!(trend.r2_score() > 0.99, "R2: {}", trend.r2_score());
        assert_eq!(trend.data_points(), 3);
        assert_eq!(trend.latest_best(), 114.0);
        assert!((trend.project(7) - 121.0).abs() < 1e-6);
    }

    #[test]
    fn test_negative_trend() {
        let logs = vec![session(0, "Row", 90.0), session(7, "Row", 85.0), session(14, "Row", 80.0)];
        let trend = OneRepMaxTrend::fit(&logs, "Row").unwrap();
        assert!(trend.daily_progress() < 0.0);
        assert!(trend.project(7) < trend.latest_best());
        assert!(trend.format().contains("Trend: -"), "Format: {}", trend.format());
    }

    #[test]
    fn test_history_limited_to_last_logs() {
        let logs = vec![session(0, "Bench", 100.0), session(7, "Bench", 102.0), session(14, "Bench", 104.0)];
        let points = one_rep_max_history(&logs, 2);

        assert_eq!(points.len(), 4);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert_eq!(points[0].estimated_1rm, 102.0);
        assert!(one_rep_max_history(&[], 10).is_empty());
    }
}
