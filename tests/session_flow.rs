use hypertrack::analytics::{FatigueSignal, Progression};
use hypertrack::exercises::{MuscleGroup, PriorityTier};
use hypertrack::identity::Identity;
use hypertrack::models::{PriorityMuscles, ProfilePatch, RawTrainingLog};
use hypertrack::{Database, Store};

fn store() -> Store {
    let db = Database::open_in_memory().unwrap();
    Store::new(Some(Box::new(db)), Some(Identity::resolve(Some("athlete"))))
}

fn session(json: &str) -> RawTrainingLog {
    serde_json::from_str(json).unwrap()
}

#[test]
fn bench_session_through_store() {
    let store = store();
    let mut rx = store.subscribe();

    let mut priorities = PriorityMuscles::default();
    priorities.set_tier(PriorityTier::Max, vec!["Chest".into()]);
    store
        .save_profile(ProfilePatch {
            priority_muscles: Some(priorities),
            ..Default::default()
        })
        .unwrap();

    let log = store
        .add_log(&session(
            r#"{"date": "2024-01-03", "exercises": [{
                "name": "Bench", "muscleGroup": "Chest",
                "sets": [
                    {"reps": 8, "load": 60, "rir": 0},
                    {"reps": "8", "load": "60", "rir": "1"},
                    {"reps": 8, "load": 60, "rir": 2}
                ],
                "performanceScore": 1, "painScore": 0
            }]}"#,
        ))
        .unwrap();

    assert!(rx.has_changed().unwrap());
    let snapshot = rx.borrow_and_update().clone();
    let analytics = snapshot.analytics();

    for set in &snapshot.logs[0].exercises[0].sets {
        assert_eq!(set.estimated_1rm(), 74.5);
    }

    let report = analytics.weekly_volume();
    assert_eq!(report.week("2024-01").unwrap().get(MuscleGroup::Chest), 3);

    assert_eq!(analytics.fatigue(), FatigueSignal::None);

    let rec = analytics.recommendation_after(&log).unwrap();
    assert_eq!(rec.group, MuscleGroup::Chest);
    assert_eq!(rec.tier, Some(PriorityTier::Max));
    assert_eq!(rec.progression, Progression::Progress);
}

#[test]
fn fatigue_and_volume_across_weeks() {
    let store = store();

    store
        .add_log(&session(
            r#"{"date": "2024-12-30", "exercises": [{
                "name": "Squat", "muscleGroup": "Quads",
                "sets": [{"reps": 5, "load": 120, "rir": 2}, {"reps": 5, "load": 120}],
                "performanceScore": 1, "painScore": 1
            }]}"#,
        ))
        .unwrap();
    store
        .add_log(&session(
            r#"{"date": "2025-01-08", "exercises": [
                {"name": "Squat", "muscleGroup": "Quads",
                 "sets": [{"reps": 5, "load": 100, "rir": 0}],
                 "performanceScore": 4, "painScore": 3},
                {"name": "Row", "muscleGroup": "Back",
                 "sets": [{"reps": 10, "load": 70, "rir": 1}],
                 "performanceScore": 3, "painScore": 0}
            ]}"#,
        ))
        .unwrap();

    let snapshot = store.snapshot();
    let analytics = snapshot.analytics();

    let report = analytics.weekly_volume();
    let weeks: Vec<_> = report.weeks().iter().map(|w| w.week.as_str()).collect();
    // 2024-12-30 belongs to ISO week 1 of 2025
    assert_eq!(weeks, vec!["2025-01", "2025-02"]);
    assert_eq!(report.week("2025-01").unwrap().get(MuscleGroup::Quads), 1);

    assert_eq!(
        analytics.fatigue(),
        FatigueSignal::Generalized(vec![MuscleGroup::Quads, MuscleGroup::Back])
    );
}

#[test]
fn rejected_session_leaves_store_untouched() {
    let store = store();
    let err = store
        .add_log(&session(
            r#"{"date": "2024-01-03", "exercises": [{
                "name": "Bench", "muscleGroup": "Chest",
                "sets": [{"reps": 8, "load": 60, "rir": 1, "pump": 7}]
            }]}"#,
        ))
        .unwrap_err();

    assert!(err.user_message().starts_with("Please fix the input"));
    store.refresh().unwrap();
    assert!(store.snapshot().logs.is_empty());
}
