//! Exercise definitions - muscle groups, priority tiers and a small catalog

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Muscle groups tracked for weekly volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Arms,
    Quads,
    Hamstrings,
    Glutes,
    Calves,
    Abs,
}

impl MuscleGroup {
    pub fn name(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Arms => "Arms",
            MuscleGroup::Quads => "Quads",
            MuscleGroup::Hamstrings => "Hamstrings",
            MuscleGroup::Glutes => "Glutes",
            MuscleGroup::Calves => "Calves",
            MuscleGroup::Abs => "Abs",
        }
    }

    /// Names written by the first version of the app (still found in old documents)
    fn legacy_name(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "pecho",
            MuscleGroup::Back => "espalda",
            MuscleGroup::Shoulders => "hombros",
            MuscleGroup::Arms => "brazos",
            MuscleGroup::Quads => "cuádriceps",
            MuscleGroup::Hamstrings => "isquiotibiales",
            MuscleGroup::Glutes => "glúteos",
            MuscleGroup::Calves => "pantorrillas",
            MuscleGroup::Abs => "abdominales",
        }
    }

    /// All muscle groups for iteration
    pub fn all() -> &'static [MuscleGroup] {
        &[
            MuscleGroup::Chest,
            MuscleGroup::Back,
            MuscleGroup::Shoulders,
            MuscleGroup::Arms,
            MuscleGroup::Quads,
            MuscleGroup::Hamstrings,
            MuscleGroup::Glutes,
            MuscleGroup::Calves,
            MuscleGroup::Abs,
        ]
    }

    /// Case-insensitive lookup by current or legacy name
    pub fn parse(name: &str) -> Option<MuscleGroup> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        MuscleGroup::all()
            .iter()
            .copied()
            .find(|g| g.name().to_lowercase() == needle || g.legacy_name() == needle)
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MuscleGroup {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MuscleGroup::parse(s).ok_or_else(|| ValidationError::UnknownMuscleGroup(s.to_string()))
    }
}

impl Serialize for MuscleGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for MuscleGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Priority tiers of the user's specialization plan, highest first
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    Max,
    Primary,
    Secondary,
    Tertiary,
    Maintenance,
}

impl PriorityTier {
    pub fn all() -> &'static [PriorityTier] {
        &[
            PriorityTier::Max,
            PriorityTier::Primary,
            PriorityTier::Secondary,
            PriorityTier::Tertiary,
            PriorityTier::Maintenance,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            PriorityTier::Max => "max",
            PriorityTier::Primary => "primary",
            PriorityTier::Secondary => "secondary",
            PriorityTier::Tertiary => "tertiary",
            PriorityTier::Maintenance => "maintenance",
        }
    }
}

impl FromStr for PriorityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        PriorityTier::all()
            .iter()
            .copied()
            .find(|t| t.name() == needle)
            .ok_or_else(|| format!("unknown priority tier: {}", s))
    }
}

#[derive(Debug, Clone)]
pub struct CatalogExercise {
    pub name: &'static str,
    pub muscle_group: MuscleGroup,
    pub aliases: &'static [&'static str],
}

/// Common hypertrophy exercises, used to infer the muscle group of a logged exercise
pub const CATALOG: &[CatalogExercise] = &[
    CatalogExercise { name: "bench press", muscle_group: MuscleGroup::Chest, aliases: &["bench", "press de banca"] },
    CatalogExercise { name: "incline dumbbell press", muscle_group: MuscleGroup::Chest, aliases: &["incline press"] },
    CatalogExercise { name: "cable fly", muscle_group: MuscleGroup::Chest, aliases: &["fly", "pec deck"] },
    CatalogExercise { name: "pull-up", muscle_group: MuscleGroup::Back, aliases: &["pullup", "dominadas"] },
    CatalogExercise { name: "barbell row", muscle_group: MuscleGroup::Back, aliases: &["row", "remo"] },
    CatalogExercise { name: "lat pulldown", muscle_group: MuscleGroup::Back, aliases: &["pulldown", "jalón al pecho"] },
    CatalogExercise { name: "overhead press", muscle_group: MuscleGroup::Shoulders, aliases: &["ohp", "press militar"] },
    CatalogExercise { name: "lateral raise", muscle_group: MuscleGroup::Shoulders, aliases: &["elevaciones laterales"] },
    CatalogExercise { name: "barbell curl", muscle_group: MuscleGroup::Arms, aliases: &["curl", "curl de bíceps"] },
    CatalogExercise { name: "triceps pushdown", muscle_group: MuscleGroup::Arms, aliases: &["pushdown"] },
    CatalogExercise { name: "squat", muscle_group: MuscleGroup::Quads, aliases: &["back squat", "sentadilla"] },
    CatalogExercise { name: "leg press", muscle_group: MuscleGroup::Quads, aliases: &["prensa"] },
    CatalogExercise { name: "leg extension", muscle_group: MuscleGroup::Quads, aliases: &["extensiones"] },
    CatalogExercise { name: "romanian deadlift", muscle_group: MuscleGroup::Hamstrings, aliases: &["rdl", "peso muerto rumano"] },
    CatalogExercise { name: "leg curl", muscle_group: MuscleGroup::Hamstrings, aliases: &["curl femoral"] },
    CatalogExercise { name: "hip thrust", muscle_group: MuscleGroup::Glutes, aliases: &["empuje de cadera"] },
    CatalogExercise { name: "standing calf raise", muscle_group: MuscleGroup::Calves, aliases: &["calf raise", "gemelos"] },
    CatalogExercise { name: "cable crunch", muscle_group: MuscleGroup::Abs, aliases: &["crunch", "encogimientos"] },
];

/// Logged exercise names match ignoring case and surrounding whitespace
pub fn same_exercise(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Find catalog exercise by name or alias (case-insensitive)
pub fn find_exercise_by_name(name: &str) -> Option<&'static CatalogExercise> {
    let needle = name.trim().to_lowercase();
    CATALOG
        .iter()
        .find(|e| e.name == needle || e.aliases.contains(&needle.as_str()))
}
