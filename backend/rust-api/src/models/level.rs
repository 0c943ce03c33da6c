use serde::{Deserialize, Serialize};
use std::fmt;

/// Difficulty tier. Ordering follows progression: beginner < intermediate < expert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Beginner,
    Intermediate,
    Expert,
}

/// Static thresholds and presentation data for a level.
#[derive(Debug, Clone, Serialize)]
pub struct LevelConfig {
    pub name: &'static str,
    pub description: &'static str,
    pub questions_required: u32,
    pub pass_threshold: f64,
    pub color: &'static str,
    pub icon: &'static str,
}

/// Numeric parameters used by the question generator at a level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub min: f64,
    pub max: f64,
    pub decimal_places: u32,
    pub narrative: bool,
}

static LEVEL_CONFIGS: [LevelConfig; 3] = [
    LevelConfig {
        name: "Beginner",
        description: "Simple whole numbers, basic concepts",
        questions_required: 5,
        pass_threshold: 0.6,
        color: "#10b981",
        icon: "🌱",
    },
    LevelConfig {
        name: "Intermediate",
        description: "Decimal numbers, medium difficulty",
        questions_required: 5,
        pass_threshold: 0.7,
        color: "#f59e0b",
        icon: "🌿",
    },
    LevelConfig {
        name: "Expert",
        description: "Complex calculations, real-world problems",
        questions_required: 5,
        pass_threshold: 0.8,
        color: "#8b5cf6",
        icon: "🌳",
    },
];

impl Level {
    pub const ORDER: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Expert];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Expert => "expert",
        }
    }

    /// Position in [`Level::ORDER`].
    pub fn index(&self) -> usize {
        match self {
            Level::Beginner => 0,
            Level::Intermediate => 1,
            Level::Expert => 2,
        }
    }

    pub fn next(&self) -> Option<Level> {
        Level::ORDER.get(self.index() + 1).copied()
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }

    pub fn config(&self) -> &'static LevelConfig {
        &LEVEL_CONFIGS[self.index()]
    }

    pub fn generation(&self) -> GenerationParams {
        match self {
            Level::Beginner => GenerationParams {
                min: 2.0,
                max: 10.0,
                decimal_places: 0,
                narrative: false,
            },
            Level::Intermediate => GenerationParams {
                min: 3.0,
                max: 15.0,
                decimal_places: 1,
                narrative: false,
            },
            Level::Expert => GenerationParams {
                min: 5.0,
                max: 25.0,
                decimal_places: 2,
                narrative: true,
            },
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Level table as exposed by the API, keyed by level slug.
#[derive(Debug, Serialize)]
pub struct LevelTableEntry {
    pub level: Level,
    #[serde(flatten)]
    pub config: &'static LevelConfig,
}

pub fn level_table() -> Vec<LevelTableEntry> {
    Level::ORDER
        .iter()
        .map(|level| LevelTableEntry {
            level: *level,
            config: level.config(),
        })
        .collect()
}
