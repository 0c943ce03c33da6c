use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

use super::{
    level::{Level, LevelConfig},
    shape::Shape,
};

pub const LEVEL_QUESTION_HISTORY: usize = 20;
pub const GLOBAL_HISTORY: usize = 50;
pub const SUMMARY_HISTORY: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub correct: bool,
    pub question: String,
    pub user_answer: f64,
    pub correct_answer: f64,
    pub answered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelProgress {
    pub unlocked: bool,
    pub attempts: u32,
    pub correct: u32,
    pub completed: bool,
    pub questions: VecDeque<QuestionOutcome>,
}

impl LevelProgress {
    fn unlocked() -> Self {
        Self {
            unlocked: true,
            ..Self::default()
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            f64::from(self.correct) / f64::from(self.attempts)
        }
    }

    pub fn record(&mut self, outcome: QuestionOutcome) {
        self.attempts += 1;
        if outcome.correct {
            self.correct += 1;
        }
        self.questions.push_back(outcome);
        while self.questions.len() > LEVEL_QUESTION_HISTORY {
            self.questions.pop_front();
        }
    }

    pub fn state(&self) -> LevelState {
        if self.completed {
            LevelState::Completed
        } else if self.unlocked {
            LevelState::InProgress
        } else {
            LevelState::Locked
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelState {
    Locked,
    InProgress,
    Completed,
}

/// One slot per level so every level is always present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeLevels {
    pub beginner: LevelProgress,
    pub intermediate: LevelProgress,
    pub expert: LevelProgress,
}

impl ShapeLevels {
    pub fn get(&self, level: Level) -> &LevelProgress {
        match level {
            Level::Beginner => &self.beginner,
            Level::Intermediate => &self.intermediate,
            Level::Expert => &self.expert,
        }
    }

    pub fn get_mut(&mut self, level: Level) -> &mut LevelProgress {
        match level {
            Level::Beginner => &mut self.beginner,
            Level::Intermediate => &mut self.intermediate,
            Level::Expert => &mut self.expert,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeProgress {
    pub current_level: Level,
    pub levels: ShapeLevels,
    pub mastered: bool,
}

impl Default for ShapeProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeProgress {
    /// Beginner unlocked, everything else locked.
    pub fn new() -> Self {
        Self {
            current_level: Level::Beginner,
            levels: ShapeLevels {
                beginner: LevelProgress::unlocked(),
                intermediate: LevelProgress::default(),
                expert: LevelProgress::default(),
            },
            mastered: false,
        }
    }

    pub fn level(&self, level: Level) -> &LevelProgress {
        self.levels.get(level)
    }

    pub fn level_mut(&mut self, level: Level) -> &mut LevelProgress {
        self.levels.get_mut(level)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub shape: Shape,
    pub level: Level,
    pub correct: bool,
    pub answered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub total_attempts: u32,
    pub correct_answers: u32,
    pub wrong_answers: u32,
    pub shapes: BTreeMap<Shape, ShapeProgress>,
    pub history: VecDeque<HistoryEntry>,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressRecord {
    pub fn new() -> Self {
        Self {
            total_attempts: 0,
            correct_answers: 0,
            wrong_answers: 0,
            shapes: Shape::ALL
                .iter()
                .map(|shape| (*shape, ShapeProgress::new()))
                .collect(),
            history: VecDeque::new(),
        }
    }

    pub fn shape(&self, shape: Shape) -> Option<&ShapeProgress> {
        self.shapes.get(&shape)
    }

    pub fn shape_mut(&mut self, shape: Shape) -> &mut ShapeProgress {
        self.shapes.entry(shape).or_default()
    }

    pub fn reset_shape(&mut self, shape: Shape) {
        self.shapes.insert(shape, ShapeProgress::new());
    }

    /// Records an answer against the global counters, the level and the history log.
    pub fn record_answer(&mut self, shape: Shape, level: Level, outcome: QuestionOutcome) {
        let correct = outcome.correct;
        let answered_at = outcome.answered_at;

        self.total_attempts += 1;
        if correct {
            self.correct_answers += 1;
        } else {
            self.wrong_answers += 1;
        }

        self.shape_mut(shape).level_mut(level).record(outcome);

        self.history.push_back(HistoryEntry {
            shape,
            level,
            correct,
            answered_at,
        });
        while self.history.len() > GLOBAL_HISTORY {
            self.history.pop_front();
        }
    }

    pub fn accuracy_percent(&self) -> f64 {
        if self.total_attempts == 0 {
            return 0.0;
        }
        let percent = f64::from(self.correct_answers) / f64::from(self.total_attempts) * 100.0;
        (percent * 10.0).round() / 10.0
    }

    pub fn summary(&self) -> ProgressSummary {
        let shapes: BTreeMap<Shape, ShapeSummary> = Shape::ALL
            .iter()
            .map(|shape| {
                let summary = match self.shape(*shape) {
                    Some(progress) => ShapeSummary::from(progress),
                    None => ShapeSummary::from(&ShapeProgress::new()),
                };
                (*shape, summary)
            })
            .collect();

        let shapes_mastered = shapes.values().filter(|s| s.mastered).count();
        let skip = self.history.len().saturating_sub(SUMMARY_HISTORY);

        ProgressSummary {
            accuracy: self.accuracy_percent(),
            total_attempts: self.total_attempts,
            correct_answers: self.correct_answers,
            wrong_answers: self.wrong_answers,
            shapes,
            shapes_mastered,
            history: self.history.iter().skip(skip).cloned().collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LevelSummary {
    pub unlocked: bool,
    pub completed: bool,
    pub state: LevelState,
    pub attempts: u32,
    pub correct: u32,
    /// Whole percent.
    pub accuracy: u32,
    pub config: &'static LevelConfig,
}

#[derive(Debug, Serialize)]
pub struct ShapeSummary {
    pub current_level: Level,
    pub mastered: bool,
    pub levels: BTreeMap<Level, LevelSummary>,
}

impl From<&ShapeProgress> for ShapeSummary {
    fn from(progress: &ShapeProgress) -> Self {
        let levels = Level::ORDER
            .iter()
            .map(|level| {
                let data = progress.level(*level);
                let summary = LevelSummary {
                    unlocked: data.unlocked,
                    completed: data.completed,
                    state: data.state(),
                    attempts: data.attempts,
                    correct: data.correct,
                    accuracy: (data.accuracy() * 100.0).round() as u32,
                    config: level.config(),
                };
                (*level, summary)
            })
            .collect();

        Self {
            current_level: progress.current_level,
            mastered: progress.mastered,
            levels,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProgressSummary {
    /// Overall accuracy in percent, one decimal.
    pub accuracy: f64,
    pub total_attempts: u32,
    pub correct_answers: u32,
    pub wrong_answers: u32,
    pub shapes: BTreeMap<Shape, ShapeSummary>,
    pub shapes_mastered: usize,
    pub history: Vec<HistoryEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(correct: bool) -> QuestionOutcome {
        QuestionOutcome {
            correct,
            question: "A square has sides of 4 cm. Calculate its area.".to_string(),
            user_answer: 16.0,
            correct_answer: 16.0,
            answered_at: Utc::now(),
        }
    }

    #[test]
    fn new_record_unlocks_only_beginner() {
        let record = ProgressRecord::new();
        assert_eq!(record.shapes.len(), 4);
        for progress in record.shapes.values() {
            assert_eq!(progress.current_level, Level::Beginner);
            assert!(progress.level(Level::Beginner).unlocked);
            assert!(!progress.level(Level::Intermediate).unlocked);
            assert!(!progress.level(Level::Expert).unlocked);
            assert!(!progress.mastered);
        }
    }

    #[test]
    fn level_question_ring_is_bounded() {
        let mut level = LevelProgress::unlocked();
        for i in 0..25 {
            level.record(outcome(i % 2 == 0));
        }
        assert_eq!(level.attempts, 25);
        assert_eq!(level.correct, 13);
        assert_eq!(level.questions.len(), LEVEL_QUESTION_HISTORY);
        assert!(level.correct <= level.attempts);
    }

    #[test]
    fn global_history_is_bounded_and_counters_add_up() {
        let mut record = ProgressRecord::new();
        for i in 0..60 {
            record.record_answer(Shape::Circle, Level::Beginner, outcome(i % 3 == 0));
        }
        assert_eq!(record.history.len(), GLOBAL_HISTORY);
        assert_eq!(record.total_attempts, 60);
        assert_eq!(
            record.total_attempts,
            record.correct_answers + record.wrong_answers
        );
    }

    #[test]
    fn summary_reports_rounded_accuracy_and_recent_history() {
        let mut record = ProgressRecord::new();
        record.record_answer(Shape::Square, Level::Beginner, outcome(true));
        record.record_answer(Shape::Square, Level::Beginner, outcome(true));
        record.record_answer(Shape::Square, Level::Beginner, outcome(false));
        for _ in 0..12 {
            record.record_answer(Shape::Triangle, Level::Beginner, outcome(false));
        }

        let summary = record.summary();
        assert_eq!(summary.total_attempts, 15);
        assert_eq!(summary.accuracy, 13.3);
        assert_eq!(summary.history.len(), SUMMARY_HISTORY);
        assert_eq!(summary.shapes[&Shape::Square].levels[&Level::Beginner].accuracy, 67);
        assert_eq!(
            summary.shapes[&Shape::Square].levels[&Level::Intermediate].state,
            LevelState::Locked
        );
    }

    #[test]
    fn record_survives_json_round_trip_through_store() {
        let mut record = ProgressRecord::new();
        record.record_answer(Shape::Rectangle, Level::Beginner, outcome(true));
        let json = serde_json::to_string(&record).unwrap();
        let restored: ProgressRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.total_attempts, 1);
        assert_eq!(
            restored.shapes[&Shape::Rectangle]
                .level(Level::Beginner)
                .correct,
            1
        );
    }
}
