use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod answer;
pub mod catalog;
pub mod feedback;
pub mod level;
pub mod progress;
pub mod question;
pub mod shape;
pub mod views;

pub use level::Level;
pub use progress::ProgressRecord;
pub use question::Question;
pub use shape::Shape;

/// Everything the tutor remembers about one visitor, stored under the visitor id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitorSession {
    pub visitor_id: String,
    pub progress: ProgressRecord,
    pub current_question: Option<Question>,
    pub current_shape: Option<Shape>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VisitorSession {
    pub fn new(visitor_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            visitor_id: visitor_id.into(),
            progress: ProgressRecord::new(),
            current_question: None,
            current_shape: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
