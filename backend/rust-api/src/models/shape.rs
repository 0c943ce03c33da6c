use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Shapes the tutor can teach, in the order lessons are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Square,
    Rectangle,
    Triangle,
    Circle,
}

impl Shape {
    pub const ALL: [Shape; 4] = [
        Shape::Square,
        Shape::Rectangle,
        Shape::Triangle,
        Shape::Circle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Square => "square",
            Shape::Rectangle => "rectangle",
            Shape::Triangle => "triangle",
            Shape::Circle => "circle",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownShapeName(pub String);

impl fmt::Display for UnknownShapeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown shape: {}", self.0)
    }
}

impl FromStr for Shape {
    type Err = UnknownShapeName;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "square" => Ok(Shape::Square),
            "rectangle" => Ok(Shape::Rectangle),
            "triangle" => Ok(Shape::Triangle),
            "circle" => Ok(Shape::Circle),
            _ => Err(UnknownShapeName(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Circle".parse::<Shape>(), Ok(Shape::Circle));
        assert_eq!(" square ".parse::<Shape>(), Ok(Shape::Square));
        assert!("hexagon".parse::<Shape>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Shape::Rectangle).unwrap();
        assert_eq!(json, "\"rectangle\"");
    }
}
