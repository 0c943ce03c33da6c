use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Formula {
    pub expression: &'static str,
    pub description: &'static str,
    pub explanation: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShapeProperty {
    pub name: &'static str,
    pub description: &'static str,
}

/// Static facts about a shape. An unknown shape yields the empty default.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShapeDefinition {
    pub name: String,
    pub description: &'static str,
    pub formula: Formula,
    pub properties: Vec<ShapeProperty>,
    pub learning_concepts: Vec<&'static str>,
}

impl ShapeDefinition {
    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.properties.is_empty()
    }
}
