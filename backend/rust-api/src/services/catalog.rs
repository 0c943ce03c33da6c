use crate::models::{
    catalog::{Formula, ShapeDefinition, ShapeProperty},
    Shape,
};

/// Read-only lookup of shape descriptions, formulas, properties and concepts.
pub struct ShapeCatalog;

impl ShapeCatalog {
    pub fn all_shapes() -> &'static [Shape] {
        &Shape::ALL
    }

    /// Lookup by name; unknown names get an empty definition.
    pub fn definition(name: &str) -> ShapeDefinition {
        match name.parse::<Shape>() {
            Ok(shape) => Self::get(shape),
            Err(_) => ShapeDefinition {
                name: name.trim().to_ascii_lowercase(),
                ..ShapeDefinition::default()
            },
        }
    }

    pub fn get(shape: Shape) -> ShapeDefinition {
        ShapeDefinition {
            name: shape.as_str().to_string(),
            description: Self::description(shape),
            formula: Self::formula(shape),
            properties: Self::properties(shape),
            learning_concepts: Self::learning_concepts(shape),
        }
    }

    pub fn description(shape: Shape) -> &'static str {
        match shape {
            Shape::Square => {
                "A square is a four-sided polygon with all sides equal and all angles 90 degrees."
            }
            Shape::Rectangle => {
                "A rectangle is a four-sided polygon with opposite sides equal and all angles 90 degrees."
            }
            Shape::Triangle => {
                "A triangle is a three-sided polygon. The sum of all interior angles equals 180 degrees."
            }
            Shape::Circle => {
                "A circle is a round shape where all points are equidistant from the center."
            }
        }
    }

    pub fn formula(shape: Shape) -> Formula {
        match shape {
            Shape::Square => Formula {
                expression: "A = s²",
                description: "Area equals side length squared",
                explanation: "Multiply the side length by itself",
            },
            Shape::Rectangle => Formula {
                expression: "A = l × w",
                description: "Area equals length times width",
                explanation: "Multiply length by width",
            },
            Shape::Triangle => Formula {
                expression: "A = (b × h) / 2",
                description: "Area equals base times height divided by 2",
                explanation: "Multiply base by height, then divide by 2",
            },
            Shape::Circle => Formula {
                expression: "A = πr²",
                description: "Area equals pi times radius squared",
                explanation: "Multiply 3.14159 by the radius squared",
            },
        }
    }

    fn properties(shape: Shape) -> Vec<ShapeProperty> {
        let entries: &[(&'static str, &'static str)] = match shape {
            Shape::Square => &[
                ("Side Length", "Length of one side of the square"),
                ("Number of Sides", "A square has 4 equal sides"),
                ("Angles", "All angles are 90 degrees"),
            ],
            Shape::Rectangle => &[
                ("Length", "Longer dimension of the rectangle"),
                ("Width", "Shorter dimension of the rectangle"),
                ("Number of Sides", "A rectangle has 4 sides"),
                ("Angles", "All angles are 90 degrees"),
            ],
            Shape::Triangle => &[
                ("Base", "The bottom side of the triangle"),
                (
                    "Height",
                    "Perpendicular distance from base to opposite vertex",
                ),
                ("Number of Sides", "A triangle has 3 sides"),
                ("Angles", "Sum of all angles is 180 degrees"),
            ],
            Shape::Circle => &[
                ("Radius", "Distance from center to edge of circle"),
                (
                    "Diameter",
                    "Distance across circle through center (2 × radius)",
                ),
                ("Circumference", "Distance around the circle (2πr)"),
            ],
        };

        entries
            .iter()
            .map(|&(name, description)| ShapeProperty { name, description })
            .collect()
    }

    fn learning_concepts(shape: Shape) -> Vec<&'static str> {
        match shape {
            Shape::Square => vec![
                "Understanding that all sides are equal",
                "Recognizing 90-degree angles",
                "Basic multiplication skills",
                "Understanding area as square units",
            ],
            Shape::Rectangle => vec![
                "Distinguishing length from width",
                "Recognizing 90-degree angles",
                "Multiplication of two different numbers",
                "Understanding area concept",
            ],
            Shape::Triangle => vec![
                "Identifying base and height",
                "Understanding height is perpendicular to base",
                "Division by 2 concept",
                "Understanding different triangle types",
            ],
            Shape::Circle => vec![
                "Understanding radius and diameter relationship",
                "Introduction to pi (π)",
                "Exponents (squaring numbers)",
                "Recognizing curved vs angular shapes",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shape_has_full_definition() {
        for shape in ShapeCatalog::all_shapes() {
            let def = ShapeCatalog::get(*shape);
            assert_eq!(def.name, shape.as_str());
            assert!(!def.description.is_empty());
            assert!(!def.formula.expression.is_empty());
            assert!(def.properties.len() >= 3);
            assert_eq!(def.learning_concepts.len(), 4);
        }
    }

    #[test]
    fn lookup_by_name_ignores_case() {
        let def = ShapeCatalog::definition("CIRCLE");
        assert_eq!(def.formula.expression, "A = πr²");
    }

    #[test]
    fn unknown_shape_falls_back_to_empty() {
        let def = ShapeCatalog::definition("hexagon");
        assert!(def.is_empty());
        assert_eq!(def.name, "hexagon");
        assert!(def.learning_concepts.is_empty());
    }
}
