use chrono::Utc;
use rand::{seq::IndexedRandom, Rng};
use std::{collections::BTreeMap, f64::consts::PI};

use crate::models::{
    question::{Question, WorkedExample},
    Level, Shape,
};

/// Narrative wrapper for expert-level word problems.
#[derive(Debug, Clone, Copy)]
pub struct RealWorldContext {
    pub setup: &'static str,
    pub object: &'static str,
    pub unit: &'static str,
    pub question: &'static str,
}

const fn ctx(
    setup: &'static str,
    object: &'static str,
    unit: &'static str,
    question: &'static str,
) -> RealWorldContext {
    RealWorldContext {
        setup,
        object,
        unit,
        question,
    }
}

static SQUARE_CONTEXTS: [RealWorldContext; 3] = [
    ctx(
        "You are tiling a kitchen floor.",
        "floor",
        "meters",
        "How many square meters of tiles do you need?",
    ),
    ctx(
        "A farmer is fencing a square garden.",
        "garden",
        "meters",
        "What is the area of the garden?",
    ),
    ctx(
        "An artist is creating a square canvas.",
        "canvas",
        "cm",
        "What is the painting area?",
    ),
];

static RECTANGLE_CONTEXTS: [RealWorldContext; 3] = [
    ctx(
        "You are painting a bedroom wall.",
        "wall",
        "meters",
        "How much area needs to be painted?",
    ),
    ctx(
        "A school is building a rectangular playground.",
        "playground",
        "meters",
        "What is the total area?",
    ),
    ctx(
        "You need carpet for a living room.",
        "room",
        "meters",
        "How many square meters of carpet do you need?",
    ),
];

static TRIANGLE_CONTEXTS: [RealWorldContext; 3] = [
    ctx(
        "A sail for a boat is triangular.",
        "sail",
        "meters",
        "What is the area of fabric needed?",
    ),
    ctx(
        "You are designing a triangular garden bed.",
        "garden bed",
        "meters",
        "What is the planting area?",
    ),
    ctx(
        "A road sign is triangular.",
        "sign",
        "cm",
        "What is the surface area of the sign?",
    ),
];

static CIRCLE_CONTEXTS: [RealWorldContext; 3] = [
    ctx(
        "You are ordering a pizza.",
        "pizza",
        "cm",
        "What is the area of the pizza?",
    ),
    ctx(
        "A sprinkler waters a circular area.",
        "watered area",
        "meters",
        "What area does it cover?",
    ),
    ctx(
        "You are building a circular pond.",
        "pond",
        "meters",
        "What is the surface area?",
    ),
];

pub fn real_world_contexts(shape: Shape) -> &'static [RealWorldContext] {
    match shape {
        Shape::Square => &SQUARE_CONTEXTS,
        Shape::Rectangle => &RECTANGLE_CONTEXTS,
        Shape::Triangle => &TRIANGLE_CONTEXTS,
        Shape::Circle => &CIRCLE_CONTEXTS,
    }
}

/// Closed-form area for the named parameters of a shape.
pub fn area(shape: Shape, given: &BTreeMap<String, f64>) -> Option<f64> {
    let get = |key: &str| given.get(key).copied();
    match shape {
        Shape::Square => get("side").map(|s| s * s),
        Shape::Rectangle => Some(get("length")? * get("width")?),
        Shape::Triangle => Some(get("base")? * get("height")? / 2.0),
        Shape::Circle => get("radius").map(|r| PI * r * r),
    }
}

/// Generates a practice question for an unvalidated shape name.
pub fn generate_question_named<R: Rng + ?Sized>(
    shape_name: &str,
    level: Level,
    rng: &mut R,
) -> Option<Question> {
    let shape = shape_name.parse::<Shape>().ok()?;
    Some(generate_question(shape, level, rng))
}

pub fn generate_question<R: Rng + ?Sized>(shape: Shape, level: Level, rng: &mut R) -> Question {
    let params = level.generation();
    let context = if params.narrative {
        real_world_contexts(shape).choose(rng).copied()
    } else {
        None
    };
    let dp = params.decimal_places;
    let mut draw = |low: f64, high: f64| round_to(rng.random_range(low..=high), dp);

    match shape {
        Shape::Square => {
            let side = draw(params.min, params.max);
            square_question(side, level, context.as_ref())
        }
        Shape::Rectangle => {
            let length = draw(params.min, params.max);
            let width = draw(params.min, params.max * 0.7);
            rectangle_question(length, width, level, context.as_ref())
        }
        Shape::Triangle => {
            let base = draw(params.min, params.max);
            let height = draw(params.min, params.max * 0.8);
            triangle_question(base, height, level, context.as_ref())
        }
        Shape::Circle => {
            let radius = draw(params.min * 0.5, params.max * 0.5);
            circle_question(radius, level, context.as_ref())
        }
    }
}

fn square_question(side: f64, level: Level, context: Option<&RealWorldContext>) -> Question {
    let dp = level.generation().decimal_places;
    let s = fmt_num(side, dp);
    let area = side * side;

    let problem = match context {
        Some(c) => format!(
            "{} The {} is square-shaped with sides of {} {}. {}",
            c.setup, c.object, s, c.unit, c.question
        ),
        None => format!("A square has sides of {} cm. Calculate its area.", s),
    };

    Question {
        shape: Shape::Square,
        level,
        problem,
        given: given(&[("side", side)]),
        correct_answer: area,
        formula: format!("A = s² = {}² = {:.2}", s, area),
        hint: format!("Area of square = side × side = {} × {}", s, s),
        steps: vec![
            format!("Step 1: Identify the side length: s = {}", s),
            "Step 2: Apply the formula: A = s²".to_string(),
            format!("Step 3: Calculate: A = {} × {} = {:.2}", s, s, area),
        ],
        generated_at: Utc::now(),
    }
}

fn rectangle_question(
    length: f64,
    width: f64,
    level: Level,
    context: Option<&RealWorldContext>,
) -> Question {
    let dp = level.generation().decimal_places;
    let (l, w) = (fmt_num(length, dp), fmt_num(width, dp));
    let area = length * width;

    let problem = match context {
        Some(c) => format!(
            "{} The {} is {} {} long and {} {} wide. {}",
            c.setup, c.object, l, c.unit, w, c.unit, c.question
        ),
        None => format!(
            "A rectangle has length {} cm and width {} cm. Calculate its area.",
            l, w
        ),
    };

    Question {
        shape: Shape::Rectangle,
        level,
        problem,
        given: given(&[("length", length), ("width", width)]),
        correct_answer: area,
        formula: format!("A = l × w = {} × {} = {:.2}", l, w, area),
        hint: format!("Area of rectangle = length × width = {} × {}", l, w),
        steps: vec![
            format!("Step 1: Identify length = {}, width = {}", l, w),
            "Step 2: Apply the formula: A = l × w".to_string(),
            format!("Step 3: Calculate: A = {} × {} = {:.2}", l, w, area),
        ],
        generated_at: Utc::now(),
    }
}

fn triangle_question(
    base: f64,
    height: f64,
    level: Level,
    context: Option<&RealWorldContext>,
) -> Question {
    let dp = level.generation().decimal_places;
    let (b, h) = (fmt_num(base, dp), fmt_num(height, dp));
    let area = base * height / 2.0;

    let problem = match context {
        Some(c) => format!(
            "{} The {} has a base of {} {} and height of {} {}. {}",
            c.setup, c.object, b, c.unit, h, c.unit, c.question
        ),
        None => format!(
            "A triangle has base {} cm and height {} cm. Calculate its area.",
            b, h
        ),
    };

    Question {
        shape: Shape::Triangle,
        level,
        problem,
        given: given(&[("base", base), ("height", height)]),
        correct_answer: area,
        formula: format!("A = ½ × b × h = ½ × {} × {} = {:.2}", b, h, area),
        hint: format!("Area of triangle = ½ × base × height = ½ × {} × {}", b, h),
        steps: vec![
            format!("Step 1: Identify base = {}, height = {}", b, h),
            "Step 2: Apply the formula: A = ½ × b × h".to_string(),
            format!("Step 3: Calculate: A = ½ × {} × {} = {:.2}", b, h, area),
        ],
        generated_at: Utc::now(),
    }
}

fn circle_question(radius: f64, level: Level, context: Option<&RealWorldContext>) -> Question {
    let dp = level.generation().decimal_places;
    let r = fmt_num(radius, dp);
    let area = PI * radius * radius;

    let problem = match context {
        Some(c) => format!(
            "{} The {} has a radius of {} {}. {}",
            c.setup, c.object, r, c.unit, c.question
        ),
        None => format!(
            "A circle has radius {} cm. Calculate its area. (Use π = 3.14159)",
            r
        ),
    };

    Question {
        shape: Shape::Circle,
        level,
        problem,
        given: given(&[("radius", radius)]),
        correct_answer: area,
        formula: format!("A = π × r² = 3.14159 × {}² = {:.2}", r, area),
        hint: format!("Area of circle = π × radius² = 3.14159 × {}²", r),
        steps: vec![
            format!("Step 1: Identify radius = {}", r),
            "Step 2: Apply the formula: A = π × r²".to_string(),
            format!("Step 3: Calculate: A = 3.14159 × {}² = {:.2}", r, area),
        ],
        generated_at: Utc::now(),
    }
}

/// Two worked examples for a lesson page, one decimal place each.
pub fn lesson_examples<R: Rng + ?Sized>(shape: Shape, rng: &mut R) -> Vec<WorkedExample> {
    let mut draw = |low: f64, high: f64| round_to(rng.random_range(low..=high), 1);

    (0..2)
        .map(|_| match shape {
            Shape::Square => {
                let s = draw(2.0, 5.0);
                let area = s * s;
                WorkedExample {
                    problem: format!("Side: {:.1} cm", s),
                    solution: format!("A = {:.1}² = {:.2} cm²", s, area),
                    steps: vec![
                        format!("Identify side = {:.1}", s),
                        "Apply A = s²".to_string(),
                        format!("Calculate: {:.1} × {:.1} = {:.2}", s, s, area),
                    ],
                }
            }
            Shape::Rectangle => {
                let (l, w) = (draw(3.0, 6.0), draw(2.0, 5.0));
                let area = l * w;
                WorkedExample {
                    problem: format!("{:.1} × {:.1} cm", l, w),
                    solution: format!("A = {:.2} cm²", area),
                    steps: vec![
                        format!("Identify l = {:.1}, w = {:.1}", l, w),
                        "Apply A = l × w".to_string(),
                        format!("Calculate: {:.1} × {:.1} = {:.2}", l, w, area),
                    ],
                }
            }
            Shape::Triangle => {
                let (b, h) = (draw(3.0, 6.0), draw(2.0, 5.0));
                let area = b * h / 2.0;
                WorkedExample {
                    problem: format!("Base {:.1}, height {:.1}", b, h),
                    solution: format!("A = {:.2} cm²", area),
                    steps: vec![
                        format!("Identify b = {:.1}, h = {:.1}", b, h),
                        "Apply A = ½bh".to_string(),
                        format!("Calculate: ½ × {:.1} × {:.1} = {:.2}", b, h, area),
                    ],
                }
            }
            Shape::Circle => {
                let r = draw(1.0, 4.0);
                let area = PI * r * r;
                WorkedExample {
                    problem: format!("Radius {:.1} cm", r),
                    solution: format!("A = {:.2} cm²", area),
                    steps: vec![
                        format!("Identify r = {:.1}", r),
                        "Apply A = πr²".to_string(),
                        format!("Calculate: 3.14159 × {:.1}² = {:.2}", r, area),
                    ],
                }
            }
        })
        .collect()
}

fn given(values: &[(&str, f64)]) -> BTreeMap<String, f64> {
    values
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

fn round_to(value: f64, decimal_places: u32) -> f64 {
    let factor = 10f64.powi(decimal_places as i32);
    (value * factor).round() / factor
}

fn fmt_num(value: f64, decimal_places: u32) -> String {
    format!("{:.*}", decimal_places as usize, value)
}
