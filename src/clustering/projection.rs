// src/clustering/projection.rs
//! Placement of clusters on the two-axis persona map.
//!
//! The score tables and weights encode marketing judgement rather than a
//! fitted model. They are plain data in `ProjectionConfig` so they can be
//! tuned without touching `centroid_to_position`.

use rand::Rng;

use crate::encoding::decode_centroid;
use crate::models::{
    AttributeField, Category, CookingFor, CookingSkill, Emotion, LifeStage, MealOccasion,
    Motivation, Position,
};

pub const DEFAULT_AMPLIFICATION: f64 = 2.5;
/// Half-width of the uniform jitter added to each coordinate.
pub const DEFAULT_JITTER: f64 = 0.15;
pub const AXIS_BOUND: f64 = 2.0;

// X axis: time & effort investment
pub const X_WEIGHT_COOKING_SKILL: f64 = 0.35;
pub const X_WEIGHT_MEAL_OCCASION: f64 = 0.35;
pub const X_WEIGHT_MOTIVATION: f64 = 0.20;
pub const X_WEIGHT_EMOTION: f64 = 0.10;

// Y axis: psychological engagement
pub const Y_WEIGHT_MOTIVATION: f64 = 0.35;
pub const Y_WEIGHT_COOKING_FOR: f64 = 0.30;
pub const Y_WEIGHT_LIFE_STAGE: f64 = 0.20;
pub const Y_WEIGHT_EMOTION: f64 = 0.15;

pub const SKILL_EFFORT: &[(CookingSkill, f64)] = &[
    (CookingSkill::Beginner, -1.0),
    (CookingSkill::Intermediate, 0.0),
    (CookingSkill::Advanced, 1.0),
];

pub const OCCASION_EFFORT: &[(MealOccasion, f64)] = &[
    (MealOccasion::WeekdayDinnerRush, -1.0),
    (MealOccasion::Breakfast, -0.8),
    (MealOccasion::LunchBox, -0.5),
    (MealOccasion::LateNightSnack, -0.3),
    (MealOccasion::WeekdayDinnerLeisurely, 0.3),
    (MealOccasion::WeekendBrunch, 0.5),
    (MealOccasion::WeekendDinner, 0.7),
    (MealOccasion::Party, 1.0),
];

pub const MOTIVATION_EFFORT: &[(Motivation, f64)] = &[
    (Motivation::TimePressure, -0.8),
    (Motivation::CostSaving, -0.5),
    (Motivation::SkillConfidence, -0.3),
    (Motivation::ComfortFood, 0.0),
    (Motivation::TasteAssurance, 0.2),
    (Motivation::HealthConcern, 0.3),
    (Motivation::VarietySeeking, 0.6),
    (Motivation::Impression, 0.8),
];

pub const EMOTION_EFFORT: &[(Emotion, f64)] = &[
    (Emotion::Frustration, -0.5),
    (Emotion::Anxiety, -0.4),
    (Emotion::Guilt, -0.2),
    (Emotion::Neutral, 0.0),
    (Emotion::Relief, 0.2),
    (Emotion::Satisfaction, 0.4),
    (Emotion::Excitement, 0.5),
];

pub const MOTIVATION_ENGAGEMENT: &[(Motivation, f64)] = &[
    (Motivation::TimePressure, -0.8),
    (Motivation::CostSaving, -0.4),
    (Motivation::SkillConfidence, -0.2),
    (Motivation::ComfortFood, 0.1),
    (Motivation::HealthConcern, 0.3),
    (Motivation::TasteAssurance, 0.4),
    (Motivation::VarietySeeking, 0.7),
    (Motivation::Impression, 1.0),
];

pub const COOKING_FOR_ENGAGEMENT: &[(CookingFor, f64)] = &[
    (CookingFor::Myself, -0.5),
    (CookingFor::Multiple, 0.2),
    (CookingFor::Family, 0.3),
    (CookingFor::Spouse, 0.4),
    (CookingFor::Kids, 0.5),
    (CookingFor::Parents, 0.6),
    (CookingFor::Guest, 1.0),
];

pub const LIFE_STAGE_ENGAGEMENT: &[(LifeStage, f64)] = &[
    (LifeStage::Single, -0.3),
    (LifeStage::Couple, 0.2),
    (LifeStage::EmptyNest, 0.3),
    (LifeStage::Senior, 0.3),
    (LifeStage::ChildRaising, 0.5),
];

pub const EMOTION_ENGAGEMENT: &[(Emotion, f64)] = &[
    (Emotion::Frustration, -0.5),
    (Emotion::Guilt, -0.3),
    (Emotion::Anxiety, -0.2),
    (Emotion::Neutral, 0.0),
    (Emotion::Relief, 0.3),
    (Emotion::Satisfaction, 0.6),
    (Emotion::Excitement, 0.8),
];

/// One weighted attribute contribution to an axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTerm {
    pub field: AttributeField,
    pub weight: f64,
    /// Score per category slot; categories absent from the table score 0.
    scores: Vec<f64>,
}

impl AxisTerm {
    pub fn new<C: Category>(weight: f64, table: &[(C, f64)]) -> Self {
        let mut scores = vec![0.0; C::ALL.len()];
        for (category, score) in table {
            scores[category.index()] = *score;
        }
        Self {
            field: C::FIELD,
            weight,
            scores,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn score(&self, category_index: usize) -> f64 {
        self.scores.get(category_index).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionConfig {
    pub x_axis: Vec<AxisTerm>,
    pub y_axis: Vec<AxisTerm>,
    pub amplification: f64,
    /// Half-width of the uniform jitter; 0 disables it.
    pub jitter: f64,
    pub bound: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            x_axis: vec![
                AxisTerm::new(X_WEIGHT_COOKING_SKILL, SKILL_EFFORT),
                AxisTerm::new(X_WEIGHT_MEAL_OCCASION, OCCASION_EFFORT),
                AxisTerm::new(X_WEIGHT_MOTIVATION, MOTIVATION_EFFORT),
                AxisTerm::new(X_WEIGHT_EMOTION, EMOTION_EFFORT),
            ],
            y_axis: vec![
                AxisTerm::new(Y_WEIGHT_MOTIVATION, MOTIVATION_ENGAGEMENT),
                AxisTerm::new(Y_WEIGHT_COOKING_FOR, COOKING_FOR_ENGAGEMENT),
                AxisTerm::new(Y_WEIGHT_LIFE_STAGE, LIFE_STAGE_ENGAGEMENT),
                AxisTerm::new(Y_WEIGHT_EMOTION, EMOTION_ENGAGEMENT),
            ],
            amplification: DEFAULT_AMPLIFICATION,
            jitter: DEFAULT_JITTER,
            bound: AXIS_BOUND,
        }
    }
}

impl ProjectionConfig {
    pub fn without_jitter(mut self) -> Self {
        self.jitter = 0.0;
        self
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn axis_score(terms: &[AxisTerm], category_index: impl Fn(AttributeField) -> usize) -> f64 {
    terms
        .iter()
        .map(|term| term.score(category_index(term.field)) * term.weight)
        .sum()
}

/// Project a centroid onto the persona map.
///
/// The centroid is decoded to its strongest category per attribute, scored
/// per axis, amplified and clamped. Jitter from `rng` keeps clusters with the
/// same decoded profile from landing on the same point.
pub fn centroid_to_position<R: Rng + ?Sized>(
    centroid: &[f64],
    config: &ProjectionConfig,
    rng: &mut R,
) -> Position {
    let decoded = decode_centroid(centroid);
    let category_index = |field: AttributeField| decoded.get(field).index;

    let bound = if config.bound.is_finite() {
        config.bound.abs()
    } else {
        AXIS_BOUND
    };
    let amplification = if config.amplification.is_finite() {
        config.amplification
    } else {
        DEFAULT_AMPLIFICATION
    };
    let x = (axis_score(&config.x_axis, category_index) * amplification).clamp(-bound, bound);
    let y = (axis_score(&config.y_axis, category_index) * amplification).clamp(-bound, bound);

    // Non-finite or non-positive jitter disables it.
    let (jitter_x, jitter_y) = if config.jitter.is_finite() && config.jitter > 0.0 {
        (
            config.jitter * (2.0 * rng.gen::<f64>() - 1.0),
            config.jitter * (2.0 * rng.gen::<f64>() - 1.0),
        )
    } else {
        (0.0, 0.0)
    };

    Position {
        x: round2((x + jitter_x).clamp(-bound, bound)),
        y: round2((y + jitter_y).clamp(-bound, bound)),
    }
}
