// src/models/attributes.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel used for any value outside an attribute's vocabulary.
pub const UNKNOWN_VALUE: &str = "unknown";
const UNKNOWN_LABEL: &str = "不明";

/// A closed categorical vocabulary with an explicit `Unknown` member.
///
/// `ALL` fixes the order of the one-hot slots, so it must never be reordered
/// once vectors have been produced with it.
pub trait Category: Copy + Eq + fmt::Debug + Sized + 'static {
    /// The post attribute this vocabulary belongs to.
    const FIELD: AttributeField;
    /// Every member in one-hot slot order, `Unknown` last.
    const ALL: &'static [Self];
    const UNKNOWN: Self;

    /// Machine value as it appears in raw records.
    fn as_str(&self) -> &'static str;

    /// Japanese display label forwarded to the labeling step.
    fn label(&self) -> &'static str;

    fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|c| c == self)
            .unwrap_or(Self::ALL.len() - 1)
    }

    fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }

    /// Case-insensitive exact match. Null, empty and unrecognised values map to `Unknown`.
    fn normalize(value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Self::ALL
                .iter()
                .copied()
                .find(|c| c.as_str().eq_ignore_ascii_case(v))
                .unwrap_or(Self::UNKNOWN),
            _ => Self::UNKNOWN,
        }
    }
}

macro_rules! category_enum {
    (
        $(#[$meta:meta])*
        $name:ident for $field:ident {
            $($variant:ident => ($key:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $key)]
                $variant,
            )+
            #[serde(rename = "unknown")]
            Unknown,
        }

        impl Category for $name {
            const FIELD: AttributeField = AttributeField::$field;
            const ALL: &'static [Self] = &[$(Self::$variant,)+ Self::Unknown];
            const UNKNOWN: Self = Self::Unknown;

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $key,)+
                    Self::Unknown => UNKNOWN_VALUE,
                }
            }

            fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                    Self::Unknown => UNKNOWN_LABEL,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::Unknown
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

category_enum! {
    /// Household situation of the poster.
    LifeStage for LifeStage {
        Single => ("single", "一人暮らし"),
        Couple => ("couple", "夫婦二人"),
        ChildRaising => ("child_raising", "子育て世帯"),
        EmptyNest => ("empty_nest", "子ども独立後"),
        Senior => ("senior", "シニア世帯"),
    }
}

category_enum! {
    CookingSkill for CookingSkill {
        Beginner => ("beginner", "初級"),
        Intermediate => ("intermediate", "中級"),
        Advanced => ("advanced", "上級"),
    }
}

category_enum! {
    /// Why the poster is cooking.
    Motivation for MotivationCategory {
        TimePressure => ("time_pressure", "時短・効率化"),
        TasteAssurance => ("taste_assurance", "味の確実性"),
        VarietySeeking => ("variety_seeking", "バリエーション"),
        SkillConfidence => ("skill_confidence", "自信がない"),
        CostSaving => ("cost_saving", "節約"),
        HealthConcern => ("health_concern", "健康志向"),
        ComfortFood => ("comfort_food", "定番の味"),
        Impression => ("impression", "誰かを喜ばせる"),
    }
}

category_enum! {
    MealOccasion for MealOccasion {
        WeekdayDinnerRush => ("weekday_dinner_rush", "平日夕食（急ぎ）"),
        WeekdayDinnerLeisurely => ("weekday_dinner_leisurely", "平日夕食（ゆっくり）"),
        WeekendBrunch => ("weekend_brunch", "週末ブランチ"),
        WeekendDinner => ("weekend_dinner", "週末夕食"),
        LunchBox => ("lunch_box", "お弁当"),
        LateNightSnack => ("late_night_snack", "夜食・晩酌"),
        Breakfast => ("breakfast", "朝食"),
        Party => ("party", "おもてなし"),
    }
}

category_enum! {
    /// Who the meal is for.
    CookingFor for CookingFor {
        Myself => ("self", "自分"),
        Family => ("family", "家族"),
        Kids => ("kids", "子ども"),
        Spouse => ("spouse", "配偶者"),
        Parents => ("parents", "親"),
        Guest => ("guest", "来客"),
        Multiple => ("multiple", "複数"),
    }
}

category_enum! {
    Emotion for Emotion {
        Anxiety => ("anxiety", "不安"),
        Relief => ("relief", "安心"),
        Satisfaction => ("satisfaction", "満足"),
        Guilt => ("guilt", "罪悪感"),
        Excitement => ("excitement", "ワクワク"),
        Frustration => ("frustration", "イライラ"),
        Neutral => ("neutral", "中立"),
    }
}

/// Length of an encoded feature vector: one slot per category across all six attributes.
pub const FEATURE_DIMENSIONS: usize = LifeStage::ALL.len()
    + CookingSkill::ALL.len()
    + Motivation::ALL.len()
    + MealOccasion::ALL.len()
    + CookingFor::ALL.len()
    + Emotion::ALL.len();

/// The six categorical post attributes, in vector block order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeField {
    LifeStage,
    CookingSkill,
    MotivationCategory,
    MealOccasion,
    CookingFor,
    Emotion,
}

impl AttributeField {
    pub const ALL: [AttributeField; 6] = [
        AttributeField::LifeStage,
        AttributeField::CookingSkill,
        AttributeField::MotivationCategory,
        AttributeField::MealOccasion,
        AttributeField::CookingFor,
        AttributeField::Emotion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeField::LifeStage => "life_stage",
            AttributeField::CookingSkill => "cooking_skill",
            AttributeField::MotivationCategory => "motivation_category",
            AttributeField::MealOccasion => "meal_occasion",
            AttributeField::CookingFor => "cooking_for",
            AttributeField::Emotion => "emotion",
        }
    }

    /// Block position within the six attributes.
    pub fn position(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    /// Number of one-hot slots in this attribute's block, `unknown` included.
    pub fn cardinality(&self) -> usize {
        match self {
            AttributeField::LifeStage => LifeStage::ALL.len(),
            AttributeField::CookingSkill => CookingSkill::ALL.len(),
            AttributeField::MotivationCategory => Motivation::ALL.len(),
            AttributeField::MealOccasion => MealOccasion::ALL.len(),
            AttributeField::CookingFor => CookingFor::ALL.len(),
            AttributeField::Emotion => Emotion::ALL.len(),
        }
    }

    /// Index of the first slot of this attribute's block in an encoded vector.
    pub fn offset(&self) -> usize {
        Self::ALL[..self.position()]
            .iter()
            .map(|f| f.cardinality())
            .sum()
    }

    /// Machine value of the category at `index`, `unknown` when out of range.
    pub fn category_at(&self, index: usize) -> &'static str {
        fn lookup<C: Category>(index: usize) -> &'static str {
            C::ALL.get(index).map(|c| c.as_str()).unwrap_or(UNKNOWN_VALUE)
        }
        match self {
            AttributeField::LifeStage => lookup::<LifeStage>(index),
            AttributeField::CookingSkill => lookup::<CookingSkill>(index),
            AttributeField::MotivationCategory => lookup::<Motivation>(index),
            AttributeField::MealOccasion => lookup::<MealOccasion>(index),
            AttributeField::CookingFor => lookup::<CookingFor>(index),
            AttributeField::Emotion => lookup::<Emotion>(index),
        }
    }

    /// Machine values of this attribute's vocabulary in slot order.
    pub fn categories(&self) -> Vec<&'static str> {
        (0..self.cardinality()).map(|i| self.category_at(i)).collect()
    }

    /// Japanese display label for a normalized value. Unrecognised values are returned unchanged.
    pub fn display_label<'a>(&self, value: &'a str) -> &'a str {
        fn lookup<'a, C: Category>(value: &'a str) -> &'a str {
            C::ALL
                .iter()
                .find(|c| c.as_str() == value)
                .map(|c| c.label())
                .unwrap_or(value)
        }
        match self {
            AttributeField::LifeStage => lookup::<LifeStage>(value),
            AttributeField::CookingSkill => lookup::<CookingSkill>(value),
            AttributeField::MotivationCategory => lookup::<Motivation>(value),
            AttributeField::MealOccasion => lookup::<MealOccasion>(value),
            AttributeField::CookingFor => lookup::<CookingFor>(value),
            AttributeField::Emotion => lookup::<Emotion>(value),
        }
    }
}

impl fmt::Display for AttributeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The six normalized attributes of one post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSet {
    pub life_stage: LifeStage,
    pub cooking_skill: CookingSkill,
    pub motivation_category: Motivation,
    pub meal_occasion: MealOccasion,
    pub cooking_for: CookingFor,
    pub emotion: Emotion,
}

impl AttributeSet {
    /// Slot index of the field's value within its own block.
    pub fn index_of(&self, field: AttributeField) -> usize {
        match field {
            AttributeField::LifeStage => self.life_stage.index(),
            AttributeField::CookingSkill => self.cooking_skill.index(),
            AttributeField::MotivationCategory => self.motivation_category.index(),
            AttributeField::MealOccasion => self.meal_occasion.index(),
            AttributeField::CookingFor => self.cooking_for.index(),
            AttributeField::Emotion => self.emotion.index(),
        }
    }

    pub fn value_of(&self, field: AttributeField) -> &'static str {
        field.category_at(self.index_of(field))
    }

    pub fn is_unknown(&self, field: AttributeField) -> bool {
        self.index_of(field) == field.cardinality() - 1
    }

    pub fn unknown_count(&self) -> usize {
        AttributeField::ALL
            .iter()
            .filter(|f| self.is_unknown(**f))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_dimensions() {
        assert_eq!(FEATURE_DIMENSIONS, 44);
        let summed: usize = AttributeField::ALL.iter().map(|f| f.cardinality()).sum();
        assert_eq!(summed, FEATURE_DIMENSIONS);
    }

    #[test]
    fn test_block_offsets_are_contiguous() {
        assert_eq!(AttributeField::LifeStage.offset(), 0);
        assert_eq!(AttributeField::CookingSkill.offset(), 6);
        assert_eq!(AttributeField::MotivationCategory.offset(), 10);
        assert_eq!(AttributeField::MealOccasion.offset(), 19);
        assert_eq!(AttributeField::CookingFor.offset(), 28);
        assert_eq!(AttributeField::Emotion.offset(), 36);
    }

    #[test]
    fn test_unknown_is_last_slot() {
        for field in AttributeField::ALL {
            let categories = field.categories();
            assert_eq!(categories.last().copied(), Some(UNKNOWN_VALUE));
        }
    }

    #[test]
    fn test_normalize_is_case_insensitive() {
        assert_eq!(LifeStage::normalize(Some("Child_Raising")), LifeStage::ChildRaising);
        assert_eq!(CookingFor::normalize(Some("SELF")), CookingFor::Myself);
        assert_eq!(Emotion::normalize(Some("neutral")), Emotion::Neutral);
    }

    #[test]
    fn test_normalize_falls_back_to_unknown() {
        assert_eq!(LifeStage::normalize(None), LifeStage::Unknown);
        assert_eq!(LifeStage::normalize(Some("")), LifeStage::Unknown);
        assert_eq!(LifeStage::normalize(Some("toddler")), LifeStage::Unknown);
        // No trimming: the match is exact apart from case.
        assert_eq!(CookingSkill::normalize(Some(" beginner")), CookingSkill::Unknown);
    }

    #[test]
    fn test_serde_uses_machine_values() {
        let json = serde_json::to_string(&CookingFor::Myself).unwrap();
        assert_eq!(json, "\"self\"");
        let parsed: Motivation = serde_json::from_str("\"time_pressure\"").unwrap();
        assert_eq!(parsed, Motivation::TimePressure);
        let field = serde_json::to_string(&AttributeField::MotivationCategory).unwrap();
        assert_eq!(field, "\"motivation_category\"");
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(AttributeField::LifeStage.display_label("child_raising"), "子育て世帯");
        assert_eq!(AttributeField::Emotion.display_label("unknown"), "不明");
        assert_eq!(AttributeField::Emotion.display_label("bogus"), "bogus");
    }

    #[test]
    fn test_attribute_set_unknown_count() {
        let mut set = AttributeSet::default();
        assert_eq!(set.unknown_count(), 6);
        set.cooking_skill = CookingSkill::Advanced;
        set.emotion = Emotion::Relief;
        assert_eq!(set.unknown_count(), 4);
        assert_eq!(set.value_of(AttributeField::CookingSkill), "advanced");
        assert!(set.is_unknown(AttributeField::LifeStage));
    }
}
