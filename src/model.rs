use serde::{Deserialize, Serialize};
use std::fmt;

/// Recipe difficulty, either read from an AI response or derived from total time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Advanced,
}

impl Difficulty {
    /// Classify a recipe by its total (prep + cook) minutes.
    pub fn from_total_minutes(total_minutes: u32) -> Self {
        if total_minutes <= 20 {
            Difficulty::Easy
        } else if total_minutes <= 45 {
            Difficulty::Medium
        } else {
            Difficulty::Advanced
        }
    }

    /// Parse a difficulty label. "Hard" is accepted as an alias of `Advanced`
    /// because the generation prompt offers it.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "advanced" | "hard" => Some(Difficulty::Advanced),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    /// 1-based position in the source order
    pub step_number: u32,
    pub text: String,
    pub timer_minutes: Option<u32>,
}

/// Per-serving nutrition estimate. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionInfo {
    pub protein: Option<f64>,
    pub carbohydrates: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub sodium: Option<f64>,
    pub saturated_fat: Option<f64>,
    pub cholesterol: Option<f64>,
    pub sugar: Option<f64>,
}

impl NutritionInfo {
    pub fn is_empty(&self) -> bool {
        *self == NutritionInfo::default()
    }
}

/// The single output type of every pipeline branch.
///
/// A record is only ever built at the end of a successful branch and handed
/// to the caller by value; persistence collaborators assign their own
/// identity and timestamps when they store it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecipe {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<Instruction>,
    pub prep_time_minutes: u32,
    pub cook_time_minutes: u32,
    pub servings: u32,
    pub difficulty: Difficulty,
    pub categories: Vec<String>,
    pub cuisine_types: Vec<String>,
    pub dietary_info: Vec<String>,
    pub nutrition: Option<NutritionInfo>,
    pub calories: Option<u32>,
}

impl NormalizedRecipe {
    pub fn total_time_minutes(&self) -> u32 {
        self.prep_time_minutes.saturating_add(self.cook_time_minutes)
    }

    /// Total time as shown in recipe cards: "1h 5m", "2h" or "45m".
    pub fn formatted_total_time(&self) -> String {
        let total = self.total_time_minutes();
        let hours = total / 60;
        let minutes = total % 60;
        match (hours, minutes) {
            (0, m) => format!("{m}m"),
            (h, 0) => format!("{h}h"),
            (h, m) => format!("{h}h {m}m"),
        }
    }
}

/// Number instruction texts by their position, starting at 1.
pub(crate) fn number_steps<I>(texts: I) -> Vec<Instruction>
where
    I: IntoIterator<Item = String>,
{
    texts
        .into_iter()
        .enumerate()
        .map(|(index, text)| Instruction {
            step_number: index as u32 + 1,
            text,
            timer_minutes: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe_with_times(prep: u32, cook: u32) -> NormalizedRecipe {
        NormalizedRecipe {
            title: "Soup".to_string(),
            description: String::new(),
            ingredients: vec![],
            instructions: vec![],
            prep_time_minutes: prep,
            cook_time_minutes: cook,
            servings: 4,
            difficulty: Difficulty::Medium,
            categories: vec![],
            cuisine_types: vec![],
            dietary_info: vec![],
            nutrition: None,
            calories: None,
        }
    }

    #[test]
    fn test_formatted_total_time() {
        assert_eq!(recipe_with_times(10, 35).formatted_total_time(), "45m");
        assert_eq!(recipe_with_times(30, 90).formatted_total_time(), "2h");
        assert_eq!(recipe_with_times(20, 45).formatted_total_time(), "1h 5m");
        assert_eq!(recipe_with_times(0, 0).formatted_total_time(), "0m");
    }

    #[test]
    fn test_difficulty_labels() {
        assert_eq!(Difficulty::from_label("easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_label(" Medium "), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_label("Hard"), Some(Difficulty::Advanced));
        assert_eq!(Difficulty::from_label("ADVANCED"), Some(Difficulty::Advanced));
        assert_eq!(Difficulty::from_label("tricky"), None);
        assert_eq!(Difficulty::Advanced.to_string(), "Advanced");
    }

    #[test]
    fn test_number_steps_starts_at_one() {
        let steps = number_steps(vec!["Boil".to_string(), "Steep".to_string()]);
        assert_eq!(steps[0].step_number, 1);
        assert_eq!(steps[1].step_number, 2);
        assert_eq!(steps[1].text, "Steep");
        assert!(steps.iter().all(|s| s.timer_minutes.is_none()));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(recipe_with_times(5, 10)).unwrap();
        assert_eq!(json["prepTimeMinutes"], 5);
        assert_eq!(json["cookTimeMinutes"], 10);
        assert_eq!(json["difficulty"], "Medium");
        assert!(json["nutrition"].is_null());
    }
}
