//! Meal and nutrition plan types.

use serde::{Deserialize, Serialize};

/// Meal slot within a day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    /// Morning meal
    Breakfast,
    /// Midday meal
    Lunch,
    /// Evening meal
    Dinner,
    /// Anything between meals
    #[default]
    Snack,
}

impl MealType {
    /// Case-insensitive parse of a free-form label.
    pub fn parse_loose(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            "snack" => Some(MealType::Snack),
            _ => None,
        }
    }
}

/// A single meal with its macro breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    /// Meal name
    pub name: String,

    /// Slot within the day
    pub meal_type: MealType,

    /// Energy in kilocalories
    pub calories: u32,

    /// Protein in grams
    pub protein_g: f64,

    /// Carbohydrates in grams
    pub carbs_g: f64,

    /// Fats in grams
    pub fats_g: f64,

    /// Ingredient list
    #[serde(default)]
    pub ingredients: Vec<String>,

    /// Preparation instructions
    pub instructions: String,

    /// Preparation time in minutes
    pub prep_time_minutes: u32,
}

/// A daily nutrition plan.
///
/// The totals summarize the meals; `recompute_totals` is the single
/// place that derives them, so they can never drift from the meal
/// list they describe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionPlan {
    /// Unique plan identifier
    pub plan_id: String,

    /// Plan date as YYYY-MM-DD
    pub date: String,

    /// Ordered meal sequence
    #[serde(default)]
    pub meals: Vec<Meal>,

    /// Total calories across all meals
    pub total_calories: u32,

    /// Total protein in grams
    pub total_protein_g: f64,

    /// Total carbohydrates in grams
    pub total_carbs_g: f64,

    /// Total fats in grams
    pub total_fats_g: f64,

    /// Free-form notes about the plan
    #[serde(default)]
    pub notes: Option<String>,
}

impl NutritionPlan {
    /// Recompute the daily totals from the meal list.
    ///
    /// Gram totals are rounded to one decimal place.
    pub fn recompute_totals(&mut self) {
        self.total_calories = self.meals.iter().map(|m| m.calories).sum();
        self.total_protein_g = round1(self.meals.iter().map(|m| m.protein_g).sum());
        self.total_carbs_g = round1(self.meals.iter().map(|m| m.carbs_g).sum());
        self.total_fats_g = round1(self.meals.iter().map(|m| m.fats_g).sum());
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal(name: &str, calories: u32, protein: f64, carbs: f64, fats: f64) -> Meal {
        Meal {
            name: name.to_string(),
            meal_type: MealType::Lunch,
            calories,
            protein_g: protein,
            carbs_g: carbs,
            fats_g: fats,
            ingredients: vec!["chicken".to_string(), "rice".to_string()],
            instructions: "Combine and serve.".to_string(),
            prep_time_minutes: 15,
        }
    }

    #[test]
    fn test_meal_type_parse_loose() {
        assert_eq!(MealType::parse_loose("Breakfast"), Some(MealType::Breakfast));
        assert_eq!(MealType::parse_loose(" DINNER "), Some(MealType::Dinner));
        assert_eq!(MealType::parse_loose("brunch"), None);
    }

    #[test]
    fn test_recompute_totals_sums_meals() {
        let mut plan = NutritionPlan {
            plan_id: "plan_0001".to_string(),
            date: "2025-06-01".to_string(),
            meals: vec![
                meal("Oats", 400, 20.0, 60.0, 10.0),
                meal("Chicken bowl", 700, 45.5, 80.0, 18.2),
            ],
            total_calories: 9999,
            total_protein_g: 0.0,
            total_carbs_g: 0.0,
            total_fats_g: 0.0,
            notes: None,
        };

        plan.recompute_totals();

        assert_eq!(plan.total_calories, 1100);
        assert!((plan.total_protein_g - 65.5).abs() < 0.001);
        assert!((plan.total_carbs_g - 140.0).abs() < 0.001);
        assert!((plan.total_fats_g - 28.2).abs() < 0.001);
    }

    #[test]
    fn test_recompute_totals_rounds_to_one_decimal() {
        let mut plan = NutritionPlan {
            plan_id: "plan_0002".to_string(),
            date: "2025-06-01".to_string(),
            meals: vec![
                meal("A", 100, 10.333, 5.111, 1.055),
                meal("B", 100, 10.333, 5.111, 1.055),
            ],
            total_calories: 0,
            total_protein_g: 0.0,
            total_carbs_g: 0.0,
            total_fats_g: 0.0,
            notes: None,
        };

        plan.recompute_totals();

        assert!((plan.total_protein_g - 20.7).abs() < 0.001);
        assert!((plan.total_carbs_g - 10.2).abs() < 0.001);
        assert!((plan.total_fats_g - 2.1).abs() < 0.001);
    }

    #[test]
    fn test_plan_serialization_round_trip() {
        let mut plan = NutritionPlan {
            plan_id: "plan_0003".to_string(),
            date: "2025-06-02".to_string(),
            meals: vec![meal("Eggs", 300, 24.0, 2.0, 20.0)],
            total_calories: 0,
            total_protein_g: 0.0,
            total_carbs_g: 0.0,
            total_fats_g: 0.0,
            notes: Some("High protein day".to_string()),
        };
        plan.recompute_totals();

        let json = serde_json::to_string(&plan).unwrap();
        let decoded: NutritionPlan = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.total_calories, 300);
        assert_eq!(decoded.meals.len(), 1);
        assert_eq!(decoded.notes.as_deref(), Some("High protein day"));
    }
}
