//! Compact history entries derived from full records.
//!
//! History keeps summaries rather than whole plans so the state file
//! stays small regardless of how detailed the generated plans are.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fitcoach_types::{NutritionPlan, Workout};

/// What history remembers about a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub workout_id: String,
    pub title: String,
    pub duration_minutes: u32,
    pub calories_estimate: u32,
    pub target_muscles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Workout> for WorkoutSummary {
    fn from(workout: &Workout) -> Self {
        Self {
            workout_id: workout.workout_id.clone(),
            title: workout.title.clone(),
            duration_minutes: workout.duration_minutes,
            calories_estimate: workout.calories_estimate,
            target_muscles: workout.target_muscles.clone(),
            created_at: workout.created_at,
        }
    }
}

/// What history remembers about a nutrition plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanSummary {
    pub plan_id: String,
    pub date: String,
    pub total_calories: u32,
    pub meal_names: Vec<String>,
}

impl From<&NutritionPlan> for MealPlanSummary {
    fn from(plan: &NutritionPlan) -> Self {
        Self {
            plan_id: plan.plan_id.clone(),
            date: plan.date.clone(),
            total_calories: plan.total_calories,
            meal_names: plan.meals.iter().map(|meal| meal.name.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitcoach_types::{Difficulty, Meal, MealType};

    #[test]
    fn test_workout_summary_fields() {
        let workout = Workout {
            workout_id: "workout_01".to_string(),
            title: "Pull Day".to_string(),
            duration_minutes: 50,
            exercises: Vec::new(),
            warmup: "rowing".to_string(),
            cooldown: "stretching".to_string(),
            difficulty: Difficulty::Intermediate,
            target_muscles: vec!["back".to_string(), "biceps".to_string()],
            calories_estimate: 385,
            created_at: Utc::now(),
        };

        let summary = WorkoutSummary::from(&workout);
        assert_eq!(summary.workout_id, "workout_01");
        assert_eq!(summary.title, "Pull Day");
        assert_eq!(summary.calories_estimate, 385);
        assert_eq!(summary.target_muscles.len(), 2);
    }

    #[test]
    fn test_meal_plan_summary_collects_meal_names() {
        let meal = |name: &str| Meal {
            name: name.to_string(),
            meal_type: MealType::Lunch,
            calories: 500,
            protein_g: 30.0,
            carbs_g: 50.0,
            fats_g: 15.0,
            ingredients: Vec::new(),
            instructions: String::new(),
            prep_time_minutes: 10,
        };

        let mut plan = NutritionPlan {
            plan_id: "plan_01".to_string(),
            date: "2025-04-01".to_string(),
            meals: vec![meal("Omelette"), meal("Chicken Bowl")],
            total_calories: 0,
            total_protein_g: 0.0,
            total_carbs_g: 0.0,
            total_fats_g: 0.0,
            notes: None,
        };
        plan.recompute_totals();

        let summary = MealPlanSummary::from(&plan);
        assert_eq!(summary.total_calories, 1000);
        assert_eq!(summary.meal_names, vec!["Omelette", "Chicken Bowl"]);
    }
}
