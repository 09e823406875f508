//! Daily macro nutrient targets derived from a user profile.
//!
//! BMR comes from the Mifflin-St Jeor equation, scaled by an activity
//! multiplier keyed on fitness level, then adjusted for the user's
//! goals (surplus for muscle gain, deficit for weight loss).

use serde::{Deserialize, Serialize};

use crate::exercise::Difficulty;
use crate::profile::{Gender, UserProfile};

/// Daily calorie and macro targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroTargets {
    /// Target calories per day (kcal)
    pub calories: u32,

    /// Target protein per day (grams)
    pub protein_g: f64,

    /// Target carbohydrates per day (grams)
    pub carbs_g: f64,

    /// Target fats per day (grams)
    pub fats_g: f64,
}

impl MacroTargets {
    /// Compute targets for a profile.
    pub fn for_profile(profile: &UserProfile) -> Self {
        let bmr = match profile.gender {
            Gender::Male => {
                10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * profile.age as f64
                    + 5.0
            }
            _ => {
                10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * profile.age as f64
                    - 161.0
            }
        };

        let activity = match profile.fitness_level {
            Difficulty::Beginner => 1.375,
            Difficulty::Intermediate => 1.55,
            Difficulty::Advanced => 1.725,
        };
        let tdee = bmr * activity;

        let goals: Vec<String> = profile.goals.iter().map(|g| g.to_lowercase()).collect();
        let (target_calories, protein_g) = if goals.iter().any(|g| g == "build_muscle")
            || goals.iter().any(|g| g == "gain_weight")
        {
            (tdee * 1.15, profile.weight_kg * 2.0)
        } else if goals.iter().any(|g| g == "lose_weight") || goals.iter().any(|g| g == "cut") {
            (tdee * 0.8, profile.weight_kg * 1.8)
        } else {
            (tdee, profile.weight_kg * 1.6)
        };

        // Fats at 27.5% of calories (9 kcal/g), carbs from the remainder (4 kcal/g).
        let fats_g = (target_calories * 0.275) / 9.0;
        let remaining = target_calories - (protein_g * 4.0 + fats_g * 9.0);
        let carbs_g = remaining / 4.0;

        Self {
            calories: target_calories.round() as u32,
            protein_g: round1(protein_g),
            carbs_g: round1(carbs_g),
            fats_g: round1(fats_g),
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
