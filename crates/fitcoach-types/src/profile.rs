//! User profile type.
//!
//! The profile captures the physiology and preferences that drive
//! workout generation, macro targets, and exercise substitution.

use serde::{Deserialize, Serialize};

/// Gender used by the BMR calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male
    Male,
    /// Female
    Female,
    /// Other / unspecified
    Other,
}

/// A user's fitness profile.
///
/// Value object: constructed once, replaced wholesale on update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique user identifier
    pub user_id: String,

    /// Age in years
    pub age: u32,

    /// Body weight in kilograms
    pub weight_kg: f64,

    /// Height in centimeters
    pub height_cm: f64,

    /// Gender for the BMR formula
    pub gender: Gender,

    /// Self-reported fitness level
    pub fitness_level: crate::exercise::Difficulty,

    /// Fitness goals, e.g. "build_muscle", "lose_weight", "endurance"
    #[serde(default)]
    pub goals: Vec<String>,

    /// Injuries to work around (muscle group names)
    #[serde(default)]
    pub injuries: Vec<String>,

    /// Equipment the user has access to
    #[serde(default)]
    pub equipment_available: Vec<String>,
}

impl UserProfile {
    /// Create a profile with the required physiology fields.
    pub fn new(
        user_id: String,
        age: u32,
        weight_kg: f64,
        height_cm: f64,
        gender: Gender,
        fitness_level: crate::exercise::Difficulty,
    ) -> Self {
        Self {
            user_id,
            age,
            weight_kg,
            height_cm,
            gender,
            fitness_level,
            goals: Vec::new(),
            injuries: Vec::new(),
            equipment_available: Vec::new(),
        }
    }

    /// Attach fitness goals.
    pub fn with_goals(mut self, goals: Vec<String>) -> Self {
        self.goals = goals;
        self
    }

    /// Attach injuries to work around.
    pub fn with_injuries(mut self, injuries: Vec<String>) -> Self {
        self.injuries = injuries;
        self
    }

    /// Attach the available equipment inventory.
    pub fn with_equipment(mut self, equipment: Vec<String>) -> Self {
        self.equipment_available = equipment;
        self
    }

    /// Body Mass Index derived from weight and height.
    pub fn bmi(&self) -> f64 {
        let height_m = self.height_cm / 100.0;
        self.weight_kg / (height_m * height_m)
    }
}
