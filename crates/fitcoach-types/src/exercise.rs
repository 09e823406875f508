//! Exercise and workout types.
//!
//! Exercises are the unit of both workout plans and the similarity
//! index; workouts are the parsed output of the workout generation
//! flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Difficulty level for exercises and workouts.
///
/// Closed set: anything outside it is replaced with a configured
/// default during parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// New to training
    Beginner,
    /// Comfortable with common movements
    #[default]
    Intermediate,
    /// Experienced, handles high intensity
    Advanced,
}

impl Difficulty {
    /// Case-insensitive parse of a free-form label.
    ///
    /// Returns `None` for anything outside the closed set so callers
    /// can substitute their configured default.
    pub fn parse_loose(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "beginner"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Advanced => write!(f, "advanced"),
        }
    }
}

/// A single exercise with prescription and coaching text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    /// Exercise name, e.g. "Barbell Squat"
    pub name: String,

    /// Muscle groups worked, e.g. ["chest", "triceps"]
    #[serde(default)]
    pub muscle_groups: Vec<String>,

    /// Equipment required; empty means bodyweight
    #[serde(default)]
    pub equipment: Vec<String>,

    /// Difficulty level
    pub difficulty: Difficulty,

    /// Number of sets (kept within 1..=10)
    pub sets: u32,

    /// Rep prescription, free-form ("8-12", "30 seconds")
    pub reps: String,

    /// Rest between sets in seconds
    pub rest_seconds: u32,

    /// How to perform the exercise
    pub instructions: String,

    /// Safety notes, when available
    #[serde(default)]
    pub safety_tips: Option<String>,
}

/// A complete workout plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    /// Unique workout identifier
    pub workout_id: String,

    /// Workout title
    pub title: String,

    /// Planned duration in minutes
    pub duration_minutes: u32,

    /// Ordered exercise sequence; empty is a valid (rest-day) plan
    #[serde(default)]
    pub exercises: Vec<Exercise>,

    /// Warm-up routine text
    pub warmup: String,

    /// Cool-down routine text
    pub cooldown: String,

    /// Overall difficulty
    pub difficulty: Difficulty,

    /// Muscle groups the workout targets
    #[serde(default)]
    pub target_muscles: Vec<String>,

    /// Estimated calorie burn
    pub calories_estimate: u32,

    /// When the workout was created
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parse_loose_case_insensitive() {
        assert_eq!(
            Difficulty::parse_loose("BEGINNER"),
            Some(Difficulty::Beginner)
        );
        assert_eq!(
            Difficulty::parse_loose("  Advanced "),
            Some(Difficulty::Advanced)
        );
        assert_eq!(
            Difficulty::parse_loose("intermediate"),
            Some(Difficulty::Intermediate)
        );
    }

    #[test]
    fn test_difficulty_parse_loose_rejects_unknown() {
        assert_eq!(Difficulty::parse_loose("EXPERT"), None);
        assert_eq!(Difficulty::parse_loose(""), None);
        assert_eq!(Difficulty::parse_loose("easy"), None);
    }

    #[test]
    fn test_difficulty_serde_lowercase() {
        let json = serde_json::to_string(&Difficulty::Advanced).unwrap();
        assert_eq!(json, "\"advanced\"");

        let decoded: Difficulty = serde_json::from_str("\"beginner\"").unwrap();
        assert_eq!(decoded, Difficulty::Beginner);
    }

    #[test]
    fn test_difficulty_default_is_intermediate() {
        assert_eq!(Difficulty::default(), Difficulty::Intermediate);
    }

    #[test]
    fn test_exercise_deserialization_defaults() {
        let json = r#"{
            "name": "Push-Up",
            "difficulty": "beginner",
            "sets": 3,
            "reps": "12",
            "rest_seconds": 45,
            "instructions": "Lower until chest nearly touches the floor."
        }"#;
        let exercise: Exercise = serde_json::from_str(json).unwrap();

        assert!(exercise.muscle_groups.is_empty());
        assert!(exercise.equipment.is_empty());
        assert!(exercise.safety_tips.is_none());
    }

    #[test]
    fn test_workout_round_trip() {
        let workout = Workout {
            workout_id: "workout_0001".to_string(),
            title: "Leg Day".to_string(),
            duration_minutes: 45,
            exercises: Vec::new(),
            warmup: "5 minutes of light cardio".to_string(),
            cooldown: "5 minutes of stretching".to_string(),
            difficulty: Difficulty::Intermediate,
            target_muscles: vec!["quads".to_string()],
            calories_estimate: 350,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&workout).unwrap();
        let decoded: Workout = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.workout_id, workout.workout_id);
        assert_eq!(decoded.target_muscles, workout.target_muscles);
        assert!(decoded.exercises.is_empty());
    }
}
