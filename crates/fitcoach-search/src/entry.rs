//! Index entry types and description synthesis.

use serde::{Deserialize, Serialize};

use fitcoach_types::{Difficulty, Exercise};

/// One indexed exercise: the embedded description, its vector, and
/// the metadata used for post-filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseEmbedding {
    /// Exercise name, the key for lookups
    pub exercise_name: String,

    /// The exact text that was embedded
    pub description: String,

    /// Embedding vector, fixed model-defined dimensionality
    pub embedding: Vec<f32>,

    /// Filterable attributes
    pub metadata: EntryMetadata,
}

/// Attributes consulted by search filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// Exercise difficulty
    pub difficulty: Difficulty,

    /// Required equipment; empty means bodyweight
    #[serde(default)]
    pub equipment: Vec<String>,

    /// Targeted muscle groups
    #[serde(default)]
    pub muscle_groups: Vec<String>,
}

impl From<&Exercise> for EntryMetadata {
    fn from(exercise: &Exercise) -> Self {
        Self {
            difficulty: exercise.difficulty.clone(),
            equipment: exercise.equipment.clone(),
            muscle_groups: exercise.muscle_groups.clone(),
        }
    }
}

/// Synthesize the description text embedded for an exercise.
///
/// The concatenation order is fixed so the same exercise always
/// produces the same text, and therefore the same embedding request.
pub fn describe_exercise(exercise: &Exercise) -> String {
    let equipment = if exercise.equipment.is_empty() {
        "bodyweight".to_string()
    } else {
        exercise.equipment.join(", ")
    };
    let muscles = exercise.muscle_groups.join(", ");

    format!(
        "{} - {} exercise targeting {} using {}. {}",
        exercise.name, exercise.difficulty, muscles, equipment, exercise.instructions
    )
}
