//! Workout payload parsing.
//!
//! Transforms generative replies into `Workout` records. Malformed
//! fields degrade to configured defaults; only an undecodable payload
//! raises.

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use ulid::Ulid;

use fitcoach_types::{Difficulty, Exercise, ParserDefaults, Workout};

use crate::error::ParseError;
use crate::fields;
use crate::payload::{json_type_name, RawPayload};

/// Fully-keyed intermediate for a workout payload.
///
/// Normalization pulls every known key out of the decoded object so
/// the field rules see a uniform shape regardless of what the model
/// actually sent. Unknown keys are dropped here.
#[derive(Debug)]
struct RawWorkout {
    title: Option<Value>,
    workout_type: Option<Value>,
    duration_minutes: Option<Value>,
    exercises: Option<Value>,
    warmup: Option<Value>,
    cooldown: Option<Value>,
    difficulty: Option<Value>,
    target_muscles: Option<Value>,
    calories_estimate: Option<Value>,
}

impl RawWorkout {
    fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            title: map.remove("title"),
            workout_type: map.remove("workout_type"),
            duration_minutes: map.remove("duration_minutes"),
            exercises: map.remove("exercises"),
            warmup: map.remove("warmup"),
            cooldown: map.remove("cooldown"),
            difficulty: map.remove("difficulty"),
            target_muscles: map.remove("target_muscles"),
            calories_estimate: map.remove("calories_estimate"),
        }
    }
}

/// Fully-keyed intermediate for one exercise entry.
#[derive(Debug)]
struct RawExercise {
    name: Option<Value>,
    muscle_groups: Option<Value>,
    equipment: Option<Value>,
    difficulty: Option<Value>,
    sets: Option<Value>,
    reps: Option<Value>,
    rest_seconds: Option<Value>,
    instructions: Option<Value>,
    safety_tips: Option<Value>,
}

impl RawExercise {
    fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            name: map.remove("name"),
            muscle_groups: map.remove("muscle_groups"),
            equipment: map.remove("equipment"),
            difficulty: map.remove("difficulty"),
            sets: map.remove("sets"),
            reps: map.remove("reps"),
            rest_seconds: map.remove("rest_seconds"),
            instructions: map.remove("instructions"),
            safety_tips: map.remove("safety_tips"),
        }
    }
}

/// Parses workout payloads with configured fallbacks.
#[derive(Debug, Clone)]
pub struct WorkoutParser {
    defaults: ParserDefaults,
}

impl WorkoutParser {
    /// Create a parser with the given fallback values.
    pub fn new(defaults: ParserDefaults) -> Self {
        Self { defaults }
    }

    /// Parse a workout payload.
    ///
    /// Fails only when the payload cannot be decoded as a JSON object
    /// at all; every field-level problem falls back to the configured
    /// defaults. The returned workout always has a populated id and
    /// an exercise list (possibly empty).
    pub fn parse(&self, payload: RawPayload) -> Result<Workout, ParseError> {
        let raw = RawWorkout::from_map(payload.into_object()?);

        let exercises = self.parse_exercises(raw.exercises);

        let duration_minutes =
            fields::duration_minutes(raw.duration_minutes.as_ref(), &self.defaults);
        let title = self.resolve_title(raw.title.as_ref(), raw.workout_type.as_ref());
        let warmup = fields::text_or(raw.warmup.as_ref(), &self.defaults.warmup_text);
        let cooldown = fields::text_or(raw.cooldown.as_ref(), &self.defaults.cooldown_text);

        let mut target_muscles = fields::string_or_list(raw.target_muscles.as_ref());
        if target_muscles.is_empty() {
            target_muscles = infer_target_muscles(&exercises);
        }

        let difficulty = match fields::difficulty_opt(raw.difficulty.as_ref()) {
            Some(level) => level,
            None => self.majority_difficulty(&exercises),
        };

        let calories_estimate = match fields::int_value(raw.calories_estimate.as_ref()) {
            Some(n) if n > 0 => n.min(u32::MAX as i64) as u32,
            _ => estimate_calories(duration_minutes, &exercises, &self.defaults),
        };

        Ok(Workout {
            workout_id: format!("workout_{}", Ulid::new()),
            title,
            duration_minutes,
            exercises,
            warmup,
            cooldown,
            difficulty,
            target_muscles,
            calories_estimate,
            created_at: Utc::now(),
        })
    }

    fn parse_exercises(&self, raw: Option<Value>) -> Vec<Exercise> {
        let items = match raw {
            Some(Value::Array(items)) => items,
            Some(other) => {
                warn!(
                    found = json_type_name(&other),
                    "exercises field is not an array, treating as empty"
                );
                return Vec::new();
            }
            None => return Vec::new(),
        };

        let mut exercises = Vec::with_capacity(items.len());
        for (position, item) in items.into_iter().enumerate() {
            match item {
                Value::Object(map) => exercises.push(self.parse_exercise(map)),
                other => {
                    warn!(
                        position,
                        found = json_type_name(&other),
                        "skipping non-object exercise entry"
                    );
                }
            }
        }
        exercises
    }

    fn parse_exercise(&self, map: Map<String, Value>) -> Exercise {
        let raw = RawExercise::from_map(map);

        let name = match fields::trimmed_string(raw.name.as_ref()) {
            Some(name) => name,
            None => {
                debug!("exercise name missing, using placeholder");
                self.defaults.exercise_name.clone()
            }
        };

        Exercise {
            name,
            muscle_groups: fields::string_or_list(raw.muscle_groups.as_ref()),
            equipment: fields::string_items(raw.equipment.as_ref()),
            difficulty: fields::difficulty(raw.difficulty.as_ref(), &self.defaults),
            sets: fields::sets(raw.sets.as_ref(), &self.defaults),
            reps: fields::text_or(raw.reps.as_ref(), &self.defaults.exercise_reps),
            rest_seconds: fields::rest_seconds(raw.rest_seconds.as_ref(), &self.defaults),
            instructions: fields::text_or(
                raw.instructions.as_ref(),
                &self.defaults.instructions_placeholder,
            ),
            safety_tips: Some(fields::text_or(
                raw.safety_tips.as_ref(),
                &self.defaults.safety_placeholder,
            )),
        }
    }

    fn resolve_title(&self, title: Option<&Value>, workout_type: Option<&Value>) -> String {
        if let Some(title) = fields::trimmed_string(title) {
            return title;
        }
        match fields::trimmed_string(workout_type) {
            Some(kind) => format!("{} Workout", title_case(&kind)),
            None => self.defaults.workout_title.clone(),
        }
    }

    /// Majority vote over exercise difficulties. Any tie, including
    /// an empty exercise list, resolves to the configured default.
    fn majority_difficulty(&self, exercises: &[Exercise]) -> Difficulty {
        let mut counts = [0usize; 3];
        for exercise in exercises {
            let slot = match exercise.difficulty {
                Difficulty::Beginner => 0,
                Difficulty::Intermediate => 1,
                Difficulty::Advanced => 2,
            };
            counts[slot] += 1;
        }

        let top = counts.iter().copied().max().unwrap_or(0);
        if top == 0 {
            return self.defaults.difficulty.clone();
        }

        let winners = counts.iter().filter(|&&c| c == top).count();
        if winners > 1 {
            debug!("difficulty vote tied, using configured default");
            return self.defaults.difficulty.clone();
        }

        match counts.iter().position(|&c| c == top) {
            Some(0) => Difficulty::Beginner,
            Some(2) => Difficulty::Advanced,
            _ => Difficulty::Intermediate,
        }
    }
}

/// First-seen-order union of exercise muscle groups.
fn infer_target_muscles(exercises: &[Exercise]) -> Vec<String> {
    let mut muscles: Vec<String> = Vec::new();
    for exercise in exercises {
        for muscle in &exercise.muscle_groups {
            if !muscles.iter().any(|m| m == muscle) {
                muscles.push(muscle.clone());
            }
        }
    }
    muscles
}

/// Duration times the base kcal rate, scaled up when harder
/// exercises appear anywhere in the plan.
fn estimate_calories(
    duration_minutes: u32,
    exercises: &[Exercise],
    defaults: &ParserDefaults,
) -> u32 {
    let mut multiplier: f64 = 1.0;
    for exercise in exercises {
        match exercise.difficulty {
            Difficulty::Advanced => multiplier = multiplier.max(1.3),
            Difficulty::Intermediate => multiplier = multiplier.max(1.1),
            Difficulty::Beginner => {}
        }
    }
    (duration_minutes as f64 * defaults.calorie_base_rate as f64 * multiplier) as u32
}

fn title_case(raw: &str) -> String {
    raw.split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
