//! Nutrition plan payload parsing.
//!
//! Plan totals are never read from the payload. They are recomputed
//! from the parsed meals so the record stays internally consistent
//! even when the model reports sums that disagree with its own meals.

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use ulid::Ulid;

use fitcoach_types::{Meal, NutritionPlan, ParserDefaults};

use crate::error::ParseError;
use crate::fields;
use crate::payload::{json_type_name, RawPayload};

/// Fully-keyed intermediate for a nutrition plan payload.
///
/// Deliberately has no slots for the total_* keys; whatever the
/// payload claims for them is discarded.
#[derive(Debug)]
struct RawPlan {
    date: Option<Value>,
    meals: Option<Value>,
    notes: Option<Value>,
}

impl RawPlan {
    fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            date: map.remove("date"),
            meals: map.remove("meals"),
            notes: map.remove("notes"),
        }
    }
}

/// Fully-keyed intermediate for one meal entry.
#[derive(Debug)]
struct RawMeal {
    name: Option<Value>,
    meal_type: Option<Value>,
    calories: Option<Value>,
    protein_g: Option<Value>,
    carbs_g: Option<Value>,
    fats_g: Option<Value>,
    ingredients: Option<Value>,
    instructions: Option<Value>,
    prep_time_minutes: Option<Value>,
}

impl RawMeal {
    fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            name: map.remove("name"),
            meal_type: map.remove("meal_type"),
            calories: map.remove("calories"),
            protein_g: map.remove("protein_g"),
            carbs_g: map.remove("carbs_g"),
            fats_g: map.remove("fats_g"),
            ingredients: map.remove("ingredients"),
            instructions: map.remove("instructions"),
            prep_time_minutes: map.remove("prep_time_minutes"),
        }
    }
}

/// Parses nutrition plan payloads with configured fallbacks.
#[derive(Debug, Clone)]
pub struct NutritionParser {
    defaults: ParserDefaults,
}

impl NutritionParser {
    /// Create a parser with the given fallback values.
    pub fn new(defaults: ParserDefaults) -> Self {
        Self { defaults }
    }

    /// Parse a nutrition plan payload.
    ///
    /// Fails only when the payload cannot be decoded as a JSON object.
    /// The returned plan always carries a populated id and totals
    /// recomputed from its meals.
    pub fn parse(&self, payload: RawPayload) -> Result<NutritionPlan, ParseError> {
        let raw = RawPlan::from_map(payload.into_object()?);

        let meals = self.parse_meals(raw.meals);

        let date = fields::trimmed_string(raw.date.as_ref())
            .unwrap_or_else(|| Utc::now().format("%Y-%m-%d").to_string());

        let mut plan = NutritionPlan {
            plan_id: format!("plan_{}", Ulid::new()),
            date,
            meals,
            total_calories: 0,
            total_protein_g: 0.0,
            total_carbs_g: 0.0,
            total_fats_g: 0.0,
            notes: fields::trimmed_string(raw.notes.as_ref()),
        };
        plan.recompute_totals();
        Ok(plan)
    }

    fn parse_meals(&self, raw: Option<Value>) -> Vec<Meal> {
        let items = match raw {
            Some(Value::Array(items)) => items,
            Some(other) => {
                warn!(
                    found = json_type_name(&other),
                    "meals field is not an array, treating as empty"
                );
                return Vec::new();
            }
            None => return Vec::new(),
        };

        let mut meals = Vec::with_capacity(items.len());
        for (position, item) in items.into_iter().enumerate() {
            match item {
                Value::Object(map) => meals.push(self.parse_meal(map)),
                other => {
                    warn!(
                        position,
                        found = json_type_name(&other),
                        "skipping non-object meal entry"
                    );
                }
            }
        }
        meals
    }

    fn parse_meal(&self, map: Map<String, Value>) -> Meal {
        let raw = RawMeal::from_map(map);

        let name = match fields::trimmed_string(raw.name.as_ref()) {
            Some(name) => name,
            None => {
                debug!("meal name missing, using placeholder");
                self.defaults.meal_name.clone()
            }
        };

        Meal {
            name,
            meal_type: fields::meal_type(raw.meal_type.as_ref(), &self.defaults),
            calories: fields::calories(raw.calories.as_ref()),
            protein_g: fields::grams(raw.protein_g.as_ref()),
            carbs_g: fields::grams(raw.carbs_g.as_ref()),
            fats_g: fields::grams(raw.fats_g.as_ref()),
            ingredients: fields::string_or_list(raw.ingredients.as_ref()),
            instructions: fields::trimmed_string(raw.instructions.as_ref()).unwrap_or_default(),
            prep_time_minutes: fields::prep_time_minutes(
                raw.prep_time_minutes.as_ref(),
                &self.defaults,
            ),
        }
    }
}
