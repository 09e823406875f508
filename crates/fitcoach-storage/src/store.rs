//! JSON state file persistence.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use fitcoach_types::{NutritionPlan, StorageSettings, UserProfile, Workout};

use crate::error::StorageError;
use crate::summary::{MealPlanSummary, WorkoutSummary};

/// Bounded history of recent plans, most recent first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    pub workouts: Vec<WorkoutSummary>,

    #[serde(default)]
    pub meal_plans: Vec<MealPlanSummary>,
}

/// Full persisted state: one document per user.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    user_profile: Option<UserProfile>,

    #[serde(default)]
    history: History,
}

/// Persists the user profile and plan history to a JSON file.
///
/// Every operation reads the state document, mutates it, and writes
/// it back whole. A corrupt or missing file reads as empty state;
/// storage never fails a caller over bad historical data. Disabled
/// storage turns writes into no-ops and reads into empty results.
#[derive(Debug, Clone)]
pub struct Storage {
    state_path: PathBuf,
    history_limit: usize,
    disabled: bool,
}

impl Storage {
    /// Create a storage handle from settings.
    pub fn new(settings: &StorageSettings) -> Self {
        Self {
            state_path: PathBuf::from(&settings.dir).join(&settings.filename),
            history_limit: settings.history_limit,
            disabled: settings.disabled,
        }
    }

    pub fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        if self.disabled {
            return Ok(());
        }
        let mut state = self.load_state();
        state.user_profile = Some(profile.clone());
        self.save_state(&state)
    }

    pub fn load_profile(&self) -> Result<Option<UserProfile>, StorageError> {
        if self.disabled {
            return Ok(None);
        }
        Ok(self.load_state().user_profile)
    }

    /// Record a workout summary at the front of history.
    ///
    /// An existing entry with the same id is replaced rather than
    /// duplicated; history is trimmed to the configured limit.
    pub fn record_workout(&self, workout: &Workout) -> Result<(), StorageError> {
        if self.disabled {
            return Ok(());
        }
        let mut state = self.load_state();
        let summary = WorkoutSummary::from(workout);
        state
            .history
            .workouts
            .retain(|entry| entry.workout_id != summary.workout_id);
        state.history.workouts.insert(0, summary);
        state.history.workouts.truncate(self.history_limit);
        self.save_state(&state)
    }

    /// Record a meal-plan summary at the front of history.
    pub fn record_meal_plan(&self, plan: &NutritionPlan) -> Result<(), StorageError> {
        if self.disabled {
            return Ok(());
        }
        let mut state = self.load_state();
        let summary = MealPlanSummary::from(plan);
        state
            .history
            .meal_plans
            .retain(|entry| entry.plan_id != summary.plan_id);
        state.history.meal_plans.insert(0, summary);
        state.history.meal_plans.truncate(self.history_limit);
        self.save_state(&state)
    }

    pub fn history(&self) -> Result<History, StorageError> {
        if self.disabled {
            return Ok(History::default());
        }
        Ok(self.load_state().history)
    }

    fn load_state(&self) -> StateFile {
        match fs::read_to_string(&self.state_path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(state) => state,
                Err(e) => {
                    warn!(
                        path = %self.state_path.display(),
                        error = %e,
                        "state file corrupt, starting fresh"
                    );
                    StateFile::default()
                }
            },
            Err(_) => StateFile::default(),
        }
    }

    fn save_state(&self, state: &StateFile) -> Result<(), StorageError> {
        if let Some(parent) = self.state_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.state_path, json)?;
        debug!(path = %self.state_path.display(), "saved state");
        Ok(())
    }
}
