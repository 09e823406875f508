//! Configuration loading for fitcoach.
//!
//! Layered precedence: built-in defaults, then the user config file,
//! then an optional CLI-specified file, then FITCOACH_* environment
//! variables. Parser defaults live here as a plain value object so
//! they are handed to the parser explicitly rather than read from
//! ambient state.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::FitcoachError;
use crate::exercise::Difficulty;
use crate::meal::MealType;

/// Settings for the generative/embedding API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    /// Chat completion model
    #[serde(default = "default_api_model")]
    pub model: String,

    /// Embedding model
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// API key; falls back to the OPENAI_API_KEY env var when unset
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_api_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum retry attempts on rate limits
    #[serde(default = "default_api_max_retries")]
    pub max_retries: u32,
}

fn default_api_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_model() -> String {
    "gpt-4o".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-large".to_string()
}

fn default_api_timeout_secs() -> u64 {
    30
}

fn default_api_max_retries() -> u32 {
    3
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            model: default_api_model(),
            embedding_model: default_embedding_model(),
            api_key: None,
            timeout_secs: default_api_timeout_secs(),
            max_retries: default_api_max_retries(),
        }
    }
}

/// Settings for the local JSON state file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory holding the state file
    #[serde(default = "default_storage_dir")]
    pub dir: String,

    /// State file name
    #[serde(default = "default_storage_filename")]
    pub filename: String,

    /// Maximum history entries kept per category
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// When true, every storage operation is a no-op
    #[serde(default)]
    pub disabled: bool,
}

fn default_storage_dir() -> String {
    ProjectDirs::from("", "", "fitcoach")
        .map(|p| p.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./data"))
        .to_string_lossy()
        .to_string()
}

fn default_storage_filename() -> String {
    "state.json".to_string()
}

fn default_history_limit() -> usize {
    20
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            filename: default_storage_filename(),
            history_limit: default_history_limit(),
            disabled: false,
        }
    }
}

/// Fallback values applied by the response parser.
///
/// Passed to the parser at construction so tests can substitute
/// alternate defaults without touching the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserDefaults {
    /// Difficulty used when a payload value is missing or outside the set
    #[serde(default)]
    pub difficulty: Difficulty,

    /// Sets per exercise when missing or unparseable
    #[serde(default = "default_exercise_sets")]
    pub exercise_sets: u32,

    /// Rep prescription when missing
    #[serde(default = "default_exercise_reps")]
    pub exercise_reps: String,

    /// Rest seconds when missing or unparseable
    #[serde(default = "default_exercise_rest_seconds")]
    pub exercise_rest_seconds: u32,

    /// Placeholder for a missing exercise name
    #[serde(default = "default_exercise_name")]
    pub exercise_name: String,

    /// Placeholder for missing exercise instructions
    #[serde(default = "default_instructions_placeholder")]
    pub instructions_placeholder: String,

    /// Placeholder for missing safety tips
    #[serde(default = "default_safety_placeholder")]
    pub safety_placeholder: String,

    /// Workout title when the payload has none and no workout type
    #[serde(default = "default_workout_title")]
    pub workout_title: String,

    /// Workout duration in minutes when missing or non-positive
    #[serde(default = "default_workout_duration")]
    pub workout_duration_minutes: u32,

    /// Warm-up text when missing
    #[serde(default = "default_warmup_text")]
    pub warmup_text: String,

    /// Cool-down text when missing
    #[serde(default = "default_cooldown_text")]
    pub cooldown_text: String,

    /// Base kcal-per-minute rate for calorie estimation
    #[serde(default = "default_calorie_base_rate")]
    pub calorie_base_rate: u32,

    /// Meal name when missing
    #[serde(default = "default_meal_name")]
    pub meal_name: String,

    /// Meal type when missing or outside the set
    #[serde(default)]
    pub meal_type: MealType,

    /// Meal prep time in minutes when missing or unparseable
    #[serde(default = "default_meal_prep_time")]
    pub meal_prep_time_minutes: u32,
}

fn default_exercise_sets() -> u32 {
    3
}

fn default_exercise_reps() -> String {
    "10".to_string()
}

fn default_exercise_rest_seconds() -> u32 {
    60
}

fn default_exercise_name() -> String {
    "Unknown Exercise".to_string()
}

fn default_instructions_placeholder() -> String {
    "Instructions not available.".to_string()
}

fn default_safety_placeholder() -> String {
    "Maintain controlled form throughout.".to_string()
}

fn default_workout_title() -> String {
    "Workout".to_string()
}

fn default_workout_duration() -> u32 {
    30
}

fn default_warmup_text() -> String {
    "5 minutes of light cardio".to_string()
}

fn default_cooldown_text() -> String {
    "5 minutes of stretching".to_string()
}

fn default_calorie_base_rate() -> u32 {
    7
}

fn default_meal_name() -> String {
    "Meal".to_string()
}

fn default_meal_prep_time() -> u32 {
    15
}

impl Default for ParserDefaults {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            exercise_sets: default_exercise_sets(),
            exercise_reps: default_exercise_reps(),
            exercise_rest_seconds: default_exercise_rest_seconds(),
            exercise_name: default_exercise_name(),
            instructions_placeholder: default_instructions_placeholder(),
            safety_placeholder: default_safety_placeholder(),
            workout_title: default_workout_title(),
            workout_duration_minutes: default_workout_duration(),
            warmup_text: default_warmup_text(),
            cooldown_text: default_cooldown_text(),
            calorie_base_rate: default_calorie_base_rate(),
            meal_name: default_meal_name(),
            meal_type: MealType::default(),
            meal_prep_time_minutes: default_meal_prep_time(),
        }
    }
}

/// Main application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// API client configuration
    #[serde(default)]
    pub api: ApiSettings,

    /// Local state file configuration
    #[serde(default)]
    pub storage: StorageSettings,

    /// Parser fallback values
    #[serde(default)]
    pub parser: ParserDefaults,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            storage: StorageSettings::default(),
            parser: ParserDefaults::default(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/fitcoach/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (FITCOACH_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, FitcoachError> {
        let config_dir = ProjectDirs::from("", "", "fitcoach")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            // 1. Built-in defaults
            .set_default("log_level", default_log_level())
            .map_err(|e| FitcoachError::Config(e.to_string()))?
            .set_default("api.base_url", default_api_base_url())
            .map_err(|e| FitcoachError::Config(e.to_string()))?
            .set_default("api.model", default_api_model())
            .map_err(|e| FitcoachError::Config(e.to_string()))?
            .set_default("api.embedding_model", default_embedding_model())
            .map_err(|e| FitcoachError::Config(e.to_string()))?
            .set_default("storage.dir", default_storage_dir())
            .map_err(|e| FitcoachError::Config(e.to_string()))?
            .set_default("storage.filename", default_storage_filename())
            .map_err(|e| FitcoachError::Config(e.to_string()))?
            // 2. Default config file (~/.config/fitcoach/config.toml)
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        // 3. CLI-specified config file (higher precedence than default)
        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // 4. Environment variables (highest precedence before CLI flags)
        // Format: FITCOACH_API_MODEL, FITCOACH_STORAGE_DIR, etc.
        builder = builder.add_source(
            Environment::with_prefix("FITCOACH")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| FitcoachError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| FitcoachError::Config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check invariants the rest of the system relies on.
    pub fn validate(&self) -> Result<(), FitcoachError> {
        if self.storage.history_limit < 1 {
            return Err(FitcoachError::Config(
                "storage.history_limit must be at least 1".to_string(),
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(FitcoachError::Config(
                "api.timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Full path to the state file.
    pub fn state_path(&self) -> PathBuf {
        PathBuf::from(&self.storage.dir).join(&self.storage.filename)
    }
}
