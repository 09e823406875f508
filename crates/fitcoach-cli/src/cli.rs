//! CLI argument parsing for the fitcoach binary.

use clap::{Parser, Subcommand};

/// AI fitness coach
///
/// Turns generative model replies into structured workout and
/// nutrition plans, and runs semantic exercise search over a local
/// embedding index.
#[derive(Parser, Debug)]
#[command(name = "fitcoach")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/fitcoach/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the stored user profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Show daily calorie and macro targets for the stored profile
    Targets,

    /// Parse a model reply into a structured record
    Parse {
        #[command(subcommand)]
        command: ParseCommands,
    },

    /// Send a prompt through the completion API and parse the reply
    Generate {
        #[command(subcommand)]
        command: GenerateCommands,
    },

    /// Manage the exercise similarity index
    Index {
        #[command(subcommand)]
        command: IndexCommands,
    },

    /// Semantic exercise search against a built index
    Search {
        /// Natural-language query
        query: String,

        /// Path to a built index file
        #[arg(short, long)]
        index: String,

        /// Maximum results
        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,

        /// Keep exercises using at least one of these items
        #[arg(long, value_delimiter = ',')]
        equipment: Vec<String>,

        /// Treat --equipment as the full inventory: keep only
        /// exercises that need nothing outside it
        #[arg(long)]
        available_only: bool,

        /// Keep exercises at this difficulty only
        #[arg(long)]
        difficulty: Option<String>,

        /// Exercise name to drop from results (repeatable)
        #[arg(long = "exclude")]
        exclude: Vec<String>,
    },

    /// Rank substitutes for an indexed exercise (offline, no API call)
    Alternatives {
        /// Exercise name to find substitutes for
        name: String,

        /// Path to a built index file
        #[arg(short, long)]
        index: String,

        /// Maximum results
        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,

        /// Muscle group to avoid (repeatable); defaults to the
        /// stored profile's injuries
        #[arg(long = "injury")]
        injuries: Vec<String>,
    },
}

/// Profile subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ProfileCommands {
    /// Create or replace the stored profile
    Set {
        #[arg(long)]
        user_id: String,

        /// Age in years
        #[arg(long)]
        age: u32,

        /// Body weight in kilograms
        #[arg(long)]
        weight_kg: f64,

        /// Height in centimeters
        #[arg(long)]
        height_cm: f64,

        /// male, female, or other
        #[arg(long)]
        gender: String,

        /// beginner, intermediate, or advanced
        #[arg(long, default_value = "intermediate")]
        fitness_level: String,

        /// Fitness goal, e.g. build_muscle (repeatable)
        #[arg(long = "goal")]
        goals: Vec<String>,

        /// Injured muscle group to work around (repeatable)
        #[arg(long = "injury")]
        injuries: Vec<String>,

        /// Available equipment item (repeatable)
        #[arg(long = "equipment")]
        equipment: Vec<String>,
    },

    /// Print the stored profile
    Show,
}

/// Parse subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ParseCommands {
    /// Parse a workout payload ("-" reads stdin)
    Workout {
        /// File containing the raw model reply or JSON payload
        file: String,
    },

    /// Parse a meal-plan payload ("-" reads stdin)
    MealPlan {
        /// File containing the raw model reply or JSON payload
        file: String,
    },
}

/// Generate subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum GenerateCommands {
    /// Generate and parse a workout
    Workout {
        /// File containing the prompt to send
        #[arg(long)]
        prompt_file: String,

        /// Optional file containing a system message
        #[arg(long)]
        system_file: Option<String>,
    },

    /// Generate and parse a meal plan
    MealPlan {
        /// File containing the prompt to send
        #[arg(long)]
        prompt_file: String,

        /// Optional file containing a system message
        #[arg(long)]
        system_file: Option<String>,
    },
}

/// Index subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum IndexCommands {
    /// Embed an exercise catalog into an index file
    Build {
        /// JSON file holding an array of exercises
        #[arg(long)]
        catalog: String,

        /// Where to write the built index
        #[arg(long)]
        out: String,
    },
}
