//! Command implementations for the fitcoach binary.
//!
//! Every command prints its result as JSON on stdout; errors surface
//! through anyhow with context and a non-zero exit.

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use fitcoach_client::{CompletionClient, EmbeddingClient, OpenAiClient, OpenAiClientConfig};
use fitcoach_parser::{NutritionParser, RawPayload, WorkoutParser};
use fitcoach_search::{
    AlternativesResult, EquipmentFilter, EquipmentMatch, ExerciseIndex, SearchOptions,
};
use fitcoach_storage::Storage;
use fitcoach_types::{Difficulty, Exercise, Gender, MacroTargets, Settings, UserProfile};

use crate::cli::{Cli, Commands, GenerateCommands, IndexCommands, ParseCommands, ProfileCommands};

/// Load settings, apply CLI overrides, set up logging, and dispatch.
pub async fn run(cli: Cli) -> Result<()> {
    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(level) = cli.log_level.as_deref() {
        settings.log_level = level.to_string();
    }

    init_tracing(&settings)?;

    match cli.command {
        Commands::Profile { command } => handle_profile(&settings, command),
        Commands::Targets => handle_targets(&settings),
        Commands::Parse { command } => handle_parse(&settings, command),
        Commands::Generate { command } => handle_generate(&settings, command).await,
        Commands::Index { command } => handle_index(&settings, command).await,
        Commands::Search {
            query,
            index,
            top_k,
            equipment,
            available_only,
            difficulty,
            exclude,
        } => {
            handle_search(
                &settings,
                &query,
                &index,
                top_k,
                equipment,
                available_only,
                difficulty.as_deref(),
                exclude,
            )
            .await
        }
        Commands::Alternatives {
            name,
            index,
            top_k,
            injuries,
        } => handle_alternatives(&settings, &name, &index, top_k, injuries),
    }
}

fn init_tracing(settings: &Settings) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

fn handle_profile(settings: &Settings, command: ProfileCommands) -> Result<()> {
    let storage = Storage::new(&settings.storage);

    match command {
        ProfileCommands::Set {
            user_id,
            age,
            weight_kg,
            height_cm,
            gender,
            fitness_level,
            goals,
            injuries,
            equipment,
        } => {
            let profile = UserProfile::new(
                user_id,
                age,
                weight_kg,
                height_cm,
                parse_gender(&gender)?,
                parse_difficulty(&fitness_level)?,
            )
            .with_goals(goals)
            .with_injuries(injuries)
            .with_equipment(equipment);

            storage
                .save_profile(&profile)
                .context("Failed to save profile")?;
            info!(user_id = %profile.user_id, "profile saved");
            print_json(&profile)
        }
        ProfileCommands::Show => match storage.load_profile()? {
            Some(profile) => print_json(&profile),
            None => bail!("no profile stored; run `fitcoach profile set` first"),
        },
    }
}

fn handle_targets(settings: &Settings) -> Result<()> {
    let storage = Storage::new(&settings.storage);
    let profile = storage
        .load_profile()?
        .context("no profile stored; run `fitcoach profile set` first")?;

    print_json(&MacroTargets::for_profile(&profile))
}

fn handle_parse(settings: &Settings, command: ParseCommands) -> Result<()> {
    let storage = Storage::new(&settings.storage);

    match command {
        ParseCommands::Workout { file } => {
            let payload = read_input(&file)?;
            let workout = WorkoutParser::new(settings.parser.clone())
                .parse(RawPayload::from(payload))
                .context("Failed to parse workout payload")?;

            storage
                .record_workout(&workout)
                .context("Failed to record workout history")?;
            print_json(&workout)
        }
        ParseCommands::MealPlan { file } => {
            let payload = read_input(&file)?;
            let plan = NutritionParser::new(settings.parser.clone())
                .parse(RawPayload::from(payload))
                .context("Failed to parse meal-plan payload")?;

            storage
                .record_meal_plan(&plan)
                .context("Failed to record meal-plan history")?;
            print_json(&plan)
        }
    }
}

async fn handle_generate(settings: &Settings, command: GenerateCommands) -> Result<()> {
    let client = build_client(settings)?;
    let storage = Storage::new(&settings.storage);

    match command {
        GenerateCommands::Workout {
            prompt_file,
            system_file,
        } => {
            let prompt = read_input(&prompt_file)?;
            let system = read_optional(system_file.as_deref())?;

            let reply = client
                .complete(&prompt, system.as_deref(), None)
                .await
                .context("Completion request failed")?;

            let workout = WorkoutParser::new(settings.parser.clone())
                .parse(RawPayload::from(reply))
                .context("Failed to parse generated workout")?;

            storage
                .record_workout(&workout)
                .context("Failed to record workout history")?;
            print_json(&workout)
        }
        GenerateCommands::MealPlan {
            prompt_file,
            system_file,
        } => {
            let prompt = read_input(&prompt_file)?;
            let system = read_optional(system_file.as_deref())?;

            let reply = client
                .complete(&prompt, system.as_deref(), None)
                .await
                .context("Completion request failed")?;

            let plan = NutritionParser::new(settings.parser.clone())
                .parse(RawPayload::from(reply))
                .context("Failed to parse generated meal plan")?;

            storage
                .record_meal_plan(&plan)
                .context("Failed to record meal-plan history")?;
            print_json(&plan)
        }
    }
}

async fn handle_index(settings: &Settings, command: IndexCommands) -> Result<()> {
    let IndexCommands::Build { catalog, out } = command;

    let json = read_input(&catalog)?;
    let exercises: Vec<Exercise> = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse exercise catalog {}", catalog))?;

    let client = build_client(settings)?;
    let index = ExerciseIndex::build(&exercises, &client)
        .await
        .context("Failed to build index")?;
    index
        .save(Path::new(&out))
        .with_context(|| format!("Failed to write index to {}", out))?;

    info!(entries = index.len(), out = %out, "index built");
    print_json(&serde_json::json!({ "entries": index.len(), "path": out }))
}

#[allow(clippy::too_many_arguments)]
async fn handle_search(
    settings: &Settings,
    query: &str,
    index_path: &str,
    top_k: usize,
    equipment: Vec<String>,
    available_only: bool,
    difficulty: Option<&str>,
    exclude: Vec<String>,
) -> Result<()> {
    let index = ExerciseIndex::load(Path::new(index_path))
        .with_context(|| format!("Failed to load index from {}", index_path))?;

    let client = build_client(settings)?;
    let query_vector = client.embed(query).await.context("Failed to embed query")?;

    let mut opts = SearchOptions::new()
        .with_top_k(top_k)
        .with_excluded(exclude);
    if !equipment.is_empty() {
        let mode = if available_only {
            EquipmentMatch::SubsetOfAvailable
        } else {
            EquipmentMatch::AnyOverlap
        };
        opts = opts.with_equipment(EquipmentFilter::new(equipment, mode));
    }
    if let Some(level) = difficulty {
        opts = opts.with_difficulty(parse_difficulty(level)?);
    }

    let hits = index.find_similar(&query_vector, &opts);
    print_json(&hits)
}

fn handle_alternatives(
    settings: &Settings,
    name: &str,
    index_path: &str,
    top_k: usize,
    injuries: Vec<String>,
) -> Result<()> {
    let index = ExerciseIndex::load(Path::new(index_path))
        .with_context(|| format!("Failed to load index from {}", index_path))?;

    // No --injury flags means fall back to the stored profile.
    let injuries = if injuries.is_empty() {
        let storage = Storage::new(&settings.storage);
        storage
            .load_profile()?
            .map(|profile| profile.injuries)
            .unwrap_or_default()
    } else {
        injuries
    };

    match index.find_alternatives(name, top_k, &injuries) {
        AlternativesResult::Ranked(hits) => print_json(&hits),
        AlternativesResult::UnknownExercise { name } => {
            warn!(name = %name, "exercise not in index");
            print_json(&serde_json::json!({ "unknown_exercise": name, "alternatives": [] }))
        }
    }
}

fn build_client(settings: &Settings) -> Result<OpenAiClient> {
    let config = OpenAiClientConfig::from_settings(&settings.api)?;
    Ok(OpenAiClient::new(config)?)
}

/// Read a payload file, with "-" reading stdin.
fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        return Ok(buffer);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))
}

fn read_optional(path: Option<&str>) -> Result<Option<String>> {
    path.map(read_input).transpose()
}

fn parse_gender(raw: &str) -> Result<Gender> {
    match raw.trim().to_lowercase().as_str() {
        "male" => Ok(Gender::Male),
        "female" => Ok(Gender::Female),
        "other" => Ok(Gender::Other),
        _ => bail!("unknown gender '{}'; expected male, female, or other", raw),
    }
}

fn parse_difficulty(raw: &str) -> Result<Difficulty> {
    Difficulty::parse_loose(raw).with_context(|| {
        format!(
            "unknown difficulty '{}'; expected beginner, intermediate, or advanced",
            raw
        )
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_gender_accepts_known_values() {
        assert_eq!(parse_gender("male").unwrap(), Gender::Male);
        assert_eq!(parse_gender("FEMALE").unwrap(), Gender::Female);
        assert_eq!(parse_gender(" other ").unwrap(), Gender::Other);
    }

    #[test]
    fn test_parse_gender_rejects_unknown() {
        assert!(parse_gender("robot").is_err());
    }

    #[test]
    fn test_parse_difficulty_is_loose() {
        assert_eq!(parse_difficulty("ADVANCED").unwrap(), Difficulty::Advanced);
        assert!(parse_difficulty("expert").is_err());
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("payload.json");
        fs::write(&path, r#"{"title": "Leg Day"}"#).unwrap();

        let content = read_input(path.to_str().unwrap()).unwrap();
        assert!(content.contains("Leg Day"));
    }

    #[test]
    fn test_read_input_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(read_input(missing.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_read_optional_none_passes_through() {
        assert!(read_optional(None).unwrap().is_none());
    }
}
