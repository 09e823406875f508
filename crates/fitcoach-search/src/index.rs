//! In-memory exercise similarity index.
//!
//! The index owns its entries for its lifetime; a rebuild replaces it
//! wholesale. Ranking is deterministic: stable descending sort by
//! score, so equal scores keep their original insertion order.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use fitcoach_client::EmbeddingClient;
use fitcoach_types::{Difficulty, Exercise};

use crate::entry::{describe_exercise, EntryMetadata, ExerciseEmbedding};
use crate::error::SearchError;
use crate::similarity::cosine_similarity;

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Name of the matched exercise
    pub exercise_name: String,

    /// Cosine similarity against the query vector
    pub score: f32,
}

/// How an equipment filter compares an entry against the allowed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipmentMatch {
    /// Entry needs at least one allowed item. Used for search
    /// queries; a bodyweight entry has nothing to match.
    AnyOverlap,

    /// Every item the entry needs must be in the allowed set. Used
    /// for substitution queries; a bodyweight entry always passes.
    SubsetOfAvailable,
}

/// Equipment constraint applied during ranking.
#[derive(Debug, Clone)]
pub struct EquipmentFilter {
    /// Allowed equipment items, compared case-insensitively
    pub allowed: Vec<String>,

    /// Comparison mode
    pub mode: EquipmentMatch,
}

impl EquipmentFilter {
    pub fn new(allowed: Vec<String>, mode: EquipmentMatch) -> Self {
        Self { allowed, mode }
    }

    fn allows(&self, item: &str) -> bool {
        self.allowed.iter().any(|a| a.eq_ignore_ascii_case(item))
    }

    /// Whether an entry with the given equipment passes the filter.
    pub fn matches(&self, equipment: &[String]) -> bool {
        match self.mode {
            EquipmentMatch::AnyOverlap => equipment.iter().any(|item| self.allows(item)),
            EquipmentMatch::SubsetOfAvailable => equipment.iter().all(|item| self.allows(item)),
        }
    }
}

/// Filters and limits for a similarity query.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Maximum number of hits returned; zero keeps none
    pub top_k: usize,

    /// Equipment constraint, when supplied
    pub equipment: Option<EquipmentFilter>,

    /// Exact difficulty to keep, when supplied
    pub difficulty: Option<Difficulty>,

    /// Exercise names dropped from results, compared case-insensitively
    pub exclude_names: Vec<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            equipment: None,
            difficulty: None,
            exclude_names: Vec::new(),
        }
    }
}

impl SearchOptions {
    /// Options with the default result limit and no filters.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_equipment(mut self, filter: EquipmentFilter) -> Self {
        self.equipment = Some(filter);
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_excluded(mut self, names: Vec<String>) -> Self {
        self.exclude_names = names;
        self
    }
}

/// Outcome of an alternatives lookup.
///
/// A name missing from the index is a lookup miss, not an error; the
/// caller's flow continues either way.
#[derive(Debug, Clone, PartialEq)]
pub enum AlternativesResult {
    /// Ranked alternatives for a known exercise
    Ranked(Vec<SearchHit>),

    /// The queried name is not in the index
    UnknownExercise { name: String },
}

/// In-memory vector index over exercise descriptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseIndex {
    entries: Vec<ExerciseEmbedding>,
}

impl ExerciseIndex {
    /// Build an index by embedding each exercise's description.
    ///
    /// Descriptions are embedded one at a time, in input order. Any
    /// provider failure aborts the build; a partial index would turn
    /// missing entries into silent "no match" results, so none is
    /// ever returned. Inconsistent embedding dimensions abort for the
    /// same reason.
    pub async fn build(
        exercises: &[Exercise],
        provider: &dyn EmbeddingClient,
    ) -> Result<Self, SearchError> {
        let mut entries = Vec::with_capacity(exercises.len());
        let mut dimensions: Option<usize> = None;

        for exercise in exercises {
            let description = describe_exercise(exercise);
            let embedding = provider.embed(&description).await.map_err(|e| {
                SearchError::IndexBuild(format!("embedding '{}': {}", exercise.name, e))
            })?;

            match dimensions {
                None => dimensions = Some(embedding.len()),
                Some(expected) if expected != embedding.len() => {
                    return Err(SearchError::IndexBuild(format!(
                        "inconsistent embedding dimensions for '{}': expected {}, got {}",
                        exercise.name,
                        expected,
                        embedding.len()
                    )));
                }
                Some(_) => {}
            }

            debug!(exercise = %exercise.name, "embedded exercise description");
            entries.push(ExerciseEmbedding {
                exercise_name: exercise.name.clone(),
                description,
                embedding,
                metadata: EntryMetadata::from(exercise),
            });
        }

        info!(entries = entries.len(), "built exercise index");
        Ok(Self { entries })
    }

    /// Wrap already-embedded entries, e.g. loaded from disk.
    pub fn from_entries(entries: Vec<ExerciseEmbedding>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ExerciseEmbedding] {
        &self.entries
    }

    /// Case-insensitive lookup of a single entry by exercise name.
    pub fn get(&self, name: &str) -> Option<&ExerciseEmbedding> {
        self.entries
            .iter()
            .find(|entry| entry.exercise_name.eq_ignore_ascii_case(name))
    }

    /// Write the index to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), SearchError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        debug!(path = %path.display(), entries = self.entries.len(), "saved index");
        Ok(())
    }

    /// Read an index back from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SearchError> {
        let json = fs::read_to_string(path)?;
        let index: Self = serde_json::from_str(&json)?;
        debug!(path = %path.display(), entries = index.entries.len(), "loaded index");
        Ok(index)
    }

    /// Rank entries against a query vector.
    ///
    /// Scores every entry that passes the filters, sorts descending
    /// by score (ties keep insertion order), and truncates to
    /// `top_k`; a zero `top_k` keeps nothing. An empty index yields
    /// an empty result.
    pub fn find_similar(&self, query: &[f32], opts: &SearchOptions) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = Vec::new();

        for entry in &self.entries {
            if !self.passes_filters(entry, opts) {
                continue;
            }

            hits.push(SearchHit {
                exercise_name: entry.exercise_name.clone(),
                score: cosine_similarity(query, &entry.embedding),
            });
        }

        debug!(candidates = hits.len(), "scored index entries");
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(opts.top_k);
        hits
    }

    /// Rank substitutes for a named exercise using its stored vector.
    ///
    /// The queried exercise never appears in its own alternatives.
    /// Candidates whose muscle groups overlap the injury list are
    /// dropped entirely rather than down-ranked.
    pub fn find_alternatives(
        &self,
        name: &str,
        top_k: usize,
        injuries: &[String],
    ) -> AlternativesResult {
        let Some(target) = self.get(name) else {
            debug!(name, "exercise not found in index");
            return AlternativesResult::UnknownExercise {
                name: name.to_string(),
            };
        };

        let mut hits: Vec<SearchHit> = Vec::new();

        for entry in &self.entries {
            if entry.exercise_name.eq_ignore_ascii_case(name) {
                continue;
            }
            if overlaps_injuries(&entry.metadata.muscle_groups, injuries) {
                debug!(
                    candidate = %entry.exercise_name,
                    "excluded by injury filter"
                );
                continue;
            }

            hits.push(SearchHit {
                exercise_name: entry.exercise_name.clone(),
                score: cosine_similarity(&target.embedding, &entry.embedding),
            });
        }

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(top_k);
        AlternativesResult::Ranked(hits)
    }

    fn passes_filters(&self, entry: &ExerciseEmbedding, opts: &SearchOptions) -> bool {
        if let Some(filter) = &opts.equipment {
            if !filter.matches(&entry.metadata.equipment) {
                return false;
            }
        }

        if let Some(level) = &opts.difficulty {
            if entry.metadata.difficulty != *level {
                return false;
            }
        }

        if opts
            .exclude_names
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(&entry.exercise_name))
        {
            return false;
        }

        true
    }
}

/// Case-insensitive overlap between muscle groups and injuries.
fn overlaps_injuries(muscle_groups: &[String], injuries: &[String]) -> bool {
    muscle_groups.iter().any(|muscle| {
        injuries
            .iter()
            .any(|injury| injury.eq_ignore_ascii_case(muscle))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fitcoach_client::{ClientError, MockClient};

    fn entry(
        name: &str,
        embedding: Vec<f32>,
        difficulty: Difficulty,
        equipment: &[&str],
        muscle_groups: &[&str],
    ) -> ExerciseEmbedding {
        ExerciseEmbedding {
            exercise_name: name.to_string(),
            description: format!("{} description", name),
            embedding,
            metadata: EntryMetadata {
                difficulty,
                equipment: equipment.iter().map(|s| s.to_string()).collect(),
                muscle_groups: muscle_groups.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    fn exercise(name: &str, difficulty: Difficulty) -> Exercise {
        Exercise {
            name: name.to_string(),
            muscle_groups: vec!["chest".to_string()],
            equipment: vec![],
            difficulty,
            sets: 3,
            reps: "10".to_string(),
            rest_seconds: 60,
            instructions: "Do the movement with control.".to_string(),
            safety_tips: None,
        }
    }

    #[test]
    fn test_find_similar_ranks_descending() {
        let index = ExerciseIndex::from_entries(vec![
            entry("Far", vec![0.0, 1.0], Difficulty::Beginner, &[], &[]),
            entry("Near", vec![1.0, 0.1], Difficulty::Beginner, &[], &[]),
            entry("Exact", vec![1.0, 0.0], Difficulty::Beginner, &[], &[]),
        ]);

        let hits = index.find_similar(&[1.0, 0.0], &SearchOptions::new());

        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].exercise_name, "Exact");
        assert_eq!(hits[1].exercise_name, "Near");
        assert_eq!(hits[2].exercise_name, "Far");
        assert!(hits[0].score >= hits[1].score);
        assert!(hits[1].score >= hits[2].score);
    }

    #[test]
    fn test_equal_scores_keep_insertion_order() {
        let index = ExerciseIndex::from_entries(vec![
            entry("First", vec![1.0, 0.0], Difficulty::Beginner, &[], &[]),
            entry("Second", vec![2.0, 0.0], Difficulty::Beginner, &[], &[]),
            entry("Third", vec![3.0, 0.0], Difficulty::Beginner, &[], &[]),
        ]);

        let hits = index.find_similar(&[1.0, 0.0], &SearchOptions::new());

        assert_eq!(hits[0].exercise_name, "First");
        assert_eq!(hits[1].exercise_name, "Second");
        assert_eq!(hits[2].exercise_name, "Third");
    }

    #[test]
    fn test_top_k_truncates() {
        let index = ExerciseIndex::from_entries(vec![
            entry("A", vec![1.0, 0.0], Difficulty::Beginner, &[], &[]),
            entry("B", vec![0.9, 0.1], Difficulty::Beginner, &[], &[]),
            entry("C", vec![0.8, 0.2], Difficulty::Beginner, &[], &[]),
        ]);

        let hits = index.find_similar(&[1.0, 0.0], &SearchOptions::new().with_top_k(2));
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_top_k_zero_keeps_nothing() {
        let index = ExerciseIndex::from_entries(vec![
            entry("A", vec![1.0, 0.0], Difficulty::Beginner, &[], &[]),
            entry("B", vec![0.9, 0.1], Difficulty::Beginner, &[], &[]),
        ]);

        let hits = index.find_similar(&[1.0, 0.0], &SearchOptions::new().with_top_k(0));
        assert!(hits.is_empty());

        let result = index.find_alternatives("A", 0, &[]);
        assert_eq!(result, AlternativesResult::Ranked(Vec::new()));
    }

    #[test]
    fn test_default_options_match_new() {
        assert_eq!(SearchOptions::default().top_k, SearchOptions::new().top_k);
    }

    #[test]
    fn test_empty_index_returns_empty() {
        let index = ExerciseIndex::from_entries(Vec::new());
        let hits = index.find_similar(&[1.0, 0.0], &SearchOptions::new());
        assert!(hits.is_empty());
    }

    #[test]
    fn test_equipment_any_overlap_filter() {
        let index = ExerciseIndex::from_entries(vec![
            entry(
                "Bench Press",
                vec![1.0, 0.0],
                Difficulty::Intermediate,
                &["barbell", "bench"],
                &[],
            ),
            entry(
                "Dumbbell Press",
                vec![1.0, 0.0],
                Difficulty::Intermediate,
                &["dumbbell", "bench"],
                &[],
            ),
            entry("Push-Up", vec![1.0, 0.0], Difficulty::Beginner, &[], &[]),
        ]);

        let opts = SearchOptions::new().with_equipment(EquipmentFilter::new(
            vec!["Dumbbell".to_string()],
            EquipmentMatch::AnyOverlap,
        ));
        let hits = index.find_similar(&[1.0, 0.0], &opts);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].exercise_name, "Dumbbell Press");
    }

    #[test]
    fn test_equipment_subset_filter_lets_bodyweight_through() {
        let index = ExerciseIndex::from_entries(vec![
            entry(
                "Dumbbell Press",
                vec![1.0, 0.0],
                Difficulty::Intermediate,
                &["dumbbell", "bench"],
                &[],
            ),
            entry(
                "Dumbbell Curl",
                vec![1.0, 0.0],
                Difficulty::Beginner,
                &["dumbbell"],
                &[],
            ),
            entry("Push-Up", vec![1.0, 0.0], Difficulty::Beginner, &[], &[]),
        ]);

        let opts = SearchOptions::new().with_equipment(EquipmentFilter::new(
            vec!["dumbbell".to_string()],
            EquipmentMatch::SubsetOfAvailable,
        ));
        let hits = index.find_similar(&[1.0, 0.0], &opts);

        let names: Vec<&str> = hits.iter().map(|h| h.exercise_name.as_str()).collect();
        assert_eq!(names, vec!["Dumbbell Curl", "Push-Up"]);
    }

    #[test]
    fn test_difficulty_filter() {
        let index = ExerciseIndex::from_entries(vec![
            entry("Easy", vec![1.0, 0.0], Difficulty::Beginner, &[], &[]),
            entry("Hard", vec![1.0, 0.0], Difficulty::Advanced, &[], &[]),
        ]);

        let opts = SearchOptions::new().with_difficulty(Difficulty::Advanced);
        let hits = index.find_similar(&[1.0, 0.0], &opts);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].exercise_name, "Hard");
    }

    #[test]
    fn test_exclude_names_is_case_insensitive() {
        let index = ExerciseIndex::from_entries(vec![
            entry("Push-Up", vec![1.0, 0.0], Difficulty::Beginner, &[], &[]),
            entry("Dip", vec![1.0, 0.0], Difficulty::Intermediate, &[], &[]),
        ]);

        let opts = SearchOptions::new().with_excluded(vec!["push-up".to_string()]);
        let hits = index.find_similar(&[1.0, 0.0], &opts);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].exercise_name, "Dip");
    }

    #[test]
    fn test_alternatives_never_contain_the_query() {
        let index = ExerciseIndex::from_entries(vec![
            entry(
                "Push-Up",
                vec![1.0, 0.0],
                Difficulty::Beginner,
                &[],
                &["chest"],
            ),
            entry(
                "Bench Press",
                vec![1.0, 0.1],
                Difficulty::Intermediate,
                &["barbell"],
                &["chest"],
            ),
            entry(
                "Squat",
                vec![0.0, 1.0],
                Difficulty::Intermediate,
                &["barbell"],
                &["quads"],
            ),
        ]);

        let result = index.find_alternatives("push-up", 5, &[]);

        let AlternativesResult::Ranked(hits) = result else {
            panic!("expected ranked alternatives");
        };
        assert!(hits.iter().all(|h| h.exercise_name != "Push-Up"));
        assert_eq!(hits[0].exercise_name, "Bench Press");
    }

    #[test]
    fn test_alternatives_injury_filter_is_hard() {
        let index = ExerciseIndex::from_entries(vec![
            entry(
                "Push-Up",
                vec![1.0, 0.0],
                Difficulty::Beginner,
                &[],
                &["chest", "shoulders"],
            ),
            entry(
                "Shoulder Press",
                vec![1.0, 0.0],
                Difficulty::Intermediate,
                &["dumbbell"],
                &["shoulders"],
            ),
            entry(
                "Leg Press",
                vec![0.5, 0.5],
                Difficulty::Beginner,
                &["machine"],
                &["quads"],
            ),
        ]);

        // Shoulder Press would rank first on score alone.
        let result = index.find_alternatives("Push-Up", 5, &["Shoulders".to_string()]);

        let AlternativesResult::Ranked(hits) = result else {
            panic!("expected ranked alternatives");
        };
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].exercise_name, "Leg Press");
    }

    #[test]
    fn test_alternatives_unknown_exercise_is_a_miss() {
        let index = ExerciseIndex::from_entries(vec![entry(
            "Squat",
            vec![1.0, 0.0],
            Difficulty::Intermediate,
            &[],
            &[],
        )]);

        let result = index.find_alternatives("Kettlebell Swing", 5, &[]);

        assert_eq!(
            result,
            AlternativesResult::UnknownExercise {
                name: "Kettlebell Swing".to_string()
            }
        );
    }

    #[test]
    fn test_get_is_case_insensitive() {
        let index = ExerciseIndex::from_entries(vec![entry(
            "Goblet Squat",
            vec![1.0],
            Difficulty::Beginner,
            &["kettlebell"],
            &["quads"],
        )]);

        assert!(index.get("goblet squat").is_some());
        assert!(index.get("GOBLET SQUAT").is_some());
        assert!(index.get("front squat").is_none());
    }

    #[tokio::test]
    async fn test_build_preserves_input_order() {
        let provider = MockClient::new();
        let exercises = vec![
            exercise("Push-Up", Difficulty::Beginner),
            exercise("Bench Press", Difficulty::Intermediate),
            exercise("Dip", Difficulty::Intermediate),
        ];

        let index = ExerciseIndex::build(&exercises, &provider).await.unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(index.entries()[0].exercise_name, "Push-Up");
        assert_eq!(index.entries()[1].exercise_name, "Bench Press");
        assert_eq!(index.entries()[2].exercise_name, "Dip");
        assert_eq!(
            index.entries()[0].description,
            describe_exercise(&exercises[0])
        );
    }

    #[tokio::test]
    async fn test_build_failure_returns_no_partial_index() {
        let provider = MockClient::new().fail_after(1);
        let exercises = vec![
            exercise("Push-Up", Difficulty::Beginner),
            exercise("Bench Press", Difficulty::Intermediate),
            exercise("Dip", Difficulty::Intermediate),
        ];

        let result = ExerciseIndex::build(&exercises, &provider).await;

        assert!(matches!(result, Err(SearchError::IndexBuild(_))));
        // The failing call aborts the build; later exercises are never embedded.
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_build_rejects_inconsistent_dimensions() {
        struct VaryingDims(std::sync::atomic::AtomicUsize);

        #[async_trait]
        impl fitcoach_client::EmbeddingClient for VaryingDims {
            async fn embed(&self, _text: &str) -> Result<Vec<f32>, ClientError> {
                let call = self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Ok(vec![1.0; 4 + call])
            }
        }

        let provider = VaryingDims(std::sync::atomic::AtomicUsize::new(0));
        let exercises = vec![
            exercise("Push-Up", Difficulty::Beginner),
            exercise("Dip", Difficulty::Intermediate),
        ];

        let result = ExerciseIndex::build(&exercises, &provider).await;
        assert!(matches!(result, Err(SearchError::IndexBuild(_))));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("index.json");

        let index = ExerciseIndex::from_entries(vec![entry(
            "Squat",
            vec![0.25, 0.75],
            Difficulty::Advanced,
            &["barbell"],
            &["quads", "glutes"],
        )]);
        index.save(&path).unwrap();

        let loaded = ExerciseIndex::load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.entries()[0].exercise_name, "Squat");
        assert_eq!(loaded.entries()[0].embedding, vec![0.25, 0.75]);
        assert_eq!(loaded.entries()[0].metadata.difficulty, Difficulty::Advanced);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = ExerciseIndex::load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(SearchError::Io(_))));
    }

    #[test]
    fn test_random_vectors_rank_descending() {
        let entries: Vec<ExerciseEmbedding> = (0..20)
            .map(|i| {
                let vector: Vec<f32> = (0..8).map(|_| rand::random::<f32>() - 0.5).collect();
                entry(
                    &format!("Exercise {i}"),
                    vector,
                    Difficulty::Intermediate,
                    &[],
                    &[],
                )
            })
            .collect();
        let index = ExerciseIndex::from_entries(entries);

        let query: Vec<f32> = (0..8).map(|_| rand::random::<f32>() - 0.5).collect();
        let hits = index.find_similar(&query, &SearchOptions::new().with_top_k(20));

        assert_eq!(hits.len(), 20);
        for pair in hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}
