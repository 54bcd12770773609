#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, routing::get};
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use regex::RegexBuilder;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

use lexicon_api::api::handlers::health_handler;
use lexicon_api::api::routes::definition_routes;
use lexicon_api::application::services::ListSettings;
use lexicon_api::domain::entities::{Definition, DefinitionKey, NewDefinition, Pronunciation, Rarity};
use lexicon_api::domain::query::{Condition, TimestampField};
use lexicon_api::domain::repositories::DefinitionRepository;
use lexicon_api::error::AppError;
use lexicon_api::state::AppState;
use lexicon_api::validation::CreateRules;

/// Definition store held in memory; evaluates [`Condition`] trees directly.
#[derive(Default)]
pub struct InMemoryDefinitionRepository {
    rows: Mutex<Vec<Definition>>,
    next_id: Mutex<i64>,
}

impl InMemoryDefinitionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a definition with fixed timestamps.
    pub fn seed_at(&self, new_definition: NewDefinition, at: DateTime<Utc>) -> Definition {
        let definition = self.build(new_definition, at);
        self.rows.lock().unwrap().push(definition.clone());
        definition
    }

    pub fn seed(&self, title: &str) -> Definition {
        self.seed_at(new_definition(title), Utc::now())
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn build(&self, d: NewDefinition, at: DateTime<Utc>) -> Definition {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;

        Definition {
            id: *next_id,
            title: d.title,
            definition: d.definition,
            category: d.category,
            part_of_speech: d.part_of_speech,
            example_usage: d.example_usage,
            rarity: d.rarity,
            spelling_variations: d.spelling_variations,
            synonyms: d.synonyms,
            pronunciation: d.pronunciation,
            created_at: at,
            updated_at: at,
        }
    }

    fn matching(&self, condition: Option<&Condition>) -> Vec<Definition> {
        let mut rows: Vec<Definition> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|d| condition.is_none_or(|c| matches(c, d)))
            .cloned()
            .collect();
        rows.sort_by_key(|d| d.id);
        rows
    }
}

fn matches(condition: &Condition, d: &Definition) -> bool {
    match condition {
        Condition::Timestamp {
            field,
            comparator,
            value,
        } => {
            let ts = match field {
                TimestampField::CreatedAt => d.created_at,
                TimestampField::UpdatedAt => d.updated_at,
            };
            comparator.compare(&ts, value)
        }
        Condition::TitleMatches(pattern) => RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map(|re| re.is_match(&d.title))
            .unwrap_or(false),
        Condition::All(parts) => parts.iter().all(|p| matches(p, d)),
        Condition::Any(parts) => parts.iter().any(|p| matches(p, d)),
    }
}

fn conflict() -> AppError {
    AppError::conflict("Definition with this title already exists", json!({}))
}

#[async_trait]
impl DefinitionRepository for InMemoryDefinitionRepository {
    async fn count(&self, condition: Option<Condition>) -> Result<i64, AppError> {
        Ok(self.matching(condition.as_ref()).len() as i64)
    }

    async fn find(
        &self,
        condition: Option<Condition>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Definition>, AppError> {
        Ok(self
            .matching(condition.as_ref())
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Definition>, AppError> {
        Ok(self.rows.lock().unwrap().iter().find(|d| d.id == id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Definition>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.title == title)
            .cloned())
    }

    async fn insert(&self, new_definition: NewDefinition) -> Result<Definition, AppError> {
        let mut created = self.insert_many(vec![new_definition]).await?;
        Ok(created.remove(0))
    }

    async fn insert_many(
        &self,
        new_definitions: Vec<NewDefinition>,
    ) -> Result<Vec<Definition>, AppError> {
        {
            let rows = self.rows.lock().unwrap();
            for (i, d) in new_definitions.iter().enumerate() {
                let taken = rows.iter().any(|r| r.title == d.title)
                    || new_definitions[..i].iter().any(|o| o.title == d.title);
                if taken {
                    return Err(conflict());
                }
            }
        }

        let now = Utc::now();
        let created: Vec<Definition> = new_definitions
            .into_iter()
            .map(|d| self.build(d, now))
            .collect();
        self.rows.lock().unwrap().extend(created.iter().cloned());
        Ok(created)
    }

    async fn replace(
        &self,
        key: DefinitionKey,
        d: NewDefinition,
    ) -> Result<Option<Definition>, AppError> {
        let mut rows = self.rows.lock().unwrap();

        let Some(index) = rows.iter().position(|r| match &key {
            DefinitionKey::Id(id) => r.id == *id,
            DefinitionKey::Title(title) => &r.title == title,
        }) else {
            return Ok(None);
        };

        let target_id = rows[index].id;
        if rows.iter().any(|r| r.id != target_id && r.title == d.title) {
            return Err(conflict());
        }

        let row = &mut rows[index];
        row.title = d.title;
        row.definition = d.definition;
        row.category = d.category;
        row.part_of_speech = d.part_of_speech;
        row.example_usage = d.example_usage;
        row.rarity = d.rarity;
        row.spelling_variations = d.spelling_variations;
        row.synonyms = d.synonyms;
        row.pronunciation = d.pronunciation;
        row.updated_at = Utc::now();

        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|d| d.id != id);
        Ok(rows.len() < before)
    }

    async fn delete_many(&self, ids: Vec<i64>) -> Result<u64, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|d| !ids.contains(&d.id));
        Ok((before - rows.len()) as u64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Repository whose every call fails like an unreachable database.
pub struct UnavailableRepository;

fn unavailable() -> AppError {
    AppError::internal("connection refused", json!({}))
}

#[async_trait]
impl DefinitionRepository for UnavailableRepository {
    async fn count(&self, _: Option<Condition>) -> Result<i64, AppError> {
        Err(unavailable())
    }
    async fn find(&self, _: Option<Condition>, _: i64, _: i64) -> Result<Vec<Definition>, AppError> {
        Err(unavailable())
    }
    async fn find_by_id(&self, _: i64) -> Result<Option<Definition>, AppError> {
        Err(unavailable())
    }
    async fn find_by_title(&self, _: &str) -> Result<Option<Definition>, AppError> {
        Err(unavailable())
    }
    async fn insert(&self, _: NewDefinition) -> Result<Definition, AppError> {
        Err(unavailable())
    }
    async fn insert_many(&self, _: Vec<NewDefinition>) -> Result<Vec<Definition>, AppError> {
        Err(unavailable())
    }
    async fn replace(
        &self,
        _: DefinitionKey,
        _: NewDefinition,
    ) -> Result<Option<Definition>, AppError> {
        Err(unavailable())
    }
    async fn delete(&self, _: i64) -> Result<bool, AppError> {
        Err(unavailable())
    }
    async fn delete_many(&self, _: Vec<i64>) -> Result<u64, AppError> {
        Err(unavailable())
    }
    async fn ping(&self) -> Result<(), AppError> {
        Err(unavailable())
    }
}

pub fn new_definition(title: &str) -> NewDefinition {
    NewDefinition {
        title: title.to_string(),
        definition: format!("Meaning of {title}"),
        category: "slang".to_string(),
        part_of_speech: "noun".to_string(),
        example_usage: format!("They said {title}"),
        rarity: Rarity::Common,
        spelling_variations: vec![],
        synonyms: vec![],
        pronunciation: Pronunciation::default(),
    }
}

/// JSON body accepted by `POST /definitions` under the default rules.
pub fn definition_body(title: &str) -> Value {
    json!({
        "title": title,
        "definition": format!("Meaning of {title}"),
        "category": "slang",
        "partOfSpeech": "noun",
        "exampleUsage": format!("They said {title}"),
        "rarity": "common",
        "pronunciation": { "word": title.to_lowercase(), "audio": null }
    })
}

pub fn create_test_state(repository: Arc<dyn DefinitionRepository>) -> AppState {
    AppState::new(repository, CreateRules::default(), ListSettings::default())
}

/// Router with the definition routes and health check, without path normalization.
pub fn create_test_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/definitions", definition_routes())
        .with_state(state)
}

pub fn create_test_server(repository: Arc<InMemoryDefinitionRepository>) -> TestServer {
    TestServer::new(create_test_app(create_test_state(repository))).unwrap()
}
