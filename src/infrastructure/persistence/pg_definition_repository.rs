//! PostgreSQL implementation of definition repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;

use crate::domain::entities::{Definition, DefinitionKey, NewDefinition, Pronunciation};
use crate::domain::query::Condition;
use crate::domain::repositories::DefinitionRepository;
use crate::error::AppError;

const SELECT_DEFINITIONS: &str = "SELECT id, title, definition, category, part_of_speech, \
     example_usage, rarity, spelling_variations, synonyms, pronunciation_word, \
     pronunciation_audio, created_at, updated_at FROM definitions";

const RETURNING_COLUMNS: &str = " RETURNING id, title, definition, category, part_of_speech, \
     example_usage, rarity, spelling_variations, synonyms, pronunciation_word, \
     pronunciation_audio, created_at, updated_at";

/// Rows per multi-row INSERT; ten binds per row keeps well under the
/// PostgreSQL bind limit.
const INSERT_CHUNK_SIZE: usize = 1000;

#[derive(sqlx::FromRow)]
struct DefinitionRow {
    id: i64,
    title: String,
    definition: String,
    category: String,
    part_of_speech: String,
    example_usage: String,
    rarity: String,
    spelling_variations: Vec<String>,
    synonyms: Vec<String>,
    pronunciation_word: Option<String>,
    pronunciation_audio: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DefinitionRow> for Definition {
    fn from(row: DefinitionRow) -> Self {
        Definition {
            id: row.id,
            title: row.title,
            definition: row.definition,
            category: row.category,
            part_of_speech: row.part_of_speech,
            example_usage: row.example_usage,
            // The table constraint limits rarity to known values.
            rarity: row.rarity.parse().unwrap_or_default(),
            spelling_variations: row.spelling_variations,
            synonyms: row.synonyms,
            pronunciation: Pronunciation {
                word: row.pronunciation_word,
                audio: row.pronunciation_audio,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Appends `condition` as SQL with bound parameters.
pub(crate) fn push_condition(qb: &mut QueryBuilder<'_, Postgres>, condition: &Condition) {
    match condition {
        Condition::Timestamp {
            field,
            comparator,
            value,
        } => {
            qb.push(field.column())
                .push(" ")
                .push(comparator.sql_operator())
                .push(" ")
                .push_bind(*value);
        }
        Condition::TitleMatches(pattern) => {
            qb.push("title ~* ").push_bind(pattern.clone());
        }
        Condition::All(parts) => push_group(qb, parts, " AND ", "TRUE"),
        Condition::Any(parts) => push_group(qb, parts, " OR ", "FALSE"),
    }
}

fn push_group(
    qb: &mut QueryBuilder<'_, Postgres>,
    parts: &[Condition],
    separator: &str,
    identity: &str,
) {
    if parts.is_empty() {
        qb.push(identity);
        return;
    }

    qb.push("(");
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            qb.push(separator);
        }
        push_condition(qb, part);
    }
    qb.push(")");
}

pub(crate) fn push_where(qb: &mut QueryBuilder<'_, Postgres>, condition: Option<&Condition>) {
    if let Some(condition) = condition {
        qb.push(" WHERE ");
        push_condition(qb, condition);
    }
}

/// PostgreSQL repository for dictionary definitions.
///
/// Filter conditions are rendered with `QueryBuilder`, so every user-supplied
/// value travels as a bound parameter.
pub struct PgDefinitionRepository {
    pool: Arc<PgPool>,
}

impl PgDefinitionRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DefinitionRepository for PgDefinitionRepository {
    async fn count(&self, condition: Option<Condition>) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM definitions");
        push_where(&mut qb, condition.as_ref());

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn find(
        &self,
        condition: Option<Condition>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Definition>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_DEFINITIONS);
        push_where(&mut qb, condition.as_ref());
        qb.push(" ORDER BY id ASC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = qb
            .build_query_as::<DefinitionRow>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Definition::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Definition>, AppError> {
        let row = sqlx::query_as::<_, DefinitionRow>(&format!("{SELECT_DEFINITIONS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Definition::from))
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Definition>, AppError> {
        let row =
            sqlx::query_as::<_, DefinitionRow>(&format!("{SELECT_DEFINITIONS} WHERE title = $1"))
                .bind(title)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(row.map(Definition::from))
    }

    async fn insert(&self, new_definition: NewDefinition) -> Result<Definition, AppError> {
        let mut created = self.insert_many(vec![new_definition]).await?;
        created
            .pop()
            .ok_or_else(|| AppError::internal("Insert returned no row", serde_json::json!({})))
    }

    async fn insert_many(
        &self,
        new_definitions: Vec<NewDefinition>,
    ) -> Result<Vec<Definition>, AppError> {
        if new_definitions.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(new_definitions.len());

        for chunk in new_definitions.chunks(INSERT_CHUNK_SIZE) {
            let mut qb = QueryBuilder::<Postgres>::new(
                "INSERT INTO definitions (title, definition, category, part_of_speech, \
                 example_usage, rarity, spelling_variations, synonyms, pronunciation_word, \
                 pronunciation_audio) ",
            );

            qb.push_values(chunk, |mut b, d| {
                b.push_bind(d.title.clone())
                    .push_bind(d.definition.clone())
                    .push_bind(d.category.clone())
                    .push_bind(d.part_of_speech.clone())
                    .push_bind(d.example_usage.clone())
                    .push_bind(d.rarity.as_str())
                    .push_bind(d.spelling_variations.clone())
                    .push_bind(d.synonyms.clone())
                    .push_bind(d.pronunciation.word.clone())
                    .push_bind(d.pronunciation.audio.clone());
            });
            qb.push(RETURNING_COLUMNS);

            let rows = qb
                .build_query_as::<DefinitionRow>()
                .fetch_all(&mut *tx)
                .await?;

            created.extend(rows.into_iter().map(Definition::from));
        }

        tx.commit().await?;

        created.sort_by_key(|d| d.id);
        Ok(created)
    }

    async fn replace(
        &self,
        key: DefinitionKey,
        new_definition: NewDefinition,
    ) -> Result<Option<Definition>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE definitions SET title = ");
        qb.push_bind(new_definition.title)
            .push(", definition = ")
            .push_bind(new_definition.definition)
            .push(", category = ")
            .push_bind(new_definition.category)
            .push(", part_of_speech = ")
            .push_bind(new_definition.part_of_speech)
            .push(", example_usage = ")
            .push_bind(new_definition.example_usage)
            .push(", rarity = ")
            .push_bind(new_definition.rarity.as_str())
            .push(", spelling_variations = ")
            .push_bind(new_definition.spelling_variations)
            .push(", synonyms = ")
            .push_bind(new_definition.synonyms)
            .push(", pronunciation_word = ")
            .push_bind(new_definition.pronunciation.word)
            .push(", pronunciation_audio = ")
            .push_bind(new_definition.pronunciation.audio)
            .push(", updated_at = NOW()");

        match key {
            DefinitionKey::Id(id) => qb.push(" WHERE id = ").push_bind(id),
            DefinitionKey::Title(title) => qb.push(" WHERE title = ").push_bind(title),
        };
        qb.push(RETURNING_COLUMNS);

        let row = qb
            .build_query_as::<DefinitionRow>()
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Definition::from))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM definitions WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, ids: Vec<i64>) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM definitions WHERE id = ANY($1)")
            .bind(ids)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
