//! PostgreSQL repository tests.
//!
//! Each test gets a fresh database from `DATABASE_URL` with the migrations
//! applied.

mod common;

use chrono::{TimeZone, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use common::new_definition;
use lexicon_api::domain::entities::{DefinitionKey, Pronunciation, Rarity};
use lexicon_api::domain::query::{Comparator, Condition, TimestampField};
use lexicon_api::domain::repositories::DefinitionRepository;
use lexicon_api::infrastructure::persistence::PgDefinitionRepository;

async fn insert_at(pool: &PgPool, title: &str, at: chrono::DateTime<Utc>) {
    sqlx::query(
        "INSERT INTO definitions (title, definition, category, part_of_speech, example_usage, \
         rarity, created_at, updated_at) VALUES ($1, 'meaning', 'slang', 'noun', 'usage', \
         'common', $2, $2)",
    )
    .bind(title)
    .bind(at)
    .execute(pool)
    .await
    .unwrap();
}

#[sqlx::test]
async fn test_insert_and_find(pool: PgPool) {
    let repo = PgDefinitionRepository::new(Arc::new(pool));

    let mut new = new_definition("Sheng");
    new.synonyms = vec!["slang".to_string()];
    new.pronunciation = Pronunciation {
        word: Some("sheng".to_string()),
        audio: None,
    };

    let created = repo.insert(new).await.unwrap();
    assert_eq!(created.title, "Sheng");
    assert_eq!(created.synonyms, vec!["slang"]);
    assert_eq!(created.pronunciation.word.as_deref(), Some("sheng"));

    let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(by_id.title, "Sheng");

    let by_title = repo.find_by_title("Sheng").await.unwrap().unwrap();
    assert_eq!(by_title.id, created.id);

    assert!(repo.find_by_title("sheng").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_insert_duplicate_title_is_conflict(pool: PgPool) {
    let repo = PgDefinitionRepository::new(Arc::new(pool));

    repo.insert(new_definition("Sheng")).await.unwrap();
    let err = repo.insert(new_definition("Sheng")).await.unwrap_err();

    assert_eq!(err.status(), axum::http::StatusCode::CONFLICT);
}

#[sqlx::test]
async fn test_insert_many_is_atomic(pool: PgPool) {
    let repo = PgDefinitionRepository::new(Arc::new(pool));
    repo.insert(new_definition("Mtaa")).await.unwrap();

    let result = repo
        .insert_many(vec![new_definition("Sheng"), new_definition("Mtaa")])
        .await;

    assert!(result.is_err());
    assert_eq!(repo.count(None).await.unwrap(), 1);
}

#[sqlx::test]
async fn test_insert_many_returns_in_order(pool: PgPool) {
    let repo = PgDefinitionRepository::new(Arc::new(pool));

    let created = repo
        .insert_many(vec![
            new_definition("a"),
            new_definition("b"),
            new_definition("c"),
        ])
        .await
        .unwrap();

    let titles: Vec<&str> = created.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "b", "c"]);
}

#[sqlx::test]
async fn test_find_with_conditions(pool: PgPool) {
    let jan = Utc.with_ymd_and_hms(2023, 1, 10, 0, 0, 0).unwrap();
    let mar = Utc.with_ymd_and_hms(2023, 3, 10, 0, 0, 0).unwrap();
    insert_at(&pool, "Kenya old", jan).await;
    insert_at(&pool, "Kenya new", mar).await;
    insert_at(&pool, "Sheng", mar).await;

    let repo = PgDefinitionRepository::new(Arc::new(pool));
    let after_feb = Condition::Timestamp {
        field: TimestampField::CreatedAt,
        comparator: Comparator::Gt,
        value: Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap(),
    };
    let kenya = Condition::TitleMatches("KENYA".to_string());

    assert_eq!(repo.count(Some(kenya.clone())).await.unwrap(), 2);
    assert_eq!(repo.count(Some(after_feb.clone())).await.unwrap(), 2);

    let both = Condition::All(vec![after_feb.clone(), kenya.clone()]);
    let found = repo.find(Some(both), 10, 0).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Kenya new");

    let either = Condition::Any(vec![after_feb, kenya]);
    assert_eq!(repo.count(Some(either)).await.unwrap(), 3);
}

#[sqlx::test]
async fn test_find_paginates_by_id(pool: PgPool) {
    let repo = PgDefinitionRepository::new(Arc::new(pool));
    for title in ["a", "b", "c", "d", "e"] {
        repo.insert(new_definition(title)).await.unwrap();
    }

    let page = repo.find(None, 2, 2).await.unwrap();
    let titles: Vec<&str> = page.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["c", "d"]);
}

#[sqlx::test]
async fn test_replace_by_id_and_title(pool: PgPool) {
    let repo = PgDefinitionRepository::new(Arc::new(pool));
    let created = repo.insert(new_definition("Sheng")).await.unwrap();

    let mut update = new_definition("Sheng");
    update.rarity = Rarity::Rare;
    let replaced = repo
        .replace(DefinitionKey::Title("Sheng".to_string()), update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replaced.id, created.id);
    assert_eq!(replaced.rarity, Rarity::Rare);
    assert!(replaced.updated_at >= created.updated_at);

    let renamed = repo
        .replace(DefinitionKey::Id(created.id), new_definition("Sheng 2"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.title, "Sheng 2");

    let missing = repo
        .replace(DefinitionKey::Id(created.id + 100), new_definition("x"))
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test]
async fn test_delete_and_delete_many(pool: PgPool) {
    let repo = PgDefinitionRepository::new(Arc::new(pool));
    let a = repo.insert(new_definition("a")).await.unwrap();
    let b = repo.insert(new_definition("b")).await.unwrap();
    let c = repo.insert(new_definition("c")).await.unwrap();

    assert!(repo.delete(a.id).await.unwrap());
    assert!(!repo.delete(a.id).await.unwrap());

    let deleted = repo.delete_many(vec![a.id, b.id, c.id, 9999]).await.unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(repo.count(None).await.unwrap(), 0);
}

#[sqlx::test]
async fn test_ping(pool: PgPool) {
    let repo = PgDefinitionRepository::new(Arc::new(pool));
    assert!(repo.ping().await.is_ok());
}
