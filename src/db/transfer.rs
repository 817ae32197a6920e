//! CSV dumps of the store, used to seed and back up a database.

use std::fs::File;
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;

use super::queries::categories::{get_all_categories, import_categories};
use super::queries::questions::{get_all_questions, import_questions};
use super::{Category, Question};

pub const CATEGORIES_FILE: &str = "categories.csv";
pub const QUESTIONS_FILE: &str = "questions.csv";

fn write_to(path: &Path, data: Vec<impl Serialize>) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("Cannot create {}", path.display()))?;
    let mut wtr = csv::Writer::from_writer(file);
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: T = record.with_context(|| format!("Malformed row in {}", path.display()))?;
        out.push(record);
    }
    Ok(out)
}

pub async fn export_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories = get_all_categories(pool).await?;
    let questions = get_all_questions(pool).await?;
    if !dir.exists() {
        std::fs::create_dir_all(dir)?
    }
    tracing::info!(
        "Exporting {} categories and {} questions to {}",
        categories.len(),
        questions.len(),
        dir.display()
    );
    write_to(&dir.join(CATEGORIES_FILE), categories)?;
    write_to(&dir.join(QUESTIONS_FILE), questions)?;
    Ok(())
}

/// Upserts by id, categories first so that questions can reference them.
pub async fn import_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories: Vec<Category> = read_from(&dir.join(CATEGORIES_FILE))?;
    let questions: Vec<Question> = read_from(&dir.join(QUESTIONS_FILE))?;
    tracing::info!(
        "Importing {} categories and {} questions from {}",
        categories.len(),
        questions.len(),
        dir.display()
    );
    import_categories(pool, categories).await?;
    import_questions(pool, questions).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::establish_in_memory;
    use crate::db::queries::{categories::create_category, questions::create_question};

    #[tokio::test]
    async fn export_writes_type_header() {
        let pool = establish_in_memory().await.unwrap();
        let art = create_category(&pool, "Art").await.unwrap();
        create_question(&pool, "Who painted Guernica?", "Picasso", 2, art)
            .await
            .unwrap();
        let dir = tempfile::tempdir().unwrap();

        export_data(&pool, dir.path()).await.unwrap();

        let categories = std::fs::read_to_string(dir.path().join(CATEGORIES_FILE)).unwrap();
        assert_eq!(categories.lines().next(), Some("id,type"));
        let questions = std::fs::read_to_string(dir.path().join(QUESTIONS_FILE)).unwrap();
        assert_eq!(questions.lines().count(), 2);
    }

    #[tokio::test]
    async fn import_seeds_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CATEGORIES_FILE),
            "id,type\n1,Science\n2,Art\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join(QUESTIONS_FILE),
            "id,question,answer,difficulty,category\n\
             5,What is the heaviest organ?,The Liver,4,1\n\
             9,\"Who painted \"\"Guernica\"\"?\",Picasso,2,2\n",
        )
        .unwrap();
        let pool = establish_in_memory().await.unwrap();

        import_data(&pool, dir.path()).await.unwrap();

        let questions = get_all_questions(&pool).await.unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].id, 9);
        assert_eq!(questions[1].question, "Who painted \"Guernica\"?");
        assert_eq!(get_all_categories(&pool).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn import_fails_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let pool = establish_in_memory().await.unwrap();
        assert!(import_data(&pool, dir.path()).await.is_err());
    }
}
