//! CSV import and export of the trivia tables.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;

use super::queries::categories::{get_all_categories, import_categories};
use super::queries::questions::{get_all_questions, import_questions};
use super::{Category, Question};

pub const CATEGORIES_FILE: &str = "categories.csv";
pub const QUESTIONS_FILE: &str = "questions.csv";

fn write_to(path: PathBuf, data: Vec<impl Serialize>) -> anyhow::Result<()> {
    let file = std::fs::File::create(&path)?;
    let mut wtr = csv::Writer::from_writer(file);
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: PathBuf) -> anyhow::Result<Vec<T>> {
    let file =
        std::fs::File::open(&path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: T = record?;
        out.push(record);
    }
    Ok(out)
}

pub async fn export_data(pool: &SqlitePool, path: &Path) -> anyhow::Result<()> {
    let categories = get_all_categories(pool).await?;
    let questions = get_all_questions(pool).await?;
    if !path.exists() {
        std::fs::create_dir_all(path)?
    }
    write_to(path.join(CATEGORIES_FILE), categories)?;
    write_to(path.join(QUESTIONS_FILE), questions)?;
    Ok(())
}

/// Replaces both tables with the contents of the CSV files under `path`.
/// Both tables are synced in one transaction: any failing row rolls back the
/// whole import.
pub async fn import_data(pool: &SqlitePool, path: &Path) -> anyhow::Result<()> {
    let categories: Vec<Category> = read_from(path.join(CATEGORIES_FILE))?;
    let questions: Vec<Question> = read_from(path.join(QUESTIONS_FILE))?;
    tracing::info!(
        categories = categories.len(),
        questions = questions.len(),
        "Importing"
    );
    let mut tx = pool.begin().await?;
    import_categories(&mut tx, categories).await?;
    import_questions(&mut tx, questions).await?;
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{
        establish_in_memory, queries::questions::create_question, run_migrations, NewQuestion,
    };

    async fn pool() -> SqlitePool {
        let pool = establish_in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn exported_data_imports_into_fresh_database() {
        let source = pool().await;
        create_question(
            &source,
            &NewQuestion {
                question: "What is the heaviest organ in the human body?".to_owned(),
                answer: "The Liver".to_owned(),
                category: 1,
                difficulty: 4,
            },
        )
        .await
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("dump");
        export_data(&source, &out).await.unwrap();

        let csv = std::fs::read_to_string(out.join(CATEGORIES_FILE)).unwrap();
        assert!(csv.starts_with("id,type\n"));

        let target = pool().await;
        import_data(&target, &out).await.unwrap();
        assert_eq!(
            get_all_questions(&target).await.unwrap(),
            get_all_questions(&source).await.unwrap()
        );
        assert_eq!(
            get_all_categories(&target).await.unwrap(),
            get_all_categories(&source).await.unwrap()
        );
    }

    #[tokio::test]
    async fn failed_import_leaves_tables_unchanged() {
        let pool = pool().await;
        for text in ["first", "second"] {
            create_question(
                &pool,
                &NewQuestion {
                    question: text.to_owned(),
                    answer: "answer".to_owned(),
                    category: 1,
                    difficulty: 1,
                },
            )
            .await
            .unwrap();
        }
        let categories_before = get_all_categories(&pool).await.unwrap();
        let questions_before = get_all_questions(&pool).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CATEGORIES_FILE), "id,type\n1,Physics\n").unwrap();
        std::fs::write(
            dir.path().join(QUESTIONS_FILE),
            "id,question,answer,category,difficulty\n50,a,b,1,1\n50,c,d,1,1\n",
        )
        .unwrap();

        assert!(import_data(&pool, dir.path()).await.is_err());
        assert_eq!(get_all_categories(&pool).await.unwrap(), categories_before);
        assert_eq!(get_all_questions(&pool).await.unwrap(), questions_before);
    }

    #[tokio::test]
    async fn import_requires_both_files() {
        let pool = pool().await;
        let dir = tempfile::tempdir().unwrap();
        assert!(import_data(&pool, dir.path()).await.is_err());
    }
}
