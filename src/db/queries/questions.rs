use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub difficulty: i64,
    pub category: i64,
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, difficulty, category FROM questions ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, difficulty, category FROM questions
        WHERE questions.category = ?1
        ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

/// Questions whose text contains `term`, ignoring case (Unicode-aware), ordered by id.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    let term = term.to_lowercase();
    let mut questions = get_all_questions(pool).await?;
    questions.retain(|q| q.question.to_lowercase().contains(&term));
    Ok(questions)
}

pub async fn create_question(
    pool: &SqlitePool,
    question: &str,
    answer: &str,
    difficulty: i64,
    category: i64,
) -> sqlx::Result<i64> {
    let id = sqlx::query(
        r#"
        INSERT INTO questions (question, answer, difficulty, category) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(question)
    .bind(answer)
    .bind(difficulty)
    .bind(category)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

pub async fn delete_question(pool: &SqlitePool, question_id: i64) -> sqlx::Result<()> {
    let deleted = sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(question_id)
    .execute(pool)
    .await?
    .rows_affected();

    if deleted == 0 {
        return Err(sqlx::Error::RowNotFound);
    }
    Ok(())
}

pub async fn count_questions(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM questions
        "#,
    )
    .fetch_one(pool)
    .await
}

pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for question in questions {
        sqlx::query(
            r#"
            INSERT INTO questions (id, question, answer, difficulty, category)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (id) DO UPDATE SET
                question = excluded.question,
                answer = excluded.answer,
                difficulty = excluded.difficulty,
                category = excluded.category
            "#,
        )
        .bind(question.id)
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.difficulty)
        .bind(question.category)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{establish_in_memory, queries::categories::create_category};

    async fn seeded() -> (SqlitePool, i64, i64) {
        let pool = establish_in_memory().await.unwrap();
        let science = create_category(&pool, "Science").await.unwrap();
        let history = create_category(&pool, "History").await.unwrap();
        create_question(&pool, "What is H2O?", "Water", 1, science)
            .await
            .unwrap();
        create_question(&pool, "Who painted 100% of the Mona Lisa?", "Leonardo", 2, history)
            .await
            .unwrap();
        create_question(&pool, "Which planet is red?", "Mars", 1, science)
            .await
            .unwrap();
        (pool, science, history)
    }

    #[tokio::test]
    async fn questions_are_ordered_by_id() {
        let (pool, _, _) = seeded().await;
        let ids: Vec<i64> = get_all_questions(&pool)
            .await
            .unwrap()
            .iter()
            .map(|q| q.id)
            .collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(ids.len(), 3);
    }

    #[tokio::test]
    async fn filter_by_category() {
        let (pool, science, history) = seeded().await;
        let questions = get_questions_for_category(&pool, science).await.unwrap();
        assert_eq!(questions.len(), 2);
        assert!(questions.iter().all(|q| q.category == science));
        assert_eq!(
            get_questions_for_category(&pool, history).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn search_ignores_case() {
        let (pool, _, _) = seeded().await;
        let found = search_questions(&pool, "PLANET").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].answer, "Mars");
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let (pool, _, _) = seeded().await;
        assert_eq!(search_questions(&pool, "100%").await.unwrap().len(), 1);
        assert!(search_questions(&pool, "H_O").await.unwrap().is_empty());
        assert_eq!(search_questions(&pool, "%").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn question_for_unknown_category_is_rejected() {
        let pool = establish_in_memory().await.unwrap();
        let result = create_question(&pool, "Orphan?", "Yes", 1, 99).await;
        assert!(result.is_err());
        assert_eq!(count_questions(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_missing_question_is_row_not_found() {
        let (pool, _, _) = seeded().await;
        let err = delete_question(&pool, 1000).await.unwrap_err();
        assert!(matches!(err, sqlx::Error::RowNotFound));
        assert_eq!(count_questions(&pool).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn delete_removes_question() {
        let (pool, science, _) = seeded().await;
        let id = create_question(&pool, "Boiling point?", "100C", 2, science)
            .await
            .unwrap();
        delete_question(&pool, id).await.unwrap();
        let remaining = get_all_questions(&pool).await.unwrap();
        assert!(remaining.iter().all(|q| q.id != id));
        assert_eq!(count_questions(&pool).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn search_folds_non_ascii_case() {
        let (pool, _, history) = seeded().await;
        let id = create_question(&pool, "Where is ÉCOLE Polytechnique?", "Paris", 3, history)
            .await
            .unwrap();
        let found = search_questions(&pool, "école").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, id);
    }

    #[tokio::test]
    async fn second_delete_of_same_question_fails() {
        let (pool, science, _) = seeded().await;
        let id = create_question(&pool, "Speed of light?", "c", 3, science)
            .await
            .unwrap();
        delete_question(&pool, id).await.unwrap();
        let err = delete_question(&pool, id).await.unwrap_err();
        assert!(matches!(err, sqlx::Error::RowNotFound));
    }
}
