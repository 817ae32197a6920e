use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_all_categories, questions},
        Question,
    },
    server::{
        app::AppState,
        deserializers::{deserialize_page, first_page, FIRST_PAGE},
        error::ApiError,
        extractors::JsonBody,
        pagination::paginate,
    },
    telemetry::{QUESTIONS_CREATED_CNTR, QUESTIONS_DELETED_CNTR},
};

use super::{category_map, ApiResponse, CategoryMap, QuestionList};

#[derive(Deserialize)]
struct PageQuery {
    #[serde(default = "first_page", deserialize_with = "deserialize_page")]
    page: i64,
}

#[derive(Deserialize)]
struct NewQuestion {
    question: String,
    answer: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    difficulty: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    category: i64,
}

impl NewQuestion {
    fn validate(&self) -> Result<(), &'static str> {
        if self.question.trim().is_empty() {
            return Err("question text is blank");
        }
        if self.answer.trim().is_empty() {
            return Err("answer text is blank");
        }
        if self.difficulty < 1 {
            return Err("difficulty must be at least 1");
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchBody {
    search_term: String,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    categories: CategoryMap,
}

#[derive(Serialize)]
struct Created {
    success: bool,
    created: i64,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: i64,
}

async fn get_questions(
    State(pool): State<SqlitePool>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<QuestionsPage> {
    let page = query.map(|Query(q)| q.page).unwrap_or(FIRST_PAGE);
    let selection = questions::get_all_questions(&pool)
        .await
        .map_err(ApiError::not_found)?;
    let categories = get_all_categories(&pool)
        .await
        .map_err(ApiError::not_found)?;

    let current = paginate(&selection, page);
    if current.is_empty() {
        return Err(ApiError::not_found(format!("page {page} has no questions")));
    }

    Ok(Json(QuestionsPage {
        success: true,
        questions: current.to_vec(),
        total_questions: selection.len(),
        categories: category_map(categories),
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    JsonBody(new_question): JsonBody<NewQuestion>,
) -> ApiResponse<Created> {
    new_question.validate().map_err(ApiError::unprocessable)?;
    let id = questions::create_question(
        &pool,
        &new_question.question,
        &new_question.answer,
        new_question.difficulty,
        new_question.category,
    )
    .await
    .map_err(ApiError::unprocessable)?;

    QUESTIONS_CREATED_CNTR.inc();
    tracing::info!("Created question {id}");
    Ok(Json(Created {
        success: true,
        created: id,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Deleted> {
    let Path(id) = id.map_err(ApiError::unprocessable)?;
    questions::delete_question(&pool, id)
        .await
        .map_err(ApiError::unprocessable)?;

    QUESTIONS_DELETED_CNTR.inc();
    tracing::info!("Deleted question {id}");
    Ok(Json(Deleted {
        success: true,
        deleted: id,
    }))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    JsonBody(body): JsonBody<SearchBody>,
) -> ApiResponse<QuestionList> {
    let results = questions::search_questions(&pool, &body.search_term)
        .await
        .map_err(ApiError::not_found)?;
    Ok(Json(QuestionList::new(results)))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(get_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_question(body: serde_json::Value) -> Result<NewQuestion, serde_json::Error> {
        serde_json::from_value(body)
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let q = new_question(serde_json::json!({
            "question": "Q", "answer": "A", "difficulty": "3", "category": "2"
        }))
        .unwrap();
        assert_eq!((q.difficulty, q.category), (3, 2));
        assert!(q.validate().is_ok());
    }

    #[test]
    fn missing_fields_do_not_parse() {
        assert!(new_question(serde_json::json!({"question": "Q", "answer": "A"})).is_err());
        assert!(new_question(serde_json::json!({
            "question": "Q", "answer": "A", "difficulty": "hard", "category": 1
        }))
        .is_err());
    }

    #[test]
    fn blank_text_and_zero_difficulty_are_invalid() {
        let blank = new_question(serde_json::json!({
            "question": "  ", "answer": "A", "difficulty": 1, "category": 1
        }))
        .unwrap();
        assert!(blank.validate().is_err());

        let easy = new_question(serde_json::json!({
            "question": "Q", "answer": "A", "difficulty": 0, "category": 1
        }))
        .unwrap();
        assert!(easy.validate().is_err());
    }

    #[test]
    fn search_term_is_camel_case() {
        let body: SearchBody =
            serde_json::from_value(serde_json::json!({"searchTerm": "title"})).unwrap();
        assert_eq!(body.search_term, "title");
    }
}
