use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    config::QuizSettings,
    db::Question,
    server::{
        app::AppState,
        deserializers::deserialize_question_ids,
        error::ApiError,
        extractors::JsonBody,
        quiz::{fetch_candidates, select_next, CategorySelector},
    },
    telemetry::QUIZ_QUESTIONS_CNTR,
};

use super::ApiResponse;

#[derive(Deserialize)]
struct QuizCategory {
    // the frontend sends category keys as strings
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

#[derive(Deserialize)]
struct QuizTurn {
    quiz_category: QuizCategory,
    #[serde(default, deserialize_with = "deserialize_question_ids")]
    previous_questions: Vec<i64>,
}

#[derive(Serialize)]
struct NextQuestion {
    success: bool,
    question: Option<Question>,
}

async fn next_question(
    State(pool): State<SqlitePool>,
    State(settings): State<QuizSettings>,
    JsonBody(turn): JsonBody<QuizTurn>,
) -> ApiResponse<NextQuestion> {
    let selector = CategorySelector::from_id(turn.quiz_category.id);
    let candidates = fetch_candidates(&pool, selector)
        .await
        .map_err(ApiError::unprocessable)?;

    let question = select_next(
        candidates,
        &turn.previous_questions,
        settings.exclude_previous,
        &mut rand::thread_rng(),
    );
    match &question {
        Some(q) => {
            QUIZ_QUESTIONS_CNTR
                .with_label_values(&[selector.label().as_str()])
                .inc();
            tracing::debug!("Serving question {} for {:?}", q.id, selector);
        }
        None => tracing::debug!("No questions left for {:?}", selector),
    }

    Ok(Json(NextQuestion {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}
