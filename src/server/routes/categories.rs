use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::queries::{categories::get_all_categories, questions::get_questions_for_category},
    server::{app::AppState, error::ApiError},
};

use super::{category_map, ApiResponse, CategoryMap, QuestionList};

#[derive(Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: CategoryMap,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<CategoriesResponse> {
    let categories = get_all_categories(&pool).await.map_err(ApiError::not_found)?;
    if categories.is_empty() {
        return Err(ApiError::not_found("no categories stored"));
    }
    Ok(Json(CategoriesResponse {
        success: true,
        categories: category_map(categories),
    }))
}

async fn questions_for_category(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResponse<QuestionList> {
    let Path(id) = id.map_err(ApiError::not_found)?;
    let questions = get_questions_for_category(&pool, id)
        .await
        .map_err(ApiError::not_found)?;
    Ok(Json(QuestionList::new(questions)))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_for_category))
        .with_state(state)
}
