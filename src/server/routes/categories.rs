use std::collections::BTreeMap;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{categories_by_id, get_all_categories, get_category},
            questions::get_questions_for_category,
        },
        Question,
    },
    server::{app::AppState, extract::AppPath},
};

use super::ApiResponse;

#[derive(Serialize)]
struct CategoriesBody {
    success: bool,
    categories: BTreeMap<i64, String>,
    total_categories: usize,
}

#[derive(Serialize)]
struct CategoryQuestionsBody {
    success: bool,
    category: String,
    current_category: String,
    total_questions: usize,
    questions: Vec<Question>,
}

// the category set is small and the UI wants all of it, so `?page=` is ignored
async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<CategoriesBody> {
    let categories = get_all_categories(&pool).await?;
    Ok(Json(CategoriesBody {
        success: true,
        total_categories: categories.len(),
        categories: categories_by_id(categories),
    }))
}

async fn questions_for_category(
    State(pool): State<SqlitePool>,
    AppPath(id): AppPath<i64>,
) -> ApiResponse<CategoryQuestionsBody> {
    let category = get_category(&pool, id).await?;
    let questions = get_questions_for_category(&pool, id).await?;
    tracing::debug!(category = id, found = questions.len(), "Questions for category");
    Ok(Json(CategoryQuestionsBody {
        success: true,
        current_category: category.kind.clone(),
        category: category.kind,
        total_questions: questions.len(),
        questions,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_for_category))
        .with_state(state)
}
