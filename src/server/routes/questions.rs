use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{categories_by_id, get_all_categories},
            questions::{self, count_questions, get_questions_page, search_questions},
        },
        NewQuestion, Question,
    },
    server::{
        app::AppState,
        deserializers::deserialize_option_i64_from_string,
        error::ApiError,
        extract::{AppJson, AppPath},
        pagination::{Page, PageQuery},
    },
};

use super::ApiResponse;

#[derive(Deserialize)]
struct QuestionForm {
    question: Option<String>,
    answer: Option<String>,
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_option_i64_from_string")]
    category: Option<i64>,
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_option_i64_from_string")]
    difficulty: Option<i64>,
}

impl TryFrom<QuestionForm> for NewQuestion {
    type Error = ApiError;

    fn try_from(form: QuestionForm) -> Result<Self, Self::Error> {
        let text = |value: Option<String>, field: &str| {
            value
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ApiError::Unprocessable(format!("{field} is required")))
        };
        let number = |value: Option<i64>, field: &str| {
            value
                .filter(|v| *v != 0)
                .ok_or_else(|| ApiError::Unprocessable(format!("{field} is required")))
        };
        Ok(NewQuestion {
            question: text(form.question, "question")?,
            answer: text(form.answer, "answer")?,
            category: number(form.category, "category")?,
            difficulty: number(form.difficulty, "difficulty")?,
        })
    }
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct QuestionsPageBody {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    current_category: Option<String>,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct DeletedBody {
    success: bool,
    question_id: i64,
    deleted: i64,
}

#[derive(Serialize)]
struct CreatedBody {
    success: bool,
    created: String,
}

#[derive(Serialize)]
struct SearchResultBody {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
}

async fn get_questions(
    State(pool): State<SqlitePool>,
    Query(query): Query<PageQuery>,
) -> ApiResponse<QuestionsPageBody> {
    let page = Page::try_from(query)?;
    let questions = get_questions_page(&pool, page.limit(), page.offset()).await?;
    let total_questions = count_questions(&pool).await?;
    let categories = get_all_categories(&pool).await?;
    tracing::debug!(page = page.number(), returned = questions.len(), "Questions page");

    Ok(Json(QuestionsPageBody {
        success: true,
        questions,
        total_questions,
        current_category: None,
        categories: categories_by_id(categories),
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    AppPath(id): AppPath<i64>,
) -> ApiResponse<DeletedBody> {
    if !questions::delete_question(&pool, id).await? {
        return Err(ApiError::Unprocessable(format!("question {id} does not exist")));
    }
    tracing::info!(question_id = id, "Question deleted");
    Ok(Json(DeletedBody {
        success: true,
        question_id: id,
        deleted: id,
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    AppJson(form): AppJson<QuestionForm>,
) -> ApiResponse<CreatedBody> {
    let new_question = NewQuestion::try_from(form)?;
    let id = questions::create_question(&pool, &new_question).await?;
    tracing::info!(question_id = id, category = new_question.category, "Question created");
    Ok(Json(CreatedBody {
        success: true,
        created: id.to_string(),
    }))
}

async fn search(
    State(pool): State<SqlitePool>,
    AppJson(body): AppJson<SearchBody>,
) -> ApiResponse<SearchResultBody> {
    let term = body
        .search_term
        .ok_or_else(|| ApiError::BadRequest("searchTerm is required".to_owned()))?;
    let questions = if term.trim().is_empty() {
        Vec::new()
    } else {
        search_questions(&pool, &term).await?
    };
    tracing::debug!(term = %term, found = questions.len(), "Question search");

    Ok(Json(SearchResultBody {
        success: true,
        total_questions: questions.len(),
        questions,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(get_questions).post(create_question))
        .route("/questions/search", post(search))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(json: serde_json::Value) -> Result<NewQuestion, ApiError> {
        NewQuestion::try_from(serde_json::from_value::<QuestionForm>(json).unwrap())
    }

    #[test]
    fn complete_form_is_accepted() {
        let question = form(serde_json::json!({
            "question": "new_question",
            "answer": "answer",
            "category": "1",
            "difficulty": 2
        }))
        .unwrap();
        assert_eq!(question.category, 1);
        assert_eq!(question.difficulty, 2);
    }

    #[test]
    fn falsy_fields_are_unprocessable() {
        let cases = [
            serde_json::json!({"question": "", "answer": "a", "category": 1, "difficulty": 1}),
            serde_json::json!({"question": "q", "answer": null, "category": 1, "difficulty": 1}),
            serde_json::json!({"question": "q", "answer": "a", "category": 0, "difficulty": 1}),
            serde_json::json!({"question": "q", "answer": "a", "category": 1}),
            serde_json::json!({"question": "q", "answer": "a", "category": "", "difficulty": 1}),
            serde_json::json!({}),
        ];
        for case in cases {
            assert!(matches!(form(case), Err(ApiError::Unprocessable(_))));
        }
    }
}
