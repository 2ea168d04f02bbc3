use std::collections::HashSet;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::questions::{get_all_questions, get_questions_for_category},
        Question,
    },
    server::{
        app::AppState, deserializers::deserialize_option_i64_from_string, error::ApiError,
        extract::AppJson, quiz::QuizPicker,
    },
    telemetry::{category_label, QUIZZES_EXHAUSTED, QUIZ_QUESTIONS_SERVED},
};

use super::ApiResponse;

#[derive(Deserialize)]
struct QuizCategory {
    // 0 or missing selects every category
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_option_i64_from_string")]
    id: Option<i64>,
}

#[derive(Deserialize)]
struct QuizBody {
    previous_questions: Option<Vec<i64>>,
    quiz_category: Option<QuizCategory>,
}

#[derive(Serialize)]
struct QuizQuestionBody {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    question: Option<Question>,
}

async fn next_question(
    State(pool): State<SqlitePool>,
    State(picker): State<QuizPicker>,
    AppJson(body): AppJson<QuizBody>,
) -> ApiResponse<QuizQuestionBody> {
    let (Some(previous), Some(quiz_category)) = (body.previous_questions, body.quiz_category)
    else {
        return Err(ApiError::BadRequest(
            "previous_questions and quiz_category are required".to_owned(),
        ));
    };
    let category = quiz_category.id.filter(|id| *id != 0);

    let candidates = match category {
        None => get_all_questions(&pool).await?,
        Some(id) => {
            let questions = get_questions_for_category(&pool, id).await?;
            if questions.is_empty() {
                return Err(ApiError::NotFound);
            }
            questions
        }
    };

    let previous: HashSet<i64> = previous.into_iter().collect();
    let question = picker.pick(candidates, &previous).await;
    let label = category_label(category);
    match &question {
        Some(q) => {
            QUIZ_QUESTIONS_SERVED.with_label_values(&[label.as_str()]).inc();
            tracing::debug!(question_id = q.id, category = %label, "Quiz question picked");
        }
        None => {
            QUIZZES_EXHAUSTED.with_label_values(&[label.as_str()]).inc();
            tracing::debug!(category = %label, seen = previous.len(), "Quiz exhausted");
        }
    }

    Ok(Json(QuizQuestionBody {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .route("/quiz", post(next_question))
        .with_state(state)
}
