use prometheus::register_counter_vec;
use prometheus::CounterVec;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

use crate::config::{LogFormat, LoggingSettings};

lazy_static! {
    pub static ref QUIZ_QUESTIONS_SERVED: CounterVec = register_counter_vec!(
        "trivia_quiz_questions_served_total",
        "Number of quiz questions handed out",
        &["category"]
    )
    .expect("quiz questions counter registers once");
    pub static ref QUIZZES_EXHAUSTED: CounterVec = register_counter_vec!(
        "trivia_quizzes_exhausted_total",
        "Number of quiz rounds that ran out of unseen questions",
        &["category"]
    )
    .expect("exhausted quizzes counter registers once");
}

/// Label used in metrics for a quiz round's category selector.
pub fn category_label(category: Option<i64>) -> String {
    category.map_or_else(|| "all".to_owned(), |id| id.to_string())
}

pub fn init_tracing(settings: &LoggingSettings) {
    let filter_layer = EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let span_events = if std::env::var("INCLUDE_SPAN_EVENTS")
        .is_ok_and(|value| value.eq_ignore_ascii_case("true"))
    {
        FmtSpan::ENTER | FmtSpan::EXIT
    } else {
        FmtSpan::NONE
    };

    let registry = tracing_subscriber::registry().with(filter_layer);
    match settings.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_span_events(span_events))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_span_events(span_events))
            .init(),
    }
}
