use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::questions::model::{NewQuestion, QuestionForm};
use crate::server::server::AppState;

pub const LOAD_ERROR_MESSAGE: &str = "Something went wrong loading questions.";

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LoadError {
    pub error: String,
}

/// Outcome of a form submission, shaped for the page banners.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ActionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResult {
    fn failed(error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
            ..Default::default()
        }
    }
}

pub async fn list_questions(State(state): State<AppState>) -> Response {
    match state.questions.list().await {
        Ok(questions) => Json(questions).into_response(),
        Err(e) => {
            error!("loading questions failed: {:#}", e);
            let body = LoadError {
                error: LOAD_ERROR_MESSAGE.to_owned(),
            };
            (StatusCode::BAD_GATEWAY, Json(body)).into_response()
        }
    }
}

pub async fn create_question(State(state): State<AppState>, Form(form): Form<QuestionForm>) -> Response {
    let new_question = match NewQuestion::from_form(form) {
        Ok(q) => q,
        Err(e) => {
            warn!("rejected question form: {}", e);
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(ActionResult::failed(e.to_string()))).into_response();
        }
    };

    match state.questions.create(&new_question).await {
        Ok(outcome) => {
            info!("question submitted");
            Json(ActionResult {
                success: true,
                result: Some(outcome.to_value()),
                message: outcome.message().map(str::to_owned),
                error: None,
            })
            .into_response()
        }
        Err(e) => {
            error!("creating question failed: {:#}", e);
            (StatusCode::BAD_GATEWAY, Json(ActionResult::failed(e.to_string()))).into_response()
        }
    }
}

pub async fn health() -> &'static str {
    "OK"
}
