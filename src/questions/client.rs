use anyhow::{bail, Context, Result};
use http::header::CONTENT_TYPE;
use http::Method;
use serde_json::Value;
use tracing::info;

use crate::questions::model::{NewQuestion, Question};
use crate::sources::fetch::{AuthedClient, FetchOptions};
use crate::sources::metadata::MetadataSource;
use crate::sources::AcquireToken;
use crate::utils::constants::{HEALTH_PATH, QUESTIONS_PATH};

/// What the backend answered to a created question.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Json(Value),
    Text(String),
}

impl CreateOutcome {
    /// Confirmation message, only plain text answers carry one.
    pub fn message(&self) -> Option<&str> {
        match self {
            CreateOutcome::Text(text) => Some(text),
            CreateOutcome::Json(_) => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            CreateOutcome::Json(value) => value.clone(),
            CreateOutcome::Text(text) => Value::String(text.clone()),
        }
    }
}

/// Typed access to the questions backend.
#[derive(Debug, Clone)]
pub struct QuestionsClient<S = MetadataSource> {
    api: AuthedClient<S>,
}

impl<S: AcquireToken + Sync> QuestionsClient<S> {
    pub fn new(api: AuthedClient<S>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Question>> {
        let response = self
            .api
            .authed_fetch(QUESTIONS_PATH, FetchOptions::default())
            .await
            .context("questions request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("questions request returned status {}", status.as_u16());
        }

        let questions: Vec<Question> = response
            .json()
            .await
            .context("questions response is not a list of questions")?;
        info!("loaded {} questions", questions.len());
        Ok(questions)
    }

    pub async fn create(&self, question: &NewQuestion) -> Result<CreateOutcome> {
        let options = FetchOptions::new(Method::POST).json(question)?;
        let response = self
            .api
            .authed_fetch(QUESTIONS_PATH, options)
            .await
            .context("create question request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("HTTP error! status: {}", status.as_u16());
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"));

        let outcome = if is_json {
            CreateOutcome::Json(response.json().await.context("invalid JSON confirmation")?)
        } else {
            CreateOutcome::Text(response.text().await.context("unreadable confirmation")?)
        };
        info!("question created");
        Ok(outcome)
    }

    pub async fn health(&self) -> Result<bool> {
        let response = self
            .api
            .authed_fetch(HEALTH_PATH, FetchOptions::default())
            .await
            .context("health request failed")?;
        Ok(response.status().is_success())
    }
}
