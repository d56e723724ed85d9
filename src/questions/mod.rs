//! Typed client for the questions backend.

pub mod client;
pub mod model;

pub use client::{CreateOutcome, QuestionsClient};
pub use model::{FormError, NewQuestion, NumberOrText, Question, QuestionForm};
