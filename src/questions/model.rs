use std::fmt;

use serde::{Deserialize, Serialize};

/// The backend is loose about ids and answer indexes: both show up
/// as numbers or as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(i64),
    Text(String),
}

impl NumberOrText {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NumberOrText::Number(n) => Some(*n),
            NumberOrText::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for NumberOrText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberOrText::Number(n) => write!(f, "{}", n),
            NumberOrText::Text(s) => f.write_str(s),
        }
    }
}

/// A stored question as returned by `GET /questions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: NumberOrText,
    pub question: String,
    pub answer1: String,
    pub answer2: String,
    pub answer3: String,
    pub answer4: String,
    #[serde(default)]
    pub correct_answer: Option<NumberOrText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_cast: Option<String>,
}

impl Question {
    pub fn answers(&self) -> [&str; 4] {
        [&self.answer1, &self.answer2, &self.answer3, &self.answer4]
    }

    /// Text of the correct answer, `correct_answer` is 1-based.
    pub fn correct_answer_text(&self) -> Option<&str> {
        let index = self.correct_answer.as_ref()?.as_i64()?;
        let index = usize::try_from(index.checked_sub(1)?).ok()?;
        self.answers().get(index).copied()
    }
}

/// Body of `POST /questions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub question: String,
    pub answer1: String,
    pub answer2: String,
    pub answer3: String,
    pub answer4: String,
    pub correct_answer: u8,
}

/// Raw form submission, every field as typed by the user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionForm {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer1: String,
    #[serde(default)]
    pub answer2: String,
    #[serde(default)]
    pub answer3: String,
    #[serde(default)]
    pub answer4: String,
    #[serde(default)]
    pub correct_answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    Missing(&'static str),
    CorrectAnswerOutOfRange(String),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::Missing(field) => write!(f, "missing field: {}", field),
            FormError::CorrectAnswerOutOfRange(value) => {
                write!(f, "correct_answer must be a number from 1 to 4, got '{}'", value)
            }
        }
    }
}

impl std::error::Error for FormError {}

impl NewQuestion {
    pub fn from_form(form: QuestionForm) -> Result<Self, FormError> {
        let correct_answer = form
            .correct_answer
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|n| (1..=4).contains(n))
            .ok_or_else(|| FormError::CorrectAnswerOutOfRange(form.correct_answer.clone()))?;

        Ok(Self {
            question: required("question", form.question)?,
            answer1: required("answer1", form.answer1)?,
            answer2: required("answer2", form.answer2)?,
            answer3: required("answer3", form.answer3)?,
            answer4: required("answer4", form.answer4)?,
            correct_answer,
        })
    }
}

fn required(field: &'static str, value: String) -> Result<String, FormError> {
    if value.trim().is_empty() {
        return Err(FormError::Missing(field));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form() -> QuestionForm {
        QuestionForm {
            question: "Largest planet?".into(),
            answer1: "Mars".into(),
            answer2: "Jupiter".into(),
            answer3: "Venus".into(),
            answer4: "Earth".into(),
            correct_answer: "2".into(),
        }
    }

    #[test]
    fn parses_backend_rows_with_mixed_types() {
        let rows: Vec<Question> = serde_json::from_value(json!([
            {"id": 1, "question": "q1", "answer1": "a", "answer2": "b", "answer3": "c", "answer4": "d",
             "correct_answer": 3, "time_cast": "Wed, 14 Oct 2026 10:00:00 GMT"},
            {"id": "q-2", "question": "q2", "answer1": "a", "answer2": "b", "answer3": "c", "answer4": "d",
             "correct_answer": "1"},
            {"id": 3, "question": "q3", "answer1": "a", "answer2": "b", "answer3": "c", "answer4": "d",
             "correct_answer": null}
        ]))
        .unwrap();

        assert_eq!(rows[0].id, NumberOrText::Number(1));
        assert_eq!(rows[0].correct_answer_text(), Some("c"));
        assert_eq!(rows[1].id.to_string(), "q-2");
        assert_eq!(rows[1].correct_answer_text(), Some("a"));
        assert_eq!(rows[1].time_cast, None);
        assert_eq!(rows[2].correct_answer_text(), None);
    }

    #[test]
    fn correct_answer_out_of_range_has_no_text() {
        let mut question: Question = serde_json::from_value(json!({
            "id": 1, "question": "q", "answer1": "a", "answer2": "b", "answer3": "c", "answer4": "d",
            "correct_answer": 0
        }))
        .unwrap();
        assert_eq!(question.correct_answer_text(), None);
        question.correct_answer = Some(NumberOrText::Number(5));
        assert_eq!(question.correct_answer_text(), None);
        question.correct_answer = Some(NumberOrText::Text("four".into()));
        assert_eq!(question.correct_answer_text(), None);
    }

    #[test]
    fn form_becomes_new_question() {
        let new_question = NewQuestion::from_form(form()).unwrap();
        assert_eq!(new_question.correct_answer, 2);
        assert_eq!(
            serde_json::to_value(&new_question).unwrap(),
            json!({"question": "Largest planet?", "answer1": "Mars", "answer2": "Jupiter",
                   "answer3": "Venus", "answer4": "Earth", "correct_answer": 2})
        );
    }

    #[test]
    fn form_rejects_blank_fields() {
        let mut blank = form();
        blank.answer3 = "   ".into();
        assert_eq!(NewQuestion::from_form(blank), Err(FormError::Missing("answer3")));
    }

    #[test]
    fn form_rejects_correct_answer_outside_1_to_4() {
        for value in ["0", "5", "", "two", "-1"] {
            let mut bad = form();
            bad.correct_answer = value.into();
            assert_eq!(
                NewQuestion::from_form(bad),
                Err(FormError::CorrectAnswerOutOfRange(value.into())),
                "value {value:?}"
            );
        }
    }
}
