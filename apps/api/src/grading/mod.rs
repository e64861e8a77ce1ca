pub mod handlers;
pub mod prompts;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Accepted scoring interval, inclusive. The prompt announces the same
/// bounds; a reply outside them is an upstream contract violation.
pub const MIN_SCORE: i64 = 1;
pub const MAX_SCORE: i64 = 10;

/// One grading request from the front end.
///
/// Fields default to empty strings so a missing field and a blank field take
/// the same validation path (HTTP 400) instead of a deserialization reject.
#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub expected_answer: String,
    #[serde(default)]
    pub user_answer: String,
}

/// The structured verdict returned to the front end.
#[derive(Debug, Serialize, PartialEq)]
pub struct GradeResponse {
    pub score: i64,
    pub feedback: String,
}

impl GradeRequest {
    /// Returns the three fields trimmed, or a validation error if any is
    /// empty. Must pass before anything is sent upstream.
    pub fn validated(&self) -> Result<(&str, &str, &str), AppError> {
        let question = self.question.trim();
        let expected = self.expected_answer.trim();
        let user = self.user_answer.trim();

        if question.is_empty() || expected.is_empty() || user.is_empty() {
            return Err(AppError::Validation(
                "Missing required fields: question, expected_answer, user_answer".to_string(),
            ));
        }
        Ok((question, expected, user))
    }
}

/// Loose mirror of the object the model is told to return. Every field is
/// optional here; `parse_grade` decides what is actually acceptable.
#[derive(Debug, Deserialize)]
struct RawGrade {
    score: Option<serde_json::Value>,
    feedback: Option<String>,
}

/// Parses and validates the upstream reply text.
///
/// Failure modes are distinct: text that is not a JSON object at all is a
/// malformed-reply error; a well-formed object with a bad score or empty
/// feedback is a contract violation. Success never assumes the upstream
/// honored structured-output mode.
pub fn parse_grade(raw: &str) -> Result<GradeResponse, AppError> {
    let parsed: RawGrade =
        serde_json::from_str(raw).map_err(|e| AppError::BadJson(e.to_string()))?;

    let score = parsed
        .score
        .as_ref()
        .and_then(|v| v.as_f64())
        .ok_or_else(|| AppError::UpstreamSchema("score is missing or not numeric".to_string()))?;

    if !(MIN_SCORE as f64..=MAX_SCORE as f64).contains(&score) {
        return Err(AppError::UpstreamSchema(format!(
            "score {score} outside {MIN_SCORE}..={MAX_SCORE}"
        )));
    }

    let feedback = parsed
        .feedback
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .ok_or_else(|| AppError::UpstreamSchema("feedback is missing or empty".to_string()))?;

    Ok(GradeResponse {
        score: score as i64,
        feedback: feedback.to_string(),
    })
}
