use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::grading::prompts::{build_grading_prompt, GRADING_SYSTEM_PROMPT};
use crate::grading::{parse_grade, GradeRequest, GradeResponse};
use crate::state::AppState;

/// POST /api/interview
///
/// Validates the request, requires a configured credential, makes one call
/// to the completion service and validates its reply. Every failure is a
/// structured `{"error": ...}` response; nothing upstream is echoed back.
pub async fn handle_grade(
    State(state): State<AppState>,
    payload: Result<Json<GradeRequest>, JsonRejection>,
) -> Result<Json<GradeResponse>, AppError> {
    // A body that is not valid JSON is a client error with a structured
    // body, not axum's default plain-text rejection.
    let Json(req) = payload.map_err(|e| AppError::BadJson(e.body_text()))?;

    let (question, expected_answer, user_answer) = req.validated()?;

    debug!(
        "Grading request: question={} chars, expected={} chars, user={} chars",
        question.len(),
        expected_answer.len(),
        user_answer.len()
    );

    // Credential check comes before any prompt construction or network use.
    let llm = state.llm.as_ref().ok_or(AppError::MissingApiKey)?;

    let prompt = build_grading_prompt(question, expected_answer, user_answer);

    let reply = llm.complete(GRADING_SYSTEM_PROMPT, &prompt).await?;
    debug!("LLM reply: {reply}");

    let grade = parse_grade(&reply)?;
    info!(score = grade.score, "Graded answer");

    Ok(Json(grade))
}
