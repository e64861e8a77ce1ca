use super::{MAX_SCORE, MIN_SCORE};

/// System prompt enforcing the interviewer persona and JSON-only output.
pub const GRADING_SYSTEM_PROMPT: &str = "You are a professional technical interviewer. \
    You MUST respond with a single valid JSON object and nothing else. \
    Do NOT use markdown code fences. \
    Do NOT include explanations outside the JSON object.";

/// Builds the grading prompt for one candidate answer.
///
/// Grading policy: lenient semantic evaluation — the candidate is graded on
/// whether they understood the concept, not on how closely their wording
/// matches the reference answer. Scale and bounds match the validator.
pub fn build_grading_prompt(question: &str, expected_answer: &str, user_answer: &str) -> String {
    format!(
        "You are an experienced interviewer for a Data Analyst / Data Scientist position.\n\
         \n\
         Your task: evaluate the candidate's answer on a scale from {MIN_SCORE} to {MAX_SCORE} \
         and give short constructive feedback.\n\
         \n\
         **Question:**\n\
         {question}\n\
         \n\
         **Reference answer (for context):**\n\
         {expected_answer}\n\
         \n\
         **Candidate's answer:**\n\
         {user_answer}\n\
         \n\
         **How to grade:**\n\
         - Judge semantic understanding, not verbatim overlap with the reference answer\n\
         - An answer in the candidate's own words that captures the key ideas deserves a high score\n\
         - Penalize factual mistakes and missing core concepts, not style\n\
         \n\
         **Response format (strict JSON):**\n\
         {{\n\
           \"score\": <integer from {MIN_SCORE} to {MAX_SCORE}>,\n\
           \"feedback\": \"<short constructive feedback, 2-3 sentences>\"\n\
         }}\n\
         \n\
         Do not add anything outside the JSON. Return only the JSON."
    )
}
