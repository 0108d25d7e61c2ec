//! JSON handlers exposed to the browser.
//!
//! Each handler takes the decoded request body and returns the JSON the
//! views expect. Request-level failures (exhausted attempts, malformed XML,
//! missing `event_type`) come back as structured results, not errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::block::{AuthorEdit, Presentation, SubmitAndCompareBlock};
use crate::error::{BlockError, HandlerError};
use crate::model::SubmitAction;

pub const STUDENT_SUBMIT: &str = "student_submit";
pub const STUDIO_SUBMIT: &str = "studio_submit";
pub const SEND_HINTS: &str = "send_hints";
pub const PUBLISH_EVENT: &str = "publish_event";

/// Body of `student_submit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSubmitRequest {
    pub answer: String,
    /// `"submit"` for a scored attempt; anything else saves a draft.
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSubmitResponse {
    pub success: bool,
    pub problem_progress: String,
    pub submit_class: String,
    pub used_attempts_feedback: String,
}

impl StudentSubmitResponse {
    fn new(success: bool, presentation: Presentation) -> Self {
        Self {
            success,
            problem_progress: presentation.problem_progress,
            submit_class: presentation.submit_class,
            used_attempts_feedback: presentation.used_attempts_feedback,
        }
    }
}

/// Body of `studio_submit`.
pub type StudioSubmitRequest = AuthorEdit;

/// Outcome string used by the author and event handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandlerResult {
    Success,
    Error,
}

/// Response of `studio_submit` and `publish_event`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultResponse {
    pub result: HandlerResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResultResponse {
    pub fn success() -> Self {
        Self {
            result: HandlerResult::Success,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            result: HandlerResult::Error,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintsResponse {
    pub result: HandlerResult,
    pub hints: Vec<String>,
}

/// Save or submit the learner's answer.
pub fn student_submit(
    block: &SubmitAndCompareBlock,
    request: &StudentSubmitRequest,
) -> Result<StudentSubmitResponse, BlockError> {
    let action = SubmitAction::from_wire(&request.action);
    match block.submit(&request.answer, action) {
        Ok(outcome) => Ok(StudentSubmitResponse::new(true, outcome.presentation)),
        Err(BlockError::AttemptsExhausted { .. }) => Ok(StudentSubmitResponse::new(
            false,
            block.current_presentation()?,
        )),
        Err(e) => Err(e),
    }
}

/// Save an author edit.
pub fn studio_submit(
    block: &SubmitAndCompareBlock,
    request: &StudioSubmitRequest,
) -> Result<ResultResponse, BlockError> {
    match block.author_submit(request) {
        Ok(()) => Ok(ResultResponse::success()),
        Err(e) if e.is_user_facing() => Ok(ResultResponse::error(e.to_string())),
        Err(e) => Err(e),
    }
}

/// All hints, decorated, so the view can cycle through them locally.
pub fn send_hints(block: &SubmitAndCompareBlock) -> Result<HintsResponse, BlockError> {
    Ok(HintsResponse {
        result: HandlerResult::Success,
        hints: block.hints()?,
    })
}

/// Forward a browser event to the host.
pub fn publish_event(
    block: &SubmitAndCompareBlock,
    data: Value,
) -> Result<ResultResponse, BlockError> {
    match block.publish_event(data) {
        Ok(()) => Ok(ResultResponse::success()),
        Err(e) if e.is_user_facing() => Ok(ResultResponse::error(e.to_string())),
        Err(e) => Err(e),
    }
}

fn decode<T: serde::de::DeserializeOwned>(handler: &str, body: Value) -> Result<T, HandlerError> {
    serde_json::from_value(body).map_err(|e| HandlerError::BadRequest(format!("{handler}: {e}")))
}

fn encode<T: Serialize>(response: &T) -> Result<Value, HandlerError> {
    serde_json::to_value(response).map_err(|e| HandlerError::BadRequest(e.to_string()))
}

/// Route a handler call by name, the way the host's handler URL does.
pub fn dispatch(
    block: &SubmitAndCompareBlock,
    handler: &str,
    body: Value,
) -> Result<Value, HandlerError> {
    tracing::debug!(handler, "dispatching handler");
    match handler {
        STUDENT_SUBMIT => {
            let request: StudentSubmitRequest = decode(handler, body)?;
            encode(&student_submit(block, &request)?)
        }
        STUDIO_SUBMIT => {
            let request: StudioSubmitRequest = decode(handler, body)?;
            encode(&studio_submit(block, &request)?)
        }
        SEND_HINTS => encode(&send_hints(block)?),
        PUBLISH_EVENT => encode(&publish_event(block, body)?),
        other => Err(HandlerError::UnknownHandler(other.to_string())),
    }
}
