use crate::models::message::{null_as_default, Message};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Body of `POST /ask`. Field names follow the browser client's camelCase.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub question: String,

    /// Visible text of the page the user is looking at.
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_content: String,

    /// Raw page markup. Accepted for client compatibility; prompts use `page_content`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_html: String,

    /// Running summary returned by the previous call, empty on the first turn.
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub recent_messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub summary: String,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("question must not be empty".into());
        return Err(err);
    }
    Ok(())
}
