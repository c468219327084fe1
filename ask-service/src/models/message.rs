//! A single turn of the conversation replayed into prompts.

use serde::{Deserialize, Deserializer, Serialize};

/// Role assumed when a message arrives without one.
pub const DEFAULT_ROLE: &str = "user";

/// A prior message, oldest first in any sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role: "user" or "assistant". May be missing on the wire.
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,

    /// Message content.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }

    /// The role to print, falling back to [`DEFAULT_ROLE`] when blank.
    pub fn role(&self) -> &str {
        if self.role.trim().is_empty() {
            DEFAULT_ROLE
        } else {
            &self.role
        }
    }
}

/// Treat an explicit JSON `null` the same as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_role_defaults_to_user() {
        let msg: Message = serde_json::from_str(r#"{"content":"Hi"}"#).unwrap();
        assert_eq!(msg.role(), "user");
        assert_eq!(msg.content, "Hi");
    }

    #[test]
    fn null_and_blank_roles_default_to_user() {
        let msg: Message = serde_json::from_str(r#"{"role":null,"content":"Hi"}"#).unwrap();
        assert_eq!(msg.role(), "user");

        assert_eq!(Message::new("  ", "Hi").role(), "user");
    }

    #[test]
    fn explicit_role_is_kept() {
        assert_eq!(Message::assistant("Hello").role(), "assistant");
    }
}
