//! Outcome of a description generation request.

/// The part of a chat completion envelope that was absent.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    /// No `choices` array, or an empty one.
    #[error("response has no choices")]
    Choices,
    /// The first choice has no `message`.
    #[error("first choice has no message")]
    Message,
    /// The first choice's message has no text `content`.
    #[error("first choice message has no content")]
    Content,
}

/// Text extracted from a completion response.
///
/// A response that parsed but lacked the expected fields is reported as
/// [`Generation::Missing`] rather than as an empty string, so callers can
/// tell "the model said nothing" apart from "the model said this".
///
/// ```
/// use shop_copilot_core::{Generation, MissingField};
///
/// let ok = Generation::Text("Stay hydrated sustainably.".to_string());
/// assert_eq!(ok.text(), Some("Stay hydrated sustainably."));
///
/// let missing = Generation::Missing(MissingField::Choices);
/// assert_eq!(missing.text(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// The first choice's message content, verbatim.
    Text(String),
    /// The envelope did not have the expected shape.
    Missing(MissingField),
}

impl Generation {
    /// Returns the generated text, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Missing(_) => None,
        }
    }

    /// Consumes the outcome and returns the generated text, if any.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Missing(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_text() {
        assert_eq!(
            Generation::Text("a\nb".to_string()).into_text(),
            Some("a\nb".to_string())
        );
        assert_eq!(Generation::Missing(MissingField::Content).into_text(), None);
    }

    #[test]
    fn test_missing_field_display() {
        assert_eq!(MissingField::Choices.to_string(), "response has no choices");
        assert_eq!(
            MissingField::Content.to_string(),
            "first choice message has no content"
        );
    }
}
