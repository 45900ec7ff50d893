//! Provides a validated text content representation.
//!
//! This module ensures that text content meets safety requirements by:
//! - Validating length constraints
//! - Checking for control characters
//! - Preventing HTML injection
//! - Normalizing whitespace and Unicode

use ammonia::is_html;
use anyhow::{bail, Context, Result};
use std::fmt;
use unicode_normalization::UnicodeNormalization;
use validator::ValidateNonControlCharacter;

use crate::utils::validation::{MAX_CONTENT_LENGTH, MAX_SHORT_CONTENT_LENGTH};

/// Validated textual content. Can only be constructed through validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextInput {
    text_content: String,
}

impl TextInput {
    /// Long-form content such as medical notes.
    pub fn new_long_form(content: &str) -> Result<Self> {
        Self::new(content, MAX_CONTENT_LENGTH)
            .context("Failed to create long-form content")
    }

    /// Short-form content such as names, usernames or an appointment reason.
    ///
    /// # Example
    /// ```
    /// use clinic_api::utils::validation::TextInput;
    ///
    /// let reason = TextInput::new_short_form("Toothache").unwrap();
    /// assert_eq!(reason.as_str(), "Toothache");
    /// ```
    pub fn new_short_form(content: &str) -> Result<Self> {
        Self::new(content, MAX_SHORT_CONTENT_LENGTH)
            .context("Failed to create short-form content")
    }

    fn new(content: &str, max_length: usize) -> Result<Self> {
        let trimmed = content.trim();

        if trimmed.is_empty() {
            bail!("Content cannot be empty");
        }

        if trimmed.chars().count() > max_length {
            bail!("Content exceeds maximum length of {} characters", max_length);
        }

        // Line breaks are legitimate in long-form notes
        let without_breaks: String = trimmed.chars().filter(|c| !matches!(c, '\n' | '\r' | '\t')).collect();
        if !without_breaks.as_str().validate_non_control_character() {
            bail!("Content contains invalid control characters");
        }

        if is_html(trimmed) {
            bail!("Content cannot contain HTML");
        }

        let normalized = trimmed.nfkc().collect::<String>();

        Ok(Self {
            text_content: normalized,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text_content
    }

    pub fn into_inner(self) -> String {
        self.text_content
    }
}

impl fmt::Display for TextInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text_content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_content() {
        let valid_contents = vec![
            "Simple text",
            "Text with numbers 123",
            "Text with symbols !@#",
            "Text with unicode ñáéíóú",
            " Text with whitespace  ",
        ];

        for content in valid_contents {
            let result = TextInput::new_short_form(content);
            assert!(result.is_ok(), "Should accept valid content: {}", content);
        }
    }

    #[test]
    fn test_invalid_content() {
        let binding = "a".repeat(MAX_SHORT_CONTENT_LENGTH + 1);
        let invalid_contents = vec![
            "",
            "   ",
            "<p>HTML content</p>",
            &binding,  // Too long
            "Text with null\0character",
        ];

        for content in invalid_contents {
            let result = TextInput::new_short_form(content);
            assert!(result.is_err(), "Should reject invalid content: {}", content);
        }
    }

    #[test]
    fn test_long_form_keeps_line_breaks() {
        let notes = TextInput::new_long_form("Allergic to penicillin.\nFollow-up in 6 months.").unwrap();
        assert!(notes.as_str().contains('\n'));
    }

    #[test]
    fn test_content_normalization() {
        let content = TextInput::new_short_form("  Normal Text  ").unwrap();
        assert_eq!(content.as_str(), "Normal Text");
        assert_eq!(content.to_string(), "Normal Text");
    }

    #[test]
    fn test_content_length_limits() {
        let short_content = "A".repeat(MAX_SHORT_CONTENT_LENGTH);
        assert!(TextInput::new_short_form(&short_content).is_ok());

        let long_content = "A".repeat(MAX_CONTENT_LENGTH);
        assert!(TextInput::new_long_form(&long_content).is_ok());
    }
}
