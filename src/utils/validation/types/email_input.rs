//! Represents a validated email address.
//!
//! Email addresses are the only link between a patient account and a patient
//! record, and uniqueness at registration is an exact match. The address is
//! therefore trimmed and checked but its case is left untouched.

use anyhow::{bail, Result};
use std::fmt;
use validator::ValidateEmail;

use crate::utils::validation::MAX_EMAIL_LENGTH;

/// A validated email address that is guaranteed to meet format requirements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailInput {
    email: String,
}

impl EmailInput {
    /// Creates a new `EmailInput` after validating the provided email string
    /// against HTML5 email format requirements.
    ///
    /// # Example
    /// ```
    /// use clinic_api::utils::validation::EmailInput;
    ///
    /// let email = EmailInput::new("user@example.com").unwrap();
    /// assert!(EmailInput::new("not-an-email").is_err());
    /// ```
    pub fn new(email: &str) -> Result<Self> {
        let email_trimmed = email.trim();

        if email_trimmed.is_empty() {
            bail!("Email address cannot be empty");
        }

        if email_trimmed.len() > MAX_EMAIL_LENGTH {
            bail!("Email address exceeds maximum length of {MAX_EMAIL_LENGTH} characters");
        }

        if !email_trimmed.validate_email() {
            bail!("Invalid email format");
        }

        Ok(Self {
            email: email_trimmed.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.email
    }

    pub fn into_inner(self) -> String {
        self.email
    }
}

impl fmt::Display for EmailInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        let valid_emails = vec![
            "user@example.com",
            "user.name@example.com",
            "user+tag@example.com",
            "USER@EXAMPLE.COM",
            "   user@example.com   ",  // Should be trimmed
        ];

        for email in valid_emails {
            let result = EmailInput::new(email);
            assert!(result.is_ok(), "Should accept valid email: {}", email);
        }
    }

    #[test]
    fn test_invalid_emails() {
        let binding = format!("{}@example.com", "a".repeat(250));
        let invalid_emails = vec![
            "",
            " ",
            "not-an-email",
            "@example.com",
            "user@",
            "user name@example.com",
            &binding,  // Too long
        ];

        for email in invalid_emails {
            let result = EmailInput::new(email);
            assert!(result.is_err(), "Should reject invalid email: {}", email);
        }
    }

    #[test]
    fn test_case_is_preserved() {
        let email = EmailInput::new("  Alice.Martin@Example.com ").unwrap();
        assert_eq!(email.as_str(), "Alice.Martin@Example.com");
        assert_ne!(email, EmailInput::new("alice.martin@example.com").unwrap());
    }
}
