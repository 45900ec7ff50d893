//! Constants used throughout the validation system

/// Maximum length for long-form content (medical notes)
pub const MAX_CONTENT_LENGTH: usize = 4_000;
/// Maximum length for short-form content (names, usernames, reasons)
pub const MAX_SHORT_CONTENT_LENGTH: usize = 250;
/// Maximum length of an email address
pub const MAX_EMAIL_LENGTH: usize = 254;
