use thiserror::Error;

/// Errors from contact-form parsing and SMTP delivery
#[derive(Error, Debug)]
pub enum MailError {
    /// A required form field is absent or blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid email address")]
    InvalidEmail,

    /// The message could not be assembled; indicates bad configuration
    /// rather than bad user input.
    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP transport error: {0}")]
    Transport(String),
}
