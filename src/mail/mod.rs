pub mod error;
pub mod message;
pub mod service;

#[cfg(test)]
mod tests;

pub use error::MailError;
pub use message::{valid_contact_email, ContactForm};
pub use service::{FakeMailTransport, MailTransport, Mailer, SmtpMailTransport};
