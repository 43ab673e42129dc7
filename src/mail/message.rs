use crate::mail::error::MailError;
use chrono::Utc;
use lettre::message::{Mailbox, MultiPart};
use lettre::{Address, Message};
use uuid::Uuid;

const SITE_NAME: &str = "Artfolio";

/// A validated contact-form submission. Construction goes through
/// [`ContactForm::parse`], so a value of this type always has trimmed,
/// non-empty required fields and a plausible email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub country: Option<String>,
    pub message: String,
}

impl ContactForm {
    pub fn parse(
        name: &str,
        email: &str,
        country: Option<&str>,
        message: &str,
    ) -> Result<ContactForm, MailError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MailError::MissingField("name"));
        }
        let email = email.trim();
        if email.is_empty() {
            return Err(MailError::MissingField("email"));
        }
        if !valid_contact_email(email) {
            return Err(MailError::InvalidEmail);
        }
        let message = message.trim();
        if message.is_empty() {
            return Err(MailError::MissingField("message"));
        }
        let country = country
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        Ok(ContactForm {
            name: name.to_string(),
            email: email.to_string(),
            country,
            message: message.to_string(),
        })
    }
}

/// One non-whitespace local part, one `@`, and a domain with a dot that
/// has characters on both sides.
pub fn valid_contact_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// A ready-to-send message plus the Message-ID assigned to it, so the
/// caller can report the id back without parsing headers.
pub struct BuiltMessage {
    pub message: Message,
    pub message_id: String,
}

/// Confirmation sent to the submitter. Reply-To points at the service
/// mailbox so a reply reaches the artist.
pub fn confirmation(form: &ContactForm, service_user: &str) -> Result<BuiltMessage, MailError> {
    let service = service_address(service_user)?;
    let to = submitter_mailbox(form)?;
    let message_id = new_message_id(service_user);

    let plain = format!(
        "Thank You for Contacting {site}\n\n\
         Dear {name},\n\n\
         Thank you for reaching out to us! We have received your message and will \
         get back to you as soon as possible.\n\n\
         Your Message:\n{message}\n\n\
         We appreciate your interest in our artwork. If you have any urgent \
         questions, feel free to reply to this email.\n\n\
         ---\n{site}\n",
        site = SITE_NAME,
        name = form.name,
        message = form.message,
    );
    let html = format!(
        "<html><body>\
         <h1>Thank You for Contacting Us!</h1>\
         <p>Dear {name},</p>\
         <p>Thank you for reaching out to us! We have received your message and \
         will get back to you as soon as possible.</p>\
         <p><strong>Your Message:</strong></p>\
         <blockquote>{message}</blockquote>\
         <p>We appreciate your interest in our artwork. If you have any urgent \
         questions, feel free to reply to this email.</p>\
         <hr><p><strong>{site}</strong></p>\
         <p><small>This is an automated confirmation email.</small></p>\
         </body></html>",
        name = html_escape(&form.name),
        message = html_escape(&form.message),
        site = SITE_NAME,
    );

    let message = Message::builder()
        .from(Mailbox::new(Some(SITE_NAME.to_string()), service.clone()))
        .reply_to(Mailbox::new(None, service))
        .to(to)
        .subject(format!(
            "Thank you for contacting {} - We received your message",
            SITE_NAME
        ))
        .message_id(Some(message_id.clone()))
        .multipart(MultiPart::alternative_plain_html(plain, html))
        .map_err(|e| MailError::Build(e.to_string()))?;

    Ok(BuiltMessage {
        message,
        message_id,
    })
}

/// Notification sent to the service mailbox. Reply-To points at the
/// submitter so the artist can answer directly.
pub fn notification(form: &ContactForm, service_user: &str) -> Result<BuiltMessage, MailError> {
    let service = service_address(service_user)?;
    let reply_to = submitter_mailbox(form)?;
    let message_id = new_message_id(service_user);

    let country_line = form
        .country
        .as_deref()
        .map(|c| format!("Country: {}\n", c))
        .unwrap_or_default();
    let plain = format!(
        "New Contact Form Submission - {site}\n\n\
         Name: {name}\n\
         Email: {email}\n\
         {country_line}\n\
         Message:\n{message}\n\n\
         ---\nReceived on: {received}\n\
         Reply to this email to respond directly to {name}\n",
        site = SITE_NAME,
        name = form.name,
        email = form.email,
        country_line = country_line,
        message = form.message,
        received = Utc::now().to_rfc2822(),
    );
    let country_html = form
        .country
        .as_deref()
        .map(|c| format!("<p><strong>Country:</strong> {}</p>", html_escape(c)))
        .unwrap_or_default();
    let html = format!(
        "<html><body>\
         <h1>New Contact Form Submission</h1>\
         <p><strong>Name:</strong> {name}</p>\
         <p><strong>Email:</strong> <a href=\"mailto:{email}\">{email}</a></p>\
         {country_html}\
         <p><strong>Message:</strong></p>\
         <blockquote>{message}</blockquote>\
         <hr><p><small>Sent from the {site} contact form. \
         Reply to respond directly to {name}.</small></p>\
         </body></html>",
        name = html_escape(&form.name),
        email = html_escape(&form.email),
        country_html = country_html,
        message = html_escape(&form.message),
        site = SITE_NAME,
    );

    let message = Message::builder()
        .from(Mailbox::new(
            Some(format!("{} Contact Form", SITE_NAME)),
            service.clone(),
        ))
        .reply_to(reply_to)
        .to(Mailbox::new(None, service))
        .subject(format!("New Contact Form Submission from {}", form.name))
        .message_id(Some(message_id.clone()))
        .multipart(MultiPart::alternative_plain_html(plain, html))
        .map_err(|e| MailError::Build(e.to_string()))?;

    Ok(BuiltMessage {
        message,
        message_id,
    })
}

fn service_address(service_user: &str) -> Result<Address, MailError> {
    service_user
        .parse::<Address>()
        .map_err(|e| MailError::Build(format!("bad service mailbox '{}': {}", service_user, e)))
}

fn submitter_mailbox(form: &ContactForm) -> Result<Mailbox, MailError> {
    let address = form
        .email
        .parse::<Address>()
        .map_err(|_| MailError::InvalidEmail)?;
    Ok(Mailbox::new(Some(form.name.clone()), address))
}

fn new_message_id(service_user: &str) -> String {
    let domain = service_user.split_once('@').map_or("mail.local", |(_, d)| d);
    format!("<{}@{}>", Uuid::new_v4(), domain)
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
