use crate::config::SmtpConfig;
use crate::mail::error::MailError;
use crate::mail::message::{confirmation, notification, valid_contact_email, ContactForm};
use crate::mail::service::{FakeMailTransport, Mailer};

fn smtp_config() -> SmtpConfig {
    SmtpConfig {
        host: "smtp.example.com".to_string(),
        port: 587,
        secure: false,
        user: "artist@example.com".to_string(),
        pass: "hunter2".to_string(),
    }
}

fn sample_form() -> ContactForm {
    ContactForm::parse(
        "Ada Collector",
        "ada@buyers.example",
        Some("Norway"),
        "Is the blue landscape still available?",
    )
    .unwrap()
}

#[test]
fn email_validation() {
    for accepted in [
        "a@b.c",
        "user.name@mail.example.org",
        "first+tag@sub.domain.io",
    ] {
        assert!(valid_contact_email(accepted), "{} should pass", accepted);
    }
    for rejected in [
        "",
        "plain",
        "a@b",
        "a b@c.d",
        "a@c .d",
        "a@@b.c",
        "@b.c",
        "a@.c",
        "a@c.",
    ] {
        assert!(!valid_contact_email(rejected), "{} should fail", rejected);
    }
}

#[test]
fn parse_trims_and_normalizes() {
    let form = ContactForm::parse("  Ada  ", " ada@buyers.example ", Some("  "), " Hello ").unwrap();
    assert_eq!(form.name, "Ada");
    assert_eq!(form.email, "ada@buyers.example");
    assert_eq!(form.country, None);
    assert_eq!(form.message, "Hello");
}

#[test]
fn parse_rejects_missing_fields() {
    assert!(matches!(
        ContactForm::parse("", "a@b.c", None, "hi"),
        Err(MailError::MissingField("name"))
    ));
    assert!(matches!(
        ContactForm::parse("Ada", "  ", None, "hi"),
        Err(MailError::MissingField("email"))
    ));
    assert!(matches!(
        ContactForm::parse("Ada", "not-an-email", None, "hi"),
        Err(MailError::InvalidEmail)
    ));
    assert!(matches!(
        ContactForm::parse("Ada", "a@b.c", None, "  "),
        Err(MailError::MissingField("message"))
    ));
}

#[test]
fn message_ids_carry_the_service_domain() {
    let built = confirmation(&sample_form(), "artist@example.com").unwrap();
    assert!(built.message_id.starts_with('<'));
    assert!(built.message_id.ends_with("@example.com>"));

    let notify = notification(&sample_form(), "artist@example.com").unwrap();
    assert_ne!(built.message_id, notify.message_id);
}

#[tokio::test]
async fn send_contact_delivers_both_emails_in_order() {
    let transport = FakeMailTransport::new();
    let mailer = Mailer::new(transport.clone(), &smtp_config());

    let message_id = mailer.send_contact(&sample_form()).await.unwrap();

    assert_eq!(transport.fake_sent_count(), 2);
    // Confirmation to the submitter first, then the notification to the
    // service mailbox
    assert_eq!(transport.fake_recipients(0), vec!["ada@buyers.example"]);
    assert_eq!(transport.fake_recipients(1), vec!["artist@example.com"]);
    assert!(message_id.ends_with("@example.com>"));
}

#[tokio::test]
async fn confirmation_failure_skips_the_notification() {
    let transport = FakeMailTransport::new();
    let mailer = Mailer::new(transport.clone(), &smtp_config());

    // Only the first send fails; an attempted second send would succeed
    // and be recorded
    transport.fake_fail_next_send();
    let result = mailer.send_contact(&sample_form()).await;

    assert!(matches!(result, Err(MailError::Transport(_))));
    assert_eq!(transport.fake_sent_count(), 0);
}

#[tokio::test]
async fn transport_failure_propagates() {
    let transport = FakeMailTransport::new();
    transport.fake_fail_sends(true);
    let mailer = Mailer::new(transport, &smtp_config());

    let result = mailer.send_contact(&sample_form()).await;
    assert!(matches!(result, Err(MailError::Transport(_))));
}
