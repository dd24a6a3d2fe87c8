//! Analysis email: HTML formatting and SMTP delivery

pub mod sender;
pub mod template;

pub use sender::{EmailError, EmailSender, MailTransport, SmtpMailer};
pub use template::{email_subject, format_email_html, RISK_WARNING};
