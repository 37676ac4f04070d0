use async_trait::async_trait;

/// An outgoing email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
	pub to: String,
	pub subject: String,
	pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
	#[error("failed to deliver mail to {to}: {reason}")]
	Delivery { to: String, reason: String },
}

#[async_trait]
pub trait Mailer: Send + Sync {
	async fn send(&self, mail: Mail) -> Result<(), MailError>;
}

/// Writes mail to the log instead of delivering it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
	async fn send(&self, mail: Mail) -> Result<(), MailError> {
		tracing::info!(to = %mail.to, subject = %mail.subject, body = %mail.body, "sending mail");
		Ok(())
	}
}

pub fn password_reset_mail(to: &str, link: &str) -> Mail {
	Mail {
		to: to.to_string(),
		subject: "Reset your password".to_string(),
		body: format!("<a href=\"{link}\">Reset password</a>"),
	}
}
