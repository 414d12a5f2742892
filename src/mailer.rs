//! SMTP delivery for the HTML report. Fire-and-forget: failures are logged,
//! never surfaced to the pipeline.

use lettre::message::header::ContentType;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use crate::config::MailConfig;

pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    config: MailConfig,
    subject: String,
}

impl Mailer {
    /// Plaintext relay on port 25, matching the operational mail setup.
    pub fn new(config: MailConfig, subject: String) -> Self {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(25)
            .build();
        Self {
            transport,
            config,
            subject,
        }
    }

    /// Hand the report to the relay. No delivery confirmation is surfaced.
    pub async fn send(&self, report_html: String) {
        let from = match self.config.from.parse::<lettre::message::Mailbox>() {
            Ok(mailbox) => mailbox,
            Err(e) => {
                error!(from = %self.config.from, error = %e, "Invalid from address; dropping report mail");
                return;
            }
        };
        let to = match self.config.to.parse::<lettre::message::Mailbox>() {
            Ok(mailbox) => mailbox,
            Err(e) => {
                error!(to = %self.config.to, error = %e, "Invalid to address; dropping report mail");
                return;
            }
        };

        let message = match Message::builder()
            .from(from)
            .to(to)
            .subject(self.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(report_html)
        {
            Ok(message) => message,
            Err(e) => {
                error!(error = %e, "Failed to build report mail");
                return;
            }
        };

        match self.transport.send(message).await {
            Ok(_) => info!(to = %self.config.to, host = %self.config.host, "Report mail handed to relay"),
            Err(e) => error!(error = %e, host = %self.config.host, "Report mail delivery failed"),
        }
    }
}
