//! Outbound OTP notification.
//!
//! Delivery is a fire-and-forget capability behind [`EmailSender`]. The only
//! implementation here logs the code; a real mailer plugs in without touching
//! the OTP service.

pub trait EmailSender: Send + Sync {
    /// Deliver `code` to `to`. Returns whether delivery was accepted.
    fn send(&self, to: &str, code: &str) -> bool;
}

/// Stub sender that writes the message to the log instead of mailing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEmailSender;

impl EmailSender for LogEmailSender {
    fn send(&self, to: &str, code: &str) -> bool {
        tracing::info!(recipient = %to, "[EMAIL] Sending OTP to {}: {}", to, code);
        true
    }
}
