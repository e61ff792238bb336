//! Delivery of finished reminder videos to the customer.

use async_trait::async_trait;

/// Message SID returned by the simulated channel.
const SIMULATED_SID: &str = "simulated_message_sid";

/// Errors from the delivery channel.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Opaque confirmation of an accepted delivery.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    pub message_sid: String,
}

/// A channel that can deliver a video message to a customer.
///
/// Implementations must report failure through the `Result`; a channel
/// that swallows errors and always succeeds would silently mark
/// undelivered reminders as sent.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_video(
        &self,
        to: &str,
        message: &str,
        video_url: &str,
    ) -> Result<DeliveryReceipt, NotifyError>;
}

/// Stand-in for the WhatsApp integration: logs the would-be delivery
/// and always succeeds. Swap for a real channel implementation when
/// messaging goes live.
pub struct SimulatedWhatsApp;

#[async_trait]
impl Notifier for SimulatedWhatsApp {
    async fn send_video(
        &self,
        to: &str,
        _message: &str,
        video_url: &str,
    ) -> Result<DeliveryReceipt, NotifyError> {
        tracing::info!(to, video_url, "Simulated WhatsApp video message");
        Ok(DeliveryReceipt {
            message_sid: SIMULATED_SID.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn simulated_channel_returns_receipt() {
        let receipt = SimulatedWhatsApp
            .send_video("+911234567890", "Hello Raj", "https://media.example.com/v.mp4")
            .await
            .unwrap();
        assert_eq!(receipt.message_sid, SIMULATED_SID);
    }
}
