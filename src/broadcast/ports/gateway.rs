//! SMS gateway port.

use crate::broadcast::domain::{PhoneNumber, RecordId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Result type for gateway calls.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// SMS handed to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingSms {
    /// Record the SMS is about, if any.
    pub record_id: Option<RecordId>,
    /// Canonical destination.
    pub destination: PhoneNumber,
    /// Rendered body.
    pub body: String,
}

/// What the gateway reports for an accepted SMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryAck {
    /// Accepted for later delivery.
    Queued,
    /// Delivered to the handset.
    Delivered,
}

/// Outbound SMS transport.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// Transmits one SMS.
    async fn send(&self, sms: &OutgoingSms) -> GatewayResult<DeliveryAck>;
}

/// Errors returned by gateway implementations.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The gateway refused the SMS.
    #[error("gateway rejected SMS to {destination}: {reason}")]
    Rejected {
        /// Destination of the refused SMS.
        destination: PhoneNumber,
        /// Reason given by the gateway.
        reason: String,
    },

    /// The gateway could not be reached.
    #[error("gateway transport failure: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl GatewayError {
    /// Wraps a transport failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
