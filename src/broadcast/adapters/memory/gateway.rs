//! Gateway that records transmitted SMS for inspection.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use super::poisoned;
use crate::broadcast::{
    domain::PhoneNumber,
    ports::{DeliveryAck, GatewayError, GatewayResult, OutgoingSms, SmsGateway},
};

#[derive(Debug, Default)]
struct GatewayState {
    sent: Vec<OutgoingSms>,
    refused: HashSet<PhoneNumber>,
}

/// Thread-safe recording gateway.
///
/// Accepted SMS are acknowledged as [`DeliveryAck::Queued`] unless the
/// gateway was built with [`RecordingSmsGateway::delivering`].
#[derive(Debug, Clone)]
pub struct RecordingSmsGateway {
    state: Arc<RwLock<GatewayState>>,
    ack: DeliveryAck,
}

impl Default for RecordingSmsGateway {
    fn default() -> Self {
        Self {
            state: Arc::default(),
            ack: DeliveryAck::Queued,
        }
    }
}

impl RecordingSmsGateway {
    /// Creates a gateway that queues every SMS.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway that reports every SMS as delivered.
    #[must_use]
    pub fn delivering() -> Self {
        Self {
            ack: DeliveryAck::Delivered,
            ..Self::default()
        }
    }

    /// Makes the gateway refuse SMS to `number`.
    pub fn refuse(&self, number: PhoneNumber) {
        if let Ok(mut state) = self.state.write() {
            state.refused.insert(number);
        }
    }

    /// Returns every SMS accepted so far, oldest first.
    #[must_use]
    pub fn sent(&self) -> Vec<OutgoingSms> {
        self.state
            .read()
            .map(|state| state.sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SmsGateway for RecordingSmsGateway {
    async fn send(&self, sms: &OutgoingSms) -> GatewayResult<DeliveryAck> {
        let mut state = self
            .state
            .write()
            .map_err(|err| GatewayError::transport(poisoned(err)))?;
        if state.refused.contains(&sms.destination) {
            return Err(GatewayError::Rejected {
                destination: sms.destination.clone(),
                reason: "destination refused".to_owned(),
            });
        }
        state.sent.push(sms.clone());
        Ok(self.ack)
    }
}
