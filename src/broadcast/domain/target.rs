//! Per-destination outcome of a broadcast.

use super::{PhoneNumber, RecipientId, RecordId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a target is never transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    /// The destination is on the active blacklist.
    Blacklist,
    /// An earlier target already goes to the same destination.
    Duplicate,
    /// No usable destination could be derived.
    InvalidNumber,
}

impl CancelReason {
    /// Returns the failure code recorded for the canceled SMS.
    #[must_use]
    pub const fn failure_code(self) -> &'static str {
        match self {
            Self::Blacklist => "sms_blacklist",
            Self::Duplicate => "sms_duplicate",
            Self::InvalidNumber => "sms_number_format",
        }
    }
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.failure_code())
    }
}

/// Delivery state of a target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryState {
    /// Waiting for the gateway.
    Outgoing,
    /// Confirmed delivered by the gateway.
    Sent,
    /// Never transmitted.
    Canceled(CancelReason),
    /// The gateway refused or could not be reached.
    Failed(String),
}

impl DeliveryState {
    /// Returns the storage name of the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Outgoing => "outgoing",
            Self::Sent => "sent",
            Self::Canceled(_) => "canceled",
            Self::Failed(_) => "error",
        }
    }
}

/// One SMS produced by a broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastTarget {
    record_id: Option<RecordId>,
    recipient_id: Option<RecipientId>,
    raw_number: Option<String>,
    destination: Option<PhoneNumber>,
    body: String,
    state: DeliveryState,
}

impl BroadcastTarget {
    pub(super) const fn new(
        record_id: Option<RecordId>,
        recipient_id: Option<RecipientId>,
        raw_number: Option<String>,
        destination: Option<PhoneNumber>,
        body: String,
        state: DeliveryState,
    ) -> Self {
        Self {
            record_id,
            recipient_id,
            raw_number,
            destination,
            body,
            state,
        }
    }

    /// Returns the record the SMS is about, if any.
    #[must_use]
    pub const fn record_id(&self) -> Option<RecordId> {
        self.record_id
    }

    /// Returns the contact the number was taken from, if any.
    #[must_use]
    pub const fn recipient_id(&self) -> Option<RecipientId> {
        self.recipient_id
    }

    /// Returns the number as entered.
    #[must_use]
    pub fn raw_number(&self) -> Option<&str> {
        self.raw_number.as_deref()
    }

    /// Returns the canonical destination when the number could be sanitised.
    #[must_use]
    pub const fn destination(&self) -> Option<&PhoneNumber> {
        self.destination.as_ref()
    }

    /// Returns the rendered body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the delivery state.
    #[must_use]
    pub const fn state(&self) -> &DeliveryState {
        &self.state
    }

    /// Returns `true` while the target still has to be transmitted.
    #[must_use]
    pub const fn is_outgoing(&self) -> bool {
        matches!(self.state, DeliveryState::Outgoing)
    }

    /// Returns the cancel reason of a canceled target.
    #[must_use]
    pub const fn cancel_reason(&self) -> Option<CancelReason> {
        match self.state {
            DeliveryState::Canceled(reason) => Some(reason),
            _ => None,
        }
    }

    /// Records a confirmed delivery. Only outgoing targets change.
    pub fn mark_sent(&mut self) {
        if self.is_outgoing() {
            self.state = DeliveryState::Sent;
        }
    }

    /// Records a transport failure. Only outgoing targets change.
    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        if self.is_outgoing() {
            self.state = DeliveryState::Failed(reason.into());
        }
    }
}
