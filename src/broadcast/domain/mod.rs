//! Domain model for SMS broadcasts.
//!
//! Records carry the numbers an SMS is sent to, either on a linked contact
//! or in their own fields. The resolver turns them, plus any typed numbers,
//! into targets with a canonical destination, a rendered body and a
//! delivery state. Nothing here performs I/O.

mod error;
mod ids;
mod mode;
mod phone;
mod record;
mod resolver;
mod target;
mod template;

pub use error::{BroadcastDomainError, PhoneNumberError};
pub use ids::{RecipientId, RecordId, TemplateId};
pub use mode::CompositionMode;
pub use phone::{PhoneNumber, PhoneSanitizer, parse_number_list};
pub use record::{MOBILE_FIELD, PHONE_FIELD, Recipient, TargetRecord};
pub use resolver::{BlacklistSnapshot, RecipientResolver, ResolveOptions, ResolvedAddress};
pub use target::{BroadcastTarget, CancelReason, DeliveryState};
pub use template::{Locale, SmsTemplate};
