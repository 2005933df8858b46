//! Application services for SMS broadcasts.

mod composer;
mod rendering;

pub use composer::{
    BroadcastPorts, BroadcastReport, ComposeBody, ComposeRequest, ComposerError, ComposerResult,
    SmsComposerService,
};
pub use rendering::SmsRenderError;
