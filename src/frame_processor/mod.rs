// SPDX-License-Identifier: GPL-3.0-only

//! Payload processing
//!
//! Everything that turns pixels into payloads and payloads into meaning,
//! plus the inverse direction: structured templates into payload strings.

pub mod classifier;
pub mod tasks;
pub mod templates;
pub mod types;
mod uri;

pub use classifier::classify;
pub use tasks::qr_detector::{PayloadDecoder, QrDetector};
pub use templates::{
    CalendarEvent, ContactCard, EmailDraft, GeoPoint, SmsDraft, WifiConfig, encode_contact,
    encode_email, encode_event, encode_event_in, encode_geo, encode_sms, encode_wifi,
};
pub use types::{
    Contact, EmailMessage, GeoLocation, Payload, ScanKind, ScanResult, SmsMessage,
    WifiCredentials,
};
