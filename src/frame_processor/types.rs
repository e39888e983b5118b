// SPDX-License-Identifier: GPL-3.0-only

//! Scan result types
//!
//! A [`ScanResult`] pairs the exact decoded payload with the structure
//! recovered from it. The structured part is a single sum type so the
//! kind tag and the parsed fields can never disagree.

use serde::Serialize;
use std::fmt;

/// Classification tag for a decoded payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanKind {
    Url,
    Wifi,
    Email,
    Sms,
    Tel,
    Geo,
    Vcard,
    Text,
}

impl ScanKind {
    pub const ALL: [ScanKind; 8] = [
        ScanKind::Url,
        ScanKind::Wifi,
        ScanKind::Email,
        ScanKind::Sms,
        ScanKind::Tel,
        ScanKind::Geo,
        ScanKind::Vcard,
        ScanKind::Text,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanKind::Url => "url",
            ScanKind::Wifi => "wifi",
            ScanKind::Email => "email",
            ScanKind::Sms => "sms",
            ScanKind::Tel => "tel",
            ScanKind::Geo => "geo",
            ScanKind::Vcard => "vcard",
            ScanKind::Text => "text",
        }
    }
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// WiFi network credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WifiCredentials {
    pub ssid: String,
    pub password: String,
    /// Security token as written in the payload (`WPA`, `WEP`, `nopass`, ...)
    pub security: String,
    pub hidden: bool,
}

/// Email draft recovered from a `mailto:` URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// SMS draft recovered from an `sms:` URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmsMessage {
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Coordinates from a `geo:` URI, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoLocation {
    pub latitude: String,
    pub longitude: String,
}

/// Contact fields recovered from a vCard block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Structured meaning of a payload, one variant per [`ScanKind`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "parsed", rename_all = "lowercase")]
pub enum Payload {
    Url,
    Wifi(WifiCredentials),
    Email(EmailMessage),
    Sms(SmsMessage),
    Tel,
    Geo(GeoLocation),
    #[serde(rename = "vcard")]
    Contact(Contact),
    Text,
}

impl Payload {
    pub fn kind(&self) -> ScanKind {
        match self {
            Payload::Url => ScanKind::Url,
            Payload::Wifi(_) => ScanKind::Wifi,
            Payload::Email(_) => ScanKind::Email,
            Payload::Sms(_) => ScanKind::Sms,
            Payload::Tel => ScanKind::Tel,
            Payload::Geo(_) => ScanKind::Geo,
            Payload::Contact(_) => ScanKind::Vcard,
            Payload::Text => ScanKind::Text,
        }
    }

    /// Whether this variant carries structured fields
    pub fn is_structured(&self) -> bool {
        !matches!(self, Payload::Url | Payload::Tel | Payload::Text)
    }
}

/// A classified QR payload
///
/// Produced once per successful decode. The raw payload is stored exactly
/// as decoded and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    raw: String,
    #[serde(flatten)]
    payload: Payload,
}

impl ScanResult {
    pub(crate) fn new(raw: impl Into<String>, payload: Payload) -> Self {
        Self {
            raw: raw.into(),
            payload,
        }
    }

    /// The exact decoded payload
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> ScanKind {
        self.payload.kind()
    }

    /// Structured fields, `None` for url, tel and text
    pub fn parsed(&self) -> Option<&Payload> {
        self.payload.is_structured().then_some(&self.payload)
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn into_raw(self) -> String {
        self.raw
    }
}
