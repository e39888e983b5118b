// SPDX-License-Identifier: GPL-3.0-only

//! Template encoding
//!
//! Each template turns a flat input record into the canonical payload
//! string understood by common QR scanners and by [`classify`]. Empty
//! strings mean "not provided". A template whose mandatory fields are
//! empty produces [`EncodeError::MissingField`] instead of a payload.
//!
//! [`classify`]: super::classifier::classify

use super::uri::urlencoding_encode;
use crate::constants::{DEFAULT_WIFI_SECURITY, ICAL_PRODID, ICAL_UID_DOMAIN};
use crate::errors::EncodeError;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// WiFi network template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WifiConfig {
    pub ssid: String,
    pub password: String,
    /// Empty means `WPA`
    pub security: String,
    pub hidden: bool,
}

/// Contact card template (vCard 3.0)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactCard {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub organization: String,
    pub url: String,
}

/// Email template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailDraft {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// SMS template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmsDraft {
    pub phone: String,
    pub message: String,
}

/// Location template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoPoint {
    pub latitude: String,
    pub longitude: String,
    /// Display label for the caller's form; not part of the payload
    pub label: String,
}

/// Calendar event template (iCalendar VEVENT)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalendarEvent {
    pub title: String,
    pub description: String,
    pub location: String,
    /// `YYYY-MM-DDTHH:MM[:SS]` in local time, or `YYYY-MM-DD`
    pub start_date: String,
    pub end_date: String,
}

/// `WIFI:T:<security>;S:<ssid>;P:<password>;H:<true|false>;;`
pub fn encode_wifi(wifi: &WifiConfig) -> Result<String, EncodeError> {
    require(&wifi.ssid, "ssid")?;

    let security = if wifi.security.is_empty() {
        DEFAULT_WIFI_SECURITY
    } else {
        &wifi.security
    };

    Ok(format!(
        "WIFI:T:{};S:{};P:{};H:{};;",
        security, wifi.ssid, wifi.password, wifi.hidden
    ))
}

/// vCard 3.0 block; optional lines are omitted when empty
pub fn encode_contact(card: &ContactCard) -> Result<String, EncodeError> {
    if card.first_name.is_empty() && card.last_name.is_empty() {
        return Err(EncodeError::MissingField("firstName or lastName"));
    }

    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!(
            "FN:{}",
            format!("{} {}", card.first_name, card.last_name).trim()
        ),
    ];

    if !card.first_name.is_empty() {
        lines.push(format!("N:{};{};;;", card.last_name, card.first_name));
    }

    for (tag, value) in [
        ("TEL", &card.phone),
        ("EMAIL", &card.email),
        ("ORG", &card.organization),
        ("URL", &card.url),
    ] {
        if !value.is_empty() {
            lines.push(format!("{}:{}", tag, value));
        }
    }

    lines.push("END:VCARD".to_string());
    Ok(lines.join("\n"))
}

/// `mailto:<to>[?subject=<enc>&body=<enc>]`
pub fn encode_email(email: &EmailDraft) -> Result<String, EncodeError> {
    require(&email.to, "to")?;

    let params: Vec<String> = [("subject", &email.subject), ("body", &email.body)]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}={}", key, urlencoding_encode(value)))
        .collect();

    if params.is_empty() {
        Ok(format!("mailto:{}", email.to))
    } else {
        Ok(format!("mailto:{}?{}", email.to, params.join("&")))
    }
}

/// `sms:<phone>[?body=<enc>]`
pub fn encode_sms(sms: &SmsDraft) -> Result<String, EncodeError> {
    require(&sms.phone, "phone")?;

    if sms.message.is_empty() {
        Ok(format!("sms:{}", sms.phone))
    } else {
        Ok(format!(
            "sms:{}?body={}",
            sms.phone,
            urlencoding_encode(&sms.message)
        ))
    }
}

/// `geo:<latitude>,<longitude>`, written verbatim
pub fn encode_geo(geo: &GeoPoint) -> Result<String, EncodeError> {
    require(&geo.latitude, "latitude")?;
    require(&geo.longitude, "longitude")?;

    Ok(format!("geo:{},{}", geo.latitude, geo.longitude))
}

/// iCalendar VEVENT block with dates interpreted in the local time zone
pub fn encode_event(event: &CalendarEvent) -> Result<String, EncodeError> {
    let uid = format!("{}@{}", uuid::Uuid::new_v4(), ICAL_UID_DOMAIN);
    encode_event_in(event, &Local, &uid)
}

/// iCalendar VEVENT block with an explicit time zone and UID
pub fn encode_event_in<Tz: TimeZone>(
    event: &CalendarEvent,
    tz: &Tz,
    uid: &str,
) -> Result<String, EncodeError> {
    require(&event.title, "title")?;
    require(&event.start_date, "startDate")?;

    let start = ical_timestamp(&event.start_date, tz)?;
    let end = if event.end_date.is_empty() {
        None
    } else {
        Some(ical_timestamp(&event.end_date, tz)?)
    };

    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", ICAL_PRODID),
        "BEGIN:VEVENT".to_string(),
        format!("DTSTART:{}", start),
    ];
    if let Some(end) = end {
        lines.push(format!("DTEND:{}", end));
    }
    lines.push(format!("SUMMARY:{}", event.title));
    if !event.description.is_empty() {
        lines.push(format!("DESCRIPTION:{}", event.description));
    }
    if !event.location.is_empty() {
        lines.push(format!("LOCATION:{}", event.location));
    }
    lines.push(format!("UID:{}", uid));
    lines.push("END:VEVENT".to_string());
    lines.push("END:VCALENDAR".to_string());

    Ok(lines.join("\n"))
}

/// Render a date input as a UTC basic-format timestamp (`YYYYMMDDTHHMMSSZ`)
///
/// Date-time inputs are local to `tz`. A bare date is UTC midnight, which
/// is how browsers read date-only strings.
pub fn ical_timestamp<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<String, EncodeError> {
    let input = input.trim();
    let invalid = || EncodeError::InvalidDate(input.to_string());

    let utc: DateTime<Utc> = if let Some(naive) = parse_naive_datetime(input) {
        // Ambiguous times take the earlier mapping; times in a DST gap fail
        tz.from_local_datetime(&naive)
            .earliest()
            .ok_or_else(invalid)?
            .with_timezone(&Utc)
    } else {
        let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| invalid())?;
        date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?.and_utc()
    };

    debug!(input, utc = %utc, "Converted event date");
    Ok(utc.format("%Y%m%dT%H%M%SZ").to_string())
}

fn parse_naive_datetime(input: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
}

fn require(value: &str, field: &'static str) -> Result<(), EncodeError> {
    if value.is_empty() {
        Err(EncodeError::MissingField(field))
    } else {
        Ok(())
    }
}
