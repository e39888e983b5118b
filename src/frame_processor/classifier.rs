// SPDX-License-Identifier: GPL-3.0-only

//! Payload classification
//!
//! Maps a decoded QR payload to a [`ScanResult`]. Prefixes are checked in a
//! fixed order and the first match wins; anything unrecognised falls back
//! to a URL when it parses as one and to plain text otherwise. Malformed
//! structured payloads degrade to partial fields, never to an error.

use super::types::{
    Contact, EmailMessage, GeoLocation, Payload, ScanResult, SmsMessage, WifiCredentials,
};
use super::uri::{is_absolute_url, query_param};
use crate::constants::DEFAULT_WIFI_SECURITY;

/// Classify a raw payload
pub fn classify(raw: &str) -> ScanResult {
    ScanResult::new(raw, parse_payload(raw))
}

fn parse_payload(raw: &str) -> Payload {
    if let Some(rest) = raw.strip_prefix("WIFI:") {
        return Payload::Wifi(parse_wifi(rest));
    }

    if let Some(rest) = raw.strip_prefix("mailto:") {
        return Payload::Email(parse_mailto(rest));
    }

    if let Some(rest) = raw.strip_prefix("sms:") {
        return Payload::Sms(parse_sms(rest));
    }

    if raw.starts_with("tel:") {
        return Payload::Tel;
    }

    // Too few coordinates drops through to the fallback below
    if let Some(geo) = raw.strip_prefix("geo:").and_then(parse_geo) {
        return Payload::Geo(geo);
    }

    if raw.starts_with("BEGIN:VCARD") {
        return Payload::Contact(parse_vcard(raw));
    }

    if is_absolute_url(raw) {
        Payload::Url
    } else {
        Payload::Text
    }
}

/// Parse `T:<security>;S:<ssid>;P:<password>;H:<hidden>;;` (prefix removed)
fn parse_wifi(content: &str) -> WifiCredentials {
    let content = content.strip_suffix(";;").unwrap_or(content);

    let mut wifi = WifiCredentials {
        ssid: String::new(),
        password: String::new(),
        security: DEFAULT_WIFI_SECURITY.to_string(),
        hidden: false,
    };

    for part in content.split(';') {
        let Some((key, value)) = part.split_once(':') else {
            continue;
        };
        match key {
            "S" => wifi.ssid = value.to_string(),
            "P" => wifi.password = value.to_string(),
            "T" if !value.is_empty() => wifi.security = value.to_string(),
            "H" => wifi.hidden = value == "true",
            _ => {}
        }
    }

    wifi
}

fn parse_mailto(content: &str) -> EmailMessage {
    let (to, query) = content.split_once('?').unwrap_or((content, ""));

    EmailMessage {
        to: to.to_string(),
        subject: query_param(query, "subject"),
        body: query_param(query, "body"),
    }
}

fn parse_sms(content: &str) -> SmsMessage {
    let (phone, query) = content.split_once('?').unwrap_or((content, ""));

    SmsMessage {
        phone: phone.to_string(),
        message: query_param(query, "body"),
    }
}

/// Coordinates are kept verbatim; no numeric or range validation
fn parse_geo(content: &str) -> Option<GeoLocation> {
    let mut parts = content.split(',');
    let latitude = parts.next()?;
    let longitude = parts.next()?;

    Some(GeoLocation {
        latitude: latitude.to_string(),
        longitude: longitude.to_string(),
    })
}

/// Line-oriented vCard scan
///
/// Lines are processed in order, so an `N:` line after `FN:` overrides the
/// name split from `FN:`. Repeated fields keep the last value.
fn parse_vcard(content: &str) -> Contact {
    let mut contact = Contact::default();

    for line in content.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if let Some(full_name) = line.strip_prefix("FN:") {
            let (first, last) = full_name
                .trim()
                .split_once(' ')
                .unwrap_or((full_name.trim(), ""));
            contact.first_name = first.to_string();
            contact.last_name = last.to_string();
        } else if let Some(name) = line.strip_prefix("N:") {
            let mut parts = name.split(';');
            contact.last_name = parts.next().unwrap_or_default().to_string();
            contact.first_name = parts.next().unwrap_or_default().to_string();
        } else if let Some(phone) = line.strip_prefix("TEL:") {
            contact.phone = Some(phone.to_string());
        } else if let Some(email) = line.strip_prefix("EMAIL:") {
            contact.email = Some(email.to_string());
        } else if let Some(org) = line.strip_prefix("ORG:") {
            contact.organization = Some(org.to_string());
        } else if let Some(url) = line.strip_prefix("URL:") {
            contact.url = Some(url.to_string());
        }
    }

    contact
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_processor::types::ScanKind;

    fn wifi(raw: &str) -> WifiCredentials {
        match classify(raw).payload() {
            Payload::Wifi(w) => w.clone(),
            other => panic!("Expected Wifi payload, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_wifi() {
        let w = wifi("WIFI:T:WPA;S:MyNetwork;P:mypassword;H:false;;");
        assert_eq!(w.ssid, "MyNetwork");
        assert_eq!(w.password, "mypassword");
        assert_eq!(w.security, "WPA");
        assert!(!w.hidden);
    }

    #[test]
    fn test_parse_wifi_open_network() {
        let w = wifi("WIFI:T:nopass;S:Guest;P:;H:false;;");
        assert_eq!(w.ssid, "Guest");
        assert_eq!(w.password, "");
        assert_eq!(w.security, "nopass");
    }

    #[test]
    fn test_parse_wifi_defaults_and_malformed_segments() {
        let w = wifi("WIFI:S:Cafe;garbage;X:ignored;H:TRUE;;");
        assert_eq!(w.ssid, "Cafe");
        assert_eq!(w.security, "WPA");
        // Only the exact string "true" counts
        assert!(!w.hidden);

        let w = wifi("WIFI:T:;S:Net;H:true;;");
        assert_eq!(w.security, "WPA");
        assert!(w.hidden);
    }

    #[test]
    fn test_parse_wifi_value_split_on_first_colon() {
        let w = wifi("WIFI:S:Net;P:a:b:c;;");
        assert_eq!(w.password, "a:b:c");
    }

    #[test]
    fn test_parse_mailto() {
        let result = classify("mailto:a@b.com?subject=Hi%20there");
        assert_eq!(result.kind(), ScanKind::Email);
        assert_eq!(
            result.parsed(),
            Some(&Payload::Email(EmailMessage {
                to: "a@b.com".into(),
                subject: Some("Hi there".into()),
                body: None,
            }))
        );
    }

    #[test]
    fn test_parse_mailto_without_query() {
        match classify("mailto:test@example.com").payload() {
            Payload::Email(email) => {
                assert_eq!(email.to, "test@example.com");
                assert_eq!(email.subject, None);
                assert_eq!(email.body, None);
            }
            other => panic!("Expected Email payload, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_sms() {
        match classify("sms:+1234567890?body=On%20my%20way").payload() {
            Payload::Sms(sms) => {
                assert_eq!(sms.phone, "+1234567890");
                assert_eq!(sms.message.as_deref(), Some("On my way"));
            }
            other => panic!("Expected Sms payload, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_tel() {
        let result = classify("tel:+1234567890");
        assert_eq!(result.kind(), ScanKind::Tel);
        assert!(result.parsed().is_none());
    }

    #[test]
    fn test_parse_geo_verbatim() {
        match classify("geo:37.7749,-122.4194").payload() {
            Payload::Geo(geo) => {
                assert_eq!(geo.latitude, "37.7749");
                assert_eq!(geo.longitude, "-122.4194");
            }
            other => panic!("Expected Geo payload, got {:?}", other),
        }

        // Not range checked
        match classify("geo:999,abc,3").payload() {
            Payload::Geo(geo) => {
                assert_eq!(geo.latitude, "999");
                assert_eq!(geo.longitude, "abc");
            }
            other => panic!("Expected Geo payload, got {:?}", other),
        }
    }

    #[test]
    fn test_geo_with_one_component_falls_back() {
        let result = classify("geo:onlyone");
        assert_eq!(result.kind(), ScanKind::Text);
        assert!(result.parsed().is_none());
    }

    #[test]
    fn test_parse_vcard() {
        let result = classify("BEGIN:VCARD\nVERSION:3.0\nFN:Jane Doe\nTEL:555\nEND:VCARD");
        assert_eq!(result.kind(), ScanKind::Vcard);
        assert_eq!(
            result.parsed(),
            Some(&Payload::Contact(Contact {
                first_name: "Jane".into(),
                last_name: "Doe".into(),
                phone: Some("555".into()),
                ..Default::default()
            }))
        );
    }

    #[test]
    fn test_vcard_n_line_overrides_fn() {
        let raw = "BEGIN:VCARD\r\nFN:Johnny B Goode\r\nN:Goode;John;;;\r\nORG:Acme\r\nEND:VCARD";
        match classify(raw).payload() {
            Payload::Contact(contact) => {
                assert_eq!(contact.first_name, "John");
                assert_eq!(contact.last_name, "Goode");
                assert_eq!(contact.organization.as_deref(), Some("Acme"));
            }
            other => panic!("Expected Contact payload, got {:?}", other),
        }
    }

    #[test]
    fn test_vcard_fn_splits_on_first_space() {
        match classify("BEGIN:VCARD\nFN:Mary Ann Smith\nEMAIL:a@b\nEMAIL:c@d\nEND:VCARD")
            .payload()
        {
            Payload::Contact(contact) => {
                assert_eq!(contact.first_name, "Mary");
                assert_eq!(contact.last_name, "Ann Smith");
                assert_eq!(contact.email.as_deref(), Some("c@d"));
            }
            other => panic!("Expected Contact payload, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_url_and_text() {
        assert_eq!(classify("https://example.com").kind(), ScanKind::Url);
        assert_eq!(classify("http://example.com/path").kind(), ScanKind::Url);
        assert_eq!(classify("example.com").kind(), ScanKind::Text);
        assert_eq!(classify("Hello World!").kind(), ScanKind::Text);
        assert_eq!(classify("").kind(), ScanKind::Text);
    }

    #[test]
    fn test_raw_is_preserved() {
        let raw = "  padded text \n";
        assert_eq!(classify(raw).raw(), raw);
    }

    #[test]
    fn test_classify_is_pure() {
        for raw in [
            "WIFI:T:WPA;S:Home;P:secret;H:false;;",
            "mailto:x@y.z?body=hi",
            "geo:1,2",
            "plain",
        ] {
            assert_eq!(classify(raw), classify(raw));
        }
    }
}
