// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Classifying payloads
//! - Building payloads from templates
//! - Scanning image files and cameras

use clap::Subcommand;
use qraft::backends::camera::V4l2Backend;
use qraft::config::Config;
use qraft::constants::{COLOR_PRESETS, file_formats};
use qraft::errors::{AppError, AppResult, ScanError};
use qraft::frame_processor::{
    CalendarEvent, ContactCard, EmailDraft, GeoPoint, QrDetector, ScanKind, SmsDraft, WifiConfig,
    classify, encode_contact, encode_email, encode_event, encode_geo, encode_sms, encode_wifi,
};
use qraft::render::RenderRequest;
use qraft::scanner::{self, ScanPhase, ScanSession};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Subcommand)]
pub enum EncodeTemplate {
    /// WiFi network credentials
    Wifi {
        #[arg(long)]
        ssid: String,
        #[arg(long, default_value_t)]
        password: String,
        /// WPA, WEP or nopass (default WPA)
        #[arg(long, default_value_t)]
        security: String,
        #[arg(long)]
        hidden: bool,
    },

    /// Contact card (vCard 3.0)
    Contact {
        #[arg(long, default_value_t)]
        first_name: String,
        #[arg(long, default_value_t)]
        last_name: String,
        #[arg(long, default_value_t)]
        phone: String,
        #[arg(long, default_value_t)]
        email: String,
        #[arg(long, default_value_t)]
        organization: String,
        #[arg(long, default_value_t)]
        url: String,
    },

    /// Email with optional subject and body
    Email {
        #[arg(long)]
        to: String,
        #[arg(long, default_value_t)]
        subject: String,
        #[arg(long, default_value_t)]
        body: String,
    },

    /// Text message
    Sms {
        #[arg(long)]
        phone: String,
        #[arg(long, default_value_t)]
        message: String,
    },

    /// Geographic location
    Geo {
        #[arg(long, allow_hyphen_values = true)]
        latitude: String,
        #[arg(long, allow_hyphen_values = true)]
        longitude: String,
        #[arg(long, default_value_t)]
        label: String,
    },

    /// Calendar event (dates as YYYY-MM-DDTHH:MM in local time, or YYYY-MM-DD)
    Event {
        #[arg(long)]
        title: String,
        #[arg(long, default_value_t)]
        description: String,
        #[arg(long, default_value_t)]
        location: String,
        #[arg(long)]
        start: String,
        /// Leave out for an event without DTEND
        #[arg(long, default_value_t)]
        end: String,
    },
}

/// What `encode` prints: the payload plus the render request it produces
#[derive(Serialize)]
struct EncodeOutput {
    payload: String,
    kind: ScanKind,
    size: u32,
    margin: u32,
    foreground: String,
    background: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    logo: Option<String>,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Classify a payload given on the command line
pub fn classify_payload(payload: &str) -> AppResult<()> {
    print_json(&classify(payload))
}

/// Build a payload from a template and validate it for rendering
pub fn encode_template(template: EncodeTemplate) -> AppResult<()> {
    let payload = match template {
        EncodeTemplate::Wifi {
            ssid,
            password,
            security,
            hidden,
        } => encode_wifi(&WifiConfig {
            ssid,
            password,
            security,
            hidden,
        })?,
        EncodeTemplate::Contact {
            first_name,
            last_name,
            phone,
            email,
            organization,
            url,
        } => encode_contact(&ContactCard {
            first_name,
            last_name,
            phone,
            email,
            organization,
            url,
        })?,
        EncodeTemplate::Email { to, subject, body } => {
            encode_email(&EmailDraft { to, subject, body })?
        }
        EncodeTemplate::Sms { phone, message } => encode_sms(&SmsDraft { phone, message })?,
        EncodeTemplate::Geo {
            latitude,
            longitude,
            label,
        } => encode_geo(&GeoPoint {
            latitude,
            longitude,
            label,
        })?,
        EncodeTemplate::Event {
            title,
            description,
            location,
            start,
            end,
        } => encode_event(&CalendarEvent {
            title,
            description,
            location,
            start_date: start,
            end_date: end,
        })?,
    };

    let config = Config::load()?;
    let request = RenderRequest::new(&payload, &config.render)?;
    info!(len = payload.len(), "Encoded payload");

    print_json(&EncodeOutput {
        kind: classify(&payload).kind(),
        payload,
        size: request.size,
        margin: request.margin,
        foreground: request.foreground.to_hex(),
        background: request.background.to_hex(),
        logo: request.logo,
    })
}

/// Scan a single image file
pub fn scan_image_file(path: &Path) -> AppResult<()> {
    let is_image = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(file_formats::is_image_extension);
    if !is_image {
        return Err(ScanError::InvalidImage(format!(
            "{} is not a supported image file",
            path.display()
        ))
        .into());
    }

    let config = Config::load()?;
    let detector = QrDetector::with_max_dimension(config.scanner.max_dimension);
    let result = scanner::scan_file(&detector, path)?;
    print_json(&result)
}

/// Scan with a camera until a code is found, the scan fails, or Ctrl+C
pub fn scan_camera(device: Option<String>) -> AppResult<()> {
    let config = Config::load()?;
    let device_path = device.unwrap_or_else(|| config.scanner.device_path.clone());

    let backend = V4l2Backend::new(device_path.clone());
    let detector = Arc::new(QrDetector::with_max_dimension(config.scanner.max_dimension));
    let mut session = ScanSession::new(detector).with_frame_interval(config.scanner.frame_interval());

    let stop = session.stop_handle();
    ctrlc::set_handler(move || stop.request_stop())
        .map_err(|e| AppError::Config(format!("Failed to install Ctrl+C handler: {}", e)))?;

    let runtime = tokio::runtime::Runtime::new()?;

    session.start(&backend)?;
    if session.phase() == ScanPhase::Requesting {
        eprintln!("Scanning with {}... press Ctrl+C to stop", device_path);
    }

    match runtime.block_on(session.run()) {
        ScanPhase::Detected => match session.take_result() {
            Some(result) => print_json(&result),
            None => Ok(()),
        },
        ScanPhase::Stopped => {
            eprintln!("Scan stopped.");
            Ok(())
        }
        phase => {
            let error = session
                .last_error()
                .cloned()
                .unwrap_or_else(|| ScanError::CaptureFailed(format!("scan ended in {:?}", phase)));
            warn!(error = %error, "Camera scan failed");
            Err(error.into())
        }
    }
}

/// Print the built-in color presets
pub fn list_presets() -> AppResult<()> {
    print_json(&COLOR_PRESETS[..])
}
