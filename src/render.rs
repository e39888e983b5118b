// SPDX-License-Identifier: GPL-3.0-only

//! QR rendering contract
//!
//! Drawing the symbol is the job of an external renderer. This module
//! defines what is handed to it and validates the request against the
//! limits the generator exposes to users.

use crate::config::RenderSettings;
use crate::constants::render::{MAX_MARGIN, MAX_SIZE, MIN_SIZE};
use crate::errors::RenderError;

/// An RGB color parsed from `#RRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `#RRGGBB` (the `#` is required, hex digits are case-insensitive)
    pub fn parse_hex(s: &str) -> Result<Self, RenderError> {
        let invalid = || RenderError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Validated input for a QR renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub payload: String,
    pub foreground: Rgb,
    pub background: Rgb,
    /// Output size in pixels
    pub size: u32,
    /// Quiet zone in modules
    pub margin: u32,
    /// Logo embedded in the center, if any
    pub logo: Option<String>,
}

impl RenderRequest {
    /// Build a request from a payload and render settings
    pub fn new(payload: &str, settings: &RenderSettings) -> Result<Self, RenderError> {
        if payload.trim().is_empty() {
            return Err(RenderError::EmptyPayload);
        }

        let len = payload.chars().count();
        if len > settings.max_text_length {
            return Err(RenderError::PayloadTooLong {
                len,
                max: settings.max_text_length,
            });
        }

        if !(MIN_SIZE..=MAX_SIZE).contains(&settings.size) {
            return Err(RenderError::InvalidSize(settings.size));
        }
        if settings.margin > MAX_MARGIN {
            return Err(RenderError::InvalidMargin(settings.margin));
        }

        Ok(Self {
            payload: payload.to_string(),
            foreground: Rgb::parse_hex(&settings.dark_color)?,
            background: Rgb::parse_hex(&settings.light_color)?,
            size: settings.size,
            margin: settings.margin,
            logo: settings.logo.clone().filter(|logo| !logo.is_empty()),
        })
    }
}

/// A component able to draw a QR symbol
pub trait QrRenderer {
    type Output;
    type Error: std::error::Error;

    fn render(&self, request: &RenderRequest) -> Result<Self::Output, Self::Error>;
}
