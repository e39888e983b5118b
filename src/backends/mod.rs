// SPDX-License-Identifier: GPL-3.0-only

//! Hardware access for scanning
//!
//! Only camera capture lives here today; see [`camera`] for the backend
//! and device traits.

pub mod camera;
