//! Menu-bar indicator for Mission Control spaces: numbers the addressable
//! spaces across all displays, highlights the visible and active ones, and
//! recomputes on window-server change signals.
//!
//! `model`, `actor`, and `common` are platform-independent; `sys` and `ui`
//! bind to the macOS window server and AppKit.

pub mod actor;
pub mod common;
pub mod model;

#[cfg(target_os = "macos")]
pub mod sys;
#[cfg(target_os = "macos")]
pub mod ui;
