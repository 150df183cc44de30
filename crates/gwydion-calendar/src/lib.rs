//! Google Calendar v3 integration.
//!
//! Wraps the events API around a [`gwydion_oauth::CredentialBundle`]: a
//! rejected access token is refreshed and the call retried once, without the
//! caller orchestrating anything.
//!
//! # Components
//!
//! - [`client`]: Calendar client: event insertion with silent token refresh
//! - [`types`]: Wire types for the Calendar v3 JSON schema

pub mod client;
pub mod error;
pub mod types;

pub use client::{CALENDAR_API_BASE, CalendarClient};
pub use error::{CalendarError, Result};
pub use types::{Event, EventRequest, EventTime};
