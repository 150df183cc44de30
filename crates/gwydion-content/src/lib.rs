//! Content collaborators: Wikipedia lookup and upload text extraction.
//!
//! # Components
//!
//! - [`wiki`]: page-summary client for the Wikipedia REST API
//! - [`extract`]: content-type classification and plain-text extraction

pub mod error;
pub mod extract;
pub mod wiki;

pub use error::{ContentError, Result};
pub use extract::{MediaKind, extract_text};
pub use wiki::{WIKIPEDIA_API_BASE, WikiClient};
