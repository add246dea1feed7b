//! GROBID header extraction
//!
//! [`GrobidClient`] talks to the service; [`tei::parse_tei`] turns its TEI
//! response into a [`crate::types::PaperMetadata`].

pub mod client;
pub mod tei;

pub use client::GrobidClient;
pub use tei::parse_tei;

/// Number of reference titles kept per paper
pub const MAX_REFERENCES: usize = 5;
