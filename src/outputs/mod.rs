//! Output generation for the published feed.
//!
//! The single output of a run is the JSON feed document; [`json`] owns
//! reading the prior document, the atomic write, and the empty-document
//! fallback.

pub mod json;
