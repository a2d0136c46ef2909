//! Error types for data loading and persistence.
//!
//! None of these cross the rendering boundary: loaders catch them, log a
//! warning, and hand back an empty graph instead.

use thiserror::Error;

/// Failures while reading or assembling graph data.
#[derive(Debug, Error)]
pub enum GraphError {
	/// Inbound relations or config were not valid JSON for the expected shape.
	#[error("malformed graph JSON: {0}")]
	Json(#[from] serde_json::Error),

	/// An expected DOM element was absent or of the wrong kind.
	#[error("missing element: {0}")]
	MissingElement(&'static str),

	/// A page id or slug did not resolve to a known page.
	#[error("unknown page: {0}")]
	UnknownPage(String),

	/// The internal link pattern could not be compiled for the given base route.
	#[error("invalid link pattern: {0}")]
	Pattern(#[from] regex::Error),
}

/// Failures raised by a link store at the persistence boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
	/// The page whose links are being replaced does not exist.
	#[error("no page with id {0}")]
	UnknownPage(String),
}
