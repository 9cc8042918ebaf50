//! Host data shaping pipeline.
//!
//! Two pure transformations compose the core:
//! - [`normalize`] turns a raw, loosely-structured Shodan host record
//!   into a fixed-shape [`crate::NormalizedRecord`].
//! - [`compose`] renders that record into a deterministic analysis
//!   prompt for the chat backend.

mod normalize;
mod prompt;

pub use normalize::normalize;
pub use prompt::compose;
