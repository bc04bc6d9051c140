//! HLS playlist validation and analysis.
//!
//! The validator answers "is this body a playlist at all"; the analyzer
//! extracts segment/duration/bitrate statistics in one pass. The two are
//! independent on purpose: analysis runs even on bodies the validator
//! rejected, so malformed playlists still report partial statistics.

mod analyze;
mod validate;

// Re-export public API
pub use analyze::{analyze_playlist, format_bitrate};
pub use validate::is_valid_playlist;
