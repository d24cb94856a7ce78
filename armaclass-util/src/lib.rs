//! armaclass-util - Foundation types shared by the lexer, preprocessor and parser.
//!
//! Holds the pieces that do not belong to any single pipeline stage: source
//! locations (`span`), the pipeline's error type (`error`), and the
//! diagnostic sink used for non-fatal warnings (`diagnostic`).

pub mod diagnostic;
pub mod error;
pub mod span;

pub use error::Error;
pub use span::{FileId, SourceMap, Span};

pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;

/// Result type alias used throughout the pipeline crates.
pub type Result<T> = std::result::Result<T, Error>;
