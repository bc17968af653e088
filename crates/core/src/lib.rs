//! RAI Lens Core - currency detection and conversion engine.
//!
//! Finds monetary amounts in a tree of text segments and rewrites them in
//! place as an amount of the RAI reference token. The crate performs no I/O:
//! hosts feed it preferences, rate payloads and tree changes.

pub mod constants;
pub mod context;
pub mod convert;
pub mod currency;
pub mod detect;
pub mod document;
pub mod errors;
pub mod events;
pub mod resolve;
pub mod scan;
pub mod session;

pub use context::{ConversionContext, Preferences};
pub use convert::{fiat_to_reference, ConversionError, ConvertedAmount};
pub use document::{DocumentNode, NodeId, SegmentTree};
pub use events::TreeChange;
pub use session::{ConversionSession, SessionUpdate};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
