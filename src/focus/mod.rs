//! Directional focus navigation
//!
//! A tree of zones and focusable items keyed by stable string keys.
//! Remote-control input (up/down/left/right/enter) moves a single focus
//! cursor through the tree; zones remember their last focused child so
//! focus lands where the user left it when they come back.
//!
//! - `node`: zone and item configuration, geometry
//! - `spatial`: direction filtering and candidate scoring
//! - `graph`: the arena and every focus operation

pub mod graph;
pub mod node;
pub mod spatial;

use thiserror::Error;

pub use graph::{FocusEvent, FocusGraph};
pub use node::{FocusZone, FocusableItem, NodeSpec, Rect};
pub use spatial::Direction;

/// Structural errors from the focus graph
///
/// These are programming guards, not runtime conditions. Scene glue logs
/// them and carries on with focus unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FocusError {
    #[error("Unknown focus key: {0}")]
    UnknownKey(String),

    #[error("Focus key already registered: {0}")]
    DuplicateKey(String),

    #[error("Zone has no focusable descendant: {0}")]
    NoFocusableDescendant(String),

    #[error("Parent is not a zone: {0}")]
    NotAZone(String),
}
