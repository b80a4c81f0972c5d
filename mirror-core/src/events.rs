//! Change notifications produced by the mirror list.
//!
//! Mutating calls on [`crate::MirrorList`] return the events they caused, in
//! delivery order. Consumers may forward them to a presenter, queue them, or
//! drop them.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorEvent {
    /// A load completed and the catalog and selection are consistent.
    Loaded,
    /// The document could not be read. Carries a human-readable reason.
    LoadFailed(String),
    /// The chosen region changed. Empty when the selection was cleared.
    RegionChanged(String),
    /// The chosen server index changed. `None` means no server is chosen.
    ServerIndexChanged(Option<usize>),
}
