//! NLG Features: the typed attribute store behind a rule-based text realiser.
//!
//! Every node of a realiser's syntax tree carries a set of pipeline-visible
//! features: boolean flags, references to other nodes, ordered lists of
//! references, and enumerated values. This crate holds the fixed catalogue
//! of those features, the per-node store that enforces their shapes and
//! defaults, the document tree that owns the nodes, and the driver that runs
//! realisation stages over it in order.

pub mod core;
pub mod schema;
