//! Output rendering for the resolved build graph
//!
//! Pure formatting over already-assembled entities; nothing in here does
//! I/O or touches the network.

pub mod dot;

pub use dot::write_graph;
