#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Session state codec for the embedded viewer.
//!
//! The viewer's internal state is an arbitrary object graph that may contain
//! shared and cyclic references. [`SessionGraph`] models such a graph as an
//! arena of [`Node`]s addressed by [`NodeId`], so two places that point at the
//! same sub-object hold the same id. [`encode`] flattens a graph into a token
//! and [`decode`] rebuilds a graph with the same reference topology.
//!
//! # Token layout
//!
//! A token is a JSON array of slots. Slot `0` is the root. Every object,
//! array and string reachable from the root occupies exactly one slot; inside
//! a container slot, strings and containers are written as the decimal index
//! of their slot (itself a JSON string), while `null`, booleans and numbers
//! stay inline:
//!
//! ```text
//! a = { "name": "x", "self": a }   ──►   [{"name":"1","self":"0"},"x"]
//! ```
//!
//! Native values ([`NativeRef`]) cannot be encoded. Like a JSON serializer
//! they are dropped from objects and written as `null` inside arrays; callers
//! put a live equivalent back with [`SessionGraph::reinject_native`].

pub mod codec;
pub mod error;
pub mod graph;

pub use codec::{decode, encode};
pub use error::{ParseError, Result};
pub use graph::{NativeRef, Node, NodeId, SessionGraph};
