//! Token encoding and decoding for [`SessionGraph`]s.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{ParseError, Result};
use crate::graph::{Node, NodeId, SessionGraph};


/// Flattens a graph into a session token.
///
/// Slots are assigned in discovery order: slot `0` is the root and each slot
/// is scanned in turn, appending every string or container not seen before.
/// Containers are deduplicated by identity and strings by value.
pub fn encode(graph: &SessionGraph) -> String {
	let root = graph.root();
	let slots = match graph.node(root) {
		Some(node) if node.is_container() || matches!(node, Node::String(_)) => {
			let mut encoder = Encoder::new(graph);
			encoder.discover(root);
			encoder.run()
		}
		Some(Node::Bool(b)) => vec![Value::Bool(*b)],
		Some(Node::Number(n)) => vec![Value::Number(n.clone())],
		_ => vec![Value::Null],
	};
	Value::Array(slots).to_string()
}

struct Encoder<'a> {
	graph: &'a SessionGraph,
	/// Node whose value fills each slot.
	sources: Vec<NodeId>,
	containers: HashMap<NodeId, usize>,
	strings: HashMap<&'a str, usize>,
}

impl<'a> Encoder<'a> {
	fn new(graph: &'a SessionGraph) -> Self {
		Self {
			graph,
			sources: Vec::new(),
			containers: HashMap::new(),
			strings: HashMap::new(),
		}
	}

	fn run(mut self) -> Vec<Value> {
		let mut slots = Vec::new();
		let mut next = 0;
		while let Some(&id) = self.sources.get(next) {
			slots.push(self.render(id));
			next += 1;
		}
		slots
	}

	/// Returns the slot index of a string or container, allocating one if new.
	fn discover(&mut self, id: NodeId) -> Option<usize> {
		let graph = self.graph;
		match graph.node(id)? {
			Node::String(s) => {
				if let Some(&index) = self.strings.get(s.as_str()) {
					return Some(index);
				}
				let index = self.sources.len();
				self.sources.push(id);
				self.strings.insert(s.as_str(), index);
				Some(index)
			}
			Node::Array(_) | Node::Object(_) => {
				if let Some(&index) = self.containers.get(&id) {
					return Some(index);
				}
				let index = self.sources.len();
				self.sources.push(id);
				self.containers.insert(id, index);
				Some(index)
			}
			_ => None,
		}
	}

	/// Value written for a child inside a container slot. `None` for natives.
	fn reference(&mut self, id: NodeId) -> Option<Value> {
		match self.graph.node(id)? {
			Node::Null => Some(Value::Null),
			Node::Bool(b) => Some(Value::Bool(*b)),
			Node::Number(n) => Some(Value::Number(n.clone())),
			Node::Native(_) => None,
			Node::String(_) | Node::Array(_) | Node::Object(_) => {
				self.discover(id).map(|index| Value::String(index.to_string()))
			}
		}
	}

	fn render(&mut self, id: NodeId) -> Value {
		let graph = self.graph;
		match graph.node(id) {
			Some(Node::String(s)) => Value::String(s.clone()),
			Some(Node::Array(items)) => Value::Array(
				items
					.iter()
					.map(|item| self.reference(*item).unwrap_or(Value::Null))
					.collect(),
			),
			Some(Node::Object(map)) => {
				let mut out = Map::new();
				for (key, item) in map {
					if let Some(value) = self.reference(*item) {
						out.insert(key.clone(), value);
					}
				}
				Value::Object(out)
			}
			_ => Value::Null,
		}
	}
}

/// Rebuilds a graph from a session token.
///
/// Every container slot becomes exactly one node, so references to the same
/// slot share identity and cycles are restored.
pub fn decode(token: &str) -> Result<SessionGraph> {
	let value: Value = serde_json::from_str(token)?;
	let Value::Array(slots) = value else {
		return Err(ParseError::NotSlotArray);
	};
	let Some(first) = slots.first() else {
		return Err(ParseError::NotSlotArray);
	};

	let mut decoder = Decoder {
		slots: &slots,
		graph: SessionGraph::empty(),
		containers: HashMap::new(),
		pending: Vec::new(),
	};
	let root = match first {
		Value::Array(_) | Value::Object(_) => decoder.container(0),
		other => decoder.graph.alloc(primitive(other)),
	};
	while let Some((slot, id)) = decoder.pending.pop() {
		decoder.fill(slot, id)?;
	}

	let mut graph = decoder.graph;
	graph.set_root(root);
	Ok(graph)
}

struct Decoder<'a> {
	slots: &'a [Value],
	graph: SessionGraph,
	containers: HashMap<usize, NodeId>,
	/// Container slots allocated as placeholders but not yet filled.
	pending: Vec<(usize, NodeId)>,
}

impl Decoder<'_> {
	fn container(&mut self, slot: usize) -> NodeId {
		if let Some(&id) = self.containers.get(&slot) {
			return id;
		}
		let id = self.graph.alloc(Node::Null);
		self.containers.insert(slot, id);
		self.pending.push((slot, id));
		id
	}

	fn fill(&mut self, slot: usize, id: NodeId) -> Result<()> {
		let slots = self.slots;
		let node = match &slots[slot] {
			Value::Array(items) => {
				let mut children = Vec::with_capacity(items.len());
				for item in items {
					children.push(self.resolve(slot, item)?);
				}
				Node::Array(children)
			}
			Value::Object(map) => {
				let mut children = IndexMap::with_capacity(map.len());
				for (key, item) in map {
					children.insert(key.clone(), self.resolve(slot, item)?);
				}
				Node::Object(children)
			}
			other => primitive(other),
		};
		self.graph.replace(id, node);
		Ok(())
	}

	fn resolve(&mut self, slot: usize, value: &Value) -> Result<NodeId> {
		match value {
			Value::String(reference) => {
				let index = reference
					.parse::<usize>()
					.map_err(|_| ParseError::InvalidReference(reference.clone()))?;
				let slots = self.slots;
				let target = slots
					.get(index)
					.ok_or(ParseError::DanglingReference(index))?;
				Ok(match target {
					Value::Array(_) | Value::Object(_) => self.container(index),
					other => self.graph.alloc(primitive(other)),
				})
			}
			Value::Array(_) | Value::Object(_) => Err(ParseError::InlineContainer(slot)),
			other => Ok(self.graph.alloc(primitive(other))),
		}
	}
}

fn primitive(value: &Value) -> Node {
	match value {
		Value::Bool(b) => Node::Bool(*b),
		Value::Number(n) => Node::Number(n.clone()),
		Value::String(s) => Node::String(s.clone()),
		_ => Node::Null,
	}
}
