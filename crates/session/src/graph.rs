//! Arena-backed value graph with reference identity.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};


/// Identity of a node inside one [`SessionGraph`].
///
/// Ids are only meaningful for the graph that allocated them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// A live, non-serializable value embedded in a session graph.
///
/// Typical payloads are callback objects the viewer's plugins receive through
/// their config, such as an annotation storage adapter.
#[derive(Clone)]
pub struct NativeRef(Rc<dyn Any>);

impl NativeRef {
	/// Wraps an owned value.
	pub fn new<T: Any>(value: T) -> Self {
		Self(Rc::new(value))
	}

	/// Wraps an already shared value without cloning it.
	pub fn from_rc<T: Any>(value: Rc<T>) -> Self {
		Self(value)
	}

	/// Returns the payload if it has type `T`.
	pub fn downcast<T: Any>(&self) -> Option<Rc<T>> {
		Rc::clone(&self.0).downcast::<T>().ok()
	}

	/// Returns true if both handles share one allocation.
	pub fn ptr_eq(&self, other: &NativeRef) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl fmt::Debug for NativeRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("NativeRef(..)")
	}
}

/// One value in a [`SessionGraph`].
///
/// Containers refer to their children by [`NodeId`]; a child reachable from
/// two containers is the same node.
#[derive(Debug, Clone)]
pub enum Node {
	Null,
	Bool(bool),
	Number(Number),
	String(String),
	Array(Vec<NodeId>),
	Object(IndexMap<String, NodeId>),
	Native(NativeRef),
}

impl Node {
	/// Returns true for arrays and objects.
	pub fn is_container(&self) -> bool {
		matches!(self, Node::Array(_) | Node::Object(_))
	}
}

/// An object graph with explicit node identity.
#[derive(Debug, Clone)]
pub struct SessionGraph {
	nodes: Vec<Node>,
	root: NodeId,
}

impl SessionGraph {
	/// Creates a graph whose root is `root`.
	pub fn new(root: Node) -> Self {
		Self {
			nodes: vec![root],
			root: NodeId(0),
		}
	}

	/// Creates a graph whose root is an empty object.
	pub fn object() -> Self {
		Self::new(Node::Object(IndexMap::new()))
	}

	/// Graph with no nodes; only valid until the decoder assigns a root.
	pub(crate) fn empty() -> Self {
		Self {
			nodes: Vec::new(),
			root: NodeId(0),
		}
	}

	/// Builds an acyclic graph mirroring a JSON value. No node is shared.
	pub fn from_json(value: &Value) -> Self {
		let mut graph = Self::empty();
		graph.root = graph.insert_json(value);
		graph
	}

	/// Root node id.
	pub fn root(&self) -> NodeId {
		self.root
	}

	/// Replaces the root.
	pub fn set_root(&mut self, root: NodeId) {
		self.root = root;
	}

	/// Number of allocated nodes, reachable or not.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Returns true if no node was allocated.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Allocates a detached node.
	pub fn alloc(&mut self, node: Node) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(node);
		id
	}

	/// Returns a node by id.
	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.get(id.0)
	}

	/// Returns a node mutably by id.
	pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
		self.nodes.get_mut(id.0)
	}

	pub(crate) fn replace(&mut self, id: NodeId, node: Node) {
		if let Some(slot) = self.nodes.get_mut(id.0) {
			*slot = node;
		}
	}

	/// Sets `key` on an object node. Returns false if `object` is not an object.
	pub fn insert(&mut self, object: NodeId, key: impl Into<String>, value: NodeId) -> bool {
		match self.node_mut(object) {
			Some(Node::Object(map)) => {
				map.insert(key.into(), value);
				true
			}
			_ => false,
		}
	}

	/// Appends to an array node. Returns false if `array` is not an array.
	pub fn push(&mut self, array: NodeId, value: NodeId) -> bool {
		match self.node_mut(array) {
			Some(Node::Array(items)) => {
				items.push(value);
				true
			}
			_ => false,
		}
	}

	/// Returns the child of an object by key or of an array by decimal index.
	pub fn child(&self, parent: NodeId, key: &str) -> Option<NodeId> {
		match self.node(parent)? {
			Node::Object(map) => map.get(key).copied(),
			Node::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i).copied()),
			_ => None,
		}
	}

	/// Follows `path` from the root.
	pub fn lookup(&self, path: &[&str]) -> Option<NodeId> {
		path.iter()
			.try_fold(self.root, |node, key| self.child(node, key))
	}

	/// Puts a live native value at `path`, creating the final key.
	///
	/// The parent of the final segment must already exist and be an object;
	/// otherwise nothing changes and false is returned.
	pub fn reinject_native(&mut self, path: &[&str], native: NativeRef) -> bool {
		let Some((last, parent_path)) = path.split_last() else {
			return false;
		};
		let Some(parent) = self.lookup(parent_path) else {
			return false;
		};
		if !matches!(self.node(parent), Some(Node::Object(_))) {
			return false;
		}
		let id = self.alloc(Node::Native(native));
		self.insert(parent, *last, id)
	}

	/// Copies a JSON value into the arena and returns its id.
	pub fn insert_json(&mut self, value: &Value) -> NodeId {
		match value {
			Value::Null => self.alloc(Node::Null),
			Value::Bool(b) => self.alloc(Node::Bool(*b)),
			Value::Number(n) => self.alloc(Node::Number(n.clone())),
			Value::String(s) => self.alloc(Node::String(s.clone())),
			Value::Array(items) => {
				let children = items.iter().map(|item| self.insert_json(item)).collect();
				self.alloc(Node::Array(children))
			}
			Value::Object(map) => {
				let children = map
					.iter()
					.map(|(key, item)| (key.clone(), self.insert_json(item)))
					.collect();
				self.alloc(Node::Object(children))
			}
		}
	}

	/// Converts the reachable graph into a JSON tree.
	///
	/// Shared nodes are duplicated. Returns `None` if the graph has a cycle.
	/// Native values follow JSON serializer rules: omitted from objects,
	/// `null` inside arrays and at the root.
	pub fn to_json(&self) -> Option<Value> {
		let mut ancestors = Vec::new();
		self.node_to_json(self.root, &mut ancestors)
	}

	/// Converts the subtree at `id`, with the same rules as [`Self::to_json`].
	pub fn subtree_to_json(&self, id: NodeId) -> Option<Value> {
		let mut ancestors = Vec::new();
		self.node_to_json(id, &mut ancestors)
	}

	fn node_to_json(&self, id: NodeId, ancestors: &mut Vec<NodeId>) -> Option<Value> {
		if ancestors.contains(&id) {
			return None;
		}
		let value = match self.node(id)? {
			Node::Null | Node::Native(_) => Value::Null,
			Node::Bool(b) => Value::Bool(*b),
			Node::Number(n) => Value::Number(n.clone()),
			Node::String(s) => Value::String(s.clone()),
			Node::Array(items) => {
				ancestors.push(id);
				let mut out = Vec::with_capacity(items.len());
				for item in items {
					out.push(self.node_to_json(*item, ancestors)?);
				}
				ancestors.pop();
				Value::Array(out)
			}
			Node::Object(map) => {
				ancestors.push(id);
				let mut out = Map::new();
				for (key, item) in map {
					if matches!(self.node(*item), Some(Node::Native(_))) {
						continue;
					}
					out.insert(key.clone(), self.node_to_json(*item, ancestors)?);
				}
				ancestors.pop();
				Value::Object(out)
			}
		};
		Some(value)
	}
}

impl Default for SessionGraph {
	fn default() -> Self {
		Self::new(Node::Null)
	}
}
