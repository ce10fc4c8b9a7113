//! Attachment points the workspace renders into.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::MountError;

/// An element owned by the host page.
pub trait Container {
	/// Replaces the element's children with `markup`, or empties it.
	fn replace_children(&self, markup: Option<&str>);
}

/// Containers keyed by unit name. The first entry hosts the workspace root.
pub type Containers = IndexMap<String, Rc<dyn Container>>;

/// Logical parts of the workspace UI a host can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
	Main,
}

impl Unit {
	pub fn as_str(self) -> &'static str {
		match self {
			Unit::Main => "main",
		}
	}

	/// Markup rendered into the unit's container.
	pub(crate) fn markup(self, class_name_prefix: &str) -> String {
		match self {
			Unit::Main => format!(
				r#"<div id="hsp-workspace-root" style="height: 100%"><div id="hsp-workspace-main" class="{class_name_prefix}-main"><div id="mirador" style="position: relative; height: 100%"></div></div></div>"#
			),
		}
	}
}

impl fmt::Display for Unit {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Unit {
	type Err = MountError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"main" => Ok(Unit::Main),
			other => Err(MountError::InvalidArgument(format!("unknown unit {other:?}"))),
		}
	}
}

/// In-memory [`Container`] that keeps the rendered markup.
#[derive(Debug, Default)]
pub struct MemoryContainer {
	content: RefCell<Option<String>>,
	renders: Cell<usize>,
}

impl MemoryContainer {
	pub fn new() -> Rc<Self> {
		Rc::new(Self::default())
	}

	/// Current markup, `None` while empty.
	pub fn content(&self) -> Option<String> {
		self.content.borrow().clone()
	}

	/// Number of times the children were replaced.
	pub fn render_count(&self) -> usize {
		self.renders.get()
	}
}

impl Container for MemoryContainer {
	fn replace_children(&self, markup: Option<&str>) {
		*self.content.borrow_mut() = markup.map(str::to_string);
		self.renders.set(self.renders.get() + 1);
	}
}
