//! Loading of the external viewer library.
//!
//! The viewer ships as a separate script. Loading it is the only slow step of
//! the first mount; the workspace awaits it once and caches the outcome,
//! including the outcome "unavailable".

use std::rc::Rc;

use async_trait::async_trait;
use folio_viewer::ViewerModule;

/// Source of the viewer library.
#[async_trait(?Send)]
pub trait ViewerLoader {
	/// Loads the library, or returns `None` if it cannot be loaded.
	async fn load(&self) -> Option<Rc<dyn ViewerModule>>;
}

/// Loader for a library that is already in memory.
#[derive(Clone, Default)]
pub struct StaticLoader {
	module: Option<Rc<dyn ViewerModule>>,
}

impl StaticLoader {
	pub fn new(module: Rc<dyn ViewerModule>) -> Self {
		Self {
			module: Some(module),
		}
	}

	/// A loader whose library never becomes available.
	pub fn unavailable() -> Self {
		Self { module: None }
	}
}

#[async_trait(?Send)]
impl ViewerLoader for StaticLoader {
	async fn load(&self) -> Option<Rc<dyn ViewerModule>> {
		self.module.clone()
	}
}

impl std::fmt::Debug for StaticLoader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StaticLoader")
			.field("available", &self.module.is_some())
			.finish()
	}
}
