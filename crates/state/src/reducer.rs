//! Pure state transitions.

use std::sync::Arc;

use tracing::warn;

use crate::command::Command;
use crate::model::{Area, Areas, DEFAULT_AREA, Resources, State};

#[cfg(test)]
mod tests;

/// Applies one command and returns the next state.
///
/// The input is never modified. Commands that change nothing return a clone
/// of the same `Arc`, so callers can detect no-ops with [`Arc::ptr_eq`].
pub fn reduce(state: &Arc<State>, command: Command) -> Arc<State> {
	let name = command.name();
	match command {
		Command::SetState(next) => next,
		Command::SetLocation(location) => with_state(state, |s| s.location = location),
		Command::SetI18nConfig(config) => with_state(state, |s| s.i18n_config = config),
		Command::SetAnnotationEnabled(enabled) => {
			with_state(state, |s| s.annotation_enabled = enabled)
		}
		Command::AddResource { resource, area } | Command::UpdateResource { resource, area } => {
			with_resources(state, area, name, |resources| {
				resources.insert(resource.id.clone(), resource);
			})
		}
		Command::RemoveResource { id, area } => with_resources(state, area, name, |resources| {
			resources.shift_remove(&id);
		}),
		Command::RemoveResources { manifest_id, area } => {
			with_resources(state, area, name, |resources| {
				resources.retain(|_, r| r.manifest_id.as_deref() != Some(manifest_id.as_str()));
			})
		}
		Command::SetSessionState { token, area } => {
			with_area(state, area, name, |a| a.session_state = token)
		}
		Command::SetAnnotationText { text, area } => {
			with_area(state, area, name, |a| a.annotation_text = text)
		}
		Command::SetJumpToWindowDialogOpen { open, area } => {
			with_area(state, area, name, |a| a.jump_to_window_dialog_open = open)
		}
		Command::SetWindowTypeDialogOpen { open, area } => {
			with_area(state, area, name, |a| a.window_type_dialog_open = open)
		}
		Command::SetCurrentArea { name } => with_state(state, |s| s.current_area_name = name),
		Command::CreateArea { name } => with_areas(state, |areas| {
			areas.insert(name.clone(), Arc::new(Area::new(name)));
		}),
		Command::DeleteArea { name } => delete_area(state, &name),
	}
}

fn with_state(state: &Arc<State>, f: impl FnOnce(&mut State)) -> Arc<State> {
	let mut next = State::clone(state);
	f(&mut next);
	Arc::new(next)
}

fn with_areas(state: &Arc<State>, f: impl FnOnce(&mut Areas)) -> Arc<State> {
	with_state(state, |s| {
		let mut areas = Areas::clone(&s.areas);
		f(&mut areas);
		s.areas = Arc::new(areas);
	})
}

/// Resolves the addressed area or logs a stale reference.
fn target_area<'a>(state: &'a State, area: Option<String>, command: &str) -> Option<(String, &'a Arc<Area>)> {
	let name = area.unwrap_or_else(|| state.current_area_name.clone());
	match state.areas.get(&name) {
		Some(found) => Some((name, found)),
		None => {
			warn!(area = %name, command, "skipping command for non-existing work area");
			None
		}
	}
}

fn with_area(
	state: &Arc<State>,
	area: Option<String>,
	command: &str,
	f: impl FnOnce(&mut Area),
) -> Arc<State> {
	let Some((name, current)) = target_area(state, area, command) else {
		return Arc::clone(state);
	};
	let mut next = Area::clone(current);
	f(&mut next);
	with_areas(state, |areas| {
		areas.insert(name, Arc::new(next));
	})
}

fn with_resources(
	state: &Arc<State>,
	area: Option<String>,
	command: &str,
	f: impl FnOnce(&mut Resources),
) -> Arc<State> {
	with_area(state, area, command, |a| {
		let mut resources = Resources::clone(&a.resources);
		f(&mut resources);
		a.resources = Arc::new(resources);
	})
}

fn delete_area(state: &Arc<State>, name: &str) -> Arc<State> {
	if name == DEFAULT_AREA {
		warn!(area = %name, "refusing to delete the default work area");
		return Arc::clone(state);
	}
	if !state.areas.contains_key(name) {
		return Arc::clone(state);
	}
	let mut next = with_areas(state, |areas| {
		areas.shift_remove(name);
	});
	if next.current_area_name == name {
		Arc::make_mut(&mut next).current_area_name = DEFAULT_AREA.to_string();
	}
	next
}
