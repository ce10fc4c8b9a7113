//! Read accessors over [`State`].
//!
//! Area-scoped selectors take an optional area name and fall back to the
//! current area. A missing area reads as empty or closed.

use std::sync::Arc;

use serde_json::Value;

use crate::model::{Area, I18nConfig, Location, Resource, State};

pub fn location(state: &State) -> &Location {
	&state.location
}

pub fn i18n_config(state: &State) -> &I18nConfig {
	&state.i18n_config
}

/// Area names in creation order.
pub fn area_names(state: &State) -> Vec<&str> {
	state.areas.keys().map(String::as_str).collect()
}

pub fn current_area_name(state: &State) -> &str {
	&state.current_area_name
}

pub fn current_area(state: &State) -> Option<&Arc<Area>> {
	state.areas.get(&state.current_area_name)
}

/// Looks up an area by name, defaulting to the current one.
pub fn area<'a>(state: &'a State, name: Option<&str>) -> Option<&'a Arc<Area>> {
	state
		.areas
		.get(name.unwrap_or(state.current_area_name.as_str()))
}

/// Resources of an area in insertion order.
pub fn resources<'a>(state: &'a State, area_name: Option<&str>) -> Vec<&'a Resource> {
	area(state, area_name)
		.map(|a| a.resources.values().collect())
		.unwrap_or_default()
}

pub fn window_type_dialog_open(state: &State, area_name: Option<&str>) -> bool {
	area(state, area_name).is_some_and(|a| a.window_type_dialog_open)
}

pub fn jump_to_window_dialog_open(state: &State, area_name: Option<&str>) -> bool {
	area(state, area_name).is_some_and(|a| a.jump_to_window_dialog_open)
}

pub fn annotation_enabled(state: &State) -> bool {
	state.annotation_enabled
}

/// Encoded viewer session of an area.
pub fn session_state<'a>(state: &'a State, area_name: Option<&str>) -> Option<&'a str> {
	area(state, area_name).and_then(|a| a.session_state.as_deref())
}

pub fn annotation_text<'a>(state: &'a State, area_name: Option<&str>) -> Option<&'a Value> {
	area(state, area_name).map(|a| &a.annotation_text)
}
