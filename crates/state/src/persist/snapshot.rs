use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{PersistError, Result};
use crate::model::{Area, Areas, Resources, State, empty_object};

/// Current snapshot schema version.
///
/// - 1: untagged; areas carry no `annotationText`.
/// - 2: tagged with `version`; areas carry `annotationText`.
pub const SCHEMA_VERSION: u32 = 2;

/// The persisted part of one area. Dialog flags are not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedArea {
	pub name: String,
	#[serde(default)]
	pub resources: Resources,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_state: Option<String>,
	pub annotation_text: Value,
}

/// The persisted part of [`State`].
///
/// Location, language and the annotation flag are not persisted. Absent keys
/// leave the in-memory value alone when merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
	pub version: u32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub current_area_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub areas: Option<IndexMap<String, PersistedArea>>,
}

impl PersistedState {
	/// Takes the persisted fields of `state`.
	pub fn capture(state: &State) -> Self {
		let areas = state
			.areas
			.iter()
			.map(|(name, area)| {
				let persisted = PersistedArea {
					name: area.name.clone(),
					resources: Resources::clone(&area.resources),
					session_state: area.session_state.clone(),
					annotation_text: area.annotation_text.clone(),
				};
				(name.clone(), persisted)
			})
			.collect();
		Self {
			version: SCHEMA_VERSION,
			current_area_name: Some(state.current_area_name.clone()),
			areas: Some(areas),
		}
	}

	/// Parses a stored snapshot, migrating older schema versions.
	pub fn from_json_str(raw: &str) -> Result<Self> {
		let value: Value = serde_json::from_str(raw)?;
		let Value::Object(object) = value else {
			return Err(PersistError::NotAnObject);
		};
		let migrated = migrate(object)?;
		Ok(serde_json::from_value(Value::Object(migrated))?)
	}

	pub fn to_json_string(&self) -> Result<String> {
		Ok(serde_json::to_string(self)?)
	}

	/// Reconciles the snapshot against in-memory state.
	///
	/// Each top-level key present in the snapshot wins. `areas` merges one
	/// level deeper: in-memory areas are kept and persisted areas replace
	/// them by name, so the default area survives a snapshot without it.
	pub fn merge_into(self, initial: &State) -> State {
		let mut state = initial.clone();
		if let Some(name) = self.current_area_name {
			state.current_area_name = name;
		}
		if let Some(persisted) = self.areas {
			let mut areas = Areas::clone(&state.areas);
			for (name, area) in persisted {
				areas.insert(name, Arc::new(area.into_area()));
			}
			state.areas = Arc::new(areas);
		}
		state
	}
}

impl PersistedArea {
	fn into_area(self) -> Area {
		let mut area = Area::new(self.name);
		area.resources = Arc::new(self.resources);
		area.session_state = self.session_state;
		area.annotation_text = self.annotation_text;
		area
	}
}

type Migration = fn(&mut Map<String, Value>);

/// Upgrades from `index + 1` to `index + 2`.
const MIGRATIONS: [Migration; 1] = [v1_add_annotation_text];

fn migrate(mut object: Map<String, Value>) -> Result<Map<String, Value>> {
	let found = object.get("version").and_then(Value::as_u64).unwrap_or(1);
	if found > u64::from(SCHEMA_VERSION) {
		return Err(PersistError::UnsupportedVersion {
			found,
			supported: SCHEMA_VERSION,
		});
	}
	let start = usize::try_from(found.max(1) - 1).unwrap_or(0);
	for step in &MIGRATIONS[start..] {
		step(&mut object);
	}
	if found < u64::from(SCHEMA_VERSION) {
		debug!(from = found, to = SCHEMA_VERSION, "persist.migrated");
	}
	object.insert("version".to_string(), Value::from(SCHEMA_VERSION));
	Ok(object)
}

fn v1_add_annotation_text(object: &mut Map<String, Value>) {
	let Some(Value::Object(areas)) = object.get_mut("areas") else {
		return;
	};
	for area in areas.values_mut() {
		if let Value::Object(area) = area {
			area.entry("annotationText").or_insert_with(empty_object);
		}
	}
}
