//! The two one-way reconciliation passes between an area and a viewer.
//!
//! Neither pass merges: each diffs window ids against resource ids and
//! converges the other side, so whichever pass runs last wins for the fields
//! it touches. Identity is always the resource id; the manifest id is only a
//! grouping key and never takes part in the diff.

use std::collections::HashSet;

use folio_common::deep_equal;
use folio_session::encode;
use folio_state::{Area, Command, Resource, ResourceKind};
use folio_viewer::{ViewerAction, ViewerStore, ViewerWindow};
use serde_json::Value;
use tracing::{debug, warn};

use crate::events::{EventDetail, EventKind, EventTarget};


/// Counts of what one pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
	pub added: usize,
	pub removed: usize,
	pub updated: usize,
	/// Changes a listener vetoed.
	pub prevented: usize,
}

/// Converges the viewer's windows onto the area's resources.
///
/// Every missing resource gets a window, followed by the two catalog
/// removals the viewer needs to keep the resource out of its catalog list.
/// Windows without a resource are closed. Windows whose carried record is not
/// deep-equal to the stored resource get the stored one.
pub fn sync_area_into_viewer(area: &Area, viewer: &dyn ViewerStore) -> PassSummary {
	let window_ids = viewer.window_ids();
	let open: HashSet<&str> = window_ids.iter().map(String::as_str).collect();
	let mut summary = PassSummary::default();

	for (id, resource) in area.resources.iter() {
		if open.contains(id.as_str()) {
			continue;
		}
		viewer.dispatch(ViewerAction::AddWindow {
			id: id.clone(),
			manifest_id: resource.manifest_id.clone(),
			resource: resource.to_value(),
		});
		viewer.dispatch(ViewerAction::RemoveResource {
			id: Some(id.clone()),
		});
		viewer.dispatch(ViewerAction::RemoveResource { id: None });
		summary.added += 1;
	}

	for id in &window_ids {
		if !area.resources.contains_key(id) {
			viewer.dispatch(ViewerAction::RemoveWindow { id: id.clone() });
			summary.removed += 1;
		}
	}

	for (id, resource) in area.resources.iter() {
		if !open.contains(id.as_str()) {
			continue;
		}
		let Some(window) = viewer.window(id) else {
			continue;
		};
		let stored = resource.to_value();
		if window
			.resource
			.as_ref()
			.is_some_and(|carried| deep_equal(&stored, carried))
		{
			continue;
		}
		viewer.dispatch(ViewerAction::UpdateWindow {
			id: id.clone(),
			resource: stored,
		});
		summary.updated += 1;
	}

	debug!(
		area = %area.name,
		added = summary.added,
		removed = summary.removed,
		updated = summary.updated,
		"sync.area_to_viewer"
	);
	summary
}

/// Plans the store update that converges the area onto the viewer's windows.
///
/// The first command always stores a fresh session snapshot for the area.
/// Every resource change is announced through a cancelable event first and
/// only planned if no listener prevented it; a veto skips that one resource
/// and nothing else. The caller dispatches the commands as one batch.
pub fn sync_viewer_into_area(
	area: &Area,
	viewer: &dyn ViewerStore,
	events: &EventTarget,
) -> (Vec<Command>, PassSummary) {
	let window_ids = viewer.window_ids();
	let open: HashSet<&str> = window_ids.iter().map(String::as_str).collect();
	let target = Some(area.name.clone());
	let mut summary = PassSummary::default();

	let mut commands = vec![Command::SetSessionState {
		token: Some(encode(&viewer.export_state())),
		area: target.clone(),
	}];

	for id in &window_ids {
		if area.resources.contains_key(id) {
			continue;
		}
		let Some(window) = viewer.window(id) else {
			continue;
		};
		let Some(resource) = window_resource(&window) else {
			continue;
		};
		if events.fire(
			EventKind::ResourceAddedToMirador,
			EventDetail::Resource(resource.clone()),
			true,
		) {
			commands.push(Command::AddResource {
				resource,
				area: target.clone(),
			});
			summary.added += 1;
		} else {
			summary.prevented += 1;
		}
	}

	for (id, resource) in area.resources.iter() {
		if open.contains(id.as_str()) {
			continue;
		}
		if events.fire(
			EventKind::ResourceRemovedFromMirador,
			EventDetail::Resource(resource.clone()),
			true,
		) {
			commands.push(Command::RemoveResource {
				id: id.clone(),
				area: target.clone(),
			});
			summary.removed += 1;
		} else {
			summary.prevented += 1;
		}
	}

	for id in &window_ids {
		let Some(stored) = area.resources.get(id) else {
			continue;
		};
		let Some(window) = viewer.window(id) else {
			continue;
		};
		let carried = window
			.resource
			.clone()
			.unwrap_or_else(|| synthesize(&window).to_value());
		if deep_equal(&stored.to_value(), &carried) {
			continue;
		}
		let Some(resource) = parse_payload(&window.id, &carried) else {
			continue;
		};
		if events.fire(
			EventKind::MiradorResourceUpdated,
			EventDetail::Resource(stored.clone()),
			true,
		) {
			commands.push(Command::UpdateResource {
				resource,
				area: target.clone(),
			});
			summary.updated += 1;
		} else {
			summary.prevented += 1;
		}
	}

	debug!(
		area = %area.name,
		added = summary.added,
		removed = summary.removed,
		updated = summary.updated,
		prevented = summary.prevented,
		"sync.viewer_to_area"
	);
	(commands, summary)
}

/// Resource a window stands for: its carried record, or a synthesized
/// manifest resource for windows opened from the viewer's own UI.
fn window_resource(window: &ViewerWindow) -> Option<Resource> {
	match &window.resource {
		Some(payload) => parse_payload(&window.id, payload),
		None => Some(synthesize(window)),
	}
}

fn synthesize(window: &ViewerWindow) -> Resource {
	let resource = Resource::new(ResourceKind::IiifManifest, window.id.clone());
	match &window.manifest_id {
		Some(manifest_id) => resource.with_manifest(manifest_id.clone()),
		None => resource,
	}
}

/// Record carried by a window. Payloads that fail to parse, or that name a
/// resource other than the window, are skipped.
fn parse_payload(window_id: &str, payload: &Value) -> Option<Resource> {
	match Resource::from_value(payload) {
		Ok(resource) if resource.id == window_id => Some(resource),
		Ok(resource) => {
			warn!(
				window = window_id,
				resource = %resource.id,
				"ignoring window whose payload names another resource"
			);
			None
		}
		Err(error) => {
			warn!(window = window_id, %error, "ignoring window with malformed resource payload");
			None
		}
	}
}
