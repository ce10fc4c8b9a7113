use folio_state::MemoryStorage;
use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

fn store() -> (Rc<MemoryStorage>, AnnotationStore) {
	let storage = Rc::new(MemoryStorage::new());
	let annotations = AnnotationStore::new(storage.clone(), "page-1");
	(storage, annotations)
}

#[test]
fn create_starts_an_empty_page() {
	let (storage, annotations) = store();
	assert_eq!(annotations.all(), None);

	let page = annotations.create(json!({"id": "a1", "body": "first"}));

	assert_eq!(
		page,
		json!({
			"id": "page-1",
			"items": [{"id": "a1", "body": "first"}],
			"type": "AnnotationPage",
		})
	);
	assert_eq!(annotations.all(), Some(page));
	assert_eq!(storage.len(), 1);
}

#[test]
fn update_replaces_in_place() {
	let (_, annotations) = store();
	annotations.create(json!({"id": "a1", "body": "first"}));
	annotations.create(json!({"id": "a2", "body": "second"}));

	let page = annotations.update(json!({"id": "a1", "body": "changed"})).unwrap();

	assert_eq!(
		page["items"],
		json!([{"id": "a1", "body": "changed"}, {"id": "a2", "body": "second"}])
	);
}

#[test]
fn update_of_unknown_id_appends() {
	let (_, annotations) = store();
	annotations.create(json!({"id": "a1"}));

	let page = annotations.update(json!({"id": "zz"})).unwrap();

	assert_eq!(page["items"], json!([{"id": "a1"}, {"id": "zz"}]));
}

#[test]
fn update_and_delete_without_page_return_none() {
	let (storage, annotations) = store();
	assert_eq!(annotations.update(json!({"id": "a1"})), None);
	assert_eq!(annotations.delete("a1"), None);
	assert!(storage.is_empty());
}

#[test]
fn delete_and_get_by_id() {
	let (_, annotations) = store();
	annotations.create(json!({"id": "a1"}));
	annotations.create(json!({"id": "a2"}));

	assert_eq!(annotations.get("a2"), Some(json!({"id": "a2"})));
	let page = annotations.delete("a2").unwrap();
	assert_eq!(page["items"], json!([{"id": "a1"}]));
	assert_eq!(annotations.get("a2"), None);
}

#[test]
fn unreadable_page_is_treated_as_missing() {
	let (storage, annotations) = store();
	storage.set("page-1", "{not json".to_string());

	assert_eq!(annotations.all(), None);
	let page = annotations.create(json!({"id": "a1"}));
	assert_eq!(page["items"], json!([{"id": "a1"}]));
}

#[test]
fn replace_page_restores_or_clears() {
	let (storage, annotations) = store();
	let saved = json!({"id": "page-1", "items": [{"id": "x"}], "type": "AnnotationPage"});

	annotations.replace_page(Some(&saved));
	assert_eq!(annotations.all(), Some(saved));

	annotations.replace_page(Some(&json!({})));
	assert_eq!(annotations.all(), None);
	assert!(storage.is_empty());

	annotations.create(json!({"id": "y"}));
	annotations.replace_page(None);
	assert_eq!(annotations.all(), None);
}
