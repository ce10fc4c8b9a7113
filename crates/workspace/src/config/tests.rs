use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use super::*;

fn location(pathname: &str, search: &str, hash: &str) -> Location {
	Location {
		pathname: pathname.to_string(),
		search: search.to_string(),
		hash: hash.to_string(),
	}
}

#[test]
fn defaults_match_builtins() {
	let config = Config::try_default().unwrap();
	assert_eq!(config.class_name_prefix, "hsp-workspace");
	assert!(!config.enable_routing);
	assert!(config.persist_store);
	assert_eq!(config.theme, json!({}));
	assert_eq!(config.tei_endpoint.as_str(), DEFAULT_TEI_ENDPOINT);
	assert_eq!(config.manifest_endpoint.as_str(), DEFAULT_MANIFEST_ENDPOINT);
	assert_eq!(config.kod_endpoint.as_str(), DEFAULT_KOD_ENDPOINT);
}

#[test]
fn overrides_win_per_key() {
	let config = Config::try_default()
		.unwrap()
		.merged(ConfigOverrides {
			class_name_prefix: Some("ws".into()),
			persist_store: Some(false),
			..ConfigOverrides::default()
		})
		.unwrap();

	assert_eq!(config.class_name_prefix, "ws");
	assert!(!config.persist_store);
	assert!(!config.enable_routing);
	assert_eq!(config.tei_endpoint.as_str(), DEFAULT_TEI_ENDPOINT);
}

#[test]
fn toml_overrides_use_camel_case_keys() {
	let config = Config::from_toml_str(
		r##"
			classNamePrefix = "my-workspace"
			enableRouting = true
			hspTeiEndpoint = "https://tei.example.org/search"

			[theme.palette.primary]
			main = "#336699"
		"##,
	)
	.unwrap();

	assert_eq!(config.class_name_prefix, "my-workspace");
	assert!(config.enable_routing);
	assert_eq!(config.tei_endpoint.as_str(), "https://tei.example.org/search");
	assert_eq!(config.theme, json!({"palette": {"primary": {"main": "#336699"}}}));
}

#[test]
fn invalid_url_names_the_option() {
	let error = Config::from_toml_str(r#"kodEndpoint = "not a url""#).unwrap_err();
	assert!(matches!(error, ConfigError::InvalidUrl { field: "kodEndpoint", .. }));
}

#[rstest]
#[case("persistStore = 1")]
#[case("unknownOption = true")]
#[case("classNamePrefix = ")]
fn malformed_toml_is_rejected(#[case] source: &str) {
	assert!(matches!(Config::from_toml_str(source), Err(ConfigError::Toml(_))));
}

#[rstest]
#[case(location("/", "", ""), "http://localhost/")]
#[case(location("/search", "?q=psalter", ""), "http://localhost/search?q=psalter")]
#[case(location("/a/b", "q=1", "#top"), "http://localhost/a/b?q=1#top")]
fn default_factory_joins_origin(#[case] location: Location, #[case] expected: &str) {
	let config = Config::try_default().unwrap();
	assert_eq!(config.absolute_url(&location).unwrap().as_str(), expected);
}

#[test]
fn custom_factory_replaces_default() {
	let config = Config::try_default()
		.unwrap()
		.with_url_factory(|origin, location| origin.join(&format!("app{}", location.pathname)));
	let url = config.absolute_url(&location("/x", "", "")).unwrap();
	assert_eq!(url.as_str(), "http://localhost/app/x");
}
