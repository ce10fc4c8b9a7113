//! Workspace configuration.
//!
//! [`Config`] is the fully resolved configuration; [`Config::try_default`]
//! holds the built-in values. Hosts pass a [`ConfigOverrides`] (every field optional,
//! keys in the host page's camelCase) and [`Config::merged`] lays it over the
//! defaults key by key. Overrides can also be read from TOML:
//!
//! ```toml
//! classNamePrefix = "my-workspace"
//! persistStore = false
//! teiEndpoint = "https://example.org/api/search"
//!
//! [theme.palette.primary]
//! main = "#336699"
//! ```
//!
//! The workspace itself reads `class_name_prefix`, `tei_endpoint`,
//! `persist_store` and the URL factory. `theme`, `enable_routing`,
//! `manifest_endpoint` and `kod_endpoint` are validated and passed through to
//! the host's UI through [`crate::Workspace::get_config`]; the viewer keeps
//! its own theme.

use std::fmt;
use std::rc::Rc;

use folio_state::Location;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::error::{ConfigError, Result};

#[cfg(test)]
mod tests;

/// Built-in TEI search endpoint.
pub const DEFAULT_TEI_ENDPOINT: &str = "http://example.com/api/search";
/// Built-in manifest search endpoint.
pub const DEFAULT_MANIFEST_ENDPOINT: &str = "http://example.com/api/manifest/search";
/// Built-in authority file search endpoint.
pub const DEFAULT_KOD_ENDPOINT: &str = "http://example.com/api/kod/search";
/// Origin used by the default URL factory.
pub const DEFAULT_ORIGIN: &str = "http://localhost";

/// Turns a host location into an absolute URL, given the configured origin.
pub type UrlFactory = Rc<dyn Fn(&Url, &Location) -> std::result::Result<Url, url::ParseError>>;

/// Resolved workspace configuration.
#[derive(Clone)]
pub struct Config {
	/// Prefix for class names of workspace markup.
	pub class_name_prefix: String,
	/// Host routing switch, passed through.
	pub enable_routing: bool,
	/// Host UI theme, passed through opaquely.
	pub theme: Value,
	/// Handed to the viewer's TEI plugin.
	pub tei_endpoint: Url,
	/// Host manifest search endpoint, passed through.
	pub manifest_endpoint: Url,
	/// Host authority file (KOD) search endpoint, passed through.
	pub kod_endpoint: Url,
	/// Keep areas and resources across page reloads.
	pub persist_store: bool,
	pub origin: Url,
	pub create_absolute_url: UrlFactory,
}

impl Config {
	/// Lays `overrides` over `self`; every present field wins.
	pub fn merged(&self, overrides: ConfigOverrides) -> Result<Config> {
		let mut config = self.clone();
		if let Some(prefix) = overrides.class_name_prefix {
			config.class_name_prefix = prefix;
		}
		if let Some(enable) = overrides.enable_routing {
			config.enable_routing = enable;
		}
		if let Some(theme) = overrides.theme {
			config.theme = theme;
		}
		if let Some(raw) = overrides.tei_endpoint {
			config.tei_endpoint = parse_url("teiEndpoint", &raw)?;
		}
		if let Some(raw) = overrides.manifest_endpoint {
			config.manifest_endpoint = parse_url("manifestEndpoint", &raw)?;
		}
		if let Some(raw) = overrides.kod_endpoint {
			config.kod_endpoint = parse_url("kodEndpoint", &raw)?;
		}
		if let Some(persist) = overrides.persist_store {
			config.persist_store = persist;
		}
		if let Some(raw) = overrides.origin {
			config.origin = parse_url("origin", &raw)?;
		}
		Ok(config)
	}

	/// Defaults merged with overrides read from TOML.
	pub fn from_toml_str(source: &str) -> Result<Config> {
		let overrides: ConfigOverrides = toml::from_str(source)?;
		Config::try_default()?.merged(overrides)
	}

	/// The built-in configuration.
	pub fn try_default() -> Result<Config> {
		Ok(Config {
			class_name_prefix: "hsp-workspace".to_string(),
			enable_routing: false,
			theme: Value::Object(serde_json::Map::new()),
			tei_endpoint: parse_url("teiEndpoint", DEFAULT_TEI_ENDPOINT)?,
			manifest_endpoint: parse_url("manifestEndpoint", DEFAULT_MANIFEST_ENDPOINT)?,
			kod_endpoint: parse_url("kodEndpoint", DEFAULT_KOD_ENDPOINT)?,
			persist_store: true,
			origin: parse_url("origin", DEFAULT_ORIGIN)?,
			create_absolute_url: Rc::new(default_absolute_url),
		})
	}

	/// Replaces the URL factory.
	pub fn with_url_factory(
		mut self,
		factory: impl Fn(&Url, &Location) -> std::result::Result<Url, url::ParseError> + 'static,
	) -> Self {
		self.create_absolute_url = Rc::new(factory);
		self
	}

	/// Absolute URL of `location` under the configured origin.
	pub fn absolute_url(&self, location: &Location) -> std::result::Result<Url, url::ParseError> {
		(self.create_absolute_url)(&self.origin, location)
	}
}

impl fmt::Debug for Config {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Config")
			.field("class_name_prefix", &self.class_name_prefix)
			.field("enable_routing", &self.enable_routing)
			.field("tei_endpoint", &self.tei_endpoint.as_str())
			.field("manifest_endpoint", &self.manifest_endpoint.as_str())
			.field("kod_endpoint", &self.kod_endpoint.as_str())
			.field("persist_store", &self.persist_store)
			.field("origin", &self.origin.as_str())
			.finish_non_exhaustive()
	}
}

/// Partial configuration as written by the host page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigOverrides {
	pub class_name_prefix: Option<String>,
	pub enable_routing: Option<bool>,
	pub theme: Option<Value>,
	#[serde(alias = "hspTeiEndpoint")]
	pub tei_endpoint: Option<String>,
	pub manifest_endpoint: Option<String>,
	pub kod_endpoint: Option<String>,
	pub persist_store: Option<bool>,
	pub origin: Option<String>,
}

/// `origin + pathname`, with the location's query and fragment.
pub fn default_absolute_url(
	origin: &Url,
	location: &Location,
) -> std::result::Result<Url, url::ParseError> {
	let mut url = origin.join(&location.pathname)?;
	let search = location.search.trim_start_matches('?');
	url.set_query((!search.is_empty()).then_some(search));
	let hash = location.hash.trim_start_matches('#');
	url.set_fragment((!hash.is_empty()).then_some(hash));
	Ok(url)
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { field, source })
}
