//! Registry configuration.
//!
//! ```toml
//! duplicate_policy = "first_wins"   # or "strict"
//!
//! [actions]
//! item = "show"
//! collection = "index"
//! ```

use std::path::Path;

use serde::Deserialize;
use vitrine_registry::{DuplicatePolicy, Symbol};

use crate::error::ConfigError;
use crate::wrapper::Flavor;

/// Default actions assigned when the caller supplies none.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActionDefaults {
	pub item: Symbol,
	pub collection: Symbol,
}

impl ActionDefaults {
	pub fn for_flavor(&self, flavor: Flavor) -> &Symbol {
		match flavor {
			Flavor::Item => &self.item,
			Flavor::Collection => &self.collection,
		}
	}
}

impl Default for ActionDefaults {
	fn default() -> Self {
		Self {
			item: Symbol::canonical("show"),
			collection: Symbol::canonical("index"),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
	/// How a key already bound to another wrapper is treated.
	pub duplicate_policy: DuplicatePolicy,
	pub actions: ActionDefaults,
}

impl RegistryConfig {
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(content)?)
	}

	/// Reads and parses a TOML config file.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&content)
	}

	pub fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
		self.duplicate_policy = policy;
		self
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn test_defaults() {
		let config = RegistryConfig::from_toml_str("").unwrap();
		assert_eq!(config, RegistryConfig::default());
		assert_eq!(config.duplicate_policy, DuplicatePolicy::FirstWins);
		assert_eq!(config.actions.for_flavor(Flavor::Item), "show");
		assert_eq!(config.actions.for_flavor(Flavor::Collection), "index");
	}

	#[test]
	fn test_parse_normalizes_actions() {
		let config = RegistryConfig::from_toml_str(
			r#"
			duplicate_policy = "strict"

			[actions]
			item = "Details"
			"#,
		)
		.unwrap();

		assert_eq!(config.duplicate_policy, DuplicatePolicy::Strict);
		assert_eq!(config.actions.item, "details");
		assert_eq!(config.actions.collection, "index");
	}

	#[test]
	fn test_rejects_unknown_keys() {
		let err = RegistryConfig::from_toml_str("duplicate_policy = \"loudest\"").unwrap_err();
		assert!(matches!(err, ConfigError::Parse(_)));

		let err = RegistryConfig::from_toml_str("colour = 1").unwrap_err();
		assert!(matches!(err, ConfigError::Parse(_)));
	}

	#[test]
	fn test_load_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[actions]\ncollection = \"list\"").unwrap();

		let config = RegistryConfig::load(file.path()).unwrap();
		assert_eq!(config.actions.collection, "list");

		let missing = RegistryConfig::load(Path::new("/nonexistent/vitrine.toml")).unwrap_err();
		assert!(matches!(missing, ConfigError::Io { .. }));
	}
}
