//! Canonical identifiers.
//!
//! Every name that crosses a registry boundary (actions, controllers, model types) is reduced
//! to a [`Symbol`] first, so `"Show"`, `"show"` and `"SHOW"` address the same binding.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use heck::ToSnakeCase;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error produced when a raw identifier has no canonical form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
	#[error("identifier {0:?} normalizes to an empty symbol")]
	Empty(String),
}

/// A normalized, cheaply clonable identifier.
///
/// Each namespace segment is trimmed and snake-cased. Both `::` and `/` separate segments and
/// the canonical form always joins them with `/`. Empty segments are dropped.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<str>);

impl Symbol {
	/// Normalizes `raw`, returning `None` when nothing identifying remains.
	pub fn normalize(raw: &str) -> Option<Self> {
		let segments: Vec<String> = raw
			.split("::")
			.flat_map(|part| part.split('/'))
			.map(|part| part.trim().to_snake_case())
			.filter(|part| !part.is_empty())
			.collect();

		if segments.is_empty() {
			return None;
		}
		Some(Self(segments.join("/").into()))
	}

	/// Wraps text that is already canonical, skipping normalization.
	pub fn canonical(text: &'static str) -> Self {
		debug_assert_eq!(
			Self::normalize(text).as_ref().map(Symbol::as_str),
			Some(text),
			"not a canonical symbol"
		);
		Self(text.into())
	}

	/// Like [`Symbol::normalize`], but reports the rejected input.
	pub fn parse(raw: &str) -> Result<Self, SymbolError> {
		Self::normalize(raw).ok_or_else(|| SymbolError::Empty(raw.to_string()))
	}

	/// Returns the canonical text.
	#[inline]
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Strips a trailing `_{suffix}` from the last segment, keeping the symbol non-empty.
	pub fn without_suffix(&self, suffix: &str) -> Self {
		let text = self.as_str();
		match text.strip_suffix(suffix).and_then(|rest| rest.strip_suffix('_')) {
			Some(rest) if !rest.is_empty() && !rest.ends_with('/') => Self(rest.into()),
			_ => self.clone(),
		}
	}
}

impl FromStr for Symbol {
	type Err = SymbolError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl Borrow<str> for Symbol {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for Symbol {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl PartialEq<str> for Symbol {
	fn eq(&self, other: &str) -> bool {
		&*self.0 == other
	}
}

impl PartialEq<&str> for Symbol {
	fn eq(&self, other: &&str) -> bool {
		&*self.0 == *other
	}
}

impl fmt::Debug for Symbol {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, ":{}", self.0)
	}
}

impl fmt::Display for Symbol {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Serialize for Symbol {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.0)
	}
}

impl<'de> Deserialize<'de> for Symbol {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = String::deserialize(deserializer)?;
		Symbol::parse(&raw).map_err(serde::de::Error::custom)
	}
}

/// Canonical name of a domain concept, independent of its concrete class.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelType(Symbol);

impl ModelType {
	/// Normalizes a raw model type name, e.g. `"LineItem"` becomes `line_item`.
	pub fn new(raw: &str) -> Option<Self> {
		Symbol::normalize(raw).map(Self)
	}

	/// Returns the underlying symbol.
	#[inline]
	pub fn symbol(&self) -> &Symbol {
		&self.0
	}

	#[inline]
	pub fn as_str(&self) -> &str {
		self.0.as_str()
	}
}

impl From<Symbol> for ModelType {
	fn from(symbol: Symbol) -> Self {
		Self(symbol)
	}
}

impl PartialEq<&str> for ModelType {
	fn eq(&self, other: &&str) -> bool {
		self.0 == *other
	}
}

impl fmt::Debug for ModelType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&self.0, f)
	}
}

impl fmt::Display for ModelType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}
