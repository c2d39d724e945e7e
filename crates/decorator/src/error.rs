//! Error taxonomy.
//!
//! Load-time failures ([`RegistrationError`]) abort startup. Per-call failures
//! ([`DecorateError`]) propagate to the caller unchanged; nothing here retries or substitutes a
//! default on its own.

use std::path::PathBuf;

use vitrine_registry::Collision;

/// Why a declaration was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidReason {
	#[error("unknown class {name:?}{}", .suggestion.map(|s| format!(" (did you mean {s:?}?)")).unwrap_or_default())]
	UnknownClass {
		name: String,
		suggestion: Option<&'static str>,
	},
	#[error("model type {raw:?} normalizes to nothing")]
	EmptyModelType { raw: String },
	#[error("the null sentinel cannot be wrapped explicitly")]
	NullClass,
	#[error("{item} is not a registered item wrapper")]
	UnregisteredItem { item: &'static str },
	#[error("already declared as a {flavor} wrapper")]
	AlreadyDeclared { flavor: crate::wrapper::Flavor },
}

/// Failures of the registration protocol.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
	/// A specifier did not resolve, or the declaration is malformed.
	#[error("invalid registration of {wrapper}: {reason}")]
	Invalid {
		wrapper: &'static str,
		reason: InvalidReason,
	},
	/// A key is already bound to another wrapper and the policy is strict.
	#[error("registration conflict: {0}")]
	Conflict(Collision),
}

/// Failures of resolution and construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecorateError {
	/// No wrapper is registered for the value and fallback was not allowed.
	#[error("no wrapper registered for {subject} (resolution invoked on {invoked_on})")]
	UnresolvedType {
		subject: String,
		invoked_on: &'static str,
	},
	/// The item wrapper has no paired collection wrapper.
	#[error("{item} has no collection wrapper")]
	MissingCollection { item: &'static str },
	/// The factory was asked to build a wrapper outside the registered set.
	#[error("construction of {wrapper} refused: {reason}")]
	ConstructionGuardViolation {
		wrapper: &'static str,
		reason: &'static str,
	},
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("invalid registry config: {0}")]
	Parse(#[from] toml::de::Error),
}

/// Any error surfaced by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Registration(#[from] RegistrationError),
	#[error(transparent)]
	Decorate(#[from] DecorateError),
	#[error(transparent)]
	Config(#[from] ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
