//! Collision types and duplicate policy.
//!
//! # Role
//!
//! This module defines the vocabulary for registration conflicts. Deciding a conflict is the
//! registering layer's job; tables only report that a key was already bound.

use std::fmt;

use serde::Deserialize;

use super::key::TableKind;

/// How a registry treats a key already bound to a different wrapper.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
	/// Keep the first binding, warn and drop the incoming one.
	#[default]
	FirstWins,
	/// Fail the registration.
	Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
	/// The same wrapper re-registered the same key; nothing changed.
	Idempotent,
	/// Existing binding kept; incoming dropped.
	KeptExisting,
	/// Existing binding replaced by a forced registration.
	ReplacedExisting,
}

impl fmt::Display for Resolution {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Idempotent => write!(f, "idempotent"),
			Self::KeptExisting => write!(f, "kept existing"),
			Self::ReplacedExisting => write!(f, "replaced existing"),
		}
	}
}

/// A recorded conflict, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
	pub table: TableKind,
	/// Normalized key that conflicted.
	pub key: String,
	/// Wrapper that held the key before.
	pub existing: &'static str,
	/// Wrapper that tried to bind it.
	pub incoming: &'static str,
	pub resolution: Resolution,
}

impl fmt::Display for Collision {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} key {:?}: {} vs {} ({})",
			self.table, self.key, self.existing, self.incoming, self.resolution
		)
	}
}
