//! Key-normalization strategies.
//!
//! Each lookup table owns one strategy. A strategy maps any accepted raw input to the
//! canonical key of its table, or to nothing when the input cannot address that table
//! (a non-persisted class for [`ByPersistedClass`], the null sentinel for [`ByModelType`]).

use std::fmt;
use std::hash::Hash;

use crate::core::symbol::ModelType;
use crate::model::{ModelClass, Object};

/// Identifies one of the four lookup tables in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
	ModelType,
	PrimaryClass,
	PersistedClass,
	AliasClass,
}

impl fmt::Display for TableKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::ModelType => write!(f, "model_type"),
			Self::PrimaryClass => write!(f, "primary_class"),
			Self::PersistedClass => write!(f, "persisted_class"),
			Self::AliasClass => write!(f, "alias_class"),
		}
	}
}

/// A table's canonical key type.
pub trait Normalize {
	type Key: Clone + Eq + Hash + fmt::Debug + fmt::Display;

	const KIND: TableKind;
}

/// Normalization from one raw input type.
pub trait NormalizeFrom<Q: ?Sized>: Normalize {
	fn normalize(raw: &Q) -> Option<Self::Key>;
}

/// Keys by canonical model type.
#[derive(Debug)]
pub enum ByModelType {}

/// Keys by the exact class a wrapper primarily wraps.
#[derive(Debug)]
pub enum ByPrimaryClass {}

/// Keys by persisted classes only.
#[derive(Debug)]
pub enum ByPersistedClass {}

/// Keys by secondary classes a wrapper also wraps.
#[derive(Debug)]
pub enum ByAliasClass {}

impl Normalize for ByModelType {
	type Key = ModelType;

	const KIND: TableKind = TableKind::ModelType;
}

impl NormalizeFrom<ModelType> for ByModelType {
	fn normalize(raw: &ModelType) -> Option<ModelType> {
		Some(raw.clone())
	}
}

impl NormalizeFrom<str> for ByModelType {
	fn normalize(raw: &str) -> Option<ModelType> {
		ModelType::new(raw)
	}
}

impl NormalizeFrom<String> for ByModelType {
	fn normalize(raw: &String) -> Option<ModelType> {
		ModelType::new(raw)
	}
}

impl NormalizeFrom<ModelClass> for ByModelType {
	fn normalize(raw: &ModelClass) -> Option<ModelType> {
		raw.model_type()
	}
}

impl NormalizeFrom<Object> for ByModelType {
	fn normalize(raw: &Object) -> Option<ModelType> {
		raw.class().model_type()
	}
}

impl NormalizeFrom<[Object]> for ByModelType {
	fn normalize(raw: &[Object]) -> Option<ModelType> {
		raw.first().and_then(|first| first.class().model_type())
	}
}

impl NormalizeFrom<Vec<Object>> for ByModelType {
	fn normalize(raw: &Vec<Object>) -> Option<ModelType> {
		<Self as NormalizeFrom<[Object]>>::normalize(raw.as_slice())
	}
}

macro_rules! class_keyed {
	($strategy:ty, $kind:expr, |$class:ident| $accept:expr) => {
		impl Normalize for $strategy {
			type Key = ModelClass;

			const KIND: TableKind = $kind;
		}

		impl NormalizeFrom<ModelClass> for $strategy {
			fn normalize(raw: &ModelClass) -> Option<ModelClass> {
				let $class = *raw;
				$accept.then_some($class)
			}
		}

		impl NormalizeFrom<Object> for $strategy {
			fn normalize(raw: &Object) -> Option<ModelClass> {
				<Self as NormalizeFrom<ModelClass>>::normalize(&raw.class())
			}
		}
	};
}

class_keyed!(ByPrimaryClass, TableKind::PrimaryClass, |_class| true);
class_keyed!(ByAliasClass, TableKind::AliasClass, |_class| true);
class_keyed!(ByPersistedClass, TableKind::PersistedClass, |class| class.is_persisted());
