//! Runtime descriptors of wrapper types.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use vitrine_registry::{ModelClass, ModelType};

use crate::decorator::{CollectionBase, Decorator, ItemBase};
use crate::error::DecorateError;
use crate::registration::Installer;

/// Whether a wrapper presents one value or a list of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
	Item,
	Collection,
}

impl fmt::Display for Flavor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Item => write!(f, "item"),
			Self::Collection => write!(f, "collection"),
		}
	}
}

/// Identity of a wrapper type. Compares by Rust type only.
#[derive(Clone, Copy)]
pub struct WrapperId {
	type_id: TypeId,
	name: &'static str,
}

impl WrapperId {
	pub fn of<D: 'static>(name: &'static str) -> Self {
		Self {
			type_id: TypeId::of::<D>(),
			name,
		}
	}

	#[inline]
	pub fn name(&self) -> &'static str {
		self.name
	}

	#[inline]
	pub fn type_id(&self) -> TypeId {
		self.type_id
	}
}

impl PartialEq for WrapperId {
	fn eq(&self, other: &Self) -> bool {
		self.type_id == other.type_id
	}
}

impl Eq for WrapperId {}

impl Hash for WrapperId {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.type_id.hash(state);
	}
}

impl fmt::Debug for WrapperId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

impl fmt::Display for WrapperId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

/// Monomorphized constructor stored in a descriptor.
#[derive(Clone, Copy)]
pub(crate) enum Build {
	Item(fn(ItemBase) -> Box<dyn Decorator>),
	Collection(fn(CollectionBase) -> Box<dyn Decorator>),
}

impl Build {
	pub(crate) fn flavor(&self) -> Flavor {
		match self {
			Self::Item(_) => Flavor::Item,
			Self::Collection(_) => Flavor::Collection,
		}
	}
}

/// Shared handle to a descriptor.
pub type WrapperRef = Arc<WrapperClass>;

/// A registered wrapper type.
///
/// Item wrappers own their model type and the classes they wrap. Collection wrappers copy the
/// model type of the item they mirror and never bind classes of their own.
#[derive(Clone)]
pub struct WrapperClass {
	pub(crate) id: WrapperId,
	pub(crate) model_type: Option<ModelType>,
	pub(crate) primary: Option<ModelClass>,
	pub(crate) aliases: Vec<ModelClass>,
	pub(crate) persisted: Vec<ModelClass>,
	pub(crate) paired: Option<WrapperId>,
	pub(crate) composed: Option<Installer>,
	pub(crate) build: Build,
}

impl WrapperClass {
	#[inline]
	pub fn id(&self) -> WrapperId {
		self.id
	}

	#[inline]
	pub fn name(&self) -> &'static str {
		self.id.name
	}

	#[inline]
	pub fn flavor(&self) -> Flavor {
		self.build.flavor()
	}

	/// Canonical model type. Only the built-in base wrappers have none.
	pub fn model_type(&self) -> Option<&ModelType> {
		self.model_type.as_ref()
	}

	pub fn primary_class(&self) -> Option<ModelClass> {
		self.primary
	}

	pub fn alias_classes(&self) -> &[ModelClass] {
		&self.aliases
	}

	/// The subset of primary and alias classes that are persisted records.
	pub fn persisted_classes(&self) -> &[ModelClass] {
		&self.persisted
	}

	/// For a collection wrapper, the item wrapper it mirrors.
	pub fn paired(&self) -> Option<WrapperId> {
		self.paired
	}

	/// For a collection wrapper, the shared bundles composed from its item wrapper.
	pub fn composed(&self) -> Option<&Installer> {
		self.composed.as_ref()
	}

	pub fn is<D: 'static>(&self) -> bool {
		self.id.type_id == TypeId::of::<D>()
	}

	pub(crate) fn build_item(&self, base: ItemBase) -> Result<Box<dyn Decorator>, DecorateError> {
		match self.build {
			Build::Item(build) => Ok(build(base)),
			Build::Collection(_) => Err(self.guard_violation("collection wrapper built from one value")),
		}
	}

	pub(crate) fn build_collection(
		&self,
		base: CollectionBase,
	) -> Result<Box<dyn Decorator>, DecorateError> {
		match self.build {
			Build::Collection(build) => Ok(build(base)),
			Build::Item(_) => Err(self.guard_violation("item wrapper built from a list")),
		}
	}

	pub(crate) fn guard_violation(&self, reason: &'static str) -> DecorateError {
		DecorateError::ConstructionGuardViolation {
			wrapper: self.name(),
			reason,
		}
	}
}

impl fmt::Debug for WrapperClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WrapperClass")
			.field("name", &self.id.name)
			.field("flavor", &self.flavor())
			.field("model_type", &self.model_type)
			.field("primary", &self.primary)
			.field("aliases", &self.aliases)
			.field("paired", &self.paired)
			.finish()
	}
}
