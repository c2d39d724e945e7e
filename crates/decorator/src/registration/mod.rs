//! Registration protocol.
//!
//! A wrapper type makes one of two declarations: an [`ItemDeclaration`] ("I wrap this class,
//! under this model type, plus these aliases") or a [`CollectionDeclaration`] ("I am the
//! collection counterpart of that item wrapper"). [`RegistryBuilder`] applies them to the
//! lookup tables; the declaration macros also link them into the binary for the global
//! registry.

use std::borrow::Cow;
use std::fmt;

use vitrine_registry::{Model, ModelCatalog, ModelClass};

use crate::decorator::{
	Collection, CollectionBase, Decorator, Family, Item, ItemBase, Named, build_collection,
	build_item,
};
use crate::error::{InvalidReason, RegistrationError};
use crate::wrapper::WrapperId;

mod builder;
#[cfg(test)]
mod tests;

pub use builder::RegistryBuilder;
pub(crate) use builder::RegistryState;

/// Specifier for a domain class: the class itself, or its name resolved through the
/// [`ModelCatalog`].
#[derive(Clone, PartialEq, Eq)]
pub enum ClassSpec {
	Class(ModelClass),
	Named(Cow<'static, str>),
}

impl ClassSpec {
	pub fn of<T: Model>() -> Self {
		Self::Class(ModelClass::of::<T>())
	}

	pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
		Self::Named(name.into())
	}

	pub(crate) fn resolve(
		&self,
		catalog: &ModelCatalog,
		wrapper: WrapperId,
	) -> Result<ModelClass, RegistrationError> {
		let class = match self {
			Self::Class(class) => *class,
			Self::Named(name) => catalog.get(name).ok_or_else(|| RegistrationError::Invalid {
				wrapper: wrapper.name(),
				reason: InvalidReason::UnknownClass {
					name: name.to_string(),
					suggestion: catalog.suggest(name),
				},
			})?,
		};
		if class.is_null() {
			return Err(RegistrationError::Invalid {
				wrapper: wrapper.name(),
				reason: InvalidReason::NullClass,
			});
		}
		Ok(class)
	}
}

impl From<ModelClass> for ClassSpec {
	fn from(class: ModelClass) -> Self {
		Self::Class(class)
	}
}

impl From<&'static str> for ClassSpec {
	fn from(name: &'static str) -> Self {
		Self::Named(Cow::Borrowed(name))
	}
}

impl From<String> for ClassSpec {
	fn from(name: String) -> Self {
		Self::Named(Cow::Owned(name))
	}
}

impl fmt::Debug for ClassSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Class(class) => write!(f, "{class}"),
			Self::Named(name) => write!(f, "{name:?}"),
		}
	}
}

/// "I wrap `primary` (and these aliases) under this model type."
#[derive(Clone)]
pub struct ItemDeclaration {
	pub(crate) id: WrapperId,
	pub(crate) build: fn(ItemBase) -> Box<dyn Decorator>,
	pub(crate) primary: ClassSpec,
	pub(crate) model_type: Option<Cow<'static, str>>,
	pub(crate) aliases: Vec<ClassSpec>,
	pub(crate) force: bool,
}

impl ItemDeclaration {
	/// Declares item wrapper `D` for `primary`. The model type defaults to the primary class's.
	pub fn of<D: Item>(primary: impl Into<ClassSpec>) -> Self {
		Self {
			id: D::id(),
			build: build_item::<D>,
			primary: primary.into(),
			model_type: None,
			aliases: Vec::new(),
			force: false,
		}
	}

	pub fn model_type(mut self, model_type: impl Into<Cow<'static, str>>) -> Self {
		self.model_type = Some(model_type.into());
		self
	}

	/// Adds a secondary class the wrapper also wraps.
	pub fn alias(mut self, alias: impl Into<ClassSpec>) -> Self {
		self.aliases.push(alias.into());
		self
	}

	/// Replaces bindings held by other wrappers instead of dropping this declaration's.
	pub fn force(mut self, force: bool) -> Self {
		self.force = force;
		self
	}

	#[inline]
	pub fn id(&self) -> WrapperId {
		self.id
	}
}

impl fmt::Debug for ItemDeclaration {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ItemDeclaration")
			.field("wrapper", &self.id)
			.field("primary", &self.primary)
			.field("model_type", &self.model_type)
			.field("aliases", &self.aliases)
			.field("force", &self.force)
			.finish()
	}
}

/// "I am the collection counterpart of item wrapper `item`."
#[derive(Clone, Copy)]
pub struct CollectionDeclaration {
	pub(crate) id: WrapperId,
	pub(crate) item: WrapperId,
	pub(crate) build: fn(CollectionBase) -> Box<dyn Decorator>,
}

impl CollectionDeclaration {
	/// Declares collection wrapper `C` for the item wrapper of its family.
	pub fn of<C: Collection>() -> Self {
		Self {
			id: C::id(),
			item: <<C as Family>::Item as Named>::id(),
			build: build_collection::<C>,
		}
	}

	#[inline]
	pub fn id(&self) -> WrapperId {
		self.id
	}

	#[inline]
	pub fn item(&self) -> WrapperId {
		self.item
	}
}

impl fmt::Debug for CollectionDeclaration {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CollectionDeclaration")
			.field("wrapper", &self.id)
			.field("item", &self.item)
			.finish()
	}
}

/// Record of the behavior bundles an item wrapper shares with its collection wrapper.
///
/// The bundles themselves are traits implemented for the whole family by [`crate::shared!`];
/// this record is what a collection declaration composes and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Installer {
	item: WrapperId,
	instance: &'static str,
	class: Option<&'static str>,
}

impl Installer {
	pub fn new(item: WrapperId, instance: &'static str, class: Option<&'static str>) -> Self {
		Self {
			item,
			instance,
			class,
		}
	}

	#[inline]
	pub fn item(&self) -> WrapperId {
		self.item
	}

	/// Name of the shared instance-behavior trait.
	#[inline]
	pub fn instance_behavior(&self) -> &'static str {
		self.instance
	}

	/// Name of the shared class-behavior trait, if one was declared.
	#[inline]
	pub fn class_behavior(&self) -> Option<&'static str> {
		self.class
	}
}

/// An item wrapper with shared behavior.
pub trait Install: Named {
	fn installer() -> Installer;
}

/// Link-time registration of an [`Installer`].
pub struct InstallerReg(pub fn() -> Installer);

inventory::collect!(InstallerReg);

/// Link-time registration of a wrapper declaration.
pub enum WrapperReg {
	Item(fn() -> ItemDeclaration),
	Collection(fn() -> CollectionDeclaration),
}

inventory::collect!(WrapperReg);
