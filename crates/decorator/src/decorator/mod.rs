//! Wrapper traits.
//!
//! [`Decorator`] is the object-safe surface every wrapper instance exposes. The typed traits
//! ([`Item`], [`Collection`]) add construction from the sealed base state, and [`Family`] ties a
//! collection wrapper to the item wrapper it mirrors so behavior declared once with
//! [`crate::shared!`] reaches both.

use std::any::Any;
use std::fmt;

use vitrine_registry::{Model, ModelType, Object, Symbol};

use crate::context::{Context, Options};
use crate::error::DecorateError;
use crate::registration::{CollectionDeclaration, ItemDeclaration};
use crate::wrapper::{Flavor, WrapperClass, WrapperId};

mod base;
mod builtin;

pub use base::{CollectionBase, ItemBase};
pub use builtin::{BaseCollection, BaseItem};
pub(crate) use builtin::{base_collection_class, base_item_class};

/// What a wrapper instance wraps.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
	One(&'a Object),
	Many(&'a [Object]),
}

/// A wrapper instance.
pub trait Decorator: Any + Send + Sync + fmt::Debug {
	/// Descriptor of the wrapper type this instance was built as.
	fn wrapper(&self) -> &WrapperClass;

	fn context(&self) -> &Context;

	fn subject(&self) -> Subject<'_>;

	fn flavor(&self) -> Flavor {
		self.wrapper().flavor()
	}

	fn model_type(&self) -> Option<&ModelType> {
		self.wrapper().model_type()
	}

	fn action(&self) -> &Symbol {
		self.context().action()
	}

	/// Every wrapped value: the single value of an item, the members of a collection.
	fn objects(&self) -> &[Object] {
		match self.subject() {
			Subject::One(object) => std::slice::from_ref(object),
			Subject::Many(objects) => objects,
		}
	}
}

impl dyn Decorator {
	pub fn is<D: Decorator>(&self) -> bool {
		let any: &dyn Any = self;
		any.is::<D>()
	}

	pub fn downcast_ref<D: Decorator>(&self) -> Option<&D> {
		let any: &dyn Any = self;
		any.downcast_ref::<D>()
	}

	/// Recovers the concrete wrapper type, handing the box back on mismatch.
	pub fn downcast<D: Decorator>(self: Box<Self>) -> Result<Box<D>, Box<Self>> {
		if !self.is::<D>() {
			return Err(self);
		}
		let any: Box<dyn Any> = self;
		match any.downcast::<D>() {
			Ok(decorator) => Ok(decorator),
			Err(_) => unreachable!("type checked above"),
		}
	}
}

/// A wrapper type with a stable display name.
pub trait Named: Decorator + Sized {
	const NAME: &'static str;

	fn id() -> WrapperId {
		WrapperId::of::<Self>(Self::NAME)
	}
}

/// A wrapper around a single domain value.
pub trait Item: Named {
	/// Called by the factory only; [`ItemBase`] cannot be created elsewhere.
	fn construct(base: ItemBase) -> Self;

	fn base(&self) -> &ItemBase;

	fn object(&self) -> &Object {
		self.base().object()
	}

	/// The wrapped value as a concrete model type.
	fn model<T: Model>(&self) -> Option<&T> {
		self.object().downcast_ref::<T>()
	}

	/// Resolves and decorates `object` through the global registry, with this wrapper as the
	/// fallback.
	fn decorate(
		object: impl Into<Object>,
		options: Options,
	) -> Result<Box<dyn Decorator>, DecorateError> {
		crate::db::get_db()
			.resolver_for::<Self>()?
			.decorate(object.into(), options)
	}

	/// Decorates `objects` with the collection wrapper paired with this wrapper.
	fn decorate_collection(
		objects: Vec<Object>,
		options: Options,
	) -> Result<Box<dyn Decorator>, DecorateError> {
		crate::db::get_db()
			.resolver_for::<Self>()?
			.decorate_collection(objects, options)
	}
}

/// A wrapper around a list of domain values.
pub trait Collection: Named + Family {
	/// Called by the factory only; [`CollectionBase`] cannot be created elsewhere.
	fn construct(base: CollectionBase) -> Self;

	fn base(&self) -> &CollectionBase;

	fn len(&self) -> usize {
		self.base().objects().len()
	}

	fn is_empty(&self) -> bool {
		self.base().objects().is_empty()
	}
}

/// Anchor for shared behavior.
///
/// An item wrapper is its own family; a collection wrapper belongs to the family of the item
/// wrapper it mirrors. Shared bundles are implemented for every member of a family at once.
pub trait Family {
	type Item: Item;
}

/// An item wrapper that takes part in the registration protocol.
pub trait DeclaredItem: Item {
	fn declaration() -> ItemDeclaration;
}

/// A collection wrapper that takes part in the registration protocol.
pub trait DeclaredCollection: Collection {
	fn declaration() -> CollectionDeclaration;
}

pub(crate) fn build_item<D: Item>(base: ItemBase) -> Box<dyn Decorator> {
	Box::new(D::construct(base))
}

pub(crate) fn build_collection<C: Collection>(base: CollectionBase) -> Box<dyn Decorator> {
	Box::new(C::construct(base))
}
