//! Frozen registry and the resolution algorithm.
//!
//! # Invariants
//!
//! - An exact primary-class binding always wins over an alias binding; there is no walk over
//!   related classes.
//!   - Enforced in: [`Resolver::resolve`]
//!   - Tested by: `tests::test_primary_beats_alias`, `tests::test_no_inheritance_walk`
//!   - Failure symptom: a value renders with a wrapper registered for a different class.
//!
//! - Resolution never mutates the registry.
//!   - Enforced in: every lookup takes `&self`.
//!   - Tested by: `tests::test_resolution_is_deterministic`
//!   - Failure symptom: the same value resolves differently across calls.
//!
//! - Falling back to the invoking wrapper requires `force` or the null sentinel.
//!   - Enforced in: [`Resolver::resolve`]
//!   - Tested by: `tests::test_unregistered_fails_without_force`, `tests::test_null_falls_back`
//!   - Failure symptom: unregistered classes render with a generic wrapper silently.

use std::sync::Arc;

use tracing::trace;
use vitrine_registry::{ByModelType, Collision, ModelClass, NormalizeFrom, Object, TypeRegistry};

use crate::config::RegistryConfig;
use crate::context::{Context, Options};
use crate::decorator::{Collection, CollectionBase, Decorator, Item, ItemBase, Named};
use crate::error::DecorateError;
use crate::registration::{RegistryBuilder, RegistryState};
use crate::wrapper::{Flavor, WrapperClass, WrapperId, WrapperRef};


/// A fully loaded, read-only registry.
///
/// Lookups take `&self` and hold no locks, so one registry can be shared across threads.
#[derive(Debug, Clone)]
pub struct DecoratorRegistry {
	state: RegistryState,
}

impl DecoratorRegistry {
	pub(crate) fn from_state(state: RegistryState) -> Self {
		Self { state }
	}

	pub fn builder(config: RegistryConfig) -> RegistryBuilder {
		RegistryBuilder::new(config)
	}

	/// A builder holding every declaration of this registry, for rebuilding with more.
	pub fn to_builder(&self) -> RegistryBuilder {
		RegistryBuilder::from_state(self.state.clone())
	}

	pub fn config(&self) -> &RegistryConfig {
		&self.state.config
	}

	/// Conflicts recorded while the registry was built.
	pub fn collisions(&self) -> &[Collision] {
		&self.state.collisions
	}

	/// The four lookup tables, read-only.
	pub fn tables(&self) -> &TypeRegistry<WrapperRef> {
		&self.state.tables
	}

	/// Every known wrapper in declaration order, the base wrappers first.
	pub fn wrappers(&self) -> impl Iterator<Item = &WrapperRef> + '_ {
		self.state
			.order
			.iter()
			.filter_map(|id| self.state.wrappers.get(id))
	}

	pub fn wrapper(&self, id: WrapperId) -> Option<&WrapperRef> {
		self.state.wrappers.get(&id)
	}

	pub fn wrapper_of<D: Named>(&self) -> Option<&WrapperRef> {
		self.wrapper(D::id())
	}

	/// The built-in item wrapper resolution falls back to when invoked without a default.
	pub fn base_item(&self) -> &WrapperRef {
		&self.state.base
	}

	/// Finds the item wrapper registered under a model type.
	///
	/// Accepts anything [`ByModelType`] normalizes: a model type, a string, a class, a value,
	/// or a list of values (keyed by its first element).
	pub fn lookup_wrapper_for_model_type<Q>(&self, raw: &Q) -> Option<&WrapperRef>
	where
		Q: ?Sized,
		ByModelType: NormalizeFrom<Q>,
	{
		self.state.tables.by_model_type.get(raw)
	}

	pub fn lookup_primary(&self, class: ModelClass) -> Option<&WrapperRef> {
		self.state.tables.by_primary_class.get(&class)
	}

	pub fn lookup_alias(&self, class: ModelClass) -> Option<&WrapperRef> {
		self.state.tables.by_alias_class.get(&class)
	}

	/// Only persisted classes are ever bound here.
	pub fn lookup_persisted(&self, class: ModelClass) -> Option<&WrapperRef> {
		self.state.tables.by_persisted_class.get(&class)
	}

	/// The collection wrapper paired with an item wrapper.
	pub fn collection_for(&self, item: WrapperId) -> Option<&WrapperRef> {
		let collection = self.state.collections.get(&item)?;
		self.state.wrappers.get(collection)
	}

	/// A resolver invoked on the base item wrapper.
	pub fn resolver(&self) -> Resolver<'_> {
		Resolver {
			registry: self,
			default: &self.state.base,
		}
	}

	/// A resolver invoked on item wrapper `D`, which must be registered.
	pub fn resolver_for<D: Item>(&self) -> Result<Resolver<'_>, DecorateError> {
		let default = self.registered::<D>(Flavor::Item)?;
		Ok(Resolver {
			registry: self,
			default,
		})
	}

	/// Resolves and decorates one value, falling back to the base wrapper on `force`.
	pub fn decorate(
		&self,
		object: impl Into<Object>,
		options: Options,
	) -> Result<Box<dyn Decorator>, DecorateError> {
		self.resolver().decorate(object.into(), options)
	}

	pub fn decorate_collection(
		&self,
		objects: Vec<Object>,
		options: Options,
	) -> Result<Box<dyn Decorator>, DecorateError> {
		self.resolver().decorate_collection(objects, options)
	}

	pub fn decorate_all(
		&self,
		objects: impl IntoIterator<Item = Object>,
		options: Options,
	) -> Result<Vec<Box<dyn Decorator>>, DecorateError> {
		self.resolver().decorate_all(objects, options)
	}

	/// Decorates each member of a collection wrapper with a context derived from the
	/// collection's, resolving on the collection's item wrapper.
	pub fn decorate_members(
		&self,
		collection: &dyn Decorator,
	) -> Result<Vec<Box<dyn Decorator>>, DecorateError> {
		let default = collection
			.wrapper()
			.paired()
			.and_then(|item| self.wrapper(item))
			.unwrap_or(&self.state.base);
		let resolver = Resolver {
			registry: self,
			default,
		};
		let options = collection.context().derive();
		collection
			.objects()
			.iter()
			.map(|object| resolver.decorate(object.clone(), options.clone()))
			.collect()
	}

	/// Builds item wrapper `D` around `object` without resolution. `D` must be registered.
	pub fn instantiate<D: Item>(
		&self,
		object: impl Into<Object>,
		options: Options,
	) -> Result<D, DecorateError> {
		let wrapper = self.registered::<D>(Flavor::Item)?;
		let context = Context::build(Flavor::Item, options, &self.state.config.actions);
		Ok(D::construct(ItemBase::new(
			object.into(),
			context,
			Arc::clone(wrapper),
		)))
	}

	/// Builds collection wrapper `C` around `objects` without resolution. `C` must be
	/// registered.
	pub fn instantiate_collection<C: Collection>(
		&self,
		objects: Vec<Object>,
		options: Options,
	) -> Result<C, DecorateError> {
		let wrapper = self.registered::<C>(Flavor::Collection)?;
		let context = Context::build(Flavor::Collection, options, &self.state.config.actions);
		Ok(C::construct(CollectionBase::new(
			objects,
			context,
			Arc::clone(wrapper),
		)))
	}

	fn registered<D: Named>(&self, flavor: Flavor) -> Result<&WrapperRef, DecorateError> {
		match self.wrapper_of::<D>() {
			Some(wrapper) if wrapper.flavor() == flavor => Ok(wrapper),
			Some(wrapper) => Err(wrapper.guard_violation("registered with the other flavor")),
			None => Err(DecorateError::ConstructionGuardViolation {
				wrapper: D::NAME,
				reason: "wrapper was never registered",
			}),
		}
	}

	fn construct_item(
		&self,
		wrapper: &WrapperRef,
		object: Object,
		options: Options,
	) -> Result<Box<dyn Decorator>, DecorateError> {
		let context = Context::build(Flavor::Item, options, &self.state.config.actions);
		wrapper.build_item(ItemBase::new(object, context, Arc::clone(wrapper)))
	}

	fn construct_collection(
		&self,
		wrapper: &WrapperRef,
		objects: Vec<Object>,
		options: Options,
	) -> Result<Box<dyn Decorator>, DecorateError> {
		let context = Context::build(Flavor::Collection, options, &self.state.config.actions);
		wrapper.build_collection(CollectionBase::new(objects, context, Arc::clone(wrapper)))
	}
}

/// Resolution invoked on a particular item wrapper, the default.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
	registry: &'a DecoratorRegistry,
	default: &'a WrapperRef,
}

impl<'a> Resolver<'a> {
	/// The wrapper resolution was invoked on.
	pub fn invoked_on(&self) -> &'a WrapperClass {
		self.default
	}

	/// Finds the wrapper for `object`: primary class, then alias class, then the default when
	/// `force` is set or `object` is the null sentinel.
	pub fn resolve(&self, object: &Object, force: bool) -> Result<&'a WrapperRef, DecorateError> {
		let class = object.class();
		if let Some(wrapper) = self.registry.lookup_primary(class) {
			trace!(class = class.name(), wrapper = wrapper.name(), "resolved by primary class");
			return Ok(wrapper);
		}
		if let Some(wrapper) = self.registry.lookup_alias(class) {
			trace!(class = class.name(), wrapper = wrapper.name(), "resolved by alias class");
			return Ok(wrapper);
		}
		if force || object.is_null() {
			trace!(
				class = class.name(),
				wrapper = self.default.name(),
				force,
				"fell back to invoking wrapper"
			);
			return Ok(self.default);
		}
		Err(DecorateError::UnresolvedType {
			subject: class.name().to_string(),
			invoked_on: self.default.name(),
		})
	}

	/// Resolves and constructs. A `model_type` option selects the wrapper by model type
	/// instead of by the value's class.
	pub fn decorate(
		&self,
		object: Object,
		options: Options,
	) -> Result<Box<dyn Decorator>, DecorateError> {
		let wrapper = match options.model_type() {
			Some(model_type) => self.by_model_type(model_type.as_str(), options.force())?,
			None => self.resolve(&object, options.force())?,
		};
		self.registry.construct_item(wrapper, object, options)
	}

	/// Constructs the collection wrapper paired with the default item wrapper, or with the
	/// item wrapper named by a `model_type` option.
	pub fn decorate_collection(
		&self,
		objects: Vec<Object>,
		options: Options,
	) -> Result<Box<dyn Decorator>, DecorateError> {
		let item = match options.model_type() {
			Some(model_type) => self.by_model_type(model_type.as_str(), options.force())?,
			None => self.default,
		};
		let collection = self
			.registry
			.collection_for(item.id())
			.ok_or(DecorateError::MissingCollection { item: item.name() })?;
		trace!(
			item = item.name(),
			wrapper = collection.name(),
			len = objects.len(),
			"resolved collection wrapper"
		);
		self.registry
			.construct_collection(collection, objects, options)
	}

	/// Decorates every value on its own; for lists that mix classes.
	pub fn decorate_all(
		&self,
		objects: impl IntoIterator<Item = Object>,
		options: Options,
	) -> Result<Vec<Box<dyn Decorator>>, DecorateError> {
		objects
			.into_iter()
			.map(|object| self.decorate(object, options.clone()))
			.collect()
	}

	fn by_model_type(&self, model_type: &str, force: bool) -> Result<&'a WrapperRef, DecorateError> {
		match self.registry.lookup_wrapper_for_model_type(model_type) {
			Some(wrapper) => {
				trace!(%model_type, wrapper = wrapper.name(), "resolved by model type");
				Ok(wrapper)
			}
			None if force => Ok(self.default),
			None => Err(DecorateError::UnresolvedType {
				subject: format!("model type {model_type}"),
				invoked_on: self.default.name(),
			}),
		}
	}
}
