//! Applies declarations to the lookup tables.
//!
//! # Invariants
//!
//! - A key bound to one wrapper is never silently rebound to another.
//!   - Enforced in: `Binding::bind`
//!   - Tested by: `tests::test_conflict_keeps_first_and_warns`, `tests::test_strict_policy_rejects_conflict`
//!   - Failure symptom: whichever wrapper is declared last wins a shared class.
//!
//! - Re-declaring a wrapper leaves exactly one binding per key and warns once per key.
//!   - Enforced in: [`RegistryBuilder::declare_wrapper`] evicts the wrapper's own bindings first.
//!   - Tested by: `tests::test_redeclaration_is_idempotent`
//!   - Failure symptom: reload duplicates entries or keeps stale aliases.
//!
//! - A collection wrapper carries the model type and shared bundles of its item wrapper.
//!   - Enforced in: [`RegistryBuilder::declare_collection_of`], [`RegistryBuilder::install`]
//!   - Tested by: `tests::test_collection_copies_model_type`, `tests::test_install_after_collection_patches_it`
//!   - Failure symptom: shared behavior reported on the item but not on its collection.

use std::fmt::Display;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};
use vitrine_registry::{
	Collision, DuplicatePolicy, Evicted, ModelCatalog, ModelClass, ModelType, NormalizeFrom,
	Resolution, TableKind, TypeRegistry, TypeTable,
};

use super::{CollectionDeclaration, Install, Installer, ItemDeclaration};
use crate::config::RegistryConfig;
use crate::decorator::{DeclaredCollection, DeclaredItem, base_collection_class, base_item_class};
use crate::error::{InvalidReason, RegistrationError};
use crate::resolve::DecoratorRegistry;
use crate::wrapper::{Build, Flavor, WrapperClass, WrapperId, WrapperRef};

/// Everything a registry knows. Mutable while building, frozen inside [`DecoratorRegistry`].
#[derive(Debug, Clone)]
pub(crate) struct RegistryState {
	pub(crate) config: RegistryConfig,
	/// The built-in base item wrapper, also present in `wrappers`.
	pub(crate) base: WrapperRef,
	pub(crate) catalog: ModelCatalog,
	pub(crate) tables: TypeRegistry<WrapperRef>,
	pub(crate) wrappers: FxHashMap<WrapperId, WrapperRef>,
	/// Declaration order of `wrappers`.
	pub(crate) order: Vec<WrapperId>,
	/// Item wrapper → its collection wrapper.
	pub(crate) collections: FxHashMap<WrapperId, WrapperId>,
	pub(crate) installers: FxHashMap<WrapperId, Installer>,
	pub(crate) collisions: Vec<Collision>,
}

impl RegistryState {
	fn new(config: RegistryConfig) -> Self {
		let item = Arc::new(base_item_class());
		let collection = Arc::new(base_collection_class());
		let mut state = Self {
			config,
			base: Arc::clone(&item),
			catalog: ModelCatalog::new(),
			tables: TypeRegistry::new(),
			wrappers: FxHashMap::default(),
			order: Vec::new(),
			collections: FxHashMap::default(),
			installers: FxHashMap::default(),
			collisions: Vec::new(),
		};
		state.collections.insert(item.id, collection.id);
		state.insert_wrapper(item);
		state.insert_wrapper(collection);
		state
	}

	fn insert_wrapper(&mut self, wrapper: WrapperRef) {
		let id = wrapper.id;
		if self.wrappers.insert(id, wrapper).is_none() {
			self.order.push(id);
		}
	}

	fn patch_collection(&mut self, item: WrapperId, patch: impl FnOnce(&mut WrapperClass)) {
		if let Some(collection) = self.collections.get(&item)
			&& let Some(wrapper) = self.wrappers.get_mut(collection)
		{
			patch(Arc::make_mut(wrapper));
		}
	}
}

/// Builder for a [`DecoratorRegistry`].
///
/// Starts out holding the built-in base wrappers. A declaration that returns an error may
/// leave part of its bindings applied; discard the builder in that case.
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
	state: RegistryState,
}

impl RegistryBuilder {
	pub fn new(config: RegistryConfig) -> Self {
		Self {
			state: RegistryState::new(config),
		}
	}

	/// A builder continuing from `state`. Collisions start over; they belong to one build.
	pub(crate) fn from_state(mut state: RegistryState) -> Self {
		state.collisions.clear();
		Self { state }
	}

	/// Makes every class in `catalog` addressable by name in declarations.
	pub fn with_catalog(mut self, catalog: &ModelCatalog) -> Self {
		for class in catalog.iter() {
			self.state.catalog.insert(class);
		}
		self
	}

	pub fn register_model(&mut self, class: ModelClass) -> &mut Self {
		self.state.catalog.insert(class);
		self
	}

	pub fn config(&self) -> &RegistryConfig {
		&self.state.config
	}

	/// Conflicts recorded so far, in the order they happened.
	pub fn collisions(&self) -> &[Collision] {
		&self.state.collisions
	}

	/// Number of known wrappers, the base wrappers included.
	pub fn len(&self) -> usize {
		self.state.wrappers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.state.wrappers.is_empty()
	}

	pub fn declare<D: DeclaredItem>(&mut self) -> Result<WrapperRef, RegistrationError> {
		self.declare_wrapper(D::declaration())
	}

	pub fn declare_collection<C: DeclaredCollection>(
		&mut self,
	) -> Result<WrapperRef, RegistrationError> {
		self.declare_collection_of(C::declaration())
	}

	pub fn install_shared<I: Install>(&mut self) -> &mut Self {
		self.install(I::installer());
		self
	}

	/// Registers an item wrapper in the model-type, primary, persisted and alias tables.
	///
	/// Re-declaring a wrapper first drops every binding it held, then binds again; keys it
	/// held before are reported as idempotent collisions.
	pub fn declare_wrapper(
		&mut self,
		decl: ItemDeclaration,
	) -> Result<WrapperRef, RegistrationError> {
		let id = decl.id;
		let previous = self.state.wrappers.get(&id).cloned();
		if let Some(prev) = &previous
			&& prev.flavor() != Flavor::Item
		{
			return Err(invalid(id, InvalidReason::AlreadyDeclared { flavor: prev.flavor() }));
		}

		let catalog = &self.state.catalog;
		let primary = decl.primary.resolve(catalog, id)?;
		let model_type = match &decl.model_type {
			Some(raw) => ModelType::new(raw).ok_or_else(|| {
				invalid(id, InvalidReason::EmptyModelType { raw: raw.to_string() })
			})?,
			None => primary.model_type().ok_or_else(|| {
				invalid(id, InvalidReason::EmptyModelType { raw: primary.name().to_string() })
			})?,
		};
		let mut aliases: Vec<ModelClass> = Vec::with_capacity(decl.aliases.len());
		for spec in &decl.aliases {
			let class = spec.resolve(catalog, id)?;
			if !aliases.contains(&class) {
				aliases.push(class);
			}
		}
		let mut persisted: Vec<ModelClass> = Vec::new();
		for class in std::iter::once(primary).chain(aliases.iter().copied()) {
			if class.is_persisted() && !persisted.contains(&class) {
				persisted.push(class);
			}
		}

		let wrapper = Arc::new(WrapperClass {
			id,
			model_type: Some(model_type.clone()),
			primary: Some(primary),
			aliases,
			persisted,
			paired: None,
			composed: None,
			build: Build::Item(decl.build),
		});

		let state = &mut self.state;
		state.catalog.insert(primary);
		for alias in &wrapper.aliases {
			state.catalog.insert(*alias);
		}
		let evicted = match previous {
			Some(_) => state.tables.evict(|bound| bound.id == id),
			None => Evicted::default(),
		};

		let mut binding = Binding {
			wrapper: &wrapper,
			force: decl.force,
			policy: state.config.duplicate_policy,
			collisions: &mut state.collisions,
		};
		let tables = &mut state.tables;
		binding.bind(&mut tables.by_model_type, &model_type, &evicted.by_model_type)?;
		binding.bind(&mut tables.by_primary_class, &primary, &evicted.by_primary_class)?;
		for class in &wrapper.persisted {
			binding.bind(&mut tables.by_persisted_class, class, &evicted.by_persisted_class)?;
		}
		for class in &wrapper.aliases {
			binding.bind(&mut tables.by_alias_class, class, &evicted.by_alias_class)?;
		}

		state.insert_wrapper(Arc::clone(&wrapper));
		state.patch_collection(id, |collection| {
			collection.model_type = wrapper.model_type.clone();
		});
		debug!(
			wrapper = id.name(),
			%model_type,
			primary = %primary,
			aliases = wrapper.aliases.len(),
			persisted = wrapper.persisted.len(),
			"declared item wrapper"
		);
		Ok(wrapper)
	}

	/// Registers a collection wrapper as the counterpart of a declared item wrapper.
	///
	/// Copies the item's model type and composes the item's installer, if one is known. An
	/// item keeps the first collection wrapper declared for it.
	pub fn declare_collection_of(
		&mut self,
		decl: CollectionDeclaration,
	) -> Result<WrapperRef, RegistrationError> {
		let id = decl.id;
		let state = &mut self.state;
		if let Some(prev) = state.wrappers.get(&id)
			&& prev.flavor() != Flavor::Collection
		{
			return Err(invalid(id, InvalidReason::AlreadyDeclared { flavor: prev.flavor() }));
		}
		let item = state
			.wrappers
			.get(&decl.item)
			.filter(|wrapper| wrapper.flavor() == Flavor::Item)
			.cloned()
			.ok_or_else(|| invalid(id, InvalidReason::UnregisteredItem { item: decl.item.name() }))?;

		let composed = state.installers.get(&item.id).copied();
		let wrapper = Arc::new(WrapperClass {
			id,
			model_type: item.model_type.clone(),
			primary: None,
			aliases: Vec::new(),
			persisted: Vec::new(),
			paired: Some(item.id),
			composed,
			build: Build::Collection(decl.build),
		});

		match state.collections.get(&item.id).copied() {
			Some(existing) if existing != id => {
				warn!(
					item = item.name(),
					existing = existing.name(),
					incoming = id.name(),
					"item wrapper already has a collection wrapper"
				);
			}
			_ => {
				state.collections.insert(item.id, id);
			}
		}
		state.insert_wrapper(Arc::clone(&wrapper));
		debug!(
			wrapper = id.name(),
			item = item.name(),
			composed = ?composed.map(|installer| installer.instance_behavior()),
			"declared collection wrapper"
		);
		Ok(wrapper)
	}

	/// Records an item wrapper's shared bundles and composes them into its collection wrapper,
	/// now or when the collection is declared.
	pub fn install(&mut self, installer: Installer) {
		let item = installer.item();
		self.state.installers.insert(item, installer);
		self.state.patch_collection(item, |collection| {
			collection.composed = Some(installer);
		});
		debug!(
			item = item.name(),
			instance = installer.instance_behavior(),
			class = ?installer.class_behavior(),
			"installed shared behavior"
		);
	}

	pub fn build(self) -> DecoratorRegistry {
		DecoratorRegistry::from_state(self.state)
	}
}

impl Default for RegistryBuilder {
	fn default() -> Self {
		Self::new(RegistryConfig::default())
	}
}

fn invalid(wrapper: WrapperId, reason: InvalidReason) -> RegistrationError {
	RegistrationError::Invalid {
		wrapper: wrapper.name(),
		reason,
	}
}

/// One declaration's pass over the tables.
struct Binding<'a> {
	wrapper: &'a WrapperRef,
	force: bool,
	policy: DuplicatePolicy,
	collisions: &'a mut Vec<Collision>,
}

impl Binding<'_> {
	/// Binds the wrapper under `raw`. `held` are the keys of this table the wrapper's earlier
	/// declaration actually held.
	fn bind<N, Q>(
		&mut self,
		table: &mut TypeTable<N, WrapperRef>,
		raw: &Q,
		held: &[N::Key],
	) -> Result<(), RegistrationError>
	where
		N: NormalizeFrom<Q>,
		Q: ?Sized,
	{
		let Some(key) = N::normalize(raw) else {
			return Ok(());
		};
		let incoming = self.wrapper;
		let existing = table.get(raw).map(|bound| bound.id);

		match existing {
			None => {
				table.set(raw, Arc::clone(incoming), false);
				if held.contains(&key) {
					self.record(N::KIND, &key, incoming.name(), Resolution::Idempotent);
				} else {
					debug!(table = %N::KIND, %key, wrapper = incoming.name(), "bound");
				}
			}
			Some(existing) if existing == incoming.id => {
				table.set(raw, Arc::clone(incoming), true);
				self.record(N::KIND, &key, existing.name(), Resolution::Idempotent);
			}
			Some(existing) if self.force => {
				table.set(raw, Arc::clone(incoming), true);
				self.record(N::KIND, &key, existing.name(), Resolution::ReplacedExisting);
			}
			Some(existing) => match self.policy {
				DuplicatePolicy::FirstWins => {
					self.record(N::KIND, &key, existing.name(), Resolution::KeptExisting);
				}
				DuplicatePolicy::Strict => {
					return Err(RegistrationError::Conflict(Collision {
						table: N::KIND,
						key: key.to_string(),
						existing: existing.name(),
						incoming: incoming.name(),
						resolution: Resolution::KeptExisting,
					}));
				}
			},
		}
		Ok(())
	}

	fn record(
		&mut self,
		table: TableKind,
		key: &impl Display,
		existing: &'static str,
		resolution: Resolution,
	) {
		let collision = Collision {
			table,
			key: key.to_string(),
			existing,
			incoming: self.wrapper.name(),
			resolution,
		};
		warn!(
			table = %collision.table,
			key = %collision.key,
			existing,
			incoming = collision.incoming,
			%resolution,
			"registration collision"
		);
		self.collisions.push(collision);
	}
}
