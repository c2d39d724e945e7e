//! Process-global registry assembled from link-time submissions.
//!
//! `decorator!`, `collection_decorator!`, `shared!` and `model!` submit their records through
//! `inventory`. The first call to [`get_db`] gathers them and freezes the result. Call [`init`]
//! before that to use a non-default [`RegistryConfig`].

use std::sync::OnceLock;

use vitrine_registry::{ByModelType, ModelCatalog, NormalizeFrom, Object};

use crate::config::RegistryConfig;
use crate::context::Options;
use crate::decorator::Decorator;
use crate::error::{DecorateError, RegistrationError};
use crate::registration::{
	CollectionDeclaration, Installer, InstallerReg, ItemDeclaration, RegistryBuilder, WrapperReg,
};
use crate::resolve::DecoratorRegistry;
use crate::wrapper::WrapperRef;

static DB: OnceLock<DecoratorRegistry> = OnceLock::new();

/// The global registry, built with the default config on first use.
///
/// # Panics
///
/// Panics when the submitted declarations cannot be registered; load-time errors abort
/// startup.
pub fn get_db() -> &'static DecoratorRegistry {
	DB.get_or_init(|| match collect(RegistryConfig::default()) {
		Ok(registry) => registry,
		Err(e) => {
			tracing::error!("Wrapper registration failed: {}", e);
			panic!("wrapper registration failed: {e}");
		}
	})
}

/// Builds the global registry with `config`.
///
/// Has no effect once the registry exists; the registry already in place is returned.
pub fn init(config: RegistryConfig) -> Result<&'static DecoratorRegistry, RegistrationError> {
	if let Some(db) = DB.get() {
		tracing::warn!("registry already initialized, ignoring config");
		return Ok(db);
	}
	let registry = collect(config)?;
	Ok(DB.get_or_init(|| registry))
}

/// Builds a registry from every submitted model, installer and wrapper declaration.
///
/// Installers go first so collections compose them. Items are declared before collections;
/// each group in wrapper-name order.
pub fn collect(config: RegistryConfig) -> Result<DecoratorRegistry, RegistrationError> {
	let catalog = ModelCatalog::collect();
	let mut builder = RegistryBuilder::new(config).with_catalog(&catalog);

	let mut installers: Vec<Installer> = inventory::iter::<InstallerReg>
		.into_iter()
		.map(|reg| (reg.0)())
		.collect();
	installers.sort_by_key(|installer| installer.item().name());
	for installer in installers {
		builder.install(installer);
	}

	let mut items: Vec<ItemDeclaration> = Vec::new();
	let mut collections: Vec<CollectionDeclaration> = Vec::new();
	for reg in inventory::iter::<WrapperReg> {
		match reg {
			WrapperReg::Item(declare) => items.push(declare()),
			WrapperReg::Collection(declare) => collections.push(declare()),
		}
	}
	items.sort_by_key(|decl| decl.id().name());
	collections.sort_by_key(|decl| decl.id().name());

	for decl in items {
		builder.declare_wrapper(decl)?;
	}
	for decl in collections {
		builder.declare_collection_of(decl)?;
	}

	tracing::debug!(
		models = catalog.len(),
		wrappers = builder.len(),
		collisions = builder.collisions().len(),
		"global registry collected"
	);
	Ok(builder.build())
}

/// Decorates `object` through the global registry, invoked on the base item wrapper.
pub fn decorate(
	object: impl Into<Object>,
	options: Options,
) -> Result<Box<dyn Decorator>, DecorateError> {
	get_db().decorate(object, options)
}

pub fn decorate_collection(
	objects: Vec<Object>,
	options: Options,
) -> Result<Box<dyn Decorator>, DecorateError> {
	get_db().decorate_collection(objects, options)
}

pub fn lookup_wrapper_for_model_type<Q>(raw: &Q) -> Option<&'static WrapperRef>
where
	Q: ?Sized,
	ByModelType: NormalizeFrom<Q>,
{
	get_db().lookup_wrapper_for_model_type(raw)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fixtures::{WidgetListView, WidgetView};
	use crate::registration::ClassSpec;

	#[test]
	fn test_collect_gathers_submitted_models() {
		let registry = collect(RegistryConfig::default()).unwrap();
		let mut builder = registry.to_builder();

		let wrapper = builder
			.declare_wrapper(ItemDeclaration::of::<WidgetView>(ClassSpec::named("Widget")))
			.unwrap();

		assert_eq!(wrapper.primary_class().map(|c| c.name()), Some("Widget"));
	}

	#[test]
	fn test_collect_gathers_submitted_installers() {
		let registry = collect(RegistryConfig::default()).unwrap();
		let mut builder = registry.to_builder();
		builder.declare::<WidgetView>().unwrap();

		let list = builder.declare_collection::<WidgetListView>().unwrap();

		let installer = list.composed().unwrap();
		assert_eq!(installer.instance_behavior(), "WidgetBehavior");
		assert_eq!(installer.class_behavior(), Some("WidgetClassBehavior"));
	}
}
