use pretty_assertions::assert_eq;
use vitrine_registry::{DuplicatePolicy, Model, ModelClass, Null, Resolution, TableKind};

use super::*;
use crate::DeclaredCollection;
use crate::DeclaredItem;
use crate::config::RegistryConfig;
use crate::fixtures::*;
use crate::wrapper::Flavor;

fn table_lens(registry: &crate::DecoratorRegistry) -> [usize; 4] {
	let tables = registry.tables();
	[
		tables.by_model_type.len(),
		tables.by_primary_class.len(),
		tables.by_persisted_class.len(),
		tables.by_alias_class.len(),
	]
}

#[test]
fn test_declare_binds_every_table() {
	let registry = registry();
	let account = registry.wrapper_of::<AccountView>().unwrap();

	assert_eq!(account.model_type().unwrap(), &"account");
	assert_eq!(account.primary_class(), Some(Account::class()));
	assert_eq!(account.alias_classes(), &[LegacyAccount::class()]);
	assert_eq!(
		account.persisted_classes(),
		&[Account::class(), LegacyAccount::class()]
	);

	let found = |w: Option<&crate::WrapperRef>| w.map(|w| w.name());
	assert_eq!(found(registry.lookup_wrapper_for_model_type("account")), Some("AccountView"));
	assert_eq!(found(registry.lookup_primary(Account::class())), Some("AccountView"));
	assert_eq!(found(registry.lookup_persisted(Account::class())), Some("AccountView"));
	assert_eq!(found(registry.lookup_persisted(LegacyAccount::class())), Some("AccountView"));
	assert_eq!(found(registry.lookup_alias(LegacyAccount::class())), Some("AccountView"));
	assert_eq!(found(registry.lookup_primary(LegacyAccount::class())), None);
}

#[test]
fn test_non_persisted_classes_stay_out_of_persisted_table() {
	let registry = registry();
	assert!(registry.lookup_persisted(Widget::class()).is_none());
	assert!(registry.lookup_persisted(Gadget::class()).is_none());
	assert_eq!(registry.tables().by_persisted_class.len(), 3);
}

#[test]
fn test_model_type_defaults_to_class() {
	let registry = registry();
	let gadget = registry.wrapper_of::<GadgetView>().unwrap();
	assert_eq!(gadget.model_type().unwrap(), &"gadget");

	let invoice = registry.wrapper_of::<InvoiceView>().unwrap();
	assert_eq!(invoice.model_type().unwrap(), &"billing/invoice");
	assert_eq!(
		registry
			.lookup_wrapper_for_model_type("Billing::Invoice")
			.map(|w| w.name()),
		Some("InvoiceView")
	);
}

#[test]
fn test_conflict_keeps_first_and_warns() {
	let mut builder = builder();
	let (result, warnings) = count_warnings(|| builder.declare::<RivalWidgetView>());

	assert!(result.is_ok());
	assert_eq!(warnings, 2);
	let resolutions: Vec<_> = builder
		.collisions()
		.iter()
		.map(|c| (c.table, c.existing, c.incoming, c.resolution))
		.collect();
	assert_eq!(
		resolutions,
		vec![
			(TableKind::ModelType, "WidgetView", "RivalWidgetView", Resolution::KeptExisting),
			(TableKind::PrimaryClass, "WidgetView", "RivalWidgetView", Resolution::KeptExisting),
		]
	);

	let registry = builder.build();
	assert_eq!(registry.lookup_primary(Widget::class()).unwrap().name(), "WidgetView");
	assert_eq!(registry.lookup_wrapper_for_model_type("widget").unwrap().name(), "WidgetView");
}

#[test]
fn test_strict_policy_rejects_conflict() {
	let config = RegistryConfig::default().with_policy(DuplicatePolicy::Strict);
	let mut builder = RegistryBuilder::new(config);
	builder.declare::<WidgetView>().unwrap();

	let err = builder.declare::<RivalWidgetView>().unwrap_err();
	let RegistrationError::Conflict(collision) = err else {
		panic!("expected a conflict");
	};
	assert_eq!(collision.table, TableKind::ModelType);
	assert_eq!(collision.key, "widget");
	assert_eq!(collision.existing, "WidgetView");
	assert_eq!(collision.incoming, "RivalWidgetView");
}

#[test]
fn test_strict_policy_allows_redeclaration() {
	let config = RegistryConfig::default().with_policy(DuplicatePolicy::Strict);
	let mut builder = RegistryBuilder::new(config);
	builder.declare::<WidgetView>().unwrap();
	builder.declare::<WidgetView>().unwrap();

	assert!(
		builder
			.collisions()
			.iter()
			.all(|c| c.resolution == Resolution::Idempotent)
	);
}

#[test]
fn test_force_replaces_other_wrapper() {
	let mut builder = builder();
	let (result, warnings) = count_warnings(|| {
		builder.declare_wrapper(RivalWidgetView::declaration().force(true))
	});

	assert!(result.is_ok());
	assert_eq!(warnings, 2);
	assert!(
		builder
			.collisions()
			.iter()
			.all(|c| c.resolution == Resolution::ReplacedExisting)
	);
	let registry = builder.build();
	assert_eq!(registry.lookup_primary(Widget::class()).unwrap().name(), "RivalWidgetView");
	assert_eq!(registry.lookup_wrapper_for_model_type("widget").unwrap().name(), "RivalWidgetView");
}

#[test]
fn test_redeclaration_is_idempotent() {
	let mut builder = builder();
	let before = table_lens(&builder.clone().build());

	let (result, warnings) = count_warnings(|| builder.declare::<AccountView>());
	assert!(result.is_ok());

	// model type, primary, two persisted, one alias
	assert_eq!(warnings, 5);
	assert_eq!(builder.collisions().len(), 5);
	assert!(
		builder
			.collisions()
			.iter()
			.all(|c| c.resolution == Resolution::Idempotent && c.existing == "AccountView")
	);
	let registry = builder.build();
	assert_eq!(table_lens(&registry), before);
	assert_eq!(registry.wrappers().filter(|w| w.name() == "AccountView").count(), 1);
}

#[test]
fn test_redeclaration_drops_stale_bindings() {
	let mut builder = builder();
	builder
		.declare_wrapper(ItemDeclaration::of::<AccountView>(ClassSpec::of::<Account>()))
		.unwrap();
	let registry = builder.build();

	assert!(registry.lookup_alias(LegacyAccount::class()).is_none());
	assert!(registry.lookup_persisted(LegacyAccount::class()).is_none());
	assert_eq!(registry.lookup_persisted(Account::class()).unwrap().name(), "AccountView");
}

#[test]
fn test_redeclaring_a_losing_wrapper_binds_fresh() {
	let mut builder = RegistryBuilder::new(RegistryConfig::default());
	builder.declare::<WidgetView>().unwrap();
	builder.declare::<RivalWidgetView>().unwrap();
	assert_eq!(builder.collisions().len(), 2);

	// WidgetView moves to another class, freeing the keys Rival lost
	builder
		.declare_wrapper(ItemDeclaration::of::<WidgetView>(ClassSpec::of::<SpecialWidget>()))
		.unwrap();
	assert_eq!(builder.collisions().len(), 2);

	let (result, warnings) = count_warnings(|| builder.declare::<RivalWidgetView>());
	assert!(result.is_ok());
	assert_eq!(warnings, 0);
	assert_eq!(builder.collisions().len(), 2);

	let registry = builder.build();
	assert_eq!(registry.lookup_primary(Widget::class()).unwrap().name(), "RivalWidgetView");
	assert_eq!(registry.lookup_wrapper_for_model_type("widget").unwrap().name(), "RivalWidgetView");
	assert_eq!(registry.lookup_primary(SpecialWidget::class()).unwrap().name(), "WidgetView");
}

#[test]
fn test_rebuilt_registry_starts_without_collisions() {
	let mut builder = builder();
	builder.declare::<RivalWidgetView>().unwrap();
	let registry = builder.build();
	assert_eq!(registry.collisions().len(), 2);

	let rebuilt = registry.to_builder().build();

	assert!(rebuilt.collisions().is_empty());
	assert!(rebuilt.wrapper_of::<RivalWidgetView>().is_some());
}

#[test]
fn test_redeclared_item_updates_collection() {
	let mut builder = builder();
	let decl = ItemDeclaration::of::<WidgetView>(ClassSpec::of::<Widget>()).model_type("Gizmo");
	builder.declare_wrapper(decl).unwrap();
	let registry = builder.build();

	assert!(registry.lookup_wrapper_for_model_type("widget").is_none());
	assert_eq!(registry.lookup_wrapper_for_model_type("gizmo").unwrap().name(), "WidgetView");
	let collection = registry.wrapper_of::<WidgetListView>().unwrap();
	assert_eq!(collection.model_type().unwrap(), &"gizmo");
}

#[test]
fn test_named_class_spec_resolves_through_catalog() {
	let mut builder = RegistryBuilder::default();
	builder.register_model(ModelClass::of::<Gadget>());

	let err = builder
		.declare_wrapper(ItemDeclaration::of::<GadgetView>("Gadget").alias("widget"))
		.unwrap_err();
	// `Widget` is not in this catalog yet.
	assert!(matches!(
		err,
		RegistrationError::Invalid {
			wrapper: "GadgetView",
			reason: InvalidReason::UnknownClass { .. },
		}
	));

	builder.register_model(Widget::class());
	let wrapper = builder
		.declare_wrapper(ItemDeclaration::of::<GadgetView>("Gadget").alias("widget"))
		.unwrap();
	assert_eq!(wrapper.primary_class(), Some(Gadget::class()));
	assert_eq!(wrapper.alias_classes(), &[Widget::class()]);
}

#[test]
fn test_unknown_class_suggests_closest() {
	let mut builder = RegistryBuilder::default();
	builder.register_model(Gadget::class());

	let err = builder
		.declare_wrapper(ItemDeclaration::of::<GadgetView>("Gadgit"))
		.unwrap_err();
	assert_eq!(
		err,
		RegistrationError::Invalid {
			wrapper: "GadgetView",
			reason: InvalidReason::UnknownClass {
				name: "Gadgit".to_string(),
				suggestion: Some("Gadget"),
			},
		}
	);
	assert!(err.to_string().contains("did you mean \"Gadget\"?"));
}

#[test]
fn test_null_class_rejected() {
	let mut builder = RegistryBuilder::default();
	let err = builder
		.declare_wrapper(ItemDeclaration::of::<GadgetView>(ClassSpec::of::<Null>()))
		.unwrap_err();
	assert!(matches!(
		err,
		RegistrationError::Invalid {
			reason: InvalidReason::NullClass,
			..
		}
	));
}

#[test]
fn test_empty_model_type_rejected() {
	let mut builder = RegistryBuilder::default();
	let err = builder
		.declare_wrapper(ItemDeclaration::of::<GadgetView>(Gadget::class()).model_type(" :: "))
		.unwrap_err();
	assert!(matches!(
		err,
		RegistrationError::Invalid {
			reason: InvalidReason::EmptyModelType { .. },
			..
		}
	));
}

#[test]
fn test_collection_of_unregistered_item() {
	let mut builder = RegistryBuilder::default();
	let err = builder.declare_collection::<WidgetListView>().unwrap_err();
	assert_eq!(
		err,
		RegistrationError::Invalid {
			wrapper: "WidgetListView",
			reason: InvalidReason::UnregisteredItem { item: "WidgetView" },
		}
	);
}

#[test]
fn test_wrapper_cannot_change_flavor() {
	let mut builder = builder();
	let decl = CollectionDeclaration {
		id: WidgetView::id(),
		..WidgetListView::declaration()
	};
	let err = builder.declare_collection_of(decl).unwrap_err();
	assert_eq!(
		err,
		RegistrationError::Invalid {
			wrapper: "WidgetView",
			reason: InvalidReason::AlreadyDeclared { flavor: Flavor::Item },
		}
	);
}

#[test]
fn test_collection_copies_model_type() {
	let registry = registry();
	let collection = registry.wrapper_of::<WidgetListView>().unwrap();

	assert_eq!(collection.flavor(), Flavor::Collection);
	assert_eq!(collection.model_type().unwrap(), &"widget");
	assert_eq!(collection.paired(), Some(WidgetView::id()));
	assert!(collection.primary_class().is_none());
	assert_eq!(
		registry.collection_for(WidgetView::id()).map(|w| w.name()),
		Some("WidgetListView")
	);
	// collections never bind keys of their own
	assert!(
		registry
			.tables()
			.by_model_type
			.iter()
			.all(|(_, w)| w.flavor() == Flavor::Item)
	);
}

#[test]
fn test_collection_composes_installer() {
	let registry = registry();
	let composed = registry
		.wrapper_of::<WidgetListView>()
		.and_then(|w| w.composed().copied())
		.unwrap();

	assert_eq!(composed.item(), WidgetView::id());
	assert_eq!(composed.instance_behavior(), "WidgetBehavior");
	assert_eq!(composed.class_behavior(), Some("WidgetClassBehavior"));
	assert!(
		registry
			.wrapper_of::<AccountListView>()
			.unwrap()
			.composed()
			.is_none()
	);
}

#[test]
fn test_install_after_collection_patches_it() {
	let mut builder = RegistryBuilder::default();
	builder.declare::<WidgetView>().unwrap();
	builder.declare_collection::<WidgetListView>().unwrap();
	assert!(builder.clone().build().wrapper_of::<WidgetListView>().unwrap().composed().is_none());

	builder.install_shared::<WidgetView>();
	let registry = builder.build();
	let composed = registry.wrapper_of::<WidgetListView>().unwrap().composed().copied();
	assert_eq!(composed, Some(WidgetView::installer()));
}

#[test]
fn test_first_collection_wins() {
	crate::collection_type!(SecondWidgetListView of WidgetView);

	let mut builder = builder();
	let (result, warnings) = count_warnings(|| builder.declare_collection::<SecondWidgetListView>());
	assert!(result.is_ok());
	assert_eq!(warnings, 1);

	let registry = builder.build();
	assert_eq!(
		registry.collection_for(WidgetView::id()).map(|w| w.name()),
		Some("WidgetListView")
	);
	assert!(registry.wrapper_of::<SecondWidgetListView>().is_some());
}

#[test]
fn test_base_wrappers_are_preregistered() {
	let builder = RegistryBuilder::default();
	assert_eq!(builder.len(), 2);

	let registry = builder.build();
	let names: Vec<_> = registry.wrappers().map(|w| w.name()).collect();
	assert_eq!(names, vec!["BaseItem", "BaseCollection"]);
	assert_eq!(
		registry.collection_for(registry.base_item().id()).map(|w| w.name()),
		Some("BaseCollection")
	);
	assert_eq!(table_lens(&registry), [0, 0, 0, 0]);
}
