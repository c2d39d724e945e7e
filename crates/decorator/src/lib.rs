//! Presentation-wrapper registry.
//!
//! Wrapper types declare which domain classes they present; the registry resolves any value
//! to the right wrapper and builds it with a per-instance [`Context`].
//!
//! ```ignore
//! use vitrine_decorator::{Options, collection_decorator, decorator, shared};
//!
//! #[derive(Debug)]
//! pub struct Widget;
//! vitrine_registry::model!(Widget);
//!
//! decorator!(WidgetView, { wraps: Widget, model_type: "widget" });
//! collection_decorator!(WidgetListView of WidgetView);
//!
//! let view = vitrine_decorator::decorate(Widget, Options::new())?;
//! assert_eq!(view.action(), "show");
//! ```

pub mod config;
pub mod context;
pub mod db;
pub mod decorator;
pub mod error;
pub mod live;
mod macros;
pub mod registration;
pub mod resolve;
pub mod wrapper;

#[cfg(test)]
pub(crate) mod fixtures;

pub use config::{ActionDefaults, RegistryConfig};
pub use context::{Context, Options};
pub use db::{decorate, decorate_collection, get_db, lookup_wrapper_for_model_type};
pub use decorator::{
	BaseCollection, BaseItem, Collection, CollectionBase, DeclaredCollection, DeclaredItem,
	Decorator, Family, Item, ItemBase, Named, Subject,
};
pub use error::{
	ConfigError, DecorateError, Error, InvalidReason, RegistrationError, Result,
};
pub use live::LiveRegistry;
pub use registration::{
	ClassSpec, CollectionDeclaration, Install, Installer, InstallerReg, ItemDeclaration,
	RegistryBuilder, WrapperReg,
};
pub use resolve::{DecoratorRegistry, Resolver};
pub use wrapper::{Flavor, WrapperClass, WrapperId, WrapperRef};

#[doc(hidden)]
pub use inventory;
pub use vitrine_registry;
