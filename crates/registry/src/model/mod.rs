//! Domain-class identity.
//!
//! Wrappers are registered against classes, never against values. [`ModelClass`] is the
//! runtime identity used as a registry key, [`Object`] is the value handed to a wrapper.

mod catalog;
mod class;
mod object;

pub use catalog::{ModelCatalog, ModelReg};
pub use class::{Model, ModelClass, Null};
pub use object::Object;

/// Implements [`Model`] for a domain type and links it into the [`ModelCatalog`].
///
/// ```ignore
/// #[derive(Debug)]
/// pub struct Widget { pub name: String }
///
/// vitrine_registry::model!(Widget);
/// vitrine_registry::model!(Account, persisted: true);
/// vitrine_registry::model!(Manifest, model_type: "shipping_manifest", persisted: true);
/// ```
#[macro_export]
macro_rules! model {
	($name:ident $(, model_type: $model_type:literal)? $(, persisted: $persisted:expr)? $(,)?) => {
		impl $crate::Model for $name {
			const CLASS_NAME: &'static str = stringify!($name);
			$(const MODEL_TYPE: Option<&'static str> = Some($model_type);)?
			$(const PERSISTED: bool = $persisted;)?
		}

		$crate::inventory::submit!($crate::ModelReg(<$name as $crate::Model>::class));
	};
}
