use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::class::{Model, ModelClass, Null};

trait Erased: Any + Send + Sync + fmt::Debug {
	fn as_any(&self) -> &dyn Any;
}

impl<T: Model> Erased for T {
	fn as_any(&self) -> &dyn Any {
		self
	}
}

/// A type-erased domain value, or the null sentinel.
///
/// Cloning shares the underlying value.
#[derive(Clone)]
pub struct Object {
	class: ModelClass,
	value: Arc<dyn Erased>,
}

impl Object {
	pub fn new<T: Model>(value: T) -> Self {
		Self::from_arc(Arc::new(value))
	}

	pub fn from_arc<T: Model>(value: Arc<T>) -> Self {
		Self {
			class: ModelClass::of::<T>(),
			value,
		}
	}

	/// The null sentinel.
	pub fn null() -> Self {
		Self::new(Null)
	}

	#[inline]
	pub fn class(&self) -> ModelClass {
		self.class
	}

	#[inline]
	pub fn is_null(&self) -> bool {
		self.class.is_null()
	}

	/// Returns the wrapped value if it is a `T`.
	pub fn downcast_ref<T: Model>(&self) -> Option<&T> {
		self.value.as_any().downcast_ref::<T>()
	}

	/// Returns true if both handles share the same value.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.value, &other.value)
	}
}

impl Default for Object {
	fn default() -> Self {
		Self::null()
	}
}

impl<T: Model> From<T> for Object {
	fn from(value: T) -> Self {
		Self::new(value)
	}
}

impl fmt::Debug for Object {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&*self.value, f)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Debug, PartialEq)]
	struct Widget {
		name: &'static str,
	}

	impl Model for Widget {
		const CLASS_NAME: &'static str = "Widget";
		const PERSISTED: bool = true;
	}

	#[derive(Debug)]
	struct Gadget;

	impl Model for Gadget {
		const CLASS_NAME: &'static str = "Gadget";
	}

	#[test]
	fn test_downcast() {
		let obj = Object::new(Widget { name: "a" });
		assert_eq!(obj.class(), ModelClass::of::<Widget>());
		assert_eq!(obj.downcast_ref::<Widget>(), Some(&Widget { name: "a" }));
		assert!(obj.downcast_ref::<Gadget>().is_none());
		assert!(!obj.is_null());
	}

	#[test]
	fn test_null_sentinel() {
		let obj = Object::default();
		assert!(obj.is_null());
		assert_eq!(obj.class(), ModelClass::null());
		assert!(obj.class().model_type().is_none());
		assert_eq!(format!("{obj:?}"), "Null");
	}

	#[test]
	fn test_clone_shares_value() {
		let obj = Object::new(Gadget);
		let other = obj.clone();
		assert!(obj.ptr_eq(&other));
		assert!(!obj.ptr_eq(&Object::new(Gadget)));
	}

	#[test]
	fn test_class_metadata() {
		let class = ModelClass::of::<Widget>();
		assert_eq!(class.name(), "Widget");
		assert!(class.is_persisted());
		assert_eq!(class.model_type().unwrap(), "widget");
		assert!(!ModelClass::of::<Gadget>().is_persisted());
		assert_ne!(class, ModelClass::of::<Gadget>());
	}
}
