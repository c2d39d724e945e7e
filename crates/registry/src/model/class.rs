use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::core::symbol::ModelType;

/// A domain type that presentation wrappers can be registered for.
///
/// Usually implemented through [`crate::model!`], which also links the class into the
/// [`crate::ModelCatalog`] so textual class specifiers resolve to it.
pub trait Model: Any + Send + Sync + fmt::Debug {
	/// Display name of the class, e.g. `Widget`.
	const CLASS_NAME: &'static str;

	/// Explicit model type; the snake_case class name is used when absent.
	const MODEL_TYPE: Option<&'static str> = None;

	/// Whether values of this class are persisted database records.
	const PERSISTED: bool = false;

	/// Runtime identity of this class.
	fn class() -> ModelClass
	where
		Self: Sized,
	{
		ModelClass::of::<Self>()
	}
}

/// The null object wrapped when no real value is available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Null;

impl Model for Null {
	const CLASS_NAME: &'static str = "Null";
}

/// Runtime identity of a [`Model`] type.
///
/// Equality and hashing use the Rust type identity only, so two descriptors for the same type
/// are always interchangeable as registry keys.
#[derive(Clone, Copy)]
pub struct ModelClass {
	type_id: TypeId,
	name: &'static str,
	model_type: Option<&'static str>,
	persisted: bool,
}

impl ModelClass {
	/// Returns the descriptor for `T`.
	pub fn of<T: Model>() -> Self {
		Self {
			type_id: TypeId::of::<T>(),
			name: T::CLASS_NAME,
			model_type: T::MODEL_TYPE,
			persisted: T::PERSISTED,
		}
	}

	/// Returns the descriptor of the null sentinel.
	pub fn null() -> Self {
		Self::of::<Null>()
	}

	#[inline]
	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	#[inline]
	pub fn name(&self) -> &'static str {
		self.name
	}

	#[inline]
	pub fn is_persisted(&self) -> bool {
		self.persisted
	}

	#[inline]
	pub fn is_null(&self) -> bool {
		self.type_id == TypeId::of::<Null>()
	}

	/// Canonical model type of this class. The null sentinel has none.
	pub fn model_type(&self) -> Option<ModelType> {
		if self.is_null() {
			return None;
		}
		ModelType::new(self.model_type.unwrap_or(self.name))
	}
}

impl PartialEq for ModelClass {
	fn eq(&self, other: &Self) -> bool {
		self.type_id == other.type_id
	}
}

impl Eq for ModelClass {}

impl Hash for ModelClass {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.type_id.hash(state);
	}
}

impl fmt::Debug for ModelClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ModelClass({})", self.name)
	}
}

impl fmt::Display for ModelClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}
