use std::sync::Arc;

use vitrine_registry::Object;

use crate::context::Context;
use crate::wrapper::{WrapperClass, WrapperRef};

/// State of an item wrapper instance.
///
/// Only the factory can create one, so a wrapper type (a newtype over this) cannot be
/// constructed anywhere but through resolution.
#[derive(Debug)]
pub struct ItemBase {
	object: Object,
	context: Context,
	wrapper: WrapperRef,
}

impl ItemBase {
	pub(crate) fn new(object: Object, context: Context, wrapper: WrapperRef) -> Self {
		Self {
			object,
			context,
			wrapper,
		}
	}

	#[inline]
	pub fn object(&self) -> &Object {
		&self.object
	}

	#[inline]
	pub fn context(&self) -> &Context {
		&self.context
	}

	#[inline]
	pub fn wrapper(&self) -> &WrapperClass {
		&self.wrapper
	}

	pub fn wrapper_ref(&self) -> WrapperRef {
		Arc::clone(&self.wrapper)
	}
}

/// State of a collection wrapper instance. Sealed like [`ItemBase`].
#[derive(Debug)]
pub struct CollectionBase {
	objects: Vec<Object>,
	context: Context,
	wrapper: WrapperRef,
}

impl CollectionBase {
	pub(crate) fn new(objects: Vec<Object>, context: Context, wrapper: WrapperRef) -> Self {
		Self {
			objects,
			context,
			wrapper,
		}
	}

	#[inline]
	pub fn objects(&self) -> &[Object] {
		&self.objects
	}

	#[inline]
	pub fn context(&self) -> &Context {
		&self.context
	}

	#[inline]
	pub fn wrapper(&self) -> &WrapperClass {
		&self.wrapper
	}

	pub fn wrapper_ref(&self) -> WrapperRef {
		Arc::clone(&self.wrapper)
	}
}
