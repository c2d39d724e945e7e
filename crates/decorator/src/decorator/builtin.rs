//! Built-in base wrappers.
//!
//! Every registry carries these two. They bind no keys; they are what resolution falls back
//! to when it is invoked without a more specific wrapper, and `BaseCollection` is the
//! collection counterpart of `BaseItem`.

use super::{CollectionBase, ItemBase, Named, build_collection, build_item};
use crate::wrapper::{Build, WrapperClass};

/// Wraps any value, including the null sentinel.
#[derive(Debug)]
pub struct BaseItem(ItemBase);

crate::__item_impls!(BaseItem);

/// Wraps any list of values.
#[derive(Debug)]
pub struct BaseCollection(CollectionBase);

crate::__collection_impls!(BaseCollection, BaseItem);

pub(crate) fn base_item_class() -> WrapperClass {
	WrapperClass {
		id: BaseItem::id(),
		model_type: None,
		primary: None,
		aliases: Vec::new(),
		persisted: Vec::new(),
		paired: None,
		composed: None,
		build: Build::Item(build_item::<BaseItem>),
	}
}

pub(crate) fn base_collection_class() -> WrapperClass {
	WrapperClass {
		id: BaseCollection::id(),
		model_type: None,
		primary: None,
		aliases: Vec::new(),
		persisted: Vec::new(),
		paired: Some(BaseItem::id()),
		composed: None,
		build: Build::Collection(build_collection::<BaseCollection>),
	}
}
