//! Generic keyed tables.
//!
//! # Invariants
//!
//! - An occupied key is never overwritten unless the caller forces it.
//!   - Enforced in: [`TypeTable::set`].
//!   - Tested by: `tests::test_set_never_overwrites_without_force`
//!   - Failure symptom: the second registration of a key silently wins.
//!
//! - A rejected insertion is observable to the caller.
//!   - Enforced in: [`TypeTable::set`] returns `None`.
//!   - Tested by: `tests::test_set_reports_rejection`
//!   - Failure symptom: naming conflicts vanish without a diagnostic.

use std::collections::hash_map::Entry;
use std::fmt;

use rustc_hash::FxHashMap;

use super::key::{
	ByAliasClass, ByModelType, ByPersistedClass, ByPrimaryClass, Normalize, NormalizeFrom,
	TableKind,
};

/// A key → value table whose keys pass through the normalization strategy `N`.
pub struct TypeTable<N: Normalize, V> {
	map: FxHashMap<N::Key, V>,
}

impl<N: Normalize, V> TypeTable<N, V> {
	pub fn new() -> Self {
		Self {
			map: FxHashMap::default(),
		}
	}

	/// Which table this is, for diagnostics.
	#[inline]
	pub fn kind(&self) -> TableKind {
		N::KIND
	}

	/// Looks up the value bound to the normalized form of `raw`.
	pub fn get<Q: ?Sized>(&self, raw: &Q) -> Option<&V>
	where
		N: NormalizeFrom<Q>,
	{
		let key = N::normalize(raw)?;
		self.map.get(&key)
	}

	pub fn contains<Q: ?Sized>(&self, raw: &Q) -> bool
	where
		N: NormalizeFrom<Q>,
	{
		self.get(raw).is_some()
	}

	/// Binds `value` under the normalized form of `raw`.
	///
	/// Returns the normalized key when the binding happened: the key was unbound, or `force`
	/// replaced the previous value. Returns `None` when `raw` does not normalize or the key is
	/// already bound and `force` is false; the table is unchanged in both cases.
	pub fn set<Q: ?Sized>(&mut self, raw: &Q, value: V, force: bool) -> Option<N::Key>
	where
		N: NormalizeFrom<Q>,
	{
		let key = N::normalize(raw)?;
		match self.map.entry(key) {
			Entry::Vacant(slot) => {
				let key = slot.key().clone();
				slot.insert(value);
				Some(key)
			}
			Entry::Occupied(mut slot) if force => {
				slot.insert(value);
				Some(slot.key().clone())
			}
			Entry::Occupied(_) => None,
		}
	}

	/// Drops every binding for which `keep` returns false.
	pub fn retain(&mut self, mut keep: impl FnMut(&N::Key, &V) -> bool) {
		self.map.retain(|key, value| keep(key, value));
	}

	/// Drops every binding whose value matches `remove` and returns the dropped keys.
	pub fn remove_where(&mut self, mut remove: impl FnMut(&V) -> bool) -> Vec<N::Key> {
		let mut removed = Vec::new();
		self.map.retain(|key, value| {
			if remove(value) {
				removed.push(key.clone());
				false
			} else {
				true
			}
		});
		removed
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.map.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.map.is_empty()
	}

	/// Iterates bindings in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (&N::Key, &V)> + '_ {
		self.map.iter()
	}
}

impl<N: Normalize, V> Default for TypeTable<N, V> {
	fn default() -> Self {
		Self::new()
	}
}

impl<N: Normalize, V: Clone> Clone for TypeTable<N, V> {
	fn clone(&self) -> Self {
		Self {
			map: self.map.clone(),
		}
	}
}

impl<N: Normalize, V: fmt::Debug> fmt::Debug for TypeTable<N, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TypeTable")
			.field("kind", &N::KIND)
			.field("len", &self.map.len())
			.finish()
	}
}

/// The four lookup tables a wrapper registry consults.
pub struct TypeRegistry<V> {
	pub by_model_type: TypeTable<ByModelType, V>,
	pub by_primary_class: TypeTable<ByPrimaryClass, V>,
	pub by_persisted_class: TypeTable<ByPersistedClass, V>,
	pub by_alias_class: TypeTable<ByAliasClass, V>,
}

impl<V> TypeRegistry<V> {
	pub fn new() -> Self {
		Self {
			by_model_type: TypeTable::new(),
			by_primary_class: TypeTable::new(),
			by_persisted_class: TypeTable::new(),
			by_alias_class: TypeTable::new(),
		}
	}

	/// Drops every binding, in every table, whose value matches `evict`.
	pub fn evict(&mut self, mut evict: impl FnMut(&V) -> bool) -> Evicted {
		Evicted {
			by_model_type: self.by_model_type.remove_where(&mut evict),
			by_primary_class: self.by_primary_class.remove_where(&mut evict),
			by_persisted_class: self.by_persisted_class.remove_where(&mut evict),
			by_alias_class: self.by_alias_class.remove_where(&mut evict),
		}
	}
}

/// Keys dropped by [`TypeRegistry::evict`], per table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evicted {
	pub by_model_type: Vec<<ByModelType as Normalize>::Key>,
	pub by_primary_class: Vec<<ByPrimaryClass as Normalize>::Key>,
	pub by_persisted_class: Vec<<ByPersistedClass as Normalize>::Key>,
	pub by_alias_class: Vec<<ByAliasClass as Normalize>::Key>,
}

impl Evicted {
	pub fn is_empty(&self) -> bool {
		self.by_model_type.is_empty()
			&& self.by_primary_class.is_empty()
			&& self.by_persisted_class.is_empty()
			&& self.by_alias_class.is_empty()
	}
}

impl<V> Default for TypeRegistry<V> {
	fn default() -> Self {
		Self::new()
	}
}

impl<V: Clone> Clone for TypeRegistry<V> {
	fn clone(&self) -> Self {
		Self {
			by_model_type: self.by_model_type.clone(),
			by_primary_class: self.by_primary_class.clone(),
			by_persisted_class: self.by_persisted_class.clone(),
			by_alias_class: self.by_alias_class.clone(),
		}
	}
}

impl<V: fmt::Debug> fmt::Debug for TypeRegistry<V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TypeRegistry")
			.field("by_model_type", &self.by_model_type)
			.field("by_primary_class", &self.by_primary_class)
			.field("by_persisted_class", &self.by_persisted_class)
			.field("by_alias_class", &self.by_alias_class)
			.finish()
	}
}
