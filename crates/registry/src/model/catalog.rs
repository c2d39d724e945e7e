//! Name → class lookup for textual class specifiers.

use rustc_hash::FxHashMap;

use super::class::ModelClass;
use crate::core::symbol::Symbol;

/// Link-time registration of a domain class.
///
/// Submitted by [`crate::model!`] and gathered by [`ModelCatalog::collect`].
pub struct ModelReg(pub fn() -> ModelClass);

inventory::collect!(ModelReg);

/// Known domain classes, addressable by class name or canonical model type.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
	by_name: FxHashMap<Box<str>, ModelClass>,
	by_symbol: FxHashMap<Symbol, ModelClass>,
}

impl ModelCatalog {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a catalog from every class linked into the binary.
	pub fn collect() -> Self {
		let mut catalog = Self::new();
		for reg in inventory::iter::<ModelReg> {
			catalog.insert((reg.0)());
		}
		catalog
	}

	/// Adds `class`, returning a different class previously known under the same name.
	pub fn insert(&mut self, class: ModelClass) -> Option<ModelClass> {
		if let Some(sym) = Symbol::normalize(class.name()) {
			self.by_symbol.entry(sym).or_insert(class);
		}
		if let Some(ty) = class.model_type() {
			self.by_symbol.entry(ty.symbol().clone()).or_insert(class);
		}
		self.by_name
			.insert(Box::from(class.name()), class)
			.filter(|prev| *prev != class)
	}

	/// Finds a class by exact class name, falling back to its normalized form.
	pub fn get(&self, name: &str) -> Option<ModelClass> {
		if let Some(class) = self.by_name.get(name) {
			return Some(*class);
		}
		let sym = Symbol::normalize(name)?;
		self.by_symbol.get(&sym).copied()
	}

	/// Suggests the closest known class name for an unresolved specifier.
	pub fn suggest(&self, name: &str) -> Option<&'static str> {
		self.by_name
			.values()
			.map(|class| class.name())
			.min_by_key(|known| strsim::levenshtein(name, known))
			.filter(|known| strsim::levenshtein(name, known) <= 3)
	}

	pub fn len(&self) -> usize {
		self.by_name.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_name.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = ModelClass> + '_ {
		self.by_name.values().copied()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::Model;

	#[derive(Debug)]
	struct LineItem;

	impl Model for LineItem {
		const CLASS_NAME: &'static str = "LineItem";
	}

	#[derive(Debug)]
	struct Manifest;

	impl Model for Manifest {
		const CLASS_NAME: &'static str = "Manifest";
		const MODEL_TYPE: Option<&'static str> = Some("shipping_manifest");
	}

	fn catalog() -> ModelCatalog {
		let mut catalog = ModelCatalog::new();
		catalog.insert(ModelClass::of::<LineItem>());
		catalog.insert(ModelClass::of::<Manifest>());
		catalog
	}

	#[test]
	fn test_get_by_exact_and_normalized_name() {
		let catalog = catalog();
		assert_eq!(catalog.get("LineItem"), Some(ModelClass::of::<LineItem>()));
		assert_eq!(catalog.get("line_item"), Some(ModelClass::of::<LineItem>()));
		assert_eq!(catalog.get("shipping_manifest"), Some(ModelClass::of::<Manifest>()));
		assert_eq!(catalog.get("Widget"), None);
		assert_eq!(catalog.get(""), None);
	}

	#[test]
	fn test_suggest_close_names() {
		let catalog = catalog();
		assert_eq!(catalog.suggest("LineItme"), Some("LineItem"));
		assert_eq!(catalog.suggest("Completely"), None);
	}

	#[test]
	fn test_insert_same_class_twice() {
		let mut catalog = catalog();
		assert!(catalog.insert(ModelClass::of::<LineItem>()).is_none());
		assert_eq!(catalog.len(), 2);
	}
}
