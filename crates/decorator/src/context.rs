//! Per-instance metadata threaded through every wrapper.
//!
//! Callers describe what they want with [`Options`]; the factory turns them into a
//! [`Context`] exactly once per wrapper instance. A context is read-only afterwards. Nested
//! wrappers start from [`Context::derive`], which carries every key across except the action,
//! so the nested wrapper falls back to the default action of its own flavor.

use std::collections::BTreeMap;

use serde_json::Value;
use vitrine_registry::{ModelType, Object, Symbol};

use crate::config::ActionDefaults;
use crate::wrapper::Flavor;

const ACTION_KEY: &str = "action";
const CONTROLLER_KEY: &str = "controller";

fn controller_symbol(raw: &str) -> Option<Symbol> {
	Symbol::normalize(raw).map(|sym| sym.without_suffix("controller"))
}

/// Caller-supplied options for one decoration call.
#[derive(Debug, Clone, Default)]
pub struct Options {
	action: Option<Symbol>,
	controller: Option<Symbol>,
	actor: Option<Object>,
	force: bool,
	model_type: Option<ModelType>,
	extra: BTreeMap<String, Value>,
}

impl Options {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the action. Input that normalizes to nothing leaves the action unset.
	pub fn with_action(mut self, action: &str) -> Self {
		self.action = Symbol::normalize(action);
		self
	}

	pub fn with_controller(mut self, controller: &str) -> Self {
		self.controller = controller_symbol(controller);
		self
	}

	/// Sets the acting user (or any other principal).
	pub fn with_actor(mut self, actor: impl Into<Object>) -> Self {
		self.actor = Some(actor.into());
		self
	}

	/// Falls back to the invoking wrapper instead of failing on unregistered classes.
	pub fn with_force(mut self, force: bool) -> Self {
		self.force = force;
		self
	}

	/// Resolves by model type instead of by the value's class.
	pub fn with_model_type(mut self, model_type: &str) -> Self {
		self.model_type = ModelType::new(model_type);
		self
	}

	/// Sets an arbitrary key. `action` and `controller` go through their dedicated setters;
	/// a non-string value for either leaves it unset.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		let key = key.into();
		let value = value.into();
		match key.as_str() {
			ACTION_KEY => self.action = value.as_str().and_then(Symbol::normalize),
			CONTROLLER_KEY => self.controller = value.as_str().and_then(controller_symbol),
			_ => {
				self.extra.insert(key, value);
			}
		}
		self
	}

	pub fn action(&self) -> Option<&Symbol> {
		self.action.as_ref()
	}

	pub fn controller(&self) -> Option<&Symbol> {
		self.controller.as_ref()
	}

	pub fn actor(&self) -> Option<&Object> {
		self.actor.as_ref()
	}

	pub fn force(&self) -> bool {
		self.force
	}

	pub fn model_type(&self) -> Option<&ModelType> {
		self.model_type.as_ref()
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.extra.get(key)
	}
}

/// Metadata bag owned by one wrapper instance.
#[derive(Debug, Clone)]
pub struct Context {
	action: Symbol,
	controller: Option<Symbol>,
	actor: Option<Object>,
	options: BTreeMap<String, Value>,
}

impl Context {
	/// Builds the context for a wrapper of `flavor`.
	///
	/// Resolution-only options (`force`, `model_type`) are consumed by the factory and are not
	/// part of the context.
	pub(crate) fn build(flavor: Flavor, options: Options, defaults: &ActionDefaults) -> Self {
		let action = options
			.action
			.unwrap_or_else(|| defaults.for_flavor(flavor).clone());
		Self {
			action,
			controller: options.controller,
			actor: options.actor,
			options: options.extra,
		}
	}

	pub fn action(&self) -> &Symbol {
		&self.action
	}

	pub fn controller(&self) -> Option<&Symbol> {
		self.controller.as_ref()
	}

	pub fn actor(&self) -> Option<&Object> {
		self.actor.as_ref()
	}

	/// Looks up an arbitrary caller-supplied key.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.options.get(key)
	}

	pub fn options(&self) -> &BTreeMap<String, Value> {
		&self.options
	}

	/// Options for a nested wrapper: everything but the action.
	pub fn derive(&self) -> Options {
		Options {
			action: None,
			controller: self.controller.clone(),
			actor: self.actor.clone(),
			force: false,
			model_type: None,
			extra: self.options.clone(),
		}
	}
}
