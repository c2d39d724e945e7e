//! Keyed type tables and domain-class identity.
//!
//! This crate holds the domain-independent half of the wrapper registry: canonical symbols,
//! runtime class identity for domain values, and the generic [`TypeTable`] that every lookup
//! table is an instance of. The wrapper engine lives in `vitrine-decorator`.

pub mod core;
pub mod model;

pub use crate::core::{
	ByAliasClass, ByModelType, ByPersistedClass, ByPrimaryClass, Collision, DuplicatePolicy,
	Evicted, ModelType, Normalize, NormalizeFrom, Resolution, Symbol, SymbolError, TableKind,
	TypeRegistry, TypeTable,
};
pub use crate::model::{Model, ModelCatalog, ModelClass, ModelReg, Null, Object};

#[doc(hidden)]
pub use inventory;
