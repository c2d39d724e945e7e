//! Shared registry infrastructure.

pub mod collision;
pub mod key;
pub mod symbol;
pub mod table;

pub use collision::{Collision, DuplicatePolicy, Resolution};
pub use key::{
	ByAliasClass, ByModelType, ByPersistedClass, ByPrimaryClass, Normalize, NormalizeFrom,
	TableKind,
};
pub use symbol::{ModelType, Symbol, SymbolError};
pub use table::{Evicted, TypeRegistry, TypeTable};
