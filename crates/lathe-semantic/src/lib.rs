//! Semantic oracle for refactorings.
//!
//! [`SemanticModel`] is the query surface the refactoring engine consumes;
//! [`LocalSemanticModel`] implements it for a single document by binding
//! declarations, lexical scopes and a small table of well-known library
//! types. Anything outside that world resolves to [`TypeInfo::Error`].

mod constant;
mod infer;
mod local;
mod model;
mod scope;
mod symbol;
mod types;
mod well_known;

pub use constant::evaluate_constant;
pub use local::{LocalSemanticModel, LocalSemanticModelProvider};
pub use model::{SemanticModel, SemanticModelProvider};
pub use symbol::{Symbol, SymbolKind, SymbolModifiers};
pub use types::{PredefinedType, TypeInfo, TypeKind};
