//! Programs, functions and witness declarations.

use super::stmt::Stmt;
use super::types::TypeInfo;
use compact_str::CompactString;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Unique id of a function within one program, resolved by the front-end.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FuncId(pub u32);

/// Whether a function is externally visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    /// Exported circuit entry point: parameters are public inputs and the
    /// return value is observable by the verifier, so returning an
    /// undeclassified witness-derived value is a violation.
    Circuit,
    /// Internal helper: parameters are taint-polymorphic and the return
    /// label is described by the function's computed signature.
    Helper,
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name.
    pub name: CompactString,
    /// Declared type, where resolved.
    pub ty: Option<TypeInfo>,
}

/// A function or circuit body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    /// Resolved id.
    pub id: FuncId,
    /// Source name.
    pub name: CompactString,
    /// Visibility kind.
    pub kind: FunctionKind,
    /// Parameters in declaration order.
    pub params: Vec<Param>,
    /// Body statements.
    pub body: Vec<Stmt>,
}

/// A declared private witness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WitnessDecl {
    /// Witness name.
    pub name: CompactString,
    /// Declared type; consulted by the hash-entropy advisory.
    pub ty: TypeInfo,
}

/// A whole compilation unit as handed over by the front-end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Declared witnesses.
    pub witnesses: Vec<WitnessDecl>,
    /// All functions, exported and internal.
    pub functions: Vec<Function>,
}

impl Program {
    /// Looks up a function by id.
    #[must_use]
    pub fn function(&self, id: FuncId) -> Option<&Function> {
        self.functions.iter().find(|f| f.id == id)
    }

    /// Looks up a witness declaration by name.
    #[must_use]
    pub fn witness(&self, name: &str) -> Option<&WitnessDecl> {
        self.witnesses.iter().find(|w| w.name == name)
    }

    /// Index of functions by id for repeated lookups.
    #[must_use]
    pub fn function_index(&self) -> FxHashMap<FuncId, &Function> {
        self.functions.iter().map(|f| (f.id, f)).collect()
    }
}
