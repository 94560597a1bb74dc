//! Grouping of definitions by name.

use jqdefs_core::FuncDef;
use rustc_hash::FxHashMap;

/// Definitions keyed by name. Each list keeps source order, so overloads of
/// different arity stay in the order they were written.
pub type DefinitionGroupTable = FxHashMap<String, Vec<FuncDef>>;

/// Groups `defs` by name, consuming them.
pub fn group_definitions(defs: Vec<FuncDef>) -> DefinitionGroupTable {
    let mut table = DefinitionGroupTable::default();
    for def in defs {
        table.entry(def.name.clone()).or_default().push(def);
    }
    table
}
