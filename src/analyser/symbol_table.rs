//! Two-scope name resolver with dense per-kind indices.
//!
//! Class scope holds statics and fields; subroutine scope holds arguments
//! and locals. A subroutine-scope name may shadow a class-scope one, but
//! two declarations in the same scope level collide. Indices count up
//! from 0 per kind, in declaration order, and map directly onto VM
//! segment slots at emission time.

use std::collections::HashMap;

use crate::common::{ast::Type, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SymbolKind {
    Static,
    Field,
    Argument,
    Local,
}

impl SymbolKind {
    const fn is_class_scope(self) -> bool {
        matches!(self, Self::Static | Self::Field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub symbol_type: Type,
    pub kind: SymbolKind,
    pub index: usize,
    pub position: Position,
}

/// Returned when a name is declared twice in the same scope level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redefinition {
    pub name: String,
    pub existing_kind: SymbolKind,
    pub existing_position: Position,
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    class_scope: HashMap<String, Symbol>,
    subroutine_scope: HashMap<String, Symbol>,
    static_count: usize,
    field_count: usize,
    argument_count: usize,
    local_count: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the subroutine scope and its counters; class-scope entries
    /// and their counters persist.
    pub fn start_subroutine(&mut self) {
        self.subroutine_scope.clear();
        self.argument_count = 0;
        self.local_count = 0;
    }

    pub fn define(
        &mut self,
        name: &str,
        symbol_type: Type,
        kind: SymbolKind,
        position: Position,
    ) -> Result<(), Redefinition> {
        if let Some(existing) = self.lookup(name) {
            // collision only within the same scope level; a local or
            // argument shadowing a field/static is fine
            if existing.kind.is_class_scope() == kind.is_class_scope() {
                return Err(Redefinition {
                    name: name.to_string(),
                    existing_kind: existing.kind,
                    existing_position: existing.position,
                });
            }
        }

        let symbol = Symbol {
            symbol_type,
            kind,
            index: self.next_index(kind),
            position,
        };

        if kind.is_class_scope() {
            self.class_scope.insert(name.to_string(), symbol);
        } else {
            self.subroutine_scope.insert(name.to_string(), symbol);
        }
        Ok(())
    }

    fn next_index(&mut self, kind: SymbolKind) -> usize {
        let counter = match kind {
            SymbolKind::Static => &mut self.static_count,
            SymbolKind::Field => &mut self.field_count,
            SymbolKind::Argument => &mut self.argument_count,
            SymbolKind::Local => &mut self.local_count,
        };
        let index = *counter;
        *counter += 1;
        index
    }

    /// Subroutine scope first, then class scope.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.subroutine_scope
            .get(name)
            .or_else(|| self.class_scope.get(name))
    }

    pub fn kind_of(&self, name: &str) -> Option<SymbolKind> {
        self.lookup(name).map(|symbol| symbol.kind)
    }

    pub fn type_of(&self, name: &str) -> Option<&Type> {
        self.lookup(name).map(|symbol| &symbol.symbol_type)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.lookup(name).map(|symbol| symbol.index)
    }

    pub fn var_count(&self, kind: SymbolKind) -> usize {
        match kind {
            SymbolKind::Static => self.static_count,
            SymbolKind::Field => self.field_count,
            SymbolKind::Argument => self.argument_count,
            SymbolKind::Local => self.local_count,
        }
    }
}
