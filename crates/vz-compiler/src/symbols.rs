//! Symbol table shared by the resolver, printer and exporter.
//!
//! Local scopes form a stack of frames. Lookup walks from the innermost frame
//! outwards, so an inner name hides an outer one of the same spelling.

use std::borrow::Cow;

use crate::ast::{IdentifierKind, InstructionKind};
use crate::catalog::{builtin_catalog, Arity, BuiltinCatalog, IdentifierDefinition};
use crate::globals::GlobalSymbols;

#[derive(Debug)]
pub struct SymbolTable {
    pub builtin: &'static BuiltinCatalog,
    pub globals: GlobalSymbols,
    frames: Vec<Vec<String>>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::empty()
    }
}

impl SymbolTable {
    pub fn empty() -> Self {
        Self {
            builtin: builtin_catalog(),
            globals: GlobalSymbols::default(),
            frames: Vec::new(),
        }
    }

    pub fn push_frame(&mut self, names: &[String]) {
        let mut frame: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            if !frame.contains(name) {
                frame.push(name.clone());
            }
        }
        self.frames.push(frame);
    }

    pub fn pop_frame(&mut self) {
        self.frames.pop();
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_local(&self, name: &str) -> bool {
        self.frames
            .iter()
            .rev()
            .any(|frame| frame.iter().any(|local| local == name))
    }

    /// Names declared by the innermost frame, in declaration order.
    pub fn current_frame_names(&self) -> Vec<String> {
        self.frames.last().cloned().unwrap_or_default()
    }

    pub fn resolve_expression_identifier(
        &self,
        name: &str,
        kind: IdentifierKind,
    ) -> Option<Cow<'_, IdentifierDefinition>> {
        match kind {
            IdentifierKind::Local => Some(Cow::Owned(local_variable_definition(name))),
            IdentifierKind::Global => self.globals.variables.get(name).map(Cow::Borrowed),
            IdentifierKind::Expression => self.globals.expressions.get(name).map(Cow::Borrowed),
            IdentifierKind::Builtin => self.builtin.expression(name).map(Cow::Borrowed),
            IdentifierKind::Unknown | IdentifierKind::Invalid => None,
        }
    }

    pub fn resolve_instruction_identifier(
        &self,
        name: &str,
        kind: InstructionKind,
    ) -> Option<&IdentifierDefinition> {
        match kind {
            InstructionKind::Global => self.globals.instructions.get(name),
            InstructionKind::Builtin => self.builtin.instruction(name),
            InstructionKind::Unknown | InstructionKind::Invalid => None,
        }
    }
}

fn local_variable_definition(name: &str) -> IdentifierDefinition {
    IdentifierDefinition::new(name, "Variable", Arity::Exact(0))
        .attr("list", "false")
        .attr("local", "true")
        .attr("variableName", name)
}

/// A traversal that owns a [`SymbolTable`] and brackets construct bodies in
/// local scopes.
pub trait ScopeHost {
    fn symbols(&mut self) -> &mut SymbolTable;

    /// Pushes a frame seeded with `names` and runs `body`. The frame is popped
    /// on every exit from `body`, unwinding included.
    fn with_local_scope<T>(&mut self, names: &[String], body: impl FnOnce(&mut Self) -> T) -> T
    where
        Self: Sized,
    {
        self.symbols().push_frame(names);
        let guard = ScopeGuard { host: self };
        body(&mut *guard.host)
    }
}

/// Pops the innermost frame of `host` when dropped.
struct ScopeGuard<'a, H: ScopeHost> {
    host: &'a mut H,
}

impl<H: ScopeHost> Drop for ScopeGuard<'_, H> {
    fn drop(&mut self) {
        self.host.symbols().pop_frame();
    }
}

impl ScopeHost for SymbolTable {
    fn symbols(&mut self) -> &mut SymbolTable {
        self
    }
}

pub fn enter_scope<H: ScopeHost, T>(
    host: &mut H,
    names: &[String],
    body: impl FnOnce(&mut H) -> T,
) -> T {
    host.with_local_scope(names, body)
}
