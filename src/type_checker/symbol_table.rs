use std::{
    collections::HashMap,
    fmt::Display,
    ops::{Deref, DerefMut},
};

use log::{debug, trace};

use crate::{
    ast::{ast::Ident, types::ValueType},
    errors::errors::{Error, ErrorImpl},
    Span,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Var,
    Param,
    Proc,
    Func,
}

impl SymbolKind {
    /// Variables and parameters hold values; procedures and functions do not.
    pub fn is_value(&self) -> bool {
        matches!(self, SymbolKind::Var | SymbolKind::Param)
    }
}

impl Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolKind::Var => write!(f, "variable"),
            SymbolKind::Param => write!(f, "parameter"),
            SymbolKind::Proc => write!(f, "procedure"),
            SymbolKind::Func => write!(f, "function"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// `None` for procedures and functions.
    pub decl_type: Option<ValueType>,
    pub scope_level: usize,
    pub unique_name: String,
    /// Parameter count of a procedure or function.
    pub arity: Option<usize>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Procedure(String),
    Function(String),
    Main,
}

impl Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeKind::Global => write!(f, "global"),
            ScopeKind::Procedure(name) => write!(f, "procedure {}", name),
            ScopeKind::Function(name) => write!(f, "function {}", name),
            ScopeKind::Main => write!(f, "main"),
        }
    }
}

/// One frame of the scope stack. Symbols keep their declaration order.
#[derive(Debug)]
pub struct Scope {
    pub id: usize,
    pub kind: ScopeKind,
    symbols: Vec<Symbol>,
    lookup: HashMap<String, usize>,
}

impl Scope {
    fn new(id: usize, kind: ScopeKind) -> Self {
        Scope {
            id,
            kind,
            symbols: vec![],
            lookup: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.lookup.get(name).map(|&index| &self.symbols[index])
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }
}

/// Scope stack for semantic analysis.
///
/// Frame 0 is the global frame and lives as long as the table. Procedures,
/// functions and main each get exactly one child frame on top of it, so a
/// lookup only ever consults the current frame and then the global one.
/// Frames are popped into an archive rather than discarded, which keeps every
/// declared symbol (and its unique name) available after analysis.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    archive: Vec<Scope>,
    next_id: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![Scope::new(0, ScopeKind::Global)],
            archive: vec![],
            next_id: 1,
        }
    }

    pub fn open_scope(&mut self, kind: ScopeKind) -> usize {
        let id = self.next_id;
        self.next_id += 1;

        debug!("entering scope {} ({})", id, kind);
        self.scopes.push(Scope::new(id, kind));
        id
    }

    /// Pops the innermost frame. The global frame is never popped.
    pub fn close_scope(&mut self) {
        if self.scopes.len() > 1 {
            if let Some(scope) = self.scopes.pop() {
                debug!("leaving scope {} ({})", scope.id, scope.kind);
                self.archive.push(scope);
            }
        }
    }

    /// Opens a frame that is closed again when the returned guard is dropped,
    /// on the success path and on early returns alike.
    pub fn enter_scope(&mut self, kind: ScopeKind) -> ScopeGuard<'_> {
        self.open_scope(kind);
        ScopeGuard { table: self }
    }

    pub fn current_scope_level(&self) -> usize {
        self.scopes.len() - 1
    }

    pub fn current_scope(&self) -> &Scope {
        &self.scopes[self.scopes.len() - 1]
    }

    pub fn global_scope(&self) -> &Scope {
        &self.scopes[0]
    }

    /// Declares `ident` in the current frame and returns its unique name.
    ///
    /// The global frame tolerates one entry per kind under the same name so
    /// that [`SymbolTable::check_no_global_clashes`] can report the clash with
    /// both kinds. Every other frame holds one entry per name.
    pub fn declare(
        &mut self,
        ident: &Ident,
        kind: SymbolKind,
        decl_type: Option<ValueType>,
        arity: Option<usize>,
    ) -> Result<String, Error> {
        let scope_level = self.current_scope_level();
        let scope = &mut self.scopes[scope_level];

        let existing = if scope_level == 0 {
            scope.symbols.iter().find(|symbol| symbol.name == ident.name && symbol.kind == kind)
        } else {
            scope.get(&ident.name)
        };

        if let Some(existing) = existing {
            let error = if existing.kind == SymbolKind::Param && kind == SymbolKind::Var {
                ErrorImpl::ParamShadow { name: ident.name.clone() }
            } else {
                ErrorImpl::DuplicateDeclaration { name: ident.name.clone() }
            };
            return Err(Error::new(error, ident.span.start.clone()));
        }

        let unique_name = format!("s{}_{}", scope.id, ident.name);
        trace!("declared {} `{}` as {}", kind, ident.name, unique_name);

        let index = scope.symbols.len();
        scope.lookup.entry(ident.name.clone()).or_insert(index);
        scope.symbols.push(Symbol {
            name: ident.name.clone(),
            kind,
            decl_type,
            scope_level,
            unique_name: unique_name.clone(),
            arity,
            span: ident.span.clone(),
        });

        Ok(unique_name)
    }

    /// Fails if a global name is used by more than one of variable, procedure
    /// and function. Reported at the later declaration.
    pub fn check_no_global_clashes(&self) -> Result<(), Error> {
        let globals = &self.global_scope().symbols;

        for (index, symbol) in globals.iter().enumerate() {
            if let Some(first) = globals[..index].iter().find(|other| other.name == symbol.name) {
                return Err(Error::new(
                    ErrorImpl::GlobalNameClash {
                        name: symbol.name.clone(),
                        first: first.kind,
                        second: symbol.kind,
                    },
                    symbol.span.start.clone(),
                ));
            }
        }

        Ok(())
    }

    /// Current frame first, then the global frame.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.current_scope()
            .get(name)
            .or_else(|| self.global_scope().get(name))
    }

    pub fn assert_exists(&self, ident: &Ident) -> Result<&Symbol, Error> {
        self.lookup(&ident.name).ok_or_else(|| {
            Error::new(
                ErrorImpl::UndefinedVariable { name: ident.name.clone() },
                ident.span.start.clone(),
            )
        })
    }

    /// Frames in the order they were opened, live and retired.
    fn scopes_in_order(&self) -> impl Iterator<Item = &Scope> {
        self.scopes[..1]
            .iter()
            .chain(self.archive.iter())
            .chain(self.scopes[1..].iter())
    }

    /// Every symbol ever declared, in declaration order.
    pub fn all_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.scopes_in_order().flat_map(|scope| scope.symbols.iter())
    }

    #[cfg(test)]
    pub fn find_unique(&self, unique_name: &str) -> Option<&Symbol> {
        self.all_symbols().find(|symbol| symbol.unique_name == unique_name)
    }
}

impl Display for SymbolTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for scope in self.scopes_in_order() {
            writeln!(f, "scope {} ({})", scope.id, scope.kind)?;

            for symbol in scope.symbols.iter() {
                write!(f, "  {:<9} {:<12} {}", symbol.kind, symbol.name, symbol.unique_name)?;
                if let Some(decl_type) = symbol.decl_type {
                    write!(f, " : {}", decl_type)?;
                }
                if let Some(arity) = symbol.arity {
                    write!(f, " /{}", arity)?;
                }
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

/// Keeps a frame open for as long as it lives. Dereferences to the table.
pub struct ScopeGuard<'a> {
    table: &'a mut SymbolTable,
}

impl Deref for ScopeGuard<'_> {
    type Target = SymbolTable;

    fn deref(&self) -> &Self::Target {
        self.table
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.table
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.table.close_scope();
    }
}
