//! The scope tree.
//!
//! Scopes, symbols and derived type specs live in arenas owned by the
//! `ScopeTree` and are referred to by id. Ids stay valid for the whole
//! compilation, so a child handle obtained once is never invalidated by
//! later insertions.

use std::{
    collections::{HashMap, HashSet},
    fmt::{Display, Write},
};

use tracing::{debug, trace};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Name, Span, CHECK,
};

use super::{
    symbol::{Details, Symbol, SymbolArena, SymbolId},
    types::{DerivedTypeSpec, DerivedTypeSpecId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Submodules are `Module` scopes whose symbol's details say so.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Global,
    Module,
    MainProgram,
    Subprogram,
    DerivedType,
    Block,
    Forall,
    ImpliedDos,
}

impl Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScopeKind::Global => "Global",
            ScopeKind::Module => "Module",
            ScopeKind::MainProgram => "MainProgram",
            ScopeKind::Subprogram => "Subprogram",
            ScopeKind::DerivedType => "DerivedType",
            ScopeKind::Block => "Block",
            ScopeKind::Forall => "Forall",
            ScopeKind::ImpliedDos => "ImpliedDos",
        };
        write!(f, "{}", name)
    }
}

/// Host association policy set by `IMPORT` statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
    Default,
    None,
    All,
    Only,
}

impl Display for ImportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportKind::Default => write!(f, "IMPORT"),
            ImportKind::None => write!(f, "IMPORT, NONE"),
            ImportKind::All => write!(f, "IMPORT, ALL"),
            ImportKind::Only => write!(f, "IMPORT, ONLY"),
        }
    }
}

#[derive(Debug)]
pub struct Scope {
    id: ScopeId,
    kind: ScopeKind,
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
    symbol: Option<SymbolId>,
    symbols: HashMap<String, SymbolId>,
    submodules: HashMap<String, ScopeId>,
    derived_type_specs: Vec<DerivedTypeSpecId>,
    import_kind: Option<ImportKind>,
    import_names: HashSet<String>,
    source_range: Option<Span>,
}

impl Scope {
    fn new(id: ScopeId, kind: ScopeKind, parent: Option<ScopeId>, symbol: Option<SymbolId>) -> Self {
        Scope {
            id,
            kind,
            parent,
            children: Vec::new(),
            symbol,
            symbols: HashMap::new(),
            submodules: HashMap::new(),
            derived_type_specs: Vec::new(),
            import_kind: None,
            import_names: HashSet::new(),
            source_range: None,
        }
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }

    pub fn symbol(&self) -> Option<SymbolId> {
        self.symbol
    }

    /// Local symbol table. Iteration order is unspecified.
    pub fn symbols(&self) -> impl Iterator<Item = (&str, SymbolId)> {
        self.symbols.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn derived_type_specs(&self) -> &[DerivedTypeSpecId] {
        &self.derived_type_specs
    }

    pub fn import_names(&self) -> &HashSet<String> {
        &self.import_names
    }

    pub fn source_range(&self) -> Option<&Span> {
        self.source_range.as_ref()
    }
}

/// Every scope, symbol and derived type spec of one compilation.
#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    symbols: SymbolArena,
    derived_type_specs: Vec<DerivedTypeSpec>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    /// Creates a tree holding only the global scope.
    pub fn new() -> Self {
        let global = Scope::new(ScopeId(0), ScopeKind::Global, None, None);
        ScopeTree {
            scopes: vec![global],
            symbols: SymbolArena::new(),
            derived_type_specs: Vec::new(),
        }
    }

    pub fn global_scope(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        self.symbols.get(id)
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        self.symbols.get_mut(id)
    }

    pub fn symbols(&self) -> &SymbolArena {
        &self.symbols
    }

    pub fn derived_type_spec(&self, id: DerivedTypeSpecId) -> &DerivedTypeSpec {
        &self.derived_type_specs[id.index()]
    }

    pub fn derived_type_spec_mut(&mut self, id: DerivedTypeSpecId) -> &mut DerivedTypeSpec {
        &mut self.derived_type_specs[id.index()]
    }

    fn parent_of(&self, scope: ScopeId) -> ScopeId {
        let scope = self.scope(scope);
        CHECK!(scope.parent.is_some(), "{} scope has no parent", scope.kind);
        match scope.parent {
            Some(parent) => parent,
            None => unreachable!(),
        }
    }

    /// Appends a new child scope to `parent`. When `symbol` is given, that
    /// symbol is the one introducing the new scope.
    pub fn make_scope(&mut self, parent: ScopeId, kind: ScopeKind, symbol: Option<SymbolId>) -> ScopeId {
        CHECK!(kind != ScopeKind::Global, "there is only one global scope");
        CHECK!(
            kind != ScopeKind::Module || symbol.is_some(),
            "a module scope needs the symbol that introduces it"
        );
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(id, kind, Some(parent), symbol));
        self.scopes[parent.index()].children.push(id);
        if let Some(symbol) = symbol {
            self.symbols.get_mut(symbol).scope = Some(id);
        }

        trace!(scope = id.0, parent = parent.0, %kind, "created scope");
        id
    }

    /// Declares `name` in `scope`.
    pub fn declare(&mut self, scope: ScopeId, name: &Name, details: Details) -> Result<SymbolId, Error> {
        if self.scope(scope).contains(name.as_str()) {
            return Err(Error::new(
                ErrorImpl::SymbolAlreadyDeclared { name: name.text.clone() },
                name.span.start.clone(),
            ));
        }

        let id = self.symbols.alloc(name.as_str(), scope, name.span.clone(), details);
        self.scopes[scope.index()].symbols.insert(name.text.clone(), id);

        trace!(scope = scope.0, name = %name, kind = self.symbol(id).details.kind_name(), "declared symbol");
        Ok(id)
    }

    /// Looks `name` up in the local table of `scope` only, recording the
    /// lookup as an occurrence of the symbol found.
    pub fn find(&mut self, scope: ScopeId, name: &Name) -> Option<SymbolId> {
        let id = *self.scope(scope).symbols.get(name.as_str())?;
        self.symbols.get_mut(id).add_occurrence(&name.span);
        Some(id)
    }

    /// Removes `name` from the local table of `scope`, returning how many
    /// symbols were removed.
    pub fn erase(&mut self, scope: ScopeId, name: &Name) -> usize {
        let id = match self.scope(scope).symbols.get(name.as_str()) {
            Some(id) => *id,
            None => return 0,
        };
        self.symbols.get_mut(id).remove_occurrence(&name.span);
        self.scopes[scope.index()].symbols.remove(name.as_str());
        1
    }

    /// Looks `name` up in `scope` and, as far as the scope's import policy
    /// permits, in its hosts.
    pub fn find_symbol(&mut self, scope: ScopeId, name: &Name) -> Option<SymbolId> {
        if self.scope(scope).kind == ScopeKind::DerivedType {
            let parent = self.parent_of(scope);
            return self.find_symbol(parent, name);
        }

        if let Some(symbol) = self.find(scope, name) {
            return Some(symbol);
        }

        if self.can_import(scope, name.as_str()) {
            let parent = self.parent_of(scope);
            self.find_symbol(parent, name)
        } else {
            None
        }
    }

    /// Whether `name` may be host associated into `scope`.
    pub fn can_import(&self, scope: ScopeId, name: &str) -> bool {
        if self.scope(scope).kind == ScopeKind::Global {
            return false;
        }
        match self.import_kind(scope) {
            ImportKind::None => false,
            ImportKind::All | ImportKind::Default => true,
            ImportKind::Only => self.scope(scope).import_names.contains(name),
        }
    }

    /// The effective import policy of `scope`.
    pub fn import_kind(&self, scope: ScopeId) -> ImportKind {
        let scope = self.scope(scope);
        if let Some(kind) = scope.import_kind {
            return kind;
        }

        let is_interface_body = scope.symbol.is_some_and(|symbol| {
            matches!(&self.symbol(symbol).details, Details::Subprogram(details) if details.is_interface)
        });
        if is_interface_body {
            ImportKind::None
        } else {
            ImportKind::Default
        }
    }

    /// Records the policy of another `IMPORT` statement in `scope`.
    ///
    /// Returns the violated constraint when the statement may not be
    /// combined with the ones seen before; the policy is left unchanged then.
    pub fn set_import_kind(&mut self, scope: ScopeId, kind: ImportKind) -> Option<ErrorImpl> {
        let scope = &mut self.scopes[scope.index()];
        let previous = match scope.import_kind {
            Some(previous) => previous,
            None => {
                scope.import_kind = Some(kind);
                return None;
            }
        };

        let either = |wanted: ImportKind| kind == wanted || previous == wanted;
        let error = if either(ImportKind::None) {
            Some(ErrorImpl::ImportNoneNotSole)
        } else if either(ImportKind::All) {
            Some(ErrorImpl::ImportAllNotSole)
        } else if (kind == ImportKind::Only) != (previous == ImportKind::Only) {
            Some(ErrorImpl::ImportOnlyMismatch)
        } else {
            None
        };

        if let Some(error) = &error {
            debug!(scope = scope.id.0, %previous, requested = %kind, "rejected IMPORT: {}", error);
        }
        error
    }

    /// Makes `name` importable into `scope` under `IMPORT, ONLY`. Fails if
    /// the host cannot see the name.
    pub fn add_import_name(&mut self, scope: ScopeId, name: &Name) -> bool {
        let parent = self.parent_of(scope);
        if self.find_symbol(parent, name).is_none() {
            return false;
        }
        self.scopes[scope.index()].import_names.insert(name.text.clone());
        true
    }

    /// Registers `submodule` under the name it has in the module hierarchy
    /// rooted at `scope`.
    pub fn add_submodule(&mut self, scope: ScopeId, name: &str, submodule: ScopeId) -> bool {
        let name = name.to_ascii_lowercase();
        let submodules = &mut self.scopes[scope.index()].submodules;
        if submodules.contains_key(&name) {
            return false;
        }
        submodules.insert(name, submodule);
        true
    }

    pub fn find_submodule(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        self.scope(scope)
            .submodules
            .get(&name.to_ascii_lowercase())
            .copied()
    }

    /// Creates a derived type spec owned by `scope`.
    pub fn make_derived_type_spec(&mut self, scope: ScopeId, name: &str) -> DerivedTypeSpecId {
        let id = DerivedTypeSpecId::new(self.derived_type_specs.len());
        self.derived_type_specs
            .push(DerivedTypeSpec::new(&name.to_ascii_lowercase()));
        self.scopes[scope.index()].derived_type_specs.push(id);
        id
    }

    /// Binds `spec` to the scope that defines its type.
    pub fn set_derived_type_scope(&mut self, spec: DerivedTypeSpecId, scope: ScopeId) {
        let scope = &self.scopes[scope.index()];
        self.derived_type_specs[spec.index()].set_scope(scope);
    }

    /// The innermost scope at or below `scope` whose source range contains
    /// `span`.
    pub fn find_scope(&self, scope: ScopeId, span: &Span) -> Option<ScopeId> {
        let current = self.scope(scope);
        if !current.source_range.as_ref().is_some_and(|range| range.contains(span)) {
            return None;
        }
        for child in &current.children {
            if let Some(found) = self.find_scope(*child, span) {
                return Some(found);
            }
        }
        Some(scope)
    }

    /// Grows the source range of `scope` and of all its ancestors to cover
    /// `span`.
    pub fn add_source_range(&mut self, scope: ScopeId, span: &Span) {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &mut self.scopes[id.index()];
            match &mut scope.source_range {
                Some(range) => range.extend_to_cover(span),
                None => scope.source_range = Some(span.clone()),
            }
            current = scope.parent;
        }
    }

    pub fn is_module(&self, scope: ScopeId) -> bool {
        let scope = self.scope(scope);
        if scope.kind != ScopeKind::Module {
            return false;
        }
        CHECK!(scope.symbol.is_some(), "module scope {} has no symbol", scope.id.0);
        let symbol = match scope.symbol {
            Some(symbol) => self.symbol(symbol),
            None => unreachable!(),
        };
        CHECK!(
            matches!(symbol.details, Details::Module(_)),
            "module scope symbol {} has {} details",
            symbol.name(),
            symbol.details.kind_name()
        );
        match &symbol.details {
            Details::Module(details) => !details.is_submodule,
            _ => unreachable!(),
        }
    }

    /// Debug rendering of `scope` and its symbols, sorted by name.
    pub fn dump(&self, scope: ScopeId) -> String {
        let current = self.scope(scope);
        let mut out = format!("{} scope: ", current.kind);
        if let Some(symbol) = current.symbol {
            let _ = write!(out, "{} ", self.symbol(symbol).name());
        }
        let _ = writeln!(out, "{} children", current.children.len());

        let mut names: Vec<&String> = current.symbols.keys().collect();
        names.sort();
        for name in names {
            let _ = writeln!(out, "  {}", self.describe_symbol(current.symbols[name]));
        }
        out
    }

    fn describe_symbol(&self, id: SymbolId) -> String {
        let symbol = self.symbol(id);
        let mut out = String::from(symbol.name());

        let mut attrs: Vec<String> = symbol.attrs.iter().map(|attr| attr.to_string()).collect();
        attrs.sort();
        for attr in attrs {
            let _ = write!(out, ", {}", attr);
        }
        let _ = write!(out, ": {}", symbol.details.kind_name());

        if let Some(ty) = symbol.get_type() {
            let _ = write!(out, " type: {}", ty.display(self));
        }
        match &symbol.details {
            Details::ObjectEntity(details) => {
                if !details.shape.is_empty() {
                    let shape: Vec<String> = details.shape.iter().map(|dim| dim.to_string()).collect();
                    let _ = write!(out, " shape: ({})", shape.join(","));
                }
                if let Some(init) = &details.init {
                    let _ = write!(out, " init: {}", init);
                }
            }
            Details::TypeParam(details) => {
                let _ = write!(out, " {:?}", details.attr);
                if let Some(init) = &details.init {
                    let _ = write!(out, " init: {}", init);
                }
            }
            Details::Subprogram(details) => {
                if details.is_interface {
                    let _ = write!(out, " (interface)");
                }
                if !details.dummy_args.is_empty() {
                    let args: Vec<&str> = details.dummy_args.iter().map(|arg| self.symbol(*arg).name()).collect();
                    let _ = write!(out, " args: {}", args.join(","));
                }
                if let Some(result) = details.result {
                    let _ = write!(out, " result: {}", self.symbol(result).name());
                }
            }
            Details::DerivedType(details) if !details.param_names.is_empty() => {
                let _ = write!(out, " params: {}", details.param_names.join(","));
            }
            Details::ProcEntity(details) => {
                if let Some(interface) = details.interface.symbol() {
                    let _ = write!(out, " interface: {}", self.symbol(interface).name());
                }
            }
            Details::Generic(details) => {
                let _ = write!(out, " {}", details.spec);
                let specifics: Vec<&str> = details
                    .specific_procs
                    .iter()
                    .map(|proc| self.symbol(*proc).name())
                    .collect();
                if !specifics.is_empty() {
                    let _ = write!(out, " => {}", specifics.join(","));
                }
            }
            _ => {}
        }
        out
    }
}
