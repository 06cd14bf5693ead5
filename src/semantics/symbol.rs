//! Symbol table entries.
//!
//! Every symbol of a compilation lives in one `SymbolArena` owned by the
//! scope tree; scopes map names to `SymbolId`s into it. A symbol's
//! `details` say what kind of entity it is and carry the deferred
//! expressions the resolver later fills in.

use std::{collections::HashSet, fmt::Display};

use crate::Span;

use super::{
    lazy_expr::{LazyExpr, ShapeSpec},
    scope::ScopeId,
    types::{DeclTypeSpec, GenericSpec, ProcInterface},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attr {
    Parameter,
    Allocatable,
    Pointer,
    Save,
}

impl Display for Attr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Attr::Parameter => write!(f, "PARAMETER"),
            Attr::Allocatable => write!(f, "ALLOCATABLE"),
            Attr::Pointer => write!(f, "POINTER"),
            Attr::Save => write!(f, "SAVE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurrenceKind {
    Used,
    Removed,
}

/// A place in the source where a symbol was looked up or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub kind: OccurrenceKind,
    pub span: Span,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleDetails {
    pub is_submodule: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubprogramDetails {
    /// Declared inside an interface block rather than defined.
    pub is_interface: bool,
    pub dummy_args: Vec<SymbolId>,
    pub result: Option<SymbolId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectEntityDetails {
    pub ty: Option<DeclTypeSpec>,
    pub init: Option<LazyExpr>,
    pub shape: Vec<ShapeSpec>,
    pub is_dummy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeParamAttr {
    Kind,
    Len,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParamDetails {
    pub attr: TypeParamAttr,
    pub ty: Option<DeclTypeSpec>,
    pub init: Option<LazyExpr>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedTypeDetails {
    pub param_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcEntityDetails {
    pub interface: ProcInterface,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenericDetails {
    pub spec: GenericSpec,
    pub specific_procs: Vec<SymbolId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Details {
    #[default]
    Unknown,
    Module(ModuleDetails),
    MainProgram,
    Subprogram(SubprogramDetails),
    ObjectEntity(ObjectEntityDetails),
    TypeParam(TypeParamDetails),
    DerivedType(DerivedTypeDetails),
    ProcEntity(ProcEntityDetails),
    Generic(GenericDetails),
}

impl Details {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Details::Unknown => "Unknown",
            Details::Module(details) if details.is_submodule => "Submodule",
            Details::Module(_) => "Module",
            Details::MainProgram => "MainProgram",
            Details::Subprogram(_) => "Subprogram",
            Details::ObjectEntity(_) => "ObjectEntity",
            Details::TypeParam(_) => "TypeParam",
            Details::DerivedType(_) => "DerivedType",
            Details::ProcEntity(_) => "ProcEntity",
            Details::Generic(_) => "Generic",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Symbol {
    id: SymbolId,
    name: String,
    owner: ScopeId,
    /// The scope this symbol introduces, e.g. a module's own scope.
    pub scope: Option<ScopeId>,
    pub attrs: HashSet<Attr>,
    pub details: Details,
    declared_at: Span,
    occurrences: Vec<Occurrence>,
}

impl Symbol {
    pub fn id(&self) -> SymbolId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The scope whose table holds this symbol.
    pub fn owner(&self) -> ScopeId {
        self.owner
    }

    pub fn declared_at(&self) -> &Span {
        &self.declared_at
    }

    pub fn has_attr(&self, attr: Attr) -> bool {
        self.attrs.contains(&attr)
    }

    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    pub fn add_occurrence(&mut self, span: &Span) {
        self.occurrences.push(Occurrence {
            kind: OccurrenceKind::Used,
            span: span.clone(),
        });
    }

    pub fn remove_occurrence(&mut self, span: &Span) {
        self.occurrences.push(Occurrence {
            kind: OccurrenceKind::Removed,
            span: span.clone(),
        });
    }

    pub fn get_type(&self) -> Option<&DeclTypeSpec> {
        match &self.details {
            Details::ObjectEntity(details) => details.ty.as_ref(),
            Details::TypeParam(details) => details.ty.as_ref(),
            Details::ProcEntity(details) => details.interface.get_type(),
            _ => None,
        }
    }
}

/// Owner of every symbol created during one compilation.
#[derive(Debug, Default)]
pub struct SymbolArena {
    entries: Vec<Symbol>,
}

impl SymbolArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, name: &str, owner: ScopeId, declared_at: Span, details: Details) -> SymbolId {
        let id = SymbolId(self.entries.len() as u32);
        self.entries.push(Symbol {
            id,
            name: name.to_string(),
            owner,
            scope: None,
            attrs: HashSet::new(),
            details,
            declared_at,
            occurrences: Vec::new(),
        });
        id
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.entries[id.index()]
    }

    pub fn get_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.entries[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
