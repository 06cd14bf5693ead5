//! Type representations: intrinsic and derived type specs, declaration
//! type specs, procedure interfaces and generic identifiers.

use std::{collections::HashMap, fmt::Display};

use lazy_static::lazy_static;

use crate::CHECK;

use super::{
    lazy_expr::ParamValue,
    scope::{Scope, ScopeId, ScopeKind, ScopeTree},
    symbol::SymbolId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    Integer,
    Real,
    Complex,
    Character,
    Logical,
    Derived,
}

impl Display for TypeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeCategory::Integer => write!(f, "INTEGER"),
            TypeCategory::Real => write!(f, "REAL"),
            TypeCategory::Complex => write!(f, "COMPLEX"),
            TypeCategory::Character => write!(f, "CHARACTER"),
            TypeCategory::Logical => write!(f, "LOGICAL"),
            TypeCategory::Derived => write!(f, "TYPE"),
        }
    }
}

/// A non-derived category together with a kind value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntrinsicTypeSpec {
    category: TypeCategory,
    kind: i32,
}

impl IntrinsicTypeSpec {
    pub fn new(category: TypeCategory, kind: i32) -> Self {
        CHECK!(category != TypeCategory::Derived);
        CHECK!(kind > 0, "kind {} of {} must be positive", kind, category);
        IntrinsicTypeSpec { category, kind }
    }

    pub fn category(&self) -> TypeCategory {
        self.category
    }

    pub fn kind(&self) -> i32 {
        self.kind
    }
}

impl Display for IntrinsicTypeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.category, self.kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivedTypeSpecId(u32);

impl DerivedTypeSpecId {
    pub(crate) fn new(index: usize) -> Self {
        DerivedTypeSpecId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A use of a derived type: its name, the scope that defines its
/// components once known, and the type parameter values supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedTypeSpec {
    name: String,
    scope: Option<ScopeId>,
    param_values: Vec<(Option<String>, ParamValue)>,
}

impl DerivedTypeSpec {
    pub fn new(name: &str) -> Self {
        DerivedTypeSpec {
            name: name.to_string(),
            scope: None,
            param_values: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> Option<ScopeId> {
        self.scope
    }

    /// Binds the spec to the scope of its type definition. Happens at most once.
    pub fn set_scope(&mut self, scope: &Scope) {
        CHECK!(self.scope.is_none(), "scope of TYPE({}) is already set", self.name);
        CHECK!(scope.kind() == ScopeKind::DerivedType);
        self.scope = Some(scope.id());
    }

    pub fn add_param_value(&mut self, name: Option<&str>, value: ParamValue) {
        self.param_values
            .push((name.map(|name| name.to_ascii_lowercase()), value));
    }

    pub fn param_values(&self) -> &[(Option<String>, ParamValue)] {
        &self.param_values
    }

    pub fn param_values_mut(&mut self) -> &mut Vec<(Option<String>, ParamValue)> {
        &mut self.param_values
    }
}

impl Display for DerivedTypeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TYPE({}", self.name)?;
        if !self.param_values.is_empty() {
            write!(f, "(")?;
            for (i, (name, value)) in self.param_values.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                if let Some(name) = name {
                    write!(f, "{}=", name)?;
                }
                write!(f, "{}", value)?;
            }
            write!(f, ")")?;
        }
        write!(f, ")")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclTypeSpecCategory {
    Intrinsic,
    TypeDerived,
    ClassDerived,
    TypeStar,
    ClassStar,
}

/// The declared type of an entity.
///
/// Derived variants refer to their spec by id, so equality of two derived
/// declarations is identity of the referenced spec, not structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclTypeSpec {
    Intrinsic(IntrinsicTypeSpec),
    TypeDerived(DerivedTypeSpecId),
    ClassDerived(DerivedTypeSpecId),
    TypeStar,
    ClassStar,
}

impl DeclTypeSpec {
    pub fn derived(category: DeclTypeSpecCategory, spec: DerivedTypeSpecId) -> Self {
        CHECK!(
            matches!(category, DeclTypeSpecCategory::TypeDerived | DeclTypeSpecCategory::ClassDerived),
            "{:?} cannot refer to a derived type spec",
            category
        );
        if category == DeclTypeSpecCategory::ClassDerived {
            DeclTypeSpec::ClassDerived(spec)
        } else {
            DeclTypeSpec::TypeDerived(spec)
        }
    }

    pub fn star(category: DeclTypeSpecCategory) -> Self {
        CHECK!(
            matches!(category, DeclTypeSpecCategory::TypeStar | DeclTypeSpecCategory::ClassStar),
            "{:?} is not an unlimited polymorphic category",
            category
        );
        if category == DeclTypeSpecCategory::ClassStar {
            DeclTypeSpec::ClassStar
        } else {
            DeclTypeSpec::TypeStar
        }
    }

    pub fn category(&self) -> DeclTypeSpecCategory {
        match self {
            DeclTypeSpec::Intrinsic(_) => DeclTypeSpecCategory::Intrinsic,
            DeclTypeSpec::TypeDerived(_) => DeclTypeSpecCategory::TypeDerived,
            DeclTypeSpec::ClassDerived(_) => DeclTypeSpecCategory::ClassDerived,
            DeclTypeSpec::TypeStar => DeclTypeSpecCategory::TypeStar,
            DeclTypeSpec::ClassStar => DeclTypeSpecCategory::ClassStar,
        }
    }

    pub fn intrinsic_type_spec(&self) -> &IntrinsicTypeSpec {
        CHECK!(
            self.category() == DeclTypeSpecCategory::Intrinsic,
            "{:?} has no intrinsic type spec",
            self.category()
        );
        match self {
            DeclTypeSpec::Intrinsic(spec) => spec,
            _ => unreachable!(),
        }
    }

    pub fn derived_type_spec(&self) -> DerivedTypeSpecId {
        CHECK!(
            matches!(self, DeclTypeSpec::TypeDerived(_) | DeclTypeSpec::ClassDerived(_)),
            "{:?} has no derived type spec",
            self.category()
        );
        match self {
            DeclTypeSpec::TypeDerived(spec) | DeclTypeSpec::ClassDerived(spec) => *spec,
            _ => unreachable!(),
        }
    }

    pub fn display<'a>(&'a self, tree: &'a ScopeTree) -> DeclTypeSpecDisplay<'a> {
        DeclTypeSpecDisplay { spec: self, tree }
    }
}

/// Renders a `DeclTypeSpec`, looking derived specs up in their tree.
pub struct DeclTypeSpecDisplay<'a> {
    spec: &'a DeclTypeSpec,
    tree: &'a ScopeTree,
}

impl Display for DeclTypeSpecDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.spec {
            DeclTypeSpec::Intrinsic(spec) => write!(f, "{}", spec),
            DeclTypeSpec::TypeDerived(id) => write!(f, "{}", self.tree.derived_type_spec(*id)),
            DeclTypeSpec::ClassDerived(id) => {
                write!(f, "CLASS({})", self.tree.derived_type_spec(*id).name())
            }
            DeclTypeSpec::TypeStar => write!(f, "TYPE(*)"),
            DeclTypeSpec::ClassStar => write!(f, "CLASS(*)"),
        }
    }
}

/// The interface of a procedure entity: a named interface symbol, or only
/// a result type for an implicit interface. At most one of the two is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcInterface {
    symbol: Option<SymbolId>,
    ty: Option<DeclTypeSpec>,
}

impl ProcInterface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn symbol(&self) -> Option<SymbolId> {
        self.symbol
    }

    pub fn get_type(&self) -> Option<&DeclTypeSpec> {
        self.ty.as_ref()
    }

    pub fn set_symbol(&mut self, symbol: SymbolId) {
        CHECK!(self.ty.is_none());
        self.symbol = Some(symbol);
    }

    pub fn set_type(&mut self, ty: DeclTypeSpec) {
        CHECK!(self.symbol.is_none());
        self.ty = Some(ty);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntrinsicOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Concat,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Not,
    Eqv,
    Neqv,
    Xor,
}

impl IntrinsicOperator {
    pub fn spelling(self) -> &'static str {
        match self {
            IntrinsicOperator::Add => "+",
            IntrinsicOperator::Subtract => "-",
            IntrinsicOperator::Multiply => "*",
            IntrinsicOperator::Divide => "/",
            IntrinsicOperator::Power => "**",
            IntrinsicOperator::Concat => "//",
            IntrinsicOperator::Eq => ".EQ.",
            IntrinsicOperator::Ne => ".NE.",
            IntrinsicOperator::Lt => ".LT.",
            IntrinsicOperator::Le => ".LE.",
            IntrinsicOperator::Gt => ".GT.",
            IntrinsicOperator::Ge => ".GE.",
            IntrinsicOperator::And => ".AND.",
            IntrinsicOperator::Or => ".OR.",
            IntrinsicOperator::Not => ".NOT.",
            IntrinsicOperator::Eqv => ".EQV.",
            IntrinsicOperator::Neqv => ".NEQV.",
            IntrinsicOperator::Xor => ".XOR.",
        }
    }
}

lazy_static! {
    static ref OPERATOR_LOOKUP: HashMap<&'static str, IntrinsicOperator> = {
        let mut m = HashMap::new();
        m.insert("+", IntrinsicOperator::Add);
        m.insert("-", IntrinsicOperator::Subtract);
        m.insert("*", IntrinsicOperator::Multiply);
        m.insert("/", IntrinsicOperator::Divide);
        m.insert("**", IntrinsicOperator::Power);
        m.insert("//", IntrinsicOperator::Concat);
        m.insert(".eq.", IntrinsicOperator::Eq);
        m.insert("==", IntrinsicOperator::Eq);
        m.insert(".ne.", IntrinsicOperator::Ne);
        m.insert("/=", IntrinsicOperator::Ne);
        m.insert(".lt.", IntrinsicOperator::Lt);
        m.insert("<", IntrinsicOperator::Lt);
        m.insert(".le.", IntrinsicOperator::Le);
        m.insert("<=", IntrinsicOperator::Le);
        m.insert(".gt.", IntrinsicOperator::Gt);
        m.insert(">", IntrinsicOperator::Gt);
        m.insert(".ge.", IntrinsicOperator::Ge);
        m.insert(">=", IntrinsicOperator::Ge);
        m.insert(".and.", IntrinsicOperator::And);
        m.insert(".or.", IntrinsicOperator::Or);
        m.insert(".not.", IntrinsicOperator::Not);
        m.insert(".eqv.", IntrinsicOperator::Eqv);
        m.insert(".neqv.", IntrinsicOperator::Neqv);
        m.insert(".xor.", IntrinsicOperator::Xor);
        m
    };
}

/// The identifier of a generic interface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenericSpec {
    Name(String),
    DefinedOperator(String),
    Assignment,
    ReadFormatted,
    ReadUnformatted,
    WriteFormatted,
    WriteUnformatted,
    IntrinsicOperator(IntrinsicOperator),
}

impl GenericSpec {
    /// Classifies an operator as written in `OPERATOR(op)`.
    pub fn from_operator(spelling: &str) -> Option<GenericSpec> {
        let spelling = spelling.trim().to_ascii_lowercase();
        if let Some(operator) = OPERATOR_LOOKUP.get(spelling.as_str()) {
            return Some(GenericSpec::IntrinsicOperator(*operator));
        }

        let letters = spelling
            .strip_prefix('.')
            .and_then(|rest| rest.strip_suffix('.'))?;
        if !letters.is_empty() && letters.chars().all(|c| c.is_ascii_alphabetic()) {
            Some(GenericSpec::DefinedOperator(spelling))
        } else {
            None
        }
    }
}

impl Display for GenericSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenericSpec::Name(name) => write!(f, "{}", name),
            GenericSpec::DefinedOperator(operator) => write!(f, "OPERATOR({})", operator),
            GenericSpec::Assignment => write!(f, "ASSIGNMENT(=)"),
            GenericSpec::ReadFormatted => write!(f, "READ(FORMATTED)"),
            GenericSpec::ReadUnformatted => write!(f, "READ(UNFORMATTED)"),
            GenericSpec::WriteFormatted => write!(f, "WRITE(FORMATTED)"),
            GenericSpec::WriteUnformatted => write!(f, "WRITE(UNFORMATTED)"),
            GenericSpec::IntrinsicOperator(operator) => {
                write!(f, "OPERATOR({})", operator.spelling())
            }
        }
    }
}
