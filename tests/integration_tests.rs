//! Integration tests for end-to-end resolution.
//!
//! These tests build scope trees the way a declaration pass would, from
//! expression text through tokenization and parsing, then run the resolver
//! and check the rendered types, bounds and diagnostics.

use std::rc::Rc;

use semantics::{
    ast::ast::Expr as Syntax,
    errors::errors::{Error, ErrorImpl},
    evaluate::{analyzer::DefaultAnalyzer, expr::Expr},
    parser::parser::parse_expr_source,
    semantics::{
        context::{SemanticsConfig, SemanticsContext},
        lazy_expr::{Bound, LazyExpr, ParamValue, ShapeSpec},
        resolve::resolve_symbol_exprs,
        scope::{ImportKind, ScopeId, ScopeKind},
        symbol::{
            Attr, Details, DerivedTypeDetails, ModuleDetails, ObjectEntityDetails, SubprogramDetails,
            SymbolId, TypeParamAttr, TypeParamDetails,
        },
        types::{DeclTypeSpec, IntrinsicTypeSpec, TypeCategory},
    },
    Name, Span,
};

const FILE: &str = "consts.f90";

fn span(start: u32, end: u32) -> Span {
    Span::new(start, end, &Rc::new(FILE.to_string()))
}

fn name(text: &str, at: u32) -> Name {
    Name::new(text, span(at, at + text.len() as u32))
}

fn syntax(source: &str) -> Rc<Syntax> {
    Rc::new(parse_expr_source(source, FILE).expect("expression should parse"))
}

fn integer() -> Option<DeclTypeSpec> {
    Some(DeclTypeSpec::Intrinsic(IntrinsicTypeSpec::new(TypeCategory::Integer, 4)))
}

fn constant(context: &mut SemanticsContext, scope: ScopeId, text: &str, at: u32, init: &str) -> SymbolId {
    let details = Details::ObjectEntity(ObjectEntityDetails {
        ty: integer(),
        init: Some(LazyExpr::new(syntax(init))),
        ..Default::default()
    });
    let id = context.tree.declare(scope, &name(text, at), details).unwrap();
    context.tree.symbol_mut(id).attrs.insert(Attr::Parameter);
    context.tree.add_source_range(scope, &span(at, at + 20));
    id
}

fn array(context: &mut SemanticsContext, scope: ScopeId, text: &str, at: u32, shape: Vec<ShapeSpec>) -> SymbolId {
    let details = Details::ObjectEntity(ObjectEntityDetails {
        ty: integer(),
        shape,
        is_dummy: true,
        ..Default::default()
    });
    let id = context.tree.declare(scope, &name(text, at), details).unwrap();
    context.tree.add_source_range(scope, &span(at, at + 20));
    id
}

fn subprogram(context: &mut SemanticsContext, parent: ScopeId, text: &str, at: u32, is_interface: bool) -> ScopeId {
    let details = Details::Subprogram(SubprogramDetails { is_interface, ..Default::default() });
    let symbol = context.tree.declare(parent, &name(text, at), details).unwrap();
    let scope = context.tree.make_scope(parent, ScopeKind::Subprogram, Some(symbol));
    context.tree.add_source_range(scope, &span(at, at + 10));
    scope
}

fn shape_of(context: &SemanticsContext, symbol: SymbolId) -> Vec<String> {
    match &context.tree.symbol(symbol).details {
        Details::ObjectEntity(details) => details.shape.iter().map(|dim| dim.to_string()).collect(),
        other => panic!("{} has no shape", other.kind_name()),
    }
}

fn init_of(context: &SemanticsContext, symbol: SymbolId) -> String {
    match &context.tree.symbol(symbol).details {
        Details::ObjectEntity(details) => details.init.as_ref().map(|init| init.to_string()).unwrap_or_default(),
        Details::TypeParam(details) => details.init.as_ref().map(|init| init.to_string()).unwrap_or_default(),
        other => panic!("{} has no initializer", other.kind_name()),
    }
}

struct Program {
    context: SemanticsContext,
    module: ScopeId,
    subroutine: ScopeId,
    n: SymbolId,
    ik: SymbolId,
    k: SymbolId,
    a: SymbolId,
    x: SymbolId,
}

/// ```fortran
/// module consts
///   contains subroutine s(a, x)            ! declared before the constants
///     integer :: a(n, 0:n*2)
///     type(t(k=n)) :: x
///   end subroutine
///   integer, parameter :: n = 10
///   integer, parameter :: ik = selected_int_kind(9)
///   type :: t(k)
///     integer, kind :: k = ik
///   end type
/// end module
/// ```
fn build_program(config: SemanticsConfig) -> Program {
    let mut context = SemanticsContext::new(config);
    let global = context.global_scope();

    let module_symbol = context
        .tree
        .declare(global, &name("consts", 7), Details::Module(ModuleDetails::default()))
        .unwrap();
    let module = context.tree.make_scope(global, ScopeKind::Module, Some(module_symbol));
    context.tree.add_source_range(module, &span(0, 400));

    let subroutine = subprogram(&mut context, module, "s", 30, false);
    context.tree.add_source_range(subroutine, &span(20, 120));
    let a = array(
        &mut context,
        subroutine,
        "a",
        60,
        vec![
            ShapeSpec::explicit(Bound::from(1_i64), Bound::explicit(syntax("n"))),
            ShapeSpec::explicit(Bound::explicit(syntax("0")), Bound::explicit(syntax("n*2"))),
        ],
    );

    let n = constant(&mut context, module, "n", 150, "10");
    let ik = constant(&mut context, module, "ik", 180, "selected_int_kind(9)");

    let t = context
        .tree
        .declare(
            module,
            &name("t", 220),
            Details::DerivedType(DerivedTypeDetails { param_names: vec!["k".to_string()] }),
        )
        .unwrap();
    let type_scope = context.tree.make_scope(module, ScopeKind::DerivedType, Some(t));
    context.tree.add_source_range(type_scope, &span(215, 300));
    let k = context
        .tree
        .declare(
            type_scope,
            &name("k", 250),
            Details::TypeParam(TypeParamDetails {
                attr: TypeParamAttr::Kind,
                ty: integer(),
                init: Some(LazyExpr::new(syntax("ik"))),
            }),
        )
        .unwrap();

    let spec = context.tree.make_derived_type_spec(subroutine, "t");
    context.tree.set_derived_type_scope(spec, type_scope);
    context
        .tree
        .derived_type_spec_mut(spec)
        .add_param_value(Some("k"), ParamValue::explicit(syntax("n")));
    let x = context
        .tree
        .declare(
            subroutine,
            &name("x", 90),
            Details::ObjectEntity(ObjectEntityDetails {
                ty: Some(DeclTypeSpec::TypeDerived(spec)),
                is_dummy: true,
                ..Default::default()
            }),
        )
        .unwrap();

    Program { context, module, subroutine, n, ik, k, a, x }
}

#[test]
fn test_resolve_module_program() {
    let Program { mut context, n, ik, k, a, x, .. } = build_program(SemanticsConfig::default());

    let stats = resolve_symbol_exprs(&mut context, &mut DefaultAnalyzer::new());
    assert_eq!(stats.errors, 0);
    // The literal lower bound of `a` is already resolved and not counted.
    assert_eq!(stats.resolved, 7);
    assert!(context.messages.is_empty());

    assert_eq!(init_of(&context, n), "10");
    assert_eq!(init_of(&context, ik), "4");
    assert_eq!(init_of(&context, k), "4");
    assert_eq!(shape_of(&context, a), vec!["1:10", "0:20"]);

    let ty = *context.tree.symbol(x).get_type().unwrap();
    assert_eq!(ty.display(&context.tree).to_string(), "TYPE(t(k=10))");
}

#[test]
fn test_find_scope_by_position() {
    let Program { context, module, subroutine, .. } = build_program(SemanticsConfig::default());
    let tree = &context.tree;
    let global = tree.global_scope();

    assert_eq!(tree.find_scope(global, &span(40, 41)), Some(subroutine));
    assert_eq!(tree.find_scope(global, &span(350, 351)), Some(module));
    assert_eq!(tree.find_scope(global, &span(500, 501)), None);

    let type_scope = tree.find_scope(global, &span(250, 251)).unwrap();
    assert_eq!(tree.scope(type_scope).kind(), ScopeKind::DerivedType);
    assert!(tree.is_module(module));
}

#[test]
fn test_interface_body_with_import_only() {
    let Program { mut context, module, .. } = build_program(SemanticsConfig::default());
    let body = subprogram(&mut context, module, "f", 320, true);
    assert_eq!(context.tree.import_kind(body), ImportKind::None);

    // import, only: n
    assert_eq!(context.tree.set_import_kind(body, ImportKind::Only), None);
    assert!(context.tree.add_import_name(body, &name("n", 335)));
    assert!(!context.tree.add_import_name(body, &name("nope", 338)));

    let b = array(
        &mut context,
        body,
        "b",
        345,
        vec![ShapeSpec::explicit(Bound::from(1_i64), Bound::explicit(syntax("n")))],
    );
    let c = array(
        &mut context,
        body,
        "c",
        360,
        vec![ShapeSpec::explicit(Bound::from(1_i64), Bound::explicit(syntax("ik")))],
    );

    // import, all
    if let Some(error) = context.tree.set_import_kind(body, ImportKind::All) {
        context.say(Error::new(error, span(370, 380).start));
    }

    let stats = resolve_symbol_exprs(&mut context, &mut DefaultAnalyzer::new());
    assert_eq!(stats.errors, 1);
    assert_eq!(shape_of(&context, b), vec!["1:10"]);
    assert_eq!(shape_of(&context, c), vec!["1:ERROR"]);

    let messages: Vec<&Error> = context.messages.iter().collect();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].get_impl(), &ErrorImpl::ImportAllNotSole);
    assert_eq!(messages[0].get_rule(), Some("C898"));
    assert_eq!(messages[0].get_position().0, 370);
    assert_eq!(messages[1].get_error_name(), "UndeclaredName");
}

#[test]
fn test_configured_integer_kind() {
    let config = SemanticsConfig::new().with_default_integer_kind(8);
    let Program { mut context, n, .. } = build_program(config);
    resolve_symbol_exprs(&mut context, &mut DefaultAnalyzer::new());

    match &context.tree.symbol(n).details {
        Details::ObjectEntity(details) => {
            let init = details.init.as_ref().and_then(|init| init.get());
            assert_eq!(init, Some(&Expr::integer(10, 8)));
        }
        other => panic!("unexpected {}", other.kind_name()),
    }
}

#[test]
fn test_dump_after_resolution() {
    let Program { mut context, subroutine, .. } = build_program(SemanticsConfig::default());
    resolve_symbol_exprs(&mut context, &mut DefaultAnalyzer::new());

    assert_eq!(
        context.tree.dump(subroutine),
        "Subprogram scope: s 0 children\n\
         \x20 a: ObjectEntity type: INTEGER(4) shape: (1:10,0:20)\n\
         \x20 x: ObjectEntity type: TYPE(t(k=10))\n"
    );
}

#[test]
fn test_unparsable_expression() {
    let error = parse_expr_source("n +", FILE).unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedToken");

    let error = parse_expr_source("n @ 2", FILE).unwrap_err();
    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 2);
}
