//! TypeScript integration tests.
//!
//! Whole programs mixing type-level declarations with ordinary code, parsed
//! with the `typescript` plugin, alone and together with `jsx`.

use quarry_diagnostics::messages::*;
use quarry_parser::ast::node::*;
use quarry_parser::ast::ts::*;
use quarry_parser::{parse, ParserOptions};
use serde_json::json;

fn ts() -> ParserOptions {
    ParserOptions::module().with_plugin("typescript")
}

fn statements_with(source: &str, options: &ParserOptions) -> Vec<Statement> {
    let output = parse(source, options).expect("parse failed");
    assert!(output.errors.is_empty(), "{:?}", output.errors);
    output.file.program.body
}

fn statements(source: &str) -> Vec<Statement> {
    statements_with(source, &ts())
}

const SERVICE: &str = r#"
interface User {
    id: number;
    readonly name: string;
    email?: string;
    [key: string]: unknown;
}

type UserMap = Map<number, User>;

export abstract class Repository<T extends { id: number }> implements Iterable<T> {
    protected items: T[] = [];
    abstract find(id: number): T | undefined;
    constructor(private readonly source: string, public limit = 10) {}
    *[Symbol.iterator](): Iterator<T> {
        yield* this.items;
    }
}

export class UserRepository extends Repository<User> {
    override find(id: number): User | undefined {
        return this.items.find((u): u is User => u.id === id);
    }
}

export function pick<T, K extends keyof T>(obj: T, ...keys: K[]): Pick<T, K> {
    return keys.reduce((acc, key) => ({ ...acc, [key]: obj[key] }), {} as Pick<T, K>);
}

export const enum Level { Low = 1, High = Low << 2 }
declare module "cache" {
    export function get(key: string): string | null;
}
namespace Util.Strings {
    export const empty = "";
}
"#;

#[test]
fn test_realistic_module() {
    let body = statements(SERVICE);
    assert_eq!(body.len(), 8);
    assert!(matches!(body[0], Statement::TSInterfaceDeclaration(_)));
    assert!(matches!(body[1], Statement::TSTypeAliasDeclaration(_)));
    assert!(matches!(body[6], Statement::TSModuleDeclaration(_)));
    assert!(matches!(body[7], Statement::TSModuleDeclaration(_)));
}

#[test]
fn test_parameter_properties_in_constructor() {
    let body = statements("class A { constructor(private x: number, readonly y = 1, z: string) {} }");
    let Statement::ClassDeclaration(class) = &body[0] else {
        panic!("expected a class");
    };
    let ClassMember::ClassMethod(ctor) = &class.body.body[0] else {
        panic!("expected a constructor");
    };
    let params = &ctor.function.params;
    assert!(matches!(params[0], Expression::TSParameterProperty(_)));
    assert!(matches!(params[1], Expression::TSParameterProperty(_)));
    assert!(matches!(params[2], Expression::Identifier(_)));
}

#[test]
fn test_type_annotations_everywhere() {
    let body = statements(
        "let a: string | number = 1; \
         let f: (x: number) => void; \
         let t: [first: string, second?: number]; \
         let c: T extends string ? 'yes' : 'no'; \
         let m: { readonly [K in keyof T]?: T[K] }; \
         let l: `prefix-${string}`;",
    );
    assert_eq!(body.len(), 6);
}

#[test]
fn test_generic_arrow_without_jsx() {
    let body = statements("const id = <T,>(x: T) => x;");
    let Statement::VariableDeclaration(decl) = &body[0] else {
        panic!("expected a declaration");
    };
    let Some(Expression::ArrowFunctionExpression(arrow)) = decl.declarations[0].init.as_deref() else {
        panic!("expected an arrow");
    };
    assert!(arrow.type_parameters.is_some());
}

#[test]
fn test_generic_arrow_and_element_with_jsx() {
    let options = ts().with_plugin("jsx");
    let body = statements_with("const id = <T,>(x: T) => x; const el = <T>text</T>;", &options);
    let Statement::VariableDeclaration(second) = &body[1] else {
        panic!("expected a declaration");
    };
    assert!(matches!(second.declarations[0].init.as_deref(), Some(Expression::JSXElement(_))));
}

#[test]
fn test_angle_bracket_assertion_needs_no_jsx() {
    let body = statements("const n = <number>value;");
    let Statement::VariableDeclaration(decl) = &body[0] else {
        panic!("expected a declaration");
    };
    assert!(matches!(decl.declarations[0].init.as_deref(), Some(Expression::TSTypeAssertion(_))));
}

#[test]
fn test_declaration_file() {
    let options = ParserOptions::module().with_plugin_options("typescript", json!({ "dts": true }));
    let body = statements_with(
        "export const version: string; export function load(path: string): void; export class C { m(): void; }",
        &options,
    );
    assert_eq!(body.len(), 3);
}

#[test]
fn test_ambient_initializer_rules() {
    let err = parse("declare let x = 1;", &ts()).unwrap_err();
    assert!(err.is(&TS_INITIALIZER_NOT_ALLOWED_IN_AMBIENT_CONTEXT));
    assert!(parse("declare const x = 1;", &ts()).is_ok());
}

#[test]
fn test_enum_merging_rules() {
    assert!(parse("enum A { X } enum A { Y }", &ts()).is_ok());
    let err = parse("const enum A {} enum A {}", &ts()).unwrap_err();
    assert!(err.is(&VAR_REDECLARATION));
}

#[test]
fn test_interface_and_class_merge() {
    assert!(parse("interface Box {} class Box {} namespace Box {}", &ts()).is_ok());
    let err = parse("type Box = 1; interface Box {}", &ts()).unwrap_err();
    assert!(err.is(&VAR_REDECLARATION));
}

#[test]
fn test_abstract_member_rules() {
    let err = parse("class A { abstract m(): void; }", &ts()).unwrap_err();
    assert!(err.is(&TS_NON_ABSTRACT_CLASS_HAS_ABSTRACT_METHOD));
    let err = parse("abstract class A { abstract m() {} }", &ts()).unwrap_err();
    assert!(err.is(&TS_ABSTRACT_METHOD_HAS_IMPLEMENTATION));
}

#[test]
fn test_type_only_imports_and_exports() {
    let body = statements("import type { A } from 'a'; import { type B, C } from 'b'; export type { A, B };");
    let Statement::ImportDeclaration(first) = &body[0] else {
        panic!("expected an import");
    };
    assert_eq!(first.import_kind, Some(ImportOrExportKind::Type));
    let Statement::ExportNamedDeclaration(export) = &body[2] else {
        panic!("expected an export");
    };
    assert_eq!(export.export_kind, Some(ImportOrExportKind::Type));
}

#[test]
fn test_satisfies_and_non_null() {
    let body = statements("const cfg = { port: 1 } satisfies Config; el!.focus();");
    let Statement::VariableDeclaration(decl) = &body[0] else {
        panic!("expected a declaration");
    };
    assert!(matches!(decl.declarations[0].init.as_deref(), Some(Expression::TSSatisfiesExpression(_))));
}

#[test]
fn test_type_predicates_and_asserts() {
    let body = statements(
        "function isString(x: unknown): x is string { return typeof x === 'string'; } \
         function check(x: unknown): asserts x {}",
    );
    let Statement::FunctionDeclaration(function) = &body[1] else {
        panic!("expected a function");
    };
    let return_type = function.function.return_type.as_deref().expect("return type");
    assert!(matches!(return_type.type_annotation, TSType::TSTypePredicate(_)));
}
