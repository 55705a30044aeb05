//! AST visitor trait for traversing the syntax tree.
//!
//! `AstVisitor` has one method per syntactic category. The defaults walk
//! into children through the matching `walk_*` function, so an override can
//! do its own work and still call `walk_*` to continue the traversal.

use crate::jsx::*;
use crate::node::*;
use crate::ts::*;

pub trait AstVisitor: Sized {
    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program)
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        walk_statement(self, stmt)
    }

    fn visit_expression(&mut self, expr: &Expression) {
        walk_expression(self, expr)
    }

    fn visit_object_member(&mut self, member: &ObjectMember) {
        walk_object_member(self, member)
    }

    fn visit_class_member(&mut self, member: &ClassMember) {
        walk_class_member(self, member)
    }

    fn visit_ts_type(&mut self, ty: &TSType) {
        walk_ts_type(self, ty)
    }

    fn visit_ts_type_element(&mut self, element: &TSTypeElement) {
        walk_ts_type_element(self, element)
    }

    fn visit_jsx_child(&mut self, child: &JSXChild) {
        walk_jsx_child(self, child)
    }

    fn visit_identifier(&mut self, id: &Identifier) {
        if let Some(ann) = &id.type_annotation {
            self.visit_ts_type(&ann.type_annotation);
        }
    }
}

pub fn walk_program<V: AstVisitor>(v: &mut V, program: &Program) {
    for stmt in &program.body {
        v.visit_statement(stmt);
    }
}

fn walk_block<V: AstVisitor>(v: &mut V, block: &BlockStatement) {
    for stmt in &block.body {
        v.visit_statement(stmt);
    }
}

fn walk_annotation<V: AstVisitor>(v: &mut V, ann: &Option<Box<TSTypeAnnotation>>) {
    if let Some(ann) = ann {
        v.visit_ts_type(&ann.type_annotation);
    }
}

fn walk_type_params<V: AstVisitor>(v: &mut V, params: &Option<TSTypeParameterDeclaration>) {
    if let Some(decl) = params {
        for param in &decl.params {
            walk_type_parameter(v, param);
        }
    }
}

fn walk_type_parameter<V: AstVisitor>(v: &mut V, param: &TSTypeParameter) {
    if let Some(c) = &param.constraint {
        v.visit_ts_type(c);
    }
    if let Some(d) = &param.default {
        v.visit_ts_type(d);
    }
}

fn walk_type_args<V: AstVisitor>(v: &mut V, args: &Option<TSTypeParameterInstantiation>) {
    if let Some(inst) = args {
        for ty in &inst.params {
            v.visit_ts_type(ty);
        }
    }
}

fn walk_function<V: AstVisitor>(v: &mut V, f: &FunctionParts) {
    walk_type_params(v, &f.type_parameters);
    for param in &f.params {
        v.visit_expression(param);
    }
    walk_annotation(v, &f.return_type);
    if let Some(body) = &f.body {
        walk_block(v, body);
    }
}

fn walk_class<V: AstVisitor>(v: &mut V, class: &Class) {
    if let Some(id) = &class.id {
        v.visit_identifier(id);
    }
    walk_type_params(v, &class.type_parameters);
    if let Some(sup) = &class.super_class {
        v.visit_expression(sup);
    }
    walk_type_args(v, &class.super_type_parameters);
    for member in &class.body.body {
        v.visit_class_member(member);
    }
}

fn walk_for_init<V: AstVisitor>(v: &mut V, init: &ForInit) {
    match init {
        ForInit::VariableDeclaration(decl) => walk_var_decl(v, decl),
        ForInit::Expression(e) => v.visit_expression(e),
    }
}

fn walk_var_decl<V: AstVisitor>(v: &mut V, decl: &VariableDeclaration) {
    for d in &decl.declarations {
        v.visit_expression(&d.id);
        if let Some(init) = &d.init {
            v.visit_expression(init);
        }
    }
}

pub fn walk_statement<V: AstVisitor>(v: &mut V, stmt: &Statement) {
    match stmt {
        Statement::BlockStatement(n) => walk_block(v, n),
        Statement::EmptyStatement(_) | Statement::DebuggerStatement(_) => {}
        Statement::ExpressionStatement(n) => v.visit_expression(&n.expression),
        Statement::IfStatement(n) => {
            v.visit_expression(&n.test);
            v.visit_statement(&n.consequent);
            if let Some(alt) = &n.alternate {
                v.visit_statement(alt);
            }
        }
        Statement::LabeledStatement(n) => {
            v.visit_identifier(&n.label);
            v.visit_statement(&n.body);
        }
        Statement::BreakStatement(n) | Statement::ContinueStatement(n) => {
            if let Some(label) = &n.label {
                v.visit_identifier(label);
            }
        }
        Statement::WithStatement(n) => {
            v.visit_expression(&n.object);
            v.visit_statement(&n.body);
        }
        Statement::SwitchStatement(n) => {
            v.visit_expression(&n.discriminant);
            for case in &n.cases {
                if let Some(test) = &case.test {
                    v.visit_expression(test);
                }
                for s in &case.consequent {
                    v.visit_statement(s);
                }
            }
        }
        Statement::ReturnStatement(n) => {
            if let Some(arg) = &n.argument {
                v.visit_expression(arg);
            }
        }
        Statement::ThrowStatement(n) => v.visit_expression(&n.argument),
        Statement::TryStatement(n) => {
            walk_block(v, &n.block);
            if let Some(handler) = &n.handler {
                if let Some(param) = &handler.param {
                    v.visit_expression(param);
                }
                walk_block(v, &handler.body);
            }
            if let Some(fin) = &n.finalizer {
                walk_block(v, fin);
            }
        }
        Statement::WhileStatement(n) | Statement::DoWhileStatement(n) => {
            v.visit_expression(&n.test);
            v.visit_statement(&n.body);
        }
        Statement::ForStatement(n) => {
            if let Some(init) = &n.init {
                walk_for_init(v, init);
            }
            if let Some(test) = &n.test {
                v.visit_expression(test);
            }
            if let Some(update) = &n.update {
                v.visit_expression(update);
            }
            v.visit_statement(&n.body);
        }
        Statement::ForInStatement(n) | Statement::ForOfStatement(n) => {
            walk_for_init(v, &n.left);
            v.visit_expression(&n.right);
            v.visit_statement(&n.body);
        }
        Statement::FunctionDeclaration(n) | Statement::TSDeclareFunction(n) => {
            if let Some(id) = &n.id {
                v.visit_identifier(id);
            }
            walk_function(v, &n.function);
        }
        Statement::VariableDeclaration(n) => walk_var_decl(v, n),
        Statement::ClassDeclaration(n) => walk_class(v, n),
        Statement::ImportDeclaration(n) => {
            for spec in &n.specifiers {
                v.visit_identifier(spec.local());
            }
            v.visit_expression(&n.source);
        }
        Statement::ExportNamedDeclaration(n) => {
            if let Some(decl) = &n.declaration {
                v.visit_statement(decl);
            }
            for spec in &n.specifiers {
                match spec {
                    ExportSpecifier::ExportSpecifier(s) => {
                        v.visit_expression(&s.local);
                        v.visit_expression(&s.exported);
                    }
                    ExportSpecifier::ExportNamespaceSpecifier(s) => {
                        v.visit_expression(&s.exported)
                    }
                }
            }
            if let Some(source) = &n.source {
                v.visit_expression(source);
            }
        }
        Statement::ExportDefaultDeclaration(n) => match &n.declaration {
            ExportDefaultKind::FunctionDeclaration(f) | ExportDefaultKind::TSDeclareFunction(f) => {
                walk_function(v, &f.function)
            }
            ExportDefaultKind::ClassDeclaration(c) => walk_class(v, c),
            ExportDefaultKind::TSInterfaceDeclaration(i) => walk_interface(v, i),
            ExportDefaultKind::Expression(e) => v.visit_expression(e),
        },
        Statement::ExportAllDeclaration(n) => {
            if let Some(exported) = &n.exported {
                v.visit_expression(exported);
            }
            v.visit_expression(&n.source);
        }
        Statement::TSInterfaceDeclaration(n) => walk_interface(v, n),
        Statement::TSTypeAliasDeclaration(n) => {
            v.visit_identifier(&n.id);
            walk_type_params(v, &n.type_parameters);
            v.visit_ts_type(&n.type_annotation);
        }
        Statement::TSEnumDeclaration(n) => {
            v.visit_identifier(&n.id);
            for member in &n.members {
                v.visit_expression(&member.id);
                if let Some(init) = &member.initializer {
                    v.visit_expression(init);
                }
            }
        }
        Statement::TSModuleDeclaration(n) => walk_module(v, n),
        Statement::TSImportEqualsDeclaration(n) => {
            v.visit_identifier(&n.id);
            if let TSModuleReference::TSExternalModuleReference(ext) = &n.module_reference {
                v.visit_expression(&ext.expression);
            }
        }
        Statement::TSExportAssignment(n) => v.visit_expression(&n.expression),
        Statement::TSNamespaceExportDeclaration(n) => v.visit_identifier(&n.id),
    }
}

fn walk_interface<V: AstVisitor>(v: &mut V, n: &TSInterfaceDeclaration) {
    v.visit_identifier(&n.id);
    walk_type_params(v, &n.type_parameters);
    for heritage in &n.extends {
        walk_type_args(v, &heritage.type_parameters);
    }
    for element in &n.body.body {
        v.visit_ts_type_element(element);
    }
}

fn walk_module<V: AstVisitor>(v: &mut V, n: &TSModuleDeclaration) {
    v.visit_expression(&n.id);
    match &n.body {
        Some(TSModuleBody::TSModuleBlock(block)) => {
            for stmt in &block.body {
                v.visit_statement(stmt);
            }
        }
        Some(TSModuleBody::TSModuleDeclaration(inner)) => walk_module(v, inner),
        None => {}
    }
}

pub fn walk_expression<V: AstVisitor>(v: &mut V, expr: &Expression) {
    match expr {
        Expression::Identifier(id) => v.visit_identifier(id),
        Expression::PrivateName(_)
        | Expression::StringLiteral(_)
        | Expression::NumericLiteral(_)
        | Expression::BigIntLiteral(_)
        | Expression::BooleanLiteral(_)
        | Expression::NullLiteral(_)
        | Expression::RegExpLiteral(_)
        | Expression::ThisExpression(_)
        | Expression::Super(_)
        | Expression::Import(_)
        | Expression::MetaProperty(_)
        | Expression::Literal(_)
        | Expression::PrivateIdentifier(_) => {}
        Expression::TemplateLiteral(n) => {
            for e in &n.expressions {
                v.visit_expression(e);
            }
        }
        Expression::TaggedTemplateExpression(n) => {
            v.visit_expression(&n.tag);
            walk_type_args(v, &n.type_parameters);
            for e in &n.quasi.expressions {
                v.visit_expression(e);
            }
        }
        Expression::ArrayExpression(n) => {
            for e in n.elements.iter().flatten() {
                v.visit_expression(e);
            }
        }
        Expression::ObjectExpression(n) => {
            for m in &n.properties {
                v.visit_object_member(m);
            }
        }
        Expression::FunctionExpression(n) => {
            if let Some(id) = &n.id {
                v.visit_identifier(id);
            }
            walk_function(v, &n.function);
        }
        Expression::ArrowFunctionExpression(n) => {
            walk_type_params(v, &n.type_parameters);
            for p in &n.params {
                v.visit_expression(p);
            }
            walk_annotation(v, &n.return_type);
            match &n.body {
                ArrowBody::BlockStatement(b) => walk_block(v, b),
                ArrowBody::Expression(e) => v.visit_expression(e),
            }
        }
        Expression::ClassExpression(n) => walk_class(v, n),
        Expression::UnaryExpression(n) => v.visit_expression(&n.argument),
        Expression::UpdateExpression(n) => v.visit_expression(&n.argument),
        Expression::BinaryExpression(n) => {
            v.visit_expression(&n.left);
            v.visit_expression(&n.right);
        }
        Expression::LogicalExpression(n) => {
            v.visit_expression(&n.left);
            v.visit_expression(&n.right);
        }
        Expression::AssignmentExpression(n) => {
            v.visit_expression(&n.left);
            v.visit_expression(&n.right);
        }
        Expression::ConditionalExpression(n) => {
            v.visit_expression(&n.test);
            v.visit_expression(&n.consequent);
            v.visit_expression(&n.alternate);
        }
        Expression::SequenceExpression(n) => {
            for e in &n.expressions {
                v.visit_expression(e);
            }
        }
        Expression::CallExpression(n)
        | Expression::OptionalCallExpression(n)
        | Expression::NewExpression(n) => {
            v.visit_expression(&n.callee);
            walk_type_args(v, &n.type_parameters);
            for a in &n.arguments {
                v.visit_expression(a);
            }
        }
        Expression::MemberExpression(n) | Expression::OptionalMemberExpression(n) => {
            v.visit_expression(&n.object);
            v.visit_expression(&n.property);
        }
        Expression::YieldExpression(n) => {
            if let Some(arg) = &n.argument {
                v.visit_expression(arg);
            }
        }
        Expression::AwaitExpression(n) => v.visit_expression(&n.argument),
        Expression::SpreadElement(n) => v.visit_expression(&n.argument),
        Expression::ParenthesizedExpression(n) => v.visit_expression(&n.expression),
        Expression::ObjectPattern(n) => {
            for m in &n.properties {
                v.visit_object_member(m);
            }
            walk_annotation(v, &n.type_annotation);
        }
        Expression::ArrayPattern(n) => {
            for e in n.elements.iter().flatten() {
                v.visit_expression(e);
            }
            walk_annotation(v, &n.type_annotation);
        }
        Expression::AssignmentPattern(n) => {
            v.visit_expression(&n.left);
            v.visit_expression(&n.right);
        }
        Expression::RestElement(n) => {
            v.visit_expression(&n.argument);
            walk_annotation(v, &n.type_annotation);
        }
        Expression::JSXElement(n) => walk_jsx_element(v, n),
        Expression::JSXFragment(n) => {
            for c in &n.children {
                v.visit_jsx_child(c);
            }
        }
        Expression::TSAsExpression(n) | Expression::TSSatisfiesExpression(n) => {
            v.visit_expression(&n.expression);
            v.visit_ts_type(&n.type_annotation);
        }
        Expression::TSTypeAssertion(n) => {
            v.visit_ts_type(&n.type_annotation);
            v.visit_expression(&n.expression);
        }
        Expression::TSNonNullExpression(n) => v.visit_expression(&n.expression),
        Expression::TSInstantiationExpression(n) => {
            v.visit_expression(&n.expression);
            for ty in &n.type_parameters.params {
                v.visit_ts_type(ty);
            }
        }
        Expression::TSTypeCastExpression(n) => {
            v.visit_expression(&n.expression);
            v.visit_ts_type(&n.type_annotation.type_annotation);
        }
        Expression::TSParameterProperty(n) => v.visit_expression(&n.parameter),
        Expression::ImportExpression(n) => {
            v.visit_expression(&n.source);
            if let Some(opts) = &n.options {
                v.visit_expression(opts);
            }
        }
        Expression::ChainExpression(n) => v.visit_expression(&n.expression),
    }
}

pub fn walk_object_member<V: AstVisitor>(v: &mut V, member: &ObjectMember) {
    match member {
        ObjectMember::ObjectProperty(p) => {
            if p.computed || !p.shorthand {
                v.visit_expression(&p.key);
            }
            v.visit_expression(&p.value);
        }
        ObjectMember::ObjectMethod(m) => {
            v.visit_expression(&m.key);
            walk_function(v, &m.function);
        }
        ObjectMember::SpreadElement(s) => v.visit_expression(&s.argument),
        ObjectMember::RestElement(r) => v.visit_expression(&r.argument),
        ObjectMember::Property(p) => {
            if p.computed || !p.shorthand {
                v.visit_expression(&p.key);
            }
            v.visit_expression(&p.value);
        }
    }
}

pub fn walk_class_member<V: AstVisitor>(v: &mut V, member: &ClassMember) {
    match member {
        ClassMember::ClassMethod(m)
        | ClassMember::ClassPrivateMethod(m)
        | ClassMember::TSDeclareMethod(m) => {
            v.visit_expression(&m.key);
            walk_function(v, &m.function);
        }
        ClassMember::ClassProperty(p)
        | ClassMember::ClassPrivateProperty(p)
        | ClassMember::PropertyDefinition(p) => {
            v.visit_expression(&p.key);
            walk_annotation(v, &p.type_annotation);
            if let Some(value) = &p.value {
                v.visit_expression(value);
            }
        }
        ClassMember::StaticBlock(b) => {
            for stmt in &b.body {
                v.visit_statement(stmt);
            }
        }
        ClassMember::TSIndexSignature(s) => walk_index_signature(v, s),
        ClassMember::MethodDefinition(m) => {
            v.visit_expression(&m.key);
            v.visit_expression(&m.value);
        }
    }
}

fn walk_index_signature<V: AstVisitor>(v: &mut V, sig: &TSIndexSignature) {
    for p in &sig.parameters {
        v.visit_identifier(p);
    }
    walk_annotation(v, &sig.type_annotation);
}

fn walk_signature<V: AstVisitor>(v: &mut V, sig: &TSSignature) {
    walk_type_params(v, &sig.type_parameters);
    for p in &sig.parameters {
        v.visit_expression(p);
    }
    walk_annotation(v, &sig.type_annotation);
}

pub fn walk_ts_type<V: AstVisitor>(v: &mut V, ty: &TSType) {
    match ty {
        TSType::TSAnyKeyword(_)
        | TSType::TSUnknownKeyword(_)
        | TSType::TSNumberKeyword(_)
        | TSType::TSObjectKeyword(_)
        | TSType::TSBooleanKeyword(_)
        | TSType::TSBigIntKeyword(_)
        | TSType::TSStringKeyword(_)
        | TSType::TSSymbolKeyword(_)
        | TSType::TSVoidKeyword(_)
        | TSType::TSUndefinedKeyword(_)
        | TSType::TSNullKeyword(_)
        | TSType::TSNeverKeyword(_)
        | TSType::TSIntrinsicKeyword(_)
        | TSType::TSThisType(_) => {}
        TSType::TSFunctionType(sig) | TSType::TSConstructorType(sig) => walk_signature(v, sig),
        TSType::TSTypeReference(r) => walk_type_args(v, &r.type_parameters),
        TSType::TSTypePredicate(p) => {
            if let TSTypePredicateName::Identifier(id) = &p.parameter_name {
                v.visit_identifier(id);
            }
            walk_annotation(v, &p.type_annotation);
        }
        TSType::TSTypeQuery(q) => walk_type_args(v, &q.type_parameters),
        TSType::TSTypeLiteral(l) => {
            for m in &l.members {
                v.visit_ts_type_element(m);
            }
        }
        TSType::TSArrayType(a) => v.visit_ts_type(&a.element_type),
        TSType::TSTupleType(t) => {
            for e in &t.element_types {
                v.visit_ts_type(e);
            }
        }
        TSType::TSOptionalType(w) | TSType::TSRestType(w) | TSType::TSParenthesizedType(w) => {
            v.visit_ts_type(&w.type_annotation)
        }
        TSType::TSNamedTupleMember(m) => v.visit_ts_type(&m.element_type),
        TSType::TSUnionType(l) | TSType::TSIntersectionType(l) => {
            for t in &l.types {
                v.visit_ts_type(t);
            }
        }
        TSType::TSConditionalType(c) => {
            v.visit_ts_type(&c.check_type);
            v.visit_ts_type(&c.extends_type);
            v.visit_ts_type(&c.true_type);
            v.visit_ts_type(&c.false_type);
        }
        TSType::TSInferType(i) => walk_type_parameter(v, &i.type_parameter),
        TSType::TSTypeOperator(o) => v.visit_ts_type(&o.type_annotation),
        TSType::TSIndexedAccessType(i) => {
            v.visit_ts_type(&i.object_type);
            v.visit_ts_type(&i.index_type);
        }
        TSType::TSMappedType(m) => {
            walk_type_parameter(v, &m.type_parameter);
            if let Some(name) = &m.name_type {
                v.visit_ts_type(name);
            }
            if let Some(ann) = &m.type_annotation {
                v.visit_ts_type(ann);
            }
        }
        TSType::TSLiteralType(l) => match &l.literal {
            TSLiteral::TemplateLiteral(t) => {
                for e in &t.expressions {
                    v.visit_ts_type(e);
                }
            }
            TSLiteral::Expression(e) => v.visit_expression(e),
        },
        TSType::TSImportType(i) => {
            v.visit_expression(&i.argument);
            walk_type_args(v, &i.type_parameters);
        }
    }
}

pub fn walk_ts_type_element<V: AstVisitor>(v: &mut V, element: &TSTypeElement) {
    match element {
        TSTypeElement::TSPropertySignature(p) => {
            v.visit_expression(&p.key);
            walk_annotation(v, &p.type_annotation);
        }
        TSTypeElement::TSMethodSignature(m) => {
            v.visit_expression(&m.key);
            walk_type_params(v, &m.type_parameters);
            for p in &m.parameters {
                v.visit_expression(p);
            }
            walk_annotation(v, &m.type_annotation);
        }
        TSTypeElement::TSCallSignatureDeclaration(s)
        | TSTypeElement::TSConstructSignatureDeclaration(s) => walk_signature(v, s),
        TSTypeElement::TSIndexSignature(s) => walk_index_signature(v, s),
    }
}

fn walk_jsx_element<V: AstVisitor>(v: &mut V, el: &JSXElement) {
    walk_type_args(v, &el.opening_element.type_parameters);
    for attr in &el.opening_element.attributes {
        match attr {
            JSXAttributeItem::JSXAttribute(a) => match &a.value {
                Some(JSXAttributeValue::JSXExpressionContainer(c)) => {
                    if let JSXExpression::Expression(e) = &c.expression {
                        v.visit_expression(e);
                    }
                }
                Some(JSXAttributeValue::JSXElement(e)) => walk_jsx_element(v, e),
                Some(JSXAttributeValue::JSXFragment(f)) => {
                    for c in &f.children {
                        v.visit_jsx_child(c);
                    }
                }
                Some(JSXAttributeValue::Literal(e)) => v.visit_expression(e),
                None => {}
            },
            JSXAttributeItem::JSXSpreadAttribute(s) => v.visit_expression(&s.argument),
        }
    }
    for child in &el.children {
        v.visit_jsx_child(child);
    }
}

pub fn walk_jsx_child<V: AstVisitor>(v: &mut V, child: &JSXChild) {
    match child {
        JSXChild::JSXText(_) => {}
        JSXChild::JSXExpressionContainer(c) => {
            if let JSXExpression::Expression(e) = &c.expression {
                v.visit_expression(e);
            }
        }
        JSXChild::JSXSpreadChild(s) => v.visit_expression(&s.expression),
        JSXChild::JSXElement(e) => walk_jsx_element(v, e),
        JSXChild::JSXFragment(f) => {
            for c in &f.children {
                v.visit_jsx_child(c);
            }
        }
    }
}

/// Counts nodes by category; handy for quick structural assertions.
#[derive(Debug, Default)]
pub struct NodeCounter {
    pub statements: usize,
    pub expressions: usize,
    pub types: usize,
}

impl AstVisitor for NodeCounter {
    fn visit_statement(&mut self, stmt: &Statement) {
        self.statements += 1;
        walk_statement(self, stmt)
    }

    fn visit_expression(&mut self, expr: &Expression) {
        self.expressions += 1;
        walk_expression(self, expr)
    }

    fn visit_ts_type(&mut self, ty: &TSType) {
        self.types += 1;
        walk_ts_type(self, ty)
    }
}
