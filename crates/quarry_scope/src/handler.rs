//! The scope handler.
//!
//! One `Scope` per lexical boundary, each holding the names it declares
//! partitioned by namespace. Redeclaration is decided per scope by
//! `is_redeclared_in_scope`, which layers the type-namespace rules (types,
//! enums, classes, interfaces) over the plain value rules. Import-equals
//! bindings live on a separate stack with one entry per module boundary.

use crate::flags::{BindingFlags, ScopeFlags};
use indexmap::IndexSet;
use quarry_core::collections::{FxHashSet, OrderedMap};
use quarry_core::text::Position;
use quarry_diagnostics::messages::{MODULE_EXPORT_UNDEFINED, VAR_REDECLARATION};
use quarry_diagnostics::ParseError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    pub flags: ScopeFlags,
    var: FxHashSet<String>,
    /// Ordered so that a simple catch parameter is always first.
    lexical: IndexSet<String>,
    functions: FxHashSet<String>,
    types: FxHashSet<String>,
    enums: FxHashSet<String>,
    const_enums: FxHashSet<String>,
    classes: FxHashSet<String>,
    export_only: FxHashSet<String>,
}

impl Scope {
    pub fn new(flags: ScopeFlags) -> Self {
        Self {
            flags,
            ..Self::default()
        }
    }

    /// Whether `name` is bound in this scope in any namespace.
    pub fn has_binding(&self, name: &str) -> bool {
        self.var.contains(name)
            || self.lexical.contains(name)
            || self.functions.contains(name)
            || self.types.contains(name)
            || self.export_only.contains(name)
    }

    pub fn has_value(&self, name: &str) -> bool {
        self.var.contains(name) || self.lexical.contains(name) || self.functions.contains(name)
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.types.contains(name)
    }

    pub fn is_enum(&self, name: &str) -> bool {
        self.enums.contains(name)
    }

    pub fn is_const_enum(&self, name: &str) -> bool {
        self.const_enums.contains(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScopeHandler {
    scope_stack: Vec<Scope>,
    imports_stack: Vec<FxHashSet<String>>,
    /// Exported names not (yet) declared at the top level, in source order.
    undefined_exports: OrderedMap<String, Position>,
    in_module: bool,
}

impl ScopeHandler {
    pub fn new(in_module: bool) -> Self {
        Self {
            scope_stack: Vec::new(),
            imports_stack: vec![FxHashSet::default()],
            undefined_exports: OrderedMap::new(),
            in_module,
        }
    }

    pub fn in_module(&self) -> bool {
        self.in_module
    }

    pub fn depth(&self) -> usize {
        self.scope_stack.len()
    }

    pub fn enter(&mut self, flags: ScopeFlags) {
        tracing::trace!(?flags, depth = self.scope_stack.len(), "enter scope");
        if flags == ScopeFlags::TS_MODULE {
            self.imports_stack.push(FxHashSet::default());
        }
        self.scope_stack.push(Scope::new(flags));
    }

    pub fn exit(&mut self) -> ScopeFlags {
        let flags = self.scope_stack.pop().map(|s| s.flags).unwrap_or_default();
        if flags == ScopeFlags::TS_MODULE && self.imports_stack.len() > 1 {
            self.imports_stack.pop();
        }
        flags
    }

    /// Pops scopes until `depth` remain. Returns the flags of the last scope
    /// popped, which is the one entered at `depth`.
    pub fn exit_to(&mut self, depth: usize) -> ScopeFlags {
        let mut flags = ScopeFlags::empty();
        while self.scope_stack.len() > depth {
            flags = self.exit();
        }
        flags
    }

    pub fn current_scope(&self) -> Option<&Scope> {
        self.scope_stack.last()
    }

    fn current_flags(&self) -> ScopeFlags {
        self.current_scope().map(|s| s.flags).unwrap_or_default()
    }

    /// Flags of the nearest scope that `var` hoists to.
    pub fn current_var_scope_flags(&self) -> ScopeFlags {
        self.scope_stack
            .iter()
            .rev()
            .map(|s| s.flags)
            .find(|f| f.intersects(ScopeFlags::VAR))
            .unwrap_or_default()
    }

    /// Flags of the nearest scope that binds `this`.
    pub fn current_this_scope_flags(&self) -> ScopeFlags {
        self.scope_stack
            .iter()
            .rev()
            .map(|s| s.flags)
            .find(|f| {
                f.intersects(ScopeFlags::VAR | ScopeFlags::CLASS) && !f.contains(ScopeFlags::ARROW)
            })
            .unwrap_or_default()
    }

    pub fn in_top_level(&self) -> bool {
        self.current_flags().contains(ScopeFlags::PROGRAM)
    }

    pub fn in_function(&self) -> bool {
        self.current_var_scope_flags().contains(ScopeFlags::FUNCTION)
    }

    pub fn allow_super(&self) -> bool {
        self.current_this_scope_flags().contains(ScopeFlags::SUPER)
    }

    pub fn allow_direct_super(&self) -> bool {
        self.current_this_scope_flags()
            .contains(ScopeFlags::DIRECT_SUPER)
    }

    pub fn in_class(&self) -> bool {
        self.current_this_scope_flags().contains(ScopeFlags::CLASS)
    }

    pub fn in_class_and_not_in_non_arrow_function(&self) -> bool {
        let flags = self.current_this_scope_flags();
        flags.contains(ScopeFlags::CLASS) && !flags.contains(ScopeFlags::FUNCTION)
    }

    pub fn in_static_block(&self) -> bool {
        for scope in self.scope_stack.iter().rev() {
            if scope.flags.contains(ScopeFlags::STATIC_BLOCK) {
                return true;
            }
            if scope.flags.intersects(ScopeFlags::VAR | ScopeFlags::CLASS) {
                return false;
            }
        }
        false
    }

    pub fn in_non_arrow_function(&self) -> bool {
        self.current_this_scope_flags().contains(ScopeFlags::FUNCTION)
    }

    pub fn treat_functions_as_var(&self) -> bool {
        self.current_scope()
            .is_some_and(|s| self.treat_functions_as_var_in_scope(s))
    }

    fn treat_functions_as_var_in_scope(&self, scope: &Scope) -> bool {
        scope
            .flags
            .intersects(ScopeFlags::FUNCTION | ScopeFlags::STATIC_BLOCK)
            || (!self.in_module && scope.flags.contains(ScopeFlags::PROGRAM))
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// Declares `name` in the current scope (or, for `var`, every scope up
    /// to the nearest var scope). Returns the redeclaration errors found.
    pub fn declare_name(&mut self, name: &str, flags: BindingFlags, loc: Position) -> Vec<ParseError> {
        let mut errors = Vec::new();
        if self.scope_stack.is_empty() {
            return errors;
        }

        if flags.contains(BindingFlags::FLAG_TS_IMPORT) {
            if self.has_import(name, true) {
                errors.push(VAR_REDECLARATION.at(loc, &[name]));
            }
            if let Some(imports) = self.imports_stack.last_mut() {
                imports.insert(name.to_string());
            }
            return errors;
        }

        let top = self.scope_stack.len() - 1;
        if flags.contains(BindingFlags::FLAG_TS_EXPORT_ONLY) {
            self.maybe_export_defined(top, name);
            self.scope_stack[top].export_only.insert(name.to_string());
            return errors;
        }

        let mut index = top;
        if flags.intersects(BindingFlags::SCOPE_LEXICAL | BindingFlags::SCOPE_FUNCTION) {
            self.check_redeclaration_in_scope(top, name, flags, loc, &mut errors);
            let scope = &mut self.scope_stack[top];
            if flags.contains(BindingFlags::SCOPE_FUNCTION) {
                scope.functions.insert(name.to_string());
            } else {
                scope.lexical.insert(name.to_string());
            }
            if flags.contains(BindingFlags::SCOPE_LEXICAL) {
                self.maybe_export_defined(top, name);
            }
        } else if flags.contains(BindingFlags::SCOPE_VAR) {
            for i in (0..=top).rev() {
                index = i;
                self.check_redeclaration_in_scope(i, name, flags, loc, &mut errors);
                self.scope_stack[i].var.insert(name.to_string());
                self.maybe_export_defined(i, name);
                if self.scope_stack[i].flags.intersects(ScopeFlags::VAR) {
                    break;
                }
            }
        }
        self.maybe_export_defined(index, name);

        if flags.contains(BindingFlags::KIND_TYPE) {
            if !flags.contains(BindingFlags::KIND_VALUE) {
                self.check_redeclaration_in_scope(top, name, flags, loc, &mut errors);
                self.maybe_export_defined(top, name);
            }
            self.scope_stack[top].types.insert(name.to_string());
        }
        let scope = &mut self.scope_stack[top];
        if flags.contains(BindingFlags::FLAG_TS_ENUM) {
            scope.enums.insert(name.to_string());
        }
        if flags.contains(BindingFlags::FLAG_TS_CONST_ENUM) {
            scope.const_enums.insert(name.to_string());
        }
        if flags.contains(BindingFlags::FLAG_CLASS) {
            scope.classes.insert(name.to_string());
        }
        errors
    }

    fn maybe_export_defined(&mut self, index: usize, name: &str) {
        if self.in_module && self.scope_stack[index].flags.contains(ScopeFlags::PROGRAM) {
            self.undefined_exports.remove(&name.to_string());
        }
    }

    fn check_redeclaration_in_scope(
        &self,
        index: usize,
        name: &str,
        flags: BindingFlags,
        loc: Position,
        errors: &mut Vec<ParseError>,
    ) {
        if self.is_redeclared_in_scope(&self.scope_stack[index], name, flags) {
            errors.push(VAR_REDECLARATION.at(loc, &[name]));
        }
    }

    /// The redeclaration rule for one scope.
    pub fn is_redeclared_in_scope(&self, scope: &Scope, name: &str, flags: BindingFlags) -> bool {
        if scope.enums.contains(name) {
            if flags.contains(BindingFlags::FLAG_TS_ENUM) {
                let is_const = flags.contains(BindingFlags::FLAG_TS_CONST_ENUM);
                return is_const != scope.const_enums.contains(name);
            }
            return true;
        }
        if flags.contains(BindingFlags::FLAG_CLASS) && scope.classes.contains(name) {
            return scope.lexical.contains(name) && flags.contains(BindingFlags::KIND_VALUE);
        }
        if flags.contains(BindingFlags::KIND_TYPE) && scope.types.contains(name) {
            return true;
        }

        if !flags.contains(BindingFlags::KIND_VALUE) {
            return false;
        }
        if flags.contains(BindingFlags::SCOPE_LEXICAL) {
            return scope.lexical.contains(name)
                || scope.functions.contains(name)
                || scope.var.contains(name);
        }
        if flags.contains(BindingFlags::SCOPE_FUNCTION) {
            return scope.lexical.contains(name)
                || (!self.treat_functions_as_var_in_scope(scope) && scope.var.contains(name));
        }
        let shadows_catch_param = scope.flags.contains(ScopeFlags::SIMPLE_CATCH)
            && scope.lexical.first().map(String::as_str) == Some(name);
        (scope.lexical.contains(name) && !shadows_catch_param)
            || (!self.treat_functions_as_var_in_scope(scope) && scope.functions.contains(name))
    }

    /// Whether `name` is bound by an import-equals declaration in the
    /// current module boundary (or, without `allow_shadow`, at the root).
    pub fn has_import(&self, name: &str, allow_shadow: bool) -> bool {
        let len = self.imports_stack.len();
        if self.imports_stack[len - 1].contains(name) {
            return true;
        }
        !allow_shadow && len > 1 && self.imports_stack[0].contains(name)
    }

    // ========================================================================
    // References
    // ========================================================================

    /// Checks a reference to `name` from a local export clause. Names that
    /// are not bound at the top level in any namespace are held until the
    /// program scope closes, since a later declaration may still bind them.
    pub fn check_identifier_reference(&mut self, name: &str, loc: Position) {
        let Some(top_level) = self.scope_stack.first() else {
            return;
        };
        if top_level.has_binding(name) || self.has_import(name, false) {
            return;
        }
        self.undefined_exports.insert(name.to_string(), loc);
    }

    /// Errors for exported names that were never declared, in source order.
    pub fn undefined_export_errors(&self) -> Vec<ParseError> {
        self.undefined_exports
            .iter()
            .map(|(name, loc)| MODULE_EXPORT_UNDEFINED.at(*loc, &[name.as_str()]))
            .collect()
    }

    /// Looks `name` up as a value from the current scope outwards.
    pub fn is_value_in_scope(&self, name: &str) -> bool {
        self.scope_stack.iter().rev().any(|s| s.has_value(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(index: u32) -> Position {
        Position::new(1, index, index)
    }

    #[test]
    fn test_exit_to_unwinds_inner_scopes() {
        let mut scopes = ScopeHandler::new(false);
        scopes.enter(ScopeFlags::PROGRAM);
        scopes.enter(ScopeFlags::FUNCTION | ScopeFlags::ARROW);
        scopes.enter(ScopeFlags::OTHER);
        scopes.enter(ScopeFlags::OTHER);
        let exited = scopes.exit_to(1);
        assert!(exited.contains(ScopeFlags::ARROW));
        assert_eq!(scopes.depth(), 1);
        assert!(scopes.exit_to(1).is_empty());
    }

    #[test]
    fn test_var_hoists_to_function_scope() {
        let mut scopes = ScopeHandler::new(false);
        scopes.enter(ScopeFlags::PROGRAM);
        scopes.enter(ScopeFlags::FUNCTION);
        scopes.enter(ScopeFlags::OTHER);
        assert!(scopes.declare_name("x", BindingFlags::VAR, at(0)).is_empty());
        scopes.exit();
        assert!(scopes.current_scope().unwrap().has_value("x"));
        scopes.exit();
        assert!(!scopes.current_scope().unwrap().has_value("x"));
    }

    #[test]
    fn test_let_after_var_in_block_conflicts() {
        let mut scopes = ScopeHandler::new(false);
        scopes.enter(ScopeFlags::PROGRAM);
        scopes.enter(ScopeFlags::OTHER);
        assert!(scopes.declare_name("x", BindingFlags::VAR, at(0)).is_empty());
        let errors = scopes.declare_name("x", BindingFlags::LEXICAL, at(5));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is(&VAR_REDECLARATION));
    }

    #[test]
    fn test_catch_param_may_be_redeclared_by_var() {
        let mut scopes = ScopeHandler::new(false);
        scopes.enter(ScopeFlags::PROGRAM);
        scopes.enter(ScopeFlags::SIMPLE_CATCH);
        assert!(scopes.declare_name("e", BindingFlags::CATCH_PARAM, at(0)).is_empty());
        assert!(scopes.declare_name("e", BindingFlags::VAR, at(3)).is_empty());
    }

    #[test]
    fn test_sloppy_top_level_functions_are_var_like() {
        let mut script = ScopeHandler::new(false);
        script.enter(ScopeFlags::PROGRAM);
        assert!(script.declare_name("f", BindingFlags::FUNCTION, at(0)).is_empty());
        assert!(script.declare_name("f", BindingFlags::VAR, at(1)).is_empty());

        let mut module = ScopeHandler::new(true);
        module.enter(ScopeFlags::PROGRAM);
        assert!(module.declare_name("f", BindingFlags::FUNCTION, at(0)).is_empty());
        assert_eq!(module.declare_name("f", BindingFlags::VAR, at(1)).len(), 1);
    }

    #[test]
    fn test_this_scope_skips_arrows() {
        let mut scopes = ScopeHandler::new(false);
        scopes.enter(ScopeFlags::PROGRAM);
        scopes.enter(ScopeFlags::CLASS);
        scopes.enter(ScopeFlags::FUNCTION | ScopeFlags::SUPER);
        scopes.enter(ScopeFlags::FUNCTION | ScopeFlags::ARROW);
        assert!(scopes.allow_super());
        assert!(scopes.in_non_arrow_function());
        assert!(scopes.in_function());
    }

    #[test]
    fn test_export_resolved_by_later_declaration() {
        let mut scopes = ScopeHandler::new(true);
        scopes.enter(ScopeFlags::PROGRAM);
        scopes.check_identifier_reference("later", at(9));
        scopes.check_identifier_reference("missing", at(20));
        scopes.declare_name("later", BindingFlags::LEXICAL, at(30));
        let errors = scopes.undefined_export_errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("missing"));
        assert_eq!(errors[0].pos(), 20);
    }
}
