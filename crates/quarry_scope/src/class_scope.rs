//! Private name tracking for class bodies.
//!
//! A private name may be used before its declaration inside the same class
//! body, so unresolved uses are held per class and handed outwards when the
//! class closes. Only the outermost class reports them.

use crate::flags::ClassElementFlags;
use quarry_core::collections::{FxHashSet, OrderedMap};
use quarry_core::text::Position;
use quarry_diagnostics::messages::{INVALID_PRIVATE_FIELD_RESOLUTION, PRIVATE_NAME_REDECLARATION};
use quarry_diagnostics::ParseError;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default, PartialEq)]
struct ClassScope {
    private_names: FxHashSet<String>,
    /// Getters or setters still waiting for their counterpart.
    lone_accessors: FxHashMap<String, ClassElementFlags>,
    undefined_private_names: OrderedMap<String, Position>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassScopeHandler {
    stack: Vec<ClassScope>,
}

impl ClassScopeHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn enter(&mut self) {
        self.stack.push(ClassScope::default());
    }

    /// Closes the innermost class body. Returns the errors for private names
    /// that no enclosing class can still declare.
    pub fn exit(&mut self) -> Vec<ParseError> {
        let Some(closed) = self.stack.pop() else {
            return Vec::new();
        };
        let mut errors = Vec::new();
        for (name, loc) in closed.undefined_private_names.iter() {
            match self.stack.last_mut() {
                Some(parent) => parent
                    .undefined_private_names
                    .insert_if_absent(name.clone(), *loc),
                None => errors.push(INVALID_PRIVATE_FIELD_RESOLUTION.at(*loc, &[name.as_str()])),
            }
        }
        errors
    }

    /// Declares `#name` in the innermost class. A getter and a setter with
    /// the same staticness may share a name; anything else is a duplicate.
    pub fn declare_private_name(
        &mut self,
        name: &str,
        element: ClassElementFlags,
        loc: Position,
    ) -> Option<ParseError> {
        let scope = self.stack.last_mut()?;
        let mut redefined = scope.private_names.contains(name);

        if element.intersects(ClassElementFlags::ACCESSOR) {
            match scope.lone_accessors.get(name).copied().filter(|_| redefined) {
                Some(previous) => {
                    let same_kind = (previous & ClassElementFlags::ACCESSOR)
                        == (element & ClassElementFlags::ACCESSOR);
                    let same_static = previous.contains(ClassElementFlags::STATIC)
                        == element.contains(ClassElementFlags::STATIC);
                    redefined = same_kind || !same_static;
                    if !redefined {
                        scope.lone_accessors.remove(name);
                    }
                }
                None if !redefined => {
                    scope.lone_accessors.insert(name.to_string(), element);
                }
                None => {}
            }
        }

        scope.private_names.insert(name.to_string());
        scope.undefined_private_names.remove(&name.to_string());
        redefined.then(|| PRIVATE_NAME_REDECLARATION.at(loc, &[name]))
    }

    /// Records a use of `#name`. Outside of any class body this is an error
    /// right away.
    pub fn use_private_name(&mut self, name: &str, loc: Position) -> Option<ParseError> {
        if self.stack.iter().any(|s| s.private_names.contains(name)) {
            return None;
        }
        match self.stack.last_mut() {
            Some(innermost) => {
                innermost.undefined_private_names.insert(name.to_string(), loc);
                None
            }
            None => Some(INVALID_PRIVATE_FIELD_RESOLUTION.at(loc, &[name])),
        }
    }
}
