//! Scope, binding, class-element and production-parameter flags.

bitflags::bitflags! {
    /// What kind of boundary a scope is.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ScopeFlags: u16 {
        const PROGRAM      = 1 << 0;
        const FUNCTION     = 1 << 1;
        const ARROW        = 1 << 2;
        /// `catch (e)` with a plain identifier parameter.
        const SIMPLE_CATCH = 1 << 3;
        const SUPER        = 1 << 4;
        const DIRECT_SUPER = 1 << 5;
        const CLASS        = 1 << 6;
        const STATIC_BLOCK = 1 << 7;
        /// A `namespace`/`module` body.
        const TS_MODULE    = 1 << 8;

        /// Scopes that `var` declarations hoist to.
        const VAR = Self::PROGRAM.bits()
            | Self::FUNCTION.bits()
            | Self::STATIC_BLOCK.bits()
            | Self::TS_MODULE.bits();
    }
}

impl ScopeFlags {
    /// A plain block.
    pub const OTHER: ScopeFlags = ScopeFlags::empty();
}

bitflags::bitflags! {
    /// How a declared name binds: which namespaces it occupies, where it
    /// hoists to, and extra markers for the type-namespace rules.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BindingFlags: u16 {
        const KIND_VALUE       = 1 << 0;
        const KIND_TYPE        = 1 << 1;

        const SCOPE_VAR        = 1 << 2;
        const SCOPE_LEXICAL    = 1 << 3;
        const SCOPE_FUNCTION   = 1 << 4;

        /// Checked for validity but never declared.
        const FLAG_NONE        = 1 << 5;
        const FLAG_CLASS       = 1 << 6;
        const FLAG_TS_ENUM     = 1 << 7;
        const FLAG_TS_CONST_ENUM = 1 << 8;
        const FLAG_TS_EXPORT_ONLY = 1 << 9;
        const FLAG_TS_IMPORT   = 1 << 10;

        const CLASS = Self::KIND_VALUE.bits() | Self::KIND_TYPE.bits() | Self::SCOPE_LEXICAL.bits() | Self::FLAG_CLASS.bits();
        const LEXICAL = Self::KIND_VALUE.bits() | Self::SCOPE_LEXICAL.bits();
        /// `catch` clause parameter.
        const CATCH_PARAM = Self::LEXICAL.bits();
        const VAR = Self::KIND_VALUE.bits() | Self::SCOPE_VAR.bits();
        const FUNCTION = Self::KIND_VALUE.bits() | Self::SCOPE_FUNCTION.bits();
        const TS_INTERFACE = Self::KIND_TYPE.bits() | Self::FLAG_CLASS.bits();
        const TS_TYPE = Self::KIND_TYPE.bits();
        const TS_ENUM = Self::KIND_VALUE.bits() | Self::KIND_TYPE.bits() | Self::SCOPE_LEXICAL.bits() | Self::FLAG_TS_ENUM.bits();
        const TS_CONST_ENUM = Self::TS_ENUM.bits() | Self::FLAG_TS_CONST_ENUM.bits();
        const TS_AMBIENT = Self::FLAG_TS_EXPORT_ONLY.bits();
        const TS_NAMESPACE = Self::FLAG_TS_EXPORT_ONLY.bits();
        const TS_TYPE_IMPORT = Self::KIND_TYPE.bits() | Self::FLAG_TS_IMPORT.bits();
        /// Binding position that declares nothing (e.g. a parenthesized
        /// assignment target).
        const NONE = Self::FLAG_NONE.bits();
        /// Assignment target outside any binding declaration.
        const OUTSIDE = Self::KIND_VALUE.bits() | Self::FLAG_NONE.bits();
    }
}

bitflags::bitflags! {
    /// Private class element kinds, for accessor pairing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClassElementFlags: u8 {
        const SETTER = 1 << 0;
        const GETTER = 1 << 1;
        const STATIC = 1 << 2;

        const ACCESSOR = Self::GETTER.bits() | Self::SETTER.bits();
        const STATIC_GETTER = Self::STATIC.bits() | Self::GETTER.bits();
        const STATIC_SETTER = Self::STATIC.bits() | Self::SETTER.bits();
    }
}

impl ClassElementFlags {
    pub const OTHER: ClassElementFlags = ClassElementFlags::empty();
}

bitflags::bitflags! {
    /// Production parameters: whether `yield`, `await`, `return` and `in`
    /// are available in the current function body.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ParamFlags: u8 {
        const YIELD  = 1 << 0;
        const AWAIT  = 1 << 1;
        const RETURN = 1 << 2;
        const IN     = 1 << 3;
    }
}

/// Parameters for a function with the given modifiers.
pub fn function_flags(is_async: bool, is_generator: bool) -> ParamFlags {
    let mut flags = ParamFlags::empty();
    if is_async {
        flags |= ParamFlags::AWAIT;
    }
    if is_generator {
        flags |= ParamFlags::YIELD;
    }
    flags
}
