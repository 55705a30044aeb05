//! The message catalogue.
//!
//! Codes are grouped by range: 1xxx tokenizer, 2xxx grammar, 3xxx bindings,
//! 4xxx plugin configuration, 5xxx JSX, 6xxx TypeScript.

use crate::{DiagnosticMessage, ErrorKind};

macro_rules! diag {
    (fatal $code:expr, $kind:ident, $reason:ident, $msg:expr) => {
        DiagnosticMessage {
            code: $code,
            reason: stringify!($reason),
            kind: ErrorKind::$kind,
            recoverable: false,
            message: $msg,
        }
    };
    ($code:expr, Lex, $reason:ident, $msg:expr) => {
        diag!(fatal $code, Lex, $reason, $msg)
    };
    ($code:expr, PluginConfiguration, $reason:ident, $msg:expr) => {
        diag!(fatal $code, PluginConfiguration, $reason, $msg)
    };
    ($code:expr, $kind:ident, $reason:ident, $msg:expr) => {
        DiagnosticMessage {
            code: $code,
            reason: stringify!($reason),
            kind: ErrorKind::$kind,
            recoverable: true,
            message: $msg,
        }
    };
}

// ============================================================================
// Tokenizer errors (1000-1099)
// ============================================================================
pub const UNTERMINATED_STRING: DiagnosticMessage = diag!(1001, Lex, UnterminatedString, "Unterminated string constant.");
pub const UNTERMINATED_TEMPLATE: DiagnosticMessage = diag!(1002, Lex, UnterminatedTemplate, "Unterminated template.");
pub const UNTERMINATED_COMMENT: DiagnosticMessage = diag!(1003, Lex, UnterminatedComment, "Unterminated comment.");
pub const UNTERMINATED_REGEXP: DiagnosticMessage = diag!(1004, Lex, UnterminatedRegExp, "Unterminated regular expression.");
pub const MALFORMED_REGEXP_FLAGS: DiagnosticMessage = diag!(1005, Lex, MalformedRegExpFlags, "Invalid regular expression flag.");
pub const DUPLICATE_REGEXP_FLAGS: DiagnosticMessage = diag!(1006, Lex, DuplicateRegExpFlags, "Duplicate regular expression flag.");
pub const INVALID_ESCAPE_SEQUENCE: DiagnosticMessage = diag!(1007, Lex, InvalidEscapeSequence, "Bad character escape sequence.");
pub const INVALID_CODE_POINT: DiagnosticMessage = diag!(1008, Lex, InvalidCodePoint, "Code point out of bounds.");
pub const INVALID_DIGIT: DiagnosticMessage = diag!(1009, Lex, InvalidDigit, "Expected number in radix {0}.");
pub const INVALID_NUMBER: DiagnosticMessage = diag!(1010, Lex, InvalidNumber, "Invalid number.");
pub const INVALID_OR_MISSING_EXPONENT: DiagnosticMessage = diag!(1011, Lex, InvalidOrMissingExponent, "Floating-point numbers require a valid exponent after the 'e'.");
pub const NUMBER_IDENTIFIER: DiagnosticMessage = diag!(1012, Lex, NumberIdentifier, "Identifier directly after number.");
pub const UNEXPECTED_NUMERIC_SEPARATOR: DiagnosticMessage = diag!(1013, Lex, UnexpectedNumericSeparator, "A numeric separator is only allowed between two digits.");
pub const INVALID_BIGINT_LITERAL: DiagnosticMessage = diag!(1014, Lex, InvalidBigIntLiteral, "Invalid BigIntLiteral.");
pub const MISSING_UNICODE_ESCAPE: DiagnosticMessage = diag!(1015, Lex, MissingUnicodeEscape, "Expecting Unicode escape sequence \\uXXXX.");
pub const ESCAPED_CHAR_NOT_AN_IDENTIFIER: DiagnosticMessage = diag!(1016, Lex, EscapedCharNotAnIdentifier, "Invalid Unicode escape.");
pub const INVALID_CHARACTER: DiagnosticMessage = diag!(1017, Lex, InvalidOrUnexpectedToken, "Unexpected character '{0}'.");
pub const UNTERMINATED_JSX_CONTENT: DiagnosticMessage = diag!(1018, Lex, UnterminatedJsxContent, "Unterminated JSX contents.");

// ============================================================================
// Grammar errors (2000-2199)
// ============================================================================
pub const UNEXPECTED_TOKEN: DiagnosticMessage = diag!(fatal 2001, Syntax, UnexpectedToken, "Unexpected token.");
pub const UNEXPECTED_TOKEN_EXPECTED: DiagnosticMessage = diag!(fatal 2002, Syntax, UnexpectedToken, "Unexpected token, expected \"{0}\".");
pub const MISSING_SEMICOLON: DiagnosticMessage = diag!(2003, Syntax, MissingSemicolon, "Missing semicolon.");
pub const UNEXPECTED_KEYWORD: DiagnosticMessage = diag!(2004, Syntax, UnexpectedKeyword, "Unexpected keyword '{0}'.");
pub const UNEXPECTED_RESERVED_WORD: DiagnosticMessage = diag!(2005, Syntax, UnexpectedReservedWord, "Unexpected reserved word '{0}'.");
pub const INVALID_ESCAPED_RESERVED_WORD: DiagnosticMessage = diag!(2006, Syntax, InvalidEscapedReservedWord, "Escape sequence in keyword {0}.");
pub const STRICT_WITH: DiagnosticMessage = diag!(2007, Syntax, StrictWith, "'with' in strict mode.");
pub const STRICT_DELETE: DiagnosticMessage = diag!(2008, Syntax, StrictDelete, "Deleting local variable in strict mode.");
pub const STRICT_FUNCTION: DiagnosticMessage = diag!(2009, Syntax, StrictFunction, "In strict mode code, functions can only be declared at top level or inside a block.");
pub const STRICT_OCTAL_LITERAL: DiagnosticMessage = diag!(2010, Syntax, StrictOctalLiteral, "Legacy octal literals are not allowed in strict mode.");
pub const STRICT_NUMERIC_ESCAPE: DiagnosticMessage = diag!(2011, Syntax, StrictNumericEscape, "The only valid numeric escape in strict mode is '\\0'.");
pub const ILLEGAL_RETURN: DiagnosticMessage = diag!(2012, Syntax, IllegalReturn, "'return' outside of function.");
pub const ILLEGAL_BREAK_CONTINUE: DiagnosticMessage = diag!(2013, Syntax, IllegalBreakContinue, "Unsyntactic {0}.");
pub const LABEL_REDECLARATION: DiagnosticMessage = diag!(2014, Syntax, LabelRedeclaration, "Label '{0}' is already declared.");
pub const NEWLINE_AFTER_THROW: DiagnosticMessage = diag!(2015, Syntax, NewlineAfterThrow, "Illegal newline after throw.");
pub const MULTIPLE_DEFAULTS_IN_SWITCH: DiagnosticMessage = diag!(2016, Syntax, MultipleDefaultsInSwitch, "Multiple default clauses.");
pub const NO_CATCH_OR_FINALLY: DiagnosticMessage = diag!(2017, Syntax, NoCatchOrFinally, "Missing catch or finally clause.");
pub const FOR_IN_OF_LOOP_INITIALIZER: DiagnosticMessage = diag!(2018, Syntax, ForInOfLoopInitializer, "'{0}' loop variable declaration may not have an initializer.");
pub const FOR_OF_LET: DiagnosticMessage = diag!(2019, Syntax, ForOfLet, "The left-hand side of a for-of loop may not start with 'let'.");
pub const FOR_OF_ASYNC: DiagnosticMessage = diag!(2020, Syntax, ForOfAsync, "The left-hand side of a for-of loop may not be 'async'.");
pub const DECLARATION_MISSING_INITIALIZER: DiagnosticMessage = diag!(2021, Syntax, DeclarationMissingInitializer, "Missing initializer in {0} declaration.");
pub const IMPORT_OUTSIDE_MODULE: DiagnosticMessage = diag!(2022, Syntax, ImportOutsideModule, "'import' and 'export' may appear only with 'sourceType: \"module\"'.");
pub const UNEXPECTED_IMPORT_EXPORT: DiagnosticMessage = diag!(2023, Syntax, UnexpectedImportExport, "'import' and 'export' may only appear at the top level.");
pub const AWAIT_NOT_IN_ASYNC_CONTEXT: DiagnosticMessage = diag!(2024, Syntax, AwaitNotInAsyncContext, "'await' is only allowed within async functions and at the top levels of modules.");
pub const AWAIT_IN_PARAMETER: DiagnosticMessage = diag!(2025, Syntax, AwaitExpressionFormalParameter, "'await' is not allowed in async function parameters.");
pub const YIELD_IN_PARAMETER: DiagnosticMessage = diag!(2026, Syntax, YieldInParameter, "Yield expression is not allowed in formal parameters.");
pub const ILLEGAL_LANGUAGE_MODE_DIRECTIVE: DiagnosticMessage = diag!(2027, Syntax, IllegalLanguageModeDirective, "Illegal 'use strict' directive in function with non-simple parameter list.");
pub const SUPER_NOT_ALLOWED: DiagnosticMessage = diag!(2028, Syntax, SuperNotAllowed, "'super()' is only valid inside a class constructor of a subclass.");
pub const UNEXPECTED_SUPER: DiagnosticMessage = diag!(2029, Syntax, UnexpectedSuper, "'super' is only allowed in object methods and classes.");
pub const UNSUPPORTED_SUPER: DiagnosticMessage = diag!(2030, Syntax, UnsupportedSuper, "'super' can only be used with function calls or in property accesses.");
pub const CONSTRUCTOR_IS_ACCESSOR: DiagnosticMessage = diag!(2031, Syntax, ConstructorIsAccessor, "Class constructor may not be an accessor.");
pub const CONSTRUCTOR_IS_GENERATOR: DiagnosticMessage = diag!(2032, Syntax, ConstructorIsGenerator, "Constructor can't be a generator.");
pub const CONSTRUCTOR_IS_ASYNC: DiagnosticMessage = diag!(2033, Syntax, ConstructorIsAsync, "Constructor can't be an async function.");
pub const DUPLICATE_CONSTRUCTOR: DiagnosticMessage = diag!(2034, Syntax, DuplicateConstructor, "Duplicate constructor in the same class.");
pub const CONSTRUCTOR_CLASS_FIELD: DiagnosticMessage = diag!(2035, Syntax, ConstructorClassField, "Classes may not have a field named 'constructor'.");
pub const CONSTRUCTOR_CLASS_PRIVATE_FIELD: DiagnosticMessage = diag!(2036, Syntax, ConstructorClassPrivateField, "Classes may not have a private field named '#constructor'.");
pub const STATIC_PROTOTYPE: DiagnosticMessage = diag!(2037, Syntax, StaticPrototype, "Classes may not have static property named prototype.");
pub const BAD_GETTER_ARITY: DiagnosticMessage = diag!(2038, Syntax, BadGetterArity, "A 'get' accessor must not have any formal parameters.");
pub const BAD_SETTER_ARITY: DiagnosticMessage = diag!(2039, Syntax, BadSetterArity, "A 'set' accessor must have exactly one formal parameter.");
pub const BAD_SETTER_REST_PARAMETER: DiagnosticMessage = diag!(2040, Syntax, BadSetterRestParameter, "A 'set' accessor function argument must not be a rest parameter.");
pub const DUPLICATE_PROTO: DiagnosticMessage = diag!(2041, Syntax, DuplicateProto, "Redefinition of __proto__ property.");
pub const INVALID_COVER_INITIALIZED_NAME: DiagnosticMessage = diag!(2042, Syntax, InvalidCoverInitializedName, "Invalid shorthand property initializer.");
pub const MIXING_COALESCE_WITH_LOGICAL: DiagnosticMessage = diag!(2043, Syntax, MixingCoalesceWithLogical, "Nullish coalescing operator(??) requires parens when mixing with logical operators.");
pub const UNEXPECTED_TOKEN_UNARY_EXPONENTIATION: DiagnosticMessage = diag!(2044, Syntax, UnexpectedTokenUnaryExponentiation, "Illegal expression. Wrap left hand side or entire exponentiation in parentheses.");
pub const OPTIONAL_CHAINING_NO_NEW: DiagnosticMessage = diag!(2045, Syntax, OptionalChainingNoNew, "Constructors in/after an Optional Chain are not allowed.");
pub const OPTIONAL_CHAINING_NO_TEMPLATE: DiagnosticMessage = diag!(2046, Syntax, OptionalChainingNoTemplate, "Tagged Template Literals are not allowed in optionalChain.");
pub const UNEXPECTED_PRIVATE_FIELD: DiagnosticMessage = diag!(2047, Syntax, UnexpectedPrivateField, "Unexpected private name.");
pub const IMPORT_META_OUTSIDE_MODULE: DiagnosticMessage = diag!(2048, Syntax, ImportMetaOutsideModule, "import.meta may appear only with 'sourceType: \"module\"'.");
pub const UNSUPPORTED_META_PROPERTY: DiagnosticMessage = diag!(2049, Syntax, UnsupportedMetaProperty, "The only valid meta property for {0} is {0}.{1}.");
pub const UNEXPECTED_NEW_TARGET: DiagnosticMessage = diag!(2050, Syntax, UnexpectedNewTarget, "`new.target` can only be used in functions or class properties.");
pub const IMPORT_CALL_ARITY: DiagnosticMessage = diag!(2051, Syntax, ImportCallArity, "`import()` requires exactly one or two arguments.");
pub const IMPORT_CALL_SPREAD_ARGUMENT: DiagnosticMessage = diag!(2052, Syntax, ImportCallSpreadArgument, "`...` is not allowed in `import()`.");
pub const EXPORT_BINDING_IS_STRING: DiagnosticMessage = diag!(2053, Syntax, ExportBindingIsString, "A string literal cannot be used as an exported binding without `from`.");
pub const IMPORT_BINDING_IS_STRING: DiagnosticMessage = diag!(2054, Syntax, ImportBindingIsString, "A string literal cannot be used as an imported binding.");
pub const ELEMENT_AFTER_REST: DiagnosticMessage = diag!(2055, Syntax, ElementAfterRest, "Rest element must be last element.");
pub const REST_TRAILING_COMMA: DiagnosticMessage = diag!(2056, Syntax, RestTrailingComma, "Unexpected trailing comma after rest element.");
pub const LINE_TERMINATOR_BEFORE_ARROW: DiagnosticMessage = diag!(2057, Syntax, LineTerminatorBeforeArrow, "No line break is allowed before '=>'.");
pub const MISSING_CLASS_NAME: DiagnosticMessage = diag!(2058, Syntax, MissingClassName, "A class name is required.");
pub const PATTERN_HAS_ACCESSOR: DiagnosticMessage = diag!(2059, Syntax, PatternHasAccessor, "Object pattern can't contain getter or setter.");
pub const PATTERN_HAS_METHOD: DiagnosticMessage = diag!(2060, Syntax, PatternHasMethod, "Object pattern can't contain methods.");
pub const MISSING_EQ_IN_ASSIGNMENT: DiagnosticMessage = diag!(2061, Syntax, MissingEqInAssignment, "Only '=' operator can be used for specifying default value.");
pub const INVALID_REST_ASSIGNMENT_PATTERN: DiagnosticMessage = diag!(2062, Syntax, InvalidRestAssignmentPattern, "Invalid rest operator's argument.");
pub const ACCESSOR_IS_GENERATOR: DiagnosticMessage = diag!(2063, Syntax, AccessorIsGenerator, "A {0}ter cannot be a generator.");
pub const ARGUMENTS_IN_CLASS: DiagnosticMessage = diag!(2064, Syntax, ArgumentsInClass, "'arguments' is only allowed in functions and class methods.");
pub const EXPORT_DEFAULT_FROM_AS_IDENTIFIER: DiagnosticMessage = diag!(2066, Syntax, ExportDefaultFromAsIdentifier, "'from' is not allowed as an identifier after 'export default'.");
pub const GENERATOR_IN_SINGLE_STATEMENT_CONTEXT: DiagnosticMessage = diag!(2067, Syntax, GeneratorInSingleStatementContext, "Generators can only be declared at the top level or inside a block.");
pub const ASYNC_FUNCTION_IN_SINGLE_STATEMENT_CONTEXT: DiagnosticMessage = diag!(2068, Syntax, AsyncFunctionInSingleStatementContext, "Async functions can only be declared at the top level or inside a block.");
pub const SLOPPY_FUNCTION: DiagnosticMessage = diag!(2069, Syntax, SloppyFunction, "In non-strict mode code, functions can only be declared at top level, inside a block, or as the body of an if statement.");
pub const UNEXPECTED_LEXICAL_DECLARATION: DiagnosticMessage = diag!(2070, Syntax, UnexpectedLexicalDeclaration, "Lexical declaration cannot appear in a single-statement context.");
pub const INVALID_CODE_POINT_IN_TAGLESS_TEMPLATE: DiagnosticMessage = diag!(2071, Syntax, InvalidEscapeSequenceTemplate, "Invalid escape sequence in template.");
pub const PRIVATE_NAME_REDECLARATION: DiagnosticMessage = diag!(2072, Syntax, PrivateNameRedeclaration, "Duplicate private name #{0}.");
pub const DELETE_PRIVATE_FIELD: DiagnosticMessage = diag!(2073, Syntax, DeletePrivateField, "Deleting a private field is not allowed.");
pub const INVALID_PRIVATE_FIELD_RESOLUTION: DiagnosticMessage = diag!(2074, Syntax, InvalidPrivateFieldResolution, "Private name #{0} is not defined.");
pub const YIELD_BINDING_IDENTIFIER: DiagnosticMessage = diag!(2075, Syntax, YieldBindingIdentifier, "Can not use 'yield' as identifier inside a generator.");
pub const AWAIT_BINDING_IDENTIFIER: DiagnosticMessage = diag!(2076, Syntax, AwaitBindingIdentifier, "Can not use 'await' as identifier inside an async function.");
pub const AWAIT_BINDING_IDENTIFIER_IN_STATIC_BLOCK: DiagnosticMessage = diag!(2077, Syntax, AwaitBindingIdentifierInStaticBlock, "Can not use 'await' as identifier inside a static block.");
pub const SUPER_PRIVATE_FIELD: DiagnosticMessage = diag!(2078, Syntax, SuperPrivateField, "Private fields can't be accessed on super.");
pub const INVALID_PARENTHESIZED_ARROW_PARAMETER: DiagnosticMessage = diag!(2079, Syntax, InvalidParenthesizedAssignment, "Invalid parenthesized arrow function parameter.");
pub const IMPORT_CALL_NOT_NEW_EXPRESSION: DiagnosticMessage = diag!(2080, Syntax, ImportCallNotNewExpression, "Cannot use new with import(...).");
pub const UNSUPPORTED_IMPORT: DiagnosticMessage = diag!(2081, Syntax, UnsupportedImport, "`import` can only be used in `import()` or `import.meta`.");
pub const PRIVATE_IN_EXPECTED_IN: DiagnosticMessage = diag!(2082, Syntax, PrivateInExpectedIn, "Private names are only allowed in property accesses (`obj.#{0}`) or in `in` expressions (`#{0} in obj`).");
pub const INVALID_IDENTIFIER: DiagnosticMessage = diag!(2084, Syntax, InvalidIdentifier, "Invalid identifier {0}.");
pub const UNEXPECTED_ARGUMENTS_IN_STATIC_BLOCK: DiagnosticMessage = diag!(2085, Syntax, ArgumentsInStaticBlock, "'arguments' is not allowed in class field initializer or static initialization block.");
pub const TOO_DEEPLY_NESTED: DiagnosticMessage = diag!(fatal 2086, Syntax, TooDeeplyNested, "Maximum nesting depth exceeded.");
pub const UNSUPPORTED_DEFAULT_EXPORT: DiagnosticMessage = diag!(2087, Syntax, UnsupportedDefaultExport, "Only expressions, functions or classes are allowed as the `default` export.");
pub const DESTRUCTURING_NAMED_IMPORT: DiagnosticMessage = diag!(fatal 2088, Syntax, DestructureNamedImport, "ES2015 named imports do not destructure. Use another statement for destructuring after the import.");

// ============================================================================
// Binding errors (3000-3099)
// ============================================================================
pub const VAR_REDECLARATION: DiagnosticMessage = diag!(3001, Binding, VarRedeclaration, "Identifier '{0}' has already been declared.");
pub const PARAM_DUPE: DiagnosticMessage = diag!(3002, Binding, ParamDupe, "Argument name clash.");
pub const INVALID_LHS: DiagnosticMessage = diag!(3003, Binding, InvalidLhs, "Invalid left-hand side in {0}.");
pub const INVALID_LHS_BINDING: DiagnosticMessage = diag!(3004, Binding, InvalidLhsBinding, "Binding invalid left-hand side in {0}.");
pub const INVALID_LHS_OPTIONAL_CHAINING: DiagnosticMessage = diag!(3005, Binding, InvalidLhsOptionalChaining, "Invalid optional chaining in the left-hand side of {0}.");
pub const INVALID_PARENTHESIZED_ASSIGNMENT: DiagnosticMessage = diag!(3006, Binding, InvalidParenthesizedAssignment, "Invalid parenthesized assignment pattern.");
pub const INVALID_PROPERTY_BINDING_PATTERN: DiagnosticMessage = diag!(3007, Binding, InvalidPropertyBindingPattern, "Binding member expression.");
pub const LET_IN_LEXICAL_BINDING: DiagnosticMessage = diag!(3008, Binding, LetInLexicalBinding, "'let' is not allowed to be used as a name in 'let' or 'const' declarations.");
pub const STRICT_EVAL_ARGUMENTS: DiagnosticMessage = diag!(3009, Binding, StrictEvalArguments, "Assigning to '{0}' in strict mode.");
pub const STRICT_EVAL_ARGUMENTS_BINDING: DiagnosticMessage = diag!(3010, Binding, StrictEvalArgumentsBinding, "Binding '{0}' in strict mode.");
pub const DUPLICATE_EXPORT: DiagnosticMessage = diag!(3011, Binding, DuplicateExport, "`{0}` has already been exported. Exported identifiers must be unique.");
pub const MODULE_EXPORT_UNDEFINED: DiagnosticMessage = diag!(3012, Binding, ModuleExportUndefined, "Export '{0}' is not defined.");
pub const DUPLICATE_DEFAULT_EXPORT: DiagnosticMessage = diag!(3013, Binding, DuplicateDefaultExport, "Only one default export allowed per module.");
pub const UNDECLARED_IDENTIFIER_REFERENCE: DiagnosticMessage = diag!(3014, Binding, UndeclaredReference, "'{0}' is declared only as a type and cannot be used as a value.");

// ============================================================================
// Plugin configuration errors (4000-4099)
// ============================================================================
pub const MISSING_PLUGIN: DiagnosticMessage = diag!(4001, PluginConfiguration, MissingPlugin, "This experimental syntax requires enabling the parser plugin: {0}.");
pub const MISSING_ONE_OF_PLUGINS: DiagnosticMessage = diag!(4002, PluginConfiguration, MissingOneOfPlugins, "This experimental syntax requires enabling one of the following parser plugin(s): {0}.");
pub const UNKNOWN_PLUGIN: DiagnosticMessage = diag!(4003, PluginConfiguration, UnknownPlugin, "Unknown parser plugin '{0}'.");
pub const INVALID_PLUGIN_OPTION: DiagnosticMessage = diag!(4004, PluginConfiguration, InvalidPluginOption, "Invalid option '{1}' for parser plugin '{0}'.");
pub const INVALID_PLUGIN_OPTIONS_VALUE: DiagnosticMessage = diag!(4005, PluginConfiguration, InvalidPluginOption, "The options of parser plugin '{0}' must be an object.");
pub const INCOMPATIBLE_PLUGINS: DiagnosticMessage = diag!(4006, PluginConfiguration, IncompatiblePlugins, "Parser plugin '{0}' cannot be combined with '{1}'.");
pub const INVALID_OPTIONS: DiagnosticMessage = diag!(4007, PluginConfiguration, InvalidOptions, "Invalid parser options: {0}.");

// ============================================================================
// JSX errors (5000-5099)
// ============================================================================
pub const JSX_ATTRIBUTE_IS_EMPTY: DiagnosticMessage = diag!(5001, Syntax, AttributeIsEmpty, "JSX attributes must only be assigned a non-empty expression.");
pub const JSX_MISSING_CLOSING_TAG_ELEMENT: DiagnosticMessage = diag!(5002, Syntax, MissingClosingTagElement, "Expected corresponding JSX closing tag for <{0}>.");
pub const JSX_MISSING_CLOSING_TAG_FRAGMENT: DiagnosticMessage = diag!(5003, Syntax, MissingClosingTagFragment, "Expected corresponding JSX closing tag for <>.");
pub const JSX_UNSUPPORTED_VALUE: DiagnosticMessage = diag!(5004, Syntax, UnsupportedJsxValue, "JSX value should be either an expression or a quoted JSX text.");
pub const JSX_UNEXPECTED_SEQUENCE_EXPRESSION: DiagnosticMessage = diag!(5005, Syntax, UnexpectedSequenceExpression, "Sequence expressions cannot be directly nested inside JSX. Did you mean to wrap it in parentheses (...)?");
pub const JSX_UNWRAPPED_ADJACENT_ELEMENTS: DiagnosticMessage = diag!(5006, Syntax, UnwrappedAdjacentJSXElements, "Adjacent JSX elements must be wrapped in an enclosing tag. Did you want a JSX fragment <>...</>?");
pub const JSX_UNEXPECTED_TOKEN: DiagnosticMessage = diag!(5007, Syntax, UnexpectedToken, "Unexpected token `{0}`. Did you mean `{1}` or `{'{0}'}`?");

// ============================================================================
// TypeScript errors (6000-6199)
// ============================================================================
pub const TS_ABSTRACT_METHOD_HAS_IMPLEMENTATION: DiagnosticMessage = diag!(6001, Syntax, AbstractMethodHasImplementation, "Method '{0}' cannot have an implementation because it is marked abstract.");
pub const TS_ABSTRACT_PROPERTY_HAS_INITIALIZER: DiagnosticMessage = diag!(6002, Syntax, AbstractPropertyHasInitializer, "Property '{0}' cannot have an initializer because it is marked abstract.");
pub const TS_CLASS_METHOD_HAS_DECLARE: DiagnosticMessage = diag!(6003, Syntax, ClassMethodHasDeclare, "Class methods cannot have the 'declare' modifier.");
pub const TS_CLASS_METHOD_HAS_READONLY: DiagnosticMessage = diag!(6004, Syntax, ClassMethodHasReadonly, "Class methods cannot have the 'readonly' modifier.");
pub const TS_CONSTRUCTOR_HAS_TYPE_PARAMETERS: DiagnosticMessage = diag!(6005, Syntax, ConstructorHasTypeParameters, "Type parameters cannot appear on a constructor declaration.");
pub const TS_DECLARE_CLASS_FIELD_HAS_INITIALIZER: DiagnosticMessage = diag!(6006, Syntax, DeclareClassFieldHasInitializer, "Initializers are not allowed in ambient contexts.");
pub const TS_DECLARE_FUNCTION_HAS_IMPLEMENTATION: DiagnosticMessage = diag!(6007, Syntax, DeclareFunctionHasImplementation, "An implementation cannot be declared in ambient contexts.");
pub const TS_DUPLICATE_ACCESSIBILITY_MODIFIER: DiagnosticMessage = diag!(6008, Syntax, DuplicateAccessibilityModifier, "Accessibility modifier already seen.");
pub const TS_DUPLICATE_MODIFIER: DiagnosticMessage = diag!(6009, Syntax, DuplicateModifier, "Duplicate modifier: '{0}'.");
pub const TS_EMPTY_HERITAGE_CLAUSE_TYPE: DiagnosticMessage = diag!(6010, Syntax, EmptyHeritageClauseType, "'{0}' list cannot be empty.");
pub const TS_EMPTY_TYPE_ARGUMENTS: DiagnosticMessage = diag!(6011, Syntax, EmptyTypeArguments, "Type argument list cannot be empty.");
pub const TS_EMPTY_TYPE_PARAMETERS: DiagnosticMessage = diag!(6012, Syntax, EmptyTypeParameters, "Type parameter list cannot be empty.");
pub const TS_EXPECTED_AMBIENT_AFTER_EXPORT_DECLARE: DiagnosticMessage = diag!(6013, Syntax, ExpectedAmbientAfterExportDeclare, "'export declare' must be followed by an ambient declaration.");
pub const TS_IMPORT_ALIAS_HAS_IMPORT_TYPE: DiagnosticMessage = diag!(6014, Syntax, ImportAliasHasImportType, "An import alias can not use 'import type'.");
pub const TS_INCOMPATIBLE_MODIFIERS: DiagnosticMessage = diag!(6015, Syntax, IncompatibleModifiers, "'{0}' modifier cannot be used with '{1}' modifier.");
pub const TS_INDEX_SIGNATURE_HAS_ABSTRACT: DiagnosticMessage = diag!(6016, Syntax, IndexSignatureHasAbstract, "Index signatures cannot have the 'abstract' modifier.");
pub const TS_INDEX_SIGNATURE_HAS_ACCESSIBILITY: DiagnosticMessage = diag!(6017, Syntax, IndexSignatureHasAccessibility, "Index signatures cannot have an accessibility modifier ('{0}').");
pub const TS_INDEX_SIGNATURE_HAS_DECLARE: DiagnosticMessage = diag!(6018, Syntax, IndexSignatureHasDeclare, "Index signatures cannot have the 'declare' modifier.");
pub const TS_INDEX_SIGNATURE_HAS_OVERRIDE: DiagnosticMessage = diag!(6019, Syntax, IndexSignatureHasOverride, "'override' modifier cannot appear on an index signature.");
pub const TS_INITIALIZER_NOT_ALLOWED_IN_AMBIENT_CONTEXT: DiagnosticMessage = diag!(6020, Syntax, InitializerNotAllowedInAmbientContext, "Initializers are not allowed in ambient contexts.");
pub const TS_INVALID_MODIFIER_ON_TYPE_MEMBER: DiagnosticMessage = diag!(6021, Syntax, InvalidModifierOnTypeMember, "'{0}' modifier cannot appear on a type member.");
pub const TS_INVALID_MODIFIERS_ORDER: DiagnosticMessage = diag!(6022, Syntax, InvalidModifiersOrder, "'{0}' modifier must precede '{1}' modifier.");
pub const TS_INVALID_TUPLE_MEMBER_LABEL: DiagnosticMessage = diag!(6023, Syntax, InvalidTupleMemberLabel, "Tuple members must be labeled with a simple identifier.");
pub const TS_MISSING_INTERFACE_NAME: DiagnosticMessage = diag!(6024, Syntax, MissingInterfaceName, "'interface' declarations must be followed by an identifier.");
pub const TS_MIXED_LABELED_AND_UNLABELED_ELEMENTS: DiagnosticMessage = diag!(6025, Syntax, MixedLabeledAndUnlabeledElements, "Tuple members must all have names or all not have names.");
pub const TS_NON_ABSTRACT_CLASS_HAS_ABSTRACT_METHOD: DiagnosticMessage = diag!(6026, Syntax, NonAbstractClassHasAbstractMethod, "Abstract methods can only appear within an abstract class.");
pub const TS_NON_CLASS_METHOD_PROPERTY_HAS_ABSTRACT_MODIFIER: DiagnosticMessage = diag!(6027, Syntax, NonClassMethodPropertyHasAbstractModifer, "'abstract' modifier can only appear on a class, method, or property declaration.");
pub const TS_OPTIONAL_TYPE_BEFORE_REQUIRED: DiagnosticMessage = diag!(6028, Syntax, OptionalTypeBeforeRequired, "A required element cannot follow an optional element.");
pub const TS_PATTERN_IS_OPTIONAL: DiagnosticMessage = diag!(6029, Syntax, PatternIsOptional, "A binding pattern parameter cannot be optional in an implementation signature.");
pub const TS_PRIVATE_ELEMENT_HAS_ABSTRACT: DiagnosticMessage = diag!(6030, Syntax, PrivateElementHasAbstract, "Private elements cannot have the 'abstract' modifier.");
pub const TS_PRIVATE_ELEMENT_HAS_ACCESSIBILITY: DiagnosticMessage = diag!(6031, Syntax, PrivateElementHasAccessibility, "Private elements cannot have an accessibility modifier ('{0}').");
pub const TS_READONLY_FOR_METHOD_SIGNATURE: DiagnosticMessage = diag!(6032, Syntax, ReadonlyForMethodSignature, "'readonly' modifier can only appear on a property declaration or index signature.");
pub const TS_RESERVED_ARROW_TYPE_PARAM: DiagnosticMessage = diag!(6033, Syntax, ReservedArrowTypeParam, "This syntax is reserved in files with the .mts or .cts extension. Add a trailing comma, as in `<T,>() => ...`.");
pub const TS_RESERVED_TYPE_ASSERTION: DiagnosticMessage = diag!(6034, Syntax, ReservedTypeAssertion, "This syntax is reserved in files with the .mts or .cts extension. Use an `as` expression instead.");
pub const TS_SINGLE_TYPE_PARAMETER_WITHOUT_TRAILING_COMMA: DiagnosticMessage = diag!(6035, Syntax, SingleTypeParameterWithoutTrailingComma, "Single type parameter {0} should have a trailing comma. Example usage: <{0},>.");
pub const TS_STATIC_BLOCK_CANNOT_HAVE_MODIFIER: DiagnosticMessage = diag!(6036, Syntax, StaticBlockCannotHaveModifier, "Static class blocks cannot have any modifier.");
pub const TS_TYPE_ANNOTATION_AFTER_ASSIGN: DiagnosticMessage = diag!(6037, Syntax, TypeAnnotationAfterAssign, "Type annotations must come before default assignments, e.g. instead of `age = 25: number` use `age: number = 25`.");
pub const TS_TYPE_IMPORT_CANNOT_SPECIFY_DEFAULT_AND_NAMED: DiagnosticMessage = diag!(6038, Syntax, TypeImportCannotSpecifyDefaultAndNamed, "A type-only import can specify a default import or named bindings, but not both.");
pub const TS_TYPE_MODIFIER_IS_USED_IN_TYPE_EXPORTS: DiagnosticMessage = diag!(6039, Syntax, TypeModifierIsUsedInTypeExports, "The 'type' modifier cannot be used on a named export when 'export type' is used on its export statement.");
pub const TS_TYPE_MODIFIER_IS_USED_IN_TYPE_IMPORTS: DiagnosticMessage = diag!(6040, Syntax, TypeModifierIsUsedInTypeImports, "The 'type' modifier cannot be used on a named import when 'import type' is used on its import statement.");
pub const TS_UNEXPECTED_PARAMETER_MODIFIER: DiagnosticMessage = diag!(6041, Syntax, UnexpectedParameterModifier, "A parameter property is only allowed in a constructor implementation.");
pub const TS_UNEXPECTED_READONLY: DiagnosticMessage = diag!(6042, Syntax, UnexpectedReadonly, "'readonly' type modifier is only permitted on array and tuple literal types.");
pub const TS_UNEXPECTED_TYPE_ANNOTATION: DiagnosticMessage = diag!(6043, Syntax, UnexpectedTypeAnnotation, "Did not expect a type annotation here.");
pub const TS_UNEXPECTED_TYPE_CAST_IN_PARAMETER: DiagnosticMessage = diag!(6044, Syntax, UnexpectedTypeCastInParameter, "Unexpected type cast in parameter position.");
pub const TS_UNSUPPORTED_IMPORT_TYPE_ARGUMENT: DiagnosticMessage = diag!(6045, Syntax, UnsupportedImportTypeArgument, "Argument in a type import must be a string literal.");
pub const TS_UNSUPPORTED_PARAMETER_PROPERTY_KIND: DiagnosticMessage = diag!(6046, Syntax, UnsupportedParameterPropertyKind, "A parameter property may not be declared using a binding pattern.");
pub const TS_UNSUPPORTED_SIGNATURE_PARAMETER_KIND: DiagnosticMessage = diag!(6047, Syntax, UnsupportedSignatureParameterKind, "Name in a signature must be an Identifier, ObjectPattern or ArrayPattern, instead got {0}.");
pub const TS_INVALID_PROPERTY_ACCESS_AFTER_INSTANTIATION: DiagnosticMessage = diag!(6048, Syntax, InvalidPropertyAccessAfterInstantiationExpression, "Invalid property access after an instantiation expression. You can either wrap the instantiation expression in parentheses, or delete the type arguments.");
pub const TS_ACCESSOR_CANNOT_BE_OPTIONAL: DiagnosticMessage = diag!(6049, Syntax, AccessorCannotBeOptional, "An 'accessor' property cannot be declared optional.");
pub const TS_SET_ACCESSOR_CANNOT_HAVE_RETURN_TYPE: DiagnosticMessage = diag!(6050, Syntax, SetAccesorCannotHaveReturnType, "A 'set' accessor cannot have a return type annotation.");
pub const TS_OVERRIDE_NOT_IN_SUBCLASS: DiagnosticMessage = diag!(6053, Syntax, OverrideNotInSubClass, "This member cannot have an 'override' modifier because its containing class does not extend another class.");
pub const TS_INVALID_MODIFIER_ON_TYPE_PARAMETER: DiagnosticMessage = diag!(6051, Syntax, InvalidModifierOnTypeParameter, "'{0}' modifier cannot appear on a type parameter.");
pub const TS_DECLARE_ACCESSOR: DiagnosticMessage = diag!(6052, Syntax, DeclareAccessor, "'declare' is not allowed in {0}ters.");
pub const TS_INVALID_MODIFIER_ON_TYPE_PARAMETER_POSITIONS: DiagnosticMessage = diag!(6054, Syntax, InvalidModifierOnTypeParameterPositions, "'{0}' modifier can only appear on a type parameter of a class, interface or type alias.");
pub const TS_CONST_INITIALIZER_MUST_BE_LITERAL: DiagnosticMessage = diag!(6055, Syntax, ConstInitiailizerMustBeStringOrNumericLiteralOrLiteralEnumReference, "A 'const' initializer in an ambient context must be a string or numeric literal or literal enum reference.");
pub const TS_ACCESSOR_CANNOT_HAVE_TYPE_PARAMETERS: DiagnosticMessage = diag!(6056, Syntax, AccesorCannotHaveTypeParameters, "An accessor cannot have type parameters.");
pub const TS_SET_ACCESSOR_CANNOT_HAVE_OPTIONAL_PARAMETER: DiagnosticMessage = diag!(6057, Syntax, SetAccesorCannotHaveOptionalParameter, "A 'set' accessor cannot have an optional parameter.");
pub const TS_SET_ACCESSOR_CANNOT_HAVE_REST_PARAMETER: DiagnosticMessage = diag!(6058, Syntax, SetAccesorCannotHaveRestParameter, "A 'set' accessor cannot have rest parameter.");
pub const TS_ACCESSOR_CANNOT_DECLARE_THIS_PARAMETER: DiagnosticMessage = diag!(6059, Syntax, AccesorCannotDeclareThisParameter, "'get' and 'set' accessors cannot declare 'this' parameters.");
