//! Modifier keywords such as `public`, `readonly` or `in`.

use quarry_ast::node::Accessibility;
use quarry_ast::token_kind::TokenKind;
use quarry_diagnostics::messages::*;
use quarry_diagnostics::DiagnosticMessage;

use crate::parser::Parser;
use crate::PResult;

bitflags::bitflags! {
    /// A set of modifier words.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct TsModifier: u16 {
        const PUBLIC    = 1 << 0;
        const PRIVATE   = 1 << 1;
        const PROTECTED = 1 << 2;
        const READONLY  = 1 << 3;
        const DECLARE   = 1 << 4;
        const ABSTRACT  = 1 << 5;
        const OVERRIDE  = 1 << 6;
        const STATIC    = 1 << 7;
        const IN        = 1 << 8;
        const OUT       = 1 << 9;
        const CONST     = 1 << 10;

        const ACCESSIBILITY = Self::PUBLIC.bits() | Self::PRIVATE.bits() | Self::PROTECTED.bits();
        /// Words that only mean something on class members.
        const MEMBER_ONLY = Self::ACCESSIBILITY.bits()
            | Self::READONLY.bits()
            | Self::DECLARE.bits()
            | Self::STATIC.bits()
            | Self::OVERRIDE.bits();
    }
}

/// Rejected on interface and type-literal members.
pub(crate) const TS_TYPE_MEMBER_DISALLOWED: TsModifier = TsModifier::DECLARE
    .union(TsModifier::ABSTRACT)
    .union(TsModifier::ACCESSIBILITY)
    .union(TsModifier::STATIC)
    .union(TsModifier::OVERRIDE);

impl TsModifier {
    pub(crate) fn from_word(word: &str) -> Option<TsModifier> {
        Some(match word {
            "public" => TsModifier::PUBLIC,
            "private" => TsModifier::PRIVATE,
            "protected" => TsModifier::PROTECTED,
            "readonly" => TsModifier::READONLY,
            "declare" => TsModifier::DECLARE,
            "abstract" => TsModifier::ABSTRACT,
            "override" => TsModifier::OVERRIDE,
            "static" => TsModifier::STATIC,
            "in" => TsModifier::IN,
            "out" => TsModifier::OUT,
            "const" => TsModifier::CONST,
            _ => return None,
        })
    }

    /// The word of a single-flag value.
    pub(crate) fn word(self) -> &'static str {
        match self {
            TsModifier::PUBLIC => "public",
            TsModifier::PRIVATE => "private",
            TsModifier::PROTECTED => "protected",
            TsModifier::READONLY => "readonly",
            TsModifier::DECLARE => "declare",
            TsModifier::ABSTRACT => "abstract",
            TsModifier::OVERRIDE => "override",
            TsModifier::STATIC => "static",
            TsModifier::IN => "in",
            TsModifier::OUT => "out",
            TsModifier::CONST => "const",
            _ => "",
        }
    }

    fn accessibility(self) -> Option<Accessibility> {
        match self {
            TsModifier::PUBLIC => Some(Accessibility::Public),
            TsModifier::PRIVATE => Some(Accessibility::Private),
            TsModifier::PROTECTED => Some(Accessibility::Protected),
            _ => None,
        }
    }
}

/// Modifiers read in front of a member, parameter or type parameter.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Modified {
    pub accessibility: Option<Accessibility>,
    /// Every non-accessibility modifier seen.
    pub flags: TsModifier,
}

impl Modified {
    pub(crate) fn has(&self, modifier: TsModifier) -> bool {
        self.flags.contains(modifier)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.accessibility.is_none() && self.flags.is_empty()
    }
}

impl Parser<'_> {
    /// Reads modifiers while the current word is in `allowed | disallowed`
    /// and is followed by something a modifier can precede. Words in
    /// `disallowed` are consumed and reported with `error`.
    pub(crate) fn ts_parse_modifiers(
        &mut self,
        allowed: TsModifier,
        disallowed: TsModifier,
        stop_on_static_block: bool,
        error: &DiagnosticMessage,
    ) -> PResult<Modified> {
        let mut modified = Modified::default();
        loop {
            let start = self.start_pos();
            let Some(modifier) = self.ts_parse_modifier(allowed | disallowed, stop_on_static_block)? else {
                break;
            };
            let word = modifier.word();

            if let Some(accessibility) = modifier.accessibility() {
                if modified.accessibility.is_some() {
                    self.raise(&TS_DUPLICATE_ACCESSIBILITY_MODIFIER, start, &[word])?;
                } else {
                    for after in [TsModifier::OVERRIDE, TsModifier::STATIC, TsModifier::READONLY] {
                        if modified.has(after) {
                            self.raise(&TS_INVALID_MODIFIERS_ORDER, start, &[word, after.word()])?;
                        }
                    }
                    modified.accessibility = Some(accessibility);
                }
            } else if modifier.intersects(TsModifier::IN | TsModifier::OUT) {
                if modified.has(modifier) {
                    self.raise(&TS_DUPLICATE_MODIFIER, start, &[word])?;
                }
                if modifier == TsModifier::IN && modified.has(TsModifier::OUT) {
                    self.raise(&TS_INVALID_MODIFIERS_ORDER, start, &["in", "out"])?;
                }
                modified.flags |= modifier;
            } else {
                if modified.has(modifier) {
                    self.raise(&TS_DUPLICATE_MODIFIER, start, &[word])?;
                } else {
                    const ORDER: [(TsModifier, TsModifier); 4] = [
                        (TsModifier::STATIC, TsModifier::READONLY),
                        (TsModifier::STATIC, TsModifier::OVERRIDE),
                        (TsModifier::OVERRIDE, TsModifier::READONLY),
                        (TsModifier::ABSTRACT, TsModifier::OVERRIDE),
                    ];
                    for (before, after) in ORDER {
                        if modifier == before && modified.has(after) {
                            self.raise(&TS_INVALID_MODIFIERS_ORDER, start, &[before.word(), after.word()])?;
                        }
                    }
                    const INCOMPATIBLE: [(TsModifier, TsModifier); 2] = [
                        (TsModifier::DECLARE, TsModifier::OVERRIDE),
                        (TsModifier::STATIC, TsModifier::ABSTRACT),
                    ];
                    for (a, b) in INCOMPATIBLE {
                        if (modifier == a && modified.has(b)) || (modifier == b && modified.has(a)) {
                            self.raise(&TS_INCOMPATIBLE_MODIFIERS, start, &[a.word(), b.word()])?;
                        }
                    }
                }
                modified.flags |= modifier;
            }

            if disallowed.contains(modifier) {
                self.raise(error, start, &[word])?;
            }
        }
        Ok(modified)
    }

    /// Consumes the current word if it is one of `allowed` and acts as a
    /// modifier here rather than as a name.
    fn ts_parse_modifier(&mut self, allowed: TsModifier, stop_on_static_block: bool) -> PResult<Option<TsModifier>> {
        if !matches!(
            self.cur(),
            TokenKind::Identifier | TokenKind::InKeyword | TokenKind::ConstKeyword
        ) {
            return Ok(None);
        }
        let Some(modifier) = TsModifier::from_word(self.cur_str()) else {
            return Ok(None);
        };
        if !allowed.contains(modifier) {
            return Ok(None);
        }
        if stop_on_static_block && self.ts_is_start_of_static_block() {
            return Ok(None);
        }
        let applies = self.try_parse_or_rewind(|p| {
            let is_static = p.is_contextual("static");
            p.next()?;
            if !is_static && p.has_preceding_line_break() {
                return Ok(None);
            }
            Ok(p.ts_token_can_follow_modifier().then_some(()))
        })?;
        Ok(applies.map(|()| modifier))
    }

    pub(crate) fn ts_is_start_of_static_block(&self) -> bool {
        self.is_contextual("static") && self.lookahead_char() == Some('{')
    }
}

#[cfg(test)]
mod tests {
    use crate::entry::parse;
    use crate::options::ParserOptions;
    use quarry_diagnostics::messages::*;

    fn ts_recovering() -> ParserOptions {
        ParserOptions::module().with_plugin("typescript").with_error_recovery()
    }

    fn first_error(source: &str) -> quarry_diagnostics::ParseError {
        let output = parse(source, &ts_recovering()).unwrap();
        output.errors.into_iter().next().expect("an error")
    }

    #[test]
    fn test_modifier_order() {
        assert!(first_error("class A { static public x }").is(&TS_INVALID_MODIFIERS_ORDER));
        assert!(first_error("class A { readonly override x }").is(&TS_INVALID_MODIFIERS_ORDER));
    }

    #[test]
    fn test_duplicates_and_incompatible_pairs() {
        assert!(first_error("class A { public private x }").is(&TS_DUPLICATE_ACCESSIBILITY_MODIFIER));
        assert!(first_error("class A { readonly readonly x }").is(&TS_DUPLICATE_MODIFIER));
        assert!(first_error("abstract class A { static abstract x }").is(&TS_INCOMPATIBLE_MODIFIERS));
    }

    #[test]
    fn test_modifier_words_stay_names() {
        let output = parse("class A { readonly; static = 1; public() {} }", &ts_recovering()).unwrap();
        assert!(output.errors.is_empty(), "{:?}", output.errors);
    }

    #[test]
    fn test_type_member_rejects_class_modifiers() {
        assert!(first_error("interface I { public x: string }").is(&TS_INVALID_MODIFIER_ON_TYPE_MEMBER));
    }
}
