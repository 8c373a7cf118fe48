// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structured selectors: the parsed form hosts hand to the rule index.
//!
//! ## Overview
//!
//! A [`Selector`] is a chain of [`CompoundSelector`]s joined by [`Combinator`]s, stored
//! left to right (`first`, then `rest`). Hosts with their own selector engine convert
//! into this shape; hosts without one can use [`parse_selector_list`].
//!
//! ## Stripping
//!
//! Selectors that only match while an element is hovered, focused, or checked cannot be
//! resolved against the live tree directly. [`Selector::strip_state`] truncates the
//! chain after the compound carrying the trigger pseudo-class and removes pseudo-elements
//! and dynamic state pseudo-classes, keeping structural ones such as `:not(..)`.
//!
//! ```
//! use understory_resize_style::selector::{PseudoClass, Selector};
//!
//! let sel = Selector::parse("#input input:focus:not(.a):after ~ div").unwrap();
//! let base = sel.strip_state(|pc| matches!(pc, PseudoClass::Focus)).unwrap();
//! assert_eq!(base.to_string(), "#input input:not(.a)");
//! ```

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

/// Combinator between two compound selectors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Whitespace: ancestor descendant.
    Descendant,
    /// `>`: parent child.
    Child,
    /// `+`: previous sibling, next sibling.
    NextSibling,
    /// `~`: previous sibling, any later sibling.
    SubsequentSibling,
}

/// Attribute selector operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AttrOp {
    /// `[attr]`
    Exists,
    /// `[attr=val]`
    Eq,
    /// `[attr~=val]`
    Includes,
    /// `[attr|=val]`
    DashMatch,
    /// `[attr^=val]`
    Prefix,
    /// `[attr$=val]`
    Suffix,
    /// `[attr*=val]`
    Substring,
}

/// Pseudo-classes known to the index.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PseudoClass {
    /// `:hover`
    Hover,
    /// `:focus`
    Focus,
    /// `:active`
    Active,
    /// `:checked`
    Checked,
    /// `:focus-visible`
    FocusVisible,
    /// `:focus-within`
    FocusWithin,
    /// `:link`
    Link,
    /// `:visited`
    Visited,
    /// `:any-link`
    AnyLink,
    /// `:target`
    Target,
    /// `:enabled`
    Enabled,
    /// `:disabled`
    Disabled,
    /// `:valid`
    Valid,
    /// `:invalid`
    Invalid,
    /// `:required`
    Required,
    /// `:optional`
    Optional,
    /// `:indeterminate`
    Indeterminate,
    /// `:placeholder-shown`
    PlaceholderShown,
    /// `:root`
    Root,
    /// `:empty`
    Empty,
    /// `:first-child`
    FirstChild,
    /// `:last-child`
    LastChild,
    /// `:only-child`
    OnlyChild,
    /// `:first-of-type`
    FirstOfType,
    /// `:last-of-type`
    LastOfType,
    /// `:only-of-type`
    OnlyOfType,
    /// `:nth-child(an+b)` with coefficients `(a, b)`.
    NthChild(i32, i32),
    /// `:nth-last-child(an+b)` with coefficients `(a, b)`.
    NthLastChild(i32, i32),
    /// `:not(..)` over a compound selector.
    Not(Box<CompoundSelector>),
    /// Anything else, kept by name.
    Other(String),
}

impl PseudoClass {
    /// True for pseudo-classes whose match depends on transient element state
    /// (user action, form state, link history) rather than on tree structure.
    ///
    /// Unknown pseudo-classes count as dynamic.
    pub fn is_dynamic(&self) -> bool {
        !matches!(
            self,
            Self::Root
                | Self::Empty
                | Self::FirstChild
                | Self::LastChild
                | Self::OnlyChild
                | Self::FirstOfType
                | Self::LastOfType
                | Self::OnlyOfType
                | Self::NthChild(..)
                | Self::NthLastChild(..)
                | Self::Not(_)
        )
    }

    fn from_name(name: &str) -> Self {
        match name {
            "hover" => Self::Hover,
            "focus" => Self::Focus,
            "active" => Self::Active,
            "checked" => Self::Checked,
            "focus-visible" => Self::FocusVisible,
            "focus-within" => Self::FocusWithin,
            "link" => Self::Link,
            "visited" => Self::Visited,
            "any-link" => Self::AnyLink,
            "target" => Self::Target,
            "enabled" => Self::Enabled,
            "disabled" => Self::Disabled,
            "valid" => Self::Valid,
            "invalid" => Self::Invalid,
            "required" => Self::Required,
            "optional" => Self::Optional,
            "indeterminate" => Self::Indeterminate,
            "placeholder-shown" => Self::PlaceholderShown,
            "root" => Self::Root,
            "empty" => Self::Empty,
            "first-child" => Self::FirstChild,
            "last-child" => Self::LastChild,
            "only-child" => Self::OnlyChild,
            "first-of-type" => Self::FirstOfType,
            "last-of-type" => Self::LastOfType,
            "only-of-type" => Self::OnlyOfType,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Pseudo-elements. These never match a live element.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PseudoElement {
    /// `::before`
    Before,
    /// `::after`
    After,
    /// `::first-line`
    FirstLine,
    /// `::first-letter`
    FirstLetter,
    /// `::placeholder`
    Placeholder,
    /// `::selection`
    Selection,
    /// `::marker`
    Marker,
    /// Anything else, kept by name.
    Other(String),
}

impl PseudoElement {
    fn from_name(name: &str) -> Self {
        match name {
            "before" => Self::Before,
            "after" => Self::After,
            "first-line" => Self::FirstLine,
            "first-letter" => Self::FirstLetter,
            "placeholder" => Self::Placeholder,
            "selection" => Self::Selection,
            "marker" => Self::Marker,
            other => Self::Other(other.to_string()),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::FirstLine => "first-line",
            Self::FirstLetter => "first-letter",
            Self::Placeholder => "placeholder",
            Self::Selection => "selection",
            Self::Marker => "marker",
            Self::Other(name) => name,
        }
    }
}

/// A single simple selector.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SimpleSelector {
    /// Type selector, e.g. `div`.
    Type(String),
    /// `*`
    Universal,
    /// `#id`
    Id(String),
    /// `.class`
    Class(String),
    /// `[name op value]`
    Attribute {
        /// Attribute name.
        name: String,
        /// Operator.
        op: AttrOp,
        /// Value, absent for [`AttrOp::Exists`].
        value: Option<String>,
    },
    /// A pseudo-class.
    PseudoClass(PseudoClass),
    /// A pseudo-element.
    PseudoElement(PseudoElement),
}

/// Simple selectors with no combinator between them, e.g. `input.big:checked`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CompoundSelector {
    /// The simple selectors, in source order.
    pub simples: Vec<SimpleSelector>,
}

impl CompoundSelector {
    /// True if any top-level pseudo-class satisfies `pred`.
    ///
    /// Pseudo-classes nested in `:not(..)` are not considered.
    pub fn has_pseudo_class(&self, pred: impl Fn(&PseudoClass) -> bool) -> bool {
        self.simples
            .iter()
            .any(|s| matches!(s, SimpleSelector::PseudoClass(pc) if pred(pc)))
    }

    /// Copy without pseudo-elements and dynamic pseudo-classes.
    ///
    /// An emptied compound becomes `*`.
    pub fn without_state(&self) -> Self {
        let mut simples: Vec<SimpleSelector> = self
            .simples
            .iter()
            .filter(|s| match s {
                SimpleSelector::PseudoElement(_) => false,
                SimpleSelector::PseudoClass(pc) => !pc.is_dynamic(),
                _ => true,
            })
            .cloned()
            .collect();
        if simples.is_empty() {
            simples.push(SimpleSelector::Universal);
        }
        Self { simples }
    }
}

/// A complex selector, stored left to right.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Selector {
    /// Leftmost compound.
    pub first: CompoundSelector,
    /// Following compounds, each with the combinator that precedes it.
    pub rest: Vec<(Combinator, CompoundSelector)>,
}

impl Selector {
    /// A selector made of a single compound.
    pub fn compound(first: CompoundSelector) -> Self {
        Self {
            first,
            rest: Vec::new(),
        }
    }

    /// Parse a single complex selector.
    pub fn parse(input: &str) -> Result<Self, SelectorParseError> {
        let mut list = parse_selector_list(input)?;
        if list.len() != 1 {
            return Err(SelectorParseError::NotSingle);
        }
        Ok(list.remove(0))
    }

    /// Iterate the compounds left to right.
    pub fn compounds(&self) -> impl Iterator<Item = &CompoundSelector> + '_ {
        core::iter::once(&self.first).chain(self.rest.iter().map(|(_, c)| c))
    }

    /// The rightmost compound, which the selector's matched elements satisfy.
    pub fn subject(&self) -> &CompoundSelector {
        self.rest.last().map(|(_, c)| c).unwrap_or(&self.first)
    }

    /// True if any compound carries a top-level pseudo-class satisfying `pred`.
    pub fn has_pseudo_class(&self, pred: impl Fn(&PseudoClass) -> bool) -> bool {
        self.compounds().any(|c| c.has_pseudo_class(&pred))
    }

    /// Copy with state stripped from every compound, keeping the whole chain.
    ///
    /// Used for rules whose subject is the element itself whatever its state, such as
    /// `.menu:hover::after { animation: .. }`.
    pub fn without_state(&self) -> Self {
        Self {
            first: self.first.without_state(),
            rest: self
                .rest
                .iter()
                .map(|(comb, c)| (*comb, c.without_state()))
                .collect(),
        }
    }

    /// Resolve the element whose state the trigger pseudo-class tests.
    ///
    /// Truncates after the first compound that carries a pseudo-class satisfying `pred`
    /// and strips state from every kept compound. Returns `None` when no compound
    /// carries such a pseudo-class.
    pub fn strip_state(&self, pred: impl Fn(&PseudoClass) -> bool) -> Option<Self> {
        let at = self.compounds().position(|c| c.has_pseudo_class(&pred))?;
        Some(Self {
            first: self.first.without_state(),
            rest: self
                .rest
                .iter()
                .take(at)
                .map(|(comb, c)| (*comb, c.without_state()))
                .collect(),
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first)?;
        for (comb, c) in &self.rest {
            match comb {
                Combinator::Descendant => write!(f, " {c}")?,
                Combinator::Child => write!(f, " > {c}")?,
                Combinator::NextSibling => write!(f, " + {c}")?,
                Combinator::SubsequentSibling => write!(f, " ~ {c}")?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.simples {
            write!(f, "{s}")?;
        }
        Ok(())
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(t) => f.write_str(t),
            Self::Universal => f.write_str("*"),
            Self::Id(id) => write!(f, "#{id}"),
            Self::Class(c) => write!(f, ".{c}"),
            Self::Attribute { name, op, value } => {
                let op = match op {
                    AttrOp::Exists => return write!(f, "[{name}]"),
                    AttrOp::Eq => "=",
                    AttrOp::Includes => "~=",
                    AttrOp::DashMatch => "|=",
                    AttrOp::Prefix => "^=",
                    AttrOp::Suffix => "$=",
                    AttrOp::Substring => "*=",
                };
                write!(f, "[{name}{op}\"{}\"]", value.as_deref().unwrap_or(""))
            }
            Self::PseudoClass(pc) => write!(f, "{pc}"),
            Self::PseudoElement(pe) => write!(f, "::{}", pe.name()),
        }
    }
}

impl fmt::Display for PseudoClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hover => "hover",
            Self::Focus => "focus",
            Self::Active => "active",
            Self::Checked => "checked",
            Self::FocusVisible => "focus-visible",
            Self::FocusWithin => "focus-within",
            Self::Link => "link",
            Self::Visited => "visited",
            Self::AnyLink => "any-link",
            Self::Target => "target",
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Required => "required",
            Self::Optional => "optional",
            Self::Indeterminate => "indeterminate",
            Self::PlaceholderShown => "placeholder-shown",
            Self::Root => "root",
            Self::Empty => "empty",
            Self::FirstChild => "first-child",
            Self::LastChild => "last-child",
            Self::OnlyChild => "only-child",
            Self::FirstOfType => "first-of-type",
            Self::LastOfType => "last-of-type",
            Self::OnlyOfType => "only-of-type",
            Self::NthChild(a, b) => return write!(f, ":nth-child({a}n{b:+})"),
            Self::NthLastChild(a, b) => return write!(f, ":nth-last-child({a}n{b:+})"),
            Self::Not(inner) => return write!(f, ":not({inner})"),
            Self::Other(name) => name,
        };
        write!(f, ":{name}")
    }
}

/// Errors from [`parse_selector_list`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectorParseError {
    /// Input ended where a selector was expected.
    #[error("unexpected end of selector")]
    UnexpectedEnd,
    /// A character that cannot start or continue a selector.
    #[error("unexpected character {ch:?} at byte {at}")]
    Unexpected {
        /// The offending character.
        ch: char,
        /// Byte offset.
        at: usize,
    },
    /// Malformed `an+b` argument.
    #[error("invalid nth argument {0:?}")]
    InvalidNth(String),
    /// [`Selector::parse`] got a list with more or fewer than one selector.
    #[error("expected exactly one selector")]
    NotSingle,
}

/// Parse a comma-separated selector list.
///
/// Covers type, universal, id, class, and attribute selectors, the four combinators,
/// pseudo-classes (with `:not(..)` over a compound and `:nth-child(..)` arguments) and
/// pseudo-elements, including the legacy single-colon forms.
pub fn parse_selector_list(input: &str) -> Result<Vec<Selector>, SelectorParseError> {
    let mut p = Parser { src: input, pos: 0 };
    let mut out = Vec::new();
    loop {
        p.skip_ws();
        out.push(p.complex()?);
        p.skip_ws();
        match p.peek() {
            Some(',') => {
                p.bump();
            }
            None => return Ok(out),
            Some(ch) => return Err(SelectorParseError::Unexpected { ch, at: p.pos }),
        }
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
        self.pos != start
    }

    fn expect(&mut self, want: char) -> Result<(), SelectorParseError> {
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(ch) => Err(SelectorParseError::Unexpected {
                ch,
                at: self.pos - ch.len_utf8(),
            }),
            None => Err(SelectorParseError::UnexpectedEnd),
        }
    }

    fn ident(&mut self) -> Result<String, SelectorParseError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_ident_char(c) {
                self.bump();
            } else {
                break;
            }
        }
        if start == self.pos {
            return match self.peek() {
                Some(ch) => Err(SelectorParseError::Unexpected { ch, at: self.pos }),
                None => Err(SelectorParseError::UnexpectedEnd),
            };
        }
        Ok(self.src[start..self.pos].to_string())
    }

    fn complex(&mut self) -> Result<Selector, SelectorParseError> {
        let first = self.compound()?;
        let mut rest = Vec::new();
        loop {
            let had_ws = self.skip_ws();
            let comb = match self.peek() {
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(',' | ')') | None => break,
                Some(_) if had_ws => Combinator::Descendant,
                Some(ch) => return Err(SelectorParseError::Unexpected { ch, at: self.pos }),
            };
            if comb != Combinator::Descendant {
                self.bump();
                self.skip_ws();
            }
            rest.push((comb, self.compound()?));
        }
        Ok(Selector { first, rest })
    }

    fn compound(&mut self) -> Result<CompoundSelector, SelectorParseError> {
        let mut simples = Vec::new();
        loop {
            match self.peek() {
                Some('*') => {
                    self.bump();
                    simples.push(SimpleSelector::Universal);
                }
                Some('#') => {
                    self.bump();
                    simples.push(SimpleSelector::Id(self.ident()?));
                }
                Some('.') => {
                    self.bump();
                    simples.push(SimpleSelector::Class(self.ident()?));
                }
                Some('[') => {
                    self.bump();
                    simples.push(self.attribute()?);
                }
                Some(':') => {
                    self.bump();
                    simples.push(self.pseudo()?);
                }
                Some(c) if simples.is_empty() && is_ident_char(c) && !c.is_ascii_digit() => {
                    simples.push(SimpleSelector::Type(self.ident()?.to_ascii_lowercase()));
                }
                _ => break,
            }
        }
        if simples.is_empty() {
            return match self.peek() {
                Some(ch) => Err(SelectorParseError::Unexpected { ch, at: self.pos }),
                None => Err(SelectorParseError::UnexpectedEnd),
            };
        }
        Ok(CompoundSelector { simples })
    }

    fn attribute(&mut self) -> Result<SimpleSelector, SelectorParseError> {
        self.skip_ws();
        let name = self.ident()?;
        self.skip_ws();
        let op = match self.bump() {
            Some(']') => {
                return Ok(SimpleSelector::Attribute {
                    name,
                    op: AttrOp::Exists,
                    value: None,
                });
            }
            Some('=') => AttrOp::Eq,
            Some(c @ ('~' | '|' | '^' | '$' | '*')) => {
                self.expect('=')?;
                match c {
                    '~' => AttrOp::Includes,
                    '|' => AttrOp::DashMatch,
                    '^' => AttrOp::Prefix,
                    '$' => AttrOp::Suffix,
                    _ => AttrOp::Substring,
                }
            }
            Some(ch) => {
                return Err(SelectorParseError::Unexpected {
                    ch,
                    at: self.pos - ch.len_utf8(),
                });
            }
            None => return Err(SelectorParseError::UnexpectedEnd),
        };
        self.skip_ws();
        let value = match self.peek() {
            Some(q @ ('"' | '\'')) => {
                self.bump();
                let start = self.pos;
                loop {
                    match self.bump() {
                        Some(c) if c == q => break,
                        Some(_) => {}
                        None => return Err(SelectorParseError::UnexpectedEnd),
                    }
                }
                self.src[start..self.pos - 1].to_string()
            }
            _ => self.ident()?,
        };
        self.skip_ws();
        self.expect(']')?;
        Ok(SimpleSelector::Attribute {
            name,
            op,
            value: Some(value),
        })
    }

    fn pseudo(&mut self) -> Result<SimpleSelector, SelectorParseError> {
        if self.peek() == Some(':') {
            self.bump();
            let name = self.ident()?.to_ascii_lowercase();
            return Ok(SimpleSelector::PseudoElement(PseudoElement::from_name(
                &name,
            )));
        }
        let name = self.ident()?.to_ascii_lowercase();
        // Legacy single-colon pseudo-elements.
        if matches!(
            name.as_str(),
            "before" | "after" | "first-line" | "first-letter"
        ) {
            return Ok(SimpleSelector::PseudoElement(PseudoElement::from_name(
                &name,
            )));
        }
        if self.peek() != Some('(') {
            return Ok(SimpleSelector::PseudoClass(PseudoClass::from_name(&name)));
        }
        self.bump();
        self.skip_ws();
        let pc = match name.as_str() {
            "not" => {
                let inner = self.compound()?;
                self.skip_ws();
                PseudoClass::Not(Box::new(inner))
            }
            "nth-child" | "nth-last-child" => {
                let start = self.pos;
                while matches!(self.peek(), Some(c) if c != ')') {
                    self.bump();
                }
                let arg = &self.src[start..self.pos];
                let (a, b) =
                    parse_nth(arg).ok_or_else(|| SelectorParseError::InvalidNth(arg.to_string()))?;
                if name == "nth-child" {
                    PseudoClass::NthChild(a, b)
                } else {
                    PseudoClass::NthLastChild(a, b)
                }
            }
            _ => {
                // Unknown functional pseudo-class: keep the name, drop the argument.
                let mut depth = 0_u32;
                loop {
                    match self.peek() {
                        Some('(') => depth += 1,
                        Some(')') if depth == 0 => break,
                        Some(')') => depth -= 1,
                        Some(_) => {}
                        None => return Err(SelectorParseError::UnexpectedEnd),
                    }
                    self.bump();
                }
                PseudoClass::Other(name)
            }
        };
        self.expect(')')?;
        Ok(SimpleSelector::PseudoClass(pc))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

fn parse_nth(arg: &str) -> Option<(i32, i32)> {
    let s: String = arg
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    match s.as_str() {
        "odd" => return Some((2, 1)),
        "even" => return Some((2, 0)),
        _ => {}
    }
    match s.find('n') {
        Some(idx) => {
            let a = match &s[..idx] {
                "" | "+" => 1,
                "-" => -1,
                other => other.parse().ok()?,
            };
            let b_part = &s[idx + 1..];
            let b = if b_part.is_empty() {
                0
            } else {
                b_part.parse().ok()?
            };
            Some((a, b))
        }
        None => Some((0, s.parse().ok()?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_focus_like(pc: &PseudoClass) -> bool {
        matches!(
            pc,
            PseudoClass::Focus | PseudoClass::Active | PseudoClass::Checked
        )
    }

    fn strip(src: &str) -> String {
        Selector::parse(src)
            .unwrap()
            .strip_state(is_focus_like)
            .unwrap()
            .to_string()
    }

    #[test]
    fn strips_trigger_and_trailing_state() {
        assert_eq!(strip("#input input:checked"), "#input input");
        assert_eq!(strip("#input input:focus"), "#input input");
        assert_eq!(strip("#input input:focus:not(.a)"), "#input input:not(.a)");
        assert_eq!(
            strip("#input input:focus:not(.a):after"),
            "#input input:not(.a)"
        );
        assert_eq!(
            strip("#input input:focus:not(:focus):after"),
            "#input input:not(:focus)"
        );
        assert_eq!(
            strip(".was-validated .custom-control-input:valid:focus:not(:checked)"),
            ".was-validated .custom-control-input:not(:checked)"
        );
    }

    #[test]
    fn strip_truncates_after_trigger_compound() {
        assert_eq!(strip("#checkbox input:checked ~ div"), "#checkbox input");
        assert_eq!(strip("ul > li:first-child:active + li"), "ul > li:first-child");
    }

    #[test]
    fn emptied_compound_becomes_universal() {
        assert_eq!(strip(".form :focus"), ".form *");
    }

    #[test]
    fn nested_trigger_is_not_a_trigger() {
        let sel = Selector::parse("input:not(:checked)").unwrap();
        assert!(sel.strip_state(is_focus_like).is_none());
        assert!(!sel.has_pseudo_class(is_focus_like));
    }

    #[test]
    fn parses_lists_and_combinators() {
        let list = parse_selector_list("a > b, c + d ~ e, f g").unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].rest[0].0, Combinator::Child);
        assert_eq!(list[1].rest[0].0, Combinator::NextSibling);
        assert_eq!(list[1].rest[1].0, Combinator::SubsequentSibling);
        assert_eq!(list[2].rest[0].0, Combinator::Descendant);
        assert_eq!(list[1].to_string(), "c + d ~ e");
    }

    #[test]
    fn parses_attributes_and_nth() {
        let sel = Selector::parse("input[type=\"checkbox\"]:nth-child(2n+1)").unwrap();
        assert_eq!(
            sel.first.simples[1],
            SimpleSelector::Attribute {
                name: "type".into(),
                op: AttrOp::Eq,
                value: Some("checkbox".into()),
            }
        );
        assert_eq!(
            sel.first.simples[2],
            SimpleSelector::PseudoClass(PseudoClass::NthChild(2, 1))
        );
        assert_eq!(parse_nth("odd"), Some((2, 1)));
        assert_eq!(parse_nth("-n+3"), Some((-1, 3)));
        assert_eq!(parse_nth("4"), Some((0, 4)));
        assert_eq!(parse_nth("x"), None);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("a >").is_err());
        assert!(Selector::parse("a, b").is_err());
        assert!(Selector::parse("[type").is_err());
    }

    #[test]
    fn subject_is_rightmost_compound() {
        let sel = Selector::parse("#a .b > span").unwrap();
        assert_eq!(sel.subject().to_string(), "span");
        assert_eq!(sel.compounds().count(), 3);
    }
}
