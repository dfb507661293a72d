// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! PostgreSQL-dialect lexer.
//!
//! Tokenizing happens in two layers: [`raw`] slices the input with a
//! [`logos`] scanner, and the cooking pass in this module turns raw
//! slices into [`Token`]s carrying decoded values — identifier case is
//! folded, keywords are classified against the keyword table, string
//! escapes (`''`, backslash, unicode, `UESCAPE`) are resolved and
//! newline-separated string literals are concatenated.

pub(crate) mod raw;

mod keywords;

use logos::Logos;
use text_size::{TextRange, TextSize};

use crate::error::{Error, Result};
use raw::{LexError, RawToken};

pub use keywords::{Keyword, KeywordCategory, ALL_KEYWORDS};

/// Cooked token kinds as the parser sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword(Keyword),
    Ident,
    QuotedIdent,
    StringConst,
    /// Bit or hex string; the value keeps the `b`/`x` prefix.
    BitConst,
    IntegerConst,
    FloatConst,
    NumericConst,
    /// Multi-character operator without a dedicated kind; the value is
    /// the operator text.
    Op,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Lt,
    Gt,
    Eq,
    LtEq,
    GtEq,
    /// `<>` and `!=`; both cook to the value `<>`.
    NotEq,
    /// `=>`, the named-argument arrow.
    EqualsGreater,
    /// `:=`, the other named-argument arrow.
    ColonEquals,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Colon,
    Dot,
    DotDot,
    Typecast,
    /// `$N`; the value is the digits.
    Positional,
    /// `:name`; the value is the name.
    NamedParam,
    Eof,
}

impl TokenKind {
    /// The token's operator text when it participates in expressions.
    pub fn op_text(self) -> Option<&'static str> {
        Some(match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Caret => "^",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Eq => "=",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::NotEq => "<>",
            _ => return None,
        })
    }
}

/// Shorthand for punctuation and operator token kinds, mirroring how
/// the grammar reads.
#[macro_export]
macro_rules! T {
    [,] => { $crate::lexer::TokenKind::Comma };
    [;] => { $crate::lexer::TokenKind::Semicolon };
    [.] => { $crate::lexer::TokenKind::Dot };
    [..] => { $crate::lexer::TokenKind::DotDot };
    [:] => { $crate::lexer::TokenKind::Colon };
    [::] => { $crate::lexer::TokenKind::Typecast };
    [=] => { $crate::lexer::TokenKind::Eq };
    [<] => { $crate::lexer::TokenKind::Lt };
    [>] => { $crate::lexer::TokenKind::Gt };
    [<=] => { $crate::lexer::TokenKind::LtEq };
    [>=] => { $crate::lexer::TokenKind::GtEq };
    [<>] => { $crate::lexer::TokenKind::NotEq };
    [=>] => { $crate::lexer::TokenKind::EqualsGreater };
    [:=] => { $crate::lexer::TokenKind::ColonEquals };
    [+] => { $crate::lexer::TokenKind::Plus };
    [-] => { $crate::lexer::TokenKind::Minus };
    [*] => { $crate::lexer::TokenKind::Star };
    [/] => { $crate::lexer::TokenKind::Slash };
    [%] => { $crate::lexer::TokenKind::Percent };
    [^] => { $crate::lexer::TokenKind::Caret };
    ['('] => { $crate::lexer::TokenKind::LParen };
    [')'] => { $crate::lexer::TokenKind::RParen };
    ['['] => { $crate::lexer::TokenKind::LBracket };
    [']'] => { $crate::lexer::TokenKind::RBracket };
    [EOF] => { $crate::lexer::TokenKind::Eof };
}

/// A cooked token: kind, decoded value and byte range in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub range: TextRange,
}

impl Token {
    fn new(kind: TokenKind, value: impl Into<String>, range: TextRange) -> Self {
        Self {
            kind,
            value: value.into(),
            range,
        }
    }

    pub fn position(&self) -> TextSize {
        self.range.start()
    }
}

/// Wrapper for the actual [`Logos`] scanner, yielding raw slices.
#[derive(Debug)]
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, RawToken>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: RawToken::lexer(input),
        }
    }
}

/// A raw token as sliced from the input, before cooking.
#[derive(Debug, PartialEq, Eq)]
pub struct RawSpan<'a> {
    pub kind: Result<RawToken, LexError>,
    pub text: &'a str,
    pub range: TextRange,
}

impl<'a> Iterator for Lexer<'a> {
    type Item = RawSpan<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = self.inner.next()?;
        let text = self.inner.slice();

        let range = {
            let std::ops::Range { start, end } = self.inner.span();
            let start = TextSize::try_from(start).expect("input longer than 4 GiB");
            let end = TextSize::try_from(end).expect("input longer than 4 GiB");

            TextRange::new(start, end)
        };

        Some(Self::Item { kind, text, range })
    }
}

/// How a string constant interprets its body; continuation literals
/// keep the mode of the opening literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringMode {
    Standard,
    Extended,
    Unicode,
    Bit,
    Hex,
}

/// Tokenizes `input` eagerly and completely; the parser wants random
/// access for lookahead and rewinding.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Cooker::new(input).run()
}

struct Cooker<'a> {
    raw: std::iter::Peekable<SkipTrivia<'a>>,
    out: Vec<Token>,
    /// Mode of the trailing string token in `out`, while it can still
    /// grow by continuation or has its `UESCAPE` pending.
    open_string: Option<StringMode>,
    end: TextSize,
}

/// Filters trivia out of the raw stream while remembering whether the
/// gap before each token contained a newline (the string continuation
/// rule) and whether there was a gap at all (numeric junk detection).
struct SkipTrivia<'a> {
    inner: Lexer<'a>,
}

struct RawItem<'a> {
    kind: Result<RawToken, LexError>,
    text: &'a str,
    range: TextRange,
    newline_before: bool,
    adjacent: bool,
}

impl<'a> Iterator for SkipTrivia<'a> {
    type Item = RawItem<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut newline_before = false;
        let mut adjacent = true;
        loop {
            let span = self.inner.next()?;
            match span.kind {
                Ok(kind) if kind.is_trivia() => {
                    adjacent = false;
                    if span.text.contains('\n') || span.text.contains('\r') {
                        newline_before = true;
                    }
                }
                kind => {
                    return Some(RawItem {
                        kind,
                        text: span.text,
                        range: span.range,
                        newline_before,
                        adjacent,
                    });
                }
            }
        }
    }
}

impl<'a> Cooker<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            raw: SkipTrivia {
                inner: Lexer::new(input),
            }
            .peekable(),
            out: Vec::new(),
            open_string: None,
            end: TextSize::of(input),
        }
    }

    fn run(mut self) -> Result<Vec<Token>> {
        while let Some(item) = self.raw.next() {
            let kind = item
                .kind
                .map_err(|e| Error::syntax(item.range.start(), e.message()))?;
            self.cook(kind, item.text, item.range, item.newline_before, item.adjacent)?;
        }
        self.finish_open_string()?;
        let end = TextRange::new(self.end, self.end);
        self.out.push(Token::new(TokenKind::Eof, "", end));
        Ok(self.out)
    }

    fn cook(
        &mut self,
        kind: RawToken,
        text: &str,
        range: TextRange,
        newline_before: bool,
        adjacent: bool,
    ) -> Result<()> {
        use RawToken::*;

        // `'...'` directly after a newline continues an open literal.
        if kind == StringConst && newline_before {
            if let Some(mode) = self.open_string {
                let body = &text[1..text.len() - 1];
                let prev = self.out.last_mut().expect("open string has a token");
                prev.value.push_str(&decode_part(mode, body, range)?);
                prev.range = TextRange::new(prev.range.start(), range.end());
                return Ok(());
            }
        }
        if kind != Ident {
            self.finish_open_string()?;
        }

        let token = match kind {
            Whitespace | LineComment | BlockComment => unreachable!("trivia is filtered out"),
            StringConst => self.open(StringMode::Standard, &text[1..text.len() - 1], range)?,
            NationalStringConst => self.open(StringMode::Standard, &text[2..text.len() - 1], range)?,
            EscapeStringConst => self.open(StringMode::Extended, &text[2..text.len() - 1], range)?,
            UnicodeStringConst => self.open(StringMode::Unicode, &text[3..text.len() - 1], range)?,
            BitStringConst => self.open(StringMode::Bit, &text[2..text.len() - 1], range)?,
            HexStringConst => self.open(StringMode::Hex, &text[2..text.len() - 1], range)?,
            DollarStringConst => {
                let taglen = text[1..].find('$').expect("tagged opener") + 2;
                Token::new(TokenKind::StringConst, &text[taglen..text.len() - taglen], range)
            }
            QuotedIdent => {
                let value = collapse_doubled(&text[1..text.len() - 1], '"');
                if value.is_empty() {
                    return Err(Error::syntax(
                        range.start(),
                        "zero-length delimited identifier",
                    ));
                }
                Token::new(TokenKind::QuotedIdent, value, range)
            }
            UnicodeQuotedIdent => {
                let body = collapse_doubled(&text[3..text.len() - 1], '"');
                let escape = self.uescape(range)?;
                let value = decode_unicode_escapes(&body, escape, range)?;
                if value.is_empty() {
                    return Err(Error::syntax(
                        range.start(),
                        "zero-length delimited identifier",
                    ));
                }
                Token::new(TokenKind::QuotedIdent, value, range)
            }
            Ident => {
                // UESCAPE belongs to the unicode literal before it.
                if self.open_string == Some(StringMode::Unicode)
                    && text.eq_ignore_ascii_case("uescape")
                {
                    let escape = self.uescape_value(range)?;
                    let prev = self.out.last_mut().expect("open string has a token");
                    prev.value = decode_unicode_escapes(&prev.value, escape, range)?;
                    self.open_string = None;
                    return Ok(());
                }
                self.finish_open_string()?;
                let folded = text.to_lowercase();
                match Keyword::lookup(&folded) {
                    Some(kw) => Token::new(TokenKind::Keyword(kw), kw.text(), range),
                    None => Token::new(TokenKind::Ident, folded, range),
                }
            }
            Integer => {
                let kind = if text.parse::<i64>().is_ok() {
                    TokenKind::IntegerConst
                } else {
                    TokenKind::NumericConst
                };
                Token::new(kind, text, range)
            }
            Numeric => Token::new(TokenKind::NumericConst, text, range),
            Float => Token::new(TokenKind::FloatConst, text, range),
            Positional => Token::new(TokenKind::Positional, &text[1..], range),
            NamedParam => Token::new(TokenKind::NamedParam, &text[1..], range),
            LParen => Token::new(T!['('], text, range),
            RParen => Token::new(T![')'], text, range),
            LBracket => Token::new(T!['['], text, range),
            RBracket => Token::new(T![']'], text, range),
            Comma => Token::new(T![,], text, range),
            Semicolon => Token::new(T![;], text, range),
            ColonEquals => Token::new(T![:=], text, range),
            Colon => Token::new(T![:], text, range),
            Dot => Token::new(T![.], text, range),
            DotDot => Token::new(T![..], text, range),
            Typecast => Token::new(T![::], text, range),
            Op => {
                let kind = match text {
                    "+" => T![+],
                    "-" => T![-],
                    "*" => T![*],
                    "/" => T![/],
                    "%" => T![%],
                    "^" => T![^],
                    "<" => T![<],
                    ">" => T![>],
                    "=" => T![=],
                    "<=" => T![<=],
                    ">=" => T![>=],
                    "<>" | "!=" => T![<>],
                    "=>" => T![=>],
                    _ => TokenKind::Op,
                };
                let value = if kind == T![<>] { "<>" } else { text };
                Token::new(kind, value, range)
            }
        };
        // Two tokens with no gap where PostgreSQL allows only one,
        // e.g. `1e` or `1.5x`.
        if adjacent {
            if let Some(prev) = self.out.last() {
                let numeric = matches!(
                    prev.kind,
                    TokenKind::IntegerConst | TokenKind::NumericConst | TokenKind::FloatConst
                );
                let ident_like = matches!(token.kind, TokenKind::Ident | TokenKind::Keyword(_));
                if numeric && ident_like {
                    return Err(Error::syntax(
                        prev.range.start(),
                        "trailing junk after numeric literal",
                    ));
                }
            }
        }
        self.out.push(token);
        Ok(())
    }

    /// Cooks the head literal of a possibly-continued string and leaves
    /// it open for continuation/`UESCAPE`.
    fn open(&mut self, mode: StringMode, body: &str, range: TextRange) -> Result<Token> {
        self.open_string = Some(mode);
        let kind = match mode {
            StringMode::Bit | StringMode::Hex => TokenKind::BitConst,
            _ => TokenKind::StringConst,
        };
        let mut value = String::new();
        match mode {
            StringMode::Bit => value.push('b'),
            StringMode::Hex => value.push('x'),
            _ => {}
        }
        value.push_str(&decode_part(mode, body, range)?);
        Ok(Token::new(kind, value, range))
    }

    /// Closes the trailing string literal: unicode bodies get their
    /// escapes decoded with the default escape character.
    fn finish_open_string(&mut self) -> Result<()> {
        if let Some(mode) = self.open_string.take() {
            if mode == StringMode::Unicode {
                let prev = self.out.last_mut().expect("open string has a token");
                prev.value = decode_unicode_escapes(&prev.value, '\\', prev.range)?;
            }
        }
        Ok(())
    }

    /// Optional `UESCAPE 'c'` after a `U&"..."` identifier.
    fn uescape(&mut self, range: TextRange) -> Result<char> {
        let is_uescape = matches!(
            self.raw.peek(),
            Some(RawItem { kind: Ok(RawToken::Ident), text, .. })
                if text.eq_ignore_ascii_case("uescape")
        );
        if !is_uescape {
            return Ok('\\');
        }
        self.raw.next();
        self.uescape_value(range)
    }

    /// The `'c'` literal after a consumed `UESCAPE` keyword.
    fn uescape_value(&mut self, range: TextRange) -> Result<char> {
        let item = self.raw.next().ok_or_else(|| {
            Error::syntax(range.start(), "UESCAPE must be followed by a simple literal")
        })?;
        let body: Vec<char> = if item.kind == Ok(RawToken::StringConst) {
            item.text[1..item.text.len() - 1].chars().collect()
        } else {
            Vec::new()
        };
        match body[..] {
            [c] if !c.is_ascii_hexdigit()
                && !c.is_whitespace()
                && !matches!(c, '+' | '\'' | '"') =>
            {
                Ok(c)
            }
            _ => Err(Error::syntax(
                item.range.start(),
                "invalid Unicode escape character",
            )),
        }
    }
}

fn collapse_doubled(body: &str, quote: char) -> String {
    let doubled: String = [quote, quote].iter().collect();
    body.replace(&doubled, &quote.to_string())
}

/// Decodes one literal part according to the string mode. Unicode
/// bodies keep their escapes; those are resolved once the whole literal
/// (plus any `UESCAPE`) is known.
fn decode_part(mode: StringMode, body: &str, range: TextRange) -> Result<String> {
    match mode {
        StringMode::Standard | StringMode::Unicode => Ok(collapse_doubled(body, '\'')),
        StringMode::Extended => decode_backslash_escapes(body, range),
        StringMode::Bit => {
            if let Some(bad) = body.chars().find(|c| !matches!(c, '0' | '1')) {
                return Err(Error::syntax(
                    range.start(),
                    format!("\"{bad}\" is not a valid binary digit"),
                ));
            }
            Ok(body.to_owned())
        }
        StringMode::Hex => {
            if let Some(bad) = body.chars().find(|c| !c.is_ascii_hexdigit()) {
                return Err(Error::syntax(
                    range.start(),
                    format!("\"{bad}\" is not a valid hexadecimal digit"),
                ));
            }
            Ok(body.to_owned())
        }
    }
}

fn decode_backslash_escapes(body: &str, range: TextRange) -> Result<String> {
    let err = || Error::syntax(range.start(), "invalid backslash escape");
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\'' {
            // the scanner only leaves doubled quotes in the body
            chars.next();
            out.push('\'');
            continue;
        }
        if c != '\\' {
            out.push(c);
            continue;
        }
        let esc = chars.next().ok_or_else(err)?;
        match esc {
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            '0'..='7' => {
                let mut v = esc.to_digit(8).expect("octal digit");
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(d) => {
                            chars.next();
                            v = v * 8 + d;
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(v).ok_or_else(err)?);
            }
            'x' => {
                let mut v = 0u32;
                let mut seen = 0;
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(16)) {
                        Some(d) => {
                            chars.next();
                            v = v * 16 + d;
                            seen += 1;
                        }
                        None => break,
                    }
                }
                if seen == 0 {
                    return Err(err());
                }
                out.push(char::from_u32(v).ok_or_else(err)?);
            }
            'u' => out.push(read_hex_escape(&mut chars, 4, range)?),
            'U' => out.push(read_hex_escape(&mut chars, 8, range)?),
            other => out.push(other),
        }
    }
    Ok(out)
}

fn read_hex_escape(
    chars: &mut std::iter::Peekable<std::str::Chars>,
    digits: u32,
    range: TextRange,
) -> Result<char> {
    let err = || Error::syntax(range.start(), "invalid Unicode escape value");
    let mut v = 0u32;
    for _ in 0..digits {
        let d = chars.next().and_then(|c| c.to_digit(16)).ok_or_else(err)?;
        v = v * 16 + d;
    }
    char::from_u32(v).ok_or_else(err)
}

/// Resolves `\XXXX`, `\+XXXXXX` and UTF-16 surrogate pairs in a
/// `U&'...'`/`U&"..."` body, `escape` being the active escape character.
fn decode_unicode_escapes(body: &str, escape: char, range: TextRange) -> Result<String> {
    let err = || Error::syntax(range.start(), "invalid Unicode escape value");
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    let mut pending_high: Option<u32> = None;
    while let Some(c) = chars.next() {
        if c != escape {
            if pending_high.is_some() {
                return Err(err());
            }
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&escape) {
            if pending_high.is_some() {
                return Err(err());
            }
            chars.next();
            out.push(escape);
            continue;
        }
        let mut v = 0u32;
        let digits = if chars.peek() == Some(&'+') {
            chars.next();
            6
        } else {
            4
        };
        for _ in 0..digits {
            let d = chars.next().and_then(|c| c.to_digit(16)).ok_or_else(err)?;
            v = v * 16 + d;
        }
        match (pending_high.take(), v) {
            (None, 0xD800..=0xDBFF) => pending_high = Some(v),
            (None, _) => out.push(char::from_u32(v).ok_or_else(err)?),
            (Some(high), 0xDC00..=0xDFFF) => {
                let combined = 0x10000 + ((high - 0xD800) << 10) + (v - 0xDC00);
                out.push(char::from_u32(combined).ok_or_else(err)?);
            }
            (Some(_), _) => return Err(err()),
        }
    }
    if pending_high.is_some() {
        return Err(err());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn check(input: &str, kind: TokenKind, value: &str) {
        let tokens = tokenize(input).unwrap();
        assert_eq!(tokens.len(), 2, "{input} should be one token: {tokens:?}");
        assert_eq!(tokens[0].kind, kind);
        assert_eq!(tokens[0].value, value);
    }

    fn check_err(input: &str, message: &str) {
        match tokenize(input) {
            Err(Error::Syntax { message: m, .. }) => assert!(
                m.contains(message),
                "expected {message:?} in {m:?} for {input}"
            ),
            other => panic!("expected syntax error for {input}, got {other:?}"),
        }
    }

    #[test]
    fn lex_idents_and_keywords() {
        check("hello", TokenKind::Ident, "hello");
        check("Hello$1", TokenKind::Ident, "hello$1");
        check("SeLeCt", TokenKind::Keyword(Keyword::SELECT), "select");
        check(r#""SELECT""#, TokenKind::QuotedIdent, "SELECT");
        check(r#""a""b""#, TokenKind::QuotedIdent, "a\"b");
    }

    #[test]
    fn lex_strings() {
        check("'it''s'", TokenKind::StringConst, "it's");
        check("e'a\\nb'", TokenKind::StringConst, "a\nb");
        check("E'\\x41\\102'", TokenKind::StringConst, "AB");
        check("n'abc'", TokenKind::StringConst, "abc");
        check("$$x$y$$", TokenKind::StringConst, "x$y");
        check("$tag$ $notag$ $tag$", TokenKind::StringConst, " $notag$ ");
        check("b'0101'", TokenKind::BitConst, "b0101");
        check("x'DEAD'", TokenKind::BitConst, "xDEAD");
    }

    #[test]
    fn lex_unicode_strings() {
        check(r"U&'d\0061t\+000061'", TokenKind::StringConst, "data");
        check(r"u&'\0441\043B\043E\043D'", TokenKind::StringConst, "слон");
        check("U&'d!0061t!+000061' UESCAPE '!'", TokenKind::StringConst, "data");
        check(r#"U&"d\0061t\+000061""#, TokenKind::QuotedIdent, "data");
        check(r"U&'\d83d\de04'", TokenKind::StringConst, "\u{1F604}");
        check_err(r"U&'\d83dx'", "invalid Unicode escape");
        check_err("U&'x' UESCAPE 'ab'", "invalid Unicode escape character");
    }

    #[test]
    fn string_continuation_needs_a_newline() {
        check("'a'\n'b'", TokenKind::StringConst, "ab");
        check("'a' \t\n 'b'\n'c'", TokenKind::StringConst, "abc");
        check("e'a\\n' \n 'b''c'", TokenKind::StringConst, "a\nb'c");
        let tokens = tokenize("'a' 'b'").unwrap();
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn lex_numbers() {
        check("42", TokenKind::IntegerConst, "42");
        check("3.5", TokenKind::NumericConst, "3.5");
        check(".5", TokenKind::NumericConst, ".5");
        check("4.", TokenKind::NumericConst, "4.");
        check("1e10", TokenKind::FloatConst, "1e10");
        check("1.5e-3", TokenKind::FloatConst, "1.5e-3");
        // too big for i64 stays a string-typed numeric constant
        check("99999999999999999999", TokenKind::NumericConst, "99999999999999999999");
        check_err("1e", "trailing junk");
        check_err("123abc", "trailing junk");
    }

    #[test]
    fn lex_operators() {
        check("+", TokenKind::Plus, "+");
        check("<=", TokenKind::LtEq, "<=");
        check("!=", TokenKind::NotEq, "<>");
        check("<>", TokenKind::NotEq, "<>");
        check("=>", TokenKind::EqualsGreater, "=>");
        check("||", TokenKind::Op, "||");
        check("@>", TokenKind::Op, "@>");
        check("~~", TokenKind::Op, "~~");
        // a trailing +/- needs one of ~ ! @ # % ^ & | ` ? in the operator
        check("@-", TokenKind::Op, "@-");
        let tokens = tokenize("=-1").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Eq);
        assert_eq!(tokens[1].kind, TokenKind::Minus);
        assert_eq!(tokens[2].kind, TokenKind::IntegerConst);
    }

    #[test]
    fn operator_stops_before_comment() {
        let tokens = tokenize("1 <--2\n+ 3").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::IntegerConst,
                TokenKind::Lt,
                TokenKind::Plus,
                TokenKind::IntegerConst,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_comments() {
        let tokens = tokenize("1 -- one\n/* two /* nested */ */ 2").unwrap();
        assert_eq!(tokens.len(), 3);
        check_err("/* open /* and open", "unterminated block comment");
    }

    #[test]
    fn lex_params_and_punctuation() {
        check("$3", TokenKind::Positional, "3");
        check(":name", TokenKind::NamedParam, "name");
        let tokens = tokenize("a.b::int[2]").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident,
                TokenKind::Dot,
                TokenKind::Ident,
                TokenKind::Typecast,
                TokenKind::Keyword(Keyword::INT),
                TokenKind::LBracket,
                TokenKind::IntegerConst,
                TokenKind::RBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_failures_carry_positions() {
        check_err("'no end", "unterminated string");
        check_err("$tag$ no end", "unterminated dollar-quoted string");
        check_err("\"no end", "unterminated quoted identifier");
        let err = tokenize("select 'no end").unwrap_err();
        assert_eq!(err.position(), Some(TextSize::from(7)));
    }
}
