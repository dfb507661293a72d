// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Raw token definitions for the [`logos`] scanner.
//!
//! The raw layer only slices the input; decoding escape sequences,
//! folding identifier case and classifying keywords happens in the
//! cooking pass in [`super`]. Scanning rules that cannot be expressed
//! as a regular expression (matching dollar-quote tags, nested block
//! comments, the operator trailing `+`/`-` rule) live in callbacks.

use logos::{Lexer, Logos};

/// Characters that may form a multi-character operator.
const OP_CHARS: &[u8] = b"+-*/<>=~!@#%^&|`?";

/// Characters that license a trailing `+` or `-` in an operator.
const OP_SPECIAL_CHARS: &[u8] = b"~!@#%^&|`?";

/// Scan failure raised by a callback, carried as the logos error type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LexError {
    #[default]
    UnexpectedCharacter,
    UnterminatedString,
    UnterminatedDollarString,
    UnterminatedQuotedIdentifier,
    UnterminatedBlockComment,
}

impl LexError {
    pub fn message(self) -> &'static str {
        match self {
            Self::UnexpectedCharacter => "unexpected character",
            Self::UnterminatedString => "unterminated string constant",
            Self::UnterminatedDollarString => "unterminated dollar-quoted string",
            Self::UnterminatedQuotedIdentifier => "unterminated quoted identifier",
            Self::UnterminatedBlockComment => "unterminated block comment",
        }
    }
}

#[derive(Logos, Debug, Copy, Clone, PartialEq, Eq)]
#[logos(error = LexError)]
pub enum RawToken {
    #[regex(r"[ \t\n\r\x0b\x0c]+")]
    Whitespace,

    #[regex(r"--[^\n\r]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    #[token("'", standard_string)]
    StringConst,

    #[regex(r"[eE]'", extended_string)]
    EscapeStringConst,

    #[regex(r"[nN]'", standard_string)]
    NationalStringConst,

    #[regex(r"[bB]'", standard_string)]
    BitStringConst,

    #[regex(r"[xX]'", standard_string)]
    HexStringConst,

    #[regex(r"[uU]&'", standard_string)]
    UnicodeStringConst,

    #[token("\"", quoted_ident)]
    QuotedIdent,

    #[regex(r#"[uU]&""#, quoted_ident)]
    UnicodeQuotedIdent,

    #[regex(r"(\$([a-zA-Z_\u{0080}-\u{10FFFF}][a-zA-Z0-9_\u{0080}-\u{10FFFF}]*)?\$)", dollar_string)]
    DollarStringConst,

    #[regex(r"[a-zA-Z_\u{0080}-\u{10FFFF}][a-zA-Z0-9_$\u{0080}-\u{10FFFF}]*")]
    Ident,

    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r"([0-9]+\.[0-9]*|\.[0-9]+)")]
    Numeric,

    #[regex(r"([0-9]+|[0-9]+\.[0-9]*|\.[0-9]+)[eE][+-]?[0-9]+")]
    Float,

    #[regex(r"\$[0-9]+")]
    Positional,

    #[regex(r":[a-zA-Z_\u{0080}-\u{10FFFF}][a-zA-Z0-9_\u{0080}-\u{10FFFF}]*")]
    NamedParam,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token("::")]
    Typecast,

    #[token(":=")]
    ColonEquals,

    #[token(":")]
    Colon,

    #[token("..")]
    DotDot,

    #[token(".")]
    Dot,

    #[regex(r"[+\-*/<>=~!@#%^&|`?]", operator)]
    Op,
}

impl RawToken {
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::LineComment | Self::BlockComment)
    }
}

/// Consumes a nested `/* ... */` comment body, the opening `/*` already
/// being part of the slice.
fn block_comment(lex: &mut Lexer<RawToken>) -> Result<(), LexError> {
    let rem = lex.remainder().as_bytes();
    let mut depth = 1usize;
    let mut i = 0usize;
    while i < rem.len() {
        if rem[i] == b'/' && rem.get(i + 1) == Some(&b'*') {
            depth += 1;
            i += 2;
        } else if rem[i] == b'*' && rem.get(i + 1) == Some(&b'/') {
            depth -= 1;
            i += 2;
            if depth == 0 {
                lex.bump(i);
                return Ok(());
            }
        } else {
            i += 1;
        }
    }
    Err(LexError::UnterminatedBlockComment)
}

/// Consumes a quote-delimited body where the delimiter is escaped by
/// doubling. The opening delimiter is already part of the slice.
fn delimited(lex: &mut Lexer<RawToken>, delim: u8, err: LexError) -> Result<(), LexError> {
    let rem = lex.remainder().as_bytes();
    let mut i = 0usize;
    while i < rem.len() {
        if rem[i] == delim {
            if rem.get(i + 1) == Some(&delim) {
                i += 2;
                continue;
            }
            lex.bump(i + 1);
            return Ok(());
        }
        i += 1;
    }
    Err(err)
}

fn standard_string(lex: &mut Lexer<RawToken>) -> Result<(), LexError> {
    delimited(lex, b'\'', LexError::UnterminatedString)
}

fn quoted_ident(lex: &mut Lexer<RawToken>) -> Result<(), LexError> {
    delimited(lex, b'"', LexError::UnterminatedQuotedIdentifier)
}

/// Consumes an `E'...'` body where both `''` and backslash escapes keep
/// the string open.
fn extended_string(lex: &mut Lexer<RawToken>) -> Result<(), LexError> {
    let rem = lex.remainder().as_bytes();
    let mut i = 0usize;
    while i < rem.len() {
        match rem[i] {
            b'\\' if i + 1 < rem.len() => i += 2,
            b'\\' => break,
            b'\'' => {
                if rem.get(i + 1) == Some(&b'\'') {
                    i += 2;
                    continue;
                }
                lex.bump(i + 1);
                return Ok(());
            }
            _ => i += 1,
        }
    }
    Err(LexError::UnterminatedString)
}

/// The slice holds the opening `$tag$`; the body runs until the same
/// tag occurs again and is otherwise uninterpreted.
fn dollar_string(lex: &mut Lexer<RawToken>) -> Result<(), LexError> {
    let tag = lex.slice().to_owned();
    match lex.remainder().find(&tag) {
        Some(idx) => {
            lex.bump(idx + tag.len());
            Ok(())
        }
        None => Err(LexError::UnterminatedDollarString),
    }
}

/// Extends a single operator character to the longest operator the
/// PostgreSQL scanner would accept: the run of operator characters up
/// to (but not including) an embedded `--` or `/*`, with trailing `+`
/// or `-` dropped unless one of [`OP_SPECIAL_CHARS`] occurs earlier in
/// the operator.
fn operator(lex: &mut Lexer<RawToken>) -> Result<(), LexError> {
    let rem = lex.remainder().as_bytes();
    let mut text = vec![lex.slice().as_bytes()[0]];
    text.extend(rem.iter().take_while(|c| OP_CHARS.contains(c)));

    let mut len = text.len();
    for i in 0..text.len() - 1 {
        if (text[i] == b'-' && text[i + 1] == b'-') || (text[i] == b'/' && text[i + 1] == b'*') {
            len = i;
            break;
        }
    }
    if !text[..len].iter().any(|c| OP_SPECIAL_CHARS.contains(c)) {
        while len > 1 && (text[len - 1] == b'+' || text[len - 1] == b'-') {
            len -= 1;
        }
    }
    lex.bump(len - 1);
    Ok(())
}
