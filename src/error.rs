// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Error types shared by the lexer, the parser and the SQL printer.

use text_size::TextSize;

/// All failures this library can surface.
///
/// Parsing aborts at the first token that cannot be matched; there is no
/// error recovery. Tree mutations fail fast and leave the tree unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The lexer or parser could not match the input at `position`
    /// (a byte offset into the source text).
    #[error("syntax error at byte {position:?}: {message}")]
    Syntax { position: TextSize, message: String },

    /// Programmatic misuse of the tree API, e.g. inserting a node of the
    /// wrong variant into a typed list.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation was dispatched on a node kind it does not support.
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

impl Error {
    pub(crate) fn syntax(position: TextSize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Byte offset of a syntax error, if this is one.
    pub fn position(&self) -> Option<TextSize> {
        match self {
            Self::Syntax { position, .. } => Some(*position),
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
