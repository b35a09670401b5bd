//! The diagnostic catalogue and the bounded error/warning sink.
//!
//! Every message the reader can emit is a [`Diagnostic`] variant; the sink
//! formats it with its source position into the `"Error: line L, col C - …"`
//! strings exposed through the public API. Warnings carry the flag bit of the
//! extension they belong to: when that bit is clear in the reader's flags the
//! warning is promoted to an error. Nothing here ever aborts the parse.

use alloc::{format, string::String, vec::Vec};
use thiserror::Error;

use crate::options::Flags;

#[derive(Debug, Clone, PartialEq, Error)]
pub(crate) enum Diagnostic {
    #[error("cannot find a start object/array character")]
    StartMissing,
    #[error("strange '/' (did you want to insert a comment?)")]
    StraySlash,
    #[error("comments are not part of JSON syntax")]
    CommentExtension,
    #[error("unknown escaped character '\\{0}'")]
    UnknownEscape(char),
    #[error("Invalid Unicode Escaped Sequence")]
    InvalidUnicodeEscape,
    #[error("string value: the UTF-8 stream is invalid")]
    InvalidUtf8,
    #[error("multiline strings are not allowed by JSON syntax")]
    SplitString,
    #[error("string value '{0}' cannot follow another value")]
    StringAfterValue(String),
    #[error("the '{0}' literal must be lowercase")]
    MixedCaseLiteral(&'static str),
    #[error("literal '{0}' is incorrect (did you forget quotes?)")]
    BadLiteral(String),
    #[error("value '{0}' cannot follow a value: ',' or ':' missing?")]
    ValueAfterValue(String),
    #[error("'{0}' is not allowed here ('name' is missing)")]
    NameMissing(char),
    #[error("'{0}' cannot follow a 'value'")]
    OpenAfterValue(char),
    #[error("trying to close an array using the '}}' (close-object) char")]
    CloseArrayWithBrace,
    #[error("trying to close an object using the ']' (close-array) char")]
    CloseObjectWithBracket,
    #[error("'{0}' missing at end of file")]
    EofBeforeClose(char),
    #[error("':' can only be used in an object's values")]
    ColonOutsideObject,
    #[error("':' follows a value which is not of type 'string'")]
    ColonAfterNonString,
    #[error("':' not allowed where a 'name' string was already available")]
    ColonAfterName,
    #[error("key or value is missing for JSON value")]
    KeyOrValueMissing,
    #[error("cannot store the value: 'value' is missing for JSON object type")]
    ObjectValueMissing,
    #[error("cannot store the value: 'key' is missing for JSON object type")]
    ObjectKeyMissing,
    #[error("cannot store the item: 'value' is missing for JSON array type")]
    ArrayValueMissing,
    #[error("cannot store the item: key '{0}' is not permitted in JSON array type")]
    KeyInArray(String),
    #[error("the 'memory buffer' type is not valid JSON text")]
    MemBufExtension,
    #[error("the 'memory buffer' type contains {0} invalid digits")]
    MemBufBadDigits(usize),
    #[error("memory buffer value cannot follow another value")]
    MemBufAfterValue,
    #[error("cannot find a value for storing the comment")]
    CommentHasNoTarget,
    #[error("maximum nesting depth ({0}) exceeded")]
    DepthExceeded(usize),
}

/// Bounded, ordered error and warning lists.
#[derive(Debug)]
pub(crate) struct Diagnostics {
    flags: Flags,
    max: usize,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Diagnostics {
    pub(crate) fn new(flags: Flags, max: usize) -> Self {
        Self {
            flags,
            max,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn reset(&mut self) {
        self.errors.clear();
        self.warnings.clear();
    }

    pub(crate) fn error(&mut self, line: usize, col: usize, msg: Diagnostic) {
        if self.errors.len() < self.max {
            self.errors
                .push(format!("Error: line {line}, col {col} - {msg}"));
        } else if self.errors.len() == self.max {
            self.errors.push(String::from(
                "Error: too many error messages - ignoring further errors",
            ));
        }
    }

    /// Adds a warning, or an error when `kind` names an extension that is
    /// not enabled. A `kind` of [`Flags::STRICT`] (no bits) is unconditional.
    pub(crate) fn warning(&mut self, kind: Flags, line: usize, col: usize, msg: Diagnostic) {
        if !kind.is_empty() && !self.flags.intersects(kind) {
            self.error(line, col, msg);
            return;
        }
        if self.warnings.len() < self.max {
            self.warnings
                .push(format!("Warning: line {line}, col {col} - {msg}"));
        } else if self.warnings.len() == self.max {
            self.warnings.push(String::from(
                "Error: too many warning messages - ignoring further warnings",
            ));
        }
    }

    pub(crate) fn errors(&self) -> &[String] {
        &self.errors
    }

    pub(crate) fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub(crate) fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub(crate) fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{Diagnostic, Diagnostics};
    use crate::options::Flags;

    #[test]
    fn error_formatting() {
        let mut d = Diagnostics::new(Flags::STRICT, 4);
        d.error(3, 7, Diagnostic::KeyOrValueMissing);
        assert_eq!(
            d.errors(),
            ["Error: line 3, col 7 - key or value is missing for JSON value"]
        );
    }

    #[test]
    fn warning_promotes_when_extension_is_off() {
        let mut d = Diagnostics::new(Flags::STRICT, 4);
        d.warning(Flags::MISSING, 1, 2, Diagnostic::EofBeforeClose(']'));
        assert_eq!(d.warning_count(), 0);
        assert_eq!(
            d.errors(),
            ["Error: line 1, col 2 - ']' missing at end of file"]
        );
    }

    #[test]
    fn warning_kept_when_extension_is_on() {
        let mut d = Diagnostics::new(Flags::MISSING, 4);
        d.warning(Flags::MISSING, 1, 2, Diagnostic::EofBeforeClose(']'));
        assert_eq!(d.error_count(), 0);
        assert_eq!(
            d.warnings(),
            ["Warning: line 1, col 2 - ']' missing at end of file"]
        );
    }

    #[test]
    fn unconditional_warning() {
        let mut d = Diagnostics::new(Flags::STRICT, 4);
        d.warning(Flags::STRICT, 1, 1, Diagnostic::CommentExtension);
        assert_eq!(d.warning_count(), 1);
    }

    #[test]
    fn sentinel_caps_the_list() {
        let mut d = Diagnostics::new(Flags::STRICT, 2);
        for _ in 0..5 {
            d.error(1, 1, Diagnostic::KeyOrValueMissing);
        }
        assert_eq!(d.error_count(), 3);
        assert_eq!(
            d.errors().last().map(|s| s.as_str()),
            Some("Error: too many error messages - ignoring further errors")
        );
    }

    #[test]
    fn brace_messages_render() {
        use alloc::string::ToString;

        assert_eq!(
            Diagnostic::CloseArrayWithBrace.to_string(),
            "trying to close an array using the '}' (close-object) char"
        );
        assert_eq!(
            Diagnostic::UnknownEscape('q').to_string(),
            "unknown escaped character '\\q'"
        );
    }
}
