//! The fault-tolerant recursive descent reader.
//!
//! [`JsonReader`] drives a character dispatcher over a [`ByteSource`]. Each
//! activation of `do_read` is one *frame*: it owns a pending
//! `key` and `value` until the next `,` or closing bracket commits them into
//! the parent container. Errors never abort the parse; every path stores
//! what it can and advances, which is what makes the reader usable from
//! editors and linters as well as strict consumers.

use alloc::{string::String, vec, vec::Vec};
use core::mem;

use crate::{
    diagnostics::{Diagnostic, Diagnostics},
    escape::{self, Step, UnicodeEscapeBuffer},
    literal, membuf,
    options::{Flags, ReaderOptions},
    source::{ByteSource, ByteStream},
    value::{CommentPosition, Value, ValueKind},
};

/// Frame-relative target of a comment-cursor hint.
///
/// Hints describe *which slot* a floating comment would refer to, never a
/// stored reference into the tree; they are resolved against the live frame
/// locals at attachment time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hint {
    None,
    /// The frame's parent container, observed at its closing bracket.
    Parent { line: usize },
    /// The frame's pending value slot; `line` is the match line for inline
    /// attachment.
    Pending { line: Option<usize> },
}

/// Where the last committed value went inside the parent.
#[derive(Debug, Clone)]
enum LastLoc {
    Key(String),
    Tail,
}

#[derive(Debug)]
struct Cursor {
    current: Hint,
    next_pending: bool,
}

/// A reusable, single-threaded JSON reader.
///
/// Construction is cheap; one reader per thread is the supported pattern.
/// The diagnostic lists persist after a parse for inspection and are cleared
/// when the next parse starts.
///
/// # Examples
///
/// ```rust
/// use jsonlax::{Flags, JsonReader, ReaderOptions, Value};
///
/// let mut reader = JsonReader::new(ReaderOptions {
///     flags: Flags::TOLERANT,
///     ..Default::default()
/// });
/// let mut root = Value::invalid();
/// let errors = reader.parse_str("{ \"answer\": 42 }", &mut root);
/// assert_eq!(errors, 0);
/// assert_eq!(root.get("answer").and_then(Value::as_i64), Some(42));
/// ```
#[derive(Debug)]
pub struct JsonReader {
    flags: Flags,
    max_depth: usize,
    diags: Diagnostics,
    level: usize,
    depth: usize,
    no_utf8: bool,
    cursor: Cursor,
    comment: String,
    comment_line: usize,
}

impl Default for JsonReader {
    fn default() -> Self {
        Self::new(ReaderOptions::default())
    }
}

impl JsonReader {
    #[must_use]
    pub fn new(options: ReaderOptions) -> Self {
        Self {
            flags: options.flags,
            max_depth: options.max_depth,
            diags: Diagnostics::new(options.flags, options.max_errors),
            level: 0,
            depth: 0,
            no_utf8: false,
            cursor: Cursor {
                current: Hint::None,
                next_pending: false,
            },
            comment: String::new(),
            comment_line: 0,
        }
    }

    /// Shorthand for [`JsonReader::new`] with everything but `flags` left at
    /// its default.
    #[must_use]
    pub fn with_flags(flags: Flags) -> Self {
        Self::new(ReaderOptions {
            flags,
            ..ReaderOptions::default()
        })
    }

    /// Parses a text buffer into `root` and returns the number of errors.
    ///
    /// The text is already UTF-8 by construction, so the
    /// [`NOUTF8_STREAM`](Flags::NOUTF8_STREAM) flag is ignored on this
    /// surface.
    pub fn parse_str(&mut self, text: &str, root: &mut Value) -> usize {
        self.no_utf8 = false;
        self.run(ByteSource::new(text.as_bytes()), root)
    }

    /// Parses a byte stream into `root` and returns the number of errors.
    ///
    /// If `root` already holds a container of the kind the document opens
    /// with, the parsed children are appended to it; a kind mismatch resets
    /// it first.
    pub fn parse<S: ByteStream>(&mut self, stream: S, root: &mut Value) -> usize {
        self.no_utf8 = self.flags.contains(Flags::NOUTF8_STREAM);
        self.run(ByteSource::new(stream), root)
    }

    /// Syntax-checks a stream without keeping the parsed tree.
    pub fn check<S: ByteStream>(&mut self, stream: S) -> usize {
        let mut scratch = Value::invalid();
        self.parse(stream, &mut scratch)
    }

    #[must_use]
    pub fn errors(&self) -> &[String] {
        self.diags.errors()
    }

    #[must_use]
    pub fn warnings(&self) -> &[String] {
        self.diags.warnings()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.diags.error_count()
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.diags.warning_count()
    }

    /// Maximum nesting depth reached by the last parse.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    fn run<S: ByteStream>(&mut self, mut src: ByteSource<S>, root: &mut Value) -> usize {
        self.level = 0;
        self.depth = 0;
        self.diags.reset();
        self.comment.clear();
        self.comment_line = 0;
        self.cursor = Cursor {
            current: Hint::None,
            next_pending: true,
        };
        root.clear_line();

        match self.get_start(&mut src, root) {
            Some(b'{') => root.set_kind(ValueKind::Object),
            Some(b'[') => root.set_kind(ValueKind::Array),
            _ => {
                self.error(&src, Diagnostic::StartMissing);
                return self.diags.error_count();
            }
        }
        self.do_read(&mut src, root);
        self.diags.error_count()
    }

    /// Scans for the opening `{` or `[`, ignoring everything else. Comments
    /// encountered on the way may be deposited into the root.
    fn get_start<S: ByteStream>(
        &mut self,
        src: &mut ByteSource<S>,
        root: &mut Value,
    ) -> Option<u8> {
        let mut ch = src.read();
        loop {
            match ch? {
                b'{' | b'[' => return ch,
                b'/' => {
                    ch = self.skip_comment(src);
                    self.attach_root_comment(src, root);
                }
                _ => ch = src.read(),
            }
        }
    }

    /// One frame of the recursive engine. Returns the first byte after the
    /// frame's closing bracket, or `None` when the input ended first.
    fn do_read<S: ByteStream>(&mut self, src: &mut ByteSource<S>, parent: &mut Value) -> Option<u8> {
        self.level += 1;
        if self.depth < self.level {
            self.depth = self.level;
        }

        let mut key = String::new();
        let mut value = Value::invalid();
        let mut last: Option<(LastLoc, usize)> = None;

        parent.set_line(src.line());
        self.cursor.current = Hint::None;
        self.cursor.next_pending = true;

        let mut ch = src.read();
        loop {
            let Some(c) = ch else { break };
            match c {
                b' ' | b'\t' | b'\n' | b'\r' => {
                    ch = self.skip_whitespace(src);
                }
                b'/' => {
                    ch = self.skip_comment(src);
                    self.attach_comment(src, parent, &mut value, &last);
                }
                b'{' | b'[' => {
                    let kind = if c == b'{' {
                        ValueKind::Object
                    } else {
                        ValueKind::Array
                    };
                    if parent.is_object() && key.is_empty() {
                        self.error(src, Diagnostic::NameMissing(c as char));
                    }
                    if value.is_valid() {
                        self.error(src, Diagnostic::OpenAfterValue(c as char));
                    }
                    value.set_kind(kind);
                    if self.level >= self.max_depth {
                        self.error(src, Diagnostic::DepthExceeded(self.max_depth));
                        value.set_line(src.line());
                        ch = self.skip_balanced(src);
                    } else {
                        ch = self.do_read(src, &mut value);
                    }
                    // The frame that just closed was this frame's pending
                    // slot; a comment on the closer's line refers to it.
                    if let Hint::Parent { line } = self.cursor.current {
                        self.cursor.current = Hint::Pending { line: Some(line) };
                    }
                    self.cursor.next_pending = false;
                }
                b'}' => {
                    if !parent.is_object() {
                        self.warning(src, Flags::MISSING, Diagnostic::CloseArrayWithBrace);
                    }
                    self.store_value(src, Some(b'}'), &mut key, &mut value, parent, &mut last);
                    self.cursor.current = Hint::Parent { line: src.line() };
                    self.cursor.next_pending = false;
                    self.level -= 1;
                    return src.read();
                }
                b']' => {
                    if !parent.is_array() {
                        self.warning(src, Flags::MISSING, Diagnostic::CloseObjectWithBracket);
                    }
                    self.store_value(src, Some(b']'), &mut key, &mut value, parent, &mut last);
                    self.cursor.current = Hint::Parent { line: src.line() };
                    self.cursor.next_pending = false;
                    self.level -= 1;
                    return src.read();
                }
                b',' => {
                    self.store_value(src, Some(b','), &mut key, &mut value, parent, &mut last);
                    key.clear();
                    ch = src.read();
                }
                b'"' => {
                    ch = self.read_string(src, &mut value);
                    self.cursor.current = Hint::Pending { line: value.line() };
                    self.cursor.next_pending = false;
                }
                b'\'' => {
                    ch = self.read_membuf(src, &mut value);
                    self.cursor.current = Hint::Pending { line: value.line() };
                    self.cursor.next_pending = false;
                }
                b':' => {
                    self.cursor.current = Hint::Pending {
                        line: Some(src.line()),
                    };
                    self.cursor.next_pending = false;
                    if !parent.is_object() {
                        self.error(src, Diagnostic::ColonOutsideObject);
                    } else if !value.is_string() {
                        self.error(src, Diagnostic::ColonAfterNonString);
                    } else if !key.is_empty() {
                        self.error(src, Diagnostic::ColonAfterName);
                    } else {
                        key = value.take_string();
                    }
                    ch = src.read();
                }
                _ => {
                    self.cursor.current = Hint::Pending {
                        line: Some(src.line()),
                    };
                    self.cursor.next_pending = false;
                    ch = self.read_value(src, c, &mut value);
                }
            }
        }

        // End of input before the closing bracket: report it, commit what is
        // pending, and unwind.
        if parent.is_array() {
            self.warning(src, Flags::MISSING, Diagnostic::EofBeforeClose(']'));
        } else if parent.is_object() {
            self.warning(src, Flags::MISSING, Diagnostic::EofBeforeClose('}'));
        }
        self.store_value(src, None, &mut key, &mut value, parent, &mut last);
        self.level -= 1;
        None
    }

    /// Commits the pending `key`/`value` pair into `parent`. `trigger` is the
    /// byte that caused the commit (`,`, `}`, `]`) or `None` at end of input.
    fn store_value<S: ByteStream>(
        &mut self,
        src: &ByteSource<S>,
        trigger: Option<u8>,
        key: &mut String,
        value: &mut Value,
        parent: &mut Value,
        last: &mut Option<(LastLoc, usize)>,
    ) {
        self.cursor.current = Hint::None;
        self.cursor.next_pending = true;
        *last = None;

        if !value.is_valid() && key.is_empty() {
            // An empty container or a trailing separator is fine at a
            // closer; anywhere else something is missing.
            if !matches!(trigger, Some(b'}') | Some(b']')) {
                self.error(src, Diagnostic::KeyOrValueMissing);
            }
        } else if parent.is_object() {
            if !value.is_valid() {
                self.error(src, Diagnostic::ObjectValueMissing);
            } else if key.is_empty() {
                self.error(src, Diagnostic::ObjectKeyMissing);
            } else {
                let stored = mem::replace(value, Value::invalid());
                *last = Some((LastLoc::Key(key.clone()), src.line()));
                parent.insert(mem::take(key), stored);
            }
        } else if parent.is_array() {
            if !value.is_valid() {
                self.error(src, Diagnostic::ArrayValueMissing);
            } else {
                if !key.is_empty() {
                    self.error(src, Diagnostic::KeyInArray(key.clone()));
                }
                let stored = mem::replace(value, Value::invalid());
                *last = Some((LastLoc::Tail, src.line()));
                parent.push(stored);
            }
        }
        // The slot is reused for the next element; any comments it still
        // carries moved into the tree with the stored value.
        *value = Value::invalid();
    }

    fn skip_whitespace<S: ByteStream>(&mut self, src: &mut ByteSource<S>) -> Option<u8> {
        loop {
            let ch = src.read()?;
            if !matches!(ch, b' ' | b'\t' | b'\n' | b'\r') {
                return Some(ch);
            }
        }
    }

    /// Consumes a `//` or `/* */` comment, leaving its text in the
    /// accumulator, and returns the byte after it. A `/` that opens neither
    /// form is an error; recovery discards through `*/` or end-of-line.
    fn skip_comment<S: ByteStream>(&mut self, src: &mut ByteSource<S>) -> Option<u8> {
        self.comment.clear();
        let ch = src.read()?;
        match ch {
            b'/' => {
                self.warning(src, Flags::ALLOW_COMMENTS, Diagnostic::CommentExtension);
                self.comment_line = src.line();
                let mut buf = vec![b'/', b'/'];
                let tail = loop {
                    match src.read() {
                        None => break None,
                        Some(c @ (b'\n' | b'\r')) => break Some(c),
                        Some(c) => buf.push(c),
                    }
                };
                self.comment = self.text_from(buf);
                tail
            }
            b'*' => {
                self.warning(src, Flags::ALLOW_COMMENTS, Diagnostic::CommentExtension);
                self.comment_line = src.line();
                let mut buf = vec![b'/', b'*'];
                let tail = loop {
                    match src.read() {
                        None => break None,
                        Some(b'*') if src.peek() == Some(b'/') => {
                            src.read();
                            buf.extend_from_slice(b"*/");
                            break src.read();
                        }
                        Some(c) => buf.push(c),
                    }
                };
                self.comment = self.text_from(buf);
                tail
            }
            _ => {
                self.error(src, Diagnostic::StraySlash);
                loop {
                    match src.read() {
                        None => return None,
                        Some(b'*') if src.peek() == Some(b'/') => {
                            src.read();
                            break;
                        }
                        Some(b'\n' | b'\r') => break,
                        Some(_) => {}
                    }
                }
                src.read()
            }
        }
    }

    /// Binds the accumulated comment to a value, or discards it when comment
    /// storage is off. First match wins: an inline hint on the comment's own
    /// line, then the flag-selected After/Before fallback.
    fn attach_comment<S: ByteStream>(
        &mut self,
        src: &ByteSource<S>,
        parent: &mut Value,
        value: &mut Value,
        last: &Option<(LastLoc, usize)>,
    ) {
        if !self.flags.contains(Flags::STORE_COMMENTS) || self.comment.is_empty() {
            self.comment.clear();
            return;
        }
        let text = mem::take(&mut self.comment);
        let line = self.comment_line;

        match self.cursor.current {
            Hint::Parent { line: l } if l == line => {
                parent.add_comment(text, CommentPosition::Inline);
                return;
            }
            Hint::Pending { line: Some(l) } if l == line => {
                value.add_comment(text, CommentPosition::Inline);
                return;
            }
            _ => {}
        }
        if self.cursor.next_pending && value.line() == Some(line) {
            value.add_comment(text, CommentPosition::Inline);
            return;
        }
        if let Some((loc, l)) = last {
            if *l == line {
                if let Some(target) = Self::resolve_last(parent, loc) {
                    target.add_comment(text, CommentPosition::Inline);
                    return;
                }
            }
        }

        if self.flags.contains(Flags::COMMENTS_AFTER) {
            if matches!(self.cursor.current, Hint::Pending { .. }) && value.is_valid() {
                value.add_comment(text, CommentPosition::After);
            } else if let Some(target) = last
                .as_ref()
                .and_then(|(loc, _)| Self::resolve_last(parent, loc))
            {
                target.add_comment(text, CommentPosition::After);
            } else {
                self.error(src, Diagnostic::CommentHasNoTarget);
            }
        } else if self.cursor.next_pending {
            value.add_comment(text, CommentPosition::Before);
        } else {
            self.error(src, Diagnostic::CommentHasNoTarget);
        }
    }

    /// Comments read before the root's opening bracket can only refer to the
    /// root itself.
    fn attach_root_comment<S: ByteStream>(&mut self, src: &ByteSource<S>, root: &mut Value) {
        if !self.flags.contains(Flags::STORE_COMMENTS) || self.comment.is_empty() {
            self.comment.clear();
            return;
        }
        let text = mem::take(&mut self.comment);
        if self.flags.contains(Flags::COMMENTS_AFTER) {
            self.error(src, Diagnostic::CommentHasNoTarget);
        } else {
            root.add_comment(text, CommentPosition::Before);
        }
    }

    fn resolve_last<'a>(parent: &'a mut Value, loc: &LastLoc) -> Option<&'a mut Value> {
        match loc {
            LastLoc::Key(k) => parent.get_mut(k),
            LastLoc::Tail => parent.last_mut(),
        }
    }

    /// Reads a quoted string into the pending slot, or concatenates it onto
    /// an already-pending string when the input splits one across lines.
    fn read_string<S: ByteStream>(
        &mut self,
        src: &mut ByteSource<S>,
        value: &mut Value,
    ) -> Option<u8> {
        let mut buf: Vec<u8> = Vec::new();
        loop {
            let Some(ch) = src.read() else { break };
            if ch == b'"' {
                break;
            }
            if ch != b'\\' {
                buf.push(ch);
                continue;
            }
            let Some(esc) = src.read() else { break };
            match esc {
                b't' => buf.push(b'\t'),
                b'n' => buf.push(b'\n'),
                b'b' => buf.push(0x08),
                b'r' => buf.push(b'\r'),
                b'f' => buf.push(0x0C),
                b'"' => buf.push(b'"'),
                b'\\' => buf.push(b'\\'),
                b'/' => buf.push(b'/'),
                b'u' => {
                    if !self.read_ues(src, &mut buf) {
                        break;
                    }
                }
                other => self.error(src, Diagnostic::UnknownEscape(other as char)),
            }
        }

        let s = if self.no_utf8 {
            buf.iter().map(|&b| b as char).collect()
        } else {
            match String::from_utf8(buf) {
                Ok(s) => s,
                Err(_) => {
                    self.error(src, Diagnostic::InvalidUtf8);
                    String::from("<UTF-8 stream not valid>")
                }
            }
        };

        if !value.is_valid() {
            value.set_string(s);
            value.set_line(src.line());
        } else if value.is_string() {
            self.warning(src, Flags::MULTISTRING, Diagnostic::SplitString);
            value.cat_str(&s);
            value.set_line(src.line());
        } else {
            self.error(src, Diagnostic::StringAfterValue(s));
        }
        src.read()
    }

    /// Consumes the four hex digits of a `\uXXXX` escape and appends the
    /// decoded code unit. Returns `false` when the input ended inside the
    /// escape.
    fn read_ues<S: ByteStream>(&mut self, src: &mut ByteSource<S>, out: &mut Vec<u8>) -> bool {
        let mut ues = UnicodeEscapeBuffer::new();
        let mut unit = None;
        let mut bad = false;
        for _ in 0..4 {
            let Some(c) = src.read() else {
                self.error(src, Diagnostic::InvalidUnicodeEscape);
                return false;
            };
            match ues.feed(c) {
                Step::NeedMore => {}
                Step::Done(u) => unit = Some(u),
                Step::NonHex => bad = true,
            }
        }
        match unit {
            Some(u) if !bad => escape::encode_code_unit(u, out),
            _ => self.error(src, Diagnostic::InvalidUnicodeEscape),
        }
        true
    }

    /// Reads a single-quoted memory buffer: pairs of hex digits forming an
    /// opaque byte blob.
    fn read_membuf<S: ByteStream>(
        &mut self,
        src: &mut ByteSource<S>,
        value: &mut Value,
    ) -> Option<u8> {
        self.warning(src, Flags::MEMORYBUFF, Diagnostic::MemBufExtension);
        let mut buf: Vec<u8> = Vec::new();
        let mut bad = 0usize;
        loop {
            let Some(hi) = src.read() else { break };
            if hi == b'\'' {
                break;
            }
            let Some(lo) = src.read() else { break };
            if lo == b'\'' {
                // dangling first digit of a pair
                bad += 1;
                break;
            }
            match membuf::pair_to_byte(hi, lo) {
                Some(b) => buf.push(b),
                None => bad += 1,
            }
        }
        if bad > 0 {
            self.error(src, Diagnostic::MemBufBadDigits(bad));
        }

        if !value.is_valid() {
            value.set_membuf(buf);
            value.set_line(src.line());
        } else if value.is_membuf() {
            value.cat_membuf(&buf);
            value.set_line(src.line());
        } else {
            self.error(src, Diagnostic::MemBufAfterValue);
        }
        src.read()
    }

    /// Reads a maximal unquoted token starting with `first` and returns the
    /// terminating byte, which the dispatcher still has to process.
    fn read_token<S: ByteStream>(
        &mut self,
        src: &mut ByteSource<S>,
        first: u8,
        token: &mut String,
    ) -> Option<u8> {
        let mut ch = first;
        loop {
            match ch {
                b' ' | b',' | b':' | b'[' | b']' | b'{' | b'}' | b'\t' | b'\n' | b'\r' | 0x08 => {
                    return Some(ch);
                }
                _ => token.push(ch as char),
            }
            ch = src.read()?;
        }
    }

    /// Classifies an unquoted token: the three literals (with case
    /// tolerance), then the sign-driven numeric ladder.
    fn read_value<S: ByteStream>(
        &mut self,
        src: &mut ByteSource<S>,
        first: u8,
        value: &mut Value,
    ) -> Option<u8> {
        let line = src.line();
        let mut token = String::new();
        let next = self.read_token(src, first, &mut token);

        if value.is_valid() {
            self.error(src, Diagnostic::ValueAfterValue(token));
            return next;
        }
        if token.is_empty() {
            self.error(src, Diagnostic::BadLiteral(token));
            return src.read();
        }
        value.set_line(line);

        if token == "null" {
            value.set_kind(ValueKind::Null);
            return next;
        }
        if token.eq_ignore_ascii_case("null") {
            self.warning(src, Flags::CASE, Diagnostic::MixedCaseLiteral("null"));
            value.set_kind(ValueKind::Null);
            return next;
        }
        if token == "true" {
            value.set_bool(true);
            return next;
        }
        if token.eq_ignore_ascii_case("true") {
            self.warning(src, Flags::CASE, Diagnostic::MixedCaseLiteral("true"));
            value.set_bool(true);
            return next;
        }
        if token == "false" {
            value.set_bool(false);
            return next;
        }
        if token.eq_ignore_ascii_case("false") {
            self.warning(src, Flags::CASE, Diagnostic::MixedCaseLiteral("false"));
            value.set_bool(false);
            return next;
        }

        let (try_signed, try_unsigned) = match first {
            b'0'..=b'9' => (true, true),
            b'-' => (true, false),
            b'+' => (false, true),
            _ => {
                self.error(src, Diagnostic::BadLiteral(token));
                return next;
            }
        };
        if try_signed {
            if let Some(i) = literal::to_signed(&token) {
                value.set_signed(i);
                return next;
            }
        }
        if try_unsigned {
            if let Some(u) = literal::to_unsigned(&token) {
                value.set_unsigned(u);
                return next;
            }
        }
        if let Some(d) = literal::to_double(&token) {
            value.set_double(d);
            return next;
        }
        self.error(src, Diagnostic::BadLiteral(token));
        next
    }

    /// Consumes a subtree that opened past the depth limit, up to and
    /// including its matching closer. String literals are honored so their
    /// bracket bytes do not unbalance the scan.
    fn skip_balanced<S: ByteStream>(&mut self, src: &mut ByteSource<S>) -> Option<u8> {
        let mut nesting = 1usize;
        loop {
            match src.read()? {
                b'{' | b'[' => nesting += 1,
                b'}' | b']' => {
                    nesting -= 1;
                    if nesting == 0 {
                        self.cursor.current = Hint::Parent { line: src.line() };
                        self.cursor.next_pending = false;
                        return src.read();
                    }
                }
                b'"' => loop {
                    match src.read()? {
                        b'\\' => {
                            src.read()?;
                        }
                        b'"' => break,
                        _ => {}
                    }
                },
                _ => {}
            }
        }
    }

    fn text_from(&self, buf: Vec<u8>) -> String {
        if self.no_utf8 {
            buf.iter().map(|&b| b as char).collect()
        } else {
            String::from_utf8_lossy(&buf).into_owned()
        }
    }

    fn error<S: ByteStream>(&mut self, src: &ByteSource<S>, msg: Diagnostic) {
        self.diags.error(src.line(), src.col(), msg);
    }

    fn warning<S: ByteStream>(&mut self, src: &ByteSource<S>, kind: Flags, msg: Diagnostic) {
        self.diags.warning(kind, src.line(), src.col(), msg);
    }
}
