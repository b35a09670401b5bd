//! Reader configuration: tolerance flags and parse limits.

use core::ops::{BitOr, BitOrAssign};

/// Bit set of tolerance toggles.
///
/// Each bit names an extension to strict JSON that the reader will accept
/// with a *warning* instead of an *error*. A diagnostic raised for an
/// extension whose bit is clear is promoted to an error; the parse itself
/// always continues either way.
///
/// Flags compose with `|`:
///
/// ```rust
/// use jsonlax::Flags;
///
/// let flags = Flags::TOLERANT | Flags::STORE_COMMENTS;
/// assert!(flags.contains(Flags::ALLOW_COMMENTS));
/// assert!(!flags.contains(Flags::MEMORYBUFF));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags(u32);

impl Flags {
    /// C and C++ comments are accepted with a warning.
    pub const ALLOW_COMMENTS: Flags = Flags(1 << 0);
    /// Accepted comments are attached to the value they annotate.
    pub const STORE_COMMENTS: Flags = Flags(1 << 1);
    /// Mixed-case `null`/`true`/`false` literals are accepted with a warning.
    pub const CASE: Flags = Flags(1 << 2);
    /// A missing or mismatched closing bracket is a warning rather than an
    /// error.
    pub const MISSING: Flags = Flags(1 << 3);
    /// Two adjacent quoted strings are concatenated with a warning.
    pub const MULTISTRING: Flags = Flags(1 << 4);
    /// Floating comments attach to the previous value rather than the next.
    pub const COMMENTS_AFTER: Flags = Flags(1 << 5);
    /// Treat stream bytes as raw 8-bit data rather than UTF-8.
    pub const NOUTF8_STREAM: Flags = Flags(1 << 6);
    /// Accept single-quoted hex-pair memory buffers with a warning.
    pub const MEMORYBUFF: Flags = Flags(1 << 7);

    /// No tolerance at all: every extension is reported as an error.
    pub const STRICT: Flags = Flags(0);
    /// The usual editor-friendly combination:
    /// `ALLOW_COMMENTS | CASE | MISSING | MULTISTRING`.
    pub const TOLERANT: Flags = Flags(
        Self::ALLOW_COMMENTS.0 | Self::CASE.0 | Self::MISSING.0 | Self::MULTISTRING.0,
    );

    /// Returns `true` if no bit is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if any bit of `other` is set in `self`.
    #[must_use]
    pub const fn intersects(self, other: Flags) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

/// Configuration for a [`JsonReader`](crate::JsonReader).
///
/// # Examples
///
/// ```rust
/// use jsonlax::{Flags, ReaderOptions};
///
/// let options = ReaderOptions {
///     flags: Flags::TOLERANT,
///     max_errors: 10,
///     ..Default::default()
/// };
/// assert_eq!(options.max_depth, 512);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ReaderOptions {
    /// Tolerance toggles; see [`Flags`].
    ///
    /// # Default
    ///
    /// [`Flags::STRICT`]
    pub flags: Flags,

    /// Upper bound on the number of stored errors, and independently on the
    /// number of stored warnings. When a list reaches the bound a single
    /// "too many" sentinel is appended and further entries are dropped.
    ///
    /// # Default
    ///
    /// `30`
    pub max_errors: usize,

    /// Maximum container nesting depth. An object or array opening beyond
    /// this depth is reported as an error and its subtree is skipped, leaving
    /// an empty container in its slot.
    ///
    /// # Default
    ///
    /// `512`
    pub max_depth: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            flags: Flags::STRICT,
            max_errors: 30,
            max_depth: 512,
        }
    }
}
