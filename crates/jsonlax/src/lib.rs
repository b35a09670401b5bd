//! A fault-tolerant JSON reader.
//!
//! `jsonlax` parses possibly-extended JSON text into a tree of typed
//! [`Value`]s while collecting a bounded catalogue of formatted errors and
//! warnings. Malformed input never aborts the parse: every path stores what
//! it can and advances, so the reader is as suitable for editors and linters
//! as for strict consumers.
//!
//! Tolerated extensions, each gated on a [`Flags`] bit: C/C++ comments
//! (optionally attached to the values they annotate), mixed-case literals,
//! missing or mismatched closing brackets, adjacent-string concatenation,
//! leading and trailing non-JSON text outside the root, and single-quoted
//! hex memory buffers.
//!
//! # Examples
//!
//! ```rust
//! use jsonlax::{Flags, JsonReader, Value};
//!
//! let mut reader = JsonReader::with_flags(Flags::TOLERANT);
//! let mut root = Value::invalid();
//!
//! let errors = reader.parse_str(
//!     "{ \"a\": 1, // trailing comments are fine\n  \"b\": [true, Null] }",
//!     &mut root,
//! );
//! assert_eq!(errors, 0);
//! assert_eq!(reader.warning_count(), 2);
//! assert_eq!(root.get("a").and_then(Value::as_i64), Some(1));
//! assert!(root.get("b").map(Value::is_array).unwrap_or(false));
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod diagnostics;
mod escape;
mod literal;
mod membuf;
mod options;
mod reader;
mod source;
mod value;

pub use options::{Flags, ReaderOptions};
pub use reader::JsonReader;
pub use source::ByteStream;
#[cfg(feature = "std")]
pub use source::IoStream;
pub use value::{Comment, CommentPosition, Map, Value, ValueKind};

#[cfg(test)]
mod tests;
