/*!
A compiler from SQL `LIKE` patterns to fast byte-level deterministic
finite automata.

A LIKE pattern is ordinary text where `%` matches any run of zero or
more codepoints and `_` matches exactly one codepoint. An optional
escape character permits matching `%`, `_` and the escape character
itself literally.

Compilation parses the pattern into a sequence of literal and wildcard
segments, builds a byte-level NFA in which "any one codepoint" is
encoded through UTF-8 bit-prefix classes, determinizes it by subset
construction and lowers the result to a dense transition table with
premultiplied state identifiers. Matching is then a single pass over
the raw input bytes with no UTF-8 decoding, preceded by cheap
length-bound and literal prefix/suffix rejection tests.

# Example

```
use like_automata::LikeMatcher;

let matcher = LikeMatcher::new("gr_y%")?;
assert!(matcher.is_match(b"grey"));
assert!(matcher.is_match("gråy skies".as_bytes()));
assert!(!matcher.is_match(b"green"));
# Ok::<(), like_automata::Error>(())
```

Patterns with an escape character are compiled through a builder:

```
use like_automata::LikeMatcherBuilder;

let matcher = LikeMatcherBuilder::new().escape('\\').build(r"100\%")?;
assert!(matcher.is_match(b"100%"));
assert!(!matcher.is_match(b"100X"));
# Ok::<(), like_automata::Error>(())
```

# Crate features

* **logging** -
  When enabled, the compilation pipeline emits diagnostics (state
  counts, peeled literals) through the [`log`](https://docs.rs/log)
  crate. Disabled by default; matching never logs.
*/

pub use crate::error::{Error, ErrorKind, Result};
pub use crate::matcher::{LikeMatcher, LikeMatcherBuilder};

#[macro_use]
mod macros;

mod determinize;
mod dfa;
mod error;
mod matcher;
mod nfa;
mod pattern;
mod sparse_set;
