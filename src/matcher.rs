use crate::determinize::Determinizer;
use crate::dfa::DFA;
use crate::error::Result;
use crate::nfa::NFA;
use crate::pattern::{self, Pattern};

/// A compiled LIKE pattern.
///
/// A matcher tests whether a UTF-8 encoded byte string matches the
/// pattern it was compiled from: `%` matches any run of zero or more
/// codepoints, `_` matches exactly one codepoint and everything else
/// matches itself. Matching never decodes the input; the wildcards are
/// encoded into the automaton as UTF-8 byte classes, so a single pass
/// over the raw bytes decides the match. Malformed UTF-8 in the input
/// is not an error, it simply never looks like a codepoint.
///
/// A compiled matcher is immutable and may be shared freely across
/// threads.
///
/// # Example
///
/// ```
/// use like_automata::LikeMatcher;
///
/// let m = LikeMatcher::new("J_n%")?;
/// assert!(m.is_match(b"Jane Doe"));
/// assert!(m.is_match(b"Jon"));
/// assert!(!m.is_match(b"Joan"));
/// # Ok::<(), like_automata::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct LikeMatcher {
    /// The original pattern text.
    pattern: String,
    /// The escape character the pattern was compiled with, if any.
    escape: Option<char>,
    /// The smallest number of bytes any matching input can have.
    min_len: usize,
    /// The largest number of bytes any matching input can have, unless
    /// the pattern contains `%`.
    max_len: Option<usize>,
    /// Literal bytes every matching input starts with.
    prefix: Vec<u8>,
    /// Literal bytes every matching input ends with.
    suffix: Vec<u8>,
    /// The dense DFA for the region between prefix and suffix.
    dfa: DFA,
    /// Whether the DFA must consume the entire middle region, or may
    /// stop at the first accept state.
    exact: bool,
}

impl LikeMatcher {
    /// Compile a LIKE pattern with no escape character.
    ///
    /// To set an escape character or tweak compilation, use a
    /// [`LikeMatcherBuilder`].
    pub fn new(pattern: &str) -> Result<LikeMatcher> {
        LikeMatcherBuilder::new().build(pattern)
    }

    /// The pattern text this matcher was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The escape character this matcher was compiled with.
    pub fn escape(&self) -> Option<char> {
        self.escape
    }

    /// Test whether the entire input matches the pattern.
    pub fn is_match(&self, input: &[u8]) -> bool {
        self.is_match_at(input, 0, input.len())
    }

    /// Test whether the `length` bytes of `input` starting at byte
    /// offset `offset` match the pattern.
    ///
    /// # Panics
    ///
    /// When the range falls outside `input`.
    pub fn is_match_at(
        &self,
        input: &[u8],
        offset: usize,
        length: usize,
    ) -> bool {
        let input = &input[offset..offset + length];
        if input.len() < self.min_len {
            return false;
        }
        if self.max_len.map_or(false, |max| input.len() > max) {
            return false;
        }
        if !input.starts_with(&self.prefix) {
            return false;
        }
        if !input.ends_with(&self.suffix) {
            return false;
        }
        let middle = &input[self.prefix.len()..input.len() - self.suffix.len()];
        if self.exact {
            self.dfa.matches_exact(middle)
        } else {
            self.dfa.matches_earliest(middle)
        }
    }
}

/// A builder for configuring the compilation of a LIKE pattern.
///
/// # Example
///
/// ```
/// use like_automata::LikeMatcherBuilder;
///
/// let m = LikeMatcherBuilder::new().escape('!').build("down 10!%")?;
/// assert!(m.is_match(b"down 10%"));
/// assert!(!m.is_match(b"down 10!"));
/// # Ok::<(), like_automata::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct LikeMatcherBuilder {
    escape: Option<char>,
    peel_literals: bool,
}

impl LikeMatcherBuilder {
    /// Create a builder with the default configuration: no escape
    /// character and literal peeling enabled.
    pub fn new() -> LikeMatcherBuilder {
        LikeMatcherBuilder { escape: None, peel_literals: true }
    }

    /// Set the escape character. `E%`, `E_` and `EE` then match a
    /// literal `%`, `_` and `E`; `E` followed by anything else (or
    /// ending the pattern) is an [`InvalidEscape`] error.
    ///
    /// [`InvalidEscape`]: crate::ErrorKind::InvalidEscape
    pub fn escape(&mut self, escape: char) -> &mut LikeMatcherBuilder {
        self.escape = Some(escape);
        self
    }

    /// Peel leading and trailing literals out of the DFA and match
    /// them with direct byte comparisons instead.
    ///
    /// Enabled by default. Disabling it routes the whole pattern
    /// through the DFA; on valid UTF-8 input the result is identical,
    /// only slower, which makes this useful for consistency testing.
    pub fn peel_literals(&mut self, yes: bool) -> &mut LikeMatcherBuilder {
        self.peel_literals = yes;
        self
    }

    /// Compile `pattern` into a `LikeMatcher`.
    pub fn build(&self, pattern: &str) -> Result<LikeMatcher> {
        let parsed = pattern::parse(pattern, self.escape)?;
        let optimized = pattern::optimize(parsed);

        // Byte-length bounds over the whole pattern, used to reject
        // candidate inputs before the DFA runs.
        let mut min_len = 0;
        let mut max_len = 0;
        let mut unbounded = false;
        for elem in &optimized {
            match *elem {
                Pattern::Literal(ref lit) => {
                    min_len += lit.len();
                    max_len += lit.len();
                }
                Pattern::Any { min, unbounded: u } => {
                    min_len += min as usize;
                    // A codepoint is at most four UTF-8 bytes.
                    max_len += min as usize * 4;
                    unbounded = unbounded || u;
                }
            }
        }

        // A literal at either end is matched by direct comparison, so
        // it need not be encoded into the DFA at all.
        let mut middle = optimized;
        let mut prefix = vec![];
        let mut suffix = vec![];
        if self.peel_literals {
            if let Some(Pattern::Literal(_)) = middle.first() {
                if let Pattern::Literal(lit) = middle.remove(0) {
                    prefix = lit.into_bytes();
                }
            }
            if let Some(Pattern::Literal(_)) = middle.last() {
                if let Some(Pattern::Literal(lit)) = middle.pop() {
                    suffix = lit.into_bytes();
                }
            }
        }

        // When the middle ends with `%`, the scan may stop at the
        // first accept state instead of consuming the rest of the
        // input, and the Kleene loop drops out of the DFA entirely.
        let mut exact = true;
        if let Some(&Pattern::Any { min, unbounded: true }) = middle.last() {
            exact = false;
            *middle.last_mut().unwrap() =
                Pattern::Any { min, unbounded: false };
        }

        let nfa = NFA::compile(&middle);
        let mut dfa = Determinizer::new(&nfa).build();
        dfa.premultiply();
        debug!(
            "compiled LIKE pattern {:?}: {} NFA states, {} DFA states, \
             prefix of {} bytes, suffix of {} bytes, exact: {}",
            pattern,
            nfa.len(),
            dfa.len(),
            prefix.len(),
            suffix.len(),
            exact,
        );

        Ok(LikeMatcher {
            pattern: pattern.to_string(),
            escape: self.escape,
            min_len,
            max_len: if unbounded { None } else { Some(max_len) },
            prefix,
            suffix,
            dfa,
            exact,
        })
    }
}

impl Default for LikeMatcherBuilder {
    fn default() -> LikeMatcherBuilder {
        LikeMatcherBuilder::new()
    }
}
