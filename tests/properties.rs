use like_automata::{LikeMatcher, LikeMatcherBuilder};
use proptest::prelude::*;

/// One element of a tokenized reference pattern.
#[derive(Clone, Copy, Debug)]
enum Tok {
    Percent,
    Underscore,
    Lit(char),
}

/// Tokenize a pattern with the same escape rules as the compiler.
/// Returns `None` for an invalid escape sequence.
fn tokenize(pattern: &str, escape: Option<char>) -> Option<Vec<Tok>> {
    let mut toks = vec![];
    let mut in_escape = false;
    for c in pattern.chars() {
        if in_escape {
            if c != '%' && c != '_' && Some(c) != escape {
                return None;
            }
            toks.push(Tok::Lit(c));
            in_escape = false;
        } else if escape == Some(c) {
            in_escape = true;
        } else if c == '%' {
            toks.push(Tok::Percent);
        } else if c == '_' {
            toks.push(Tok::Underscore);
        } else {
            toks.push(Tok::Lit(c));
        }
    }
    if in_escape {
        return None;
    }
    Some(toks)
}

/// Reference LIKE matcher: a table-filling rendition of the obvious
/// recursive definition over codepoints. Slow and obviously correct.
fn reference_match(toks: &[Tok], input: &str) -> bool {
    let chars: Vec<char> = input.chars().collect();
    // reachable[j]: the tokens consumed so far can end after j chars.
    let mut reachable = vec![false; chars.len() + 1];
    reachable[0] = true;
    for tok in toks {
        let mut next = vec![false; chars.len() + 1];
        for j in 0..=chars.len() {
            if !reachable[j] {
                continue;
            }
            match *tok {
                Tok::Percent => {
                    for slot in &mut next[j..] {
                        *slot = true;
                    }
                }
                Tok::Underscore => {
                    if j < chars.len() {
                        next[j + 1] = true;
                    }
                }
                Tok::Lit(c) => {
                    if j < chars.len() && chars[j] == c {
                        next[j + 1] = true;
                    }
                }
            }
        }
        reachable = next;
    }
    reachable[chars.len()]
}

fn unicode_pattern() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop::sample::select(vec!['a', 'b', 'é', '猫', '🔥', '%', '_']),
        0..8,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

fn unicode_input() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop::sample::select(vec!['a', 'b', 'é', '猫', '🔥']),
        0..12,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    // Use a limited alphabet to keep the chance of a match high.
    #[test]
    fn matches_reference_ascii(
        pattern in "[ab%_]{0,12}",
        input in "[ab]{0,16}",
    ) {
        let toks = tokenize(&pattern, None).unwrap();
        let matcher = LikeMatcher::new(&pattern).unwrap();
        prop_assert_eq!(
            matcher.is_match(input.as_bytes()),
            reference_match(&toks, &input),
        );
    }

    #[test]
    fn matches_reference_unicode(
        pattern in unicode_pattern(),
        input in unicode_input(),
    ) {
        let toks = tokenize(&pattern, None).unwrap();
        let matcher = LikeMatcher::new(&pattern).unwrap();
        prop_assert_eq!(
            matcher.is_match(input.as_bytes()),
            reference_match(&toks, &input),
        );
    }

    #[test]
    fn matches_reference_with_escape(
        pattern in r"[ab%_\\]{0,10}",
        input in r"[ab%_\\]{0,12}",
    ) {
        match tokenize(&pattern, Some('\\')) {
            None => prop_assert!(
                LikeMatcherBuilder::new().escape('\\').build(&pattern).is_err()
            ),
            Some(toks) => {
                let matcher = LikeMatcherBuilder::new()
                    .escape('\\')
                    .build(&pattern)
                    .unwrap();
                prop_assert_eq!(
                    matcher.is_match(input.as_bytes()),
                    reference_match(&toks, &input),
                );
            }
        }
    }

    // compile("E" + c, escape = 'E') matches c exactly when c is one of
    // the three escapable characters, and fails to compile otherwise.
    #[test]
    fn escape_roundtrip(c in any::<char>()) {
        let mut pattern = String::from("\\");
        pattern.push(c);
        let compiled =
            LikeMatcherBuilder::new().escape('\\').build(&pattern);
        if c == '%' || c == '_' || c == '\\' {
            let mut input = String::new();
            input.push(c);
            prop_assert!(compiled.unwrap().is_match(input.as_bytes()));
        } else {
            prop_assert!(compiled.is_err());
        }
    }

    // A reported match always sits inside the byte-length bounds the
    // pattern implies.
    #[test]
    fn length_bounds_sound(
        pattern in unicode_pattern(),
        input in unicode_input(),
    ) {
        let matcher = LikeMatcher::new(&pattern).unwrap();
        if matcher.is_match(input.as_bytes()) {
            let toks = tokenize(&pattern, None).unwrap();
            let min: usize = toks
                .iter()
                .map(|t| match t {
                    Tok::Percent => 0,
                    Tok::Underscore => 1,
                    Tok::Lit(c) => c.len_utf8(),
                })
                .sum();
            prop_assert!(input.len() >= min);
            if !toks.iter().any(|t| matches!(t, Tok::Percent)) {
                let max: usize = toks
                    .iter()
                    .map(|t| match t {
                        Tok::Percent => 0,
                        Tok::Underscore => 4,
                        Tok::Lit(c) => c.len_utf8(),
                    })
                    .sum();
                prop_assert!(input.len() <= max);
            }
        }
    }

    // Peeling literals into prefix/suffix comparisons is invisible to
    // callers.
    #[test]
    fn peeling_consistency(
        pattern in unicode_pattern(),
        input in unicode_input(),
    ) {
        let peeled = LikeMatcher::new(&pattern).unwrap();
        let unpeeled = LikeMatcherBuilder::new()
            .peel_literals(false)
            .build(&pattern)
            .unwrap();
        prop_assert_eq!(
            peeled.is_match(input.as_bytes()),
            unpeeled.is_match(input.as_bytes()),
        );
    }

    // `_` matches exactly one codepoint, no matter how many bytes the
    // codepoint needs.
    #[test]
    fn underscore_is_one_codepoint(c1 in any::<char>(), c2 in any::<char>()) {
        let matcher = LikeMatcher::new("_").unwrap();
        let mut one = String::new();
        one.push(c1);
        prop_assert!(matcher.is_match(one.as_bytes()));
        let mut two = one;
        two.push(c2);
        prop_assert!(!matcher.is_match(two.as_bytes()));
    }
}
