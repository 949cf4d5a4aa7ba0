use std::fmt;
use std::iter;

pub(crate) const DEAD: StateID = 0;
pub(crate) const ALPHABET_LEN: usize = 256;

pub(crate) type StateID = usize;

/// A dense DFA over the 256-byte alphabet.
///
/// The transition table is row major, one 256-entry row per state.
/// State 0 is the dead state: it is never an accept state and every one
/// of its transitions points back at itself, so a failed scan stays
/// failed. Once `premultiply` has run, every stored id (and the start
/// id) is the state's row base `id * 256`; a table cell is then usable
/// directly as the next row base and the accept bitmap is indexed by
/// `row >> 8`.
#[derive(Clone)]
pub(crate) struct DFA {
    start: StateID,
    state_count: usize,
    accept: Vec<bool>,
    premultiplied: bool,
    trans: Vec<StateID>,
}

impl DFA {
    /// Create an empty DFA containing only the dead state.
    pub fn empty() -> DFA {
        let mut dfa = DFA {
            start: DEAD,
            state_count: 0,
            accept: vec![],
            premultiplied: false,
            trans: vec![],
        };
        dfa.add_empty_state();
        dfa
    }

    pub fn len(&self) -> usize {
        self.state_count
    }

    pub(crate) fn add_empty_state(&mut self) -> StateID {
        assert!(!self.premultiplied, "cannot grow a premultiplied DFA");
        let id = self.state_count;
        self.trans.extend(iter::repeat(DEAD).take(ALPHABET_LEN));
        self.accept.push(false);
        self.state_count += 1;
        id
    }

    pub(crate) fn set_start_state(&mut self, id: StateID) {
        assert!(id < self.len());
        self.start = id;
    }

    pub(crate) fn set_transition(
        &mut self,
        from: StateID,
        input: u8,
        to: StateID,
    ) {
        assert!(!self.premultiplied, "cannot mutate a premultiplied DFA");
        self.trans[from * ALPHABET_LEN + input as usize] = to;
    }

    pub(crate) fn set_accept(&mut self, id: StateID, yes: bool) {
        self.accept[id] = yes;
    }

    /// Rewrite every table entry and the start id to the corresponding
    /// row base, fusing the next-row computation into the table lookup.
    pub(crate) fn premultiply(&mut self) {
        if self.premultiplied {
            return;
        }
        for next in self.trans.iter_mut() {
            *next *= ALPHABET_LEN;
        }
        self.start *= ALPHABET_LEN;
        self.premultiplied = true;
    }

    /// Run the DFA over all of `bytes` and report whether it ends in an
    /// accept state.
    pub fn matches_exact(&self, bytes: &[u8]) -> bool {
        debug_assert!(self.premultiplied);
        let mut row = self.start;
        for &b in bytes {
            row = unsafe { *self.trans.get_unchecked(row + b as usize) };
            if row == DEAD {
                return false;
            }
        }
        self.accept[row >> 8]
    }

    /// Run the DFA over `bytes`, reporting a match as soon as an accept
    /// state is reached. The remaining input is left unconsumed, which
    /// is what a pattern ending in `%` wants.
    pub fn matches_earliest(&self, bytes: &[u8]) -> bool {
        debug_assert!(self.premultiplied);
        let mut row = self.start;
        if self.accept[row >> 8] {
            return true;
        }
        for &b in bytes {
            row = unsafe { *self.trans.get_unchecked(row + b as usize) };
            if self.accept[row >> 8] {
                return true;
            }
            if row == DEAD {
                return false;
            }
        }
        false
    }
}

impl fmt::Debug for DFA {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let start = if self.premultiplied {
            self.start >> 8
        } else {
            self.start
        };
        for (id, row) in self.trans.chunks(ALPHABET_LEN).enumerate() {
            let mut status = String::new();
            status.push(if id == DEAD {
                'D'
            } else if id == start {
                '>'
            } else {
                ' '
            });
            status.push(if self.accept[id] { '*' } else { ' ' });

            let mut transitions = vec![];
            for (lo, hi, next) in sparse_transitions(row) {
                if next == DEAD {
                    continue;
                }
                let next = if self.premultiplied { next >> 8 } else { next };
                if lo == hi {
                    transitions.push(format!("{} => {}", escape(lo), next));
                } else {
                    transitions.push(format!(
                        "{}-{} => {}",
                        escape(lo),
                        escape(hi),
                        next,
                    ));
                }
            }
            writeln!(f, "{}{:04}: {}", status, id, transitions.join(", "))?;
        }
        Ok(())
    }
}

/// Collapse a 256-entry row into (first byte, last byte, target)
/// ranges.
fn sparse_transitions(row: &[StateID]) -> Vec<(u8, u8, StateID)> {
    let mut ranges = vec![];
    let mut cur: Option<(u8, u8, StateID)> = None;
    for (b, &next) in row.iter().enumerate() {
        let b = b as u8;
        match cur {
            Some((lo, _, n)) if n == next => cur = Some((lo, b, n)),
            Some(range) => {
                ranges.push(range);
                cur = Some((b, b, next));
            }
            None => cur = Some((b, b, next)),
        }
    }
    ranges.extend(cur);
    ranges
}

/// Return the given byte in escaped string form.
fn escape(b: u8) -> String {
    use std::ascii;

    String::from_utf8(ascii::escape_default(b).collect::<Vec<_>>()).unwrap()
}
