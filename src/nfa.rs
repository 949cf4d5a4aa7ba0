use crate::pattern::Pattern;

pub(crate) type StateID = usize;

/// A nondeterministic finite automaton over UTF-8 bytes.
///
/// Byte-consuming states (`Byte`, `Prefix`) own a single outgoing edge
/// to `next`; `Empty` and `Union` are epsilon states. There is exactly
/// one `Match` state and it is the last state added.
#[derive(Debug)]
pub(crate) struct NFA {
    states: Vec<State>,
    start: StateID,
}

#[derive(Debug)]
pub(crate) enum State {
    /// An unconditional epsilon edge.
    Empty { next: StateID },
    /// Consumes exactly the byte `value`.
    Byte { value: u8, next: StateID },
    /// Consumes any byte whose top `width` bits equal `bits`.
    Prefix { bits: u8, width: u8, next: StateID },
    /// An epsilon fan-out to each alternate.
    Union { alternates: Vec<StateID> },
    /// The accept state.
    Match,
}

impl NFA {
    /// Compile an optimized pattern sequence into an NFA.
    pub fn compile(pattern: &[Pattern]) -> NFA {
        Compiler { states: vec![] }.compile(pattern)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn start(&self) -> StateID {
        self.start
    }

    pub fn state(&self, id: StateID) -> &State {
        &self.states[id]
    }
}

impl State {
    /// Returns true if and only if this state consumes no input.
    pub fn is_epsilon(&self) -> bool {
        match *self {
            State::Byte { .. } | State::Prefix { .. } | State::Match => false,
            State::Empty { .. } | State::Union { .. } => true,
        }
    }
}

/// A compiled sub-automaton whose `end` is dangling until patched onto
/// the start of whatever follows it.
#[derive(Clone, Copy, Debug)]
struct ThompsonRef {
    start: StateID,
    end: StateID,
}

struct Compiler {
    states: Vec<State>,
}

impl Compiler {
    fn compile(mut self, pattern: &[Pattern]) -> NFA {
        let start = self.add_empty();
        let mut end = start;
        for elem in pattern {
            let compiled = match *elem {
                Pattern::Literal(ref lit) => self.c_literal(lit.as_bytes()),
                Pattern::Any { min, unbounded } => self.c_any(min, unbounded),
            };
            self.patch(end, compiled.start);
            end = compiled.end;
        }
        let match_id = self.add_match();
        self.patch(end, match_id);
        NFA { states: self.states, start }
    }

    /// A chain of byte states, one per literal byte.
    fn c_literal(&mut self, bytes: &[u8]) -> ThompsonRef {
        let start = self.add_byte(bytes[0]);
        let mut end = start;
        for &b in &bytes[1..] {
            let next = self.add_byte(b);
            self.patch(end, next);
            end = next;
        }
        ThompsonRef { start, end }
    }

    /// A wildcard run: at least `min` codepoints, possibly unbounded.
    fn c_any(&mut self, min: u32, unbounded: bool) -> ThompsonRef {
        if min == 0 {
            return if unbounded {
                self.c_zero_or_more()
            } else {
                self.c_zero_or_one()
            };
        }
        let mut last = self.c_codepoint();
        let start = last.start;
        for _ in 1..min {
            let next = self.c_codepoint();
            self.patch(last.end, next.start);
            last = next;
        }
        if unbounded {
            // The loop spans the final copy only; the copies before it
            // stay mandatory.
            let union = self.add_union();
            self.patch(last.end, union);
            self.patch(union, last.start);
            ThompsonRef { start, end: union }
        } else {
            ThompsonRef { start, end: last.end }
        }
    }

    fn c_zero_or_more(&mut self) -> ThompsonRef {
        let union = self.add_union();
        let compiled = self.c_codepoint();
        self.patch(union, compiled.start);
        self.patch(compiled.end, union);
        ThompsonRef { start: union, end: union }
    }

    fn c_zero_or_one(&mut self) -> ThompsonRef {
        let union = self.add_union();
        let compiled = self.c_codepoint();
        let empty = self.add_empty();
        self.patch(union, compiled.start);
        self.patch(union, empty);
        self.patch(compiled.end, empty);
        ThompsonRef { start: union, end: empty }
    }

    /// A sub-automaton consuming exactly one UTF-8 encoded codepoint.
    ///
    /// The four encoding lengths branch on the leading byte's bit
    /// prefix and converge on a shared chain of continuation-byte
    /// states, so a valid encoding walks exactly one path to the end.
    /// Bytes that fit no branch dead-end during determinization.
    fn c_codepoint(&mut self) -> ThompsonRef {
        let end = self.add_empty();

        // The continuation chain, last byte first: `cont1` is the final
        // continuation byte before `end`.
        let cont1 = self.add_prefix(0b10, 2);
        self.patch(cont1, end);
        let cont2 = self.add_prefix(0b10, 2);
        self.patch(cont2, cont1);
        let cont3 = self.add_prefix(0b10, 2);
        self.patch(cont3, cont2);

        let ascii = self.add_prefix(0b0, 1);
        self.patch(ascii, end);
        let lead2 = self.add_prefix(0b110, 3);
        self.patch(lead2, cont1);
        let lead3 = self.add_prefix(0b1110, 4);
        self.patch(lead3, cont2);
        let lead4 = self.add_prefix(0b11110, 5);
        self.patch(lead4, cont3);

        let start = self.add_union();
        self.patch(start, ascii);
        self.patch(start, lead2);
        self.patch(start, lead3);
        self.patch(start, lead4);
        ThompsonRef { start, end }
    }

    fn patch(&mut self, from: StateID, to: StateID) {
        match self.states[from] {
            State::Empty { ref mut next } => *next = to,
            State::Byte { ref mut next, .. } => *next = to,
            State::Prefix { ref mut next, .. } => *next = to,
            State::Union { ref mut alternates } => alternates.push(to),
            State::Match => {}
        }
    }

    fn add_empty(&mut self) -> StateID {
        self.add(State::Empty { next: 0 })
    }

    fn add_byte(&mut self, value: u8) -> StateID {
        self.add(State::Byte { value, next: 0 })
    }

    fn add_prefix(&mut self, bits: u8, width: u8) -> StateID {
        self.add(State::Prefix { bits, width, next: 0 })
    }

    fn add_union(&mut self) -> StateID {
        self.add(State::Union { alternates: vec![] })
    }

    fn add_match(&mut self) -> StateID {
        self.add(State::Match)
    }

    fn add(&mut self, state: State) -> StateID {
        let id = self.states.len();
        self.states.push(state);
        id
    }
}
