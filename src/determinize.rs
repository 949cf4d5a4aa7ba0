use std::collections::{HashMap, HashSet};
use std::mem;
use std::rc::Rc;

use crate::dfa::{self, DFA};
use crate::nfa::{self, State, NFA};
use crate::sparse_set::SparseSet;

/// Converts an NFA into a dense DFA by powerset construction over the
/// 256-byte alphabet.
pub(crate) struct Determinizer<'a> {
    /// The NFA we're converting into a DFA.
    nfa: &'a NFA,
    /// The DFA under construction.
    dfa: DFA,
    /// Each DFA state is defined by a canonical set of byte-consuming
    /// NFA states. The first entry is the placeholder for the dead
    /// state, so DFA id 0 is always the dead state.
    states: Vec<Rc<DeterminizerState>>,
    /// Maps canonical NFA-state sets to previously discovered DFA
    /// states.
    cache: HashMap<Rc<DeterminizerState>, dfa::StateID>,
    /// Scratch stack for depth-first epsilon closures.
    stack: Vec<nfa::StateID>,
    /// Scratch buffer for building canonical NFA-state sets, recycled
    /// to amortize allocation.
    scratch: Vec<nfa::StateID>,
}

/// The canonical identity of a DFA state: its byte-consuming NFA states
/// in sorted order, plus whether the closure contained the NFA match
/// state.
///
/// The set is not cut short at the match state: an exact-mode scan
/// keeps consuming input after passing through an accept state, so the
/// byte states alongside it stay live.
#[derive(Debug, Eq, Hash, PartialEq)]
struct DeterminizerState {
    is_match: bool,
    nfa_states: Vec<nfa::StateID>,
}

impl<'a> Determinizer<'a> {
    pub fn new(nfa: &'a NFA) -> Determinizer<'a> {
        let dead = Rc::new(DeterminizerState::dead());
        let mut cache = HashMap::new();
        cache.insert(Rc::clone(&dead), dfa::DEAD);

        Determinizer {
            nfa,
            dfa: DFA::empty(),
            states: vec![dead],
            cache,
            stack: vec![],
            scratch: vec![],
        }
    }

    pub fn build(mut self) -> DFA {
        let mut sparse = SparseSet::new(self.nfa.len());
        let start = self.add_start(&mut sparse);
        let mut uncompiled = vec![start];
        let mut seen: HashSet<dfa::StateID> = HashSet::new();
        seen.insert(dfa::DEAD);
        seen.insert(start);
        while let Some(dfa_id) = uncompiled.pop() {
            for b in 0..=255 {
                let next_id = self.cached_state(dfa_id, b, &mut sparse);
                self.dfa.set_transition(dfa_id, b, next_id);
                if seen.insert(next_id) {
                    uncompiled.push(next_id);
                }
            }
        }
        for (id, state) in self.states.iter().enumerate() {
            self.dfa.set_accept(id, state.is_match);
        }
        trace!(
            "determinized {} NFA states into {} DFA states",
            self.nfa.len(),
            self.dfa.len(),
        );
        self.dfa
    }

    /// The DFA state reached from `dfa_id` on byte `b`, discovering and
    /// allocating it if this is the first time its NFA set appears.
    fn cached_state(
        &mut self,
        dfa_id: dfa::StateID,
        b: u8,
        sparse: &mut SparseSet,
    ) -> dfa::StateID {
        self.next(dfa_id, b, sparse);
        let state = self.new_state(sparse);
        if let Some(&cached_id) = self.cache.get(&state) {
            // Reclaim the allocation for the next canonical set.
            self.scratch = state.nfa_states;
            return cached_id;
        }
        self.add_state(state)
    }

    /// Compute into `set` the epsilon closure of every NFA state
    /// reachable from the states of `dfa_id` by consuming byte `b`.
    fn next(&mut self, dfa_id: dfa::StateID, b: u8, set: &mut SparseSet) {
        set.clear();
        for i in 0..self.states[dfa_id].nfa_states.len() {
            let nfa_id = self.states[dfa_id].nfa_states[i];
            match *self.nfa.state(nfa_id) {
                State::Byte { value, next } => {
                    if value == b {
                        self.epsilon_closure(next, set);
                    }
                }
                State::Prefix { bits, width, next } => {
                    if b >> (8 - width) == bits {
                        self.epsilon_closure(next, set);
                    }
                }
                State::Empty { .. } | State::Union { .. } | State::Match => {}
            }
        }
    }

    /// Insert into `set` every state reachable from `start` through
    /// epsilon edges alone, including `start` itself.
    fn epsilon_closure(&mut self, start: nfa::StateID, set: &mut SparseSet) {
        if !self.nfa.state(start).is_epsilon() {
            if !set.contains(start) {
                set.insert(start);
            }
            return;
        }

        self.stack.push(start);
        while let Some(mut id) = self.stack.pop() {
            loop {
                if set.contains(id) {
                    break;
                }
                set.insert(id);
                match *self.nfa.state(id) {
                    State::Empty { next } => {
                        id = next;
                    }
                    State::Union { ref alternates } => {
                        id = match alternates.first() {
                            None => break,
                            Some(&id) => id,
                        };
                        self.stack.extend(alternates[1..].iter().rev());
                    }
                    State::Byte { .. }
                    | State::Prefix { .. }
                    | State::Match => break,
                }
            }
        }
    }

    fn add_start(&mut self, sparse: &mut SparseSet) -> dfa::StateID {
        sparse.clear();
        self.epsilon_closure(self.nfa.start(), sparse);
        let state = self.new_state(sparse);
        let id = self.add_state(state);
        self.dfa.set_start_state(id);
        id
    }

    fn add_state(&mut self, state: DeterminizerState) -> dfa::StateID {
        let id = self.dfa.add_empty_state();
        let state = Rc::new(state);
        self.states.push(Rc::clone(&state));
        self.cache.insert(state, id);
        id
    }

    /// Build the canonical DeterminizerState for the closure just
    /// computed: its byte-consuming states in sorted order, plus the
    /// accept flag.
    fn new_state(&mut self, set: &SparseSet) -> DeterminizerState {
        let mut state = DeterminizerState {
            is_match: false,
            nfa_states: mem::take(&mut self.scratch),
        };
        state.nfa_states.clear();

        for &id in set.iter() {
            match *self.nfa.state(id) {
                State::Byte { .. } | State::Prefix { .. } => {
                    state.nfa_states.push(id);
                }
                State::Match => {
                    state.is_match = true;
                }
                State::Empty { .. } | State::Union { .. } => {}
            }
        }
        // Subset-equivalent states must merge no matter the order in
        // which their closures were discovered.
        state.nfa_states.sort_unstable();
        state
    }
}

impl DeterminizerState {
    fn dead() -> DeterminizerState {
        DeterminizerState { nfa_states: vec![], is_match: false }
    }
}
