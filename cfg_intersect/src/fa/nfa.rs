use crate::error::AutomatonError;
use crate::fa::state::State;
use crate::input_symbol::InputSymbol;
use crate::language::Language;
use hashbrown::{HashMap, HashSet};
use std::cmp::max;

/// Nondeterministic finite automaton as read from a graph description:
/// any number of start and accept states may be marked, the intersection
/// checks that there is exactly one start.
#[derive(Debug, Clone, Default)]
pub struct NFA {
    pub state_index_map: HashMap<State, usize>, // Map of state names to State indices
    pub alphabet_index_map: HashMap<InputSymbol, usize>, // Map of input symbols to indices

    pub states: Vec<State>,         // List of states
    pub alphabet: Vec<InputSymbol>, // Input symbols (alphabet)

    pub transitions: Vec<HashMap<usize, HashSet<usize>>>, // Transitions state -> input_symbol -> set of next states
    pub start_states: HashSet<usize>,                     // Start states
    pub accept_states: HashSet<usize>,                    // Accept states
}

impl NFA {
    pub fn empty() -> Self {
        NFA::default()
    }

    /// Adds a state without transitions, returns its index
    pub fn add_state(&mut self, state: State) -> usize {
        if let Some(&index) = self.state_index_map.get(&state) {
            return index;
        }
        let index = self.states.len();
        self.state_index_map.insert(state.clone(), index);
        self.states.push(state);
        while self.transitions.len() <= index {
            self.transitions.push(HashMap::new());
        }
        index
    }

    /// Marks a state as a start state
    pub fn add_start_state(&mut self, start_state: State) {
        let start_index = self.add_state(start_state);
        self.start_states.insert(start_index);
    }

    /// Adds a new accept state
    pub fn add_accept_state(&mut self, accept_state: State) {
        let accept_index = self.add_state(accept_state);
        self.accept_states.insert(accept_index);
    }

    /// Adds a transition from state `from` to state `to` on input `symbol`
    pub fn add_transition(&mut self, from: &State, symbol: &InputSymbol, to: &State) {
        let from_index = self.add_state(from.clone());
        let to_index = self.add_state(to.clone());
        let symbol_index = *self
            .alphabet_index_map
            .entry(symbol.clone())
            .or_insert_with(|| {
                let index = self.alphabet.len();
                self.alphabet.push(symbol.clone());
                index
            });

        // Ensure the transition vector is large enough
        while self.transitions.len() <= max(from_index, to_index) {
            self.transitions.push(HashMap::new());
        }

        self.transitions[from_index]
            .entry(symbol_index)
            .or_default()
            .insert(to_index);
    }

    pub fn get_state(&self, index: usize) -> &State {
        &self.states[index]
    }

    /// All transitions as `(from, symbol, to)` index/symbol triples
    pub fn get_transitions(&self) -> Vec<(usize, &InputSymbol, usize)> {
        let mut transitions = Vec::new();
        for (from_state, transitions_map) in self.transitions.iter().enumerate() {
            for (symbol_index, to_states) in transitions_map.iter() {
                let symbol = &self.alphabet[*symbol_index];
                for &to_state in to_states {
                    transitions.push((from_state, symbol, to_state));
                }
            }
        }
        transitions
    }

    /// The unique start state
    pub fn start_state(&self) -> Result<usize, AutomatonError> {
        let mut start_states = self.start_states.iter();
        match (start_states.next(), start_states.next()) {
            (None, _) => Err(AutomatonError::NoStartState),
            (Some(&start), None) => Ok(start),
            (Some(_), Some(_)) => {
                let mut names: Vec<String> = self
                    .start_states
                    .iter()
                    .map(|&s| self.states[s].name.clone())
                    .collect();
                names.sort();
                Err(AutomatonError::MultipleStartStates(names))
            }
        }
    }

    /// The accept states, sorted by index
    pub fn accept_state_indices(&self) -> Result<Vec<usize>, AutomatonError> {
        if self.accept_states.is_empty() {
            return Err(AutomatonError::NoAcceptStates);
        }
        let mut accept_states: Vec<usize> = self.accept_states.iter().copied().collect();
        accept_states.sort_unstable();
        Ok(accept_states)
    }

    fn _next_states(&self, states: &HashSet<usize>, symbol: usize) -> HashSet<usize> {
        let mut next_states = HashSet::new();
        for state in states {
            if let Some(next_states_set) = self.transitions[*state].get(&symbol) {
                next_states.extend(next_states_set.iter().copied());
            }
        }
        next_states
    }
}

impl Language for NFA {
    /// Accepts a word if some run from a start state ends in an accept state
    fn accepts(&self, input: &[InputSymbol]) -> bool {
        let mut current_states = self.start_states.clone();
        for symbol in input {
            match self.alphabet_index_map.get(symbol) {
                Some(&symbol_index) => {
                    current_states = self._next_states(&current_states, symbol_index);
                }
                None => {
                    // If the symbol is not in the alphabet, return false
                    return false;
                }
            }
        }
        !self.accept_states.is_disjoint(&current_states)
    }
}
