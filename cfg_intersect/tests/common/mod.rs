#![allow(dead_code)]

use hashbrown::HashSet;

use cfg_intersect::cfg::cfg::CFG;
use cfg_intersect::cfg::production::Symbol;
use cfg_intersect::cfg::terminal::Terminal;
use cfg_intersect::fa::nfa::NFA;
use cfg_intersect::fa::state::State;
use cfg_intersect::input_symbol::InputSymbol;
use cfg_intersect::language::Language;

/// Grammars exercising long bodies, nullable symbols, chain cycles and
/// terminals inside binary bodies.
pub const GRAMMARS: [&str; 7] = [
    "S: S ( S ) | eps",
    "S: a S b | eps",
    "S: A B C\n\
     A: a | eps\n\
     B: B b | eps\n\
     C: c | A",
    "S: A\n\
     A: B\n\
     B: S | a b",
    "S: a b c",
    "E: E + T | T\n\
     T: T * F | F\n\
     F: ( E ) | x",
    "S: A A A A\n\
     A: a | eps",
];

/// A word with one terminal per character
pub fn word(text: &str) -> Vec<Terminal> {
    text.chars().map(|c| InputSymbol::new(&c.to_string())).collect()
}

macro_rules! words {
    ($($x:expr),* $(,)?) => {
        hashbrown::HashSet::from([$($crate::common::word($x)),*])
    };
}

pub fn parse(text: &str) -> CFG {
    CFG::from_text(text).expect("grammar should parse")
}

pub fn terminals_of(cfg: &CFG) -> Vec<Terminal> {
    let mut terminals: Vec<Terminal> = cfg
        .productions
        .values()
        .flatten()
        .flat_map(|p| p.body.iter())
        .filter_map(|s| match s {
            Symbol::T(t) => Some(t.clone()),
            _ => None,
        })
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    terminals.sort();
    terminals
}

/// Accepts the words of even length
pub fn even_length(alphabet: &[Terminal]) -> NFA {
    let mut nfa = NFA::empty();
    let even = State::new("even");
    let odd = State::new("odd");
    nfa.add_start_state(even.clone());
    nfa.add_accept_state(even.clone());
    nfa.add_state(odd.clone());
    for symbol in alphabet {
        nfa.add_transition(&even, symbol, &odd);
        nfa.add_transition(&odd, symbol, &even);
    }
    nfa
}

/// Accepts the words of length at most `bound`
pub fn at_most(alphabet: &[Terminal], bound: usize) -> NFA {
    let mut nfa = NFA::empty();
    let states: Vec<State> = (0..=bound).map(|i| State::new(&format!("l{}", i))).collect();
    nfa.add_start_state(states[0].clone());
    for (i, state) in states.iter().enumerate() {
        nfa.add_accept_state(state.clone());
        if let Some(next) = states.get(i + 1) {
            for symbol in alphabet {
                nfa.add_transition(state, symbol, next);
            }
        }
    }
    nfa
}

/// Nondeterministically guesses the last symbol; accepts words ending in `last`
pub fn ends_with(alphabet: &[Terminal], last: &Terminal) -> NFA {
    let mut nfa = NFA::empty();
    let guess = State::new("p");
    let done = State::new("q");
    nfa.add_start_state(guess.clone());
    nfa.add_accept_state(done.clone());
    for symbol in alphabet {
        nfa.add_transition(&guess, symbol, &guess);
    }
    nfa.add_transition(&guess, last, &done);
    nfa
}

/// The words of `cfg` up to `max_len` that `nfa` accepts
pub fn expected_intersection(cfg: &CFG, nfa: &NFA, max_len: usize) -> HashSet<Vec<Terminal>> {
    cfg.bounded_language(max_len)
        .into_iter()
        .filter(|w| nfa.accepts(w))
        .collect()
}

/// Productions in the textual format, order ignored
pub fn rendered(cfg: &CFG) -> HashSet<String> {
    cfg.get_productions().iter().map(|p| p.display()).collect()
}

macro_rules! lines {
    ($($x:expr),* $(,)?) => {
        hashbrown::HashSet::from([$($x.to_string()),*])
    };
}
