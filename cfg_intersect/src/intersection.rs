use hashbrown::{HashMap, HashSet};
use log::{debug, trace};
use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::collections::VecDeque;

use crate::cfg::cfg::CFG;
use crate::cfg::production::{Production, Symbol};
use crate::cfg::terminal::Terminal;
use crate::cfg::variable::Variable;
use crate::error::AutomatonError;
use crate::fa::nfa::NFA;

/// Name of the start symbol of every intersection grammar
pub const INTERSECTION_START: &str = "S";

/// `[left, symbol, right]`: the automaton can move from `left` to `right`
/// reading a word derivable from `symbol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TripleState<'g> {
    pub left: usize,
    pub symbol: &'g Variable,
    pub right: usize,
}

impl<'g> TripleState<'g> {
    pub fn new(left: usize, symbol: &'g Variable, right: usize) -> Self {
        TripleState {
            left,
            symbol,
            right,
        }
    }

    /// The variable standing for this state in the intersection grammar.
    ///
    /// Components containing `,`, `[`, `]` or `"` are quoted, so distinct
    /// triples always get distinct names.
    pub fn to_variable(&self, nfa: &NFA) -> Variable {
        Variable::from_string(format!(
            "[{},{},{}]",
            triple_component(nfa.get_state(self.left).get_name()),
            triple_component(self.symbol.get_name()),
            triple_component(nfa.get_state(self.right).get_name())
        ))
    }
}

fn triple_component(name: &str) -> Cow<'_, str> {
    if !name.contains(|c: char| matches!(c, ',' | '[' | ']' | '"')) {
        return Cow::Borrowed(name);
    }
    Cow::Owned(format!(
        "\"{}\"",
        name.replace('\\', "\\\\").replace('"', "\\\"")
    ))
}

/// Triple states found so far and the ones still to be combined
#[derive(Debug, Default)]
struct Worklist<'g> {
    visited: HashSet<TripleState<'g>>,
    queue: VecDeque<TripleState<'g>>,
}

impl<'g> Worklist<'g> {
    /// Records a derivable state; returns false if it was known already
    fn reach(&mut self, state: TripleState<'g>) -> bool {
        if !self.visited.insert(state) {
            return false;
        }
        self.queue.push_back(state);
        true
    }

    fn contains(&self, state: &TripleState<'g>) -> bool {
        self.visited.contains(state)
    }
}

/// Binary production `head -> left right`
type BinaryRule<'g> = (&'g Variable, &'g Variable, &'g Variable);

impl CFG {
    /// Returns a grammar for the intersection of this grammar's language with
    /// the language accepted by `nfa`.
    ///
    /// The automaton needs exactly one start state and at least one accept
    /// state. Grammars not in normal form are normalized first.
    pub fn intersection(&self, nfa: &NFA) -> Result<CFG, AutomatonError> {
        let start_state = nfa.start_state()?;
        let accept_states = nfa.accept_state_indices()?;
        if self.is_normal_form() {
            return Ok(self._compute_intersection(nfa, start_state, &accept_states));
        }
        debug!("grammar is not in normal form, normalizing before intersecting");
        let normal_form = self.to_normal_form();
        Ok(normal_form._compute_intersection(nfa, start_state, &accept_states))
    }

    fn _compute_intersection(&self, nfa: &NFA, start_state: usize, accept_states: &[usize]) -> CFG {
        let new_start = Variable::new(INTERSECTION_START);
        let mut result = CFG::new(new_start.clone());
        let generates_epsilon = self.generates_epsilon_directly();

        for &accept_state in accept_states {
            let top = TripleState::new(start_state, &self.start_symbol, accept_state)
                .to_variable(nfa);
            result.add_production(Production::new(new_start.clone(), vec![Symbol::V(top.clone())]));
            // the empty word is only seen when no transition is taken
            if generates_epsilon && accept_state == start_state {
                result.add_production(Production::new(top, vec![Symbol::Epsilon]));
            }
        }

        let mut worklist = Worklist::default();
        self._seed_single_letter_productions(nfa, &mut worklist, &mut result);
        let seeded = worklist.visited.len();

        let index = self._binary_productions_by_body_symbol();
        let states_len = nfa.states.len();
        while let Some(state) = worklist.queue.pop_front() {
            let Some(rules) = index.get(state.symbol) else {
                continue;
            };
            for &(head, left, right) in rules {
                if left == state.symbol {
                    // state is the left operand: [u,X,v] [v,Z,w] => [u,P,w]
                    for w in 0..states_len {
                        let complement = TripleState::new(state.right, right, w);
                        if worklist.contains(&complement) {
                            let parent = TripleState::new(state.left, head, w);
                            Self::_emit(nfa, &mut worklist, &mut result, parent, state, complement);
                        }
                    }
                }
                if right == state.symbol {
                    // state is the right operand: [w,Y,u] [u,X,v] => [w,P,v]
                    for w in 0..states_len {
                        let complement = TripleState::new(w, left, state.left);
                        if worklist.contains(&complement) {
                            let parent = TripleState::new(w, head, state.right);
                            Self::_emit(nfa, &mut worklist, &mut result, parent, complement, state);
                        }
                    }
                }
            }
        }

        debug!(
            "intersection: {} single letter states, {} states in total, {} productions",
            seeded,
            worklist.visited.len(),
            result.production_count()
        );
        result
    }

    /// Adds `[u,N,v] -> a` for every transition `u -a-> v` and production `N -> a`
    fn _seed_single_letter_productions<'g>(
        &'g self,
        nfa: &NFA,
        worklist: &mut Worklist<'g>,
        result: &mut CFG,
    ) {
        let mut heads_by_terminal: HashMap<&Terminal, Vec<&Variable>> = HashMap::new();
        for production in self.productions.values().flatten() {
            if let Some(terminal) = production.single_terminal() {
                heads_by_terminal
                    .entry(terminal)
                    .or_default()
                    .push(&production.head);
            }
        }

        for (from, symbol, to) in nfa.get_transitions() {
            let Some(heads) = heads_by_terminal.get(symbol) else {
                continue;
            };
            for &head in heads {
                let state = TripleState::new(from, head, to);
                worklist.reach(state);
                result.add_production(Production::new(
                    state.to_variable(nfa),
                    vec![Symbol::T(symbol.clone())],
                ));
            }
        }
    }

    /// Maps every variable to the binary productions it occurs in
    fn _binary_productions_by_body_symbol(&self) -> FxHashMap<&Variable, Vec<BinaryRule<'_>>> {
        let mut index: FxHashMap<&Variable, Vec<BinaryRule<'_>>> = FxHashMap::default();
        for production in self.productions.values().flatten() {
            let Some((left, right)) = production.binary_variables() else {
                continue;
            };
            let rule = (&production.head, left, right);
            index.entry(left).or_default().push(rule);
            if right != left {
                index.entry(right).or_default().push(rule);
            }
        }
        index
    }

    fn _emit<'g>(
        nfa: &NFA,
        worklist: &mut Worklist<'g>,
        result: &mut CFG,
        parent: TripleState<'g>,
        left: TripleState<'g>,
        right: TripleState<'g>,
    ) {
        let production = Production::new(
            parent.to_variable(nfa),
            vec![
                Symbol::V(left.to_variable(nfa)),
                Symbol::V(right.to_variable(nfa)),
            ],
        );
        trace!("intersection production {}", production);
        result.add_production(production);
        worklist.reach(parent);
    }
}
