use crate::input_symbol::InputSymbol;

// Terminals of a grammar are the same objects that label automaton edges,
// which is what lets the intersection match them by name.
pub type Terminal = InputSymbol;
