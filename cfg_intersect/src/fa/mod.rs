pub mod dot;
pub mod nfa;
pub mod state;
