use std::fmt::{Display, Formatter};

use smallvec::SmallVec;

use crate::cfg::terminal::Terminal;
use crate::cfg::variable::Variable;
use crate::input_symbol::{is_epsilon_literal, EPSILON};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Symbol {
    T(Terminal),
    V(Variable),
    Epsilon,
}

impl Symbol {
    /// Classifies a textual label: epsilon literals first, then a leading
    /// uppercase character makes a variable, everything else is a terminal.
    pub fn from_label(label: &str) -> Self {
        if is_epsilon_literal(label) {
            return Symbol::Epsilon;
        }
        match label.chars().next() {
            Some(c) if c.is_uppercase() => Symbol::V(Variable::new(label)),
            _ => Symbol::T(Terminal::new(label)),
        }
    }

    pub fn get_name(&self) -> &str {
        match self {
            Symbol::T(t) => t.get_name(),
            Symbol::V(v) => v.get_name(),
            Symbol::Epsilon => EPSILON,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Symbol::V(_))
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.get_name())
    }
}

/// Production bodies; normal form bodies never spill to the heap.
pub type Body = SmallVec<[Symbol; 2]>;

#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Production {
    pub head: Variable, // The head of the production (e.g., "S", "A")
    pub body: Body,     // The body of the production (e.g., "A b", "a S")
}

impl Production {
    /// Create a new Production
    pub fn new(head: Variable, body: Vec<Symbol>) -> Self {
        Production {
            head,
            body: Body::from_vec(body),
        }
    }

    pub fn from_body(head: Variable, body: Body) -> Self {
        Production { head, body }
    }

    /// `A -> B` with `B` a variable
    pub fn is_chain(&self) -> bool {
        self.body.len() == 1 && self.body[0].is_variable()
    }

    /// `A -> ε`
    pub fn is_epsilon(&self) -> bool {
        self.body.len() == 1 && self.body[0] == Symbol::Epsilon
    }

    /// The terminal of a production `A -> a`.
    pub fn single_terminal(&self) -> Option<&Terminal> {
        match self.body.as_slice() {
            [Symbol::T(t)] => Some(t),
            _ => None,
        }
    }

    /// The two variables of a production `A -> B C`.
    pub fn binary_variables(&self) -> Option<(&Variable, &Variable)> {
        match self.body.as_slice() {
            [Symbol::V(left), Symbol::V(right)] => Some((left, right)),
            _ => None,
        }
    }

    /// Display the production in the textual grammar format
    pub fn display(&self) -> String {
        let body_str: Vec<&str> = self.body.iter().map(|s| s.get_name()).collect();
        format!("{}: {}", self.head.get_name(), body_str.join(" "))
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}
