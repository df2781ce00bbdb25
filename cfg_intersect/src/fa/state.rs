use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct State {
    pub name: String, // The name of the automaton node (e.g., "q0", "1")
}

impl State {
    /// Create a new State
    pub fn new(name: &str) -> Self {
        State {
            name: name.to_string(),
        }
    }

    /// Get the name of the state
    pub fn get_name(&self) -> &str {
        &self.name
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
