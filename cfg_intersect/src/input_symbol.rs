#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct InputSymbol {
    pub name: String, // Textual representation of the symbol (e.g. "a", "(")
}

/// Literals that denote the empty word in grammar definitions.
pub const EPSILON_SYMBOLS: [&str; 3] = ["ε", "eps", "epsilon"];
/// Canonical rendering of the empty word.
pub const EPSILON: &str = EPSILON_SYMBOLS[0];

impl InputSymbol {
    /// Create a new InputSymbol
    pub fn new(name: &str) -> Self {
        InputSymbol {
            name: name.to_string(),
        }
    }

    /// Get the name of the symbol
    pub fn get_name(&self) -> &str {
        &self.name
    }
}

pub fn is_epsilon_literal(label: &str) -> bool {
    EPSILON_SYMBOLS.contains(&label)
}

/// The symbol for a single character.
pub fn char_to_symbol(c: char) -> InputSymbol {
    InputSymbol {
        name: c.to_string(),
    }
}

/// Splits a whitespace separated word (`"( ( ) )"`) into its symbols.
pub fn symbols_from_words(input: &str) -> Vec<InputSymbol> {
    input.split_whitespace().map(InputSymbol::new).collect()
}
