use crate::input_symbol::{char_to_symbol, symbols_from_words, InputSymbol};

pub trait Language {
    fn accepts(&self, input: &[InputSymbol]) -> bool;

    /// Checks a word given as a string with one symbol per character.
    fn accepts_string(&self, input: &str) -> bool {
        let input_symbols: Vec<InputSymbol> = input.chars().map(char_to_symbol).collect();
        self.accepts(&input_symbols)
    }

    /// Checks a word whose symbols are separated by whitespace, for alphabets
    /// with multi-character terminals.
    fn accepts_words(&self, input: &str) -> bool {
        self.accepts(&symbols_from_words(input))
    }
}
