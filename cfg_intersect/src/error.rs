use thiserror::Error;

/// Malformed grammar definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("line {line}: expected a rule of the form `A: x y`, got \"{text}\"")]
    MissingSeparator { line: usize, text: String },
    #[error("line {line}: rule symbol should be non-terminal, but got \"{symbol}\"")]
    InvalidRuleHead { line: usize, symbol: String },
    #[error("line {line}: rule for \"{head}\" has no right-hand symbols")]
    EmptyRule { line: usize, head: String },
    #[error("grammar definition contains no rules")]
    NoRules,
}

/// Malformed automata, either while reading the graph or when it is used
/// for an intersection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    #[error("no start nodes")]
    NoStartState,
    #[error("more than one start node: {}", .0.join(", "))]
    MultipleStartStates(Vec<String>),
    #[error("no terminal nodes")]
    NoAcceptStates,
    #[error("edge {from} -> {to} has no \"{key}\" attribute")]
    MissingEdgeLabel {
        from: String,
        to: String,
        key: String,
    },
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed grammar: {0}")]
    Grammar(#[from] GrammarError),
    #[error("malformed automaton: {0}")]
    Automaton(#[from] AutomatonError),
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
