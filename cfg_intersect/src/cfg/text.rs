use crate::cfg::cfg::CFG;
use crate::cfg::production::{Production, Symbol};
use crate::cfg::variable::Variable;
use crate::error::GrammarError;

impl CFG {
    /// Reads a context-free grammar from a string of text.
    ///
    /// Each rule in the grammar is represented as one line in the following format:
    ///   `head: body1 | body2 | ... | bodyn`
    ///
    /// Non-terminals start with an uppercase letter, terminals with anything else.
    /// The empty word is written as `ε`, `eps` or `epsilon`.
    /// The start symbol is the head of the first rule.
    pub fn from_text(text: &str) -> Result<Self, GrammarError> {
        let mut start_symbol = None;
        let mut productions = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let head = CFG::read_line(index + 1, line, &mut productions)?;
            start_symbol.get_or_insert(head);
        }

        let start_symbol = start_symbol.ok_or(GrammarError::NoRules)?;
        Ok(Self::from_start_and_productions(start_symbol, productions))
    }

    /// Internal helper to process a single line of a grammar rule.
    ///
    /// Returns the head of the rule.
    fn read_line(
        line_number: usize,
        line: &str,
        productions: &mut Vec<Production>,
    ) -> Result<Variable, GrammarError> {
        let Some((head_s, body_s)) = line.split_once(':') else {
            return Err(GrammarError::MissingSeparator {
                line: line_number,
                text: line.to_string(),
            });
        };
        let head = match Symbol::from_label(head_s.trim()) {
            Symbol::V(head) => head,
            other => {
                return Err(GrammarError::InvalidRuleHead {
                    line: line_number,
                    symbol: match other {
                        Symbol::Epsilon => head_s.trim().to_string(),
                        _ => other.get_name().to_string(),
                    },
                })
            }
        };

        for sub_body in body_s.split('|') {
            let body: Vec<Symbol> = sub_body.split_whitespace().map(Symbol::from_label).collect();
            if body.is_empty() {
                return Err(GrammarError::EmptyRule {
                    line: line_number,
                    head: head.display(),
                });
            }
            productions.push(Production::new(head.clone(), body));
        }
        Ok(head)
    }
}
