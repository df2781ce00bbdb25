use hashbrown::{HashMap, HashSet};
use std::fmt::{Display, Formatter};

use crate::cfg::production::{Production, Symbol};
use crate::cfg::terminal::Terminal;
use crate::cfg::variable::Variable;
use crate::input_symbol::InputSymbol;
use crate::language::Language;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CFG {
    pub start_symbol: Variable, // Start symbol
    pub productions: HashMap<Variable, HashSet<Production>>, // Production rules (head -> set of productions)
}

impl CFG {
    /// Creates a grammar without any productions
    pub fn new(start_symbol: Variable) -> Self {
        CFG {
            start_symbol,
            productions: HashMap::new(),
        }
    }

    /// A convenience constructor to create a CFG from a start symbol and a list of productions.
    /// Duplicate productions are dropped.
    pub fn from_start_and_productions(
        start_symbol: Variable,
        productions: impl IntoIterator<Item = Production>,
    ) -> Self {
        let mut cfg = CFG::new(start_symbol);
        for production in productions {
            cfg.add_production(production);
        }
        cfg
    }

    /// Returns the start symbol of the grammar
    pub fn get_start_symbol(&self) -> &Variable {
        &self.start_symbol
    }

    /// Adds a production; returns false if an identical production was already present.
    pub fn add_production(&mut self, production: Production) -> bool {
        self.productions
            .entry(production.head.clone())
            .or_default()
            .insert(production)
    }

    /// Returns the production rules for a given non-terminal symbol
    pub fn get_productions_of(&self, head: &Variable) -> impl Iterator<Item = &Production> {
        self.productions.get(head).into_iter().flatten()
    }

    /// Returns all production rules of the grammar, sorted by head and body
    pub fn get_productions(&self) -> Vec<&Production> {
        let mut all_productions: Vec<&Production> = self.productions.values().flatten().collect();
        all_productions.sort();
        all_productions
    }

    /// Returns the variables that head at least one production
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.productions
            .iter()
            .filter(|(_, productions)| !productions.is_empty())
            .map(|(head, _)| head)
    }

    pub fn production_count(&self) -> usize {
        self.productions.values().map(|p| p.len()).sum()
    }

    /// Whether the start symbol has a production `S -> ε` of its own
    pub fn generates_epsilon_directly(&self) -> bool {
        self.get_productions_of(&self.start_symbol)
            .any(|p| p.is_epsilon())
    }

    /// Checks the Chomsky normal form shape: every body is a single terminal
    /// or two variables, except `S -> ε` on a start symbol that appears in no body.
    pub fn is_normal_form(&self) -> bool {
        let mut has_epsilon = false;
        let mut start_in_body = false;
        for production in self.productions.values().flatten() {
            match production.body.as_slice() {
                [Symbol::T(_)] => {}
                [Symbol::V(left), Symbol::V(right)] => {
                    start_in_body |= *left == self.start_symbol || *right == self.start_symbol;
                }
                [Symbol::Epsilon] if production.head == self.start_symbol => has_epsilon = true,
                _ => return false,
            }
        }
        !(has_epsilon && start_in_body)
    }

    /// Every terminal word of length at most `max_len` derivable from the start symbol.
    ///
    /// Works on arbitrary grammars (epsilon and chain productions, cycles) by
    /// growing a word set per variable until nothing changes.
    pub fn bounded_language(&self, max_len: usize) -> HashSet<Vec<Terminal>> {
        let mut words: HashMap<&Variable, HashSet<Vec<Terminal>>> = HashMap::new();
        let mut changed = true;
        while changed {
            changed = false;
            for production in self.productions.values().flatten() {
                let mut partial: HashSet<Vec<Terminal>> = HashSet::from([vec![]]);
                for symbol in production.body.iter() {
                    partial = match symbol {
                        Symbol::Epsilon => partial,
                        Symbol::T(terminal) => partial
                            .into_iter()
                            .filter(|word| word.len() < max_len)
                            .map(|mut word| {
                                word.push(terminal.clone());
                                word
                            })
                            .collect(),
                        Symbol::V(variable) => match words.get(variable) {
                            None => HashSet::new(),
                            Some(suffixes) => {
                                let mut next = HashSet::new();
                                for prefix in &partial {
                                    for suffix in suffixes {
                                        if prefix.len() + suffix.len() <= max_len {
                                            let mut word = prefix.clone();
                                            word.extend(suffix.iter().cloned());
                                            next.insert(word);
                                        }
                                    }
                                }
                                next
                            }
                        },
                    };
                    if partial.is_empty() {
                        break;
                    }
                }
                if partial.is_empty() {
                    continue;
                }
                let known = words.entry(&production.head).or_default();
                for word in partial {
                    changed |= known.insert(word);
                }
            }
        }
        words.remove(&self.start_symbol).unwrap_or_default()
    }

    /// CYK membership test, only meaningful on grammars in normal form.
    fn _cyk_accepts(&self, input: &[InputSymbol]) -> bool {
        let n = input.len();
        if n == 0 {
            return self.generates_epsilon_directly();
        }
        // table[i][l - 1] holds the variables deriving input[i..i + l]
        let mut table: Vec<Vec<HashSet<&Variable>>> = vec![vec![HashSet::new(); n]; n];
        let mut binary = Vec::new();
        for production in self.productions.values().flatten() {
            if let Some(terminal) = production.single_terminal() {
                for (i, symbol) in input.iter().enumerate() {
                    if symbol == terminal {
                        table[i][0].insert(&production.head);
                    }
                }
            } else if let Some((left, right)) = production.binary_variables() {
                binary.push((&production.head, left, right));
            }
        }
        for length in 2..=n {
            for i in 0..=n - length {
                for split in 1..length {
                    for (head, left, right) in &binary {
                        if table[i][split - 1].contains(left)
                            && table[i + split][length - split - 1].contains(right)
                        {
                            table[i][length - 1].insert(*head);
                        }
                    }
                }
            }
        }
        table[0][n - 1].contains(&self.start_symbol)
    }

    /// Renders the grammar in the textual format, start symbol first.
    pub fn to_text(&self) -> String {
        let mut result = String::new();
        let start_productions: Vec<&Production> = {
            let mut productions: Vec<&Production> =
                self.get_productions_of(&self.start_symbol).collect();
            productions.sort();
            productions
        };
        if start_productions.is_empty() {
            // the start symbol only derives itself
            let name = self.start_symbol.get_name();
            result.push_str(&format!("{}: {}\n", name, name));
        }
        for production in start_productions {
            result.push_str(&production.display());
            result.push('\n');
        }
        for production in self.get_productions() {
            if production.head == self.start_symbol {
                continue;
            }
            result.push_str(&production.display());
            result.push('\n');
        }
        result
    }
}

impl Language for CFG {
    fn accepts(&self, input: &[InputSymbol]) -> bool {
        if self.is_normal_form() {
            return self._cyk_accepts(input);
        }
        self.bounded_language(input.len()).contains(input)
    }
}

impl Display for CFG {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_text())
    }
}
