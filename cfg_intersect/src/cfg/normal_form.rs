use hashbrown::{HashMap, HashSet};
use log::debug;

use crate::cfg::cfg::CFG;
use crate::cfg::production::{Body, Production, Symbol};
use crate::cfg::terminal::Terminal;
use crate::cfg::variable::Variable;

/// Hands out variable names that do not clash with any name already used
/// in the grammar being normalized (or handed out earlier in the same run).
#[derive(Debug, Clone, Default)]
pub struct NameGenerator {
    taken: HashSet<String>,
}

impl NameGenerator {
    pub fn for_grammar(cfg: &CFG) -> Self {
        let mut taken = HashSet::from([cfg.start_symbol.name.clone()]);
        for production in cfg.productions.values().flatten() {
            taken.insert(production.head.name.clone());
            for symbol in production.body.iter() {
                if let Symbol::V(variable) = symbol {
                    taken.insert(variable.name.clone());
                }
            }
        }
        NameGenerator { taken }
    }

    /// Returns `base` if it is still free, otherwise `base0`, `base1`, ...
    pub fn fresh(&mut self, base: &str) -> Variable {
        if self.taken.insert(base.to_string()) {
            return Variable::new(base);
        }
        let mut counter = 0;
        self.fresh_numbered(base, &mut counter)
    }

    /// Returns `base{counter}` for the next free value of `counter`.
    pub fn fresh_numbered(&mut self, base: &str, counter: &mut usize) -> Variable {
        loop {
            let name = format!("{}{}", base, counter);
            *counter += 1;
            if self.taken.insert(name.clone()) {
                return Variable::from_string(name);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nullability {
    /// not known to derive ε (yet)
    Unknown,
    /// known to derive ε, occurrences not yet propagated
    Pending,
    Nullable,
}

impl CFG {
    /// Decomposes productions of the form `A -> B C D E` into `A -> B A0`, `A0 -> C A1` and `A1 -> D E`.
    ///
    /// The numbering of the intermediate variables is scoped per head.
    pub fn without_long_productions(&self, names: &mut NameGenerator) -> Self {
        let mut short_cfg = CFG::new(self.start_symbol.clone());
        let mut counters: HashMap<&Variable, usize> = HashMap::new();

        for production in self.productions.values().flatten() {
            let body = &production.body;
            if body.len() <= 2 {
                short_cfg.add_production(production.clone());
                continue;
            }
            let counter = counters.entry(&production.head).or_insert(0);
            let added: Vec<Variable> = (0..body.len() - 2)
                .map(|_| names.fresh_numbered(production.head.get_name(), counter))
                .collect();

            short_cfg.add_production(Production::new(
                production.head.clone(),
                vec![body[0].clone(), Symbol::V(added[0].clone())],
            ));
            for (index, head) in added.iter().enumerate() {
                let tail = match added.get(index + 1) {
                    Some(next) => Symbol::V(next.clone()),
                    None => body[index + 2].clone(),
                };
                short_cfg.add_production(Production::new(
                    head.clone(),
                    vec![body[index + 1].clone(), tail],
                ));
            }
        }
        debug!(
            "long productions removed: {} productions",
            short_cfg.production_count()
        );
        short_cfg
    }

    /// Computes the set of variables deriving the empty word.
    ///
    /// Every production keeps a count of the variables in its body not yet
    /// known to be nullable; a head becomes nullable when one of its counts
    /// drops to zero. Productions containing a terminal never count.
    pub fn nullable_variables(&self) -> HashSet<Variable> {
        let productions: Vec<&Production> = self.productions.values().flatten().collect();
        let mut state: HashMap<&Variable, Nullability> = HashMap::new();
        let mut remaining: Vec<usize> = Vec::with_capacity(productions.len());
        let mut impacts: HashMap<&Variable, Vec<usize>> = HashMap::new();
        let mut to_process: Vec<&Variable> = vec![];

        for (index, production) in productions.iter().enumerate() {
            let mut count = 0;
            let mut has_terminal = false;
            for symbol in production.body.iter() {
                match symbol {
                    Symbol::T(_) => has_terminal = true,
                    Symbol::V(variable) => {
                        count += 1;
                        impacts.entry(variable).or_default().push(index);
                    }
                    Symbol::Epsilon => {}
                }
            }
            if has_terminal {
                // can never reach zero
                count = usize::MAX;
            }
            remaining.push(count);
            let head_state = state.entry(&production.head).or_insert(Nullability::Unknown);
            if count == 0 && *head_state == Nullability::Unknown {
                *head_state = Nullability::Pending;
                to_process.push(&production.head);
            }
        }

        while let Some(variable) = to_process.pop() {
            state.insert(variable, Nullability::Nullable);
            let Some(occurrences) = impacts.get(variable) else {
                continue;
            };
            for &index in occurrences {
                if remaining[index] == usize::MAX || remaining[index] == 0 {
                    continue;
                }
                remaining[index] -= 1;
                if remaining[index] > 0 {
                    continue;
                }
                let head = &productions[index].head;
                let head_state = state.entry(head).or_insert(Nullability::Unknown);
                if *head_state == Nullability::Unknown {
                    *head_state = Nullability::Pending;
                    to_process.push(head);
                }
            }
        }

        state
            .into_iter()
            .filter(|(_, nullability)| *nullability == Nullability::Nullable)
            .map(|(variable, _)| variable.clone())
            .collect()
    }

    /// Generates all production variants when removing nullable symbols.
    ///
    /// Epsilon symbols are always dropped; the empty variant is included.
    fn _production_without_nullable(
        body: &[Symbol],
        nullable_variables: &HashSet<Variable>,
    ) -> Vec<Body> {
        let Some((first, rest)) = body.split_first() else {
            return vec![Body::new()];
        };
        let further_bodies = CFG::_production_without_nullable(rest, nullable_variables);
        let nullable = match first {
            Symbol::Epsilon => return further_bodies,
            Symbol::V(variable) => nullable_variables.contains(variable),
            Symbol::T(_) => false,
        };
        let mut all_bodies = Vec::with_capacity(further_bodies.len() * 2);
        for further in &further_bodies {
            let mut new_body = Body::with_capacity(further.len() + 1);
            new_body.push(first.clone());
            new_body.extend(further.iter().cloned());
            all_bodies.push(new_body);
        }
        if nullable {
            // drop the symbol
            all_bodies.extend(further_bodies);
        }
        all_bodies
    }

    /// Removes epsilon productions from the CFG.
    ///
    /// If the start symbol is nullable, a fresh start `S'` with `S' -> ε` and
    /// `S' -> S` is introduced so the empty word stays in the language.
    pub fn without_epsilon(&self, names: &mut NameGenerator) -> Self {
        let nullable_variables = self.nullable_variables();

        let mut eps_free_cfg = if nullable_variables.contains(&self.start_symbol) {
            let new_start = names.fresh(&format!("{}'", self.start_symbol.get_name()));
            let mut cfg = CFG::new(new_start.clone());
            cfg.add_production(Production::new(new_start.clone(), vec![Symbol::Epsilon]));
            cfg.add_production(Production::new(
                new_start,
                vec![Symbol::V(self.start_symbol.clone())],
            ));
            cfg
        } else {
            CFG::new(self.start_symbol.clone())
        };

        for production in self.productions.values().flatten() {
            for body in CFG::_production_without_nullable(&production.body, &nullable_variables) {
                if body.is_empty() {
                    continue;
                }
                eps_free_cfg.add_production(Production::from_body(production.head.clone(), body));
            }
        }
        debug!(
            "epsilon productions removed: {} nullable variables, {} productions",
            nullable_variables.len(),
            eps_free_cfg.production_count()
        );
        eps_free_cfg
    }

    /// Reflexive-transitive closure of the chain relation `A -> B`, over the
    /// variables with at least one production.
    ///
    /// Returns the variables and the reachability matrix indexed like them.
    pub fn unit_closure(&self) -> (Vec<&Variable>, Vec<Vec<bool>>) {
        let mut variables: Vec<&Variable> = self.variables().collect();
        variables.sort();
        let index_of: HashMap<&Variable, usize> =
            variables.iter().enumerate().map(|(i, v)| (*v, i)).collect();

        let n = variables.len();
        let mut reachable = vec![vec![false; n]; n];
        for (i, head) in variables.iter().enumerate() {
            reachable[i][i] = true;
            for production in self.get_productions_of(head) {
                if let [Symbol::V(body)] = production.body.as_slice() {
                    if let Some(&j) = index_of.get(body) {
                        reachable[i][j] = true;
                    }
                }
            }
        }

        // Warshall
        for k in 0..n {
            for i in 0..n {
                if !reachable[i][k] {
                    continue;
                }
                for j in 0..n {
                    if reachable[k][j] {
                        reachable[i][j] = true;
                    }
                }
            }
        }
        (variables, reachable)
    }

    /// Removes chain productions from the CFG
    ///
    /// For every chain A ->* B and every non-chain production B -> YYY, add A -> YYY.
    /// Chains into variables without productions derive nothing and are dropped.
    pub fn without_unit_productions(&self) -> Self {
        let (variables, reachable) = self.unit_closure();
        let mut chain_free_cfg = CFG::new(self.start_symbol.clone());

        for (i, head) in variables.iter().enumerate() {
            for (j, body_variable) in variables.iter().enumerate() {
                if !reachable[i][j] {
                    continue;
                }
                for production in self.get_productions_of(body_variable) {
                    if production.is_chain() {
                        continue;
                    }
                    chain_free_cfg
                        .add_production(Production::from_body((*head).clone(), production.body.clone()));
                }
            }
        }
        debug!(
            "chain productions removed: {} productions",
            chain_free_cfg.production_count()
        );
        chain_free_cfg
    }

    /// Replaces terminals in two-symbol bodies by dedicated variables.
    ///
    /// The variable for terminal `a` is named `AL` and gets the single production `AL -> a`.
    pub fn with_only_single_terminal_productions(&self, names: &mut NameGenerator) -> Self {
        let mut result_cfg = CFG::new(self.start_symbol.clone());
        let mut added_variables: HashMap<Terminal, Variable> = HashMap::new();

        for production in self.productions.values().flatten() {
            if production.body.len() == 1 {
                result_cfg.add_production(production.clone());
                continue;
            }
            let body: Body = production
                .body
                .iter()
                .map(|symbol| match symbol {
                    Symbol::T(terminal) => {
                        let variable = added_variables
                            .entry(terminal.clone())
                            .or_insert_with(|| {
                                names.fresh(&format!("{}L", terminal.get_name().to_uppercase()))
                            })
                            .clone();
                        Symbol::V(variable)
                    }
                    _ => symbol.clone(),
                })
                .collect();
            result_cfg.add_production(Production::from_body(production.head.clone(), body));
        }
        for (terminal, variable) in added_variables {
            result_cfg.add_production(Production::new(variable, vec![Symbol::T(terminal)]));
        }
        debug!(
            "terminals isolated: {} productions",
            result_cfg.production_count()
        );
        result_cfg
    }

    /// Converts the CFG to Chomsky normal form.
    ///
    /// The result generates the same language, including the empty word.
    pub fn to_normal_form(&self) -> Self {
        let mut names = NameGenerator::for_grammar(self);
        let short_cfg = self.without_long_productions(&mut names);
        let eps_free_cfg = short_cfg.without_epsilon(&mut names);
        let chain_free_cfg = eps_free_cfg.without_unit_productions();
        chain_free_cfg.with_only_single_terminal_productions(&mut names)
    }
}
