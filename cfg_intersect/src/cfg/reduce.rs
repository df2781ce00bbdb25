use hashbrown::HashSet;
use log::debug;

use crate::cfg::cfg::CFG;
use crate::cfg::production::Symbol;
use crate::cfg::variable::Variable;

impl CFG {
    /// Variables that derive at least one terminal word (possibly empty).
    pub fn get_generating_variables(&self) -> HashSet<&Variable> {
        let mut generating: HashSet<&Variable> = HashSet::new();
        let mut changed = true;
        while changed {
            changed = false;
            for production in self.productions.values().flatten() {
                if generating.contains(&production.head) {
                    continue;
                }
                let all_generating = production.body.iter().all(|symbol| match symbol {
                    Symbol::V(variable) => generating.contains(variable),
                    Symbol::T(_) | Symbol::Epsilon => true,
                });
                if all_generating {
                    generating.insert(&production.head);
                    changed = true;
                }
            }
        }
        generating
    }

    /// Variables occurring in some sentential form derived from the start symbol.
    pub fn get_reachable_variables(&self) -> HashSet<&Variable> {
        let mut reachable: HashSet<&Variable> = HashSet::from([&self.start_symbol]);
        let mut to_process = vec![&self.start_symbol];
        while let Some(variable) = to_process.pop() {
            for production in self.get_productions_of(variable) {
                for symbol in production.body.iter() {
                    if let Symbol::V(next) = symbol {
                        if reachable.insert(next) {
                            to_process.push(next);
                        }
                    }
                }
            }
        }
        reachable
    }

    /// True if the grammar generates no word at all
    pub fn is_empty(&self) -> bool {
        !self.get_generating_variables().contains(&self.start_symbol)
    }

    fn _reduced_to(&self, keep: &HashSet<&Variable>) -> CFG {
        let retained = self
            .productions
            .values()
            .flatten()
            .filter(|production| {
                keep.contains(&production.head)
                    && production.body.iter().all(|symbol| match symbol {
                        Symbol::V(variable) => keep.contains(variable),
                        _ => true,
                    })
            })
            .cloned();
        CFG::from_start_and_productions(self.start_symbol.clone(), retained)
    }

    /// Drops every production mentioning a non-generating or unreachable variable.
    pub fn without_useless_symbols(&self) -> CFG {
        let generating = self.get_generating_variables();
        let cfg_generating = self._reduced_to(&generating);
        let reachable = cfg_generating.get_reachable_variables();
        let reduced = cfg_generating._reduced_to(&reachable);
        debug!(
            "useless symbols removed: {} of {} productions kept",
            reduced.production_count(),
            self.production_count()
        );
        reduced
    }
}
