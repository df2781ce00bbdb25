use log::info;

use crate::cfg::cfg::CFG;
use crate::error::Result;
use crate::fa::dot::DotConvention;
use crate::fa::nfa::NFA;

/// What to do with the grammar once it has been read
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub convention: DotConvention,
    /// drop productions that take part in no derivation
    pub reduce: bool,
}

/// Reads an automaton (DOT) and a grammar (textual format) and returns the
/// grammar of their intersection.
///
/// The automaton is checked before the grammar is touched, so a bad
/// automaton is reported without any normalization work.
pub fn intersect_text(
    automaton_text: &str,
    grammar_text: &str,
    options: &PipelineOptions,
) -> Result<CFG> {
    let nfa = NFA::from_dot(automaton_text, &options.convention)?;
    nfa.start_state()?;
    nfa.accept_state_indices()?;
    info!(
        "read automaton with {} states and {} transitions",
        nfa.states.len(),
        nfa.get_transitions().len()
    );
    let grammar = CFG::from_text(grammar_text)?;
    info!(
        "read grammar with start symbol {} and {} productions",
        grammar.start_symbol,
        grammar.production_count()
    );
    let intersection = grammar.intersection(&nfa)?;
    info!(
        "intersection grammar has {} productions",
        intersection.production_count()
    );
    Ok(finish(intersection, options))
}

fn finish(cfg: CFG, options: &PipelineOptions) -> CFG {
    if options.reduce {
        cfg.without_useless_symbols()
    } else {
        cfg
    }
}
