#[macro_use]
mod common;

use cfg_intersect::cfg::cfg::CFG;
use cfg_intersect::cfg::normal_form::NameGenerator;
use cfg_intersect::cfg::production::{Production, Symbol};
use cfg_intersect::cfg::terminal::Terminal;
use cfg_intersect::cfg::variable::Variable;
use cfg_intersect::error::GrammarError;
use cfg_intersect::language::Language;
use common::{parse, rendered, GRAMMARS};

#[test]
fn test_from_text() {
    let cfg = parse(
        "S: a B | eps\n\
         B: b",
    );
    assert_eq!(cfg.get_start_symbol(), &Variable::new("S"));
    assert_eq!(cfg.production_count(), 3);
    assert_eq!(rendered(&cfg), lines!["S: a B", "S: ε", "B: b"]);
}

#[test]
fn test_from_text_blank_lines_and_long_names() {
    let text = r#"
        Expr: Term + Expr

        Expr: Term
        Term: x | ( Expr )
        "#;
    let cfg = parse(text);
    assert_eq!(cfg.get_start_symbol().get_name(), "Expr");
    assert_eq!(cfg.production_count(), 4);
    assert_eq!(cfg.variables().count(), 2);
}

#[test]
fn test_epsilon_literals() {
    for literal in ["ε", "eps", "epsilon"] {
        let cfg = parse(&format!("S: {}", literal));
        assert_eq!(rendered(&cfg), lines!["S: ε"]);
        assert!(cfg.generates_epsilon_directly());
    }
}

#[test]
fn test_symbol_classification() {
    assert_eq!(Symbol::from_label("A"), Symbol::V(Variable::new("A")));
    assert_eq!(Symbol::from_label("Expr"), Symbol::V(Variable::new("Expr")));
    assert_eq!(Symbol::from_label("a"), Symbol::T(Terminal::new("a")));
    assert_eq!(Symbol::from_label("("), Symbol::T(Terminal::new("(")));
    assert_eq!(Symbol::from_label("1"), Symbol::T(Terminal::new("1")));
    assert_eq!(Symbol::from_label("ε"), Symbol::Epsilon);
    assert_eq!(Symbol::from_label("eps"), Symbol::Epsilon);
}

#[test]
fn test_from_text_errors() {
    assert_eq!(
        CFG::from_text("S: a\nA a"),
        Err(GrammarError::MissingSeparator {
            line: 2,
            text: "A a".to_string()
        })
    );
    assert_eq!(
        CFG::from_text("\nS: a\n\nb: c"),
        Err(GrammarError::InvalidRuleHead {
            line: 4,
            symbol: "b".to_string()
        })
    );
    assert_eq!(
        CFG::from_text("eps: a"),
        Err(GrammarError::InvalidRuleHead {
            line: 1,
            symbol: "eps".to_string()
        })
    );
    assert_eq!(
        CFG::from_text("S: a |"),
        Err(GrammarError::EmptyRule {
            line: 1,
            head: "S".to_string()
        })
    );
    assert_eq!(
        CFG::from_text("S:"),
        Err(GrammarError::EmptyRule {
            line: 1,
            head: "S".to_string()
        })
    );
    assert_eq!(CFG::from_text(""), Err(GrammarError::NoRules));
    assert_eq!(CFG::from_text("\n   \n"), Err(GrammarError::NoRules));
}

#[test]
fn test_duplicate_productions() {
    let cfg = parse("S: a | a\nS: a");
    assert_eq!(cfg.production_count(), 1);

    let mut cfg = CFG::new(Variable::new("S"));
    let production = Production::new(Variable::new("S"), vec![Symbol::from_label("a")]);
    assert!(cfg.add_production(production.clone()));
    assert!(!cfg.add_production(production));
}

#[test]
fn test_to_text() {
    let cfg = parse(
        "S: A b\n\
         A: a\n\
         S: a",
    );
    assert_eq!(cfg.to_text(), "S: a\nS: A b\nA: a\n");
    assert_eq!(cfg.to_string(), cfg.to_text());
}

#[test]
fn test_to_text_placeholder() {
    let mut cfg = CFG::new(Variable::new("S"));
    cfg.add_production(Production::new(
        Variable::new("A"),
        vec![Symbol::from_label("a")],
    ));
    assert_eq!(cfg.to_text(), "S: S\nA: a\n");
}

#[test]
fn test_without_long_productions() {
    let cfg = parse("S: a b c d\nS: A B");
    let mut names = NameGenerator::for_grammar(&cfg);
    let short = cfg.without_long_productions(&mut names);
    assert_eq!(
        rendered(&short),
        lines!["S: a S0", "S0: b S1", "S1: c d", "S: A B"]
    );
}

#[test]
fn test_without_long_productions_counter_per_head() {
    let cfg = parse("S: a b c\nA: a b c");
    let mut names = NameGenerator::for_grammar(&cfg);
    let short = cfg.without_long_productions(&mut names);
    assert_eq!(
        rendered(&short),
        lines!["S: a S0", "S0: b c", "A: a A0", "A0: b c"]
    );
}

#[test]
fn test_without_epsilon() {
    let cfg = parse("S: A b\nA: a | eps");
    let mut names = NameGenerator::for_grammar(&cfg);
    let eps_free = cfg.without_epsilon(&mut names);
    assert_eq!(rendered(&eps_free), lines!["S: A b", "S: b", "A: a"]);
    assert_eq!(eps_free.get_start_symbol().get_name(), "S");
}

#[test]
fn test_without_epsilon_nullable_start() {
    let cfg = parse("S: a S | eps");
    let mut names = NameGenerator::for_grammar(&cfg);
    let eps_free = cfg.without_epsilon(&mut names);
    assert_eq!(eps_free.get_start_symbol().get_name(), "S'");
    assert_eq!(
        rendered(&eps_free),
        lines!["S': ε", "S': S", "S: a S", "S: a"]
    );
}

#[test]
fn test_without_unit_productions() {
    let cfg = parse(
        "S: A\n\
         A: B | a\n\
         B: b c",
    );
    let chain_free = cfg.without_unit_productions();
    assert_eq!(
        rendered(&chain_free),
        lines!["S: a", "S: b c", "A: a", "A: b c", "B: b c"]
    );
}

#[test]
fn test_without_unit_productions_cycle() {
    let cfg = parse(
        "S: A | s\n\
         A: S | a\n\
         B: C",
    );
    let chain_free = cfg.without_unit_productions();
    // C has no productions, the chain B -> C derives nothing
    assert_eq!(rendered(&chain_free), lines!["S: s", "S: a", "A: s", "A: a"]);
}

#[test]
fn test_with_only_single_terminal_productions() {
    let cfg = parse("S: a B\nB: b");
    let mut names = NameGenerator::for_grammar(&cfg);
    let isolated = cfg.with_only_single_terminal_productions(&mut names);
    assert_eq!(rendered(&isolated), lines!["S: AL B", "AL: a", "B: b"]);
}

#[test]
fn test_terminal_variable_avoids_clash() {
    let cfg = parse("S: a AL\nAL: b");
    let mut names = NameGenerator::for_grammar(&cfg);
    let isolated = cfg.with_only_single_terminal_productions(&mut names);
    assert_eq!(rendered(&isolated), lines!["S: AL0 AL", "AL0: a", "AL: b"]);
}

#[test]
fn test_to_normal_form_simple() {
    let cfg = parse("S: a b c");
    let normal_form = cfg.to_normal_form();
    assert!(normal_form.is_normal_form());
    assert_eq!(
        rendered(&normal_form),
        lines!["S: AL S0", "S0: BL CL", "AL: a", "BL: b", "CL: c"]
    );
}

#[test]
fn test_is_normal_form() {
    assert!(parse("S: A B\nA: a\nB: b").is_normal_form());
    assert!(parse("S: A B | eps\nA: a\nB: b").is_normal_form());
    assert!(!parse("S: A S | eps\nA: a").is_normal_form());
    assert!(!parse("S: A B\nA: a | eps\nB: b").is_normal_form());
    assert!(!parse("S: A\nA: a").is_normal_form());
    assert!(!parse("S: a B\nB: b").is_normal_form());
    assert!(!parse("S: A B A\nA: a\nB: b").is_normal_form());
}

#[test]
fn test_normal_form_shape() {
    for text in GRAMMARS {
        let normal_form = parse(text).to_normal_form();
        assert!(normal_form.is_normal_form(), "not in normal form:\n{}", normal_form);
        for production in normal_form.get_productions() {
            match production.body.as_slice() {
                [Symbol::T(_)] | [Symbol::V(_), Symbol::V(_)] => {}
                [Symbol::Epsilon] => assert_eq!(&production.head, normal_form.get_start_symbol()),
                _ => panic!("unexpected production {}", production),
            }
        }
    }
}

#[test]
fn test_normal_form_language() {
    for text in GRAMMARS {
        let cfg = parse(text);
        let normal_form = cfg.to_normal_form();
        assert_eq!(
            cfg.bounded_language(6),
            normal_form.bounded_language(6),
            "language changed for\n{}\nnormal form:\n{}",
            text,
            normal_form
        );
    }
}

#[test]
fn test_normal_form_idempotent_language() {
    for text in GRAMMARS {
        let once = parse(text).to_normal_form();
        let twice = once.to_normal_form();
        assert!(twice.is_normal_form());
        assert_eq!(once.bounded_language(6), twice.bounded_language(6));
    }
}

#[test]
fn test_bounded_language() {
    let cfg = parse("S: a S b | eps");
    assert_eq!(cfg.bounded_language(4), words!["", "ab", "aabb"]);

    let cfg = parse("S: S ( S ) | eps");
    assert_eq!(
        cfg.bounded_language(4),
        words!["", "()", "()()", "(())"]
    );
}

#[test]
fn test_accepts() {
    let cfg = parse("S: a S b | eps");
    let normal_form = cfg.to_normal_form();
    for grammar in [&cfg, &normal_form] {
        assert!(grammar.accepts_string(""));
        assert!(grammar.accepts_string("ab"));
        assert!(grammar.accepts_string("aaabbb"));
        assert!(!grammar.accepts_string("aab"));
        assert!(!grammar.accepts_string("ba"));
        assert!(!grammar.accepts_string("c"));
    }

    let expressions = parse(GRAMMARS[5]).to_normal_form();
    assert!(expressions.accepts_words("( x + x ) * x"));
    assert!(!expressions.accepts_words("x + * x"));
}

#[test]
fn test_without_useless_symbols() {
    let cfg = parse(
        "S: A B | a\n\
         A: a\n\
         B: B b\n\
         C: c",
    );
    let reduced = cfg.without_useless_symbols();
    assert_eq!(rendered(&reduced), lines!["S: a"]);
    assert_eq!(cfg.bounded_language(4), reduced.bounded_language(4));
}

#[test]
fn test_is_empty() {
    assert!(parse("S: S a").is_empty());
    assert!(parse("S: A\nA: A b").is_empty());
    assert!(!parse("S: eps").is_empty());
    assert!(!parse("S: A\nA: B b | a\nB: B").is_empty());
}
