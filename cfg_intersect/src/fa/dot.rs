//! Reader for automata written as Graphviz `digraph`s.
//!
//! Only the part of the DOT language needed to describe a finite automaton
//! is understood: node and edge statements with attribute lists, edge
//! chains, `node`/`edge` default attributes and graph attributes (ignored).
//! Subgraphs, ports, HTML strings and undirected graphs are rejected.

use hashbrown::HashMap;
use log::warn;
use nom::branch::alt;
use nom::bytes::complete::{is_not, tag, tag_no_case, take_until, take_while1};
use nom::character::complete::{anychar, char, multispace1, not_line_ending, one_of};
use nom::combinator::{cut, eof, fail, map, opt, peek, recognize, value};
use nom::error::{context, VerboseError, VerboseErrorKind};
use nom::multi::{fold_many0, fold_many1, many0, many0_count, many1};
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::{IResult, Parser};

use crate::error::AutomatonError;
use crate::fa::nfa::NFA;
use crate::fa::state::State;
use crate::input_symbol::{is_epsilon_literal, InputSymbol};

/// Attribute values that mark start and accepting nodes and carry edge terminals.
///
/// The default is the convention of drawing the start node red, accepting
/// nodes as double circles and writing the terminal as the edge label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotConvention {
    pub start_color: String,
    pub accept_shape: String,
    pub label_key: String,
}

impl Default for DotConvention {
    fn default() -> Self {
        DotConvention {
            start_color: "red".to_string(),
            accept_shape: "doublecircle".to_string(),
            label_key: "label".to_string(),
        }
    }
}

type Attributes = HashMap<String, String>;

type PResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Statement {
    NodeDefaults(Attributes),
    EdgeDefaults(Attributes),
    GraphAttributes,
    Node(String, Attributes),
    Edges(Vec<String>, Attributes),
}

fn comment<'a>(input: &'a str) -> PResult<'a, ()> {
    alt((
        value((), pair(alt((tag("//"), tag("#"))), not_line_ending)),
        value((), tuple((tag("/*"), take_until("*/"), tag("*/")))),
    ))(input)
}

/// Skips whitespace and comments
fn ws<'a>(input: &'a str) -> PResult<'a, ()> {
    value((), many0_count(alt((value((), multispace1), comment))))(input)
}

fn token<'a, O, P>(parser: P) -> impl FnMut(&'a str) -> PResult<'a, O>
where
    P: Parser<&'a str, O, VerboseError<&'a str>>,
{
    preceded(ws, parser)
}

fn is_id_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Alphanumeric ids and numerals such as `-1.5`
fn plain_id<'a>(input: &'a str) -> PResult<'a, &'a str> {
    recognize(pair(opt(char('-')), take_while1(is_id_char)))(input)
}

/// A double quoted string; `\"` is a quote and a backslash before a line break continues the line.
fn quoted<'a>(input: &'a str) -> PResult<'a, String> {
    let (rest, content) = preceded(
        char('"'),
        fold_many0(
            alt((
                map(is_not("\\\""), String::from),
                preceded(
                    char('\\'),
                    map(anychar, |c| match c {
                        '"' => "\"".to_string(),
                        '\n' => String::new(),
                        c => format!("\\{}", c),
                    }),
                ),
            )),
            String::new,
            |mut acc: String, chunk: String| {
                acc.push_str(&chunk);
                acc
            },
        ),
    )(input)?;
    match char::<_, VerboseError<&str>>('"')(rest) {
        Ok((rest, _)) => Ok((rest, content)),
        // reported at the opening quote
        Err(_) => context("unterminated string", cut(fail))(input),
    }
}

fn id<'a>(input: &'a str) -> PResult<'a, String> {
    token(alt((quoted, map(plain_id, String::from))))(input)
}

fn attribute_value<'a>(input: &'a str) -> PResult<'a, String> {
    cut(alt((
        id,
        preceded(
            peek(token(char('<'))),
            context("HTML strings are not supported", cut(fail)),
        ),
    )))(input)
}

/// `[k=v, k=v; ...]`
fn attribute_list<'a>(input: &'a str) -> PResult<'a, Vec<(String, String)>> {
    delimited(
        token(char('[')),
        many0(terminated(
            pair(id, preceded(context("expected '='", cut(token(char('=')))), attribute_value)),
            opt(token(one_of(",;"))),
        )),
        context("expected ']'", cut(token(char(']')))),
    )(input)
}

/// One or more attribute lists, later keys win
fn attributes<'a>(input: &'a str) -> PResult<'a, Attributes> {
    fold_many1(
        attribute_list,
        Attributes::new,
        |mut acc: Attributes, list: Vec<(String, String)>| {
            acc.extend(list);
            acc
        },
    )(input)
}

fn defaults<'a>(input: &'a str) -> PResult<'a, Statement> {
    alt((
        map(preceded(tag_no_case("node"), attributes), Statement::NodeDefaults),
        map(preceded(tag_no_case("edge"), attributes), Statement::EdgeDefaults),
        map(preceded(tag_no_case("graph"), attributes), |_| {
            Statement::GraphAttributes
        }),
    ))(input)
}

/// Node, edge and `key=value` statements, all starting with an id
fn id_statement<'a>(input: &'a str) -> PResult<'a, Statement> {
    let (input, first) = id(input)?;
    let result = alt((
        map(preceded(token(char('=')), cut(id)), |_| {
            Statement::GraphAttributes
        }),
        map(
            pair(
                many1(preceded(token(tag("->")), context("expected a node id", cut(id)))),
                opt(attributes),
            ),
            |(rest, attributes)| {
                let mut chain = vec![first.clone()];
                chain.extend(rest);
                Statement::Edges(chain, attributes.unwrap_or_default())
            },
        ),
        preceded(
            peek(token(tag("--"))),
            context("undirected edges are not supported", cut(fail)),
        ),
        map(opt(attributes), |attributes| {
            Statement::Node(first.clone(), attributes.unwrap_or_default())
        }),
    ))(input);
    result
}

/// A statement together with the length of the input left at its start
fn statement<'a>(input: &'a str) -> PResult<'a, (usize, Statement)> {
    let (input, _) = ws(input)?;
    let remaining = input.len();
    let (input, statement) = alt((
        preceded(
            peek(alt((tag_no_case("subgraph"), tag("{")))),
            context("subgraphs are not supported", cut(fail)),
        ),
        defaults,
        id_statement,
    ))(input)?;
    Ok((input, (remaining, statement)))
}

fn graph<'a>(input: &'a str) -> PResult<'a, Vec<(usize, Statement)>> {
    let (input, _) = opt(token(tag_no_case("strict")))(input)?;
    let (input, _) = context(
        "expected 'digraph'",
        alt((
            token(tag_no_case("digraph")),
            preceded(
                peek(token(tag_no_case("graph"))),
                context("undirected graphs are not supported", cut(fail)),
            ),
        )),
    )(input)?;
    let (input, _) = opt(id)(input)?;
    let (input, _) = context("expected '{'", cut(token(char('{'))))(input)?;
    let (input, statements) = many0(alt((
        map(statement, Some),
        value(None, token(char(';'))),
    )))(input)?;
    let (input, _) = context("expected a statement or '}'", cut(token(char('}'))))(input)?;
    let (input, _) = many0_count(token(char(';')))(input)?;
    let (input, _) = context("unexpected input after the graph", cut(token(eof)))(input)?;
    Ok((input, statements.into_iter().flatten().collect()))
}

fn line_at(text: &str, remaining: usize) -> usize {
    let offset = text.len().saturating_sub(remaining);
    text[..offset].matches('\n').count() + 1
}

fn syntax_error(text: &str, error: VerboseError<&str>) -> AutomatonError {
    let line = error
        .errors
        .first()
        .map_or(1, |(rest, _)| line_at(text, rest.len()));
    let message = error
        .errors
        .iter()
        .find_map(|(_, kind)| match kind {
            VerboseErrorKind::Context(message) => Some(message.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| "unexpected input".to_string());
    AutomatonError::Syntax { line, message }
}

/// Nodes in order of first appearance and edges in order of appearance.
#[derive(Debug, Default)]
struct DotGraph {
    nodes: Vec<(String, Attributes)>,
    node_index: HashMap<String, usize>,
    edges: Vec<(String, String, Attributes, usize)>,
}

impl DotGraph {
    fn touch_node(&mut self, id: &str, defaults: &Attributes) -> usize {
        if let Some(&index) = self.node_index.get(id) {
            return index;
        }
        let index = self.nodes.len();
        self.nodes.push((id.to_string(), defaults.clone()));
        self.node_index.insert(id.to_string(), index);
        index
    }

    /// Applies the statements in order; defaults affect later statements only.
    fn from_statements(text: &str, statements: Vec<(usize, Statement)>) -> Self {
        let mut graph = DotGraph::default();
        let mut node_defaults = Attributes::new();
        let mut edge_defaults = Attributes::new();
        for (remaining, statement) in statements {
            match statement {
                Statement::NodeDefaults(attributes) => node_defaults.extend(attributes),
                Statement::EdgeDefaults(attributes) => edge_defaults.extend(attributes),
                Statement::GraphAttributes => {}
                Statement::Node(id, attributes) => {
                    let index = graph.touch_node(&id, &node_defaults);
                    graph.nodes[index].1.extend(attributes);
                }
                Statement::Edges(chain, attributes) => {
                    let mut edge_attributes = edge_defaults.clone();
                    edge_attributes.extend(attributes);
                    for node in &chain {
                        graph.touch_node(node, &node_defaults);
                    }
                    let line = line_at(text, remaining);
                    for pair in chain.windows(2) {
                        graph.edges.push((
                            pair[0].clone(),
                            pair[1].clone(),
                            edge_attributes.clone(),
                            line,
                        ));
                    }
                }
            }
        }
        graph
    }
}

impl NFA {
    /// Reads an automaton from a Graphviz `digraph`.
    ///
    /// Every node becomes a state (named by its id), nodes whose `color` is
    /// `convention.start_color` are start states, nodes whose `shape` is
    /// `convention.accept_shape` are accept states, and every edge is a
    /// transition on the terminal in its `convention.label_key` attribute.
    pub fn from_dot(text: &str, convention: &DotConvention) -> Result<NFA, AutomatonError> {
        let statements = match graph(text) {
            Ok((_, statements)) => statements,
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                return Err(syntax_error(text, e))
            }
            Err(nom::Err::Incomplete(_)) => {
                return Err(AutomatonError::Syntax {
                    line: line_at(text, 0),
                    message: "unexpected end of input".to_string(),
                })
            }
        };
        let graph = DotGraph::from_statements(text, statements);

        let mut nfa = NFA::empty();
        for (id, attributes) in &graph.nodes {
            let state = State::new(id);
            nfa.add_state(state.clone());
            if attributes.get("color") == Some(&convention.start_color) {
                nfa.add_start_state(state.clone());
            }
            if attributes.get("shape") == Some(&convention.accept_shape) {
                nfa.add_accept_state(state);
            }
        }
        for (from, to, attributes, line) in &graph.edges {
            let Some(label) = attributes.get(&convention.label_key) else {
                return Err(AutomatonError::MissingEdgeLabel {
                    from: from.clone(),
                    to: to.clone(),
                    key: convention.label_key.clone(),
                });
            };
            if is_epsilon_literal(label) {
                warn!(
                    "line {}: edge {} -> {} is labelled \"{}\", it is read as an ordinary terminal",
                    line, from, to, label
                );
            }
            nfa.add_transition(&State::new(from), &InputSymbol::new(label), &State::new(to));
        }
        Ok(nfa)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attributes_of(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_id_legal_input() {
        let legal_inputs = vec![
            ("q0 rest", " rest", "q0"),
            ("  // comment\n  q_1.5;", ";", "q_1.5"),
            ("-1.5]", "]", "-1.5"),
            ("\"q 0\"->", "->", "q 0"),
            ("\"(\"]", "]", "("),
            ("\"a\\\"b\"", "", "a\"b"),
            ("\"a\\\nb\"", "", "ab"),
            ("\"a\\lb\"", "", "a\\lb"),
            ("\"\" x", " x", ""),
        ];

        for (legal_input, control_rest, control_parsed) in legal_inputs {
            assert_eq!(
                id(legal_input).unwrap(),
                (control_rest, control_parsed.to_string())
            );
        }
    }

    #[test]
    fn test_parse_id_illegal_input() {
        let illegal_inputs = vec!["->", "[", "", "<b>", "\"open"];

        for illegal_input in illegal_inputs {
            assert!(
                id(illegal_input).is_err(),
                "Was able to parse the illegal input '{}'",
                illegal_input
            );
        }
    }

    #[test]
    fn test_parse_statement_legal_input() {
        let legal_inputs = vec![
            ("rankdir=LR;", Statement::GraphAttributes),
            ("graph [rankdir=LR]", Statement::GraphAttributes),
            (
                "node [shape = doublecircle]",
                Statement::NodeDefaults(attributes_of(&[("shape", "doublecircle")])),
            ),
            (
                "q0 [color=red, shape=circle][color=blue]",
                Statement::Node(
                    "q0".to_string(),
                    attributes_of(&[("color", "blue"), ("shape", "circle")]),
                ),
            ),
            (
                "a -> b -> \"c d\" [label=\"(\"; weight=2]",
                Statement::Edges(
                    vec!["a".to_string(), "b".to_string(), "c d".to_string()],
                    attributes_of(&[("label", "("), ("weight", "2")]),
                ),
            ),
            ("nodes", Statement::Node("nodes".to_string(), Attributes::new())),
        ];

        for (legal_input, control_parsed) in legal_inputs {
            let (_, (remaining, parsed)) = statement(legal_input).unwrap();
            assert_eq!(remaining, legal_input.len());
            assert_eq!(parsed, control_parsed);
        }
    }

    #[test]
    fn test_syntax_errors_name_the_line() {
        let illegal_inputs = vec![
            ("digraph {\n a -> b\n a : b\n}", 3, "expected a statement or '}'"),
            ("graph { a -- b }", 1, "undirected graphs are not supported"),
            ("digraph {\n a -- b\n}", 2, "undirected edges are not supported"),
            ("digraph {\n subgraph s { a }\n}", 2, "subgraphs are not supported"),
            ("digraph { a -> b [label=<x>] }", 1, "HTML strings are not supported"),
            ("digraph {\n a [label=\"x]\n}", 2, "unterminated string"),
            ("digraph { a [label x] }", 1, "expected '='"),
            ("digraph { a -> }", 1, "expected a node id"),
            ("digraph { a }\n b", 2, "unexpected input after the graph"),
            ("tree { a }", 1, "expected 'digraph'"),
        ];

        for (illegal_input, line, message) in illegal_inputs {
            assert_eq!(
                NFA::from_dot(illegal_input, &DotConvention::default()).unwrap_err(),
                AutomatonError::Syntax {
                    line,
                    message: message.to_string()
                },
                "for input {:?}",
                illegal_input
            );
        }
    }

    #[test]
    fn node_defaults_apply_to_later_nodes() {
        let text = r#"
            digraph fsm {
                rankdir=LR;
                node [shape = doublecircle]; q2;
                node [shape = circle];
                q0 [color=red];
                q0 -> q1 -> q2 [label=a];
            }
        "#;
        let nfa = NFA::from_dot(text, &DotConvention::default()).unwrap();
        assert_eq!(nfa.states.len(), 3);
        assert_eq!(nfa.get_state(nfa.start_state().unwrap()).name, "q0");
        let accepting: Vec<&str> = nfa
            .accept_state_indices()
            .unwrap()
            .into_iter()
            .map(|s| nfa.get_state(s).get_name())
            .collect();
        assert_eq!(accepting, vec!["q2"]);
        assert_eq!(nfa.get_transitions().len(), 2);
    }

    #[test]
    fn edge_lines_are_tracked() {
        let text = "digraph {\n\n  a -> b [label=x]\n}";
        let (_, statements) = graph(text).unwrap();
        let dot_graph = DotGraph::from_statements(text, statements);
        assert_eq!(dot_graph.edges[0].3, 3);
    }
}
