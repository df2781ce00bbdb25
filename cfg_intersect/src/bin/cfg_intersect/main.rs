mod logger;

use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::{arg, ArgMatches};
use log::error;

use cfg_intersect::error::{Error, Result};
use cfg_intersect::fa::dot::DotConvention;
use cfg_intersect::pipeline::{intersect_text, PipelineOptions};

fn command() -> clap::Command {
    clap::Command::new("cfg-intersect")
        .version(clap::crate_version!())
        .about(
            "Computes a context-free grammar for the intersection of a grammar's language \
            with the language of a finite automaton",
        )
        .arg(arg!(<automaton> "Automaton as a Graphviz digraph"))
        .arg(arg!(<grammar> "Grammar with one `A: x y` rule per line"))
        .arg(arg!([output] "File to write the intersection grammar to (standard output if omitted)"))
        .arg(
            arg!(--"start-color" <COLOR> "Node color marking the start state")
                .default_value("red"),
        )
        .arg(
            arg!(--"accept-shape" <SHAPE> "Node shape marking accepting states")
                .default_value("doublecircle"),
        )
        .arg(
            arg!(--"label-key" <KEY> "Edge attribute holding the terminal symbol")
                .default_value("label"),
        )
        .arg(arg!(--reduce "Drop productions that take part in no derivation"))
        .arg(arg!(-v --verbose ... "Log more (repeat for debug and trace output)"))
        .arg(arg!(-q --quiet "Only log errors").conflicts_with("verbose"))
}

fn read_file(path: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_string(),
        source,
    })
}

fn options(args: &ArgMatches) -> PipelineOptions {
    let value = |id: &str| args.get_one::<String>(id).cloned().unwrap_or_default();
    PipelineOptions {
        convention: DotConvention {
            start_color: value("start-color"),
            accept_shape: value("accept-shape"),
            label_key: value("label-key"),
        },
        reduce: args.get_flag("reduce"),
    }
}

fn run(args: &ArgMatches) -> Result<()> {
    let automaton_path = args.get_one::<String>("automaton").map_or("", String::as_str);
    let grammar_path = args.get_one::<String>("grammar").map_or("", String::as_str);

    let automaton_text = read_file(automaton_path)?;
    let grammar_text = read_file(grammar_path)?;
    let intersection = intersect_text(&automaton_text, &grammar_text, &options(args))?;
    // rendered completely before anything is written
    let text = intersection.to_text();

    match args.get_one::<String>("output") {
        Some(path) => fs::write(path, text).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        }),
        None => io::stdout()
            .lock()
            .write_all(text.as_bytes())
            .map_err(|source| Error::Io {
                path: "<stdout>".to_string(),
                source,
            }),
    }
}

fn main() -> ExitCode {
    let args = command().get_matches();
    logger::init(logger::level_filter(
        args.get_count("verbose"),
        args.get_flag("quiet"),
    ));

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
