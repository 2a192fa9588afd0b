//! Vela front-end CLI.
//!
//! `velac parse <path>` runs the parser and reports diagnostics;
//! `velac dump <path>` also prints the program tree outline.

mod dump;

use std::io::IsTerminal;

use vela_diagnostic::{emitter::TerminalEmitter, DiagnosticQueue};
use vela_ir::SharedInterner;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "parse" => run(&args[2..], false),
        "dump" => run(&args[2..], true),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("unknown command `{other}`");
            print_usage();
            std::process::exit(2);
        }
    }
}

fn run(args: &[String], dump_tree: bool) {
    let mut path: Option<&str> = None;
    let mut stdlib = String::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--stdlib" {
            match iter.next() {
                Some(dir) => stdlib = dir.clone(),
                None => {
                    eprintln!("--stdlib needs a directory");
                    std::process::exit(2);
                }
            }
        } else if let Some(dir) = arg.strip_prefix("--stdlib=") {
            stdlib = dir.to_string();
        } else if path.is_none() {
            path = Some(arg);
        } else {
            eprintln!("unexpected argument `{arg}`");
            std::process::exit(2);
        }
    }

    let Some(path) = path else {
        eprintln!("usage: velac parse <path> [--stdlib <dir>]");
        std::process::exit(2);
    };

    let interner = SharedInterner::new();
    let mut queue = DiagnosticQueue::new();
    let result = vela_parse::parse(path, &stdlib, &interner, &mut queue);

    let stderr = std::io::stderr();
    let colors = stderr.is_terminal();
    let mut emitter = TerminalEmitter::new(stderr.lock()).with_colors(colors);
    if let Err(err) = emitter.emit_all(queue.iter(), &result.sources) {
        eprintln!("failed to render diagnostics: {err}");
    }

    if dump_tree {
        let mut stdout = std::io::stdout().lock();
        if let Err(err) = dump::dump(&mut stdout, &result, &interner) {
            eprintln!("failed to dump tree: {err}");
        }
    }

    println!(
        "{}: {} module{}, {} file{}, {} error{}",
        if result.ok { "ok" } else { "failed" },
        result.imports.len(),
        plural(result.imports.len()),
        result.sources.len(),
        plural(result.sources.len()),
        queue.error_count(),
        plural(queue.error_count()),
    );

    if !result.ok {
        std::process::exit(1);
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

fn print_usage() {
    println!("Vela front end");
    println!();
    println!("usage:");
    println!("  velac parse <path> [--stdlib <dir>]   parse a module or file");
    println!("  velac dump  <path> [--stdlib <dir>]   parse and print the tree");
    println!("  velac help                            show this message");
}
