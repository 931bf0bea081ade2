//! `sq`: run Squiggle programs from the command line.

use std::io::IsTerminal;

use sq_value::Environment;
use sqc::{init_tracing, render_error, Project, RelativePathResolver, SqError, MAIN_SOURCE_ID};

struct RunOptions {
    sample_count: Option<usize>,
    show_bindings: bool,
    profile: bool,
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = args[1].as_str();
    match command {
        "run" => {
            if args.len() < 3 {
                eprintln!("Usage: sq run <file> [--sample-count N] [--bindings] [--profile]");
                std::process::exit(1);
            }
            let options = parse_run_options(&args[3..]);
            run_file(&args[2], &options);
        }
        "eval" => {
            if args.len() < 3 {
                eprintln!("Usage: sq eval <code>");
                eprintln!("Example: sq eval \"2 + 3 * 4\"");
                std::process::exit(1);
            }
            eval_code(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("sq {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn parse_run_options(args: &[String]) -> RunOptions {
    let mut options = RunOptions {
        sample_count: None,
        show_bindings: false,
        profile: false,
    };
    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--bindings" => options.show_bindings = true,
            "--profile" => options.profile = true,
            "--sample-count" => {
                let Some(count) = args.next().and_then(|n| n.parse().ok()) else {
                    eprintln!("--sample-count expects a positive number");
                    std::process::exit(1);
                };
                options.sample_count = Some(count);
            }
            other => {
                eprintln!("Unknown option: {other}");
                std::process::exit(1);
            }
        }
    }
    options
}

fn run_file(path: &str, options: &RunOptions) {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error reading '{path}': {error}");
            std::process::exit(1);
        }
    };

    let mut project = Project::with_resolver(RelativePathResolver);
    if let Some(sample_count) = options.sample_count {
        project.set_environment(Environment::default().with_sample_count(sample_count));
    }
    project.set_source(path, source);

    let loaded = project.run_with_imports(path, |id| {
        std::fs::read_to_string(id).map_err(|error| SqError::other(format!("Error reading '{id}': {error}")))
    });
    if let Err(error) = loaded {
        report_and_exit(&error, &project);
    }

    let outcome = project.get_result(path);
    if options.profile {
        eprintln!("{}", project.counters().report());
        eprintln!("  Modules evaluated:     {}", project.evaluation_count());
    }
    match outcome {
        Ok(value) => {
            if options.show_bindings {
                println!("{}", project.get_bindings(path));
            }
            println!("{value}");
        }
        Err(error) => report_and_exit(&error, &project),
    }
}

fn eval_code(code: &str) {
    let mut project = Project::new();
    project.set_source(MAIN_SOURCE_ID, code);
    project.run_all();
    match project.get_result(MAIN_SOURCE_ID) {
        Ok(value) => println!("{value}"),
        Err(error) => report_and_exit(&error, &project),
    }
}

fn report_and_exit(error: &SqError, project: &Project) -> ! {
    let color = std::io::stderr().is_terminal();
    eprint!("{}", render_error(error, project, color));
    std::process::exit(1);
}

fn print_usage() {
    println!("sq: Squiggle evaluator");
    println!();
    println!("Usage: sq <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file>       Evaluate a file and the files it imports");
    println!("  eval <code>      Evaluate a snippet");
    println!("  help             Show this help message");
    println!("  version          Show version information");
    println!();
    println!("Run options:");
    println!("  --sample-count N Samples drawn when building sample sets");
    println!("  --bindings       Print the top-level bindings before the result");
    println!("  --profile        Print evaluation counters to stderr");
    println!();
    println!("Environment:");
    println!("  RUST_LOG         Enable logging, e.g. RUST_LOG=sqc=debug");
    println!("  SQ_LOG_TREE      With RUST_LOG, log as an indented span tree");
}
