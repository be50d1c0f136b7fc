//! Project Athena CLI
//!
//! Evaluates Bezier and B-spline curve requests and plots them.
//!
//! # Usage
//!
//! ```bash
//! # Plot a request as a standalone Plotly page (defaults to request.html)
//! athena request.json [output.html]
//!
//! # Print or save the sampled points as JSON
//! athena --json request.json [output.json]
//!
//! # Show the knot vector generated for 6 control points of degree 3
//! athena --knots 6 3 uniform_open
//! ```

mod commands;

use athena_curve::KnotType;
use std::path::{Path, PathBuf};
use std::process;

fn print_usage() {
    eprintln!(
        r#"Project Athena curve CLI

USAGE:
    athena <request.json> [output.html]
    athena --json <request.json> [output.json]
    athena --knots <count> <degree> <uniform|uniform_open>

ARGS:
    <request.json>  Curve request, or an array of requests
    [output.html]   Optional output path (defaults to request.html)

OPTIONS:
    --json          Write the sampled curve as JSON (stdout when no output is given)
    --knots         Print the knot vector for a control point count and degree
    --help          Show this help message

REQUEST:
    {{"curve": "bspline", "points": [[0, 0], [1, 1], [2, 1], [3, 0]],
     "degree": 2, "knots": "uniform_open"}}

Set RUST_LOG=debug to trace knot vectors and sampling domains.
"#
    );
}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Error: Missing required argument <request.json>\n");
        print_usage();
        process::exit(1);
    }

    if args[1] == "--help" || args[1] == "-h" {
        print_usage();
        process::exit(0);
    }

    if args[1] == "--json" {
        if args.len() < 3 {
            eprintln!("Error: --json requires a request file\n");
            print_usage();
            process::exit(1);
        }
        handle_json(Path::new(&args[2]), args.get(3).map(Path::new));
        return;
    }

    if args[1] == "--knots" {
        if args.len() < 5 {
            eprintln!("Error: --knots requires <count> <degree> <knot type>\n");
            print_usage();
            process::exit(1);
        }
        handle_knots(&args[2], &args[3], &args[4]);
        return;
    }

    let input = Path::new(&args[1]);
    let output = if args.len() > 2 {
        PathBuf::from(&args[2])
    } else {
        input.with_extension("html")
    };
    handle_html(input, &output);
}

fn handle_html(input: &Path, output: &Path) {
    match commands::export_html(input, output) {
        Ok(paths) => {
            for path in &paths {
                eprintln!("Exported plot: {}", path.display());
            }
            eprintln!("Open the HTML file in a web browser to view the curve.");
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn handle_json(input: &Path, output: Option<&Path>) {
    let json = commands::export_json(input).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    match output {
        Some(path) => {
            std::fs::write(path, json).unwrap_or_else(|e| {
                eprintln!("Error writing {}: {}", path.display(), e);
                process::exit(1);
            });
            eprintln!("Exported samples: {}", path.display());
        }
        None => println!("{}", json),
    }
}

fn handle_knots(count: &str, degree: &str, knot_type: &str) {
    let parse_count = |name: &str, value: &str| {
        value.parse::<usize>().unwrap_or_else(|_| {
            eprintln!("Error: {} must be a non-negative integer, got '{}'", name, value);
            process::exit(1);
        })
    };
    let count = parse_count("count", count);
    let degree = parse_count("degree", degree);
    let knot_type: KnotType = knot_type.parse().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    match commands::knot_vector(count, degree, knot_type) {
        Ok(knots) => println!("{}", knots),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
