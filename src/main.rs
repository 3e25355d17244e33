//! lsys - interactive front end
//!
//! Loads L-system definition files, derives symbol strings, renders them
//! through the turtle, and saves SVG images. Commands:
//!
//! ```text
//! load <file>              parse definitions (and colors) from a file
//! display                  list loaded systems, or print one in full
//! run <name|num> <n>       derive a system n iterations and render it
//! runthru <name> <a> <b>   derive at every depth in [a, b)
//! seed <n>                 reseed the generator (derivations reproduce)
//! size <n>                 set the turtle step length
//! save [path]              write the last rendering as SVG
//! dump                     unload every system
//! help                     print this list
//! quit / exit              leave
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use rand_chacha::ChaCha8Rng;

use lsys::core::config::{DEFAULT_SEED, DEFAULT_STEP_SIZE};
use lsys::core::error::{LsysError, Result};
use lsys::engine;
use lsys::grammar::Grammar;
use lsys::loader::{self, ColorTable};
use lsys::turtle::{svg, Segment, Turtle};

#[derive(Parser)]
#[command(name = "lsys", about = "L-system derivation and turtle rendering")]
struct Args {
    /// Definition file to load on startup
    file: Option<PathBuf>,

    /// Seed for the derivation generator
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

struct Session {
    systems: Vec<Grammar>,
    colors: ColorTable,
    rng: ChaCha8Rng,
    step: f64,
    /// Last rendering, kept for `save`.
    rendered: Option<(String, u32, Vec<Segment>)>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lsys=info".into()),
        )
        .init();

    let args = Args::parse();
    let mut session = Session {
        systems: Vec::new(),
        colors: ColorTable::new(),
        rng: engine::seeded_rng(args.seed),
        step: DEFAULT_STEP_SIZE,
        rendered: None,
    };

    println!("Welcome to lsys.");
    match args.file {
        Some(path) => load(&mut session, &path.to_string_lossy()),
        None => println!("No file loaded. Use 'load <file>' to parse definitions."),
    }

    let stdin = io::stdin();
    loop {
        print!("lsys> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = words.first() else {
            continue;
        };

        match (command, &words[1..]) {
            ("quit" | "exit" | "q", _) => break,
            ("help" | "h", _) => help(),
            ("load" | "l", [path]) => load(&mut session, path),
            ("load" | "l", _) => println!("Usage: load <file>"),
            ("display" | "d", []) => display_all(&session),
            ("display" | "d", [which]) => display_one(&session, which),
            ("run" | "r", [which, depth]) => run(&mut session, which, depth),
            ("run" | "r", _) => println!("Usage: run <name|num> <iterations>"),
            ("runthru" | "rt", [which, first, last]) => runthru(&mut session, which, first, last),
            ("runthru" | "rt", _) => println!("Usage: runthru <name|num> <first> <last>"),
            ("seed", [value]) => reseed(&mut session, value),
            ("seed", _) => println!("Usage: seed <integer>"),
            ("size" | "s", [value]) => resize(&mut session, value),
            ("size" | "s", _) => println!("Usage: size <number>"),
            ("save", rest) => save(&session, rest.first().copied()),
            ("dump", _) => {
                session.systems.clear();
                session.rendered = None;
                println!("Unloaded all systems.");
            }
            _ => println!("Unknown command: {command} (try 'help')"),
        }
    }
    Ok(())
}

fn help() {
    println!("  load <file>              parse definitions from a file");
    println!("  display [name|num]       list systems, or print one in full");
    println!("  run <name|num> <n>       derive n iterations and render");
    println!("  runthru <name> <a> <b>   derive at every depth in [a, b)");
    println!("  seed <n>                 reseed the derivation generator");
    println!("  size <n>                 set the turtle step length");
    println!("  save [path]              write the last rendering as SVG");
    println!("  dump                     unload every system");
    println!("  quit                     leave");
}

fn load(session: &mut Session, path: &str) {
    let path = PathBuf::from(path);
    match loader::load_systems(&path) {
        Ok(mut systems) => {
            println!("Loaded {} system(s) from {}.", systems.len(), path.display());
            session.systems.append(&mut systems);
        }
        Err(e) => {
            println!("Error: {e}");
            return;
        }
    }
    match loader::load_colors(&path) {
        Ok(colors) if !colors.is_empty() => {
            println!("Loaded {} color(s).", colors.len());
            session.colors.extend(colors);
        }
        Ok(_) => {}
        Err(e) => println!("Error: {e}"),
    }
}

fn display_all(session: &Session) {
    if session.systems.is_empty() {
        println!("No systems loaded.");
        return;
    }
    println!("Loaded systems:");
    for (i, system) in session.systems.iter().enumerate() {
        println!("{}. {}", i + 1, system.name());
    }
}

fn display_one(session: &Session, which: &str) {
    match find_system(&session.systems, which) {
        Some(system) => print!("{system}"),
        None => println!("No system named '{which}'."),
    }
}

fn run(session: &mut Session, which: &str, depth: &str) {
    let Ok(depth) = depth.parse::<u32>() else {
        println!("The iteration count must be a non-negative integer.");
        return;
    };
    let Some(system) = find_system(&session.systems, which) else {
        println!("Error: {}", LsysError::UnknownSystem(which.to_string()));
        return;
    };
    if !system.is_complete() {
        let err = LsysError::IncompleteGrammar(system.name().to_string());
        println!("Error: {err}");
        return;
    }

    match engine::derive(system, depth, &mut session.rng) {
        Ok(tokens) => {
            let segments = Turtle::interpret(&tokens, system.angle(), session.step, &session.colors);
            println!(
                "{} at depth {}: {} symbols, {} segments. Use 'save' to write the image.",
                system.name(),
                depth,
                tokens.chars().count(),
                segments.len()
            );
            session.rendered = Some((system.name().to_string(), depth, segments));
        }
        Err(e) => println!("Error: {e}"),
    }
}

fn runthru(session: &mut Session, which: &str, first: &str, last: &str) {
    let (Ok(first), Ok(last)) = (first.parse::<u32>(), last.parse::<u32>()) else {
        println!("Range bounds must be non-negative integers.");
        return;
    };
    for depth in first..last {
        run(session, which, &depth.to_string());
    }
}

fn reseed(session: &mut Session, value: &str) {
    match value.parse::<u64>() {
        Ok(seed) => {
            session.rng = engine::seeded_rng(seed);
            println!("Generator reseeded with {seed}.");
        }
        Err(_) => println!("The seed must be an integer."),
    }
}

fn resize(session: &mut Session, value: &str) {
    match value.parse::<f64>() {
        Ok(step) if step > 0.0 => {
            session.step = step;
            println!("Step size set to {step}.");
        }
        _ => println!("The size must be a positive number."),
    }
}

fn save(session: &Session, path: Option<&str>) {
    let Some((name, depth, segments)) = &session.rendered else {
        println!("Nothing rendered yet. Use 'run' first.");
        return;
    };
    let path = path
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("{name}_{depth}.svg")));
    match svg::write(&path, segments) {
        Ok(()) => println!("Saved {}.", path.display()),
        Err(e) => println!("Error: {e}"),
    }
}

/// Systems can be picked by 1-based list number or by name.
fn find_system<'a>(systems: &'a [Grammar], which: &str) -> Option<&'a Grammar> {
    if let Ok(index) = which.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| systems.get(i));
    }
    systems.iter().find(|system| system.name() == which)
}
