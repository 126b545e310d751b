//! Blade Compose CLI
//!
//! Usage:
//!   blade-compose [OPTIONS] <DIR> [ENTRY]
//!
//! Compiles every template file under DIR. With an ENTRY name, prints its
//! composed text; without one, lists the compiled entry points.

use std::path::PathBuf;

use clap::Parser;

use blade_compose::{Engine, EngineConfig};

#[derive(Parser)]
#[command(name = "blade-compose")]
#[command(about = "Flatten Blade-style template directories into engine-ready block syntax")]
struct Cli {
    /// Template directory to compile
    dir: PathBuf,

    /// Entry point to print (e.g. "pages/home"); lists entries if omitted
    entry: Option<String>,

    /// Config file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match EngineConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    let mut engine = Engine::with_config(config);

    let parse_failures = match engine.load_dir(&cli.dir) {
        Ok(failures) => failures,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    for failure in &parse_failures {
        eprint!(
            "{}",
            failure
                .error
                .format(&failure.source, &failure.path.display().to_string())
        );
    }

    let compose_failures = engine.compose_all();
    for (name, err) in &compose_failures {
        eprintln!("Error composing '{}': {}", name, err);
    }

    match &cli.entry {
        Some(entry) => match engine.composed(entry) {
            Some(text) => println!("{}", text),
            None => {
                eprintln!("Error: entry point '{}' was not compiled", entry);
                std::process::exit(1);
            }
        },
        None => {
            for name in engine.entries() {
                println!("{}", name);
            }
        }
    }

    if !parse_failures.is_empty() || !compose_failures.is_empty() {
        std::process::exit(1);
    }
}
