/// Feature Catalog: prints the feature registry and checks name lookups.
///
/// Usage: feature_catalog [--ron] [--config <file>] [--lookup <name>]...

use nlg_features::core::config::RealiserConfig;
use nlg_features::core::registry::FeatureRegistry;
use nlg_features::schema::feature::{FeatureDef, Stage};
use std::path::Path;
use std::process;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut as_ron = false;
    let mut config_path = None;
    let mut lookups = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!("Usage: feature_catalog [--ron] [--config <file>] [--lookup <name>]...");
                process::exit(0);
            }
            "--ron" => as_ron = true,
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            "--lookup" if i + 1 < args.len() => {
                i += 1;
                lookups.push(args[i].clone());
            }
            other => {
                eprintln!("ERROR: Unexpected argument '{}'", other);
                process::exit(2);
            }
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => match RealiserConfig::load_from_ron(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("ERROR: Failed to load config '{}': {}", path, e);
                process::exit(1);
            }
        },
        None => RealiserConfig::default(),
    };

    let registry = match config.registry() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("ERROR: Failed to build registry: {}", e);
            process::exit(1);
        }
    };

    if !lookups.is_empty() {
        let mut failed = false;
        for name in &lookups {
            match registry.lookup(name) {
                Ok(key) => print_def(registry.metadata_of(key)),
                Err(e) => {
                    eprintln!("ERROR: {}", e);
                    failed = true;
                }
            }
        }
        process::exit(if failed { 1 } else { 0 });
    }

    if as_ron {
        print_ron(&registry);
    } else {
        let stages: Vec<&str> = Stage::ALL.iter().map(|s| s.name()).collect();
        println!("stages: {}", stages.join(" -> "));
        println!("{} features", registry.len());
        for key in registry.enumerate_all() {
            print_def(registry.metadata_of(key));
        }
    }
}

fn print_def(def: &FeatureDef) {
    let owners: Vec<&str> = def.applies_to.iter().map(|k| k.name()).collect();
    let consumers: Vec<&str> = def.consumers.iter().map(|s| s.name()).collect();
    println!(
        "  {:<20} {:<24} {} -> {}  [{}]",
        def.name,
        def.shape.to_string(),
        def.producer,
        consumers.join(", "),
        owners.join(", ")
    );
}

fn print_ron(registry: &FeatureRegistry) {
    let defs: Vec<&FeatureDef> = registry
        .enumerate_all()
        .map(|key| registry.metadata_of(key))
        .collect();
    let pretty = ron::ser::PrettyConfig::default();
    match ron::ser::to_string_pretty(&defs, pretty) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("ERROR: Failed to serialize catalogue: {}", e);
            process::exit(1);
        }
    }
}
