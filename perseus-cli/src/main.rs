//! Command-line interface for perseus exercises.
//!
//! Usage:
//!   perseus <path> [--output <what>]              - Inspect an exercise file
//!   perseus <path> --input "input-number 1=5/6"   - Answer widgets, then inspect
//!
//! The path points at an exercise JSON file: either a bare question object
//! (`{"content": ..., "widgets": ..., "images": ...}`) or a full item with
//! a `question` key.

use std::fs;
use std::process::exit;

use clap::{Arg, ArgAction, Command};

use perseus_core::types::FocusPath;
use perseus_core::{Renderer, RendererOptions};
use perseus_widgets::builtin_registry;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("perseus")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for rendering and grading perseus exercise files")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the exercise JSON file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("What to print: elements, widgets, score, state or examples")
                .default_value("elements"),
        )
        .arg(
            Arg::new("input")
                .long("input")
                .short('i')
                .help("Answer a widget before inspecting, as '<widget id>=<value>' (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("state")
                .long("state")
                .help("Path to a serialized state JSON file to restore first"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Path to a perseus.toml overriding the built-in defaults"),
        )
        .get_matches();

    let config = load_config(matches.get_one::<String>("config"));
    let path = matches
        .get_one::<String>("path")
        .expect("path is required");
    let options = load_exercise(path, &config);

    let mut renderer = Renderer::new(options, builtin_registry(), None, Default::default());

    if let Some(state_path) = matches.get_one::<String>("state") {
        restore_state(&mut renderer, state_path);
    }
    if let Some(inputs) = matches.get_many::<String>("input") {
        for input in inputs {
            apply_input(&mut renderer, input);
        }
    }
    renderer.flush_deferred();

    let output = matches.get_one::<String>("output").unwrap();
    print_output(&mut renderer, output, config.cli.pretty_json);
}

fn load_config(path: Option<&String>) -> perseus_config::PerseusConfig {
    let loader = match path {
        Some(path) => perseus_config::Loader::new().with_file(path),
        None => perseus_config::Loader::new(),
    };
    loader.build().unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        exit(1);
    })
}

fn load_exercise(path: &str, config: &perseus_config::PerseusConfig) -> RendererOptions {
    let raw = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Cannot read {}: {}", path, e);
        exit(1);
    });
    let mut value: serde_json::Value = serde_json::from_str(&raw).unwrap_or_else(|e| {
        eprintln!("Invalid JSON in {}: {}", path, e);
        exit(1);
    });
    // Full items wrap the question object.
    if let Some(question) = value.get_mut("question") {
        value = question.take();
    }
    let mut options: RendererOptions = serde_json::from_value(value).unwrap_or_else(|e| {
        eprintln!("Not a perseus exercise: {}", e);
        exit(1);
    });
    options.always_update = config.renderer.always_update;
    options.linter_context.highlight_lint = config.renderer.highlight_lint;
    options.api_options = config.api.to_api_options();
    options
}

fn restore_state(renderer: &mut Renderer, path: &str) {
    let raw = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Cannot read {}: {}", path, e);
        exit(1);
    });
    let state = serde_json::from_str(&raw).unwrap_or_else(|e| {
        eprintln!("Invalid serialized state in {}: {}", path, e);
        exit(1);
    });
    if !renderer.restore_serialized_state(&state, || {}) {
        eprintln!("Serialized state does not match this exercise's widgets");
        exit(1);
    }
    renderer.flush_deferred();
}

fn apply_input(renderer: &mut Renderer, spec: &str) {
    let Some((id, value)) = spec.split_once('=') else {
        eprintln!("Invalid --input '{}': expected '<widget id>=<value>'", spec);
        exit(1);
    };
    if !renderer.widget_ids().iter().any(|w| w == id) {
        eprintln!("No widget '{}' in this exercise", id);
        eprintln!("\nAvailable widgets:");
        for id in renderer.widget_ids() {
            eprintln!("  {}", id);
        }
        exit(1);
    }
    renderer.set_input_value(&FocusPath::for_widget(id), value, None);
}

fn print_output(renderer: &mut Renderer, output: &str, pretty: bool) {
    let value = match output {
        "elements" => {
            let rendered = renderer.render();
            serde_json::to_value(&*rendered).unwrap_or_else(|e| {
                eprintln!("Error serializing elements: {}", e);
                exit(1);
            })
        }
        "widgets" => {
            renderer.render();
            serde_json::Value::Array(
                renderer
                    .widget_ids()
                    .iter()
                    .map(|id| serde_json::Value::String(id.clone()))
                    .collect(),
            )
        }
        "score" => {
            renderer.render();
            let (guess, score) = renderer.guess_and_score();
            serde_json::json!({
                "guess": guess,
                "score": score,
                "emptyWidgets": renderer.empty_widgets(),
            })
        }
        "state" => {
            renderer.render();
            serde_json::Value::Object(renderer.serialized_state())
        }
        "examples" => {
            renderer.render();
            serde_json::json!(renderer.examples())
        }
        other => {
            eprintln!("Unknown output '{}'", other);
            eprintln!("Available outputs: elements, widgets, score, state, examples");
            exit(1);
        }
    };

    let formatted = if pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    };
    match formatted {
        Ok(s) => println!("{}", s),
        Err(e) => {
            eprintln!("Error formatting output: {}", e);
            exit(1);
        }
    }
}
