//! Command-line interface for treevis
//! Loads a grammar document and prints or interactively explores its derivation tree.
//!
//! Usage:
//!   treevis show `<path>` [--format `<format>`] [--language `<lang>`] [--category `<cat>`]
//!   treevis alternatives `<path>` `<category>` [--language `<lang>`]
//!   treevis languages `<path>`
//!   treevis view `<path>` [--language `<lang>`]
//!   treevis list-formats
//!
//! Every subcommand accepts `--config <file>` (layered over the built-in
//! defaults) and `--verbose`.
mod viewer;

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::debug;
use std::error::Error;
use std::path::Path;
use treevis::formats::FormatRegistry;
use treevis::settings::{Loader, TreevisConfig};
use treevis::{Grammar, Session};

fn path_arg() -> Arg {
    Arg::new("path")
        .help("Path to the grammar JSON file")
        .required(true)
        .index(1)
}

fn language_arg() -> Arg {
    Arg::new("language")
        .long("language")
        .short('l')
        .help("Concrete grammar id or language tag (default: abstract function names)")
}

fn cli() -> Command {
    Command::new("treevis")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Explore derivation trees of abstract and concrete grammars")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log debug output to stderr"),
        )
        .subcommand(
            Command::new("show")
                .about("Print the initial derivation tree")
                .arg(path_arg())
                .arg(language_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (see list-formats)"),
                )
                .arg(
                    Arg::new("start_category")
                        .long("category")
                        .help("Root the tree at this category instead of the start category"),
                ),
        )
        .subcommand(
            Command::new("alternatives")
                .about("List the functions that can realize a category")
                .arg(path_arg())
                .arg(
                    Arg::new("category")
                        .help("Category name")
                        .required(true)
                        .index(2),
                )
                .arg(language_arg()),
        )
        .subcommand(
            Command::new("languages")
                .about("List the concrete grammars of a document")
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("view")
                .about("Open an interactive TUI viewer")
                .arg(path_arg())
                .arg(language_arg()),
        )
        .subcommand(Command::new("list-formats").about("List available output formats"))
}

fn main() {
    let matches = cli().get_matches();

    init_logging(matches.get_flag("verbose"));

    let result = match matches.subcommand() {
        Some(("show", sub)) => handle_show_command(sub),
        Some(("alternatives", sub)) => handle_alternatives_command(sub),
        Some(("languages", sub)) => handle_languages_command(sub),
        Some(("view", sub)) => handle_view_command(sub),
        Some(("list-formats", _)) => {
            handle_list_formats_command();
            Ok(())
        }
        _ => unreachable!(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// Defaults, then `./treevis.toml` if present, then `--config`, then per-command flags
fn load_settings(matches: &ArgMatches) -> Result<TreevisConfig, Box<dyn Error>> {
    let mut loader = Loader::new().with_optional_file("treevis.toml");
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    for (flag, key) in [
        ("language", "display.language"),
        ("format", "output.format"),
        ("start_category", "display.start_category"),
    ] {
        if let Ok(Some(value)) = matches.try_get_one::<String>(flag) {
            loader = loader.set_override(key, value.as_str())?;
        }
    }
    Ok(loader.build()?)
}

fn open_session(path: &str, config: &TreevisConfig) -> Result<Session, Box<dyn Error>> {
    let grammar = Grammar::from_file(path)?;
    let start = config
        .display
        .start_category()
        .unwrap_or(grammar.start_category())
        .to_string();
    let mut session = Session::with_start_category(grammar, &start);
    session.set_linearization_separator(config.display.linearization_separator.as_str());
    session.set_language(config.display.language())?;
    for diagnostic in session.diagnostics() {
        debug!("{}", diagnostic);
    }
    Ok(session)
}

fn handle_show_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let config = load_settings(matches)?;
    let path = required(matches, "path");
    let session = open_session(path, &config)?;

    let output = FormatRegistry::with_defaults()
        .serialize(&session.snapshot(), &config.output.format)?;
    print!("{}", output);
    Ok(())
}

fn handle_alternatives_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let config = load_settings(matches)?;
    let path = required(matches, "path");
    let category = required(matches, "category");

    let grammar = Grammar::from_file(path)?;
    let names = match config.display.language() {
        None => grammar.functions_for_category(category),
        Some(language) => grammar
            .concrete(language)
            .or_else(|| grammar.concrete_by_language(language))
            .ok_or_else(|| treevis::SelectError::NoConcreteGrammar(language.to_string()))?
            .functions_for_category(category),
    };
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

fn handle_languages_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let grammar = Grammar::from_file(required(matches, "path"))?;
    if grammar.concretes().is_empty() {
        println!("(abstract only)");
    }
    for concrete in grammar.concretes() {
        println!("{}\t{}", concrete.id, concrete.language_tag);
    }
    Ok(())
}

fn handle_view_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let config = load_settings(matches)?;
    let path = required(matches, "path");
    let session = open_session(path, &config)?;

    let file_name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();
    let options = viewer::app::ViewOptions {
        tree_width: config.viewer.tree_width,
        show_icons: config.viewer.show_icons,
    };
    viewer::viewer_main::run_viewer(session, options, &file_name)?;
    Ok(())
}

fn handle_list_formats_command() {
    let registry = FormatRegistry::with_defaults();
    println!("Available output formats:\n");
    for name in registry.list_formats() {
        let description = registry.get(&name).map(|f| f.description()).unwrap_or("");
        println!("  {:<10} {}", name, description);
    }
}

/// Value of an argument clap already enforces as required
fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_for(args: &[&str]) -> TreevisConfig {
        let matches = cli().try_get_matches_from(args).unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        load_settings(sub).unwrap()
    }

    #[test]
    fn test_show_category_flag_sets_start_category() {
        let config = settings_for(&["treevis", "show", "g.json", "--category", "Item"]);
        assert_eq!(config.display.start_category(), Some("Item"));
    }

    #[test]
    fn test_alternatives_category_is_not_a_start_category() {
        let config = settings_for(&["treevis", "alternatives", "g.json", "Item", "-l", "en-US"]);
        assert_eq!(config.display.start_category(), None);
        assert_eq!(config.display.language(), Some("en-US"));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        cli().debug_assert();
    }
}
