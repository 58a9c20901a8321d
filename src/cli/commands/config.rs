//! `cbench config` command - inspect the effective configuration

use clap::Subcommand;
use console::style;
use miette::Result;
use std::path::Path;

use crate::core::config::{LOCAL_CONFIG_FILE, VALID_KEYS};
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

/// Run a config subcommand
pub fn run(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs) -> Result<()> {
    let config = Config::load();

    if let Some(key) = &args.key {
        if !VALID_KEYS.iter().any(|(k, _)| *k == key.as_str()) {
            return Err(miette::miette!(
                help = "Run `cbench config keys` to list valid keys",
                "Unknown config key '{}'",
                key
            ));
        }
        return match config.get(key) {
            Some(value) => {
                println!("{}", value);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    for (key, _) in VALID_KEYS {
        match config.get(key) {
            Some(value) => println!("  {} = {}", style(key).cyan(), style(value).yellow()),
            None => println!("  {} = {}", style(key).cyan(), style("(default)").dim()),
        }
    }

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. Command-line flags");
    println!("  2. Environment variables (CBENCH_SEED, CBENCH_DELAY_MIN_MS, CBENCH_DELAY_MAX_MS, CBENCH_TIMEOUT_MS, CBENCH_FORMAT)");
    println!("  3. Local config ({})", LOCAL_CONFIG_FILE);
    println!("  4. Global config ({})", global_path_display());

    Ok(())
}

fn run_path() -> Result<()> {
    print_path("Global", Config::global_config_path().as_deref());
    print_path("Local", Some(Path::new(LOCAL_CONFIG_FILE)));
    Ok(())
}

fn run_keys() -> Result<()> {
    for (key, description) in VALID_KEYS {
        println!("{:<16} {}", style(key).cyan(), description);
    }
    Ok(())
}

fn print_path(label: &str, path: Option<&Path>) {
    match path {
        Some(path) => {
            let marker = if path.exists() {
                style("(exists)").green()
            } else {
                style("(not found)").dim()
            };
            println!("{}: {} {}", label, path.display(), marker);
        }
        None => println!("{}: {}", label, style("(unavailable)").dim()),
    }
}

fn global_path_display() -> String {
    Config::global_config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "unavailable".to_string())
}
