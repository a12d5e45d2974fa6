//! uciwall - edit an OpenWrt PassWall UCI configuration
//!
//! This is the main entry point for the uciwall CLI.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uciwall_config::{
    render_parse_error, unquote, Document, JsonAdapter, NodeSpec, Options, Section, ShuntBinding,
};
use uciwall_core::{ConfigManager, ConfigStore, Error, FileStore, Settings, SettingsLoader};

/// uciwall - PassWall UCI configuration editor
#[derive(Parser)]
#[command(name = "uciwall")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (TOML)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// PassWall UCI file to operate on (overrides settings)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the configuration and print it in canonical form
    Show {
        /// Print as JSON instead of UCI
        #[arg(long)]
        json: bool,
    },

    /// Print the stored configuration text unchanged
    Raw,

    /// Validate a configuration file
    Validate {
        /// File to validate (defaults to the configured file)
        file: Option<PathBuf>,
    },

    /// Rewrite a configuration file in canonical form
    Fmt {
        /// File to format (defaults to the configured file)
        file: Option<PathBuf>,

        /// Only report whether the file is already canonical
        #[arg(long)]
        check: bool,
    },

    /// Append a section
    #[command(name = "add-section")]
    AddSection {
        /// Section type, e.g. shunt_rules
        #[arg(long = "type")]
        section_type: String,

        /// Section name (empty for an anonymous section)
        #[arg(long, default_value = "")]
        name: String,

        /// Option as key=value (repeatable)
        #[arg(short = 'o', long = "option", value_parser = parse_key_val)]
        options: Vec<(String, String)>,

        /// Shunt node to bind the new rule on
        #[arg(long)]
        shunt_node: Option<String>,

        /// Rule suffix, written as fenliu_<suffix>
        #[arg(long)]
        shunt_suffix: Option<String>,

        /// Proxy node the rule routes through
        #[arg(long)]
        shunt_proxy: Option<String>,
    },

    /// Remove every section with the given type and name
    #[command(name = "delete-section")]
    DeleteSection {
        #[arg(long = "type")]
        section_type: String,

        #[arg(long)]
        name: String,
    },

    /// Merge options into every section with the given type and name
    #[command(name = "update-section")]
    UpdateSection {
        #[arg(long = "type")]
        section_type: String,

        #[arg(long)]
        name: String,

        /// Option as key=value (repeatable)
        #[arg(short = 'o', long = "option", value_parser = parse_key_val, required = true)]
        options: Vec<(String, String)>,
    },

    /// Add a trojan node
    #[command(name = "add-node")]
    AddNode {
        #[arg(long)]
        name: String,

        #[arg(long)]
        remarks: String,

        #[arg(long)]
        address: String,

        #[arg(long)]
        port: String,

        #[arg(long)]
        password: String,
    },

    /// Show version information
    Version,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {:?}", s))?;
    if key.is_empty() {
        return Err(format!("empty key in {:?}", s));
    }
    Ok((key.to_string(), value.to_string()))
}

fn to_options(pairs: Vec<(String, String)>) -> Options {
    pairs.into_iter().collect()
}

fn init_tracing(verbose: bool, settings: &Settings) {
    let fallback = if verbose { "debug" } else { settings.log_filter.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = SettingsLoader::load(cli.settings.as_deref())?;
    if let Some(path) = &cli.config {
        settings.config_path = path.clone();
    }

    init_tracing(cli.verbose, &settings);

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    if let Err(e) = run(cli.command, &settings) {
        tracing::error!("{:#}", e);
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn run(command: Commands, settings: &Settings) -> anyhow::Result<()> {
    let manager = ConfigManager::new(FileStore::new(&settings.config_path));
    tracing::debug!(config = %manager.store().describe(), "using configuration");

    match command {
        Commands::Show { json } => {
            let doc = manager.load()?;
            if json {
                println!("{}", JsonAdapter::serialize(&doc)?);
            } else {
                println!("{}", doc);
            }
        }

        Commands::Raw => {
            print!("{}", manager.read_raw()?);
        }

        Commands::Validate { file } => {
            let store = file.map(FileStore::new).unwrap_or_else(|| manager.store().clone());
            let content = store.read()?;

            match Document::parse(&content) {
                Ok(doc) => {
                    println!(
                        "✅ Configuration '{}' is valid ({} sections)",
                        store.describe(),
                        doc.len()
                    );
                }
                Err(e) => {
                    eprint!("{}", render_parse_error(&store.describe(), &content, &e));
                    return Err(Error::from(e)).context("validation failed");
                }
            }
        }

        Commands::Fmt { file, check } => {
            let store = file.map(FileStore::new).unwrap_or_else(|| manager.store().clone());

            if check {
                let content = store.read()?;
                let doc = Document::parse(&content).map_err(|e| {
                    eprint!("{}", render_parse_error(&store.describe(), &content, &e));
                    Error::from(e)
                })?;
                if doc.to_string() != content.trim() {
                    anyhow::bail!("'{}' is not in canonical form", store.describe());
                }
                println!("✅ '{}' is already formatted", store.describe());
            } else if ConfigManager::new(store.clone()).reformat()? {
                println!("✅ Reformatted '{}'", store.describe());
            } else {
                println!("✅ '{}' is already formatted", store.describe());
            }
        }

        Commands::AddSection {
            section_type,
            name,
            options,
            shunt_node,
            shunt_suffix,
            shunt_proxy,
        } => {
            let mut section = Section::new(section_type, unquote(&name))?;
            section.merge_options(&to_options(options))?;

            // All three are needed to bind a rule
            let shunt = match (shunt_node, shunt_suffix, shunt_proxy) {
                (Some(node), Some(suffix), Some(proxy)) => Some(ShuntBinding {
                    node_name: unquote(&node).to_string(),
                    suffix,
                    proxy_node: proxy,
                }),
                _ => None,
            };

            let bound = manager.add_section(section, shunt.as_ref())?;
            println!("✅ Section added");
            if let Some(shunt) = &shunt {
                if bound {
                    println!("✅ Bound {} -> {} on node '{}'", shunt.option_key(), shunt.proxy_node, shunt.node_name);
                } else {
                    println!("⚠️ Shunt node '{}' not found, rule not bound", shunt.node_name);
                }
            }
        }

        Commands::DeleteSection { section_type, name } => {
            let removed = manager.delete_section(&section_type, unquote(&name))?;
            println!("✅ Deleted {} section(s) type='{}' name='{}'", removed, section_type, unquote(&name));
        }

        Commands::UpdateSection {
            section_type,
            name,
            options,
        } => {
            let updated = manager.update_section(&section_type, unquote(&name), &to_options(options))?;
            println!("✅ Updated {} section(s) type='{}' name='{}'", updated, section_type, unquote(&name));
        }

        Commands::AddNode {
            name,
            remarks,
            address,
            port,
            password,
        } => {
            let spec = NodeSpec {
                name: unquote(&name).to_string(),
                remarks,
                address,
                port,
                password,
            };
            let node = manager.add_node(&spec)?;
            println!("✅ Node '{}' added", node.name());
        }

        Commands::Version => {
            println!("uciwall v{}", uciwall_core::VERSION);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("network=tcp,udp"),
            Ok(("network".to_string(), "tcp,udp".to_string()))
        );
        assert_eq!(parse_key_val("k=a=b"), Ok(("k".to_string(), "a=b".to_string())));
        assert_eq!(parse_key_val("empty="), Ok(("empty".to_string(), String::new())));
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=v").is_err());
    }

    #[test]
    fn test_to_options_keeps_order() {
        let options = to_options(vec![
            ("b".to_string(), "1".to_string()),
            ("a".to_string(), "2".to_string()),
        ]);
        let keys: Vec<&str> = options.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
