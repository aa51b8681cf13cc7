//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for envcast using clap.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::LoggingConfig;
use crate::settings::{LoadPolicy, SettingsOptions, DEFAULT_ENV_PREFIX};

/// envcast - typed settings from environment overrides
#[derive(Parser, Debug)]
#[command(name = "envcast")]
#[command(version, about, long_about = None)]
#[command(author = "Envcast Contributors")]
pub struct Cli {
    /// Path to the settings definition file
    #[arg(short, long, env = "ENVCAST_SETTINGS_FILE", global = true)]
    pub definition: Option<PathBuf>,

    /// Prefix of override environment variables
    #[arg(long, default_value = DEFAULT_ENV_PREFIX, env = "ENVCAST_ENV_PREFIX", global = true)]
    pub prefix: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ENVCAST_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Directory for JSON log files; file logging is off when unset
    #[arg(long, env = "ENVCAST_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log file rotation (daily, hourly, never)
    #[arg(long, default_value = "daily", env = "ENVCAST_LOG_ROTATION", global = true)]
    pub log_rotation: String,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Settings options from the global flags, if a definition was given
    ///
    /// Commands resolve settings explicitly, so loading is always lazy.
    pub fn settings_options(&self) -> Option<SettingsOptions> {
        self.definition.as_ref().map(|path| {
            SettingsOptions::new(path)
                .with_prefix(self.prefix.clone())
                .with_load_policy(LoadPolicy::Lazy)
        })
    }

    /// Logging configuration from the global flags
    pub fn logging_config(&self) -> LoggingConfig {
        let defaults = LoggingConfig::default();
        LoggingConfig {
            local_enabled: self.log_dir.is_some(),
            local_path: self
                .log_dir
                .as_ref()
                .map_or(defaults.local_path, |dir| dir.display().to_string()),
            local_rotation: self.log_rotation.clone(),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve one setting and print its value
    Get(commands::get::GetArgs),

    /// Resolve every setting and print its type and value
    Show(commands::show::ShowArgs),

    /// Resolve every setting and report all failures
    Check(commands::check::CheckArgs),

    /// Convert a value against a type expression
    Convert(commands::convert::ConvertArgs),

    /// Initialize a new settings definition file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_get() {
        let cli = Cli::parse_from(["envcast", "--definition", "custom.toml", "get", "PORT"]);
        assert_eq!(cli.definition, Some(PathBuf::from("custom.toml")));
        assert!(matches!(cli.command, Commands::Get(ref args) if args.name == "PORT"));
    }

    #[test]
    fn test_cli_parse_with_prefix_after_subcommand() {
        let cli = Cli::parse_from(["envcast", "show", "--prefix", "APP_", "--json"]);
        assert_eq!(cli.prefix, "APP_");
        assert!(matches!(cli.command, Commands::Show(ref args) if args.json));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["envcast", "--log-level", "debug", "check"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::Check(_)));
    }

    #[test]
    fn test_cli_parse_convert() {
        let cli = Cli::parse_from(["envcast", "convert", "--type", "list[int]", "[1, 2]"]);
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.type_expr, "list[int]");
                assert_eq!(args.value, "[1, 2]");
                assert_eq!(args.name, "VALUE");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["envcast", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init(ref args) if args.force));
    }

    #[test]
    fn test_logging_config_from_flags() {
        let cli = Cli::parse_from(["envcast", "check"]);
        let config = cli.logging_config();
        assert!(!config.local_enabled);
        assert_eq!(config.local_rotation, "daily");

        let cli = Cli::parse_from([
            "envcast",
            "--log-dir",
            "/var/log/envcast",
            "--log-rotation",
            "hourly",
            "show",
        ]);
        let config = cli.logging_config();
        assert!(config.local_enabled);
        assert_eq!(config.local_path, "/var/log/envcast");
        assert_eq!(config.local_rotation, "hourly");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_settings_options_from_flags() {
        let cli = Cli::parse_from(["envcast", "-d", "settings.toml", "--prefix", "APP_", "check"]);
        let options = cli.settings_options().unwrap();
        assert_eq!(options.definition_path, PathBuf::from("settings.toml"));
        assert_eq!(options.env_prefix, "APP_");
    }
}
