//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! settings definition file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the definition file
    #[arg(short, long, default_value = "settings.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing settings definition");

        println!("📝 Initializing settings definition");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Definition file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::generate_definition()) {
            Ok(_) => {
                println!("✅ Definition file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Point envcast at it: export ENVCAST_SETTINGS_FILE={}", self.output);
                println!("  3. Override a setting: export ENVCAST_PORT=8080");
                println!("  4. Check every setting resolves: envcast check");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write definition file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    fn generate_definition() -> String {
        r#"# Settings definition
#
# Every UPPERCASE key below is a setting. Override one by exporting
# {prefix}{NAME}, e.g. ENVCAST_PORT=8080 with the default prefix.
#
# Overrides are converted to the setting's type:
#   bool         "true" in any case is true, anything else false
#   int, float   parsed as numbers
#   list, dict   parsed as literals: '["a", "b"]', '{"key": 1}'
#   str          used as-is

[defaults]
DEBUG = false
PORT = 8000
SECRET_KEY = "change-me"
DATABASE_URL = "sqlite:///db.sqlite3"
ALLOWED_HOSTS = ["localhost"]

[defaults.FEATURE_FLAGS]
new_ui = false

# Type annotations refine or replace the type taken from the default.
# A setting declared here without a default defaults to None.
[types]
ALLOWED_HOSTS = "list[str]"
FEATURE_FLAGS = "dict[str, bool]"
REQUEST_TIMEOUT = "float | None"
"#
        .to_string()
    }
}
