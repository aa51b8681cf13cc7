//! Show command implementation
//!
//! Resolves every declared setting and prints its type and value.

use clap::Args;
use serde_json::{json, Map};

use super::{open_settings, EXIT_CONFIGURATION};
use crate::settings::SettingsOptions;

/// Arguments for the show command
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Print settings as a JSON object
    #[arg(long)]
    pub json: bool,
}

impl ShowArgs {
    /// Execute the show command
    pub fn execute(&self, options: Option<&SettingsOptions>) -> anyhow::Result<i32> {
        let settings = match open_settings(options) {
            Ok(settings) => settings,
            Err(code) => return Ok(code),
        };

        let mut failed = 0;
        let mut entries = Map::new();

        for (name, spec) in settings.definition().iter() {
            let overridden = settings.is_overridden(name);
            match settings.get(name) {
                Ok(value) => {
                    if self.json {
                        entries.insert(
                            name.to_string(),
                            json!({
                                "type": spec.descriptor().to_string(),
                                "value": value,
                                "overridden": overridden,
                            }),
                        );
                    } else {
                        let marker = if overridden { " (env)" } else { "" };
                        println!("{name}: {} = {value}{marker}", spec.descriptor());
                    }
                }
                Err(e) => {
                    failed += 1;
                    if self.json {
                        entries.insert(
                            name.to_string(),
                            json!({
                                "type": spec.descriptor().to_string(),
                                "error": e.to_string(),
                            }),
                        );
                    } else {
                        println!("{name}: {} = ❌ {e}", spec.descriptor());
                    }
                }
            }
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }

        if failed > 0 {
            tracing::warn!(failed, "Some settings could not be resolved");
            return Ok(EXIT_CONFIGURATION);
        }
        Ok(0)
    }
}
