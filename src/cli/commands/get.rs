//! Get command implementation
//!
//! Resolves one setting and prints its value.

use clap::Args;

use super::{exit_code_for, open_settings};
use crate::settings::SettingsOptions;

/// Arguments for the get command
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Setting name
    pub name: String,

    /// Print the value as JSON
    #[arg(long)]
    pub json: bool,
}

impl GetArgs {
    /// Execute the get command
    pub fn execute(&self, options: Option<&SettingsOptions>) -> anyhow::Result<i32> {
        tracing::debug!(setting = %self.name, "Resolving setting");

        let settings = match open_settings(options) {
            Ok(settings) => settings,
            Err(code) => return Ok(code),
        };

        match settings.get(&self.name) {
            Ok(value) => {
                if self.json {
                    println!("{}", serde_json::to_string(&value)?);
                } else {
                    println!("{value}");
                }
                Ok(0)
            }
            Err(e) => {
                println!("❌ {e}");
                Ok(exit_code_for(&e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_without_definition_is_configuration_error() {
        let args = GetArgs {
            name: "PORT".to_string(),
            json: false,
        };
        assert_eq!(args.execute(None).unwrap(), 2);
    }
}
