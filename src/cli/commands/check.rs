//! Check command implementation
//!
//! Resolves every declared setting and reports every failure, not just the
//! first one.

use clap::Args;

use super::{open_settings, EXIT_CONFIGURATION};
use crate::settings::SettingsOptions;

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {}

impl CheckArgs {
    /// Execute the check command
    pub fn execute(&self, options: Option<&SettingsOptions>) -> anyhow::Result<i32> {
        let settings = match open_settings(options) {
            Ok(settings) => settings,
            Err(code) => return Ok(code),
        };

        println!("🔍 Checking {} settings", settings.definition().len());
        println!();

        let failures: Vec<_> = settings
            .names()
            .into_iter()
            .filter_map(|name| settings.get(name).err().map(|e| (name, e)))
            .collect();

        if failures.is_empty() {
            println!("✅ All settings resolved");
            return Ok(0);
        }

        for (name, error) in &failures {
            println!("❌ {name}");
            println!("   Error: {error}");
        }
        println!();
        println!(
            "{} of {} settings failed",
            failures.len(),
            settings.definition().len()
        );
        Ok(EXIT_CONFIGURATION)
    }
}
