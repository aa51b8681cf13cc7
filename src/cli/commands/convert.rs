//! Convert command implementation
//!
//! Runs the conversion engine on an ad-hoc value, without a definition file.

use clap::Args;

use super::EXIT_CONFIGURATION;
use crate::descriptor::{TypeDescriptor, TypeRegistry};
use crate::engine::convert;

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Type expression, e.g. "list[int]" or "int | None"
    #[arg(short = 't', long = "type")]
    pub type_expr: String,

    /// Setting name used in error messages
    #[arg(short, long, default_value = "VALUE")]
    pub name: String,

    /// Print the value as JSON
    #[arg(long)]
    pub json: bool,

    /// Raw value to convert
    pub value: String,
}

impl ConvertArgs {
    /// Execute the convert command
    pub fn execute(&self) -> anyhow::Result<i32> {
        let registry = TypeRegistry::new();
        let descriptor = match TypeDescriptor::parse(&self.type_expr, &registry) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                println!("❌ {e}");
                return Ok(EXIT_CONFIGURATION);
            }
        };

        match convert(&self.name, &self.value, &descriptor) {
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
                Ok(EXIT_CONFIGURATION)
            }
        }
    }
}
