//! The `clarityforge schema` command.

use anyhow::Result;
use clap::ValueEnum;

use clarityforge_core::schema::{ResponseSchema, SchemaDialect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dialect {
    /// Gemini `responseSchema` (upper-case types, property ordering)
    Gemini,
    /// Standard JSON Schema, as used for OpenAI structured outputs
    JsonSchema,
}

impl From<Dialect> for SchemaDialect {
    fn from(d: Dialect) -> Self {
        match d {
            Dialect::Gemini => SchemaDialect::Gemini,
            Dialect::JsonSchema => SchemaDialect::JsonSchema,
        }
    }
}

pub fn execute(dialect: Dialect) -> Result<()> {
    let schema = ResponseSchema::clarity_analysis().render(dialect.into());
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
