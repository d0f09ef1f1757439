// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the main CLI structure and subcommands for greshunkel

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "greshunkel")]
#[command(about = "Render line-oriented text templates with variables, loops and filters")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a template file
    Render {
        #[arg(help = "Path to the template, or - for stdin")]
        template: PathBuf,

        #[arg(short = 'V', long = "var", help = "String variable (name=value)")]
        vars: Vec<String>,

        #[arg(short = 'A', long = "array", help = "Array variable (name=a,b,c)")]
        arrays: Vec<String>,

        #[arg(short = 'C', long = "context", help = "YAML or JSON file with variables")]
        context: Option<PathBuf>,

        #[arg(short, long, help = "Output file (defaults to stdout)")]
        output: Option<PathBuf>,

        #[arg(long, help = "Do not register the built-in filters")]
        no_builtins: bool,
    },

    /// List the built-in filters
    Filters,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parse variables from name=value format, keeping command line order
    pub fn parse_variables(vars: &[String]) -> anyhow::Result<Vec<(String, String)>> {
        vars.iter()
            .map(|var| {
                var.split_once('=')
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .ok_or_else(|| {
                        anyhow::anyhow!("Invalid variable format '{}'. Expected 'name=value'", var)
                    })
            })
            .collect()
    }

    /// Parse arrays from name=a,b,c format. `name=` gives an empty array.
    pub fn parse_arrays(arrays: &[String]) -> anyhow::Result<Vec<(String, Vec<String>)>> {
        arrays
            .iter()
            .map(|array| {
                let (name, items) = array.split_once('=').ok_or_else(|| {
                    anyhow::anyhow!("Invalid array format '{}'. Expected 'name=a,b,c'", array)
                })?;
                let items = if items.is_empty() {
                    Vec::new()
                } else {
                    items.split(',').map(str::to_string).collect()
                };
                Ok((name.to_string(), items))
            })
            .collect()
    }
}
