// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Provides context builders and temporary template files for render and CLI tests

#![allow(dead_code)]

use std::path::PathBuf;
use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;
use tokio::fs;

use greshunkel::{Context, TemplateEngine};

/// Fluent builder for root contexts used across tests
pub struct TestContextBuilder {
    strings: Vec<(String, String)>,
    arrays: Vec<(String, Vec<String>)>,
    upper_filter: bool,
}

impl TestContextBuilder {
    pub fn new() -> Self {
        Self {
            strings: Vec::new(),
            arrays: Vec::new(),
            upper_filter: false,
        }
    }

    pub fn with_string(mut self, name: &str, value: &str) -> Self {
        self.strings.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_array(mut self, name: &str, items: &[&str]) -> Self {
        self.arrays.push((
            name.to_string(),
            items.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    pub fn with_upper_filter(mut self) -> Self {
        self.upper_filter = true;
        self
    }

    pub fn build(self) -> Context<'static> {
        let mut ctx = Context::new();
        for (name, value) in &self.strings {
            ctx.add_string(name, value);
        }
        for (name, items) in &self.arrays {
            let mut array = ctx.add_array(name);
            for item in items {
                array.push_string(item);
            }
        }
        if self.upper_filter {
            ctx.add_filter("upper", |arg| arg.to_uppercase());
        }
        ctx
    }
}

/// Render `input` and decode the result as UTF-8
pub fn render_to_string(ctx: &Context<'_>, input: &str) -> greshunkel::template::Result<String> {
    let engine = TemplateEngine::new()?;
    let bytes = engine.render(ctx, input.as_bytes())?;
    Ok(String::from_utf8(bytes).expect("rendered output is UTF-8"))
}

pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    pub async fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, contents)
            .await
            .expect("Failed to write test file");
        path
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_greshunkel"));
        command
            .args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("RUST_LOG");
        for var in [
            "GRESHUNKEL_LOG_LEVEL",
            "GRESHUNKEL_LOG_FORMAT",
            "GRESHUNKEL_MAX_NAME_LEN",
            "GRESHUNKEL_MAX_VALUE_LEN",
        ] {
            command.env_remove(var);
        }
        command
    }

    /// Run the greshunkel binary with the temp directory as working directory
    pub fn run_cli(&self, args: &[&str]) -> Output {
        self.run_cli_with_env(args, &[])
    }

    pub fn run_cli_with_env(&self, args: &[&str], vars: &[(&str, &str)]) -> Output {
        let mut command = self.command(args);
        command.envs(vars.iter().copied());
        command.output().expect("Failed to execute greshunkel")
    }

    /// Run the binary with `input` written to its stdin
    pub fn run_cli_with_stdin(&self, args: &[&str], input: &[u8]) -> Output {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn greshunkel");

        child
            .stdin
            .take()
            .expect("stdin is piped")
            .write_all(input)
            .expect("Failed to write stdin");

        child
            .wait_with_output()
            .expect("Failed to wait for greshunkel")
    }
}
