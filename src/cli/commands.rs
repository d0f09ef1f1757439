// ABOUTME: Command implementations for the greshunkel CLI
// ABOUTME: Builds the root context, renders templates and lists built-in filters

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info};

use super::args::Args;
use super::config::Config;
use super::context_file::load_context_file;
use crate::template::{register_builtin_filters, Context, TemplateEngine, BUILTIN_FILTERS};

/// Everything the render command needs besides configuration
#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    pub template: PathBuf,
    pub vars: Vec<String>,
    pub arrays: Vec<String>,
    pub context_file: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub no_builtins: bool,
}

/// Render a template to a file or stdout
pub async fn render_template(request: RenderRequest, config: &Config) -> Result<()> {
    info!("Rendering template: {}", request.template.display());

    let source = read_template(&request.template).await?;
    let mut ctx = Context::with_limits(config.limits);
    populate_context(&mut ctx, &request, config).await?;
    debug!("Root context holds {} variables", ctx.len());

    let engine = TemplateEngine::with_options(config.render)?;
    let rendered = engine
        .render(&ctx, &source)
        .with_context(|| format!("Failed to render '{}'", request.template.display()))?;

    match &request.output {
        Some(path) => {
            fs::write(path, &rendered)
                .await
                .with_context(|| format!("Failed to write output file '{}'", path.display()))?;
            info!("Output written to: {}", path.display());
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&rendered).await?;
            stdout.flush().await?;
        }
    }

    Ok(())
}

/// List the built-in filters
pub async fn list_filters() -> Result<()> {
    for name in BUILTIN_FILTERS {
        println!("{}", name);
    }
    Ok(())
}

/// Fill the root context. The first binding of a name wins, so sources are
/// added from highest to lowest precedence: flags, context file, config.
pub async fn populate_context(
    ctx: &mut Context<'_>,
    request: &RenderRequest,
    config: &Config,
) -> Result<()> {
    for (name, value) in Args::parse_variables(&request.vars)? {
        ctx.add_string(&name, &value);
    }

    for (name, items) in Args::parse_arrays(&request.arrays)? {
        let mut array = ctx.add_array(&name);
        for item in &items {
            array.push_string(item);
        }
    }

    if let Some(path) = &request.context_file {
        let entries = load_context_file(path).await?;
        info!("Loaded {} variables from {}", entries.len(), path.display());
        for (name, value) in entries {
            ctx.add_value(&name, value);
        }
    }

    for (name, value) in &config.variables {
        ctx.add_string(name, value);
    }

    if config.builtin_filters && !request.no_builtins {
        register_builtin_filters(ctx);
    }

    Ok(())
}

async fn read_template(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut source = Vec::new();
        tokio::io::stdin().read_to_end(&mut source).await?;
        return Ok(source);
    }

    fs::read(path)
        .await
        .with_context(|| format!("Failed to read template '{}'", path.display()))
}
