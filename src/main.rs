use anyhow::Result;
use greshunkel::cli::App;

#[tokio::main]
async fn main() -> Result<()> {
    let args = greshunkel::cli::Args::parse_args();
    let mut app = App::from_args(&args)?;

    app.run(args).await?;

    Ok(())
}
