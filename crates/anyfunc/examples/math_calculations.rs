use std::{path::PathBuf, time::Duration};

use anyfunc::{
    BackendKind, CallContext, Credentials, Prompt, connect_with_credentials, decode::decode,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// # Math calculations – the smallest useful program
///
/// 1. **Loads** API keys from `api_key.yaml` (or the environment).
/// 2. **Connects** to the chosen backend.
/// 3. **Asks** for the greatest common factor of 45 and 60.
/// 4. **Prints** the generic payload, then decodes the same reply as a `u64`.
///
/// ```bash
/// export GEMINI_API_KEY=…
/// RUST_LOG=debug cargo run -p anyfunc --example math_calculations -- --backend gemini
/// ```
#[derive(Debug, Parser)]
struct Args {
    /// Backend to use (`openai` or `gemini`).
    #[arg(long, default_value = "gemini")]
    backend: BackendKind,

    /// YAML file with `openAI:` / `gemini:` keys.
    #[arg(long, default_value = anyfunc::credentials::DEFAULT_FILE)]
    credentials: PathBuf,

    /// Give up after this many seconds.
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let credentials = Credentials::load(&args.credentials)?;
    let client = connect_with_credentials(args.backend, &credentials)?;

    let prompt = Prompt::new(
        "Return the greatest common factor of given two numbers `num1` and `num2`.",
    )
    .with_parameter("num1", 45)
    .with_parameter("num2", 60);
    let ctx = CallContext::new().with_timeout(Duration::from_secs(args.timeout_secs));

    let payload = match client.call(&ctx, &prompt).await {
        Ok(payload) => payload,
        Err(err) if err.is_declared_failure() => {
            tracing::warn!(%err, "model could not complete the task");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    tracing::info!(?payload, "generic response");

    let gcf: u64 = decode(payload)?;
    println!("Greatest common factor: {gcf}");

    Ok(())
}
