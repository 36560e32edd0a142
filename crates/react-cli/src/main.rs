use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use colored::Colorize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use react_llm::{LLMProvider, OpenAIProvider};
use react_loop::{run_agent_loop_with_config, AgentLoopConfig, DEFAULT_MAX_ITERATIONS};
use react_tools::builtin_registry;

mod config;
mod logging;
mod output;
mod prompt;

use config::Config;
use logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "react-agent")]
#[command(about = "Travel assistant that reasons and calls tools step by step")]
#[command(version)]
struct Cli {
    /// What to ask the agent; read from stdin when omitted
    request: Option<String>,

    /// Upper bound on Thought/Action/Observation iterations
    #[arg(long, env = "REACT_AGENT_MAX_ITERATIONS")]
    max_iterations: Option<usize>,

    /// System prompt file (defaults to system_prompt.md next to the binary or in the working directory)
    #[arg(long)]
    system_prompt_file: Option<PathBuf>,

    /// Cancel the run after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Enable debug logging
    #[arg(long, short, env = "DEBUG", default_value = "false")]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(cli.debug);

    match dotenv {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(error) if error.not_found() => {}
        Err(error) => log::warn!("Failed to load .env: {}", error),
    }

    let config = Config::load().context("failed to load configuration")?;
    let llm_config = config.llm_config();
    log::info!("LLM configuration: {:?}", llm_config);

    let llm: Arc<dyn LLMProvider> = Arc::new(
        OpenAIProvider::new(llm_config)
            .context("set LLM_API_KEY (and optionally LLM_BASE_URL, LLM_MODEL_ID)")?,
    );
    let tools = Arc::new(builtin_registry(&config.tools_config())?);

    let (system_prompt, source) = prompt::load_system_prompt(
        cli.system_prompt_file.as_deref(),
        &prompt::candidate_paths(),
        &tools,
    )?;
    log::info!("Using system prompt from {}", source);

    let request = match cli.request {
        Some(request) => request,
        None => read_request()?,
    };

    let mut loop_config = AgentLoopConfig::default()
        .with_max_iterations(
            cli.max_iterations
                .or(config.max_iterations)
                .unwrap_or(DEFAULT_MAX_ITERATIONS),
        )
        .with_system_prompt(system_prompt);
    if let Some(secs) = cli.timeout_secs {
        loop_config = loop_config.with_deadline(Duration::from_secs(secs));
    }

    let cancel_token = CancellationToken::new();
    let ctrl_c_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("{}", "Cancelling after the current step...".yellow());
            ctrl_c_token.cancel();
        }
    });

    let (event_tx, mut event_rx) = mpsc::channel(64);
    let printer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if let Some(line) = output::render_event(&event) {
                println!("{line}");
            }
        }
    });

    println!("{}", format!("User request: {request}").cyan());
    let run = run_agent_loop_with_config(
        &request,
        Some(event_tx),
        llm,
        tools,
        cancel_token,
        loop_config,
    )
    .await;
    printer.await.context("event printer panicked")?;

    println!("{}", output::render_outcome(&run.outcome));
    log::debug!(
        "Run finished after {} model turns with {} history entries",
        run.iterations,
        run.history.len()
    );

    io::stdout().flush()?;
    std::process::exit(output::exit_code(&run.outcome));
}

fn read_request() -> anyhow::Result<String> {
    print!("{}", "Request: ".bold());
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let request = line.trim();
    if request.is_empty() {
        bail!("no request given");
    }
    Ok(request.to_string())
}
