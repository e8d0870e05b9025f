mod cli;

use std::{io, process::ExitCode};

use anyhow::{anyhow, Result};
use gas_run::{
    classify_operation,
    config::{Config, DEFAULT_FUNCTION},
    printer::TextPrinter,
    InvocationRequest, ScriptsClient,
};
use is_terminal::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Logs go to stderr so stdout carries only the outcome.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gas_run=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = cli::Cli::parse();
    let cfg = Config::load();

    // CLI overrides config
    let script_id = args
        .script_id
        .clone()
        .or_else(|| cfg.get("SCRIPT_ID"))
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| {
            anyhow!(
                "Missing SCRIPT_ID. Pass --script-id or set it in env or {}",
                cfg.config_path.display()
            )
        })?;
    let function = args
        .function
        .clone()
        .or_else(|| cfg.get("DEFAULT_FUNCTION"))
        .unwrap_or_else(|| DEFAULT_FUNCTION.to_string());
    let dev_mode = args.dev_mode || cfg.get_bool("DEV_MODE");

    let request = InvocationRequest::new(script_id, function)
        .with_parameters(args.params.iter().map(|p| cli::parse_param(p)).collect())
        .with_dev_mode(dev_mode);

    let client = ScriptsClient::from_config(&cfg)?;

    if !args.json && io::stderr().is_terminal() {
        eprintln!("Running {}...", request.function());
    }

    let outcome = match classify_operation(client.run(request).await) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::warn!(error = %err, "script API response broke its documented shape");
            return Err(anyhow!("Malformed script API response: {}", err));
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        let printer = if args.no_color || !io::stdout().is_terminal() {
            TextPrinter::plain()
        } else {
            let success_color = cfg.get("DEFAULT_COLOR").unwrap_or_else(|| "green".into());
            TextPrinter::for_outcome(&outcome, &success_color)
        };
        printer.print(&outcome.to_string());
    }

    Ok(if outcome.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
