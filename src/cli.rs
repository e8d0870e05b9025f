use clap::Parser;
use serde_json::Value;

#[derive(Parser, Debug, Clone)]
#[command(name = "gas-run", about = "Run a function in a hosted Apps Script project", version)]
pub struct Cli {
    /// Function to call. Defaults to DEFAULT_FUNCTION from config.
    #[arg(value_name = "FUNCTION")]
    pub function: Option<String>,

    /// Script project id. Defaults to SCRIPT_ID from config.
    #[arg(long = "script-id")]
    pub script_id: Option<String>,

    /// Argument passed to the function, as a JSON literal.
    /// Can be used multiple times: --param 1 --param '"two"' --param '{"k":3}'
    /// Text that is not valid JSON is sent as a string.
    #[arg(long = "param", action = clap::ArgAction::Append)]
    pub params: Vec<String>,

    /// Run the latest saved code rather than the deployed version.
    #[arg(long = "dev-mode")]
    pub dev_mode: bool,

    /// Print the classified outcome as JSON.
    #[arg(long)]
    pub json: bool,

    /// Disable colored output.
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

pub fn parse_param(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
