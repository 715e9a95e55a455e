//! Toolbar Simulator
//!
//! Replays a script of toolbar commands and provider activity against the
//! reference connector and prints every message delivered to the toolbar
//! as a JSON line:
//!
//! ```text
//! $ toolbar-sim --script demo.txt
//! server_up=true
//! {"reqType":"login","type":"response","msg":"ok","data":"login response ok"}
//! {"sender":"ToolbarGateway","type":"toolbarResponse",...,"data":{"EventName":"AgentLoggedOn",...}}
//! handled=true
//! ```

mod logging;
mod runner;
mod script;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rvoip_toolbar_connector::ConnectorConfig;

use crate::logging::LoggingConfig;
use crate::runner::Runner;

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay toolbar and provider activity through the reference connector", long_about = None)]
struct Args {
    /// Connector configuration file (YAML); falls back to TOOLBAR_CONNECTOR_CONFIG, then built-in defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TOOLBAR_SIM_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Script of directives; read from stdin when absent
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Pretty-print delivered messages
    #[arg(long)]
    pretty: bool,

    /// Include file and line information in logs
    #[arg(long)]
    file_info: bool,

    /// Log span activity
    #[arg(long)]
    log_spans: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = logging::parse_log_level(&args.log_level)?;
    let mut logging_config = LoggingConfig::new(level, "toolbar-sim");
    if args.file_info {
        logging_config = logging_config.with_file_info();
    }
    if args.log_spans {
        logging_config = logging_config.with_spans();
    }
    logging::setup_logging(logging_config)?;
    logging::log_welcome("toolbar-sim", rvoip_toolbar_connector::VERSION);

    let config = ConnectorConfig::load(args.config.as_deref()).context("failed to load connector configuration")?;

    let script: Box<dyn BufRead> = match &args.script {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("failed to open script {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let stdout = io::stdout();
    let mut runner = Runner::new(config, stdout.lock(), args.pretty);
    runner.run(script)?;

    tracing::info!("Script finished in phase {}", runner.connector().phase());
    Ok(())
}
