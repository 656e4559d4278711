//! `helmbase` command line

use anyhow::{bail, Context as _};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use helmbase_core::{to_release_args, ConstructInputs, InMemoryHost, ResourceOptions};
use helmbase_provider::{setup_logging, LogFormat, Provider, ProviderConfig};
use std::path::PathBuf;
use std::sync::Arc;

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Provider config file (TOML)")
}

fn cli() -> Command {
    Command::new("helmbase")
        .version(helmbase_core::VERSION)
        .about("Strongly typed Helm chart components")
        .subcommand_required(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("render")
                .about("Construct a chart against an in-memory host and print its release args")
                .arg(config_arg())
                .arg(
                    Arg::new("type")
                        .long("type")
                        .required(true)
                        .help("Type token, e.g. helmBase:index:Redis"),
                )
                .arg(
                    Arg::new("name")
                        .long("name")
                        .required(true)
                        .help("Component name"),
                )
                .arg(
                    Arg::new("inputs")
                        .long("inputs")
                        .help("Input property bag as a JSON object"),
                ),
        )
        .subcommand(
            Command::new("charts")
                .about("List registered charts")
                .arg(config_arg()),
        )
}

fn load_config(args: &ArgMatches) -> anyhow::Result<ProviderConfig> {
    let Some(path) = args.get_one::<PathBuf>("config") else {
        bail!("missing --config");
    };
    ProviderConfig::load(path).with_context(|| format!("loading {}", path.display()))
}

async fn render(args: &ArgMatches) -> anyhow::Result<()> {
    let config = load_config(args)?;
    let (Some(type_token), Some(name)) = (
        args.get_one::<String>("type"),
        args.get_one::<String>("name"),
    ) else {
        bail!("render needs --type and --name");
    };
    let inputs = match args.get_one::<String>("inputs") {
        Some(raw) => {
            let value: serde_json::Value =
                serde_json::from_str(raw).context("parsing --inputs as JSON")?;
            ConstructInputs::from_value(value).context("--inputs must be a JSON object")?
        }
        None => ConstructInputs::new(),
    };

    let provider = Provider::new(config, Arc::new(InMemoryHost::new()))?;
    let constructed = provider
        .construct(type_token, name, &inputs, ResourceOptions::default())
        .await
        .with_context(|| format!("constructing {name} ({type_token})"))?;

    let release_args = constructed
        .args
        .helm_options
        .as_ref()
        .map(to_release_args)
        .unwrap_or_default();
    println!("{}", serde_json::to_string_pretty(&release_args)?);
    Ok(())
}

fn charts(args: &ArgMatches) -> anyhow::Result<()> {
    let config = load_config(args)?;
    let provider = Provider::new(config, Arc::new(InMemoryHost::new()))?;

    println!("{} {}", provider.name(), provider.version());
    for chart in provider.registry().definitions() {
        println!("  {}  {}  {}", chart.token, chart.chart, chart.repo);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    let format = if matches.get_flag("log-json") {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    setup_logging(format)?;

    match matches.subcommand() {
        Some(("render", args)) => render(args).await,
        Some(("charts", args)) => charts(args),
        _ => Ok(()),
    }
}
