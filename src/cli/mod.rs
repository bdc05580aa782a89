mod generate;
mod models;
mod serve;

use anyhow::{Context, Result, bail};
use console::style;

use crate::core::config::AppConfig;
use crate::core::terminal::{self, GuideSection, print_error};
use crate::logging;

fn print_help() {
    terminal::print_banner();

    GuideSection::new("Server")
        .command("serve", "Start the HTTP API")
        .print();

    GuideSection::new("Tools")
        .command("models", "List catalog models (--tool <type> to filter)")
        .command("generate", "Run one text generation and print the JSON result")
        .print();

    GuideSection::new("Options")
        .command("--config <path>", "Config file (default: adsmith.toml or $ADSMITH_CONFIG)")
        .command("--host <addr>", "Bind address for serve")
        .command("--port <port>", "Port for serve")
        .command("--tool <type>", "ads, product, seo, analysis, image, reels, ugc, video")
        .command("--input <json>", "Tool input object for generate")
        .command("--lang <ar|en>", "Output language for generate")
        .command("--model <id>", "Catalog model id for generate")
        .command("--verbose", "Debug logging")
        .print();

    println!(
        "\n {} {} <command> [options]\n",
        style("Usage:").bold(),
        style("adsmith").green()
    );
}

/// Flags every command accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CommonFlags {
    pub config: Option<String>,
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ServeArgs {
    pub common: CommonFlags,
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GenerateArgs {
    pub common: CommonFlags,
    pub tool: String,
    pub input: String,
    pub lang: String,
    pub model: Option<String>,
}

/// Value following the flag at `i`, if any.
fn flag_value(args: &[String], i: usize) -> Option<String> {
    args.get(i + 1).cloned()
}

/// Consumes `--config` / `--verbose` at `i`. Returns how many args were used.
fn parse_common_flag(args: &[String], i: usize, common: &mut CommonFlags) -> Option<usize> {
    match args[i].as_str() {
        "--config" | "-c" => {
            common.config = flag_value(args, i);
            Some(2)
        }
        "--verbose" | "-v" => {
            common.verbose = true;
            Some(1)
        }
        _ => None,
    }
}

pub(crate) fn parse_serve_args(args: &[String], start: usize) -> Result<ServeArgs> {
    let mut parsed = ServeArgs::default();
    let mut i = start;
    while i < args.len() {
        if let Some(used) = parse_common_flag(args, i, &mut parsed.common) {
            i += used;
            continue;
        }
        match args[i].as_str() {
            "--host" => {
                parsed.host = flag_value(args, i);
                i += 2;
            }
            "--port" | "-p" => {
                if let Some(value) = flag_value(args, i) {
                    let port = value
                        .parse()
                        .with_context(|| format!("invalid --port '{}'", value))?;
                    parsed.port = Some(port);
                }
                i += 2;
            }
            _ => i += 1,
        }
    }
    Ok(parsed)
}

pub(crate) fn parse_models_args(args: &[String], start: usize) -> Option<String> {
    let mut tool = None;
    let mut i = start;
    while i < args.len() {
        match args[i].as_str() {
            "--tool" | "-t" => {
                tool = flag_value(args, i);
                i += 2;
            }
            _ => i += 1,
        }
    }
    tool
}

pub(crate) fn parse_generate_args(args: &[String], start: usize) -> Result<GenerateArgs> {
    let mut common = CommonFlags::default();
    let mut tool = None;
    let mut input = None;
    let mut lang = "en".to_string();
    let mut model = None;
    let mut i = start;
    while i < args.len() {
        if let Some(used) = parse_common_flag(args, i, &mut common) {
            i += used;
            continue;
        }
        match args[i].as_str() {
            "--tool" | "-t" => tool = flag_value(args, i),
            "--input" | "-i" => input = flag_value(args, i),
            "--lang" | "-l" => {
                if let Some(value) = flag_value(args, i) {
                    lang = value;
                }
            }
            "--model" | "-m" => model = flag_value(args, i),
            _ => {
                i += 1;
                continue;
            }
        }
        i += 2;
    }

    let Some(tool) = tool else {
        bail!("--tool is required for generate");
    };
    let Some(input) = input else {
        bail!("--input is required for generate");
    };
    Ok(GenerateArgs {
        common,
        tool,
        input,
        lang,
        model,
    })
}

/// Installs logging and loads the config file for a command.
pub(crate) async fn load_config(common: &CommonFlags) -> Result<AppConfig> {
    logging::init(common.verbose);
    let path = AppConfig::resolve_path(common.config.as_deref(), |key| std::env::var(key).ok());
    AppConfig::load(&path).await
}

pub async fn run_main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let Some(cmd) = args.get(1).map(String::as_str) else {
        print_help();
        return Ok(());
    };

    match cmd {
        "serve" => {
            let parsed = parse_serve_args(&args, 2)?;
            serve::run_serve(parsed).await
        }
        "models" => {
            models::print_models(parse_models_args(&args, 2).as_deref());
            Ok(())
        }
        "generate" => {
            let parsed = parse_generate_args(&args, 2)?;
            generate::run_generate(parsed).await
        }
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            print_error(&format!("Unknown command: {}", cmd));
            print_help();
            Ok(())
        }
    }
}
