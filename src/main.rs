use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use url::Url;

use transquoter::builders::build_document;
use transquoter::config::RenderConfig;
use transquoter::core::{
    print_error_message, print_info_message, render_stream_list, split_stream_list,
    TransquoterError, TransquoterResult, TRANSQUOTER_HOME,
};
use transquoter::env::{core::LogLevel, generate_env_docs, EnvVar};
use transquoter::network::Session;

/// Prefix and suffix of the generated page when no output path is given
const OUTPUT_PREFIX: &str = "TQ";
const OUTPUT_SUFFIX: &str = ".html";

#[derive(Parser, Debug)]
#[command(name = "transquoter", version, about = "Render a virtual stream list as one HTML page")]
struct Cli {
    /// Stream list to render; `-` reads standard input
    file: Option<String>,

    /// Write the page here instead of a temporary file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML render configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Per-fetch timeout in seconds, 0 for none
    #[arg(short, long)]
    timeout: Option<u64>,

    /// User-Agent sent with HTTP requests
    #[arg(short, long)]
    user_agent: Option<String>,

    /// Only log errors
    #[arg(short, long)]
    silent: bool,

    /// Print the environment variables that affect rendering, then exit
    #[arg(long)]
    env_docs: bool,
}

fn init_logging(silent: bool) {
    let level = if silent {
        "error".to_string()
    } else {
        LogLevel::get_or_default("info".to_string())
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("transquoter={level}")))
        .with_writer(io::stderr)
        .init();
}

/// Defaults, then the config file, then the environment, then flags
fn load_config(cli: &Cli) -> TransquoterResult<RenderConfig> {
    let mut config = match &cli.config {
        Some(path) => RenderConfig::from_file(path)?,
        None => RenderConfig::default(),
    };

    config.apply_env_overrides();

    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(user_agent) = &cli.user_agent {
        config.user_agent = Some(user_agent.clone());
    }

    config.validate()?;
    Ok(config)
}

fn read_stream_list(file: &str) -> TransquoterResult<String> {
    if file == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(fs::read_to_string(file)?)
    }
}

/// Page title: the list's file name, or `stdin`
fn list_title(file: &str) -> String {
    if file == "-" {
        return "stdin".to_string();
    }

    Path::new(file)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string())
}

fn write_page(page: &str, output: Option<&Path>) -> TransquoterResult<PathBuf> {
    if let Some(path) = output {
        fs::write(path, page)?;
        return Ok(path.to_path_buf());
    }

    let file = tempfile::Builder::new()
        .prefix(OUTPUT_PREFIX)
        .suffix(OUTPUT_SUFFIX)
        .tempfile()?;
    fs::write(file.path(), page)?;

    let (_, path) = file
        .keep()
        .map_err(|e| TransquoterError::Io(e.error))?;
    Ok(path)
}

fn page_url(path: &Path) -> String {
    let absolute = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    Url::from_file_path(&absolute)
        .map(String::from)
        .unwrap_or_else(|_| absolute.display().to_string())
}

fn run(cli: Cli) -> TransquoterResult<()> {
    if cli.env_docs {
        print!("{}", generate_env_docs());
        return Ok(());
    }

    let Some(file) = cli.file.as_deref() else {
        print_info_message(&format!("Viewing {TRANSQUOTER_HOME}"));
        return Ok(());
    };

    let config = load_config(&cli)?;
    let text = read_stream_list(file)?;

    let mut session = Session::new(&config)?;
    let body = render_stream_list(split_stream_list(&text), &mut session, &config);
    let page = build_document(&list_title(file), &body, &config);

    let path = write_page(&page, cli.output.as_deref())?;
    print_info_message(&format!("Viewing {}", page_url(&path)));

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.silent);

    if let Err(error) = run(cli) {
        print_error_message(&format!("Error: {error}"));
        process::exit(1);
    }
}
