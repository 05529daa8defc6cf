use clap::{Parser, ValueEnum};
use schema_synth::{
    extract_content, generate, to_script_tag, DocumentSource, FetchConfig, HttpSource, Limits,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Generate schema.org JSON-LD for a web page
#[derive(Parser, Debug)]
#[command(name = "schema-synth", version, about)]
struct Cli {
    /// Page to fetch; omit when reading from --file
    #[arg(required_unless_present = "file", conflicts_with_all = ["file", "url"])]
    target: Option<String>,

    /// Read markup from a local file instead of fetching
    #[arg(long, requires = "url")]
    file: Option<PathBuf>,

    /// Base URL of the document read with --file
    #[arg(long)]
    url: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, env = "SCHEMA_SYNTH_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// User-Agent header for fetches
    #[arg(long, env = "SCHEMA_SYNTH_USER_AGENT")]
    user_agent: Option<String>,

    #[arg(long, env = "SCHEMA_SYNTH_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Print the documents as a JSON array instead of a script tag
    #[arg(long)]
    json: bool,

    /// Print the normalized record instead of the documents
    #[arg(long, conflicts_with = "json")]
    record: bool,
}

impl Cli {
    fn fetch_config(&self) -> FetchConfig {
        let mut config = FetchConfig {
            timeout_secs: self.timeout,
            ..FetchConfig::default()
        };
        if let Some(agent) = &self.user_agent {
            config.user_agent = agent.clone();
        }
        config
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

fn run(cli: &Cli) -> Result<String, Box<dyn std::error::Error>> {
    let limits = Limits::default();

    let (markup, base_url) = match (&cli.file, &cli.url, &cli.target) {
        (Some(path), Some(url), _) => (std::fs::read_to_string(path)?, url.clone()),
        (_, _, Some(target)) => {
            let document = HttpSource::new(&cli.fetch_config()).fetch(target)?;
            (document.markup, document.final_url)
        }
        _ => return Err("either a URL or --file with --url is required".into()),
    };

    if cli.record {
        let content = extract_content(&markup, &base_url, &limits)?;
        return Ok(serde_json::to_string_pretty(&content)?);
    }

    let documents = generate(&markup, &base_url, &limits)?;
    if cli.json {
        Ok(serde_json::to_string_pretty(&documents)?)
    } else {
        Ok(to_script_tag(&documents)?)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "schema synthesis failed");
            ExitCode::FAILURE
        }
    }
}
