use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gist_client::config::Config;
use gist_client::error::format_gist_error;
use gist_client::resource::{ContentField, ContentFilter, FilterSet, ListOptions, ScopeFilter};
use gist_client::{GistClient, GistError, NewGist};
use serde_json::Value;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Command-line client for GitHub gists
#[derive(Parser, Debug)]
#[command(name = "gist", version, about, long_about = None)]
struct Args {
    /// Personal access token (falls back to GITHUB_TOKEN, then the config file)
    #[arg(long, global = true)]
    token: Option<String>,

    /// API root, e.g. for GitHub Enterprise
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List gists across all pages
    List {
        /// List a user's public gists
        #[arg(long)]
        user: Option<String>,
        /// List your starred gists
        #[arg(long)]
        starred: bool,
        /// List all public gists
        #[arg(long)]
        public: bool,
        /// Only gists updated after this RFC 3339 timestamp
        #[arg(long)]
        since: Option<String>,
        /// Content filter as field=pattern (size, raw_url, filename, type, language, truncated, content)
        #[arg(long = "filter", value_name = "FIELD=PATTERN")]
        filters: Vec<String>,
        /// Fetch raw file contents into each gist
        #[arg(long)]
        raw_content: bool,
    },
    /// Show one gist
    Get { id: String },
    /// Show a gist at a given revision
    Revision { id: String, sha: String },
    /// List the revisions of a gist
    Commits { id: String },
    /// List the forks of a gist
    Forks { id: String },
    /// Create a gist from local files
    Create {
        #[arg(long = "file", required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        public: bool,
    },
    /// Delete a gist
    Delete { id: String },
    /// Fork a gist
    Fork { id: String },
    /// Star a gist
    Star { id: String },
    /// Unstar a gist
    Unstar { id: String },
    /// Check whether a gist is starred
    IsStarred { id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("gist started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("gist-client").join("gist.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".gist-client").join("gist.log");
    }
    PathBuf::from("gist.log")
}

/// Parse `field=pattern` into a content filter
fn parse_content_filter(raw: &str) -> Result<ContentFilter> {
    let (field, pattern) = raw
        .split_once('=')
        .with_context(|| format!("Filter {:?} must look like field=pattern", raw))?;
    let field = ContentField::parse(field.trim())
        .with_context(|| format!("Unknown filter field {:?}", field))?;
    Ok(ContentFilter::new(field, pattern))
}

fn list_filters(
    user: Option<String>,
    starred: bool,
    public: bool,
    since: Option<String>,
    filters: &[String],
) -> Result<FilterSet> {
    let mut set = FilterSet::new();
    if let Some(user) = user {
        set.push(ScopeFilter::UserName(user));
    }
    if starred {
        set.push(ScopeFilter::Starred(true));
    }
    if public {
        set.push(ScopeFilter::Public(true));
    }
    if let Some(since) = since {
        let since = chrono::DateTime::parse_from_rfc3339(&since)
            .with_context(|| format!("Invalid --since timestamp {:?}", since))?;
        set.push(ScopeFilter::Since(since.with_timezone(&chrono::Utc)));
    }
    for raw in filters {
        set.push(parse_content_filter(raw)?);
    }
    Ok(set)
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(client: &GistClient, command: Command) -> gist_client::Result<Value> {
    let value = match command {
        Command::List {
            user,
            starred,
            public,
            since,
            filters,
            raw_content,
        } => {
            let filter_by = list_filters(user, starred, public, since, &filters)
                .map_err(|e| GistError::Configuration(format!("{:#}", e)))?;
            let options = ListOptions::new(filter_by).with_raw_content(raw_content);
            Value::Array(client.get_all(&options).await?)
        }
        Command::Get { id } => client.get_one_by_id(&id).await?,
        Command::Revision { id, sha } => client.get_revision(&id, &sha).await?,
        Command::Commits { id } => Value::Array(client.list_commits(&id, &ListOptions::default()).await?),
        Command::Forks { id } => Value::Array(client.list_forks(&id, &ListOptions::default()).await?),
        Command::Create {
            files,
            description,
            public,
        } => {
            let mut gist = NewGist::new(public);
            if let Some(description) = description {
                gist = gist.description(description);
            }
            for path in files {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    GistError::Configuration(format!("cannot read {:?}: {}", path, e))
                })?;
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .ok_or_else(|| GistError::Configuration(format!("{:?} has no file name", path)))?;
                gist = gist.file(name, content);
            }
            client.create(&gist).await?
        }
        Command::Delete { id } => {
            client.delete(&id).await?;
            Value::Bool(true)
        }
        Command::Fork { id } => client.fork(&id).await?,
        Command::Star { id } => Value::Bool(client.star(&id).await?),
        Command::Unstar { id } => Value::Bool(client.unstar(&id).await?),
        Command::IsStarred { id } => Value::Bool(client.is_starred(&id).await?),
    };
    Ok(value)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let mut config = Config::load();
    if let Some(api_url) = &args.api_url {
        config.api_url = Some(api_url.clone());
    }

    let mut client = GistClient::from_config(&config).context("Failed to create HTTP client")?;
    if let Some(token) = config.effective_token(args.token.as_deref()) {
        tracing::debug!("Using token {}", gist_client::gist::auth::mask_token(&token));
        client.set_token(token);
    }

    match run(&client, args.command).await {
        Ok(value) => print_json(&value),
        Err(err) => {
            tracing::error!("{}", err);
            eprintln!("Error: {}", format_gist_error(&err));
            std::process::exit(1);
        }
    }
}
