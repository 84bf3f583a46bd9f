use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use services::{AppServices, AppServicesError, ShuffleSource};
use tokio::io::{AsyncBufReadExt, BufReader};

mod console;
mod deferred;
mod logging;

use console::{Console, Flow};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSeed { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--catalog <dir>] [--memory] [--seed <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://quiz.sqlite3");
    eprintln!("  --catalog demos/catalog");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_CATALOG_DIR, QUIZ_LOG");
}

struct Args {
    /// `None` keeps session state in memory only.
    db_url: Option<String>,
    catalog_dir: PathBuf,
    seed: Option<u64>,
    log_filter: String,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = Some(
            std::env::var("QUIZ_DB_URL")
                .ok()
                .map_or_else(|| normalize_sqlite_url("quiz.sqlite3".into()), normalize_sqlite_url),
        );
        let mut catalog_dir = std::env::var("QUIZ_CATALOG_DIR")
            .map_or_else(|_| PathBuf::from("demos/catalog"), PathBuf::from);
        let log_filter = std::env::var("QUIZ_LOG").unwrap_or_else(|_| "info".into());
        let mut seed = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = Some(normalize_sqlite_url(value));
                }
                "--catalog" => {
                    catalog_dir = PathBuf::from(require_value(args, "--catalog")?);
                }
                "--memory" => db_url = None,
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    seed = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            catalog_dir,
            seed,
            log_filter,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim();
    let path = std::path::Path::new(trimmed.strip_prefix("sqlite:").unwrap_or(trimmed));
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

/// Open persistent storage, or fall back to process-local state when the
/// database is unusable. A missing catalog is still fatal.
async fn build_services(args: &Args) -> Result<AppServices, AppServicesError> {
    let Some(db_url) = args.db_url.as_deref() else {
        return AppServices::new_in_memory(&args.catalog_dir);
    };

    if let Err(err) = prepare_sqlite_file(db_url) {
        tracing::warn!(error = %err, db_url, "cannot prepare database file; state will not persist");
        return AppServices::new_in_memory(&args.catalog_dir);
    }

    match AppServices::new_sqlite(&args.catalog_dir, db_url).await {
        Err(AppServicesError::Sqlite(err)) => {
            tracing::warn!(error = %err, db_url, "storage unavailable; state will not persist");
            AppServices::new_in_memory(&args.catalog_dir)
        }
        other => other,
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    logging::init_tracing(&args.log_filter);

    let mut services = build_services(&args).await?;
    if let Some(seed) = args.seed {
        services = services.with_shuffle_source(ShuffleSource::seeded(seed));
    }
    tracing::info!(
        sources = services.catalog().source_count(),
        persistent = services.is_persistent(),
        "quiz ready"
    );

    let session = services.start_session().await;
    let mut console = Console::new(session, std::io::stdout());
    console.handle_line("show").await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if console.handle_line(&line).await? == Flow::Quit {
            break;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(|s| (*s).to_string());
        Args::parse(&mut iter)
    }

    #[test]
    fn memory_flag_disables_the_database() {
        let args = parse(&["--memory", "--seed", "42", "--catalog", "somewhere"]).unwrap();
        assert!(args.db_url.is_none());
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.catalog_dir, PathBuf::from("somewhere"));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(matches!(
            parse(&["--seed", "abc"]),
            Err(ArgsError::InvalidSeed { .. })
        ));
        assert!(matches!(
            parse(&["--db"]),
            Err(ArgsError::MissingValue { flag: "--db" })
        ));
        assert!(matches!(
            parse(&["--wat"]),
            Err(ArgsError::UnknownArg(_))
        ));
    }

    #[test]
    fn normalizes_relative_sqlite_paths() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/q.db".into()),
            "sqlite:///tmp/q.db"
        );
        assert_eq!(normalize_sqlite_url("sqlite:/tmp/q.db".into()), "sqlite:///tmp/q.db");
    }
}
