mod console;

use std::fmt;
use std::path::PathBuf;

use services::{AppConfig, AppContext, Clock};

use crate::console::ConsoleHost;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSeed { raw: String },
    InvalidSetCount { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidSetCount { raw } => write!(f, "invalid --sets value: {raw}"),
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

struct Args {
    config: AppConfig,
    verbose: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--data-dir <path>] [--db <sqlite_url>] [--seed <n>]");
    eprintln!("                      [--sets <n>] [--verbose]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --data-dir data      (question sets in <data-dir>/questions)");
    eprintln!("  records and settings as JSON files in <data-dir> unless --db is given");
    eprintln!("  --sets 7");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DATA_DIR, QUIZ_DB_URL, QUIZ_SEED, RUST_LOG");
}

fn parse_seed(raw: String) -> Result<u64, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidSeed { raw })
}

/// Environment overrides, read once in `run` so parsing stays pure.
#[derive(Debug, Default)]
struct EnvDefaults {
    data_dir: Option<String>,
    db_url: Option<String>,
    seed: Option<String>,
}

impl EnvDefaults {
    fn from_process() -> Self {
        Self {
            data_dir: std::env::var("QUIZ_DATA_DIR").ok(),
            db_url: std::env::var("QUIZ_DB_URL").ok(),
            seed: std::env::var("QUIZ_SEED").ok(),
        }
    }
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: EnvDefaults,
    ) -> Result<Self, ArgsError> {
        let data_dir = env.data_dir.map_or_else(|| PathBuf::from("data"), PathBuf::from);
        let mut config = AppConfig::new(data_dir);
        config.db_url = env
            .db_url
            .filter(|raw| !raw.trim().is_empty())
            .map(normalize_sqlite_url);
        config.seed = env.seed.map(parse_seed).transpose()?;
        let mut verbose = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data-dir" => {
                    config.data_dir = PathBuf::from(require_value(args, "--data-dir")?);
                }
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    config.db_url = Some(normalize_sqlite_url(value));
                }
                "--seed" => {
                    config.seed = Some(parse_seed(require_value(args, "--seed")?)?);
                }
                "--sets" => {
                    let value = require_value(args, "--sets")?;
                    config.set_count = value
                        .parse::<u32>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or(ArgsError::InvalidSetCount { raw: value })?;
                }
                "--verbose" | "-v" => verbose = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { config, verbose })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// sqlx will not create a missing database file on its own.
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

/// Logs go to stderr so they never interleave with the game screens.
fn init_tracing(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv, EnvDefaults::from_process()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    init_tracing(args.verbose);

    if let Some(db_url) = &args.config.db_url {
        prepare_sqlite_file(db_url)?;
    }

    let ctx = AppContext::open(args.config, Clock::default()).await?;
    ConsoleHost::new(ctx).run().await?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_with(args: &[&str], env: EnvDefaults) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(|arg| (*arg).to_string());
        Args::parse(&mut iter, env)
    }

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        parse_with(args, EnvDefaults::default())
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&["--data-dir", "games", "--seed", "9", "--sets", "3", "-v"]).unwrap();
        assert_eq!(args.config.data_dir, PathBuf::from("games"));
        assert_eq!(args.config.seed, Some(9));
        assert_eq!(args.config.set_count, 3);
        assert!(args.verbose);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            parse(&["--seed", "abc"]),
            Err(ArgsError::InvalidSeed { .. })
        ));
        assert!(matches!(
            parse(&["--sets", "0"]),
            Err(ArgsError::InvalidSetCount { .. })
        ));
        assert!(matches!(
            parse(&["--db"]),
            Err(ArgsError::MissingValue { flag: "--db" })
        ));
        assert!(matches!(parse(&["--bogus"]), Err(ArgsError::UnknownArg(_))));
    }

    #[test]
    fn environment_sets_defaults_and_flags_win() {
        let env = || EnvDefaults {
            data_dir: Some("shared".into()),
            db_url: Some("sqlite::memory:".into()),
            seed: Some("4".into()),
        };

        let args = parse_with(&[], env()).unwrap();
        assert_eq!(args.config.data_dir, PathBuf::from("shared"));
        assert_eq!(args.config.db_url.as_deref(), Some("sqlite::memory:"));
        assert_eq!(args.config.seed, Some(4));

        let args = parse_with(&["--data-dir", "local", "--seed", "8"], env()).unwrap();
        assert_eq!(args.config.data_dir, PathBuf::from("local"));
        assert_eq!(args.config.seed, Some(8));
    }

    #[test]
    fn bad_seed_in_environment_is_rejected() {
        let env = EnvDefaults {
            seed: Some("x".into()),
            ..EnvDefaults::default()
        };
        assert!(matches!(
            parse_with(&[], env),
            Err(ArgsError::InvalidSeed { .. })
        ));
    }

    #[test]
    fn relative_db_path_becomes_absolute_url() {
        let url = normalize_sqlite_url("sqlite:quiz.sqlite3".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("quiz.sqlite3"));
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
    }
}
