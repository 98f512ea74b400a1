use std::fmt;
use std::path::PathBuf;

use quiz_core::model::{LADDER_LEVELS, Question, set_name};
use storage::json::JsonQuestionDir;

#[derive(Debug, Clone)]
struct Args {
    dir: PathBuf,
    sets: u32,
    questions: u32,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSets { raw: String },
    InvalidQuestions { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSets { raw } => write!(f, "invalid --sets value: {raw}"),
            ArgsError::InvalidQuestions { raw } => write!(f, "invalid --questions value: {raw}"),
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut dir = std::env::var("QUIZ_DATA_DIR")
            .map_or_else(|_| PathBuf::from("data"), PathBuf::from)
            .join("questions");
        let mut sets = 7;
        let mut questions = LADDER_LEVELS;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--dir" => {
                    dir = PathBuf::from(require_value(&mut args, "--dir")?);
                }
                "--sets" => {
                    let value = require_value(&mut args, "--sets")?;
                    sets = value
                        .parse::<u32>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or(ArgsError::InvalidSets { raw: value })?;
                }
                "--questions" => {
                    let value = require_value(&mut args, "--questions")?;
                    questions = value
                        .parse::<u32>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or(ArgsError::InvalidQuestions { raw: value })?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            dir,
            sets,
            questions,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --dir <path>              Question set directory (default: $QUIZ_DATA_DIR/questions)");
    eprintln!("  --sets <n>                Number of set files to write (default: 7)");
    eprintln!("  --questions <n>           Questions per set (default: 15)");
    eprintln!("  -h, --help                Show this help");
}

/// Arithmetic placeholder questions; difficulty grows with set and level.
fn sample_question(set: u32, level: u32) -> Result<Question, Box<dyn std::error::Error>> {
    let a = u64::from(set) * 10 + u64::from(level);
    let b = u64::from(level) * u64::from(set) + 3;
    let answer = a + b;
    let correct = ((set + level) % 4) as usize;

    let options = (0..4_u64)
        .map(|slot| {
            let offset = slot.abs_diff(correct as u64);
            if slot < correct as u64 {
                (answer - offset).to_string()
            } else {
                (answer + offset).to_string()
            }
        })
        .collect();

    Ok(Question::new(format!("What is {a} + {b}?"), options, correct)?)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let target = JsonQuestionDir::new(&args.dir);
    for set in 1..=args.sets {
        let questions = (1..=args.questions)
            .map(|level| sample_question(set, level))
            .collect::<Result<Vec<_>, _>>()?;
        target.write_set(&set_name(set), &questions)?;
    }

    println!(
        "Wrote {} sets of {} questions into {}",
        args.sets,
        args.questions,
        args.dir.display()
    );

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
