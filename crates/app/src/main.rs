use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, LogicalSize, WindowBuilder};
use grades_core::model::CourseId;
use services::{AppServices, GradebookApi};
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://grades.sqlite3";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidLogLevel { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidLogLevel { raw } => write!(f, "invalid --log-level value: {raw}"),
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

struct DesktopApp {
    gradebook: Arc<dyn GradebookApi>,
}

impl UiApp for DesktopApp {
    fn gradebook(&self) -> Arc<dyn GradebookApi> {
        Arc::clone(&self.gradebook)
    }
}

struct Args {
    db_url: String,
    log_level: String,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui     [--db <sqlite_url>] [--log-level <filter>]");
    eprintln!("  cargo run -p app -- seed   [--db <sqlite_url>] [--log-level <filter>]");
    eprintln!("  cargo run -p app -- export [--db <sqlite_url>] [--log-level <filter>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --log-level {DEFAULT_LOG_LEVEL}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  GRADES_DB_URL, GRADES_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Seed,
    Export,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "seed" => Some(Self::Seed),
            "export" => Some(Self::Export),
            _ => None,
        }
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("GRADES_DB_URL")
            .ok()
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut log_level =
            std::env::var("GRADES_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--log-level" => {
                    let value = require_value(args, "--log-level")?;
                    if EnvFilter::try_new(&value).is_err() {
                        return Err(ArgsError::InvalidLogLevel { raw: value });
                    }
                    log_level = value;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, log_level })
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
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing(&parsed.log_level);
    tracing::debug!(command = ?cmd, db_url = %parsed.db_url, "starting");

    // Open + migrate SQLite here so services stay storage-agnostic.
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url).await?;

    match cmd {
        Command::Ui => {
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                gradebook: services.gradebook_api(),
            });
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Grades")
                    .with_inner_size(LogicalSize::new(1280.0, 800.0))
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Seed => {
            let course_id = seed_demo_course(services.gradebook_api().as_ref()).await?;
            tracing::info!(%course_id, "demo course seeded");
            println!("seeded demo course {course_id} into {}", parsed.db_url);
            Ok(())
        }
        Command::Export => {
            let snapshot = services.gradebook().snapshot().await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            Ok(())
        }
    }
}

#[derive(Debug)]
struct SeedError(String);

impl fmt::Display for SeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seed failed: {}", self.0)
    }
}

impl std::error::Error for SeedError {}

async fn seed_demo_course(api: &dyn GradebookApi) -> Result<CourseId, SeedError> {
    let created = api.add_course("Demo Course").await;
    let course_id = created
        .created_course
        .ok_or_else(|| SeedError(created.message.clone()))?;

    for (name, weight, assessments) in [("Mathematics", 2.0, 3), ("History", 1.0, 2)] {
        let envelope = api.add_subject(course_id, name, weight, assessments).await;
        if !envelope.is_success() {
            return Err(SeedError(envelope.message));
        }
    }

    let mut last = created;
    for name in ["Alice", "Bruno", "Carla"] {
        last = api.add_student(course_id, name).await;
        if !last.is_success() {
            return Err(SeedError(last.message));
        }
    }

    let course = last
        .snapshot
        .as_ref()
        .and_then(|snapshot| snapshot.course(course_id))
        .ok_or_else(|| SeedError("demo course missing after insert".into()))?;
    let sample = [["8, 7.5, 9", "6, 7"], ["5, 6, 6.5", "9, 8.5"], ["10, 9, 9.5", "7"]];
    for (student, texts) in course.students().iter().zip(sample) {
        let grades: BTreeMap<_, _> = course
            .subjects()
            .iter()
            .zip(texts)
            .map(|(subject, text)| (subject.id(), text.to_string()))
            .collect();
        let envelope = api.save_student_grades(course_id, student.id(), &grades).await;
        if !envelope.is_success() {
            return Err(SeedError(envelope.message));
        }
    }

    Ok(course_id)
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

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // Binary glue: report once and exit.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_explicit_sqlite_urls() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/grades.db".into()),
            "sqlite:///tmp/grades.db"
        );
    }

    #[test]
    fn makes_relative_paths_absolute() {
        let url = normalize_sqlite_url("sqlite:data/grades.db".into());
        assert!(url.starts_with("sqlite:///"), "{url}");
        assert!(url.ends_with("data/grades.db"), "{url}");
    }

    #[test]
    fn parses_flags() {
        let mut args = ["--db", "sqlite::memory:", "--log-level", "debug"]
            .into_iter()
            .map(String::from);
        let parsed = Args::parse(&mut args).unwrap();
        assert_eq!(parsed.db_url, "sqlite::memory:");
        assert_eq!(parsed.log_level, "debug");
    }

    #[test]
    fn rejects_unknown_and_incomplete_flags() {
        let mut unknown = ["--verbose"].into_iter().map(String::from);
        assert!(matches!(
            Args::parse(&mut unknown),
            Err(ArgsError::UnknownArg(arg)) if arg == "--verbose"
        ));

        let mut missing = ["--db"].into_iter().map(String::from);
        assert!(matches!(
            Args::parse(&mut missing),
            Err(ArgsError::MissingValue { flag: "--db" })
        ));
    }

    #[tokio::test]
    async fn seed_builds_ranked_demo_course() {
        let services = AppServices::in_memory();
        let course_id = seed_demo_course(services.gradebook_api().as_ref()).await.unwrap();

        let snapshot = services.gradebook().snapshot().await.unwrap();
        let course = snapshot.course(course_id).unwrap();
        assert_eq!(course.subjects().len(), 2);
        assert_eq!(course.students()[0].name(), "Carla");
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["courses"][0]["name"], "Demo Course");
    }
}
