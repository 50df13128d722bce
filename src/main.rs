use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use sitecmp::areas::session::Session;
use sitecmp::artifacts::compare::Checks;
use sitecmp::artifacts::core::ReportSink;
use sitecmp::artifacts::links::HttpLinkValidator;
use sitecmp::commands::code::CodeOptions;
use sitecmp::commands::files::FilesOptions;
use sitecmp::commands::links::LinksOptions;
use sitecmp::config::Settings;
use sitecmp::logging;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sitecmp",
    version,
    author = "Sami Barbut-Dica",
    about = "Compare a production site against its development copy",
    long_about = "This tool compares a production site tree against a development copy, \
    either on the local filesystem or behind an FTP endpoint, and reports missing files, \
    size and modification time mismatches, differing code and broken links.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::Count,
        help = "Increase log verbosity (-v info, -vv debug, -vvv trace)"
    )]
    verbose: u8,
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        help = "Settings file (defaults to ./sitecmp.toml when present)"
    )]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "files",
        about = "Compare two site trees",
        long_about = "This command walks the production (left) and development (right) trees \
        and prints one row per file found on either side. Sites are local paths or \
        ftp://[user[:password]@]host[:port]/path URLs."
    )]
    Files {
        #[arg(index = 1, help = "The production site")]
        left: String,
        #[arg(index = 2, help = "The development site")]
        right: String,
        #[arg(long, help = "Compare the content of code files present on both sides")]
        code: bool,
        #[arg(long, help = "Count failing links inside code files")]
        links: bool,
        #[arg(
            long = "ext",
            value_name = "EXT",
            help = "Extension treated as code (repeatable, replaces the configured list)"
        )]
        extensions: Vec<String>,
        #[arg(long, help = "Column width used when diffing code")]
        width: Option<usize>,
        #[arg(long, help = "Number of links validated at the same time")]
        workers: Option<usize>,
    },
    #[command(
        name = "code",
        about = "Show two files side by side",
        long_about = "This command diffs two files line by line and prints them in two \
        aligned columns, or reports that they are identical."
    )]
    Code {
        #[arg(index = 1, help = "The production file")]
        left: String,
        #[arg(index = 2, help = "The development file")]
        right: String,
        #[arg(long, help = "Column width")]
        width: Option<usize>,
    },
    #[command(
        name = "links",
        about = "Check every link in a file",
        long_about = "This command finds every http(s) URL in a file and reports, line by line, \
        whether it works, redirects, is denied, broken, or unreachable."
    )]
    Links {
        #[arg(index = 1, help = "The file to scan")]
        file: String,
        #[arg(long, help = "Number of links validated at the same time")]
        workers: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut settings = Settings::load(cli.config.as_deref())?;
    apply_overrides(&mut settings, &cli.command);
    settings.validate()?;

    let validator = HttpLinkValidator::new(&settings.links)?;
    let sink = ReportSink::detect();
    let session = Session::new(settings, Box::new(validator), sink.writer());

    match cli.command {
        Commands::Files {
            left,
            right,
            code,
            links,
            ..
        } => {
            let mut checks = Checks::empty();
            checks.set(Checks::CONTENT, code);
            checks.set(Checks::LINKS, links);

            session.files(&FilesOptions {
                left,
                right,
                checks,
                cancel: None,
            })?;
        }
        Commands::Code { left, right, width } => {
            session.code(&CodeOptions { left, right, width })?;
        }
        Commands::Links { file, .. } => {
            session.links(&LinksOptions { path: file })?;
        }
    }

    session.writer().flush()?;
    sink.finish()
}

fn apply_overrides(settings: &mut Settings, command: &Commands) {
    match command {
        Commands::Files {
            extensions,
            width,
            workers,
            ..
        } => {
            if !extensions.is_empty() {
                settings.extensions = extensions.clone();
            }
            if let Some(width) = width {
                settings.column_width = *width;
            }
            if let Some(workers) = workers {
                settings.links.workers = *workers;
            }
        }
        Commands::Code { width, .. } => {
            if let Some(width) = width {
                settings.column_width = *width;
            }
        }
        Commands::Links { workers, .. } => {
            if let Some(workers) = workers {
                settings.links.workers = *workers;
            }
        }
    }
}
