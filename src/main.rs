use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::{Color, Colorize};
use logsift_lib::{FilterColor, Group, LogGroupingEngine, LogsiftConfig, RenderLine, Session, SubmitOutcome};
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ViewArg {
    Time,
    Preset,
    Both,
}

/// Group a log file by timestamp and by keyword filter.
#[derive(Debug, Parser)]
#[command(name = "logsift", version, about)]
struct Cli {
    /// Log file, or a .docx document
    file: PathBuf,

    /// Restrict the preset view to one registered filter
    #[arg(short, long)]
    filter: Option<String>,

    /// Filter the time view by a keyword, offering to register it if new
    #[arg(short, long)]
    custom: Option<String>,

    /// Register a new custom filter without asking
    #[arg(long, requires = "custom", conflicts_with = "no")]
    yes: bool,

    /// Apply a new custom filter once without registering it
    #[arg(long, requires = "custom")]
    no: bool,

    #[arg(long, value_enum, default_value_t = ViewArg::Both)]
    view: ViewArg,

    /// JSON file with preset filters: {"filters": {"keyword": "color"}}
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print groups as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let config = match &cli.config {
        Some(path) => LogsiftConfig::from_file(path)
            .with_context(|| format!("read config: {}", path.display()))?,
        None => LogsiftConfig::default(),
    };

    let mut session = Session::new(LogGroupingEngine::new(config.registry()));
    session.load_file(&cli.file);

    if let Some(filter) = cli.filter.as_deref() {
        session.select_preset_filter(Some(filter))?;
    }

    if let Some(custom) = cli.custom.as_deref() {
        if let SubmitOutcome::ConfirmationRequired { keyword } = session.submit_custom_filter(custom) {
            let accept = if cli.yes {
                true
            } else if cli.no {
                false
            } else {
                ask_add_filter(&keyword)?
            };
            session.confirm_add_filter(accept)?;
        }
    }

    let views = session.views();
    if cli.json {
        let json = match cli.view {
            ViewArg::Time => serde_json::to_string_pretty(&views.time)?,
            ViewArg::Preset => serde_json::to_string_pretty(&views.preset)?,
            ViewArg::Both => serde_json::to_string_pretty(&views)?,
        };
        println!("{json}");
        return Ok(());
    }

    if matches!(cli.view, ViewArg::Time | ViewArg::Both) {
        print_groups("All", &views.time);
    }
    if matches!(cli.view, ViewArg::Preset | ViewArg::Both) {
        print_groups("Preset Filters", &views.preset);
    }
    Ok(())
}

fn ask_add_filter(keyword: &str) -> Result<bool> {
    print!("Do you want to add '{keyword}' as a filter? [y/N] ");
    std::io::stdout().flush().context("flush stdout")?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn terminal_color(color: FilterColor) -> Color {
    match color {
        FilterColor::Green => Color::Green,
        FilterColor::Red => Color::Red,
        FilterColor::Blue => Color::Blue,
        FilterColor::Gray => Color::BrightBlack,
        FilterColor::Yellow => Color::Yellow,
        FilterColor::Cyan => Color::Cyan,
        FilterColor::Orange => Color::TrueColor { r: 255, g: 165, b: 0 },
        FilterColor::White => Color::White,
    }
}

fn print_groups(title: &str, groups: &[Group]) {
    println!("{}", format!("== {title} ==").bold());
    if groups.is_empty() {
        println!("  (no matching lines)");
    }
    for group in groups {
        let header = group.color.map(terminal_color).unwrap_or(Color::Blue);
        println!("{}", group.label.color(header).bold());
        for entry in &group.entries {
            match entry {
                RenderLine::Plain { text } => println!("    {text}"),
                RenderLine::Highlight {
                    prefix,
                    matched,
                    suffix,
                } => println!("    {prefix}{}{suffix}", matched.red().bold()),
            }
        }
    }
    println!();
}
