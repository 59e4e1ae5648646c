use bmi_core::*;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "bmi")]
#[command(about = "Body Mass Index calculator with history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate BMI and record it (default)
    Calc {
        /// Weight in kilograms (prompted for if omitted)
        #[arg(long, allow_hyphen_values = true)]
        weight: Option<String>,

        /// Height in meters (prompted for if omitted)
        #[arg(long, allow_hyphen_values = true)]
        height: Option<String>,

        /// Record under this user id instead of a new user_N
        #[arg(long)]
        user: Option<String>,

        /// Dry run - show the result without saving it
        #[arg(long)]
        dry_run: bool,
    },

    /// List recorded BMI values
    History {
        /// Only show this user
        #[arg(long)]
        user: Option<String>,
    },

    /// Plot BMI over time
    Chart {
        /// Only plot this user
        #[arg(long)]
        user: Option<String>,

        /// Plot width in characters
        #[arg(long)]
        width: Option<usize>,

        /// Plot height in lines
        #[arg(long)]
        height: Option<usize>,
    },

    /// Export the full history as CSV
    Export {
        /// Destination CSV file
        #[arg(long, short)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    bmi_core::logging::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::InvalidInput(msg)) => {
            eprintln!("Input error: {}", msg);
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let history_path = match cli.data_dir {
        Some(dir) => config.data.history_path_in(&dir),
        None => config.data.history_path(),
    };

    match cli.command {
        Some(Commands::Calc {
            weight,
            height,
            user,
            dry_run,
        }) => cmd_calc(&history_path, weight, height, user, dry_run),
        Some(Commands::History { user }) => cmd_history(&history_path, user),
        Some(Commands::Chart {
            user,
            width,
            height,
        }) => {
            let mut options = ChartOptions::from(&config.chart);
            if let Some(width) = width {
                options.width = width;
            }
            if let Some(height) = height {
                options.height = height;
            }
            cmd_chart(&history_path, user, options)
        }
        Some(Commands::Export { output }) => cmd_export(&history_path, &output),
        None => {
            // Default to "calc" command
            cmd_calc(&history_path, None, None, None, false)
        }
    }
}

fn cmd_calc(
    history_path: &Path,
    weight: Option<String>,
    height: Option<String>,
    user: Option<String>,
    dry_run: bool,
) -> Result<()> {
    let mut tracker = Tracker::open(history_path)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let weight = match weight {
        Some(w) => w,
        None => prompt(&mut input, "Weight (kg): ")?,
    };
    let height = match height {
        Some(h) => h,
        None => prompt(&mut input, "Height (m): ")?,
    };

    let weight = parse_measurement("weight", &weight)?;
    let height = parse_measurement("height", &height)?;

    if dry_run {
        let reading = tracker.preview(weight, height)?;
        display_reading(&reading);
        println!("\n[Dry run - not saved]");
        return Ok(());
    }

    let selector = match user {
        Some(id) => UserSelector::Explicit(id),
        None => UserSelector::Next,
    };
    let user_id = tracker.resolve_user(&selector)?;
    let reading = tracker.calculate(weight, height, &selector)?;

    display_reading(&reading);
    println!("\n✓ Saved as {}", user_id);
    Ok(())
}

fn cmd_history(history_path: &Path, user: Option<String>) -> Result<()> {
    let store = Store::load(history_path)?;
    let rows = match user.as_deref() {
        Some(user) => history::rows_for(&store, user),
        None => history::rows(&store),
    };

    if rows.is_empty() {
        println!("No history yet.");
        return Ok(());
    }

    println!("{:<12} {:<17} {:>6}  {}", "User", "Date", "BMI", "Category");
    println!("{}", "─".repeat(50));
    for row in &rows {
        println!(
            "{:<12} {:<17} {:>6.2}  {}",
            row.user,
            row.date,
            row.bmi,
            row.category()
        );
    }
    Ok(())
}

fn cmd_chart(history_path: &Path, user: Option<String>, options: ChartOptions) -> Result<()> {
    let store = Store::load(history_path)?;
    let series: Vec<Series> = match user.as_deref() {
        Some(user) => chart::series_for(&store, user).into_iter().collect(),
        None => chart::series(&store),
    };

    print!("{}", chart::render(&series, options));
    Ok(())
}

fn cmd_export(history_path: &Path, output: &Path) -> Result<()> {
    let store = Store::load(history_path)?;
    let count = export::write_csv(&store, output)?;

    println!("✓ Exported {} records", count);
    println!("  CSV: {}", output.display());
    Ok(())
}

fn display_reading(reading: &BmiReading) {
    println!("BMI: {:.2}", reading.bmi);
    println!("Category: {}", reading.category);
}

fn prompt(input: &mut impl BufRead, label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
