use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use gradebook::grading::{compute_results, validate_category_weights, weight_issues};
use gradebook::output::{DisplayOptions, ReportView};
use gradebook::store::{GradeUpdate, Gradebook};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_DATA: i32 = 3;
const EXIT_CONFIG: i32 = 4;
const EXIT_WEIGHTS: i32 = 5;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show category results and the final grade (default if no subcommand)
    Show {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Report weight problems; exits non-zero if there are any
    Check,
    /// Manage categories
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },
    /// Manage activities inside a category
    Activity {
        #[command(subcommand)]
        command: ActivityCommand,
    },
    /// Remove every category and activity
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    /// List categories
    List,
    /// Add a category
    Add {
        name: String,
        /// Share of the final grade, 0-100
        #[arg(short, long, allow_negative_numbers = true)]
        weight: f64,
    },
    /// Rename a category or change its weight
    Update {
        /// Index (1-based), id, id prefix or name
        category: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long, allow_negative_numbers = true)]
        weight: Option<f64>,
    },
    /// Remove a category and its activities
    Remove {
        /// Index (1-based), id, id prefix or name
        category: String,
    },
}

#[derive(Subcommand, Debug)]
enum ActivityCommand {
    /// List the activities of a category
    List {
        /// Index (1-based), id, id prefix or name
        category: String,
    },
    /// Add an activity to a category
    Add {
        /// Index (1-based), id, id prefix or name
        category: String,
        name: String,
        /// Share of the category, 0-100
        #[arg(short, long, allow_negative_numbers = true)]
        weight: f64,
        /// Score 0-100; leave out while ungraded
        #[arg(short, long, allow_negative_numbers = true)]
        grade: Option<f64>,
    },
    /// Rename an activity, change its weight, or set/clear its grade
    Update {
        /// Index (1-based), id, id prefix or name
        category: String,
        /// Index (1-based), id, id prefix or name
        activity: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long, allow_negative_numbers = true)]
        weight: Option<f64>,
        #[arg(short, long, allow_negative_numbers = true, conflicts_with = "ungraded")]
        grade: Option<f64>,
        /// Clear the grade
        #[arg(long)]
        ungraded: bool,
    },
    /// Remove an activity
    Remove {
        /// Index (1-based), id, id prefix or name
        category: String,
        /// Index (1-based), id, id prefix or name
        activity: String,
    },
}

#[derive(Parser, Debug)]
#[command(name = "gradebook")]
#[command(about = "Weighted grade tracking CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/gradebook/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the gradebook state file (overrides the config file)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = gradebook::telemetry::init(cli.verbose) {
        eprintln!("Logging setup failed: {:#}", e);
    }

    let command = cli.command.unwrap_or(Commands::Show {
        format: OutputFormat::default(),
    });

    // Load and validate config
    let config = match gradebook::config::load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    if let Err(errors) = gradebook::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let data_path = match cli.data.or_else(|| config.data_file.clone()) {
        Some(p) => gradebook::config::expand_home(&p),
        None => match gradebook::store::get_storage_path() {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        },
    };
    tracing::debug!(path = %data_path.display(), "using state file");

    let mut book = match gradebook::store::load_gradebook(&data_path) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("State error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    let options = DisplayOptions {
        decimals: config.decimals(),
        passing_score: config.passing_score(),
    };
    let use_colors = gradebook::output::should_use_colors();

    match command {
        Commands::Show { format } => show(&book, format, &options, use_colors),
        Commands::Check => check(&book),
        Commands::Category {
            command: CategoryCommand::List,
        } => {
            println!(
                "{}",
                gradebook::output::format_category_list(book.categories(), use_colors)
            );
        }
        Commands::Activity {
            command: ActivityCommand::List { category },
        } => match book.find_category(&category) {
            Ok(c) => println!(
                "{}",
                gradebook::output::format_activity_list(c, &options, use_colors)
            ),
            Err(e) => {
                eprintln!("Error: {:#}", e);
                std::process::exit(EXIT_INPUT);
            }
        },
        Commands::Reset { yes: false } => {
            eprintln!("Refusing to remove all categories without --yes.");
            std::process::exit(EXIT_INPUT);
        }
        mutation => {
            let message = match apply(&mut book, mutation) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };
            if let Err(e) = gradebook::store::save_gradebook(&data_path, &book) {
                eprintln!("State error: {:#}", e);
                std::process::exit(EXIT_DATA);
            }
            println!("{}", message);
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

fn show(book: &Gradebook, format: OutputFormat, options: &DisplayOptions, use_colors: bool) {
    let report = compute_results(book.categories());
    let issues = weight_issues(book.categories());
    let view = ReportView {
        report: &report,
        weights_valid: validate_category_weights(book.categories()),
        issues: &issues,
    };

    match format {
        OutputFormat::Table => {
            println!(
                "{}",
                gradebook::output::format_results_table(&view, options, use_colors)
            );
        }
        OutputFormat::Tsv => {
            let output = gradebook::output::format_tsv(&view, options);
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        OutputFormat::Json => match gradebook::output::format_json(&view) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {:#}", e);
                std::process::exit(EXIT_DATA);
            }
        },
    }
}

fn check(book: &Gradebook) {
    let issues = weight_issues(book.categories());
    if issues.is_empty() {
        println!("Weights OK.");
        return;
    }

    eprintln!("Weight problems:");
    for issue in &issues {
        eprintln!("  - {}", issue);
    }
    std::process::exit(EXIT_WEIGHTS);
}

/// Run a mutating command and describe what changed
fn apply(book: &mut Gradebook, command: Commands) -> anyhow::Result<String> {
    let message = match command {
        Commands::Category { command } => match command {
            CategoryCommand::Add { name, weight } => {
                book.add_category(&name, weight)?;
                format!("Added category {} ({}%).", name.trim(), weight)
            }
            CategoryCommand::Update {
                category,
                name,
                weight,
            } => {
                book.update_category(&category, name.as_deref(), weight)?;
                format!("Updated category {}.", category)
            }
            CategoryCommand::Remove { category } => {
                let removed = book.remove_category(&category)?;
                format!(
                    "Removed category {} and {} activities.",
                    removed.name,
                    removed.activities.len()
                )
            }
            CategoryCommand::List => anyhow::bail!("category list does not modify the gradebook"),
        },
        Commands::Activity { command } => match command {
            ActivityCommand::Add {
                category,
                name,
                weight,
                grade,
            } => {
                book.add_activity(&category, &name, weight, grade)?;
                format!("Added activity {} to {}.", name.trim(), category)
            }
            ActivityCommand::Update {
                category,
                activity,
                name,
                weight,
                grade,
                ungraded,
            } => {
                let grade = match (grade, ungraded) {
                    (Some(g), _) => GradeUpdate::Set(g),
                    (None, true) => GradeUpdate::Clear,
                    (None, false) => GradeUpdate::Keep,
                };
                book.update_activity(&category, &activity, name.as_deref(), weight, grade)?;
                format!("Updated activity {} in {}.", activity, category)
            }
            ActivityCommand::Remove { category, activity } => {
                let removed = book.remove_activity(&category, &activity)?;
                format!("Removed activity {}.", removed.name)
            }
            ActivityCommand::List { .. } => {
                anyhow::bail!("activity list does not modify the gradebook")
            }
        },
        Commands::Reset { yes: true } => {
            let count = book.categories().len();
            book.clear();
            format!("Removed {} categories.", count)
        }
        Commands::Show { .. } | Commands::Check | Commands::Reset { yes: false } => {
            anyhow::bail!("command does not modify the gradebook")
        }
    };
    tracing::info!("{}", message);
    Ok(message)
}
