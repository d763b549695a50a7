//! VoltCheck CLI - REBT low-voltage installation checks from the command line.

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process;

use voltcheck::conduit::tables;
use voltcheck::{
    CableEntry, ConduitSizer, InstallationType, Outcome, Project, ProjectStore, TubeFamily,
    VerificationReport, VoltCheckCore,
};

#[derive(Parser)]
#[command(name = "voltcheck")]
#[command(about = "REBT low-voltage installation verification tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Size a conduit for a cable schedule
    Conduit {
        /// Cable spec, repeatable: `[QTYx]GAUGE[/CORES]`, e.g. `3x2.5` or `2x6/5`
        #[arg(short, long = "cable", value_name = "SPEC", required = true)]
        cables: Vec<String>,

        /// Installation environment
        #[arg(short, long, value_enum, default_value = "embedded")]
        install: InstallArg,

        /// Tube family
        #[arg(long, value_enum, default_value = "corrugated")]
        family: FamilyArg,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Verify a project snapshot file
    Check {
        /// Path to a project snapshot (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code when findings reach this state
        #[arg(long, value_enum)]
        fail_on: Option<FailOn>,
    },

    /// List the cable and conduit catalog
    Catalog {
        /// Show manufacturer lines per tube model
        #[arg(short, long)]
        verbose: bool,
    },

    /// Render a verification report from a project snapshot
    Report {
        /// Path to a project snapshot (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Report format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,

        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Manage the project store
    Project {
        /// Data directory holding the store files
        #[arg(long, value_name = "DIR")]
        data_dir: PathBuf,

        #[command(subcommand)]
        action: ProjectAction,
    },
}

#[derive(Subcommand)]
enum ProjectAction {
    /// List stored projects
    List,
    /// Create a project for a client
    New {
        #[arg(value_name = "CLIENT")]
        client: String,
    },
    /// Delete a project by id
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Print a project snapshot as JSON
    Export {
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum InstallArg {
    Surface,
    Embedded,
    Aerial,
}

impl From<InstallArg> for InstallationType {
    fn from(arg: InstallArg) -> Self {
        match arg {
            InstallArg::Surface => InstallationType::Surface,
            InstallArg::Embedded => InstallationType::Embedded,
            InstallArg::Aerial => InstallationType::Aerial,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FamilyArg {
    Corrugated,
    Rigid,
}

impl From<FamilyArg> for TubeFamily {
    fn from(arg: FamilyArg) -> Self {
        match arg {
            FamilyArg::Corrugated => TubeFamily::Corrugated,
            FamilyArg::Rigid => TubeFamily::Rigid,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripting
    Json,
}

#[derive(Clone, ValueEnum)]
enum ReportFormat {
    Text,
    Html,
}

#[derive(Clone, ValueEnum)]
enum FailOn {
    /// Fail only when a check failed
    Failed,
    /// Fail when any check failed or is still pending
    Pending,
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Conduit {
            cables,
            install,
            family,
            format,
        } => handle_conduit(&cables, install.into(), family.into(), format),
        Commands::Check {
            file,
            format,
            fail_on,
        } => handle_check(&file, format, fail_on),
        Commands::Catalog { verbose } => {
            handle_catalog(verbose);
            0
        }
        Commands::Report {
            file,
            format,
            output,
        } => handle_report(&file, format, output.as_deref()),
        Commands::Project { data_dir, action } => handle_project(&data_dir, action),
    };

    process::exit(exit_code);
}

/// Parse `[QTYx]GAUGE[/CORES]` into a cable entry.
fn parse_cable_spec(spec: &str) -> Result<CableEntry, String> {
    let (quantity, rest) = match spec.split_once('x') {
        Some((qty, rest)) => {
            let qty: u32 = qty
                .trim()
                .parse()
                .map_err(|_| format!("bad quantity in '{spec}'"))?;
            (qty, rest)
        }
        None => (1, spec),
    };

    let (gauge, cores) = match rest.split_once('/') {
        Some((gauge, cores)) => {
            let cores: u32 = cores
                .trim()
                .parse()
                .map_err(|_| format!("bad core count in '{spec}'"))?;
            (gauge, Some(cores))
        }
        None => (rest, None),
    };

    let gauge: f64 = gauge
        .trim()
        .replace(',', ".")
        .parse()
        .map_err(|_| format!("bad gauge in '{spec}'"))?;
    if quantity == 0 || gauge <= 0.0 {
        return Err(format!("'{spec}' has no cable in it"));
    }

    Ok(match cores {
        Some(cores) if cores > 1 => CableEntry::bundle(gauge, cores, quantity),
        _ => CableEntry::single(gauge, quantity),
    })
}

fn handle_conduit(
    specs: &[String],
    install: InstallationType,
    family: TubeFamily,
    format: OutputFormat,
) -> i32 {
    let mut cables = Vec::with_capacity(specs.len());
    for spec in specs {
        match parse_cable_spec(spec) {
            Ok(entry) => cables.push(entry),
            Err(e) => {
                eprintln!("Error: {e}");
                return 2;
            }
        }
    }

    let sizer = ConduitSizer::new(install, family);
    let result = match sizer.size(&cables) {
        Some(result) => result,
        None => {
            eprintln!("Error: empty cable schedule");
            return 2;
        }
    };

    match format {
        OutputFormat::Human => {
            println!("Recommended tube: {} mm", result.metric);
            println!(
                "  Required internal diameter: {:.1} mm (fill factor {})",
                result.required_diameter_mm, result.multiplier
            );
            println!("  Cataloged internal diameter: {:.1} mm", result.actual_diameter_mm);
            if !result.compliant {
                println!("  WARNING: schedule exceeds the largest cataloged tube");
            }
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                return 1;
            }
        },
    }

    if result.compliant {
        0
    } else {
        1
    }
}

fn handle_check(file: &PathBuf, format: OutputFormat, fail_on: Option<FailOn>) -> i32 {
    let project = match voltcheck::load_project_snapshot(file) {
        Ok(project) => project,
        Err(e) => {
            eprintln!("Error: {e}");
            return 2;
        }
    };

    let report = VoltCheckCore::verify_project(&project);
    match format {
        OutputFormat::Human => output_human(&report),
        OutputFormat::Json => output_json(&report),
    }

    match fail_on {
        Some(FailOn::Failed) if report.has_failures() => 1,
        Some(FailOn::Pending) if report.has_failures() || !report.is_complete() => 1,
        _ => 0,
    }
}

fn output_human(report: &VerificationReport) {
    if let Some(client) = &report.client_name {
        println!("\nClient: {client}");
    }
    println!("{}", "─".repeat(60));

    let failed: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.outcome == Outcome::Fail)
        .collect();
    let pending: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.outcome == Outcome::Pending)
        .collect();
    let passed: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.outcome == Outcome::Pass)
        .collect();

    if !failed.is_empty() {
        println!("\n  FAILED:");
        for finding in failed {
            println!("    - {} [{}]: {}", finding.subject, finding.check, finding.message);
        }
    }
    if !pending.is_empty() {
        println!("\n  PENDING:");
        for finding in pending {
            println!("    - {} [{}]: {}", finding.subject, finding.check, finding.message);
        }
    }
    if !passed.is_empty() {
        println!("\n  PASSED:");
        for finding in passed {
            println!("    - {} [{}]: {}", finding.subject, finding.check, finding.message);
        }
    }

    println!("\n  Summary:");
    println!("    Passed:  {}", report.stats.passed);
    println!("    Failed:  {}", report.stats.failed);
    println!("    Pending: {}", report.stats.pending);
}

fn output_json(report: &VerificationReport) {
    let output = serde_json::json!({
        "client": report.client_name,
        "findings": report.findings,
        "stats": {
            "passed": report.stats.passed,
            "failed": report.stats.failed,
            "pending": report.stats.pending,
        }
    });
    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error: {e}"),
    }
}

fn handle_catalog(verbose: bool) {
    println!("Cable gauges (mm²):");
    let gauges: Vec<String> = tables::CABLE_GAUGES.iter().map(|g| g.to_string()).collect();
    println!("  {}", gauges.join(", "));

    for family in [TubeFamily::Corrugated, TubeFamily::Rigid] {
        let label = match family {
            TubeFamily::Corrugated => "Corrugated",
            TubeFamily::Rigid => "Rigid",
        };
        println!("\n{label} tube internal diameters:");
        for metric in tables::METRIC_SIZES {
            if let Some(d) = tables::internal_diameter(family, metric) {
                println!("  M{metric:<3} {d:>5.1} mm");
            }
        }
        println!("\n{label} model lines:");
        for model in tables::models_for_family(family) {
            println!("  {}", model.name);
            if verbose {
                println!("    {}", model.manufacturers.join(", "));
            }
        }
    }
}

fn handle_report(file: &PathBuf, format: ReportFormat, output: Option<&std::path::Path>) -> i32 {
    let project = match voltcheck::load_project_snapshot(file) {
        Ok(project) => project,
        Err(e) => {
            eprintln!("Error: {e}");
            return 2;
        }
    };

    let document = voltcheck::compose_report(Some(&project.client_name), &project.data, Utc::now());
    let rendered = match format {
        ReportFormat::Text => document.render_text(),
        ReportFormat::Html => document.render_html(),
    };

    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, rendered) {
                eprintln!("Error: {e}");
                return 1;
            }
            println!("Report written to {}", path.display());
        }
        None => print!("{rendered}"),
    }
    0
}

fn handle_project(data_dir: &PathBuf, action: ProjectAction) -> i32 {
    let store = match ProjectStore::open(data_dir) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {e}");
            return 2;
        }
    };
    let mut projects = match store.load_projects() {
        Ok(projects) => projects,
        Err(e) => {
            eprintln!("Error: {e}");
            return 2;
        }
    };

    match action {
        ProjectAction::List => {
            if projects.is_empty() {
                println!("No projects");
                return 0;
            }
            for project in &projects {
                println!(
                    "{}  {}  (updated {})",
                    project.id,
                    project.client_name,
                    project.updated_at.format("%Y-%m-%d %H:%M")
                );
            }
            0
        }
        ProjectAction::New { client } => {
            let project = Project::new(&client, Utc::now());
            println!("{}", project.id);
            projects.insert(0, project);
            persist(&store, &projects)
        }
        ProjectAction::Delete { id } => {
            let before = projects.len();
            projects.retain(|p| p.id != id);
            if projects.len() == before {
                eprintln!("Error: no project with id {id}");
                return 1;
            }
            persist(&store, &projects)
        }
        ProjectAction::Export { id } => match projects.iter().find(|p| p.id == id) {
            Some(project) => match serde_json::to_string_pretty(project) {
                Ok(json) => {
                    println!("{json}");
                    0
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    1
                }
            },
            None => {
                eprintln!("Error: no project with id {id}");
                1
            }
        },
    }
}

fn persist(store: &ProjectStore, projects: &[Project]) -> i32 {
    match store.save_projects(projects) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}
