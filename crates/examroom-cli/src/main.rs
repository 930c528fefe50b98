mod client;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use examroom_core::{
    apply_view, check_candidate, find_unassigned, ConflictPolicy, Filter, Predicate, RoomStatus,
    ScheduleEntry, Snapshot, SortOrder, ViewConfig, Viewable,
};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};

use crate::client::BackendClient;

#[derive(Parser)]
#[command(name = "examroom")]
#[command(about = "Exam room utilization reports and schedule checks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-room utilization report
    Report {
        /// Snapshot file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the full report (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List students without an assignment
    Unassigned {
        /// Snapshot file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Check a new booking against the snapshot's schedules
    Conflicts {
        /// Snapshot file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Candidate schedule entry (YAML or JSON)
        #[arg(short, long)]
        candidate: PathBuf,

        /// enforce fails on any conflict, advisory only reports
        #[arg(long, default_value = "enforce")]
        policy: ConflictPolicy,

        /// The candidate is an edit of the stored entry with the same id
        #[arg(long)]
        editing: bool,
    },

    /// Search, filter, sort and paginate one collection
    View {
        /// Snapshot file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        #[arg(value_enum)]
        collection: Collection,

        #[arg(short, long, default_value = "")]
        search: String,

        /// Exact-match filter, FIELD=VALUE (repeatable)
        #[arg(short, long = "filter")]
        filters: Vec<String>,

        #[arg(long)]
        sort_by: Option<String>,

        #[arg(long)]
        desc: bool,

        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long, default_value_t = 10)]
        per_page: usize,
    },

    /// Download a snapshot from the backend
    Fetch {
        #[arg(long, env = "EXAMROOM_BACKEND_URL")]
        base_url: String,

        #[arg(long, env = "EXAMROOM_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Output file for the snapshot (JSON)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Ask the backend to run the seat assignment
    Assign {
        #[arg(long, env = "EXAMROOM_BACKEND_URL")]
        base_url: String,

        #[arg(long, env = "EXAMROOM_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Collection {
    Rooms,
    Students,
    Assignments,
    Schedules,
    Courses,
    Departments,
    RoomStats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Report { input, output } => {
            report_command(input, output)?;
        }
        Commands::Unassigned { input } => {
            unassigned_command(input)?;
        }
        Commands::Conflicts {
            input,
            candidate,
            policy,
            editing,
        } => {
            conflicts_command(input, candidate, policy, editing)?;
        }
        Commands::View {
            input,
            collection,
            search,
            filters,
            sort_by,
            desc,
            page,
            per_page,
        } => {
            let mut config = ViewConfig::default().search(search, &[]).page(page, per_page);
            for filter in &filters {
                config = config.filter(parse_filter(filter)?);
            }
            if let Some(field) = sort_by {
                let order = if desc { SortOrder::Desc } else { SortOrder::Asc };
                config = config.sort(field, order);
            }
            view_command(input, collection, &config)?;
        }
        Commands::Fetch {
            base_url,
            token,
            output,
        } => {
            fetch_command(&base_url, token, output)?;
        }
        Commands::Assign { base_url, token } => {
            let client = BackendClient::new(&base_url, token)?;
            println!("{}", "🚀 Running seat assignment...".bright_blue());
            let reply = client.run_assignment()?;
            println!("{} {}", "✅".bright_green(), reply.message);
        }
    }

    Ok(())
}

/// Reads YAML or JSON depending on the file extension.
fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    Ok(value)
}

fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    println!(
        "💾 Saved to {}",
        path.display().to_string().bright_white()
    );
    Ok(())
}

fn report_command(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    println!("{}", "🔍 Loading snapshot...".bright_blue());
    let snapshot: Snapshot = load(&input)?;

    println!(
        "  {} rooms ({} bookable), {} assignments",
        snapshot.rooms.len().to_string().bright_white().bold(),
        snapshot.bookable_rooms().count(),
        snapshot.assignments.len().to_string().bright_white().bold()
    );
    println!();

    let view = snapshot.dashboard();

    println!("{}", "📊 Room utilization:".bright_yellow().bold());
    for stat in &view.room_stats {
        let line = format!(
            "{} {}: {}/{} ({:.1}%)",
            stat.building_name,
            stat.room_number,
            stat.assigned_count,
            stat.capacity,
            stat.utilization_pct
        );
        let label = match stat.status {
            RoomStatus::Over => stat.status.label().bright_red().bold(),
            RoomStatus::Full => stat.status.label().bright_yellow(),
            RoomStatus::Free | RoomStatus::Good => stat.status.label().bright_green(),
        };
        println!("    • {} {}", line.bright_white(), label);
    }
    println!();

    let summary = &view.summary;
    println!(
        "  Seats used: {}/{} ({:.1}%)",
        summary.total_assigned,
        summary.total_capacity,
        summary.overall_utilization_pct
    );
    if summary.over_capacity_rooms > 0 {
        println!(
            "  {} rooms over capacity",
            summary.over_capacity_rooms.to_string().bright_red().bold()
        );
    }
    if summary.orphaned_assignments > 0 {
        println!(
            "  {} assignments reference unknown rooms",
            summary.orphaned_assignments.to_string().bright_yellow()
        );
    }
    println!(
        "  Unassigned students: {}",
        summary.unassigned_students.to_string().bright_white()
    );
    println!();

    if let Some(output_path) = output {
        save_json(&output_path, &view)?;
    }

    Ok(())
}

fn unassigned_command(input: PathBuf) -> Result<()> {
    let snapshot: Snapshot = load(&input)?;
    let unassigned = find_unassigned(&snapshot.students, &snapshot.assignments);

    if unassigned.is_empty() {
        println!("{}", "✅ Every student has a seat".bright_green().bold());
        return Ok(());
    }

    println!(
        "{} {} of {} students have no seat:",
        "⚠️".bright_yellow(),
        unassigned.len().to_string().bright_white().bold(),
        snapshot.students.len()
    );
    for student in &unassigned {
        println!(
            "    • {} {}",
            student.full_name().bright_white(),
            student.student_number.as_deref().unwrap_or("").dimmed()
        );
    }

    Ok(())
}

fn conflicts_command(
    input: PathBuf,
    candidate: PathBuf,
    policy: ConflictPolicy,
    editing: bool,
) -> Result<()> {
    let snapshot: Snapshot = load(&input)?;
    let candidate: ScheduleEntry = load(&candidate)?;

    println!(
        "{} {} {} on {} {}-{}",
        "🔍 Checking".bright_blue(),
        candidate.building_code,
        candidate.room_number,
        candidate.date,
        candidate.start_time,
        candidate.end_time
    );

    let exclude_id = if editing {
        Some(
            candidate
                .id
                .as_ref()
                .context("--editing needs a candidate with an id")?,
        )
    } else {
        None
    };
    let conflicts = check_candidate(&candidate, &snapshot.schedules, exclude_id, policy)?;

    if conflicts.is_empty() {
        println!("{}", "✅ Room is free".bright_green().bold());
    } else {
        println!(
            "{}",
            format!("⚠️  {} conflicting bookings:", conflicts.len())
                .bright_yellow()
                .bold()
        );
        for entry in &conflicts {
            println!(
                "    • {} {}-{}",
                entry.title.bright_white(),
                entry.start_time,
                entry.end_time
            );
        }
    }

    Ok(())
}

fn view_command(input: PathBuf, collection: Collection, config: &ViewConfig) -> Result<()> {
    let snapshot: Snapshot = load(&input)?;

    let json = match collection {
        Collection::Rooms => render_page(&snapshot.rooms, config)?,
        Collection::Students => render_page(&snapshot.students, config)?,
        Collection::Assignments => render_page(&snapshot.assignments, config)?,
        Collection::Schedules => render_page(&snapshot.schedules, config)?,
        Collection::Courses => render_page(&snapshot.courses, config)?,
        Collection::Departments => render_page(&snapshot.departments, config)?,
        Collection::RoomStats => render_page(&snapshot.dashboard().room_stats, config)?,
    };
    println!("{}", json);

    Ok(())
}

fn render_page<T: Viewable + Clone + Serialize>(items: &[T], config: &ViewConfig) -> Result<String> {
    let page = apply_view(items, config);
    eprintln!(
        "{}",
        format!(
            "Page {}/{} ({} matching)",
            page.page, page.total_pages, page.total_items
        )
        .dimmed()
    );
    Ok(serde_json::to_string_pretty(&page)?)
}

fn parse_filter(raw: &str) -> Result<Filter> {
    let (field, value) = raw
        .split_once('=')
        .with_context(|| format!("Filter '{}' must look like FIELD=VALUE", raw))?;
    Ok(Filter::new(field.trim(), Predicate::Equals(value.trim().into())))
}

fn fetch_command(base_url: &str, token: Option<String>, output: PathBuf) -> Result<()> {
    println!(
        "{} {}",
        "🌐 Fetching snapshot from".bright_blue(),
        base_url.bright_white()
    );

    let client = BackendClient::new(base_url, token)?;
    let snapshot = client.fetch_snapshot()?;

    println!(
        "  {} rooms, {} students, {} assignments, {} schedules",
        snapshot.rooms.len(),
        snapshot.students.len(),
        snapshot.assignments.len(),
        snapshot.schedules.len()
    );
    if snapshot.is_empty() {
        println!(
            "{}",
            "⚠️  Backend returned no data; check the URL and token".bright_yellow()
        );
    }

    save_json(&output, &snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        let filter = parse_filter("room_type = lecture").unwrap();
        assert_eq!(filter.field, "room_type");
        assert_eq!(filter.predicate, Predicate::Equals("lecture".into()));

        assert!(parse_filter("room_type").is_err());
    }

    #[test]
    fn test_cli_parses_view_arguments() {
        let cli = Cli::try_parse_from([
            "examroom",
            "view",
            "--input",
            "snapshot.yaml",
            "room-stats",
            "--filter",
            "status=over",
            "--sort-by",
            "utilization_pct",
            "--desc",
        ])
        .unwrap();

        match cli.command {
            Commands::View {
                collection,
                filters,
                desc,
                ..
            } => {
                assert!(matches!(collection, Collection::RoomStats));
                assert_eq!(filters, vec!["status=over".to_string()]);
                assert!(desc);
            }
            _ => panic!("expected view command"),
        }
    }

    #[test]
    fn test_cli_parses_conflict_policy() {
        let cli = Cli::try_parse_from([
            "examroom",
            "conflicts",
            "-i",
            "snapshot.json",
            "-c",
            "candidate.json",
            "--policy",
            "enforce",
        ])
        .unwrap();

        match cli.command {
            Commands::Conflicts { policy, .. } => assert_eq!(policy, ConflictPolicy::Enforce),
            _ => panic!("expected conflicts command"),
        }
    }

    #[test]
    fn test_cli_conflict_defaults_enforce() {
        let cli = Cli::try_parse_from([
            "examroom",
            "conflicts",
            "-i",
            "snapshot.json",
            "-c",
            "candidate.json",
        ])
        .unwrap();

        match cli.command {
            Commands::Conflicts {
                policy, editing, ..
            } => {
                assert_eq!(policy, ConflictPolicy::Enforce);
                assert!(!editing);
            }
            _ => panic!("expected conflicts command"),
        }

        let cli = Cli::try_parse_from([
            "examroom",
            "conflicts",
            "-i",
            "snapshot.json",
            "-c",
            "candidate.json",
            "--policy",
            "advisory",
            "--editing",
        ])
        .unwrap();

        match cli.command {
            Commands::Conflicts {
                policy, editing, ..
            } => {
                assert_eq!(policy, ConflictPolicy::Advisory);
                assert!(editing);
            }
            _ => panic!("expected conflicts command"),
        }
    }
}
