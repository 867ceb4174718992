use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    dashboard::load_counts,
    load_settings,
    navigation::sidebar,
    resources::{
        AcademicYears, AttendanceReports, Classrooms, HealthReports, IndicatorReports, Indicators,
        LifeSkillReports, Roles, Students, Subjects, TeacherRoles, Teachers,
    },
    ClientSettings, Resource, ResourceGateway, RestGateway, Route,
};
use serde::Serialize;
use shared::protocol::{ListQuery, RESERVED_QUERY_KEYS};
use tracing_subscriber::EnvFilter;

/// Paths served by the admin front end, in sidebar order.
const ROUTE_PATTERNS: &[&str] = &[
    "/",
    "/login",
    "/register",
    "/dashboard",
    "/teachers",
    "/roles",
    "/teacher-roles",
    "/academic-years",
    "/classrooms",
    "/subjects",
    "/students",
    "/indicators",
    "/indicators/:subject_id",
    "/reports/attendance/:classroom_id",
    "/reports/indicator/:subject_id/:classroom_id",
    "/reports/lifeskill/:classroom_id",
    "/reports/health/:classroom_id",
];

#[derive(Parser, Debug)]
#[command(name = "ereport-admin", about = "Command line access to the e-report admin API")]
struct Cli {
    /// Settings file. Defaults to ./ereport.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the API base URL from the settings file and environment.
    #[arg(long)]
    api_base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one page of records as JSON.
    List {
        resource: ResourceKind,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
        /// Extra query filter, e.g. `--filter classroom_id=3`. Repeatable.
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
    },
    Show {
        resource: ResourceKind,
        id: i64,
    },
    Delete {
        resource: ResourceKind,
        id: i64,
    },
    /// Print the route table, or resolve a single path.
    Routes { path: Option<String> },
    /// Print headline counts.
    Dashboard,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ResourceKind {
    Teachers,
    Roles,
    TeacherRoles,
    Classrooms,
    Subjects,
    Students,
    AcademicYears,
    Indicators,
    AttendanceReports,
    IndicatorReports,
    LifeSkillReports,
    HealthReports,
}

/// Binds `$r` to the resource type selected by `$kind` and evaluates `$body`.
macro_rules! with_resource {
    ($kind:expr, $r:ident => $body:expr) => {
        match $kind {
            ResourceKind::Teachers => {
                type $r = Teachers;
                $body
            }
            ResourceKind::Roles => {
                type $r = Roles;
                $body
            }
            ResourceKind::TeacherRoles => {
                type $r = TeacherRoles;
                $body
            }
            ResourceKind::Classrooms => {
                type $r = Classrooms;
                $body
            }
            ResourceKind::Subjects => {
                type $r = Subjects;
                $body
            }
            ResourceKind::Students => {
                type $r = Students;
                $body
            }
            ResourceKind::AcademicYears => {
                type $r = AcademicYears;
                $body
            }
            ResourceKind::Indicators => {
                type $r = Indicators;
                $body
            }
            ResourceKind::AttendanceReports => {
                type $r = AttendanceReports;
                $body
            }
            ResourceKind::IndicatorReports => {
                type $r = IndicatorReports;
                $body
            }
            ResourceKind::LifeSkillReports => {
                type $r = LifeSkillReports;
                $body
            }
            ResourceKind::HealthReports => {
                type $r = HealthReports;
                $body
            }
        }
    };
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("filter `{raw}` has an empty key"));
    }
    if RESERVED_QUERY_KEYS.contains(&key) {
        return Err(format!("`{key}` has its own flag and cannot be used as a filter"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn settings(cli: &Cli) -> Result<ClientSettings> {
    let mut raw = load_settings(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(url) = &cli.api_base_url {
        raw.api_base_url = Some(url.clone());
    }
    raw.validate().context("invalid client configuration")
}

async fn list<R: Resource>(gateway: &RestGateway, query: ListQuery) -> Result<()> {
    let page = <RestGateway as ResourceGateway<R>>::list(gateway, &query)
        .await
        .with_context(|| format!("failed to list {}", R::PATH))?;
    print_json(&page)?;
    eprintln!(
        "page {} of {} ({} {} total)",
        page.page,
        page.page_count(),
        page.total,
        R::PATH
    );
    Ok(())
}

async fn show<R: Resource>(gateway: &RestGateway, raw_id: i64) -> Result<()> {
    let id = R::id_from_raw(raw_id);
    let record = <RestGateway as ResourceGateway<R>>::get(gateway, id)
        .await
        .with_context(|| format!("failed to fetch {} #{id}", R::LABEL))?;
    print_json(&record)
}

async fn delete<R: Resource>(gateway: &RestGateway, raw_id: i64) -> Result<()> {
    let id = R::id_from_raw(raw_id);
    <RestGateway as ResourceGateway<R>>::delete(gateway, id)
        .await
        .with_context(|| format!("failed to delete {} #{id}", R::LABEL))?;
    println!("deleted {} #{id}", R::LABEL);
    Ok(())
}

fn print_routes(path: Option<&str>) {
    match path {
        Some(path) => {
            let route = Route::parse(path);
            println!("{path} -> {route:?}");
            println!("  title:  {}", route.title());
            println!("  layout: {:?}", route.layout());
            if let Some(view) = route.not_found_view() {
                println!("  {} ({} -> {})", view.message, view.back_label, view.back_to);
            }
        }
        None => {
            for pattern in ROUTE_PATTERNS {
                println!("{pattern}");
            }
            println!();
            println!("sidebar:");
            for entry in sidebar() {
                println!("  {:<16} {}", entry.label, entry.route);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    if let Command::Routes { path } = &cli.command {
        print_routes(path.as_deref());
        return Ok(());
    }

    let settings = settings(&cli)?;
    let gateway = RestGateway::new(&settings).context("failed to build HTTP client")?;
    tracing::debug!(base_url = %gateway.base_url(), "gateway ready");

    match cli.command {
        Command::List {
            resource,
            search,
            page,
            page_size,
            filters,
        } => {
            if page == 0 {
                bail!("pages are numbered from 1");
            }
            let mut query = ListQuery::with_page_size(page_size.unwrap_or(settings.page_size));
            query.search = search.filter(|s| !s.trim().is_empty());
            query.page = page;
            query.filters.extend(filters);
            with_resource!(resource, R => list::<R>(&gateway, query).await)?;
        }
        Command::Show { resource, id } => {
            with_resource!(resource, R => show::<R>(&gateway, id).await)?;
        }
        Command::Delete { resource, id } => {
            with_resource!(resource, R => delete::<R>(&gateway, id).await)?;
        }
        Command::Dashboard => {
            let counts = load_counts(&gateway)
                .await
                .context("failed to load dashboard counts")?;
            println!("teachers:   {}", counts.teachers);
            println!("students:   {}", counts.students);
            println!("classrooms: {}", counts.classrooms);
            println!("subjects:   {}", counts.subjects);
        }
        Command::Routes { .. } => {}
    }

    Ok(())
}
