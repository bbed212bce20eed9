#![deny(missing_docs)]
//! Shipyard command-line interface.
//!
//! Lists, counts and edits ships through the Shipyard REST API.

mod client;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use client::{DEFAULT_SERVER_URL, ShipyardClient};
use shipyard_core::{
    PageRequest, Ship, ShipDraft, ShipFilter, ShipOrder, ShipType, ShipyardError, render_json,
    render_ships_markdown, render_ships_text,
};
use std::path::PathBuf;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "shipyard", version, about = "Shipyard CLI")]
struct Cli {
    /// Base URL of the Shipyard server.
    #[arg(
        long,
        global = true,
        env = "SHIPYARD_API_URL",
        default_value = DEFAULT_SERVER_URL
    )]
    server_url: String,
    #[command(subcommand)]
    command: Commands,
}

fn parse_ship_type(raw: &str) -> Result<ShipType, ShipyardError> {
    raw.trim().to_ascii_uppercase().parse()
}

fn parse_order(raw: &str) -> Result<ShipOrder, ShipyardError> {
    raw.trim().to_ascii_uppercase().parse()
}

#[derive(Args, Clone, Debug, Default)]
struct FilterArgs {
    /// Match ships whose name contains this text.
    #[arg(long)]
    name: Option<String>,
    /// Match ships whose planet contains this text.
    #[arg(long)]
    planet: Option<String>,
    /// Ship type: transport, military or merchant.
    #[arg(long, value_parser = parse_ship_type)]
    ship_type: Option<ShipType>,
    /// Produced at or after this RFC 3339 instant.
    #[arg(long)]
    after: Option<DateTime<Utc>>,
    /// Produced at or before this RFC 3339 instant.
    #[arg(long)]
    before: Option<DateTime<Utc>>,
    /// Match the used flag.
    #[arg(long)]
    is_used: Option<bool>,
    /// Lowest speed.
    #[arg(long)]
    min_speed: Option<f64>,
    /// Highest speed.
    #[arg(long)]
    max_speed: Option<f64>,
    /// Smallest crew.
    #[arg(long)]
    min_crew_size: Option<i32>,
    /// Largest crew.
    #[arg(long)]
    max_crew_size: Option<i32>,
    /// Lowest rating.
    #[arg(long)]
    min_rating: Option<f64>,
    /// Highest rating.
    #[arg(long)]
    max_rating: Option<f64>,
}

impl FilterArgs {
    fn to_filter(&self) -> ShipFilter {
        ShipFilter {
            name: self.name.clone(),
            planet: self.planet.clone(),
            ship_type: self.ship_type,
            after: self.after.map(|instant| instant.timestamp_millis()),
            before: self.before.map(|instant| instant.timestamp_millis()),
            is_used: self.is_used,
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            min_crew_size: self.min_crew_size,
            max_crew_size: self.max_crew_size,
            min_rating: self.min_rating,
            max_rating: self.max_rating,
        }
    }
}

#[derive(Args, Clone, Debug, Default)]
struct PageArgs {
    /// Sort key: id, speed, date or rating.
    #[arg(long, value_parser = parse_order)]
    order: Option<ShipOrder>,
    /// Zero-based page index.
    #[arg(long, allow_negative_numbers = true)]
    page_number: Option<i32>,
    /// Ships per page.
    #[arg(long, allow_negative_numbers = true)]
    page_size: Option<i32>,
}

impl PageArgs {
    fn to_page(&self) -> PageRequest {
        PageRequest {
            order: self.order,
            page_number: self.page_number,
            page_size: self.page_size,
        }
    }
}

#[derive(Args, Clone, Debug, Default)]
struct DraftArgs {
    /// Ship name.
    #[arg(long)]
    name: Option<String>,
    /// Home planet.
    #[arg(long)]
    planet: Option<String>,
    /// Ship type: transport, military or merchant.
    #[arg(long, value_parser = parse_ship_type)]
    ship_type: Option<ShipType>,
    /// Production instant (RFC 3339).
    #[arg(long)]
    prod_date: Option<DateTime<Utc>>,
    /// Whether the ship is used.
    #[arg(long)]
    is_used: Option<bool>,
    /// Cruising speed between 0.01 and 0.99.
    #[arg(long)]
    speed: Option<f64>,
    /// Crew headcount between 1 and 9999.
    #[arg(long)]
    crew_size: Option<i32>,
}

impl DraftArgs {
    fn to_draft(&self) -> ShipDraft {
        ShipDraft {
            name: self.name.clone(),
            planet: self.planet.clone(),
            ship_type: self.ship_type,
            prod_date: self.prod_date,
            is_used: self.is_used,
            speed: self.speed,
            crew_size: self.crew_size,
        }
    }
}

#[derive(Args, Clone, Debug, Default)]
struct OutputArgs {
    /// Output format for report data.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the report to a file instead of stdout.
    #[arg(long = "report-output")]
    report_output: Option<PathBuf>,
}

#[derive(ValueEnum, Copy, Clone, Debug, Default, Eq, PartialEq)]
enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List one page of ships matching the filters.
    List {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        page: PageArgs,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Count ships matching the filters.
    Count {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Show a single ship.
    Get {
        /// Ship identifier.
        id: i64,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Create a ship; every field except --is-used is required.
    Create {
        #[command(flatten)]
        draft: DraftArgs,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Update the given fields of a ship.
    Update {
        /// Ship identifier.
        #[arg(allow_negative_numbers = true)]
        id: i64,
        #[command(flatten)]
        draft: DraftArgs,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Delete a ship.
    Delete {
        /// Ship identifier.
        #[arg(allow_negative_numbers = true)]
        id: i64,
        #[command(flatten)]
        report: OutputArgs,
    },
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let client = client::ReqwestShipyardClient::new(&cli.server_url)?;
    run_command(&client, cli.command).await
}

#[cfg(test)]
fn main() {}

/// Execute `command` against `client` and emit its report.
async fn run_command<C: ShipyardClient>(client: &C, command: Commands) -> CliResult<()> {
    let (report, contents) = match command {
        Commands::List {
            filter,
            page,
            report,
        } => {
            let ships = client
                .list_ships(&filter.to_filter(), &page.to_page())
                .await?;
            let contents = render_ships(&ships, report.format)?;
            (report, contents)
        }
        Commands::Count { filter, report } => {
            let count = client.count_ships(&filter.to_filter()).await?;
            let contents = render_count(count, report.format)?;
            (report, contents)
        }
        Commands::Get { id, report } => {
            let ship = client.get_ship(id).await?;
            let contents = render_ship(&ship, report.format)?;
            (report, contents)
        }
        Commands::Create { draft, report } => {
            let ship = client.create_ship(&draft.to_draft()).await?;
            let contents = render_ship(&ship, report.format)?;
            (report, contents)
        }
        Commands::Update { id, draft, report } => {
            let ship = client.update_ship(id, &draft.to_draft()).await?;
            let contents = render_ship(&ship, report.format)?;
            (report, contents)
        }
        Commands::Delete { id, report } => {
            client.delete_ship(id).await?;
            let contents = render_deleted(id, report.format)?;
            (report, contents)
        }
    };
    emit_output(&report, contents).await
}

fn render_ships(ships: &[Ship], format: OutputFormat) -> CliResult<String> {
    Ok(match format {
        OutputFormat::Text => render_ships_text(ships),
        OutputFormat::Json => format!("{}\n", render_json(ships)?),
        OutputFormat::Markdown => render_ships_markdown(ships),
    })
}

fn render_ship(ship: &Ship, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", render_json(ship)?)),
        _ => render_ships(std::slice::from_ref(ship), format),
    }
}

fn render_count(count: u64, format: OutputFormat) -> CliResult<String> {
    Ok(match format {
        OutputFormat::Text => format!("{count} ships\n"),
        OutputFormat::Json => format!("{}\n", render_json(&count)?),
        OutputFormat::Markdown => format!("# Shipyard Fleet\n\n**Ships:** {count}\n"),
    })
}

fn render_deleted(id: i64, format: OutputFormat) -> CliResult<String> {
    Ok(match format {
        OutputFormat::Text => format!("Deleted ship {id}.\n"),
        OutputFormat::Json => format!(
            "{}\n",
            render_json(&serde_json::json!({ "deleted": id }))?
        ),
        OutputFormat::Markdown => format!("Deleted ship `{id}`.\n"),
    })
}

async fn emit_output(output: &OutputArgs, contents: String) -> CliResult<()> {
    if let Some(path) = &output.report_output {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
    } else {
        print!("{contents}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    fn ship(id: i64, name: &str) -> Ship {
        Ship {
            id,
            name: name.to_string(),
            planet: "Earth".to_string(),
            ship_type: ShipType::Merchant,
            prod_date: Utc.with_ymd_and_hms(3000, 1, 1, 0, 0, 0).unwrap(),
            is_used: false,
            speed: 0.5,
            crew_size: 10,
            rating: 2.0,
        }
    }

    fn temp_report(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("shipyard-cli-{}", std::process::id()))
            .join(name)
    }

    #[derive(Default)]
    struct RecordingClient {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingClient {
        fn record(&self, call: String) {
            self.calls.lock().expect("calls").push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls").clone()
        }
    }

    impl ShipyardClient for RecordingClient {
        fn list_ships<'a>(
            &'a self,
            filter: &'a ShipFilter,
            page: &'a PageRequest,
        ) -> Pin<Box<dyn Future<Output = CliResult<Vec<Ship>>> + Send + 'a>> {
            self.record(format!("list {:?} {:?}", filter.planet, page.page_size));
            Box::pin(async move { Ok(vec![ship(1, "Earther"), ship(2, "Lunar")]) })
        }

        fn count_ships<'a>(
            &'a self,
            filter: &'a ShipFilter,
        ) -> Pin<Box<dyn Future<Output = CliResult<u64>> + Send + 'a>> {
            self.record(format!("count {:?}", filter.is_used));
            Box::pin(async move { Ok(2) })
        }

        fn get_ship<'a>(
            &'a self,
            id: i64,
        ) -> Pin<Box<dyn Future<Output = CliResult<Ship>> + Send + 'a>> {
            self.record(format!("get {id}"));
            let result: CliResult<Ship> =
                Err(format!("server returned 404 Not Found: ship {id} not found").into());
            Box::pin(async move { result })
        }

        fn create_ship<'a>(
            &'a self,
            draft: &'a ShipDraft,
        ) -> Pin<Box<dyn Future<Output = CliResult<Ship>> + Send + 'a>> {
            self.record(format!("create {:?}", draft.name));
            Box::pin(async move { Ok(ship(5, "Earther")) })
        }

        fn update_ship<'a>(
            &'a self,
            id: i64,
            patch: &'a ShipDraft,
        ) -> Pin<Box<dyn Future<Output = CliResult<Ship>> + Send + 'a>> {
            self.record(format!("update {id} {:?}", patch.is_used));
            Box::pin(async move { Ok(ship(id, "Earther")) })
        }

        fn delete_ship<'a>(
            &'a self,
            id: i64,
        ) -> Pin<Box<dyn Future<Output = CliResult<()>> + Send + 'a>> {
            self.record(format!("delete {id}"));
            Box::pin(async move { Ok(()) })
        }
    }

    #[test]
    fn parses_list_flags_into_filter_and_page() {
        let cli = Cli::try_parse_from([
            "shipyard",
            "--server-url",
            "http://ships.local",
            "list",
            "--planet",
            "Earth",
            "--ship-type",
            "military",
            "--after",
            "3000-01-01T00:00:00Z",
            "--is-used",
            "false",
            "--order",
            "rating",
            "--page-size",
            "5",
            "--format",
            "json",
        ])
        .expect("parse");
        assert_eq!(cli.server_url, "http://ships.local");
        let Commands::List {
            filter,
            page,
            report,
        } = cli.command
        else {
            panic!("expected list command");
        };
        let filter = filter.to_filter();
        assert_eq!(filter.planet.as_deref(), Some("Earth"));
        assert_eq!(filter.ship_type, Some(ShipType::Military));
        assert_eq!(filter.after, Some(32_503_680_000_000));
        assert_eq!(filter.is_used, Some(false));
        let page = page.to_page();
        assert_eq!(page.order, Some(ShipOrder::Rating));
        assert_eq!(page.page_size, Some(5));
        assert_eq!(page.page_number, None);
        assert_eq!(report.format, OutputFormat::Json);
    }

    #[test]
    fn parses_update_fields_into_patch() {
        let cli = Cli::try_parse_from([
            "shipyard", "update", "3", "--speed", "0.7", "--is-used", "true",
        ])
        .expect("parse");
        let Commands::Update { id, draft, .. } = cli.command else {
            panic!("expected update command");
        };
        assert_eq!(id, 3);
        let draft = draft.to_draft();
        assert_eq!(draft.speed, Some(0.7));
        assert_eq!(draft.is_used, Some(true));
        assert!(draft.name.is_none());
    }

    #[test]
    fn rejects_unknown_ship_type_and_order() {
        assert!(Cli::try_parse_from(["shipyard", "list", "--ship-type", "yacht"]).is_err());
        assert!(Cli::try_parse_from(["shipyard", "list", "--order", "name"]).is_err());
    }

    #[test]
    fn renders_count_formats() {
        assert_eq!(render_count(3, OutputFormat::Text).expect("text"), "3 ships\n");
        assert_eq!(render_count(3, OutputFormat::Json).expect("json"), "3\n");
        assert!(
            render_count(3, OutputFormat::Markdown)
                .expect("markdown")
                .contains("**Ships:** 3")
        );
    }

    #[test]
    fn renders_single_ship_as_object() {
        let json = render_ship(&ship(4, "Earther"), OutputFormat::Json).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["id"], 4);
        assert_eq!(value["shipType"], "MERCHANT");

        let text = render_ship(&ship(4, "Earther"), OutputFormat::Text).expect("text");
        assert!(text.contains("Earther"));
    }

    #[test]
    fn renders_deleted_json() {
        let json = render_deleted(8, OutputFormat::Json).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["deleted"], 8);
    }

    #[tokio::test]
    async fn run_command_writes_list_report() {
        let client = RecordingClient::default();
        let path = temp_report("list.md");
        let command = Commands::List {
            filter: FilterArgs {
                planet: Some("Earth".to_string()),
                ..FilterArgs::default()
            },
            page: PageArgs {
                page_size: Some(2),
                ..PageArgs::default()
            },
            report: OutputArgs {
                format: OutputFormat::Markdown,
                report_output: Some(path.clone()),
            },
        };
        run_command(&client, command).await.expect("run");

        let contents = tokio::fs::read_to_string(&path).await.expect("report");
        assert!(contents.starts_with("# Shipyard Fleet"));
        assert!(contents.contains("Lunar"));
        assert_eq!(client.calls(), vec!["list Some(\"Earth\") Some(2)"]);
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn run_command_dispatches_edits() {
        let client = RecordingClient::default();
        let path = temp_report("edits.txt");
        let report = OutputArgs {
            format: OutputFormat::Text,
            report_output: Some(path.clone()),
        };
        let create = Commands::Create {
            draft: DraftArgs {
                name: Some("Earther".to_string()),
                ..DraftArgs::default()
            },
            report: report.clone(),
        };
        let update = Commands::Update {
            id: 5,
            draft: DraftArgs {
                is_used: Some(true),
                ..DraftArgs::default()
            },
            report: report.clone(),
        };
        let delete = Commands::Delete {
            id: 5,
            report: report.clone(),
        };
        run_command(&client, create).await.expect("create");
        run_command(&client, update).await.expect("update");
        run_command(&client, delete).await.expect("delete");

        let contents = tokio::fs::read_to_string(&path).await.expect("report");
        assert_eq!(contents, "Deleted ship 5.\n");
        assert_eq!(
            client.calls(),
            vec![
                "create Some(\"Earther\")",
                "update 5 Some(true)",
                "delete 5"
            ]
        );
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn run_command_propagates_client_errors() {
        let client = RecordingClient::default();
        let command = Commands::Get {
            id: 9,
            report: OutputArgs::default(),
        };
        let err = run_command(&client, command).await.unwrap_err();
        assert!(err.to_string().contains("ship 9 not found"));
        assert_eq!(client.calls(), vec!["get 9"]);
    }
}
