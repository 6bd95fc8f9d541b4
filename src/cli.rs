use std::{
    env,
    io::{self, IsTerminal, Write},
    process::{Command, Stdio},
    sync::Arc,
};

use anyhow::Context;
use chrono::{Local, NaiveDate};

use meal_planner::{
    backend::{RestClient, Session},
    controller::{CalendarController, ShoppingListAggregator},
    planner::ShoppingList,
    storage::config::Config,
    ui::week_view::{SlotState, WeekGrid},
};

pub const USAGE: &str =
    "Usage: meal-planner [--user ID] [--week [YYYY/MM/DD] | --shopping-list [YYYY/MM/DD] | --lists]";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CliMode {
    Week(NaiveDate),
    ShoppingList(NaiveDate),
    Lists,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CliArgs {
    pub mode: CliMode,
    pub user: Option<i64>,
}

pub fn parse_cli_args(args: impl IntoIterator<Item = String>, today: NaiveDate) -> Result<CliArgs, String> {
    let mut mode = CliMode::Week(today);
    let mut user = None;
    let mut args = args.into_iter().peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--week" | "--shopping-list" => {
                let target_date = match args.next_if(|next| !next.starts_with("--")) {
                    Some(date_str) => NaiveDate::parse_from_str(&date_str, "%Y/%m/%d")
                        .map_err(|_| format!("Invalid date '{}'. Use YYYY/MM/DD.", date_str))?,
                    None => today,
                };
                mode = if arg == "--week" {
                    CliMode::Week(target_date)
                } else {
                    CliMode::ShoppingList(target_date)
                };
            }
            "--lists" => mode = CliMode::Lists,
            "--user" => {
                let value = args.next().ok_or_else(|| "--user requires an id".to_string())?;
                let id = value
                    .parse::<i64>()
                    .map_err(|_| format!("Invalid user id '{}'", value))?;
                user = Some(id);
            }
            "--help" | "-h" => mode = CliMode::Help,
            _ => return Err(format!("Unknown argument: {}", arg)),
        }
    }

    Ok(CliArgs { mode, user })
}

pub fn parse_cli_mode() -> Result<CliArgs, String> {
    parse_cli_args(env::args().skip(1), Local::now().date_naive())
}

pub async fn run(args: CliArgs) -> anyhow::Result<()> {
    if args.mode == CliMode::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = Config::load_or_create().context("loading config")?;
    let session = Session::resolve(&config, args.user)?;
    let client = Arc::new(RestClient::from_config(&config.backend));
    let aggregator = ShoppingListAggregator::new(session, client.clone())
        .with_list_name(config.planner.shopping_list_name.clone());

    match args.mode {
        CliMode::Week(date) => {
            let controller = CalendarController::new(session, client.clone(), client, date)
                .with_default_servings(config.planner.default_servings);
            if let Err(e) = controller.load().await {
                eprintln!("Failed to load meal plans: {}", e);
            }
            let today = Local::now().date_naive();
            display_with_pager(&format_week_text(&controller.grid(today)))?;
        }
        CliMode::ShoppingList(date) => {
            let controller = CalendarController::new(session, client.clone(), client, date);
            let aggregator = aggregator.with_events(controller.event_bus());
            controller.refresh_week().await.context("loading the week's meal plans")?;
            let list = controller.generate_shopping_list(&aggregator).await?;
            display_with_pager(&format_shopping_list(&list))?;
        }
        CliMode::Lists => {
            let lists = aggregator.lists().await?;
            let text = if lists.is_empty() {
                "No shopping lists yet.".to_string()
            } else {
                lists.iter().map(format_shopping_list).collect::<Vec<_>>().join("\n\n")
            };
            display_with_pager(&text)?;
        }
        CliMode::Help => {}
    }

    Ok(())
}

fn format_week_text(grid: &WeekGrid) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Meal plan – {}", grid.label()));
    lines.push(String::new());

    for day in &grid.days {
        let marker = if day.is_today { " (today)" } else { "" };
        lines.push(format!("{}{}", day.date.format("%A %d %b"), marker));

        for cell in &day.meals {
            let entry = match &cell.state {
                SlotState::Occupied { title, servings, .. } => format!("{} ({} servings)", title, servings),
                SlotState::Empty => "-".to_string(),
            };
            lines.push(truncate_to_width(&format!("  {:<10} {}", cell.slot.meal_type.label(), entry), 80));
        }
        lines.push(String::new());
    }

    lines.push(format!("{} of 21 slots planned", grid.planned_count()));
    lines.join("\n")
}

fn format_shopping_list(list: &ShoppingList) -> String {
    let mut lines = vec![format!("{} (#{})", list.name, list.id)];

    if list.items.is_empty() {
        lines.push("  (empty)".to_string());
    }

    for item in &list.items {
        let check = if item.is_checked { "x" } else { " " };
        lines.push(format!("  [{}] {} × {}", check, item.ingredient, item.quantity));
    }

    lines.join("\n")
}

fn truncate_to_width(line: &str, width: usize) -> String {
    if width > 0 && line.chars().count() > width {
        let mut truncated = line.chars().take(width.saturating_sub(1)).collect::<String>();
        truncated.push('…');
        truncated
    } else {
        line.to_string()
    }
}

const DEFAULT_PAGER: &str = "less -FRX";

/// Pipes `text` through `$PAGER` on a terminal; prints it as-is otherwise.
fn display_with_pager(text: &str) -> io::Result<()> {
    if !io::stdout().is_terminal() {
        return print_plain(text);
    }

    let pager = env::var("PAGER").unwrap_or_else(|_| DEFAULT_PAGER.to_string());
    let Some((program, flags)) = split_command(&pager) else {
        return print_plain(text);
    };

    let mut child = match Command::new(program).args(flags).stdin(Stdio::piped()).spawn() {
        Ok(child) => child,
        Err(e) => {
            tracing::debug!("Pager '{}' unavailable: {}", program, e);
            return print_plain(text);
        }
    };

    if let Some(mut stdin) = child.stdin.take() {
        // Quitting the pager early closes the pipe.
        match stdin.write_all(text.as_bytes()) {
            Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e),
            _ => {}
        }
    }
    child.wait()?;
    Ok(())
}

fn split_command(command: &str) -> Option<(&str, Vec<&str>)> {
    let mut words = command.split_whitespace();
    let program = words.next()?;
    Some((program, words.collect()))
}

fn print_plain(text: &str) -> io::Result<()> {
    writeln!(io::stdout().lock(), "{text}")
}
