//! `nhatro` - command line access to the boarding house API
//!
//! Configuration comes from the environment (`NHATRO_API_URL`, ...) or a
//! `.env` file; flags override it. The session is kept in a JSON file so
//! `login` carries over to later invocations.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use nhatro_client::models::{Room, UserProfile};
use nhatro_client::{ClientConfig, ClientError, ErrorKind, ListPayload, NhaTroClient, QueryParams};

const DEFAULT_SESSION_FILE: &str = "nhatro-session.json";

#[derive(Debug, Parser)]
#[command(name = "nhatro", about = "Boarding house management client", version)]
struct Cli {
    /// API root URL; falls back to `NHATRO_API_URL`
    #[arg(long, value_name = "url")]
    api_url: Option<String>,

    /// Session file; falls back to `NHATRO_SESSION_FILE`, then ./nhatro-session.json
    #[arg(long, value_name = "path")]
    session_file: Option<PathBuf>,

    #[arg(long, default_value = "warn", env = "NHATRO_LOG_LEVEL")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and store the session
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "NHATRO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// End the session
    Logout,
    /// Show the logged-in account
    Whoami,
    /// List rooms
    Rooms {
        /// Only rooms free to rent
        #[arg(long)]
        available: bool,
        #[arg(long)]
        page: Option<u64>,
        #[arg(long)]
        search: Option<String>,
    },
    /// List employees
    Employees {
        #[arg(long)]
        page: Option<u64>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Compare a month's revenue with the month before
    Report {
        #[arg(long)]
        year: i32,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    nhatro_client::logging::init_logging(&cli.log_level, cli.json_logs)?;

    let mut config = ClientConfig::from_env_with_base_url(cli.api_url.clone())
        .context("Failed to load configuration")?;
    config.session_file = cli
        .session_file
        .clone()
        .or(config.session_file)
        .or_else(|| Some(PathBuf::from(DEFAULT_SESSION_FILE)));

    let client = NhaTroClient::new(&config).context("Failed to create client")?;
    tracing::debug!(base_url = %config.base_url, "Client ready");

    let token = client.session().token();
    if let Err(err) = run(&client, cli.command).await {
        if client.auth().handle_failure(&err, token.as_deref()) {
            eprintln!("Phiên đăng nhập đã hết hạn, vui lòng đăng nhập lại.");
        }
        report(&err);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(client: &NhaTroClient, command: Command) -> Result<(), ClientError> {
    match command {
        Command::Login { username, password } => {
            let user = client.auth().login(&username, &password).await?;
            println!("Đăng nhập thành công: {}", describe(&user));
        }
        Command::Logout => {
            client.auth().logout().await;
            println!("Đã đăng xuất.");
        }
        Command::Whoami => {
            let user = client.auth().refresh_current_user(None).await?;
            println!("{}", describe(&user));
        }
        Command::Rooms {
            available,
            page,
            search,
        } => {
            let rooms = if available {
                client.rooms().available(None).await?.data.unwrap_or_default()
            } else {
                let query = QueryParams::new()
                    .with_opt("page", page)
                    .with_opt("search", search);
                let payload = client.rooms().list(query, None).await?.data;
                print_page_info(payload.as_ref());
                payload.map(ListPayload::into_items).unwrap_or_default()
            };
            for room in &rooms {
                print_room(client, room);
            }
        }
        Command::Employees { page, search } => {
            let query = QueryParams::new()
                .with_opt("page", page)
                .with_opt("search", search);
            let payload = client.employees().list(query, None).await?.data;
            print_page_info(payload.as_ref());
            for employee in payload.map(ListPayload::into_items).unwrap_or_default() {
                println!(
                    "#{:<5} {:<30} {}",
                    employee.id,
                    employee.full_name,
                    employee.position.as_deref().unwrap_or("-")
                );
            }
        }
        Command::Report { year, month } => {
            let comparison = client
                .reports()
                .monthly_comparison(year, month, None)
                .await?
                .data
                .ok_or_else(|| ClientError::InvalidResponse("Report reply carries no data".into()))?;
            println!("Tháng {month}/{year}: {}", comparison.current);
            println!("Tháng trước:   {}", comparison.previous);
            match comparison.change_percent {
                Some(change) => println!("Thay đổi:      {change}%"),
                None => println!("Thay đổi:      -"),
            }
        }
    }
    Ok(())
}

fn describe(user: &UserProfile) -> String {
    format!(
        "{} ({}, {})",
        user.display_name(),
        user.username,
        user.role_name
    )
}

fn print_room(client: &NhaTroClient, room: &Room) {
    let image = client.rooms().image_url(room).unwrap_or_default();
    println!(
        "{:<6} {:>12} {:<12} {}",
        room.number,
        room.rent,
        room.status.as_deref().unwrap_or("-"),
        image
    );
}

fn print_page_info<T>(payload: Option<&ListPayload<T>>) {
    if let Some(page) = payload.and_then(ListPayload::page) {
        println!(
            "Trang {}/{} ({} bản ghi)",
            page.current_page, page.last_page, page.total
        );
    }
}

fn report(err: &ClientError) {
    if err.kind() == ErrorKind::Cancelled {
        return;
    }
    if let Some(notice) = err.notice() {
        eprintln!("{}: {}", notice.title, notice.message);
        for (field, messages) in &notice.fields {
            for message in messages {
                eprintln!("  - {field}: {message}");
            }
        }
    }
}
