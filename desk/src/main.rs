use std::time::Duration;

use chrono::{Local, NaiveDate, Utc};
use clap::Parser;

use waitlist_desk::client::HttpService;
use waitlist_desk::config::{generate_config_template, Cli, Command, Config};
use waitlist_desk::desk::FrontDesk;
use waitlist_desk::error::DeskError;
use waitlist_desk::models::{suggest_names, EntryId, NewEntry, SearchQuery, PUPPY_NAMES};
use waitlist_desk::render;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Handle --generate-config: print template and exit
    if cli.generate_config {
        print!("{}", generate_config_template());
        return Ok(());
    }

    // Load config with layered precedence: defaults < TOML < env < CLI
    let config = Config::load(&cli)?;

    // Logs go to stderr; stdout carries the list output
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("waitlist_desk=info"));
    if config.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    tracing::debug!(
        "waitlist-desk v{} using {}",
        env!("CARGO_PKG_VERSION"),
        config.service_url
    );

    let service = HttpService::new(
        &config.service_url,
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let mut desk = FrontDesk::new(service);

    let command = cli.command.clone().unwrap_or(Command::Show {
        date: None,
        create: false,
    });

    match command {
        Command::Show { date, create } => {
            let day = date.unwrap_or_else(today);
            let opened = desk.open_day(day, create).await.map(|_| ());
            match opened {
                Ok(_) => print_board(&desk),
                Err(DeskError::NoListForDay(d)) => {
                    println!("No waiting list for {}. Create one with `create --date {}`.", d, d);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Create { date } => {
            desk.open_day(date.unwrap_or_else(today), true).await?;
            print_board(&desk);
        }
        Command::Add {
            puppy,
            owner,
            service,
            arrival,
            date,
        } => {
            if !PUPPY_NAMES.iter().any(|n| n.eq_ignore_ascii_case(puppy.trim())) {
                let suggestions = suggest_names(&puppy);
                if !suggestions.is_empty() {
                    println!("Did you mean: {}?", suggestions.join(", "));
                }
            }
            desk.open_day(date.unwrap_or_else(today), false).await?;
            let created = desk
                .add_entry(NewEntry {
                    puppy_name: puppy,
                    owner_name: owner,
                    service,
                    arrival_time: arrival.unwrap_or_else(Utc::now),
                })
                .await?;
            println!("Added {} as {}", created.puppy_name, created.id);
            print_board(&desk);
        }
        Command::Complete { id, date } => {
            desk.open_day(date.unwrap_or_else(today), false).await?;
            if !desk.complete(&EntryId::from(id.as_str())).await? {
                println!("Entry {} was already completed", id);
            }
            print_board(&desk);
        }
        Command::Move { id, index, date } => {
            desk.open_day(date.unwrap_or_else(today), false).await?;
            let outcome = desk.move_entry(&EntryId::from(id.as_str()), index).await?;
            if outcome.writes == 0 {
                println!("Entry {} is already at slot {}", id, index);
            }
            if outcome.degraded {
                println!("Stored positions were out of order; run `renumber` to repair them.");
            }
            print_board(&desk);
        }
        Command::Renumber { date } => {
            desk.open_day(date.unwrap_or_else(today), false).await?;
            let writes = desk.renumber().await?;
            println!("Renumbered {} entries", writes);
            print_board(&desk);
        }
        Command::Search { name, date } => {
            let hits = desk.search(&SearchQuery { name, date }).await?;
            if hits.is_empty() {
                println!("No matching entries");
            }
            for hit in &hits {
                println!("{}", render::hit_line(hit, &Local));
            }
        }
    }

    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn print_board(desk: &FrontDesk<HttpService>) {
    if let Some(board) = desk.board() {
        for line in render::board_lines(board, &Local) {
            println!("{}", line);
        }
    }
}
