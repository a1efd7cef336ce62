//! Command surface: clap subcommands for one-shot runs and an interactive
//! menu when no subcommand is given. Every action ends in a JSON file under
//! the configured output directory.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{info, warn};

use crate::awards::fetch_award_rankings;
use crate::errors::AppError;
use crate::export::save_json;
use crate::overview::fetch_overview;
use crate::reviews::normalizer::NormalizedReview;
use crate::reviews::pagination::{fetch_reviews, parse_page_count};
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "harvester")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Harvests employer reviews, overviews and award rankings", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Best Places to Work rankings → bptw.json
    Awards {
        /// Award year (empty: current year)
        #[arg(short, long, default_value = "")]
        year: String,
    },

    /// Paginated employer reviews → reviews.json
    Reviews {
        /// First review page, e.g. https://www.glassdoor.com/Reviews/Acme-Reviews-E1.htm
        #[arg(short, long)]
        url: String,

        /// Number of pages to walk
        #[arg(short, long)]
        pages: String,
    },

    /// Employer overview → overview.json
    Overview {
        /// Employer overview page
        #[arg(short, long)]
        url: String,
    },
}

#[derive(Serialize)]
struct ReviewsFile {
    reviews: Vec<NormalizedReview>,
}

/// Runs one command to completion and returns the written file.
pub async fn execute(state: &AppState, command: Commands) -> Result<PathBuf, AppError> {
    let out = &state.config.output_dir;
    match command {
        Commands::Awards { year } => {
            let rankings = fetch_award_rankings(&state.session, &state.config, &year).await;
            save_json(out, "bptw", &rankings).await
        }
        Commands::Reviews { url, pages } => {
            let page_count = parse_page_count(&pages)?;
            let reviews = fetch_reviews(
                &state.session,
                url.trim(),
                page_count,
                state.config.reviews_page_size,
                &state.cancel,
            )
            .await;
            info!("Collected {} reviews from {url}", reviews.len());
            save_json(out, "reviews", &ReviewsFile { reviews }).await
        }
        Commands::Overview { url } => {
            let overview = fetch_overview(&state.session, url.trim()).await;
            save_json(out, "overview", &overview).await
        }
    }
}

const MENU: &str = "\
What do you want to do?
  1) Get Best Place To Work
  2) Get Reviews
  3) Get Overview
  4) Exit";

/// Prints `prompt` and reads one line. `None` on end of input or Ctrl-C.
async fn ask<R>(state: &AppState, lines: &mut Lines<R>, prompt: &str) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    println!("{prompt}");
    let mut cancel = state.cancel.clone();
    if *cancel.borrow() {
        return None;
    }
    tokio::select! {
        line = lines.next_line() => match line {
            Ok(line) => line.map(|l| l.trim().to_string()),
            Err(e) => {
                warn!("Failed to read input: {e}");
                None
            }
        },
        Ok(_) = cancel.wait_for(|cancelled| *cancelled) => None,
    }
}

/// Reads one menu choice and its parameters. `None` means exit;
/// `Some(None)` shows the menu again.
async fn read_choice<R>(state: &AppState, lines: &mut Lines<R>) -> Option<Option<Commands>>
where
    R: AsyncBufRead + Unpin,
{
    let choice = ask(state, lines, MENU).await?;
    let command = match choice.as_str() {
        "1" => Commands::Awards {
            year: ask(state, lines, "Enter year:").await?,
        },
        "2" => Commands::Reviews {
            url: ask(state, lines, "Enter url:").await?,
            pages: ask(state, lines, "Enter number of pages:").await?,
        },
        "3" => Commands::Overview {
            url: ask(state, lines, "Enter url:").await?,
        },
        "4" => return None,
        other => {
            println!("Unknown choice '{other}'");
            return Some(None);
        }
    };
    Some(Some(command))
}

/// Interactive loop over `input` until Exit, end of input or Ctrl-C.
/// A failed action is reported and the menu comes back.
pub async fn run_menu<R>(state: &AppState, input: R)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(choice) = read_choice(state, &mut lines).await {
        let Some(command) = choice else { continue };
        match execute(state, command).await {
            Ok(path) => println!("Data written to {}", path.display()),
            Err(e) => {
                warn!("Command failed: {e}");
                println!("{e}");
            }
        }
    }
    println!("Exiting...");
}
