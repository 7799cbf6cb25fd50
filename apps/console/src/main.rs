use std::{process::ExitCode, sync::Arc};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use client_core::{FormApi, HttpFormApi};
use shared::domain::FormField;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod controller;
mod render;

use config::load_settings;
use controller::{
    history::{HistoryPage, QueryOutcome},
    navigation::{Page, PageLocation},
    submission::{SubmitAttempt, SubmitFormPage},
};
use render::{HistoryScreen, HomeScreen, SubmitScreen};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Parser, Debug)]
#[command(name = "forms", about = "Submit records and browse submission history")]
struct Args {
    /// Base URL of the form API, e.g. http://127.0.0.1:8000/api
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the home page.
    Home,
    /// Submit a record through the form page.
    Submit {
        #[arg(long, value_parser = parse_iso_date)]
        date: NaiveDate,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    /// Open the history page, optionally applying a filter with "show".
    History {
        /// Page location, e.g. "/history?date=2025-01-20&name=Ivan" or "?date=2025-01-20".
        location: Option<String>,
        #[arg(long, value_parser = parse_iso_date)]
        date: Option<NaiveDate>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
    /// List the distinct first and last names known to the server.
    Names,
}

fn parse_iso_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|err| format!("expected a YYYY-MM-DD date: {err}"))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(api_url) = args.api_url {
        settings.api_base_url = api_url;
    }
    let api: Arc<dyn FormApi> = Arc::new(
        HttpFormApi::with_timeout(&settings.api_base_url, settings.request_timeout())
            .context("failed to build form API client")?,
    );
    info!(api_base_url = %settings.api_base_url, "form API configured");

    match args.command {
        Command::Home => {
            print!("{HomeScreen}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Submit {
            date,
            first_name,
            last_name,
        } => {
            let mut page = SubmitFormPage::new(api);
            page.edit(FormField::Date, date.format(DATE_FORMAT).to_string());
            page.edit(FormField::FirstName, first_name);
            page.edit(FormField::LastName, last_name);

            let attempt = page.submit().await;
            print!("{}", SubmitScreen(&page));
            if let SubmitAttempt::MissingFields(fields) = &attempt {
                let names: Vec<_> = fields.iter().map(|field| field.key()).collect();
                bail!("required fields are empty: {}", names.join(", "));
            }
            Ok(exit_code(attempt == SubmitAttempt::Accepted))
        }
        Command::History {
            location,
            date,
            first_name,
            last_name,
        } => {
            let location = PageLocation::parse(location.as_deref().unwrap_or(Page::History.path()))
                .context("invalid history location")?;
            if location.page() != Page::History {
                bail!("{location} is not the history page");
            }

            let mut page = HistoryPage::mount(api, location).await;
            let wants_show = date.is_some() || first_name.is_some() || last_name.is_some();
            if !wants_show {
                print!("{}", HistoryScreen(&page));
                return Ok(ExitCode::SUCCESS);
            }

            if let Some(date) = date {
                page.set_date(date.format(DATE_FORMAT).to_string());
            }
            if let Some(first_name) = first_name {
                page.set_first_name(first_name);
            }
            if let Some(last_name) = last_name {
                page.set_last_name(last_name);
            }
            let outcome = page.show().await;
            print!("{}", HistoryScreen(&page));
            Ok(exit_code(matches!(outcome, QueryOutcome::Loaded { .. })))
        }
        Command::Names => {
            let names = api.fetch_distinct_names().await;
            println!("First names: {}", names.first_names.join(", "));
            println!("Last names: {}", names.last_names.join(", "));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
