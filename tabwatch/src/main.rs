//! tabwatch: render a CSV file as a table — to HTML, over HTTP, or in
//! the terminal.

mod cli;
mod error;
mod html;
mod load;
mod serve;
mod tui;
mod watch;

use std::fs::File;
use std::io::{self, Read};
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode, WriteLogger};
use url::Url;

use crate::cli::Cli;
use crate::error::AppError;
use crate::html::RenderOptions;
use crate::load::LoadOptions;
use crate::serve::ServeConfig;
use crate::tui::Source;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn init_logging(cli: &Cli) {
    if cli.tui {
        // The viewer owns the terminal; log to a file instead.
        if let Ok(file) = File::create("tabwatch.log") {
            let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), file);
        }
    } else {
        let _ = TermLogger::init(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        );
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let delimiter = cli::resolve_separator(cli.separator.as_deref(), cli.input.as_deref())?;
    let options = LoadOptions {
        delimiter,
        has_header: cli.header(),
    };

    if cli.tui {
        return tui::run(viewer_source(&cli)?, options).await;
    }

    if let Some(addr) = cli.serve.clone() {
        let stdin = if cli.input.is_none() {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            Some(buf)
        } else {
            None
        };
        let watch = cli.watch() && cli.input.is_some();
        let detect_links = cli.detect_links();
        return serve::serve(ServeConfig {
            addr,
            watch,
            input: cli.input,
            stdin,
            load: options,
            detect_links,
        })
        .await;
    }

    // No mode flag: render the page to stdout.
    let mut table = load::load(cli.input.as_deref(), options)?;
    let page = html::render_page(
        &mut table,
        &RenderOptions {
            detect_links: cli.detect_links(),
            title: html::title_for(cli.input.as_deref()),
        },
    );
    print!("{page}");
    Ok(())
}

fn viewer_source(cli: &Cli) -> Result<Source, AppError> {
    if let Some(connect) = &cli.connect {
        let base = Url::parse(connect).map_err(|e| AppError::ConnectUrl {
            url: connect.clone(),
            source: e,
        })?;
        return Ok(Source::Remote {
            base,
            client: reqwest::Client::new(),
        });
    }
    match &cli.input {
        Some(path) => Ok(Source::File(path.clone())),
        None => Err(AppError::ViewerInput),
    }
}
