//! The interactive terminal viewer.
//!
//! The viewer owns one event loop: terminal input, the debounced
//! relayout deadline, and reload signals from the watcher task all feed
//! into it, and every handler runs to completion before the next event.

mod events;
mod render;
mod term;

use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::EventStream;
use futures::StreamExt;
use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};
use url::Url;

use tabgrid::{Table, widths};

use crate::error::AppError;
use crate::load::{self, LoadOptions};
use crate::watch::{self, WatchOutcome};

use events::Event;
use render::COLUMN_GAP;
use term::TerminalGuard;

/// Debounce window for resize-triggered width recomputation.
const RELAYOUT_DEBOUNCE: Duration = Duration::from_millis(100);

/// The table never draws in the last terminal column, the way a border
/// keeps one pixel for itself.
const BORDER_COMPENSATION: usize = 1;

/// Where the viewer gets its document.
pub enum Source {
    File(PathBuf),
    /// A serving instance: fetch the document from it and long-poll its
    /// watch endpoint for reloads.
    Remote { base: Url, client: reqwest::Client },
}

struct Viewer {
    source: Source,
    options: LoadOptions,
    table: Table,
    widths: Vec<usize>,
    scroll: usize,
    size: (u16, u16),
}

/// Run the viewer until the user quits.
pub async fn run(source: Source, options: LoadOptions) -> Result<(), AppError> {
    let table = load_source(&source, options).await?;
    let mut terminal = TerminalGuard::new()?;
    let size = terminal.size()?;

    let mut viewer = Viewer {
        source,
        options,
        table,
        widths: Vec::new(),
        scroll: 0,
        size,
    };
    // Widths are settled before the first frame; no unstyled layout is
    // ever visible.
    viewer.relayout();

    let (watch_tx, mut watch_rx) = mpsc::channel(1);
    viewer.spawn_watcher(&watch_tx);

    viewer.draw(&mut terminal)?;

    let mut events = EventStream::new();
    // Single pending-slot debounce: a new resize replaces the deadline.
    let mut relayout_at: Option<Instant> = None;

    loop {
        tokio::select! {
            maybe_event = events.next() => {
                let event = match maybe_event {
                    Some(Ok(raw)) => events::convert_event(raw),
                    Some(Err(e)) => {
                        warn!("input error: {e}");
                        continue;
                    }
                    None => break,
                };
                let Some(event) = event else { continue };
                match event {
                    Event::Quit => break,
                    Event::Resize { width, height } => {
                        debug!("resize to {width}x{height}");
                        viewer.size = (width, height);
                        relayout_at = Some(Instant::now() + RELAYOUT_DEBOUNCE);
                        viewer.draw(&mut terminal)?;
                    }
                    Event::Click { x, y } => {
                        if let Some(column) = viewer.header_column_at(x, y) {
                            viewer.table.sort_by(column);
                            viewer.draw(&mut terminal)?;
                        }
                    }
                    Event::ToggleWrap => {
                        viewer.table.toggle_wrap();
                        viewer.draw(&mut terminal)?;
                    }
                    Event::ScrollUp(n) => {
                        viewer.scroll_by(-(n as isize));
                        viewer.draw(&mut terminal)?;
                    }
                    Event::ScrollDown(n) => {
                        viewer.scroll_by(n as isize);
                        viewer.draw(&mut terminal)?;
                    }
                    Event::PageUp => {
                        viewer.scroll_by(-(viewer.page_len() as isize));
                        viewer.draw(&mut terminal)?;
                    }
                    Event::PageDown => {
                        viewer.scroll_by(viewer.page_len() as isize);
                        viewer.draw(&mut terminal)?;
                    }
                    Event::Home => {
                        viewer.scroll = 0;
                        viewer.draw(&mut terminal)?;
                    }
                    Event::End => {
                        viewer.scroll = viewer.max_scroll();
                        viewer.draw(&mut terminal)?;
                    }
                }
            }
            _ = sleep_until(relayout_at.unwrap_or_else(Instant::now)), if relayout_at.is_some() => {
                relayout_at = None;
                viewer.relayout();
                viewer.draw(&mut terminal)?;
            }
            outcome = watch_rx.recv() => {
                match outcome {
                    Some(WatchOutcome::Reload) => {
                        info!("reloading document");
                        viewer.reload().await?;
                        viewer.spawn_watcher(&watch_tx);
                        viewer.draw(&mut terminal)?;
                    }
                    // Stopped was already logged by the watcher; there is
                    // no retry.
                    Some(WatchOutcome::Stopped) | None => {}
                }
            }
        }
    }

    Ok(())
}

impl Viewer {
    /// Recompute column widths for the current terminal size. With no
    /// body rows the allocation pass is skipped and natural content
    /// widths stand.
    fn relayout(&mut self) {
        let content = widths::measure(&self.table);
        if self.table.rows().is_empty() {
            self.widths = content;
            return;
        }
        let gaps = COLUMN_GAP * content.len().saturating_sub(1);
        let available = (self.size.0 as usize).saturating_sub(BORDER_COMPENSATION + gaps);
        self.widths = widths::allocate(&content, available);
        debug!("layout: content {content:?} -> widths {:?}", self.widths);
    }

    fn draw(&mut self, terminal: &mut TerminalGuard) -> Result<(), AppError> {
        render::draw(
            terminal.writer(),
            &mut self.table,
            &self.widths,
            self.scroll,
            self.size,
        )?;
        Ok(())
    }

    /// The column under a click, when the click lands on the header row.
    fn header_column_at(&self, x: u16, y: u16) -> Option<usize> {
        if y != 0 || self.table.header().is_none() {
            return None;
        }
        render::column_at_x(&self.widths, x)
    }

    fn page_len(&self) -> usize {
        let header = usize::from(self.table.header().is_some());
        (self.size.1 as usize).saturating_sub(header).max(1)
    }

    fn max_scroll(&self) -> usize {
        self.table.rows().len().saturating_sub(1)
    }

    fn scroll_by(&mut self, delta: isize) {
        let scroll = self.scroll as isize + delta;
        self.scroll = scroll.clamp(0, self.max_scroll() as isize) as usize;
    }

    /// Start a watcher cycle. Only remote documents have one; it ends by
    /// sending a single outcome.
    fn spawn_watcher(&self, tx: &mpsc::Sender<WatchOutcome>) {
        if let Source::Remote { base, client } = &self.source {
            let url = watch::watch_url(base);
            let client = client.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = watch::watch_once(&client, url).await;
                let _ = tx.send(outcome).await;
            });
        }
    }

    /// Rebuild the table from the source, dropping all session state
    /// (sort, wrap, type memo, row indexes) the way a page reload does.
    async fn reload(&mut self) -> Result<(), AppError> {
        self.table = load_source(&self.source, self.options).await?;
        self.scroll = 0;
        self.relayout();
        Ok(())
    }
}

async fn load_source(source: &Source, options: LoadOptions) -> Result<Table, AppError> {
    match source {
        Source::File(path) => load::load(Some(path.as_path()), options),
        Source::Remote { base, client } => {
            let bytes = watch::fetch_document(client, base).await?;
            load::from_bytes(&bytes, options)
        }
    }
}
