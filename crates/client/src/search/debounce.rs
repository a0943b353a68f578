//! Debounced search input model
//!
//! Collapses bursts of filter edits into one canonicalized parameter
//! emission after a quiet window. Page moves come from discrete controls and
//! are emitted immediately; so are sort and page-size changes, which reset
//! the page. Identical consecutive parameter sets are not re-emitted.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use super::params::SearchParams;

/// A single user input against the search state.
#[derive(Debug, Clone)]
pub enum SearchInput {
    /// Text-driven filter edit; debounced.
    Filter { field: String, value: String },
    /// Page move; immediate, preserves filters.
    Page(u32),
    /// Page-size change; immediate, resets the page.
    Size(u32),
    /// Sort change; immediate, resets the page.
    Sort(String),
}

/// Handle feeding inputs to the debouncing task.
///
/// Dropping the model stops the task; queued emissions remain readable on
/// the output channel.
#[derive(Debug, Clone)]
pub struct SearchModel {
    input: mpsc::UnboundedSender<SearchInput>,
}

impl SearchModel {
    /// Spawn the debouncing task. Emissions arrive on the returned receiver.
    #[must_use]
    pub fn spawn(
        initial: SearchParams,
        window: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SearchParams>) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        tokio::spawn(run(initial, window, input_rx, output_tx));
        (Self { input: input_tx }, output_rx)
    }

    pub fn edit_filter(&self, field: impl Into<String>, value: impl Into<String>) {
        self.send(SearchInput::Filter { field: field.into(), value: value.into() });
    }

    pub fn set_page(&self, page: u32) {
        self.send(SearchInput::Page(page));
    }

    pub fn set_size(&self, size: u32) {
        self.send(SearchInput::Size(size));
    }

    pub fn set_sort(&self, sort: impl Into<String>) {
        self.send(SearchInput::Sort(sort.into()));
    }

    fn send(&self, input: SearchInput) {
        // The task only stops when every sender is gone; a failed send here
        // means the process is shutting down and the input is moot.
        let _ = self.input.send(input);
    }
}

async fn run(
    mut current: SearchParams,
    window: Duration,
    mut input: mpsc::UnboundedReceiver<SearchInput>,
    output: mpsc::UnboundedSender<SearchParams>,
) {
    let mut pending: Option<SearchParams> = None;
    let mut deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            event = input.recv() => {
                let Some(event) = event else { break };
                match event {
                    SearchInput::Filter { field, value } => {
                        let base = pending.take().unwrap_or_else(|| current.clone());
                        pending = Some(base.with_filter(&field, &value));
                        deadline = Some(Instant::now() + window);
                    }
                    SearchInput::Page(page) => {
                        let next = current.clone().with_page(page);
                        emit_if_changed(&mut current, next, &output);
                    }
                    SearchInput::Size(size) => {
                        let next = current.clone().with_size(size);
                        emit_if_changed(&mut current, next, &output);
                    }
                    SearchInput::Sort(sort) => {
                        let next = current.clone().with_sort(&sort);
                        emit_if_changed(&mut current, next, &output);
                    }
                }
            }
            () = wait_for(deadline) => {
                deadline = None;
                if let Some(next) = pending.take() {
                    emit_if_changed(&mut current, next, &output);
                }
            }
        }
    }
    debug!("search model input closed, debounce task stopping");
}

fn emit_if_changed(
    current: &mut SearchParams,
    next: SearchParams,
    output: &mpsc::UnboundedSender<SearchParams>,
) {
    if next != *current {
        *current = next.clone();
        let _ = output.send(next);
    }
}

/// Sleeps until the deadline, or forever when none is armed.
async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
