// The read/process flow. Kept free of concrete UI and HTTP types so it can
// be driven by scripted implementations in tests.

use crate::api::VisionApi;
use crate::config::Config;
use crate::encode::encode;
use crate::error::VisionError;
use crate::parser;
use crate::store::{Record, Store};
use crate::ui::{Presenter, LOADING_MESSAGE};
use anyhow::{Context, Result};

pub const RESPONSE_TITLE: &str = "API Response";
pub const DATA_TITLE: &str = "Database Data";
pub const TIMEOUT_MESSAGE: &str = "The request timed out. Please try again with a smaller image or check your network connection.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Process,
}

impl Action {
    /// Recognises `read` and `process`; surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Option<Action> {
        match input.trim() {
            "read" => Some(Action::Read),
            "process" => Some(Action::Process),
            _ => None,
        }
    }
}

/// How a run ended, for callers that want more than the console output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Read { rows: usize },
    Processed { inserted: usize },
    NoImageSelected,
    RequestFailed(VisionError),
    InvalidAction,
}

/// Text shown to the user for a failed request.
pub fn failure_message(err: &VisionError) -> String {
    match err {
        VisionError::Timeout => TIMEOUT_MESSAGE.to_string(),
        VisionError::RequestFailure(msg) => format!("An error occurred: {}", msg),
    }
}

/// Rows rendered one per line, as shown by the `read` action.
pub fn render_rows(rows: &[Record]) -> String {
    rows.iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt for an action and run it.
///
/// `connect` builds the vision backend; it is only called once an image has
/// been selected and encoded, so `read` and a cancelled selection never need
/// an API key.
///
/// Request failures are reported through the presenter and end the run
/// normally. Storage, image and response-parsing errors are returned.
pub fn run<P, V, F>(ui: &mut P, config: &Config, connect: F) -> Result<Outcome>
where
    P: Presenter,
    V: VisionApi,
    F: FnOnce(&Config) -> Result<V>,
{
    let input = ui.prompt_action()?;
    let Some(action) = Action::parse(&input) else {
        println!("Invalid action.");
        tracing::info!(input = %input, "invalid action");
        return Ok(Outcome::InvalidAction);
    };

    let store = Store::open(&config.db_path)
        .with_context(|| format!("failed to open database {}", config.db_path.display()))?;

    match action {
        Action::Read => read(ui, &store),
        Action::Process => process(ui, config, &store, connect),
    }
}

fn read<P: Presenter>(ui: &mut P, store: &Store) -> Result<Outcome> {
    let rows = store.fetch_all().context("failed to read stored rows")?;
    ui.show_info(DATA_TITLE, &render_rows(&rows));
    Ok(Outcome::Read { rows: rows.len() })
}

fn process<P, V, F>(ui: &mut P, config: &Config, store: &Store, connect: F) -> Result<Outcome>
where
    P: Presenter,
    V: VisionApi,
    F: FnOnce(&Config) -> Result<V>,
{
    let Some(path) = ui.select_image() else {
        println!("No image selected.");
        return Ok(Outcome::NoImageSelected);
    };

    let payload =
        encode(&path).with_context(|| format!("failed to read image {}", path.display()))?;
    let vision = connect(config)?;

    let reply = {
        let _loading = ui.start_loading(LOADING_MESSAGE);
        vision.ask_about_image(&payload)
    };

    let text = match reply {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "vision request failed");
            ui.show_info(RESPONSE_TITLE, &failure_message(&e));
            return Ok(Outcome::RequestFailed(e));
        }
    };
    ui.show_info(RESPONSE_TITLE, &text);

    let mut inserted = 0;
    for field in parser::fields(&text) {
        let field = field?;
        store
            .insert_field(&field.name, &field.value)
            .with_context(|| format!("failed to store field {:?}", field.name))?;
        inserted += 1;
    }

    println!("Data in the database:");
    for row in store.fetch_all().context("failed to read stored rows")? {
        println!("{}", row);
    }
    Ok(Outcome::Processed { inserted })
}
