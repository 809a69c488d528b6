//! Scripted stand-ins for the presenter and the vision backend.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use vision_ledger::api::VisionApi;
use vision_ledger::config::Config;
use vision_ledger::error::VisionError;
use vision_ledger::ui::{Loading, Presenter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    LoadingStarted,
    LoadingReleased,
    Info(String, String),
}

/// Answers the action prompt and file dialog from a script and records
/// everything else it is asked to show.
pub struct ScriptedUi {
    action: String,
    image: Option<PathBuf>,
    events: Rc<RefCell<Vec<Event>>>,
}

impl ScriptedUi {
    pub fn new(action: &str, image: Option<PathBuf>) -> Self {
        ScriptedUi {
            action: action.to_string(),
            image,
            events: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }
}

impl Presenter for ScriptedUi {
    fn prompt_action(&mut self) -> anyhow::Result<String> {
        Ok(self.action.clone())
    }

    fn select_image(&mut self) -> Option<PathBuf> {
        self.image.take()
    }

    fn start_loading(&mut self, _message: &str) -> Loading {
        self.events.borrow_mut().push(Event::LoadingStarted);
        let events = self.events.clone();
        Loading::hidden().on_release(move || events.borrow_mut().push(Event::LoadingReleased))
    }

    fn show_info(&mut self, title: &str, text: &str) {
        self.events
            .borrow_mut()
            .push(Event::Info(title.to_string(), text.to_string()));
    }
}

/// Returns a canned reply and records the payloads it was sent.
pub struct ScriptedVision {
    reply: Result<String, VisionError>,
    calls: Rc<RefCell<Vec<String>>>,
}

impl ScriptedVision {
    pub fn replying(reply: Result<String, VisionError>) -> Self {
        ScriptedVision {
            reply,
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Rc<RefCell<Vec<String>>> {
        self.calls.clone()
    }

    /// Connector for runs that must never reach the backend.
    pub fn never(_: &Config) -> anyhow::Result<ScriptedVision> {
        panic!("vision backend must not be used in this run");
    }
}

impl VisionApi for ScriptedVision {
    fn ask_about_image(&self, base64_payload: &str) -> Result<String, VisionError> {
        self.calls.borrow_mut().push(base64_payload.to_string());
        self.reply.clone()
    }
}

/// Config pointing at a database inside `dir`, with no API key.
pub fn config_in(dir: &Path) -> Config {
    Config {
        api_key: None,
        endpoint: "http://127.0.0.1:9/v1/chat/completions".into(),
        model: "gpt-4o".into(),
        max_tokens: 300,
        timeout: Duration::from_secs(1),
        db_path: dir.join("data").join("id_data.db"),
    }
}

pub fn image_file(dir: &Path, bytes: &[u8]) -> PathBuf {
    let path = dir.join("picture.jpg");
    std::fs::write(&path, bytes).unwrap();
    path
}
