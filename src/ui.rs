// UI layer: the action prompt uses `dialoguer`, file picking and message
// boxes use native dialogs from `rfd`, and the loading indicator is an
// `indicatif` spinner. The flow in `app` only sees the `Presenter` trait.

use anyhow::Result;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use std::path::PathBuf;
use std::time::Duration;

pub const ACTION_PROMPT: &str =
    "Enter 'read' to read from database or 'process' to process a new image";
pub const LOADING_MESSAGE: &str = "Processing image, please wait...";
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

/// Everything the read/process flow needs from the user interface.
pub trait Presenter {
    /// Ask which action to run. Returns the raw text the user typed.
    fn prompt_action(&mut self) -> Result<String>;

    /// Let the user pick an image file. `None` when the dialog is cancelled.
    fn select_image(&mut self) -> Option<PathBuf>;

    /// Show the loading indicator until the returned guard is dropped.
    fn start_loading(&mut self, message: &str) -> Loading;

    /// Blocking informational message box.
    fn show_info(&mut self, title: &str, text: &str);
}

/// Guard for a visible loading indicator. Dropping it (on any path)
/// clears the spinner.
pub struct Loading {
    bar: ProgressBar,
    on_release: Option<Box<dyn FnOnce()>>,
}

impl Loading {
    pub fn spinner(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Loading {
            bar,
            on_release: None,
        }
    }

    /// An indicator that draws nothing, for non-interactive presenters.
    pub fn hidden() -> Self {
        Loading {
            bar: ProgressBar::hidden(),
            on_release: None,
        }
    }

    /// Run `f` once the indicator is released.
    pub fn on_release(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_release = Some(Box::new(f));
        self
    }
}

impl Drop for Loading {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
        if let Some(f) = self.on_release.take() {
            f();
        }
    }
}

/// Presenter backed by the terminal and native dialogs.
#[derive(Default)]
pub struct DesktopUi;

impl Presenter for DesktopUi {
    fn prompt_action(&mut self) -> Result<String> {
        let action: String = Input::new()
            .with_prompt(ACTION_PROMPT)
            .allow_empty(true)
            .interact_text()?;
        Ok(action)
    }

    fn select_image(&mut self) -> Option<PathBuf> {
        FileDialog::new()
            .set_title("Select an Image")
            .add_filter("Image Files", IMAGE_EXTENSIONS)
            .pick_file()
    }

    fn start_loading(&mut self, message: &str) -> Loading {
        Loading::spinner(message)
    }

    fn show_info(&mut self, title: &str, text: &str) {
        MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title(title)
            .set_description(text)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}
