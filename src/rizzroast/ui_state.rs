use log::warn;
use rizzroast_model::emphasis::{format_emphasis, TextRun};
use rizzroast_model::favorites::FavoritesList;
use rizzroast_model::share::share_link;
use rizzroast_model::Namespace;
use serde::Serialize;

pub const GENERATION_FAILED: &str = "Generation failed, please try again.";
pub const FAVORITES_FAILED: &str = "Could not update favorites.";

/// Runtime state of one generator screen. Favorites live in the store.
#[derive(Clone, Debug, PartialEq)]
pub struct ScreenState {
    pub namespace: Namespace,
    pub current_line: Option<String>,
    pub busy: bool,
    pub error: Option<String>,
}

impl ScreenState {
    pub fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            current_line: None,
            busy: false,
            error: None,
        }
    }

    /// Marks the screen busy. Returns false when a request is already in flight.
    pub fn begin_generation(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    pub fn finish_generation(&mut self, result: Result<String, String>) {
        self.busy = false;
        match result {
            Ok(line) => {
                self.current_line = Some(line);
                self.error = None;
            }
            Err(detail) => {
                warn!("{}: generation failed - {detail}", self.namespace);
                self.error = Some(GENERATION_FAILED.into());
            }
        }
    }

    pub fn clear_line(&mut self) {
        self.current_line = None;
        self.error = None;
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiLine {
    pub text: String,
    pub runs: Vec<TextRun>,
    pub share_url: String,
}

impl UiLine {
    pub fn new(text: &str) -> Self {
        UiLine {
            text: text.to_string(),
            runs: format_emphasis(text),
            share_url: share_link(text),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiScreen {
    pub current_line: Option<UiLine>,
    pub busy: bool,
    pub error: Option<String>,
    pub favorites: Vec<UiLine>,
}

impl UiScreen {
    pub fn new(state: &ScreenState, favorites: &FavoritesList) -> Self {
        UiScreen {
            current_line: state.current_line.as_deref().map(UiLine::new),
            busy: state.busy,
            error: state.error.clone(),
            favorites: favorites.iter().map(UiLine::new).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub pickup: UiScreen,
    pub roast: UiScreen,
}
