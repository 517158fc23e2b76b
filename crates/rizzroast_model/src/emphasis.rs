use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("emphasis pattern"));

/// Piece of display text. Rendered as text, never as markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default)]
    pub bold: bool,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        TextRun {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        TextRun {
            text: text.into(),
            bold: true,
        }
    }
}

/// Splits `text` into runs, turning every `*span*` into a bold run.
/// Matching is non-greedy and does not cross lines; an unpaired `*` is kept as is.
pub fn format_emphasis(text: &str) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut last = 0;
    for captures in EMPHASIS.captures_iter(text) {
        let (Some(whole), Some(inner)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        push_run(&mut runs, &text[last..whole.start()], false);
        push_run(&mut runs, inner.as_str(), true);
        last = whole.end();
    }
    push_run(&mut runs, &text[last..], false);
    runs
}

/// Text without emphasis markers.
pub fn strip_emphasis(text: &str) -> String {
    format_emphasis(text)
        .into_iter()
        .map(|run| run.text)
        .collect()
}

fn push_run(runs: &mut Vec<TextRun>, text: &str, bold: bool) {
    if !text.is_empty() {
        runs.push(TextRun {
            text: text.to_string(),
            bold,
        });
    }
}
