//! Content editing
//!
//! Note bodies are HTML. An editor is handed the current HTML and gives back
//! the new HTML, or `None` if the user backed out.

use anyhow::Result;
use inquire::Editor;

use crate::cli::ui::render_config;

pub trait NoteEditor {
    fn edit(&mut self, title: &str, html: &str) -> Result<Option<String>>;
}

/// Opens `$VISUAL`/`$EDITOR` on a temporary `.html` file.
#[derive(Debug, Default)]
pub struct ExternalEditor;

impl NoteEditor for ExternalEditor {
    fn edit(&mut self, title: &str, html: &str) -> Result<Option<String>> {
        let prompt = format!("{}:", title);
        let result = Editor::new(&prompt)
            .with_predefined_text(html)
            .with_file_extension(".html")
            .with_render_config(render_config())
            .prompt_skippable()?;
        Ok(result.map(|s| s.trim_end().to_string()))
    }
}

/// Replays a fixed sequence of results. Used by tests.
#[cfg(test)]
pub struct ScriptedEditor {
    pub responses: Vec<Option<String>>,
    pub seen: Vec<String>,
}

#[cfg(test)]
impl ScriptedEditor {
    pub fn new(responses: Vec<Option<&str>>) -> Self {
        Self {
            responses: responses.into_iter().rev().map(|r| r.map(String::from)).collect(),
            seen: Vec::new(),
        }
    }
}

#[cfg(test)]
impl NoteEditor for ScriptedEditor {
    fn edit(&mut self, _title: &str, html: &str) -> Result<Option<String>> {
        self.seen.push(html.to_string());
        Ok(self.responses.pop().flatten())
    }
}
