use crate::model::OptionFlag;

pub const TAB_EDITOR: usize = 0;
pub const TAB_OPTIONS: usize = 1;
pub const TAB_HELP: usize = 2;
pub const TAB_TITLES: [&str; 3] = ["Editor", "Options", "Help"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Open,
    SaveAs,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            PromptKind::Open => "Open file",
            PromptKind::SaveAs => "Save as",
        }
    }
}

/// One-line path input standing in for the open/save dialogs.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

/// Modal error message; any key dismisses it.
#[derive(Debug, Clone)]
pub struct Popup {
    pub title: String,
    pub message: String,
}

pub struct UiState {
    pub tab: usize,
    pub info: String,
    pub prompt: Option<Prompt>,
    pub popup: Option<Popup>,
    pub options_selected: usize,
    // Fallback when the system clipboard is unavailable (headless, SSH).
    pub register: Option<String>,
    pub quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: TAB_EDITOR,
            info: String::new(),
            prompt: None,
            popup: None,
            options_selected: 0,
            register: None,
            quit: false,
        }
    }
}

impl UiState {
    pub fn show_error(&mut self, title: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(title, %message, "showing error");
        self.popup = Some(Popup {
            title: title.to_string(),
            message,
        });
    }

    pub fn open_prompt(&mut self, kind: PromptKind, initial: String) {
        self.prompt = Some(Prompt {
            kind,
            input: initial,
        });
    }

    pub fn selected_option(&self) -> OptionFlag {
        OptionFlag::ALL[self.options_selected.min(OptionFlag::ALL.len() - 1)]
    }

    pub fn select_next_option(&mut self) {
        self.options_selected = (self.options_selected + 1) % OptionFlag::ALL.len();
    }

    pub fn select_prev_option(&mut self) {
        self.options_selected =
            (self.options_selected + OptionFlag::ALL.len() - 1) % OptionFlag::ALL.len();
    }
}
