use crate::{AccessibilityMode, ResultPanel, Stage};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputView {
    #[default]
    Empty,
    Document {
        filename: String,
    },
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub stage: Stage,
    pub stage_label: &'static str,
    pub busy: bool,
    pub submit_enabled: bool,
    pub input: InputView,
    pub mode: AccessibilityMode,
    pub mode_classes: &'static [&'static str],
    /// `None` until a request has succeeded; cleared when a new one starts.
    pub panels: Option<Vec<ResultPanel>>,
    pub dirty: bool,
}

/// Submit action label for each stage.
pub fn stage_label(stage: Stage) -> &'static str {
    match stage {
        Stage::Idle => "Make Accessible",
        Stage::Extracting => "Extracting content...",
        Stage::AiProcessing => "Processing with AI...",
    }
}
