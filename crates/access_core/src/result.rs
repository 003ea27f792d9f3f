/// Normalized service result. Every artifact is independently optional.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessingResult {
    pub simplified_text: Option<String>,
    pub audio_url: Option<String>,
    pub keywords: Vec<String>,
    pub zip_url: Option<String>,
}

impl ProcessingResult {
    /// True when the service produced no artifact at all.
    pub fn is_empty(&self) -> bool {
        self.simplified_text.is_none()
            && self.audio_url.is_none()
            && self.keywords.is_empty()
            && self.zip_url.is_none()
    }
}
