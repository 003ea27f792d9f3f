use std::fmt;
use std::str::FromStr;

/// Presentation-only mode. Has no effect on request semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessibilityMode {
    #[default]
    Default,
    DyslexiaFriendly,
    HighContrast,
}

struct ModeEntry {
    name: &'static str,
    label: &'static str,
    classes: &'static [&'static str],
}

// Indexed by `AccessibilityMode as usize`.
const MODE_TABLE: [ModeEntry; 3] = [
    ModeEntry {
        name: "default",
        label: "Default",
        classes: &["container"],
    },
    ModeEntry {
        name: "dyslexia",
        label: "Dyslexia Mode",
        classes: &["container", "dyslexia"],
    },
    ModeEntry {
        name: "high-contrast",
        label: "High Contrast",
        classes: &["container", "highcontrast"],
    },
];

impl AccessibilityMode {
    pub const ALL: [AccessibilityMode; 3] = [
        AccessibilityMode::Default,
        AccessibilityMode::DyslexiaFriendly,
        AccessibilityMode::HighContrast,
    ];

    fn entry(self) -> &'static ModeEntry {
        &MODE_TABLE[self as usize]
    }

    /// Presentation classes applied to the root container.
    pub fn classes(self) -> &'static [&'static str] {
        self.entry().classes
    }

    /// Human-readable selector label.
    pub fn label(self) -> &'static str {
        self.entry().label
    }

    /// Short name accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        self.entry().name
    }
}

impl fmt::Display for AccessibilityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown accessibility mode '{0}' (expected default, dyslexia or high-contrast)")]
pub struct ParseModeError(pub String);

impl FromStr for AccessibilityMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        let wanted = match wanted.as_str() {
            "highcontrast" | "contrast" => "high-contrast",
            "dyslexia-friendly" => "dyslexia",
            other => other,
        };
        AccessibilityMode::ALL
            .into_iter()
            .find(|mode| mode.name() == wanted)
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}
