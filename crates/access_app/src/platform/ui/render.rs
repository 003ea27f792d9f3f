use std::fmt::Write as _;

use access_core::{AppViewModel, AudioPanel, InputView, ResultPanel, AUDIO_PLACEHOLDER};
use url::Url;

const BOLD: &str = "\x1b[1m";
const INVERSE: &str = "\x1b[1;7m";
const RESET: &str = "\x1b[0m";

/// Terminal rendering for one presentation class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TextStyle {
    width: usize,
    spaced_lines: bool,
    heading: &'static str,
}

const BASE_STYLE: TextStyle = TextStyle {
    width: 80,
    spaced_lines: false,
    heading: BOLD,
};

// Later classes in a mode's class list override earlier ones.
const CLASS_STYLES: &[(&str, TextStyle)] = &[
    ("container", BASE_STYLE),
    (
        "dyslexia",
        TextStyle {
            width: 60,
            spaced_lines: true,
            heading: BOLD,
        },
    ),
    (
        "highcontrast",
        TextStyle {
            width: 80,
            spaced_lines: false,
            heading: INVERSE,
        },
    ),
];

fn style_for(classes: &[&str]) -> TextStyle {
    classes
        .iter()
        .filter_map(|class| {
            CLASS_STYLES
                .iter()
                .find(|(name, _)| name == class)
                .map(|(_, style)| *style)
        })
        .last()
        .unwrap_or(BASE_STYLE)
}

/// Renders the view as terminal text. Audio and bundle references are shown
/// resolved against `link_base`, the processing endpoint.
pub fn render(view: &AppViewModel, color: bool, link_base: &Url) -> String {
    let style = style_for(view.mode_classes);
    let mut out = String::new();

    let input = match &view.input {
        InputView::Empty => "(none)".to_string(),
        InputView::Document { filename } => format!("document {filename}"),
        InputView::Url(url) => format!("url {url}"),
    };
    let _ = writeln!(out, "Mode: {} | Input: {}", view.mode.label(), input);

    let action = if view.busy {
        format!("[ {} ] please wait", view.stage_label)
    } else if view.submit_enabled {
        format!("[ {} ] type 'submit'", view.stage_label)
    } else {
        format!("[ {} ] choose a file or enter a url first", view.stage_label)
    };
    let _ = writeln!(out, "{action}");

    if let Some(panels) = &view.panels {
        for panel in panels {
            out.push('\n');
            render_panel(&mut out, panel, style, color, link_base);
        }
    }
    out
}

fn render_panel(
    out: &mut String,
    panel: &ResultPanel,
    style: TextStyle,
    color: bool,
    link_base: &Url,
) {
    match panel {
        ResultPanel::SimplifiedText { text, .. } => {
            heading(out, "Simplified Text", style, color);
            for line in wrap(text, style.width) {
                let _ = writeln!(out, "{line}");
                if style.spaced_lines && !line.is_empty() {
                    out.push('\n');
                }
            }
        }
        ResultPanel::Audio(audio) => {
            heading(out, "Audio", style, color);
            match audio {
                AudioPanel::Player { src } => {
                    let _ = writeln!(out, "Listen: {}", resolve_link(link_base, src));
                }
                AudioPanel::Unavailable => {
                    let _ = writeln!(out, "{AUDIO_PLACEHOLDER}");
                }
            }
        }
        ResultPanel::Keywords(links) => {
            heading(out, "Key Terms in Sign Language", style, color);
            for link in links {
                let _ = writeln!(out, "  {}  {}", link.keyword, link.href);
            }
        }
        ResultPanel::Download { url } => {
            heading(out, "Accessibility Pack", style, color);
            let _ = writeln!(
                out,
                "{}  (type 'download' to save it)",
                resolve_link(link_base, url)
            );
        }
    }
}

/// Absolute references pass through; a reference that does not resolve is shown as given.
fn resolve_link(base: &Url, reference: &str) -> String {
    base.join(reference.trim())
        .map(|url| url.to_string())
        .unwrap_or_else(|_| reference.to_string())
}

fn heading(out: &mut String, title: &str, style: TextStyle, color: bool) {
    if color {
        let _ = writeln!(out, "{}{}{}", style.heading, title, RESET);
    } else {
        let _ = writeln!(out, "{title}");
        let _ = writeln!(out, "{}", "-".repeat(title.chars().count()));
    }
}

/// Greedy word wrap. Paragraph breaks are kept as empty lines.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }
    lines
}
