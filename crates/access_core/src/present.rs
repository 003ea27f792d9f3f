use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use crate::ProcessingResult;

pub const TEXT_PLACEHOLDER: &str = "No simplified text returned.";
pub const AUDIO_PLACEHOLDER: &str = "No audio generated.";
pub const DEFAULT_SIGN_LOOKUP: &str = "https://www.signasl.org/sign/";

/// Everything except the characters a URI component may carry unescaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Base address of the external sign-language lookup site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignLookup {
    base: Url,
}

impl SignLookup {
    pub fn new(base: &str) -> Result<Self, url::ParseError> {
        let base = Url::parse(base)?;
        if base.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        Ok(Self { base })
    }

    /// Link for one keyword, percent-encoded as a URI component and appended
    /// to the base. The result is not re-parsed, so `.` and `..` stay literal.
    pub fn link_for(&self, keyword: &str) -> String {
        let base = self.base.as_str();
        let separator = if base.ends_with('/') { "" } else { "/" };
        format!(
            "{base}{separator}{}",
            utf8_percent_encode(keyword, COMPONENT)
        )
    }
}

impl Default for SignLookup {
    fn default() -> Self {
        Self {
            base: Url::parse(DEFAULT_SIGN_LOOKUP).expect("default sign lookup url is valid"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignLink {
    pub keyword: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioPanel {
    Player { src: String },
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPanel {
    SimplifiedText { text: String, is_placeholder: bool },
    Audio(AudioPanel),
    Keywords(Vec<SignLink>),
    Download { url: String },
}

/// Decides which panels to render, in the fixed order text, audio, keywords, download.
pub fn present_result(result: &ProcessingResult, lookup: &SignLookup) -> Vec<ResultPanel> {
    let mut panels = Vec::with_capacity(4);

    panels.push(match &result.simplified_text {
        Some(text) => ResultPanel::SimplifiedText {
            text: text.clone(),
            is_placeholder: false,
        },
        None => ResultPanel::SimplifiedText {
            text: TEXT_PLACEHOLDER.to_string(),
            is_placeholder: true,
        },
    });

    panels.push(ResultPanel::Audio(match &result.audio_url {
        Some(src) => AudioPanel::Player { src: src.clone() },
        None => AudioPanel::Unavailable,
    }));

    if !result.keywords.is_empty() {
        let links = result
            .keywords
            .iter()
            .map(|keyword| SignLink {
                keyword: keyword.clone(),
                href: lookup.link_for(keyword),
            })
            .collect();
        panels.push(ResultPanel::Keywords(links));
    }

    if let Some(url) = &result.zip_url {
        panels.push(ResultPanel::Download { url: url.clone() });
    }

    panels
}

#[cfg(test)]
mod tests {
    use super::SignLookup;

    #[test]
    fn keyword_is_encoded_as_one_segment() {
        let lookup = SignLookup::default();
        assert_eq!(
            lookup.link_for("due process"),
            "https://www.signasl.org/sign/due%20process"
        );
        assert_eq!(
            lookup.link_for("a/b?c#d"),
            "https://www.signasl.org/sign/a%2Fb%3Fc%23d"
        );
    }

    #[test]
    fn reserved_characters_are_escaped_like_a_uri_component() {
        let lookup = SignLookup::default();
        assert_eq!(lookup.link_for("C++"), "https://www.signasl.org/sign/C%2B%2B");
        assert_eq!(lookup.link_for("AT&T"), "https://www.signasl.org/sign/AT%26T");
        assert_eq!(
            lookup.link_for("a=b;c,d"),
            "https://www.signasl.org/sign/a%3Db%3Bc%2Cd"
        );
        assert_eq!(lookup.link_for("[x]"), "https://www.signasl.org/sign/%5Bx%5D");
        assert_eq!(
            lookup.link_for("don't (sic)!"),
            "https://www.signasl.org/sign/don't%20(sic)!"
        );
        assert_eq!(lookup.link_for("café"), "https://www.signasl.org/sign/caf%C3%A9");
    }

    #[test]
    fn dot_keywords_are_not_normalized_away() {
        let lookup = SignLookup::default();
        assert_eq!(lookup.link_for(".."), "https://www.signasl.org/sign/..");
        assert_eq!(lookup.link_for("."), "https://www.signasl.org/sign/.");
    }

    #[test]
    fn base_without_trailing_slash_still_appends() {
        let lookup = SignLookup::new("https://signs.example.org/sign").unwrap();
        assert_eq!(lookup.link_for("law"), "https://signs.example.org/sign/law");
    }

    #[test]
    fn opaque_base_is_rejected() {
        assert!(SignLookup::new("mailto:signs@example.org").is_err());
    }
}
