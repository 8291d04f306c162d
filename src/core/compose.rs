use crate::domain::model::{ContentMode, Link, Message};
use std::path::Path;

/// Deterministic message composition. One `Composer` per invocation; the
/// composed [`Message`] is reused for every recipient, with `to` bound by
/// the transport at send time.
#[derive(Debug, Clone)]
pub struct Composer {
    pub from_name: String,
    pub subject: String,
    pub mode: ContentMode,
}

impl Composer {
    pub fn new(from_name: impl Into<String>, subject: impl Into<String>, mode: ContentMode) -> Self {
        Self {
            from_name: from_name.into(),
            subject: subject.into(),
            mode,
        }
    }

    /// Builds the final body from the base message and optional link. Only
    /// the body matching the active content mode is populated; the other is
    /// left empty. The attachment path is carried through unvalidated;
    /// existence is checked by the transport at send time.
    pub fn compose(&self, base: &str, link: Option<&Link>, attachment: Option<&Path>) -> Message {
        let (html_body, plain_body) = match (self.mode, link) {
            (ContentMode::Html, None) => (base.to_string(), String::new()),
            (ContentMode::Text, None) => (String::new(), base.to_string()),
            (ContentMode::Html, Some(link)) => (
                format!(
                    "<p>{}</p><p>Link: <a href=\"{}\">{}</a></p>",
                    base,
                    link.url,
                    link.display_text()
                ),
                String::new(),
            ),
            (ContentMode::Text, Some(link)) => {
                (String::new(), format!("{}\nLink: {}", base, link.url))
            }
        };

        Message {
            from_name: self.from_name.clone(),
            subject: self.subject.clone(),
            mode: self.mode,
            html_body,
            plain_body,
            attachment: attachment.map(Path::to_path_buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn composer(mode: ContentMode) -> Composer {
        Composer::new("Sender", "subject", mode)
    }

    fn link(url: &str, text: Option<&str>) -> Link {
        Link {
            url: url.to_string(),
            text: text.map(str::to_string),
        }
    }

    #[test]
    fn test_html_body_with_link_and_default_display_text() {
        let message = composer(ContentMode::Html).compose(
            "Hi",
            Some(&link("https://x.com", None)),
            None,
        );
        assert_eq!(
            message.html_body,
            "<p>Hi</p><p>Link: <a href=\"https://x.com\">https://x.com</a></p>"
        );
        assert!(message.plain_body.is_empty());
    }

    #[test]
    fn test_plain_body_with_link() {
        let message = composer(ContentMode::Text).compose(
            "Hi",
            Some(&link("https://x.com", None)),
            None,
        );
        assert_eq!(message.plain_body, "Hi\nLink: https://x.com");
        assert!(message.html_body.is_empty());
    }

    #[test]
    fn test_explicit_link_text_used_in_html() {
        let message = composer(ContentMode::Html).compose(
            "Hi",
            Some(&link("https://x.com", Some("click here"))),
            None,
        );
        assert_eq!(
            message.html_body,
            "<p>Hi</p><p>Link: <a href=\"https://x.com\">click here</a></p>"
        );
    }

    #[test]
    fn test_body_verbatim_without_link() {
        let html = composer(ContentMode::Html).compose("Hello <b>there</b>", None, None);
        assert_eq!(html.html_body, "Hello <b>there</b>");
        assert!(html.plain_body.is_empty());

        let plain = composer(ContentMode::Text).compose("Hello", None, None);
        assert_eq!(plain.plain_body, "Hello");
        assert!(plain.html_body.is_empty());
    }

    #[test]
    fn test_bodies_are_mutually_exclusive() {
        for mode in [ContentMode::Html, ContentMode::Text] {
            for link in [None, Some(link("https://x.com", Some("t")))] {
                let message = composer(mode).compose("body", link.as_ref(), None);
                assert!(
                    message.html_body.is_empty() || message.plain_body.is_empty(),
                    "both bodies populated for mode {:?}",
                    mode
                );
                assert!(!message.active_body().is_empty());
            }
        }
    }

    #[test]
    fn test_attachment_path_carried_through() {
        let path = PathBuf::from("/tmp/report.pdf");
        let message = composer(ContentMode::Text).compose("body", None, Some(&path));
        assert_eq!(message.attachment, Some(path));
    }

    #[test]
    fn test_compose_is_idempotent() {
        let composer = composer(ContentMode::Html);
        let link = link("https://x.com", Some("here"));
        let first = composer.compose("Hi", Some(&link), None);
        let second = composer.compose("Hi", Some(&link), None);
        assert_eq!(first, second);
    }
}
