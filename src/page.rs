//! In-process page: the form container, the address input and the result
//! container the lookup writes into.

use std::fmt;

use crate::client::GeoLookup;
use crate::outcome::{self, Outcome};
use crate::render;

pub const FORM_ID: &str = "geolocate-form";
pub const INPUT_ID: &str = "ip-address";
pub const RESULT_ID: &str = "geolocation-result";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    None,
    Block,
}

impl Display {
    fn css(&self) -> &'static str {
        match self {
            Display::None => "none",
            Display::Block => "block",
        }
    }
}

#[derive(Debug, Default)]
pub struct Page {
    form_display: Display,
    input: String,
    result: String,
}

impl Page {
    pub fn new() -> Self {
        Page::default()
    }

    /// Makes the input form visible.
    pub fn show_geolocate_form(&mut self) {
        self.form_display = Display::Block;
    }

    pub fn form_visible(&self) -> bool {
        self.form_display == Display::Block
    }

    pub fn form_display(&self) -> Display {
        self.form_display
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Current contents of the result container.
    pub fn result_html(&self) -> &str {
        &self.result
    }

    /// Looks up the address in the input field and writes the outcome into
    /// the result container. Blank input never reaches `lookup`.
    pub async fn geolocate_ip<L: GeoLookup>(&mut self, lookup: &L) -> Outcome {
        self.result.clear();
        let outcome = outcome::resolve(lookup, &self.input).await;
        self.result = outcome.html();
        outcome
    }
}

/// Markup for the three elements, keyed by their ids.
impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "<div id=\"{}\" style=\"display: {}\"><input id=\"{}\" value=\"{}\"></div>",
            FORM_ID,
            self.form_display.css(),
            INPUT_ID,
            render::escape_html(self.input())
        )?;
        write!(f, "<div id=\"{}\">{}</div>", RESULT_ID, self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use crate::geo::Geodata;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Canned {
        Found(Geodata),
        Rejected,
    }

    struct StubLookup {
        calls: AtomicUsize,
        answer: Canned,
    }

    impl StubLookup {
        fn new(answer: Canned) -> Self {
            StubLookup {
                calls: AtomicUsize::new(0),
                answer,
            }
        }
    }

    impl GeoLookup for StubLookup {
        async fn lookup(&self, _ip: &str) -> Result<Geodata, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.answer {
                Canned::Found(gd) => Ok(gd.clone()),
                Canned::Rejected => Err(LookupError::upstream("Invalid IP Address")),
            }
        }
    }

    #[test]
    fn form_starts_hidden_and_reveals() {
        let mut page = Page::new();
        assert_eq!(page.form_display(), Display::None);
        page.show_geolocate_form();
        assert!(page.form_visible());
    }

    #[tokio::test]
    async fn markup_reflects_state() {
        let stub = StubLookup::new(Canned::Rejected);
        let mut page = Page::new();
        assert!(page
            .to_string()
            .starts_with("<div id=\"geolocate-form\" style=\"display: none\">"));

        page.show_geolocate_form();
        page.set_input("\"><b>");
        page.geolocate_ip(&stub).await;
        let markup = page.to_string();
        assert!(markup.contains("style=\"display: block\""));
        assert!(markup.contains("<input id=\"ip-address\" value=\"&quot;&gt;&lt;b&gt;\">"));
        assert!(markup.ends_with(&format!(
            "<div id=\"geolocation-result\">{}</div>",
            render::LOOKUP_FAILED
        )));
        assert_eq!(page.input(), "\"><b>");
    }

    #[tokio::test]
    async fn blank_input_skips_lookup() {
        let stub = StubLookup::new(Canned::Rejected);
        let mut page = Page::new();
        for blank in ["", "   ", "\t\n"] {
            page.set_input(blank);
            page.geolocate_ip(&stub).await;
            assert_eq!(page.result_html(), render::EMPTY_INPUT);
        }
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rejected_lookup_renders_no_fields() {
        let stub = StubLookup::new(Canned::Rejected);
        let mut page = Page::new();
        page.set_input("999.1.1.1");
        page.geolocate_ip(&stub).await;
        assert_eq!(page.result_html(), render::LOOKUP_FAILED);
        assert!(!page.result_html().contains("IP Address"));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn found_lookup_replaces_previous_result() {
        let stub = StubLookup::new(Canned::Found(Geodata::new(
            "10.1.1.1", "", "", "",
        )));
        let mut page = Page::new();
        page.set_input("");
        page.geolocate_ip(&stub).await;
        page.set_input(" 10.1.1.1 ");
        let outcome = page.geolocate_ip(&stub).await;
        assert!(matches!(outcome, Outcome::Found(_)));
        assert!(!page.result_html().contains(render::EMPTY_INPUT));
        assert!(page.result_html().ends_with(render::PRIVATE_NOTE));
    }
}
