//! HTML fragments written into the result container, and the styled
//! terminal report printed by the CLI.

use console::style;
use std::fmt;

use crate::geo::Geodata;
use crate::netclass::{self, AddressClass};

pub const EMPTY_INPUT: &str = "<p>Please enter an IP address.</p>";
pub const LOOKUP_FAILED: &str = "<p>Failed to geolocate IP address.</p>";
pub const FETCH_FAILED: &str = "<p>Failed to fetch geolocation data.</p>";
pub const PRIVATE_NOTE: &str = "<p>This is a private IP address.</p>";

/// Result fragment for a successful lookup.
pub fn geodata_html(gd: &Geodata) -> String {
    let mut html = String::from("<h3>Geolocation Results</h3>");
    field(&mut html, "IP Address", &gd.ip);
    field(&mut html, "Country", &gd.country_name);
    field(&mut html, "City", &gd.city);
    field(&mut html, "Region", &gd.region);
    if netclass::looks_private(&gd.ip) {
        html.push_str(PRIVATE_NOTE);
    }
    html
}

fn field(html: &mut String, label: &str, value: &str) {
    html.push_str("<p><strong>");
    html.push_str(label);
    html.push_str(":</strong> ");
    html.push_str(&escape_html(value));
    html.push_str("</p>");
}

// provider values are untrusted
pub(crate) fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Terminal rendering of a successful lookup.
#[derive(Debug)]
pub struct Report<'a> {
    pub geodata: &'a Geodata,
    pub class: AddressClass,
}

impl<'a> Report<'a> {
    pub fn new(geodata: &'a Geodata) -> Self {
        Report {
            geodata,
            class: netclass::classify(&geodata.ip),
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{}: {}",
            style("IP").bold().red(),
            style(&self.geodata.ip).green()
        )?;
        write!(f, "{}", self.geodata)?;
        writeln!(f, "{}: {}", style("class").red(), style(self.class).cyan())?;
        if netclass::looks_private(&self.geodata.ip) {
            writeln!(f, "{}", style("This is a private IP address.").yellow())?;
        }
        Ok(())
    }
}
