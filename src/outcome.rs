//! What a lookup ended in, independent of how it is shown.

use log::{error, warn};

use crate::client::GeoLookup;
use crate::error::LookupError;
use crate::geo::Geodata;
use crate::netclass;
use crate::render;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing but whitespace was entered; no request was made.
    EmptyInput,
    Found(Geodata),
    /// The provider answered and said the lookup failed.
    Rejected { reason: String },
    /// Transport or decode failure.
    FetchFailed,
}

/// Trims `input`, looks it up unless blank, and classifies the result.
pub async fn resolve<L: GeoLookup>(lookup: &L, input: &str) -> Outcome {
    let ip = input.trim();
    if ip.is_empty() {
        return Outcome::EmptyInput;
    }
    Outcome::from_result(ip, lookup.lookup(ip).await)
}

impl Outcome {
    /// Logs the result of looking up `ip` and turns it into an outcome.
    pub fn from_result(ip: &str, result: Result<Geodata, LookupError>) -> Outcome {
        match result {
            Ok(geodata) => {
                if let Some(class) = netclass::heuristic_mismatch(&geodata.ip) {
                    warn!(
                        "private-address heuristic says {} for {} but it is {}",
                        if netclass::looks_private(&geodata.ip) { "private" } else { "public" },
                        geodata.ip,
                        class
                    );
                }
                Outcome::Found(geodata)
            }
            Err(LookupError::Upstream { reason }) => {
                warn!("Geolocation of {} failed: {}", ip, reason);
                Outcome::Rejected { reason }
            }
            Err(e) => {
                error!("Error fetching geolocation: {}", e);
                Outcome::FetchFailed
            }
        }
    }

    /// Fragment for the result container.
    pub fn html(&self) -> String {
        match self {
            Outcome::EmptyInput => render::EMPTY_INPUT.to_string(),
            Outcome::Found(geodata) => render::geodata_html(geodata),
            Outcome::Rejected { .. } => render::LOOKUP_FAILED.to_string(),
            Outcome::FetchFailed => render::FETCH_FAILED.to_string(),
        }
    }

    pub fn terminal(&self) -> String {
        match self {
            Outcome::EmptyInput => "Please enter an IP address.".to_string(),
            Outcome::Found(geodata) => render::Report::new(geodata).to_string(),
            Outcome::Rejected { reason } => {
                format!("Failed to geolocate IP address: {}", reason)
            }
            Outcome::FetchFailed => "Failed to fetch geolocation data.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_keeps_reason() {
        let outcome = Outcome::from_result("x", Err(LookupError::upstream("Invalid IP Address")));
        assert_eq!(
            outcome,
            Outcome::Rejected {
                reason: "Invalid IP Address".into()
            }
        );
        assert_eq!(outcome.html(), render::LOOKUP_FAILED);
        assert_eq!(
            outcome.terminal(),
            "Failed to geolocate IP address: Invalid IP Address"
        );
    }

    #[test]
    fn decode_error_is_fetch_failure() {
        let err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let outcome = Outcome::from_result("8.8.8.8", Err(err.into()));
        assert_eq!(outcome, Outcome::FetchFailed);
        assert_eq!(outcome.html(), render::FETCH_FAILED);
    }

    #[test]
    fn found_renders_both_ways() {
        console::set_colors_enabled(false);
        let gd = Geodata::new("8.8.8.8", "United States", "California", "Mountain View");
        let outcome = Outcome::from_result("8.8.8.8", Ok(gd.clone()));
        assert_eq!(outcome.html(), render::geodata_html(&gd));
        assert!(outcome.terminal().contains("Loc: Mountain View, California, United States"));
    }
}
