use anyhow::Result;

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod geo;
pub mod logging;
pub mod netclass;
pub mod outcome;
pub mod page;
pub mod provider;
pub mod render;

pub use cache::CachedLookup;
pub use client::{GeoClient, GeoLookup};
pub use config::Config;
pub use error::LookupError;
pub use geo::Geodata;
pub use outcome::Outcome;
pub use page::Page;
pub use provider::Provider;

/// How a finished lookup is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// The result container's HTML fragment
    Html,
    /// Styled terminal report
    Terminal,
}

impl Output {
    fn show(&self, outcome: &Outcome) -> String {
        match self {
            Output::Html => outcome.html(),
            Output::Terminal => outcome.terminal(),
        }
    }
}

/// Look up one address and print the outcome.
///
/// Returns the printed text so callers and tests can inspect it.
pub async fn lookup_one<L: GeoLookup>(lookup: &L, ip: &str, output: Output) -> Result<String> {
    let text = match output {
        Output::Html => {
            let mut page = Page::new();
            page.show_geolocate_form();
            page.set_input(ip);
            page.geolocate_ip(lookup).await;
            page.result_html().to_owned()
        }
        Output::Terminal => output.show(&outcome::resolve(lookup, ip).await),
    };
    println!("{}", text);
    Ok(text)
}

/// Look up a list of addresses with as few requests as the provider allows,
/// printing one result per address. Blank entries are reported without a
/// request.
pub async fn lookup_many(
    lookup: &CachedLookup<GeoClient>,
    ips: &[String],
    output: Output,
) -> Result<Vec<Outcome>> {
    let wanted: Vec<&str> = ips
        .iter()
        .map(|ip| ip.trim())
        .filter(|ip| !ip.is_empty())
        .collect();
    let mut fetched = lookup.lookup_batch(&wanted).await?.into_iter();

    let mut outcomes = Vec::with_capacity(ips.len());
    for ip in ips.iter().map(|ip| ip.trim()) {
        let outcome = if ip.is_empty() {
            Outcome::EmptyInput
        } else {
            match fetched.next() {
                Some(result) => Outcome::from_result(ip, result),
                None => Outcome::FetchFailed,
            }
        };
        println!("{}", output.show(&outcome));
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

/// Reveal the form, then run one lookup per line read from `lines` until EOF.
pub async fn run_interactive<L, R>(lookup: &L, lines: R, output: Output) -> Result<usize>
where
    L: GeoLookup,
    R: tokio::io::AsyncBufRead + Unpin,
{
    use tokio::io::AsyncBufReadExt;

    let mut page = Page::new();
    page.show_geolocate_form();
    eprintln!("{}", console::style("Enter an IP address (Ctrl-D to quit):").bold());

    let mut lines = lines.lines();
    let mut count = 0;
    while let Some(line) = lines.next_line().await? {
        page.set_input(line);
        let outcome = page.geolocate_ip(lookup).await;
        println!("{}", output.show(&outcome));
        count += 1;
    }
    Ok(count)
}
