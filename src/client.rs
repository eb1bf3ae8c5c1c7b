use log::debug;
use std::future::Future;
use url::Url;

use crate::config::Config;
use crate::error::LookupError;
use crate::geo::Geodata;
use crate::provider::Provider;

/// Most addresses ip-api.com accepts in one batch request.
pub const BATCH_LIMIT: usize = 100;

/// Something that can resolve an address to a location.
pub trait GeoLookup {
    fn lookup(&self, ip: &str) -> impl Future<Output = Result<Geodata, LookupError>> + Send;
}

/// HTTP-backed lookup against one provider.
#[derive(Debug, Clone)]
pub struct GeoClient {
    http: reqwest::Client,
    provider: Provider,
    base: Url,
}

impl GeoClient {
    pub fn new(config: &Config) -> Result<GeoClient, LookupError> {
        let base = Url::parse(config.base_url())?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(concat!("geolocate/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(GeoClient {
            http,
            provider: config.provider,
            base,
        })
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Looks up several addresses, one entry per address in input order.
    ///
    /// Providers with a batch endpoint get one POST per `BATCH_LIMIT`
    /// addresses; the others get one GET per address. The outer error means a
    /// whole batch request failed.
    pub async fn lookup_batch(
        &self,
        ips: &[&str],
    ) -> Result<Vec<Result<Geodata, LookupError>>, LookupError> {
        let mut results = Vec::with_capacity(ips.len());
        let Some(url) = self.provider.batch_url(&self.base)? else {
            for ip in ips {
                results.push(self.lookup(ip).await);
            }
            return Ok(results);
        };

        for chunk in ips.chunks(BATCH_LIMIT) {
            debug!("POST {} ({} addresses)", url, chunk.len());
            let response = self.http.post(url.clone()).json(chunk).send().await?;
            let body = response.bytes().await?;
            let decoded = self.provider.decode_batch(&body)?;
            if decoded.len() != chunk.len() {
                return Err(LookupError::upstream(format!(
                    "batch answered {} entries for {} addresses",
                    decoded.len(),
                    chunk.len()
                )));
            }
            results.extend(decoded);
        }
        Ok(results)
    }
}

impl GeoLookup for GeoClient {
    /// One GET, no retry. The status code is not checked: providers send their
    /// error payloads with 4xx codes and the payload decides the outcome.
    async fn lookup(&self, ip: &str) -> Result<Geodata, LookupError> {
        let url = self.provider.lookup_url(&self.base, ip)?;
        debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!("{} answered {} ({} bytes)", self.base, status, body.len());
        self.provider.decode(&body)
    }
}
