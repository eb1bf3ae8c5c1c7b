//! In-process memo of successful lookups.
//!
//! Only successes are kept, so a rejected or failed address is asked again
//! next time. Entries live as long as the wrapper.

use log::debug;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::client::{GeoClient, GeoLookup};
use crate::error::LookupError;
use crate::geo::Geodata;

#[derive(Debug)]
pub struct CachedLookup<L> {
    inner: L,
    entries: Mutex<HashMap<String, Geodata>>,
}

impl<L> CachedLookup<L> {
    pub fn new(inner: L) -> Self {
        CachedLookup {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    pub fn get(&self, ip: &str) -> Option<Geodata> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(ip)
            .cloned()
    }

    fn insert(&self, ip: &str, geodata: Geodata) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(ip.to_string(), geodata);
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<L: GeoLookup + Sync> GeoLookup for CachedLookup<L> {
    async fn lookup(&self, ip: &str) -> Result<Geodata, LookupError> {
        if let Some(hit) = self.get(ip) {
            debug!("cache hit for {}", ip);
            return Ok(hit);
        }
        let geodata = self.inner.lookup(ip).await?;
        self.insert(ip, geodata.clone());
        Ok(geodata)
    }
}

impl CachedLookup<GeoClient> {
    /// Batch lookup that only sends the addresses not cached yet, each once.
    ///
    /// A repeated address that failed gets its error on the first occurrence
    /// and an upstream error on the later ones.
    pub async fn lookup_batch(
        &self,
        ips: &[&str],
    ) -> Result<Vec<Result<Geodata, LookupError>>, LookupError> {
        let mut misses: Vec<&str> = Vec::new();
        for &ip in ips {
            if self.get(ip).is_none() && !misses.contains(&ip) {
                misses.push(ip);
            }
        }
        debug!("{} of {} addresses not cached", misses.len(), ips.len());

        let mut fetched: HashMap<&str, Result<Geodata, LookupError>> = HashMap::new();
        if !misses.is_empty() {
            let results = self.inner.lookup_batch(&misses).await?;
            for (ip, result) in misses.iter().copied().zip(results) {
                if let Ok(geodata) = &result {
                    self.insert(ip, geodata.clone());
                }
                fetched.insert(ip, result);
            }
        }

        Ok(ips
            .iter()
            .map(|ip| match self.get(ip) {
                Some(geodata) => Ok(geodata),
                None => fetched
                    .remove(ip)
                    .unwrap_or_else(|| Err(LookupError::upstream("already failed in this batch"))),
            })
            .collect())
    }
}
