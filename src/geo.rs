use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of one geolocation lookup, normalised across providers.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Geodata {
    pub ip: String,
    pub country_name: String,
    pub region: String,
    pub city: String,
    pub zip: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub isp: Option<String>,
    pub org: Option<String>,
    pub asn: Option<String>,
}

impl Geodata {
    pub fn new(ip: &str, country_name: &str, region: &str, city: &str) -> Geodata {
        Geodata {
            ip: String::from(ip),
            country_name: country_name.to_string(),
            region: region.to_string(),
            city: city.to_string(),
            ..Default::default()
        }
    }

    /// "lat, lon" when the provider returned coordinates.
    pub fn coordinates(&self) -> Option<String> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(format!("{:.4}, {:.4}", lat, lon)),
            _ => None,
        }
    }
}

impl fmt::Display for Geodata {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "Loc: {}, {}, {}",
            self.city, self.region, self.country_name
        )?;
        if let Some(zip) = &self.zip {
            writeln!(f, "Zip: {}", zip)?;
        }
        if let Some(coords) = self.coordinates() {
            writeln!(f, "Coords: {}", coords)?;
        }
        if let Some(tz) = &self.timezone {
            writeln!(f, "TZ: {}", tz)?;
        }
        if let Some(isp) = &self.isp {
            writeln!(f, "ISP: {}", isp)?;
        }
        if let Some(org) = &self.org {
            writeln!(f, "Org: {}", org)?;
        }
        if let Some(asn) = &self.asn {
            writeln!(f, "AS: {}", asn)?;
        }
        Ok(())
    }
}
