//! Geolocation providers.
//!
//! Each provider knows where to send the address and how to turn its JSON
//! payload into a [`Geodata`], or into [`LookupError::Upstream`] when the
//! payload says the lookup failed.

use clap::ValueEnum;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::error::LookupError;
use crate::geo::Geodata;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Provider {
    /// https://ipapi.co/<ip>/json/
    #[default]
    IpapiCo,
    /// http://ip-api.com/json/<ip>
    IpApiCom,
}

impl Provider {
    pub fn default_base(&self) -> &'static str {
        match self {
            Provider::IpapiCo => "https://ipapi.co",
            Provider::IpApiCom => "http://ip-api.com",
        }
    }

    /// Builds the request URL. The address goes in as a single path segment,
    /// so anything other than an address cannot escape into the rest of the path.
    pub fn lookup_url(&self, base: &Url, ip: &str) -> Result<Url, LookupError> {
        let mut url = base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
            segments.pop_if_empty();
            match self {
                Provider::IpapiCo => {
                    segments.push(ip).push("json").push("");
                }
                Provider::IpApiCom => {
                    segments.push("json").push(ip);
                }
            }
        }
        Ok(url)
    }

    /// Where to POST a list of addresses, for providers that take one.
    pub fn batch_url(&self, base: &Url) -> Result<Option<Url>, LookupError> {
        match self {
            Provider::IpapiCo => Ok(None),
            Provider::IpApiCom => {
                let mut url = base.clone();
                url.path_segments_mut()
                    .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
                    .pop_if_empty()
                    .push("batch");
                Ok(Some(url))
            }
        }
    }

    /// Decodes a batch answer: one entry per address, in request order.
    pub fn decode_batch(&self, body: &[u8]) -> Result<Vec<Result<Geodata, LookupError>>, LookupError> {
        let results = match self {
            Provider::IpapiCo => serde_json::from_slice::<Vec<IpapiCoBody>>(body)?
                .into_iter()
                .map(IpapiCoBody::into_geodata)
                .collect(),
            Provider::IpApiCom => serde_json::from_slice::<Vec<IpApiComBody>>(body)?
                .into_iter()
                .map(IpApiComBody::into_geodata)
                .collect(),
        };
        Ok(results)
    }

    pub fn decode(&self, body: &[u8]) -> Result<Geodata, LookupError> {
        match self {
            Provider::IpapiCo => serde_json::from_slice::<IpapiCoBody>(body)?.into_geodata(),
            Provider::IpApiCom => serde_json::from_slice::<IpApiComBody>(body)?.into_geodata(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IpapiCoBody {
    ip: Option<String>,
    country_name: Option<String>,
    region: Option<String>,
    city: Option<String>,
    postal: Option<String>,
    error: Option<Value>,
    reason: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    timezone: Option<String>,
    org: Option<String>,
    asn: Option<String>,
}

impl IpapiCoBody {
    fn into_geodata(self) -> Result<Geodata, LookupError> {
        if let Some(flag) = self.error.as_ref().filter(|v| truthy(v)) {
            let reason = match (self.reason, flag) {
                (Some(reason), _) => reason,
                (None, Value::String(s)) => s.clone(),
                (None, _) => "unknown error".to_string(),
            };
            return Err(LookupError::upstream(reason));
        }
        Ok(Geodata {
            ip: self.ip.unwrap_or_default(),
            country_name: self.country_name.unwrap_or_default(),
            region: self.region.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            zip: self.postal,
            latitude: self.latitude,
            longitude: self.longitude,
            timezone: self.timezone,
            isp: None,
            org: self.org,
            asn: self.asn,
        })
    }
}

/// The error flag counts the way a script would test it: absent, `null`,
/// `false`, `0` and `""` mean success.
fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpApiComBody {
    status: String,
    message: Option<String>,
    query: Option<String>,
    country: Option<String>,
    region_name: Option<String>,
    city: Option<String>,
    zip: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    timezone: Option<String>,
    isp: Option<String>,
    org: Option<String>,
    #[serde(rename = "as")]
    asn: Option<String>,
}

impl IpApiComBody {
    fn into_geodata(self) -> Result<Geodata, LookupError> {
        if self.status != "success" {
            return Err(LookupError::upstream(
                self.message.unwrap_or_else(|| self.status.clone()),
            ));
        }
        Ok(Geodata {
            ip: self.query.unwrap_or_default(),
            country_name: self.country.unwrap_or_default(),
            region: self.region_name.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            zip: self.zip.filter(|z| !z.is_empty()),
            latitude: self.lat,
            longitude: self.lon,
            timezone: self.timezone,
            isp: self.isp,
            org: self.org,
            asn: self.asn,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn ipapi_co_url_shape() {
        let url = Provider::IpapiCo
            .lookup_url(&base("https://ipapi.co"), "8.8.8.8")
            .unwrap();
        assert_eq!(url.as_str(), "https://ipapi.co/8.8.8.8/json/");
    }

    #[test]
    fn ip_api_com_url_shape() {
        let url = Provider::IpApiCom
            .lookup_url(&base("http://ip-api.com/"), "1.1.1.1")
            .unwrap();
        assert_eq!(url.as_str(), "http://ip-api.com/json/1.1.1.1");
    }

    #[test]
    fn address_stays_in_one_segment() {
        let url = Provider::IpapiCo
            .lookup_url(&base("https://ipapi.co"), "../admin?x=1")
            .unwrap();
        assert_eq!(url.path(), "/..%2Fadmin%3Fx=1/json/");
        assert!(url.query().is_none());
    }

    #[test]
    fn ipapi_co_success() {
        let body = br#"{"ip":"8.8.8.8","city":"Mountain View","region":"California",
            "country_name":"United States","latitude":37.42,"longitude":-122.08,
            "timezone":"America/Los_Angeles","asn":"AS15169","org":"GOOGLE"}"#;
        let gd = Provider::IpapiCo.decode(body).unwrap();
        assert_eq!(gd.ip, "8.8.8.8");
        assert_eq!(gd.city, "Mountain View");
        assert_eq!(gd.region, "California");
        assert_eq!(gd.country_name, "United States");
        assert_eq!(gd.asn.as_deref(), Some("AS15169"));
    }

    #[test]
    fn ipapi_co_error_flag() {
        let body = br#"{"ip":"nope","error":true,"reason":"Invalid IP Address"}"#;
        let err = Provider::IpapiCo.decode(body).unwrap_err();
        assert!(err.is_upstream());
        assert!(err.to_string().contains("Invalid IP Address"));
    }

    #[test]
    fn ipapi_co_falsy_error_flags_are_success() {
        for flag in ["null", "false", "0", "\"\""] {
            let body = format!(
                r#"{{"ip":"8.8.8.8","country_name":"United States","city":"Mountain View",
                    "region":"California","postal":"94043","error":{flag}}}"#
            );
            let gd = Provider::IpapiCo
                .decode(body.as_bytes())
                .unwrap_or_else(|e| panic!("error={flag}: {e}"));
            assert_eq!(gd.city, "Mountain View");
            assert_eq!(gd.zip.as_deref(), Some("94043"));
        }
    }

    #[test]
    fn ipapi_co_string_error_is_upstream() {
        let body = br#"{"ip":"nope","error":"Invalid IP"}"#;
        let err = Provider::IpapiCo.decode(body).unwrap_err();
        assert!(err.is_upstream());
        assert_eq!(err.to_string(), "provider rejected lookup: Invalid IP");

        let err = Provider::IpapiCo.decode(br#"{"error":1,"reason":"RateLimited"}"#).unwrap_err();
        assert!(err.to_string().contains("RateLimited"));
    }

    #[test]
    fn batch_url_only_for_ip_api_com() {
        let url = Provider::IpApiCom
            .batch_url(&base("http://ip-api.com"))
            .unwrap()
            .unwrap();
        assert_eq!(url.as_str(), "http://ip-api.com/batch");
        assert!(Provider::IpapiCo.batch_url(&base("https://ipapi.co")).unwrap().is_none());
    }

    #[test]
    fn batch_decodes_each_entry() {
        let body = br#"[{"status":"success","country":"Canada","city":"Toronto","query":"24.48.0.1","zip":"M5A"},
            {"status":"fail","message":"private range","query":"10.0.0.1"}]"#;
        let results = Provider::IpApiCom.decode_batch(body).unwrap();
        assert_eq!(results.len(), 2);
        let first = results[0].as_ref().unwrap();
        assert_eq!(first.country_name, "Canada");
        assert_eq!(first.zip.as_deref(), Some("M5A"));
        assert!(results[1].as_ref().unwrap_err().is_upstream());
    }

    #[test]
    fn ipapi_co_nulls_become_empty() {
        let body = br#"{"ip":"10.0.0.1","city":null,"region":null,"country_name":null}"#;
        let gd = Provider::IpapiCo.decode(body).unwrap();
        assert_eq!(gd.city, "");
        assert_eq!(gd.country_name, "");
    }

    #[test]
    fn ip_api_com_fail_status() {
        let body = br#"{"status":"fail","message":"private range","query":"10.0.0.1"}"#;
        let err = Provider::IpApiCom.decode(body).unwrap_err();
        assert!(err.is_upstream());
        assert!(err.to_string().contains("private range"));
    }

    #[test]
    fn ip_api_com_success() {
        let body = br#"{"status":"success","country":"Germany","regionName":"Hesse",
            "city":"Frankfurt am Main","lat":50.11,"lon":8.68,"timezone":"Europe/Berlin",
            "isp":"Example ISP","org":"Example Org","as":"AS64500 Example","query":"203.0.113.9"}"#;
        let gd = Provider::IpApiCom.decode(body).unwrap();
        assert_eq!(gd.ip, "203.0.113.9");
        assert_eq!(gd.region, "Hesse");
        assert_eq!(gd.isp.as_deref(), Some("Example ISP"));
        assert_eq!(gd.asn.as_deref(), Some("AS64500 Example"));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = Provider::IpapiCo.decode(b"<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, LookupError::Decode(_)));
    }
}
