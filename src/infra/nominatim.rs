use crate::app::ports::Geocoder;
use crate::pipeline::rate_limiter::RateLimiter;
use async_trait::async_trait;
use serde::Deserialize;

const SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";
const USER_AGENT: &str = "road_sentiment_ai";

/// Nominatim name-to-coordinate resolver. Every query carries the fixed
/// metro qualifier, and the shared rate limiter enforces the service's
/// minimum request spacing globally, whatever the caller's concurrency.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    limiter: RateLimiter,
    qualifier: String,
}

// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(limiter: RateLimiter, qualifier: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            limiter,
            qualifier,
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<(f64, f64)>, String> {
        self.limiter.acquire().await;

        let qualified = format!("{query}, {}", self.qualifier);
        let resp = self
            .client
            .get(SEARCH_URL)
            .header("User-Agent", USER_AGENT)
            .query(&[("q", qualified.as_str()), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| format!("geocode request failed: {e}"))?;

        if !resp.status().is_success() {
            return Err(format!("geocode returned {}", resp.status()));
        }

        let places: Vec<Place> = resp
            .json()
            .await
            .map_err(|e| format!("geocode response unreadable: {e}"))?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };
        let lat = place
            .lat
            .parse::<f64>()
            .map_err(|e| format!("bad latitude {:?}: {e}", place.lat))?;
        let lon = place
            .lon
            .parse::<f64>()
            .map_err(|e| format!("bad longitude {:?}: {e}", place.lon))?;
        Ok(Some((lat, lon)))
    }
}
