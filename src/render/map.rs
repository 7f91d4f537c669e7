use crate::app::ports::Geocoder;
use crate::common::constants::MAP_CENTER;
use crate::domain::{EnrichedRecord, Sentiment};
use serde_json::json;
use std::collections::HashMap;
use tracing::{info, warn};

/// Marker color per sentiment, matching the legend.
fn sentiment_color(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Angry => "red",
        Sentiment::Frustrated => "orange",
        Sentiment::Neutral => "gray",
        Sentiment::Helpful => "green",
        Sentiment::Other => "blue",
        Sentiment::Error => "purple",
    }
}

/// Resolves each distinct found location once. Failed geocodes are logged
/// and dropped; absent/error extraction outcomes never reach the service.
pub async fn geocode_unique(
    geocoder: &dyn Geocoder,
    records: &[EnrichedRecord],
) -> HashMap<String, (f64, f64)> {
    let mut coords = HashMap::new();
    for record in records {
        let Some(location) = record.location.found() else {
            continue;
        };
        if coords.contains_key(location) {
            continue;
        }
        match geocoder.geocode(location).await {
            Ok(Some(point)) => {
                info!("Geocoded: {location} -> {point:?}");
                coords.insert(location.to_string(), point);
            }
            Ok(None) => info!("Not found: {location}"),
            Err(e) => warn!("Geocoding error for {location}: {e}"),
        }
    }
    coords
}

/// Renders a standalone Leaflet page: one marker per record with resolved
/// coordinates, colored by sentiment, plus a fixed legend.
pub fn render_map(records: &[EnrichedRecord], coords: &HashMap<String, (f64, f64)>) -> String {
    let mut markers = Vec::new();
    for record in records {
        let Some((lat, lon)) = record.location.found().and_then(|l| coords.get(l)) else {
            continue;
        };
        let popup = format!(
            "<b>{}</b><br><b>{}</b><br><i>{}</i>",
            title_case(&record.issue_type.to_string()),
            title_case(&record.sentiment.to_string()),
            escape_html(&record.title),
        );
        markers.push(json!({
            "lat": lat,
            "lon": lon,
            "color": sentiment_color(record.sentiment),
            "popup": popup,
        }));
    }

    let (center_lat, center_lon) = MAP_CENTER;
    let marker_data = serde_json::to_string(&markers).expect("marker serialization");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Salt Lake City Road Reports</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
  html, body, #map {{ height: 100%; margin: 0; }}
  .legend {{ position: fixed; bottom: 50px; left: 50px; z-index: 9999;
            background-color: white; padding: 10px; border: 2px solid black; }}
  .legend i {{ display: inline-block; width: 12px; height: 12px;
              border-radius: 50%; margin-right: 6px; }}
</style>
</head>
<body>
<div id="map"></div>
<div class="legend">
  <b>Sentiment Legend</b><br>
  <i style="background:red"></i> Angry<br>
  <i style="background:orange"></i> Frustrated<br>
  <i style="background:gray"></i> Neutral<br>
  <i style="background:green"></i> Helpful<br>
</div>
<script>
  var map = L.map('map').setView([{center_lat}, {center_lon}], 12);
  L.tileLayer('https://tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
    attribution: '&copy; OpenStreetMap contributors'
  }}).addTo(map);
  var markers = {marker_data};
  markers.forEach(function (m) {{
    L.circleMarker([m.lat, m.lon], {{ radius: 8, color: m.color, fillOpacity: 0.8 }})
      .bindPopup(m.popup)
      .addTo(map);
  }});
</script>
</body>
</html>
"#
    )
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IssueType, LocationOutcome, RawRecord, RecordKind};
    use chrono::Utc;

    fn enriched(title: &str, sentiment: Sentiment, location: LocationOutcome) -> EnrichedRecord {
        let raw = RawRecord {
            subreddit: "SaltLakeCity".to_string(),
            kind: RecordKind::Post,
            title: title.to_string(),
            body: "body".to_string(),
            url: "https://example.com".to_string(),
            score: Some(3),
            created_utc: Utc::now(),
            id: "id".to_string(),
        };
        EnrichedRecord::new(raw, IssueType::Pothole, sentiment, location)
    }

    #[test]
    fn skips_records_without_resolved_coordinates() {
        let records = vec![
            enriched("mapped", Sentiment::Angry, LocationOutcome::Found("Main St".to_string())),
            enriched("unmapped", Sentiment::Angry, LocationOutcome::Found("Nowhere".to_string())),
            enriched("absent", Sentiment::Angry, LocationOutcome::Absent),
            enriched("failed", Sentiment::Angry, LocationOutcome::Failed),
        ];
        let mut coords = HashMap::new();
        coords.insert("Main St".to_string(), (40.76, -111.89));

        let html = render_map(&records, &coords);

        assert!(html.contains("mapped"));
        assert!(!html.contains("unmapped"));
        assert!(!html.contains("absent"));
        assert!(!html.contains("failed"));
    }

    #[test]
    fn escapes_markup_in_titles() {
        let records = vec![enriched(
            "<script>alert(1)</script>",
            Sentiment::Neutral,
            LocationOutcome::Found("Main St".to_string()),
        )];
        let mut coords = HashMap::new();
        coords.insert("Main St".to_string(), (40.76, -111.89));

        let html = render_map(&records, &coords);

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn includes_legend_and_center() {
        let html = render_map(&[], &HashMap::new());
        assert!(html.contains("Sentiment Legend"));
        assert!(html.contains("40.7608"));
    }
}
