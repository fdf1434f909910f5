//! `ArcGIS` `FeatureServer` / `MapServer` boundary query.
//!
//! Issues a single attribute-equality query with `f=geojson` and returns
//! the first matching feature. Some `ArcGIS` services answer HTTP 200 with
//! an embedded `{ "error": { ... } }` envelope, which is reported as
//! [`BoundaryError::Application`] rather than as an empty result.

use std::time::Duration;

use crime_watch_boundary_models::GeographicFeature;

use crate::BoundaryError;

/// Builds an attribute-equality `where` clause (`FIELD = 'value'`).
///
/// Single quotes in the value are doubled, as the `ArcGIS` SQL dialect
/// expects. Always an exact match, never `LIKE`.
#[must_use]
pub fn where_equals(field: &str, value: &str) -> String {
    format!("{field} = '{}'", value.replace('\'', "''"))
}

/// Queries an `ArcGIS` layer and returns the first matching feature.
///
/// Requests every attribute, WGS84 (`outSR=4326`) coordinates, and
/// `GeoJSON` output with geometry.
///
/// # Errors
///
/// Returns [`BoundaryError`] if the request fails, the server returns a
/// non-success status or an embedded error payload, the body cannot be
/// parsed, no features match, or the first feature is not a polygon.
pub async fn query_feature(
    client: &reqwest::Client,
    url: &str,
    where_clause: &str,
    timeout: Duration,
) -> Result<GeographicFeature, BoundaryError> {
    let resp = client
        .get(url)
        .query(&[
            ("where", where_clause),
            ("outFields", "*"),
            ("outSR", "4326"),
            ("f", "geojson"),
            ("returnGeometry", "true"),
        ])
        .header(
            reqwest::header::ACCEPT,
            "application/json, application/geo+json",
        )
        .timeout(timeout)
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(BoundaryError::Status {
            status: status.as_u16(),
        });
    }
    let body = resp.text().await?;

    let json: serde_json::Value = serde_json::from_str(&body)?;
    parse_response(json)
}

/// Extracts the first feature from an `ArcGIS` `GeoJSON` response.
fn parse_response(json: serde_json::Value) -> Result<GeographicFeature, BoundaryError> {
    if let Some(error) = json.get("error") {
        let message = error["message"]
            .as_str()
            .map(String::from)
            .or_else(|| error["code"].as_i64().map(|c| format!("code {c}")))
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(BoundaryError::Application { message });
    }

    let Some(first) = json["features"]
        .as_array()
        .and_then(|features| features.first())
    else {
        return Err(BoundaryError::EmptyResult);
    };

    let feature: geojson::Feature = serde_json::from_value(first.clone())?;
    Ok(GeographicFeature::try_from(feature)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn where_clause_is_exact_equality() {
        assert_eq!(where_equals("PAR23NM", "Codford"), "PAR23NM = 'Codford'");
        assert_eq!(
            where_equals("PAR23NM", "St Mary's"),
            "PAR23NM = 'St Mary''s'"
        );
    }

    #[test]
    fn embedded_error_is_application_failure() {
        let json = serde_json::json!({
            "error": { "code": 400, "message": "Invalid or missing input parameters." }
        });
        match parse_response(json) {
            Err(BoundaryError::Application { message }) => {
                assert_eq!(message, "Invalid or missing input parameters.");
            }
            other => panic!("expected application error, got {other:?}"),
        }
    }

    #[test]
    fn embedded_error_without_message_uses_code() {
        let json = serde_json::json!({ "error": { "code": 499 } });
        match parse_response(json) {
            Err(BoundaryError::Application { message }) => assert_eq!(message, "code 499"),
            other => panic!("expected application error, got {other:?}"),
        }
    }

    #[test]
    fn empty_collection_is_empty_result() {
        let json = serde_json::json!({ "type": "FeatureCollection", "features": [] });
        assert!(matches!(parse_response(json), Err(BoundaryError::EmptyResult)));

        let json = serde_json::json!({ "type": "FeatureCollection" });
        assert!(matches!(parse_response(json), Err(BoundaryError::EmptyResult)));
    }

    #[test]
    fn returns_first_feature() {
        let json = serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "PAR24NM": "Codford" },
                    "geometry": {
                        "type": "MultiPolygon",
                        "coordinates": [[[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": { "PAR24NM": "Other" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[5.0, 5.0], [6.0, 5.0], [6.0, 6.0], [5.0, 5.0]]]
                    }
                }
            ]
        });
        let feature = parse_response(json).unwrap();
        assert_eq!(feature.property_str("PAR24NM"), Some("Codford"));
        assert_eq!(feature.geometry.outer_ring().len(), 4);
    }

    #[test]
    fn point_feature_is_unsupported() {
        let json = serde_json::json!({
            "features": [{
                "type": "Feature",
                "properties": {},
                "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }
            }]
        });
        assert!(matches!(
            parse_response(json),
            Err(BoundaryError::UnsupportedGeometry(_))
        ));
    }
}
