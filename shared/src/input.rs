//! Decoding of loosely typed arguments coming from host page scripts.

use serde::Deserialize;

use crate::coordinate::Coordinate;

/// Trimmed decimal text, or NaN when it is not a number.
pub fn parse_number(text: &str) -> f64 {
    text.trim().parse().unwrap_or(f64::NAN)
}

/// A number as pages pass it: a JS number or the raw text of an input field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

impl NumberInput {
    pub fn value(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(text) => parse_number(text),
        }
    }
}

/// One `fitToBounds` entry: a `[lat, lon]` pair or a `{lat, lon}` /
/// `{lat, lng}` object. `lon` wins when both keys are present.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CoordinateInput {
    Pair(Vec<NumberInput>),
    Object {
        lat: NumberInput,
        lon: Option<NumberInput>,
        lng: Option<NumberInput>,
    },
}

impl CoordinateInput {
    pub fn to_coordinate(&self) -> Option<Coordinate> {
        let (lat, lon) = match self {
            Self::Pair(pair) => (pair.first()?.value(), pair.get(1)?.value()),
            Self::Object { lat, lon, lng } => {
                (lat.value(), lon.as_ref().or(lng.as_ref())?.value())
            }
        };
        Coordinate::new(lat, lon).ok()
    }
}

/// Keep the entries that name a valid coordinate, in order.
pub fn valid_coordinates(items: impl IntoIterator<Item = CoordinateInput>) -> Vec<Coordinate> {
    items
        .into_iter()
        .filter_map(|item| item.to_coordinate())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Vec<CoordinateInput> {
        let items: Vec<serde_json::Value> = serde_json::from_str(json).unwrap();
        items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()
    }

    #[test]
    fn numbers_accept_field_text() {
        assert_eq!(parse_number(" 18.52 "), 18.52);
        assert_eq!(parse_number("-73.9"), -73.9);
        assert!(parse_number("").is_nan());
        assert!(parse_number("12 N").is_nan());

        let text: NumberInput = serde_json::from_str(r#""45.5""#).unwrap();
        assert_eq!(text.value(), 45.5);
        let number: NumberInput = serde_json::from_str("7").unwrap();
        assert_eq!(number.value(), 7.0);
    }

    #[test]
    fn pairs_and_objects_decode() {
        let coords = valid_coordinates(decode(
            r#"[[10, 20], ["11.5", " 21.5"], {"lat": 12, "lon": 22}, {"lat": "13", "lng": 23}]"#,
        ));
        assert_eq!(
            coords,
            vec![
                Coordinate { lat: 10.0, lon: 20.0 },
                Coordinate { lat: 11.5, lon: 21.5 },
                Coordinate { lat: 12.0, lon: 22.0 },
                Coordinate { lat: 13.0, lon: 23.0 },
            ]
        );
    }

    #[test]
    fn lon_preferred_over_lng() {
        let coords = valid_coordinates(decode(r#"[{"lat": 1, "lon": 2, "lng": 3}]"#));
        assert_eq!(coords, vec![Coordinate { lat: 1.0, lon: 2.0 }]);
    }

    #[test]
    fn invalid_entries_are_dropped() {
        let coords = valid_coordinates(decode(
            r#"[[95, 0], [10], {"lat": 5}, ["x", 4], "10,20", null, {"lat": 1, "lon": 200}, [-45, 170]]"#,
        ));
        assert_eq!(coords, vec![Coordinate { lat: -45.0, lon: 170.0 }]);
    }
}
