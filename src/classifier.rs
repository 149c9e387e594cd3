use log::*;
use serde::{Deserialize, Serialize};

use crate::palette::Palette;

/// A half-open range `[min, max)` mapped to a forecast category.
/// `max: None` means the range is unbounded above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub min: f64,
    pub max: Option<f64>,
    pub label: String,
    pub cover: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Bucket {
    pub fn new(min: f64, max: Option<f64>, label: &str, cover: &str, kind: &str) -> Self {
        Self {
            min,
            max,
            label: label.to_string(),
            cover: cover.to_string(),
            kind: kind.to_string(),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && self.max.map_or(true, |max| value < max)
    }
}

/// Visibility buckets in meters, highest visibility first.
///
/// Boundaries sit on whole meters so the ranges tile `[0, inf)`: a reading of
/// 50.5 m is "Very Dense/Very Thick Fog", 51 m is "Dense/Thick Fog".
pub fn fog_buckets() -> Vec<Bucket> {
    vec![
        Bucket::new(
            1001.0,
            None,
            "Almost Clear Sky",
            "More than 1000 meters",
            "High GHI",
        ),
        Bucket::new(
            501.0,
            Some(1001.0),
            "Shallow/Light Fog/Mist",
            "501 meters to 1 kilometer (1000 meters)",
            "Mild to moderate reduction in GHI; some sunlight penetration is possible, though scattered.",
        ),
        Bucket::new(
            201.0,
            Some(501.0),
            "Moderate Fog",
            "201 meters to 500 meters",
            "Low GHI; sunlight is highly diffused and weakened; direct sunlight is minimal or absent.",
        ),
        Bucket::new(
            51.0,
            Some(201.0),
            "Dense/Thick Fog",
            "51 meters to 200 meters",
            "Very low GHI; nearly all direct sunlight is blocked and scattered.",
        ),
        Bucket::new(
            0.0,
            Some(51.0),
            "Very Dense/Very Thick Fog",
            "0 meters to 50 meters (or less than 50 meters)",
            "GHI is extremely low or near zero; direct sunlight is completely absent, making conditions dark even during the day.",
        ),
    ]
}

/// Cloud cover buckets in percent, clearest first
pub fn cloud_buckets() -> Vec<Bucket> {
    vec![
        Bucket::new(0.0, Some(10.0), "Clear Sky", "0–10 %", "No Cloud"),
        Bucket::new(10.0, Some(30.0), "Low Cloud Cover", "10–30 %", "Few Clouds"),
        Bucket::new(
            30.0,
            Some(50.0),
            "Medium Cloud Cover",
            "30–50 %",
            "Scattered Clouds/Partly Cloudy",
        ),
        Bucket::new(
            50.0,
            Some(75.0),
            "High Cloud Cover",
            "50–75 %",
            "Broken Clouds/Mostly Cloudy",
        ),
        Bucket::new(75.0, None, "Overcast Cloud Cover", "75–100 %", "Cloudy/ Overcast"),
    ]
}

/// One line of the classification table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationRow {
    pub index: usize,
    pub cover: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub color: Option<String>,
}

/// Maps a measured value onto the configured buckets
#[derive(Debug, Clone)]
pub struct Classifier {
    buckets: Vec<Bucket>,
    palette: Palette,
}

impl Classifier {
    pub fn new(buckets: Vec<Bucket>, palette: Palette) -> Self {
        Self { buckets, palette }
    }

    /// Find the bucket for `value`.
    ///
    /// NaN, infinities and negative readings are treated as 0. When nothing
    /// matches, the last bucket in list order is returned. `None` only for an
    /// empty bucket list.
    pub fn classify(&self, value: f64) -> Option<&Bucket> {
        let v = sanitize(value);

        if let Some(bucket) = self.buckets.iter().find(|b| b.contains(v)) {
            return Some(bucket);
        }

        let fallback = self.buckets.last()?;
        warn!(
            "Value {} matched no bucket, falling back to '{}' (check bucket configuration)",
            v, fallback.label
        );
        Some(fallback)
    }

    pub fn label_of(&self, value: f64) -> Option<&str> {
        self.classify(value).map(|b| b.label.as_str())
    }

    pub fn color_of(&self, value: f64) -> Option<&str> {
        self.label_of(value).and_then(|label| self.palette.color(label))
    }

    pub fn icon_of(&self, value: f64) -> Option<&str> {
        self.label_of(value).and_then(|label| self.palette.icon(label))
    }

    /// Rows for the classification table, in bucket order, numbered from 1
    pub fn classification_table(&self) -> Vec<ClassificationRow> {
        self.buckets
            .iter()
            .enumerate()
            .map(|(i, b)| ClassificationRow {
                index: i + 1,
                cover: b.cover.clone(),
                label: b.label.clone(),
                kind: b.kind.clone(),
                color: self.palette.color(&b.label).map(|c| c.to_string()),
            })
            .collect()
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fog() -> Classifier {
        Classifier::new(fog_buckets(), Palette::fog())
    }

    #[test]
    fn test_reference_boundaries() {
        let c = fog();
        assert_eq!(c.label_of(1000.0), Some("Shallow/Light Fog/Mist"));
        assert_eq!(c.label_of(1001.0), Some("Almost Clear Sky"));
        assert_eq!(c.label_of(0.0), Some("Very Dense/Very Thick Fog"));
        assert_eq!(c.label_of(99_999.0), Some("Almost Clear Sky"));
    }

    #[test]
    fn test_lower_bound_is_inclusive_at_every_boundary() {
        let c = fog();
        let mut sorted = fog_buckets();
        sorted.sort_by(|a, b| a.min.total_cmp(&b.min));

        for pair in sorted.windows(2) {
            let boundary = pair[1].min;
            assert_eq!(c.label_of(boundary), Some(pair[1].label.as_str()));
            assert_eq!(c.label_of(boundary - 0.001), Some(pair[0].label.as_str()));
        }
    }

    #[test]
    fn test_same_bucket_same_label() {
        let c = fog();
        for bucket in fog_buckets() {
            let upper = bucket.max.unwrap_or(bucket.min + 10_000.0);
            let step = (upper - bucket.min) / 7.0;
            let expected = bucket.label.as_str();
            for i in 0..7 {
                let v = bucket.min + step * i as f64;
                assert_eq!(c.label_of(v), Some(expected), "value {}", v);
            }
        }
    }

    #[test]
    fn test_invalid_input_treated_as_zero() {
        let c = fog();
        let zero = c.classify(0.0).unwrap().label.clone();
        assert_eq!(c.classify(-5.0).unwrap().label, zero);
        assert_eq!(c.classify(f64::NAN).unwrap().label, zero);
        assert_eq!(c.classify(f64::INFINITY).unwrap().label, zero);
        assert_eq!(c.classify(f64::NEG_INFINITY).unwrap().label, zero);
    }

    #[test]
    fn test_former_gap_values_round_to_more_severe() {
        let c = fog();
        assert_eq!(c.label_of(50.5), Some("Very Dense/Very Thick Fog"));
        assert_eq!(c.label_of(200.5), Some("Dense/Thick Fog"));
        assert_eq!(c.label_of(500.5), Some("Moderate Fog"));
        assert_eq!(c.label_of(1000.5), Some("Shallow/Light Fog/Mist"));
    }

    #[test]
    fn test_unmatched_value_falls_back_to_last_bucket() {
        // Buckets with a hole between 50.0001 and 51
        let buckets = vec![
            Bucket::new(51.0, None, "Dense/Thick Fog", "", ""),
            Bucket::new(0.0, Some(50.0001), "Very Dense/Very Thick Fog", "", ""),
        ];
        let c = Classifier::new(buckets, Palette::fog());
        assert_eq!(c.label_of(50.5), Some("Very Dense/Very Thick Fog"));
        assert_eq!(c.label_of(60.0), Some("Dense/Thick Fog"));
    }

    #[test]
    fn test_empty_bucket_list() {
        let c = Classifier::new(Vec::new(), Palette::fog());
        assert!(c.classify(100.0).is_none());
        assert!(c.color_of(100.0).is_none());
        assert!(c.classification_table().is_empty());
    }

    #[test]
    fn test_color_and_icon_projections() {
        let c = fog();
        assert_eq!(c.color_of(300.0), Some("#FFF500"));
        assert_eq!(c.icon_of(5000.0), Some("🌤️"));

        // A bucket label missing from the palette has no color
        let c = Classifier::new(vec![Bucket::new(0.0, None, "Smog", "", "")], Palette::fog());
        assert_eq!(c.label_of(10.0), Some("Smog"));
        assert_eq!(c.color_of(10.0), None);
        assert_eq!(c.icon_of(10.0), None);
    }

    #[test]
    fn test_cloud_buckets() {
        let c = Classifier::new(cloud_buckets(), Palette::cloud());
        assert_eq!(c.label_of(5.0), Some("Clear Sky"));
        assert_eq!(c.label_of(10.0), Some("Low Cloud Cover"));
        assert_eq!(c.label_of(49.9), Some("Medium Cloud Cover"));
        assert_eq!(c.label_of(75.0), Some("Overcast Cloud Cover"));
        assert_eq!(c.label_of(100.0), Some("Overcast Cloud Cover"));
    }

    #[test]
    fn test_classification_table() {
        let rows = fog().classification_table();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].index, 1);
        assert_eq!(rows[0].label, "Almost Clear Sky");
        assert_eq!(rows[0].cover, "More than 1000 meters");
        assert_eq!(rows[0].color.as_deref(), Some("#66CCFF"));
        assert_eq!(rows[4].index, 5);
        assert!(rows[4].kind.starts_with("GHI is extremely low"));
    }
}
