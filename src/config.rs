use anyhow::{anyhow, Context, Result};
use log::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::classifier::{cloud_buckets, fog_buckets, Bucket, Classifier};
use crate::palette::{Category, Palette};
use crate::regions::{districts, subdivisions, RegionCatalog, RegionRecord};

/// Everything a bulletin is built from.
///
/// The built-in presets are `fog()` and `cloud()`; other layouts are loaded
/// from JSON with the same field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletinConfig {
    pub title: String,
    pub export_filename: String,
    pub categories: Vec<Category>,
    pub buckets: Vec<Bucket>,
    pub regions: Vec<RegionRecord>,
}

impl BulletinConfig {
    /// District fog bulletin, visibility in meters
    pub fn fog() -> Self {
        Self {
            title: "Fog Forecast Bulletin".to_string(),
            export_filename: "Fog_Forecast_Bulletin.json".to_string(),
            categories: Palette::fog().categories().to_vec(),
            buckets: fog_buckets(),
            regions: districts(),
        }
    }

    /// Subdivision cloud bulletin, cloud cover in percent
    pub fn cloud() -> Self {
        Self {
            title: "Cloud Forecast Bulletin".to_string(),
            export_filename: "Cloud_Forecast_Bulletin.json".to_string(),
            categories: Palette::cloud().categories().to_vec(),
            buckets: cloud_buckets(),
            regions: subdivisions(),
        }
    }

    /// Look up a built-in preset by name
    pub fn preset(name: &str) -> Result<Self> {
        match name {
            "fog" => Ok(Self::fog()),
            "cloud" => Ok(Self::cloud()),
            _ => Err(anyhow!("Unknown preset: {} (use fog or cloud)", name)),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Failed to parse bulletin config")?;
        for issue in config.issues() {
            warn!("Bulletin config: {}", issue);
        }
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_json(&text)?;
        info!(
            "Loaded '{}' from {} ({} categories, {} buckets, {} regions)",
            config.title,
            path.display(),
            config.categories.len(),
            config.buckets.len(),
            config.regions.len()
        );
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn palette(&self) -> Palette {
        Palette::new(self.categories.clone())
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.buckets.clone(), self.palette())
    }

    pub fn catalog(&self) -> RegionCatalog {
        RegionCatalog::new(self.regions.clone())
    }

    /// Data defects that do not stop the bulletin from rendering but make
    /// classification or lookups fall back to defaults.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let palette = self.palette();

        for bucket in &self.buckets {
            if !palette.contains(&bucket.label) {
                issues.push(format!("bucket label '{}' has no palette entry", bucket.label));
            }
            if let Some(max) = bucket.max {
                if max <= bucket.min {
                    issues.push(format!(
                        "bucket '{}' is empty ({} to {})",
                        bucket.label, bucket.min, max
                    ));
                }
            }
        }

        let mut sorted: Vec<&Bucket> = self.buckets.iter().collect();
        sorted.sort_by(|a, b| a.min.total_cmp(&b.min));

        if let Some(lowest) = sorted.first() {
            if lowest.min > 0.0 {
                issues.push(format!("no bucket covers 0 to {}", lowest.min));
            }
        }

        for pair in sorted.windows(2) {
            let (lower, upper) = (pair[0], pair[1]);
            match lower.max {
                Some(max) if max < upper.min => issues.push(format!(
                    "gap between '{}' and '{}' ({} to {})",
                    lower.label, upper.label, max, upper.min
                )),
                Some(max) if max > upper.min => issues.push(format!(
                    "'{}' overlaps '{}' ({} to {})",
                    lower.label, upper.label, upper.min, max
                )),
                None => issues.push(format!(
                    "unbounded bucket '{}' overlaps '{}'",
                    lower.label, upper.label
                )),
                _ => {}
            }
        }

        if let Some(highest) = sorted.last() {
            if let Some(max) = highest.max {
                issues.push(format!("no bucket covers values of {} and above", max));
            }
        }

        let mut seen = HashSet::new();
        for region in &self.regions {
            if !seen.insert(region.id()) {
                issues.push(format!("duplicate region {}", region.id()));
            }
        }

        issues
    }
}
