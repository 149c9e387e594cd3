use serde::{Deserialize, Serialize};

/// A selectable forecast category with its display color and icon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub label: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Category {
    pub fn new(label: &str, color: &str, icon: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            color: color.to_string(),
            icon: icon.map(|s| s.to_string()),
        }
    }
}

/// One swatch of a map legend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

/// Ordered set of forecast categories.
///
/// The order is the order shown in selectors and legends, and the first
/// category is the default selection for every region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    categories: Vec<Category>,
}

impl Palette {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Fog severity classes, clearest first
    pub fn fog() -> Self {
        Self::new(vec![
            Category::new("Almost Clear Sky", "#66CCFF", Some("🌤️")),
            Category::new("Shallow/Light Fog/Mist", "#7CFC00", Some("🌫️")),
            Category::new("Moderate Fog", "#FFF500", Some("🌫️")),
            Category::new("Dense/Thick Fog", "#FF8A00", Some("🌫️")),
            Category::new("Very Dense/Very Thick Fog", "#FF0000", Some("🌫️")),
        ])
    }

    /// Cloud cover classes, clearest first
    pub fn cloud() -> Self {
        Self::new(vec![
            Category::new("Clear Sky", "#66CCFF", Some("☀️")),
            Category::new("Low Cloud Cover", "#57E66D", Some("🌤️")),
            Category::new("Medium Cloud Cover", "#FFF500", Some("⛅")),
            Category::new("High Cloud Cover", "#FF8A00", Some("🌥️")),
            Category::new("Overcast Cloud Cover", "#FF0000", Some("☁️")),
        ])
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Labels in selector order
    pub fn options(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.label.as_str()).collect()
    }

    /// Default selection, `None` for an empty palette
    pub fn first(&self) -> Option<&str> {
        self.categories.first().map(|c| c.label.as_str())
    }

    pub fn get(&self, label: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.label == label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn color(&self, label: &str) -> Option<&str> {
        self.get(label).map(|c| c.color.as_str())
    }

    pub fn icon(&self, label: &str) -> Option<&str> {
        self.get(label).and_then(|c| c.icon.as_deref())
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        self.categories
            .iter()
            .map(|c| LegendEntry {
                label: c.label.clone(),
                color: c.color.clone(),
            })
            .collect()
    }
}
