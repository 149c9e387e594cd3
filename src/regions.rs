use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Stable region key, formatted as `state:name`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(state: &str, name: &str) -> Self {
        Self(format!("{}:{}", state, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RegionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RegionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A forecast area: one district or subdivision inside a state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub state: String,
    pub name: String,
}

impl RegionRecord {
    pub fn new(state: &str, name: &str) -> Self {
        Self {
            state: state.to_string(),
            name: name.to_string(),
        }
    }

    pub fn id(&self) -> RegionId {
        RegionId::new(&self.state, &self.name)
    }

    /// Key used to join this region against map feature names
    pub fn key(&self) -> String {
        normalize_key(&self.name)
    }
}

/// The 19 meteorological subdivisions covered by the cloud bulletin
pub fn subdivisions() -> Vec<RegionRecord> {
    [
        ("Punjab", "Punjab"),
        ("Rajasthan", "West Rajasthan"),
        ("Rajasthan", "East Rajasthan"),
        ("Gujarat", "Saurashtra & Kachh"),
        ("Gujarat", "Gujarat region"),
        ("Uttar Pradesh", "West Uttar Pradesh"),
        ("Uttar Pradesh", "East Uttar Pradesh"),
        ("Madhya Pradesh", "West Madhya Pradesh"),
        ("Madhya Pradesh", "East Madhya Pradesh"),
        ("Chhattisgarh", "Chhattisgarh"),
        ("Maharashtra", "Madhya Maharashtra"),
        ("Maharashtra", "Marathwada"),
        ("Maharashtra", "Vidarbha"),
        ("Telangana", "Telangana"),
        ("Andhra Pradesh", "Coastal Andhra Pradesh"),
        ("Andhra Pradesh", "Rayalaseema"),
        ("Karnataka", "N.I. Karnataka"),
        ("Karnataka", "S.I. Karnataka"),
        ("Tamil Nadu", "Tamil Nadu & Puducherry"),
    ]
    .iter()
    .map(|(state, name)| RegionRecord::new(state, name))
    .collect()
}

/// State order used when laying out the district table
pub const DISTRICT_STATES_ORDER: [&str; 6] = [
    "Haryana",
    "Punjab",
    "Rajasthan",
    "Gujarat",
    "Madhya Pradesh",
    "Uttar Pradesh",
];

/// District names for one state of the fog bulletin, empty for unknown states
pub fn district_names(state: &str) -> &'static [&'static str] {
    match state {
        "Haryana" => &["Sirsa", "Hisar", "Fatehabad"],
        "Punjab" => &[
            "Mohali", "Ludhiana", "Patiala", "Firozpur", "Bathinda", "Barnala", "Faridkot", "Mansa",
        ],
        "Rajasthan" => &[
            "Jodhpur", "Phalodi", "Nagaur", "Jaisalmer", "Barmer", "Banswara", "Pali",
        ],
        "Gujarat" => &[
            "Jamnagar",
            "Surendranagar",
            "Rajkot",
            "Ahmedabad",
            "Bhavnagar",
            "Gandhinagar",
            "Kutch",
            "Dahod",
            "Sabarkantha",
        ],
        "Madhya Pradesh" => &[
            "Raisen", "Sehore", "Vidisha", "Chhindwara", "Sagar", "Betul", "Guna", "Sidhi",
        ],
        "Uttar Pradesh" => &["Prayagraj", "Banda", "Hamirpur", "Fatehpur"],
        _ => &[],
    }
}

/// All fog bulletin districts, flattened in `DISTRICT_STATES_ORDER`
pub fn districts() -> Vec<RegionRecord> {
    DISTRICT_STATES_ORDER
        .iter()
        .flat_map(|state| {
            district_names(state)
                .iter()
                .map(move |name| RegionRecord::new(state, name))
        })
        .collect()
}

/// Read-only lookups over a region list
#[derive(Debug, Clone, Default)]
pub struct RegionCatalog {
    records: Vec<RegionRecord>,
}

impl RegionCatalog {
    pub fn new(records: Vec<RegionRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[RegionRecord] {
        &self.records
    }

    pub fn by_id(&self, id: &str) -> Option<&RegionRecord> {
        self.records.iter().find(|r| r.id().as_str() == id)
    }

    /// Regions of one state in list order
    pub fn in_state(&self, state: &str) -> Vec<&RegionRecord> {
        self.records.iter().filter(|r| r.state == state).collect()
    }

    /// Distinct states in order of first appearance
    pub fn states(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.state.as_str()) {
                seen.push(&record.state);
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Normalize a region or map feature name for matching.
///
/// Lowercases, folds accents (`é` to `e`), spells out `&` as `and`, drops text
/// inside a closed pair of parentheses and collapses every run of
/// non-alphanumeric characters into a single space.
pub fn normalize_key(raw: &str) -> String {
    let folded: String = raw
        .to_lowercase()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    let spelled = folded.replace('&', " and ");

    strip_parenthesised(&spelled)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove each `(` up to the next `)`; an unclosed `(` is left in place
fn strip_parenthesised(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('(') {
        match rest[open..].find(')') {
            Some(close) => {
                out.push_str(&rest[..open]);
                out.push(' ');
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_id_format() {
        let record = RegionRecord::new("Haryana", "Sirsa");
        assert_eq!(record.id().as_str(), "Haryana:Sirsa");
        assert_eq!(record.id().to_string(), "Haryana:Sirsa");
        assert_eq!(RegionId::from("Haryana:Sirsa"), record.id());
    }

    #[test]
    fn test_district_table() {
        let all = districts();
        assert_eq!(all.len(), 39);
        assert_eq!(all[0], RegionRecord::new("Haryana", "Sirsa"));
        assert_eq!(all[38], RegionRecord::new("Uttar Pradesh", "Fatehpur"));

        let catalog = RegionCatalog::new(all);
        assert_eq!(catalog.states(), DISTRICT_STATES_ORDER.to_vec());
    }

    #[test]
    fn test_unknown_state_has_no_districts() {
        assert!(district_names("Kerala").is_empty());
        let catalog = RegionCatalog::new(districts());
        assert!(catalog.in_state("Kerala").is_empty());
        assert_eq!(catalog.in_state("Punjab").len(), 8);
    }

    #[test]
    fn test_subdivisions() {
        let catalog = RegionCatalog::new(subdivisions());
        assert_eq!(catalog.len(), 19);
        assert_eq!(catalog.states().len(), 11);

        let record = catalog.by_id("Karnataka:N.I. Karnataka").unwrap();
        assert_eq!(record.name, "N.I. Karnataka");
        assert!(catalog.by_id("Karnataka:Coorg").is_none());
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Saurashtra & Kachh"), "saurashtra and kachh");
        assert_eq!(normalize_key("Saurashtra&Kachh"), "saurashtra and kachh");
        assert_eq!(normalize_key("N.I. Karnataka"), "n i karnataka");
        assert_eq!(normalize_key("Tamil Nadu (incl. Puducherry)"), "tamil nadu");
        assert_eq!(normalize_key("  West   Rajasthan "), "west rajasthan");
        assert_eq!(normalize_key(""), "");
    }

    #[test]
    fn test_normalize_key_folds_accents() {
        assert_eq!(normalize_key("Pondichéry"), "pondichery");
        assert_eq!(normalize_key("PONDICHÉRY"), "pondichery");
        assert_eq!(normalize_key("Pondichéry"), normalize_key("Pondichery"));
    }

    #[test]
    fn test_normalize_key_unclosed_parenthesis() {
        assert_eq!(normalize_key("Tamil Nadu (Puducherry"), "tamil nadu puducherry");
        assert_eq!(normalize_key("Kutch (West) (North"), "kutch north");
    }

    #[test]
    fn test_record_key_matches_feature_name() {
        let record = RegionRecord::new("Tamil Nadu", "Tamil Nadu & Puducherry");
        assert_eq!(record.key(), normalize_key("TAMIL NADU AND PUDUCHERRY"));
    }
}
