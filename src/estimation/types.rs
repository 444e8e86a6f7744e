//! Core data types for the estimation pipeline
//! Pure data structures with no behavior

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Swiss cantons, keyed by their French names on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "Genève")]
    Geneve,
    #[serde(rename = "Vaud")]
    Vaud,
    #[serde(rename = "Neuchâtel")]
    Neuchatel,
    #[serde(rename = "Jura")]
    Jura,
    #[serde(rename = "Fribourg")]
    Fribourg,
    #[serde(rename = "Valais")]
    Valais,
    #[serde(rename = "Berne")]
    Berne,
    #[serde(rename = "Zürich")]
    Zurich,
    #[serde(rename = "Bâle-Ville")]
    BaleVille,
    #[serde(rename = "Bâle-Campagne")]
    BaleCampagne,
    #[serde(rename = "Soleure")]
    Soleure,
    #[serde(rename = "Argovie")]
    Argovie,
    #[serde(rename = "Lucerne")]
    Lucerne,
    #[serde(rename = "Zoug")]
    Zoug,
    #[serde(rename = "Schwyz")]
    Schwyz,
    #[serde(rename = "Uri")]
    Uri,
    #[serde(rename = "Obwald")]
    Obwald,
    #[serde(rename = "Nidwald")]
    Nidwald,
    #[serde(rename = "Glaris")]
    Glaris,
    #[serde(rename = "Saint-Gall")]
    SaintGall,
    #[serde(rename = "Appenzell RE")]
    AppenzellRe,
    #[serde(rename = "Appenzell RI")]
    AppenzellRi,
    #[serde(rename = "Thurgovie")]
    Thurgovie,
    #[serde(rename = "Schaffhouse")]
    Schaffhouse,
    #[serde(rename = "Grisons")]
    Grisons,
    #[serde(rename = "Tessin")]
    Tessin,
}

impl Region {
    pub const ALL: [Region; 26] = [
        Region::Geneve,
        Region::Vaud,
        Region::Neuchatel,
        Region::Jura,
        Region::Fribourg,
        Region::Valais,
        Region::Berne,
        Region::Zurich,
        Region::BaleVille,
        Region::BaleCampagne,
        Region::Soleure,
        Region::Argovie,
        Region::Lucerne,
        Region::Zoug,
        Region::Schwyz,
        Region::Uri,
        Region::Obwald,
        Region::Nidwald,
        Region::Glaris,
        Region::SaintGall,
        Region::AppenzellRe,
        Region::AppenzellRi,
        Region::Thurgovie,
        Region::Schaffhouse,
        Region::Grisons,
        Region::Tessin,
    ];

    /// Name used as the key in pricing tables
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Geneve => "Genève",
            Region::Vaud => "Vaud",
            Region::Neuchatel => "Neuchâtel",
            Region::Jura => "Jura",
            Region::Fribourg => "Fribourg",
            Region::Valais => "Valais",
            Region::Berne => "Berne",
            Region::Zurich => "Zürich",
            Region::BaleVille => "Bâle-Ville",
            Region::BaleCampagne => "Bâle-Campagne",
            Region::Soleure => "Soleure",
            Region::Argovie => "Argovie",
            Region::Lucerne => "Lucerne",
            Region::Zoug => "Zoug",
            Region::Schwyz => "Schwyz",
            Region::Uri => "Uri",
            Region::Obwald => "Obwald",
            Region::Nidwald => "Nidwald",
            Region::Glaris => "Glaris",
            Region::SaintGall => "Saint-Gall",
            Region::AppenzellRe => "Appenzell RE",
            Region::AppenzellRi => "Appenzell RI",
            Region::Thurgovie => "Thurgovie",
            Region::Schaffhouse => "Schaffhouse",
            Region::Grisons => "Grisons",
            Region::Tessin => "Tessin",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let wanted = s.to_lowercase();
        Region::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().to_lowercase() == wanted)
            .ok_or_else(|| format!("unknown canton '{}'", s))
    }
}

/// Property categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Apartment,
    House,
    Villa,
    #[serde(alias = "building")]
    MultiUnitBuilding,
    Land,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Apartment => write!(f, "apartment"),
            Category::House => write!(f, "house"),
            Category::Villa => write!(f, "villa"),
            Category::MultiUnitBuilding => write!(f, "multi-unit-building"),
            Category::Land => write!(f, "land"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "apartment" => Ok(Category::Apartment),
            "house" => Ok(Category::House),
            "villa" => Ok(Category::Villa),
            "building" | "multi-unit-building" => Ok(Category::MultiUnitBuilding),
            "land" => Ok(Category::Land),
            other => Err(format!("unknown property type '{}'", other)),
        }
    }
}

/// View from the property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    Open,
    Lake,
    Mountains,
    City,
    Garden,
    Standard,
}

impl ViewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::Open => "open",
            ViewType::Lake => "lake",
            ViewType::Mountains => "mountains",
            ViewType::City => "city",
            ViewType::Garden => "garden",
            ViewType::Standard => "standard",
        }
    }

    /// Accepts English identifiers and the French form labels.
    /// Anything else (including empty) is treated as no view.
    pub fn parse_lenient(s: &str) -> Option<ViewType> {
        match s.trim().to_lowercase().as_str() {
            "open" | "dégagée" | "degagee" => Some(ViewType::Open),
            "lake" | "lac" => Some(ViewType::Lake),
            "mountains" | "montagnes" => Some(ViewType::Mountains),
            "city" | "ville" => Some(ViewType::City),
            "garden" | "jardin" => Some(ViewType::Garden),
            "standard" => Some(ViewType::Standard),
            _ => None,
        }
    }
}

impl std::fmt::Display for ViewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes shared by every built category
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dwelling {
    pub year_built: i32,
    pub room_count: f64,
    pub bathroom_count: u32,
}

/// Category with only the fields that category needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "category", rename_all = "kebab-case")]
pub enum PropertyKind {
    Apartment {
        dwelling: Dwelling,
    },
    House {
        dwelling: Dwelling,
        #[serde(rename = "floorCount")]
        floor_count: Option<u32>,
    },
    Villa {
        dwelling: Dwelling,
        #[serde(rename = "floorCount")]
        floor_count: Option<u32>,
    },
    MultiUnitBuilding {
        dwelling: Dwelling,
        #[serde(rename = "unitCount")]
        unit_count: u32,
        #[serde(rename = "avgUnitRoomCount")]
        avg_unit_room_count: f64,
    },
    Land,
}

impl PropertyKind {
    pub fn category(&self) -> Category {
        match self {
            PropertyKind::Apartment { .. } => Category::Apartment,
            PropertyKind::House { .. } => Category::House,
            PropertyKind::Villa { .. } => Category::Villa,
            PropertyKind::MultiUnitBuilding { .. } => Category::MultiUnitBuilding,
            PropertyKind::Land => Category::Land,
        }
    }

    /// None for land
    pub fn dwelling(&self) -> Option<&Dwelling> {
        match self {
            PropertyKind::Apartment { dwelling }
            | PropertyKind::House { dwelling, .. }
            | PropertyKind::Villa { dwelling, .. }
            | PropertyKind::MultiUnitBuilding { dwelling, .. } => Some(dwelling),
            PropertyKind::Land => None,
        }
    }
}

/// Validated property submission - immutable once built
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    #[serde(flatten)]
    pub kind: PropertyKind,
    pub region: Region,
    pub municipality: String,
    pub postal_code: String,
    pub street_address: String,
    pub area: f64,
    pub has_balcony: bool,
    pub has_terrace: bool,
    pub view: Option<ViewType>,
}

impl PropertyDescriptor {
    pub fn category(&self) -> Category {
        self.kind.category()
    }
}

/// Numeric form input. HTML forms post numbers as text, so both
/// JSON numbers and numeric strings are accepted here and checked
/// during validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormNumber {
    Number(f64),
    Text(String),
}

impl FormNumber {
    /// None for blank text, Err with the raw text when it is not a number
    pub fn value(&self) -> Option<Result<f64, &str>> {
        match self {
            FormNumber::Number(v) => Some(Ok(*v)),
            FormNumber::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return None;
                }
                Some(text.parse::<f64>().map_err(|_| text))
            }
        }
    }
}

impl From<f64> for FormNumber {
    fn from(v: f64) -> Self {
        FormNumber::Number(v)
    }
}

impl From<i64> for FormNumber {
    fn from(v: i64) -> Self {
        FormNumber::Number(v as f64)
    }
}

impl From<&str> for FormNumber {
    fn from(text: &str) -> Self {
        FormNumber::Text(text.to_string())
    }
}

/// Raw form payload, before validation.
/// Accepts both the form field names and the descriptor names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    #[serde(alias = "propertyType")]
    pub category: Option<String>,
    #[serde(alias = "canton")]
    pub region: Option<String>,
    #[serde(alias = "city")]
    pub municipality: Option<String>,
    pub postal_code: Option<String>,
    #[serde(alias = "address")]
    pub street_address: Option<String>,
    #[serde(alias = "surface")]
    pub area: Option<FormNumber>,
    pub year_built: Option<FormNumber>,
    #[serde(alias = "rooms")]
    pub room_count: Option<FormNumber>,
    #[serde(alias = "bathrooms")]
    pub bathroom_count: Option<FormNumber>,
    #[serde(alias = "floors")]
    pub floor_count: Option<FormNumber>,
    #[serde(alias = "buildingUnits")]
    pub unit_count: Option<FormNumber>,
    #[serde(alias = "unitsRooms")]
    pub avg_unit_room_count: Option<FormNumber>,
    #[serde(default)]
    pub has_balcony: bool,
    #[serde(default)]
    pub has_terrace: bool,
    #[serde(alias = "view")]
    pub view_type: Option<String>,
}

/// Where the regional baseline came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaselineSource {
    /// Address confirmed by the geocoder, regional table used
    Geocoded,
    /// Lookup failed, global baseline × region multiplier used
    Fallback,
}

/// Price-per-area baseline before any multiplier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    pub per_area: f64,
    pub source: BaselineSource,
}

/// Final estimate handed back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceEstimate {
    pub base_price: u64,
    pub min_price: u64,
    pub max_price: u64,
    pub price_per_area: u64,
    pub regional_baseline_per_area: u64,
    pub baseline_source: BaselineSource,
}
