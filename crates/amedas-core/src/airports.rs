//! Static airport reference data

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Airport preselected when a client has made no choice yet
pub const DEFAULT_AIRPORT_ID: &str = "haneda";

/// Prefecture label used when an airport carries none
pub const UNKNOWN_PREFECTURE: &str = "その他";

/// Regional grouping of prefectures, in north-to-south listing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Hokkaido,
    Tohoku,
    Kanto,
    Chubu,
    Kansai,
    Chugoku,
    Shikoku,
    Kyushu,
    Okinawa,
    Other,
}

impl Region {
    pub const ALL: [Region; 10] = [
        Region::Hokkaido,
        Region::Tohoku,
        Region::Kanto,
        Region::Chubu,
        Region::Kansai,
        Region::Chugoku,
        Region::Shikoku,
        Region::Kyushu,
        Region::Okinawa,
        Region::Other,
    ];

    pub fn from_prefecture(prefecture: &str) -> Self {
        match prefecture {
            "北海道" => Region::Hokkaido,
            "青森県" | "岩手県" | "宮城県" | "秋田県" | "山形県" | "福島県" => Region::Tohoku,
            "茨城県" | "栃木県" | "群馬県" | "埼玉県" | "千葉県" | "東京都" | "神奈川県" => {
                Region::Kanto
            }
            "新潟県" | "富山県" | "石川県" | "福井県" | "山梨県" | "長野県" | "岐阜県"
            | "静岡県" | "愛知県" => Region::Chubu,
            "三重県" | "滋賀県" | "京都府" | "大阪府" | "兵庫県" | "奈良県" | "和歌山県" => {
                Region::Kansai
            }
            "鳥取県" | "島根県" | "岡山県" | "広島県" | "山口県" => Region::Chugoku,
            "徳島県" | "香川県" | "愛媛県" | "高知県" => Region::Shikoku,
            "福岡県" | "佐賀県" | "長崎県" | "熊本県" | "大分県" | "宮崎県" | "鹿児島県" => {
                Region::Kyushu
            }
            "沖縄県" => Region::Okinawa,
            _ => Region::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Region::Hokkaido => "北海道",
            Region::Tohoku => "東北",
            Region::Kanto => "関東",
            Region::Chubu => "中部",
            Region::Kansai => "関西",
            Region::Chugoku => "中国",
            Region::Shikoku => "四国",
            Region::Kyushu => "九州",
            Region::Okinawa => "沖縄",
            Region::Other => UNKNOWN_PREFECTURE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airport {
    pub id: String,
    pub display_name: String,
    pub localized_name: String,
    pub iata_code: String,
    pub icao_code: String,
    /// AMeDAS station used for this airport's observations
    pub station_code: String,
    pub coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefecture: Option<String>,
}

impl Airport {
    /// Shown when the station has no usable wind at the resolved time
    pub fn no_data_message(&self) -> String {
        format!("{}の観測データが利用できません", self.localized_name)
    }

    pub fn prefecture(&self) -> &str {
        self.prefecture.as_deref().unwrap_or(UNKNOWN_PREFECTURE)
    }

    pub fn region(&self) -> Region {
        Region::from_prefecture(self.prefecture())
    }

    /// Localized name without the trailing 空港
    pub fn short_name(&self) -> &str {
        self.localized_name
            .strip_suffix("空港")
            .unwrap_or(&self.localized_name)
    }

    /// Picker label, e.g. `東京都 - 羽田 (HND)`
    pub fn option_label(&self) -> String {
        format!("{} - {} ({})", self.prefecture(), self.short_name(), self.iata_code)
    }
}

/// Airports of one region, in catalog order
#[derive(Debug, Clone, PartialEq)]
pub struct RegionGroup<'a> {
    pub region: Region,
    pub airports: Vec<&'a Airport>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid airport JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only airport list
#[derive(Debug, Clone, Default)]
pub struct AirportCatalog {
    airports: Vec<Airport>,
}

impl AirportCatalog {
    pub fn new(airports: Vec<Airport>) -> Self {
        Self { airports }
    }

    pub fn from_json_str(s: &str) -> Result<Self, CatalogError> {
        let airports: Vec<Airport> = serde_json::from_str(s)?;
        Ok(Self { airports })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let s = fs::read_to_string(path)?;
        Self::from_json_str(&s)
    }

    pub fn all(&self) -> &[Airport] {
        &self.airports
    }

    /// Find by id, IATA or ICAO code (case-insensitive)
    pub fn find(&self, key: &str) -> Option<&Airport> {
        self.airports.iter().find(|a| {
            a.id.eq_ignore_ascii_case(key)
                || a.iata_code.eq_ignore_ascii_case(key)
                || a.icao_code.eq_ignore_ascii_case(key)
        })
    }

    /// The preselected airport, if the catalog carries it
    pub fn default_airport(&self) -> Option<&Airport> {
        self.airports.iter().find(|a| a.id == DEFAULT_AIRPORT_ID)
    }

    /// Non-empty region groups in [`Region::ALL`] order
    pub fn by_region(&self) -> Vec<RegionGroup<'_>> {
        Region::ALL
            .iter()
            .filter_map(|&region| {
                let airports: Vec<&Airport> =
                    self.airports.iter().filter(|a| a.region() == region).collect();
                (!airports.is_empty()).then_some(RegionGroup { region, airports })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"[
        {
            "id": "haneda",
            "displayName": "Tokyo Haneda",
            "localizedName": "羽田空港",
            "iataCode": "HND",
            "icaoCode": "RJTT",
            "stationCode": "44166",
            "coordinates": { "lat": 35.5494, "lon": 139.7798 },
            "prefecture": "東京都"
        }
    ]"#;

    const MIXED: &str = r#"[
        {"id": "naha", "displayName": "Naha", "localizedName": "那覇空港",
         "iataCode": "OKA", "icaoCode": "ROAH", "stationCode": "91197",
         "coordinates": {"lat": 26.1958, "lon": 127.6459}, "prefecture": "沖縄県"},
        {"id": "chitose", "displayName": "New Chitose", "localizedName": "新千歳空港",
         "iataCode": "CTS", "icaoCode": "RJCC", "stationCode": "14163",
         "coordinates": {"lat": 42.7752, "lon": 141.6923}, "prefecture": "北海道"},
        {"id": "kerama", "displayName": "Kerama", "localizedName": "慶良間空港",
         "iataCode": "KJP", "icaoCode": "ROKR", "stationCode": "91146",
         "coordinates": {"lat": 26.1683, "lon": 127.2933}, "prefecture": "沖縄県"},
        {"id": "mystery", "displayName": "Mystery", "localizedName": "謎",
         "iataCode": "ZZZ", "icaoCode": "RJZZ", "stationCode": "00000",
         "coordinates": {"lat": 35.0, "lon": 135.0}}
    ]"#;

    #[test]
    fn test_find_by_any_code() {
        let catalog = AirportCatalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find("haneda").unwrap().station_code, "44166");
        assert_eq!(catalog.find("hnd").unwrap().id, "haneda");
        assert_eq!(catalog.find("RJTT").unwrap().id, "haneda");
        assert!(catalog.find("NRT").is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("airports.json");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(SAMPLE.as_bytes()).unwrap();

        let catalog = AirportCatalog::load(&path).unwrap();
        assert_eq!(catalog.all()[0].localized_name, "羽田空港");
    }

    #[test]
    fn test_display_fields() {
        let catalog = AirportCatalog::from_json_str(MIXED).unwrap();
        let naha = catalog.find("OKA").unwrap();
        assert_eq!(naha.region(), Region::Okinawa);
        assert_eq!(naha.option_label(), "沖縄県 - 那覇 (OKA)");

        let mystery = catalog.find("mystery").unwrap();
        assert_eq!(mystery.prefecture(), "その他");
        assert_eq!(mystery.region(), Region::Other);
        assert_eq!(mystery.option_label(), "その他 - 謎 (ZZZ)");
    }

    #[test]
    fn test_grouped_by_region() {
        let catalog = AirportCatalog::from_json_str(MIXED).unwrap();
        let groups = catalog.by_region();
        let regions: Vec<Region> = groups.iter().map(|g| g.region).collect();
        assert_eq!(regions, vec![Region::Hokkaido, Region::Okinawa, Region::Other]);

        let okinawa: Vec<&str> = groups[1].airports.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(okinawa, vec!["naha", "kerama"]);
        assert_eq!(groups[0].region.label(), "北海道");
    }

    #[test]
    fn test_region_table() {
        assert_eq!(Region::from_prefecture("宮城県"), Region::Tohoku);
        assert_eq!(Region::from_prefecture("神奈川県"), Region::Kanto);
        assert_eq!(Region::from_prefecture("愛知県"), Region::Chubu);
        assert_eq!(Region::from_prefecture("大阪府"), Region::Kansai);
        assert_eq!(Region::from_prefecture("広島県"), Region::Chugoku);
        assert_eq!(Region::from_prefecture("高知県"), Region::Shikoku);
        assert_eq!(Region::from_prefecture("鹿児島県"), Region::Kyushu);
        assert_eq!(Region::from_prefecture("Atlantis"), Region::Other);
    }

    #[test]
    fn test_default_airport() {
        let catalog = AirportCatalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(catalog.default_airport().unwrap().iata_code, "HND");
        let catalog = AirportCatalog::from_json_str(MIXED).unwrap();
        assert!(catalog.default_airport().is_none());
    }

    #[test]
    fn test_missing_file() {
        let err = AirportCatalog::load("/nonexistent/airports.json").unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
