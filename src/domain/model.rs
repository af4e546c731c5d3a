use serde::{Deserialize, Serialize};

/// 清理後的單筆球場資料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StadiumRecord {
    pub rank: u32,
    pub stadium: String,
    pub region: Option<String>,
    pub country: Option<String>,
    pub capacity: u64,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl StadiumRecord {
    pub fn new(rank: u32, stadium: &str, region: &str, country: &str, capacity: u64) -> Self {
        Self {
            rank,
            stadium: stadium.to_string(),
            region: Some(region.to_string()),
            country: Some(country.to_string()),
            capacity,
            city: None,
            home_team: None,
            image: None,
        }
    }
}

/// Column names written as the CSV header, also when a report has no rows.
pub trait CsvColumns {
    const COLUMNS: &'static [&'static str];
}

impl CsvColumns for StadiumRecord {
    const COLUMNS: &'static [&'static str] = &[
        "rank", "stadium", "region", "country", "capacity", "city", "home_team", "image",
    ];
}

/// Row as it arrives from the upstream scrape: every column is free text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawStadiumRow {
    #[serde(default)]
    pub rank: Option<String>,
    pub stadium: String,
    pub capacity: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, alias = "images")]
    pub image: Option<String>,
    #[serde(default)]
    pub home_team: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionAverage {
    pub region: String,
    pub average_capacity: f64,
    pub stadium_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryCount {
    pub country: String,
    pub stadium_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionRankRow {
    pub stadium: String,
    pub region: String,
    pub rank: u32,
    pub capacity: u64,
    pub region_rank: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AboveAverageRow {
    pub stadium: String,
    pub region: String,
    pub rank: u32,
    pub capacity: u64,
    pub region_average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedianPick {
    pub stadium: String,
    pub region: String,
    pub rank: u32,
    pub capacity: u64,
    pub region_median: f64,
    pub distance: f64,
}

impl CsvColumns for RegionAverage {
    const COLUMNS: &'static [&'static str] = &["region", "average_capacity", "stadium_count"];
}

impl CsvColumns for CountryCount {
    const COLUMNS: &'static [&'static str] = &["country", "stadium_count"];
}

impl CsvColumns for RegionRankRow {
    const COLUMNS: &'static [&'static str] = &["stadium", "region", "rank", "capacity", "region_rank"];
}

impl CsvColumns for AboveAverageRow {
    const COLUMNS: &'static [&'static str] = &["stadium", "region", "rank", "capacity", "region_average"];
}

impl CsvColumns for MedianPick {
    const COLUMNS: &'static [&'static str] =
        &["stadium", "region", "rank", "capacity", "region_median", "distance"];
}

/// Records left out of grouped queries because the key was missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MissingKeyCounts {
    pub region: usize,
    pub country: usize,
}

/// One rendered report in every requested output format.
#[derive(Debug, Clone)]
pub struct ReportTable {
    pub name: String,
    pub row_count: usize,
    pub csv_output: Option<String>,
    pub json_output: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReportResult {
    pub cleaned_records: Vec<StadiumRecord>,
    pub cleaned_csv: String,
    pub tables: Vec<ReportTable>,
    pub missing_keys: MissingKeyCounts,
}
