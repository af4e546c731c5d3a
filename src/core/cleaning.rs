use crate::domain::model::{RawStadiumRow, StadiumRecord};
use crate::utils::error::{Result, StadiumError};
use std::collections::HashMap;

pub const NO_IMAGE: &str = "https://upload.wikimedia.org/wikipedia/commons/thumb/0/0a/No-image-available.png/480px-No-image-available.png";

/// Supported encodings for stadium input files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    pub fn from_path(path: &str) -> Result<Self> {
        let extension = std::path::Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(InputFormat::Csv),
            Some("json") => Ok(InputFormat::Json),
            other => Err(StadiumError::UnsupportedFormat {
                format: other.unwrap_or("<none>").to_string(),
            }),
        }
    }
}

/// Outcome of loading an input file.
#[derive(Debug, Clone, Default)]
pub struct LoadedRecords {
    pub records: Vec<StadiumRecord>,
    pub skipped_rows: usize,
}

/// 清理從網頁表格抓下來的文字：去除註腳、舊名標記與換行
pub fn clean_text(text: &str) -> String {
    let mut text = text.trim().replace("&nbsp", "");

    for marker in [" ♦", "[", " (formerly)"] {
        if let Some(index) = text.find(marker) {
            text.truncate(index);
        }
    }

    text.replace('\n', "").trim().to_string()
}

/// Capacity as published, e.g. `"99,354"` or `"81.044[3]"`.
pub fn parse_capacity(text: &str) -> Option<u64> {
    let digits: String = clean_text(text)
        .chars()
        .filter(|c| *c != ',' && *c != '.' && !c.is_whitespace())
        .collect();
    digits.parse().ok()
}

fn clean_optional(value: Option<&str>) -> Option<String> {
    value.map(clean_text).filter(|v| !v.is_empty())
}

fn clean_image(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty() && *v != "NO_IMAGE") {
        Some(url) if url.starts_with("//") => format!("https:{}", url),
        Some(url) => url.to_string(),
        None => NO_IMAGE.to_string(),
    }
}

/// Turns one raw row into a record. `position` is the 1-based row number and
/// becomes the global rank when the row carries none.
pub fn clean_row(row: &RawStadiumRow, position: usize) -> Result<StadiumRecord> {
    let stadium = clean_text(&row.stadium);
    if stadium.is_empty() {
        return Err(StadiumError::ValidationError {
            message: format!("row {}: stadium name is empty", position),
        });
    }

    let capacity = parse_capacity(&row.capacity).ok_or_else(|| StadiumError::ValidationError {
        message: format!(
            "row {} ({}): capacity `{}` is not a non-negative integer",
            position, stadium, row.capacity
        ),
    })?;

    let rank = match row.rank.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        Some(text) => match text.parse::<u32>() {
            Ok(rank) if rank > 0 => rank,
            _ => {
                return Err(StadiumError::ValidationError {
                    message: format!("row {} ({}): rank `{}` is not a positive integer", position, stadium, text),
                })
            }
        },
        None => position as u32,
    };

    Ok(StadiumRecord {
        rank,
        stadium,
        region: clean_optional(row.region.as_deref()),
        country: clean_optional(row.country.as_deref()),
        capacity,
        city: clean_optional(row.city.as_deref()),
        home_team: clean_optional(row.home_team.as_deref()),
        image: Some(clean_image(row.image.as_deref())),
    })
}

fn parse_rows(data: &[u8], format: InputFormat) -> Result<Vec<RawStadiumRow>> {
    match format {
        InputFormat::Csv => {
            let mut reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::Headers)
                .flexible(true)
                .from_reader(data);
            let mut rows = Vec::new();
            for row in reader.deserialize() {
                rows.push(row?);
            }
            Ok(rows)
        }
        InputFormat::Json => {
            let objects: Vec<HashMap<String, serde_json::Value>> = serde_json::from_slice(data)?;
            Ok(objects.iter().map(raw_row_from_json).collect())
        }
    }
}

fn json_text(object: &HashMap<String, serde_json::Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match object.get(*key)? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(json_number_text(n)),
        other => Some(other.to_string()),
    })
}

// 整數值的浮點數（例如 1.0）視為整數
fn json_number_text(n: &serde_json::Number) -> String {
    match (n.as_u64(), n.as_f64()) {
        (Some(value), _) => value.to_string(),
        (None, Some(value)) if value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 => {
            format!("{:.0}", value)
        }
        _ => n.to_string(),
    }
}

// JSON 來源的數字欄位可能是字串也可能是數值
fn raw_row_from_json(object: &HashMap<String, serde_json::Value>) -> RawStadiumRow {
    RawStadiumRow {
        rank: json_text(object, &["rank"]),
        stadium: json_text(object, &["stadium"]).unwrap_or_default(),
        capacity: json_text(object, &["capacity"]).unwrap_or_default(),
        region: json_text(object, &["region"]),
        country: json_text(object, &["country"]),
        city: json_text(object, &["city"]),
        image: json_text(object, &["image", "images"]),
        home_team: json_text(object, &["home_team"]),
    }
}

/// Parses and cleans an input file. With `skip_invalid` rows that fail
/// cleaning are dropped and counted, otherwise the first one aborts the load.
pub fn load_records(data: &[u8], format: InputFormat, skip_invalid: bool) -> Result<LoadedRecords> {
    let rows = parse_rows(data, format)?;
    tracing::debug!("Parsed {} raw rows ({:?})", rows.len(), format);

    let mut loaded = LoadedRecords::default();
    for (index, row) in rows.iter().enumerate() {
        match clean_row(row, index + 1) {
            Ok(record) => loaded.records.push(record),
            Err(e) if skip_invalid => {
                tracing::warn!("Skipping invalid row: {}", e);
                loaded.skipped_rows += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(loaded)
}
