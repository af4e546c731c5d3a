use crate::core::cleaning::{self, InputFormat};
use crate::core::engine::RankingEngine;
use crate::core::{ConfigProvider, Pipeline, ReportKind, ReportResult, ReportTable, StadiumRecord, Storage};
use crate::domain::model::CsvColumns;
use crate::utils::error::{Result, StadiumError};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use zip::write::{FileOptions, ZipWriter};

/// Serializes report rows as CSV with a header row. An empty report still
/// gets its header so readers can see the columns.
pub fn rows_to_csv<T: Serialize + CsvColumns>(rows: &[T]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if rows.is_empty() {
        writer.write_record(T::COLUMNS)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| StadiumError::IoError(std::io::Error::other(e.to_string())))?;
    String::from_utf8(bytes).map_err(|e| StadiumError::ValidationError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

pub fn render_table<T: Serialize + CsvColumns>(name: &str, rows: &[T], formats: &[String]) -> Result<ReportTable> {
    let wants = |format: &str| formats.iter().any(|f| f.eq_ignore_ascii_case(format));

    Ok(ReportTable {
        name: name.to_string(),
        row_count: rows.len(),
        csv_output: if wants("csv") { Some(rows_to_csv(rows)?) } else { None },
        json_output: if wants("json") {
            Some(serde_json::to_string_pretty(rows)?)
        } else {
            None
        },
    })
}

pub fn run_report(engine: &RankingEngine, kind: ReportKind, top_n: usize, top_k: usize, formats: &[String]) -> Result<ReportTable> {
    let name = kind.name();
    match kind {
        ReportKind::TopCapacity => render_table(name, &engine.top_by_capacity(top_n)?, formats),
        ReportKind::AverageByRegion => render_table(name, &engine.average_capacity_by_region(), formats),
        ReportKind::CountByCountry => render_table(name, &engine.count_by_country(), formats),
        ReportKind::RegionRank => render_table(name, &engine.region_rank(), formats),
        ReportKind::TopPerRegion => render_table(name, &engine.top_k_per_region(top_k)?, formats),
        ReportKind::AboveAverage => render_table(name, &engine.above_regional_average(), formats),
        ReportKind::ClosestToMedian => render_table(name, &engine.closest_to_regional_median(), formats),
    }
}

#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    generated_at: &'a str,
    input: &'a str,
    records: usize,
    skipped_rows: usize,
    missing_region: usize,
    missing_country: usize,
    reports: Vec<ReportCount<'a>>,
}

#[derive(Debug, Serialize)]
struct ReportCount<'a> {
    name: &'a str,
    rows: usize,
}

pub struct ReportPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    stamp: String,
    skipped_rows: AtomicUsize,
}

impl<S: Storage, C: ConfigProvider> ReportPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let stamp = chrono::Local::now().format("%Y-%m-%d_%H_%M_%S").to_string();
        Self::with_timestamp(storage, config, stamp)
    }

    /// 指定輸出檔名使用的時間戳記
    pub fn with_timestamp(storage: S, config: C, stamp: String) -> Self {
        Self {
            storage,
            config,
            stamp,
            skipped_rows: AtomicUsize::new(0),
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.stamp
    }

    fn output_file(&self, file_name: &str) -> String {
        Path::new(self.config.output_path())
            .join(file_name)
            .to_string_lossy()
            .into_owned()
    }

    fn output_files(&self, result: &ReportResult) -> Result<Vec<(String, Vec<u8>)>> {
        let mut files = vec![(
            format!("stadium_cleaned_{}.csv", self.stamp),
            result.cleaned_csv.clone().into_bytes(),
        )];

        for table in &result.tables {
            if let Some(csv) = &table.csv_output {
                files.push((format!("{}_{}.csv", table.name, self.stamp), csv.clone().into_bytes()));
            }
            if let Some(json) = &table.json_output {
                files.push((format!("{}_{}.json", table.name, self.stamp), json.clone().into_bytes()));
            }
        }

        let summary = RunSummary {
            generated_at: &self.stamp,
            input: self.config.input_path(),
            records: result.cleaned_records.len(),
            skipped_rows: self.skipped_rows.load(Ordering::Relaxed),
            missing_region: result.missing_keys.region,
            missing_country: result.missing_keys.country,
            reports: result
                .tables
                .iter()
                .map(|t| ReportCount {
                    name: t.name.as_str(),
                    rows: t.row_count,
                })
                .collect(),
        };
        files.push((
            format!("summary_{}.json", self.stamp),
            serde_json::to_vec_pretty(&summary)?,
        ));

        Ok(files)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ReportPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<StadiumRecord>> {
        let input_path = self.config.input_path();
        let format = InputFormat::from_path(input_path)?;

        tracing::debug!("Reading stadium records from: {}", input_path);
        let data = self.storage.read_file(input_path).await?;

        let loaded = cleaning::load_records(&data, format, self.config.skip_invalid_rows())?;
        self.skipped_rows.store(loaded.skipped_rows, Ordering::Relaxed);
        if loaded.skipped_rows > 0 {
            tracing::warn!("Skipped {} invalid rows", loaded.skipped_rows);
        }

        if loaded.records.is_empty() {
            return Err(StadiumError::EmptyInput);
        }

        Ok(loaded.records)
    }

    async fn transform(&self, records: Vec<StadiumRecord>) -> Result<ReportResult> {
        let engine = RankingEngine::new(records);
        let formats = self.config.output_formats();

        let mut tables = Vec::new();
        for kind in self.config.reports() {
            let table = run_report(&engine, kind, self.config.top_n(), self.config.top_k(), formats)?;
            tracing::debug!("Report {} produced {} rows", table.name, table.row_count);
            tables.push(table);
        }

        Ok(ReportResult {
            cleaned_csv: rows_to_csv(engine.records())?,
            missing_keys: engine.missing_keys(),
            cleaned_records: engine.records().to_vec(),
            tables,
        })
    }

    async fn load(&self, result: ReportResult) -> Result<String> {
        let files = self.output_files(&result)?;

        if !self.config.bundle() {
            for (name, data) in &files {
                let path = self.output_file(name);
                tracing::debug!("Writing {} ({} bytes)", path, data.len());
                self.storage.write_file(&path, data).await?;
            }
            return Ok(self.config.output_path().to_string());
        }

        tracing::debug!("Bundling {} files into ZIP", files.len());
        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            for (name, data) in &files {
                zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
                zip.write_all(data)?;
            }
            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        let path = self.output_file(&format!("stadium_report_{}.zip", self.stamp));
        tracing::debug!("Writing ZIP file ({} bytes) to {}", zip_data.len(), path);
        self.storage.write_file(&path, &zip_data).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, data: &str) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), data.as_bytes().to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }

        async fn file_names(&self) -> Vec<String> {
            let files = self.files.lock().await;
            let mut names: Vec<String> = files.keys().cloned().collect();
            names.sort();
            names
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                StadiumError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        input_path: String,
        output_path: String,
        reports: Vec<ReportKind>,
        formats: Vec<String>,
        top_n: usize,
        top_k: usize,
        bundle: bool,
        skip_invalid_rows: bool,
    }

    impl MockConfig {
        fn new(input_path: &str) -> Self {
            Self {
                input_path: input_path.to_string(),
                output_path: "out".to_string(),
                reports: ReportKind::ALL.to_vec(),
                formats: vec!["csv".to_string(), "json".to_string()],
                top_n: 10,
                top_k: 3,
                bundle: false,
                skip_invalid_rows: false,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            &self.input_path
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn reports(&self) -> Vec<ReportKind> {
            self.reports.clone()
        }

        fn output_formats(&self) -> &[String] {
            &self.formats
        }

        fn top_n(&self) -> usize {
            self.top_n
        }

        fn top_k(&self) -> usize {
            self.top_k
        }

        fn bundle(&self) -> bool {
            self.bundle
        }

        fn skip_invalid_rows(&self) -> bool {
            self.skip_invalid_rows
        }
    }

    const STADIUMS_CSV: &str = "rank,stadium,capacity,region,country,city\n\
1,Rungrado 1st of May Stadium,\"114,000\",East Asia,North Korea,Pyongyang\n\
2,Michigan Stadium,\"107,601\",North America,United States,Ann Arbor\n\
3,Beaver Stadium,\"106,572\",North America,United States,University Park\n\
4,Camp Nou[5],\"99,354\",Europe,Spain,Barcelona\n\
5,Wembley Stadium,\"90,000\",Europe,England,London\n";

    fn pipeline(config: MockConfig) -> (ReportPipeline<MockStorage, MockConfig>, MockStorage) {
        let storage = MockStorage::with_file("stadiums.csv", STADIUMS_CSV);
        let pipeline = ReportPipeline::with_timestamp(storage.clone(), config, "T".to_string());
        (pipeline, storage)
    }

    #[tokio::test]
    async fn test_extract_cleans_rows() {
        let (pipeline, _) = pipeline(MockConfig::new("stadiums.csv"));
        let records = pipeline.extract().await.unwrap();

        assert_eq!(records.len(), 5);
        assert_eq!(records[3].stadium, "Camp Nou");
        assert_eq!(records[3].capacity, 99_354);
    }

    #[tokio::test]
    async fn test_extract_empty_input() {
        let storage = MockStorage::with_file("empty.csv", "rank,stadium,capacity,region,country\n");
        let pipeline = ReportPipeline::new(storage, MockConfig::new("empty.csv"));

        assert!(matches!(pipeline.extract().await, Err(StadiumError::EmptyInput)));
    }

    #[tokio::test]
    async fn test_extract_rejects_unknown_extension() {
        let storage = MockStorage::with_file("stadiums.txt", STADIUMS_CSV);
        let pipeline = ReportPipeline::new(storage, MockConfig::new("stadiums.txt"));

        assert!(matches!(
            pipeline.extract().await,
            Err(StadiumError::UnsupportedFormat { .. })
        ));
    }

    #[tokio::test]
    async fn test_transform_renders_requested_reports() {
        let mut config = MockConfig::new("stadiums.csv");
        config.reports = vec![ReportKind::TopCapacity, ReportKind::CountByCountry];
        config.formats = vec!["csv".to_string()];
        config.top_n = 2;
        let (pipeline, _) = pipeline(config);

        let records = pipeline.extract().await.unwrap();
        let result = pipeline.transform(records).await.unwrap();

        assert_eq!(result.tables.len(), 2);
        let top = &result.tables[0];
        assert_eq!(top.name, "top-capacity");
        assert_eq!(top.row_count, 2);
        assert!(top.json_output.is_none());

        let csv = top.csv_output.as_ref().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "rank,stadium,region,country,capacity,city,home_team,image");
        assert!(lines[1].starts_with("1,Rungrado 1st of May Stadium,"));

        let counts = result.tables[1].csv_output.as_ref().unwrap();
        assert!(counts.contains("United States,2"));
    }

    #[tokio::test]
    async fn test_transform_propagates_invalid_top_n() {
        let mut config = MockConfig::new("stadiums.csv");
        config.top_n = 0;
        let (pipeline, _) = pipeline(config);

        let records = pipeline.extract().await.unwrap();
        assert!(matches!(
            pipeline.transform(records).await,
            Err(StadiumError::InvalidArgument { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_writes_each_report() {
        let mut config = MockConfig::new("stadiums.csv");
        config.reports = vec![ReportKind::RegionRank];
        let (pipeline, storage) = pipeline(config);

        let records = pipeline.extract().await.unwrap();
        let result = pipeline.transform(records).await.unwrap();
        let output = pipeline.load(result).await.unwrap();

        assert_eq!(output, "out");
        let names = storage.file_names().await;
        assert!(names.contains(&"out/region-rank_T.csv".to_string()));
        assert!(names.contains(&"out/region-rank_T.json".to_string()));
        assert!(names.contains(&"out/stadium_cleaned_T.csv".to_string()));
        assert!(names.contains(&"out/summary_T.json".to_string()));

        let summary = storage.get_file("out/summary_T.json").await.unwrap();
        let summary: serde_json::Value = serde_json::from_slice(&summary).unwrap();
        assert_eq!(summary["records"], 5);
        assert_eq!(summary["missing_region"], 0);
        assert_eq!(summary["reports"][0]["name"], "region-rank");
        assert_eq!(summary["reports"][0]["rows"], 5);
    }

    #[tokio::test]
    async fn test_empty_report_keeps_csv_header() {
        let storage = MockStorage::with_file(
            "flat.csv",
            "rank,stadium,capacity,region,country\n1,B,10,X,C\n2,A,10,X,C\n",
        );
        let mut config = MockConfig::new("flat.csv");
        config.reports = vec![ReportKind::AboveAverage];
        let pipeline = ReportPipeline::with_timestamp(storage.clone(), config, "T".to_string());

        let records = pipeline.extract().await.unwrap();
        let result = pipeline.transform(records).await.unwrap();
        assert_eq!(result.tables[0].row_count, 0);
        pipeline.load(result).await.unwrap();

        let csv = storage.get_file("out/above-average_T.csv").await.unwrap();
        assert_eq!(
            String::from_utf8(csv).unwrap(),
            "stadium,region,rank,capacity,region_average\n"
        );
        let json = storage.get_file("out/above-average_T.json").await.unwrap();
        assert_eq!(String::from_utf8(json).unwrap(), "[]");
    }

    #[test]
    fn test_csv_columns_match_serialized_header() {
        fn header_of<T: Serialize + CsvColumns>(row: T) -> String {
            let csv = rows_to_csv(&[row]).unwrap();
            csv.lines().next().unwrap().to_string()
        }

        let engine = RankingEngine::new(vec![
            StadiumRecord::new(1, "Big", "X", "C", 300),
            StadiumRecord::new(2, "Small", "X", "C", 100),
        ]);

        assert_eq!(header_of(engine.records()[0].clone()), StadiumRecord::COLUMNS.join(","));
        assert_eq!(
            header_of(engine.average_capacity_by_region().remove(0)),
            crate::domain::model::RegionAverage::COLUMNS.join(",")
        );
        assert_eq!(
            header_of(engine.count_by_country().remove(0)),
            crate::domain::model::CountryCount::COLUMNS.join(",")
        );
        assert_eq!(
            header_of(engine.region_rank().remove(0)),
            crate::domain::model::RegionRankRow::COLUMNS.join(",")
        );
        assert_eq!(
            header_of(engine.above_regional_average().remove(0)),
            crate::domain::model::AboveAverageRow::COLUMNS.join(",")
        );
        assert_eq!(
            header_of(engine.closest_to_regional_median().remove(0)),
            crate::domain::model::MedianPick::COLUMNS.join(",")
        );
    }

    #[tokio::test]
    async fn test_load_bundles_into_zip() {
        let mut config = MockConfig::new("stadiums.csv");
        config.reports = vec![ReportKind::ClosestToMedian];
        config.formats = vec!["json".to_string()];
        config.bundle = true;
        let (pipeline, storage) = pipeline(config);

        let records = pipeline.extract().await.unwrap();
        let result = pipeline.transform(records).await.unwrap();
        let output = pipeline.load(result).await.unwrap();

        assert_eq!(output, "out/stadium_report_T.zip");
        let zip_bytes = storage.get_file(&output).await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_bytes)).unwrap();

        let mut file_names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        file_names.sort();
        assert_eq!(
            file_names,
            vec!["closest-to-median_T.json", "stadium_cleaned_T.csv", "summary_T.json"]
        );
    }
}
