use crate::utils::error::{Result, StadiumError};
use std::fmt;
use std::str::FromStr;

/// The analytical questions a report run can answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    TopCapacity,
    AverageByRegion,
    CountByCountry,
    RegionRank,
    TopPerRegion,
    AboveAverage,
    ClosestToMedian,
}

impl ReportKind {
    pub const ALL: [ReportKind; 7] = [
        ReportKind::TopCapacity,
        ReportKind::AverageByRegion,
        ReportKind::CountByCountry,
        ReportKind::RegionRank,
        ReportKind::TopPerRegion,
        ReportKind::AboveAverage,
        ReportKind::ClosestToMedian,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ReportKind::TopCapacity => "top-capacity",
            ReportKind::AverageByRegion => "average-by-region",
            ReportKind::CountByCountry => "count-by-country",
            ReportKind::RegionRank => "region-rank",
            ReportKind::TopPerRegion => "top-per-region",
            ReportKind::AboveAverage => "above-average",
            ReportKind::ClosestToMedian => "closest-to-median",
        }
    }

    /// 解析報表清單，`all` 展開為全部報表，重複項只保留第一次出現
    pub fn parse_list(values: &[String]) -> Result<Vec<ReportKind>> {
        let mut kinds = Vec::new();
        for value in values {
            let trimmed = value.trim();
            if trimmed.eq_ignore_ascii_case("all") {
                for kind in ReportKind::ALL {
                    if !kinds.contains(&kind) {
                        kinds.push(kind);
                    }
                }
                continue;
            }
            let kind: ReportKind = trimmed.parse()?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        Ok(kinds)
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReportKind {
    type Err = StadiumError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| StadiumError::InvalidConfigValueError {
                field: "reports".to_string(),
                value: s.to_string(),
                reason: format!(
                    "Unknown report. Valid reports: all, {}",
                    ReportKind::ALL
                        .iter()
                        .map(|k| k.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            })
    }
}
