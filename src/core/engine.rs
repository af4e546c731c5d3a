use crate::core::stats;
use crate::domain::model::{
    AboveAverageRow, CountryCount, MedianPick, MissingKeyCounts, RegionAverage, RegionRankRow,
    StadiumRecord,
};
use crate::utils::error::{Result, StadiumError};
use std::collections::{BTreeMap, HashMap};

/// In-memory ranking and statistics over a fixed set of stadium records.
///
/// The engine never mutates its records, so every query is a pure function of
/// the input and the engine can be shared across threads.
#[derive(Debug, Clone)]
pub struct RankingEngine {
    records: Vec<StadiumRecord>,
    missing_keys: MissingKeyCounts,
}

impl RankingEngine {
    pub fn new(records: Vec<StadiumRecord>) -> Self {
        if records.is_empty() {
            tracing::warn!("Ranking engine created without any stadium records");
        }

        let missing_keys = MissingKeyCounts {
            region: records.iter().filter(|r| r.region.is_none()).count(),
            country: records.iter().filter(|r| r.country.is_none()).count(),
        };
        if missing_keys.region > 0 || missing_keys.country > 0 {
            tracing::warn!(
                "{} records without region and {} without country are excluded from grouped queries",
                missing_keys.region,
                missing_keys.country
            );
        }

        Self {
            records,
            missing_keys,
        }
    }

    pub fn records(&self) -> &[StadiumRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn missing_keys(&self) -> MissingKeyCounts {
        self.missing_keys
    }

    // BTreeMap 讓地區依名稱排序；組內保留輸入順序
    fn group_by_region(&self) -> BTreeMap<&str, Vec<&StadiumRecord>> {
        let mut groups: BTreeMap<&str, Vec<&StadiumRecord>> = BTreeMap::new();
        for record in &self.records {
            if let Some(region) = record.region.as_deref() {
                groups.entry(region).or_default().push(record);
            }
        }
        groups
    }

    /// The `n` largest stadiums, ties broken by global rank then name.
    pub fn top_by_capacity(&self, n: usize) -> Result<Vec<StadiumRecord>> {
        if n == 0 {
            return Err(StadiumError::invalid_argument("n", 0));
        }

        let mut sorted: Vec<&StadiumRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| {
            b.capacity
                .cmp(&a.capacity)
                .then_with(|| a.rank.cmp(&b.rank))
                .then_with(|| a.stadium.cmp(&b.stadium))
        });

        Ok(sorted.into_iter().take(n).cloned().collect())
    }

    pub fn average_capacity_by_region(&self) -> Vec<RegionAverage> {
        let mut averages: Vec<RegionAverage> = self
            .group_by_region()
            .into_iter()
            .filter_map(|(region, members)| {
                let capacities: Vec<u64> = members.iter().map(|r| r.capacity).collect();
                stats::mean(&capacities).map(|average_capacity| RegionAverage {
                    region: region.to_string(),
                    average_capacity,
                    stadium_count: members.len(),
                })
            })
            .collect();

        averages.sort_by(|a, b| {
            b.average_capacity
                .total_cmp(&a.average_capacity)
                .then_with(|| a.region.cmp(&b.region))
        });
        averages
    }

    pub fn count_by_country(&self) -> Vec<CountryCount> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for country in self.records.iter().filter_map(|r| r.country.as_deref()) {
            *counts.entry(country).or_insert(0) += 1;
        }

        let mut result: Vec<CountryCount> = counts
            .into_iter()
            .map(|(country, stadium_count)| CountryCount {
                country: country.to_string(),
                stadium_count,
            })
            .collect();
        result.sort_by(|a, b| {
            b.stadium_count
                .cmp(&a.stadium_count)
                .then_with(|| a.country.cmp(&b.country))
        });
        result
    }

    /// `RANK() OVER (PARTITION BY region ORDER BY capacity DESC)` for every
    /// record with a region.
    pub fn region_rank(&self) -> Vec<RegionRankRow> {
        let mut rows = Vec::with_capacity(self.records.len());

        for (region, mut members) in self.group_by_region() {
            members.sort_by(|a, b| b.capacity.cmp(&a.capacity).then_with(|| a.rank.cmp(&b.rank)));
            let capacities: Vec<u64> = members.iter().map(|r| r.capacity).collect();
            let ranks = stats::competition_ranks(&capacities);

            for (record, region_rank) in members.into_iter().zip(ranks) {
                rows.push(RegionRankRow {
                    stadium: record.stadium.clone(),
                    region: region.to_string(),
                    rank: record.rank,
                    capacity: record.capacity,
                    region_rank,
                });
            }
        }

        tracing::debug!("Assigned region ranks to {} stadiums", rows.len());
        rows
    }

    /// Region ranks up to `k`; every stadium tied at the boundary is kept.
    pub fn top_k_per_region(&self, k: usize) -> Result<Vec<RegionRankRow>> {
        if k == 0 {
            return Err(StadiumError::invalid_argument("k", 0));
        }

        Ok(self
            .region_rank()
            .into_iter()
            .filter(|row| (row.region_rank as usize) <= k)
            .collect())
    }

    pub fn above_regional_average(&self) -> Vec<AboveAverageRow> {
        let averages: HashMap<String, f64> = self
            .average_capacity_by_region()
            .into_iter()
            .map(|a| (a.region, a.average_capacity))
            .collect();

        let mut rows: Vec<AboveAverageRow> = self
            .records
            .iter()
            .filter_map(|record| {
                let region = record.region.as_ref()?;
                let region_average = *averages.get(region)?;
                (record.capacity as f64 > region_average).then(|| AboveAverageRow {
                    stadium: record.stadium.clone(),
                    region: region.clone(),
                    rank: record.rank,
                    capacity: record.capacity,
                    region_average,
                })
            })
            .collect();

        rows.sort_by(|a, b| {
            a.region
                .cmp(&b.region)
                .then_with(|| b.capacity.cmp(&a.capacity))
                .then_with(|| a.rank.cmp(&b.rank))
        });
        rows
    }

    /// One stadium per region: the one whose capacity is nearest the
    /// interpolated regional median.
    pub fn closest_to_regional_median(&self) -> Vec<MedianPick> {
        let mut picks = Vec::new();

        for (region, members) in self.group_by_region() {
            let capacities: Vec<u64> = members.iter().map(|r| r.capacity).collect();
            let Some(region_median) = stats::median(&capacities) else {
                continue;
            };

            let mut best: Option<(&StadiumRecord, f64)> = None;
            for record in members {
                let distance = (record.capacity as f64 - region_median).abs();
                let better = match best {
                    None => true,
                    Some((current, current_distance)) => {
                        distance < current_distance
                            || (distance == current_distance && record.rank < current.rank)
                    }
                };
                if better {
                    best = Some((record, distance));
                }
            }

            if let Some((record, distance)) = best {
                picks.push(MedianPick {
                    stadium: record.stadium.clone(),
                    region: region.to_string(),
                    rank: record.rank,
                    capacity: record.capacity,
                    region_median,
                    distance,
                });
            }
        }

        picks
    }
}
