// Statistics reporting for cache simulation

use crate::models::{AlgorithmStats, CacheAlgorithm, CsvResultRow, SimulationResult};
use std::collections::HashMap;
use std::path::Path;

/// Formats and exports the statistics of a simulation run
pub struct SimulationStats {
    /// Stats for each algorithm
    stats: HashMap<CacheAlgorithm, AlgorithmStats>,
    /// Capacity every cache was built with
    capacity: usize,
    /// TTL in milliseconds, 0 when expiry is off
    ttl_ms: u64,
}

impl SimulationStats {
    /// Create SimulationStats from a SimulationResult
    pub fn from_result(result: &SimulationResult) -> Self {
        Self {
            stats: result.algorithm_stats.clone(),
            capacity: result.capacity,
            ttl_ms: result
                .ttl
                .map_or(0, |ttl| u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)),
        }
    }

    /// Algorithms in a stable order
    fn algorithms(&self) -> Vec<CacheAlgorithm> {
        let mut algorithms: Vec<CacheAlgorithm> = self.stats.keys().copied().collect();
        algorithms.sort();
        algorithms
    }

    /// Print a table with one row per algorithm
    pub fn print_summary(&self) {
        println!(
            "\n{:<10} {:>10} {:>10} {:>9} {:>10} {:>11} {:>10}",
            "Algorithm", "Hits", "Misses", "Hit Rate", "Evictions", "Expirations", "ns/req"
        );
        println!("{}", "-".repeat(76));

        for algo in self.algorithms() {
            let stats = &self.stats[&algo];
            println!(
                "{:<10} {:>10} {:>10} {:>8.2}% {:>10} {:>11} {:>10.1}",
                algo.as_str(),
                stats.hits,
                stats.misses,
                stats.hit_rate(),
                stats.evictions,
                stats.expirations,
                stats.nanos_per_request(),
            );
        }
    }

    /// Print whether the slot cache agrees with the reference.
    ///
    /// Without TTL both are strict LRU over the same capacity and must produce
    /// identical hit counts.
    pub fn print_comparison(&self) {
        let (Some(slot), Some(reference)) = (
            self.stats.get(&CacheAlgorithm::SlotLru),
            self.stats.get(&CacheAlgorithm::ReferenceLru),
        ) else {
            return;
        };

        let delta = slot.hit_rate() - reference.hit_rate();
        println!("\nHit-rate delta vs reference: {delta:+.4}%");
        if self.ttl_ms > 0 {
            println!("  TTL of {} ms applies to SLOT-LRU only", self.ttl_ms);
        } else if slot.hits == reference.hits {
            println!("  Identical hit counts, as expected for strict LRU");
        } else {
            println!(
                "  MISMATCH: {} hits vs {} reference hits",
                slot.hits, reference.hits
            );
        }
    }

    /// Export results to a CSV file
    pub fn export_csv(&self, path: &Path) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_path(path)?;

        for algo in self.algorithms() {
            let stats = &self.stats[&algo];
            writer.serialize(CsvResultRow {
                algorithm: algo.as_str().to_string(),
                capacity: self.capacity,
                ttl_ms: self.ttl_ms,
                requests: stats.requests(),
                hits: stats.hits,
                misses: stats.misses,
                hit_rate: stats.hit_rate(),
                evictions: stats.evictions,
                expirations: stats.expirations,
                nanos_per_request: stats.nanos_per_request(),
            })?;
        }

        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;

    #[test]
    fn test_export_csv_writes_one_row_per_algorithm() {
        let mut algorithm_stats = HashMap::new();
        algorithm_stats.insert(
            CacheAlgorithm::ReferenceLru,
            AlgorithmStats {
                hits: 6,
                misses: 4,
                ..AlgorithmStats::new()
            },
        );
        algorithm_stats.insert(
            CacheAlgorithm::SlotLru,
            AlgorithmStats {
                hits: 5,
                misses: 5,
                expirations: 1,
                ..AlgorithmStats::new()
            },
        );
        let result = SimulationResult {
            duration: Duration::from_millis(1),
            total_requests: 10,
            unique_objects: 4,
            capacity: 2,
            ttl: Some(Duration::from_millis(250)),
            algorithm_stats,
        };

        let path = std::env::temp_dir().join("slot_lru_stats_test_export.csv");
        SimulationStats::from_result(&result)
            .export_csv(&path)
            .expect("export failed");

        let contents = fs::read_to_string(&path).expect("missing export");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("algorithm,capacity,ttl_ms,requests,hits"));
        assert!(lines[1].starts_with("SLOT-LRU,2,250,10,5,5,50"));
        assert!(lines[2].starts_with("lru-crate,2,250,10,6,4,60"));
        let _ = fs::remove_file(&path);
    }
}
