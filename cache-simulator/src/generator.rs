//! Synthetic trace generation
//!
//! Produces `timestamp_ms,key` traces with a hot/cold popularity split. The
//! hot set can rotate through the key space in phases, which is what makes
//! recency matter: keys that were hot in an earlier phase go cold and should
//! be evicted.

use crate::models::Request;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::PathBuf;

/// Parameters for generating a trace
#[derive(Debug, Clone)]
pub struct TrafficLogConfig {
    /// Number of requests to write
    pub requests: u64,
    /// Number of unique keys
    pub unique_objects: u32,
    /// Percentage of traffic that goes to popular keys
    pub popular_traffic_percent: u8,
    /// Percentage of keys considered popular
    pub popular_objects_percent: u8,
    /// Number of times the popular set moves to a different part of the key space
    pub phases: u32,
    /// Largest gap between consecutive requests in milliseconds
    pub max_gap_ms: u64,
    /// Output CSV file
    pub output: PathBuf,
    /// Seed for reproducible traces
    pub seed: Option<u64>,
}

impl Default for TrafficLogConfig {
    fn default() -> Self {
        Self {
            requests: 1_000_000,
            unique_objects: 100_000,
            popular_traffic_percent: 80,
            popular_objects_percent: 20,
            phases: 4,
            max_gap_ms: 5,
            output: PathBuf::from("trace.csv"),
            seed: None,
        }
    }
}

/// Writes synthetic traces
pub struct TrafficLogGenerator {
    config: TrafficLogConfig,
}

impl TrafficLogGenerator {
    /// Create a generator for the given configuration
    pub fn new(config: TrafficLogConfig) -> Self {
        Self { config }
    }

    /// Number of popular keys
    fn popular_objects(&self) -> u32 {
        let popular =
            u64::from(self.config.unique_objects) * u64::from(self.config.popular_objects_percent)
                / 100;
        (popular as u32).clamp(1, self.config.unique_objects.max(1))
    }

    /// Picks the key for request `index`
    fn pick_key(&self, rng: &mut StdRng, index: u64) -> u32 {
        let objects = self.config.unique_objects.max(1);
        let popular = self.popular_objects();
        let phases = u64::from(self.config.phases.max(1));
        let phase_len = (self.config.requests / phases).max(1);
        let phase = (index / phase_len).min(phases - 1) as u32;

        if rng.gen_range(0..100) < self.config.popular_traffic_percent {
            // Popular keys form a contiguous window that slides each phase
            let offset = (u64::from(phase) * u64::from(popular) % u64::from(objects)) as u32;
            (offset + rng.gen_range(0..popular)) % objects
        } else {
            rng.gen_range(0..objects)
        }
    }

    /// Write the trace to `config.output`
    pub fn generate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = self.config.output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        println!(
            "Generating {} requests over {} keys ({}% of traffic to {} popular keys, {} phases)",
            self.config.requests,
            self.config.unique_objects,
            self.config.popular_traffic_percent,
            self.popular_objects(),
            self.config.phases.max(1),
        );

        let mut writer = csv::Writer::from_path(&self.config.output)?;
        let mut timestamp_ms = 0u64;
        let report_every = (self.config.requests / 10).max(1);

        for index in 0..self.config.requests {
            let key = self.pick_key(&mut rng, index);
            writer.serialize(Request::new(timestamp_ms, format!("key_{key}")))?;
            timestamp_ms += rng.gen_range(0..=self.config.max_gap_ms);

            if (index + 1) % report_every == 0 {
                println!(
                    "  {:>3}% ({} requests)",
                    (index + 1) * 100 / self.config.requests,
                    index + 1
                );
            }
        }

        writer.flush()?;
        println!("Trace written to {}", self.config.output.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::LogReader;
    use std::collections::HashSet;
    use std::path::Path;

    /// Helper function to create a temp directory for tests
    fn create_temp_dir(test_name: &str) -> PathBuf {
        let temp_dir = std::env::temp_dir().join(format!("slot_lru_generator_test_{test_name}"));
        let _ = fs::remove_dir_all(&temp_dir);
        fs::create_dir_all(&temp_dir).expect("Failed to create temp directory");
        temp_dir
    }

    fn read_back(path: &Path) -> Vec<Request> {
        LogReader::new(path)
            .stream_requests()
            .expect("Failed to open trace")
            .collect::<Result<_, _>>()
            .expect("Failed to parse trace")
    }

    #[test]
    fn test_default_config() {
        let config = TrafficLogConfig::default();
        assert_eq!(config.requests, 1_000_000);
        assert_eq!(config.unique_objects, 100_000);
        assert_eq!(config.popular_traffic_percent, 80);
        assert_eq!(config.popular_objects_percent, 20);
        assert_eq!(config.output, PathBuf::from("trace.csv"));
    }

    #[test]
    fn test_generated_trace_is_readable_and_ordered() {
        let temp_dir = create_temp_dir("readable");
        let output = temp_dir.join("nested/trace.csv");
        let config = TrafficLogConfig {
            requests: 500,
            unique_objects: 50,
            output: output.clone(),
            seed: Some(7),
            ..Default::default()
        };
        TrafficLogGenerator::new(config).generate().expect("Generation failed");

        let requests = read_back(&output);
        assert_eq!(requests.len(), 500);
        assert!(requests
            .windows(2)
            .all(|w| w[0].timestamp_ms <= w[1].timestamp_ms));
        assert!(requests.iter().all(|r| {
            let id: u32 = r.key.trim_start_matches("key_").parse().unwrap();
            id < 50
        }));

        let _ = fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn test_same_seed_same_trace() {
        let temp_dir = create_temp_dir("seeded");
        let make = |name: &str| {
            let output = temp_dir.join(name);
            let config = TrafficLogConfig {
                requests: 200,
                unique_objects: 1_000,
                output: output.clone(),
                seed: Some(42),
                ..Default::default()
            };
            TrafficLogGenerator::new(config).generate().expect("Generation failed");
            read_back(&output)
        };

        assert_eq!(make("a.csv"), make("b.csv"));
        let _ = fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn test_popular_keys_dominate() {
        let temp_dir = create_temp_dir("popular");
        let output = temp_dir.join("trace.csv");
        let config = TrafficLogConfig {
            requests: 5_000,
            unique_objects: 1_000,
            popular_traffic_percent: 90,
            popular_objects_percent: 5,
            phases: 1,
            output: output.clone(),
            seed: Some(1),
            ..Default::default()
        };
        TrafficLogGenerator::new(config).generate().expect("Generation failed");

        let requests = read_back(&output);
        let popular: HashSet<String> = (0..50).map(|i| format!("key_{i}")).collect();
        let hot = requests.iter().filter(|r| popular.contains(&r.key)).count();
        assert!(hot > 4_000, "only {hot} of 5000 requests hit popular keys");

        let _ = fs::remove_dir_all(&temp_dir);
    }
}
