use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

mod generator;
mod input;
mod models;
mod runner;
mod stats;

/// Trace-driven simulator for slot-lru
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the CLI
#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace against the selected caches
    Simulate {
        /// Trace file, or a directory of .csv trace files
        #[arg(short, long, value_name = "PATH")]
        input: PathBuf,

        /// Cache capacity (number of entries)
        #[arg(short, long, default_value = "10000")]
        capacity: usize,

        /// Entry time-to-live in milliseconds for slot-lru (0 disables expiry)
        #[arg(long, default_value = "0")]
        ttl_ms: u64,

        /// Algorithms to simulate (slot-lru, lru)
        /// If not provided, all algorithms will be used
        #[arg(short, long, value_name = "ALGOS", num_args = 1.., value_delimiter = ',')]
        algorithms: Option<Vec<String>>,

        /// Export results to CSV file
        #[arg(long, value_name = "PATH")]
        output_csv: Option<PathBuf>,
    },

    /// Generate a synthetic trace
    Generate {
        /// Number of requests
        #[arg(long, default_value = "1000000")]
        requests: u64,

        /// Number of unique keys
        #[arg(long, default_value = "100000")]
        objects: u32,

        /// Percentage of traffic from popular keys (default: 80%)
        #[arg(long, default_value = "80")]
        popular_traffic: u8,

        /// Percentage of keys that are popular (default: 20%)
        #[arg(long, default_value = "20")]
        popular_objects: u8,

        /// Number of phases the popular set rotates through
        #[arg(long, default_value = "4")]
        phases: u32,

        /// Largest gap between requests in milliseconds
        #[arg(long, default_value = "5")]
        max_gap_ms: u64,

        /// Seed for a reproducible trace
        #[arg(long)]
        seed: Option<u64>,

        /// Output file
        #[arg(short, long, default_value = "trace.csv")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    match args.command {
        Commands::Generate {
            requests,
            objects,
            popular_traffic,
            popular_objects,
            phases,
            max_gap_ms,
            seed,
            output,
        } => {
            let config = generator::TrafficLogConfig {
                requests,
                unique_objects: objects,
                popular_traffic_percent: popular_traffic.min(100),
                popular_objects_percent: popular_objects.min(100),
                phases,
                max_gap_ms,
                output,
                seed,
            };
            generator::TrafficLogGenerator::new(config).generate()
        }

        Commands::Simulate {
            input,
            capacity,
            ttl_ms,
            algorithms,
            output_csv,
        } => run_simulator(input, capacity, ttl_ms, algorithms, output_csv),
    }
}

/// Resolve algorithm names, falling back to all algorithms
fn parse_algorithms(names: Option<&[String]>) -> Vec<models::CacheAlgorithm> {
    let mut selected = Vec::new();
    for name in names.unwrap_or_default() {
        match models::CacheAlgorithm::from_name(name) {
            Some(algo) if !selected.contains(&algo) => selected.push(algo),
            Some(_) => {}
            None => println!("Warning: Unknown algorithm '{name}', skipping"),
        }
    }
    if selected.is_empty() {
        models::CacheAlgorithm::all()
    } else {
        selected
    }
}

/// Run the simulator with the given parameters
fn run_simulator(
    input: PathBuf,
    capacity: usize,
    ttl_ms: u64,
    algorithms: Option<Vec<String>>,
    output_csv: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let algorithms = parse_algorithms(algorithms.as_deref());
    let ttl = (ttl_ms > 0).then(|| Duration::from_millis(ttl_ms));

    println!("Cache Simulation");
    println!("================");
    println!("Input: {}", input.display());
    println!("Cache capacity: {capacity} entries");
    match ttl {
        Some(ttl) => println!("TTL: {ttl:?}"),
        None => println!("TTL: disabled"),
    }
    println!(
        "Algorithms: {:?}",
        algorithms.iter().map(|a| a.as_str()).collect::<Vec<_>>()
    );

    let config = models::SimulationConfig {
        input,
        capacity,
        ttl,
        algorithms,
    };

    let result = runner::SimulationRunner::new(config).run()?;
    println!("\nSimulation completed in {:.2?}", result.duration);
    println!("Total requests: {}", result.total_requests);
    println!("Unique objects: {}", result.unique_objects);

    let stats = stats::SimulationStats::from_result(&result);
    stats.print_summary();
    stats.print_comparison();

    if let Some(csv_path) = output_csv {
        match stats.export_csv(&csv_path) {
            Ok(()) => println!("\nResults exported to: {}", csv_path.display()),
            Err(e) => eprintln!("Failed to export CSV: {e}"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::CacheAlgorithm;

    #[test]
    fn test_parse_algorithms() {
        let names = vec!["lru".to_string(), "bogus".to_string(), "LRU".to_string()];
        assert_eq!(
            parse_algorithms(Some(names.as_slice())),
            vec![CacheAlgorithm::ReferenceLru]
        );
        assert_eq!(parse_algorithms(None), CacheAlgorithm::all());
    }

    #[test]
    fn test_cli_parses_simulate() {
        let args = Args::try_parse_from([
            "cache-simulator",
            "simulate",
            "--input",
            "trace.csv",
            "--ttl-ms",
            "250",
            "-a",
            "slot-lru,lru",
        ])
        .unwrap();
        match args.command {
            Commands::Simulate {
                ttl_ms, algorithms, ..
            } => {
                assert_eq!(ttl_ms, 250);
                assert_eq!(algorithms.unwrap().len(), 2);
            }
            Commands::Generate { .. } => panic!("parsed the wrong subcommand"),
        }
    }
}
