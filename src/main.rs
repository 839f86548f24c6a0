//! Cellgrid CLI - Run an automaton from a JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use cellgrid::{
    engine::{CellGroup, PopulationStats},
    schema::SimulationConfig,
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [steps] [snapshot.json]", args[0]);
        eprintln!();
        eprintln!("Run a grid automaton from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json    Path to simulation configuration file");
        eprintln!("  steps          Number of ticks (default: 100)");
        eprintln!("  snapshot.json  Where to write the final grid (optional)");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let steps: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);
    let snapshot_path = args.get(3).map(PathBuf::from);

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: SimulationConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    println!("Cell Grid Simulation");
    println!("====================");
    println!(
        "Grid: {}x{} {:?} ({:?} adjacency, {:?} edges)",
        config.width,
        config.height,
        config.shape,
        config.adjacency,
        config.effective_edges()
    );
    println!("Automaton: {:?}", config.automaton);
    println!("Steps: {}", steps);
    println!();

    let mut group = CellGroup::build(config).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    println!("Initial state:");
    print_counts(&group.stats());
    println!();

    println!("Running simulation...");
    let start = Instant::now();

    for i in 0..steps {
        if let Err(e) = group.advance() {
            println!("  Stopped at tick {}: {}", i + 1, e);
            break;
        }

        // Print progress every 10%
        if (i + 1) % (steps / 10).max(1) == 0 {
            let stats = group.stats();
            let elapsed = start.elapsed().as_secs_f32();
            println!(
                "  Tick {}/{}: counts={:?}, occupied={}, {:.1} ticks/s",
                i + 1,
                steps,
                stats.counts,
                stats.occupied,
                (i + 1) as f32 / elapsed
            );
        }
    }

    let elapsed = start.elapsed();

    println!();
    println!("Final state:");
    print_counts(&group.stats());
    println!();
    println!(
        "Time: {:.2}s ({:.1} ticks/s)",
        elapsed.as_secs_f32(),
        group.tick() as f32 / elapsed.as_secs_f32()
    );

    if let Some(path) = snapshot_path {
        match group.snapshot().save(&path) {
            Ok(()) => println!("Snapshot written to {}", path.display()),
            Err(e) => {
                eprintln!("Error writing snapshot: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn print_counts(stats: &PopulationStats) {
    println!("  Tick: {}", stats.tick);
    for (state, count) in stats.counts.iter().enumerate() {
        println!("  State {}: {}", state, count);
    }
    println!("  Occupied: {}", stats.occupied);
}

fn print_example_config() {
    let config = SimulationConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error encoding example: {}", e),
    }
}
