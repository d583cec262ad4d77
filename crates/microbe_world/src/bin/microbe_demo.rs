use microbe_world::{SimulationConfig, WorldKernel};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if matches!(args.get(1).map(|s| s.as_str()), Some("--help") | Some("-h")) {
        println!("Usage: microbe_demo [config.json] [ticks] [checkpoint.json]");
        println!("Runs the simulation and prints world stats every 100 ticks.");
        return;
    }

    let config = if let Some(path) = args.get(1) {
        match SimulationConfig::load_json(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Failed to load config {path}: {err:?}");
                std::process::exit(1);
            }
        }
    } else {
        match SimulationConfig::default().validate() {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Default config failed validation: {err:?}");
                std::process::exit(1);
            }
        }
    };

    let ticks: u64 = match args.get(2).map(|s| s.parse()) {
        Some(Ok(n)) => n,
        Some(Err(_)) => {
            eprintln!("Tick count must be a non-negative integer");
            std::process::exit(1);
        }
        None => 1000,
    };
    let checkpoint = args.get(3).map(std::path::PathBuf::from);

    let mut kernel = WorldKernel::new(config);
    for _ in 0..ticks {
        kernel.tick();
        let stats = kernel.stats();
        if stats.age % 100 == 0 {
            println!(
                "tick {}: agents {} mean_age {:.1}",
                stats.age, stats.count, stats.mean_age
            );
            // A failed checkpoint is retried at the next interval; only
            // startup and the final save abort the run.
            if let Some(path) = &checkpoint {
                if let Err(err) = kernel.save_to_path(path) {
                    eprintln!("Checkpoint save failed: {err:?}");
                }
            }
        }
    }

    let stats = kernel.stats();
    println!(
        "done: tick {} agents {} mean_age {:.1}",
        stats.age, stats.count, stats.mean_age
    );
    if let Some(path) = &checkpoint {
        if let Err(err) = kernel.save_to_path(path) {
            eprintln!("Final save failed: {err:?}");
            std::process::exit(1);
        }
        println!("world saved to {}", path.display());
    }
}
