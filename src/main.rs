use clap::Parser;
use tracing_subscriber::EnvFilter;
use wildgrove_lib::model::config::SimConfig;
use wildgrove_lib::model::environment::Environment;
use wildgrove_lib::model::persistence;
use wildgrove_lib::model::world::World;

/// Headless ecosystem simulation runner.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML configuration (written with defaults if missing)
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Override the world seed from the config
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 1000)]
    ticks: u64,

    /// Simulated seconds per tick
    #[arg(long, default_value_t = 0.1)]
    dt: f64,

    /// Resume from a save file instead of creating a fresh world
    #[arg(long)]
    load: Option<String>,

    /// Write the final world state to this path
    #[arg(long)]
    save: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let (mut world, mut env) = match &args.load {
        Some(path) => persistence::load_world(path)?,
        None => {
            let mut config = SimConfig::load(&args.config)?;
            if let Some(seed) = args.seed {
                config.world.seed = Some(seed);
            }
            let world = World::new(config)?;
            let env = Environment::new(&world.config.environment);
            (world, env)
        }
    };

    for _ in 0..args.ticks {
        world.update(&mut env, args.dt)?;
        if world.entities.is_empty() {
            tracing::info!(tick = world.tick, "world is empty, stopping");
            break;
        }
    }

    tracing::info!(
        tick = world.tick,
        entities = world.entities.len(),
        animals = world.animal_count(),
        "run finished"
    );

    if let Some(path) = &args.save {
        persistence::save_world(&mut world, &env, path)?;
    }
    Ok(())
}
