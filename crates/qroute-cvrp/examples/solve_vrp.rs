use std::path::PathBuf;

use qroute_cvrp::{SolverConfig, load_sol, load_vrp, solve};

fn main() {
    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("crates/qroute-cvrp/tests/data/small.vrp"));
    let config = match args.next() {
        Some(config_path) => {
            SolverConfig::from_yaml_path(config_path).expect("failed to load solver config")
        }
        None => SolverConfig::from_default_yaml().expect("default solver config is valid"),
    };

    let def = load_vrp(&path).expect("failed to load .vrp file");
    let instance = def
        .compile(config.capacity)
        .expect("failed to validate instance");
    let mut solution = solve(&def, config).expect("failed to solve instance");

    let sol_path = path.with_extension("sol");
    if sol_path.exists() {
        let (known, cost) = load_sol(&sol_path, &instance).expect("failed to load .sol file");
        println!("reference route:\n{known}");
        solution = solution.with_known_route(known, cost);
    }

    if let Some(metrics) = &solution.metrics {
        println!(
            "episodes: {} (truncated {}), best episode reward: {:?}, final epsilon: {:.4}",
            metrics.episodes_run,
            metrics.truncated_episodes,
            metrics.best_total_reward,
            metrics.final_epsilon
        );
    }
    println!("greedy route:\n{}", solution.route);
    if let Some(observed) = &solution.best_observed {
        println!("best observed route:\n{observed}");
    }
    match solution.gap() {
        Some(gap) => println!(
            "best distance {:.2}, gap to known optimum {:.2}%",
            solution.total_distance(),
            gap * 100.0
        ),
        None => println!("best distance {:.2}", solution.total_distance()),
    }
}
