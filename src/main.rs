use std::io::{self, BufRead, Write};
use std::process;

use clap::{value_t, App, Arg, ArgGroup, ArgMatches};
use log::{error, info, warn};

use hospital_solver::config::{Config, HeuristicChoice, Strategy};
use hospital_solver::level::Level;
use hospital_solver::plan::Plan;
use hospital_solver::Solve;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = App::new("hospital-solver")
        .author("martin-t")
        .version("0.1")
        .about("Search client for the hospital domain, talks to the server over stdin and stdout")
        .arg(Arg::with_name("bfs").long("bfs").help("Breadth-first search (default)"))
        .arg(Arg::with_name("dfs").long("dfs").help("Depth-first search"))
        .arg(Arg::with_name("astar").long("astar").help("A* search"))
        .arg(
            Arg::with_name("wastar")
                .long("wastar")
                .value_name("W")
                .takes_value(true)
                .min_values(0)
                .help("Weighted A* search (default weight 5)"),
        )
        .arg(Arg::with_name("greedy").long("greedy").help("Greedy best-first search"))
        .group(ArgGroup::with_name("strategy").args(&["bfs", "dfs", "astar", "wastar", "greedy"]))
        .arg(
            Arg::with_name("max-memory")
                .long("max-memory")
                .value_name("MB")
                .default_value("2048")
                .help("Soft memory limit"),
        )
        .arg(
            Arg::with_name("heuristic")
                .long("heuristic")
                .value_name("NAME")
                .possible_values(&["auto", "goal-count", "distance", "box", "combined"])
                .default_value("auto")
                .help("Heuristic used by the best-first strategies"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .value_name("N")
                .default_value("1")
                .help("Seed for shuffling expanded states"),
        )
        .get_matches();

    let config = parse_config(&matches);

    info!("SearchClient initializing, all logging goes to stderr");
    let stdin = io::stdin();
    let mut server = stdin.lock();
    if let Err(err) = send("SearchClient") {
        error!("Can't write to the server: {}", err);
        process::exit(1);
    }

    let level = read_level(&mut server).unwrap_or_else(|err| {
        error!("Failed to read level: {}", err);
        process::exit(1);
    });
    info!("Level {} loaded", level.name);

    info!("Starting {}.", config.strategy);
    let plan = match level.solve(&config) {
        Ok(solver_ok) => {
            info!("Search statistics:\n{}", solver_ok.stats);
            solver_ok.plan
        }
        Err(err) => {
            warn!("{}", err);
            None
        }
    };

    match plan {
        None => info!("Unable to solve level."),
        Some(plan) => {
            info!("Found solution of length {}.", plan.len());
            if let Err(err) = execute(&plan, &mut server) {
                error!("Lost connection to the server: {}", err);
                process::exit(1);
            }
        }
    }
}

fn parse_config(matches: &ArgMatches<'_>) -> Config {
    let strategy = if matches.is_present("dfs") {
        Strategy::DepthFirst
    } else if matches.is_present("astar") {
        Strategy::AStar
    } else if matches.is_present("wastar") {
        let weight = if matches.value_of("wastar").is_some() {
            value_t!(matches, "wastar", u32).unwrap_or_else(|e| e.exit())
        } else {
            5
        };
        Strategy::WeightedAStar(weight)
    } else if matches.is_present("greedy") {
        Strategy::Greedy
    } else {
        if !matches.is_present("bfs") {
            warn!("Defaulting to BFS search. Use --bfs, --dfs, --astar, --wastar or --greedy to set the strategy.");
        }
        Strategy::BreadthFirst
    };

    let mut config = Config::new(strategy);
    config.max_memory_mb = value_t!(matches, "max-memory", f64).unwrap_or_else(|e| e.exit());
    config.seed = value_t!(matches, "seed", u64).unwrap_or_else(|e| e.exit());
    config.heuristic = value_t!(matches, "heuristic", HeuristicChoice).unwrap_or_else(|e| e.exit());
    config
}

fn send(line: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    writeln!(stdout, "{}", line)?;
    stdout.flush()
}

/// Reads the level the server sends, up to and including the `#end` line.
fn read_level<R: BufRead>(server: &mut R) -> Result<Level, Box<dyn std::error::Error>> {
    let mut text = String::new();
    loop {
        let mut line = String::new();
        if server.read_line(&mut line)? == 0 {
            break;
        }
        let end = line.trim_end() == "#end";
        text.push_str(&line);
        if end {
            break;
        }
    }
    Ok(text.parse()?)
}

/// Sends the plan one joint action at a time.
///
/// Every action has to be followed by reading the server's response
/// otherwise the server blocks on a full buffer.
fn execute<R: BufRead>(plan: &Plan, server: &mut R) -> io::Result<()> {
    for joint_action in plan {
        send(&joint_action.to_string())?;
        let mut response = String::new();
        if server.read_line(&mut response)? == 0 {
            // server closed the connection, nothing left to confirm
            continue;
        }
        if response.contains("false") {
            warn!("Server rejected {}: {}", joint_action, response.trim_end());
        }
    }
    Ok(())
}
