pub mod assignment;
pub mod deadlock;
pub mod frontier;
pub mod heuristic;
pub mod preprocessing;
pub mod stats;

use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};
use std::time::Instant;

use fnv::FnvHashSet;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use typed_arena::Arena;

use crate::config::{Config, HeuristicChoice, Strategy};
use crate::level::Level;
use crate::memory::{MemoryProbe, ProcessMemory};
use crate::plan::Plan;
use crate::state::State;
use crate::Solve;

use self::frontier::{BestFirst, Fifo, Frontier, Lifo};
use self::heuristic::{Evaluator, Heuristic, HeuristicKind};
use self::stats::{Progress, Stats};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolverErr {
    /// The search was aborted, the state space might not have been fully explored.
    MemoryExceeded { used_mb: f64, limit_mb: f64 },
}

impl Display for SolverErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            SolverErr::MemoryExceeded { used_mb, limit_mb } => write!(
                f,
                "Maximum memory usage exceeded: {:.2} MB used, limit is {:.2} MB",
                used_mb, limit_mb
            ),
        }
    }
}

impl Error for SolverErr {}

pub struct SolverOk {
    /// `None` if the frontier was exhausted without reaching a goal.
    pub plan: Option<Plan>,
    pub stats: Stats,
    /// Name of the frontier which was used.
    pub frontier: String,
    /// Counts at the moment the search ended.
    pub progress: Progress,
}

impl SolverOk {
    fn new(plan: Option<Plan>, stats: Stats, frontier: String, progress: Progress) -> Self {
        Self {
            plan,
            stats,
            frontier,
            progress,
        }
    }
}

impl Debug for SolverOk {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.plan {
            None => writeln!(f, "No solution")?,
            Some(ref plan) => writeln!(f, "{}: {}", self.frontier, plan.len())?,
        }
        writeln!(f, "{}", self.progress)?;
        write!(f, "{:?}", self.stats)
    }
}

impl Solve for Level {
    fn solve(&self, config: &Config) -> Result<SolverOk, SolverErr> {
        solve_with_probe(self, config, &ProcessMemory)
    }
}

/// Like `Solve::solve` but memory usage is sampled by `probe`.
pub fn solve_with_probe(
    level: &Level,
    config: &Config,
    probe: &dyn MemoryProbe,
) -> Result<SolverOk, SolverErr> {
    let arena = Arena::new();
    let root: &State<'_> = arena.alloc(level.initial_state());

    match config.strategy.evaluation() {
        None if config.strategy == Strategy::DepthFirst => {
            let mut frontier = Lifo::new();
            graph_search(root, &arena, &mut frontier, config, probe)
        }
        None => {
            let mut frontier = Fifo::new();
            graph_search(root, &arena, &mut frontier, config, probe)
        }
        Some(evaluation) => {
            let kind = heuristic_kind(root, config.heuristic);
            debug!("Using {} heuristic", kind);
            let heuristic = Heuristic::new(kind, &level.layout, config.box_penalty);
            let mut frontier = BestFirst::new(Evaluator::new(evaluation, heuristic));
            graph_search(root, &arena, &mut frontier, config, probe)
        }
    }
}

fn heuristic_kind(root: &State<'_>, choice: HeuristicChoice) -> HeuristicKind {
    match choice {
        HeuristicChoice::Auto => HeuristicKind::select(root),
        HeuristicChoice::Forced(kind) => kind,
    }
}

fn graph_search<'a>(
    root: &'a State<'a>,
    arena: &'a Arena<State<'a>>,
    frontier: &mut dyn Frontier<'a>,
    config: &Config,
    probe: &dyn MemoryProbe,
) -> Result<SolverOk, SolverErr> {
    debug!("Search called: {}", frontier.name());

    let start = Instant::now();
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut stats = Stats::new();
    let mut explored: FnvHashSet<&'a State<'a>> = FnvHashSet::default();

    let progress = |explored: usize, frontier: usize, memory_mb: f64| Progress {
        explored,
        frontier,
        elapsed: start.elapsed(),
        memory_mb,
        max_memory_mb: config.max_memory_mb,
    };

    frontier.add(root);
    stats.add_generated(root.g());

    let mut iterations: usize = 0;
    loop {
        iterations += 1;
        let memory_mb = probe.used_mb();

        if config.progress_interval != 0 && iterations % config.progress_interval == 0 {
            info!("{}", progress(explored.len(), frontier.len(), memory_mb));
        }

        if memory_mb > config.max_memory_mb {
            info!("{}", progress(explored.len(), frontier.len(), memory_mb));
            warn!("Maximum memory usage exceeded.");
            return Err(SolverErr::MemoryExceeded {
                used_mb: memory_mb,
                limit_mb: config.max_memory_mb,
            });
        }

        let state = match frontier.pop() {
            Some(state) => state,
            None => {
                let progress = progress(explored.len(), frontier.len(), memory_mb);
                info!("{}", progress);
                info!("Frontier is empty. No solution found.");
                return Ok(SolverOk::new(None, stats, frontier.name(), progress));
            }
        };

        if state.is_goal_state() {
            let progress = progress(explored.len(), frontier.len(), memory_mb);
            info!("{}", progress);
            info!("Solution found.");
            let plan = state.extract_plan();
            debug!("Plan has {} steps", plan.len());
            return Ok(SolverOk::new(Some(plan), stats, frontier.name(), progress));
        }

        if stats.add_expanded(state.g()) {
            debug!("Expanding new depth: {}", state.g());
        }
        explored.insert(state);

        for child in state.expand(&mut rng) {
            if explored.contains(&child) || frontier.contains(&child) {
                stats.add_duplicate(child.g());
                continue;
            }
            stats.add_generated(child.g());
            frontier.add(arena.alloc(child));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::level::test_level;

    struct FakeMemory(f64);

    impl MemoryProbe for FakeMemory {
        fn used_mb(&self) -> f64 {
            self.0
        }
    }

    const STRATEGIES: [Strategy; 5] = [
        Strategy::BreadthFirst,
        Strategy::DepthFirst,
        Strategy::AStar,
        Strategy::WeightedAStar(5),
        Strategy::Greedy,
    ];

    fn solve(level: &Level, strategy: Strategy) -> SolverOk {
        solve_with_probe(level, &Config::new(strategy), &FakeMemory(0.0)).unwrap()
    }

    /// Replays the plan from the initial state checking every step is legal.
    fn replay<'a>(arena: &'a Arena<State<'a>>, level: &'a Level, plan: &Plan) -> &'a State<'a> {
        let mut state: &State<'_> = arena.alloc(level.initial_state());
        for joint_action in plan.iter() {
            assert_eq!(joint_action.len(), level.agent_count());
            assert!(!state.is_conflicting(joint_action), "{}", joint_action);
            for (agent, &action) in joint_action.iter().enumerate() {
                assert!(state.is_applicable(agent, action), "{} {}", agent, action);
            }
            state = arena.alloc(state.result(joint_action.clone()));
        }
        state
    }

    fn assert_valid(level: &Level, plan: &Plan) {
        let arena = Arena::new();
        assert!(replay(&arena, level, plan).is_goal_state());
    }

    fn open_grid() -> Level {
        test_level("blue: 0", "0  \n   \n   ", "   \n   \n  0")
    }

    fn corridor() -> Level {
        test_level(
            "blue: 0, A",
            r"
+++++++
+0A   +
+++++++",
            r"
+++++++
+    A+
+++++++",
        )
    }

    fn pull_around() -> Level {
        test_level(
            "blue: 0, A",
            r"
+++++++
+   0 +
+ A   +
+     +
+++++++",
            r"
+++++++
+     +
+   A +
+     +
+++++++",
        )
    }

    fn two_agents() -> Level {
        test_level(
            "blue: 0, A\nred: 1",
            r"
+++++++
+0    +
+ A   +
+    1+
+++++++",
            r"
+++++++
+    1+
+  A  +
+     +
+++++++",
        )
    }

    #[test]
    fn breadth_first_open_grid() {
        let level = open_grid();
        let solution = solve(&level, Strategy::BreadthFirst);
        let plan = solution.plan.unwrap();
        assert_eq!(plan.len(), 4);
        assert_valid(&level, &plan);
        assert_eq!(solution.frontier, "breadth-first search");
        assert!(solution.stats.total_expanded() > 0);
        assert_eq!(
            solution.progress.generated(),
            solution.progress.explored + solution.progress.frontier
        );
    }

    #[test]
    fn a_star_corridor_matches_heuristic() {
        let level = corridor();
        let root = level.initial_state();
        let heuristic = Heuristic::new(HeuristicKind::select(&root), &level.layout, 0);
        assert_eq!(heuristic.kind(), HeuristicKind::BoxRelocation);
        assert_eq!(heuristic.h(&root), 3);

        let plan = solve(&level, Strategy::AStar).plan.unwrap();
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.to_string(), "Push(E,E)\nPush(E,E)\nPush(E,E)\n");
        assert_valid(&level, &plan);
    }

    #[test]
    fn already_solved() {
        let level = test_level("blue: 0", "0 ", "0 ");
        for &strategy in &STRATEGIES {
            let solution = solve(&level, strategy);
            assert!(solution.plan.unwrap().is_empty());
            assert_eq!(solution.stats.total_expanded(), 0);
        }
    }

    #[test]
    fn no_solution_exhausts_the_frontier() {
        // nobody can move the red box out of the corner
        let level = test_level(
            "blue: 0\nred: A",
            r"
+++++
+A  +
+  0+
+++++",
            r"
+++++
+   +
+ A +
+++++",
        );
        for &strategy in &STRATEGIES {
            let solution = solve(&level, strategy);
            assert!(solution.plan.is_none(), "{}", strategy);
            // all five positions of the agent
            assert_eq!(solution.stats.total_expanded(), 5, "{}", strategy);
            assert_eq!(solution.progress.frontier, 0);
            assert_eq!(solution.progress.explored, 5);
        }
    }

    #[test]
    fn pulled_out_of_a_dead_corner() {
        // the heuristic gives up on the box but pulling it out still works
        let level = test_level(
            "blue: 0, A",
            r"
++++++
+A   +
+    +
+   0+
++++++",
            r"
++++++
+    +
+ A  +
+    +
++++++",
        );
        let root = level.initial_state();
        let heuristic = Heuristic::new(HeuristicKind::BoxRelocation, &level.layout, 0);
        assert_eq!(heuristic.h(&root), heuristic::UNSOLVABLE);

        for &strategy in &STRATEGIES {
            let plan = solve(&level, strategy).plan.unwrap();
            assert_valid(&level, &plan);
        }
    }

    #[test]
    fn every_strategy_finds_a_valid_plan() {
        for level in &[open_grid(), corridor(), pull_around(), two_agents()] {
            for &strategy in &STRATEGIES {
                let solution = solve(level, strategy);
                assert_eq!(solution.frontier, strategy.to_string());
                assert_valid(level, &solution.plan.unwrap());
            }
        }
    }

    #[test]
    fn optimal_strategies_agree() {
        for level in &[open_grid(), corridor(), pull_around()] {
            let bfs = solve(level, Strategy::BreadthFirst).plan.unwrap();
            let a_star = solve(level, Strategy::AStar).plan.unwrap();
            assert_eq!(bfs.len(), a_star.len());
        }
        assert_eq!(solve(&pull_around(), Strategy::AStar).plan.unwrap().len(), 4);
    }

    #[test]
    fn admissible_along_optimal_plans() {
        let cases = [
            (open_grid(), HeuristicKind::Distance),
            (open_grid(), HeuristicKind::GoalCount),
            (corridor(), HeuristicKind::BoxRelocation),
            (corridor(), HeuristicKind::GoalCount),
            (pull_around(), HeuristicKind::BoxRelocation),
            (pull_around(), HeuristicKind::GoalCount),
        ];
        for (level, kind) in &cases {
            let plan = solve(level, Strategy::BreadthFirst).plan.unwrap();
            let heuristic = Heuristic::new(*kind, &level.layout, 0);

            let arena = Arena::new();
            let mut state: &State<'_> = arena.alloc(level.initial_state());
            for (step, joint_action) in plan.iter().enumerate() {
                let remaining = (plan.len() - step) as u32;
                assert!(heuristic.h(state) <= remaining, "{} at step {}", kind, step);
                state = arena.alloc(state.result(joint_action.clone()));
            }
            assert_eq!(heuristic.h(state), 0);
        }
    }

    #[test]
    fn memory_ceiling() {
        let level = open_grid();
        let mut config = Config::new(Strategy::BreadthFirst);
        config.max_memory_mb = 50.0;

        let err = solve_with_probe(&level, &config, &FakeMemory(100.0)).unwrap_err();
        assert_eq!(
            err,
            SolverErr::MemoryExceeded {
                used_mb: 100.0,
                limit_mb: 50.0
            }
        );
        assert!(err.to_string().starts_with("Maximum memory usage exceeded"));

        assert!(solve_with_probe(&level, &config, &FakeMemory(50.0))
            .unwrap()
            .plan
            .is_some());
    }

    #[test]
    fn seeded_search_is_reproducible() {
        let level = two_agents();
        let mut config = Config::new(Strategy::DepthFirst);
        config.seed = 7;
        config.progress_interval = 0;

        let first = solve_with_probe(&level, &config, &FakeMemory(0.0)).unwrap();
        let second = solve_with_probe(&level, &config, &FakeMemory(0.0)).unwrap();
        assert_eq!(first.plan, second.plan);
        assert_eq!(first.stats, second.stats);
    }

    #[test]
    fn forced_heuristic() {
        let level = pull_around();
        let mut config = Config::new(Strategy::Greedy);
        config.heuristic = HeuristicChoice::Forced(HeuristicKind::GoalCount);
        let solution = solve_with_probe(&level, &config, &FakeMemory(0.0)).unwrap();
        assert_valid(&level, &solution.plan.unwrap());
        assert_eq!(solution.frontier, "best-first search using greedy evaluation");
    }
}
