use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::solver::heuristic::{Evaluation, HeuristicKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    BreadthFirst,
    DepthFirst,
    AStar,
    WeightedAStar(u32),
    Greedy,
}

impl Strategy {
    /// How best-first strategies order the frontier, `None` for the uninformed ones.
    pub fn evaluation(self) -> Option<Evaluation> {
        match self {
            Strategy::BreadthFirst | Strategy::DepthFirst => None,
            Strategy::AStar => Some(Evaluation::AStar),
            Strategy::WeightedAStar(w) => Some(Evaluation::WeightedAStar(w)),
            Strategy::Greedy => Some(Evaluation::Greedy),
        }
    }
}

/// Same as the name of the frontier the strategy uses.
impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.evaluation() {
            Some(evaluation) => write!(f, "best-first search using {}", evaluation),
            None if *self == Strategy::DepthFirst => write!(f, "depth-first search"),
            None => write!(f, "breadth-first search"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeuristicChoice {
    /// Picked from the initial state.
    Auto,
    Forced(HeuristicKind),
}

impl FromStr for HeuristicChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let choice = match s {
            "auto" => HeuristicChoice::Auto,
            "goal-count" => HeuristicChoice::Forced(HeuristicKind::GoalCount),
            "distance" => HeuristicChoice::Forced(HeuristicKind::Distance),
            "box" => HeuristicChoice::Forced(HeuristicKind::BoxRelocation),
            "combined" => HeuristicChoice::Forced(HeuristicKind::Combined),
            _ => return Err(format!("Unknown heuristic: {}", s)),
        };
        Ok(choice)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    pub strategy: Strategy,
    pub heuristic: HeuristicChoice,
    pub max_memory_mb: f64,
    /// Seed of the generator that shuffles expanded states.
    pub seed: u64,
    /// Iterations between progress reports.
    pub progress_interval: usize,
    /// Added per unfilled box goal, nonzero values make box estimates inadmissible.
    pub box_penalty: u32,
}

impl Config {
    pub fn new(strategy: Strategy) -> Self {
        Config {
            strategy,
            ..Config::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            strategy: Strategy::BreadthFirst,
            heuristic: HeuristicChoice::Auto,
            max_memory_mb: 2048.0,
            seed: 1,
            progress_interval: 1000,
            box_penalty: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_names() {
        assert_eq!(Strategy::BreadthFirst.to_string(), "breadth-first search");
        assert_eq!(Strategy::DepthFirst.to_string(), "depth-first search");
        assert_eq!(Strategy::AStar.to_string(), "best-first search using A* evaluation");
        assert_eq!(
            Strategy::WeightedAStar(5).to_string(),
            "best-first search using WA*(5) evaluation"
        );
        assert_eq!(Strategy::Greedy.to_string(), "best-first search using greedy evaluation");
    }

    #[test]
    fn heuristic_choice() {
        assert_eq!("auto".parse::<HeuristicChoice>(), Ok(HeuristicChoice::Auto));
        assert_eq!(
            "box".parse::<HeuristicChoice>(),
            Ok(HeuristicChoice::Forced(HeuristicKind::BoxRelocation))
        );
        assert!("manhattan".parse::<HeuristicChoice>().is_err());
    }

    #[test]
    fn defaults() {
        let config = Config::new(Strategy::Greedy);
        assert_eq!(config.strategy, Strategy::Greedy);
        assert_eq!(config.max_memory_mb, 2048.0);
        assert_eq!(config.seed, 1);
        assert_eq!(config.progress_interval, 1000);
        assert_eq!(config.box_penalty, 0);
    }
}
