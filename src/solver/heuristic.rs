use std::fmt::{self, Debug, Display, Formatter};

use log::debug;

use crate::data::{Goal, Letter, Pos, MAX_LETTERS};
use crate::level::Layout;
use crate::state::State;

use super::assignment;
use super::deadlock;
use super::preprocessing::DistanceTable;

/// Returned for states from which the goal provably can't be reached.
pub const UNSOLVABLE: u32 = u32::MAX;

/// Coordination cost when no agent has the color of any remaining box.
const NO_AGENT_PENALTY: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeuristicKind {
    /// Number of unsatisfied goal cells.
    GoalCount,
    /// Agents to their goals.
    Distance,
    /// Boxes to their goals plus one agent to the nearest box.
    BoxRelocation,
    /// Both of the above plus the agents which should move the boxes.
    Combined,
}

impl HeuristicKind {
    /// Only agents: distance, boxes and one agent: box relocation, otherwise combined.
    pub fn select(state: &State<'_>) -> Self {
        let has_goal = letters_with_goals(state.layout());
        if misplaced_boxes(state, &has_goal).next().is_none() {
            HeuristicKind::Distance
        } else if state.agents().len() == 1 {
            HeuristicKind::BoxRelocation
        } else {
            HeuristicKind::Combined
        }
    }
}

impl Display for HeuristicKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            HeuristicKind::GoalCount => write!(f, "goal count"),
            HeuristicKind::Distance => write!(f, "distance"),
            HeuristicKind::BoxRelocation => write!(f, "box relocation"),
            HeuristicKind::Combined => write!(f, "combined"),
        }
    }
}

/// Estimates the number of joint actions left, less is better.
pub struct Heuristic {
    kind: HeuristicKind,
    dists: DistanceTable,
    agent_goals: Vec<Option<Pos>>,
    box_goals: Vec<(Pos, Letter)>,
    has_goal: [bool; MAX_LETTERS],
    box_penalty: u32,
}

struct BoxAssignment {
    cost: u32,
    unfilled: u32,
    candidates: Vec<(Pos, Letter)>,
}

impl Heuristic {
    pub fn new(kind: HeuristicKind, layout: &Layout, box_penalty: u32) -> Self {
        debug!("Preprocessing for {} heuristic", kind);
        Heuristic {
            kind,
            dists: DistanceTable::new(layout),
            agent_goals: layout.agent_goals(),
            box_goals: layout.box_goals(),
            has_goal: letters_with_goals(layout),
            box_penalty,
        }
    }

    pub fn kind(&self) -> HeuristicKind {
        self.kind
    }

    pub fn h(&self, state: &State<'_>) -> u32 {
        match self.kind {
            HeuristicKind::GoalCount => self.goal_count(state),
            HeuristicKind::Distance => self.agent_goal_cost(state),
            HeuristicKind::BoxRelocation => self.box_relocation(state),
            HeuristicKind::Combined => self.combined(state),
        }
    }

    fn goal_count(&self, state: &State<'_>) -> u32 {
        let agents = self
            .agent_goals
            .iter()
            .zip(state.agents())
            .filter(|&(goal, &pos)| goal.map_or(false, |goal| goal != pos))
            .count();
        let boxes = self
            .box_goals
            .iter()
            .filter(|&&(pos, letter)| state.box_at(pos) != Some(letter))
            .count();
        (agents + boxes) as u32
    }

    fn agent_goal_cost(&self, state: &State<'_>) -> u32 {
        self.agent_goals
            .iter()
            .zip(state.agents())
            .filter_map(|(goal, &pos)| {
                goal.map(|goal| u32::from(self.dists.get_or_manhattan(pos, goal)))
            })
            .sum()
    }

    fn box_relocation(&self, state: &State<'_>) -> u32 {
        let boxes = match self.box_assignment(state) {
            Some(boxes) => boxes,
            None => return UNSOLVABLE,
        };
        if boxes.unfilled == 0 {
            return 0;
        }

        let agent = state.agents()[0];
        let to_box = boxes
            .candidates
            .iter()
            .map(|&(pos, _)| self.dist_to_box(agent, pos))
            .min()
            .unwrap_or(0);

        boxes
            .cost
            .saturating_add(to_box)
            .saturating_add(self.box_penalty.saturating_mul(boxes.unfilled))
    }

    fn combined(&self, state: &State<'_>) -> u32 {
        let boxes = match self.box_assignment(state) {
            Some(boxes) => boxes,
            None => return UNSOLVABLE,
        };
        let agent_cost = self.agent_goal_cost(state);
        if boxes.unfilled == 0 {
            return agent_cost;
        }

        agent_cost
            .saturating_add(boxes.cost)
            .saturating_add(self.coordination(state, &boxes.candidates))
            .saturating_add(self.box_penalty.saturating_mul(boxes.unfilled))
    }

    /// Distance from the nearest agent able to move a box to that box.
    ///
    /// Agents without goals are preferred since they have nothing else to do.
    fn coordination(&self, state: &State<'_>, candidates: &[(Pos, Letter)]) -> u32 {
        let layout = state.layout();
        let nearest = |with_goal: bool| {
            (0..state.agents().len())
                .filter(|&agent| self.agent_goals[agent].is_some() == with_goal)
                .flat_map(|agent| {
                    let agent_pos = state.agents()[agent];
                    candidates
                        .iter()
                        .filter(move |&&(_, letter)| {
                            layout.box_color(letter) == layout.agent_color(agent)
                        })
                        .map(move |&(box_pos, _)| self.dist_to_box(agent_pos, box_pos))
                })
                .min()
        };
        nearest(false)
            .or_else(|| nearest(true))
            .unwrap_or(NO_AGENT_PENALTY)
    }

    /// The agent only has to get next to the box.
    fn dist_to_box(&self, agent: Pos, box_pos: Pos) -> u32 {
        u32::from(self.dists.get_or_manhattan(agent, box_pos).saturating_sub(1))
    }

    /// Cheapest way to fill all unfilled box goals, `None` if they can't be filled.
    fn box_assignment(&self, state: &State<'_>) -> Option<BoxAssignment> {
        let layout = state.layout();

        let unfilled: Vec<(Pos, Letter)> = self
            .box_goals
            .iter()
            .cloned()
            .filter(|&(pos, letter)| state.box_at(pos) != Some(letter))
            .collect();

        let candidates: Vec<(Pos, Letter)> = misplaced_boxes(state, &self.has_goal)
            .filter(|&(pos, letter)| !deadlock::is_dead(layout, pos, letter))
            .filter(|&(pos, letter)| {
                unfilled.iter().any(|&(goal, goal_letter)| {
                    goal_letter == letter && self.dists.is_reachable(pos, goal)
                })
            })
            .collect();

        let mut missing = [0i32; MAX_LETTERS];
        for &(_, letter) in &unfilled {
            missing[letter.index()] += 1;
        }
        for &(_, letter) in &candidates {
            missing[letter.index()] -= 1;
        }
        if missing.iter().any(|&cnt| cnt > 0) {
            return None;
        }

        let costs: Vec<Vec<Option<u32>>> = candidates
            .iter()
            .map(|&(pos, letter)| {
                unfilled
                    .iter()
                    .map(|&(goal, goal_letter)| {
                        if goal_letter == letter {
                            self.dists.get(pos, goal).map(u32::from)
                        } else {
                            None
                        }
                    })
                    .collect()
            })
            .collect();
        let cost = assignment::assignment_cost(&costs, unfilled.len())?;

        Some(BoxAssignment {
            cost,
            unfilled: unfilled.len() as u32,
            candidates,
        })
    }
}

impl Debug for Heuristic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heuristic")
            .field("kind", &self.kind)
            .field("agent_goals", &self.agent_goals)
            .field("box_goals", &self.box_goals)
            .field("box_penalty", &self.box_penalty)
            .finish()
    }
}

fn letters_with_goals(layout: &Layout) -> [bool; MAX_LETTERS] {
    let mut has_goal = [false; MAX_LETTERS];
    for (_, letter) in layout.box_goals() {
        has_goal[letter.index()] = true;
    }
    has_goal
}

/// Boxes of letters which have goals that are not on a goal of their letter.
fn misplaced_boxes<'s>(
    state: &'s State<'s>,
    has_goal: &'s [bool; MAX_LETTERS],
) -> impl Iterator<Item = (Pos, Letter)> + 's {
    let layout = state.layout();
    state
        .boxes()
        .positions()
        .filter_map(move |pos| state.box_at(pos).map(|letter| (pos, letter)))
        .filter(move |&(pos, letter)| {
            has_goal[letter.index()] && layout.goal(pos) != Goal::Box(letter)
        })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Evaluation {
    AStar,
    WeightedAStar(u32),
    Greedy,
}

impl Display for Evaluation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Evaluation::AStar => write!(f, "A* evaluation"),
            Evaluation::WeightedAStar(w) => write!(f, "WA*({}) evaluation", w),
            Evaluation::Greedy => write!(f, "greedy evaluation"),
        }
    }
}

/// Orders states in a best-first frontier.
#[derive(Debug)]
pub struct Evaluator {
    evaluation: Evaluation,
    heuristic: Heuristic,
}

impl Evaluator {
    pub fn new(evaluation: Evaluation, heuristic: Heuristic) -> Self {
        Evaluator {
            evaluation,
            heuristic,
        }
    }

    pub fn f(&self, state: &State<'_>) -> u64 {
        let g = u64::from(state.g());
        let h = u64::from(self.heuristic.h(state));
        match self.evaluation {
            Evaluation::AStar => g + h,
            Evaluation::WeightedAStar(w) => g + u64::from(w) * h,
            Evaluation::Greedy => h,
        }
    }
}

impl Display for Evaluator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.evaluation)
    }
}
