use std::cell::OnceCell;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::ptr;

use fnv::FnvHasher;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::action::{Action, ActionKind, ACTIONS};
use crate::data::{Goal, Letter, Pos};
use crate::level::Layout;
use crate::plan::{JointAction, Plan};
use crate::vec2d::Vec2d;

/// One search node.
///
/// States are immutable once created. All states of one search reference the same `Layout`
/// and their parents live in the same arena so following `parent` never dangles.
pub struct State<'a> {
    layout: &'a Layout,
    agents: Vec<Pos>,
    boxes: Vec2d<Option<Letter>>,
    parent: Option<&'a State<'a>>,
    action: Option<JointAction>,
    g: u32,
    hash: OnceCell<u64>,
}

impl<'a> State<'a> {
    /// Creates a root state with no parent.
    pub fn new(layout: &'a Layout, agents: Vec<Pos>, boxes: Vec2d<Option<Letter>>) -> Self {
        assert_eq!(agents.len(), layout.agent_count());
        State {
            layout,
            agents,
            boxes,
            parent: None,
            action: None,
            g: 0,
            hash: OnceCell::new(),
        }
    }

    pub fn layout(&self) -> &'a Layout {
        self.layout
    }

    pub fn agents(&self) -> &[Pos] {
        &self.agents
    }

    pub fn boxes(&self) -> &Vec2d<Option<Letter>> {
        &self.boxes
    }

    pub fn box_at(&self, pos: Pos) -> Option<Letter> {
        self.boxes.get(pos).cloned().unwrap_or(None)
    }

    pub fn agent_at(&self, pos: Pos) -> Option<usize> {
        self.agents.iter().position(|&agent_pos| agent_pos == pos)
    }

    /// Path cost from the root.
    pub fn g(&self) -> u32 {
        self.g
    }

    pub fn parent(&self) -> Option<&'a State<'a>> {
        self.parent
    }

    /// The joint action which produced this state, `None` for the root.
    pub fn action(&self) -> Option<&JointAction> {
        self.action.as_ref()
    }

    /// No wall, box or agent.
    pub fn is_free(&self, pos: Pos) -> bool {
        !self.layout.is_wall(pos) && self.box_at(pos).is_none() && self.agent_at(pos).is_none()
    }

    pub fn is_applicable(&self, agent: usize, action: Action) -> bool {
        let agent_pos = self.agents[agent];
        let (adr, adc) = action.agent_delta();
        let (bdr, bdc) = action.box_delta();
        let free = |pos: Option<Pos>| pos.map_or(false, |pos| self.is_free(pos));
        let movable = |pos: Option<Pos>| pos.map_or(false, |pos| self.movable_box(agent, pos));

        match action.kind() {
            ActionKind::NoOp => true,
            ActionKind::Move => free(agent_pos.offset(adr, adc)),
            ActionKind::Push => {
                let box_pos = agent_pos.offset(adr, adc);
                movable(box_pos) && free(box_pos.and_then(|pos| pos.offset(bdr, bdc)))
            }
            ActionKind::Pull => {
                free(agent_pos.offset(adr, adc)) && movable(agent_pos.offset(-bdr, -bdc))
            }
        }
    }

    /// There's a box at `pos` with the same color as `agent`.
    fn movable_box(&self, agent: usize, pos: Pos) -> bool {
        match self.box_at(pos) {
            Some(letter) => self.layout.box_color(letter) == self.layout.agent_color(agent),
            None => false,
        }
    }

    /// Only detects two agents ending up in the same cell.
    ///
    /// Two boxes moved into the same cell or an agent and a box swapping places
    /// are not detected.
    pub fn is_conflicting(&self, joint_action: &JointAction) -> bool {
        let destinations: Vec<Option<Pos>> = joint_action
            .iter()
            .enumerate()
            .map(|(agent, &action)| match action {
                Action::NoOp => None,
                _ => {
                    let (dr, dc) = action.agent_delta();
                    self.agents[agent].offset(dr, dc)
                }
            })
            .collect();

        for (a1, dest1) in destinations.iter().enumerate() {
            if dest1.is_none() {
                continue;
            }
            for dest2 in &destinations[a1 + 1..] {
                if dest2.is_some() && dest1 == dest2 {
                    return true;
                }
            }
        }
        false
    }

    /// Applies `joint_action` to a copy of this state.
    ///
    /// The joint action must be applicable and non-conflicting.
    pub fn result(&'a self, joint_action: JointAction) -> State<'a> {
        debug_assert_eq!(joint_action.len(), self.agents.len());
        debug_assert!(!self.is_conflicting(&joint_action));

        let mut agents = self.agents.clone();
        let mut boxes = self.boxes.clone();

        for (agent, &action) in joint_action.iter().enumerate() {
            debug_assert!(
                self.is_applicable(agent, action),
                "{} is not applicable for agent {}",
                action,
                agent
            );

            let agent_pos = self.agents[agent];
            let agent_delta = action.agent_delta();
            let box_delta = action.box_delta();
            match action.kind() {
                ActionKind::NoOp => {}
                ActionKind::Move => agents[agent] = shift(agent_pos, agent_delta),
                ActionKind::Push => {
                    let box_pos = shift(agent_pos, agent_delta);
                    let letter = boxes[box_pos].take();
                    boxes[shift(box_pos, box_delta)] = letter;
                    agents[agent] = box_pos;
                }
                ActionKind::Pull => {
                    let box_pos = shift(agent_pos, (-box_delta.0, -box_delta.1));
                    let letter = boxes[box_pos].take();
                    boxes[agent_pos] = letter;
                    agents[agent] = shift(agent_pos, agent_delta);
                }
            }
        }

        State {
            layout: self.layout,
            agents,
            boxes,
            parent: Some(self),
            action: Some(joint_action),
            g: self.g + 1,
            hash: OnceCell::new(),
        }
    }

    /// All children reachable by one non-conflicting joint action, shuffled by `rng`.
    pub fn expand<R: Rng + ?Sized>(&'a self, rng: &mut R) -> Vec<State<'a>> {
        let agent_cnt = self.agents.len();

        let applicable: Vec<Vec<Action>> = (0..agent_cnt)
            .map(|agent| {
                ACTIONS
                    .iter()
                    .cloned()
                    .filter(|&action| self.is_applicable(agent, action))
                    .collect()
            })
            .collect();

        // NoOp is always applicable so no list is empty
        let mut choices = vec![0; agent_cnt];
        let mut children = Vec::new();
        'permutations: loop {
            let joint_action = JointAction::new(
                choices
                    .iter()
                    .enumerate()
                    .map(|(agent, &choice)| applicable[agent][choice])
                    .collect(),
            );
            if !self.is_conflicting(&joint_action) {
                children.push(self.result(joint_action));
            }

            for agent in 0..agent_cnt {
                if choices[agent] + 1 < applicable[agent].len() {
                    choices[agent] += 1;
                    continue 'permutations;
                }
                choices[agent] = 0;
            }
            break;
        }

        children.shuffle(rng);
        children
    }

    pub fn is_goal_state(&self) -> bool {
        let goals = self.layout.goals();
        goals.positions().all(|pos| match goals[pos] {
            Goal::Empty => true,
            Goal::Box(letter) => self.boxes[pos] == Some(letter),
            Goal::Agent(agent) => self.agents.get(agent) == Some(&pos),
        })
    }

    /// Joint actions from the root to this state.
    pub fn extract_plan(&self) -> Plan {
        let mut steps = Vec::with_capacity(self.g as usize);
        let mut cur = Some(self);
        while let Some(state) = cur {
            if let Some(ref action) = state.action {
                steps.push(action.clone());
            }
            cur = state.parent;
        }
        steps.reverse();
        Plan::new(steps)
    }

    /// Hash of agent positions and boxes, computed once on first use.
    pub fn identity_hash(&self) -> u64 {
        *self.hash.get_or_init(|| {
            let mut hasher = FnvHasher::default();
            self.agents.hash(&mut hasher);
            self.boxes.hash(&mut hasher);
            hasher.finish()
        })
    }
}

fn shift(pos: Pos, (dr, dc): (i8, i8)) -> Pos {
    pos.offset(dr, dc).expect("Applicable actions stay inside the grid")
}

impl PartialEq for State<'_> {
    fn eq(&self, other: &Self) -> bool {
        // the layout is the same for the whole search so it's not compared
        debug_assert!(ptr::eq(self.layout, other.layout));
        self.agents == other.agents && self.boxes == other.boxes
    }
}

impl Eq for State<'_> {}

impl Hash for State<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.identity_hash());
    }
}

impl Display for State<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let walls = self.layout.walls();
        for r in 0..walls.rows() {
            for c in 0..walls.cols() {
                let pos = Pos::new(r, c);
                if walls[pos] {
                    write!(f, "+")?;
                } else if let Some(letter) = self.boxes[pos] {
                    write!(f, "{}", letter)?;
                } else if let Some(agent) = self.agent_at(pos) {
                    write!(f, "{}", agent)?;
                } else {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Debug for State<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "g: {}", self.g)?;
        write!(f, "{}", self)
    }
}
