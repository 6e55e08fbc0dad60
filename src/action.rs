use std::fmt::{self, Debug, Display, Formatter};

use crate::data::Dir::{self, *};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    NoOp,
    Move,
    Push,
    Pull,
}

/// A single agent's action during one timestep.
///
/// For `Push` and `Pull` the box moves in the same direction as the agent:
/// a push moves the box in front of the agent one cell further,
/// a pull drags the box behind the agent into the cell the agent leaves.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    NoOp,
    Move(Dir),
    Push(Dir),
    Pull(Dir),
}

pub const ACTIONS: [Action; 13] = [
    Action::NoOp,
    Action::Move(North),
    Action::Move(South),
    Action::Move(East),
    Action::Move(West),
    Action::Push(North),
    Action::Push(South),
    Action::Push(East),
    Action::Push(West),
    Action::Pull(North),
    Action::Pull(South),
    Action::Pull(East),
    Action::Pull(West),
];

impl Action {
    pub fn kind(self) -> ActionKind {
        match self {
            Action::NoOp => ActionKind::NoOp,
            Action::Move(_) => ActionKind::Move,
            Action::Push(_) => ActionKind::Push,
            Action::Pull(_) => ActionKind::Pull,
        }
    }

    pub fn agent_dir(self) -> Option<Dir> {
        match self {
            Action::NoOp => None,
            Action::Move(dir) | Action::Push(dir) | Action::Pull(dir) => Some(dir),
        }
    }

    pub fn agent_delta(self) -> (i8, i8) {
        self.agent_dir().map_or((0, 0), Dir::delta)
    }

    pub fn box_delta(self) -> (i8, i8) {
        match self {
            Action::Push(dir) | Action::Pull(dir) => dir.delta(),
            Action::NoOp | Action::Move(_) => (0, 0),
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Action::NoOp => write!(f, "NoOp"),
            Action::Move(dir) => write!(f, "Move({})", dir),
            Action::Push(dir) => write!(f, "Push({},{})", dir, dir),
            Action::Pull(dir) => write!(f, "Pull({},{})", dir, dir),
        }
    }
}

impl Debug for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
