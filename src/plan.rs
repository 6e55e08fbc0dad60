use std::fmt::{self, Debug, Display, Formatter};
use std::ops::Index;

use crate::action::Action;

/// One action per agent, indexed by agent id, executed in the same timestep.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct JointAction(Vec<Action>);

impl JointAction {
    pub fn new(actions: Vec<Action>) -> Self {
        JointAction(actions)
    }

    pub fn noop(agents: usize) -> Self {
        JointAction(vec![Action::NoOp; agents])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> ::std::slice::Iter<'_, Action> {
        self.0.iter()
    }
}

impl Index<usize> for JointAction {
    type Output = Action;

    fn index(&self, agent: usize) -> &Action {
        &self.0[agent]
    }
}

impl<'a> IntoIterator for &'a JointAction {
    type Item = &'a Action;
    type IntoIter = ::std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for JointAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, action) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "|")?;
            }
            write!(f, "{}", action)?;
        }
        Ok(())
    }
}

impl Debug for JointAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Joint actions from the initial state to a goal state, one per timestep.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Plan(Vec<JointAction>);

impl Plan {
    pub(crate) fn new(steps: Vec<JointAction>) -> Self {
        Plan(steps)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> ::std::slice::Iter<'_, JointAction> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<JointAction> {
        self.0
    }
}

impl IntoIterator for Plan {
    type Item = JointAction;
    type IntoIter = ::std::vec::IntoIter<JointAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a JointAction;
    type IntoIter = ::std::slice::Iter<'a, JointAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Plan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for step in self {
            writeln!(f, "{}", step)?;
        }
        Ok(())
    }
}

impl Debug for Plan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
