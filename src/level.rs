use std::fmt::{self, Debug, Display, Formatter};

use crate::data::{Color, Goal, Letter, Pos, MAX_LETTERS};
use crate::state::State;
use crate::vec2d::Vec2d;

/// The static part of a level, shared read-only by all states of one search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    walls: Vec2d<bool>,
    goals: Vec2d<Goal>,
    agent_colors: Vec<Option<Color>>,
    box_colors: [Option<Color>; MAX_LETTERS],
}

impl Layout {
    pub fn new(
        walls: Vec2d<bool>,
        goals: Vec2d<Goal>,
        agent_colors: Vec<Option<Color>>,
        box_colors: [Option<Color>; MAX_LETTERS],
    ) -> Self {
        assert_eq!(walls.rows(), goals.rows());
        assert_eq!(walls.cols(), goals.cols());
        Layout {
            walls,
            goals,
            agent_colors,
            box_colors,
        }
    }

    pub fn walls(&self) -> &Vec2d<bool> {
        &self.walls
    }

    pub fn goals(&self) -> &Vec2d<Goal> {
        &self.goals
    }

    /// Cells outside the grid count as walls.
    pub fn is_wall(&self, pos: Pos) -> bool {
        self.walls.get(pos).cloned().unwrap_or(true)
    }

    pub fn goal(&self, pos: Pos) -> Goal {
        self.goals.get(pos).cloned().unwrap_or(Goal::Empty)
    }

    pub fn agent_count(&self) -> usize {
        self.agent_colors.len()
    }

    pub fn agent_color(&self, agent: usize) -> Option<Color> {
        self.agent_colors[agent]
    }

    pub fn box_color(&self, letter: Letter) -> Option<Color> {
        self.box_colors[letter.index()]
    }

    /// Goal cell of every agent, indexed by agent id.
    pub fn agent_goals(&self) -> Vec<Option<Pos>> {
        let mut ret = vec![None; self.agent_count()];
        for pos in self.goals.positions() {
            if let Goal::Agent(agent) = self.goals[pos] {
                if agent < ret.len() {
                    ret[agent] = Some(pos);
                }
            }
        }
        ret
    }

    /// All box goals in row-major order.
    pub fn box_goals(&self) -> Vec<(Pos, Letter)> {
        self.goals
            .positions()
            .filter_map(|pos| match self.goals[pos] {
                Goal::Box(letter) => Some((pos, letter)),
                _ => None,
            })
            .collect()
    }
}

/// A parsed level: the layout plus the initial positions of agents and boxes.
#[derive(Clone, PartialEq, Eq)]
pub struct Level {
    pub name: String,
    pub layout: Layout,
    pub(crate) agents: Vec<Pos>,
    pub(crate) boxes: Vec2d<Option<Letter>>,
}

impl Level {
    pub fn new(
        name: String,
        layout: Layout,
        agents: Vec<Pos>,
        boxes: Vec2d<Option<Letter>>,
    ) -> Self {
        assert_eq!(agents.len(), layout.agent_count());
        Level {
            name,
            layout,
            agents,
            boxes,
        }
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn initial_state(&self) -> State<'_> {
        State::new(&self.layout, self.agents.clone(), self.boxes.clone())
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.initial_state())
    }
}

impl Debug for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        write!(f, "{}", self)
    }
}

/// Builds a level from the interesting sections only.
#[cfg(test)]
pub(crate) fn test_level(colors: &str, initial: &str, goal: &str) -> Level {
    let text = format!(
        "#domain\nhospital\n#levelname\ntest\n#colors\n{}\n#initial\n{}\n#goal\n{}\n#end\n",
        colors.trim(),
        initial.trim_matches('\n'),
        goal.trim_matches('\n')
    );
    match text.parse() {
        Ok(level) => level,
        Err(err) => panic!("Invalid test level: {}\n{}", err, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goals_of_agents_and_boxes() {
        let level: Level = r"
#domain
hospital
#levelname
goals
#colors
red: 0, 1, A, B
#initial
+++++
+01A+
+B  +
+++++
#goal
+++++
+  1+
+BA0+
+++++
#end
"
        .parse()
        .unwrap();

        let layout = &level.layout;
        assert_eq!(
            layout.agent_goals(),
            vec![Some(Pos::new(2, 3)), Some(Pos::new(1, 3))]
        );
        let letter = |c| Letter::from_char(c).unwrap();
        assert_eq!(
            layout.box_goals(),
            vec![(Pos::new(2, 1), letter('B')), (Pos::new(2, 2), letter('A'))]
        );
        assert!(layout.is_wall(Pos::new(0, 0)));
        assert!(!layout.is_wall(Pos::new(1, 1)));
        assert!(layout.is_wall(Pos::new(9, 9)));
        assert_eq!(layout.goal(Pos::new(9, 9)), Goal::Empty);
        assert_eq!(layout.box_color(letter('B')), Some(Color::Red));
    }
}
