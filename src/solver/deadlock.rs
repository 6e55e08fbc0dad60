use crate::data::{Dir, Goal, Letter, Pos};
use crate::level::Layout;

/// Whether a box with `letter` at `pos` can never reach a goal of its letter.
///
/// Only looks at walls, so it's a conservative approximation.
/// Boxes which could be pulled out of their position are still reported dead.
pub fn is_dead(layout: &Layout, pos: Pos, letter: Letter) -> bool {
    if layout.goal(pos) == Goal::Box(letter) {
        return false;
    }

    let wall = |dir| pos.step(dir).map_or(true, |next| layout.is_wall(next));
    let vertical = wall(Dir::North) || wall(Dir::South);
    let horizontal = wall(Dir::East) || wall(Dir::West);

    if vertical && horizontal {
        // corner
        return true;
    }

    // against a wall the box can only slide along it
    (vertical && !goal_in_row(layout, pos.r, letter))
        || (horizontal && !goal_in_col(layout, pos.c, letter))
}

fn goal_in_row(layout: &Layout, r: u8, letter: Letter) -> bool {
    (0..layout.goals().cols()).any(|c| layout.goal(Pos::new(r, c)) == Goal::Box(letter))
}

fn goal_in_col(layout: &Layout, c: u8, letter: Letter) -> bool {
    (0..layout.goals().rows()).any(|r| layout.goal(Pos::new(r, c)) == Goal::Box(letter))
}
