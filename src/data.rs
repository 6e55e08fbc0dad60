use std::fmt::{self, Debug, Display, Formatter};

/// Rows and columns are stored in `u8`.
pub const MAX_SIZE: usize = 255;
/// Agents are named by a single digit.
pub const MAX_AGENTS: usize = 10;
/// Boxes are named by a single uppercase letter.
pub const MAX_LETTERS: usize = 26;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub r: u8,
    pub c: u8,
}

impl Pos {
    pub fn new(r: u8, c: u8) -> Pos {
        Pos { r, c }
    }

    pub fn dist(self, other: Pos) -> u16 {
        let dr = (i16::from(self.r) - i16::from(other.r)).abs();
        let dc = (i16::from(self.c) - i16::from(other.c)).abs();
        (dr + dc) as u16
    }

    /// The neighboring cell in `dir` or `None` if it would have a negative
    /// (or larger than representable) coordinate.
    ///
    /// The upper bound of the grid is not checked here, `Vec2d::get` does that.
    pub fn step(self, dir: Dir) -> Option<Pos> {
        let (dr, dc) = dir.delta();
        self.offset(dr, dc)
    }

    pub fn offset(self, dr: i8, dc: i8) -> Option<Pos> {
        let r = checked_add(self.r, dr)?;
        let c = checked_add(self.c, dc)?;
        Some(Pos::new(r, c))
    }

    pub fn neighbors(self) -> impl Iterator<Item = Pos> {
        DIRECTIONS.iter().filter_map(move |&dir| self.step(dir))
    }
}

fn checked_add(x: u8, d: i8) -> Option<u8> {
    if d >= 0 {
        x.checked_add(d as u8)
    } else {
        x.checked_sub(d.unsigned_abs())
    }
}

impl Display for Pos {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.r, self.c)
    }
}

impl Debug for Pos {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    North,
    East,
    South,
    West,
}

pub const DIRECTIONS: [Dir; 4] = [Dir::North, Dir::East, Dir::South, Dir::West];

impl Dir {
    /// Row and column displacement. Row 0 is at the top so north is `-1`.
    pub fn delta(self) -> (i8, i8) {
        match self {
            Dir::North => (-1, 0),
            Dir::East => (0, 1),
            Dir::South => (1, 0),
            Dir::West => (0, -1),
        }
    }

    pub fn inverse(self) -> Dir {
        match self {
            Dir::North => Dir::South,
            Dir::East => Dir::West,
            Dir::South => Dir::North,
            Dir::West => Dir::East,
        }
    }
}

impl Display for Dir {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let c = match *self {
            Dir::North => 'N',
            Dir::East => 'E',
            Dir::South => 'S',
            Dir::West => 'W',
        };
        write!(f, "{}", c)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Blue,
    Red,
    Cyan,
    Purple,
    Green,
    Orange,
    Pink,
    Grey,
    Lightblue,
    Brown,
}

impl Color {
    pub fn from_name(name: &str) -> Option<Color> {
        let color = match name.trim().to_lowercase().as_str() {
            "blue" => Color::Blue,
            "red" => Color::Red,
            "cyan" => Color::Cyan,
            "purple" => Color::Purple,
            "green" => Color::Green,
            "orange" => Color::Orange,
            "pink" => Color::Pink,
            "grey" => Color::Grey,
            "lightblue" => Color::Lightblue,
            "brown" => Color::Brown,
            _ => return None,
        };
        Some(color)
    }
}

/// Box type `A` to `Z`, stored as an index `0..26`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Letter(u8);

impl Letter {
    pub fn from_char(c: char) -> Option<Letter> {
        if c.is_ascii_uppercase() {
            Some(Letter(c as u8 - b'A'))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    pub fn to_char(self) -> char {
        char::from(b'A' + self.0)
    }
}

impl Display for Letter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl Debug for Letter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Contents of a cell of the goal grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Goal {
    Empty,
    Box(Letter),
    Agent(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stepping_stays_non_negative() {
        let corner = Pos::new(0, 0);
        assert_eq!(corner.step(Dir::North), None);
        assert_eq!(corner.step(Dir::West), None);
        assert_eq!(corner.step(Dir::South), Some(Pos::new(1, 0)));
        assert_eq!(corner.step(Dir::East), Some(Pos::new(0, 1)));
        assert_eq!(corner.neighbors().count(), 2);
        assert_eq!(Pos::new(255, 255).step(Dir::South), None);
    }

    #[test]
    fn manhattan() {
        assert_eq!(Pos::new(0, 0).dist(Pos::new(2, 2)), 4);
        assert_eq!(Pos::new(3, 1).dist(Pos::new(1, 4)), 5);
    }

    #[test]
    fn letters_and_colors() {
        assert_eq!(Letter::from_char('C').map(Letter::index), Some(2));
        assert_eq!(Letter::from_char('z'), None);
        assert_eq!(Letter::from_char('Z').unwrap().to_char(), 'Z');
        assert_eq!(Color::from_name(" LightBlue "), Some(Color::Lightblue));
        assert_eq!(Color::from_name("magenta"), None);
    }
}
