use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::data::{Color, Goal, Letter, Pos, MAX_AGENTS, MAX_LETTERS, MAX_SIZE};
use crate::level::{Layout, Level};
use crate::vec2d::Vec2d;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserErr {
    MissingSection(&'static str),
    UnknownColor(String),
    Pos(usize, usize),
    TooLarge,
    NoAgents,
    AgentNumbering,
    UncoloredAgent(usize),
}

impl Display for ParserErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            ParserErr::MissingSection(name) => write!(f, "Missing section {}", name),
            ParserErr::UnknownColor(ref color) => write!(f, "Unknown color: {}", color),
            ParserErr::Pos(r, c) => write!(f, "Invalid cell at pos: [{}, {}]", r, c),
            ParserErr::TooLarge => write!(f, "Map larger than 255 rows/columns"),
            ParserErr::NoAgents => write!(f, "No agents"),
            ParserErr::AgentNumbering => write!(f, "Agents must be numbered from 0 without gaps"),
            ParserErr::UncoloredAgent(agent) => write!(f, "Agent {} has no color", agent),
        }
    }
}

impl Error for ParserErr {}

impl FromStr for Level {
    type Err = ParserErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Parses a level in the hospital domain format:
///
/// ```text
/// #domain
/// hospital
/// #levelname
/// <name>
/// #colors
/// <color>: <agent or box>, ...
/// #initial
/// <rows>
/// #goal
/// <rows>
/// #end
/// ```
pub fn parse(level: &str) -> Result<Level, ParserErr> {
    // trim so we can specify levels using raw strings more easily
    let lines: Vec<&str> = level.trim_start().lines().collect();

    let name = section(&lines, "#levelname")?
        .first()
        .map(|line| line.trim().to_string())
        .unwrap_or_default();
    let (agent_colors, box_colors) = parse_colors(section(&lines, "#colors")?)?;
    let initial = section(&lines, "#initial")?;
    let goal = section(&lines, "#goal")?;

    let rows = initial.len();
    let cols = initial
        .iter()
        .chain(goal.iter())
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    if rows > MAX_SIZE || goal.len() > MAX_SIZE || cols > MAX_SIZE {
        return Err(ParserErr::TooLarge);
    }

    let mut walls = vec![vec![false; cols]; rows];
    let mut boxes = vec![vec![None; cols]; rows];
    let mut agents = [None; MAX_AGENTS];
    for (r, line) in initial.iter().enumerate() {
        for (c, cur_char) in line.chars().enumerate() {
            let pos = Pos::new(r as u8, c as u8);
            match cur_char {
                '+' => walls[r][c] = true,
                '0'..='9' => agents[digit(cur_char)] = Some(pos),
                'A'..='Z' => boxes[r][c] = Letter::from_char(cur_char),
                ' ' => {}
                _ => return Err(ParserErr::Pos(r, c)),
            }
        }
    }

    let agent_cnt = agents.iter().take_while(|a| a.is_some()).count();
    if agent_cnt == 0 {
        return Err(ParserErr::NoAgents);
    }
    if agents[agent_cnt..].iter().any(Option::is_some) {
        return Err(ParserErr::AgentNumbering);
    }
    let agents: Vec<Pos> = agents.iter().filter_map(|&a| a).collect();
    let agent_colors = agent_colors[..agent_cnt].to_vec();
    if let Some(agent) = agent_colors.iter().position(Option::is_none) {
        return Err(ParserErr::UncoloredAgent(agent));
    }

    let mut goals = vec![vec![Goal::Empty; cols]; rows];
    for (r, line) in goal.iter().enumerate().take(rows) {
        for (c, cur_char) in line.chars().enumerate() {
            goals[r][c] = match cur_char {
                '0'..='9' => Goal::Agent(digit(cur_char)),
                'A'..='Z' => match Letter::from_char(cur_char) {
                    Some(letter) => Goal::Box(letter),
                    None => unreachable!("Checked by the pattern"),
                },
                '+' | ' ' => Goal::Empty,
                _ => return Err(ParserErr::Pos(r, c)),
            };
        }
    }

    let layout = Layout::new(
        Vec2d::new(&walls, true),
        Vec2d::new(&goals, Goal::Empty),
        agent_colors,
        box_colors,
    );
    Ok(Level::new(name, layout, agents, Vec2d::new(&boxes, None)))
}

type Colors = ([Option<Color>; MAX_AGENTS], [Option<Color>; MAX_LETTERS]);

fn parse_colors(lines: &[&str]) -> Result<Colors, ParserErr> {
    let mut agent_colors = [None; MAX_AGENTS];
    let mut box_colors = [None; MAX_LETTERS];

    for line in lines {
        let mut split = line.splitn(2, ':');
        let (name, entities) = match (split.next(), split.next()) {
            (Some(name), Some(entities)) => (name, entities),
            _ => continue,
        };
        let color =
            Color::from_name(name).ok_or_else(|| ParserErr::UnknownColor(name.trim().to_string()))?;
        for entity in entities.split(',').map(str::trim) {
            let mut chars = entity.chars();
            match (chars.next(), chars.next()) {
                (Some(c @ '0'..='9'), None) => agent_colors[digit(c)] = Some(color),
                (Some(c @ 'A'..='Z'), None) => {
                    if let Some(letter) = Letter::from_char(c) {
                        box_colors[letter.index()] = Some(color);
                    }
                }
                _ => {}
            }
        }
    }

    Ok((agent_colors, box_colors))
}

/// Lines between `header` and the next line starting with `#`.
fn section<'a>(lines: &'a [&'a str], header: &'static str) -> Result<&'a [&'a str], ParserErr> {
    let start = lines
        .iter()
        .position(|line| line.trim_end() == header)
        .ok_or(ParserErr::MissingSection(header))?
        + 1;
    let len = lines[start..]
        .iter()
        .position(|line| line.starts_with('#'))
        .unwrap_or(lines.len() - start);
    Ok(&lines[start..start + len])
}

fn digit(c: char) -> usize {
    (c as u8 - b'0') as usize
}
