use std::collections::VecDeque;
use std::fmt::{self, Debug, Formatter};

use log::debug;

use crate::data::Pos;
use crate::level::Layout;
use crate::vec2d::Vec2d;

/// Shortest walking distances between all pairs of non-wall cells, ignoring boxes and agents.
#[derive(Clone, PartialEq, Eq)]
pub struct DistanceTable {
    dists: Vec2d<Option<Vec2d<Option<u16>>>>,
}

impl DistanceTable {
    // 16x16 map: 2^8 (src) * 2^8 (dest) * 4 B (size of Option<u16>) = 256 KiB
    // 64x64 map: 64 MiB, larger levels should not use this
    #[inline(never)] // this is called only once and this way it's easier to see in callgrind
    pub fn new(layout: &Layout) -> Self {
        let walls = layout.walls();
        let mut dists = walls.scratchpad_with_default(None);
        let mut sources = 0;

        for src in walls.positions() {
            if walls[src] {
                continue;
            }
            dists[src] = Some(bfs(layout, src));
            sources += 1;
        }

        debug!("Distance table: {} sources", sources);
        DistanceTable { dists }
    }

    /// `None` if either cell is a wall, outside the grid or they're not connected.
    pub fn get(&self, from: Pos, to: Pos) -> Option<u16> {
        match self.dists.get(from) {
            Some(Some(dests)) => dests.get(to).cloned().unwrap_or(None),
            _ => None,
        }
    }

    /// Falls back to Manhattan distance for cells not connected by a path.
    pub fn get_or_manhattan(&self, from: Pos, to: Pos) -> u16 {
        self.get(from, to).unwrap_or_else(|| from.dist(to))
    }

    pub fn is_reachable(&self, from: Pos, to: Pos) -> bool {
        self.get(from, to).is_some()
    }
}

fn bfs(layout: &Layout, src: Pos) -> Vec2d<Option<u16>> {
    let mut dists = layout.walls().scratchpad();
    dists[src] = Some(0);

    let mut to_visit = VecDeque::new();
    to_visit.push_back((src, 0));

    while let Some((cur, cur_dist)) = to_visit.pop_front() {
        for next in cur.neighbors() {
            if layout.is_wall(next) || dists[next].is_some() {
                continue;
            }
            dists[next] = Some(cur_dist + 1);
            to_visit.push_back((next, cur_dist + 1));
        }
    }

    dists
}

impl Debug for DistanceTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for src in self.dists.positions() {
            if let Some(ref dests) = self.dists[src] {
                writeln!(f, "{}:", src)?;
                writeln!(f, "{:?}", dests)?;
            }
        }
        Ok(())
    }
}
