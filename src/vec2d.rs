use std::fmt::{self, Debug, Display, Formatter};
use std::ops::{Index, IndexMut};

use crate::data::Pos;

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Vec2d<T> {
    data: Vec<T>,
    rows: u8,
    cols: u8,
}

impl<T> Vec2d<T> {
    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.r < self.rows && pos.c < self.cols
    }

    /// Bounds-checked access, `None` means the position is outside the grid.
    pub fn get(&self, pos: Pos) -> Option<&T> {
        if self.contains(pos) {
            Some(&self[pos])
        } else {
            None
        }
    }

    pub fn positions(&self) -> Positions {
        Positions {
            rows: self.rows,
            cols: self.cols,
            next: 0,
        }
    }

    pub fn scratchpad<U: Default + Clone>(&self) -> Vec2d<U> {
        self.scratchpad_with_default(U::default())
    }

    pub fn scratchpad_with_default<U: Clone>(&self, default: U) -> Vec2d<U> {
        Vec2d {
            data: vec![default; self.data.len()],
            rows: self.rows,
            cols: self.cols,
        }
    }

    fn index_of(&self, pos: Pos) -> usize {
        usize::from(pos.r) * usize::from(self.cols) + usize::from(pos.c)
    }
}

impl<T: Clone> Vec2d<T> {
    /// Pads all rows to the length of the longest one.
    pub fn new(grid: &[Vec<T>], pad: T) -> Self {
        assert!(grid.len() <= usize::from(u8::max_value()));

        let max_cols = grid.iter().map(Vec::len).max().unwrap_or(0);
        assert!(max_cols <= usize::from(u8::max_value()));

        let mut data = Vec::with_capacity(grid.len() * max_cols);
        for row in grid {
            data.extend_from_slice(row);
            for _ in row.len()..max_cols {
                data.push(pad.clone());
            }
        }
        Vec2d {
            data,
            rows: grid.len() as u8,
            cols: max_cols as u8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Positions {
    rows: u8,
    cols: u8,
    next: usize,
}

impl Iterator for Positions {
    type Item = Pos;

    fn next(&mut self) -> Option<Pos> {
        let cols = usize::from(self.cols);
        if cols == 0 || self.next >= usize::from(self.rows) * cols {
            return None;
        }
        let pos = Pos::new((self.next / cols) as u8, (self.next % cols) as u8);
        self.next += 1;
        Some(pos)
    }
}

impl Display for Vec2d<bool> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.cols == 0 {
            return Ok(());
        }
        for row in self.data.chunks(self.cols.into()) {
            for &cell in row {
                write!(f, "{}", if cell { 1 } else { 0 })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<T: Debug> Debug for Vec2d<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.cols == 0 {
            return Ok(());
        }
        // pad to the longest cell so columns line up
        let cells: Vec<_> = self.data.iter().map(|cell| format!("{:?}", cell)).collect();
        let width = cells.iter().map(String::len).max().unwrap_or(0);
        for row in cells.chunks(self.cols.into()) {
            for cell in row {
                write!(f, "{:>width$} ", cell, width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<T> Index<Pos> for Vec2d<T> {
    type Output = T;

    fn index(&self, index: Pos) -> &Self::Output {
        let index = self.index_of(index);
        &self.data[index]
    }
}

impl<T> IndexMut<Pos> for Vec2d<T> {
    fn index_mut(&mut self, index: Pos) -> &mut Self::Output {
        let index = self.index_of(index);
        &mut self.data[index]
    }
}
