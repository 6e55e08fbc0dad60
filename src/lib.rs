// Opt in to warnings about new 2018 idioms
#![warn(rust_2018_idioms)]
// Additional warnings that are allow by default (`rustc -W help`)
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unused)]
// Clippy
#![warn(clippy::all)]

pub mod action;
pub mod config;
pub mod data;
pub mod level;
pub mod memory;
pub mod parser;
pub mod plan;
pub mod solver;
pub mod state;
pub mod vec2d;

mod fs;

use std::error::Error;

use crate::config::Config;
use crate::level::Level;
use crate::solver::{SolverErr, SolverOk};

pub trait LoadLevel {
    fn load_level(&self) -> Result<Level, Box<dyn Error>>;
}

pub trait Solve {
    fn solve(&self, config: &Config) -> Result<SolverOk, SolverErr>;
}
