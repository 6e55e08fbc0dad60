use log::debug;

use crate::fs;

const PAGE_SIZE: f64 = 4096.0;
const MB: f64 = 1024.0 * 1024.0;

/// Samples how much memory the process uses.
///
/// The search only asks between iterations so the ceiling is soft.
pub trait MemoryProbe {
    fn used_mb(&self) -> f64;
}

/// Resident set size of the current process.
///
/// Reads `/proc/self/statm`, reports 0 on platforms without it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessMemory;

impl MemoryProbe for ProcessMemory {
    fn used_mb(&self) -> f64 {
        match fs::read_file("/proc/self/statm") {
            Ok(statm) => parse_statm(&statm).unwrap_or(0.0),
            Err(err) => {
                debug!("Can't sample memory: {}", err);
                0.0
            }
        }
    }
}

/// Second field is the number of resident pages.
fn parse_statm(statm: &str) -> Option<f64> {
    let pages: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;
    Some(pages as f64 * PAGE_SIZE / MB)
}
