use std::fmt::{self, Debug, Display, Formatter};
use std::time::Duration;

use prettytable::{format, Cell, Row, Table};
use separator::Separatable;

/// Search statistics by depth (`g` of the states).
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Stats {
    generated: Vec<u64>,
    expanded: Vec<u64>,
    duplicates: Vec<u64>,
}

impl Stats {
    pub fn new() -> Self {
        Stats::default()
    }

    pub fn total_generated(&self) -> u64 {
        self.generated.iter().sum()
    }

    pub fn total_expanded(&self) -> u64 {
        self.expanded.iter().sum()
    }

    pub fn total_duplicates(&self) -> u64 {
        self.duplicates.iter().sum()
    }

    /// Deepest depth any state was generated at.
    pub fn max_depth(&self) -> usize {
        self.generated.len().saturating_sub(1)
    }

    /// Added to the frontier.
    pub fn add_generated(&mut self, depth: u32) -> bool {
        Self::add(&mut self.generated, depth)
    }

    pub fn add_expanded(&mut self, depth: u32) -> bool {
        Self::add(&mut self.expanded, depth)
    }

    /// Discarded because it was already explored or in the frontier.
    pub fn add_duplicate(&mut self, depth: u32) -> bool {
        Self::add(&mut self.duplicates, depth)
    }

    /// Returns true when a new depth was reached.
    fn add(counts: &mut Vec<u64>, depth: u32) -> bool {
        let depth = depth as usize;
        let mut ret = false;

        // while because a depth might be skipped if all its states are duplicates
        while depth >= counts.len() {
            counts.push(0);
            ret = true;
        }
        counts[depth] += 1;
        ret
    }

    fn depth_table(&self) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_CLEAN);
        table.set_titles(Row::new(vec![
            Cell::new("Depth"),
            Cell::new("Generated"),
            Cell::new("Expanded"),
            Cell::new("Duplicates"),
        ]));

        let get = |counts: &[u64], depth: usize| counts.get(depth).cloned().unwrap_or(0);
        let depths = self
            .generated
            .len()
            .max(self.expanded.len())
            .max(self.duplicates.len());
        for depth in 0..depths {
            table.add_row(Row::new(vec![
                Cell::new(&depth.to_string()),
                Cell::new(&get(&self.generated, depth).separated_string()),
                Cell::new(&get(&self.expanded, depth).separated_string()),
                Cell::new(&get(&self.duplicates, depth).separated_string()),
            ]));
        }
        table
    }
}

impl Debug for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "generated by depth: {:?}", self.generated)?;
        writeln!(f, "expanded by depth: {:?}", self.expanded)?;
        writeln!(f, "duplicates by depth: {:?}", self.duplicates)?;
        writeln!(f, "total generated: {}", self.total_generated().separated_string())?;
        writeln!(f, "total expanded: {}", self.total_expanded().separated_string())?;
        writeln!(f, "total duplicates: {}", self.total_duplicates().separated_string())
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "States generated total: {}", self.total_generated().separated_string())?;
        writeln!(f, "States expanded total: {}", self.total_expanded().separated_string())?;
        writeln!(f, "Duplicates discarded total: {}", self.total_duplicates().separated_string())?;
        writeln!(f)?;
        write!(f, "{}", self.depth_table())
    }
}

/// Snapshot of a running search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    pub explored: usize,
    pub frontier: usize,
    pub elapsed: Duration,
    pub memory_mb: f64,
    pub max_memory_mb: f64,
}

impl Progress {
    pub fn generated(&self) -> usize {
        self.explored + self.frontier
    }
}

impl Display for Progress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#Expanded: {:>8}, #Frontier: {:>8}, #Generated: {:>8}, Time: {:.3} s [Alloc: {:.2} MB, MaxAlloc: {:.2} MB]",
            self.explored.separated_string(),
            self.frontier.separated_string(),
            self.generated().separated_string(),
            self.elapsed.as_secs_f64(),
            self.memory_mb,
            self.max_memory_mb
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting_by_depth() {
        let mut stats = Stats::new();
        assert!(stats.add_generated(0));
        assert!(stats.add_expanded(0));
        assert!(stats.add_generated(1));
        assert!(!stats.add_generated(1));
        assert!(stats.add_duplicate(3));
        assert!(!stats.add_duplicate(1));

        assert_eq!(stats.total_generated(), 3);
        assert_eq!(stats.total_expanded(), 1);
        assert_eq!(stats.total_duplicates(), 2);
        assert_eq!(stats.max_depth(), 1);
        assert_eq!(
            format!("{:?}", stats).lines().take(3).collect::<Vec<_>>(),
            vec![
                "generated by depth: [1, 2]",
                "expanded by depth: [1]",
                "duplicates by depth: [0, 1, 0, 1]",
            ]
        );
    }

    #[test]
    fn summary() {
        let mut stats = Stats::new();
        for _ in 0..1234 {
            stats.add_generated(2);
        }
        stats.add_expanded(0);

        let text = stats.to_string();
        assert!(text.starts_with("States generated total: 1,234\n"));
        assert!(text.contains("States expanded total: 1\n"));
        assert!(text.contains("Depth"));
        assert!(text.contains("1,234"));
        assert_eq!(stats.depth_table().len(), 3);
    }

    #[test]
    fn summary_with_several_depths() {
        let mut stats = Stats::new();
        stats.add_generated(0);
        stats.add_expanded(0);
        for _ in 0..4 {
            stats.add_generated(1);
        }
        stats.add_expanded(1);
        stats.add_duplicate(1);
        for _ in 0..2500 {
            stats.add_generated(2);
        }
        stats.add_duplicate(2);

        let text = format!("{}", stats);
        let table: Vec<Vec<&str>> = text
            .split("\n\n")
            .nth(1)
            .unwrap()
            .lines()
            .map(|line| line.split_whitespace().collect())
            .collect();
        assert_eq!(
            table,
            vec![
                vec!["Depth", "Generated", "Expanded", "Duplicates"],
                vec!["0", "1", "1", "0"],
                vec!["1", "4", "1", "1"],
                vec!["2", "2,500", "0", "1"],
            ]
        );
    }

    #[test]
    fn progress_line() {
        let progress = Progress {
            explored: 1500,
            frontier: 20,
            elapsed: Duration::from_millis(2500),
            memory_mb: 12.5,
            max_memory_mb: 2048.0,
        };
        assert_eq!(progress.generated(), 1520);
        assert_eq!(
            progress.to_string(),
            "#Expanded:    1,500, #Frontier:       20, #Generated:    1,520, \
             Time: 2.500 s [Alloc: 12.50 MB, MaxAlloc: 2048.00 MB]"
        );
    }
}
