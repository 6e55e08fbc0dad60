//! Matching boxes to goals of their letter.
//!
//! Costs are given as a matrix `costs[box][goal]` where `None` means the box can't be used
//! for that goal (different letter or no path). Every goal has to be covered by a distinct box,
//! extra boxes may stay unassigned.

use log::trace;

/// Up to this many boxes the assignment is solved exactly.
pub const EXACT_LIMIT: usize = 6;

/// Minimal total cost of covering all `goal_cnt` goals, `None` if it's impossible.
///
/// Exact for small instances, greedy otherwise.
pub fn assignment_cost(costs: &[Vec<Option<u32>>], goal_cnt: usize) -> Option<u32> {
    if costs.len() <= EXACT_LIMIT {
        exact(costs, goal_cnt)
    } else {
        greedy(costs, goal_cnt)
    }
}

/// DP over (boxes processed, mask of covered goals), a box can also be skipped.
pub(crate) fn exact(costs: &[Vec<Option<u32>>], goal_cnt: usize) -> Option<u32> {
    if goal_cnt > costs.len() {
        return None;
    }

    let full = (1usize << goal_cnt) - 1;
    let mut cur: Vec<Option<u32>> = vec![None; full + 1];
    cur[0] = Some(0);

    for box_costs in costs {
        let mut next = cur.clone();
        for (mask, &maybe_cost) in cur.iter().enumerate() {
            let cost = match maybe_cost {
                Some(cost) => cost,
                None => continue,
            };
            for (goal, &goal_cost) in box_costs.iter().enumerate().take(goal_cnt) {
                let bit = 1 << goal;
                if mask & bit != 0 {
                    continue;
                }
                if let Some(goal_cost) = goal_cost {
                    let new_cost = cost + goal_cost;
                    let entry = &mut next[mask | bit];
                    if entry.map_or(true, |old| new_cost < old) {
                        *entry = Some(new_cost);
                    }
                }
            }
        }
        cur = next;
    }

    cur[full]
}

/// Each box in order claims the nearest unclaimed goal.
///
/// Goals nobody claimed are charged the distance of their nearest box regardless of claims,
/// so a bad order never makes a solvable assignment impossible.
pub(crate) fn greedy(costs: &[Vec<Option<u32>>], goal_cnt: usize) -> Option<u32> {
    let mut claimed = vec![false; goal_cnt];
    let mut total = 0;

    for box_costs in costs {
        let best = box_costs
            .iter()
            .take(goal_cnt)
            .enumerate()
            .filter(|&(goal, _)| !claimed[goal])
            .filter_map(|(goal, &cost)| cost.map(|cost| (cost, goal)))
            .min();
        if let Some((cost, goal)) = best {
            claimed[goal] = true;
            total += cost;
        }
    }

    for goal in 0..goal_cnt {
        if claimed[goal] {
            continue;
        }
        let nearest = costs.iter().filter_map(|box_costs| box_costs[goal]).min()?;
        trace!("Goal {} left unclaimed, charging {}", goal, nearest);
        total += nearest;
    }

    Some(total)
}
