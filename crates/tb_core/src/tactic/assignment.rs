//! Minimum-cost robot to tactic assignment (Hungarian algorithm)

use pathfinding::kuhn_munkres::kuhn_munkres_min;
use pathfinding::matrix::Matrix;

// Costs are compared as integers in millimetres-equivalent units
const COST_SCALE: f64 = 1000.0;
// Keeps the solver's sums far from overflow
const MAX_COST: i64 = 1_000_000_000;

fn to_assignment_cost(cost: f64) -> i64 {
    if !cost.is_finite() {
        return MAX_COST;
    }
    ((cost * COST_SCALE).round() as i64).clamp(-MAX_COST, MAX_COST)
}

/// Assign robots to tactics so the summed cost is minimal.
///
/// `cost(tactic, robot)` is evaluated once per pair. Tactics earlier in the
/// list take precedence: with more tactics than robots, only the first
/// `num_robots` tactics are staffed. Returns the robot index for each tactic.
pub fn assign_robots<F>(num_tactics: usize, num_robots: usize, cost: F) -> Vec<Option<usize>>
where
    F: Fn(usize, usize) -> f64,
{
    let staffed = num_tactics.min(num_robots);
    let mut assignment = vec![None; num_tactics];
    if staffed == 0 {
        return assignment;
    }

    // Rows must not outnumber columns
    let costs = Matrix::from_fn(staffed, num_robots, |(tactic, robot)| {
        to_assignment_cost(cost(tactic, robot))
    });
    let (_, robot_for_tactic) = kuhn_munkres_min(&costs);

    for (tactic, robot) in robot_for_tactic.into_iter().enumerate() {
        assignment[tactic] = Some(robot);
    }
    assignment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picks_minimum_total_cost() {
        // Greedy (tactic 0 takes robot 0) would cost 1 + 10
        let costs = [[1.0, 2.0], [3.0, 10.0]];
        let assignment = assign_robots(2, 2, |t, r| costs[t][r]);
        assert_eq!(assignment, vec![Some(1), Some(0)]);
    }

    #[test]
    fn test_extra_tactics_are_unstaffed() {
        let assignment = assign_robots(3, 2, |t, r| (t + r) as f64);
        assert_eq!(assignment.len(), 3);
        assert!(assignment[0].is_some());
        assert!(assignment[1].is_some());
        assert_eq!(assignment[2], None);
    }

    #[test]
    fn test_extra_robots_are_left_over() {
        let positions = [0.0, 5.0, 10.0];
        let assignment = assign_robots(1, 3, |_, r| (positions[r] - 9.0_f64).abs());
        assert_eq!(assignment, vec![Some(2)]);
    }

    #[test]
    fn test_non_finite_costs_are_avoided() {
        let assignment = assign_robots(1, 2, |_, r| if r == 0 { f64::INFINITY } else { 100.0 });
        assert_eq!(assignment, vec![Some(1)]);
    }

    #[test]
    fn test_no_robots() {
        assert_eq!(assign_robots(2, 0, |_, _| 0.0), vec![None, None]);
    }
}
