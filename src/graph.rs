use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::env::{Direction, Vec2D};
use crate::game::{Game, Grid};

/// Health lost by entering a regular cell.
pub const BASE_COST: u32 = 1;
/// Entering an occupied enemy cell. There is a small chance the enemy dies
/// before the move resolves, so this is worse than any real path but better
/// than a wall.
pub const UNLIKELY: u32 = 1_000_000;

const NO_EDGE: u32 = u32::MAX;

/// Directed edge weights over all board cells, indexed by cell key and
/// outgoing direction.
#[derive(Clone)]
struct EdgeTable {
    edges: Vec<[u32; 4]>,
}

impl EdgeTable {
    fn new(grid: &Grid, base: u32) -> EdgeTable {
        let mut edges = vec![[NO_EDGE; 4]; grid.width * grid.height];
        for key in 0..edges.len() {
            let p = grid.coord_of(key);
            for d in Direction::iter() {
                if grid.step(p, d).is_some() {
                    edges[key][d as usize] = base;
                }
            }
        }
        EdgeTable { edges }
    }

    /// Reweights every edge that enters `target`. Outgoing edges stay
    /// untouched so paths can still leave a cell that frees up later.
    fn set_incoming(&mut self, grid: &Grid, target: Vec2D, weight: u32) {
        for d in Direction::iter() {
            if let Some(from) = grid.step(target, d) {
                let edge = &mut self.edges[grid.key_of(from)][d.invert() as usize];
                if *edge != NO_EDGE {
                    *edge = weight;
                }
            }
        }
    }

    /// Removes every edge that enters `target`.
    fn clear_incoming(&mut self, grid: &Grid, target: Vec2D) {
        for d in Direction::iter() {
            if let Some(from) = grid.step(target, d) {
                self.edges[grid.key_of(from)][d.invert() as usize] = NO_EDGE;
            }
        }
    }

    fn weight(&self, grid: &Grid, from: Vec2D, to: Vec2D) -> Option<u32> {
        let d = grid.direction_to(from, to)?;
        let w = self.edges[grid.key_of(from)][d as usize];
        (w != NO_EDGE).then_some(w)
    }
}

/// The weighted traversal graphs of a single turn.
///
/// Two parallel edge tables are kept: a *cost* table whose weights model
/// health loss (hazard damage, free food cells, near-certain collisions)
/// and a *distance* table with unit weights for turn counting. Both are
/// rebuilt from scratch every turn.
pub struct GridGraph {
    grid: Grid,
    cost: EdgeTable,
    dist: EdgeTable,
}

impl GridGraph {
    /// Builds both graphs from the turn snapshot. Pure function of the
    /// snapshot, nothing is reused across turns.
    pub fn build(game: &Game) -> GridGraph {
        let grid = &game.grid;
        let mut cost = EdgeTable::new(grid, BASE_COST);
        let dist = EdgeTable::new(grid, 1);

        // Hazard damage is paid on entry; food entry is free since eating
        // restores all health. Neither affects turn counting.
        for key in 0..grid.width * grid.height {
            let p = grid.coord_of(key);
            let cell = grid[p];
            if cell.hazard {
                cost.set_incoming(grid, p, BASE_COST + game.hazard_damage as u32);
            }
            if cell.food {
                cost.set_incoming(grid, p, 0);
            }
        }

        let mut graph = GridGraph {
            grid: grid.clone(),
            cost,
            dist,
        };

        for snake in game.snakes.iter().filter(|s| s.alive()) {
            if game.doomed(snake) {
                continue;
            }
            for (p, _) in game.blocking_segments(snake) {
                if snake.id == 0 {
                    // Self collisions are fatal, no edge at all.
                    graph.cost.clear_incoming(grid, p);
                    graph.dist.clear_incoming(grid, p);
                } else {
                    let w = UNLIKELY + snake.health as u32;
                    graph.cost.set_incoming(grid, p, w);
                    graph.dist.set_incoming(grid, p, w);
                }
            }
        }
        graph
    }

    /// Fewest-turns path over the distance graph.
    pub fn shortest_path(&self, start: Vec2D, goal: Vec2D) -> Option<Vec<Vec2D>> {
        self.dijkstra(&self.dist, start, goal)
    }

    /// Least-health-loss path over the cost graph.
    pub fn healthiest_path(&self, start: Vec2D, goal: Vec2D) -> Option<Vec<Vec2D>> {
        self.dijkstra(&self.cost, start, goal)
    }

    /// Health lost along a path, summing the cost graph's edge weights.
    pub fn health_cost(&self, path: &[Vec2D]) -> u64 {
        path.windows(2)
            .map(|w| {
                self.cost
                    .weight(&self.grid, w[0], w[1])
                    .unwrap_or(NO_EDGE) as u64
            })
            .sum()
    }

    /// Turn count between two cells, the oracle used by the move heuristics.
    pub fn distance(&self, a: Vec2D, b: Vec2D) -> Option<u64> {
        if a == b {
            return Some(0);
        }
        self.shortest_path(a, b).map(|path| path.len() as u64 - 1)
    }

    /// The path self should take towards `goal`.
    ///
    /// The fastest path is preferred while its health cost is survivable.
    /// Otherwise the risk is only accepted in `competitive` mode when self
    /// would win the race to the goal against every living opponent; else
    /// the safest path wins.
    pub fn best_path(&self, game: &Game, goal: Vec2D, competitive: bool) -> Option<Vec<Vec2D>> {
        let start = game.you().head();
        let shortest = self.shortest_path(start, goal)?;
        let Some(healthiest) = self.healthiest_path(start, goal) else {
            return Some(shortest);
        };

        if self.health_cost(&shortest) < game.you().health as u64 {
            return Some(shortest);
        }
        if competitive && self.wins_race(game, goal) {
            return Some(shortest);
        }
        Some(healthiest)
    }

    /// Strictly fewer turns to `goal` than every living opponent.
    fn wins_race(&self, game: &Game, goal: Vec2D) -> bool {
        let Some(own) = self.distance(game.you().head(), goal) else {
            return false;
        };
        game.snakes
            .iter()
            .skip(1)
            .filter(|s| s.alive() && !game.doomed(s))
            .all(|s| match self.distance(s.head(), goal) {
                Some(d) => own < d,
                None => true,
            })
    }

    fn dijkstra(&self, table: &EdgeTable, start: Vec2D, goal: Vec2D) -> Option<Vec<Vec2D>> {
        let grid = &self.grid;
        if !grid.has(start) || !grid.has(goal) {
            return None;
        }
        let len = grid.width * grid.height;
        let start = grid.key_of(start);
        let goal = grid.key_of(goal);

        let mut costs = vec![u64::MAX; len];
        let mut prev = vec![usize::MAX; len];
        let mut queue = BinaryHeap::new();
        costs[start] = 0;
        queue.push(Reverse((0, start)));

        while let Some(Reverse((cost, key))) = queue.pop() {
            if key == goal {
                let mut path = Vec::new();
                let mut key = key;
                while key != usize::MAX {
                    path.push(grid.coord_of(key));
                    key = prev[key];
                }
                path.reverse();
                return Some(path);
            }
            if cost > costs[key] {
                continue;
            }

            let p = grid.coord_of(key);
            for d in Direction::iter() {
                let w = table.edges[key][d as usize];
                if w == NO_EDGE {
                    continue;
                }
                // The edge table only stores weights for edges that exist.
                let Some(n) = grid.step(p, d) else { continue };
                let n_key = grid.key_of(n);
                let n_cost = cost + w as u64;
                if n_cost < costs[n_key] {
                    costs[n_key] = n_cost;
                    prev[n_key] = key;
                    queue.push(Reverse((n_cost, n_key)));
                }
            }
        }
        None
    }
}
