use std::time::Instant;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::env::{Direction, Vec2D};
use crate::game::Game;
use crate::graph::GridGraph;
use crate::territory::Territory;
use crate::util::argmax;

/// The tunable weights of the move heuristics.
///
/// All additive bonuses are small compared to the baseline, so vetoed
/// directions (absolute values near zero) can never outscore an open one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Priorities {
    pub baseline: i32,
    pub to_food: i32,
    pub scary_snake: i32,
    pub equal_snake: i32,
    pub yummy_snake: i32,
    pub tunnel: i32,
    pub territory: i32,
}

impl Default for Priorities {
    fn default() -> Priorities {
        Priorities {
            baseline: 100,
            to_food: 4,
            scary_snake: -7,
            equal_snake: -8,
            yummy_snake: 5,
            tunnel: -6,
            territory: 2,
        }
    }
}

/// Per-direction scores, mutated by the heuristic passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityVector([i32; 4]);

impl PriorityVector {
    pub fn new(baseline: i32) -> PriorityVector {
        PriorityVector([baseline; 4])
    }

    pub fn get(&self, d: Direction) -> i32 {
        self.0[d as usize]
    }

    /// Absolute assignment, used for vetoes.
    pub fn set(&mut self, d: Direction, value: i32) {
        self.0[d as usize] = value;
    }

    pub fn add(&mut self, d: Direction, value: i32) {
        self.0[d as usize] += value;
    }

    /// Always answers, even when every direction was vetoed.
    pub fn argmax(&self) -> Direction {
        Direction::from(argmax(self.0.iter()).unwrap_or(0) as u8)
    }
}

/// Runs all heuristic passes and picks the best direction. The second
/// result is the pursued path, if any, for the debug overlay.
pub fn decide(
    game: &Game,
    graph: &GridGraph,
    fill: [u32; 4],
    territory: &Territory,
    priorities: &Priorities,
    deadline: Instant,
) -> (Direction, Option<Vec<Vec2D>>) {
    let (scores, path) = score(game, graph, fill, territory, priorities, deadline);
    let dir = scores.argmax();
    debug!("scores {scores:?} -> {dir:?}");
    if scores.get(dir) < priorities.baseline + priorities.tunnel {
        warn!("all directions are bad, {dir:?} loses slowest");
    }
    (dir, path)
}

pub fn score(
    game: &Game,
    graph: &GridGraph,
    fill: [u32; 4],
    territory: &Territory,
    priorities: &Priorities,
    deadline: Instant,
) -> (PriorityVector, Option<Vec<Vec2D>>) {
    let mut scores = PriorityVector::new(priorities.baseline);
    let you = game.you();
    let head = you.head();

    // Walls and bodies that are still there when we arrive.
    let mut blocked: Vec<(Vec2D, bool)> = Vec::new();
    for snake in game.snakes.iter().filter(|s| s.alive()) {
        if game.doomed(snake) {
            continue;
        }
        for (p, _) in game.blocking_segments(snake) {
            blocked.push((p, snake.id == 0));
        }
    }
    for d in Direction::iter() {
        match game.grid.step(head, d) {
            None => scores.set(d, 0),
            Some(p) => {
                if let Some(&(_, own)) = blocked.iter().find(|&&(q, _)| q == p) {
                    scores.set(d, if own { 0 } else { 2 });
                }
            }
        }
    }

    // Walking into a hazard we cannot survive. Food on the tile heals
    // faster than the hazard burns.
    if you.health as u16 <= game.hazard_damage as u16 + 1 {
        for d in Direction::iter() {
            if let Some(p) = game.grid.step(head, d) {
                if game.grid[p].hazard && !game.grid[p].food {
                    scores.set(d, 1);
                }
            }
        }
    }

    // Directions with some space, but not enough to stretch out.
    let max_fill = fill.iter().copied().max().unwrap_or(0);
    let tunnel = (you.len() as u32 * 3 / 2).min(max_fill);
    for d in Direction::iter() {
        if 0 < fill[d as usize] && fill[d as usize] < tunnel {
            debug!("{d:?} is a tunnel ({})", fill[d as usize]);
            scores.add(d, priorities.tunnel);
        }
    }

    // Food seeking is the expensive part. When the clock has run out
    // already, chasing open space is a decent stand-in.
    let mut path = None;
    if Instant::now() < deadline {
        path = food_path(game, graph);
        match &path {
            Some(path) => {
                if let Some(d) = game.grid.direction_to(head, path[1]) {
                    let bonus = if territory.is_scary(path[1]) {
                        debug!("goal path starts on hostile ground");
                        -priorities.to_food
                    } else {
                        priorities.to_food
                    };
                    scores.add(d, bonus);
                }
            }
            None => {
                // Nowhere to go, at least keep out of the sauce.
                for d in Direction::iter() {
                    if let Some(p) = game.grid.step(head, d) {
                        if game.grid[p].hazard {
                            scores.add(d, -priorities.to_food);
                        }
                    }
                }
            }
        }
    } else if let Some(i) = argmax(fill.iter()) {
        debug!("deadline exceeded, following space");
        scores.add(Direction::from(i as u8), priorities.to_food);
    }

    // Heads we could meet after two moves.
    for snake in game.snakes.iter().skip(1).filter(|s| s.alive()) {
        if game.doomed(snake) || graph.distance(head, snake.head()) != Some(2) {
            continue;
        }
        let moves = game.mobility(snake) as i32;
        let bonus = if snake.len() > you.len() {
            priorities.scary_snake - (3 - moves)
        } else if snake.len() == you.len() {
            priorities.equal_snake + moves
        } else if moves == 1 {
            priorities.yummy_snake
        } else {
            1
        };
        for d in Direction::iter() {
            if let Some(p) = game.grid.step(head, d) {
                if game.grid.distance(p, snake.head()) < 2 {
                    scores.add(d, bonus);
                }
            }
        }
    }

    // Reward the direction that wins the most board control outright.
    let territory_max = territory.fill.iter().copied().max().unwrap_or(0);
    if territory_max > 0
        && territory.fill.iter().filter(|&&f| f == territory_max).count() == 1
    {
        if let Some(i) = argmax(territory.fill.iter()) {
            scores.add(Direction::from(i as u8), priorities.territory);
        }
    }

    (scores, path)
}

/// Best path to the closest food, racing opponents for it. Without food the
/// own tail serves as a safe runout, unless the way there burns health.
fn food_path(game: &Game, graph: &GridGraph) -> Option<Vec<Vec2D>> {
    let head = game.you().head();
    let mut best: Option<Vec<Vec2D>> = None;
    for &food in &game.food {
        if let Some(path) = graph.best_path(game, food, true) {
            if path.len() >= 2 && best.as_ref().map_or(true, |b| path.len() < b.len()) {
                best = Some(path);
            }
        }
    }
    if best.is_none() {
        best = graph
            .best_path(game, game.you().tail(), false)
            .filter(|path| path.len() >= 2 && !path.iter().any(|&p| game.grid[p].hazard));
    }
    debug!(
        "pursuing {:?}",
        best.as_ref().map(|p| (head, p[p.len() - 1], p.len() - 1))
    );
    best
}
