use std::cmp::Reverse;
use std::fmt::{self, Debug};

use owo_colors::{OwoColorize, Style};

use crate::env::{Direction, Vec2D};
use crate::game::{Game, Grid};

/// Annotation of a single cell in the control map.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mark {
    /// First snake to reach the cell.
    Owner(u8),
    /// Reached by another snake in the same step as the owner.
    Contested(u8),
    Food,
    Hazard,
    /// Occupied by a body segment for `ttl` more turns.
    Blocked { ttl: u16 },
}

/// How cells that equally long snakes reach simultaneously are handled.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TieBreak {
    /// In a duel, concede the contested ridge to the opponent.
    #[default]
    ContestSelf,
    /// Expand in input order.
    InputOrder,
}

/// Which snake reaches each cell first, computed by expanding all living
/// snakes simultaneously, one ring per time step.
///
/// Longer snakes expand first within a step so they take head-to-head
/// cells. Cells occupied by a body segment are not lost, the frontier
/// waits until the segment has vacated. Hazard cells are never claimed
/// and territory does not spread through them.
pub struct Territory {
    grid: Grid,
    marks: Vec<Vec<Mark>>,
    /// Cells claimed for self, split by the first step taken towards them.
    pub fill: [u32; 4],
    lengths: Vec<usize>,
}

struct Expansion {
    id: u8,
    frontier: Vec<(Vec2D, Option<Direction>)>,
    waiting: Vec<(Vec2D, Option<Direction>)>,
    seen: Vec<bool>,
}

impl Territory {
    pub fn expand(game: &Game) -> Territory {
        Territory::expand_with(game, TieBreak::default())
    }

    pub fn expand_with(game: &Game, tie_break: TieBreak) -> Territory {
        let grid = game.grid.clone();
        let len = grid.width * grid.height;

        let mut marks: Vec<Vec<Mark>> = vec![Vec::new(); len];
        for key in 0..len {
            let p = grid.coord_of(key);
            if grid[p].food {
                marks[key].push(Mark::Food);
            }
            if grid[p].hazard {
                marks[key].push(Mark::Hazard);
            }
        }

        let lengths: Vec<usize> = game.snakes.iter().map(|s| s.len()).collect();
        if !game.you().alive() {
            return Territory {
                grid,
                marks,
                fill: [0; 4],
                lengths,
            };
        }

        let alive: Vec<_> = game
            .snakes
            .iter()
            .filter(|s| s.alive() && !game.doomed(s))
            .collect();
        for snake in &alive {
            for (p, vacate) in game.blocking_segments(snake) {
                marks[grid.key_of(p)].push(Mark::Blocked { ttl: vacate });
            }
        }

        let mut order: Vec<u8> = alive.iter().map(|s| s.id).collect();
        order.sort_by_key(|&id| Reverse(game.snakes[id as usize].len()));
        if tie_break == TieBreak::ContestSelf
            && order == [0, 1]
            && game.snakes[0].len() == game.snakes[1].len()
        {
            order.swap(0, 1);
        }

        let mut expansions: Vec<Expansion> = order
            .iter()
            .map(|&id| {
                let head = game.snakes[id as usize].head();
                let key = grid.key_of(head);
                marks[key].push(Mark::Owner(id));
                let mut seen = vec![false; len];
                seen[key] = true;
                Expansion {
                    id,
                    frontier: vec![(head, None)],
                    waiting: Vec::new(),
                    seen,
                }
            })
            .collect();

        let mut claim_dist = vec![u16::MAX; len];
        let mut fill = [0; 4];

        // Bodies vacate within a body length, so this bound leaves every
        // waiting frontier enough steps to resolve.
        let max_len = alive.iter().map(|s| s.len()).max().unwrap_or(0);
        let cap = (len + 2 * max_len) as u16;

        let mut t: u16 = 1;
        while t <= cap
            && expansions
                .iter()
                .any(|e| !e.frontier.is_empty() || !e.waiting.is_empty())
        {
            for e in &mut expansions {
                let mut candidates = std::mem::take(&mut e.waiting);
                for (p, dir) in std::mem::take(&mut e.frontier) {
                    for d in Direction::iter() {
                        if let Some(n) = grid.step(p, d) {
                            let key = grid.key_of(n);
                            if !e.seen[key] {
                                e.seen[key] = true;
                                candidates.push((n, dir.or(Some(d))));
                            }
                        }
                    }
                }

                for (p, dir) in candidates {
                    let key = grid.key_of(p);
                    if let Some(owner) = marks[key].iter().find_map(|m| match m {
                        Mark::Owner(id) => Some(*id),
                        _ => None,
                    }) {
                        if owner != e.id && claim_dist[key] == t {
                            marks[key].push(Mark::Contested(e.id));
                        }
                        continue;
                    }
                    if marks[key].contains(&Mark::Hazard) {
                        continue;
                    }
                    if marks[key]
                        .iter()
                        .any(|m| matches!(m, Mark::Blocked { ttl } if *ttl > t))
                    {
                        e.waiting.push((p, dir));
                        continue;
                    }

                    marks[key].push(Mark::Owner(e.id));
                    claim_dist[key] = t;
                    e.frontier.push((p, dir));
                    if e.id == 0 {
                        if let Some(d) = dir {
                            fill[d as usize] += 1;
                        }
                    }
                }
            }
            t += 1;
        }

        Territory {
            grid,
            marks,
            fill,
            lengths,
        }
    }

    pub fn marks(&self, p: Vec2D) -> &[Mark] {
        &self.marks[self.grid.key_of(p)]
    }

    /// Cells owned by `id`, the debug overlay of its territory.
    pub fn claims(&self, id: u8) -> Vec<Vec2D> {
        (0..self.marks.len())
            .filter(|&key| self.marks[key].contains(&Mark::Owner(id)))
            .map(|key| self.grid.coord_of(key))
            .collect()
    }

    /// Is `p` owned or contested by an opponent that would win a
    /// head-to-head against us?
    pub fn is_scary(&self, p: Vec2D) -> bool {
        let own_len = self.lengths[0];
        self.marks[self.grid.key_of(p)].iter().any(|m| match m {
            Mark::Owner(id) | Mark::Contested(id) => {
                *id != 0 && self.lengths[*id as usize] >= own_len
            }
            _ => false,
        })
    }
}

impl Debug for Territory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn id_color(id: u8) -> Style {
            match id {
                0 => Style::new().green(),
                1 => Style::new().yellow(),
                2 => Style::new().blue(),
                3 => Style::new().magenta(),
                _ => Style::new().cyan(),
            }
        }

        writeln!(f, "Territory {{")?;
        for y in (0..self.grid.height).rev() {
            write!(f, "  ")?;
            for x in 0..self.grid.width {
                let marks = self.marks(Vec2D::new(x as _, y as _));
                let owner = marks.iter().find_map(|m| match m {
                    Mark::Owner(id) => Some(*id),
                    _ => None,
                });
                let contested = marks.iter().any(|m| matches!(m, Mark::Contested(_)));
                match owner {
                    Some(id) if contested => write!(f, "{} ", "!".style(id_color(id)))?,
                    Some(id) => write!(f, "{} ", id.style(id_color(id)))?,
                    None if marks.contains(&Mark::Hazard) => write!(f, "# ")?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "  fill: {:?}", self.fill)?;
        writeln!(f, "}}")
    }
}
