use std::collections::VecDeque;

use crate::env::{Direction, Vec2D};
use crate::game::{Game, Grid};

/// Estimates how much space is left after a first step in each direction.
///
/// Cells are barred if a body segment still occupies them when we could
/// arrive (same vacate reasoning as the traversal graphs) or if they are
/// next to the head of an opponent that would win a head-to-head.
pub struct FloodFill {
    grid: Grid,
    barrier: Vec<bool>,
}

impl FloodFill {
    pub fn new(game: &Game) -> FloodFill {
        let grid = game.grid.clone();
        let mut barrier = vec![false; grid.width * grid.height];

        for snake in game.snakes.iter().filter(|s| s.alive()) {
            if game.doomed(snake) {
                continue;
            }
            for (p, _) in game.blocking_segments(snake) {
                barrier[grid.key_of(p)] = true;
            }
        }

        // Hazards we would not survive entering act as walls, unless food
        // on the tile heals us right back up.
        if game.you().health as u16 <= game.hazard_damage as u16 + 1 {
            for key in 0..barrier.len() {
                let cell = grid[grid.coord_of(key)];
                if cell.hazard && !cell.food {
                    barrier[key] = true;
                }
            }
        }

        // Never squeeze past a head that is at least as long as ours.
        let own_len = game.you().len();
        for snake in game.snakes.iter().skip(1).filter(|s| s.alive()) {
            if snake.len() >= own_len && !game.doomed(snake) {
                for d in Direction::iter() {
                    if let Some(p) = grid.step(snake.head(), d) {
                        barrier[grid.key_of(p)] = true;
                    }
                }
            }
        }

        FloodFill { grid, barrier }
    }

    /// Reachable cell count per first-step direction.
    /// 0 means walking into a wall or an occupied cell.
    pub fn fill_directions(&self, game: &Game) -> [u32; 4] {
        let head = game.you().head();
        let mut fill = [0; 4];
        for d in Direction::iter() {
            if let Some(start) = self.grid.step(head, d) {
                fill[d as usize] = self.fill(start);
            }
        }
        fill
    }

    fn fill(&self, start: Vec2D) -> u32 {
        if self.barrier[self.grid.key_of(start)] {
            return 0;
        }

        let mut visited = vec![false; self.grid.width * self.grid.height];
        let mut queue = VecDeque::new();
        visited[self.grid.key_of(start)] = true;
        queue.push_back(start);

        let mut count = 0;
        while let Some(p) = queue.pop_front() {
            count += 1;
            for d in Direction::iter() {
                if let Some(n) = self.grid.step(p, d) {
                    let key = self.grid.key_of(n);
                    if !visited[key] && !self.barrier[key] {
                        visited[key] = true;
                        queue.push_back(n);
                    }
                }
            }
        }
        count
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::game::Game;

    #[test]
    fn open_board() {
        let game = Game::parse(
            r#"
            . . . . . . . . . . .
            . . . . . . . . . . .
            . . . . . . . . . . .
            . . . . . . . . . . .
            . . . . . . . . . . .
            . . . . . 0 . . . . .
            . . . . . . . . . . .
            . . . . . . . . . . .
            . . . . . . . . . . .
            . . . . . . . . . . .
            . . . . . . . . . . ."#,
        )
        .unwrap();

        // Everything except the head cell itself is reachable.
        let fill = FloodFill::new(&game).fill_directions(&game);
        assert_eq!(fill, [120; 4]);
    }

    #[test]
    fn dead_end_pocket() {
        let game = Game::parse(
            r#"
            v . . . .
            v . . . .
            v . . . .
            > > v . .
            . . 0 . ."#,
        )
        .unwrap();

        // Left leads into the 2-cell pocket behind the body, down is the
        // border, up the neck. The upper tail section has vacated already,
        // which opens the right side but not the pocket.
        let fill = FloodFill::new(&game).fill_directions(&game);
        assert_eq!(fill[Direction::Up as usize], 0);
        assert_eq!(fill[Direction::Right as usize], 19);
        assert_eq!(fill[Direction::Down as usize], 0);
        assert_eq!(fill[Direction::Left as usize], 2);
    }

    #[test]
    fn avoids_matching_heads() {
        let game = Game::parse(
            r#"
            . . . . .
            . . . . .
            . . . . v
            . 0 . 1 <
            . . . . ."#,
        )
        .unwrap();

        // The enemy is as long as us, so every cell around its head is out,
        // which also isolates the corner behind it.
        let fill = FloodFill::new(&game).fill_directions(&game);
        assert_eq!(fill[Direction::Right as usize], 0);
        assert_eq!(fill[Direction::Up as usize], 18);
        assert_eq!(fill[Direction::Down as usize], 18);
        assert_eq!(fill[Direction::Left as usize], 18);
    }

    #[test]
    fn lethal_hazard_walls() {
        let mut game = Game::parse(
            r#"
            . . . . .
            . . . . .
            . . . . .
            # # # . .
            . . 0 . ."#,
        )
        .unwrap();
        game.hazard_damage = 14;
        game.snakes[0].health = 10;

        // Entering the wall would kill us, so the two cells on the left are
        // a dead end.
        let fill = FloodFill::new(&game).fill_directions(&game);
        assert_eq!(fill[Direction::Up as usize], 0);
        assert_eq!(fill[Direction::Right as usize], 19);
        assert_eq!(fill[Direction::Down as usize], 0);
        assert_eq!(fill[Direction::Left as usize], 2);
    }
}
