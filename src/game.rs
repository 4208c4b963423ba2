use std::fmt::{self, Debug};
use std::ops::{Index, IndexMut};

use owo_colors::{OwoColorize, Style};

use crate::env::{Direction, GameRequest, SnakeData, Vec2D};

/// Reduced representation of a snake.
#[derive(Debug, Clone)]
pub struct Snake {
    pub id: u8,
    /// head to tail
    pub body: Vec<Vec2D>,
    pub health: u8,
}

impl Snake {
    pub fn new(id: u8, body: Vec<Vec2D>, health: u8) -> Snake {
        Snake { id, body, health }
    }

    pub fn from(snake: &SnakeData, id: u8) -> Snake {
        Snake::new(id, snake.body.clone(), snake.health)
    }

    pub fn alive(&self) -> bool {
        self.health > 0 && !self.body.is_empty()
    }

    pub fn head(&self) -> Vec2D {
        self.body[0]
    }

    pub fn tail(&self) -> Vec2D {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Static properties of a single board tile.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub food: bool,
    pub hazard: bool,
}

/// The board topology: dimensions, wrapping and the food/hazard tiles.
#[derive(Clone)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub wrapped: bool,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: usize, height: usize, wrapped: bool) -> Grid {
        Grid {
            width,
            height,
            wrapped,
            cells: vec![Cell::default(); width * height],
        }
    }

    pub fn has(&self, p: Vec2D) -> bool {
        p.within(self.width, self.height)
    }

    /// Encodes an in-bounds coordinate as a dense cell key.
    pub fn key_of(&self, p: Vec2D) -> usize {
        p.x as usize + p.y as usize * self.width
    }

    /// Inverse of [`Self::key_of`].
    pub fn coord_of(&self, key: usize) -> Vec2D {
        Vec2D::new((key % self.width) as i16, (key / self.width) as i16)
    }

    /// The neighbor of `p` in direction `d`, wrapping around the border in
    /// wrapped mode, `None` if it would leave the board.
    pub fn step(&self, p: Vec2D, d: Direction) -> Option<Vec2D> {
        let n = p.apply(d);
        if self.has(n) {
            Some(n)
        } else if self.wrapped {
            Some(Vec2D::new(
                n.x.rem_euclid(self.width as i16),
                n.y.rem_euclid(self.height as i16),
            ))
        } else {
            None
        }
    }

    /// Manhattan tile distance, using the shorter way around in wrapped mode.
    pub fn distance(&self, a: Vec2D, b: Vec2D) -> u64 {
        let dx = (a.x - b.x).unsigned_abs() as u64;
        let dy = (a.y - b.y).unsigned_abs() as u64;
        if self.wrapped {
            dx.min(self.width as u64 - dx) + dy.min(self.height as u64 - dy)
        } else {
            dx + dy
        }
    }

    /// The direction leading from `a` to its neighbor `b`, if they are
    /// adjacent (wrap-adjacency included).
    pub fn direction_to(&self, a: Vec2D, b: Vec2D) -> Option<Direction> {
        Direction::iter().find(|&d| self.step(a, d) == Some(b))
    }

    pub fn add_food(&mut self, food: &[Vec2D]) {
        for &p in food {
            if self.has(p) {
                self[p].food = true;
            }
        }
    }

    pub fn add_hazards(&mut self, hazards: &[Vec2D]) {
        for &p in hazards {
            if self.has(p) {
                self[p].hazard = true;
            }
        }
    }
}

impl Index<Vec2D> for Grid {
    type Output = Cell;

    fn index(&self, p: Vec2D) -> &Self::Output {
        assert!(self.has(p));
        &self.cells[p.x as usize + p.y as usize * self.width]
    }
}

impl IndexMut<Vec2D> for Grid {
    fn index_mut(&mut self, p: Vec2D) -> &mut Self::Output {
        assert!(self.has(p));
        &mut self.cells[p.x as usize + p.y as usize * self.width]
    }
}

/// Immutable snapshot of a single turn.
///
/// Snake 0 is always the agent itself. The snapshot is rebuilt from every
/// request and discarded afterwards, nothing is carried across turns.
#[derive(Clone)]
pub struct Game {
    pub grid: Grid,
    /// All snakes. Dead ones have health = 0 and no body.
    pub snakes: Vec<Snake>,
    pub food: Vec<Vec2D>,
    pub hazard_damage: u8,
}

impl Game {
    pub fn new(width: usize, height: usize, wrapped: bool) -> Game {
        Game {
            grid: Grid::new(width, height, wrapped),
            snakes: Vec::with_capacity(4),
            food: Vec::new(),
            hazard_damage: 0,
        }
    }

    /// Builds the turn snapshot from the request body.
    /// Snakes without a body are dropped instead of tripping up the engine.
    pub fn from_request(request: &GameRequest) -> Game {
        let mut game = Game::new(
            request.board.width,
            request.board.height,
            request.game.ruleset.wrapped(),
        );
        game.hazard_damage = request.game.ruleset.settings.hazard_damage_per_turn;
        game.grid.add_food(&request.board.food);
        game.grid.add_hazards(&request.board.hazards);
        game.food = request
            .board
            .food
            .iter()
            .copied()
            .filter(|&p| game.grid.has(p))
            .collect();

        game.snakes.push(Snake::from(&request.you, 0));
        game.snakes.extend(
            request
                .board
                .snakes
                .iter()
                .filter(|s| s.id != request.you.id && !s.body.is_empty())
                .enumerate()
                .map(|(i, s)| Snake::from(s, i as u8 + 1)),
        );
        game
    }

    pub fn you(&self) -> &Snake {
        &self.snakes[0]
    }

    /// A snake that starves before the move resolves does not block anything.
    pub fn doomed(&self, snake: &Snake) -> bool {
        snake.id != 0
            && snake.health <= 1
            && !Direction::iter()
                .filter_map(|d| self.grid.step(snake.head(), d))
                .any(|p| self.grid[p].food)
    }

    /// The body with tail retraction delays applied: for every food at
    /// manhattan distance d from the head, segment d is duplicated once,
    /// since eating keeps the tail in place for an extra turn.
    pub fn effective_body(&self, snake: &Snake) -> Vec<Vec2D> {
        let head = snake.head();
        let mut bumped = vec![false; snake.len()];
        for &food in &self.food {
            let d = self.grid.distance(head, food) as usize;
            if 0 < d && d < snake.len() {
                bumped[d] = true;
            }
        }
        let mut body = Vec::with_capacity(snake.len() + 1);
        for (i, &p) in snake.body.iter().enumerate() {
            body.push(p);
            if bumped[i] {
                body.push(p);
            }
        }
        body
    }

    /// Cells of `snake` that are still occupied when approached from self's
    /// head, paired with the number of turns until they vacate. Segment i of
    /// a length-n body vacates after n - i turns; segments gone before we
    /// could arrive are omitted.
    pub fn blocking_segments(&self, snake: &Snake) -> Vec<(Vec2D, u16)> {
        let start = self.you().head();
        let body = self.effective_body(snake);
        let n = body.len();
        body.into_iter()
            .enumerate()
            .filter_map(|(i, p)| {
                let vacate = (n - i) as u16;
                (self.grid.distance(start, p) < vacate as u64).then_some((p, vacate))
            })
            .collect()
    }

    /// Is `p` occupied by any body segment this turn?
    pub fn occupied(&self, p: Vec2D) -> bool {
        self.snakes
            .iter()
            .filter(|s| s.alive())
            .any(|s| s.body.contains(&p))
    }

    /// Directions self can take without an immediate collision.
    pub fn valid_moves(&self) -> Vec<Direction> {
        let mut blocked = Vec::new();
        for snake in self.snakes.iter().filter(|s| s.alive()) {
            if !self.doomed(snake) {
                blocked.extend(self.blocking_segments(snake).into_iter().map(|(p, _)| p));
            }
        }
        let head = self.you().head();
        Direction::iter()
            .filter(|&d| {
                self.grid
                    .step(head, d)
                    .map_or(false, |p| !blocked.contains(&p))
            })
            .collect()
    }

    /// Number of in-bounds, non-colliding next cells of a snake. Used to
    /// judge how cornered an opponent is.
    pub fn mobility(&self, snake: &Snake) -> u8 {
        Direction::iter()
            .filter_map(|d| self.grid.step(snake.head(), d))
            .filter(|&p| !self.occupied(p))
            .count() as u8
    }
}

impl Game {
    /// Parses the textual board representation used in tests.
    ///
    /// `0`-`9` are snake heads, `^>v<` body segments pointing to the next
    /// segment towards the head, `o` food and `#` hazard tiles.
    pub fn parse(txt: &str) -> Option<Game> {
        let txt = txt.trim();

        #[derive(PartialEq)]
        enum RawCell {
            Free,
            Food,
            Hazard,
            Head(u8),
            Body(Direction),
        }

        let raw_cells: Vec<RawCell> = txt
            .lines()
            .rev()
            .flat_map(|l| {
                l.split_whitespace().flat_map(|s| {
                    s.chars().next().map(|c| match c {
                        'o' => RawCell::Food,
                        '#' => RawCell::Hazard,
                        '0'..='9' => RawCell::Head(c.to_digit(10).unwrap() as u8),
                        '^' => RawCell::Body(Direction::Up),
                        '>' => RawCell::Body(Direction::Right),
                        'v' => RawCell::Body(Direction::Down),
                        '<' => RawCell::Body(Direction::Left),
                        _ => RawCell::Free,
                    })
                })
            })
            .collect();
        let height = txt.lines().count();

        if height == 0 || raw_cells.len() % height != 0 {
            return None;
        }
        let width = raw_cells.len() / height;

        let mut game = Game::new(width, height, false);
        for (i, cell) in raw_cells.iter().enumerate() {
            let p = Vec2D::new((i % width) as _, (i / width) as _);
            match cell {
                RawCell::Food => {
                    game.grid[p].food = true;
                    game.food.push(p);
                }
                RawCell::Hazard => game.grid[p].hazard = true,
                _ => {}
            }
        }

        for i in 0..=9 {
            if let Some(start) = raw_cells.iter().position(|c| *c == RawCell::Head(i)) {
                let mut p = Vec2D::new((start % width) as _, (start / width) as _);
                let mut body = vec![p];
                // Follow the segments from the head towards the tail.
                while let Some(next) = Direction::iter().find_map(|d| {
                    let next = p.apply(d);
                    (next.within(width, height)
                        && raw_cells[(next.x + next.y * width as i16) as usize]
                            == RawCell::Body(d.invert()))
                    .then_some(next)
                }) {
                    p = next;
                    body.push(p);
                }
                while body.len() < 3 {
                    let tail = body[body.len() - 1];
                    body.push(tail);
                }
                game.snakes.push(Snake::new(i, body, 100));
            } else {
                break;
            }
        }

        Some(game)
    }
}

impl Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum FmtCell {
            Free,
            Food,
            Body(Direction, u8),
            Head(u8),
        }
        fn id_color(id: u8) -> Style {
            match id {
                0 => Style::new().green(),
                1 => Style::new().yellow(),
                2 => Style::new().blue(),
                3 => Style::new().magenta(),
                _ => Style::new().cyan(),
            }
        }
        impl Debug for FmtCell {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    FmtCell::Free => write!(f, "."),
                    FmtCell::Food => write!(f, "{}", "o".red()),
                    FmtCell::Body(dir, id) => match dir {
                        Direction::Up => write!(f, "{}", "^".style(id_color(*id))),
                        Direction::Right => write!(f, "{}", ">".style(id_color(*id))),
                        Direction::Down => write!(f, "{}", "v".style(id_color(*id))),
                        Direction::Left => write!(f, "{}", "<".style(id_color(*id))),
                    },
                    FmtCell::Head(id) => write!(f, "{}", id.style(id_color(*id))),
                }
            }
        }

        let mut cells = vec![FmtCell::Free; self.grid.width * self.grid.height];
        for y in 0..self.grid.height {
            for x in 0..self.grid.width {
                if self.grid[Vec2D::new(x as _, y as _)].food {
                    cells[y * self.grid.width + x] = FmtCell::Food;
                }
            }
        }

        for snake in self.snakes.iter().filter(|s| s.alive()) {
            let mut prev = snake.head();
            for &p in snake.body.iter().skip(1) {
                if p != prev {
                    cells[p.y as usize * self.grid.width + p.x as usize] =
                        FmtCell::Body(Direction::from(prev - p), snake.id);
                }
                prev = p;
            }
            let head = snake.head();
            cells[head.y as usize * self.grid.width + head.x as usize] = FmtCell::Head(snake.id);
        }

        writeln!(f, "Game {{")?;
        for y in (0..self.grid.height).rev() {
            write!(f, "  ")?;
            for x in 0..self.grid.width {
                let cell = cells[y * self.grid.width + x];
                if self.grid[Vec2D::new(x as _, y as _)].hazard {
                    write!(f, "{:?} ", cell.on_bright_black())?;
                } else {
                    write!(f, "{:?} ", cell)?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "  Snakes: [")?;
        for (i, snake) in self.snakes.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "({}: {})", snake.id, snake.health)?;
        }
        writeln!(f, "]")?;
        writeln!(f, "}}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_board() {
        let game = Game::parse(
            r#"
            . . . . . . . . . . .
            . . . . . . . . o . .
            . . . . . . . . . . .
            . . . . . . . . . . .
            . . . . . 0 < < . . .
            . . . . . . . ^ . . .
            . . . . . > > ^ . . .
            . . . . . # . . . . .
            . . . . . . . . . . .
            v . . . . . . . . . .
            1 . . . . . . . . . ."#,
        )
        .unwrap();

        assert_eq!(game.grid.width, 11);
        assert_eq!(game.grid.height, 11);
        assert!(game.grid[Vec2D::new(8, 9)].food);
        assert!(game.grid[Vec2D::new(5, 3)].hazard);
        assert_eq!(game.snakes.len(), 2);

        let snake = &game.snakes[0];
        assert_eq!(snake.head(), Vec2D::new(5, 6));
        assert_eq!(
            snake.body,
            vec![
                Vec2D::new(5, 6),
                Vec2D::new(6, 6),
                Vec2D::new(7, 6),
                Vec2D::new(7, 5),
                Vec2D::new(7, 4),
                Vec2D::new(6, 4),
                Vec2D::new(5, 4),
            ]
        );

        let snake = &game.snakes[1];
        assert_eq!(snake.head(), Vec2D::new(0, 0));
        assert_eq!(snake.tail(), Vec2D::new(0, 1));
        assert_eq!(snake.len(), 3);

        println!("{game:?}");
    }

    #[test]
    fn key_roundtrip() {
        let grid = Grid::new(11, 7, false);
        for y in 0..7 {
            for x in 0..11 {
                let p = Vec2D::new(x, y);
                assert_eq!(grid.coord_of(grid.key_of(p)), p);
            }
        }
    }

    #[test]
    fn wrapped_steps() {
        let grid = Grid::new(11, 11, true);
        assert_eq!(
            grid.step(Vec2D::new(0, 5), Direction::Left),
            Some(Vec2D::new(10, 5))
        );
        assert_eq!(
            grid.step(Vec2D::new(5, 10), Direction::Up),
            Some(Vec2D::new(5, 0))
        );
        assert_eq!(grid.distance(Vec2D::new(0, 5), Vec2D::new(10, 5)), 1);
        assert_eq!(
            grid.direction_to(Vec2D::new(0, 5), Vec2D::new(10, 5)),
            Some(Direction::Left)
        );

        let bounded = Grid::new(11, 11, false);
        assert_eq!(bounded.step(Vec2D::new(0, 5), Direction::Left), None);
        assert_eq!(bounded.distance(Vec2D::new(0, 5), Vec2D::new(10, 5)), 10);
    }

    #[test]
    fn bumpy_body() {
        let game = Game::parse(
            r#"
            . . . . . .
            . . o . . .
            . . 1 < < .
            . . 0 . . ."#,
        )
        .unwrap();

        // Food right above the enemy head duplicates segment 1, delaying
        // its tail retraction by a turn.
        let enemy = game.snakes[1].clone();
        let body = game.effective_body(&enemy);
        assert_eq!(body.len(), 4);
        assert_eq!(body[1], body[2]);
        assert_eq!(body[1], Vec2D::new(3, 1));

        // (3,1) is 2 steps from our head; without the delay it would have
        // vacated in time, with it the cell still blocks.
        let blocking = game.blocking_segments(&enemy);
        assert!(blocking.contains(&(Vec2D::new(3, 1), 3)));
        assert!(!blocking.iter().any(|&(p, _)| p == Vec2D::new(4, 1)));
    }

    #[test]
    fn doomed_snakes() {
        let mut game = Game::parse(
            r#"
            . . . . .
            . . . . .
            . . . . .
            1 < . . o
            . . 0 < ."#,
        )
        .unwrap();
        game.snakes[1].health = 1;
        let starving = game.snakes[1].clone();
        assert!(game.doomed(&starving));

        // Adjacent food keeps the snake in play.
        game.grid[Vec2D::new(0, 2)].food = true;
        game.food.push(Vec2D::new(0, 2));
        assert!(!game.doomed(&starving));
    }
}
