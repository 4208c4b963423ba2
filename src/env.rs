use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::ops::{Add, Neg, Sub};

pub const API_VERSION: &str = "1";

#[derive(Serialize, Deserialize, Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Vec2D {
    pub x: i16,
    pub y: i16,
}

impl Vec2D {
    pub fn new(x: i16, y: i16) -> Vec2D {
        Vec2D { x, y }
    }

    pub fn apply(self, d: Direction) -> Vec2D {
        self + d.into()
    }

    pub fn within(self, width: usize, height: usize) -> bool {
        0 <= self.x && self.x < width as i16 && 0 <= self.y && self.y < height as i16
    }

    pub fn manhattan(&self) -> u64 {
        self.x.unsigned_abs() as u64 + self.y.unsigned_abs() as u64
    }
}

impl From<(i16, i16)> for Vec2D {
    fn from(val: (i16, i16)) -> Self {
        Vec2D::new(val.0, val.1)
    }
}

impl From<Direction> for Vec2D {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Up => Vec2D::new(0, 1),
            Direction::Right => Vec2D::new(1, 0),
            Direction::Down => Vec2D::new(0, -1),
            Direction::Left => Vec2D::new(-1, 0),
        }
    }
}

impl Add for Vec2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Vec2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Neg for Vec2D {
    type Output = Vec2D;

    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub fn iter() -> impl Iterator<Item = Direction> {
        [
            Direction::Up,
            Direction::Right,
            Direction::Down,
            Direction::Left,
        ]
        .iter()
        .copied()
    }

    pub fn invert(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }
}

impl From<Vec2D> for Direction {
    fn from(p: Vec2D) -> Direction {
        if p.x < 0 {
            Direction::Left
        } else if p.x > 0 {
            Direction::Right
        } else if p.y < 0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }
}

impl From<u8> for Direction {
    fn from(v: u8) -> Direction {
        assert!(v < 4, "Invalid direction");
        unsafe { std::mem::transmute(v) }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct GameData {
    pub id: String,
    #[serde(default)]
    pub ruleset: Ruleset,
    #[serde(default)]
    pub source: String,
    pub timeout: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Ruleset {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub settings: RulesetSettings,
}

impl Ruleset {
    /// Toroidal adjacency for all graph and BFS components.
    pub fn wrapped(&self) -> bool {
        self.name == "wrapped"
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RulesetSettings {
    pub food_spawn_chance: u8,
    pub minimum_food: u8,
    pub hazard_damage_per_turn: u8,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SnakeData {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub health: u8,
    /// head to tail
    pub body: Vec<Vec2D>,
    #[serde(default)]
    pub shout: String,
}

impl PartialEq for SnakeData {
    fn eq(&self, rhs: &SnakeData) -> bool {
        self.id == rhs.id
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Board {
    pub height: usize,
    pub width: usize,
    pub food: Vec<Vec2D>,
    #[serde(default)]
    pub hazards: Vec<Vec2D>,
    pub snakes: Vec<SnakeData>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GameRequest {
    pub game: GameData,
    pub turn: usize,
    pub board: Board,
    pub you: SnakeData,
    /// Request the debug overlay of the engine's internal marks.
    #[serde(default)]
    pub thoughts: bool,
}

#[derive(Serialize, Debug)]
pub struct IndexResponse {
    pub apiversion: &'static str,
    pub author: &'static str,
    pub color: String,
    pub head: String,
    pub tail: String,
    pub version: &'static str,
}

impl IndexResponse {
    pub fn new(
        apiversion: &'static str,
        author: &'static str,
        color: String,
        head: String,
        tail: String,
        version: &'static str,
    ) -> IndexResponse {
        IndexResponse {
            apiversion,
            author,
            color,
            head,
            tail,
            version,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct MoveResponse {
    pub r#move: Direction,
    pub shout: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thoughts: Option<Vec<Vec2D>>,
}

impl MoveResponse {
    pub fn new(r#move: Direction) -> MoveResponse {
        MoveResponse {
            r#move,
            shout: String::new(),
            thoughts: None,
        }
    }
    pub fn shout(r#move: Direction, shout: String) -> MoveResponse {
        MoveResponse {
            r#move,
            shout,
            thoughts: None,
        }
    }
}

impl Default for MoveResponse {
    fn default() -> MoveResponse {
        MoveResponse::new(Direction::Up)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_request() {
        let data = r#"
        {
            "game": {
                "id": "game-00fe20da-94ad-11ea-bb37",
                "ruleset": {
                    "name": "wrapped",
                    "version": "v.1.2.3",
                    "settings": { "hazardDamagePerTurn": 14 }
                },
                "timeout": 500
            },
            "turn": 14,
            "board": {
                "height": 11,
                "width": 11,
                "food": [{"x": 5, "y": 5}, {"x": 9, "y": 0}],
                "hazards": [{"x": 3, "y": 2}],
                "snakes": [{
                    "id": "snake-508e96ac-94ad-11ea-bb37",
                    "name": "My Snake",
                    "health": 54,
                    "body": [{"x": 0, "y": 0}, {"x": 1, "y": 0}, {"x": 2, "y": 0}],
                    "shout": "why are we shouting??"
                }]
            },
            "you": {
                "id": "snake-508e96ac-94ad-11ea-bb37",
                "name": "My Snake",
                "health": 54,
                "body": [{"x": 0, "y": 0}, {"x": 1, "y": 0}, {"x": 2, "y": 0}],
                "shout": "why are we shouting??"
            }
        }"#;
        let request: GameRequest = serde_json::from_str(data).unwrap();
        assert!(request.game.ruleset.wrapped());
        assert_eq!(request.game.ruleset.settings.hazard_damage_per_turn, 14);
        assert_eq!(request.you.body[0], Vec2D::new(0, 0));
        assert_eq!(request.board.hazards[0], Vec2D::new(3, 2));
        assert!(!request.thoughts);
    }

    #[test]
    fn serialize_move() {
        let response = MoveResponse::shout(Direction::Left, "hiss".into());
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"move":"left","shout":"hiss"}"#);

        let mut response = MoveResponse::new(Direction::Up);
        response.thoughts = Some(vec![Vec2D::new(1, 2)]);
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""thoughts":[{"x":1,"y":2}]"#));
    }
}
