use std::time::{Duration, Instant};

use log::info;

use crate::env::{GameRequest, MoveResponse};
use crate::floodfill::FloodFill;
use crate::game::Game;
use crate::graph::GridGraph;
use crate::scorer::{decide, Priorities};
use crate::territory::Territory;

/// The main agent. Builds the turn's traversal graphs, measures open space
/// and board control and scores the four moves against each other.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GraphAgent {
    pub priorities: Priorities,
}

impl GraphAgent {
    pub async fn step(&self, request: &GameRequest, ms: u64) -> MoveResponse {
        let deadline = Instant::now() + Duration::from_millis(ms);
        let game = Game::from_request(request);

        let graph = GridGraph::build(&game);
        let fill = FloodFill::new(&game).fill_directions(&game);
        let territory = Territory::expand(&game);

        let (dir, path) = decide(&game, &graph, fill, &territory, &self.priorities, deadline);
        info!("turn {}: {dir:?}", request.turn);

        let mut response = MoveResponse::new(dir);
        if request.thoughts {
            response.thoughts = path;
        }
        response
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::env::Direction;

    #[tokio::test]
    async fn full_step() {
        let request: GameRequest = serde_json::from_str(
            r#"{
                "game": {
                    "id": "test",
                    "ruleset": { "name": "standard" },
                    "timeout": 500
                },
                "turn": 3,
                "board": {
                    "width": 11,
                    "height": 11,
                    "food": [{"x": 5, "y": 8}],
                    "hazards": [],
                    "snakes": [{
                        "id": "a",
                        "health": 90,
                        "body": [
                            {"x": 5, "y": 5}, {"x": 5, "y": 4}, {"x": 5, "y": 3}
                        ]
                    }]
                },
                "you": {
                    "id": "a",
                    "health": 90,
                    "body": [
                        {"x": 5, "y": 5}, {"x": 5, "y": 4}, {"x": 5, "y": 3}
                    ]
                },
                "thoughts": true
            }"#,
        )
        .unwrap();

        let response = GraphAgent::default().step(&request, 400).await;
        assert_eq!(response.r#move, Direction::Up);
        let thoughts = response.thoughts.unwrap();
        assert_eq!(thoughts.len(), 4);
    }

    #[tokio::test]
    async fn oversized_board_degrades() {
        let request: GameRequest = serde_json::from_str(
            r#"{
                "game": { "id": "test", "ruleset": { "name": "standard" }, "timeout": 500 },
                "turn": 0,
                "board": {
                    "width": 50,
                    "height": 50,
                    "food": [],
                    "hazards": [],
                    "snakes": [{
                        "id": "a",
                        "health": 100,
                        "body": [{"x": 25, "y": 25}, {"x": 25, "y": 24}, {"x": 25, "y": 23}]
                    }]
                },
                "you": {
                    "id": "a",
                    "health": 100,
                    "body": [{"x": 25, "y": 25}, {"x": 25, "y": 24}, {"x": 25, "y": 23}]
                }
            }"#,
        )
        .unwrap();

        let response = crate::agents::Agent::default().step(&request, 400).await;
        assert_ne!(response.r#move, Direction::Down);
    }
}
