use std::str::FromStr;

mod graph;
pub use graph::*;
mod random;
pub use random::*;

use crate::env::{GameRequest, MoveResponse};
use crate::game::Game;

/// Boards beyond this are answered randomly instead of risking the deadline.
const MAX_BOARD: usize = 25;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Agent {
    Graph(GraphAgent),
    Random(RandomAgent),
}

impl Default for Agent {
    fn default() -> Self {
        Self::Graph(GraphAgent::default())
    }
}

impl Agent {
    pub async fn step(&self, request: &GameRequest, ms: u64) -> MoveResponse {
        if request.you.body.is_empty() {
            return MoveResponse::default();
        }
        if request.board.width > MAX_BOARD || request.board.height > MAX_BOARD {
            return RandomAgent.step(&Game::from_request(request)).await;
        }

        match self {
            Agent::Graph(agent) => agent.step(request, ms).await,
            Agent::Random(agent) => agent.step(&Game::from_request(request)).await,
        }
    }
}

impl FromStr for Agent {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

impl std::fmt::Display for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", serde_json::to_string(self).unwrap_or_default())
    }
}
