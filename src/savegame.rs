use std::path::Path;

use log::warn;
use serde::Serialize;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::env::GameRequest;

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum Outcome {
    Win,
    Loss,
    Draw,
}

/// One appended JSON line per finished game.
#[derive(Serialize, Debug)]
struct GameResult<'a> {
    game: &'a str,
    ruleset: &'a str,
    outcome: Outcome,
    winner: Option<&'a str>,
    turn: usize,
    snakes: Vec<&'a str>,
}

impl<'a> GameResult<'a> {
    fn new(request: &'a GameRequest) -> GameResult<'a> {
        let survivors = &request.board.snakes;
        let outcome = if survivors.is_empty() {
            Outcome::Draw
        } else if survivors.iter().any(|s| s.id == request.you.id) {
            Outcome::Win
        } else {
            Outcome::Loss
        };
        GameResult {
            game: &request.game.id,
            ruleset: &request.game.ruleset.name,
            outcome,
            winner: match survivors.as_slice() {
                [winner] => Some(winner.name.as_str()),
                _ => None,
            },
            turn: request.turn,
            snakes: survivors.iter().map(|s| s.name.as_str()).collect(),
        }
    }
}

/// Appends the result of a finished game to the log. Runs detached from the
/// response path, failures are logged and dropped.
pub async fn save(request: GameRequest, log_dir: &Path) {
    let result = GameResult::new(&request);
    let line = match serde_json::to_string(&result) {
        Ok(line) => line,
        Err(err) => {
            warn!("could not serialize game result: {err}");
            return;
        }
    };

    let write = async {
        fs::create_dir_all(log_dir).await?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_dir.join("games.jsonl"))
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await
    };
    if let Err(err) = write.await {
        warn!("could not save game result: {err}");
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::env::{Board, GameData, SnakeData};

    fn end_request(survivors: Vec<SnakeData>) -> GameRequest {
        let you = SnakeData {
            id: "you".into(),
            name: "orca".into(),
            health: 0,
            body: Vec::new(),
            shout: String::new(),
        };
        GameRequest {
            game: GameData {
                id: "game-1".into(),
                timeout: 500,
                ..Default::default()
            },
            turn: 42,
            board: Board {
                width: 11,
                height: 11,
                food: Vec::new(),
                hazards: Vec::new(),
                snakes: survivors,
            },
            you,
            thoughts: false,
        }
    }

    #[test]
    fn outcomes() {
        let winner = SnakeData {
            id: "you".into(),
            name: "orca".into(),
            health: 54,
            body: vec![Default::default()],
            shout: String::new(),
        };

        let request = end_request(vec![winner.clone()]);
        let result = GameResult::new(&request);
        assert_eq!(result.outcome, Outcome::Win);
        assert_eq!(result.winner, Some("orca"));

        let mut other = winner;
        other.id = "other".into();
        other.name = "rival".into();
        let request = end_request(vec![other]);
        let result = GameResult::new(&request);
        assert_eq!(result.outcome, Outcome::Loss);
        assert_eq!(result.winner, Some("rival"));

        let request = end_request(Vec::new());
        let result = GameResult::new(&request);
        assert_eq!(result.outcome, Outcome::Draw);
        assert_eq!(result.winner, None);
        assert_eq!(result.turn, 42);
    }
}
