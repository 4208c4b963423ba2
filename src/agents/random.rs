use rand::rngs::SmallRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;

use crate::env::{Direction, MoveResponse};
use crate::game::Game;

/// Fallback that picks any non-colliding move.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct RandomAgent;

impl RandomAgent {
    pub async fn step(&self, game: &Game) -> MoveResponse {
        let mut rng = SmallRng::from_entropy();
        MoveResponse::new(
            game.valid_moves()
                .into_iter()
                .choose(&mut rng)
                .unwrap_or(Direction::Up),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::env::Vec2D;

    #[tokio::test]
    async fn never_picks_the_neck() {
        let game = Game::parse(
            r#"
            . . . . .
            . . v . .
            . . v . .
            . . 0 . .
            . . . . ."#,
        )
        .unwrap();

        for _ in 0..20 {
            let response = RandomAgent.step(&game).await;
            assert_ne!(game.you().head().apply(response.r#move), Vec2D::new(2, 2));
        }
    }
}
