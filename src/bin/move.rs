use clap::Parser;
use log::info;

use orca::agents::Agent;
use orca::env::GameRequest;
use orca::game::Game;
use orca::logging;
use orca::territory::Territory;

#[derive(Parser)]
#[command(name = "orca move", about = "Evaluate a single move request.")]
struct Opts {
    /// Agent configuration.
    #[arg(long, default_value_t)]
    config: Agent,
    /// JSON game request.
    #[arg(value_parser = parse_request)]
    request: GameRequest,
    /// Time in ms that is subtracted from the game timeout.
    #[arg(long, default_value_t = 200)]
    latency: u64,
}

fn parse_request(s: &str) -> Result<GameRequest, serde_json::Error> {
    serde_json::from_str(s)
}

#[tokio::main]
async fn main() {
    logging();

    let Opts {
        config,
        request,
        latency,
    } = Opts::parse();

    let game = Game::from_request(&request);
    info!("{game:?}");
    info!("{:?}", Territory::expand(&game));

    let budget = (request.game.timeout.max(0) as u64).saturating_sub(latency);
    let step = config.step(&request, budget).await;

    info!("Step: {step:?}");
}
