use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use log::{info, warn};
use warp::Filter;

use orca::agents::Agent;
use orca::env::{GameRequest, IndexResponse, API_VERSION};
use orca::logging;

pub const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHOR: &str = "boldbigflank";

/// Runtime server configuration.
struct State {
    latency: u64,
    color: String,
    head: String,
    tail: String,
    config: Agent,
    log_dir: Option<PathBuf>,
}

#[derive(Debug, Parser)]
#[command(name = "orca server", about = "Graph-based battlesnake.")]
struct Opt {
    /// IP and Port of the webserver.
    /// **Note**: Use the IP Address of your device if you want to access it
    /// from another device (`127.0.0.1` is private to your computer).
    #[arg(long, default_value = "127.0.0.1:5001")]
    host: SocketAddr,
    /// Time in ms that is subtracted from the game timeouts.
    #[arg(long, default_value_t = 100)]
    latency: u64,
    /// Color in hex format.
    #[arg(long, default_value = "#10505b")]
    color: String,
    /// Head @see https://docs.battlesnake.com/references/personalization
    #[arg(long, default_value = "beluga")]
    head: String,
    /// Tail @see https://docs.battlesnake.com/references/personalization
    #[arg(long, default_value = "hook")]
    tail: String,
    /// Default configuration.
    #[arg(long, default_value_t)]
    config: Agent,
    /// Directory for the game result log. Results are dropped if unset.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    logging();

    let Opt {
        host,
        latency,
        color,
        head,
        tail,
        config,
        log_dir,
    } = Opt::parse();

    let state = Arc::new(State {
        latency,
        color,
        head,
        tail,
        config,
        log_dir,
    });

    let index = warp::get()
        .and(warp::path::end())
        .and(with_state(state.clone()))
        .map(|state: Arc<State>| {
            info!("index");
            warp::reply::json(&IndexResponse::new(
                API_VERSION,
                AUTHOR,
                state.color.clone(),
                state.head.clone(),
                state.tail.clone(),
                PACKAGE_VERSION,
            ))
        });

    let start = warp::path("start")
        .and(warp::post())
        .and(warp::body::json::<GameRequest>())
        .map(|request: GameRequest| {
            info!(
                "start {} game {},{}",
                request.game.ruleset.name, request.game.id, request.you.id
            );
            warp::reply()
        });

    let r#move = warp::path("move")
        .and(with_state(state.clone()))
        .and(warp::post())
        .and(warp::body::json::<GameRequest>())
        .and_then(step);

    let end = warp::path("end")
        .and(with_state(state.clone()))
        .and(warp::post())
        .and(warp::body::json::<GameRequest>())
        .map(|state: Arc<State>, request: GameRequest| {
            info!(
                "end {} game {},{} win={}",
                request.game.ruleset.name,
                request.game.id,
                request.you.id,
                request.you.health != 0
            );
            if let Some(log_dir) = &state.log_dir {
                // Detached, the response must not wait for the filesystem.
                let log_dir = log_dir.clone();
                tokio::spawn(async move { orca::save(request, &log_dir).await });
            }
            warp::reply()
        });

    warp::serve(index.or(start).or(r#move).or(end))
        .run(host)
        .await
}

fn with_state(
    state: Arc<State>,
) -> impl Filter<Extract = (Arc<State>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

async fn step(state: Arc<State>, request: GameRequest) -> Result<impl warp::Reply, Infallible> {
    info!(
        "move {} game {},{}",
        request.game.ruleset.name, request.game.id, request.you.id
    );

    let budget = (request.game.timeout.max(0) as u64).saturating_sub(state.latency);
    let timer = Instant::now();
    let next_move = state.config.step(&request, budget).await;
    info!("response time {:?}ms", timer.elapsed().as_millis());

    if request.game.timeout > 0 && timer.elapsed().as_millis() as u64 > budget {
        warn!("exceeded the {budget}ms budget");
    }

    Ok(warp::reply::json(&next_move))
}
