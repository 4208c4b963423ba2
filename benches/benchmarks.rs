use std::time::{Duration, Instant};

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use orca::env::Vec2D;
use orca::floodfill::FloodFill;
use orca::game::Game;
use orca::graph::GridGraph;
use orca::scorer::{decide, Priorities};
use orca::territory::Territory;

fn busy_board() -> Game {
    Game::parse(
        r#"
        . . . . . v . . . . #
        . . . . . 2 . . . . #
        . . o . . . . . 1 < .
        . . . . . . . . . ^ .
        . . . . . . . . . . .
        . . . . . o . . . . .
        v . . . . . . . . . o
        v . . . . . . . . . .
        . > 0 . . . . . . . .
        . . . . . . . . . . .
        o . . . . . . . . . ."#,
    )
    .unwrap()
}

fn graph_build(c: &mut Criterion) {
    let game = busy_board();
    c.bench_function("graph_build", |b| {
        b.iter(|| GridGraph::build(black_box(&game)))
    });
}

fn graph_path(c: &mut Criterion) {
    let game = busy_board();
    let graph = GridGraph::build(&game);
    c.bench_function("graph_path", |b| {
        b.iter(|| graph.best_path(black_box(&game), black_box(Vec2D::new(0, 0)), true))
    });
}

fn flood_fill(c: &mut Criterion) {
    let game = busy_board();
    c.bench_function("flood_fill", |b| {
        b.iter(|| FloodFill::new(black_box(&game)).fill_directions(&game))
    });
}

fn territory_expand(c: &mut Criterion) {
    let game = busy_board();
    c.bench_function("territory_expand", |b| {
        b.iter(|| Territory::expand(black_box(&game)))
    });
}

fn full_decision(c: &mut Criterion) {
    let game = busy_board();
    let priorities = Priorities::default();
    c.bench_function("full_decision", |b| {
        b.iter(|| {
            let graph = GridGraph::build(&game);
            let fill = FloodFill::new(&game).fill_directions(&game);
            let territory = Territory::expand(&game);
            decide(
                black_box(&game),
                &graph,
                fill,
                &territory,
                &priorities,
                Instant::now() + Duration::from_millis(100),
            )
        })
    });
}

criterion_group!(
    benches,
    graph_build,
    graph_path,
    flood_fill,
    territory_expand,
    full_decision
);
criterion_main!(benches);
