//! Littman's hallway problem: from `start`, action `a` steps straight into
//! the wall before reaching the goal, while `b` enters a corridor of length
//! `n` that only hits the wall with probability `p` on the first step. A
//! worth that lexicographically avoids `start` first and `wall` second must
//! pick the corridor.

use lexpol_core::{RewardStack, id, lex};
use lexpol_mdp::{ModelBuilder, Solution, SolveConfig, ValueIteration};

fn reward_stack() -> RewardStack<str> {
    RewardStack::new()
        .with(|st: &str| if st == "goal" { 1.0 } else { 0.0 })
        .with(|st: &str| if st == "wall" { 1.0 } else { 0.0 })
        .with(|st: &str| if st == "start" { 1.0 } else { 0.0 })
}

fn solve_config() -> SolveConfig {
    // The goal self-loop keeps accruing its reward, so a discount below 1
    // is what bounds accumulation here.
    SolveConfig {
        discount: 0.9,
        ..SolveConfig::default()
    }
}

/// One-way hallway: `n` corridor cells, wall probability `p` on the first
/// corridor step.
fn hallway(n: usize, p: f64) -> Solution {
    let mut builder = ModelBuilder::new();
    builder.add_action("start", "sit", [("start", 1.0)]);
    builder.add_action("start", "a", [("wall", 1.0)]);
    builder.add_action("wall", "a", [("goal", 1.0)]);
    builder.add_action("goal", "a", [("goal", 1.0)]);
    builder.add_action("start", "b", [("0", 1.0)]);
    builder.add_action("0", "a", [("wall".to_string(), p), ("1".to_string(), 1.0 - p)]);
    builder.add_action(n.to_string(), "a", [("goal", 1.0)]);
    for k in 1..n {
        builder.add_action(k.to_string(), "a", [((k + 1).to_string(), 1.0)]);
    }

    let model = builder.compile().expect("hallway model should validate");
    let stack = reward_stack();
    let rewards = model.reward_table(&stack);

    // Avoid start strictly before avoiding the wall.
    let worth = lex([-id(2), -id(1)]);

    let engine = ValueIteration::new(&model, rewards, worth, solve_config())
        .expect("engine construction should succeed");
    engine.solve()
}

/// Same hallway with movement in both directions.
fn twohallway(n: usize, p: f64) -> Solution {
    let mut builder = ModelBuilder::new();
    builder.add_action("start", "sit", [("start", 1.0)]);
    builder.add_action("start", "a", [("wall", 1.0)]);
    builder.add_action("wall", "z", [("start", 1.0)]);
    builder.add_action("wall", "a", [("goal", 1.0)]);
    builder.add_action("goal", "z", [("wall", 1.0)]);
    builder.add_action("goal", "a", [("goal", 1.0)]);
    builder.add_action("start", "b", [("0", 1.0)]);
    builder.add_action("0", "y", [("start", 1.0)]);
    builder.add_action("0", "a", [("wall".to_string(), p), ("1".to_string(), 1.0 - p)]);
    builder.add_action("1", "z", [("0", 1.0)]);
    builder.add_action(n.to_string(), "a", [("goal", 1.0)]);
    builder.add_action("goal", "y", [(n.to_string(), 1.0)]);
    for k in 1..n {
        builder.add_action(k.to_string(), "a", [((k + 1).to_string(), 1.0)]);
        builder.add_action((k + 1).to_string(), "z", [(k.to_string(), 1.0)]);
    }

    let model = builder.compile().expect("twohallway model should validate");
    let stack = reward_stack();
    let rewards = model.reward_table(&stack);

    // Avoid start, then avoid the wall, then prefer reaching the goal.
    let worth = lex([-id(2), -id(1), id(0)]);

    let engine = ValueIteration::new(&model, rewards, worth, solve_config())
        .expect("engine construction should succeed");
    engine.solve()
}

fn main() {
    let solution = twohallway(2, 0.3);
    println!("two-way hallway (n = 2, p = 0.3)");
    print!("{}", solution.display_policy());
    println!(
        "converged: {} after {} sweeps (max delta {:.2e})",
        solution.converged(),
        solution.sweeps(),
        solution.max_delta()
    );

    println!();
    println!("one-way hallway, policy at start over (n, p):");
    for n in 1..=10 {
        for p in (0..=10).map(|x| 0.1 * x as f64) {
            let solution = hallway(n, p);
            let action = solution.policy("start").expect("start always has actions");
            println!("{n:5} {p:5.2} {action}");
        }
    }
}
