use lexpol_core::{RewardStack, RewardVec, id, lex, num, trunc};
use lexpol_mdp::{ModelBuilder, Solution, SolveConfig, SolveConfigError, SolveError, ValueIteration};

fn hallway_reward_stack() -> RewardStack<str> {
    RewardStack::new()
        .with(|st: &str| if st == "goal" { 1.0 } else { 0.0 })
        .with(|st: &str| if st == "wall" { 1.0 } else { 0.0 })
        .with(|st: &str| if st == "start" { 1.0 } else { 0.0 })
}

fn solve_hallway(n: usize, p: f64) -> Solution {
    let mut builder = ModelBuilder::new();
    builder.add_action("start", "sit", [("start", 1.0)]);
    builder.add_action("start", "a", [("wall", 1.0)]);
    builder.add_action("wall", "a", [("goal", 1.0)]);
    builder.add_action("goal", "a", [("goal", 1.0)]);
    builder.add_action("start", "b", [("0", 1.0)]);
    builder.add_action(
        "0",
        "a",
        [("wall".to_string(), p), ("1".to_string(), 1.0 - p)],
    );
    builder.add_action(n.to_string(), "a", [("goal", 1.0)]);
    for k in 1..n {
        builder.add_action(k.to_string(), "a", [((k + 1).to_string(), 1.0)]);
    }

    let model = builder.compile().expect("hallway model should validate");
    let rewards = model.reward_table(&hallway_reward_stack());
    let worth = lex([-id(2), -id(1)]);
    let config = SolveConfig {
        discount: 0.9,
        ..SolveConfig::default()
    };

    ValueIteration::new(&model, rewards, worth, config)
        .expect("engine construction should succeed")
        .solve()
}

#[test]
fn absorbing_self_loop_converges_to_the_scaled_fixed_point() {
    let mut builder = ModelBuilder::new();
    builder.add_action("s", "loop", [("s", 1.0)]);
    let model = builder.compile().expect("model should validate");

    let stack: RewardStack<str> = RewardStack::new()
        .with(|st: &str| if st == "s" { 1.0 } else { 0.0 })
        .with(|_: &str| 0.0)
        .with(|_: &str| 0.0);
    let rewards = model.reward_table(&stack);

    let config = SolveConfig {
        discount: 0.5,
        ..SolveConfig::default()
    };
    let solution = ValueIteration::new(&model, rewards, lex([id(0), id(1), id(2)]), config)
        .expect("engine construction should succeed")
        .solve();

    assert!(solution.converged());
    assert_eq!(solution.policy("s").expect("s has an action"), "loop");

    // Fixed point of v = 1 + 0.5 v, componentwise.
    let value = solution.value("s").expect("s exists");
    assert!((value[0] - 2.0).abs() < 1e-6);
    assert_eq!(value[1], 0.0);
    assert_eq!(value[2], 0.0);
}

#[test]
fn hallway_start_policy_avoids_the_wall() {
    let solution = solve_hallway(2, 0.3);
    assert!(solution.converged());
    // `a` walks straight into the wall; `b` enters the safe corridor.
    assert_eq!(solution.policy("start").expect("start has actions"), "b");
}

#[test]
fn solving_twice_is_deterministic() {
    let first = solve_hallway(2, 0.3);
    let second = solve_hallway(2, 0.3);

    assert_eq!(first.sweeps(), second.sweeps());
    let first_policy: Vec<_> = first.policy_entries().collect();
    let second_policy: Vec<_> = second.policy_entries().collect();
    assert_eq!(first_policy, second_policy);

    for (state, _) in first.policy_entries() {
        assert_eq!(
            first.value(state).expect("state exists"),
            second.value(state).expect("state exists")
        );
    }
}

#[test]
fn equal_merits_resolve_to_the_first_registered_action() {
    // Two actions with identical distributions have provably equal worth.
    let mut builder = ModelBuilder::new();
    builder.add_action("s", "second_place", [("sink", 1.0)]);
    builder.add_action("s", "also_equal", [("sink", 1.0)]);
    builder.add_action("sink", "stay", [("sink", 1.0)]);
    let model = builder.compile().expect("model should validate");

    let stack: RewardStack<str> = RewardStack::new().with(|_: &str| 0.0);

    for _ in 0..5 {
        let solution = ValueIteration::new(
            &model,
            model.reward_table(&stack),
            lex([id(0)]),
            SolveConfig::default(),
        )
        .expect("engine construction should succeed")
        .solve();

        assert_eq!(solution.policy("s").expect("s has actions"), "second_place");
    }
}

#[test]
fn actionless_states_have_no_policy_entry() {
    let mut builder = ModelBuilder::new();
    builder.add_action("s", "go", [("dead_end", 1.0)]);
    let model = builder.compile().expect("model should validate");

    let stack: RewardStack<str> = RewardStack::new().with(|_: &str| 0.0);
    let solution = ValueIteration::new(
        &model,
        model.reward_table(&stack),
        lex([id(0)]),
        SolveConfig::default(),
    )
    .expect("engine construction should succeed")
    .solve();

    let err = solution.policy("dead_end").expect_err("no actions there");
    assert!(matches!(err, SolveError::NoActionAvailable { .. }));

    let err = solution.policy("missing").expect_err("unknown state");
    assert!(matches!(err, SolveError::UnknownState { .. }));

    let entries: Vec<_> = solution.policy_entries().collect();
    assert_eq!(entries, vec![("s", Some("go")), ("dead_end", None)]);
}

#[test]
fn worth_arity_is_checked_at_construction() {
    let mut builder = ModelBuilder::new();
    builder.add_action("s", "loop", [("s", 1.0)]);
    let model = builder.compile().expect("model should validate");

    let stack: RewardStack<str> = RewardStack::new().with(|_: &str| 0.0);
    let err = ValueIteration::new(
        &model,
        model.reward_table(&stack),
        id(5),
        SolveConfig::default(),
    )
    .expect_err("id(5) exceeds arity 1");
    assert!(matches!(
        err,
        SolveError::ArityMismatch {
            arity: 1,
            required: 6
        }
    ));
}

#[test]
fn reward_table_shape_is_checked_at_construction() {
    let mut builder = ModelBuilder::new();
    builder.add_action("s", "go", [("t", 1.0)]);
    let model = builder.compile().expect("model should validate");

    let err = ValueIteration::new(
        &model,
        vec![RewardVec::zeros(1)],
        id(0),
        SolveConfig::default(),
    )
    .expect_err("one reward for two states");
    assert!(matches!(err, SolveError::RewardCountMismatch { .. }));

    let err = ValueIteration::new(
        &model,
        vec![RewardVec::zeros(1), RewardVec::zeros(2)],
        id(0),
        SolveConfig::default(),
    )
    .expect_err("mixed arities");
    assert!(matches!(err, SolveError::MixedRewardArity { .. }));
}

#[test]
fn discounted_non_absorbing_cycle_converges() {
    let mut builder = ModelBuilder::new();
    builder.add_action("ping", "go", [("pong", 1.0)]);
    builder.add_action("pong", "go", [("ping", 1.0)]);
    let model = builder.compile().expect("model should validate");

    let stack: RewardStack<str> = RewardStack::new().with(|_: &str| 1.0);
    let config = SolveConfig {
        discount: 0.9,
        ..SolveConfig::default()
    };
    let solution = ValueIteration::new(&model, model.reward_table(&stack), id(0), config)
        .expect("engine construction should succeed")
        .solve();

    assert!(solution.converged());
    // Fixed point of v = 1 + 0.9 v on both sides of the cycle.
    let value = solution.value("ping").expect("ping exists");
    assert!((value[0] - 10.0).abs() < 1e-6);
}

#[test]
fn hitting_the_sweep_bound_reports_non_convergence() {
    let mut builder = ModelBuilder::new();
    builder.add_action("ping", "go", [("pong", 1.0)]);
    builder.add_action("pong", "go", [("ping", 1.0)]);
    let model = builder.compile().expect("model should validate");

    let stack: RewardStack<str> = RewardStack::new().with(|_: &str| 1.0);
    let config = SolveConfig {
        discount: 1.0,
        max_sweeps: 50,
        ..SolveConfig::default()
    };
    let solution = ValueIteration::new(&model, model.reward_table(&stack), id(0), config)
        .expect("engine construction should succeed")
        .solve();

    // Undiscounted cycle accumulates forever: best-effort values plus a
    // non-convergence flag, not an error.
    assert!(!solution.converged());
    assert_eq!(solution.sweeps(), 50);
    assert!(solution.max_delta() > 0.0);
}

#[test]
fn truncation_collapses_marked_merits_before_selection() {
    let mut builder = ModelBuilder::new();
    builder.add_action("s", "low", [("x", 1.0)]);
    builder.add_action("s", "high", [("y", 1.0)]);
    let model = builder.compile().expect("model should validate");

    let stack: RewardStack<str> = RewardStack::new().with(|st: &str| match st {
        "x" => 0.4,
        "y" => 0.9,
        _ => 0.0,
    });

    // Plain worth: `high` wins on the larger continuation.
    let plain = ValueIteration::new(
        &model,
        model.reward_table(&stack),
        lex([id(0)]),
        SolveConfig::default(),
    )
    .expect("engine construction should succeed")
    .solve();
    assert_eq!(plain.policy("s").expect("s has actions"), "high");

    // Truncated worth: both merits collapse to 0, so the tie goes to the
    // first registered action.
    let truncated = ValueIteration::new(
        &model,
        model.reward_table(&stack),
        trunc(lex([id(0)])),
        SolveConfig::default(),
    )
    .expect("engine construction should succeed")
    .solve();
    assert_eq!(truncated.policy("s").expect("s has actions"), "low");
}

#[test]
fn sweep_hook_sees_monotone_progress_to_tolerance() {
    let mut builder = ModelBuilder::new();
    builder.add_action("s", "loop", [("s", 1.0)]);
    let model = builder.compile().expect("model should validate");

    let stack: RewardStack<str> = RewardStack::new().with(|_: &str| 1.0);
    let config = SolveConfig {
        discount: 0.5,
        ..SolveConfig::default()
    };

    let mut deltas = Vec::new();
    let solution = ValueIteration::new(&model, model.reward_table(&stack), id(0), config)
        .expect("engine construction should succeed")
        .solve_with_hook(|metrics| deltas.push(metrics.max_delta));

    assert!(solution.converged());
    assert_eq!(deltas.len(), solution.sweeps());
    assert!(deltas.windows(2).all(|pair| pair[1] <= pair[0]));
    assert!(*deltas.last().expect("at least one sweep") <= 1e-9);
}

#[test]
fn snapshot_serializes_the_full_report() {
    let solution = solve_hallway(1, 0.5);
    let snapshot = solution.snapshot();

    assert_eq!(snapshot.schema_version, 1);
    assert!(snapshot.converged);
    // start, wall, goal, and corridor cells 0 and 1.
    assert_eq!(snapshot.states.len(), 5);
    assert!(snapshot.states.iter().all(|state| state.value.len() == 3));

    let json = snapshot.to_json().expect("serializes to JSON");
    assert!(json.contains("\"start\""));
    assert!(json.contains("\"converged\": true"));
}

#[test]
fn config_yaml_parsing_and_validation() {
    let config = SolveConfig::from_default_yaml().expect("default config parses");
    assert_eq!(config.discount, 1.0);
    assert_eq!(config.max_sweeps, 10_000);

    let overridden = SolveConfig::from_yaml_str("discount: 0.8\n").expect("partial yaml");
    assert_eq!(overridden.discount, 0.8);
    assert_eq!(overridden.tolerance, 1e-9);

    let err = SolveConfig::from_yaml_str("discount: 1.5\n").expect_err("out of range");
    assert!(matches!(err, SolveConfigError::Invalid(_)));

    let err = SolveConfig::from_yaml_str("max_sweeps: 0\n").expect_err("zero sweeps");
    assert!(matches!(err, SolveConfigError::Invalid(_)));
}

#[test]
fn constant_worths_still_yield_a_deterministic_policy() {
    // A worth that ignores the vector entirely ranks every action equal.
    let mut builder = ModelBuilder::new();
    builder.add_action("s", "first", [("s", 1.0)]);
    builder.add_action("s", "second", [("s", 1.0)]);
    let model = builder.compile().expect("model should validate");

    let stack: RewardStack<str> = RewardStack::new().with(|_: &str| 0.0);
    let solution = ValueIteration::new(
        &model,
        model.reward_table(&stack),
        num(42.0),
        SolveConfig::default(),
    )
    .expect("engine construction should succeed")
    .solve();

    assert_eq!(solution.policy("s").expect("s has actions"), "first");
}
