//! Determinism verification tests
//!
//! Same seed and parameters must give bit-identical trajectories.

use cv_core::{Model, ModelParams, PropagandaStrategy};

fn params(strategy: PropagandaStrategy) -> ModelParams {
    let mut params = ModelParams {
        width: 20,
        height: 20,
        max_iters: 40,
        ..Default::default()
    };
    params.propaganda.strategy = strategy;
    params.propaganda.exposure_threshold = 0.5;
    params
}

fn run(params: ModelParams, seed: u64) -> Model {
    let mut model = Model::new(params, seed).expect("valid params");
    model.run().expect("run completes");
    model
}

#[test]
fn test_same_seed_same_metrics() {
    for strategy in PropagandaStrategy::all() {
        let a = run(params(*strategy), 42);
        let b = run(params(*strategy), 42);
        assert_eq!(
            a.metrics_history(),
            b.metrics_history(),
            "{} runs diverged",
            strategy
        );
        assert_eq!(a.agent_reports().unwrap(), b.agent_reports().unwrap());
    }
}

#[test]
fn test_same_seed_same_events() {
    let mut a = Model::new(params(PropagandaStrategy::Bandwagon), 7).unwrap();
    let mut b = Model::new(params(PropagandaStrategy::Bandwagon), 7).unwrap();
    for _ in 0..20 {
        a.step().unwrap();
        b.step().unwrap();
        assert_eq!(a.drain_events(), b.drain_events());
    }
}

#[test]
fn test_different_seeds_diverge() {
    let a = run(params(PropagandaStrategy::Transfer), 1);
    let b = run(params(PropagandaStrategy::Transfer), 2);
    assert_ne!(a.agent_reports().unwrap(), b.agent_reports().unwrap());
}

#[test]
fn test_injected_order_is_reproducible() {
    let build = || Model::new(params(PropagandaStrategy::Demonizing), 9).unwrap();
    let mut a = build();
    let mut b = build();
    let mut order = a.agent_ids();
    order.reverse();
    for _ in 0..10 {
        a.step_with_order(&order).unwrap();
        b.step_with_order(&order).unwrap();
    }
    assert_eq!(a.metrics_history(), b.metrics_history());
}
