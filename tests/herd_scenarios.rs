//! End-to-end herd optimizer runs on small analytic problems.

use herdopt::herd::{Herd, HerdConfig, HerdRunner};
use herdopt::optimizer::{Evolve, Optimizer};
use herdopt::problem::Problem;
use herdopt::OptimError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn shifted_bowl() -> Problem {
    Problem::builder(|x: &[f64]| (x[0] - 3.0).powi(2) + (x[1] + 2.0).powi(2))
        .bounds(-10.0, 10.0)
        .dimension(2)
        .build()
        .unwrap()
}

#[test]
fn converges_near_shifted_minimum() {
    init_tracing();
    let config = HerdConfig::default()
        .with_epoch(100)
        .with_pop_size(30)
        .with_seed(42);

    let result = HerdRunner::run(&shifted_bowl(), &config).unwrap();

    let x = result.best_position();
    let distance = ((x[0] - 3.0).powi(2) + (x[1] + 2.0).powi(2)).sqrt();
    assert!(distance < 0.5, "x = {x:?}, distance = {distance}");
}

#[test]
fn global_best_never_regresses() {
    let problem = Problem::builder(|x: &[f64]| x[0] * x[0])
        .bounds(-10.0, 10.0)
        .dimension(1)
        .build()
        .unwrap();
    let config = HerdConfig::default()
        .with_epoch(20)
        .with_pop_size(10)
        .with_seed(1);

    let result = HerdRunner::run(&problem, &config).unwrap();

    let curve = result.history.global_best_curve();
    assert_eq!(curve.len(), 20);
    for w in curve.windows(2) {
        assert!(w[1] <= w[0], "regressed: {} -> {}", w[0], w[1]);
    }
    assert!(curve[19] <= curve[0]);
    assert_eq!(result.best_fitness().value(), curve[19]);
}

#[test]
fn every_call_is_counted() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let problem = Problem::builder(move |x: &[f64]| {
        counter.fetch_add(1, Ordering::Relaxed);
        x.iter().map(|v| v.abs()).sum::<f64>()
    })
    .bounds(-4.0, 4.0)
    .dimension(5)
    .build()
    .unwrap();
    let config = HerdConfig::default()
        .with_epoch(12)
        .with_pop_size(9)
        .with_n_s(2)
        .with_n_e(2)
        .with_seed(77);

    let result = HerdRunner::run(&problem, &config).unwrap();

    assert_eq!(calls.load(Ordering::Relaxed), result.total_evaluations);
    assert_eq!(result.history.total_evaluations(), result.total_evaluations);
    let mut running = result.history.initial_evaluations();
    for record in result.history.records() {
        assert!(record.evaluations >= 9 * 2 + 9 + 9 * 2);
        running += record.evaluations;
        assert_eq!(record.total_evaluations, running);
    }
}

#[test]
fn weighted_objectives_match_single_objective_run() {
    let single = Problem::builder(|x: &[f64]| (x[0] - 1.0).powi(2) + x[1].abs())
        .bounds(-5.0, 5.0)
        .dimension(2)
        .build()
        .unwrap();
    let pair = Problem::builder(|x: &[f64]| [(x[0] - 1.0).powi(2) + x[1].abs(), x[0] * x[1]])
        .bounds(-5.0, 5.0)
        .dimension(2)
        .weights(vec![1.0, 0.0])
        .build()
        .unwrap();
    let config = HerdConfig::default()
        .with_epoch(25)
        .with_pop_size(12)
        .with_seed(2024);

    let a = HerdRunner::run(&single, &config).unwrap();
    let b = HerdRunner::run(&pair, &config).unwrap();

    assert_eq!(a.best_position(), b.best_position());
    assert_eq!(a.history.global_best_curve(), b.history.global_best_curve());
    assert_eq!(a.total_evaluations, b.total_evaluations);
    assert_eq!(b.best_fitness().objectives().len(), 2);
}

#[test]
fn same_seed_reproduces_run() {
    let config = HerdConfig::default()
        .with_epoch(15)
        .with_pop_size(10)
        .with_seed(9);

    let a = HerdRunner::run(&shifted_bowl(), &config).unwrap();
    let b = HerdRunner::run(&shifted_bowl(), &config).unwrap();

    assert_eq!(a.best, b.best);
    assert_eq!(a.history.evaluations_per_epoch(), b.history.evaluations_per_epoch());
}

#[test]
fn maximization_climbs() {
    let problem = Problem::builder(|x: &[f64]| 10.0 - (x[0] - 2.0).powi(2) - (x[1] - 2.0).powi(2))
        .bounds(-5.0, 5.0)
        .dimension(2)
        .maximize()
        .build()
        .unwrap();
    let config = HerdConfig::default()
        .with_epoch(60)
        .with_pop_size(20)
        .with_seed(13);

    let result = HerdRunner::run(&problem, &config).unwrap();

    for w in result.history.global_best_curve().windows(2) {
        assert!(w[1] >= w[0]);
    }
    assert!(result.best_fitness().value() > 9.5);
}

#[test]
fn runs_with_local_movement_and_pressure_disabled() {
    let config = HerdConfig::default()
        .with_epoch(40)
        .with_pop_size(15)
        .with_n_s(0)
        .with_delta(0.0, 0.0)
        .with_seed(4);

    let result = HerdRunner::run(&shifted_bowl(), &config).unwrap();

    assert_eq!(result.epochs, 40);
    assert!(shifted_bowl().bounds().contains(result.best_position()));
    assert!(result.best_fitness().value() <= result.history.records()[0].global_best_fitness);
}

#[test]
fn herd_behind_trait_object() {
    let config = HerdConfig::default()
        .with_epoch(10)
        .with_pop_size(8)
        .with_seed(6);
    let algorithm: Box<dyn Evolve> = Box::new(Herd::new(config.clone()).unwrap());
    let mut optimizer = Optimizer::new(algorithm, config.optimizer_config()).unwrap();

    let result = optimizer.run(&shifted_bowl()).unwrap();

    assert_eq!(optimizer.algorithm().name(), "herd");
    assert_eq!(result.history.len(), 10);
}

#[test]
fn non_finite_scores_rank_worst_without_aborting() {
    init_tracing();
    let problem = Problem::builder(|x: &[f64]| if x[0] < 0.0 { f64::NAN } else { x[0] })
        .bounds(-1.0, 1.0)
        .dimension(1)
        .build()
        .unwrap();
    let config = HerdConfig::default()
        .with_epoch(30)
        .with_pop_size(10)
        .with_seed(31);

    let result = HerdRunner::run(&problem, &config).unwrap();

    assert!(result.best_fitness().is_finite());
    assert!(result.best_position()[0] >= 0.0);
}

#[test]
fn objective_failure_stops_the_run() {
    let problem = Problem::builder(|x: &[f64]| -> Result<f64, String> {
        if x[0] > 0.99 {
            Err(format!("diverged at {}", x[0]))
        } else {
            Ok(x[0])
        }
    })
    .bounds(0.0, 1.0)
    .dimension(1)
    .build()
    .unwrap();
    // local steps overshoot the box and get clipped onto the failing edge
    let config = HerdConfig::default()
        .with_epoch(50)
        .with_pop_size(20)
        .with_eta(5.0)
        .with_seed(8);

    let err = HerdRunner::run(&problem, &config).unwrap_err();

    assert!(matches!(err, OptimError::Objective(_)));
    assert!(!err.is_configuration_error());
}

#[test]
fn configuration_errors_surface_before_any_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let problem = Problem::builder(move |x: &[f64]| {
        counter.fetch_add(1, Ordering::Relaxed);
        x[0]
    })
    .bounds(0.0, 1.0)
    .dimension(1)
    .build()
    .unwrap();

    for config in [
        HerdConfig::default().with_n_e(0),
        HerdConfig::default().with_pop_size(0),
        HerdConfig::default().with_eta(-1.0),
    ] {
        let err = HerdRunner::run(&problem, &config).unwrap_err();
        assert!(err.is_configuration_error(), "{err}");
    }
    assert_eq!(calls.load(Ordering::Relaxed), 0);
}

#[test]
fn malformed_objective_output_aborts_the_run() {
    let config = HerdConfig::default()
        .with_epoch(5)
        .with_pop_size(10)
        .with_seed(1);

    let empty_branch = Problem::builder(|x: &[f64]| {
        if x[0] < 0.0 {
            vec![]
        } else {
            vec![x[0] * x[0] + 1.0]
        }
    })
    .bounds(-10.0, 10.0)
    .dimension(1)
    .build()
    .unwrap();
    let err = HerdRunner::run(&empty_branch, &config).unwrap_err();
    assert!(matches!(err, OptimError::ObjectiveArity { expected: 1, got: 0 }), "{err}");

    let growing_branch = Problem::builder(|x: &[f64]| {
        if x[0] < 0.0 {
            vec![x[0].abs(), -100.0]
        } else {
            vec![x[0]]
        }
    })
    .bounds(-10.0, 10.0)
    .dimension(1)
    .build()
    .unwrap();
    let err = HerdRunner::run(&growing_branch, &config).unwrap_err();
    assert!(matches!(err, OptimError::ObjectiveArity { .. }), "{err}");
    assert!(!err.is_configuration_error());
}
