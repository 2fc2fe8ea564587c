use crate::constants;
use crate::symbolic::environment::{ConstValue, Environment, Func};
use crate::symbolic::errors::EnvError;
use crate::symbolic::symbolic_eval::Value;
use approx::assert_relative_eq;
use nalgebra::DVector;

fn t(values: Vec<f64>) -> DVector<f64> {
    DVector::from_vec(values)
}

#[test]
fn test_dependent_constant_tracks_environment() {
    let mut env = Environment::new();
    env.set_constants(constants![a = 1.0, b = "2*a"]);
    let f = env.new_function("a + b", Some("f")).unwrap();

    let first = f.eval(&t(vec![0.0])).unwrap();
    assert_eq!(first.first().unwrap(), 3.0);

    env.set_constants(constants![a = 2.0]);
    let second = f.eval(&t(vec![0.0])).unwrap();
    assert_eq!(second.first().unwrap(), 6.0);

    // the earlier result is a value, not a view
    assert_eq!(first.first().unwrap(), 3.0);
}

#[test]
fn test_override_precedence() {
    let mut env = Environment::new();
    env.set_constants(constants![a = 1.0, b = 2.0]);
    let f = env.new_function("a + b", Some("f")).unwrap();

    assert_eq!(f.eval(&t(vec![0.0])).unwrap().first().unwrap(), 3.0);
    assert_eq!(
        f.eval_with(&t(vec![0.0]), &[("b", Value::Scalar(5.0))])
            .unwrap()
            .first()
            .unwrap(),
        6.0
    );
    // the override does not stick
    assert_eq!(f.eval(&t(vec![0.0])).unwrap().first().unwrap(), 3.0);
}

#[test]
fn test_environment_wins_over_construction_snapshot() {
    let mut env = Environment::new();
    env.set_constants(constants![a = 1.0]);
    let f = env.new_function("a*t", Some("f")).unwrap();

    // change made after construction is picked up on the next call
    env.set_constants(constants![a = 10.0]);
    let result = f.eval(&t(vec![1.0])).unwrap();
    assert_eq!(result.first().unwrap(), 10.0);
}

#[test]
fn test_broadcasting_over_t() {
    let mut env = Environment::new();
    env.set_constants(constants![a = 2.0]);
    let f = env.new_function("a*t", Some("f")).unwrap();

    let result = f.eval(&t(vec![0.0, 1.0, 2.0])).unwrap();
    assert_eq!(
        result,
        Value::Vector(DVector::from_vec(vec![0.0, 2.0, 4.0]))
    );
}

#[test]
fn test_vector_override() {
    let mut env = Environment::new();
    env.set_constants(constants![a = 2.0]);
    let f = env.new_function("a*t", Some("f")).unwrap();

    let result = f
        .eval_with(&t(vec![0.0, 1.0]), &[("a", vec![10.0, 20.0].into())])
        .unwrap();
    assert_eq!(
        result,
        Value::Vector(DVector::from_vec(vec![0.0, 20.0]))
    );
}

#[test]
fn test_vector_override_shape_mismatch() {
    let mut env = Environment::new();
    env.set_constants(constants![a = 2.0]);
    let f = env.new_function("a*t", Some("f")).unwrap();

    let result = f.eval_with(&t(vec![0.0, 1.0, 2.0]), &[("a", vec![10.0, 20.0].into())]);
    assert!(matches!(result, Err(EnvError::ShapeMismatch { .. })));
}

#[test]
fn test_two_functions_share_one_store() {
    let mut env = Environment::new();
    env.set_constants(constants![m = 1.0]);
    let f = env.new_function("m*t", Some("f")).unwrap();
    let g = env.new_function("m + t", Some("g")).unwrap();

    env.set_constants(constants![m = 5.0]);
    assert_eq!(f.eval(&t(vec![2.0])).unwrap().first().unwrap(), 10.0);
    assert_eq!(g.eval(&t(vec![2.0])).unwrap().first().unwrap(), 7.0);
}

#[test]
fn test_duplicate_expression_warns_but_registers() {
    let mut env = Environment::new();
    env.set_constants(constants![a = 1.0]);
    env.new_function("a*t", Some("first")).unwrap();

    assert_eq!(env.find_duplicate("a*t"), Some("first"));
    env.new_function("a*t", Some("second")).unwrap();

    // both names resolve and both evaluate independently
    let first = env.get_function("first").unwrap();
    let second = env.get_function("second").unwrap();
    assert_eq!(first.eval(&t(vec![3.0])).unwrap().first().unwrap(), 3.0);
    assert_eq!(second.eval(&t(vec![3.0])).unwrap().first().unwrap(), 3.0);
}

#[test]
fn test_repeated_evaluation_is_idempotent() {
    let mut env = Environment::new();
    env.set_constants(constants![a = 1.5, b = "a*2", c = "sqrt(b)"]);
    let f = env.new_function("c*sin(a*t) + b", Some("f")).unwrap();

    let grid = t(vec![0.0, 0.5, 1.0, 1.5]);
    let first = f.eval(&grid).unwrap();
    let second = f.eval(&grid).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unresolved_reference() {
    let mut env = Environment::new();
    env.set_constants(constants![a = 1.0]);
    let f = env.new_function("a + c", Some("f")).unwrap();

    assert_eq!(
        f.eval(&t(vec![0.0])),
        Err(EnvError::UnresolvedReference("c".to_string()))
    );
}

#[test]
fn test_forward_dependency_fails() {
    let mut env = Environment::new();
    // b references a before a is declared
    env.set_constants(constants![b = "2*a", a = 1.0]);
    let f = env.new_function("b", Some("f")).unwrap();

    assert_eq!(
        f.eval(&t(vec![0.0])),
        Err(EnvError::UnresolvedReference("a".to_string()))
    );
}

#[test]
fn test_malformed_expression_fails_at_construction() {
    let mut env = Environment::new();
    let result = env.new_function("a +* b", Some("f"));
    assert!(matches!(result, Err(EnvError::ExpressionSyntax(_))));
}

#[test]
fn test_malformed_constant_fails_at_call() {
    let mut env = Environment::new();
    env.set_constants(constants![a = "((("]);
    let f = env.new_function("a", Some("f")).unwrap();
    assert!(matches!(
        f.eval(&t(vec![0.0])),
        Err(EnvError::ExpressionSyntax(_))
    ));
}

#[test]
fn test_get_function_key_not_found() {
    let env = Environment::new();
    assert_eq!(
        env.get_function("ghost").err(),
        Some(EnvError::KeyNotFound("ghost".to_string()))
    );
}

#[test]
fn test_pop_constants() {
    let mut env = Environment::new();
    env.set_constants(constants![a = 1.0, b = 2.0]);
    env.pop_constants(&["a"]).unwrap();
    assert!(!env.get_constants().borrow().contains("a"));

    assert_eq!(
        env.pop_constants(&["a"]),
        Err(EnvError::KeyNotFound("a".to_string()))
    );
}

#[test]
fn test_clear_constants_keeps_functions() {
    let mut env = Environment::new();
    env.set_constants(constants![a = 1.0]);
    env.new_function("a + t", Some("f")).unwrap();
    env.new_function("a*t", Some("g")).unwrap();

    env.clear_constants();
    assert!(env.get_constants().borrow().is_empty());

    // the registry is untouched and both functions stay retrievable
    assert_eq!(env.functions().len(), 2);
    let f = env.get_function("f").unwrap();
    // a is gone from the store but survives in the function's snapshot
    assert_eq!(f.eval(&t(vec![1.0])).unwrap().first().unwrap(), 2.0);
}

#[test]
fn test_snapshot_restore_bracketing() {
    let mut env = Environment::new();
    env.set_constants(constants![c = 1.0, k = 4.0]);
    let f = env.new_function("c + k", Some("f")).unwrap();

    let saved = env.constants_snapshot();
    env.set_constants(constants![c = 99.0]);
    assert_eq!(f.eval(&t(vec![0.0])).unwrap().first().unwrap(), 103.0);

    env.restore_constants(saved);
    assert_eq!(f.eval(&t(vec![0.0])).unwrap().first().unwrap(), 5.0);
}

#[test]
fn test_t_argument_shadows_constant_named_t() {
    let mut env = Environment::new();
    env.set_constants(constants![t = 100.0]);
    let f = env.new_function("2*t", Some("f")).unwrap();

    let result = f.eval(&t(vec![1.0, 2.0])).unwrap();
    assert_eq!(
        result,
        Value::Vector(DVector::from_vec(vec![2.0, 4.0]))
    );
}

#[test]
fn test_standalone_function_is_isolated() {
    let f = Func::with_constants("g*t", constants![g = 9.81]).unwrap();
    let result = f.eval(&t(vec![2.0])).unwrap();
    assert_relative_eq!(result.first().unwrap(), 19.62, epsilon = 1e-12);

    assert_eq!(f.free_variables(), vec!["g", "t"]);
}

#[test]
fn test_from_store_copy_construction() {
    let mut env = Environment::new();
    env.set_constants(constants![a = 1.0]);

    let mut copy = Environment::from_store(&env.constants_snapshot());
    copy.set_constants(constants![a = 2.0]);

    // the copy does not share the original's store
    assert_eq!(
        env.get_constants().borrow().get("a"),
        Some(&ConstValue::Scalar(1.0))
    );
    let f = copy.new_function("a", Some("f")).unwrap();
    assert_eq!(f.eval(&t(vec![0.0])).unwrap().first().unwrap(), 2.0);
}

#[test]
fn test_insertion_order_survives_update() {
    let mut env = Environment::new();
    env.set_constants(constants![a = 1.0, b = "2*a"]);
    // updating a keeps it ahead of b, so b still resolves
    env.set_constants(constants![a = 3.0]);
    let f = env.new_function("b", Some("f")).unwrap();
    assert_eq!(f.eval(&t(vec![0.0])).unwrap().first().unwrap(), 6.0);
}
