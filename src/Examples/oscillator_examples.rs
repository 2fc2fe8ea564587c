#![allow(non_snake_case)]
//! Driven damped oscillation of a block on a spring in a resistive medium,
//! the model `m*x'' + c*x' + k*x = F0*cos(OMEGA_0*t)`.

use crate::constants;
use crate::Utils::plots::Figure;
use crate::Utils::save_results::save_columns_to_csv;
use crate::numerical::finite_diff::dydx;
use crate::numerical::ode2::ODE2;
use crate::symbolic::environment::Environment;
use crate::symbolic::utils::arange;
use nalgebra::DVector;

const X_S: &str =
    "F0*cos(OMEGA_0*t-phi) / sqrt( (m**2)*((OMEGA**2)-(OMEGA_0**2))**2 + (c**2)*(OMEGA_0**2) )";
const V_S: &str =
    "-F0*OMEGA_0*sin(OMEGA_0*t-phi) / sqrt( (m**2)*((OMEGA**2)-(OMEGA_0**2))**2 + (c**2)*(OMEGA_0**2) )";

/// Checks the damping regime of the parameter set. Under-damping needs
/// `(c/2m)^2 < OMEGA^2`, critical damping equality, over-damping `>`; the
/// driving frequency must stay below the resonance frequency.
pub fn validate_damping(case: &str, c: f64, m: f64, k: f64, OMEGA_0: f64) -> Result<(), String> {
    let OMEGA2 = k / m;
    let damping2 = (c / (2.0 * m)).powi(2);
    let OMEGA_R = (OMEGA2 - c.powi(2) / 2.0 / m.powi(2)).abs().sqrt();

    match case {
        "Under-damping" if !(damping2 < OMEGA2) => {
            return Err(format!(
                "not under-damping: (c/2m)^2 = {} must be < OMEGA^2 = {}",
                damping2, OMEGA2
            ));
        }
        "Critical Damping" if (damping2 - OMEGA2).abs() >= f64::EPSILON => {
            return Err(format!(
                "not critical damping: (c/2m)^2 = {} must equal OMEGA^2 = {}",
                damping2, OMEGA2
            ));
        }
        "Over-damping" if !(damping2 > OMEGA2) => {
            return Err(format!(
                "not over-damping: (c/2m)^2 = {} must be > OMEGA^2 = {}",
                damping2, OMEGA2
            ));
        }
        _ => {}
    }
    if !(OMEGA_0 < OMEGA_R) {
        return Err(format!(
            "driving frequency OMEGA_0 ({}) should be below resonance frequency OMEGA_R ({})",
            OMEGA_0, OMEGA_R
        ));
    }
    Ok(())
}

fn oscillator_env() -> Environment {
    let mut env = Environment::named("driven oscillation");
    env.set_constants(constants![
        m = 5.0,
        c = 1.75,
        k = 50.0,
        F0 = 4.0,
        OMEGA_0 = 3.0,
        OMEGA = "sqrt(k/m)",
        phi = "arctan(c * OMEGA_0 / (m * ((OMEGA**2) - (OMEGA_0**2)) ))",
    ]);
    env
}

/// Solves `m*x'' + c*x' + k*x = F0*cos(OMEGA_0*t)` with initial conditions
/// taken from the steady-state functions, brackets the constant changes with
/// a snapshot so the environment leaves in the state it entered.
fn solve_ode2(
    env: &mut Environment,
    m: f64,
    c: f64,
    k: f64,
    F0: f64,
    OMEGA_0: f64,
    time: &DVector<f64>,
) -> (DVector<f64>, DVector<f64>) {
    let saved = env.constants_snapshot();
    env.set_constants(constants![m = m, c = c, k = k, F0 = F0, OMEGA_0 = OMEGA_0]);

    let OMEGA = (k / m).sqrt();
    let PHI = (c * OMEGA_0 / (m * (OMEGA.powi(2) - OMEGA_0.powi(2)))).atan();

    let x_s = env.get_function("x_s").unwrap();
    let v_s = env.get_function("v_s").unwrap();
    let x0 = F0 * PHI.cos() + x_s.eval_at_origin().unwrap();
    let x_dot0 = -F0 * (c / (2.0 * m)) * PHI.cos()
        - F0 * (OMEGA.powi(2) - (c / (2.0 * m)).powi(2)).sqrt() * (-PHI).sin()
        + v_s.eval_at_origin().unwrap();

    let ode = ODE2::new(m, c, k, F0, x0, x_dot0).with_forcing(move |t| (OMEGA_0 * t).cos());
    let (x, v) = ode.solve(time);

    env.restore_constants(saved);
    (x, v)
}

pub fn oscillator_examples(example: usize) {
    match example {
        0 => {
            // SHARED ENVIRONMENT WITH DEPENDENT CONSTANTS
            let mut env = oscillator_env();
            let x_s = env.new_function(X_S, Some("x_s")).unwrap();
            let v_s = env.new_function(V_S, Some("v_s")).unwrap();
            env.print_functions();
            println!("x_s depends on {:?}", x_s.free_variables());

            let t = DVector::from_vec(vec![0.0, 0.5, 1.0]);
            println!("x_s(t) = {:?}", x_s.eval(&t).unwrap());
            println!("v_s(t) = {:?}", v_s.eval(&t).unwrap());

            // a change of the spring constant propagates through OMEGA and phi
            env.set_constants(constants![k = 70.0]);
            println!("after k = 70: x_s(t) = {:?}", x_s.eval(&t).unwrap());
        }
        1 => {
            // UNDER-DAMPING: NUMERIC SOLUTION AGAINST THE STEADY STATE
            let (m, c, k, F0, OMEGA_0) = (5.0, 1.75, 50.0, 4.0, 3.0);
            validate_damping("Under-damping", c, m, k, OMEGA_0).unwrap();

            let mut env = oscillator_env();
            let x_s = env.new_function(X_S, Some("x_s")).unwrap();
            let v_s = env.new_function(V_S, Some("v_s")).unwrap();

            let t = DVector::from_vec(arange(0.0, 60.0, 1e-3));
            let (x, v) = solve_ode2(&mut env, m, c, k, F0, OMEGA_0, &t);

            let x_steady = x_s.eval(&t).unwrap().broadcast_to(t.len()).unwrap();
            let v_steady = v_s.eval(&t).unwrap().broadcast_to(t.len()).unwrap();
            // velocity from finite differences of the displacement
            let v_diff = dydx(&x, &t).unwrap();

            let mut fig_a = Figure::new(1, 1);
            fig_a.add_curve(&t, &x, Some("x(t)"), 1);
            fig_a.add_curve(&t, &x_steady, Some("x_s(t)"), 1);
            fig_a.set_axes_title("Displacement of the block and its steady state", 1);
            fig_a.set_x_label("t");
            fig_a.set_y_label("x(t)");
            fig_a.save_png("displacement.png");

            let mut fig_b = Figure::new(1, 1);
            fig_b.add_curve(&t, &v, Some("v(t)"), 1);
            fig_b.add_curve(&t, &v_diff, Some("dx/dt"), 1);
            fig_b.add_curve(&t, &v_steady, Some("v_s(t)"), 1);
            fig_b.set_axes_title("Velocity of the block and its steady state", 1);
            fig_b.set_x_label("t");
            fig_b.set_y_label("v(t)");
            fig_b.save_png("velocity.png");

            save_columns_to_csv("oscillation.csv", "t", &t, &[("x", &x), ("v", &v)]).unwrap();
        }
        2 => {
            // RESONANCE CURVE: x_s AS A FUNCTION OF THE DRIVING FREQUENCY
            let (m, c, k): (f64, f64, f64) = (5.0, 1.75, 50.0);
            let OMEGA = (k / m).sqrt();
            let OMEGA_R = (OMEGA.powi(2) - c.powi(2) / 2.0 / m.powi(2)).sqrt();

            let mut env = oscillator_env();
            let x_s = env.new_function(X_S, Some("x_s")).unwrap();

            // fix the observation time and free the driving frequency
            let t_obs = 2.0 * std::f64::consts::PI / OMEGA;
            env.set_constants(constants![t = t_obs]);
            env.pop_constants(&["OMEGA_0"]).unwrap();

            let X = DVector::from_vec(arange(0.0, 2.0 * OMEGA_R, 1e-3));
            let t_fixed = DVector::from_element(X.len(), t_obs);

            let mut fig_c = Figure::new(1, 1);
            for i in (5..=75).step_by(5) {
                let c_value = i as f64 / 10.0;
                let amplitude = x_s
                    .eval_with(
                        &t_fixed,
                        &[("OMEGA_0", X.clone().into()), ("c", (c_value).into())],
                    )
                    .unwrap()
                    .broadcast_to(X.len())
                    .unwrap();
                let label = format!("x_s(OMEGA_0) at c = {}", c_value);
                fig_c.add_curve(&X, &amplitude, Some(&label), 1);
            }
            fig_c.set_axes_title(
                "Amplitude of steady-state displacement over driving frequency",
                1,
            );
            fig_c.set_x_label("OMEGA_0");
            fig_c.set_y_label("x_s(OMEGA_0)");
            fig_c.set_x_ticks(
                vec![
                    (0.0, "0".to_string()),
                    (OMEGA_R, "OMEGA_R".to_string()),
                    (2.0 * OMEGA_R, "2 OMEGA_R".to_string()),
                ],
                1,
            );
            fig_c.grid();
            fig_c.save_png("resonance.png");
        }
        _ => println!("no example with number {}", example),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_damping() {
        assert!(validate_damping("Under-damping", 1.75, 5.0, 50.0, 3.0).is_ok());
        assert!(validate_damping("Over-damping", 1.75, 5.0, 50.0, 3.0).is_err());
        // driving frequency above resonance
        assert!(validate_damping("Under-damping", 1.75, 5.0, 50.0, 10.0).is_err());
    }

    #[test]
    fn test_resonance_frequency_below_natural() {
        let (m, c, k): (f64, f64, f64) = (5.0, 1.75, 50.0);
        let OMEGA = (k / m).sqrt();
        let OMEGA_R = (OMEGA.powi(2) - c.powi(2) / 2.0 / m.powi(2)).sqrt();
        assert!(OMEGA_R > 0.0);
        assert!(OMEGA_R < OMEGA);
    }

    #[test]
    fn test_solve_ode2_restores_environment() {
        let mut env = oscillator_env();
        env.new_function(X_S, Some("x_s")).unwrap();
        env.new_function(V_S, Some("v_s")).unwrap();

        let before = env.constants_snapshot();
        let t = DVector::from_vec(arange(0.0, 1.0, 1e-2));
        let _ = solve_ode2(&mut env, 1.0, 0.5, 10.0, 4.0, 2.0, &t);
        assert_eq!(env.constants_snapshot(), before);
    }
}
