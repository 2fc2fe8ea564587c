//! Fixed-grid RK4 integration and a wrapper for the linear second-order
//! equation `a*x'' + b*x' + c*x = d*f(t)`.

use nalgebra::{DMatrix, DVector};

/// Classic fourth-order Runge-Kutta over the supplied time grid. The state is
/// the pair `(x, x')`; the result matrix has one row per sample, column 0
/// holding `x` and column 1 holding `x'`.
pub fn integrate<F>(f: F, y0: (f64, f64), t: &DVector<f64>) -> DMatrix<f64>
where
    F: Fn(f64, (f64, f64)) -> (f64, f64),
{
    let n = t.len();
    let mut result = DMatrix::zeros(n, 2);
    let (mut x, mut v) = y0;
    if n > 0 {
        result[(0, 0)] = x;
        result[(0, 1)] = v;
    }
    for i in 1..n {
        let ti = t[i - 1];
        let h = t[i] - ti;

        let (k1x, k1v) = f(ti, (x, v));
        let (k2x, k2v) = f(ti + h / 2.0, (x + h / 2.0 * k1x, v + h / 2.0 * k1v));
        let (k3x, k3v) = f(ti + h / 2.0, (x + h / 2.0 * k2x, v + h / 2.0 * k2v));
        let (k4x, k4v) = f(ti + h, (x + h * k3x, v + h * k3v));

        x += h / 6.0 * (k1x + 2.0 * k2x + 2.0 * k3x + k4x);
        v += h / 6.0 * (k1v + 2.0 * k2v + 2.0 * k3v + k4v);
        result[(i, 0)] = x;
        result[(i, 1)] = v;
    }
    result
}

/// Right-hand side forcing of the equation.
pub enum Forcing {
    Constant(f64),
    TimeDependent(Box<dyn Fn(f64) -> f64>),
}

impl Forcing {
    pub fn at(&self, t: f64) -> f64 {
        match self {
            Forcing::Constant(value) => *value,
            Forcing::TimeDependent(f) => f(t),
        }
    }
}

/// The linear second-order initial value problem
/// `a*x'' + b*x' + c*x = d*f(t)`, `x(0) = x0`, `x'(0) = x_dot0`.
pub struct ODE2 {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub x0: f64,
    pub x_dot0: f64,
    pub f: Forcing,
}

impl ODE2 {
    pub fn new(a: f64, b: f64, c: f64, d: f64, x0: f64, x_dot0: f64) -> Self {
        ODE2 {
            a,
            b,
            c,
            d,
            x0,
            x_dot0,
            f: Forcing::Constant(1.0),
        }
    }

    pub fn with_forcing(mut self, f: impl Fn(f64) -> f64 + 'static) -> Self {
        self.f = Forcing::TimeDependent(Box::new(f));
        self
    }

    /// First-order form of the equation, `(x', v')`.
    fn ddot_x(&self, t: f64, state: (f64, f64)) -> (f64, f64) {
        let (x, v) = state;
        let acceleration =
            -(self.b / self.a) * v - (self.c / self.a) * x + self.d * self.f.at(t) / self.a;
        (v, acceleration)
    }

    /// Integrates over `t` and returns the displacement and velocity vectors.
    pub fn solve(&self, t: &DVector<f64>) -> (DVector<f64>, DVector<f64>) {
        let trajectory = integrate(|t, state| self.ddot_x(t, state), (self.x0, self.x_dot0), t);
        (
            trajectory.column(0).into_owned(),
            trajectory.column(1).into_owned(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::utils::linspace;
    use approx::assert_relative_eq;

    #[test]
    fn test_harmonic_oscillator_matches_cosine() {
        // x'' + x = 0, x(0) = 1, x'(0) = 0 has solution cos(t)
        let ode = ODE2 {
            a: 1.0,
            b: 0.0,
            c: 1.0,
            d: 0.0,
            x0: 1.0,
            x_dot0: 0.0,
            f: Forcing::Constant(0.0),
        };
        let t = DVector::from_vec(linspace(0.0, 2.0 * std::f64::consts::PI, 2001));
        let (x, v) = ode.solve(&t);
        for (i, &ti) in t.iter().enumerate() {
            assert_relative_eq!(x[i], ti.cos(), epsilon = 1e-6);
            assert_relative_eq!(v[i], -ti.sin(), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_constant_forcing() {
        // x'' + x = 1, x(0) = 0, x'(0) = 0 has solution 1 - cos(t)
        let ode = ODE2::new(1.0, 0.0, 1.0, 1.0, 0.0, 0.0);
        let t = DVector::from_vec(linspace(0.0, 5.0, 2001));
        let (x, _) = ode.solve(&t);
        for (i, &ti) in t.iter().enumerate() {
            assert_relative_eq!(x[i], 1.0 - ti.cos(), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_time_dependent_forcing_builder() {
        let ode = ODE2::new(1.0, 0.0, 1.0, 1.0, 0.0, 0.0).with_forcing(|t| t.cos());
        assert_relative_eq!(ode.f.at(0.0), 1.0);
        assert_relative_eq!(ode.f.at(std::f64::consts::PI), -1.0);
    }
}
