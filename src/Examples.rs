//! examples of usage of symsweep
/// Driven damped oscillation examples
pub mod oscillator_examples;
