#![allow(non_snake_case)]
use symsweep::Examples::oscillator_examples::oscillator_examples;
use symsweep::Utils::logger::init_logging;

fn main() {
    init_logging("info");
    let example = 0;
    oscillator_examples(example);
}
