mod runner;

use ctor::ctor;

const STRESS_ITERATIONS_ENV: &str = "HASHFILES_STRESS_ITERATIONS";
const DEFAULT_STRESS_ITERATIONS: usize = 10;

#[ctor]
fn logs() {
    env_logger::init();
}

pub(crate) fn get_stress_iterations_count() -> usize {
    std::env::var(STRESS_ITERATIONS_ENV)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(DEFAULT_STRESS_ITERATIONS)
}
