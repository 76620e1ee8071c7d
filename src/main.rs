use chemic::Examples::chem_examples::chem_examples;
use chemic::Utils::logging::init_logging;
use chemic::settings::with_config;

pub fn main() {
    let log_level = with_config(|manager| manager.get_config().log_level.clone());
    init_logging(&log_level);
    // task number is the first argument: 0 formulae and molar masses, 1 molecules,
    // 2 percent composition, 3 empirical/molecular formulae, 4 CAS numbers
    let task: usize = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0);
    chem_examples(task);
}
