/// reading the periodic table dataset from disk
pub mod load_from_file;
/// terminal logger set up by the binary
pub mod logging;
