/// numbered walkthroughs of the chemistry toolkit, run by the `chemic` binary
pub mod chem_examples;
