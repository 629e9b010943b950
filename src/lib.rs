//MIT License
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
pub mod parsing;
pub mod solver;
pub mod symbolic;
pub mod utils;

#[cfg(test)]
mod solver_tests;
