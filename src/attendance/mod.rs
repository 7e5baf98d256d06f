pub mod evaluator;
pub mod geo;
