pub mod bands;
pub mod chart;
pub mod correction;
pub mod options;
pub mod series;

#[cfg(test)]
#[path = "../../tests/src_inline/model/tests.rs"]
mod tests;
