pub mod pid;

pub use pid::{GainSet, PidOutput};
