pub mod encode;
pub mod solve;
pub mod stats;
