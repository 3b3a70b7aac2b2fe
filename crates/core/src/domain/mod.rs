pub mod contract;
pub mod insight;
pub mod trend;
