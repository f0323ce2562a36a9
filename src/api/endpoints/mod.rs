pub mod correlations;
pub mod dashboard;
pub mod health;
pub mod impact;
pub mod timeline;
