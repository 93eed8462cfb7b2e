pub mod dashboard;
pub mod rate;
pub mod setup;
pub mod ui;
pub mod update;
