pub mod chart;
pub mod convert;
pub mod pairs;
pub mod setup;
pub mod status;
pub mod ui;
