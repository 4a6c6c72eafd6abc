//! Analysis flow: prompt assembly and the controller that runs it.

pub mod controller;
pub mod prompt;

pub use controller::AnalysisController;
