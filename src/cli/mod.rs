pub mod commands;
pub mod progress;
pub mod ui;
pub mod util;

pub use progress::StepProgress;
pub use util::CommandContext;
