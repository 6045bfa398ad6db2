pub mod core;
pub mod decision;
pub mod history;
pub mod preview;
pub mod render;
pub mod runtime;
