pub mod args;
pub mod bootstrap;
pub mod config;
pub mod fsops;
pub mod ignore;
pub mod indicator;
pub mod log;
pub mod prompt;
pub mod report;
pub mod target;
pub mod tool;
