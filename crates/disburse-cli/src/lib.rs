//! Library side of the `disburse` command: configuration, logging and the
//! pipeline steps the commands are built from.

pub mod config;
pub mod logging;
pub mod pipeline;
