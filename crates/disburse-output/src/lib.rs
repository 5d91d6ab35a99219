//! Output files for transformed payloads and the sinks that deliver them.

pub mod error;
pub mod layout;
pub mod sink;

pub use error::{OutputError, Result};
pub use layout::{
    OutputFile, OutputLayout, output_file_name, output_file_name_at, plan_outputs, plan_outputs_at,
};
pub use sink::{DirectorySink, UploadSink, UploadTarget, check_file_name};
