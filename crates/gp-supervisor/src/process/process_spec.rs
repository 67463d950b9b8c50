use std::path::PathBuf;

/// What to launch and how to recognise it once running.
#[derive(Debug, Clone)]
pub struct ProcessSpec {
    pub binary: PathBuf,
    pub args: Vec<String>,
    /// Matched against the OS process name
    pub process_name: String,
    pub dry_run: bool,
}
