//! CLI command implementations

pub mod audit;
pub mod respond;
pub mod simulate;

use crate::error::{CliError, CliResult};
use incident_types::{Alert, Plan};
use std::io::Read;
use std::path::Path;

/// Read a file, or stdin when the path is `-`
pub(crate) fn read_input(path: &Path) -> CliResult<String> {
    let read = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).map(|_| text)
    } else {
        std::fs::read_to_string(path)
    };

    read.map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn load_alert(path: &Path) -> CliResult<Alert> {
    serde_json::from_str(&read_input(path)?).map_err(CliError::InvalidAlert)
}

pub(crate) fn load_plan(path: &Path) -> CliResult<Plan> {
    Ok(Plan::from_json_str(&read_input(path)?)?)
}
