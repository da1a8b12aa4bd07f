//! Retrieves information about the version of the engine from Git and the build
//! environment. This information is then written to a file in the output
//! directory and can be accessed at runtime by the engine.

use std::path::Path;
use std::{env, fs, io};

fn generate_file(filename: &str, contents: &str) -> io::Result<()> {
    let out_dir = env::var_os("OUT_DIR")
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "OUT_DIR is not set"))?;
    fs::write(Path::new(&out_dir).join(filename), contents)
}

/// Population count is the hottest instruction of the evaluation.
fn generate_build_info() -> io::Result<()> {
    let features = format!(
        "{}popcnt",
        if cfg!(target_feature = "popcnt") {
            "+"
        } else {
            "-"
        }
    );
    generate_file("features", &features)
}

fn main() -> shadow_rs::SdResult<()> {
    generate_build_info()?;
    shadow_rs::new()
}
