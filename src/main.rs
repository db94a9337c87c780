//! # Voxel Mesher Entry Point
//!
//! Generates a demo world and meshes it, logging face counts and timing.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info VOXEL_MESHER_CONFIG=mesher.json cargo run --release
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    match voxel_mesher::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{error}");
            ExitCode::FAILURE
        }
    }
}
