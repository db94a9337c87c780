//! # Engine Configuration
//!
//! Runtime settings read from a JSON file. Every field has a default, so an
//! empty object (or no file at all) gives a working configuration.
//!
//! ```json
//! {
//!     "world": { "generation_method": "random", "seed": 42, "radius": 2, "fill_block": "glass" },
//!     "num_workers": 4,
//!     "mesh_cache_capacity": 2048
//! }
//! ```

use std::{env, fs, path::Path, thread};

use log::info;
use serde::Deserialize;

use crate::{
    error::{EngineError, EngineResult},
    meshing::DEFAULT_MESH_CACHE_CAPACITY,
    voxels::{
        block::block_type::BlockType,
        world::{ChunkGenerationMethod, ChunkGenerator},
    },
};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "VOXEL_MESHER_CONFIG";

/// Largest accepted world radius, in chunks.
pub const MAX_WORLD_RADIUS: u32 = 16;

/// How the demo world is generated.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Generator used for every chunk
    pub generation_method: ChunkGenerationMethod,
    /// Seed for the noise and random generators
    pub seed: u32,
    /// Chunks generated in each direction from the origin
    pub radius: u32,
    /// Block name used by the solid and checkerboard generators
    pub fill_block: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            generation_method: ChunkGenerationMethod::default(),
            seed: 0,
            radius: 2,
            fill_block: "stone".to_string(),
        }
    }
}

impl WorldConfig {
    /// Number of chunks in the generated region, `(2r+1)^3`.
    pub fn chunk_count(&self) -> usize {
        let side = 2 * self.radius as usize + 1;
        side * side * side
    }

    /// Resolves the configuration into a chunk generator.
    ///
    /// # Errors
    /// [`EngineError::InvalidConfig`] if `fill_block` names no block type
    pub fn generator(&self) -> EngineResult<ChunkGenerator> {
        let fill_block = BlockType::from_name(&self.fill_block).ok_or_else(|| {
            EngineError::InvalidConfig(format!("unknown block type {:?}", self.fill_block))
        })?;

        Ok(ChunkGenerator {
            method: self.generation_method,
            seed: self.seed,
            fill_block,
        })
    }
}

/// Top-level engine settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Demo world generation
    pub world: WorldConfig,
    /// Size of the mesh worker pool
    pub num_workers: usize,
    /// Maximum number of chunk meshes retained
    pub mesh_cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            world: WorldConfig::default(),
            num_workers: thread::available_parallelism().map_or(1, |n| n.get()),
            mesh_cache_capacity: DEFAULT_MESH_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded configuration from {}", path.display());
        Self::from_json_str(&json)
    }

    /// Loads the file named by `VOXEL_MESHER_CONFIG`, or the defaults if it is unset.
    pub fn from_env() -> EngineResult<Self> {
        match env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::load(path),
            None => {
                info!("{} not set, using default configuration", CONFIG_PATH_ENV);
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Checks that the configuration can be run.
    ///
    /// # Errors
    /// [`EngineError::InvalidConfig`] naming the first offending field
    pub fn validate(&self) -> EngineResult<()> {
        if self.num_workers == 0 {
            return Err(EngineError::InvalidConfig(
                "num_workers must be at least 1".to_string(),
            ));
        }
        if self.mesh_cache_capacity == 0 {
            return Err(EngineError::InvalidConfig(
                "mesh_cache_capacity must be at least 1".to_string(),
            ));
        }
        if self.world.radius > MAX_WORLD_RADIUS {
            return Err(EngineError::InvalidConfig(format!(
                "world.radius must be at most {MAX_WORLD_RADIUS}, got {}",
                self.world.radius
            )));
        }
        if self.mesh_cache_capacity < self.world.chunk_count() {
            return Err(EngineError::InvalidConfig(format!(
                "mesh_cache_capacity {} cannot hold the {} chunks of a radius {} world",
                self.mesh_cache_capacity,
                self.world.chunk_count(),
                self.world.radius
            )));
        }
        self.world.generator()?;
        Ok(())
    }
}
