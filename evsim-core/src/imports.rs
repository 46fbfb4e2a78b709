//! Module for crate-local imports to reduce boilerplate in submodules

pub use anyhow::{anyhow, bail, ensure, Context};
pub use log;
pub use ndarray::{array, Array, Array1};
pub use serde::{Deserialize, Serialize};
pub use std::ffi::OsStr;
pub use std::fs::File;
pub use std::path::{Path, PathBuf};

pub use crate::traits::*;
