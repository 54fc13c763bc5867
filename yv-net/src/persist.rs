//! Model persistence: a safetensors parameter blob plus a JSON architecture
//! meta file, written atomically via tmp + rename. Both artifacts are
//! required to restore a usable instance.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use bytemuck::cast_slice;
use safetensors::tensor::{Dtype, TensorView};
use safetensors::SafeTensors;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::net::Net;
use crate::spec::NetSpec;

/// Bump when the on-disk layout changes.
pub const MODEL_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("safetensors: {0}")]
    Safetensors(#[from] safetensors::SafeTensorError),
    #[error("no persisted model named {name:?}")]
    ModelNotFound { name: String },
    #[error("architecture mismatch: instance {expected}, persisted {found}")]
    ArchMismatch { expected: String, found: String },
}

/// Architecture description stored next to the parameter blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetMeta {
    pub format_version: u32,
    pub spec: NetSpec,
}

fn data_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.safetensors"))
}

fn meta_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.meta.json"))
}

impl Net {
    /// Persist parameters and architecture under `dir/<name>.*`.
    pub fn save(&self, dir: &Path, name: &str) -> Result<(), PersistError> {
        fs::create_dir_all(dir)?;

        let mut tensors: BTreeMap<String, TensorView<'_>> = BTreeMap::new();
        for (i, layer) in self.layers.iter().enumerate() {
            tensors.insert(
                format!("w{i}"),
                TensorView::new(
                    Dtype::F32,
                    vec![layer.outputs, layer.inputs],
                    cast_slice(&layer.w),
                )?,
            );
            tensors.insert(
                format!("b{i}"),
                TensorView::new(Dtype::F32, vec![layer.outputs], cast_slice(&layer.b))?,
            );
        }

        let final_st = data_path(dir, name);
        let tmp_st = final_st.with_extension("safetensors.tmp");
        let st_bytes = safetensors::serialize(&tensors, &None)?;
        fs::write(&tmp_st, st_bytes)?;
        fs::rename(&tmp_st, &final_st)?;

        let meta = NetMeta {
            format_version: MODEL_FORMAT_VERSION,
            spec: self.spec.clone(),
        };
        let final_meta = meta_path(dir, name);
        let tmp_meta = final_meta.with_extension("meta.json.tmp");
        fs::write(&tmp_meta, serde_json::to_vec_pretty(&meta)?)?;
        fs::rename(&tmp_meta, &final_meta)?;
        Ok(())
    }

    /// Restore parameters persisted under `dir/<name>.*` into this instance.
    ///
    /// Fails with `ModelNotFound` if either artifact is missing and with
    /// `ArchMismatch` if the persisted architecture differs from this
    /// instance's. Optimizer state is not persisted; a successful load
    /// resets it.
    pub fn load(&mut self, dir: &Path, name: &str) -> Result<(), PersistError> {
        let meta_file = meta_path(dir, name);
        let data_file = data_path(dir, name);
        if !meta_file.is_file() || !data_file.is_file() {
            return Err(PersistError::ModelNotFound {
                name: name.to_string(),
            });
        }

        let meta: NetMeta = serde_json::from_slice(&fs::read(&meta_file)?)?;
        if meta.format_version != MODEL_FORMAT_VERSION {
            return Err(PersistError::ArchMismatch {
                expected: format!("format v{MODEL_FORMAT_VERSION}"),
                found: format!("format v{}", meta.format_version),
            });
        }
        if meta.spec != self.spec {
            return Err(PersistError::ArchMismatch {
                expected: self.spec.shape_string(),
                found: meta.spec.shape_string(),
            });
        }

        let bytes = fs::read(&data_file)?;
        let st = SafeTensors::deserialize(&bytes)?;

        // Stage everything before touching the live parameters.
        let mut staged: Vec<(Vec<f32>, Vec<f32>)> = Vec::with_capacity(self.layers.len());
        for (i, layer) in self.layers.iter().enumerate() {
            let w = read_f32_tensor(&st, &format!("w{i}"), &[layer.outputs, layer.inputs], self)?;
            let b = read_f32_tensor(&st, &format!("b{i}"), &[layer.outputs], self)?;
            staged.push((w, b));
        }
        for (layer, (w, b)) in self.layers.iter_mut().zip(staged) {
            layer.w = w;
            layer.b = b;
        }
        self.reset_optimizer();
        Ok(())
    }
}

fn read_f32_tensor(
    st: &SafeTensors<'_>,
    name: &str,
    shape: &[usize],
    net: &Net,
) -> Result<Vec<f32>, PersistError> {
    let view = st.tensor(name)?;
    if view.dtype() != Dtype::F32 || view.shape() != shape {
        return Err(PersistError::ArchMismatch {
            expected: net.spec.shape_string(),
            found: format!("tensor {name} of shape {:?}", view.shape()),
        });
    }
    // The blob's byte offsets are not alignment-guaranteed; copy out.
    let data = view.data();
    let mut out = Vec::with_capacity(data.len() / 4);
    for chunk in data.chunks_exact(4) {
        out.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    Ok(out)
}
