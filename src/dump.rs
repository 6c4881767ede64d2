//! Raw little-endian `f32` dumps.
//!
//! A dump is nothing but consecutive 4-byte little-endian floats: no header,
//! no length prefix. Readers must know the row width to rebuild a matrix.

use crate::error::{KMeansError, Result};
use memmap2::Mmap;
use ndarray::Array2;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::mem;
use std::path::Path;
use tracing::debug;
use zerocopy::byteorder::little_endian::F32;
use zerocopy::{FromBytes, IntoBytes};

/// Writes `values` to `path`, replacing any existing file.
pub fn write_f32_dump(path: impl AsRef<Path>, values: &[f32]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let encoded: Vec<F32> = values.iter().map(|&v| F32::new(v)).collect();
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(encoded.as_bytes())?;
    writer.flush()?;

    debug!("Wrote {} floats to {:?}", values.len(), path);
    Ok(())
}

/// Reads every float stored in `path`.
pub fn read_f32_dump(path: impl AsRef<Path>) -> Result<Vec<f32>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let len = file.metadata()?.len() as usize;
    if len == 0 {
        return Ok(Vec::new());
    }
    if len % mem::size_of::<F32>() != 0 {
        return Err(KMeansError::MalformedDump {
            path: path.to_path_buf(),
            len,
        });
    }

    let mmap = unsafe { Mmap::map(&file)? };
    let floats = <[F32]>::ref_from_bytes(&mmap[..]).map_err(|_| KMeansError::MalformedDump {
        path: path.to_path_buf(),
        len,
    })?;

    Ok(floats.iter().map(|v| v.get()).collect())
}

/// Reads a dump as a matrix with `n_cols` values per row.
pub fn read_matrix_dump(path: impl AsRef<Path>, n_cols: usize) -> Result<Array2<f32>> {
    let path = path.as_ref();
    let values = read_f32_dump(path)?;
    if n_cols == 0 || values.len() % n_cols != 0 {
        return Err(KMeansError::MalformedDump {
            path: path.to_path_buf(),
            len: values.len() * mem::size_of::<f32>(),
        });
    }
    let n_rows = values.len() / n_cols;
    Array2::from_shape_vec((n_rows, n_cols), values).map_err(|_| KMeansError::MalformedDump {
        path: path.to_path_buf(),
        len: n_rows * n_cols * mem::size_of::<f32>(),
    })
}
