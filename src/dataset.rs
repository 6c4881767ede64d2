use crate::error::{KMeansError, Result};
use ndarray::{Array2, ArrayView1};

/// Row-major N x n_dims matrix of input points.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    data: Array2<f32>,
}

impl Dataset {
    /// Builds a dataset from a flat row-major buffer of `n * n_dims` values.
    pub fn from_flat(values: Vec<f32>, n: usize, n_dims: usize) -> Result<Self> {
        if n == 0 {
            return Err(KMeansError::InvalidInput(
                "dataset must contain at least one point".into(),
            ));
        }
        if n_dims == 0 {
            return Err(KMeansError::InvalidInput(
                "points must have at least one dimension".into(),
            ));
        }
        let expected = n.checked_mul(n_dims).ok_or_else(|| {
            KMeansError::InvalidInput(format!("{} x {} overflows usize", n, n_dims))
        })?;
        if values.len() != expected {
            return Err(KMeansError::ShapeMismatch {
                expected: format!("{} values ({} x {})", expected, n, n_dims),
                actual: format!("{} values", values.len()),
            });
        }
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(non_finite(pos / n_dims, pos % n_dims, values[pos]));
        }

        let data = Array2::from_shape_vec((n, n_dims), values).map_err(|e| {
            KMeansError::InvalidInput(format!("cannot shape buffer as {}x{}: {}", n, n_dims, e))
        })?;
        Ok(Dataset { data })
    }

    /// Builds a dataset from one `Vec<f32>` per point.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let n = rows.len();
        let n_dims = rows.first().map(Vec::len).unwrap_or(0);
        let mut flat = Vec::with_capacity(n * n_dims);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_dims {
                return Err(KMeansError::ShapeMismatch {
                    expected: format!("{} coordinates", n_dims),
                    actual: format!("{} coordinates in row {}", row.len(), i),
                });
            }
            flat.extend(row);
        }
        Self::from_flat(flat, n, n_dims)
    }

    /// Wraps an existing matrix, rejecting empty shapes.
    pub fn from_array(data: Array2<f32>) -> Result<Self> {
        let (n, n_dims) = data.dim();
        if n == 0 || n_dims == 0 {
            return Err(KMeansError::InvalidInput(format!(
                "dataset shape {}x{} is empty",
                n, n_dims
            )));
        }
        if let Some(((i, j), &v)) = data.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(non_finite(i, j, v));
        }
        // Dumps rely on standard row-major memory.
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().to_owned()
        };
        Ok(Dataset { data })
    }

    pub fn n_points(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_dims(&self) -> usize {
        self.data.ncols()
    }

    pub fn point(&self, i: usize) -> ArrayView1<'_, f32> {
        self.data.row(i)
    }

    pub fn view(&self) -> &Array2<f32> {
        &self.data
    }

    /// The underlying row-major buffer.
    pub fn as_slice(&self) -> &[f32] {
        // Every constructor stores `data` in standard layout.
        self.data
            .as_slice()
            .expect("dataset is always kept in standard layout")
    }

    pub fn into_inner(self) -> Array2<f32> {
        self.data
    }
}

fn non_finite(row: usize, col: usize, value: f32) -> KMeansError {
    KMeansError::InvalidInput(format!(
        "point {} has non-finite coordinate {} at dimension {}",
        row, value, col
    ))
}
