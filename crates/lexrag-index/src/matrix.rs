use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use lexrag_core::types::SparseVector;

/// Compressed sparse row matrix of chunk weight vectors.
///
/// Row `i` occupies `indices[indptr[i]..indptr[i + 1]]` (column ids, strictly
/// increasing) and the matching slice of `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrMatrix {
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

impl CsrMatrix {
    pub fn from_rows(rows: &[SparseVector], n_cols: usize) -> Self {
        let nnz = rows.iter().map(SparseVector::nnz).sum();
        let mut indptr = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::with_capacity(nnz);
        let mut data = Vec::with_capacity(nnz);
        indptr.push(0);
        for row in rows {
            indices.extend_from_slice(&row.indices);
            data.extend_from_slice(&row.values);
            indptr.push(indices.len());
        }
        Self { n_cols, indptr, indices, data }
    }

    pub fn n_rows(&self) -> usize {
        self.indptr.len().saturating_sub(1)
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    pub fn row(&self, i: usize) -> (&[usize], &[f64]) {
        let range = self.indptr[i]..self.indptr[i + 1];
        (&self.indices[range.clone()], &self.data[range])
    }

    pub fn row_norm(&self, i: usize) -> f64 {
        self.row(i).1.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Sparse dot product of row `i` with `v` by merging sorted column ids.
    pub fn dot_row(&self, i: usize, v: &SparseVector) -> f64 {
        let (cols, vals) = self.row(i);
        let (mut a, mut b) = (0, 0);
        let mut sum = 0.0;
        while a < cols.len() && b < v.indices.len() {
            match cols[a].cmp(&v.indices[b]) {
                Ordering::Less => a += 1,
                Ordering::Greater => b += 1,
                Ordering::Equal => {
                    sum += vals[a] * v.values[b];
                    a += 1;
                    b += 1;
                }
            }
        }
        sum
    }

    /// Cosine similarity of `v` against every row, in row order. A zero
    /// vector on either side scores 0.
    pub fn cosine_scores(&self, v: &SparseVector) -> Vec<f64> {
        let query_norm = v.norm();
        (0..self.n_rows())
            .map(|i| {
                let row_norm = self.row_norm(i);
                if query_norm == 0.0 || row_norm == 0.0 {
                    0.0
                } else {
                    self.dot_row(i, v) / (query_norm * row_norm)
                }
            })
            .collect()
    }

    /// Structural consistency of a deserialized matrix.
    pub fn check(&self) -> Result<(), String> {
        if self.indptr.first() != Some(&0) {
            return Err("row pointer must start at 0".to_string());
        }
        if self.indptr.windows(2).any(|w| w[0] > w[1]) {
            return Err("row pointers are not monotonic".to_string());
        }
        if self.indptr.last() != Some(&self.indices.len())
            || self.indices.len() != self.data.len()
        {
            return Err(format!(
                "row pointer end {:?} does not match {} column ids and {} values",
                self.indptr.last(),
                self.indices.len(),
                self.data.len()
            ));
        }
        for i in 0..self.n_rows() {
            let (cols, _) = self.row(i);
            if cols.windows(2).any(|w| w[0] >= w[1]) {
                return Err(format!("row {i} has unsorted column ids"));
            }
            if let Some(&c) = cols.iter().find(|&&c| c >= self.n_cols) {
                return Err(format!("row {i} references column {c} beyond {} columns", self.n_cols));
            }
        }
        Ok(())
    }
}
