use ndarray::Array1;

use crate::error::{SolverError, SolverResult};

/// One linear element, identified by its two endpoint node indices.
#[derive(Debug)]
pub struct Element1d {
    pub inodes: [usize; 2],
}

/// Uniform 1D mesh over `[0, length]` with `elem_num` linear elements and
/// `elem_num + 1` nodes at `x_i = i * length / elem_num`.
#[derive(Debug)]
pub struct Mesh1d {
    pub nodes: Array1<f64>,
    pub elements: Vec<Element1d>,
    pub elem_num: usize,
    /// Constant element length `length / elem_num`.
    pub h: f64,
}

impl Mesh1d {
    pub fn uniform(length: f64, elem_num: usize) -> SolverResult<Self> {
        if !(length > 0.0) {
            return Err(SolverError::InvalidInput {
                context: format!("domain length must be positive, got {}", length),
            });
        }
        if elem_num < 1 {
            return Err(SolverError::InvalidInput {
                context: format!("element count must be at least 1, got {}", elem_num),
            });
        }
        let h = length / elem_num as f64;
        let nodes = Array1::from_iter(
            (0..=elem_num).map(|i| i as f64 * length / elem_num as f64),
        );
        let elements = (0..elem_num)
            .map(|e| Element1d { inodes: [e, e + 1] })
            .collect();
        Ok(Self {
            nodes,
            elements,
            elem_num,
            h,
        })
    }

    pub fn node_num(&self) -> usize {
        self.elem_num + 1
    }
}
