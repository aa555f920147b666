use ndarray::{ArrayViewMut1, ArrayViewMut2};
use serde::Deserialize;

use crate::error::{SolverError, SolverResult};

/// How the prescribed flux value enters the discrete system at the right
/// boundary node.
///
/// The two encodings found in practice are not numerically interchangeable;
/// the choice is part of the problem definition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FluxEncoding {
    /// Overwrite the last row with the one-sided flux stencil
    /// `[-1/h, 1/h]` and set the last load entry to the flux value itself,
    /// prescribing the discrete derivative at the right boundary.
    #[default]
    Direct,
    /// Pin the last unknown (unit diagonal, zeroed row) and add the flux
    /// divided by the diffusion coefficient at the right boundary to the
    /// assembled load entry.
    NormalizedByDiffusion,
}

/// Boundary data for the scalar 1D problem: an essential value at the left
/// node and a flux value at the right node.
#[derive(Clone, Copy, Debug)]
pub struct BoundarySpec1d {
    /// Prescribed solution value at x = 0.
    pub essential_value: f64,
    /// Prescribed flux-related value at x = L.
    pub flux_value: f64,
    pub flux_encoding: FluxEncoding,
}

impl BoundarySpec1d {
    /// Overwrites the boundary rows of the assembled system in place,
    /// discarding the assembled physics at those rows.
    ///
    /// `diffusion_at_right` is a(L); only the normalized encoding reads it.
    pub fn apply(
        &self,
        mut stiffness: ArrayViewMut2<f64>,
        mut load: ArrayViewMut1<f64>,
        h: f64,
        diffusion_at_right: f64,
    ) -> SolverResult<()> {
        let last = load.len() - 1;

        stiffness.row_mut(0).fill(0.0);
        stiffness[[0, 0]] = 1.0;
        load[0] = self.essential_value;

        match self.flux_encoding {
            FluxEncoding::Direct => {
                stiffness.row_mut(last).fill(0.0);
                stiffness[[last, last - 1]] = -1.0 / h;
                stiffness[[last, last]] = 1.0 / h;
                load[last] = self.flux_value;
            }
            FluxEncoding::NormalizedByDiffusion => {
                if !diffusion_at_right.is_finite() || diffusion_at_right == 0.0 {
                    return Err(SolverError::InvalidInput {
                        context: format!(
                            "cannot normalize the flux by the diffusion coefficient {} at the right boundary",
                            diffusion_at_right
                        ),
                    });
                }
                stiffness.row_mut(last).fill(0.0);
                stiffness[[last, last]] = 1.0;
                load[last] += self.flux_value / diffusion_at_right;
            }
        }
        Ok(())
    }
}
