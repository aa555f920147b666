use std::fs;

use serde::Deserialize;

use crate::disc::boundary::scalar1d::FluxEncoding;
use crate::error::SolverResult;

/// On-disk description of one solve case, read from a JSON parameter file.
#[derive(Deserialize, Debug)]
pub struct SolverParamParser {
    /// Diffusion coefficient a(x), as an expression over x.
    pub a_expr: String,
    /// Reaction coefficient c(x).
    pub c_expr: String,
    /// Source term q(x).
    pub q_expr: String,
    pub length: f64,
    pub elem_num: usize,
    /// Essential boundary value u(0).
    pub u0: f64,
    /// Flux boundary value at x = L.
    pub q0: f64,
    #[serde(default)]
    pub flux_encoding: FluxEncoding,
    #[serde(default = "default_output_path")]
    pub output_path: String,
}

fn default_output_path() -> String {
    "outputs/solution.csv".to_string()
}

impl SolverParamParser {
    pub fn parse(file_path: &str) -> SolverResult<Self> {
        let file_content = fs::read_to_string(file_path)?;
        let param: SolverParamParser = serde_json::from_str(&file_content)?;
        Ok(param)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_a_full_case() {
        let param: SolverParamParser = serde_json::from_str(
            r#"{
                "a_expr": "1 + x",
                "c_expr": "0",
                "q_expr": "sin(x)",
                "length": 2.0,
                "elem_num": 20,
                "u0": 0.0,
                "q0": 1.5,
                "flux_encoding": "normalized_by_diffusion",
                "output_path": "outputs/case.csv"
            }"#,
        )
        .unwrap();
        assert_eq!(param.elem_num, 20);
        assert_eq!(param.flux_encoding, FluxEncoding::NormalizedByDiffusion);
        assert_eq!(param.output_path, "outputs/case.csv");
    }

    #[test]
    fn flux_encoding_and_output_path_have_defaults() {
        let param: SolverParamParser = serde_json::from_str(
            r#"{
                "a_expr": "1",
                "c_expr": "0",
                "q_expr": "1",
                "length": 1.0,
                "elem_num": 10,
                "u0": 0.0,
                "q0": 0.0
            }"#,
        )
        .unwrap();
        assert_eq!(param.flux_encoding, FluxEncoding::Direct);
        assert_eq!(param.output_path, "outputs/solution.csv");
    }
}
