use crate::error::SolverResult;
use crate::expr::{self, Expr};
use crate::io::param_parser::SolverParamParser;
use crate::solver::SolverParameters;

/// Coefficient callables compiled from the parameter-file expressions.
pub struct CoefficientSet {
    pub diffusion: Expr,
    pub reaction: Expr,
    pub source: Expr,
}

pub fn initialize_coefficients(parser: &SolverParamParser) -> SolverResult<CoefficientSet> {
    Ok(CoefficientSet {
        diffusion: expr::compile(&parser.a_expr)?,
        reaction: expr::compile(&parser.c_expr)?,
        source: expr::compile(&parser.q_expr)?,
    })
}

pub fn initialize_solver_params(parser: &SolverParamParser) -> SolverParameters {
    SolverParameters {
        length: parser.length,
        elem_num: parser.elem_num,
        essential_value: parser.u0,
        flux_value: parser.q0,
        flux_encoding: parser.flux_encoding,
    }
}
