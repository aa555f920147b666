mod disc;
mod error;
mod expr;
mod initialization;
mod io;
mod solver;

use std::fs;
use std::path::Path;

use clap::Parser;
use ndarray_stats::QuantileExt;
use tracing::info;

use crate::disc::elliptic1d::Disc1dElliptic;
use crate::error::SolverResult;
use crate::io::param_parser::SolverParamParser;
use crate::io::write_to_csv::write_to_csv;
use crate::solver::Solver;

/// Piecewise-linear FEM solver for -(a(x) u')' + c(x) u = q(x) on [0, L].
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to the JSON parameter file.
    #[arg(default_value = "inputs/solverparam.json")]
    param_file: String,
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    if let Err(err) = run(&cli.param_file) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run(param_file: &str) -> SolverResult<()> {
    let params = SolverParamParser::parse(param_file)?;
    let coefficients = initialization::initialize_coefficients(&params)?;
    let solver_params = initialization::initialize_solver_params(&params);
    info!(
        length = solver_params.length,
        elem_num = solver_params.elem_num,
        "parameters loaded"
    );

    let diffusion = |x: f64| coefficients.diffusion.eval(x);
    let reaction = |x: f64| coefficients.reaction.eval(x);
    let source = |x: f64| coefficients.source.eval(x);
    let disc = Disc1dElliptic::new(&diffusion, &reaction, &source);
    let solution = Solver::new(disc, &solver_params).solve()?;

    println!("{:>4} {:>12} {:>12}", "node", "x", "u");
    for (i, (x, u)) in solution
        .nodes
        .iter()
        .zip(solution.values.iter())
        .enumerate()
    {
        println!("{:>4} {:>12.6} {:>12.6}", i, x, u);
    }
    if let (Ok(min), Ok(max)) = (solution.values.min(), solution.values.max()) {
        println!("min u = {:.6}, max u = {:.6}", min, max);
    }

    if let Some(parent) = Path::new(&params.output_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    write_to_csv(
        solution.nodes.view(),
        solution.values.view(),
        &params.output_path,
    )?;
    info!(path = %params.output_path, "solution written");
    Ok(())
}
