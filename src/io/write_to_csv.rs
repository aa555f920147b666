use csv::Writer;
use ndarray::ArrayView1;
use serde::Serialize;

#[derive(Serialize)]
struct PointData {
    x: f64,
    solution: f64,
}

/// Writes one `x,solution` record per mesh node.
pub fn write_to_csv(
    nodes: ArrayView1<f64>,
    values: ArrayView1<f64>,
    filename: &str,
) -> Result<(), csv::Error> {
    let mut writer = Writer::from_path(filename)?;
    for (x, solution) in nodes.iter().zip(values.iter()) {
        writer.serialize(PointData {
            x: *x,
            solution: *solution,
        })?;
    }
    writer.flush()?;
    Ok(())
}
