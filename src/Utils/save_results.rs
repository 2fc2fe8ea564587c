use csv::Writer;
use nalgebra::DVector;
use std::fs::File;
use std::io::{self, Write};

/// Writes named trajectories over a shared argument mesh as tab-separated
/// text, one row per sample, the mesh in the first column.
pub fn save_columns_to_file(
    filename: &str,
    arg: &str,
    x_mesh: &DVector<f64>,
    columns: &[(&str, &DVector<f64>)],
) -> io::Result<()> {
    let mut file = File::create(filename)?;
    writeln!(file, "{}", header_row(arg, columns).join("\t"))?;
    for i in 0..x_mesh.len() {
        writeln!(file, "{}", data_row(i, x_mesh, columns).join("\t"))?;
    }
    Ok(())
}

/// Same layout as `save_columns_to_file` but proper CSV.
pub fn save_columns_to_csv(
    filename: &str,
    arg: &str,
    x_mesh: &DVector<f64>,
    columns: &[(&str, &DVector<f64>)],
) -> io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);
    writer.write_record(&header_row(arg, columns))?;
    for i in 0..x_mesh.len() {
        writer.write_record(&data_row(i, x_mesh, columns))?;
    }
    writer.flush()?;
    Ok(())
}

fn header_row(arg: &str, columns: &[(&str, &DVector<f64>)]) -> Vec<String> {
    let mut header = vec![arg.to_string()];
    header.extend(columns.iter().map(|(name, _)| name.to_string()));
    header
}

fn data_row(i: usize, x_mesh: &DVector<f64>, columns: &[(&str, &DVector<f64>)]) -> Vec<String> {
    let mut row = vec![x_mesh[i].to_string()];
    row.extend(columns.iter().map(|(_, col)| col[i].to_string()));
    row
}
