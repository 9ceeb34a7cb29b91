use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};

use crate::schema::{position::Position, weight_model::WeightModel};

/// Writes a pretty-printed JSON report to `output`, or to stdout when no path is given.
pub fn write_report<T>(report: &T, output: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize,
{
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create report file: {}", path.display()))?;
            write_json(BufWriter::new(file), report)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => write_json(io::stdout().lock(), report).context("Failed to write report")?,
    }
    Ok(())
}

fn write_json<W, T>(mut writer: W, value: &T) -> anyhow::Result<()>
where
    W: Write,
    T: Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

pub fn read_position_file(path: &Path) -> anyhow::Result<Position> {
    read_json("position", path)
}

pub fn read_weight_model_file(path: &Path) -> anyhow::Result<WeightModel> {
    read_json("weight model", path)
}

fn read_json<T>(file_kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} file: {}", path.display()))
}
