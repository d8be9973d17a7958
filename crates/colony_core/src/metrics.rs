//! Colony metrics snapshots and rotating CSV output.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::effects::{population_capacity, resolve_effects};
use crate::status::critical_count;
use crate::{GameContent, GameSession};

const MAX_ROWS_PER_FILE: usize = 50_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub day: u64,
    pub energy: f64,
    pub food: f64,
    pub oxygen: f64,
    pub morale: f64,
    pub population: f64,
    pub population_capacity: f64,
    pub credits: u64,
    pub modules_built: u32,
    /// Bounded resources currently in the critical band.
    pub critical_resources: u32,
}

pub fn compute_metrics(session: &GameSession, content: &GameContent) -> MetricsSnapshot {
    let colony = &session.colony;
    let effect = resolve_effects(&colony.modules, content);
    MetricsSnapshot {
        day: colony.day,
        energy: colony.energy,
        food: colony.food,
        oxygen: colony.oxygen,
        morale: colony.morale,
        population: colony.population,
        population_capacity: population_capacity(&effect, &content.constants),
        credits: colony.credits,
        modules_built: colony.modules.len() as u32,
        critical_resources: critical_count(colony),
    }
}

pub fn write_metrics_header(writer: &mut impl Write) -> std::io::Result<()> {
    writeln!(
        writer,
        "day,energy,food,oxygen,morale,population,population_capacity,credits,modules_built,critical_resources"
    )
}

pub fn append_metrics_row(
    writer: &mut impl Write,
    snapshot: &MetricsSnapshot,
) -> std::io::Result<()> {
    writeln!(
        writer,
        "{},{:.2},{:.2},{:.2},{:.2},{:.1},{:.1},{},{},{}",
        snapshot.day,
        snapshot.energy,
        snapshot.food,
        snapshot.oxygen,
        snapshot.morale,
        snapshot.population,
        snapshot.population_capacity,
        snapshot.credits,
        snapshot.modules_built,
        snapshot.critical_resources,
    )
}

/// Appends snapshots to `metrics_NNN.csv` files in a run directory, starting a
/// new file every `MAX_ROWS_PER_FILE` rows.
pub struct MetricsFileWriter {
    run_dir: std::path::PathBuf,
    max_rows: usize,
    file_index: u32,
    rows_in_current_file: usize,
    writer: std::io::BufWriter<std::fs::File>,
}

impl MetricsFileWriter {
    pub fn new(run_dir: std::path::PathBuf) -> std::io::Result<Self> {
        Self::with_max_rows(run_dir, MAX_ROWS_PER_FILE)
    }

    /// Like `new`, rotating after `max_rows` rows per file.
    pub fn with_max_rows(run_dir: std::path::PathBuf, max_rows: usize) -> std::io::Result<Self> {
        let writer = open_csv_file(&run_dir, 0)?;
        Ok(Self {
            run_dir,
            max_rows: max_rows.max(1),
            file_index: 0,
            rows_in_current_file: 0,
            writer,
        })
    }

    pub fn write_row(&mut self, snapshot: &MetricsSnapshot) -> std::io::Result<()> {
        if self.rows_in_current_file >= self.max_rows {
            self.writer.flush()?;
            self.file_index += 1;
            self.writer = open_csv_file(&self.run_dir, self.file_index)?;
            self.rows_in_current_file = 0;
        }
        append_metrics_row(&mut self.writer, snapshot)?;
        self.rows_in_current_file += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

fn open_csv_file(
    run_dir: &std::path::Path,
    index: u32,
) -> std::io::Result<std::io::BufWriter<std::fs::File>> {
    let path = run_dir.join(format!("metrics_{index:03}.csv"));
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    write_metrics_header(&mut writer)?;
    Ok(writer)
}
