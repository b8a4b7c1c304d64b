//! Result files: a TSPLIB `TOUR` file per run and, for the metaheuristics,
//! an `iteration,cost` history file.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::runner::RunReport;
use crate::error::{TspError, TspResult};
use crate::instance::Instance;

/// Paths written by [`write_tour_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFiles {
    pub tour: PathBuf,
    pub history: Option<PathBuf>,
}

/// Writes `<stem>_<ALG>.tour` (and `<stem>_<ALG>.dat` for TABU_SEARCH and
/// VNS) under `dir`, creating the directory if needed.
///
/// Node ids in the tour file are 1-based, as TSPLIB expects.
pub fn write_tour_file(report: &RunReport, instance: &Instance, dir: &Path) -> TspResult<WrittenFiles> {
    fs::create_dir_all(dir).map_err(|source| io_error(dir, source))?;
    let base = format!("{}_{}", file_stem(instance.name()), report.algorithm.name());

    let tour_path = dir.join(format!("{base}.tour"));
    write_with(&tour_path, |w| {
        writeln!(w, "NAME : {base}.tour")?;
        writeln!(w, "COMMENT : {}", report.summary_line())?;
        writeln!(w, "TYPE : TOUR")?;
        writeln!(w, "DIMENSION : {}", report.tour.len())?;
        writeln!(w, "TOUR_SECTION")?;
        for &node in report.tour.order() {
            writeln!(w, "{}", node + 1)?;
        }
        writeln!(w, "-1")?;
        writeln!(w, "EOF")
    })?;
    tracing::info!(path = %tour_path.display(), "tour written");

    let history = if report.algorithm.writes_history() {
        let path = dir.join(format!("{base}.dat"));
        write_with(&path, |w| {
            for (iteration, cost) in report.history.iter().enumerate() {
                writeln!(w, "{iteration},{cost:.6}")?;
            }
            Ok(())
        })?;
        tracing::info!(path = %path.display(), "history written");
        Some(path)
    } else {
        None
    };

    Ok(WrittenFiles {
        tour: tour_path,
        history,
    })
}

/// Instance name reduced to characters that are safe in a file name.
fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "instance".to_string()
    } else {
        stem
    }
}

fn write_with(path: &Path, body: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>) -> TspResult<()> {
    let file = File::create(path).map_err(|source| io_error(path, source))?;
    let mut writer = BufWriter::new(file);
    body(&mut writer)
        .and_then(|()| writer.flush())
        .map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: io::Error) -> TspError {
    TspError::Io {
        path: path.to_path_buf(),
        source,
    }
}
