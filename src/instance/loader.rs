//! TSPLIB reader.
//!
//! Two data conventions are accepted and told apart by their section
//! marker, never by guessing from the numbers:
//!
//! - `NODE_COORD_SECTION` with `EDGE_WEIGHT_TYPE: EUC_2D`
//! - `EDGE_WEIGHT_SECTION` with `EDGE_WEIGHT_TYPE: EXPLICIT` and one of the
//!   `EDGE_WEIGHT_FORMAT`s in [`WeightFormat`]
//!
//! # Reference
//!
//! Reinelt, G. (1991). "TSPLIB—A Traveling Salesman Problem Library",
//! *ORSA Journal on Computing* 3(4), 376-384.

use std::path::Path;

use super::types::{Instance, Point};
use crate::error::{TspError, TspResult};

/// Layout of the values in an `EDGE_WEIGHT_SECTION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightFormat {
    FullMatrix,
    UpperRow,
    LowerRow,
    UpperDiagRow,
    LowerDiagRow,
}

impl WeightFormat {
    fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "FULL_MATRIX" => Some(WeightFormat::FullMatrix),
            "UPPER_ROW" => Some(WeightFormat::UpperRow),
            "LOWER_ROW" => Some(WeightFormat::LowerRow),
            "UPPER_DIAG_ROW" => Some(WeightFormat::UpperDiagRow),
            "LOWER_DIAG_ROW" => Some(WeightFormat::LowerDiagRow),
            _ => None,
        }
    }

    /// Number of values the section holds for `n` nodes, `None` on overflow.
    pub fn value_count(self, n: usize) -> Option<usize> {
        match self {
            WeightFormat::FullMatrix => n.checked_mul(n),
            WeightFormat::UpperRow | WeightFormat::LowerRow => {
                n.checked_mul(n.saturating_sub(1)).map(|v| v / 2)
            }
            WeightFormat::UpperDiagRow | WeightFormat::LowerDiagRow => {
                n.checked_mul(n.checked_add(1)?).map(|v| v / 2)
            }
        }
    }

    /// Expands the section values into a row-major `n x n` matrix.
    fn expand(self, n: usize, values: &[f64]) -> Vec<f64> {
        if self == WeightFormat::FullMatrix {
            return values.to_vec();
        }
        let mut matrix = vec![0.0; n * n];
        let mut it = values.iter().copied();
        for i in 0..n {
            let cols = match self {
                WeightFormat::UpperRow => (i + 1)..n,
                WeightFormat::LowerRow => 0..i,
                WeightFormat::UpperDiagRow => i..n,
                WeightFormat::LowerDiagRow => 0..(i + 1),
                WeightFormat::FullMatrix => unreachable!(),
            };
            for j in cols {
                let w = it.next().unwrap_or(0.0);
                matrix[i * n + j] = w;
                matrix[j * n + i] = w;
            }
        }
        matrix
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WeightType {
    Euc2d,
    Explicit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Coords,
    Weights,
    /// A section whose content is not needed (e.g. `DISPLAY_DATA_SECTION`).
    Skipped,
}

#[derive(Default)]
struct Header {
    name: Option<String>,
    dimension: Option<usize>,
    weight_type: Option<WeightType>,
    weight_format: Option<WeightFormat>,
}

impl Instance {
    /// Reads a TSPLIB file.
    ///
    /// The instance is named after the `NAME` entry, or the file stem when
    /// the entry is absent.
    pub fn from_file(path: impl AsRef<Path>) -> TspResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TspError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "instance".to_string());
        tracing::debug!(path = %path.display(), bytes = text.len(), "read instance file");
        Self::parse(&stem, &text)
    }

    /// Parses TSPLIB text. `fallback_name` is used when there is no `NAME`.
    pub fn parse(fallback_name: &str, text: &str) -> TspResult<Self> {
        let mut header = Header::default();
        let mut section = Section::Header;
        let mut coords: Vec<Option<Point>> = Vec::new();
        let mut weights: Vec<f64> = Vec::new();
        let mut saw_coords = false;
        let mut saw_weights = false;
        let mut last_line = 0;
        let total_lines = text.lines().count();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            last_line = line_no;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let starts_with_keyword = line
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic());

            if !starts_with_keyword {
                match section {
                    Section::Coords => read_coord_line(line, line_no, &mut coords)?,
                    Section::Weights => read_weight_line(line, line_no, &mut weights)?,
                    Section::Skipped => {}
                    Section::Header => {
                        return Err(TspError::parse(line_no, "data outside of a section"));
                    }
                }
                continue;
            }

            let (key, value) = split_entry(line);
            match key {
                "EOF" => break,
                "NODE_COORD_SECTION" => {
                    let n = require_dimension(&header, line_no, key)?;
                    if saw_coords {
                        return Err(TspError::parse(line_no, "duplicate NODE_COORD_SECTION"));
                    }
                    saw_coords = true;
                    // Every node needs its own line.
                    if n > total_lines - line_no {
                        return Err(TspError::parse(
                            line_no,
                            format!(
                                "DIMENSION {n} exceeds the {} lines after NODE_COORD_SECTION",
                                total_lines - line_no
                            ),
                        ));
                    }
                    coords = vec![None; n];
                    section = Section::Coords;
                }
                "EDGE_WEIGHT_SECTION" => {
                    require_dimension(&header, line_no, key)?;
                    if saw_weights {
                        return Err(TspError::parse(line_no, "duplicate EDGE_WEIGHT_SECTION"));
                    }
                    saw_weights = true;
                    section = Section::Weights;
                }
                "DISPLAY_DATA_SECTION" | "FIXED_EDGES_SECTION" | "TOUR_SECTION" => {
                    section = Section::Skipped;
                }
                _ => {
                    section = Section::Header;
                    read_header_entry(&mut header, key, value, line_no)?;
                }
            }
        }

        let name = header
            .name
            .clone()
            .unwrap_or_else(|| fallback_name.to_string());
        let n = header
            .dimension
            .ok_or_else(|| TspError::parse(last_line, "missing DIMENSION"))?;

        match (saw_coords, saw_weights) {
            (true, true) => Err(TspError::parse(
                0,
                "both NODE_COORD_SECTION and EDGE_WEIGHT_SECTION present",
            )),
            (false, false) => Err(TspError::parse(last_line, "no node data section found")),
            (true, false) => {
                match header.weight_type {
                    Some(WeightType::Euc2d) | None => {}
                    Some(WeightType::Explicit) => {
                        return Err(TspError::parse(
                            0,
                            "EDGE_WEIGHT_TYPE EXPLICIT requires an EDGE_WEIGHT_SECTION",
                        ));
                    }
                }
                let points = coords
                    .into_iter()
                    .enumerate()
                    .map(|(i, p)| {
                        p.ok_or_else(|| {
                            TspError::parse(0, format!("missing coordinates for node {}", i + 1))
                        })
                    })
                    .collect::<TspResult<Vec<_>>>()?;
                Instance::from_points(name, points)
            }
            (false, true) => {
                if header.weight_type != Some(WeightType::Explicit) {
                    return Err(TspError::parse(
                        0,
                        "EDGE_WEIGHT_SECTION requires EDGE_WEIGHT_TYPE EXPLICIT",
                    ));
                }
                let format = header.weight_format.unwrap_or(WeightFormat::FullMatrix);
                let expected = format.value_count(n);
                if expected != Some(weights.len()) {
                    let needs = expected.map_or_else(|| "too many".to_string(), |c| c.to_string());
                    return Err(TspError::parse(
                        0,
                        format!(
                            "EDGE_WEIGHT_SECTION holds {} values, {:?} with DIMENSION {} needs {}",
                            weights.len(),
                            format,
                            n,
                            needs
                        ),
                    ));
                }
                Instance::from_matrix(name, n, format.expand(n, &weights))
            }
        }
    }
}

/// Splits `KEY : VALUE`, `KEY: VALUE` and bare `KEY` lines.
fn split_entry(line: &str) -> (&str, &str) {
    match line.split_once(':') {
        Some((k, v)) => (k.trim(), v.trim()),
        None => match line.split_once(char::is_whitespace) {
            Some((k, v)) => (k.trim(), v.trim()),
            None => (line, ""),
        },
    }
}

fn read_header_entry(header: &mut Header, key: &str, value: &str, line_no: usize) -> TspResult<()> {
    match key {
        "NAME" => header.name = Some(value.to_string()),
        "TYPE" => {
            if value != "TSP" {
                return Err(TspError::parse(
                    line_no,
                    format!("only TSP files are accepted, got TYPE {value}"),
                ));
            }
        }
        "DIMENSION" => {
            if header.dimension.is_some() {
                return Err(TspError::parse(line_no, "two DIMENSION entries in the file"));
            }
            let n: usize = value.parse().map_err(|_| {
                TspError::parse(line_no, format!("DIMENSION is not a number: {value:?}"))
            })?;
            if n < 2 {
                return Err(TspError::parse(line_no, format!("DIMENSION must be at least 2, got {n}")));
            }
            header.dimension = Some(n);
        }
        "EDGE_WEIGHT_TYPE" => {
            header.weight_type = Some(match value {
                "EUC_2D" => WeightType::Euc2d,
                "EXPLICIT" => WeightType::Explicit,
                other => {
                    return Err(TspError::parse(
                        line_no,
                        format!("unsupported EDGE_WEIGHT_TYPE {other}"),
                    ));
                }
            });
        }
        "EDGE_WEIGHT_FORMAT" => {
            header.weight_format = Some(WeightFormat::from_keyword(value).ok_or_else(|| {
                TspError::parse(line_no, format!("unsupported EDGE_WEIGHT_FORMAT {value}"))
            })?);
        }
        other => {
            tracing::trace!(key = other, line = line_no, "ignoring header entry");
        }
    }
    Ok(())
}

fn require_dimension(header: &Header, line_no: usize, section: &str) -> TspResult<usize> {
    header
        .dimension
        .ok_or_else(|| TspError::parse(line_no, format!("{section} before DIMENSION")))
}

fn parse_number(token: &str, line_no: usize) -> TspResult<f64> {
    token
        .parse::<f64>()
        .map_err(|_| TspError::parse(line_no, format!("not a number: {token:?}")))
}

fn read_coord_line(line: &str, line_no: usize, coords: &mut [Option<Point>]) -> TspResult<()> {
    let mut tokens = line.split_whitespace();
    let (Some(id), Some(x), Some(y)) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(TspError::parse(line_no, "expected `id x y`"));
    };
    if tokens.next().is_some() {
        return Err(TspError::parse(line_no, "too many values on coordinate line"));
    }
    let id: usize = id
        .parse()
        .map_err(|_| TspError::parse(line_no, format!("node id is not an integer: {id:?}")))?;
    if id == 0 || id > coords.len() {
        return Err(TspError::parse(
            line_no,
            format!("node id {id} outside 1..={}", coords.len()),
        ));
    }
    let slot = &mut coords[id - 1];
    if slot.is_some() {
        return Err(TspError::parse(line_no, format!("node {id} listed twice")));
    }
    *slot = Some(Point::new(parse_number(x, line_no)?, parse_number(y, line_no)?));
    Ok(())
}

fn read_weight_line(line: &str, line_no: usize, weights: &mut Vec<f64>) -> TspResult<()> {
    for token in line.split_whitespace() {
        weights.push(parse_number(token, line_no)?);
    }
    Ok(())
}
