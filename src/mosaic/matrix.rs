//! Packed identifiers for every cell of a mosaic

use crate::io::error::{MosaicError, Result, file_system};
use ndarray::Array2;
use std::fmt::Write as _;
use std::path::Path;

/// On-disk representation of an identifier matrix
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum MatrixFormat {
    /// Nested JSON array, one inner array per column
    #[default]
    Json,
    /// One line per column, entries separated by spaces
    Text,
}

impl MatrixFormat {
    /// File extension used for this format
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "txt",
        }
    }
}

/// Identifiers indexed by cell `[x][y]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentifierMatrix {
    ids: Array2<u32>,
}

impl IdentifierMatrix {
    /// Matrix of `num_x` by `num_y` zero identifiers
    pub fn zeros(num_x: usize, num_y: usize) -> Self {
        Self {
            ids: Array2::zeros((num_x, num_y)),
        }
    }

    /// Shape as (`num_x`, `num_y`)
    pub fn shape(&self) -> (usize, usize) {
        self.ids.dim()
    }

    /// Identifier at cell (x, y)
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        self.ids.get([x, y]).copied()
    }

    /// Store the identifier for cell (x, y); out-of-range cells are ignored
    pub fn set(&mut self, x: usize, y: usize, identifier: u32) {
        if let Some(slot) = self.ids.get_mut([x, y]) {
            *slot = identifier;
        }
    }

    /// Underlying array
    pub const fn as_array(&self) -> &Array2<u32> {
        &self.ids
    }

    /// Columns as nested vectors, outer index x
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.ids.outer_iter().map(|column| column.to_vec()).collect()
    }

    /// Render as JSON
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_rows())
    }

    /// Render as whitespace-separated text
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for column in self.ids.outer_iter() {
            let line: Vec<String> = column.iter().map(u32::to_string).collect();
            let _ = writeln!(out, "{}", line.join(" "));
        }
        out
    }

    /// Write the matrix to `path` in `format`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - JSON encoding fails
    /// - The parent directory cannot be created
    /// - The file cannot be written
    pub fn save(&self, path: &Path, format: MatrixFormat) -> Result<()> {
        let contents = match format {
            MatrixFormat::Json => self.to_json().map_err(|source| MosaicError::Serialization {
                path: path.to_path_buf(),
                source,
            })?,
            MatrixFormat::Text => self.to_text(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(file_system(parent, "create directory"))?;
        }
        std::fs::write(path, contents).map_err(file_system(path, "write identifiers"))
    }
}
