//! The output tree: headers, source units and the chunk buffer.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use shim_cpp::{header_path, source_path, TypeOutput};
use shim_diagnostic::{FailureLog, Phase, ShimError, TypeFailure};
use shim_ir::TypeName;

use crate::{SerializationConfig, TypeOutcome};

/// Source units appended into one chunk file.
struct Chunk {
    index: usize,
    types: usize,
    text: String,
}

pub(super) struct OutputTree<'a> {
    config: &'a SerializationConfig,
    log: &'a FailureLog,
    chunk: Option<Chunk>,
    source_units: Vec<String>,
    headers_written: usize,
}

impl<'a> OutputTree<'a> {
    /// Clear the header and source directories of an earlier run.
    pub(super) fn prepare(
        config: &'a SerializationConfig,
        log: &'a FailureLog,
    ) -> Result<Self, ShimError> {
        for dir in [config.header_root(), config.source_root()] {
            if dir.exists() {
                tracing::info!(dir = %dir.display(), "removing output of an earlier run");
                fs::remove_dir_all(&dir).map_err(|e| ShimError::io(&dir, e))?;
            }
            fs::create_dir_all(&dir).map_err(|e| ShimError::io(&dir, e))?;
        }
        let chunk = config.one_source_file.then(|| Chunk {
            index: 0,
            types: 0,
            text: String::new(),
        });
        Ok(OutputTree {
            config,
            log,
            chunk,
            source_units: Vec::new(),
            headers_written: 0,
        })
    }

    /// Write the header of one type and place its source unit, if any.
    pub(super) fn write_type(
        &mut self,
        name: &TypeName,
        output: TypeOutput,
    ) -> Result<TypeOutcome, ShimError> {
        let header = format!("{}/{}", self.config.header_dir, header_path(name));
        write_new(&self.config.output_dir.join(&header), &output.header)?;
        self.headers_written += 1;

        let source = match output.source {
            Some(text) => Some(self.place_source(name, &text)?),
            None => None,
        };
        Ok(TypeOutcome::Written { header, source })
    }

    fn place_source(&mut self, name: &TypeName, text: &str) -> Result<String, ShimError> {
        if self.chunk.is_none() {
            let unit = format!("{}/{}", self.config.source_dir, source_path(name));
            write_new(&self.config.output_dir.join(&unit), text)?;
            self.source_units.push(unit.clone());
            return Ok(unit);
        }

        let full = self
            .chunk
            .as_ref()
            .is_some_and(|c| c.types >= self.config.chunk_frequency);
        if full {
            self.flush_chunk();
        }
        let unit = self.chunk_unit();
        if let Some(chunk) = self.chunk.as_mut() {
            if !chunk.text.is_empty() {
                chunk.text.push('\n');
            }
            chunk.text.push_str(text);
            chunk.types += 1;
        }
        Ok(unit)
    }

    fn chunk_unit(&self) -> String {
        let index = self.chunk.as_ref().map_or(0, |c| c.index);
        format!(
            "{}/{}_chunk_{index}.cpp",
            self.config.source_dir, self.config.id
        )
    }

    /// Write the current chunk and start the next. A failed chunk is a
    /// run-level failure and is left out of the unit list.
    fn flush_chunk(&mut self) {
        let unit = self.chunk_unit();
        let Some(chunk) = self.chunk.as_mut() else {
            return;
        };
        if chunk.types == 0 {
            return;
        }
        let text = std::mem::take(&mut chunk.text);
        chunk.index += 1;
        chunk.types = 0;

        match write_new(&self.config.output_dir.join(&unit), &text) {
            Ok(()) => {
                tracing::debug!(%unit, "wrote source chunk");
                self.source_units.push(unit);
            }
            Err(error) => self.log.record(TypeFailure {
                order: None,
                type_name: unit,
                phase: Phase::Write,
                error,
            }),
        }
    }

    /// Flush the last chunk. Returns the source units and header count.
    pub(super) fn finish(mut self) -> (Vec<String>, usize) {
        self.flush_chunk();
        (self.source_units, self.headers_written)
    }
}

/// Create `path` and write `text` to it. An existing file is never
/// replaced, and a failed write leaves no file behind.
pub(super) fn write_new(path: &Path, text: &str) -> Result<(), ShimError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ShimError::io(parent, e))?;
    }
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(ShimError::FileCollision {
                path: PathBuf::from(path),
            });
        }
        Err(e) => return Err(ShimError::io(path, e)),
    };
    if let Err(e) = file.write_all(text.as_bytes()) {
        drop(file);
        let _ = fs::remove_file(path);
        return Err(ShimError::io(path, e));
    }
    Ok(())
}
