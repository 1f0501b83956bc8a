//! Line-oriented encrypted file I/O.
//!
//! A writer buffers one encryption token per message and writes them all
//! on [`commit`](EncryptedFileWriter::commit), newline delimited. Tokens
//! held in the buffer are zeroized once written, and again on drop if a
//! commit never happened. The reader decrypts the file line by line.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use zeroize::Zeroize;

use crate::data::FileError;
use crate::security::encryption;
use crate::security::secret::Secret;

/// Buffered writer of encrypted messages.
pub struct EncryptedFileWriter {
    path: PathBuf,
    secret: Secret,
    buffer: Vec<String>,
}

impl EncryptedFileWriter {
    /// Creates a writer targeting `path`. Nothing touches the filesystem
    /// until [`commit`](Self::commit).
    pub fn new(path: impl Into<PathBuf>, secret: Secret) -> Self {
        Self {
            path: path.into(),
            secret,
            buffer: Vec::new(),
        }
    }

    /// The file this writer commits to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of buffered messages.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Encrypts `message` into the buffer.
    pub fn push(&mut self, message: &str) -> Result<(), FileError> {
        let token = encryption::encrypt(&format!("{message}\n"), &self.secret)?;
        self.buffer.push(token);
        Ok(())
    }

    /// Writes every buffered token to the file, one per line, replacing
    /// any previous contents. The buffer is zeroized and cleared.
    pub fn commit(&mut self) -> Result<(), FileError> {
        let file = File::create(&self.path).map_err(|source| FileError::Io {
            path: self.path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        for token in &self.buffer {
            writer
                .write_all(token.as_bytes())
                .and_then(|()| writer.write_all(b"\n"))
                .map_err(|source| FileError::Io {
                    path: self.path.clone(),
                    source,
                })?;
        }
        writer.flush().map_err(|source| FileError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), lines = self.buffer.len(), "committed encrypted file");
        self.clear_buffer();
        Ok(())
    }

    fn clear_buffer(&mut self) {
        for token in &mut self.buffer {
            token.zeroize();
        }
        self.buffer.clear();
    }
}

impl Drop for EncryptedFileWriter {
    fn drop(&mut self) {
        self.clear_buffer();
    }
}

/// Reader of files written by [`EncryptedFileWriter`].
pub struct EncryptedFileReader {
    path: PathBuf,
    secret: Secret,
}

impl EncryptedFileReader {
    /// Creates a reader for `path`.
    pub fn new(path: impl Into<PathBuf>, secret: Secret) -> Self {
        Self {
            path: path.into(),
            secret,
        }
    }

    /// The file this reader decrypts.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the underlying file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Decrypts the file and returns its messages, one per line, trailing
    /// newlines stripped.
    pub fn read(&self) -> Result<Vec<String>, FileError> {
        let file = File::open(&self.path).map_err(|source| FileError::Io {
            path: self.path.clone(),
            source,
        })?;
        let reader = BufReader::new(file);

        let mut messages = Vec::new();
        for line in reader.lines() {
            let token = line.map_err(|source| FileError::Io {
                path: self.path.clone(),
                source,
            })?;
            if token.is_empty() {
                continue;
            }
            let mut message = encryption::decrypt(&token, &self.secret)?;
            while message.ends_with('\n') {
                message.pop();
            }
            messages.push(message);
        }
        Ok(messages)
    }
}
