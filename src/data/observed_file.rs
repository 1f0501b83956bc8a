//! Files whose parsed value follows their modification time.
//!
//! An [`ObservedFile`] owns a parser callback and re-runs it whenever the
//! file's mtime advances past the one seen at the previous parse. A parse
//! failure keeps the previously cached value, so readers never lose data
//! to a half-written file. Observation is poll based; nothing watches the
//! file between reads.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::warn;

use crate::core::retry::RetryPolicy;
use crate::data::FileError;

type Parser<T> = Box<dyn Fn(&mut dyn BufRead) -> anyhow::Result<T> + Send + Sync>;

/// A file that is re-parsed when its modification time advances.
pub struct ObservedFile<T> {
    path: PathBuf,
    parser: Parser<T>,
    data: Option<T>,
    modified: Option<SystemTime>,
}

impl<T> ObservedFile<T> {
    /// Creates an observer for `path`. The first access parses the file.
    pub fn new<F>(path: impl Into<PathBuf>, parser: F) -> Self
    where
        F: Fn(&mut dyn BufRead) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Self {
            path: path.into(),
            parser: Box::new(parser),
            data: None,
            modified: None,
        }
    }

    /// Creates an observer and waits up to `timeout` for the file to
    /// appear and parse, sleeping `backoff` (doubling each retry) between
    /// attempts.
    pub fn wait<F>(
        path: impl Into<PathBuf>,
        parser: F,
        timeout: Duration,
        backoff: Duration,
    ) -> Result<Self, FileError>
    where
        F: Fn(&mut dyn BufRead) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let mut observed = Self::new(path, parser);

        if timeout.is_zero() {
            if observed.data().is_ok() {
                return Ok(observed);
            }
            return Err(FileError::NotFound(observed.path));
        }

        let mut policy = RetryPolicy::timed(timeout);
        if !backoff.is_zero() {
            policy = policy.with_backoff(backoff);
        }
        for _remaining in policy.iter() {
            if observed.data().is_ok() {
                return Ok(observed);
            }
        }
        Err(FileError::NotFound(observed.path))
    }

    /// The observed path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parsed value, refreshed if the file changed since last access.
    pub fn data(&mut self) -> Result<&T, FileError> {
        self.refresh()?;
        self.data
            .as_ref()
            .ok_or_else(|| FileError::NotFound(self.path.clone()))
    }

    /// The modification time of the last parsed state.
    pub fn modified_time(&mut self) -> Result<SystemTime, FileError> {
        self.refresh()?;
        self.modified
            .ok_or_else(|| FileError::NotFound(self.path.clone()))
    }

    /// The parsed value together with its modification time.
    pub fn data_and_modified_time(&mut self) -> Result<(&T, SystemTime), FileError> {
        self.refresh()?;
        match (self.data.as_ref(), self.modified) {
            (Some(data), Some(modified)) => Ok((data, modified)),
            _ => Err(FileError::NotFound(self.path.clone())),
        }
    }

    fn refresh(&mut self) -> Result<(), FileError> {
        let modified = match fs::metadata(&self.path).and_then(|meta| meta.modified()) {
            Ok(time) => time,
            // A vanished file keeps serving the cached value.
            Err(_) if self.data.is_some() => return Ok(()),
            Err(_) => return Err(FileError::NotFound(self.path.clone())),
        };

        let advanced = match self.modified {
            Some(previous) => previous < modified,
            None => true,
        };
        if !advanced {
            return Ok(());
        }

        match self.parse() {
            Ok(value) => self.data = Some(value),
            Err(source) => {
                if self.data.is_none() {
                    return Err(FileError::Parse {
                        path: self.path.clone(),
                        source,
                    });
                }
                warn!(path = %self.path.display(), error = %source, "keeping stale data after parse failure");
            }
        }
        // Recorded even on failure so a broken file is not re-parsed
        // until it changes again.
        self.modified = Some(modified);
        Ok(())
    }

    fn parse(&self) -> anyhow::Result<T> {
        let file = fs::File::open(&self.path)?;
        let mut reader = BufReader::new(file);
        (self.parser)(&mut reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn number_parser() -> impl Fn(&mut dyn BufRead) -> anyhow::Result<u32> + Send + Sync + 'static
    {
        |reader: &mut dyn BufRead| {
            let mut text = String::new();
            reader.read_to_string(&mut text)?;
            Ok(text.trim().parse::<u32>()?)
        }
    }

    fn set_mtime(path: &Path, time: SystemTime) {
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(time).unwrap();
    }

    #[test]
    fn parses_on_first_access() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("value.txt");
        fs::write(&path, "41\n").unwrap();

        let mut observed = ObservedFile::new(&path, number_parser());
        assert_eq!(observed.data().unwrap(), &41);
    }

    #[test]
    fn reparses_when_mtime_advances() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("value.txt");
        let t0 = SystemTime::now();

        fs::write(&path, "1").unwrap();
        set_mtime(&path, t0);
        let mut observed = ObservedFile::new(&path, number_parser());
        assert_eq!(observed.data().unwrap(), &1);

        fs::write(&path, "2").unwrap();
        set_mtime(&path, t0 + Duration::from_secs(10));
        assert_eq!(observed.data().unwrap(), &2);
    }

    #[test]
    fn does_not_reparse_unchanged_files() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("value.txt");
        fs::write(&path, "7").unwrap();

        let parses = Arc::new(AtomicUsize::new(0));
        let counter = parses.clone();
        let mut observed = ObservedFile::new(&path, move |reader: &mut dyn BufRead| {
            counter.fetch_add(1, Ordering::SeqCst);
            let mut text = String::new();
            reader.read_to_string(&mut text)?;
            Ok(text.trim().parse::<u32>()?)
        });

        assert_eq!(observed.data().unwrap(), &7);
        assert_eq!(observed.data().unwrap(), &7);
        assert_eq!(parses.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn mtime_regressions_do_not_reparse() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("value.txt");
        let t0 = SystemTime::now();

        fs::write(&path, "5").unwrap();
        set_mtime(&path, t0);
        let mut observed = ObservedFile::new(&path, number_parser());
        assert_eq!(observed.data().unwrap(), &5);

        fs::write(&path, "6").unwrap();
        set_mtime(&path, t0 - Duration::from_secs(10));
        assert_eq!(observed.data().unwrap(), &5);
    }

    #[test]
    fn parse_failure_keeps_the_stale_value() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("value.txt");
        let t0 = SystemTime::now();

        fs::write(&path, "3").unwrap();
        set_mtime(&path, t0);
        let mut observed = ObservedFile::new(&path, number_parser());
        assert_eq!(observed.data().unwrap(), &3);

        fs::write(&path, "not a number").unwrap();
        set_mtime(&path, t0 + Duration::from_secs(10));
        assert_eq!(observed.data().unwrap(), &3);

        // The bad state's mtime is remembered, so a later fix is seen.
        fs::write(&path, "4").unwrap();
        set_mtime(&path, t0 + Duration::from_secs(20));
        assert_eq!(observed.data().unwrap(), &4);
    }

    #[test]
    fn first_parse_failure_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("value.txt");
        fs::write(&path, "garbage").unwrap();

        let mut observed = ObservedFile::new(&path, number_parser());
        assert!(matches!(observed.data(), Err(FileError::Parse { .. })));
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let mut observed = ObservedFile::new(tmp.path().join("absent.txt"), number_parser());

        let err = observed.data().unwrap_err();
        assert!(err.to_string().contains("timed out trying to find"));
    }

    #[test]
    fn vanished_file_keeps_serving_cached_data() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("value.txt");
        fs::write(&path, "9").unwrap();

        let mut observed = ObservedFile::new(&path, number_parser());
        assert_eq!(observed.data().unwrap(), &9);

        fs::remove_file(&path).unwrap();
        assert_eq!(observed.data().unwrap(), &9);
    }

    #[test]
    fn data_and_modified_time_agree() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("value.txt");
        let t0 = SystemTime::now();

        fs::write(&path, "11").unwrap();
        set_mtime(&path, t0);
        let mut observed = ObservedFile::new(&path, number_parser());

        let (data, modified) = observed.data_and_modified_time().unwrap();
        assert_eq!(data, &11);
        assert!(modified >= t0 - Duration::from_secs(1));
    }

    #[test]
    fn wait_returns_once_the_file_appears() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("late.txt");

        let writer_path = path.clone();
        let writer = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            fs::write(&writer_path, "12").unwrap();
        });

        let mut observed = ObservedFile::wait(
            &path,
            number_parser(),
            Duration::from_secs(5),
            Duration::from_millis(10),
        )
        .unwrap();
        assert_eq!(observed.data().unwrap(), &12);
        writer.join().unwrap();
    }

    #[test]
    fn wait_times_out_on_absent_files() {
        let tmp = tempfile::tempdir().unwrap();
        let err = ObservedFile::wait(
            tmp.path().join("never.txt"),
            number_parser(),
            Duration::from_millis(50),
            Duration::from_millis(10),
        )
        .err()
        .unwrap();
        assert!(err.to_string().contains("timed out trying to find"));
    }
}
