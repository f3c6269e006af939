//! Crash consistency testing for the file backend.
//!
//! A replace writes `<file>.temp`, syncs it, and renames it over the
//! destination. This module reproduces the on-disk state a crash leaves
//! behind at each step, then reopens the database and checks that it sees
//! exactly one complete collection: the old one or the new one.
//!
//! ## Usage
//!
//! ```rust
//! use algoedb_testkit::crash::{CrashPoint, CrashRecoveryHarness};
//! use algoedb_core::record;
//!
//! let harness = CrashRecoveryHarness::new().unwrap();
//! let before = vec![record! { "v" => 1 }];
//! let after = vec![record! { "v" => 2 }];
//!
//! for point in CrashPoint::ALL {
//!     let result = harness.run(point, &before, &after);
//!     assert!(result.passed, "{result:?}");
//! }
//! ```

use algoedb_codec::{to_json, Record};
use algoedb_core::Database;
use algoedb_storage::temp_path_for;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Points at which a crash can be simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashPoint {
    /// Crash while the temporary file was half written.
    DuringTempWrite,
    /// Crash after the temporary file was complete but before the rename.
    BeforeRename,
    /// Crash right after the rename.
    AfterRename,
}

impl CrashPoint {
    /// Every crash point, in write order.
    pub const ALL: [CrashPoint; 3] = [
        CrashPoint::DuringTempWrite,
        CrashPoint::BeforeRename,
        CrashPoint::AfterRename,
    ];

    /// Whether the new collection must be visible after recovery.
    pub fn expects_new_state(self) -> bool {
        matches!(self, CrashPoint::AfterRename)
    }
}

/// Result of a crash recovery test.
#[derive(Debug, Clone)]
pub struct CrashRecoveryResult {
    /// The simulated crash point.
    pub point: CrashPoint,
    /// Whether the test passed.
    pub passed: bool,
    /// Records expected after recovery.
    pub expected_records: usize,
    /// Records actually loaded after recovery.
    pub actual_records: usize,
    /// Any error message.
    pub error: Option<String>,
}

/// Builds crash states in a private temp directory.
pub struct CrashRecoveryHarness {
    dir: TempDir,
}

impl CrashRecoveryHarness {
    /// Creates a harness with a fresh temp directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Directory holding the simulated files.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    fn file_for(&self, point: CrashPoint) -> PathBuf {
        self.dir().join(format!("{point:?}.json").to_lowercase())
    }

    /// Lays out the files a crash at `point` leaves behind, moving from
    /// `before` to `after`, and returns the destination path.
    ///
    /// # Errors
    ///
    /// Returns an error if the files cannot be written.
    pub fn simulate(
        &self,
        point: CrashPoint,
        before: &[Record],
        after: &[Record],
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = self.file_for(point);
        let temp = temp_path_for(&path)?;
        let old = to_json(before)?;
        let new = to_json(after)?;

        match point {
            CrashPoint::DuringTempWrite => {
                fs::write(&path, &old)?;
                fs::write(&temp, &new[..new.len() / 2])?;
            }
            CrashPoint::BeforeRename => {
                fs::write(&path, &old)?;
                fs::write(&temp, &new)?;
            }
            CrashPoint::AfterRename => {
                fs::write(&path, &new)?;
            }
        }

        Ok(path)
    }

    /// Simulates a crash at `point` and checks recovery.
    pub fn run(&self, point: CrashPoint, before: &[Record], after: &[Record]) -> CrashRecoveryResult {
        let expected = if point.expects_new_state() { after } else { before };
        let mut result = CrashRecoveryResult {
            point,
            passed: false,
            expected_records: expected.len(),
            actual_records: 0,
            error: None,
        };

        let recovered = self
            .simulate(point, before, after)
            .and_then(|path| Ok(Database::open(&path)?));

        match recovered {
            Ok(db) => {
                let records = db.all();
                result.actual_records = records.len();
                result.passed = records == expected;
                if !result.passed {
                    result.error = Some("recovered collection differs from expected".into());
                }
            }
            Err(e) => result.error = Some(e.to_string()),
        }

        result
    }
}
