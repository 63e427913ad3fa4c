//! Segmentation jobs.
//!
//! [`run_work`] is the boundary callers use: it picks the algorithm, runs it,
//! and turns any fault into a [`WorkStatus::Failed`] outcome instead of an
//! error, the way a stored work record would end up.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::colour::Colourizer;
use crate::error::StatResult;
use crate::extend::ExtendSegmenter;
use crate::pool::WordPool;
use crate::report::AnnotatedResult;
use crate::segment::Segmenter;
use crate::tables::BoundaryTables;

/// Segmentation algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Algorithm {
    /// Boundary scan with head and tail validation.
    #[default]
    Boundary,
    /// Word-extend substring counting.
    Extend,
}

impl Algorithm {
    /// Returns the algorithm as a kebab-case string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Boundary => "boundary",
            Self::Extend => "extend",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of a segmentation job.
///
/// Serialised as `0`, `1` and `2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum WorkStatus {
    /// Still running.
    #[default]
    Pending = 0,
    /// Finished with a result.
    Done = 1,
    /// Finished without a result.
    Failed = 2,
}

impl From<WorkStatus> for u8 {
    fn from(status: WorkStatus) -> Self {
        status as Self
    }
}

impl TryFrom<u8> for WorkStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Done),
            2 => Ok(Self::Failed),
            other => Err(format!("unknown work status {other}")),
        }
    }
}

/// Everything a job needs besides its text and pool.
#[derive(Debug, Clone, Default)]
pub struct SegmentOptions {
    /// Boundary tables.
    pub tables: BoundaryTables,
    /// Bucketing of counts.
    pub colourizer: Colourizer,
    /// Algorithm to run.
    pub algorithm: Algorithm,
}

impl SegmentOptions {
    /// Run the configured algorithm, returning faults as errors.
    pub fn segment(&self, source: &str, pool: &WordPool) -> StatResult<AnnotatedResult> {
        match self.algorithm {
            Algorithm::Boundary => Segmenter::new(pool, &self.tables).run(source, &self.colourizer),
            Algorithm::Extend => {
                Ok(ExtendSegmenter::new(pool, &self.tables).run(source, &self.colourizer))
            }
        }
    }
}

/// Result of one job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOutcome {
    /// Final status.
    pub status: WorkStatus,
    /// Rows and annotated text; present only when `status` is `Done`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<AnnotatedResult>,
}

impl WorkOutcome {
    /// Whether the job produced a result.
    pub fn is_done(&self) -> bool {
        self.status == WorkStatus::Done
    }
}

/// Run one segmentation job.
///
/// Never fails: an internal error is logged and reported as
/// [`WorkStatus::Failed`] with no result.
#[tracing::instrument(skip_all, fields(algorithm = %options.algorithm, pool = pool.len()))]
pub fn run_work(source: &str, pool: &WordPool, options: &SegmentOptions) -> WorkOutcome {
    match options.segment(source, pool) {
        Ok(result) => {
            tracing::info!(
                words = result.rows.len(),
                matches = result.total_matches(),
                "segmentation job done"
            );
            WorkOutcome {
                status: WorkStatus::Done,
                result: Some(result),
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "segmentation job failed");
            WorkOutcome {
                status: WorkStatus::Failed,
                result: None,
            }
        }
    }
}
