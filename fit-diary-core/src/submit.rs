//! All-or-nothing submission of the pending batch.

use chrono::NaiveDate;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiError, DiaryApi};
use crate::batch::PendingBatch;

pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

const DIARY_PATH: &str = "/diario";
const DEFAULT_SUCCESS_MESSAGE: &str = "Meals logged successfully.";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SubmitError {
    #[error("Add at least one item before logging.")]
    EmptyBatch,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("The server took too long to respond ({}s). Nothing was logged.", .0.as_secs())]
    Timeout(Duration),
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub submitted: usize,
    pub message: String,
    /// Diary page for the day of the first entry
    pub redirect: String,
    pub date: NaiveDate,
}

/// Diary page path for `date`.
pub fn diary_path(date: NaiveDate) -> String {
    let date = date.format("%Y-%m-%d").to_string();
    format!("{}?date={}", DIARY_PATH, urlencoding::encode(&date))
}

#[derive(Debug, Clone, Copy)]
pub struct BatchSubmitter {
    timeout: Duration,
}

impl Default for BatchSubmitter {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_SUBMIT_TIMEOUT,
        }
    }
}

impl BatchSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends every pending entry in one request.
    ///
    /// The batch is cleared only on success. Any failure, including the
    /// timeout, leaves it exactly as it was so the user can retry.
    pub async fn submit_all<A: DiaryApi + ?Sized>(
        &self,
        api: &A,
        batch: &mut PendingBatch,
    ) -> Result<SubmitOutcome, SubmitError> {
        let Some(first) = batch.entries().first() else {
            return Err(SubmitError::EmptyBatch);
        };
        let date = first.date_consumed;
        let count = batch.len();

        let receipt = match tokio::time::timeout(self.timeout, api.log_batch(batch.entries())).await
        {
            Ok(Ok(receipt)) => receipt,
            Ok(Err(e)) => {
                warn!(count, error = %e, "Batch submission failed");
                return Err(e.into());
            }
            Err(_) => {
                warn!(count, timeout = ?self.timeout, "Batch submission timed out");
                return Err(SubmitError::Timeout(self.timeout));
            }
        };

        batch.clear();
        info!(count, %date, "Batch logged");

        Ok(SubmitOutcome {
            submitted: count,
            message: receipt
                .message
                .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
            redirect: diary_path(date),
            date,
        })
    }
}
