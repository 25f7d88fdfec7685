//! Batch window and hand-off of the rendered report.
//!
//! A report covers a [`DateRange`], normally the previous calendar month.
//! Once rendered, the artifact goes to an [`UploadSink`] and a
//! [`Notification`] pointing at it goes to a [`NotificationSink`]. Neither
//! step can undo the report: failures are logged and returned in the
//! [`DeliveryOutcome`].

use std::fs;
use std::path::PathBuf;

use chrono::{Datelike, Days, NaiveDate};
use thiserror::Error;

use crate::core::Invoice;

/// Errors raised by delivery sinks.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeliveryError {
    #[error("upload failed: {0}")]
    Upload(String),

    #[error("notification failed: {0}")]
    Notification(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Inclusive range of invoice dates covered by one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// `None` if `from` is after `to`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Option<Self> {
        (from <= to).then_some(Self { from, to })
    }

    /// The calendar month before the one containing `today`.
    pub fn previous_month(today: NaiveDate) -> Option<Self> {
        let first_of_month = today.checked_sub_days(Days::new(u64::from(today.day0())))?;
        let to = first_of_month.pred_opt()?;
        let from = to.checked_sub_days(Days::new(u64::from(to.day0())))?;
        Some(Self { from, to })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// `2019-05-01-2019-05-31`.
    pub fn label(&self) -> String {
        format!("{}-{}", self.from, self.to)
    }

    /// Filter expression for the bookkeeping API's booked-invoice endpoint.
    pub fn economic_filter(&self) -> String {
        format!("date$gte:{}$and:date$lte:{}", self.from, self.to)
    }

    /// Invoices dated inside the range, in their original order.
    pub fn select(&self, invoices: &[Invoice]) -> Vec<Invoice> {
        invoices
            .iter()
            .filter(|inv| self.contains(inv.date))
            .cloned()
            .collect()
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Message announcing a new report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title_link: String,
    pub text: String,
    pub pretext: String,
    pub period: String,
    /// Accent colour for chat attachments, `#RRGGBB`.
    pub color: String,
    pub footer: String,
}

impl Notification {
    /// Announcement for the report covering `range`, stored at `location`.
    pub fn report_ready(range: &DateRange, location: &str) -> Self {
        Self {
            title_link: location.to_string(),
            text: "New numbers for media subscriptions are available.".into(),
            pretext: "Click the link below to access them.".into(),
            period: range.label(),
            color: "#00711D".into(),
            footer: "This is an automated message.".into(),
        }
    }

    /// Plain-text rendering for sinks without rich formatting.
    pub fn summary(&self) -> String {
        format!(
            "{} ({})\n{}\n{}",
            self.text, self.period, self.pretext, self.title_link
        )
    }
}

/// Stores a rendered report and returns where it ended up.
pub trait UploadSink {
    fn upload(&mut self, artifact: &[u8], range: &DateRange) -> Result<String, DeliveryError>;
}

/// Sends a [`Notification`].
pub trait NotificationSink {
    fn notify(&mut self, notification: &Notification) -> Result<(), DeliveryError>;
}

/// Writes reports below a local directory, one subdirectory per range start.
#[derive(Debug, Clone)]
pub struct DirectoryUpload {
    root: PathBuf,
    file_name: String,
}

impl DirectoryUpload {
    pub fn new(root: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            file_name: file_name.into(),
        }
    }
}

impl UploadSink for DirectoryUpload {
    fn upload(&mut self, artifact: &[u8], range: &DateRange) -> Result<String, DeliveryError> {
        let dir = self.root.join(range.from.to_string());
        fs::create_dir_all(&dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, artifact)?;
        Ok(path.display().to_string())
    }
}

/// Emits notifications as log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify(&mut self, notification: &Notification) -> Result<(), DeliveryError> {
        tracing::info!(
            period = %notification.period,
            location = %notification.title_link,
            "{}",
            notification.text
        );
        Ok(())
    }
}

/// What happened after the report was rendered.
#[derive(Debug, Default)]
pub struct DeliveryOutcome {
    /// Where the artifact was stored, if the upload succeeded.
    pub location: Option<String>,
    pub upload_error: Option<DeliveryError>,
    pub notify_error: Option<DeliveryError>,
    /// False when the upload failed, since there is nothing to link to.
    pub notified: bool,
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        self.upload_error.is_none() && self.notify_error.is_none()
    }
}

/// Upload `artifact` and announce it.
pub fn deliver(
    artifact: &[u8],
    range: &DateRange,
    upload: &mut dyn UploadSink,
    notify: &mut dyn NotificationSink,
) -> DeliveryOutcome {
    let mut outcome = DeliveryOutcome::default();

    let location = match upload.upload(artifact, range) {
        Ok(location) => location,
        Err(err) => {
            tracing::warn!(range = %range, error = %err, "could not upload report");
            outcome.upload_error = Some(err);
            return outcome;
        }
    };
    tracing::info!(range = %range, location = %location, bytes = artifact.len(), "report uploaded");

    let notification = Notification::report_ready(range, &location);
    match notify.notify(&notification) {
        Ok(()) => outcome.notified = true,
        Err(err) => {
            tracing::warn!(range = %range, error = %err, "could not send notification");
            outcome.notify_error = Some(err);
        }
    }
    outcome.location = Some(location);
    outcome
}
