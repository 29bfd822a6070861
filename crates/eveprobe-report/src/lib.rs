//! Monitoring-plugin output protocol for eveprobe.
//!
//! Implements the Nagios/Icinga plugin contract: a single stdout line of the
//! form `STATUS: message | 'metric'=value`, optional additional message
//! lines, and the matching process exit code. A [`Report`] accumulates
//! verdicts and performance data over one probe run; its status can only
//! escalate, never improve.

use std::fmt;

/// Plugin verdict severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    /// Process exit code the monitoring scheduler expects.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::Warning => 1,
            Self::Critical => 2,
            Self::Unknown => 3,
        }
    }

    /// Escalation rank. UNKNOWN sits between OK and WARNING so that a
    /// diagnostic hiccup never overrides a real finding.
    fn rank(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Unknown => 1,
            Self::Warning => 2,
            Self::Critical => 3,
        }
    }

    /// Check whether this status is more severe than `other`.
    pub fn outranks(self, other: Status) -> bool {
        self.rank() > other.rank()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(text)
    }
}

/// Errors raised while assembling a report.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ReportError {
    /// A data point with the same metric and label was already added
    #[error("performance data point '{0}' was already added")]
    DuplicatePerfData(String),

    /// Metric or label text the plugin protocol cannot carry
    #[error("invalid performance data point: {0}")]
    InvalidPerfData(String),
}

/// One performance data point: a named gauge with an optional label tag
/// (used here to scope per-lab counters) and an optional unit.
#[derive(Debug, Clone, PartialEq)]
pub struct PerfData {
    metric: String,
    label: Option<String>,
    value: f64,
    unit: Option<String>,
}

impl PerfData {
    /// Create a gauge data point.
    pub fn gauge<S: Into<String>>(metric: S, value: f64) -> Self {
        Self {
            metric: metric.into(),
            label: None,
            value,
            unit: None,
        }
    }

    /// Tag the data point with a label (e.g. a lab identifier).
    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attach a unit of measurement.
    pub fn with_unit<S: Into<String>>(mut self, unit: S) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// The flat protocol key: `metric` or `metric_label`.
    fn flat_key(&self) -> String {
        match &self.label {
            Some(label) => format!("{}_{}", self.metric, label),
            None => self.metric.clone(),
        }
    }

    /// The structured key used in json-label mode.
    fn json_key(&self) -> String {
        match &self.label {
            Some(label) => format!(
                r#"{{"metric":{},"label":{}}}"#,
                json_string(&self.metric),
                json_string(label)
            ),
            None => format!(r#"{{"metric":{}}}"#, json_string(&self.metric)),
        }
    }

    fn same_key(&self, other: &PerfData) -> bool {
        self.metric == other.metric && self.label == other.label
    }

    /// The protocol may not carry quotes or equal signs inside keys.
    fn validate(&self) -> Result<(), ReportError> {
        if self.metric.is_empty() {
            return Err(ReportError::InvalidPerfData(
                "metric cannot be empty".to_string(),
            ));
        }
        for (what, text) in [("metric", Some(&self.metric)), ("label", self.label.as_ref())] {
            if let Some(text) = text {
                if text.contains('\'') || text.contains('=') {
                    return Err(ReportError::InvalidPerfData(format!(
                        "{what} '{text}' contains a quote or equal sign"
                    )));
                }
            }
        }
        Ok(())
    }

    fn render(&self, json_labels: bool) -> String {
        let key = if json_labels {
            self.json_key()
        } else {
            self.flat_key()
        };
        let unit = self.unit.as_deref().unwrap_or("");
        format!("'{}'={}{}", key, self.value, unit)
    }
}

fn json_string(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

/// Accumulates the verdict and performance data of one probe run.
///
/// Starts at [`Status::Ok`] with a default message; every check pushes its
/// findings through [`Report::update_status`]. The final text and exit code
/// come out of [`Report::finish`].
#[derive(Debug)]
pub struct Report {
    status: Status,
    default_message: String,
    messages: Vec<String>,
    perfdata: Vec<PerfData>,
    json_labels: bool,
}

impl Report {
    /// Create a report that renders `default_message` on an all-clear run.
    pub fn new<S: Into<String>>(default_message: S) -> Self {
        Self {
            status: Status::Ok,
            default_message: default_message.into(),
            messages: Vec::new(),
            perfdata: Vec::new(),
            json_labels: false,
        }
    }

    /// Switch performance-data keys to the structured json-label form.
    pub fn set_json_labels(&mut self, enabled: bool) {
        self.json_labels = enabled;
    }

    /// Record a finding. The report status escalates if `status` outranks
    /// the current one; a non-empty message is kept either way, in arrival
    /// order.
    pub fn update_status<S: Into<String>>(&mut self, status: Status, message: S) {
        if status.outranks(self.status) {
            self.status = status;
        }
        let message = message.into();
        if !message.is_empty() {
            self.messages.push(message);
        }
    }

    /// Add a performance data point. Duplicate (metric, label) pairs and
    /// keys the protocol cannot carry are rejected.
    pub fn add_perfdata(&mut self, point: PerfData) -> Result<(), ReportError> {
        point.validate()?;
        if self.perfdata.iter().any(|existing| existing.same_key(&point)) {
            return Err(ReportError::DuplicatePerfData(point.flat_key()));
        }
        self.perfdata.push(point);
        Ok(())
    }

    /// The current verdict.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Render the plugin output: `STATUS: message | perfdata` on the first
    /// line, remaining messages on their own lines.
    pub fn render(&self) -> String {
        let headline = match self.messages.first() {
            Some(message) => message,
            None => &self.default_message,
        };
        let mut out = format!("{}: {}", self.status, headline);
        if !self.perfdata.is_empty() {
            let points: Vec<String> = self
                .perfdata
                .iter()
                .map(|p| p.render(self.json_labels))
                .collect();
            out.push_str(" | ");
            out.push_str(&points.join(" "));
        }
        for message in self.messages.iter().skip(1) {
            out.push('\n');
            out.push_str(message);
        }
        out
    }

    /// Consume the report, yielding the rendered text and the exit code.
    pub fn finish(self) -> (String, i32) {
        let code = self.status.exit_code();
        (self.render(), code)
    }
}
