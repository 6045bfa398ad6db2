use crate::detector::decision::{format_percent, POSITIVE_CLASS};
use crate::error::AppError;
use chrono::NaiveDateTime;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;

pub const CSV_HEADER: &str = "Date,Filename,Result,Confidence";

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub timestamp: NaiveDateTime,
    pub filename: String,
    /// Arg-max class of the model output.
    pub class_index: usize,
    pub confidence: f32,
}

impl PredictionRecord {
    pub fn date(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M").to_string()
    }

    /// Labelled by the winning class alone, whatever the threshold said.
    pub fn result(&self) -> &'static str {
        if self.class_index == POSITIVE_CLASS {
            "Cancer"
        } else {
            "No Cancer"
        }
    }

    pub fn confidence_percent(&self) -> String {
        format_percent(self.confidence)
    }
}

/// Predictions of the current session, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    records: VecDeque<PredictionRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: PredictionRecord) {
        self.records.push_front(record);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PredictionRecord> {
        self.records.iter()
    }

    /// Fields are written as is, without quoting.
    pub fn to_csv(&self) -> String {
        let mut csv = String::with_capacity(CSV_HEADER.len() + 1 + self.records.len() * 48);
        csv.push_str(CSV_HEADER);
        csv.push('\n');
        for record in &self.records {
            csv.push_str(&format!(
                "{},{},{},{}\n",
                record.date(),
                record.filename,
                record.result(),
                record.confidence_percent()
            ));
        }
        csv
    }

    pub fn export(&self, path: &Path) -> Result<(), AppError> {
        fs::write(path, self.to_csv())
            .map_err(|e| AppError::Export(format!("{}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn record(minute: u32, filename: &str, class_index: usize, confidence: f32) -> PredictionRecord {
        PredictionRecord {
            timestamp: NaiveDate::from_ymd_opt(2025, 5, 2)
                .unwrap()
                .and_hms_opt(14, minute, 9)
                .unwrap(),
            filename: filename.to_string(),
            class_index,
            confidence,
        }
    }

    #[test]
    fn test_push_keeps_newest_first() {
        let mut history = History::new();
        history.push(record(1, "first.png", 0, 0.9));
        history.push(record(2, "second.png", 1, 0.8));

        let names: Vec<&str> = history.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["second.png", "first.png"]);
    }

    #[test]
    fn test_csv_has_header_and_one_line_per_record() {
        let mut history = History::new();
        history.push(record(1, "a.jpg", 0, 0.9));
        history.push(record(2, "b.jpg", 1, 0.8734));
        history.push(record(3, "c.png", 0, 0.5));

        let csv = history.to_csv();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Date,Filename,Result,Confidence");
        assert_eq!(lines[1], "2025-05-02 14:03,c.png,No Cancer,50.00%");
        assert_eq!(lines[2], "2025-05-02 14:02,b.jpg,Cancer,87.34%");
        assert_eq!(lines[3], "2025-05-02 14:01,a.jpg,No Cancer,90.00%");
        assert!(csv.ends_with('\n'));
    }

    #[test]
    fn test_csv_fields_are_not_quoted() {
        let mut history = History::new();
        history.push(record(1, "scan, left.png", 1, 1.0));

        let csv = history.to_csv();
        assert_eq!(csv.lines().nth(1), Some("2025-05-02 14:01,scan, left.png,Cancer,100.00%"));
    }

    #[test]
    fn test_empty_history_is_header_only() {
        assert_eq!(History::new().to_csv(), "Date,Filename,Result,Confidence\n");
    }

    #[test]
    fn test_clear() {
        let mut history = History::new();
        history.push(record(1, "a.jpg", 0, 0.9));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let mut history = History::new();
        history.push(record(7, "a.jpg", 1, 0.75));

        history.export(&path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Date,Filename,Result,Confidence\n2025-05-02 14:07,a.jpg,Cancer,75.00%\n"
        );
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("history.csv");

        let result = History::new().export(&path);

        assert!(matches!(result, Err(AppError::Export(_))));
    }
}
