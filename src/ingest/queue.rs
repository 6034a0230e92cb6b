//! Work queue between screenshot readers and the record-store writer.
//!
//! Uses std::sync::mpsc: any number of producers send recognized text, a
//! single worker owns the store and applies every mutation.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};

/// OCR output for one screenshot, waiting to be turned into a record.
#[derive(Debug, Clone)]
pub struct IngestItem {
    /// Where the text came from (screenshot or text file)
    pub source: PathBuf,
    /// Raw OCR text
    pub text: String,
    /// Capture time from photo metadata, if known
    pub photo_date: Option<DateTime<Utc>>,
}

impl IngestItem {
    pub fn new(source: PathBuf, text: String, photo_date: Option<DateTime<Utc>>) -> Self {
        Self {
            source,
            text,
            photo_date,
        }
    }
}

/// Creates a new ingest queue.
///
/// The channel is unbounded; items queue up if the writer falls behind.
pub fn create_ingest_queue() -> (Sender<IngestItem>, Receiver<IngestItem>) {
    channel()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_preserves_order() {
        let (sender, receiver) = create_ingest_queue();

        for i in 1..=3 {
            let item = IngestItem::new(PathBuf::from(format!("shot_{i}.txt")), format!("{i}"), None);
            sender.send(item).expect("Failed to send");
        }
        drop(sender);

        let texts: Vec<String> = receiver.iter().map(|item| item.text).collect();
        assert_eq!(texts, vec!["1", "2", "3"]);
    }
}
