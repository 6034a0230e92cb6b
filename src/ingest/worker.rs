//! Ingest worker: turns queued OCR text into records and stores them.
//!
//! The worker is the only writer of the store it is given, so store
//! mutations are serialized no matter how many threads produce items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use crate::ingest::queue::IngestItem;
use crate::ocr::{read_report, FieldLimits, LinePairer};
use crate::record::RunRecord;
use crate::store::{AddOutcome, RecordStore, SnapshotBackend};

/// Per-screenshot result kept for the caller's history view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredScreenshot {
    pub source: PathBuf,
    pub ocr_text: String,
    pub record: RunRecord,
    pub creation_date: Option<DateTime<Utc>>,
    pub is_added: bool,
    pub is_duplicate: bool,
}

/// Builds a record for one item and offers it to the store.
///
/// A failed persist is logged and reported as not added.
pub fn process_item<B: SnapshotBackend>(
    item: IngestItem,
    pairer: &dyn LinePairer,
    limits: &FieldLimits,
    store: &mut RecordStore<B>,
) -> StoredScreenshot {
    let record = read_report(&item.text, item.photo_date, pairer, limits);

    if record.has_parsing_error {
        let invalid: Vec<String> = record
            .invalid_fields()
            .iter()
            .map(|field| field.to_string())
            .collect();
        crate::log(&format!(
            "Ingest: {} has invalid fields: {}",
            item.source.display(),
            invalid.join(", ")
        ));
    }

    let outcome = match store.add(record.clone()) {
        Ok(outcome) => {
            crate::log(&format!(
                "Ingest: {} ({}) {}",
                item.source.display(),
                record.summary(),
                outcome
            ));
            Some(outcome)
        }
        Err(e) => {
            crate::log(&format!(
                "Ingest: failed to save {}: {:#}",
                item.source.display(),
                e
            ));
            None
        }
    };

    StoredScreenshot {
        source: item.source,
        ocr_text: item.text,
        creation_date: item.photo_date,
        is_added: outcome.is_some_and(|o| o.is_added()),
        is_duplicate: outcome == Some(AddOutcome::Duplicate),
        record,
    }
}

/// Runs the ingest loop until every sender is dropped.
///
/// This function blocks, so it should run on a dedicated thread (or a
/// scoped thread borrowing the store).
pub fn run_ingest_worker<B: SnapshotBackend>(
    receiver: Receiver<IngestItem>,
    pairer: &dyn LinePairer,
    limits: &FieldLimits,
    store: &mut RecordStore<B>,
) -> Vec<StoredScreenshot> {
    crate::log("Ingest worker started");

    let mut results = Vec::new();
    for item in receiver {
        results.push(process_item(item, pairer, limits, store));
    }

    let added = results.iter().filter(|r| r.is_added).count();
    crate::log(&format!(
        "Ingest worker finished: {} processed, {} added",
        results.len(),
        added
    ));

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::queue::create_ingest_queue;
    use crate::ocr::HalfSplitPairer;
    use crate::store::MemoryBackend;
    use std::thread;

    const REPORT: &str = "Battle Report
Game Time
Real Time
Tier
Wave
Killed By
Coins Earned
Cash Earned
Interest Earned
Gem Blocks Tapped
Cells Earned
Reroll Shards Earned
1d 2h 3m 4s
3h 20m 0s
11
4512
Scatter
1.24B
$58.2M
$3.10M
7
12.5K
1.2K";

    fn item(name: &str, text: &str) -> IngestItem {
        IngestItem::new(PathBuf::from(name), text.to_string(), None)
    }

    #[test]
    fn test_process_item_outcomes() {
        let mut store = RecordStore::open(MemoryBackend::new()).unwrap();
        let pairer = HalfSplitPairer::default();
        let limits = FieldLimits::default();

        let first = process_item(item("a.txt", REPORT), &pairer, &limits, &mut store);
        assert!(first.is_added);
        assert!(!first.is_duplicate);

        let second = process_item(item("b.txt", REPORT), &pairer, &limits, &mut store);
        assert!(!second.is_added);
        assert!(second.is_duplicate);

        let broken = process_item(item("c.txt", "Tier\n7"), &pairer, &limits, &mut store);
        assert!(!broken.is_added);
        assert!(!broken.is_duplicate);
        assert!(broken.record.has_parsing_error);

        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_worker_drains_many_producers() {
        let mut store = RecordStore::open(MemoryBackend::new()).unwrap();
        let pairer = HalfSplitPairer::default();
        let limits = FieldLimits::default();
        let (sender, receiver) = create_ingest_queue();

        let results = thread::scope(|scope| {
            let worker = scope.spawn(|| run_ingest_worker(receiver, &pairer, &limits, &mut store));

            for producer in 0..4 {
                let sender = sender.clone();
                scope.spawn(move || {
                    let text = REPORT.replace("4512", &format!("{}", 4000 + producer));
                    sender.send(item("shot.txt", &text)).unwrap();
                    sender.send(item("shot.txt", &text)).unwrap();
                });
            }
            drop(sender);

            worker.join().unwrap()
        });

        assert_eq!(results.len(), 8);
        assert_eq!(results.iter().filter(|r| r.is_added).count(), 4);
        assert_eq!(results.iter().filter(|r| r.is_duplicate).count(), 4);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_worker_exits_when_channel_closes() {
        let mut store = RecordStore::open(MemoryBackend::new()).unwrap();
        let (sender, receiver) = create_ingest_queue();
        drop(sender);

        let results = run_ingest_worker(
            receiver,
            &HalfSplitPairer::default(),
            &FieldLimits::default(),
            &mut store,
        );
        assert!(results.is_empty());
    }
}
