//! Plate capture: recognition of the cropped vehicle region, same-day
//! deduplication and persistence of speeding records.

use std::collections::HashMap;

use chrono::{Local, NaiveDate, NaiveDateTime};
use ndarray::ArrayView3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::tracker::PlateCaptureRequest;

/// Optical character recognition of a licence plate.
pub trait PlateReader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the plate text in `crop`. An empty string means no plate was found.
    fn recognize(&mut self, crop: ArrayView3<'_, u8>) -> Result<String, Self::Error>;
}

/// Durable storage of speeding records.
pub trait PlateStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn record(&mut self, record: &PlateRecord) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateRecord {
    pub plate: String,
    pub speed_kmh: f32,
    pub timestamp: NaiveDateTime,
}

/// Last calendar day each plate was recorded on. Never pruned.
#[derive(Debug, Clone, Default)]
pub struct PlateMemo {
    last_seen: HashMap<String, NaiveDate>,
}

impl PlateMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen_on(&self, plate: &str, day: NaiveDate) -> bool {
        self.last_seen.get(plate) == Some(&day)
    }

    pub fn mark(&mut self, plate: &str, day: NaiveDate) {
        self.last_seen.insert(plate.to_owned(), day);
    }

    pub fn last_seen(&self, plate: &str) -> Option<NaiveDate> {
        self.last_seen.get(plate).copied()
    }

    pub fn len(&self) -> usize {
        self.last_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    /// A new record was stored.
    Recorded(PlateRecord),
    /// The plate was already recorded today.
    Duplicate(String),
    /// Recognition returned no text.
    NoPlate,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Turns capture requests into stored records, at most one per plate per day.
pub struct PlateRecorder<R, S> {
    reader: R,
    store: S,
    memo: PlateMemo,
    clock: fn() -> NaiveDateTime,
}

impl<R: PlateReader, S: PlateStore> PlateRecorder<R, S> {
    pub fn new(reader: R, store: S) -> Self {
        Self::with_clock(reader, store, local_now)
    }

    pub fn with_clock(reader: R, store: S, clock: fn() -> NaiveDateTime) -> Self {
        Self {
            reader,
            store,
            memo: PlateMemo::new(),
            clock,
        }
    }

    /// Handle a request at the recorder clock's current time.
    pub fn handle_now(&mut self, frame: &Frame, request: &PlateCaptureRequest) -> Result<CaptureOutcome> {
        let now = (self.clock)();
        self.handle(frame, request, now)
    }

    /// Read the plate under the request region and store it unless it was
    /// already recorded on `now`'s calendar day.
    ///
    /// The memo is updated only once the store accepted the record.
    pub fn handle(
        &mut self,
        frame: &Frame,
        request: &PlateCaptureRequest,
        now: NaiveDateTime,
    ) -> Result<CaptureOutcome> {
        let crop = frame.crop(&request.region);
        if crop.is_empty() {
            return Err(Error::Recognition {
                track_id: request.track_id,
                reason: "capture region lies outside the frame".to_owned(),
            });
        }

        let text = self.reader.recognize(crop).map_err(|err| Error::Recognition {
            track_id: request.track_id,
            reason: err.to_string(),
        })?;
        let plate = text.trim();
        if plate.is_empty() {
            debug!(track_id = request.track_id, "no plate text recognized");
            return Ok(CaptureOutcome::NoPlate);
        }

        let today = now.date();
        if self.memo.seen_on(plate, today) {
            debug!(track_id = request.track_id, plate, "plate already recorded today");
            return Ok(CaptureOutcome::Duplicate(plate.to_owned()));
        }

        let record = PlateRecord {
            plate: plate.to_owned(),
            speed_kmh: request.speed_kmh,
            timestamp: now,
        };
        self.store
            .record(&record)
            .map_err(|err| Error::Persistence(Box::new(err)))?;
        self.memo.mark(plate, today);

        info!(
            track_id = request.track_id,
            plate,
            speed_kmh = request.speed_kmh,
            "speeding vehicle recorded"
        );
        Ok(CaptureOutcome::Recorded(record))
    }

    pub fn memo(&self) -> &PlateMemo {
        &self.memo
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::Rect;
    use std::collections::VecDeque;
    use std::convert::Infallible;

    struct QueuedReader(VecDeque<&'static str>);

    impl PlateReader for QueuedReader {
        type Error = Infallible;

        fn recognize(&mut self, _crop: ArrayView3<'_, u8>) -> Result<String, Infallible> {
            Ok(self.0.pop_front().unwrap_or_default().to_owned())
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("database unavailable")]
    struct Offline;

    #[derive(Default)]
    struct MemoryStore {
        records: Vec<PlateRecord>,
        offline: bool,
    }

    impl PlateStore for MemoryStore {
        type Error = Offline;

        fn record(&mut self, record: &PlateRecord) -> Result<(), Offline> {
            if self.offline {
                return Err(Offline);
            }
            self.records.push(record.clone());
            Ok(())
        }
    }

    fn recorder(plates: &[&'static str]) -> PlateRecorder<QueuedReader, MemoryStore> {
        PlateRecorder::new(
            QueuedReader(plates.iter().copied().collect()),
            MemoryStore::default(),
        )
    }

    fn request(track_id: u64, speed_kmh: f32) -> PlateCaptureRequest {
        PlateCaptureRequest {
            track_id,
            speed_kmh,
            region: Rect::new(10.0, 10.0, 40.0, 20.0),
        }
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_same_day_duplicate_suppressed() {
        let frame = Frame::blank(100, 100);
        let mut rec = recorder(&["XYZ123", "XYZ123"]);

        let first = rec.handle(&frame, &request(1, 70.0), at(3, 9)).unwrap();
        let second = rec.handle(&frame, &request(2, 90.0), at(3, 17)).unwrap();

        assert!(matches!(first, CaptureOutcome::Recorded(ref r) if r.speed_kmh == 70.0));
        assert_eq!(second, CaptureOutcome::Duplicate("XYZ123".to_owned()));
        assert_eq!(rec.store().records.len(), 1);
    }

    #[test]
    fn test_next_day_recorded_again() {
        let frame = Frame::blank(100, 100);
        let mut rec = recorder(&["XYZ123", "XYZ123"]);

        rec.handle(&frame, &request(1, 70.0), at(3, 23)).unwrap();
        let next = rec.handle(&frame, &request(2, 90.0), at(4, 0)).unwrap();

        assert!(matches!(next, CaptureOutcome::Recorded(_)));
        assert_eq!(rec.store().records.len(), 2);
        assert_eq!(rec.memo().last_seen("XYZ123"), Some(at(4, 0).date()));
    }

    #[test]
    fn test_blank_text_is_no_plate() {
        let frame = Frame::blank(100, 100);
        let mut rec = recorder(&["  \n"]);

        let outcome = rec.handle(&frame, &request(1, 70.0), at(3, 9)).unwrap();
        assert_eq!(outcome, CaptureOutcome::NoPlate);
        assert!(rec.memo().is_empty());
    }

    #[test]
    fn test_text_is_trimmed() {
        let frame = Frame::blank(100, 100);
        let mut rec = recorder(&[" AB 12 \n"]);

        rec.handle(&frame, &request(1, 70.0), at(3, 9)).unwrap();
        assert_eq!(rec.store().records[0].plate, "AB 12");
    }

    #[test]
    fn test_store_failure_leaves_memo_untouched() {
        let frame = Frame::blank(100, 100);
        let mut rec = recorder(&["XYZ123", "XYZ123"]);
        rec.store_mut().offline = true;

        let err = rec.handle(&frame, &request(1, 70.0), at(3, 9)).unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
        assert!(rec.memo().is_empty());

        rec.store_mut().offline = false;
        let retry = rec.handle(&frame, &request(1, 70.0), at(3, 10)).unwrap();
        assert!(matches!(retry, CaptureOutcome::Recorded(_)));
    }

    #[test]
    fn test_region_outside_frame() {
        let frame = Frame::blank(5, 5);
        let mut rec = recorder(&["XYZ123"]);

        let err = rec.handle(&frame, &request(4, 70.0), at(3, 9)).unwrap_err();
        assert!(matches!(err, Error::Recognition { track_id: 4, .. }));
    }

    #[test]
    fn test_clock_drives_handle_now() {
        fn noon() -> NaiveDateTime {
            NaiveDate::from_ymd_opt(2024, 5, 3)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
        }

        let frame = Frame::blank(100, 100);
        let mut rec = PlateRecorder::with_clock(
            QueuedReader(VecDeque::from(["XYZ123"])),
            MemoryStore::default(),
            noon,
        );

        rec.handle_now(&frame, &request(1, 70.0)).unwrap();
        assert_eq!(rec.store().records[0].timestamp, noon());
    }
}
