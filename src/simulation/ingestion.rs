//! Ingestion of externally generated vehicle records
//!
//! Each road has a plain-text record file. A pass reads the whole file,
//! queues every valid record and truncates the file so the records are not
//! read twice. Lines are decoded one at a time, so a line that is not UTF-8
//! is just another malformed record.
//!
//! Read and truncate are two separate opens. Anything the generator writes
//! between them is lost. Delivery is at most once per write cycle.

use anyhow::{bail, Context, Result};
use log::debug;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;
use std::str::Utf8Error;

use super::config::{RecordFormat, SimConfig};
use super::queue::QueueStore;
use super::types::{LaneKey, LaneKind, Position, Road};
use super::vehicle::SimVehicle;

/// A parsed vehicle record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleRecord {
    /// Zero-based lane index
    pub lane: usize,
    pub lane_kind: LaneKind,
    pub position: Position,
    pub speed: f32,
}

/// Outcome of one ingestion pass over a record file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Records turned into queued vehicles
    pub accepted: usize,
    /// Lines skipped because they did not parse
    pub malformed: usize,
    /// Valid records lost to a full lane
    pub dropped: usize,
}

impl IngestReport {
    pub fn merge(&mut self, other: IngestReport) {
        self.accepted += other.accepted;
        self.malformed += other.malformed;
        self.dropped += other.dropped;
    }
}

fn parse_field<T: std::str::FromStr>(field: &str, name: &str) -> Result<T> {
    field
        .trim()
        .parse::<T>()
        .ok()
        .with_context(|| format!("Invalid {} field: {:?}", name, field))
}

/// Parse one record line for the road the file belongs to
pub fn parse_record(line: &str, road: Road, config: &SimConfig) -> Result<VehicleRecord> {
    let fields: Vec<&str> = line.split(',').collect();

    let rest = match (fields.len(), config.record_format) {
        (4, RecordFormat::FourField | RecordFormat::Auto) => &fields[..],
        (5, RecordFormat::FiveField | RecordFormat::Auto) => {
            let number: u32 = parse_field(fields[0], "road")?;
            let record_road = Road::from_number(number).context("Road number out of range")?;
            if record_road != road {
                bail!("Record for road {} found in road {} file", record_road, road);
            }
            &fields[1..]
        }
        (count, format) => bail!("Expected {:?} record, got {} fields", format, count),
    };

    let lane_number: usize = parse_field(rest[0], "lane")?;
    let x: f32 = parse_field(rest[1], "x")?;
    let y: f32 = parse_field(rest[2], "y")?;
    let speed: f32 = parse_field(rest[3], "speed")?;

    let lane = lane_number
        .checked_sub(1)
        .with_context(|| format!("Unknown lane {}", lane_number))?;
    let lane_kind = config
        .lane_kind(lane)
        .with_context(|| format!("Unknown lane {}", lane_number))?;
    if !x.is_finite() || !y.is_finite() {
        bail!("Non-finite position ({}, {})", x, y);
    }
    if !speed.is_finite() || speed <= 0.0 {
        bail!("Speed must be positive, got {}", speed);
    }

    Ok(VehicleRecord {
        lane,
        lane_kind,
        position: Position::new(x, y),
        speed,
    })
}

/// Queue every valid record in `content` onto `road`'s lanes
pub fn ingest_records(
    content: &str,
    road: Road,
    store: &mut QueueStore,
    config: &SimConfig,
) -> IngestReport {
    ingest_lines(content.lines().map(Ok), road, store, config)
}

fn ingest_lines<'a, I>(
    lines: I,
    road: Road,
    store: &mut QueueStore,
    config: &SimConfig,
) -> IngestReport
where
    I: Iterator<Item = Result<&'a str, Utf8Error>>,
{
    let mut report = IngestReport::default();

    for (line_number, line) in lines.enumerate() {
        let line = match line {
            Ok(line) => line.trim(),
            Err(e) => {
                debug!("Skipping road {} record line {}: {}", road, line_number + 1, e);
                report.malformed += 1;
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }

        let record = match parse_record(line, road, config) {
            Ok(record) => record,
            Err(e) => {
                debug!("Skipping road {} record line {}: {:#}", road, line_number + 1, e);
                report.malformed += 1;
                continue;
            }
        };

        let id = store.next_vehicle_id();
        let vehicle = SimVehicle::new(
            id,
            record.position,
            record.speed,
            road,
            record.lane,
            record.lane_kind,
        );
        if store.enqueue(LaneKey::new(road, record.lane), vehicle) {
            report.accepted += 1;
        } else {
            report.dropped += 1;
        }
    }

    report
}

/// Read `path`, queue its records onto `road` and truncate it
///
/// A missing file means nothing has been generated yet and yields an empty
/// report. Read or truncate failures are returned; the caller logs them and
/// carries on with the next road.
pub fn ingest_road(
    road: Road,
    path: &Path,
    store: &mut QueueStore,
    config: &SimConfig,
) -> Result<IngestReport> {
    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(IngestReport::default()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read record file {}", path.display()))
        }
    };

    if content.is_empty() {
        return Ok(IngestReport::default());
    }

    let lines = content.split(|byte| *byte == b'\n').map(std::str::from_utf8);
    let report = ingest_lines(lines, road, store, config);

    OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("Failed to truncate record file {}", path.display()))?;

    Ok(report)
}
