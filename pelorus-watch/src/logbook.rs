//! Daily logbook files.
//!
//! One file per local day, named `PELORUS-YYYY-MM-DD.log`, opened for
//! append so a restart continues the same day's record. A header block is
//! written when the file is first created. Three record kinds share one
//! line format: the per-minute position record, the event record (same
//! fields plus the event name and angle), and connection transitions.
//! An hour change inserts a blank separator line.
//!
//! Logbook IO failures must never take the engine down; callers log the
//! error and move on.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use pelorus_core::angle::format_bearing;
use pelorus_core::{LocalClock, Observer};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Position fields shared by minute and event records.
#[derive(Debug, Clone, Copy)]
pub struct PositionEntry {
    pub observer: Observer,
    pub speed_knots: f64,
    pub course: f64,
}

/// Append-only writer for the daily log files.
pub struct Logbook {
    directory: PathBuf,
    current_date: Option<NaiveDate>,
    file: Option<File>,
    last_minute: Option<String>,
    last_hour: Option<u32>,
}

impl Logbook {
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            current_date: None,
            file: None,
            last_minute: None,
            last_hour: None,
        }
    }

    /// Path of the file for a given local date.
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.directory.join(format!("PELORUS-{}.log", date.format("%Y-%m-%d")))
    }

    /// Appends the per-minute position record; at most one per distinct
    /// local minute. Returns whether a record was written.
    pub fn log_position(
        &mut self,
        now: DateTime<Utc>,
        clock: &LocalClock,
        entry: &PositionEntry,
    ) -> std::io::Result<bool> {
        let minute_key = clock.to_local(now).format("%Y-%m-%d %H:%M").to_string();
        if self.last_minute.as_deref() == Some(minute_key.as_str()) {
            return Ok(false);
        }

        let line = format!(
            "{} {}\n",
            stamp(now, clock),
            position_text(entry)
        );
        self.append(now, clock, &line)?;
        self.last_minute = Some(minute_key);
        Ok(true)
    }

    /// Appends one event record: position fields (or placeholders) plus
    /// the event name and its azimuth/altitude.
    pub fn log_event(
        &mut self,
        now: DateTime<Utc>,
        clock: &LocalClock,
        label: &str,
        angle: Option<f64>,
        entry: Option<&PositionEntry>,
    ) -> std::io::Result<()> {
        let position = match entry {
            Some(entry) => position_text(entry),
            None => "position unknown".to_string(),
        };
        let angle_text = match angle {
            Some(angle) => format!(" {}", format_bearing(angle)),
            None => String::new(),
        };
        let line = format!(
            "{} {} | event: {}{}\n",
            stamp(now, clock),
            position,
            label,
            angle_text
        );
        self.append(now, clock, &line)
    }

    /// Records a feed connect/disconnect transition.
    pub fn log_connection(
        &mut self,
        now: DateTime<Utc>,
        clock: &LocalClock,
        connected: bool,
    ) -> std::io::Result<()> {
        let text = if connected {
            "*** feed connected ***"
        } else {
            "*** feed disconnected ***"
        };
        let line = format!("{} {}\n", stamp(now, clock), text);
        self.append(now, clock, &line)
    }

    fn append(&mut self, now: DateTime<Utc>, clock: &LocalClock, line: &str) -> std::io::Result<()> {
        let date = clock.local_date(now);
        self.ensure_file(date, clock)?;

        let hour = clock.to_local(now).hour();
        let hour_changed = self.last_hour.is_some_and(|h| h != hour);
        self.last_hour = Some(hour);

        let file = self.file.as_mut().expect("ensure_file left a file open");
        if hour_changed {
            file.write_all(b"\n")?;
        }
        file.write_all(line.as_bytes())?;
        file.flush()
    }

    fn ensure_file(&mut self, date: NaiveDate, clock: &LocalClock) -> std::io::Result<()> {
        if self.current_date == Some(date) && self.file.is_some() {
            return Ok(());
        }

        std::fs::create_dir_all(&self.directory)?;
        let path = self.path_for(date);
        let is_new = !path.exists();
        let mut file = OpenOptions::new().append(true).create(true).open(&path)?;

        if is_new {
            write_header(&mut file, date, clock)?;
        }

        self.current_date = Some(date);
        self.file = Some(file);
        self.last_minute = None;
        self.last_hour = None;
        Ok(())
    }
}

fn write_header(file: &mut File, date: NaiveDate, clock: &LocalClock) -> std::io::Result<()> {
    let rule = "=".repeat(70);
    writeln!(file, "{rule}")?;
    writeln!(file, "PELORUS celestial watch log")?;
    writeln!(file, "{rule}")?;
    writeln!(file, "local date: {date}")?;
    writeln!(file, "offset: {}", clock.offset_label())?;
    writeln!(file, "{rule}")?;
    writeln!(file)
}

/// `2026-08-06 [12:34:56 LT | 04:34:56 UTC | UTC+08:00]`
fn stamp(now: DateTime<Utc>, clock: &LocalClock) -> String {
    let local = clock.to_local(now);
    format!(
        "{} [{} LT | {} UTC | {}]",
        local.format("%Y-%m-%d"),
        local.format("%H:%M:%S"),
        now.format("%H:%M:%S"),
        clock.offset_label()
    )
}

fn position_text(entry: &PositionEntry) -> String {
    format!(
        "lat {} lon {} | course {} | speed {:.1} kn",
        format_dmm(entry.observer.latitude, true),
        format_dmm(entry.observer.longitude, false),
        format_bearing(entry.course),
        entry.speed_knots
    )
}

/// Degrees-and-minutes rendering, `37°23.248'N` / `121°58.342'W`.
fn format_dmm(decimal_degrees: f64, is_latitude: bool) -> String {
    let degrees = decimal_degrees.abs().trunc();
    let minutes = (decimal_degrees.abs() - degrees) * 60.0;
    let hemisphere = match (is_latitude, decimal_degrees >= 0.0) {
        (true, true) => 'N',
        (true, false) => 'S',
        (false, true) => 'E',
        (false, false) => 'W',
    };
    let width = if is_latitude { 2 } else { 3 };
    format!("{:0width$}°{:06.3}'{}", degrees as u32, minutes, hemisphere)
}
