use crate::model::{AvailabilityEntry, DaySchedule, Roster, ScheduleRequest};
use crate::service::ScheduleResponse;
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Lecture d'une demande JSON.
pub fn load_request_json<P: AsRef<Path>>(path: P) -> anyhow::Result<ScheduleRequest> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let request = serde_json::from_slice(&data)
        .with_context(|| format!("parsing schedule request {}", path.display()))?;
    Ok(request)
}

/// Import de disponibilités depuis CSV: header `employee,day,shift`
pub fn import_availability_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<AvailabilityEntry>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let employee = rec.get(0).context("missing employee")?.trim();
        if employee.is_empty() {
            bail!("invalid availability row {} (empty employee)", line + 1);
        }
        let day: i64 = rec
            .get(1)
            .context("missing day")?
            .trim()
            .parse()
            .with_context(|| format!("invalid day for {employee}"))?;
        let shift: i64 = rec
            .get(2)
            .context("missing shift")?
            .trim()
            .parse()
            .with_context(|| format!("invalid shift for {employee}"))?;
        out.push(AvailabilityEntry::new(employee, day, shift));
    }
    Ok(out)
}

/// Export JSON du planning (jolie mise en forme)
pub fn export_roster_json<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(roster)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV du planning: header `day,shift,worker`, une ligne `HOLIDAY` par jour férié
pub fn export_roster_csv<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["day", "shift", "worker"])?;
    let mut day_buf = itoa::Buffer::new();
    let mut shift_buf = itoa::Buffer::new();
    for entry in &roster.days {
        let day = day_buf.format(entry.day);
        match &entry.schedule {
            DaySchedule::Holiday => w.write_record([day, "HOLIDAY", ""])?,
            DaySchedule::Shifts(shifts) => {
                for sw in shifts {
                    let shift = shift_buf.format(sw.shift);
                    for worker in &sw.workers {
                        w.write_record([day, shift, worker.as_str()])?;
                    }
                }
            }
        }
    }
    w.flush()?;
    Ok(())
}

pub fn response_to_json(response: &ScheduleResponse) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(response)?)
}
