//! MTR next-train schedule (DATA.GOV.HK real-time API).

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;

const SCHEDULE_URL: &str = "https://rt.data.gov.hk/v1/transport/mtr/getSchedule.php";

/// Lines served by the schedule API, as `(code, name)`.
pub const LINES: &[(&str, &str)] = &[
    ("AEL", "Airport Express"),
    ("TCL", "Tung Chung Line"),
    ("TML", "Tuen Ma Line"),
    ("TKL", "Tseung Kwan O Line"),
    ("EAL", "East Rail Line"),
    ("SIL", "South Island Line"),
    ("TWL", "Tsuen Wan Line"),
    ("ISL", "Island Line"),
    ("KTL", "Kwun Tong Line"),
];

#[derive(Debug, Deserialize)]
struct ScheduleResponse {
    status: i32,
    #[serde(default)]
    message: String,
    #[serde(default)]
    isdelay: String,
    #[serde(default)]
    data: HashMap<String, StationData>,
}

#[derive(Debug, Deserialize)]
struct StationData {
    #[serde(rename = "UP", default)]
    up: Vec<RawArrival>,
    #[serde(rename = "DOWN", default)]
    down: Vec<RawArrival>,
}

#[derive(Debug, Deserialize)]
struct RawArrival {
    dest: String,
    plat: String,
    time: String,
    #[serde(default)]
    ttnt: String,
}

/// One upcoming train.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrival {
    /// Destination station code
    pub destination: String,
    /// Platform number
    pub platform: String,
    /// Scheduled time, local
    pub time: String,
    /// Minutes until arrival, when known
    pub minutes: Option<u32>,
}

/// Upcoming trains at one station of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    /// Line code
    pub line: String,
    /// Station code
    pub station: String,
    /// Whether the operator reports delays
    pub delayed: bool,
    /// Trains in the up direction
    pub up: Vec<Arrival>,
    /// Trains in the down direction
    pub down: Vec<Arrival>,
}

/// Full name of a line code, if known.
#[must_use]
pub fn line_name(code: &str) -> Option<&'static str> {
    LINES
        .iter()
        .find(|(line, _)| line.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

fn convert(arrivals: Vec<RawArrival>) -> Vec<Arrival> {
    arrivals
        .into_iter()
        .map(|raw| Arrival {
            destination: raw.dest,
            platform: raw.plat,
            time: raw.time,
            minutes: raw.ttnt.trim().parse().ok(),
        })
        .collect()
}

fn parse_schedule(line: &str, station: &str, response: ScheduleResponse) -> Result<Schedule> {
    if response.status != 1 {
        return Err(Error::ExternalService {
            service: "MTR schedule",
            message: response.message,
        });
    }

    let key = format!("{line}-{station}");
    let data = response
        .data
        .into_iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        .map(|(_, data)| data)
        .ok_or_else(|| Error::ExternalService {
            service: "MTR schedule",
            message: format!("no trains listed for {station} on {line}"),
        })?;

    Ok(Schedule {
        line: line.to_string(),
        station: station.to_string(),
        delayed: response.isdelay.eq_ignore_ascii_case("Y"),
        up: convert(data.up),
        down: convert(data.down),
    })
}

/// Fetches the next trains for `station` on `line` (both codes, e.g. `TKL`/`TKO`).
pub async fn fetch_schedule(client: &reqwest::Client, line: &str, station: &str) -> Result<Schedule> {
    let line = line.trim().to_uppercase();
    let station = station.trim().to_uppercase();
    let response: ScheduleResponse = super::get_json(
        client,
        "MTR schedule",
        SCHEDULE_URL,
        &[("line", line.as_str()), ("sta", station.as_str())],
    )
    .await?;
    parse_schedule(&line, &station, response)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    const SAMPLE: &str = r#"{
        "status": 1,
        "message": "successful",
        "sys_time": "2024-01-15 12:00:00",
        "curr_time": "2024-01-15 12:00:05",
        "isdelay": "N",
        "data": {
            "TKL-TKO": {
                "curr_time": "2024-01-15 12:00:05",
                "sys_time": "2024-01-15 12:00:00",
                "UP": [
                    {"seq": "1", "dest": "POA", "plat": "1", "time": "2024-01-15 12:02:00", "ttnt": "2", "valid": "Y", "source": "-"}
                ],
                "DOWN": [
                    {"seq": "1", "dest": "NOP", "plat": "2", "time": "2024-01-15 12:04:00", "ttnt": "-", "valid": "Y", "source": "-"}
                ]
            }
        }
    }"#;

    #[test]
    fn test_parse_schedule() {
        let response: ScheduleResponse = serde_json::from_str(SAMPLE).unwrap();
        let schedule = parse_schedule("TKL", "TKO", response).unwrap();

        assert!(!schedule.delayed);
        assert_eq!(schedule.up.len(), 1);
        assert_eq!(schedule.up[0].destination, "POA");
        assert_eq!(schedule.up[0].minutes, Some(2));
        assert_eq!(schedule.down[0].minutes, None);
    }

    #[test]
    fn test_failed_status() {
        let response: ScheduleResponse = serde_json::from_str(
            r#"{"status": 0, "message": "Invalid station", "data": {}}"#,
        )
        .unwrap();
        let result = parse_schedule("TKL", "XXX", response);
        assert!(matches!(
            result,
            Err(Error::ExternalService { message, .. }) if message == "Invalid station"
        ));
    }

    #[test]
    fn test_line_name() {
        assert_eq!(line_name("tkl"), Some("Tseung Kwan O Line"));
        assert_eq!(line_name("XYZ"), None);
    }
}
