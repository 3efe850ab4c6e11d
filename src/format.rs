use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::{DriverProfile, RaceReportEnvelope, RaceResultRow, SeasonStatRow};

const WIDTH: usize = 80;
const RACE_NAME_MAX: usize = 38;
const RACE_NAME_KEEP: usize = 35;
const MAX_BROADCASTS: usize = 3;

pub const NO_RACE_REPORT: &str = "No data available.";
pub const NO_DRIVER_INFO: &str = "No driver information available.";
pub const NO_RACE_RESULTS: &str = "No race results available.";
pub const NO_CAREER_STATS: &str = "No career statistics available.";
pub const UNEXPECTED_FORMAT: &str = "Unexpected data format received from API.";

/// Payloads that carry nothing to show.
pub fn is_empty(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

pub fn truncate_race_name(name: &str) -> String {
    if name.chars().count() > RACE_NAME_MAX {
        let kept: String = name.chars().take(RACE_NAME_KEEP).collect();
        format!("{kept}...")
    } else {
        name.to_string()
    }
}

fn read<T: DeserializeOwned>(data: &Value) -> Option<T> {
    T::deserialize(data).ok()
}

struct Report(Vec<String>);

impl Report {
    fn titled(title: &str) -> Self {
        let rule = "=".repeat(WIDTH);
        Self(vec![
            rule.clone(),
            format!("{title:^WIDTH$}").trim_end().to_string(),
            rule,
            String::new(),
        ])
    }

    fn line(&mut self, line: impl Into<String>) {
        self.0.push(line.into());
    }

    fn blank(&mut self) {
        self.0.push(String::new());
    }

    fn rule(&mut self, ch: char) {
        self.0.push(ch.to_string().repeat(WIDTH));
    }

    fn finish(mut self) -> String {
        self.rule('=');
        self.0.join("\n")
    }
}

pub fn race_report(data: &Value) -> String {
    if is_empty(data) {
        return NO_RACE_REPORT.into();
    }
    let Some(envelope) = read::<RaceReportEnvelope>(data) else {
        return UNEXPECTED_FORMAT.into();
    };

    let mut out = Report::titled("F1 RACE REPORT");
    if let Some(strip) = envelope.report.racestrip {
        out.line(format!("Race: {}", strip.name()));
        out.line(format!("Short Name: {}", strip.short_name()));
        out.line(format!("Season: {}", strip.season()));
        out.line(format!("Start Date: {}", strip.start_date()));
        out.line(format!("End Date: {}", strip.end_date()));
        out.blank();

        if let Some(circuit) = &strip.circuit {
            out.line(format!("Circuit: {}", circuit.name()));
            if let Some(flag) = &circuit.country_flag {
                out.line(format!("Country: {}", flag.country()));
            }
            out.blank();
        }

        let networks: Vec<_> = strip.networks().take(MAX_BROADCASTS).collect();
        if !networks.is_empty() {
            out.line("Broadcasts:");
            for network in networks {
                out.line(format!("  - {network}"));
            }
            out.blank();
        }
    }
    out.finish()
}

pub fn athlete_info(data: &Value) -> String {
    if is_empty(data) {
        return NO_DRIVER_INFO.into();
    }
    let Some(profile) = read::<DriverProfile>(data) else {
        return UNEXPECTED_FORMAT.into();
    };

    let mut out = Report::titled("DRIVER INFORMATION");
    out.line(format!("Name: {}", profile.full_name()));
    out.line(format!("Date of Birth: {}", profile.date_of_birth()));
    out.line(format!("Birth Place: {}", profile.birth_city()));
    out.blank();

    if let Some(vehicle) = profile.current_vehicle() {
        out.line("Current Team Information:");
        out.line(format!("  Team: {}", vehicle.team()));
        out.line(format!("  Number: {}", vehicle.number()));
        out.line(format!("  Manufacturer: {}", vehicle.manufacturer()));
        out.line(format!("  Chassis: {}", vehicle.chassis()));
        out.line(format!("  Engine: {}", vehicle.engine()));
        out.line(format!("  Tire: {}", vehicle.tire()));
        out.blank();
    }

    if let Some(link) = profile.link() {
        out.line(format!("ESPN Profile: {link}"));
        out.blank();
    }
    out.finish()
}

pub fn race_results(data: &Value, driver_name: &str, year: &str) -> String {
    if is_empty(data) {
        return NO_RACE_RESULTS.into();
    }
    let Some(rows) = read::<Vec<RaceResultRow>>(data) else {
        return UNEXPECTED_FORMAT.into();
    };

    let mut out = Report::titled(&format!("{year} RACE RESULTS - {driver_name}"));
    out.line(format!(
        "{:<10} {:<40} {:<5} {:<7} {:<5}",
        "Date", "Race", "Pos", "Start", "Pts"
    ));
    out.rule('-');

    let mut total_points = 0.0;
    for row in &rows {
        total_points += row.points();
        out.line(format!(
            "{:<10} {:<40} {:<5} {:<7} {:<5}",
            row.date(),
            truncate_race_name(row.race()),
            row.place(),
            row.start(),
            row.points()
        ));
    }

    out.rule('-');
    out.line(format!("Total Points ({year}): {total_points}"));
    out.finish()
}

pub fn career_stats(data: &Value, driver_name: &str) -> String {
    if is_empty(data) {
        return NO_CAREER_STATS.into();
    }
    let Some(seasons) = read::<Vec<SeasonStatRow>>(data) else {
        return UNEXPECTED_FORMAT.into();
    };

    let mut out = Report::titled(&format!("CAREER STATISTICS - {driver_name}"));
    out.line(format!(
        "{:<6} {:<6} {:<8} {:<6} {:<7} {:<7} {:<7} {:<8}",
        "Year", "Rank", "Starts", "Wins", "Poles", "Top5", "Top10", "Points"
    ));
    out.rule('-');

    let (mut wins, mut poles, mut points) = (0i64, 0i64, 0.0);
    for season in &seasons {
        wins = wins.saturating_add(season.wins());
        poles = poles.saturating_add(season.poles());
        points += season.points();
        out.line(format!(
            "{:<6} {:<6} {:<8} {:<6} {:<7} {:<7} {:<7} {:<8}",
            season.year(),
            season.rank(),
            season.starts(),
            season.wins(),
            season.poles(),
            season.top5(),
            season.top10(),
            season.points()
        ));
    }

    out.rule('-');
    out.line(format!(
        "Career Totals - Wins: {wins} | Poles: {poles} | Points: {points}"
    ));
    out.finish()
}
