use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::Failure;

pub const DEFAULT_SEASON: &str = "2024";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl FromStr for HttpMethod {
    type Err = Failure;

    fn from_str(method: &str) -> Result<Self, Self::Err> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            _ => Err(Failure::UnsupportedMethod(method.to_string())),
        }
    }
}

/// Path, parameters and method needed to perform one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub path: &'static str,
    pub params: BTreeMap<String, String>,
    pub method: HttpMethod,
}

impl Endpoint {
    pub fn get<'a>(
        path: &'static str,
        params: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        Self {
            path,
            params: params
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            method: HttpMethod::Get,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryKind {
    RaceReport,
    AthleteInfo,
    RaceResults,
    Stats,
}

impl QueryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::RaceReport => "race-report",
            QueryKind::AthleteInfo => "athlete-info",
            QueryKind::RaceResults => "race-results",
            QueryKind::Stats => "stats",
        }
    }

    /// Human name of the identifier this kind is keyed by.
    pub fn identifier_name(self) -> &'static str {
        match self {
            QueryKind::RaceReport => "Event ID",
            QueryKind::AthleteInfo => "Athlete ID",
            QueryKind::RaceResults | QueryKind::Stats => "Driver ID",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Query {
    RaceReport { event_id: String },
    AthleteInfo { athlete_id: String },
    RaceResults { driver_id: String, year: String },
    Stats { driver_id: String },
}

impl Query {
    pub fn kind(&self) -> QueryKind {
        match self {
            Query::RaceReport { .. } => QueryKind::RaceReport,
            Query::AthleteInfo { .. } => QueryKind::AthleteInfo,
            Query::RaceResults { .. } => QueryKind::RaceResults,
            Query::Stats { .. } => QueryKind::Stats,
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            Query::RaceReport { event_id } => event_id,
            Query::AthleteInfo { athlete_id } => athlete_id,
            Query::RaceResults { driver_id, .. } | Query::Stats { driver_id } => driver_id,
        }
    }
}

/// A loosely typed JSON leaf, shown as-is in table cells.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl fmt::Display for Scalar {
    // pad so width/alignment specs apply to the whole cell
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Text(s) => s.clone(),
            Scalar::Other(v) => v.to_string(),
        };
        f.pad(&text)
    }
}

impl Scalar {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(n) => Some(*n as f64),
            Scalar::Float(n) => Some(*n).filter(|n| n.is_finite()),
            Scalar::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            Scalar::Other(_) => None,
        }
    }

    /// Whole numbers only; `1.0` reads as `1`, `1.5` does not read.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            Scalar::Float(_) | Scalar::Text(_) => self
                .as_f64()
                .filter(|n| n.fract() == 0.0 && n.abs() < i64::MAX as f64)
                .map(|n| n as i64),
            Scalar::Other(_) => None,
        }
    }
}

fn count(value: &Option<Scalar>) -> i64 {
    value.as_ref().and_then(Scalar::as_i64).unwrap_or(0)
}

fn amount(value: &Option<Scalar>) -> f64 {
    value.as_ref().and_then(Scalar::as_f64).unwrap_or(0.0)
}

fn cell(value: &Option<Scalar>, default: &str) -> String {
    match value {
        Some(v) => v.to_string(),
        None => default.to_string(),
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RaceReportEnvelope {
    pub report: RaceReport,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RaceReport {
    pub racestrip: Option<RaceStrip>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceStrip {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub season: Option<Scalar>,
    pub date: Option<Scalar>,
    pub end_date: Option<Scalar>,
    pub circuit: Option<Circuit>,
    pub broadcasts: Option<Vec<serde_json::Value>>,
}

impl RaceStrip {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown Race")
    }
    pub fn short_name(&self) -> &str {
        self.short_name.as_deref().unwrap_or("Unknown")
    }
    pub fn season(&self) -> String {
        cell(&self.season, "Unknown")
    }
    pub fn start_date(&self) -> String {
        cell(&self.date, "TBA")
    }
    pub fn end_date(&self) -> String {
        cell(&self.end_date, "TBA")
    }

    /// Networks of the object-shaped broadcast entries, in provider order.
    pub fn networks(&self) -> impl Iterator<Item = &str> {
        self.broadcasts
            .iter()
            .flatten()
            .filter_map(|b| b.as_object())
            .map(|b| {
                b.get("network")
                    .and_then(|n| n.as_str())
                    .unwrap_or("Unknown Network")
            })
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circuit {
    pub name: Option<String>,
    pub country_flag: Option<CountryFlag>,
}

impl Circuit {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown Circuit")
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CountryFlag {
    pub alt: Option<String>,
}

impl CountryFlag {
    pub fn country(&self) -> &str {
        self.alt.as_deref().unwrap_or("Unknown Country")
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverProfile {
    pub full_name: Option<String>,
    pub date_of_birth: Option<Scalar>,
    pub birth_place: Option<BirthPlace>,
    pub vehicles: Option<Vec<Vehicle>>,
    pub link: Option<String>,
}

impl DriverProfile {
    pub fn full_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or("Unknown Driver")
    }
    pub fn date_of_birth(&self) -> String {
        cell(&self.date_of_birth, "Unknown")
    }
    pub fn birth_city(&self) -> &str {
        self.birth_place
            .as_ref()
            .and_then(|p| p.city.as_deref())
            .unwrap_or("Unknown")
    }
    /// First listed vehicle is the current team entry.
    pub fn current_vehicle(&self) -> Option<&Vehicle> {
        self.vehicles.as_ref().and_then(|v| v.first())
    }
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref().filter(|l| !l.is_empty())
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BirthPlace {
    pub city: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Vehicle {
    pub team: Option<Scalar>,
    pub number: Option<Scalar>,
    pub manufacturer: Option<Scalar>,
    pub chassis: Option<Scalar>,
    pub engine: Option<Scalar>,
    pub tire: Option<Scalar>,
}

impl Vehicle {
    pub fn team(&self) -> String {
        cell(&self.team, "Unknown")
    }
    pub fn number(&self) -> String {
        cell(&self.number, "N/A")
    }
    pub fn manufacturer(&self) -> String {
        cell(&self.manufacturer, "Unknown")
    }
    pub fn chassis(&self) -> String {
        cell(&self.chassis, "Unknown")
    }
    pub fn engine(&self) -> String {
        cell(&self.engine, "Unknown")
    }
    pub fn tire(&self) -> String {
        cell(&self.tire, "Unknown")
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RaceResultRow {
    pub date: Option<Scalar>,
    pub race: Option<Scalar>,
    pub place: Option<Scalar>,
    pub start: Option<Scalar>,
    pub points: Option<Scalar>,
}

impl RaceResultRow {
    pub fn date(&self) -> String {
        cell(&self.date, "N/A")
    }
    pub fn race(&self) -> &str {
        match &self.race {
            Some(Scalar::Text(name)) => name,
            _ => "Unknown Race",
        }
    }
    pub fn place(&self) -> String {
        cell(&self.place, "N/A")
    }
    pub fn start(&self) -> String {
        cell(&self.start, "N/A")
    }
    pub fn points(&self) -> f64 {
        amount(&self.points)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SeasonStatRow {
    pub year: Option<Scalar>,
    pub rank: Option<Scalar>,
    pub starts: Option<Scalar>,
    pub wins: Option<Scalar>,
    pub poles: Option<Scalar>,
    pub top5: Option<Scalar>,
    pub top10: Option<Scalar>,
    pub points: Option<Scalar>,
}

impl SeasonStatRow {
    pub fn year(&self) -> String {
        cell(&self.year, "N/A")
    }
    pub fn rank(&self) -> String {
        cell(&self.rank, "N/A")
    }
    pub fn starts(&self) -> i64 {
        count(&self.starts)
    }
    pub fn wins(&self) -> i64 {
        count(&self.wins)
    }
    pub fn poles(&self) -> i64 {
        count(&self.poles)
    }
    pub fn top5(&self) -> i64 {
        count(&self.top5)
    }
    pub fn top10(&self) -> i64 {
        count(&self.top10)
    }
    pub fn points(&self) -> f64 {
        amount(&self.points)
    }
}
