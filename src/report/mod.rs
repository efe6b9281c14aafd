//! Report rendering: console, JSON, and CSV views of scenario statistics.
//!
//! Rendering is pure string production from the aggregate summaries, with no
//! clocks or hostnames mixed in, so a rerun with the same seed produces
//! byte-identical output in every format.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use crate::sim::{ScenarioConfig, Summary};

pub const CSV_HEADER: &[&str] = &[
    "scenario",
    "iterations",
    "teamAWins",
    "teamBWins",
    "draws",
    "teamAWinRate",
    "teamBWinRate",
    "confidenceInterval95",
    "avgTurns",
    "avgTeamADamage",
    "avgTeamBDamage",
    "avgTeamASurvivors",
    "avgTeamBSurvivors",
    "avgTeamASurvivorHealth",
    "avgTeamBSurvivorHealth",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Console,
    Json,
    Csv,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatParseError {
    pub input: String,
}

impl fmt::Display for FormatParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown output format '{}' (expected console, json or csv)",
            self.input
        )
    }
}

impl Error for FormatParseError {}

impl FromStr for ReportFormat {
    type Err = FormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" | "text" => Ok(ReportFormat::Console),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            _ => Err(FormatParseError {
                input: s.to_string(),
            }),
        }
    }
}

/// One scenario's worth of results, ready for any renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub scenario: String,
    pub config: RunConfig,
    pub statistics: Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    pub iterations: usize,
    pub seed: u64,
    pub turn_cap: u64,
}

impl From<&ScenarioConfig> for RunConfig {
    fn from(config: &ScenarioConfig) -> Self {
        Self {
            iterations: config.iterations,
            seed: config.seed,
            turn_cap: config.turn_cap,
        }
    }
}

impl Report {
    pub fn new(scenario: impl Into<String>, config: &ScenarioConfig, statistics: Summary) -> Self {
        Self {
            scenario: scenario.into(),
            config: config.into(),
            statistics,
        }
    }
}

pub fn render(reports: &[Report], format: ReportFormat, compact: bool) -> Result<String, Box<dyn Error>> {
    match format {
        ReportFormat::Console => Ok(render_console(reports, compact)),
        ReportFormat::Json => Ok(render_json(reports)?),
        ReportFormat::Csv => render_csv(reports),
    }
}

pub fn render_console(reports: &[Report], compact: bool) -> String {
    let mut out = String::new();
    for report in reports {
        let s = &report.statistics;
        if compact {
            out.push_str(&format!(
                "{}: A {:.4} B {:.4} draws {} (+/-{:.4})\n",
                report.scenario, s.team_a_win_rate, s.team_b_win_rate, s.draws,
                s.confidence_interval95,
            ));
            continue;
        }
        out.push_str(&format!("== {} ==\n", report.scenario));
        out.push_str(&format!(
            "iterations: {} (seed {}, turn cap {})\n",
            report.config.iterations, report.config.seed, report.config.turn_cap
        ));
        out.push_str(&format!(
            "team A wins: {} ({:.1}%)\n",
            s.team_a_wins,
            s.team_a_win_rate * 100.0
        ));
        out.push_str(&format!(
            "team B wins: {} ({:.1}%)\n",
            s.team_b_wins,
            s.team_b_win_rate * 100.0
        ));
        out.push_str(&format!("draws: {}\n", s.draws));
        out.push_str(&format!(
            "win rate A: {:.4} +/- {:.4} (95% CI)\n",
            s.team_a_win_rate, s.confidence_interval95
        ));
        out.push_str(&format!("avg turns: {:.2}\n", s.avg_turns));
        out.push_str(&format!(
            "avg damage dealt: A {:.2} / B {:.2}\n",
            s.avg_team_a_damage, s.avg_team_b_damage
        ));
        out.push_str(&format!(
            "avg survivors: A {:.2} (hp {:.2}) / B {:.2} (hp {:.2})\n",
            s.avg_team_a_survivors,
            s.avg_team_a_survivor_health,
            s.avg_team_b_survivors,
            s.avg_team_b_survivor_health
        ));
        out.push('\n');
    }
    out
}

/// A single report serializes as one object; several as an array.
pub fn render_json(reports: &[Report]) -> serde_json::Result<String> {
    if reports.len() == 1 {
        serde_json::to_string_pretty(&reports[0])
    } else {
        serde_json::to_string_pretty(reports)
    }
}

/// One row per scenario under the fixed header. Floats are formatted with a
/// fixed precision so reruns compare byte-for-byte.
pub fn render_csv(reports: &[Report]) -> Result<String, Box<dyn Error>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for report in reports {
        let s = &report.statistics;
        writer.write_record(&[
            report.scenario.clone(),
            s.iterations.to_string(),
            s.team_a_wins.to_string(),
            s.team_b_wins.to_string(),
            s.draws.to_string(),
            format!("{:.4}", s.team_a_win_rate),
            format!("{:.4}", s.team_b_win_rate),
            format!("{:.4}", s.confidence_interval95),
            format!("{:.2}", s.avg_turns),
            format!("{:.2}", s.avg_team_a_damage),
            format!("{:.2}", s.avg_team_b_damage),
            format!("{:.2}", s.avg_team_a_survivors),
            format!("{:.2}", s.avg_team_b_survivors),
            format!("{:.2}", s.avg_team_a_survivor_health),
            format!("{:.2}", s.avg_team_b_survivor_health),
        ])?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Print to stdout or write the file named by `--outfile`.
pub fn write_output(rendered: &str, outfile: Option<&Path>) -> io::Result<()> {
    match outfile {
        Some(path) => fs::write(path, rendered),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(rendered.as_bytes())?;
            if !rendered.ends_with('\n') {
                handle.write_all(b"\n")?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report(scenario: &str) -> Report {
        let config = ScenarioConfig {
            iterations: 1000,
            seed: 7,
            turn_cap: 500,
        };
        Report::new(
            scenario,
            &config,
            Summary {
                iterations: 1000,
                team_a_wins: 600,
                team_b_wins: 390,
                draws: 10,
                team_a_win_rate: 0.6,
                team_b_win_rate: 0.39,
                confidence_interval95: 0.0304,
                avg_turns: 14.5,
                avg_team_a_damage: 31.2,
                avg_team_b_damage: 27.9,
                avg_team_a_survivors: 0.6,
                avg_team_b_survivors: 0.39,
                avg_team_a_survivor_health: 4.8,
                avg_team_b_survivor_health: 3.1,
            },
        )
    }

    #[test]
    fn csv_emits_the_fixed_header_and_one_row_per_scenario() {
        let reports = vec![sample_report("goblin vs orc"), sample_report("wolf vs orc")];
        let rendered = render_csv(&reports).unwrap();
        let mut lines = rendered.lines();
        assert_eq!(
            lines.next(),
            Some(CSV_HEADER.join(",").as_str())
        );
        assert_eq!(lines.clone().count(), 2);
        let row = lines.next().unwrap();
        assert!(row.starts_with("goblin vs orc,1000,600,390,10,0.6000,0.3900,0.0304,"));
    }

    #[test]
    fn csv_quotes_fields_containing_commas() {
        let rendered = render_csv(&[sample_report("goblin x3, armed vs orc")]).unwrap();
        assert!(rendered.contains("\"goblin x3, armed vs orc\""));
    }

    #[test]
    fn single_report_serializes_as_an_object() {
        let rendered = render_json(&[sample_report("duel")]).unwrap();
        assert!(rendered.starts_with('{'));
        assert!(rendered.contains("\"teamAWinRate\": 0.6"));
        assert!(rendered.contains("\"confidenceInterval95\": 0.0304"));
    }

    #[test]
    fn multiple_reports_serialize_as_an_array() {
        let rendered = render_json(&[sample_report("a"), sample_report("b")]).unwrap();
        assert!(rendered.starts_with('['));
    }

    #[test]
    fn console_report_names_the_scenario_and_interval() {
        let rendered = render_console(&[sample_report("goblin vs orc")], false);
        assert!(rendered.contains("== goblin vs orc =="));
        assert!(rendered.contains("0.6000 +/- 0.0304"));
    }

    #[test]
    fn compact_console_report_is_one_line_per_scenario() {
        let rendered = render_console(&[sample_report("a"), sample_report("b")], true);
        assert_eq!(rendered.lines().count(), 2);
    }

    #[test]
    fn format_parsing_accepts_known_names_only() {
        assert_eq!("CSV".parse::<ReportFormat>(), Ok(ReportFormat::Csv));
        assert_eq!("json".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert!("yaml".parse::<ReportFormat>().is_err());
    }
}
