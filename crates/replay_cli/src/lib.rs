use std::io::Write;
use std::path::Path;

use intent::offline::{CacheRouteTable, DEFAULT_ASSET_ORIGIN};
use intent::{replay, InputTrace, ReplayReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Replay { path: String, json: bool },
    Routes { origin: String },
}

impl CommandKind {
    pub fn routes_for_default_origin() -> Self {
        Self::Routes {
            origin: DEFAULT_ASSET_ORIGIN.to_string(),
        }
    }
}

pub fn run<W: Write>(kind: CommandKind, stdout: &mut W) -> Result<(), String> {
    match kind {
        CommandKind::Replay { path, json } => {
            let trace = InputTrace::load(Path::new(&path)).map_err(|error| error.to_string())?;
            let report = replay(&trace).map_err(|error| error.to_string())?;
            if json {
                let rendered = serde_json::to_string_pretty(&report)
                    .map_err(|error| format!("failed to encode replay report: {error}"))?;
                write_line(stdout, &rendered)
            } else {
                for line in report_lines(&report) {
                    write_line(stdout, &line)?;
                }
                Ok(())
            }
        }
        CommandKind::Routes { origin } => {
            let table = CacheRouteTable::fingerprinted_assets(&origin)
                .map_err(|error| format!("invalid asset origin '{origin}': {error}"))?;
            let rendered = serde_json::to_string_pretty(&table)
                .map_err(|error| format!("failed to encode route table: {error}"))?;
            write_line(stdout, &rendered)
        }
    }
}

/// One `<at_ms> <command>` line per dispatch, then a summary line.
pub fn report_lines(report: &ReplayReport) -> Vec<String> {
    let mut lines = report
        .dispatched
        .iter()
        .map(|record| format!("{} {}", record.at_ms, record.command.name()))
        .collect::<Vec<_>>();
    lines.push(format!(
        "# repaints:{} ticks:{} dispatched:{}",
        report.repaint_callbacks,
        report.accepted_ticks,
        report.dispatched.len()
    ));
    lines
}

fn write_line<W: Write>(stdout: &mut W, line: &str) -> Result<(), String> {
    writeln!(stdout, "{line}").map_err(|error| format!("failed to write output: {error}"))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const TRACE: &str = r#"{
        "repaint_every_ms": 50,
        "duration_ms": 450,
        "events": [
            { "at_ms": 10, "kind": "key", "key": "ArrowLeft" },
            { "at_ms": 20, "kind": "motion", "x": 0.0, "y": 5.0 }
        ]
    }"#;

    fn write_trace(temp: &TempDir, content: &str) -> String {
        let path = temp.path().join("trace.json");
        fs::write(&path, content).expect("write trace");
        path.display().to_string()
    }

    #[test]
    fn replay_prints_one_line_per_dispatch() {
        let temp = TempDir::new().expect("tempdir");
        let path = write_trace(&temp, TRACE);
        let mut out = Vec::new();
        run(CommandKind::Replay { path, json: false }, &mut out).expect("replay");

        let text = String::from_utf8(out).expect("utf8");
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "0 initialize");
        assert_eq!(lines[1], "0 render");
        assert_eq!(lines[2], "10 move_left");
        assert!(lines.contains(&"250 move_down"));
        assert!(lines
            .last()
            .expect("summary")
            .starts_with("# repaints:10 ticks:2"));
    }

    #[test]
    fn replay_json_is_a_report_document() {
        let temp = TempDir::new().expect("tempdir");
        let path = write_trace(&temp, TRACE);
        let mut out = Vec::new();
        run(CommandKind::Replay { path, json: true }, &mut out).expect("replay");

        let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(value["repaint_callbacks"], 10);
        assert_eq!(value["dispatched"][0]["command"], "initialize");
    }

    #[test]
    fn replay_reports_missing_file() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("missing.json").display().to_string();
        let err = run(CommandKind::Replay { path, json: false }, &mut Vec::new())
            .expect_err("missing file");
        assert!(err.contains("failed to read trace file"));
    }

    #[test]
    fn routes_lists_fingerprinted_asset_routes() {
        let mut out = Vec::new();
        run(CommandKind::routes_for_default_origin(), &mut out).expect("routes");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
        let routes = value["routes"].as_array().expect("routes array");
        assert_eq!(routes.len(), 3);
        assert_eq!(routes[0]["strategy"], "cache_first");
    }
}
