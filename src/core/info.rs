// Author: Dustin Pilgrim
// License: MIT

use serde_json::json;

use crate::core::format::format_time;
use crate::core::timer::TimerInfo;

pub fn checkmark(active: bool) -> &'static str {
    if active { "[x] enabled" } else { "[ ] enabled" }
}

impl TimerInfo {
    pub fn pretty_print(&self) -> String {
        let armed = if self.armed.is_empty() {
            "none".to_string()
        } else {
            self.armed.iter().map(|e| e.as_str()).collect::<Vec<_>>().join(", ")
        };

        let rows = [
            ("Project", self.project.clone()),
            ("Timer", checkmark(self.active).to_string()),
            ("Subscribed", armed),
            (
                "Pending Start",
                self.pending_start
                    .map(|s| format!("{} ago", format_time(self.now - s)))
                    .unwrap_or_else(|| "none".to_string()),
            ),
            (
                "Last Compile",
                self.last_compile.map(format_time).unwrap_or_else(|| "none".to_string()),
            ),
            ("Overall Idle", format_time(self.overall)),
            ("Uptime", format_time(self.now)),
        ];

        let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

        let mut out = String::new();
        for (label, value) in rows {
            out.push_str(&format!("{label:<width$} | {value}\n"));
        }
        out
    }

    pub fn to_json(&self) -> String {
        json!({
            "project": self.project,
            "active": self.active,
            "subscribed": self.armed.iter().map(|e| e.as_str()).collect::<Vec<_>>(),
            "pending_start": self.pending_start,
            "last_compile_seconds": self.last_compile,
            "overall_seconds": self.overall,
            "overall": format_time(self.overall),
            "uptime_seconds": self.now,
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::HostEvent;

    fn sample() -> TimerInfo {
        TimerInfo {
            project: "Game".into(),
            active: true,
            armed: vec![HostEvent::CompilationFinished, HostEvent::ReloadFinished],
            pending_start: Some(10.0),
            last_compile: None,
            overall: 125.0,
            now: 15.0,
        }
    }

    #[test]
    fn pretty_print_aligns_and_formats() {
        let text = sample().pretty_print();
        assert!(text.contains("Project       | Game\n"));
        assert!(text.contains("Timer         | [x] enabled\n"));
        assert!(text.contains("Subscribed    | compilation-finished, reload-finished\n"));
        assert!(text.contains("Pending Start | 05.00 [s] ago\n"));
        assert!(text.contains("Last Compile  | none\n"));
        assert!(text.contains("Overall Idle  | 02:05 [m]\n"));
    }

    #[test]
    fn json_round_trips_key_fields() {
        let value: serde_json::Value = serde_json::from_str(&sample().to_json()).unwrap();
        assert_eq!(value["project"], "Game");
        assert_eq!(value["active"], true);
        assert_eq!(value["overall_seconds"], 125.0);
        assert_eq!(value["overall"], "02:05 [m]");
        assert!(value["last_compile_seconds"].is_null());
        assert_eq!(value["subscribed"][1], "reload-finished");
    }

    #[test]
    fn checkmark_reflects_state() {
        assert_eq!(checkmark(true), "[x] enabled");
        assert_eq!(checkmark(false), "[ ] enabled");
    }
}
