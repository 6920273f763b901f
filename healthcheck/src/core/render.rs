//! Human-readable rendering of a [`StatusReport`]

use serde_json::Value;
use shared::format_bytes;
use std::fmt;

use crate::types::{HealthProbeResult, StatusReport};

const UNAVAILABLE: &str = "unavailable";

fn write_probe(f: &mut fmt::Formatter<'_>, title: &str, probe: &HealthProbeResult) -> fmt::Result {
    writeln!(f, "{title} ({})", probe.url)?;
    if !probe.reachable {
        return writeln!(f, "  unreachable");
    }
    writeln!(f, "  reachable")?;
    match (&probe.parsed, &probe.raw_body) {
        (Some(fields), _) => {
            for (key, value) in fields {
                match value {
                    Value::String(text) => writeln!(f, "  {key}: {text}")?,
                    other => writeln!(f, "  {key}: {other}")?,
                }
            }
        }
        (None, Some(body)) if !body.trim().is_empty() => writeln!(f, "  body: {}", body.trim())?,
        _ => {}
    }
    Ok(())
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Worker health check")?;
        writeln!(f, "===================")?;
        writeln!(f)?;

        writeln!(f, "Process")?;
        match (self.process.running, self.process.pid) {
            (true, Some(pid)) => match self.process.started_at {
                Some(since) => writeln!(
                    f,
                    "  RUNNING (PID {pid}, since {})",
                    since.format("%Y-%m-%d %H:%M:%S UTC")
                )?,
                None => writeln!(f, "  RUNNING (PID {pid})")?,
            },
            _ => writeln!(f, "  NOT RUNNING")?,
        }

        write_probe(f, "Health endpoint", &self.endpoint)?;
        match &self.coordinator {
            Some(coordinator) => write_probe(f, "Coordinator", coordinator)?,
            None => writeln!(f, "Coordinator\n  not configured")?,
        }

        writeln!(f, "Log ({})", self.log_path.display())?;
        if !self.log.exists {
            writeln!(f, "  missing")?;
        } else {
            if let Some(size) = self.log.size_bytes {
                writeln!(f, "  size: {}", format_bytes(size))?;
            }
            if let Some(last) = &self.log.last_line {
                writeln!(f, "  last line: {last}")?;
            }
            if self.log.recent_errors.is_empty() {
                writeln!(f, "  recent errors: none")?;
            } else {
                writeln!(f, "  recent errors ({}):", self.log.recent_errors.len())?;
                for line in &self.log.recent_errors {
                    writeln!(f, "    {line}")?;
                }
            }
        }

        writeln!(f, "Configuration ({})", self.config_path.display())?;
        if !self.config.present {
            writeln!(f, "  missing")?;
        } else {
            for (field, status) in &self.config.fields {
                let state = if status.configured { "configured" } else { "NOT CONFIGURED" };
                writeln!(f, "  {:<20} {state}", field.key())?;
            }
        }

        let resources = &self.resources;
        writeln!(f, "Resources")?;
        writeln!(f, "  memory: {}", resources.memory_summary.as_deref().unwrap_or(UNAVAILABLE))?;
        writeln!(f, "  disk:   {}", resources.disk_summary.as_deref().unwrap_or(UNAVAILABLE))?;
        if let Some(cpu) = resources.cpu_percent {
            writeln!(f, "  worker cpu: {cpu:.1}%")?;
        }
        if let Some(rss) = resources.process_memory_bytes {
            writeln!(f, "  worker memory: {}", format_bytes(rss))?;
        }

        writeln!(f)?;
        writeln!(f, "Overall: {}", self.overall)?;

        if !self.recommendations.is_empty() {
            writeln!(f)?;
            writeln!(f, "Recommendations")?;
            for recommendation in &self.recommendations {
                writeln!(f, "  - {recommendation}")?;
            }
        }
        Ok(())
    }
}
