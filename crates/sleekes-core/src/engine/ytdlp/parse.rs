//! Line parser for yt-dlp `--newline` output.

use std::path::PathBuf;

use crate::engine::EngineEvent;

/// Parse one output line. Returns `None` for blank lines.
///
/// `ItemFailed` comes back with `index: None` and `Finished` from a progress
/// line with `path: None`; the caller fills both in from its own state.
pub fn parse_line(line: &str) -> Option<EngineEvent> {
    let line = line.trim_end();
    if line.trim().is_empty() {
        return None;
    }

    if let Some(msg) = line.strip_prefix("ERROR:") {
        return Some(EngineEvent::ItemFailed {
            index: None,
            message: msg.trim().to_string(),
        });
    }

    if let Some(rest) = line.strip_prefix("[download]") {
        let rest = rest.trim();
        if let Some(event) = parse_download(rest) {
            return Some(event);
        }
    }

    Some(EngineEvent::Message(line.to_string()))
}

fn parse_download(rest: &str) -> Option<EngineEvent> {
    if let Some(item) = rest
        .strip_prefix("Downloading item ")
        .or_else(|| rest.strip_prefix("Downloading video "))
    {
        let (index, count) = item.split_once(" of ")?;
        return Some(EngineEvent::ItemStarted {
            index: index.trim().parse().ok()?,
            count: count.trim().parse().ok()?,
        });
    }

    if let Some(path) = rest.strip_prefix("Destination:") {
        let path = path.trim();
        if path.is_empty() {
            return None;
        }
        return Some(EngineEvent::Destination {
            path: PathBuf::from(path),
        });
    }

    if let Some(path) = rest.strip_suffix("has already been downloaded") {
        return Some(EngineEvent::Finished {
            path: Some(PathBuf::from(path.trim())),
        });
    }

    parse_progress(rest)
}

/// `42.3% of ~ 10.00MiB at 1.23MiB/s ETA 00:05` or `100% of 10.00MiB in 00:05`.
fn parse_progress(rest: &str) -> Option<EngineEvent> {
    let mut tokens = rest.split_whitespace();
    let percent: f32 = tokens.next()?.strip_suffix('%')?.parse().ok()?;

    let mut speed = None;
    let mut eta = None;
    let mut done = false;
    while let Some(tok) = tokens.next() {
        match tok {
            "at" => speed = tokens.next().filter(|s| *s != "Unknown").map(String::from),
            "ETA" => eta = tokens.next().filter(|s| *s != "Unknown").map(String::from),
            "in" => done = true,
            _ => {}
        }
    }

    if done && percent >= 100.0 {
        return Some(EngineEvent::Finished { path: None });
    }
    Some(EngineEvent::Downloading {
        percent: percent.clamp(0.0, 100.0),
        speed,
        eta,
    })
}
