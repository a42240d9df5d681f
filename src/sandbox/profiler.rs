//! The two measurement modes that wrap a run command: a sampling sidecar
//! that logs RSS over time, and a parser for verbose `/usr/bin/time -v`
//! output. Exactly one is active per run; see `SandboxSession::run_and_collect`.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{ProfilingResult, TimeV};

/// Shell script copied into the container for sampling-mode runs. Forks the
/// wrapped command, then polls `/proc/<pid>/status` until it exits, logging
/// `<timestamp_ns> <rss_kb>` per line.
pub const MEMORY_PROFILER_SCRIPT: &str = r#"#!/bin/bash
"$@" &
PID=$!
while kill -0 "$PID" 2>/dev/null; do
    echo "$(date +%s%N) $(awk '/VmRSS/{print $2}' /proc/$PID/status)" >> mem_usage.log
    sleep 0.0001
done
wait "$PID"
"#;

/// Parse a `mem_usage.log` body into peak/integral/duration/log.
///
/// `integral` is a running-maximum accumulator (peak-so-far summed once per
/// sample), not a trapezoidal integral — preserved bit-for-bit for
/// compatibility with existing clients.
pub fn parse_memory_log(raw: &str) -> ProfilingResult {
    let mut log = Vec::new();
    let mut peak = 0i64;
    let mut integral = 0i64;

    for line in raw.lines() {
        let mut parts = line.split_whitespace();
        let (Some(ts_raw), Some(rss_raw)) = (parts.next(), parts.next()) else {
            continue;
        };
        let (Ok(ts), Ok(rss)) = (ts_raw.parse::<i64>(), rss_raw.parse::<i64>()) else {
            continue;
        };
        peak = peak.max(rss);
        integral += peak;
        log.push((ts, rss));
    }

    let duration_ms = match (log.first(), log.last()) {
        (Some((first, _)), Some((last, _))) => (last - first) as f64 / 1_000_000.0,
        _ => 0.0,
    };

    ProfilingResult {
        peak_memory_kb: peak,
        integral,
        duration_ms,
        log,
    }
}

static COMMAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Command being timed: "(.*)""#).unwrap());
static USER_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"User time \(seconds\): ([\d.]+)").unwrap());
static SYSTEM_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"System time \(seconds\): ([\d.]+)").unwrap());
static CPU_PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Percent of CPU this job got: (\d+)%").unwrap());
static ELAPSED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Elapsed \(wall clock\) time.*: ([\d:.]+)").unwrap());

/// Parse `/usr/bin/time -v` stderr into a structured record. Unparseable
/// fields are omitted silently rather than failing the task.
pub fn parse_time_v(stderr: &str) -> TimeV {
    let mut v = TimeV::default();

    if let Some(caps) = COMMAND_RE.captures(stderr) {
        v.command = Some(caps[1].to_string());
    }
    if let Some(caps) = USER_TIME_RE.captures(stderr) {
        v.user_time = caps[1].parse().ok();
    }
    if let Some(caps) = SYSTEM_TIME_RE.captures(stderr) {
        v.system_time = caps[1].parse().ok();
    }
    if let Some(caps) = CPU_PERCENT_RE.captures(stderr) {
        v.cpu_percent = caps[1].parse().ok();
    }
    if let Some(caps) = ELAPSED_RE.captures(stderr) {
        v.elapsed_time_seconds = parse_h_m_s(&caps[1]);
    }

    for line in stderr.lines() {
        let line = line.trim();
        if let Some(rest) = strip_key(line, "Maximum resident set size (kbytes)") {
            v.max_resident_set_kb = rest.parse().ok();
        } else if let Some(rest) = strip_key(line, "Average shared text size (kbytes)") {
            v.avg_shared_text_kb = rest.parse().ok();
        } else if let Some(rest) = strip_key(line, "Average unshared data size (kbytes)") {
            v.avg_unshared_data_kb = rest.parse().ok();
        } else if let Some(rest) = strip_key(line, "Average stack size (kbytes)") {
            v.avg_stack_size_kb = rest.parse().ok();
        } else if let Some(rest) = strip_key(line, "Average total size (kbytes)") {
            v.avg_total_size_kb = rest.parse().ok();
        } else if let Some(rest) = strip_key(line, "Minor (reclaiming a frame) page faults") {
            v.minor_page_faults = rest.parse().ok();
        } else if let Some(rest) = strip_key(line, "Major (requiring I/O) page faults") {
            v.major_page_faults = rest.parse().ok();
        } else if let Some(rest) = strip_key(line, "Voluntary context switches") {
            v.voluntary_context_switches = rest.parse().ok();
        } else if let Some(rest) = strip_key(line, "Involuntary context switches") {
            v.involuntary_context_switches = rest.parse().ok();
        } else if let Some(rest) = strip_key(line, "Swaps") {
            v.swaps = rest.parse().ok();
        } else if let Some(rest) = strip_key(line, "File system inputs") {
            v.file_system_inputs = rest.parse().ok();
        } else if let Some(rest) = strip_key(line, "File system outputs") {
            v.file_system_outputs = rest.parse().ok();
        } else if let Some(rest) = strip_key(line, "Signals delivered") {
            v.signals_delivered = rest.parse().ok();
        } else if let Some(rest) = strip_key(line, "Socket messages sent") {
            v.socket_messages_sent = rest.parse().ok();
        } else if let Some(rest) = strip_key(line, "Socket messages received") {
            v.socket_messages_received = rest.parse().ok();
        } else if let Some(rest) = strip_key(line, "Page size (bytes)") {
            v.page_size_bytes = rest.parse().ok();
        } else if let Some(rest) = strip_key(line, "Exit status") {
            v.exit_status = rest.parse().ok();
        }
    }

    v
}

fn strip_key<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.strip_prefix(key)
        .map(|rest| rest.trim_start_matches(':').trim())
}

/// Parse an elapsed-time field in `H:MM:SS`, `M:SS`, or `S(.s)` form.
fn parse_h_m_s(raw: &str) -> Option<f64> {
    let parts: Vec<&str> = raw.trim().split(':').collect();
    match parts.as_slice() {
        [h, m, s] => Some(h.parse::<f64>().ok()? * 3600.0 + m.parse::<f64>().ok()? * 60.0 + s.parse::<f64>().ok()?),
        [m, s] => Some(m.parse::<f64>().ok()? * 60.0 + s.parse::<f64>().ok()?),
        [s] => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_is_running_maximum_not_trapezoid() {
        let raw = "1000000000 100\n1000010000 300\n1000020000 200\n";
        let result = parse_memory_log(raw);
        assert_eq!(result.peak_memory_kb, 300);
        // running-max per sample: 100 + 300 + 300 = 700, NOT a trapezoidal sum
        assert_eq!(result.integral, 700);
        assert_eq!(result.log.len(), 3);
    }

    #[test]
    fn duration_is_first_to_last_sample_in_milliseconds() {
        let raw = "0 10\n5000000 20\n10000000 15\n";
        let result = parse_memory_log(raw);
        assert_eq!(result.duration_ms, 10.0);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let raw = "garbage line\n1000 50\nanother bad one\n";
        let result = parse_memory_log(raw);
        assert_eq!(result.log, vec![(1000, 50)]);
    }

    #[test]
    fn parses_elapsed_time_forms() {
        assert_eq!(parse_h_m_s("1:02:03"), Some(3723.0));
        assert_eq!(parse_h_m_s("2:03.50"), Some(123.5));
        assert_eq!(parse_h_m_s("0.42"), Some(0.42));
        assert_eq!(parse_h_m_s("garbage"), None);
    }

    #[test]
    fn parses_time_v_output_and_omits_unrecognized_fields() {
        let stderr = "\tCommand being timed: \"python code.py\"\n\
\tUser time (seconds): 0.12\n\
\tSystem time (seconds): 0.03\n\
\tPercent of CPU this job got: 88%\n\
\tElapsed (wall clock) time (h:mm:ss or m:ss): 0:00.20\n\
\tMaximum resident set size (kbytes): 9120\n\
\tExit status: 0\n\
\tSome Unrelated Field: 42\n";

        let v = parse_time_v(stderr);
        assert_eq!(v.command.as_deref(), Some("python code.py"));
        assert_eq!(v.user_time, Some(0.12));
        assert_eq!(v.system_time, Some(0.03));
        assert_eq!(v.cpu_percent, Some(88.0));
        assert_eq!(v.elapsed_time_seconds, Some(0.2));
        assert_eq!(v.max_resident_set_kb, Some(9120));
        assert_eq!(v.exit_status, Some(0));
        assert_eq!(v.swaps, None);
    }
}
