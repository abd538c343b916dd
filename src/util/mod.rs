//
//  bitbucket-pullrequests
//  util/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Utility Functions
//!
//! Small helpers shared by the command implementations: relative time
//! formatting, string truncation and pager integration.

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};

/// Formats a timestamp relative to now ("3 hours ago").
///
/// # Example
///
/// ```rust
/// use bitbucket_pullrequests::util::format_relative_time;
/// use chrono::{Duration, Utc};
///
/// assert_eq!(format_relative_time(&(Utc::now() - Duration::minutes(5))), "5 minutes ago");
/// assert_eq!(format_relative_time(&(Utc::now() + Duration::hours(1))), "in the future");
/// ```
pub fn format_relative_time<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String {
    let diff = Utc::now().signed_duration_since(timestamp.with_timezone(&Utc));

    if diff.num_seconds() < 0 {
        return "in the future".to_string();
    }

    let secs = diff.num_seconds() as u64;
    let (amount, unit) = if secs < 60 {
        return "just now".to_string();
    } else if secs < 3600 {
        (secs / 60, "minute")
    } else if secs < 86_400 {
        (secs / 3600, "hour")
    } else if secs < 604_800 {
        (secs / 86_400, "day")
    } else if secs < 2_592_000 {
        (secs / 604_800, "week")
    } else if secs < 31_536_000 {
        (secs / 2_592_000, "month")
    } else {
        (secs / 31_536_000, "year")
    };

    format!("{} {}{} ago", amount, unit, if amount == 1 { "" } else { "s" })
}

/// Truncates to at most `max_len` characters, ending in `...` when cut.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len > 3 {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    } else {
        s.chars().take(max_len).collect()
    }
}

/// Pager command from `BBPR_PAGER`, then `PAGER`.
pub fn get_pager() -> Option<String> {
    std::env::var("BBPR_PAGER")
        .ok()
        .or_else(|| std::env::var("PAGER").ok())
        .filter(|p| !p.trim().is_empty())
}

/// Sends `content` through the pager, or prints it when none is set
/// or stdout is not a terminal.
pub fn page_output(content: &str) -> Result<()> {
    let pager = get_pager().filter(|_| console::Term::stdout().is_term());

    let Some(pager) = pager else {
        print!("{}", content);
        return Ok(());
    };

    let mut parts = pager.split_whitespace();
    let program = parts.next().unwrap_or("less");
    let mut child = Command::new(program)
        .args(parts)
        .stdin(Stdio::piped())
        .spawn()?;

    if let Some(stdin) = child.stdin.as_mut() {
        write_to_pager(stdin, content)?;
    }

    child.wait()?;
    Ok(())
}

/// Quitting the pager early closes its stdin; that is not an error.
fn write_to_pager<W: Write>(pager: &mut W, content: &str) -> std::io::Result<()> {
    match pager.write_all(content.as_bytes()) {
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_pager_closed_early_is_not_an_error() {
        assert!(write_to_pager(&mut ClosedPipe, "diff --git a b\n").is_ok());

        let mut sink = Vec::new();
        write_to_pager(&mut sink, "hello").unwrap();
        assert_eq!(sink, b"hello");
    }

    #[test]
    fn test_relative_time_units() {
        let now = Utc::now();
        assert_eq!(format_relative_time(&now), "just now");
        assert_eq!(format_relative_time(&(now - Duration::hours(1))), "1 hour ago");
        assert_eq!(format_relative_time(&(now - Duration::days(3))), "3 days ago");
        assert_eq!(format_relative_time(&(now - Duration::days(800))), "2 years ago");
    }
}
