//! Cache inspection and maintenance.
//!
//! `notes cache stats` summarizes the records on disk so it is easy to see
//! whether caching is on and how much it holds. `notes cache clear` removes
//! every record; the next search for each query recomputes it.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};

use crate::cache_fs::FsCacheStore;
use crate::config::Config;

pub fn run_cache_stats(config: &Config) -> Result<()> {
    let store = FsCacheStore::new(&config.cache.dir);
    let records = store
        .records()
        .with_context(|| format!("Failed to read cache dir: {}", store.dir().display()))?;

    let total_size: u64 = records.iter().map(|r| r.size).sum();
    let newest = records.iter().filter_map(|r| r.modified).max();
    let oldest = records.iter().filter_map(|r| r.modified).min();

    println!("Notecase Search Cache");
    println!("=====================");
    println!();
    println!("  Directory:   {}", store.dir().display());
    println!(
        "  Enabled:     {}",
        if config.cache.enabled { "yes" } else { "no" }
    );
    println!("  Records:     {}", records.len());
    println!("  Size:        {}", human_size(total_size));
    let now = Utc::now();
    if let Some(ts) = newest {
        println!("  Newest:      {}", describe_age(ts, now));
    }
    if let Some(ts) = oldest {
        println!("  Oldest:      {}", describe_age(ts, now));
    }
    println!();

    Ok(())
}

pub fn run_cache_clear(config: &Config) -> Result<()> {
    let store = FsCacheStore::new(&config.cache.dir);
    let removed = store
        .clear()
        .with_context(|| format!("Failed to clear cache dir: {}", store.dir().display()))?;

    tracing::info!(removed, dir = %store.dir().display(), "cache cleared");
    println!(
        "Removed {} cache record{}.",
        removed,
        if removed == 1 { "" } else { "s" }
    );

    Ok(())
}

/// Byte count scaled to the largest unit that keeps the value at or above 1.
fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Age of a record relative to `now`, e.g. `3 hours ago`. Timestamps in the
/// future or older than a month print as a date instead.
fn describe_age(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(ts);
    if age < Duration::zero() || age >= Duration::days(30) {
        return ts.format("%Y-%m-%d %H:%M").to_string();
    }

    let (count, unit) = if age.num_days() > 0 {
        (age.num_days(), "day")
    } else if age.num_hours() > 0 {
        (age.num_hours(), "hour")
    } else if age.num_minutes() > 0 {
        (age.num_minutes(), "minute")
    } else {
        return "just now".to_string();
    };

    let plural = if count == 1 { "" } else { "s" };
    format!("{} {}{} ago", count, unit, plural)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(1023), "1023 B");
        assert_eq!(human_size(1536), "1.5 KB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(human_size(3 * 1024 * 1024 * 1024), "3.0 GB");
        assert_eq!(human_size(2048 * 1024 * 1024 * 1024), "2048.0 GB");
    }

    #[test]
    fn test_describe_age() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(describe_age(now, now), "just now");
        assert_eq!(describe_age(now - Duration::seconds(59), now), "just now");
        assert_eq!(describe_age(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(describe_age(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(describe_age(now - Duration::days(1), now), "1 day ago");
        assert_eq!(describe_age(now - Duration::days(29), now), "29 days ago");
        assert_eq!(
            describe_age(now - Duration::days(90), now),
            "2024-02-01 12:00"
        );
        assert_eq!(
            describe_age(now + Duration::hours(1), now),
            "2024-05-01 13:00"
        );
    }
}
