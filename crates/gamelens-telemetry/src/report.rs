//! Run reports
//!
//! The plain-text report is a stable human-readable layout, not a schema.
//! Use [`write_json`] when another tool needs to read the statistics.

use crate::statistics::CorpusStatistics;
use gamelens_core::Result;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Render the final statistics report
pub fn render_report(stats: &CorpusStatistics) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "===== FINAL STATISTICS =====");
    let _ = writeln!(out, "Total Reviews Processed: {}", stats.total_reviews);

    let _ = writeln!(out, "\nReviews per Platform:");
    for (platform, count) in &stats.platform_counts {
        let _ = writeln!(out, "  {}: {} reviews", platform, count);
    }

    let ranked = stats.ranked_aspects();

    let _ = writeln!(out, "\nMost Mentioned Aspects:");
    for (aspect, count) in &ranked {
        let _ = writeln!(out, "  {}: {} mentions", aspect, count);
    }

    let _ = writeln!(out, "\nAverage Sentiment Per Aspect:");
    for (aspect, _) in &ranked {
        if let Some(counts) = stats.aspect_sentiment_counts.get(*aspect) {
            let _ = writeln!(
                out,
                "  {}: {} ({} positive, {} negative)",
                aspect,
                counts.label(),
                counts.positive,
                counts.negative
            );
        }
    }

    let _ = writeln!(out, "\nOverall Sentiment:");
    let _ = writeln!(
        out,
        "  Positive Reviews: {:.2}%",
        stats.positive_percentage()
    );
    let _ = writeln!(
        out,
        "  Negative Reviews: {:.2}%",
        stats.negative_percentage()
    );

    out
}

/// Write the plain-text report to `path`, replacing any previous report
pub fn write_report(path: &Path, stats: &CorpusStatistics) -> Result<()> {
    let mut file = File::create(path)?;
    write!(file, "{}", render_report(stats))?;
    file.flush()?;

    info!(path = %path.display(), reviews = stats.total_reviews, "Report written");
    Ok(())
}

/// Write the statistics snapshot as pretty JSON
pub fn write_json(path: &Path, stats: &CorpusStatistics) -> Result<()> {
    let json = serde_json::to_string_pretty(stats)?;
    let mut file = File::create(path)?;
    write!(file, "{}", json)?;
    file.flush()?;

    info!(path = %path.display(), "Statistics snapshot written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamelens_core::{AspectSentiments, Review, Sentiment};

    fn sample() -> CorpusStatistics {
        let mut stats = CorpusStatistics::new();
        let mut first = AspectSentiments::new();
        first.insert("visuals".to_string(), Sentiment::Positive);
        first.insert("value".to_string(), Sentiment::Negative);
        stats.record(&Review::new("1", "..").with_platform("steam"), &first);

        let mut second = AspectSentiments::new();
        second.insert("value".to_string(), Sentiment::Negative);
        stats.record(&Review::new("2", ".."), &second);
        stats
    }

    #[test]
    fn test_render_layout() {
        let expected = "\
===== FINAL STATISTICS =====
Total Reviews Processed: 2

Reviews per Platform:
  Unknown: 1 reviews
  steam: 1 reviews

Most Mentioned Aspects:
  value: 2 mentions
  visuals: 1 mentions

Average Sentiment Per Aspect:
  value: NEGATIVE (0 positive, 2 negative)
  visuals: POSITIVE (1 positive, 0 negative)

Overall Sentiment:
  Positive Reviews: 50.00%
  Negative Reviews: 50.00%
";
        assert_eq!(render_report(&sample()), expected);
    }

    #[test]
    fn test_empty_run_report() {
        let report = render_report(&CorpusStatistics::new());
        assert!(report.contains("Total Reviews Processed: 0"));
        assert!(report.contains("Positive Reviews: 0.00%"));
        assert!(report.contains("Negative Reviews: 0.00%"));
    }

    #[test]
    fn test_write_report_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let report_path = dir.path().join("review_statistics.txt");
        let json_path = dir.path().join("review_statistics.json");
        let stats = sample();

        write_report(&report_path, &stats).unwrap();
        write_json(&json_path, &stats).unwrap();

        let report = std::fs::read_to_string(&report_path).unwrap();
        assert_eq!(report, render_report(&stats));

        let json = std::fs::read_to_string(&json_path).unwrap();
        let parsed: CorpusStatistics = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, stats);
    }

    #[test]
    fn test_write_report_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.txt");
        assert!(write_report(&path, &CorpusStatistics::new()).is_err());
    }
}
