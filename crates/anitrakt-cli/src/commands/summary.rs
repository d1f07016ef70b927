use crate::output::{Output, OutputFormat};
use color_eyre::eyre::Context;
use color_eyre::Result;
use mal_enrich_models::{ChangeDetail, MediaKind, RunStats};
use std::fmt::Write as _;

fn batch_title(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Tv => "Tv",
        MediaKind::Movies => "Movies",
    }
}

/// Render the per-batch run summaries as markdown: a Before/After/Diff
/// totals table per batch plus a detail table for each non-empty change
/// bucket.
pub fn render_markdown(batches: &[RunStats]) -> String {
    let mut md = String::new();

    for stats in batches {
        let diff = stats.total_after as i64 - stats.total_before as i64;
        let _ = writeln!(md, "\n## {} - Summary\n", batch_title(stats.media_type));
        let _ = writeln!(md, "| Metric | Before | After | Diff |");
        let _ = writeln!(md, "|--------|--------|-------|------|");
        let _ = writeln!(
            md,
            "| Total Entries | {} | {} | {diff:+} |",
            stats.total_before, stats.total_after
        );
        let _ = writeln!(md, "| Created | - | {0} | +{0} |", stats.created());
        let _ = writeln!(md, "| Updated | - | {0} | +{0} |", stats.updated());
        let _ = writeln!(md, "| Modified (Overridden) | - | {0} | +{0} |", stats.modified());
        let _ = writeln!(md, "| Not Found | - | {0} | +{0} |", stats.not_found());

        detail_table(&mut md, "✨ Created", &stats.created_details);
        detail_table(&mut md, "🔄 Updated", &stats.updated_details);
        detail_table(&mut md, "🔧 Modified via Override", &stats.modified_details);
        detail_table(&mut md, "❌ Not Found", &stats.not_found_details);
    }

    md
}

fn detail_table(md: &mut String, heading: &str, details: &[ChangeDetail]) {
    if details.is_empty() {
        return;
    }

    let _ = writeln!(md, "\n### {heading} ({})\n", details.len());
    let _ = writeln!(md, "| Title | MAL ID | Reason |");
    let _ = writeln!(md, "|-------|--------|--------|");
    for detail in details {
        let _ = writeln!(md, "| {} | {} | {} |", detail.title, detail.mal_id, detail.reason);
    }
}

/// Report run summaries: append to `$GITHUB_STEP_SUMMARY` when running in
/// CI, otherwise emit through the output handler (structured in JSON
/// modes, markdown for humans).
pub fn report(batches: &[RunStats], output: &Output) -> Result<()> {
    if batches.is_empty() {
        return Ok(());
    }

    if let Ok(path) = std::env::var("GITHUB_STEP_SUMMARY") {
        use std::io::Write;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open step summary file {path}"))?;
        file.write_all(render_markdown(batches).as_bytes())
            .context("failed to write step summary")?;
        return Ok(());
    }

    match output.format() {
        OutputFormat::Human => output.println(render_markdown(batches)),
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&serde_json::to_value(batches).context("failed to serialize summary")?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mal_enrich_models::Change;

    #[test]
    fn markdown_includes_totals_and_nonempty_buckets_only() {
        let mut stats = RunStats::new(MediaKind::Tv, 10);
        stats.total_after = 11;
        stats.record(Change::Created, 1, "New Show", "new record");
        stats.record(Change::NotFound, 2, "Gone Show", "no canonical match");

        let md = render_markdown(&[stats]);

        assert!(md.contains("## Tv - Summary"));
        assert!(md.contains("| Total Entries | 10 | 11 | +1 |"));
        assert!(md.contains("| Created | - | 1 | +1 |"));
        assert!(md.contains("### ✨ Created (1)"));
        assert!(md.contains("| New Show | 1 | new record |"));
        assert!(md.contains("### ❌ Not Found (1)"));
        assert!(!md.contains("### 🔄 Updated"));
        assert!(!md.contains("### 🔧 Modified"));
    }

    #[test]
    fn totals_diff_is_signed() {
        let mut stats = RunStats::new(MediaKind::Movies, 5);
        stats.total_after = 3;

        let md = render_markdown(&[stats]);
        assert!(md.contains("| Total Entries | 5 | 3 | -2 |"));
    }

    #[test]
    fn markdown_renders_one_section_per_batch() {
        let tv = RunStats::new(MediaKind::Tv, 0);
        let movies = RunStats::new(MediaKind::Movies, 0);

        let md = render_markdown(&[tv, movies]);
        assert!(md.contains("## Tv - Summary"));
        assert!(md.contains("## Movies - Summary"));
    }
}
