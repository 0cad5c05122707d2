use crate::analysis::BatchReport;
use crate::pipeline::ClassificationResult;

const RED_BOLD: &str = "\x1b[1;31m";
const GREEN_BOLD: &str = "\x1b[1;32m";
const RESET: &str = "\x1b[0m";

pub fn verdict_label(has_crack: bool) -> &'static str {
    if has_crack {
        "Crack detected"
    } else {
        "No crack detected"
    }
}

/// Terminal styling is off when `NO_COLOR` is set to anything non-empty.
pub fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").map_or(true, |v| v.is_empty())
}

/// Verdict label, red for a crack and green otherwise.
pub fn styled_verdict(has_crack: bool, color: bool) -> String {
    let label = verdict_label(has_crack);
    if !color {
        return label.to_string();
    }
    let style = if has_crack { RED_BOLD } else { GREEN_BOLD };
    format!("{style}{label}{RESET}")
}

pub fn print_result(result: &ClassificationResult) {
    println!("{}", styled_verdict(result.has_crack, color_enabled()));
    println!("  Source: {}", result.source_path.display());
    println!("  Output: {}", result.output_path.display());
    println!("  Threshold: {}", result.threshold);
    println!("  White ratio: {:.4}%", result.white_ratio * 100.0);
    println!("  Dimensions: {}x{}", result.width, result.height);
    println!("  Processing Time: {:.2}ms", result.total_duration_ms());
}

pub fn print_batch_table(report: &BatchReport) {
    println!("| Image | Verdict | Threshold | White (%) | Time (ms) |");
    println!("|-------|---------|-----------|-----------|-----------|");

    for entry in &report.entries {
        let name = entry
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| entry.path.display().to_string());
        match (&entry.result, &entry.error) {
            (Some(r), _) => println!(
                "| {} | {} | {} | {:.4} | {:.2} |",
                name,
                verdict_label(r.has_crack),
                r.threshold,
                r.white_ratio * 100.0,
                r.total_duration_ms()
            ),
            (None, error) => println!(
                "| {} | error: {} | - | - | - |",
                name,
                error.as_deref().unwrap_or("unknown")
            ),
        }
    }

    let s = &report.summary;
    println!();
    println!(
        "Total: {}  Cracked: {}  Clean: {}  Failed: {}",
        s.total, s.cracked, s.clean, s.failed
    );
    if let Some(mean) = s.mean_threshold {
        println!("Mean threshold: {mean:.1}");
    }
    println!("Elapsed: {:.2}ms", report.elapsed_ms);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(verdict_label(true), "Crack detected");
        assert_eq!(verdict_label(false), "No crack detected");
    }

    #[test]
    fn test_styling_can_be_disabled() {
        assert_eq!(styled_verdict(true, false), "Crack detected");
        let styled = styled_verdict(false, true);
        assert!(styled.starts_with(GREEN_BOLD));
        assert!(styled.ends_with(RESET));
        assert!(styled.contains("No crack detected"));
    }
}
