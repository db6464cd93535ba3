//! Output formatting for CLI results

use colorful::Colorful;

use crate::detection::{ArtifactEntry, DetectionOutcome, GenerationListing};

/// Format a detection outcome for the terminal
pub fn format_outcome(outcome: &DetectionOutcome) -> String {
    let line = format!("{} {}", outcome.symbol(), outcome.description());
    match outcome {
        DetectionOutcome::Completed(_) => line.as_str().green().to_string(),
        DetectionOutcome::OutputMissing { .. } => line.as_str().yellow().to_string(),
        DetectionOutcome::DetectorFailed(_) => line.as_str().red().to_string(),
    }
}

/// Format the "Detected Pest" listing for the terminal
pub fn format_listing(listing: &GenerationListing, verbose: bool) -> String {
    if listing.is_empty() {
        return "No detected files available.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "Detected files in {} ({}):\n",
        listing.dir.display(),
        listing.len()
    ));

    for entry in &listing.artifacts {
        output.push_str(&format_entry(entry, verbose));
    }

    output
}

fn format_entry(entry: &ArtifactEntry, verbose: bool) -> String {
    let mut output = format!(
        "  {} [{}] {}\n",
        entry.name.as_str().cyan(),
        entry.kind,
        format_size(entry.size_bytes)
    );

    if verbose {
        output.push_str(&format!("      path: {}\n", entry.path.display()));
        if let Some(modified) = entry.modified {
            output.push_str(&format!("      modified: {}\n", modified.to_rfc3339()));
        }
    }
    if let Some(md5) = &entry.md5 {
        output.push_str(&format!("      md5: {}\n", md5));
    }

    output
}

/// Format the listing as JSON
pub fn format_listing_json(listing: &GenerationListing) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&listing.artifacts)?)
}

fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;

    let b = bytes as f64;
    if b >= MIB {
        format!("{:.1} MiB", b / MIB)
    } else if b >= KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{} B", bytes)
    }
}
