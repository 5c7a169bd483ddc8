//! Output formatting for CLI results

use colorful::Colorful;
use serde::Serialize;

use crate::core::ChannelFingerprint;

/// Number of fingerprints listed per channel in verbose text output
const VERBOSE_LISTING: usize = 10;

/// Everything reported for one input file
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub file: String,
    pub file_hash: String,
    pub sample_rate: u32,
    pub duration_secs: f64,
    pub channels: Vec<ChannelFingerprint>,
}

impl FileReport {
    pub fn total_fingerprints(&self) -> usize {
        self.channels.iter().map(|c| c.fingerprints.len()).sum()
    }
}

/// Format one file's report for the terminal
pub fn format_report(report: &FileReport, verbose: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", report.file.clone().cyan().bold()));
    output.push_str(&format!("  Sample Rate: {} Hz\n", report.sample_rate));
    output.push_str(&format!("  Duration: {:.2}s\n", report.duration_secs));
    output.push_str(&format!("  File Hash: {}\n", report.file_hash));

    for channel in &report.channels {
        let line = format!(
            "  Channel {}: {} peaks, {} fingerprints",
            channel.channel,
            channel.peak_count,
            channel.fingerprints.len()
        );
        if channel.fingerprints.is_empty() {
            output.push_str(&format!("{}\n", line.yellow()));
        } else {
            output.push_str(&format!("{}\n", line.green()));
        }

        if verbose {
            for fp in channel.fingerprints.iter().take(VERBOSE_LISTING) {
                output.push_str(&format!("    {} @ {}\n", fp.hash, fp.offset));
            }
            if channel.fingerprints.len() > VERBOSE_LISTING {
                output.push_str(&format!(
                    "    ... {} more\n",
                    channel.fingerprints.len() - VERBOSE_LISTING
                ));
            }
        }
    }

    output
}

/// Format a failed file for the terminal
pub fn format_failure(file: &str, error: &anyhow::Error) -> String {
    format!(
        "{}\n  {}\n",
        file.to_string().cyan().bold(),
        format!("✗ {:#}", error).red()
    )
}

/// All reports as a pretty-printed JSON array
pub fn format_json(reports: &[FileReport]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(reports)
}

/// Format a summary for multiple files
pub fn format_summary(reports: &[FileReport], failed: usize) -> String {
    let fingerprints: usize = reports.iter().map(FileReport::total_fingerprints).sum();
    let mut output = format!(
        "\nSummary: {} file(s) fingerprinted, {} fingerprints\n",
        reports.len(),
        fingerprints
    );
    if failed > 0 {
        output.push_str(&format!("{}\n", format!("  ✗ {} file(s) failed", failed).red()));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Fingerprint;

    fn report() -> FileReport {
        FileReport {
            file: "test.flac".to_string(),
            file_hash: "DA39A3EE5E6B4B0D3255BFEF95601890AFD80709".to_string(),
            sample_rate: 44100,
            duration_secs: 1.5,
            channels: vec![ChannelFingerprint {
                channel: 0,
                peak_count: 2,
                fingerprints: vec![Fingerprint {
                    hash: "02e2bcfe955b987943db".to_string(),
                    offset: 0,
                }],
            }],
        }
    }

    #[test]
    fn test_format_report() {
        let output = format_report(&report(), true);
        assert!(output.contains("test.flac"));
        assert!(output.contains("2 peaks, 1 fingerprints"));
        assert!(output.contains("02e2bcfe955b987943db @ 0"));

        let quiet = format_report(&report(), false);
        assert!(!quiet.contains("02e2bcfe955b987943db"));
    }

    #[test]
    fn test_format_json() {
        let json = format_json(&[report()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["file"], "test.flac");
        assert_eq!(value[0]["sampleRate"], 44100);
        assert_eq!(value[0]["channels"][0]["peakCount"], 2);
        assert_eq!(value[0]["channels"][0]["fingerprints"][0]["hash"], "02e2bcfe955b987943db");
        assert_eq!(value[0]["channels"][0]["fingerprints"][0]["offset"], 0);
    }

    #[test]
    fn test_format_summary() {
        let summary = format_summary(&[report(), report()], 1);
        assert!(summary.contains("2 file(s) fingerprinted, 2 fingerprints"));
        assert!(summary.contains("1 file(s) failed"));
    }
}
