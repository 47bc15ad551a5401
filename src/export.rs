use crate::simulation::{RecordError, RunSnapshot};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Saved run is inconsistent: {0}")]
    InvalidRun(#[from] RecordError),
}

/// Write a closed run as pretty-printed JSON
pub fn write_json(snapshot: &RunSnapshot, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, json)?;
    log::info!("saved {} hands to {}", snapshot.results.len(), path.display());
    Ok(())
}

/// Load a run written by [`write_json`], re-checking its invariants
pub fn read_json(path: impl AsRef<Path>) -> Result<RunSnapshot, ExportError> {
    let content = std::fs::read_to_string(path)?;
    let snapshot: RunSnapshot = serde_json::from_str(&content)?;
    snapshot.validate()?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;
    use crate::simulation::{draw_hand, Decision, DepthWeights, ResultRecord, Run};
    use chrono::Utc;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("mulligan-sim-{}-{}", std::process::id(), name))
    }

    fn sample_run() -> RunSnapshot {
        let deck = Deck::load([("Mountain", 20), ("Lightning Bolt", 4)]).unwrap();
        let mut run = Run::new("Burn", 3);
        let first = draw_hand(&deck, 1, &DepthWeights::default()).unwrap();
        run.push(ResultRecord::new(1, &first, Decision::Keep, None, Utc::now()).unwrap())
            .unwrap();
        let second = draw_hand(&deck, 2, &DepthWeights::default()).unwrap();
        let kept = second.cards[..2].to_vec();
        run.push(ResultRecord::new(2, &second, Decision::Mulligan, Some(kept), Utc::now()).unwrap())
            .unwrap();
        run.close()
    }

    #[test]
    fn test_write_then_read() {
        let path = temp_path("roundtrip.json");
        let snapshot = sample_run();

        write_json(&snapshot, &path).expect("write should succeed");
        let loaded = read_json(&path).expect("read should succeed");
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, snapshot);
        assert_eq!(loaded.total_hands, 3);
        assert_eq!(loaded.results.len(), 2);
    }

    #[test]
    fn test_written_json_is_indented() {
        let path = temp_path("indent.json");
        write_json(&sample_run(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(text.contains("\n  \"total_hands\": 3"));
        assert!(text.contains("\"cards_to_keep\": null"));
    }

    #[test]
    fn test_read_rejects_inconsistent_run() {
        let path = temp_path("gap.json");
        let mut value = serde_json::to_value(sample_run()).unwrap();
        value["results"][1]["hand_number"] = serde_json::json!(5);
        std::fs::write(&path, value.to_string()).unwrap();

        let result = read_json(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ExportError::InvalidRun(RecordError::OutOfSequence { .. }))));
    }

    #[test]
    fn test_read_missing_file() {
        assert!(matches!(read_json(temp_path("missing.json")), Err(ExportError::IoError(_))));
    }
}
