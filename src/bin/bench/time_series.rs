// Per-Run JSONL Candle Recorder
// Outputs one JSON line per candle for independent analysis

use market_tape_engine::Candle;
use std::io::Write;

/// Write a candle sequence as JSONL (camelCase, same shape as the worker result).
pub fn write_jsonl(path: &std::path::Path, candles: &[Candle]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    for candle in candles {
        let line = serde_json::to_string(candle)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        writeln!(file, "{}", line)?;
    }
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_line_per_candle() {
        let dir = std::env::temp_dir().join(format!("tape-jsonl-{}", std::process::id()));
        let path = dir.join("seed-1.jsonl");
        let candles = [
            Candle { ts_ms: 0, open: 1.0, high: 2.0, low: 0.5, close: 1.5, volume: 3.0 },
            Candle { ts_ms: 60_000, open: 1.5, high: 1.5, low: 1.0, close: 1.0, volume: 1.0 },
        ];
        write_jsonl(&path, &candles).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let back: Candle = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(back, candles[1]);
        assert!(lines[0].contains("\"tsMs\":0"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
