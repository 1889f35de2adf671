//! Parsing of Mesonet Data Format (MDF) files.
//!
//! An MDF file starts with a copyright line and a timestamp line, followed by a header row and
//! one row per station. Columns are aligned with runs of spaces rather than a single separator.

use crate::feed::error::FeedError;
use polars::prelude::*;
use std::io::Cursor;

const PREAMBLE_LINES: usize = 2;

/// Values the Mesonet writes in place of missing or flagged observations.
pub(crate) const MISSING_SENTINELS: [&str; 6] = ["-999", "-998", "-997", "-996", "-995", "-994"];
pub(crate) const MISSING_SENTINEL_VALUES: [f64; 6] =
    [-999.0, -998.0, -997.0, -996.0, -995.0, -994.0];

/// Drops the preamble and rewrites the whitespace-aligned body as comma separated rows.
fn normalize(text: &str, source: &str) -> Result<String, FeedError> {
    let body: Vec<String> = text
        .lines()
        .skip(PREAMBLE_LINES)
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(","))
        .filter(|line| !line.is_empty())
        .collect();

    if body.is_empty() {
        return Err(FeedError::MissingHeader {
            url: source.to_string(),
        });
    }
    Ok(body.join("\n"))
}

/// Parses MDF text into a DataFrame with the file's own column names.
///
/// Missing-value sentinels become nulls. `source` is only used in error messages.
pub(crate) fn parse_mdf(text: &str, source: &str) -> Result<DataFrame, FeedError> {
    let csv = normalize(text, source)?;

    let parse_options = CsvParseOptions::default().with_null_values(Some(NullValues::AllColumns(
        MISSING_SENTINELS.iter().map(|s| (*s).into()).collect(),
    )));

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(parse_options)
        .into_reader_with_file_handle(Cursor::new(csv.into_bytes()))
        .finish()
        .map_err(|e| FeedError::Parse {
            url: source.to_string(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::DAILY_MDF;

    #[test]
    fn test_parse_mdf_skips_preamble() -> Result<(), Box<dyn std::error::Error>> {
        let df = parse_mdf(DAILY_MDF, "fixture")?;

        assert_eq!(df.height(), 4);
        let stations: Vec<Option<&str>> = df.column("STID")?.str()?.into_iter().collect();
        assert_eq!(
            stations,
            vec![Some("ACME"), Some("ADAX"), Some("ALTU"), Some("BOIS")]
        );
        Ok(())
    }

    #[test]
    fn test_parse_mdf_nulls_sentinels() -> Result<(), Box<dyn std::error::Error>> {
        let df = parse_mdf(DAILY_MDF, "fixture")?;

        // ALTU reports -996 for RAIN and BOIS -999 for TMAX.
        assert_eq!(df.column("RAIN")?.null_count(), 1);
        assert_eq!(df.column("TMAX")?.null_count(), 1);
        Ok(())
    }

    #[test]
    fn test_parse_mdf_without_body() {
        let text = "  101 ! (c) Oklahoma Climatological Survey\n 24 2024 03 15 00 00 00\n";
        let err = parse_mdf(text, "empty").unwrap_err();
        assert!(matches!(err, FeedError::MissingHeader { url } if url == "empty"));
    }
}
