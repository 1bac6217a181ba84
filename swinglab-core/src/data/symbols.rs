//! Symbol-list loading from CSV files.
//!
//! Two header conventions are recognized: the standard `symbol,name` layout
//! and the CBOE weekly-options directory (`Stock Symbol,Company Name`).
//! Files with neither header fall back to the first column. Symbols are
//! trimmed and uppercased; blank entries and `#`-prefixed comment rows are
//! skipped, and duplicates keep their first position.

use super::provider::DataError;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// Company-name substrings that mark non-equity rows in the CBOE directory.
const CBOE_EXCLUDED_NAMES: [&str; 5] = ["ETF", "FUTURES", "VIX", "BITCOIN", "ETHER"];

/// CBOE symbols longer than this are structured products, not common stock.
const CBOE_MAX_SYMBOL_LEN: usize = 5;

/// Load symbols from a `symbol,name`, CBOE, or unknown-header CSV file.
pub fn load_symbols(path: &Path) -> Result<Vec<String>, DataError> {
    let file = open(path)?;
    parse_symbols(file, false).map_err(|e| file_error(path, e))
}

/// Load symbols from a CBOE weekly-options directory, dropping ETFs,
/// futures products, volatility/crypto products, and long symbols.
pub fn load_cboe_symbols(path: &Path) -> Result<Vec<String>, DataError> {
    let file = open(path)?;
    parse_symbols(file, true).map_err(|e| file_error(path, e))
}

fn open(path: &Path) -> Result<std::fs::File, DataError> {
    std::fs::File::open(path).map_err(|e| file_error(path, e))
}

fn file_error(path: &Path, e: impl std::fmt::Display) -> DataError {
    DataError::SymbolFile(format!("{}: {e}", path.display()))
}

fn parse_symbols<R: Read>(reader: R, cboe: bool) -> Result<Vec<String>, csv::Error> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();

    let symbol_col = headers
        .iter()
        .position(|h| h.trim() == "Stock Symbol")
        .or_else(|| headers.iter().position(|h| h.trim() == "symbol"))
        .unwrap_or(0);
    let name_col = headers.iter().position(|h| h.trim() == "Company Name");

    let mut seen = HashSet::new();
    let mut symbols = Vec::new();

    for record in reader.records() {
        let record = record?;
        let Some(raw) = record.get(symbol_col) else {
            continue;
        };
        let symbol = raw.trim().to_uppercase();
        if symbol.is_empty() || symbol.starts_with('#') {
            continue;
        }

        if cboe {
            if symbol.len() > CBOE_MAX_SYMBOL_LEN {
                continue;
            }
            if let Some(col) = name_col {
                let name = record.get(col).unwrap_or("").to_uppercase();
                if CBOE_EXCLUDED_NAMES.iter().any(|kw| name.contains(kw)) {
                    continue;
                }
            }
        }

        if seen.insert(symbol.clone()) {
            symbols.push(symbol);
        }
    }

    Ok(symbols)
}

/// Starter candidate list written when the expected file is missing.
pub const EXAMPLE_STOCKS: [(&str, &str); 15] = [
    ("AAPL", "Apple Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("GOOGL", "Alphabet Inc."),
    ("AMZN", "Amazon.com Inc."),
    ("TSLA", "Tesla Inc."),
    ("NVDA", "NVIDIA Corporation"),
    ("META", "Meta Platforms Inc."),
    ("NFLX", "Netflix Inc."),
    ("JPM", "JPMorgan Chase & Co."),
    ("JNJ", "Johnson & Johnson"),
    ("V", "Visa Inc."),
    ("PG", "Procter & Gamble"),
    ("UNH", "UnitedHealth Group"),
    ("HD", "Home Depot"),
    ("MA", "Mastercard Inc."),
];

/// Write the example candidate file in the standard `symbol,name` layout.
pub fn write_example_file(path: &Path) -> Result<(), DataError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| file_error(path, e))?;
    writer
        .write_record(["symbol", "name"])
        .map_err(|e| file_error(path, e))?;
    for (symbol, name) in EXAMPLE_STOCKS {
        writer
            .write_record([symbol, name])
            .map_err(|e| file_error(path, e))?;
    }
    writer.flush().map_err(|e| file_error(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_header() {
        let csv = "symbol,name\naapl,Apple\n MSFT ,Microsoft\n,blank\n#SKIP,comment\n";
        let symbols = parse_symbols(csv.as_bytes(), false).unwrap();
        assert_eq!(symbols, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn parses_cboe_header_without_cboe_filtering() {
        let csv = "Stock Symbol,Company Name\nAAPL,Apple Inc.\nSPACELONG,Some Corp\n";
        let symbols = parse_symbols(csv.as_bytes(), false).unwrap();
        // Plain mode takes the CBOE column but applies no product filter.
        assert_eq!(symbols, vec!["AAPL", "SPACELONG"]);
    }

    #[test]
    fn unknown_header_falls_back_to_first_column() {
        let csv = "ticker,desc\nibm,International\nge,General Electric\n";
        let symbols = parse_symbols(csv.as_bytes(), false).unwrap();
        assert_eq!(symbols, vec!["IBM", "GE"]);
    }

    #[test]
    fn cboe_mode_filters_products_and_long_symbols() {
        let csv = "Stock Symbol,Company Name\n\
                   AAPL,Apple Inc.\n\
                   SPY,SPDR S&P 500 ETF Trust\n\
                   VX,Cboe VIX Futures\n\
                   BITO,Bitcoin Strategy Fund\n\
                   TOOLONG,Regular Company\n\
                   MSFT,Microsoft Corporation\n";
        let symbols = parse_symbols(csv.as_bytes(), true).unwrap();
        assert_eq!(symbols, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn duplicates_keep_first_position() {
        let csv = "symbol,name\nAAPL,Apple\nMSFT,Microsoft\naapl,Apple again\n";
        let symbols = parse_symbols(csv.as_bytes(), false).unwrap();
        assert_eq!(symbols, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn empty_file_yields_no_symbols() {
        let symbols = parse_symbols("symbol,name\n".as_bytes(), false).unwrap();
        assert!(symbols.is_empty());
    }

    #[test]
    fn example_file_roundtrips() {
        let dir = std::env::temp_dir().join(format!("swinglab-symbols-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("candidates.csv");

        write_example_file(&path).unwrap();
        let symbols = load_symbols(&path).unwrap();
        assert_eq!(symbols.len(), EXAMPLE_STOCKS.len());
        assert_eq!(symbols[0], "AAPL");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_file_is_a_symbol_file_error() {
        let err = load_symbols(Path::new("/nonexistent/nowhere.csv")).unwrap_err();
        assert!(matches!(err, DataError::SymbolFile(_)));
    }
}
