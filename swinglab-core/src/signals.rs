//! Pattern detection — local extreme/close highs and lows over 3-bar windows.
//!
//! A local extreme high is a day whose high exceeds the highs of both its
//! chronological neighbors; the close variants compare closes, and the low
//! variants mirror with lows. All four comparisons are strict: a tie with
//! either neighbor is not a signal.
//!
//! One predicate set over a {prior, candidate, next} triple serves both call
//! conventions: scanning the latest closed day of a feed and walking
//! arbitrary historical indices during simulation.

use crate::domain::Bar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Bars required to evaluate one candidate day.
pub const DETECTION_WINDOW: usize = 3;

/// The four reversal pattern kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    LocalExtremeHigh,
    LocalCloseHigh,
    LocalExtremeLow,
    LocalCloseLow,
}

impl PatternKind {
    /// All kinds in reporting order.
    pub const ALL: [PatternKind; 4] = [
        PatternKind::LocalExtremeHigh,
        PatternKind::LocalCloseHigh,
        PatternKind::LocalExtremeLow,
        PatternKind::LocalCloseLow,
    ];

    /// Wire name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::LocalExtremeHigh => "local_extreme_high",
            PatternKind::LocalCloseHigh => "local_close_high",
            PatternKind::LocalExtremeLow => "local_extreme_low",
            PatternKind::LocalCloseLow => "local_close_low",
        }
    }

    /// Human label for console reports.
    pub fn label(&self) -> &'static str {
        match self {
            PatternKind::LocalExtremeHigh => "Local Extreme Highs",
            PatternKind::LocalCloseHigh => "Local Close Highs",
            PatternKind::LocalExtremeLow => "Local Extreme Lows",
            PatternKind::LocalCloseLow => "Local Close Lows",
        }
    }
}

/// Outcome of evaluating one candidate day against its two neighbors.
///
/// Several kinds can fire on the same day (an extreme high is usually also
/// a close high); the strategy cares only about the high/low split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSet {
    pub extreme_high: bool,
    pub close_high: bool,
    pub extreme_low: bool,
    pub close_low: bool,
}

impl PatternSet {
    /// No pattern fired.
    pub const NONE: PatternSet = PatternSet {
        extreme_high: false,
        close_high: false,
        extreme_low: false,
        close_low: false,
    };

    pub fn any(&self) -> bool {
        self.extreme_high || self.close_high || self.extreme_low || self.close_low
    }

    /// A low pattern — the strategy's entry trigger.
    pub fn entry_signal(&self) -> bool {
        self.extreme_low || self.close_low
    }

    /// A high pattern — the strategy's exit trigger.
    pub fn exit_signal(&self) -> bool {
        self.extreme_high || self.close_high
    }

    pub fn contains(&self, kind: PatternKind) -> bool {
        match kind {
            PatternKind::LocalExtremeHigh => self.extreme_high,
            PatternKind::LocalCloseHigh => self.close_high,
            PatternKind::LocalExtremeLow => self.extreme_low,
            PatternKind::LocalCloseLow => self.close_low,
        }
    }
}

/// Evaluate all four predicates for a candidate day against its neighbors.
pub fn evaluate(prior: &Bar, candidate: &Bar, next: &Bar) -> PatternSet {
    PatternSet {
        extreme_high: candidate.high > prior.high.max(next.high),
        close_high: candidate.close > prior.close.max(next.close),
        extreme_low: candidate.low < prior.low.min(next.low),
        close_low: candidate.close < prior.close.min(next.close),
    }
}

/// Historical mode: evaluate index `i` against its immediate neighbors.
///
/// Out-of-range indices (`i == 0`, the last bar, series shorter than 3)
/// yield no signals rather than an error; simulation loops never have to
/// bounds-check.
pub fn evaluate_at(bars: &[Bar], i: usize) -> PatternSet {
    if bars.len() < DETECTION_WINDOW || i == 0 || i >= bars.len() - 1 {
        return PatternSet::NONE;
    }
    evaluate(&bars[i - 1], &bars[i], &bars[i + 1])
}

/// Latest-day mode: evaluate yesterday, the middle of the trailing 3 bars.
pub fn evaluate_latest(bars: &[Bar]) -> PatternSet {
    if bars.len() < DETECTION_WINDOW {
        return PatternSet::NONE;
    }
    evaluate_at(bars, bars.len() - 2)
}

/// One detected pattern on one symbol-day, in report form.
///
/// `high_price` is set only for extreme highs and `low_price` only for
/// extreme lows; the close variants carry just the close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternHit {
    #[serde(rename = "type")]
    pub kind: PatternKind,
    pub symbol: String,
    pub date: NaiveDate,
    pub close_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_price: Option<f64>,
}

/// Evaluate yesterday over the trailing 3 bars and report every pattern it
/// triggered, in [`PatternKind::ALL`] order. Fewer than 3 bars yields none.
pub fn detect_latest(symbol: &str, bars: &[Bar]) -> Vec<PatternHit> {
    let set = evaluate_latest(bars);
    if !set.any() {
        return Vec::new();
    }

    let yesterday = &bars[bars.len() - 2];
    let mut hits = Vec::with_capacity(4);
    for kind in PatternKind::ALL {
        if !set.contains(kind) {
            continue;
        }
        hits.push(PatternHit {
            kind,
            symbol: symbol.to_string(),
            date: yesterday.date,
            close_price: yesterday.close,
            high_price: match kind {
                PatternKind::LocalExtremeHigh => Some(yesterday.high),
                _ => None,
            },
            low_price: match kind {
                PatternKind::LocalExtremeLow => Some(yesterday.low),
                _ => None,
            },
        });
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: (i32, u32, u32), high: f64, low: f64, close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            open: (high + low) / 2.0,
            high,
            low,
            close,
            volume: 1_000,
        }
    }

    /// Three-day fixture: highs [150, 155, 152], lows [145, 140, 149],
    /// closes [148, 153, 151]. The middle day is an extreme high, a close
    /// high, and an extreme low all at once.
    fn sample_bars() -> Vec<Bar> {
        vec![
            bar((2024, 1, 2), 150.0, 145.0, 148.0),
            bar((2024, 1, 3), 155.0, 140.0, 153.0),
            bar((2024, 1, 4), 152.0, 149.0, 151.0),
        ]
    }

    #[test]
    fn detects_overlapping_patterns_on_one_day() {
        let set = evaluate_latest(&sample_bars());
        assert!(set.extreme_high); // 155 > max(150, 152)
        assert!(set.close_high); // 153 > max(148, 151)
        assert!(set.extreme_low); // 140 < min(145, 149)
        assert!(!set.close_low); // 153 is above both closes
        assert!(set.any());
        assert!(set.entry_signal());
        assert!(set.exit_signal());
    }

    #[test]
    fn ties_are_not_signals() {
        // Candidate high equals the prior high: strict comparison fails.
        let bars = vec![
            bar((2024, 1, 2), 155.0, 145.0, 148.0),
            bar((2024, 1, 3), 155.0, 140.0, 148.0),
            bar((2024, 1, 4), 152.0, 149.0, 151.0),
        ];
        let set = evaluate_latest(&bars);
        assert!(!set.extreme_high);
        assert!(!set.close_high); // 148 == 148 on the prior close

        // Candidate low equals the next low.
        let bars = vec![
            bar((2024, 1, 2), 150.0, 145.0, 148.0),
            bar((2024, 1, 3), 155.0, 140.0, 153.0),
            bar((2024, 1, 4), 152.0, 140.0, 151.0),
        ];
        assert!(!evaluate_latest(&bars).extreme_low);
    }

    #[test]
    fn flat_series_has_no_signals() {
        let bars: Vec<Bar> = (2..12)
            .map(|d| bar((2024, 1, d), 100.0, 100.0, 100.0))
            .collect();
        for i in 0..bars.len() {
            assert_eq!(evaluate_at(&bars, i), PatternSet::NONE);
        }
    }

    #[test]
    fn out_of_range_indices_are_silent() {
        let bars = sample_bars();
        assert_eq!(evaluate_at(&bars, 0), PatternSet::NONE);
        assert_eq!(evaluate_at(&bars, 2), PatternSet::NONE);
        assert_eq!(evaluate_at(&bars, 99), PatternSet::NONE);
        assert_eq!(evaluate_at(&bars[..2], 1), PatternSet::NONE);
        assert_eq!(evaluate_at(&[], 0), PatternSet::NONE);
    }

    #[test]
    fn latest_mode_matches_historical_mode() {
        let bars = sample_bars();
        assert_eq!(evaluate_latest(&bars), evaluate_at(&bars, 1));
    }

    #[test]
    fn latest_mode_requires_three_bars() {
        let bars = sample_bars();
        assert_eq!(evaluate_latest(&bars[..2]), PatternSet::NONE);
        assert!(detect_latest("AAPL", &bars[..2]).is_empty());
    }

    #[test]
    fn detect_latest_reports_hit_fields() {
        let hits = detect_latest("AAPL", &sample_bars());
        let kinds: Vec<PatternKind> = hits.iter().map(|h| h.kind).collect();
        assert_eq!(
            kinds,
            vec![
                PatternKind::LocalExtremeHigh,
                PatternKind::LocalCloseHigh,
                PatternKind::LocalExtremeLow,
            ]
        );

        for hit in &hits {
            assert_eq!(hit.symbol, "AAPL");
            assert_eq!(hit.date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
            assert_eq!(hit.close_price, 153.0);
        }

        assert_eq!(hits[0].high_price, Some(155.0));
        assert_eq!(hits[0].low_price, None);
        assert_eq!(hits[1].high_price, None);
        assert_eq!(hits[1].low_price, None);
        assert_eq!(hits[2].low_price, Some(140.0));
    }

    #[test]
    fn hit_serializes_with_type_tag_and_omits_absent_prices() {
        let hits = detect_latest("AAPL", &sample_bars());

        let extreme = serde_json::to_string(&hits[0]).unwrap();
        assert!(extreme.contains("\"type\":\"local_extreme_high\""));
        assert!(extreme.contains("\"high_price\":155.0"));
        assert!(!extreme.contains("low_price"));

        let close = serde_json::to_string(&hits[1]).unwrap();
        assert!(close.contains("\"type\":\"local_close_high\""));
        assert!(!close.contains("high_price"));

        let deser: PatternHit = serde_json::from_str(&close).unwrap();
        assert_eq!(deser, hits[1]);
    }

    #[test]
    fn kind_wire_names_match_serde() {
        for kind in PatternKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn evaluate_is_symmetric_in_neighbor_order_for_max() {
        let bars = sample_bars();
        let forward = evaluate(&bars[0], &bars[1], &bars[2]);
        let swapped = evaluate(&bars[2], &bars[1], &bars[0]);
        assert_eq!(forward, swapped);
    }
}
