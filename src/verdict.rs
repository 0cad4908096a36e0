use serde::{Deserialize, Serialize};

use crate::locale::Locale;
use crate::state::Team;

/// Coarse balance classification sent by the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerdictCode {
    Balanced,
    SlightImbalance,
    SignificantImbalance,
    Unrecognized,
}

impl VerdictCode {
    /// Canonical codes, plus the exact legacy titles older deployments still send.
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim() {
            "BALANCED" | "Balanced Match" => VerdictCode::Balanced,
            "SLIGHT_IMBALANCE" | "Slight Imbalance" => VerdictCode::SlightImbalance,
            "SIGNIFICANT_IMBALANCE" | "Significant Imbalance" => {
                VerdictCode::SignificantImbalance
            }
            _ => VerdictCode::Unrecognized,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedVerdict {
    pub title: &'static str,
    pub detail: &'static str,
    pub favored: Option<Team>,
}

/// Lower average MII is the more favorable side. Ties (and NaN) favor nobody.
pub fn favored_team(blue_avg_mii: f64, red_avg_mii: f64) -> Option<Team> {
    if blue_avg_mii < red_avg_mii {
        Some(Team::Blue)
    } else if red_avg_mii < blue_avg_mii {
        Some(Team::Red)
    } else {
        None
    }
}

pub fn resolve(
    verdict: VerdictCode,
    blue_avg_mii: f64,
    red_avg_mii: f64,
    locale: Locale,
) -> ResolvedVerdict {
    let table = locale.table();
    let favored = favored_team(blue_avg_mii, red_avg_mii);

    match verdict {
        VerdictCode::Balanced => ResolvedVerdict {
            title: table.verdict_balanced,
            detail: table.detail_balanced,
            favored: None,
        },
        VerdictCode::SlightImbalance => ResolvedVerdict {
            title: table.verdict_slight,
            detail: match favored {
                Some(Team::Blue) => table.detail_slight_blue,
                Some(Team::Red) => table.detail_slight_red,
                None => table.detail_balanced,
            },
            favored,
        },
        VerdictCode::SignificantImbalance | VerdictCode::Unrecognized => ResolvedVerdict {
            title: table.verdict_significant,
            detail: match favored {
                Some(Team::Blue) => table.detail_significant_blue,
                Some(Team::Red) => table.detail_significant_red,
                None => table.detail_balanced,
            },
            favored,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MemoKey {
    verdict: VerdictCode,
    blue_bits: u64,
    red_bits: u64,
    locale: Locale,
}

/// Holds the last resolution and only re-resolves when an input changes.
#[derive(Debug, Clone, Default)]
pub struct VerdictMemo {
    entry: Option<(MemoKey, ResolvedVerdict)>,
    resolutions: u64,
}

impl VerdictMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &mut self,
        verdict: VerdictCode,
        blue_avg_mii: f64,
        red_avg_mii: f64,
        locale: Locale,
    ) -> ResolvedVerdict {
        let key = MemoKey {
            verdict,
            blue_bits: blue_avg_mii.to_bits(),
            red_bits: red_avg_mii.to_bits(),
            locale,
        };
        if let Some((cached_key, cached)) = self.entry
            && cached_key == key
        {
            return cached;
        }
        let resolved = resolve(verdict, blue_avg_mii, red_avg_mii, locale);
        self.entry = Some((key, resolved));
        self.resolutions += 1;
        resolved
    }

    pub fn cached(&self) -> Option<ResolvedVerdict> {
        self.entry.map(|(_, resolved)| resolved)
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }

    /// How many times `resolve` actually ran.
    pub fn resolutions(&self) -> u64 {
        self.resolutions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_codes_and_legacy_titles_map_exactly() {
        assert_eq!(VerdictCode::from_wire("BALANCED"), VerdictCode::Balanced);
        assert_eq!(VerdictCode::from_wire("Balanced Match"), VerdictCode::Balanced);
        assert_eq!(
            VerdictCode::from_wire("SLIGHT_IMBALANCE"),
            VerdictCode::SlightImbalance
        );
        assert_eq!(
            VerdictCode::from_wire("Significant Imbalance"),
            VerdictCode::SignificantImbalance
        );
        // Substrings are not enough.
        assert_eq!(
            VerdictCode::from_wire("Slightly Balanced"),
            VerdictCode::Unrecognized
        );
    }

    #[test]
    fn memo_skips_resolution_when_inputs_repeat() {
        let mut memo = VerdictMemo::new();
        let a = memo.get(VerdictCode::SlightImbalance, 30.0, 55.0, Locale::En);
        let b = memo.get(VerdictCode::SlightImbalance, 30.0, 55.0, Locale::En);
        assert_eq!(a, b);
        assert_eq!(memo.resolutions(), 1);

        let c = memo.get(VerdictCode::SlightImbalance, 30.0, 55.0, Locale::Ko);
        assert_ne!(a.title, c.title);
        assert_eq!(memo.resolutions(), 2);
    }

    #[test]
    fn nan_average_favors_nobody() {
        assert_eq!(favored_team(f64::NAN, 10.0), None);
        assert_eq!(favored_team(10.0, 10.0), None);
    }
}
