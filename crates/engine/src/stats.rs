use std::collections::BTreeMap;
use std::fmt;

use crate::processor::PartialResult;

/// Running min/max/sum/count statistics for one station.
///
/// All values are measurements scaled by 10 ("tenths"): the input grammar
/// guarantees exactly one fractional digit, so the scaled representation is
/// exact and summation loses no precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accumulator {
    pub min: i64,
    pub max: i64,
    pub sum: i64,
    pub count: u64,
}

impl Accumulator {
    pub fn new(tenths: i64) -> Self {
        Self {
            min: tenths,
            max: tenths,
            sum: tenths,
            count: 1,
        }
    }

    pub fn add(&mut self, tenths: i64) {
        if tenths < self.min {
            self.min = tenths;
        }
        if tenths > self.max {
            self.max = tenths;
        }
        self.sum += tenths;
        self.count += 1;
    }

    /// Fold another accumulator into this one.
    ///
    /// The operation is associative and commutative, so any pairwise or tree
    /// fold over partial results yields an identical global result.
    pub fn merge(&mut self, other: &Accumulator) {
        if other.min < self.min {
            self.min = other.min;
        }
        if other.max > self.max {
            self.max = other.max;
        }
        self.sum += other.sum;
        self.count += other.count;
    }

    /// Arithmetic mean in tenths, rounded half away from zero.
    pub fn mean_tenths(&self) -> i64 {
        if self.count == 0 {
            return 0;
        }
        div_round_half_away(self.sum, self.count as i64)
    }
}

fn div_round_half_away(numer: i64, denom: i64) -> i64 {
    debug_assert!(denom > 0);
    if numer >= 0 {
        (2 * numer + denom) / (2 * denom)
    } else {
        -((-2 * numer + denom) / (2 * denom))
    }
}

/// Render a scaled-tenths value with exactly one fractional digit.
pub fn format_tenths(tenths: i64) -> String {
    let sign = if tenths < 0 { "-" } else { "" };
    let abs = tenths.unsigned_abs();
    format!("{sign}{}.{}", abs / 10, abs % 10)
}

/// The fully merged accumulator mapping across all chunks, sorted by raw
/// station bytes. Immutable once built; consumed by the formatter.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    stations: BTreeMap<Box<[u8]>, Accumulator>,
}

impl Summary {
    /// Merge any number of partial results. Order-independent: merging in any
    /// order equals a single-worker pass over the same records.
    pub fn from_partials<I>(partials: I) -> Self
    where
        I: IntoIterator<Item = PartialResult>,
    {
        let mut stations: BTreeMap<Box<[u8]>, Accumulator> = BTreeMap::new();
        for partial in partials {
            for (station, acc) in partial {
                match stations.get_mut(&station) {
                    Some(existing) => existing.merge(&acc),
                    None => {
                        stations.insert(station, acc);
                    }
                }
            }
        }
        Self { stations }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn get(&self, station: &[u8]) -> Option<&Accumulator> {
        self.stations.get(station)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &Accumulator)> {
        self.stations.iter().map(|(k, v)| (k.as_ref(), v))
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (station, acc)) in self.stations.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(
                f,
                "{}={}/{}/{}",
                String::from_utf8_lossy(station),
                format_tenths(acc.min),
                format_tenths(acc.mean_tenths()),
                format_tenths(acc.max),
            )?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(records: &[(&str, i64)]) -> PartialResult {
        let mut map = PartialResult::default();
        for &(station, tenths) in records {
            match map.get_mut(station.as_bytes()) {
                Some(acc) => acc.add(tenths),
                None => {
                    map.insert(station.as_bytes().into(), Accumulator::new(tenths));
                }
            }
        }
        map
    }

    #[test]
    fn accumulator_tracks_min_max_sum_count() {
        let mut acc = Accumulator::new(120);
        acc.add(-23);
        assert_eq!(acc.min, -23);
        assert_eq!(acc.max, 120);
        assert_eq!(acc.sum, 97);
        assert_eq!(acc.count, 2);
    }

    #[test]
    fn merge_is_commutative() {
        let a = {
            let mut acc = Accumulator::new(389);
            acc.add(-51);
            acc
        };
        let b = Accumulator::new(412);

        let mut ab = a;
        ab.merge(&b);
        let mut ba = b;
        ba.merge(&a);
        assert_eq!(ab, ba);
    }

    #[test]
    fn merge_is_associative() {
        let a = Accumulator::new(10);
        let b = Accumulator::new(-40);
        let c = Accumulator::new(305);

        let mut left = a;
        left.merge(&b);
        left.merge(&c);

        let mut bc = b;
        bc.merge(&c);
        let mut right = a;
        right.merge(&bc);

        assert_eq!(left, right);
    }

    #[test]
    fn mean_rounds_half_away_from_zero() {
        let mut acc = Accumulator::new(120);
        acc.add(-23);
        // 9.7 / 2 = 4.85 -> 4.9
        assert_eq!(acc.mean_tenths(), 49);

        let mut acc = Accumulator::new(-120);
        acc.add(23);
        assert_eq!(acc.mean_tenths(), -49);

        let mut acc = Accumulator::new(10);
        acc.add(10);
        assert_eq!(acc.mean_tenths(), 10);
    }

    #[test]
    fn mean_guards_zero_count() {
        let zero = Accumulator {
            min: 0,
            max: 0,
            sum: 0,
            count: 0,
        };
        assert_eq!(zero.mean_tenths(), 0);
    }

    #[test]
    fn tenths_render_with_one_fractional_digit() {
        assert_eq!(format_tenths(0), "0.0");
        assert_eq!(format_tenths(5), "0.5");
        assert_eq!(format_tenths(-5), "-0.5");
        assert_eq!(format_tenths(123), "12.3");
        assert_eq!(format_tenths(-1000), "-100.0");
    }

    #[test]
    fn summary_merge_is_order_independent() {
        let a = || partial(&[("Hamburg", 120), ("Cracow", -87)]);
        let b = || partial(&[("Hamburg", -23), ("Bulawayo", 89)]);
        let c = || partial(&[("Bulawayo", 230), ("Cracow", 126)]);

        let forward = Summary::from_partials([a(), b(), c()]);
        let backward = Summary::from_partials([c(), b(), a()]);
        let single = Summary::from_partials([partial(&[
            ("Hamburg", 120),
            ("Cracow", -87),
            ("Hamburg", -23),
            ("Bulawayo", 89),
            ("Bulawayo", 230),
            ("Cracow", 126),
        ])]);

        assert_eq!(forward, backward);
        assert_eq!(forward, single);
    }

    #[test]
    fn singleton_station_carries_through_unchanged() {
        let merged = Summary::from_partials([partial(&[("Lone", 42)]), partial(&[])]);
        assert_eq!(merged.get(b"Lone"), Some(&Accumulator::new(42)));
    }

    #[test]
    fn reference_records_render_sorted_and_rounded() {
        // Two partials covering the records Hamburg 12.0/-2.3,
        // Bulawayo 8.9/23.0, Palembang 38.8/41.2, St. John's 15.2/-5.1,
        // Cracow 12.6/-8.7.
        let first = partial(&[
            ("Hamburg", 120),
            ("Bulawayo", 89),
            ("Palembang", 388),
            ("St. John's", 152),
            ("Cracow", 126),
        ]);
        let second = partial(&[
            ("Hamburg", -23),
            ("Bulawayo", 230),
            ("Palembang", 412),
            ("St. John's", -51),
            ("Cracow", -87),
        ]);

        let summary = Summary::from_partials([first, second]);
        assert_eq!(
            summary.to_string(),
            "{Bulawayo=8.9/16.0/23.0, Cracow=-8.7/2.0/12.6, Hamburg=-2.3/4.9/12.0, \
             Palembang=38.8/40.0/41.2, St. John's=-5.1/5.1/15.2}"
        );
    }

    #[test]
    fn empty_summary_renders_bare_braces() {
        assert_eq!(Summary::default().to_string(), "{}");
    }
}
