//! Derived views computed from a snapshot on every render tick.
//!
//! Snapshots hold a couple of dozen readings, so these are plain linear scans and a
//! stable library sort.

use crate::types::reading::Reading;

/// Readings ordered by ascending temperature. Equal temperatures keep their
/// snapshot order.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDateTime;
/// use citytemp::{sorted_ascending, Reading};
///
/// let at = NaiveDateTime::default();
/// let readings = [
///     Reading::new("Kharkiv", 20, at),
///     Reading::new("Kyiv", 17, at),
///     Reading::new("Lviv", 18, at),
///     Reading::new("Odesa", 15, at),
/// ];
/// let names: Vec<String> = sorted_ascending(&readings).into_iter().map(|r| r.name).collect();
/// assert_eq!(names, ["Odesa", "Kyiv", "Lviv", "Kharkiv"]);
/// ```
pub fn sorted_ascending(readings: &[Reading]) -> Vec<Reading> {
    let mut sorted = readings.to_vec();
    sorted.sort_by_key(|r| r.temperature);
    sorted
}

/// Lowest temperature; the first such reading wins a tie.
pub fn coldest(readings: &[Reading]) -> Option<&Reading> {
    readings
        .iter()
        .reduce(|best, r| if r.temperature < best.temperature { r } else { best })
}

/// Highest temperature; the first such reading wins a tie.
pub fn warmest(readings: &[Reading]) -> Option<&Reading> {
    readings
        .iter()
        .reduce(|best, r| if r.temperature > best.temperature { r } else { best })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap()
    }

    fn readings(values: &[(&str, i32)]) -> Vec<Reading> {
        values
            .iter()
            .enumerate()
            .map(|(i, (name, t))| Reading::new(*name, *t, at() + Duration::seconds(i as i64)))
            .collect()
    }

    fn sample() -> Vec<Reading> {
        readings(&[("Kharkiv", 20), ("Kyiv", 17), ("Lviv", 18), ("Odesa", 15)])
    }

    #[test]
    fn test_sorted_ascending() {
        let sorted: Vec<(String, i32)> = sorted_ascending(&sample())
            .into_iter()
            .map(|r| (r.name, r.temperature))
            .collect();
        assert_eq!(
            sorted,
            [
                ("Odesa".to_string(), 15),
                ("Kyiv".to_string(), 17),
                ("Lviv".to_string(), 18),
                ("Kharkiv".to_string(), 20)
            ]
        );
    }

    #[test]
    fn test_sorted_ascending_is_stable_and_leaves_input_alone() {
        let input = readings(&[("A", 3), ("B", -1), ("C", 3), ("D", -1), ("E", 0)]);
        let names: Vec<String> = sorted_ascending(&input)
            .into_iter()
            .map(|r| r.name)
            .collect();

        assert_eq!(names, ["B", "D", "E", "A", "C"]);
        assert_eq!(input[0].name, "A");
    }

    #[test]
    fn test_extremes() {
        let data = sample();
        assert_eq!(coldest(&data), Some(&data[3]));
        assert_eq!(warmest(&data), Some(&data[0]));
    }

    #[test]
    fn test_extreme_ties_pick_first_occurrence() {
        let data = readings(&[("Sumy", 4), ("Rivne", -7), ("Lutsk", 9), ("Kherson", -7), ("Dnipro", 9)]);
        assert_eq!(coldest(&data).unwrap().name, "Rivne");
        assert_eq!(warmest(&data).unwrap().name, "Lutsk");
    }

    #[test]
    fn test_empty_input() {
        assert!(sorted_ascending(&[]).is_empty());
        assert_eq!(coldest(&[]), None);
        assert_eq!(warmest(&[]), None);
    }
}
