use chrono::{NaiveDate, TimeDelta};

/// Strict parse of `"YYYY-MM-DD"`.
pub fn parse_ymd(s: &str) -> Option<NaiveDate> {
    let b = s.as_bytes();
    // exact length + separators + digits everywhere else
    if b.len() != 10 || b[4] != b'-' || b[7] != b'-' {
        return None;
    }
    if !b
        .iter()
        .enumerate()
        .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit())
    {
        return None;
    }
    let year: i32 = s[0..4].parse().ok()?;
    let month: u32 = s[5..7].parse().ok()?;
    let day: u32 = s[8..10].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Days since 1970-01-01 → date, `None` outside chrono's supported range.
pub fn date32_to_naive(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(TimeDelta::try_days(days as i64)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ymd() {
        assert_eq!(
            parse_ymd("2024-01-05"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert_eq!(
            parse_ymd("2024-02-29"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn test_date32_to_naive() {
        assert_eq!(date32_to_naive(0), NaiveDate::from_ymd_opt(1970, 1, 1));
        assert_eq!(date32_to_naive(19723), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(date32_to_naive(-1), NaiveDate::from_ymd_opt(1969, 12, 31));
        assert_eq!(date32_to_naive(i32::MAX), None);
        assert_eq!(date32_to_naive(i32::MIN), None);
    }

    #[test]
    fn test_parse_ymd_rejects_other_shapes() {
        for bad in [
            "2023-02-29",
            "2024-13-01",
            "2024/01/05",
            "05-01-2024",
            "2024-1-5",
            "2024-01-05 00:00:00",
            "+024-01-05",
            " 2024-01-05",
            "\"2024-01-05\"",
            "",
        ] {
            assert_eq!(parse_ymd(bad), None, "{bad:?} should not parse");
        }
    }
}
