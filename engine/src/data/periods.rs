// Period label resolution: dates, month tokens, or opaque ordinal labels.
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use shared::models::{CellValue, PeriodLabel, RangeStrategy};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M:%S"];

/// Parses an ISO-like or day-first locale date string.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Month number for an English or Italian three-letter abbreviation.
pub fn month_number(abbrev: &str) -> Option<u32> {
    let lower = abbrev.trim().to_lowercase();
    let month = match lower.as_str() {
        "jan" | "gen" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" | "mag" => 5,
        "jun" | "giu" => 6,
        "jul" | "lug" => 7,
        "aug" | "ago" => 8,
        "sep" | "set" => 9,
        "oct" | "ott" => 10,
        "nov" => 11,
        "dec" | "dic" => 12,
        _ => return None,
    };
    Some(month)
}

/// Last calendar day of the month named by `month`; two-digit years are 2000-based.
pub fn end_of_month(month: &str, year: i32) -> Option<NaiveDate> {
    let month = month_number(month)?;
    let year = if (0..100).contains(&year) { 2000 + year } else { year };
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Parses tokens such as "Jan '25", "Jan 25", "Jan-2025" or "jan2025" to month end.
pub fn parse_month_token(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let month: String = text.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    if month.chars().count() != 3 {
        return None;
    }
    let rest = text[month.len()..].trim_start_matches(|c: char| c.is_whitespace() || c == '\'' || c == '-' || c == '’');
    if !(rest.len() == 2 || rest.len() == 4) || !rest.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year: i32 = rest.parse().ok()?;
    end_of_month(&month, year)
}

/// Resolves a header cell to a period label with an optional calendar date.
pub fn resolve_period(cell: &CellValue) -> PeriodLabel {
    let text = cell.label_text();
    let date = match cell {
        CellValue::Date(d) => Some(*d),
        CellValue::Text(s) => parse_date(s).or_else(|| parse_month_token(s)),
        _ => None,
    };
    PeriodLabel::new(text, date)
}

/// Date filtering only when every column carries a date; otherwise positional.
pub fn choose_strategy(columns: &[PeriodLabel]) -> RangeStrategy {
    if !columns.is_empty() && columns.iter().all(|c| c.date.is_some()) {
        RangeStrategy::Dates
    } else {
        RangeStrategy::Positions
    }
}

/// Formats a period-end date the way month tokens are written ("Jan '25").
pub fn month_token(date: NaiveDate) -> String {
    format!("{} '{:02}", date.format("%b"), date.year() % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_end_of_month_is_last_day() {
        assert_eq!(end_of_month("Jan", 25), Some(ymd(2025, 1, 31)));
        assert_eq!(end_of_month("Feb", 24), Some(ymd(2024, 2, 29)));
        assert_eq!(end_of_month("feb", 2025), Some(ymd(2025, 2, 28)));
        assert_eq!(end_of_month("Dec", 24), Some(ymd(2024, 12, 31)));
        assert_eq!(end_of_month("Giu", 25), Some(ymd(2025, 6, 30)));
        assert_eq!(end_of_month("Foo", 25), None);
    }

    #[test]
    fn test_parse_month_token_forms() {
        assert_eq!(parse_month_token("Jan '25"), Some(ymd(2025, 1, 31)));
        assert_eq!(parse_month_token("Sep 24"), Some(ymd(2024, 9, 30)));
        assert_eq!(parse_month_token("Mar-2025"), Some(ymd(2025, 3, 31)));
        assert_eq!(parse_month_token("dic2024"), Some(ymd(2024, 12, 31)));
        assert_eq!(parse_month_token("January 25"), None);
        assert_eq!(parse_month_token("Jan '5"), None);
        assert_eq!(parse_month_token("Q1 2025"), None);
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2024-12-31"), Some(ymd(2024, 12, 31)));
        assert_eq!(parse_date("31/12/2024"), Some(ymd(2024, 12, 31)));
        assert_eq!(parse_date("31.03.2025"), Some(ymd(2025, 3, 31)));
        assert_eq!(parse_date("2025-06-30 00:00:00"), Some(ymd(2025, 6, 30)));
        assert_eq!(parse_date("2025-06-30T00:00:00"), Some(ymd(2025, 6, 30)));
        assert_eq!(parse_date("Q2"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_resolve_period_keeps_text_and_date() {
        let label = resolve_period(&CellValue::Text("Jan '25".to_string()));
        assert_eq!(label.text, "Jan '25");
        assert_eq!(label.date, Some(ymd(2025, 1, 31)));

        let label = resolve_period(&CellValue::Date(ymd(2024, 12, 31)));
        assert_eq!(label.text, "2024-12-31");
        assert_eq!(label.date, Some(ymd(2024, 12, 31)));

        let label = resolve_period(&CellValue::Number(2024.0));
        assert_eq!(label.text, "2024");
        assert_eq!(label.date, None);
    }

    #[test]
    fn test_choose_strategy() {
        let dated = vec![
            PeriodLabel::new("Jan '25", Some(ymd(2025, 1, 31))),
            PeriodLabel::new("Feb '25", Some(ymd(2025, 2, 28))),
        ];
        assert_eq!(choose_strategy(&dated), RangeStrategy::Dates);

        let mut mixed = dated.clone();
        mixed.push(PeriodLabel::new("YE", None));
        assert_eq!(choose_strategy(&mixed), RangeStrategy::Positions);
        assert_eq!(choose_strategy(&[]), RangeStrategy::Positions);
    }

    #[test]
    fn test_month_token_format() {
        assert_eq!(month_token(ymd(2025, 1, 31)), "Jan '25");
    }
}
