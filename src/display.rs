//! Display helpers for record editors and list items
//!
//! Numbers are rendered the way the app's UI layer renders them in string
//! templates, so summaries produced here match what the screens show.

use chrono::{NaiveDate, NaiveTime};

use crate::types::{Consistency, MeasureData, SkinRash};

/// Date shown on editor pills, e.g. `Jan 5, 2024`
pub const PILL_DATE_FORMAT: &str = "%b %-d, %Y";

/// Time shown on editor pills and list items, e.g. `08:05`
pub const PILL_TIME_FORMAT: &str = "%H:%M";

/// Render a number like a JavaScript template literal does
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        // Also covers -0
        return "0".to_string();
    }

    let abs = value.abs();
    if !(1e-6..1e21).contains(&abs) {
        let sci = format!("{:e}", value);
        return match sci.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => sci,
        };
    }

    format!("{}", value)
}

/// `<value><unit>` with no separator, e.g. `3.5kg`
pub fn format_measure(measure: &MeasureData) -> String {
    format!("{}{}", format_number(measure.value), measure.unit)
}

pub fn format_pill_date(date: NaiveDate) -> String {
    date.format(PILL_DATE_FORMAT).to_string()
}

pub fn format_pill_time(time: NaiveTime) -> String {
    time.format(PILL_TIME_FORMAT).to_string()
}

/// Uppercase the first character, leave the rest untouched
pub fn capitalize_first_letter(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Consistency {
    /// Option label, e.g. `Loose`
    pub fn label(&self) -> String {
        capitalize_first_letter(self.as_str())
    }
}

impl SkinRash {
    /// Option label, e.g. `Mild`
    pub fn label(&self) -> String {
        capitalize_first_letter(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_number_matches_template_rendering() {
        assert_eq!(format_number(3.5), "3.5");
        assert_eq!(format_number(50.0), "50");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-12.0), "-12");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
    }

    #[test]
    fn test_format_measure() {
        assert_eq!(format_measure(&MeasureData::new(3.5, "kg")), "3.5kg");
        assert_eq!(format_measure(&MeasureData::new(50.0, "cm")), "50cm");
        assert_eq!(format_measure(&MeasureData::new(4.0, "oz")), "4oz");
    }

    #[test]
    fn test_pills() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let time = NaiveTime::from_hms_opt(8, 5, 42).unwrap();
        assert_eq!(format_pill_date(date), "Jan 5, 2024");
        assert_eq!(format_pill_time(time), "08:05");
    }

    #[test]
    fn test_labels() {
        assert_eq!(capitalize_first_letter("loose"), "Loose");
        assert_eq!(capitalize_first_letter(""), "");
        assert_eq!(capitalize_first_letter("éclair"), "Éclair");
        assert_eq!(Consistency::Hard.label(), "Hard");
        assert_eq!(SkinRash::None.label(), "None");
    }
}
