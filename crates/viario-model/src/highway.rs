use serde::{Deserialize, Serialize};

/// One trecho (section) of a highway as stored in the registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighwaySection {
    pub id: i64,
    pub highway: Option<String>,
    pub snv_code: Option<String>,
    pub extension: Option<String>,
    pub region: Option<String>,
    pub direction: Option<String>,
    pub jurisdiction: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub description: Option<String>,
    pub surface_type: Option<String>,
    pub right_of_way: Option<String>,
}

/// Parses a free-text extension value into kilometres.
///
/// Registry extension columns hold things like `"12,5 km"`, `"3.2"`,
/// `"aprox. 10km"`. Case-folds, drops the `km` suffix, maps the decimal
/// comma to a dot and keeps only digits and dots before parsing. Returns
/// `None` for anything that still fails to parse.
#[must_use]
pub fn parse_extension_km(raw: &str) -> Option<f64> {
    let cleaned = raw.to_lowercase().replace("km", "").replace(',', ".");
    let cleaned: String = cleaned
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Sums the parseable extensions of a highway's sections; unparsable
/// entries contribute nothing.
#[must_use]
pub fn total_extension_km<'a, I>(extensions: I) -> f64
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    extensions
        .into_iter()
        .flatten()
        .filter_map(parse_extension_km)
        // Fold from an explicit +0.0: `Sum for f64` uses -0.0 as its
        // identity, which would render an empty total as "-0.00 km".
        .fold(0.0, |total, km| total + km)
}

/// Renders a total in the registry's outward format, e.g. `"123.40 km"`.
#[must_use]
pub fn format_extension_total(total_km: f64) -> String {
    format!("{total_km:.2} km")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_comma_and_km_suffix() {
        assert_eq!(parse_extension_km("12,5 km"), Some(12.5));
        assert_eq!(parse_extension_km("3.2"), Some(3.2));
        assert_eq!(parse_extension_km("KM 7"), Some(7.0));
    }

    #[test]
    fn junk_yields_none() {
        assert_eq!(parse_extension_km(""), None);
        assert_eq!(parse_extension_km("n/d"), None);
        assert_eq!(parse_extension_km("km"), None);
        // Stray punctuation leaves an unparsable digit soup.
        assert_eq!(parse_extension_km("1.2.3"), None);
    }

    #[test]
    fn totals_skip_unparsable_entries() {
        let total = total_extension_km([
            Some("10 km"),
            Some("2,5"),
            None,
            Some("sem dado"),
            Some("0.5km"),
        ]);
        assert!((total - 13.0).abs() < f64::EPSILON);
    }

    #[test]
    fn total_formats_with_two_decimals() {
        assert_eq!(format_extension_total(13.0), "13.00 km");
        assert_eq!(format_extension_total(0.0), "0.00 km");
    }
}
