//! Numeric tick label patterns in the common `[[fill]align][sign][symbol][0][width][,][.precision][~][type]`
//! mini-language (for example `.2f`, `,.0f`, `~s`, `+.1%`).

use std::str::FromStr;

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
    /// Padding goes between the sign and the digits.
    AfterSign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Minus,
    Plus,
    Space,
    Parentheses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    /// No type letter: shortest general notation with insignificant zeros trimmed.
    Default,
    Fixed,
    Integer,
    Exponent,
    General,
    Rounded,
    SiPrefix,
    Percent,
    PercentRounded,
}

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

/// Parsed numeric format pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    fill: char,
    align: Align,
    sign: Sign,
    currency: bool,
    width: Option<usize>,
    comma: bool,
    precision: Option<usize>,
    trim: bool,
    kind: Kind,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            fill: ' ',
            align: Align::Right,
            sign: Sign::Minus,
            currency: false,
            width: None,
            comma: false,
            precision: None,
            trim: false,
            kind: Kind::Default,
        }
    }
}

impl FromStr for NumberFormat {
    type Err = ChartError;

    fn from_str(pattern: &str) -> ChartResult<Self> {
        Self::parse(pattern)
    }
}

impl NumberFormat {
    pub fn parse(pattern: &str) -> ChartResult<Self> {
        let invalid = || ChartError::InvalidData(format!("invalid number format `{pattern}`"));
        let chars: Vec<char> = pattern.chars().collect();
        let mut format = Self::default();
        let mut pos = 0;

        let align_of = |c: char| match c {
            '<' => Some(Align::Left),
            '>' => Some(Align::Right),
            '^' => Some(Align::Center),
            '=' => Some(Align::AfterSign),
            _ => None,
        };

        if chars.len() >= 2 && align_of(chars[1]).is_some() {
            format.fill = chars[0];
            format.align = align_of(chars[1]).ok_or_else(invalid)?;
            pos = 2;
        } else if let Some(align) = chars.first().copied().and_then(align_of) {
            format.align = align;
            pos = 1;
        }

        if let Some(sign) = chars.get(pos).and_then(|c| match c {
            '-' => Some(Sign::Minus),
            '+' => Some(Sign::Plus),
            ' ' => Some(Sign::Space),
            '(' => Some(Sign::Parentheses),
            _ => None,
        }) {
            format.sign = sign;
            pos += 1;
        }

        match chars.get(pos) {
            Some('$') => {
                format.currency = true;
                pos += 1;
            }
            // Alternate form only affects radix prefixes, which are not supported.
            Some('#') => pos += 1,
            _ => {}
        }

        if chars.get(pos) == Some(&'0') {
            format.fill = '0';
            format.align = Align::AfterSign;
            pos += 1;
        }

        let width_start = pos;
        while chars.get(pos).is_some_and(char::is_ascii_digit) {
            pos += 1;
        }
        if pos > width_start {
            let digits: String = chars[width_start..pos].iter().collect();
            format.width = Some(digits.parse().map_err(|_| invalid())?);
        }

        if chars.get(pos) == Some(&',') {
            format.comma = true;
            pos += 1;
        }

        if chars.get(pos) == Some(&'.') {
            pos += 1;
            let precision_start = pos;
            while chars.get(pos).is_some_and(char::is_ascii_digit) {
                pos += 1;
            }
            if pos == precision_start {
                return Err(invalid());
            }
            let digits: String = chars[precision_start..pos].iter().collect();
            format.precision = Some(digits.parse().map_err(|_| invalid())?);
        }

        if chars.get(pos) == Some(&'~') {
            format.trim = true;
            pos += 1;
        }

        if let Some(kind) = chars.get(pos) {
            format.kind = match kind {
                'f' => Kind::Fixed,
                'd' => Kind::Integer,
                'e' => Kind::Exponent,
                'g' => Kind::General,
                'r' => Kind::Rounded,
                's' => Kind::SiPrefix,
                '%' => Kind::Percent,
                'p' => Kind::PercentRounded,
                _ => return Err(invalid()),
            };
            pos += 1;
        }

        if pos != chars.len() {
            return Err(invalid());
        }
        Ok(format)
    }

    #[must_use]
    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }

        let magnitude = value.abs();
        let (mut body, suffix) = self.format_magnitude(magnitude);
        if self.trim || self.kind == Kind::Default {
            body = trim_insignificant_zeros(&body);
        }
        if self.comma {
            body = group_thousands(&body);
        }

        // "-0.00" is shown as "0.00".
        let negative = value.is_sign_negative() && body.chars().any(|c| matches!(c, '1'..='9'));
        let (sign_prefix, sign_suffix) = match (negative, self.sign) {
            (true, Sign::Parentheses) => ("(", ")"),
            (true, _) => ("-", ""),
            (false, Sign::Plus) => ("+", ""),
            (false, Sign::Space) => (" ", ""),
            (false, _) => ("", ""),
        };
        let currency = if self.currency { "$" } else { "" };

        let prefix = format!("{sign_prefix}{currency}");
        let tail = format!("{suffix}{sign_suffix}");
        self.pad(&prefix, &body, &tail)
    }

    fn format_magnitude(&self, magnitude: f64) -> (String, String) {
        match self.kind {
            Kind::Fixed => (format!("{:.*}", self.precision.unwrap_or(6), magnitude), String::new()),
            Kind::Integer => (format!("{:.0}", magnitude.round()), String::new()),
            Kind::Exponent => (
                exponential(magnitude, self.precision.unwrap_or(6)),
                String::new(),
            ),
            Kind::General => (
                to_precision(magnitude, self.precision.unwrap_or(6).max(1)),
                String::new(),
            ),
            Kind::Rounded => (
                rounded_significant(magnitude, self.precision.unwrap_or(6).max(1)),
                String::new(),
            ),
            Kind::Percent => (
                format!("{:.*}", self.precision.unwrap_or(6), magnitude * 100.0),
                "%".to_owned(),
            ),
            Kind::PercentRounded => (
                rounded_significant(magnitude * 100.0, self.precision.unwrap_or(6).max(1)),
                "%".to_owned(),
            ),
            Kind::SiPrefix => si_prefixed(magnitude, self.precision.unwrap_or(6).max(1)),
            Kind::Default => (
                to_precision(magnitude, self.precision.unwrap_or(12).max(1)),
                String::new(),
            ),
        }
    }

    fn pad(&self, prefix: &str, body: &str, tail: &str) -> String {
        let content_len = prefix.chars().count() + body.chars().count() + tail.chars().count();
        let Some(width) = self.width.filter(|width| *width > content_len) else {
            return format!("{prefix}{body}{tail}");
        };

        let missing = width - content_len;
        let fill = |count: usize| std::iter::repeat_n(self.fill, count).collect::<String>();
        match self.align {
            Align::Left => format!("{prefix}{body}{tail}{}", fill(missing)),
            Align::Right => format!("{}{prefix}{body}{tail}", fill(missing)),
            Align::Center => {
                let left = missing / 2;
                format!("{}{prefix}{body}{tail}{}", fill(left), fill(missing - left))
            }
            Align::AfterSign => format!("{prefix}{}{body}{tail}", fill(missing)),
        }
    }
}

fn decimal_exponent(magnitude: f64) -> i32 {
    if magnitude == 0.0 {
        return 0;
    }
    // Derive the exponent from the formatted mantissa so rounding to the
    // next power of ten (9.99 -> 1.0e1) is accounted for.
    let formatted = format!("{magnitude:e}");
    formatted
        .split_once('e')
        .and_then(|(_, exponent)| exponent.parse().ok())
        .unwrap_or(0)
}

fn exponential(magnitude: f64, digits: usize) -> String {
    let formatted = format!("{magnitude:.digits$e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}

/// Significant-digit rendering that switches to exponent notation for very
/// small or very large magnitudes.
fn to_precision(magnitude: f64, significant: usize) -> String {
    let rounded = format!("{magnitude:.prec$e}", prec = significant - 1);
    let exponent = rounded
        .split_once('e')
        .and_then(|(_, exponent)| exponent.parse::<i32>().ok())
        .unwrap_or(0);
    if exponent < -6 || exponent >= significant as i32 {
        return exponential(magnitude, significant - 1);
    }
    let decimals = (significant as i32 - 1 - exponent).max(0) as usize;
    format!("{magnitude:.decimals$}")
}

fn rounded_significant(magnitude: f64, significant: usize) -> String {
    if magnitude == 0.0 {
        return format!("{:.*}", significant.saturating_sub(1), 0.0);
    }
    let exponent = decimal_exponent(magnitude);
    let decimals = (significant as i32 - 1 - exponent).max(0) as usize;
    if exponent >= significant as i32 {
        let scale = 10f64.powi(exponent + 1 - significant as i32);
        return format!("{:.0}", (magnitude / scale).round() * scale);
    }
    format!("{magnitude:.decimals$}")
}

fn si_prefixed(magnitude: f64, significant: usize) -> (String, String) {
    let exponent = if magnitude == 0.0 {
        0
    } else {
        decimal_exponent(magnitude)
    };
    let group = (exponent.div_euclid(3)).clamp(-8, 8);
    let scaled = magnitude / 10f64.powi(group * 3);
    let mut body = rounded_significant(scaled, significant);

    // Rounding can carry into the next group (999.9k -> 1.00M).
    let mut group = group;
    if body.split('.').next().is_some_and(|int| int.len() > 3) && group < 8 {
        group += 1;
        body = rounded_significant(magnitude / 10f64.powi(group * 3), significant);
    }

    let prefix = SI_PREFIXES[(group + 8) as usize];
    (body, prefix.to_owned())
}

fn trim_insignificant_zeros(body: &str) -> String {
    let (mantissa, exponent) = match body.find('e') {
        Some(index) => body.split_at(index),
        None => (body, ""),
    };
    if !mantissa.contains('.') {
        return body.to_owned();
    }
    let trimmed = mantissa.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}{exponent}")
}

fn group_thousands(body: &str) -> String {
    let digits_end = body
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(body.len());
    let (integer, rest) = body.split_at(digits_end);
    if integer.len() <= 3 {
        return body.to_owned();
    }

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3 + rest.len());
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped.push_str(rest);
    grouped
}

#[cfg(test)]
mod tests {
    use super::{NumberFormat, group_thousands, trim_insignificant_zeros};

    fn fmt(pattern: &str, value: f64) -> String {
        NumberFormat::parse(pattern).expect("pattern").format(value)
    }

    #[test]
    fn fixed_and_grouped() {
        assert_eq!(fmt(".2f", 3.14159), "3.14");
        assert_eq!(fmt(",.0f", 1234567.0), "1,234,567");
        assert_eq!(fmt(".2f", -0.001), "0.00");
        assert_eq!(fmt("+.1f", 2.0), "+2.0");
        assert_eq!(fmt("(.1f", -2.0), "(2.0)");
    }

    #[test]
    fn percent_exponent_and_si() {
        assert_eq!(fmt(".0%", 0.256), "26%");
        assert_eq!(fmt(".2e", 12345.0), "1.23e+4");
        assert_eq!(fmt("~s", 1500.0), "1.5k");
        assert_eq!(fmt(".3s", 0.00042), "420µ");
        assert_eq!(fmt("d", 41.6), "42");
    }

    #[test]
    fn default_type_trims() {
        assert_eq!(fmt("", 0.5), "0.5");
        assert_eq!(fmt("", 42.0), "42");
    }

    #[test]
    fn width_and_fill() {
        assert_eq!(fmt("08.2f", -3.5), "-0003.50");
        assert_eq!(fmt("*^7d", 5.0), "***5***");
        assert_eq!(fmt("$,.2f", 1234.5), "$1,234.50");
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        assert!(NumberFormat::parse(".f").is_err());
        assert!(NumberFormat::parse(".2q").is_err());
        assert!(NumberFormat::parse(".2ff").is_err());
    }

    #[test]
    fn helpers() {
        assert_eq!(group_thousands("1234.5"), "1,234.5");
        assert_eq!(trim_insignificant_zeros("1.500e+3"), "1.5e+3");
        assert_eq!(trim_insignificant_zeros("100"), "100");
    }
}
