//! Attribute value types shared by the element kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Render a number without a trailing `.0` for integral values.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn parse_number(input: &str) -> Result<f64, String> {
    input
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("'{}' is not a number", input.trim()))
}

/// A region coordinate: absolute (pixels) or relative (percentage of the parent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelativeValue {
    pub value: f64,
    pub relative: bool,
}

impl RelativeValue {
    pub fn percent(value: f64) -> Self {
        RelativeValue {
            value,
            relative: true,
        }
    }

    pub fn absolute(value: f64) -> Self {
        RelativeValue {
            value,
            relative: false,
        }
    }
}

impl fmt::Display for RelativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_number(self.value))?;
        if self.relative {
            f.write_str("%")?;
        }
        Ok(())
    }
}

impl FromStr for RelativeValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(number) = s.strip_suffix('%') {
            return parse_number(number).map(RelativeValue::percent);
        }
        let number = s.strip_suffix("px").unwrap_or(s);
        parse_number(number).map(RelativeValue::absolute)
    }
}

/// A duration in seconds, written as `5s`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Seconds(pub f64);

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", format_number(self.0))
    }
}

impl FromStr for Seconds {
    type Err = String;

    /// Accepts `5s`, `5` and the clock form `hh:mm:ss[.f]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains(':') {
            let parts: Vec<&str> = s.split(':').collect();
            if parts.len() != 3 {
                return Err(format!("'{}' is not a clock value (hh:mm:ss)", s));
            }
            let hours = parse_number(parts[0])?;
            let minutes = parse_number(parts[1])?;
            let seconds = parse_number(parts[2])?;
            return Ok(Seconds(hours * 3600.0 + minutes * 60.0 + seconds));
        }
        let number = s.strip_suffix('s').unwrap_or(s);
        parse_number(number).map(Seconds)
    }
}

/// A fraction in `[0, 1]`, also accepted as a percentage on input.
pub fn parse_fraction(input: &str) -> Result<f64, String> {
    let input = input.trim();
    match input.strip_suffix('%') {
        Some(percent) => parse_number(percent).map(|v| v / 100.0),
        None => parse_number(input),
    }
}

macro_rules! keyword_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!(
                        "'{}' is not one of: {}",
                        other,
                        [$($text),+].join(", ")
                    )),
                }
            }
        }
    };
}

keyword_enum! {
    /// The named colors NCL accepts for borders and fades.
    Color {
        White => "white",
        Black => "black",
        Silver => "silver",
        Gray => "gray",
        Red => "red",
        Maroon => "maroon",
        Fuchsia => "fuchsia",
        Purple => "purple",
        Lime => "lime",
        Green => "green",
        Yellow => "yellow",
        Olive => "olive",
        Blue => "blue",
        Navy => "navy",
        Aqua => "aqua",
        Teal => "teal",
    }
}

keyword_enum! {
    TransitionType {
        BarWipe => "barWipe",
        IrisWipe => "irisWipe",
        ClockWipe => "clockWipe",
        SnakeWipe => "snakeWipe",
        Fade => "fade",
    }
}

keyword_enum! {
    TransitionDirection {
        Forward => "forward",
        Reverse => "reverse",
    }
}

keyword_enum! {
    Comparator {
        Eq => "eq",
        Ne => "ne",
        Gt => "gt",
        Lt => "lt",
        Gte => "gte",
        Lte => "lte",
    }
}

keyword_enum! {
    /// Boolean combinator for composite rules and compound conditions.
    LogicalOperator {
        And => "and",
        Or => "or",
    }
}

keyword_enum! {
    /// Scheduling combinator for compound actions.
    ActionOperator {
        Par => "par",
        Seq => "seq",
    }
}

keyword_enum! {
    EventType {
        Presentation => "presentation",
        Selection => "selection",
        Attribution => "attribution",
    }
}

keyword_enum! {
    EventTransition {
        Starts => "starts",
        Stops => "stops",
        Pauses => "pauses",
        Resumes => "resumes",
        Aborts => "aborts",
    }
}

keyword_enum! {
    ActionType {
        Start => "start",
        Stop => "stop",
        Pause => "pause",
        Resume => "resume",
        Abort => "abort",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(-3.0), "-3");
    }

    #[test]
    fn test_relative_value_parsing() {
        assert_eq!("10%".parse(), Ok(RelativeValue::percent(10.0)));
        assert_eq!("240".parse(), Ok(RelativeValue::absolute(240.0)));
        assert_eq!("240px".parse(), Ok(RelativeValue::absolute(240.0)));
        assert!("ten".parse::<RelativeValue>().is_err());
    }

    #[test]
    fn test_relative_value_display() {
        assert_eq!(RelativeValue::percent(10.0).to_string(), "10%");
        assert_eq!(RelativeValue::absolute(33.5).to_string(), "33.5");
    }

    #[test]
    fn test_seconds() {
        assert_eq!("5s".parse(), Ok(Seconds(5.0)));
        assert_eq!("2.5".parse(), Ok(Seconds(2.5)));
        assert_eq!("00:01:30".parse(), Ok(Seconds(90.0)));
        assert_eq!(Seconds(5.0).to_string(), "5s");
        assert!("1:30".parse::<Seconds>().is_err());
    }

    #[test]
    fn test_fraction() {
        assert_eq!(parse_fraction("0.25"), Ok(0.25));
        assert_eq!(parse_fraction("50%"), Ok(0.5));
    }

    #[test]
    fn test_keywords() {
        assert_eq!("barWipe".parse(), Ok(TransitionType::BarWipe));
        assert_eq!(Color::Navy.to_string(), "navy");
        assert_eq!(Comparator::ALL.len(), 6);
        let err = "purple-ish".parse::<Color>().unwrap_err();
        assert!(err.contains("white"));
    }
}
