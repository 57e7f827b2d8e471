//! Slider controls and textual parameter assignments
//!
//! Each scene exposes a table of [`Control`]s mirroring the range inputs of
//! the demo page. Parameters can also be given as an assignment list such as
//! `tx=0.2 ty=-0.1, rotate-z=0.25 perspective=on`.
use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, map, value},
    multi::separated_list0,
    number::complete::float,
    sequence::{delimited, separated_pair},
    IResult,
};

use crate::error::ParamError;

/// Every parameter any scene understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKey {
    TranslateX,
    TranslateY,
    TranslateZ,
    Rotate,
    RotateX,
    RotateY,
    RotateZ,
    Perspective,
    P,
}

/// Whether a parameter is a slider or a checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Scalar,
    Toggle,
}

impl ParamKey {
    pub const ALL: [ParamKey; 9] = [
        ParamKey::TranslateX,
        ParamKey::TranslateY,
        ParamKey::TranslateZ,
        ParamKey::Rotate,
        ParamKey::RotateX,
        ParamKey::RotateY,
        ParamKey::RotateZ,
        ParamKey::Perspective,
        ParamKey::P,
    ];

    /// Element id of the matching input on the demo page
    pub fn id(self) -> &'static str {
        match self {
            ParamKey::TranslateX => "translate-x",
            ParamKey::TranslateY => "translate-y",
            ParamKey::TranslateZ => "translate-z",
            ParamKey::Rotate => "rotate",
            ParamKey::RotateX => "rotate-x",
            ParamKey::RotateY => "rotate-y",
            ParamKey::RotateZ => "rotate-z",
            ParamKey::Perspective => "perspective",
            ParamKey::P => "p",
        }
    }

    pub fn alias(self) -> &'static str {
        match self {
            ParamKey::TranslateX => "tx",
            ParamKey::TranslateY => "ty",
            ParamKey::TranslateZ => "tz",
            ParamKey::Rotate => "r",
            ParamKey::RotateX => "rx",
            ParamKey::RotateY => "ry",
            ParamKey::RotateZ => "rz",
            ParamKey::Perspective => "persp",
            ParamKey::P => "f",
        }
    }

    pub fn kind(self) -> ParamKind {
        match self {
            ParamKey::Perspective => ParamKind::Toggle,
            _ => ParamKind::Scalar,
        }
    }

    /// Look a key up by element id or short alias; `_` is accepted for `-`
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|key| key.id() == name || key.alias() == name)
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Current value of a control
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Scalar(f32),
    Toggle(bool),
}

impl ParamValue {
    pub fn as_scalar(self, key: ParamKey) -> Result<f32, ParamError> {
        match self {
            ParamValue::Scalar(v) => Ok(v),
            ParamValue::Toggle(_) => Err(ParamError::WrongKind {
                key,
                expected: "a number",
            }),
        }
    }

    pub fn as_toggle(self, key: ParamKey) -> Result<bool, ParamError> {
        match self {
            ParamValue::Toggle(b) => Ok(b),
            // Checkbox values read back from the page arrive as 0/1
            ParamValue::Scalar(v) if v == 0.0 || v == 1.0 => Ok(v != 0.0),
            ParamValue::Scalar(_) => Err(ParamError::WrongKind {
                key,
                expected: "on/off",
            }),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Scalar(v) => write!(f, "{v:.2}"),
            ParamValue::Toggle(true) => f.write_str("on"),
            ParamValue::Toggle(false) => f.write_str("off"),
        }
    }
}

/// A slider or checkbox definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Control {
    pub key: ParamKey,
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: ParamValue,
}

impl Control {
    const fn slider(key: ParamKey, label: &'static str, min: f32, max: f32) -> Self {
        Self {
            key,
            label,
            min,
            max,
            step: 0.01,
            default: ParamValue::Scalar(0.0),
        }
    }

    const fn checkbox(key: ParamKey, label: &'static str) -> Self {
        Self {
            key,
            label,
            min: 0.0,
            max: 1.0,
            step: 1.0,
            default: ParamValue::Toggle(false),
        }
    }

    /// Move a value by `steps` increments, clamped to the slider range.
    /// Toggles flip on any non-zero step.
    pub fn nudge(&self, current: ParamValue, steps: i32) -> ParamValue {
        match current {
            ParamValue::Scalar(v) => {
                let next = v + self.step * steps as f32;
                // Snap to the step grid so repeated nudges don't drift
                let snapped = (next / self.step).round() * self.step;
                ParamValue::Scalar(snapped.clamp(self.min, self.max))
            }
            ParamValue::Toggle(b) if steps != 0 => ParamValue::Toggle(!b),
            toggle => toggle,
        }
    }
}

pub const FLAT_CONTROLS: &[Control] = &[
    Control::slider(ParamKey::TranslateX, "Translate X", -1.0, 1.0),
    Control::slider(ParamKey::TranslateY, "Translate Y", -1.0, 1.0),
    Control::slider(ParamKey::Rotate, "Rotate", 0.0, 1.0),
];

pub const SPATIAL_CONTROLS: &[Control] = &[
    Control::slider(ParamKey::TranslateX, "Translate X", -1.0, 1.0),
    Control::slider(ParamKey::TranslateY, "Translate Y", -1.0, 1.0),
    Control::slider(ParamKey::TranslateZ, "Translate Z", -1.0, 1.0),
    Control::slider(ParamKey::RotateX, "Rotate X", 0.0, 1.0),
    Control::slider(ParamKey::RotateY, "Rotate Y", 0.0, 1.0),
    Control::slider(ParamKey::RotateZ, "Rotate Z", 0.0, 1.0),
    Control::checkbox(ParamKey::Perspective, "Perspective"),
    Control::slider(ParamKey::P, "Perspective blend", 0.0, 1.0),
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum RawValue {
    Number(f32),
    Switch(bool),
}

fn name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_')(input)
}

fn raw_value(input: &str) -> IResult<&str, RawValue> {
    alt((
        value(
            RawValue::Switch(true),
            alt((tag_no_case("on"), tag_no_case("true"), tag_no_case("yes"))),
        ),
        value(
            RawValue::Switch(false),
            alt((tag_no_case("off"), tag_no_case("false"), tag_no_case("no"))),
        ),
        map(float, RawValue::Number),
    ))(input)
}

fn assignment(input: &str) -> IResult<&str, (&str, RawValue)> {
    separated_pair(name, delimited(multispace0, char('='), multispace0), raw_value)(input)
}

fn separator(input: &str) -> IResult<&str, &str> {
    alt((delimited(multispace0, tag(","), multispace0), multispace1))(input)
}

fn assignment_list(input: &str) -> IResult<&str, Vec<(&str, RawValue)>> {
    all_consuming(delimited(
        multispace0,
        separated_list0(separator, assignment),
        multispace0,
    ))(input)
}

/// Parse an assignment list into typed parameter values
pub fn parse_assignments(input: &str) -> Result<Vec<(ParamKey, ParamValue)>, ParamError> {
    let (_, raw) = assignment_list(input).map_err(|err| match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => ParamError::Syntax(e.input.to_string()),
        nom::Err::Incomplete(_) => ParamError::Syntax(input.to_string()),
    })?;

    raw.into_iter()
        .map(|(name, raw)| {
            let key =
                ParamKey::from_name(name).ok_or_else(|| ParamError::UnknownName(name.to_string()))?;
            let value = match (key.kind(), raw) {
                (ParamKind::Scalar, RawValue::Number(v)) if v.is_finite() => ParamValue::Scalar(v),
                (ParamKind::Scalar, RawValue::Number(_)) => {
                    return Err(ParamError::WrongKind {
                        key,
                        expected: "a finite number",
                    })
                }
                (ParamKind::Toggle, RawValue::Switch(b)) => ParamValue::Toggle(b),
                (ParamKind::Toggle, RawValue::Number(v)) => {
                    ParamValue::Toggle(ParamValue::Scalar(v).as_toggle(key)?)
                }
                (ParamKind::Scalar, RawValue::Switch(_)) => {
                    return Err(ParamError::WrongKind {
                        key,
                        expected: "a number",
                    })
                }
            };
            Ok((key, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_lookup() {
        assert_eq!(ParamKey::from_name("translate-x"), Some(ParamKey::TranslateX));
        assert_eq!(ParamKey::from_name("rotate_z"), Some(ParamKey::RotateZ));
        assert_eq!(ParamKey::from_name("RZ"), Some(ParamKey::RotateZ));
        assert_eq!(ParamKey::from_name("p"), Some(ParamKey::P));
        assert_eq!(ParamKey::from_name("scale"), None);
    }

    #[test]
    fn test_parse_mixed_separators() {
        let parsed = parse_assignments(" tx=0.2 ty = -0.1,rotate-z=0.25 , perspective=on ").unwrap();
        assert_eq!(
            parsed,
            vec![
                (ParamKey::TranslateX, ParamValue::Scalar(0.2)),
                (ParamKey::TranslateY, ParamValue::Scalar(-0.1)),
                (ParamKey::RotateZ, ParamValue::Scalar(0.25)),
                (ParamKey::Perspective, ParamValue::Toggle(true)),
            ]
        );
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_assignments("").unwrap(), vec![]);
        assert_eq!(parse_assignments("   ").unwrap(), vec![]);
    }

    #[test]
    fn test_parse_toggle_from_number() {
        let parsed = parse_assignments("perspective=1 persp=0").unwrap();
        assert_eq!(
            parsed,
            vec![
                (ParamKey::Perspective, ParamValue::Toggle(true)),
                (ParamKey::Perspective, ParamValue::Toggle(false)),
            ]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_assignments("scale=2"),
            Err(ParamError::UnknownName("scale".to_string()))
        );
        assert_eq!(
            parse_assignments("tx=on"),
            Err(ParamError::WrongKind {
                key: ParamKey::TranslateX,
                expected: "a number"
            })
        );
        assert!(matches!(parse_assignments("tx=0.2 ty"), Err(ParamError::Syntax(_))));
        assert!(matches!(parse_assignments("tx=abc"), Err(ParamError::Syntax(_))));
        assert!(matches!(
            parse_assignments("perspective=0.5"),
            Err(ParamError::WrongKind { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        for (input, key) in [
            ("tx=nan", ParamKey::TranslateX),
            ("ty=inf", ParamKey::TranslateY),
        ] {
            assert_eq!(
                parse_assignments(input),
                Err(ParamError::WrongKind {
                    key,
                    expected: "a finite number"
                }),
                "{input}"
            );
        }
        assert!(parse_assignments("persp=nan").is_err());
    }

    #[test]
    fn test_nudge_clamps_and_toggles() {
        let rotate = SPATIAL_CONTROLS[3];
        assert_eq!(rotate.key, ParamKey::RotateX);
        assert_eq!(rotate.nudge(ParamValue::Scalar(0.0), -1), ParamValue::Scalar(0.0));
        assert_eq!(rotate.nudge(ParamValue::Scalar(0.99), 5), ParamValue::Scalar(1.0));

        let next = rotate.nudge(ParamValue::Scalar(0.5), 1);
        assert!(matches!(next, ParamValue::Scalar(v) if (v - 0.51).abs() < 1e-6));

        let toggle = SPATIAL_CONTROLS[6];
        assert_eq!(toggle.nudge(ParamValue::Toggle(false), 1), ParamValue::Toggle(true));
        assert_eq!(toggle.nudge(ParamValue::Toggle(true), -1), ParamValue::Toggle(false));
    }

    #[test]
    fn test_display() {
        assert_eq!(ParamKey::RotateY.to_string(), "rotate-y");
        assert_eq!(ParamValue::Scalar(0.256).to_string(), "0.26");
        assert_eq!(ParamValue::Toggle(true).to_string(), "on");
    }
}
