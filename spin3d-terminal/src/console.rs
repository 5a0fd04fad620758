//! Command prompt opened with `:`
//!
//! Grammar, case-insensitive, one command per line:
//!
//! ```text
//! shape <name>      mode solid|wire    speed <0-100>
//! size <n>          hue <degrees>      glow on|off
//! zoom <n>          reset
//! ```

use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{alpha1, multispace0, multispace1},
    combinator::{all_consuming, map, map_res, value, verify},
    number::complete::float,
    sequence::{delimited, preceded, terminated},
    IResult,
};
use spin3d_core::{Input, RenderMode, ShapeKind};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConsoleError {
    #[error("empty command")]
    Empty,

    #[error("unrecognized command '{0}' (shape, mode, speed, size, hue, glow, zoom, reset)")]
    Unrecognized(String),
}

/// Parse one prompt line into an input
pub fn parse_command(line: &str) -> Result<Input, ConsoleError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ConsoleError::Empty);
    }

    all_consuming(delimited(multispace0, command, multispace0))(line)
        .map(|(_, input)| input)
        .map_err(|_| ConsoleError::Unrecognized(line.to_string()))
}

fn command(input: &str) -> IResult<&str, Input> {
    alt((shape, mode, speed, size, hue, glow, zoom, reset))(input)
}

fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag_no_case(word), multispace1)
}

fn shape(input: &str) -> IResult<&str, Input> {
    map(preceded(keyword("shape"), alpha1), |name| {
        Input::SelectShape(ShapeKind::from_name(name))
    })(input)
}

fn mode(input: &str) -> IResult<&str, Input> {
    map_res(preceded(keyword("mode"), alpha1), |token: &str| {
        token.parse::<RenderMode>().map(Input::SetMode)
    })(input)
}

/// Finite numbers only; nom's float also accepts `nan` and `inf`
fn number(input: &str) -> IResult<&str, f32> {
    verify(float, |v: &f32| v.is_finite())(input)
}

fn speed(input: &str) -> IResult<&str, Input> {
    map(preceded(keyword("speed"), number), Input::SetSpeed)(input)
}

fn size(input: &str) -> IResult<&str, Input> {
    map(preceded(keyword("size"), number), Input::SetSize)(input)
}

fn hue(input: &str) -> IResult<&str, Input> {
    map(preceded(keyword("hue"), number), Input::SetHue)(input)
}

fn zoom(input: &str) -> IResult<&str, Input> {
    map(preceded(keyword("zoom"), number), Input::SetZoom)(input)
}

fn glow(input: &str) -> IResult<&str, Input> {
    let on = value(true, alt((tag_no_case("on"), tag_no_case("true"))));
    let off = value(false, alt((tag_no_case("off"), tag_no_case("false"))));
    map(preceded(keyword("glow"), alt((on, off))), Input::SetGlow)(input)
}

fn reset(input: &str) -> IResult<&str, Input> {
    value(Input::ResetView, tag_no_case("reset"))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_names() {
        assert_eq!(
            parse_command("shape torus"),
            Ok(Input::SelectShape(ShapeKind::Torus))
        );
        assert_eq!(
            parse_command("  SHAPE   Octa "),
            Ok(Input::SelectShape(ShapeKind::Octahedron))
        );
        // Unknown names still select something
        assert_eq!(
            parse_command("shape teapot"),
            Ok(Input::SelectShape(ShapeKind::Sphere))
        );
    }

    #[test]
    fn test_mode() {
        assert_eq!(
            parse_command("mode wire"),
            Ok(Input::SetMode(RenderMode::Wire))
        );
        assert_eq!(
            parse_command("mode solid"),
            Ok(Input::SetMode(RenderMode::Solid))
        );
        assert!(parse_command("mode glass").is_err());
    }

    #[test]
    fn test_numeric_controls() {
        assert_eq!(parse_command("speed 75"), Ok(Input::SetSpeed(75.0)));
        assert_eq!(parse_command("size 1.25"), Ok(Input::SetSize(1.25)));
        assert_eq!(parse_command("hue -30"), Ok(Input::SetHue(-30.0)));
        assert_eq!(parse_command("zoom 2"), Ok(Input::SetZoom(2.0)));
        assert!(parse_command("speed fast").is_err());
        assert!(parse_command("speed 10 20").is_err());
        assert!(parse_command("hue nan").is_err());
    }

    #[test]
    fn test_glow_and_reset() {
        assert_eq!(parse_command("glow on"), Ok(Input::SetGlow(true)));
        assert_eq!(parse_command("glow OFF"), Ok(Input::SetGlow(false)));
        assert_eq!(parse_command("reset"), Ok(Input::ResetView));
        assert!(parse_command("glow maybe").is_err());
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_command("   "), Err(ConsoleError::Empty));
        assert_eq!(
            parse_command("spin faster"),
            Err(ConsoleError::Unrecognized("spin faster".to_string()))
        );
        // Keywords need a separating space
        assert!(parse_command("speed50").is_err());
    }
}
