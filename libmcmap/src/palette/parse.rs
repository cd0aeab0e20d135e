use nom::{
    branch::alt,
    character::complete::{char, digit1, multispace0, multispace1, space0},
    combinator::{all_consuming, map, map_res},
    multi::separated_list0,
    sequence::{delimited, tuple},
    IResult,
};
use tracing::{debug, warn};

use crate::{color::Rgb, Error, Result};

fn channel(input: &str) -> IResult<&str, u8> {
    map_res(digit1, |digits: &str| digits.parse::<u8>())(input)
}

fn separator(input: &str) -> IResult<&str, char> {
    delimited(space0, char(','), space0)(input)
}

fn bare_record(input: &str) -> IResult<&str, Rgb> {
    map(
        tuple((channel, separator, channel, separator, channel)),
        |(r, _, g, _, b)| Rgb::from((r, g, b)),
    )(input)
}

fn quoted_record(input: &str) -> IResult<&str, Rgb> {
    delimited(char('"'), delimited(space0, bare_record, space0), char('"'))(input)
}

fn records(input: &str) -> IResult<&str, Vec<Rgb>> {
    delimited(
        multispace0,
        separated_list0(multispace1, alt((quoted_record, bare_record))),
        multispace0,
    )(input)
}

/// Parses the base colors of a palette file
///
/// Records are separated by whitespace. Each record is `r,g,b`, optionally wrapped in double
/// quotes, with every channel an integer in `0..=255`:
///
/// ```"not rust"
/// "0,0,0"
/// "127,178,56"
/// 247, 233, 163
/// ```
///
/// # Errors
///
/// Returns [`Error::MalformedPalette`] pointing at the first record that cannot be parsed
pub fn parse_palette(input: &str) -> Result<Vec<Rgb>> {
    match all_consuming(records)(input) {
        Ok((_, colors)) => {
            debug!("Parsed {} base colors", colors.len());
            Ok(colors)
        }
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => {
            let (line, column) = position(input, input.len() - e.input.len());
            warn!("Malformed palette record at {line}:{column}");
            Err(Error::MalformedPalette { line, column })
        }
        Err(nom::Err::Incomplete(_)) => {
            let (line, column) = position(input, input.len());
            Err(Error::MalformedPalette { line, column })
        }
    }
}

/// 1-based line and column of a byte offset
fn position(input: &str, offset: usize) -> (usize, usize) {
    let before = &input[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    (line, before[line_start..].chars().count() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_quoted_and_bare_records() {
        let colors = parse_palette("\"0,0,0\"\n\"127,178,56\"\r\n247, 233, 163\n").unwrap();
        assert_eq!(
            colors,
            vec![
                Rgb::new(0, 0, 0),
                Rgb::new(127, 178, 56),
                Rgb::new(247, 233, 163)
            ]
        );
    }

    #[test]
    fn quoted_records_may_contain_blanks() {
        let colors = parse_palette("\" 1 , 2 ,3 \"  \"4,5,6\"").unwrap();
        assert_eq!(colors, vec![Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)]);
    }

    #[test]
    fn empty_input_has_no_colors() {
        assert!(parse_palette("  \n\n").unwrap().is_empty());
    }

    #[test]
    fn out_of_range_channel_is_reported() {
        let err = parse_palette("\"1,2,3\"\n\"4,5,256\"\n").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedPalette { line: 2, column: 1 }
        ));
    }

    #[test]
    fn garbage_is_reported_with_column() {
        let err = parse_palette("1,2,3   red\n").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedPalette { line: 1, column: 9 }
        ));
    }
}
