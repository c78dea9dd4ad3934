//! Collection of nom parsers used by the file readers

// nom parser combinators
use nom::bytes::complete::{take_till1, take_while};
use nom::multi::many0;
use nom::sequence::{preceded, terminated};
use nom::IResult;

/// Whole-line comments start with `#`
pub fn is_names_file_comment(i: &str) -> bool {
    i.trim_start().starts_with('#')
}

/// Any run of whitespace and commas between names
fn separator(i: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_whitespace() || c == ',')(i)
}

/// A single variable name, anything up to a separator or comment
fn variable_name(i: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace() || c == ',' || c == '#')(i)
}

/// All variable names on a line
///
/// Names are separated by whitespace and/or commas. Parsing stops at a `#`,
/// leaving any trailing comment as the remaining input.
pub fn variable_names(i: &str) -> IResult<&str, Vec<&str>> {
    terminated(many0(preceded(separator, variable_name)), separator)(i)
}
