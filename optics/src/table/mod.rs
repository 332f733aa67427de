//! Float Table Parser

use crate::common::Float;
use pest::iterators::Pair;
use pest::Parser;
use std::fs;
use std::result::Result;

#[derive(Parser)]
#[grammar = "table/grammar.pest"]
struct FloatParser;

/// Reads a file containing floating point values. If a line contains `#`
/// indicating a comment, the remainder of that line is ignored. Values are
/// read in left to right, top to bottom into a single list. If there are
/// non-comments or numeric values an error is returned.
///
/// * `path` - Path to file.
pub fn parse_float_file(path: &str) -> Result<Vec<Float>, String> {
    let unparsed_file = file_to_string(path)?;
    parse_floats(&unparsed_file, path)
}

/// Parses floating point values from a string using the same rules as
/// `parse_float_file()`.
///
/// * `input`  - The text to parse.
/// * `source` - Name of the input used in error messages.
pub fn parse_floats(input: &str, source: &str) -> Result<Vec<Float>, String> {
    let file = parse_file_rule(input, source)?;

    let mut v: Vec<Float> = vec![];
    let mut line_no = 1;

    for nums in file.into_inner() {
        // Parse the `nums` rule for each floating point number.
        match nums.as_rule() {
            Rule::nums => {
                for num in nums.into_inner() {
                    let s = num.as_str();
                    match s.parse::<Float>() {
                        Ok(n) => v.push(n),
                        Err(_) => {
                            return Err(format!(
                                "Error parsing floating point number '{}' in '{}', line {}.",
                                s, source, line_no
                            ))
                        }
                    }
                }
                line_no += 1;
            }
            Rule::EOI => (), // End of input.
            _ => unreachable!(),
        }
    }

    Ok(v)
}

/// Read the entire file and return its contents as a String.
///
/// * `path` - Path to file.
fn file_to_string(path: &str) -> Result<String, String> {
    fs::read_to_string(path).map_err(|err| format!("Error reading file '{}'. {}.", path, err))
}

/// Parse the initial `file` rule of the grammar and return the resulting token
/// pairs for remaining rules.
///
/// * `input`  - The text to parse.
/// * `source` - Name of the input used in error messages.
fn parse_file_rule<'a>(input: &'a str, source: &str) -> Result<Pair<'a, Rule>, String> {
    let mut pairs = FloatParser::parse(Rule::file, input)
        .map_err(|err| format!("Error parsing '{}'. {}", source, err))?;
    pairs
        .next()
        .ok_or_else(|| format!("Error parsing '{}'. Empty parse tree.", source))
}
