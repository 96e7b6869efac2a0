//! Per-field parameter grammar helpers shared by the command parsers.
//!
//! The tokenizer has already isolated each command's payload, so there is
//! no remaining-input stream to thread between commands; each field is
//! parsed independently and a field that doesn't fully parse as its
//! expected type is treated as absent, meaning the caller's default
//! applies. `nom` still does the actual number parsing.

use nom::Parser;
use nom::character::complete::{i64 as parse_i64, u64 as parse_u64};
use nom::combinator::all_consuming;
use nom::number::complete::float as parse_float;

/// Splits a comma-separated payload into fields, trimming surrounding
/// whitespace from each one. An empty payload yields an empty vec (not one
/// empty field), so `fields("")` behaves like "no parameters given".
pub fn split_fields(payload: &str) -> Vec<&str> {
    if payload.trim().is_empty() {
        return Vec::new();
    }
    payload.split(',').map(str::trim).collect()
}

pub fn get(fields: &[&str], idx: usize) -> Option<&str> {
    fields.get(idx).copied().filter(|s| !s.is_empty())
}

pub fn int(fields: &[&str], idx: usize) -> Option<i64> {
    let s = get(fields, idx)?;
    all_consuming(parse_i64).parse(s).ok().map(|(_, v)| v)
}

pub fn uint(fields: &[&str], idx: usize) -> Option<u64> {
    let s = get(fields, idx)?;
    all_consuming(parse_u64).parse(s).ok().map(|(_, v)| v)
}

pub fn decimal(fields: &[&str], idx: usize) -> Option<f32> {
    let s = get(fields, idx)?;
    all_consuming(parse_float).parse(s).ok().map(|(_, v)| v)
}

pub fn ch(fields: &[&str], idx: usize) -> Option<char> {
    get(fields, idx).and_then(|s| s.chars().next())
}

pub fn flag_yn(fields: &[&str], idx: usize, default: bool) -> bool {
    match get(fields, idx) {
        Some(s) if s.eq_ignore_ascii_case("y") => true,
        Some(s) if s.eq_ignore_ascii_case("n") => false,
        _ => default,
    }
}

pub fn usize_or(fields: &[&str], idx: usize, default: usize) -> usize {
    uint(fields, idx).map(|v| v as usize).unwrap_or(default)
}

pub fn i32_or(fields: &[&str], idx: usize, default: i32) -> i32 {
    int(fields, idx).map(|v| v as i32).unwrap_or(default)
}
