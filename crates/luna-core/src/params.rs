//! Parameter extraction, override coercion, and notebook rewriting.
//!
//! Parameters are declared as top-level literal assignments in a single
//! declaration cell: the first code cell tagged `parameters`, or, absent a
//! tag, the first code cell consisting entirely of literal assignments.
//! Each parameter's kind is fixed at parse time by its literal syntax;
//! overrides must coerce to that kind.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::notebook::{Cell, Notebook, Source};

/// Tag marking the parameter-declaration cell.
pub const PARAMETERS_TAG: &str = "parameters";

/// A declared parameter: a name plus its current (default or overridden) value.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Name bound by the declaration cell.
    pub name: String,
    /// Declared default, or the override after [`apply_overrides`].
    pub value: ParamValue,
}

/// A parameter value, mirroring the Lua literal that declared it.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Str(String),
    List(Vec<ParamValue>),
    Dict(Vec<(String, ParamValue)>),
}

/// Declared kind of a parameter, decided by its literal syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Nil,
    Bool,
    Integer,
    Float,
    Str,
    List,
    Dict,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Nil => "nil",
            ParamKind::Bool => "boolean",
            ParamKind::Integer => "integer",
            ParamKind::Float => "float",
            ParamKind::Str => "string",
            ParamKind::List => "list",
            ParamKind::Dict => "dict",
        };
        f.write_str(name)
    }
}

impl ParamValue {
    /// Declared kind of this value.
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Nil => ParamKind::Nil,
            ParamValue::Bool(_) => ParamKind::Bool,
            ParamValue::Integer(_) => ParamKind::Integer,
            ParamValue::Float(_) => ParamKind::Float,
            ParamValue::Str(_) => ParamKind::Str,
            ParamValue::List(_) => ParamKind::List,
            ParamValue::Dict(_) => ParamKind::Dict,
        }
    }

    /// Render the value as a Lua literal.
    pub fn render(&self) -> String {
        match self {
            ParamValue::Nil => "nil".to_string(),
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::Integer(i) => i.to_string(),
            ParamValue::Float(f) => render_float(*f),
            ParamValue::Str(s) => render_str(s),
            ParamValue::List(items) => {
                let rendered: Vec<String> = items.iter().map(ParamValue::render).collect();
                format!("{{{}}}", rendered.join(", "))
            }
            ParamValue::Dict(pairs) => {
                let rendered: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| {
                        if is_identifier(k) {
                            format!("{} = {}", k, v.render())
                        } else {
                            format!("[{}] = {}", render_str(k), v.render())
                        }
                    })
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }
        }
    }
}

/// Scan the notebook for its parameter-declaration cell and parse its
/// assignments, in declaration order. Returns an empty vec when no such
/// cell exists.
pub fn extract_parameters(notebook: &Notebook) -> Vec<Parameter> {
    match find_parameter_cell(notebook) {
        Some(idx) => collect_assignments(&notebook.cells[idx].source.text()),
        None => Vec::new(),
    }
}

/// Replace declared defaults with override values, coercing each override to
/// the parameter's declared kind.
pub fn apply_overrides(
    mut parameters: Vec<Parameter>,
    overrides: &BTreeMap<String, Value>,
) -> Result<Vec<Parameter>> {
    for (name, raw) in overrides {
        let param = parameters
            .iter_mut()
            .find(|p| p.name == *name)
            .ok_or_else(|| Error::UnknownParameter(name.clone()))?;
        param.value = coerce(name, raw, param.value.kind())?;
    }
    Ok(parameters)
}

/// Produce a notebook whose declaration cell source is replaced with
/// assignments for the resolved parameters. All other cells are unchanged.
pub fn rewrite(mut notebook: Notebook, parameters: &[Parameter]) -> Notebook {
    if let Some(idx) = find_parameter_cell(&notebook) {
        let lines: Vec<String> = parameters
            .iter()
            .map(|p| format!("{} = {}", p.name, p.value.render()))
            .collect();
        notebook.cells[idx].source = Source::Text(lines.join("\n"));
    }
    notebook
}

/// Locate the declaration cell: a `parameters`-tagged code cell wins; the
/// first such cell is used when several are tagged. Without a tag, the first
/// code cell qualifies iff every significant line is a literal assignment.
fn find_parameter_cell(notebook: &Notebook) -> Option<usize> {
    if let Some(idx) = notebook
        .cells
        .iter()
        .position(|c| c.is_code() && c.has_tag(PARAMETERS_TAG))
    {
        return Some(idx);
    }

    let idx = notebook.cells.iter().position(Cell::is_code)?;
    let text = notebook.cells[idx].source.text();
    let mut found = false;
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }
        parse_assignment(line)?;
        found = true;
    }
    found.then_some(idx)
}

/// Parse every literal assignment in the cell, skipping other lines (a
/// tagged cell may hold setup statements too). A repeated name replaces the
/// earlier value, as sequential execution would.
fn collect_assignments(text: &str) -> Vec<Parameter> {
    let mut params: Vec<Parameter> = Vec::new();
    for line in text.lines() {
        if let Some((name, value)) = parse_assignment(line) {
            match params.iter_mut().find(|p| p.name == name) {
                Some(existing) => existing.value = value,
                None => params.push(Parameter { name, value }),
            }
        }
    }
    params
}

/// Coerce an override value to the declared kind.
///
/// A `nil` default carries no type information, so any override is accepted
/// structurally. Numeric strings coerce to numbers; `"true"`/`"false"` to
/// booleans; numbers and booleans stringify for string parameters.
fn coerce(name: &str, raw: &Value, kind: ParamKind) -> Result<ParamValue> {
    let coerced = match kind {
        ParamKind::Nil => Some(json_to_param(raw)),
        ParamKind::Bool => match raw {
            Value::Bool(b) => Some(ParamValue::Bool(*b)),
            Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "true" => Some(ParamValue::Bool(true)),
                "false" => Some(ParamValue::Bool(false)),
                _ => None,
            },
            _ => None,
        },
        ParamKind::Integer => match raw {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(ParamValue::Integer(i))
                } else {
                    // Whole-numbered floats are accepted only inside i64
                    // range; `as` would silently saturate beyond it.
                    n.as_f64()
                        .filter(|f| {
                            f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64
                        })
                        .map(|f| ParamValue::Integer(f as i64))
                }
            }
            Value::String(s) => s.trim().parse::<i64>().ok().map(ParamValue::Integer),
            _ => None,
        },
        ParamKind::Float => match raw {
            Value::Number(n) => n.as_f64().map(ParamValue::Float),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(ParamValue::Float),
            _ => None,
        },
        ParamKind::Str => match raw {
            Value::String(s) => Some(ParamValue::Str(s.clone())),
            Value::Number(n) => Some(ParamValue::Str(n.to_string())),
            Value::Bool(b) => Some(ParamValue::Str(b.to_string())),
            _ => None,
        },
        ParamKind::List => match raw {
            Value::Array(items) => Some(ParamValue::List(items.iter().map(json_to_param).collect())),
            _ => None,
        },
        ParamKind::Dict => match raw {
            Value::Object(map) => Some(ParamValue::Dict(
                map.iter().map(|(k, v)| (k.clone(), json_to_param(v))).collect(),
            )),
            _ => None,
        },
    };
    coerced.ok_or_else(|| Error::TypeCoercion {
        name: name.to_string(),
        expected: kind,
        value: raw.to_string(),
    })
}

/// Structural JSON-to-parameter conversion, used where no kind is declared.
fn json_to_param(raw: &Value) -> ParamValue {
    match raw {
        Value::Null => ParamValue::Nil,
        Value::Bool(b) => ParamValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => ParamValue::Integer(i),
            None => ParamValue::Float(n.as_f64().unwrap_or(0.0)),
        },
        Value::String(s) => ParamValue::Str(s.clone()),
        Value::Array(items) => ParamValue::List(items.iter().map(json_to_param).collect()),
        Value::Object(map) => ParamValue::Dict(
            map.iter().map(|(k, v)| (k.clone(), json_to_param(v))).collect(),
        ),
    }
}

// Non-finite floats have no Lua literal form and render as the conventional
// expressions instead. Coercion rejects non-finite overrides, so these arms
// are reachable only from a declared default overflowing f64 (e.g. `1e999`).
fn render_float(f: f64) -> String {
    if f.is_nan() {
        "0/0".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "math.huge".to_string() } else { "-math.huge".to_string() }
    } else if f.fract() == 0.0 && f.abs() < 1e15 {
        // Keep the decimal point so the literal stays a float on re-parse.
        format!("{f:.1}")
    } else {
        format!("{f}")
    }
}

fn render_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

const KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if",
    "in", "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let first_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    first_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !KEYWORDS.contains(&s)
}

/// Parse one `name = literal` line, tolerating a trailing `--` comment.
/// Returns `None` for anything else (including `local` declarations and
/// compound statements).
fn parse_assignment(line: &str) -> Option<(String, ParamValue)> {
    let mut s = Scanner::new(line);
    s.skip_ws();
    let name = s.ident()?;
    s.skip_ws();
    if !s.eat('=') || s.peek() == Some('=') {
        return None;
    }
    let value = s.literal()?;
    s.skip_ws();
    if !(s.at_end() || s.rest().starts_with("--")) {
        return None;
    }
    Some((name.to_string(), value))
}

/// Hand-rolled scanner over one line of Lua source, literals only.
struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
            self.pos += 1;
        }
    }

    fn ident(&mut self) -> Option<&'a str> {
        let bytes = self.src.as_bytes();
        let start = self.pos;
        let mut end = start;
        while let Some(&b) = bytes.get(end) {
            if !(b == b'_' || b.is_ascii_alphanumeric()) {
                break;
            }
            if end == start && b.is_ascii_digit() {
                return None;
            }
            end += 1;
        }
        if end == start {
            return None;
        }
        let word = &self.src[start..end];
        if KEYWORDS.contains(&word) {
            return None;
        }
        self.pos = end;
        Some(word)
    }

    fn keyword(&mut self, kw: &str) -> bool {
        if !self.rest().starts_with(kw) {
            return false;
        }
        let end = self.pos + kw.len();
        let boundary = !matches!(
            self.src.as_bytes().get(end),
            Some(b) if b.is_ascii_alphanumeric() || *b == b'_'
        );
        if boundary {
            self.pos = end;
        }
        boundary
    }

    fn literal(&mut self) -> Option<ParamValue> {
        self.skip_ws();
        let c = self.peek()?;
        if c == '{' {
            self.pos += 1;
            return self.table();
        }
        if c == '"' || c == '\'' {
            return self.string();
        }
        if c == '-' || c == '.' || c.is_ascii_digit() {
            return self.number();
        }
        if self.keyword("nil") {
            return Some(ParamValue::Nil);
        }
        if self.keyword("true") {
            return Some(ParamValue::Bool(true));
        }
        if self.keyword("false") {
            return Some(ParamValue::Bool(false));
        }
        None
    }

    fn string(&mut self) -> Option<ParamValue> {
        let quote = self.bump()?;
        let mut out = String::new();
        loop {
            let c = self.bump()?;
            if c == quote {
                return Some(ParamValue::Str(out));
            }
            if c == '\\' {
                match self.bump()? {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    e @ ('\\' | '"' | '\'') => out.push(e),
                    _ => return None,
                }
            } else {
                out.push(c);
            }
        }
    }

    fn number(&mut self) -> Option<ParamValue> {
        let bytes = self.src.as_bytes();
        let start = self.pos;
        let mut pos = self.pos;
        if bytes.get(pos) == Some(&b'-') {
            pos += 1;
        }
        let mut digits = 0usize;
        let mut fractional = false;
        while let Some(&b) = bytes.get(pos) {
            if b.is_ascii_digit() {
                digits += 1;
                pos += 1;
            } else if b == b'.' && !fractional {
                fractional = true;
                pos += 1;
            } else {
                break;
            }
        }
        if digits == 0 {
            return None;
        }
        let mut exponent = false;
        if matches!(bytes.get(pos), Some(b'e' | b'E')) {
            let mut e = pos + 1;
            if matches!(bytes.get(e), Some(b'+' | b'-')) {
                e += 1;
            }
            let first_digit = e;
            while matches!(bytes.get(e), Some(b) if b.is_ascii_digit()) {
                e += 1;
            }
            if e > first_digit {
                exponent = true;
                pos = e;
            }
        }
        let text = &self.src[start..pos];
        self.pos = pos;
        if !fractional && !exponent {
            if let Ok(i) = text.parse::<i64>() {
                return Some(ParamValue::Integer(i));
            }
        }
        text.parse::<f64>().ok().map(ParamValue::Float)
    }

    /// Parse a table body after the opening brace: either all positional
    /// items (list) or all `key = value` pairs (dict); mixing is rejected.
    fn table(&mut self) -> Option<ParamValue> {
        self.skip_ws();
        if self.eat('}') {
            return Some(ParamValue::List(Vec::new()));
        }
        let mut items = Vec::new();
        let mut pairs: Vec<(String, ParamValue)> = Vec::new();
        loop {
            self.skip_ws();
            let save = self.pos;
            let mut handled = false;
            if let Some(key) = self.ident() {
                self.skip_ws();
                if self.eat('=') && self.peek() != Some('=') {
                    if !items.is_empty() {
                        return None;
                    }
                    let value = self.literal()?;
                    pairs.push((key.to_string(), value));
                    handled = true;
                }
            }
            if !handled {
                self.pos = save;
                if !pairs.is_empty() {
                    return None;
                }
                items.push(self.literal()?);
            }
            self.skip_ws();
            if self.eat(',') || self.eat(';') {
                self.skip_ws();
                if self.eat('}') {
                    break;
                }
                continue;
            }
            if self.eat('}') {
                break;
            }
            return None;
        }
        if pairs.is_empty() {
            Some(ParamValue::List(items))
        } else {
            Some(ParamValue::Dict(pairs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notebook::Notebook;
    use serde_json::json;

    fn notebook(cells: Value) -> Notebook {
        let doc = json!({
            "nbformat": 4,
            "nbformat_minor": 5,
            "metadata": {},
            "cells": cells,
        });
        serde_json::from_value(doc).unwrap()
    }

    #[test]
    fn extracts_from_tagged_cell() {
        let nb = notebook(json!([
            {
                "cell_type": "code",
                "metadata": {"tags": ["parameters"]},
                "source": [
                    "-- knobs\n",
                    "count = 3\n",
                    "rate = 0.5\n",
                    "label = 'run'  -- trailing comment\n",
                    "enabled = true\n",
                    "extra = nil\n",
                ],
            },
            {"cell_type": "code", "metadata": {}, "source": "y = count * 2"},
        ]));
        let params = extract_parameters(&nb);
        assert_eq!(params.len(), 5);
        assert_eq!(params[0].name, "count");
        assert_eq!(params[0].value, ParamValue::Integer(3));
        assert_eq!(params[1].value, ParamValue::Float(0.5));
        assert_eq!(params[2].value, ParamValue::Str("run".to_string()));
        assert_eq!(params[3].value, ParamValue::Bool(true));
        assert_eq!(params[4].value, ParamValue::Nil);
    }

    #[test]
    fn falls_back_to_first_all_literal_code_cell() {
        let nb = notebook(json!([
            {"cell_type": "markdown", "metadata": {}, "source": "# Intro"},
            {"cell_type": "code", "metadata": {}, "source": "x = 1\n"},
            {"cell_type": "code", "metadata": {}, "source": "y = x + 1"},
        ]));
        let params = extract_parameters(&nb);
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "x");
    }

    #[test]
    fn first_code_cell_with_statements_is_not_a_parameter_cell() {
        let nb = notebook(json!([
            {"cell_type": "code", "metadata": {}, "source": "x = compute()\n"},
        ]));
        assert!(extract_parameters(&nb).is_empty());
    }

    #[test]
    fn no_code_cells_means_no_parameters() {
        let nb = notebook(json!([
            {"cell_type": "markdown", "metadata": {}, "source": "just prose"},
        ]));
        assert!(extract_parameters(&nb).is_empty());
    }

    #[test]
    fn tagged_cell_skips_non_literal_lines() {
        let nb = notebook(json!([
            {
                "cell_type": "code",
                "metadata": {"tags": ["parameters"]},
                "source": "x = 1\nprint(x)\nz = 'a'",
            },
        ]));
        let params = extract_parameters(&nb);
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["x", "z"]);
    }

    #[test]
    fn later_duplicate_declaration_wins() {
        let nb = notebook(json!([
            {
                "cell_type": "code",
                "metadata": {"tags": ["parameters"]},
                "source": "x = 1\nx = 2",
            },
        ]));
        let params = extract_parameters(&nb);
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].value, ParamValue::Integer(2));
    }

    #[test]
    fn parses_tables() {
        let (_, list) = parse_assignment("xs = {1, 2, 3}").unwrap();
        assert_eq!(
            list,
            ParamValue::List(vec![
                ParamValue::Integer(1),
                ParamValue::Integer(2),
                ParamValue::Integer(3),
            ])
        );

        let (_, dict) = parse_assignment("opts = {alpha = 0.1, name = \"m\"}").unwrap();
        assert_eq!(
            dict,
            ParamValue::Dict(vec![
                ("alpha".to_string(), ParamValue::Float(0.1)),
                ("name".to_string(), ParamValue::Str("m".to_string())),
            ])
        );

        let (_, empty) = parse_assignment("e = {}").unwrap();
        assert_eq!(empty, ParamValue::List(Vec::new()));
    }

    #[test]
    fn rejects_mixed_tables_and_non_literals() {
        assert!(parse_assignment("t = {1, a = 2}").is_none());
        assert!(parse_assignment("x = foo()").is_none());
        assert!(parse_assignment("local x = 1").is_none());
        assert!(parse_assignment("x == 1").is_none());
        assert!(parse_assignment("x = 1 + 2").is_none());
    }

    #[test]
    fn parses_string_escapes_and_negative_numbers() {
        let (_, v) = parse_assignment(r#"s = "a\nb\"c""#).unwrap();
        assert_eq!(v, ParamValue::Str("a\nb\"c".to_string()));
        let (_, n) = parse_assignment("n = -42").unwrap();
        assert_eq!(n, ParamValue::Integer(-42));
        let (_, f) = parse_assignment("f = 1e3").unwrap();
        assert_eq!(f, ParamValue::Float(1000.0));
    }

    #[test]
    fn coerces_overrides_by_declared_kind() {
        let params = vec![
            Parameter { name: "n".into(), value: ParamValue::Integer(1) },
            Parameter { name: "r".into(), value: ParamValue::Float(0.5) },
            Parameter { name: "s".into(), value: ParamValue::Str("a".into()) },
            Parameter { name: "b".into(), value: ParamValue::Bool(false) },
        ];
        let overrides = BTreeMap::from([
            ("n".to_string(), json!("7")),
            ("r".to_string(), json!(2)),
            ("s".to_string(), json!(10)),
            ("b".to_string(), json!("true")),
        ]);
        let resolved = apply_overrides(params, &overrides).unwrap();
        assert_eq!(resolved[0].value, ParamValue::Integer(7));
        assert_eq!(resolved[1].value, ParamValue::Float(2.0));
        assert_eq!(resolved[2].value, ParamValue::Str("10".to_string()));
        assert_eq!(resolved[3].value, ParamValue::Bool(true));
    }

    #[test]
    fn unknown_override_name_is_an_error() {
        let params = vec![Parameter { name: "x".into(), value: ParamValue::Integer(1) }];
        let overrides = BTreeMap::from([("missing".to_string(), json!(5))]);
        let err = apply_overrides(params, &overrides).unwrap_err();
        assert!(matches!(err, Error::UnknownParameter(name) if name == "missing"));
    }

    #[test]
    fn uncoercible_override_is_an_error() {
        let params = vec![Parameter { name: "n".into(), value: ParamValue::Integer(1) }];
        let overrides = BTreeMap::from([("n".to_string(), json!("not a number"))]);
        let err = apply_overrides(params, &overrides).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeCoercion { expected: ParamKind::Integer, .. }
        ));
    }

    #[test]
    fn whole_float_outside_i64_range_is_rejected() {
        let params = vec![Parameter { name: "n".into(), value: ParamValue::Integer(1) }];
        let overrides = BTreeMap::from([("n".to_string(), json!(1e300))]);
        let err = apply_overrides(params, &overrides).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeCoercion { expected: ParamKind::Integer, .. }
        ));

        // In-range whole floats still coerce.
        let params = vec![Parameter { name: "n".into(), value: ParamValue::Integer(1) }];
        let overrides = BTreeMap::from([("n".to_string(), json!(1e15))]);
        let resolved = apply_overrides(params, &overrides).unwrap();
        assert_eq!(resolved[0].value, ParamValue::Integer(1_000_000_000_000_000));
    }

    #[test]
    fn non_finite_float_strings_are_rejected() {
        for bad in ["NaN", "inf", "-inf"] {
            let params = vec![Parameter { name: "r".into(), value: ParamValue::Float(0.5) }];
            let overrides = BTreeMap::from([("r".to_string(), json!(bad))]);
            let err = apply_overrides(params, &overrides).unwrap_err();
            assert!(matches!(
                err,
                Error::TypeCoercion { expected: ParamKind::Float, .. }
            ));
        }
    }

    #[test]
    fn renders_lua_literals() {
        assert_eq!(ParamValue::Integer(5).render(), "5");
        assert_eq!(ParamValue::Float(2.0).render(), "2.0");
        assert_eq!(ParamValue::Float(2.5).render(), "2.5");
        assert_eq!(ParamValue::Bool(true).render(), "true");
        assert_eq!(ParamValue::Nil.render(), "nil");
        assert_eq!(
            ParamValue::Str("he said \"hi\"\n".into()).render(),
            r#""he said \"hi\"\n""#
        );
        assert_eq!(
            ParamValue::List(vec![ParamValue::Integer(1), ParamValue::Str("a".into())]).render(),
            r#"{1, "a"}"#
        );
        assert_eq!(
            ParamValue::Dict(vec![
                ("k".to_string(), ParamValue::Integer(1)),
                ("odd key".to_string(), ParamValue::Bool(false)),
            ])
            .render(),
            r#"{k = 1, ["odd key"] = false}"#
        );
    }

    #[test]
    fn rendered_literals_reparse_to_the_same_value() {
        let values = [
            ParamValue::Integer(-3),
            ParamValue::Float(0.25),
            ParamValue::Str("line\nbreak".into()),
            ParamValue::List(vec![ParamValue::Bool(true), ParamValue::Nil]),
            ParamValue::Dict(vec![("a".to_string(), ParamValue::Integer(1))]),
        ];
        for value in values {
            let line = format!("p = {}", value.render());
            let (_, parsed) = parse_assignment(&line).unwrap();
            assert_eq!(parsed, value);
        }
    }

    #[test]
    fn rewrite_replaces_only_the_declaration_cell() {
        let nb = notebook(json!([
            {"cell_type": "code", "metadata": {"tags": ["parameters"]}, "source": "x = 1"},
            {"cell_type": "code", "metadata": {}, "source": "y = x + 1"},
        ]));
        let params = vec![Parameter { name: "x".into(), value: ParamValue::Integer(5) }];
        let rewritten = rewrite(nb, &params);
        assert_eq!(rewritten.cells[0].source.text(), "x = 5");
        assert_eq!(rewritten.cells[1].source.text(), "y = x + 1");
    }
}
