//! Fixture case execution against `kernlib-core`.
//!
//! Input shapes per function:
//!
//! - `render`: `{"template": str, "args": [arg, ...], "capacity"?: n}`.
//!   Each arg is a one-key object: `int`, `uint`, `ptr`, `char`, `float`,
//!   `code_point` or `str` (a string or `null`). Output is the rendering with
//!   [`escape_bytes`] applied; with `capacity` it is `<stored>|<count>`.
//! - `split_cmdline`: `{"line": str, "continuation"?: [str], "env"?: {..},
//!   "limit"?: n}`. Output is the `Debug` rendering of the argument list.
//! - `strtoul`: `{"s": str, "base"?: n}`. Output is `<value> <consumed>`.
//!
//! Library failures render as `error:<Code>`.

use serde_json::Value;

use kernlib_core::cmdline::{QueuedLines, TokenizerConfig, split_cmdline_with};
use kernlib_core::errno;
use kernlib_core::stdio::{FormatArg, sprintf, sprintf_into};
use kernlib_core::stdlib::conversion::{parse_ulong, strtoul};
use kernlib_core::stdlib::env::EnvTable;
use kernlib_core::string::strlen;

use crate::HarnessError;

/// An owned formatting argument, decoded from a fixture or the CLI.
#[derive(Debug, Clone, PartialEq)]
pub enum OwnedArg {
    Int(i64),
    Uint(u64),
    Ptr(usize),
    Char(u8),
    Float(f64),
    CodePoint(u32),
    Str(Option<Vec<u8>>),
}

impl OwnedArg {
    #[must_use]
    pub fn as_format_arg(&self) -> FormatArg<'_> {
        match self {
            Self::Int(v) => FormatArg::Signed(*v),
            Self::Uint(v) => FormatArg::Unsigned(*v),
            Self::Ptr(p) => FormatArg::Pointer(*p),
            Self::Char(c) => FormatArg::Char(*c),
            Self::Float(f) => FormatArg::Float(*f),
            Self::CodePoint(c) => FormatArg::CodePoint(*c),
            Self::Str(s) => FormatArg::Str(s.as_deref()),
        }
    }
}

/// Runs one case and returns its rendered output.
pub fn execute_fixture_case(function: &str, inputs: &Value) -> Result<String, HarnessError> {
    match function {
        "render" => execute_render(inputs),
        "split_cmdline" => execute_split(inputs),
        "strtoul" => execute_strtoul(inputs),
        other => Err(HarnessError::UnsupportedFunction(other.to_string())),
    }
}

/// Printable form of raw output bytes.
#[must_use]
pub fn escape_bytes(bytes: &[u8]) -> String {
    bytes.escape_ascii().to_string()
}

fn execute_render(inputs: &Value) -> Result<String, HarnessError> {
    let template = str_field(inputs, "template")?;
    let args = match inputs.get("args") {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(parse_json_arg)
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(HarnessError::bad_input("args", "expected an array")),
    };
    let format_args: Vec<FormatArg<'_>> = args.iter().map(OwnedArg::as_format_arg).collect();

    match opt_u64(inputs, "capacity")? {
        Some(capacity) => {
            let capacity = usize::try_from(capacity)
                .map_err(|_| HarnessError::bad_input("capacity", "too large"))?;
            let mut buf = vec![0u8; capacity];
            let count = sprintf_into(&mut buf, template.as_bytes(), &format_args);
            Ok(format!("{}|{count}", escape_bytes(&buf[..strlen(&buf)])))
        }
        None => Ok(escape_bytes(&sprintf(template.as_bytes(), &format_args))),
    }
}

fn execute_split(inputs: &Value) -> Result<String, HarnessError> {
    let line = str_field(inputs, "line")?;

    let mut lines = match inputs.get("continuation") {
        None => QueuedLines::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| HarnessError::bad_input("continuation", "expected strings"))
            })
            .collect::<Result<QueuedLines, _>>()?,
        Some(_) => return Err(HarnessError::bad_input("continuation", "expected an array")),
    };

    let mut env = EnvTable::new();
    match inputs.get("env") {
        None => {}
        Some(Value::Object(vars)) => {
            for (name, value) in vars {
                let value = value
                    .as_str()
                    .ok_or_else(|| HarnessError::bad_input("env", "expected string values"))?;
                if !env.set(name, value) {
                    return Err(HarnessError::bad_input(
                        "env",
                        format!("invalid variable '{name}'"),
                    ));
                }
            }
        }
        Some(_) => return Err(HarnessError::bad_input("env", "expected an object")),
    }

    let config = match opt_u64(inputs, "limit")? {
        Some(limit) => TokenizerConfig::with_limit(usize::try_from(limit).unwrap_or(usize::MAX)),
        None => TokenizerConfig::default(),
    };

    Ok(
        match split_cmdline_with(&config, line.as_bytes(), &mut lines, &env) {
            Ok(argv) => format!("{:?}", argv.to_strings()),
            Err(err) => format!("error:{}", err.code()),
        },
    )
}

fn execute_strtoul(inputs: &Value) -> Result<String, HarnessError> {
    let s = str_field(inputs, "s")?;
    let base = opt_u64(inputs, "base")?.unwrap_or(0);
    let base = u32::try_from(base).map_err(|_| HarnessError::bad_input("base", "too large"))?;

    errno::clear_last_error();
    let (value, consumed) = strtoul(s.as_bytes(), base);
    Ok(match errno::clear_last_error() {
        Some(code) => format!("error:{code}"),
        None => format!("{value} {consumed}"),
    })
}

/// Decodes a fixture argument object such as `{"int": -5}`.
pub fn parse_json_arg(value: &Value) -> Result<OwnedArg, HarnessError> {
    let obj = value
        .as_object()
        .filter(|obj| obj.len() == 1)
        .ok_or_else(|| HarnessError::bad_input("args", "expected a one-key object"))?;
    let Some((kind, v)) = obj.iter().next() else {
        return Err(HarnessError::bad_input("args", "expected a one-key object"));
    };
    let bad = || HarnessError::bad_input("args", format!("bad value for '{kind}': {v}"));

    Ok(match kind.as_str() {
        "int" => OwnedArg::Int(v.as_i64().ok_or_else(bad)?),
        "uint" => OwnedArg::Uint(v.as_u64().ok_or_else(bad)?),
        "ptr" => OwnedArg::Ptr(
            v.as_u64()
                .and_then(|p| usize::try_from(p).ok())
                .ok_or_else(bad)?,
        ),
        "char" => OwnedArg::Char(match v {
            Value::String(s) if s.len() == 1 => s.as_bytes()[0],
            _ => v
                .as_u64()
                .and_then(|c| u8::try_from(c).ok())
                .ok_or_else(bad)?,
        }),
        "float" => OwnedArg::Float(v.as_f64().ok_or_else(bad)?),
        "code_point" => OwnedArg::CodePoint(
            v.as_u64()
                .and_then(|c| u32::try_from(c).ok())
                .ok_or_else(bad)?,
        ),
        "str" => match v {
            Value::Null => OwnedArg::Str(None),
            Value::String(s) => OwnedArg::Str(Some(s.as_bytes().to_vec())),
            _ => return Err(bad()),
        },
        _ => return Err(HarnessError::bad_input("args", format!("unknown kind '{kind}'"))),
    })
}

/// Decodes a command-line argument such as `int:-5`, `str:hello` or `null`.
///
/// Integer payloads accept decimal, `0x` hex and `0` octal.
pub fn parse_cli_arg(spec: &str) -> Result<OwnedArg, HarnessError> {
    if spec == "null" {
        return Ok(OwnedArg::Str(None));
    }
    let (kind, payload) = spec
        .split_once(':')
        .ok_or_else(|| HarnessError::bad_input(spec, "expected KIND:VALUE"))?;
    let bad = || HarnessError::bad_input(spec, format!("bad {kind} value"));
    let numeral = |text: &str| -> Result<u64, HarnessError> {
        match parse_ulong(text.as_bytes(), 0) {
            Ok((value, consumed)) if consumed == text.len() => Ok(value),
            _ => Err(bad()),
        }
    };

    Ok(match kind {
        "int" => match payload.strip_prefix('-') {
            Some(digits) => {
                let magnitude = numeral(digits)?;
                OwnedArg::Int(0i64.checked_sub_unsigned(magnitude).ok_or_else(bad)?)
            }
            None => OwnedArg::Int(i64::try_from(numeral(payload)?).map_err(|_| bad())?),
        },
        "uint" => OwnedArg::Uint(numeral(payload)?),
        "ptr" => OwnedArg::Ptr(usize::try_from(numeral(payload)?).map_err(|_| bad())?),
        "char" => match payload.as_bytes() {
            [c] => OwnedArg::Char(*c),
            _ => return Err(bad()),
        },
        "float" => OwnedArg::Float(payload.parse().map_err(|_| bad())?),
        "cp" | "code_point" => {
            OwnedArg::CodePoint(u32::try_from(numeral(payload)?).map_err(|_| bad())?)
        }
        "str" => OwnedArg::Str(Some(payload.as_bytes().to_vec())),
        _ => return Err(HarnessError::bad_input(spec, format!("unknown kind '{kind}'"))),
    })
}

fn str_field<'v>(inputs: &'v Value, field: &str) -> Result<&'v str, HarnessError> {
    inputs
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| HarnessError::bad_input(field, "expected a string"))
}

fn opt_u64(inputs: &Value, field: &str) -> Result<Option<u64>, HarnessError> {
    match inputs.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .map(Some)
            .ok_or_else(|| HarnessError::bad_input(field, "expected a non-negative integer")),
    }
}
