use lazy_static::lazy_static;
use log::{debug, trace};
use regex::{NoExpand, Regex};
use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
pub enum EvalErr {
    #[error("Деление на ноль")]
    DivisionByZero,
    #[error("Некорректное выражение: {0:?}")]
    Malformed(String),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Operator {
    Pow,
    Mul,
    Div,
    IntDiv,
    Rem,
    Add,
    Sub,
}

impl Operator {
    /// Order in which a reduction round looks for operators. This is not
    /// mathematical precedence: `/` is tried before `//`, `+` before `-`.
    pub const SCAN_ORDER: [Operator; 7] = [
        Operator::Pow,
        Operator::Mul,
        Operator::Div,
        Operator::IntDiv,
        Operator::Rem,
        Operator::Add,
        Operator::Sub,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Pow => "^",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::IntDiv => "//",
            Operator::Rem => "%",
            Operator::Add => "+",
            Operator::Sub => "-",
        }
    }

    pub fn apply(self, l: f64, r: f64) -> Result<f64, EvalErr> {
        match self {
            Operator::Div | Operator::IntDiv | Operator::Rem if r == 0.0 => {
                Err(EvalErr::DivisionByZero)
            }
            Operator::Pow => Ok(l.powf(r)),
            Operator::Mul => Ok(l * r),
            Operator::Div => Ok(l / r),
            // truncates toward zero, saturating to the i32 range (NaN -> 0)
            Operator::IntDiv => Ok((l / r) as i32 as f64),
            Operator::Rem => Ok(l % r),
            Operator::Add => Ok(l + r),
            Operator::Sub => Ok(l - r),
        }
    }
}

// numbers like -?[0-9]+(\.[0-9]+)?, no exponent part
const NUMBER: &str = r"(-?[0-9]+(?:\.[0-9]+)?)";

lazy_static! {
    static ref ABS_FORM: Regex = Regex::new(r"^\|(-?[0-9]+)\|$").unwrap();
    static ref OPERATIONS: Vec<(Operator, Regex)> = Operator::SCAN_ORDER
        .iter()
        .map(|&op| {
            let pattern = format!("{}{}{}", NUMBER, regex::escape(op.symbol()), NUMBER);
            (op, Regex::new(&pattern).unwrap())
        })
        .collect();
}

/// Textual form of a number as it is substituted back into an expression
/// and written to the history log. Magnitudes in [1e-3, 1e7) print as plain
/// decimals with at least one fractional digit (`8.0`, `0.25`), everything
/// else in scientific form with the shortest round-tripping digits
/// (`1.0E7`, `-2.5E-4`). Non-finite values print `Infinity`, `-Infinity`
/// and `NaN`.
pub fn render(value: f64) -> String {
    if value.is_nan() {
        return format!("NaN");
    }
    if value.is_infinite() {
        return if value > 0.0 { format!("Infinity") } else { format!("-Infinity") };
    }
    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        let plain = value.to_string();
        if plain.contains('.') { plain } else { plain + ".0" }
    } else {
        let sci = format!("{:e}", value);
        match sci.split_once('e') {
            Some((mantissa, exp)) if mantissa.contains('.') => format!("{}E{}", mantissa, exp),
            Some((mantissa, exp)) => format!("{}.0E{}", mantissa, exp),
            None => sci,
        }
    }
}

// Accepts what `render` produces plus plain literals: an optional sign,
// then `Infinity`, `NaN` or a decimal with optional exponent and f/d suffix.
fn parse_number(text: &str) -> Result<f64, EvalErr> {
    let malformed = || EvalErr::Malformed(text.to_string());
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let magnitude = match unsigned {
        "Infinity" => f64::INFINITY,
        "NaN" => f64::NAN,
        _ => {
            let digits = unsigned.strip_suffix(['f', 'F', 'd', 'D']).unwrap_or(unsigned);
            if !digits.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
                return Err(malformed());
            }
            digits.parse::<f64>().map_err(|_| malformed())?
        }
    };
    Ok(if negative { -magnitude } else { magnitude })
}

// One reduction round: rewrite the leftmost match of the first operator
// (in scan order) that matches anywhere, or None if nothing matched.
fn reduce_once(expr: &str) -> Result<Option<String>, EvalErr> {
    for (op, re) in OPERATIONS.iter() {
        let caps = match re.captures(expr) {
            Some(caps) => caps,
            None => {
                trace!("no match for '{}' in {}", op.symbol(), expr);
                continue;
            }
        };
        let l = parse_number(&caps[1])?;
        let r = parse_number(&caps[2])?;
        let value = op.apply(l, r)?;
        let rendered = render(value);
        let rewritten = re.replacen(expr, 1, NoExpand(&rendered)).into_owned();
        debug!("reduced '{}' with {}: {} -> {}", &caps[0], op.symbol(), expr, rewritten);
        return Ok(Some(rewritten));
    }
    Ok(None)
}

// space, \t, \n, vertical tab, form feed, \r; other Unicode spaces are kept
fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Evaluate an infix expression by repeatedly rewriting its text.
///
/// Every round restarts the operator scan from `^` and performs at most one
/// substitution, so the result depends on where operators appear in the
/// text rather than on usual arithmetic precedence. `|n|` is only
/// recognized for an integer `n` spanning the whole expression.
pub fn evaluate(expression: &str) -> Result<f64, EvalErr> {
    let mut expr: String = expression.chars().filter(|&c| !is_blank(c)).collect();
    loop {
        if let Some(caps) = ABS_FORM.captures(&expr) {
            return parse_number(&caps[1]).map(f64::abs);
        }
        match reduce_once(&expr)? {
            Some(rewritten) => expr = rewritten,
            None => return parse_number(&expr),
        }
    }
}
