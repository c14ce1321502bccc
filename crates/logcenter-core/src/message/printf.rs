//! printf-style substitution over [`Arg`] slices
//!
//! Supported: flags `- + # 0 space`, width, precision (either may be `*`,
//! taken from the next integer operand) and the verbs
//! `v s q d b o x X c f F e E g G t %`. Misuse never fails, it is rendered
//! inline: `%!d(string=hi)`, `%!d(MISSING)`, `%!(EXTRA int=1)`, `%!(NOVERB)`,
//! `%!(BADWIDTH)`, `%!(BADPREC)`.

use std::iter::Peekable;
use std::str::Chars;

use super::Arg;

/// Width and precision are clamped to this value
const MAX_WIDTH: usize = 1_000_000;

/// `%v` on floats switches to exponent form from this decimal exponent on
const SHORTEST_EXP_LIMIT: i32 = 6;

#[derive(Debug, Default, Clone, Copy)]
struct Spec {
    minus: bool,
    plus: bool,
    sharp: bool,
    zero: bool,
    space: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

/// Substitute `args` into `template`
pub fn sprintf(template: &str, args: &[Arg]) -> String {
    let mut out = String::with_capacity(template.len() + 16 * args.len());
    let mut chars = template.chars().peekable();
    let mut next = 0;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut spec = Spec::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => spec.minus = true,
                '+' => spec.plus = true,
                '#' => spec.sharp = true,
                '0' => spec.zero = true,
                ' ' => spec.space = true,
                _ => break,
            }
            chars.next();
        }
        // Left justification never pads with zeros
        if spec.minus {
            spec.zero = false;
        }

        if chars.peek() == Some(&'*') {
            chars.next();
            match star_operand(args, &mut next) {
                Some(width) if width < 0 => {
                    spec.minus = true;
                    spec.zero = false;
                    spec.width = Some(width.unsigned_abs() as usize);
                }
                Some(width) => spec.width = Some(width as usize),
                None => out.push_str("%!(BADWIDTH)"),
            }
        } else {
            spec.width = parse_number(&mut chars);
        }

        if chars.peek() == Some(&'.') {
            chars.next();
            if chars.peek() == Some(&'*') {
                chars.next();
                match star_operand(args, &mut next) {
                    // A negative precision means none was given
                    Some(precision) if precision < 0 => spec.precision = None,
                    Some(precision) => spec.precision = Some(precision as usize),
                    None => out.push_str("%!(BADPREC)"),
                }
            } else {
                spec.precision = Some(parse_number(&mut chars).unwrap_or(0));
            }
        }

        let Some(verb) = chars.next() else {
            out.push_str("%!(NOVERB)");
            break;
        };

        if verb == '%' {
            out.push('%');
            continue;
        }

        match args.get(next) {
            Some(arg) => {
                next += 1;
                format_arg(&mut out, verb, spec, arg);
            }
            None => {
                out.push_str("%!");
                out.push(verb);
                out.push_str("(MISSING)");
            }
        }
    }

    if next < args.len() {
        let extra: Vec<String> = args[next..]
            .iter()
            .map(|arg| format!("{}={}", arg.type_name(), arg))
            .collect();
        out.push_str("%!(EXTRA ");
        out.push_str(&extra.join(", "));
        out.push(')');
    }

    out
}

/// Integer operand consumed by a `*` width or precision
fn star_operand(args: &[Arg], next: &mut usize) -> Option<i64> {
    let value = match args.get(*next)? {
        Arg::Int(n) => *n,
        Arg::Uint(n) => i64::try_from(*n).ok()?,
        _ => {
            *next += 1;
            return None;
        }
    };
    *next += 1;
    if value.unsigned_abs() > MAX_WIDTH as u64 {
        return None;
    }
    Some(value)
}

fn parse_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        let current = value.unwrap_or(0);
        value = Some((current * 10 + digit as usize).min(MAX_WIDTH));
        chars.next();
    }
    value
}

fn format_arg(out: &mut String, verb: char, spec: Spec, arg: &Arg) {
    let rendered = match arg {
        Arg::Bool(b) => match verb {
            't' | 'v' => Some(pad(&b.to_string(), spec)),
            _ => None,
        },
        Arg::Int(n) => format_integer(n.is_negative(), n.unsigned_abs(), verb, spec),
        Arg::Uint(n) => format_integer(false, *n, verb, spec),
        Arg::Float(x) => format_float(*x, verb, spec),
        Arg::Str(s) => format_str(s, verb, spec),
        Arg::Value { repr, .. } => match verb {
            'v' | 's' | 'q' => format_str(repr, verb, spec),
            _ => None,
        },
    };

    match rendered {
        Some(text) => out.push_str(&text),
        None => {
            out.push_str("%!");
            out.push(verb);
            out.push('(');
            out.push_str(arg.type_name());
            out.push('=');
            out.push_str(&arg.to_string());
            out.push(')');
        }
    }
}

fn sign(negative: bool, spec: Spec) -> &'static str {
    if negative {
        "-"
    } else if spec.plus {
        "+"
    } else if spec.space {
        " "
    } else {
        ""
    }
}

fn format_integer(negative: bool, magnitude: u64, verb: char, spec: Spec) -> Option<String> {
    let digits = match verb {
        'v' | 'd' => magnitude.to_string(),
        'b' => format!("{:b}", magnitude),
        'o' => format!("{:o}", magnitude),
        'x' => format!("{:x}", magnitude),
        'X' => format!("{:X}", magnitude),
        'c' => return Some(pad(&to_char(negative, magnitude).to_string(), spec)),
        'q' => return Some(pad(&format!("{:?}", to_char(negative, magnitude)), spec)),
        _ => return None,
    };

    // Precision is the minimum number of digits
    let digits = match spec.precision {
        Some(0) if magnitude == 0 => String::new(),
        Some(p) if digits.len() < p => format!("{}{}", "0".repeat(p - digits.len()), digits),
        _ => digits,
    };

    let mut prefix = sign(negative, spec).to_string();
    if spec.sharp {
        match verb {
            'b' => prefix.push_str("0b"),
            'o' if !digits.starts_with('0') => prefix.push('0'),
            'x' => prefix.push_str("0x"),
            'X' => prefix.push_str("0X"),
            _ => {}
        }
    }

    Some(pad_number(&prefix, &digits, spec, spec.precision.is_none()))
}

fn to_char(negative: bool, magnitude: u64) -> char {
    if negative {
        return char::REPLACEMENT_CHARACTER;
    }
    u32::try_from(magnitude)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn format_float(x: f64, verb: char, spec: Spec) -> Option<String> {
    if !matches!(verb, 'v' | 'e' | 'E' | 'f' | 'F' | 'g' | 'G') {
        return None;
    }

    if !x.is_finite() {
        let text = if x.is_nan() {
            match (spec.plus, spec.space) {
                (true, _) => "+NaN",
                (false, true) => " NaN",
                _ => "NaN",
            }
        } else if x > 0.0 {
            "+Inf"
        } else {
            "-Inf"
        };
        return Some(pad_fill(text, spec, ' '));
    }

    let magnitude = x.abs();
    let body = match verb {
        'f' | 'F' => format!("{:.*}", spec.precision.unwrap_or(6), magnitude),
        'e' | 'E' => exponent_form(&format!("{:.*e}", spec.precision.unwrap_or(6), magnitude)),
        _ => match spec.precision {
            None => shortest(magnitude),
            Some(p) => general(magnitude, p.max(1), spec.sharp),
        },
    };
    let body = if verb.is_ascii_uppercase() {
        body.to_uppercase()
    } else {
        body
    };

    Some(pad_number(sign(x.is_sign_negative(), spec), &body, spec, true))
}

/// Shortest representation, as printed by `%v`
pub(super) fn format_float_shortest(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    let body = shortest(x.abs());
    if x.is_sign_negative() {
        format!("-{}", body)
    } else {
        body
    }
}

fn shortest(magnitude: f64) -> String {
    let scientific = format!("{:e}", magnitude);
    let exp = exponent_of(&scientific);
    if !(-4..SHORTEST_EXP_LIMIT).contains(&exp) {
        exponent_form(&scientific)
    } else {
        format!("{}", magnitude)
    }
}

fn general(magnitude: f64, precision: usize, sharp: bool) -> String {
    let scientific = format!("{:.*e}", precision - 1, magnitude);
    let exp = exponent_of(&scientific);

    if exp < -4 || exp >= precision as i32 {
        let mantissa = scientific.split('e').next().unwrap_or("0");
        let mantissa = if sharp {
            mantissa.to_string()
        } else {
            trim_fraction(mantissa)
        };
        exponent_form(&format!("{}e{}", mantissa, exp))
    } else {
        let decimals = (precision as i32 - 1 - exp).max(0) as usize;
        let fixed = format!("{:.*}", decimals, magnitude);
        if sharp {
            fixed
        } else {
            trim_fraction(&fixed)
        }
    }
}

fn exponent_of(scientific: &str) -> i32 {
    scientific
        .rsplit_once('e')
        .and_then(|(_, exp)| exp.parse().ok())
        .unwrap_or(0)
}

/// "1.5e6" -> "1.5e+06"
fn exponent_form(scientific: &str) -> String {
    let (mantissa, _) = scientific.split_once('e').unwrap_or((scientific, "0"));
    let exp = exponent_of(scientific);
    let exp_sign = if exp < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, exp_sign, exp.abs())
}

fn trim_fraction(number: &str) -> String {
    if !number.contains('.') {
        return number.to_string();
    }
    number.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn format_str(s: &str, verb: char, spec: Spec) -> Option<String> {
    let s: String = match spec.precision {
        Some(p) => s.chars().take(p).collect(),
        None => s.to_string(),
    };

    let body = match verb {
        'v' | 's' => s,
        'q' => format!("{:?}", s),
        'x' => s.bytes().map(|b| format!("{:02x}", b)).collect(),
        'X' => s.bytes().map(|b| format!("{:02X}", b)).collect(),
        _ => return None,
    };

    Some(pad(&body, spec))
}

fn pad(text: &str, spec: Spec) -> String {
    pad_fill(text, spec, if spec.zero { '0' } else { ' ' })
}

fn pad_fill(text: &str, spec: Spec, fill: char) -> String {
    let len = text.chars().count();
    match spec.width {
        Some(width) if width > len => {
            if spec.minus {
                format!("{}{}", text, " ".repeat(width - len))
            } else {
                let padding: String = std::iter::repeat(fill).take(width - len).collect();
                format!("{}{}", padding, text)
            }
        }
        _ => text.to_string(),
    }
}

/// Pad a signed number; zero padding goes between the sign and the digits
fn pad_number(prefix: &str, digits: &str, spec: Spec, zero_allowed: bool) -> String {
    let len = prefix.chars().count() + digits.chars().count();
    match spec.width {
        Some(width) if width > len && spec.zero && zero_allowed => {
            format!("{}{}{}", prefix, "0".repeat(width - len), digits)
        }
        _ => pad_fill(&format!("{}{}", prefix, digits), spec, ' '),
    }
}
