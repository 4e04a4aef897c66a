//! nom grammar for cost-function expressions.
//!
//! Precedence, loosest to tightest: `+ -`, `* /`, unary `-`, `^`
//! (right-associative). Function application is `name(expr)` over the
//! functions listed in [`Func`]. Whitespace is insignificant.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, multispace0, one_of},
    combinator::{all_consuming, map, opt, recognize},
    error::{ErrorKind, ParseError},
    multi::many0,
    number::complete::double,
    sequence::{delimited, pair, preceded},
};

use crate::ast::{BinOp, Expr, Func};
use crate::error::{ExprError, ExprResult};

/// Parse a complete expression string.
///
/// Empty (or all-whitespace) input is [`ExprError::Empty`]; anything the
/// grammar does not consume entirely is a parse error pointing at the
/// offending suffix.
pub fn parse(input: &str) -> ExprResult<Expr> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ExprError::Empty);
    }
    match all_consuming(expr)(trimmed) {
        Ok((_, e)) => Ok(e),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => Err(e.into_expr_error()),
        Err(nom::Err::Incomplete(_)) => Err(ExprError::Parse {
            near: trimmed.to_string(),
        }),
    }
}

/// Parser-internal error: nom bookkeeping plus the one semantic failure the
/// grammar can detect (a call to an unrecognized function name).
#[derive(Debug)]
struct PError<'a> {
    input: &'a str,
    unknown_function: Option<String>,
}

impl<'a> PError<'a> {
    fn unknown_function(input: &'a str, name: &str) -> nom::Err<Self> {
        nom::Err::Failure(Self {
            input,
            unknown_function: Some(name.to_string()),
        })
    }

    fn into_expr_error(self) -> ExprError {
        match self.unknown_function {
            Some(name) => ExprError::UnknownFunction { name },
            None => ExprError::Parse {
                near: self.input.chars().take(24).collect(),
            },
        }
    }
}

impl<'a> ParseError<&'a str> for PError<'a> {
    fn from_error_kind(input: &'a str, _kind: ErrorKind) -> Self {
        Self {
            input,
            unknown_function: None,
        }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

type PResult<'a, T> = IResult<&'a str, T, PError<'a>>;

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> PResult<'a, O>
where
    F: FnMut(&'a str) -> PResult<'a, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn expr(input: &str) -> PResult<'_, Expr> {
    additive(input)
}

fn additive(input: &str) -> PResult<'_, Expr> {
    let (input, first) = term(input)?;
    let (input, rest) = many0(pair(ws(one_of("+-")), term))(input)?;
    let e = rest.into_iter().fold(first, |acc, (op, rhs)| {
        let op = if op == '+' { BinOp::Add } else { BinOp::Sub };
        Expr::bin(op, acc, rhs)
    });
    Ok((input, e))
}

fn term(input: &str) -> PResult<'_, Expr> {
    let (input, first) = unary(input)?;
    let (input, rest) = many0(pair(ws(one_of("*/")), unary))(input)?;
    let e = rest.into_iter().fold(first, |acc, (op, rhs)| {
        let op = if op == '*' { BinOp::Mul } else { BinOp::Div };
        Expr::bin(op, acc, rhs)
    });
    Ok((input, e))
}

fn unary(input: &str) -> PResult<'_, Expr> {
    let (input, _) = multispace0(input)?;
    if let Ok((rest, _)) = char::<_, PError<'_>>('-')(input) {
        let (rest, inner) = unary(rest)?;
        return Ok((rest, Expr::neg(inner)));
    }
    power(input)
}

fn power(input: &str) -> PResult<'_, Expr> {
    let (input, base) = atom(input)?;
    // Exponent recurses through `unary` so `a^b^c` associates right and
    // `a^-b` parses without parentheses.
    let (input, exponent) = opt(preceded(ws(char('^')), unary))(input)?;
    match exponent {
        Some(e) => Ok((input, Expr::bin(BinOp::Pow, base, e))),
        None => Ok((input, base)),
    }
}

fn atom(input: &str) -> PResult<'_, Expr> {
    let (input, _) = multispace0(input)?;
    alt((paren, call_or_var, map(double, Expr::Num)))(input)
}

fn paren(input: &str) -> PResult<'_, Expr> {
    delimited(char('('), expr, ws(char(')')))(input)
}

fn identifier(input: &str) -> PResult<'_, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn call_or_var(input: &str) -> PResult<'_, Expr> {
    let (rest, name) = identifier(input)?;
    let (after_open, open) = opt(preceded(multispace0, char('(')))(rest)?;
    if open.is_none() {
        return Ok((rest, Expr::var(name)));
    }
    let Some(func) = Func::from_name(name) else {
        return Err(PError::unknown_function(input, name));
    };
    let (rest, arg) = expr(after_open)?;
    let (rest, _) = ws(char(')'))(rest)?;
    Ok((rest, Expr::call(func, arg)))
}
