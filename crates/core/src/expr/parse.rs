use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_till, take_while},
    character::complete::{anychar, char, digit0, digit1, multispace0, one_of, satisfy},
    combinator::{all_consuming, map, map_res, not, opt, recognize},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated},
};
use thiserror::Error;

use super::{BinaryOp, Expr, UnaryOp};

/// Errors produced while parsing expression text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected input at column {column}: `{rest}`")]
    Syntax { column: usize, rest: String },
}

type PResult<'a, O> = IResult<&'a str, O>;

/// A piece of source text as seen by constant substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// A name that may stand for a constant.
    Identifier(&'a str),

    /// Copied unchanged: numbers, quoted text, comments, and anything else.
    Verbatim(&'a str),
}

/// Lexes one token.
///
/// Numbers come before identifiers so an exponent such as `2e5` is never
/// read as a name. Quoted text and `#` comments end at the line break.
pub(crate) fn token(input: &str) -> PResult<'_, Token<'_>> {
    let quoted = alt((
        (char('"'), take_till(|c: char| c == '"' || c == '\n'), opt(char('"'))),
        (char('\''), take_till(|c: char| c == '\'' || c == '\n'), opt(char('\''))),
    ));
    let comment = (char('#'), take_till(|c: char| c == '\n'));

    alt((
        map(recognize(number), Token::Verbatim),
        map(identifier, Token::Identifier),
        map(recognize(quoted), Token::Verbatim),
        map(recognize(comment), Token::Verbatim),
        map(recognize(anychar), Token::Verbatim),
    ))
    .parse(input)
}

pub(super) fn parse(text: &str) -> Result<Expr, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    match all_consuming(expression).parse(text) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => Err(syntax_error(text, e.input)),
        Err(nom::Err::Incomplete(_)) => Err(syntax_error(text, "")),
    }
}

fn syntax_error(text: &str, rest: &str) -> ParseError {
    let consumed = text.len() - rest.len();
    ParseError::Syntax {
        column: text[..consumed].chars().count() + 1,
        rest: rest.trim().to_string(),
    }
}

/// Wraps a parser so it skips surrounding whitespace.
fn ws<'a, O, P>(inner: P) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    P: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

/// `term (("+" | "-") term)*`
fn expression(input: &str) -> PResult<'_, Expr> {
    let (input, first) = term(input)?;
    let (input, rest) = many0(pair(ws(one_of("+-")), term)).parse(input)?;

    let expr = rest.into_iter().fold(first, |lhs, (op, rhs)| {
        let op = if op == '+' { BinaryOp::Add } else { BinaryOp::Sub };
        Expr::binary(op, lhs, rhs)
    });
    Ok((input, expr))
}

/// `unary (("*" | "/" | "%") unary)*`
fn term(input: &str) -> PResult<'_, Expr> {
    let (input, first) = unary(input)?;
    let op = terminated(one_of("*/%"), not(char('*')));
    let (input, rest) = many0(pair(ws(op), unary)).parse(input)?;

    let expr = rest.into_iter().fold(first, |lhs, (op, rhs)| {
        let op = match op {
            '*' => BinaryOp::Mul,
            '/' => BinaryOp::Div,
            _ => BinaryOp::Rem,
        };
        Expr::binary(op, lhs, rhs)
    });
    Ok((input, expr))
}

/// `("+" | "-") unary | power`
fn unary(input: &str) -> PResult<'_, Expr> {
    alt((
        map(pair(ws(one_of("+-")), unary), |(sign, operand)| {
            let op = if sign == '-' { UnaryOp::Neg } else { UnaryOp::Pos };
            Expr::unary(op, operand)
        }),
        power,
    ))
    .parse(input)
}

/// `primary (("**" | "^") unary)?`
///
/// The exponent is parsed as a unary so that `2 ** -1` works and chains
/// associate to the right.
fn power(input: &str) -> PResult<'_, Expr> {
    let (input, base) = primary(input)?;
    let (input, exponent) = opt(preceded(ws(alt((tag("**"), tag("^")))), unary)).parse(input)?;

    let expr = match exponent {
        Some(exponent) => Expr::binary(BinaryOp::Pow, base, exponent),
        None => base,
    };
    Ok((input, expr))
}

fn primary(input: &str) -> PResult<'_, Expr> {
    ws(alt((
        number,
        text,
        call_or_variable,
        delimited(char('('), expression, char(')')),
    )))
    .parse(input)
}

fn number(input: &str) -> PResult<'_, Expr> {
    let mantissa = alt((
        recognize((digit1, opt((char('.'), digit0)))),
        recognize((char('.'), digit1)),
    ));
    let exponent = opt((one_of("eE"), opt(one_of("+-")), digit1));

    map_res(recognize((mantissa, exponent)), |literal: &str| {
        literal.parse::<f64>().map(Expr::Number)
    })
    .parse(input)
}

fn text(input: &str) -> PResult<'_, Expr> {
    let double = delimited(char('"'), take_while(|c: char| c != '"'), char('"'));
    let single = delimited(char('\''), take_while(|c: char| c != '\''), char('\''));

    map(alt((double, single)), |s: &str| Expr::Text(s.to_string())).parse(input)
}

fn identifier(input: &str) -> PResult<'_, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic()),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))
    .parse(input)
}

fn call_or_variable(input: &str) -> PResult<'_, Expr> {
    let (input, name) = identifier(input)?;
    let arguments = delimited(
        char('('),
        separated_list0(char(','), expression),
        char(')'),
    );
    let (input, args) = opt(preceded(multispace0, arguments)).parse(input)?;

    let expr = match args {
        Some(args) => Expr::Call {
            name: name.to_string(),
            args,
        },
        None => Expr::Variable(name.to_string()),
    };
    Ok((input, expr))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(value: f64) -> Expr {
        Expr::Number(value)
    }

    fn var(name: &str) -> Expr {
        Expr::Variable(name.to_string())
    }

    fn lex(mut text: &str) -> Vec<Token<'_>> {
        let mut tokens = Vec::new();
        while !text.is_empty() {
            let (rest, token) = token(text).expect("every input lexes");
            tokens.push(token);
            text = rest;
        }
        tokens
    }

    #[test]
    fn lexer_separates_names_from_the_rest() {
        use Token::{Identifier, Verbatim};

        assert_eq!(
            lex("a=2e5*pi_2"),
            vec![
                Identifier("a"),
                Verbatim("="),
                Verbatim("2e5"),
                Verbatim("*"),
                Identifier("pi_2"),
            ]
        );
        assert_eq!(
            lex("f('pi') # pi\npi"),
            vec![
                Identifier("f"),
                Verbatim("("),
                Verbatim("'pi'"),
                Verbatim(")"),
                Verbatim(" "),
                Verbatim("# pi"),
                Verbatim("\n"),
                Identifier("pi"),
            ]
        );
    }

    #[test]
    fn unterminated_quote_ends_at_line_break() {
        assert_eq!(
            lex("\"pi\npi"),
            vec![
                Token::Verbatim("\"pi"),
                Token::Verbatim("\n"),
                Token::Identifier("pi"),
            ]
        );
    }

    #[test]
    fn numeric_literal_forms() {
        assert_eq!(parse("12").unwrap(), num(12.0));
        assert_eq!(parse("1.5").unwrap(), num(1.5));
        assert_eq!(parse(".5").unwrap(), num(0.5));
        assert_eq!(parse("1e-3").unwrap(), num(1e-3));
        assert_eq!(parse("2.5E+4").unwrap(), num(2.5e4));
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let expected = Expr::binary(
            BinaryOp::Add,
            num(1.0),
            Expr::binary(BinaryOp::Mul, num(2.0), num(3.0)),
        );
        assert_eq!(parse("1 + 2 * 3").unwrap(), expected);
    }

    #[test]
    fn subtraction_is_left_associative() {
        let expected = Expr::binary(
            BinaryOp::Sub,
            Expr::binary(BinaryOp::Sub, var("a"), var("b")),
            var("c"),
        );
        assert_eq!(parse("a - b - c").unwrap(), expected);
    }

    #[test]
    fn power_is_right_associative() {
        let expected = Expr::binary(
            BinaryOp::Pow,
            num(2.0),
            Expr::binary(BinaryOp::Pow, num(3.0), num(2.0)),
        );
        assert_eq!(parse("2 ** 3 ** 2").unwrap(), expected);
        assert_eq!(parse("2^3^2").unwrap(), expected);
    }

    #[test]
    fn power_binds_tighter_than_leading_sign() {
        let expected = Expr::unary(
            UnaryOp::Neg,
            Expr::binary(BinaryOp::Pow, num(2.0), num(2.0)),
        );
        assert_eq!(parse("-2**2").unwrap(), expected);
    }

    #[test]
    fn negative_exponent() {
        let expected = Expr::binary(
            BinaryOp::Pow,
            var("x"),
            Expr::unary(UnaryOp::Neg, num(1.0)),
        );
        assert_eq!(parse("x ** -1").unwrap(), expected);
    }

    #[test]
    fn calls_with_text_arguments() {
        let expected = Expr::Call {
            name: "convert".to_string(),
            args: vec![
                var("d"),
                Expr::Text("ft".to_string()),
                Expr::Text("m".to_string()),
            ],
        };
        assert_eq!(parse("convert(d, \"ft\", 'm')").unwrap(), expected);
    }

    #[test]
    fn call_without_arguments() {
        let expected = Expr::Call {
            name: "now".to_string(),
            args: vec![],
        };
        assert_eq!(parse("now()").unwrap(), expected);
    }

    #[test]
    fn identifiers_may_contain_digits_and_underscores() {
        assert_eq!(parse("T_1").unwrap(), var("T_1"));
        assert_eq!(parse("x2").unwrap(), var("x2"));
    }

    #[test]
    fn blank_input_is_empty() {
        assert_eq!(parse("   "), Err(ParseError::Empty));
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        assert!(matches!(parse("1 + 2 )"), Err(ParseError::Syntax { .. })));
        assert!(matches!(parse("3 4"), Err(ParseError::Syntax { .. })));
        assert!(matches!(parse("2 ** "), Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn unbalanced_parenthesis_is_rejected() {
        assert!(matches!(parse("(1 + 2"), Err(ParseError::Syntax { .. })));
    }
}
