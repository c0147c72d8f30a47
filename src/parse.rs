use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;

use crate::ring::*;
use crate::status::*;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Number(&'a str),
    Ident(&'a str),
    Symbol(char)
}

fn tokenize(input: &str) -> Result<Vec<Token<'_>>, Status> {
    let bytes = input.as_bytes();
    let mut result = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if c.is_ascii_whitespace() {
            i += 1;
        } else if c.is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i < bytes.len() && bytes[i] == b'.' {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
            }
            if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
                let mut j = i + 1;
                if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
                    j += 1;
                }
                if j < bytes.len() && bytes[j].is_ascii_digit() {
                    i = j;
                    while i < bytes.len() && bytes[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            result.push(Token::Number(&input[start..i]));
        } else if c.is_ascii_alphabetic() || c == b'_' {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            result.push(Token::Ident(&input[start..i]));
        } else if matches!(c, b'+' | b'-' | b'*' | b'/' | b'^' | b'(' | b')') {
            result.push(Token::Symbol(c as char));
            i += 1;
        } else {
            return Err(Status::Domain);
        }
    }
    return Ok(result);
}

///
/// Converts a decimal literal like `12`, `0.25` or `1.5e-3` into the exact rational
/// number it denotes.
///
fn decimal_value(literal: &str) -> Option<BigRational> {
    let (mantissa, exponent) = match literal.find(|c: char| c == 'e' || c == 'E') {
        Some(pos) => (&literal[..pos], literal[pos + 1..].parse::<i32>().ok()?),
        None => (literal, 0)
    };
    let (int_part, frac_part) = match mantissa.find('.') {
        Some(pos) => (&mantissa[..pos], &mantissa[pos + 1..]),
        None => (mantissa, "")
    };
    let digits = format!("{}{}", int_part, frac_part).parse::<BigInt>().ok()?;
    let scale = i64::from(exponent) - frac_part.len() as i64;
    let power = num_traits::pow(BigInt::from(10), usize::try_from(scale.unsigned_abs()).ok()?);
    if scale >= 0 {
        return Some(BigRational::from_integer(digits * power));
    } else {
        return Some(BigRational::new(digits, power));
    }
}

///
/// Reads a numeric literal into `res`, as an integer if possible and as a rational
/// number otherwise. Identifiers are not understood.
///
pub fn set_literal(res: &mut El, atom: &str, ring: &RingCtx) -> Status {
    if !atom.starts_with(|c: char| c.is_ascii_digit()) {
        return Status::Domain;
    }
    if atom.bytes().all(|c| c.is_ascii_digit()) {
        return match atom.parse::<BigInt>() {
            Ok(value) => ring.set_bigint(res, &value),
            Err(_) => Status::Domain
        };
    }
    match decimal_value(atom) {
        Some(value) if value.denom().is_one() => ring.set_bigint(res, value.numer()),
        Some(value) => ring.set_rational(res, &value),
        None => Status::Domain
    }
}

struct Parser<'a, 'b, F> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    ring: &'b RingCtx,
    gens: Vec<(String, El)>,
    atom: F
}

impl<'a, 'b, F> Parser<'a, 'b, F>
    where F: FnMut(&mut El, &str) -> Status
{
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn next_symbol_is(&self, symbol: char) -> bool {
        self.peek() == Some(&Token::Symbol(symbol))
    }

    fn expect_symbol(&mut self, symbol: char) -> Result<(), Status> {
        if self.next_symbol_is(symbol) {
            self.pos += 1;
            return Ok(());
        }
        return Err(Status::Domain);
    }

    fn binary(&self, x: &El, y: &El, op: fn(&RingCtx, &mut El, &El, &El) -> Status) -> Result<El, Status> {
        let mut result = self.ring.init();
        match op(self.ring, &mut result, x, y) {
            Status::Success => Ok(result),
            status => Err(status)
        }
    }

    fn expression(&mut self) -> Result<El, Status> {
        let mut result = self.product()?;
        loop {
            if self.next_symbol_is('+') {
                self.pos += 1;
                let rhs = self.product()?;
                result = self.binary(&result, &rhs, RingCtx::add)?;
            } else if self.next_symbol_is('-') {
                self.pos += 1;
                let rhs = self.product()?;
                result = self.binary(&result, &rhs, RingCtx::sub)?;
            } else {
                return Ok(result);
            }
        }
    }

    fn product(&mut self) -> Result<El, Status> {
        let mut result = self.signed()?;
        loop {
            if self.next_symbol_is('*') {
                self.pos += 1;
                let rhs = self.signed()?;
                result = self.binary(&result, &rhs, RingCtx::mul)?;
            } else if self.next_symbol_is('/') {
                self.pos += 1;
                let rhs = self.signed()?;
                result = self.binary(&result, &rhs, RingCtx::div)?;
            } else {
                return Ok(result);
            }
        }
    }

    fn signed(&mut self) -> Result<El, Status> {
        if self.next_symbol_is('-') {
            self.pos += 1;
            let value = self.signed()?;
            let mut result = self.ring.init();
            self.ring.neg(&mut result, &value).into_result()?;
            return Ok(result);
        }
        self.power()
    }

    fn power(&mut self) -> Result<El, Status> {
        let base = self.primary()?;
        if !self.next_symbol_is('^') {
            return Ok(base);
        }
        self.pos += 1;
        let exponent = self.exponent()?;
        let mut result = self.ring.init();
        self.ring.pow_bigint(&mut result, &base, &exponent).into_result()?;
        return Ok(result);
    }

    fn exponent(&mut self) -> Result<BigInt, Status> {
        let parenthesized = self.next_symbol_is('(');
        if parenthesized {
            self.pos += 1;
        }
        let negative = self.next_symbol_is('-');
        if negative {
            self.pos += 1;
        }
        let value = match self.peek() {
            Some(Token::Number(literal)) => literal.parse::<BigInt>().map_err(|_| Status::Domain)?,
            _ => return Err(Status::Domain)
        };
        self.pos += 1;
        if parenthesized {
            self.expect_symbol(')')?;
        }
        return Ok(if negative { -value } else { value });
    }

    fn primary(&mut self) -> Result<El, Status> {
        match self.peek().cloned() {
            Some(Token::Symbol('(')) => {
                self.pos += 1;
                let result = self.expression()?;
                self.expect_symbol(')')?;
                Ok(result)
            },
            Some(Token::Number(atom)) | Some(Token::Ident(atom)) => {
                self.pos += 1;
                if let Some((_, g)) = self.gens.iter().find(|(name, _)| name == atom) {
                    let mut result = self.ring.init();
                    self.ring.set(&mut result, g).into_result()?;
                    return Ok(result);
                }
                let mut result = self.ring.init();
                (self.atom)(&mut result, atom).into_result()?;
                Ok(result)
            },
            _ => Err(Status::Domain)
        }
    }
}

///
/// Parses an expression built from `+`, `-`, `*`, `/`, `^` and parentheses.
///
/// Names of the generators in [`RingCtx::gens_recursive()`] refer to these generators,
/// where the name of a generator is what [`RingCtx::write()`] writes for it. All other
/// numbers and identifiers are read by `atom`. Exponents must be integer literals.
///
/// The result is only written on success. Malformed input gives [`Status::Domain`],
/// otherwise the status of the first failing operation is returned.
///
pub fn set_str_with<F>(res: &mut El, input: &str, ring: &RingCtx, atom: F) -> Status
    where F: FnMut(&mut El, &str) -> Status
{
    let tokens = match tokenize(input) {
        Ok(tokens) => tokens,
        Err(status) => return status
    };
    let mut gens = Vec::new();
    let mut gen_names = Vec::new();
    if ring.gens_recursive(&mut gens).is_success() {
        for g in gens {
            let mut name = String::new();
            if ring.write(&mut name, &g).is_ok() {
                gen_names.push((name, g));
            }
        }
    }
    let mut parser = Parser { tokens, pos: 0, ring, gens: gen_names, atom };
    let result = parser.expression().and_then(|value| if parser.pos == parser.tokens.len() {
        Ok(value)
    } else {
        Err(Status::Domain)
    });
    match result {
        Ok(value) => {
            *res = value;
            Status::Success
        },
        Err(status) => {
            tracing::trace!(input, ?status, "failed to parse ring element");
            status
        }
    }
}

#[cfg(test)]
use num_traits::Zero;
#[cfg(test)]
use crate::rings::integer::integer_ring;
#[cfg(test)]
use crate::rings::rational::rational_field;
#[cfg(test)]
use crate::rings::zn::zn;

#[cfg(test)]
fn parse(ring: &RingCtx, input: &str) -> Result<El, Status> {
    let mut result = ring.init();
    match ring.set_str(&mut result, input) {
        Status::Success => Ok(result),
        status => Err(status)
    }
}

#[test]
fn test_tokenize() {
    assert_eq!(
        vec![Token::Number("2"), Token::Symbol('*'), Token::Ident("x1"), Token::Symbol('^'), Token::Number("3")],
        tokenize("2*x1 ^3").unwrap()
    );
    assert_eq!(vec![Token::Number("1.5e-3"), Token::Symbol('*'), Token::Ident("e")], tokenize("1.5e-3*e").unwrap());
    assert_eq!(vec![Token::Number("2"), Token::Ident("e")], tokenize("2e").unwrap());
    assert_eq!(Err(Status::Domain), tokenize("1 + [2]"));
}

#[test]
fn test_decimal_value() {
    assert_eq!(Some(BigRational::new(1.into(), 4.into())), decimal_value("0.25"));
    assert_eq!(Some(BigRational::new(3.into(), 2000.into())), decimal_value("1.5e-3"));
    assert_eq!(Some(BigRational::from_integer(1200.into())), decimal_value("12e2"));
    assert!(decimal_value("0.").map(|x| x.is_zero()).unwrap_or(false));
}

#[test]
fn test_parse_integers() {
    let ZZ = integer_ring();
    assert_el_eq!(ZZ, ZZ.from_int(7).unwrap(), parse(&ZZ, "1 + 2 * 3").unwrap());
    assert_el_eq!(ZZ, ZZ.from_int(-9).unwrap(), parse(&ZZ, "-(1 + 2)^2").unwrap());
    assert_el_eq!(ZZ, ZZ.from_int(-1).unwrap(), parse(&ZZ, "2 - 3").unwrap());
    assert_el_eq!(ZZ, ZZ.from_int(3).unwrap(), parse(&ZZ, "6/2").unwrap());
    assert_el_eq!(ZZ, ZZ.from_bigint(&BigInt::from(10).pow(30u32)).unwrap(), parse(&ZZ, "1000000000000000000000000000000").unwrap());
    assert_eq!(Err(Status::Domain), parse(&ZZ, "1/2").map(|_| ()));
}

#[test]
fn test_parse_rationals_and_residues() {
    let QQ = rational_field();
    assert_el_eq!(QQ, QQ.from_rational(&BigRational::new(5.into(), 4.into())).unwrap(), parse(&QQ, "1/2 + 0.75").unwrap());
    assert_el_eq!(QQ, QQ.from_rational(&BigRational::new(1.into(), 8.into())).unwrap(), parse(&QQ, "2^(-3)").unwrap());
    let Z7 = zn(7);
    assert_el_eq!(Z7, Z7.from_int(6).unwrap(), parse(&Z7, "-1").unwrap());
    assert_el_eq!(Z7, Z7.from_int(4).unwrap(), parse(&Z7, "1/2").unwrap());
}

#[test]
fn test_parse_malformed() {
    let ZZ = integer_ring();
    for input in ["", "1 +", "(1", "1)", "2 3", "x", "1 ^ x", "1 # 2", "*2"] {
        assert_eq!(Err(Status::Domain), parse(&ZZ, input).map(|_| ()), "input {:?}", input);
    }
}

#[test]
fn test_parse_keeps_result_on_failure() {
    let ZZ = integer_ring();
    let mut result = ZZ.from_int(5).unwrap();
    assert_eq!(Status::Domain, ZZ.set_str(&mut result, "1 +"));
    assert_el_eq!(ZZ, ZZ.from_int(5).unwrap(), result);
}
