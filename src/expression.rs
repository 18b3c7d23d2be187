//! Symbolic scalar expressions.
//!
//! [`Expr`] is the scalar type of every pose and Jacobian produced by this crate. It implements
//! the arithmetic operators together with `num_traits::Zero` and `num_traits::One`, so it can be
//! used directly as a `nalgebra` matrix element: `Matrix4<Expr>` multiplication, slicing,
//! assignment and `Vector3<Expr>::cross` all work out of the box.
//!
//! Expressions are built through folding constructors: literals are combined, zero terms and unit
//! factors are dropped, and nested sums and products are flattened. This keeps the trees produced
//! by matrix products (that contain many `1 * x + 0 * y` patterns) small without an explicit
//! simplification step. Full simplification lives in [`Expr::simplify`].

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_traits::{One, Zero};

use crate::kinematics_error::KinematicsError;

/// Values bound to symbol names for numeric evaluation.
pub type Bindings = HashMap<String, f64>;

/// Number of decimal digits kept when floating point literals are rounded.
pub const ROUNDING_DIGITS: i32 = 8;

/// Rounding of a single value is only applied while the scaled value still has a fractional
/// part that f64 can represent.
const ROUNDING_LIMIT: f64 = 4.0e15;

/// Upper bound of rewrite passes in [`Expr::round_floats`]. Every pass that changes the tree
/// also makes it smaller, a handful is always enough.
const MAX_ROUNDING_PASSES: usize = 16;

/// Symbolic expression tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Floating point literal
    Num(f64),
    /// Named symbol
    Sym(String),
    /// Sum of terms, at most one of them a literal (then it is the first)
    Add(Vec<Expr>),
    /// Product of factors, at most one of them a literal (then it is the first)
    Mul(Vec<Expr>),
    /// Natural power
    Pow(Box<Expr>, u32),
    Sin(Box<Expr>),
    Cos(Box<Expr>),
}

impl Expr {
    /// Creates a symbol with the given name.
    pub fn symbol(name: impl Into<String>) -> Expr {
        Expr::Sym(name.into())
    }

    /// Creates symbols from names separated by commas or whitespace.
    /// ```
    /// use dh_symbolic_kinematics::expression::Expr;
    /// let xs = Expr::symbols("x_0, x_1 x_2");
    /// assert_eq!(xs.len(), 3);
    /// assert_eq!(xs[2], Expr::symbol("x_2"));
    /// ```
    pub fn symbols(names: &str) -> Vec<Expr> {
        names
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(Expr::symbol)
            .collect()
    }

    /// Sum of the given terms with literals combined and nested sums flattened.
    pub fn sum(terms: impl IntoIterator<Item = Expr>) -> Expr {
        let mut constant = 0.0;
        let mut rest = Vec::new();
        let mut take = |term: Expr, constant: &mut f64| match term {
            Expr::Num(v) => *constant += v,
            other => rest.push(other),
        };
        for term in terms {
            match term {
                Expr::Add(inner) => {
                    for t in inner {
                        take(t, &mut constant);
                    }
                }
                other => take(other, &mut constant),
            }
        }
        if constant != 0.0 {
            rest.insert(0, Expr::Num(constant));
        }
        match rest.len() {
            0 => Expr::Num(0.0),
            1 => rest.swap_remove(0),
            _ => Expr::Add(rest),
        }
    }

    /// Product of the given factors with literals combined and nested products flattened.
    /// A zero literal collapses the whole product.
    pub fn product(factors: impl IntoIterator<Item = Expr>) -> Expr {
        let mut coefficient = 1.0;
        let mut rest = Vec::new();
        let mut take = |factor: Expr, coefficient: &mut f64| match factor {
            Expr::Num(v) => *coefficient *= v,
            other => rest.push(other),
        };
        for factor in factors {
            match factor {
                Expr::Mul(inner) => {
                    for f in inner {
                        take(f, &mut coefficient);
                    }
                }
                other => take(other, &mut coefficient),
            }
        }
        if coefficient == 0.0 {
            return Expr::Num(0.0);
        }
        if rest.is_empty() {
            return Expr::Num(coefficient);
        }
        if coefficient != 1.0 {
            rest.insert(0, Expr::Num(coefficient));
        }
        match rest.len() {
            1 => rest.swap_remove(0),
            _ => Expr::Mul(rest),
        }
    }

    /// Natural power of this expression.
    pub fn pow(self, exponent: u32) -> Expr {
        match (self, exponent) {
            (_, 0) => Expr::Num(1.0),
            (base, 1) => base,
            (Expr::Num(v), n) => Expr::Num(natural_power(v, n)),
            (Expr::Pow(base, m), n) => Expr::Pow(base, m * n),
            (base, n) => Expr::Pow(Box::new(base), n),
        }
    }

    pub fn sin(&self) -> Expr {
        match self {
            Expr::Num(v) => Expr::Num(v.sin()),
            other => Expr::Sin(Box::new(other.clone())),
        }
    }

    pub fn cos(&self) -> Expr {
        match self {
            Expr::Num(v) => Expr::Num(v.cos()),
            other => Expr::Cos(Box::new(other.clone())),
        }
    }

    /// Numeric value if this expression is a literal.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Expr::Num(v) => Some(*v),
            _ => None,
        }
    }

    /// Symbol name if this expression is a bare symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Expr::Sym(name) => Some(name),
            _ => None,
        }
    }

    /// Partial derivative by the symbol with the given name.
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Num(_) => Expr::Num(0.0),
            Expr::Sym(name) => Expr::Num(if name == var { 1.0 } else { 0.0 }),
            Expr::Add(terms) => Expr::sum(terms.iter().map(|t| t.diff(var))),
            Expr::Mul(factors) => Expr::sum((0..factors.len()).map(|i| {
                let derivative = factors[i].diff(var);
                if derivative.is_zero() {
                    return derivative;
                }
                Expr::product(
                    factors
                        .iter()
                        .enumerate()
                        .map(|(k, f)| if k == i { derivative.clone() } else { f.clone() }),
                )
            })),
            Expr::Pow(_, 0) => Expr::Num(0.0),
            Expr::Pow(base, n) => Expr::product([
                Expr::Num(*n as f64),
                base.as_ref().clone().pow(n - 1),
                base.diff(var),
            ]),
            Expr::Sin(arg) => Expr::product([arg.cos(), arg.diff(var)]),
            Expr::Cos(arg) => Expr::product([Expr::Num(-1.0), arg.sin(), arg.diff(var)]),
        }
    }

    /// Partial derivative by a variable given as expression, that must be a bare symbol.
    pub fn diff_by(&self, var: &Expr) -> Result<Expr, KinematicsError> {
        match var.as_symbol() {
            Some(name) => Ok(self.diff(name)),
            None => Err(KinematicsError::NotASymbol(var.to_string())),
        }
    }

    /// Rewrites every sub-term for which `rule` returns a replacement, top-down. Sub-terms
    /// without replacement are rebuilt from their rewritten children through the folding
    /// constructors.
    pub fn xreplace<F>(&self, rule: &F) -> Expr
    where
        F: Fn(&Expr) -> Option<Expr>,
    {
        if let Some(replacement) = rule(self) {
            return replacement;
        }
        match self {
            Expr::Num(_) | Expr::Sym(_) => self.clone(),
            Expr::Add(terms) => Expr::sum(terms.iter().map(|t| t.xreplace(rule))),
            Expr::Mul(factors) => Expr::product(factors.iter().map(|f| f.xreplace(rule))),
            Expr::Pow(base, n) => base.xreplace(rule).pow(*n),
            Expr::Sin(arg) => arg.xreplace(rule).sin(),
            Expr::Cos(arg) => arg.xreplace(rule).cos(),
        }
    }

    /// Replaces the symbol `name` by `value` everywhere.
    pub fn subs(&self, name: &str, value: &Expr) -> Expr {
        self.xreplace(&|e: &Expr| match e {
            Expr::Sym(s) if s == name => Some(value.clone()),
            _ => None,
        })
    }

    /// Rounds every floating point literal to `digits` decimal digits, leaving symbolic
    /// sub-expressions untouched. Rounding may fold constants into new literals (a factor
    /// rounded to zero removes a term, a sine of a literal is evaluated), so the rewrite is
    /// repeated until nothing changes. Applying it twice gives the same result as once.
    pub fn round_floats(&self, digits: i32) -> Expr {
        let rule = |e: &Expr| match e {
            Expr::Num(v) => Some(Expr::Num(round_to(*v, digits))),
            _ => None,
        };
        let mut current = self.xreplace(&rule);
        for _ in 0..MAX_ROUNDING_PASSES {
            let next = current.xreplace(&rule);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    /// Numeric value with symbols taken from `bindings`.
    pub fn evaluate(&self, bindings: &Bindings) -> Result<f64, KinematicsError> {
        Ok(match self {
            Expr::Num(v) => *v,
            Expr::Sym(name) => *bindings
                .get(name)
                .ok_or_else(|| KinematicsError::UnboundSymbol(name.clone()))?,
            Expr::Add(terms) => {
                let mut total = 0.0;
                for t in terms {
                    total += t.evaluate(bindings)?;
                }
                total
            }
            Expr::Mul(factors) => {
                let mut total = 1.0;
                for f in factors {
                    total *= f.evaluate(bindings)?;
                }
                total
            }
            Expr::Pow(base, n) => natural_power(base.evaluate(bindings)?, *n),
            Expr::Sin(arg) => arg.evaluate(bindings)?.sin(),
            Expr::Cos(arg) => arg.evaluate(bindings)?.cos(),
        })
    }

    /// Names of all symbols this expression depends on.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut symbols = BTreeSet::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols(&self, into: &mut BTreeSet<String>) {
        match self {
            Expr::Num(_) => {}
            Expr::Sym(name) => {
                into.insert(name.clone());
            }
            Expr::Add(children) | Expr::Mul(children) => {
                children.iter().for_each(|c| c.collect_symbols(into))
            }
            Expr::Pow(base, _) => base.collect_symbols(into),
            Expr::Sin(arg) | Expr::Cos(arg) => arg.collect_symbols(into),
        }
    }

    /// If this is a negative literal or a product with negative coefficient, returns its
    /// negation. Used for printing `a - b` instead of `a + -1*b`.
    fn negated_if_negative(&self) -> Option<Expr> {
        match self {
            Expr::Num(v) if *v < 0.0 => Some(Expr::Num(-v)),
            Expr::Mul(factors) => match factors.first() {
                Some(Expr::Num(c)) if *c < 0.0 => Some(Expr::product(
                    std::iter::once(Expr::Num(-c)).chain(factors[1..].iter().cloned()),
                )),
                _ => None,
            },
            _ => None,
        }
    }
}

/// `value` raised to `exponent`, exact for exponents that fit `powi`.
fn natural_power(value: f64, exponent: u32) -> f64 {
    match i32::try_from(exponent) {
        Ok(n) => value.powi(n),
        Err(_) => value.powf(exponent as f64),
    }
}

/// Rounds `value` to `digits` decimal digits. Negative zero is normalized to zero.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    let scaled = value * scale;
    if !scaled.is_finite() || scaled.abs() >= ROUNDING_LIMIT {
        return value;
    }
    let rounded = scaled.round() / scale;
    if rounded == 0.0 { 0.0 } else { rounded }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Num(v) => write!(f, "{}", v),
            Expr::Sym(name) => write!(f, "{}", name),
            Expr::Add(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    match (i, term.negated_if_negative()) {
                        (0, _) => write!(f, "{}", term)?,
                        (_, Some(magnitude)) => write!(f, " - {}", magnitude)?,
                        (_, None) => write!(f, " + {}", term)?,
                    }
                }
                Ok(())
            }
            Expr::Mul(factors) => {
                let mut rest = factors.as_slice();
                if let Some(Expr::Num(c)) = factors.first() {
                    if *c == -1.0 {
                        write!(f, "-")?;
                        rest = &factors[1..];
                    }
                }
                for (i, factor) in rest.iter().enumerate() {
                    if i > 0 {
                        write!(f, "*")?;
                    }
                    match factor {
                        Expr::Add(_) => write!(f, "({})", factor)?,
                        _ => write!(f, "{}", factor)?,
                    }
                }
                Ok(())
            }
            Expr::Pow(base, n) => match base.as_ref() {
                Expr::Add(_) | Expr::Mul(_) => write!(f, "({})^{}", base, n),
                Expr::Num(v) if *v < 0.0 => write!(f, "({})^{}", base, n),
                _ => write!(f, "{}^{}", base, n),
            },
            Expr::Sin(arg) => write!(f, "sin({})", arg),
            Expr::Cos(arg) => write!(f, "cos({})", arg),
        }
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Num(value)
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::Num(value as f64)
    }
}

impl From<&Expr> for Expr {
    fn from(value: &Expr) -> Self {
        value.clone()
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::sum([self, rhs])
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::sum([self, -rhs])
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::product([self, rhs])
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::product([Expr::Num(-1.0), self])
    }
}

impl AddAssign for Expr {
    fn add_assign(&mut self, rhs: Expr) {
        let lhs = std::mem::replace(self, Expr::Num(0.0));
        *self = lhs + rhs;
    }
}

impl SubAssign for Expr {
    fn sub_assign(&mut self, rhs: Expr) {
        let lhs = std::mem::replace(self, Expr::Num(0.0));
        *self = lhs - rhs;
    }
}

impl MulAssign for Expr {
    fn mul_assign(&mut self, rhs: Expr) {
        let lhs = std::mem::replace(self, Expr::Num(0.0));
        *self = lhs * rhs;
    }
}

impl Zero for Expr {
    fn zero() -> Self {
        Expr::Num(0.0)
    }

    fn is_zero(&self) -> bool {
        matches!(self, Expr::Num(v) if *v == 0.0)
    }
}

impl One for Expr {
    fn one() -> Self {
        Expr::Num(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn y() -> Expr {
        Expr::symbol("y")
    }

    #[test]
    fn test_folding_constructors() {
        assert_eq!(Expr::from(2.0) + Expr::from(3.0), Expr::Num(5.0));
        assert_eq!(x() + Expr::zero(), x());
        assert_eq!(x() * Expr::one(), x());
        assert_eq!(x() * Expr::zero(), Expr::zero());
        assert_eq!(x() - x(), Expr::Add(vec![x(), Expr::Mul(vec![Expr::Num(-1.0), x()])]));
        assert_eq!((x() + y()) + x(), Expr::Add(vec![x(), y(), x()]));
        assert_eq!(Expr::from(2.0) * (Expr::from(3.0) * x()), Expr::Mul(vec![Expr::Num(6.0), x()]));
    }

    #[test]
    fn test_trigonometry_of_literals_is_evaluated() {
        assert_eq!(Expr::from(0.0).cos(), Expr::one());
        assert_eq!(Expr::from(0.0).sin(), Expr::zero());
        assert!(matches!(x().sin(), Expr::Sin(_)));
    }

    #[test]
    fn test_display() {
        let e = Expr::from(2.0) * x() - y().sin() + Expr::from(1.5);
        assert_eq!(e.to_string(), "1.5 + 2*x - sin(y)");
        let p = (x() + y()).pow(2);
        assert_eq!(p.to_string(), "(x + y)^2");
        assert_eq!((-x()).to_string(), "-x");
        assert_eq!(Expr::symbol("q[0]").cos().to_string(), "cos(q[0])");
    }

    #[test]
    fn test_diff() {
        // d/dx (x * sin(x)) = sin(x) + x * cos(x)
        let e = x() * x().sin();
        let bindings: Bindings = [("x".to_string(), 0.7)].into_iter().collect();
        let d = e.diff("x").evaluate(&bindings).unwrap();
        assert!((d - (0.7f64.sin() + 0.7 * 0.7f64.cos())).abs() < 1e-12);

        // d/dx cos(x + y) = -sin(x + y)
        let c = (x() + y()).cos().diff("x");
        assert_eq!(c, Expr::Mul(vec![Expr::Num(-1.0), (x() + y()).sin()]));

        assert_eq!(x().pow(3).diff("x"), Expr::Mul(vec![Expr::Num(3.0), x().pow(2)]));
        assert_eq!(y().diff("x"), Expr::zero());
    }

    #[test]
    fn test_diff_of_zero_power() {
        // Built directly, bypassing the folding of `pow`
        let e = Expr::Pow(Box::new(x()), 0);
        assert_eq!(e.diff("x"), Expr::zero());
        let bindings: Bindings = [("x".to_string(), 5.0)].into_iter().collect();
        assert_eq!(e.evaluate(&bindings), Ok(1.0));
    }

    #[test]
    fn test_huge_exponent_stays_positive() {
        let e = Expr::Pow(Box::new(x()), u32::MAX);
        let bindings: Bindings = [("x".to_string(), 2.0)].into_iter().collect();
        assert_eq!(e.evaluate(&bindings), Ok(f64::INFINITY));
        assert_eq!(Expr::from(0.5).pow(u32::MAX), Expr::Num(0.0));
        assert_eq!(natural_power(1.0, u32::MAX), 1.0);
    }

    #[test]
    fn test_diff_by_requires_symbol() {
        let e = x() * y();
        assert_eq!(e.diff_by(&y()).unwrap(), x());
        assert!(matches!(e.diff_by(&(x() + y())), Err(KinematicsError::NotASymbol(_))));
    }

    #[test]
    fn test_round_floats() {
        let noise = FRAC_PI_2.cos(); // 6.123233995736766e-17
        let e = Expr::from(noise) * x() + Expr::from(0.123456789) * y();
        let rounded = e.round_floats(ROUNDING_DIGITS);
        assert_eq!(rounded, Expr::Mul(vec![Expr::Num(0.12345679), y()]));
    }

    #[test]
    fn test_round_floats_is_idempotent() {
        let e = Expr::from(0.7) * (Expr::from(0.3) + Expr::from(1e-10) * x()) * y()
            + Expr::from(1.0 / 3.0).sin() * x().cos()
            + Expr::from(2.0f64.sqrt()) * (Expr::from(0.1) + x()).pow(2);
        let once = e.round_floats(ROUNDING_DIGITS);
        let twice = once.round_floats(ROUNDING_DIGITS);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123456784, 8), 0.12345678);
        assert_eq!(round_to(-6.123233995736766e-17, 8), 0.0);
        assert_eq!(round_to(1e300, 8), 1e300);
        let r = round_to(1234.567890123, 8);
        assert_eq!(round_to(r, 8), r);
    }

    #[test]
    fn test_subs_and_evaluate() {
        let e = x().cos() * y() + Expr::from(2.0);
        let s = e.subs("x", &Expr::zero());
        assert_eq!(s, y() + Expr::from(2.0));
        let empty = Bindings::new();
        assert_eq!(s.evaluate(&empty), Err(KinematicsError::UnboundSymbol("y".to_string())));
    }

    #[test]
    fn test_free_symbols() {
        let e = Expr::symbol("a") * (Expr::symbol("theta") + Expr::symbol("q[0]")).cos();
        let symbols: Vec<String> = e.free_symbols().into_iter().collect();
        assert_eq!(symbols, vec!["a", "q[0]", "theta"]);
    }
}
