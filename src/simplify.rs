//! Polynomial normal form of symbolic expressions.
//!
//! Every expression produced by the kinematic chain is a polynomial in symbols and in sines and
//! cosines of (linear) angle expressions. [`Expr::simplify`] expands such an expression into a
//! sum of monomials over these atoms and reduces every `sin(u)^2` to `1 - cos(u)^2`. As the
//! leading terms of the relations `sin(u)^2 + cos(u)^2 - 1` of different angles share no atoms,
//! this reduction yields a unique normal form, and any identity that holds because rotation
//! matrices are orthonormal simplifies to zero.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::expression::Expr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum AtomKind {
    Symbol,
    Cos,
    Sin,
}

/// Indivisible factor of a monomial. Ordered and compared by its canonical text only.
#[derive(Clone, Debug)]
struct Atom {
    kind: AtomKind,
    /// Symbol itself or the canonical trigonometric argument
    inner: Expr,
    key: String,
}

impl Atom {
    fn symbol(name: &str) -> Atom {
        Atom { kind: AtomKind::Symbol, inner: Expr::symbol(name), key: name.to_string() }
    }

    fn trig(kind: AtomKind, argument: Expr) -> Atom {
        let key = match kind {
            AtomKind::Sin => format!("sin({})", argument),
            _ => format!("cos({})", argument),
        };
        Atom { kind, inner: argument, key }
    }

    fn to_expr(&self) -> Expr {
        match self.kind {
            AtomKind::Symbol => self.inner.clone(),
            AtomKind::Sin => self.inner.sin(),
            AtomKind::Cos => self.inner.cos(),
        }
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Atom {}

impl PartialOrd for Atom {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Atom {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Product of atoms with positive exponents, sorted by atom.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
struct Monomial(Vec<(Atom, u32)>);

impl Monomial {
    fn of(atom: Atom) -> Monomial {
        Monomial(vec![(atom, 1)])
    }

    fn times(&self, other: &Monomial) -> Monomial {
        let mut merged: BTreeMap<Atom, u32> = self.0.iter().cloned().collect();
        for (atom, exponent) in &other.0 {
            *merged.entry(atom.clone()).or_insert(0) += exponent;
        }
        Monomial(merged.into_iter().collect())
    }

    /// Position of a sine with exponent 2 or more.
    fn reducible_sine(&self) -> Option<usize> {
        self.0.iter().position(|(atom, e)| atom.kind == AtomKind::Sin && *e >= 2)
    }

    fn with_exponent(&self, index: usize, exponent: u32) -> Monomial {
        let mut factors = self.0.clone();
        if exponent == 0 {
            factors.remove(index);
        } else {
            factors[index].1 = exponent;
        }
        Monomial(factors)
    }

    fn to_expr(&self, coefficient: f64) -> Expr {
        Expr::product(
            std::iter::once(Expr::Num(coefficient))
                .chain(self.0.iter().map(|(atom, e)| atom.to_expr().pow(*e))),
        )
    }
}

#[derive(Clone, Debug, Default)]
struct Polynomial {
    terms: BTreeMap<Monomial, f64>,
}

impl Polynomial {
    fn constant(value: f64) -> Polynomial {
        let mut p = Polynomial::default();
        p.add_term(Monomial::default(), value);
        p
    }

    fn atom(atom: Atom) -> Polynomial {
        let mut p = Polynomial::default();
        p.add_term(Monomial::of(atom), 1.0);
        p
    }

    fn add_term(&mut self, monomial: Monomial, coefficient: f64) {
        if coefficient == 0.0 {
            return;
        }
        match self.terms.entry(monomial) {
            Entry::Occupied(mut existing) => {
                *existing.get_mut() += coefficient;
                if *existing.get() == 0.0 {
                    existing.remove();
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(coefficient);
            }
        }
    }

    fn plus(mut self, other: &Polynomial) -> Polynomial {
        for (m, c) in &other.terms {
            self.add_term(m.clone(), *c);
        }
        self
    }

    fn times(&self, other: &Polynomial) -> Polynomial {
        let mut product = Polynomial::default();
        for (ma, ca) in &self.terms {
            for (mb, cb) in &other.terms {
                product.add_term(ma.times(mb), ca * cb);
            }
        }
        product
    }

    fn from_expr(expr: &Expr) -> Polynomial {
        match expr {
            Expr::Num(v) => Polynomial::constant(*v),
            Expr::Sym(name) => Polynomial::atom(Atom::symbol(name)),
            Expr::Add(terms) => terms
                .iter()
                .fold(Polynomial::default(), |sum, t| sum.plus(&Polynomial::from_expr(t))),
            Expr::Mul(factors) => factors
                .iter()
                .fold(Polynomial::constant(1.0), |p, f| p.times(&Polynomial::from_expr(f))),
            Expr::Pow(base, n) => {
                let base = Polynomial::from_expr(base);
                (0..*n).fold(Polynomial::constant(1.0), |p, _| p.times(&base))
            }
            Expr::Sin(arg) => Polynomial::trig(AtomKind::Sin, arg),
            Expr::Cos(arg) => Polynomial::trig(AtomKind::Cos, arg),
        }
    }

    fn trig(kind: AtomKind, argument: &Expr) -> Polynomial {
        let argument = argument.simplify();
        match (kind, argument.as_number()) {
            (AtomKind::Sin, Some(v)) => Polynomial::constant(v.sin()),
            (_, Some(v)) => Polynomial::constant(v.cos()),
            _ => Polynomial::atom(Atom::trig(kind, argument)),
        }
    }

    /// Replaces `sin(u)^e` (e >= 2) by `sin(u)^(e-2) * (1 - cos(u)^2)` until no such power is left.
    fn reduce_pythagorean(&self) -> Polynomial {
        let mut reduced = Polynomial::default();
        let mut pending: Vec<(Monomial, f64)> =
            self.terms.iter().map(|(m, c)| (m.clone(), *c)).collect();
        while let Some((monomial, coefficient)) = pending.pop() {
            let Some(index) = monomial.reducible_sine() else {
                reduced.add_term(monomial, coefficient);
                continue;
            };
            let (sine, exponent) = monomial.0[index].clone();
            let lowered = monomial.with_exponent(index, exponent - 2);
            let cosine = Monomial(vec![(Atom::trig(AtomKind::Cos, sine.inner), 2)]);
            pending.push((lowered.times(&cosine), -coefficient));
            pending.push((lowered, coefficient));
        }
        reduced
    }

    fn to_expr(&self) -> Expr {
        Expr::sum(self.terms.iter().map(|(m, c)| m.to_expr(*c)))
    }
}

impl Expr {
    /// Expands into the normal form described in the module documentation. Terms whose
    /// coefficients cancel exactly disappear; floating point residue of inexact literals
    /// may remain, see [`Expr::is_zero_within`].
    pub fn simplify(&self) -> Expr {
        Polynomial::from_expr(self).reduce_pythagorean().to_expr()
    }

    /// True if the simplified expression is zero up to coefficients not exceeding `tolerance`.
    pub fn is_zero_within(&self, tolerance: f64) -> bool {
        Polynomial::from_expr(self)
            .reduce_pythagorean()
            .terms
            .values()
            .all(|c| c.abs() <= tolerance)
    }

    /// Symbolic equality: the difference simplifies to zero up to `tolerance` in coefficients.
    pub fn approx_eq(&self, other: &Expr, tolerance: f64) -> bool {
        (self.clone() - other.clone()).is_zero_within(tolerance)
    }
}
