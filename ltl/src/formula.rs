use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, satisfy, space0};
use nom::combinator::{map, opt, recognize};
use nom::multi::many1;
use nom::sequence::{delimited, preceded, terminated};
use nom::IResult;

use crate::error::Error;

/// An LTL formula over a fixed closed set of connectives.
///
/// Before normalization all ten variants may appear; after
/// [`Expr::normalize`] only `True`, `Var`, `Neg`, `And`, `Next` and
/// `Until` remain.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Expr {
    True,
    Var(String),
    Neg(Box<Expr>),
    Next(Box<Expr>),
    Always(Box<Expr>),
    Eventually(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Impl(Box<Expr>, Box<Expr>),
    Until(Box<Expr>, Box<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::True => write!(f, "true"),
            Expr::Var(name) => write!(f, "{name}"),
            Expr::Neg(a) => write!(f, "!{a}"),
            Expr::Next(a) => write!(f, "X {a}"),
            Expr::Always(a) => write!(f, "G {a}"),
            Expr::Eventually(a) => write!(f, "F {a}"),
            Expr::And(a, b) => write!(f, "({a} /\\ {b})"),
            Expr::Or(a, b) => write!(f, "({a} \\/ {b})"),
            Expr::Impl(a, b) => write!(f, "({a} -> {b})"),
            Expr::Until(a, b) => write!(f, "({a} U {b})"),
        }
    }
}

impl Expr {
    /// Canonical negation: cancels a leading `Neg` instead of wrapping
    /// it in a second one.
    pub fn negate(&self) -> Expr {
        match self {
            Expr::Neg(inner) => (**inner).clone(),
            other => Expr::Neg(Box::new(other.clone())),
        }
    }

    /// Rewrites this formula into the restricted connective set
    /// `{True, Var, Neg, And, Next, Until}`, recursing bottom-up.
    pub fn normalize(&self) -> Expr {
        match self {
            Expr::True => Expr::True,
            Expr::Var(name) => Expr::Var(name.clone()),
            Expr::Neg(a) => {
                let a = a.normalize();
                if let Expr::Neg(inner) = a {
                    *inner
                } else {
                    Expr::Neg(Box::new(a))
                }
            }
            Expr::Next(a) => Expr::Next(Box::new(a.normalize())),
            Expr::And(a, b) => Expr::And(Box::new(a.normalize()), Box::new(b.normalize())),
            Expr::Until(a, b) => Expr::Until(Box::new(a.normalize()), Box::new(b.normalize())),
            Expr::Always(a) => {
                let rewritten = Expr::Neg(Box::new(Expr::Eventually(Box::new(Expr::Neg(
                    a.clone(),
                )))));
                rewritten.normalize()
            }
            Expr::Eventually(a) => Expr::Until(Box::new(Expr::True), Box::new(a.normalize())),
            Expr::Or(a, b) => {
                let rewritten = Expr::Neg(Box::new(Expr::And(
                    Box::new(Expr::Neg(a.clone())),
                    Box::new(Expr::Neg(b.clone())),
                )));
                rewritten.normalize()
            }
            Expr::Impl(a, b) => {
                let rewritten = Expr::Or(Box::new(Expr::Neg(a.clone())), b.clone());
                rewritten.normalize()
            }
        }
    }

    /// All atomic proposition names occurring anywhere in this formula.
    pub fn alphabet(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        fn visit(e: &Expr, out: &mut BTreeSet<String>) {
            match e {
                Expr::True => {}
                Expr::Var(name) => {
                    out.insert(name.clone());
                }
                Expr::Neg(a) | Expr::Next(a) | Expr::Always(a) | Expr::Eventually(a) => {
                    visit(a, out)
                }
                Expr::And(a, b) | Expr::Or(a, b) | Expr::Impl(a, b) | Expr::Until(a, b) => {
                    visit(a, out);
                    visit(b, out);
                }
            }
        }
        visit(self, &mut out);
        out
    }
}

/// The closure of a normalized formula: an ordered set of sub-formulas
/// paired with their canonical negations.
#[derive(Debug, Clone)]
pub struct Closure {
    pub elements: Vec<Expr>,
    neg_of: HashMap<Expr, Expr>,
}

impl Closure {
    pub fn build(root: &Expr) -> Closure {
        let mut elements = Vec::new();
        let mut seen = HashSet::new();
        let mut neg_of = HashMap::new();
        Self::visit(root, &mut elements, &mut seen, &mut neg_of);
        Closure { elements, neg_of }
    }

    fn visit(
        e: &Expr,
        elements: &mut Vec<Expr>,
        seen: &mut HashSet<Expr>,
        neg_of: &mut HashMap<Expr, Expr>,
    ) {
        if seen.contains(e) {
            return;
        }
        let neg = e.negate();
        seen.insert(e.clone());
        seen.insert(neg.clone());
        elements.push(e.clone());
        elements.push(neg.clone());
        neg_of.insert(e.clone(), neg.clone());
        neg_of.insert(neg.clone(), e.clone());

        match e {
            Expr::True | Expr::Var(_) => {}
            Expr::Neg(a) | Expr::Next(a) | Expr::Always(a) | Expr::Eventually(a) => {
                Self::visit(a, elements, seen, neg_of)
            }
            Expr::And(a, b) | Expr::Or(a, b) | Expr::Impl(a, b) | Expr::Until(a, b) => {
                Self::visit(a, elements, seen, neg_of);
                Self::visit(b, elements, seen, neg_of);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The canonical negation of `e` within this closure.
    ///
    /// Panics if `e` is not a member of the closure: that is a contract
    /// violation by the caller, not a user-facing error.
    pub fn negation_of(&self, e: &Expr) -> &Expr {
        self.neg_of
            .get(e)
            .unwrap_or_else(|| panic!("formula '{e}' is not a member of its own closure"))
    }

    /// Enumerates every elementary set of this closure.
    ///
    /// Implemented as a backtracking search over the closure in index
    /// order: at each position either include the element (unless its
    /// negation was already included) or skip it, then filter complete
    /// assignments against the elementary-set invariants.
    pub fn elementary_sets(&self) -> Vec<BTreeSet<Expr>> {
        let mut results = Vec::new();
        let mut current = BTreeSet::new();
        self.backtrack(0, &mut current, &mut results);
        results
    }

    fn backtrack(&self, idx: usize, current: &mut BTreeSet<Expr>, results: &mut Vec<BTreeSet<Expr>>) {
        if idx == self.elements.len() {
            if self.is_elementary(current) {
                results.push(current.clone());
            }
            return;
        }
        let e = &self.elements[idx];
        let neg = self.negation_of(e);
        if !current.contains(neg) {
            current.insert(e.clone());
            self.backtrack(idx + 1, current, results);
            current.remove(e);
        }
        self.backtrack(idx + 1, current, results);
    }

    fn is_elementary(&self, set: &BTreeSet<Expr>) -> bool {
        for e in &self.elements {
            let neg = self.negation_of(e);
            if set.contains(e) == set.contains(neg) {
                return false;
            }
        }
        for e in &self.elements {
            match e {
                Expr::And(a, b) => {
                    let and_in = set.contains(e);
                    let both = set.contains(a.as_ref()) && set.contains(b.as_ref());
                    if and_in != both {
                        return false;
                    }
                }
                Expr::True => {
                    if !set.contains(e) {
                        return false;
                    }
                }
                Expr::Until(a, b) => {
                    let until_in = set.contains(e);
                    if set.contains(b.as_ref()) && !until_in {
                        return false;
                    }
                    if until_in && !(set.contains(a.as_ref()) || set.contains(b.as_ref())) {
                        return false;
                    }
                }
                _ => {}
            }
        }
        true
    }
}

/// The set of atomic propositions present (positively) in an elementary
/// set, used to label the GNBA state built from it.
pub fn ap_projection(set: &BTreeSet<Expr>) -> BTreeSet<String> {
    set.iter()
        .filter_map(|e| match e {
            Expr::Var(name) => Some(name.clone()),
            _ => None,
        })
        .collect()
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Formula {
    pub root: Expr,
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

impl Formula {
    pub fn parse(input: &str) -> Result<Formula, Error> {
        let trimmed = input.trim();
        match expr(trimmed) {
            Ok((rest, root)) if rest.trim().is_empty() => {
                log::debug!("parsed formula '{root}'");
                Ok(Formula { root })
            }
            Ok((rest, root)) => Err(Error::Leftover(root.to_string(), rest.to_string())),
            Err(e) if e.is_incomplete() => Err(Error::Incomplete),
            Err(_) => Err(Error::Parsing(input.to_string())),
        }
    }

    pub fn negate(&self) -> Expr {
        self.root.negate()
    }

    pub fn normalize(&self) -> Expr {
        self.root.normalize()
    }

    pub fn closure(&self) -> Closure {
        Closure::build(&self.root)
    }
}

#[derive(Clone, Copy, Debug)]
enum BinOp {
    And,
    Or,
    Impl,
    Until,
}

fn apply_op(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    match op {
        BinOp::And => Expr::And(Box::new(lhs), Box::new(rhs)),
        BinOp::Or => Expr::Or(Box::new(lhs), Box::new(rhs)),
        BinOp::Impl => Expr::Impl(Box::new(lhs), Box::new(rhs)),
        BinOp::Until => Expr::Until(Box::new(lhs), Box::new(rhs)),
    }
}

fn parse_var(input: &str) -> IResult<&str, Expr> {
    map(
        recognize(many1(satisfy(|c: char| c.is_ascii_lowercase()))),
        |s: &str| Expr::Var(s.to_string()),
    )(input)
}

fn parse_neg(input: &str) -> IResult<&str, Expr> {
    map(preceded(char('!'), preceded(space0, expr)), |e| {
        Expr::Neg(Box::new(e))
    })(input)
}

fn parse_next(input: &str) -> IResult<&str, Expr> {
    map(preceded(char('X'), preceded(space0, expr)), |e| {
        Expr::Next(Box::new(e))
    })(input)
}

fn parse_always(input: &str) -> IResult<&str, Expr> {
    map(preceded(char('G'), preceded(space0, expr)), |e| {
        Expr::Always(Box::new(e))
    })(input)
}

fn parse_eventually(input: &str) -> IResult<&str, Expr> {
    map(preceded(char('F'), preceded(space0, expr)), |e| {
        Expr::Eventually(Box::new(e))
    })(input)
}

fn parse_paren(input: &str) -> IResult<&str, Expr> {
    delimited(char('('), delimited(space0, expr, space0), char(')'))(input)
}

fn parse_prefix(input: &str) -> IResult<&str, Expr> {
    alt((
        parse_neg,
        parse_next,
        parse_always,
        parse_eventually,
        parse_paren,
        parse_var,
    ))(input)
}

fn parse_infix_op(input: &str) -> IResult<&str, BinOp> {
    alt((
        map(tag("/\\"), |_| BinOp::And),
        map(tag("\\/"), |_| BinOp::Or),
        map(tag("->"), |_| BinOp::Impl),
        map(char('U'), |_| BinOp::Until),
    ))(input)
}

fn expr(input: &str) -> IResult<&str, Expr> {
    let (input, _) = space0(input)?;
    let (input, lhs) = parse_prefix(input)?;
    let (input, _) = space0(input)?;
    match opt(terminated(parse_infix_op, space0))(input)? {
        (input, Some(op)) => {
            let (input, rhs) = expr(input)?;
            Ok((input, apply_op(op, lhs, rhs)))
        }
        (input, None) => Ok((input, lhs)),
    }
}
