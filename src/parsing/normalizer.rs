//! # Notation Normalizer
//!
//! Rewrites loose calculus notation into strict notation by making implicit
//! multiplication explicit: `2x` becomes `2*x`, `(x+1)(x-1)` becomes
//! `(x+1)*(x-1)`, `2sin(x)` becomes `2*sin(x)`.
//!
//! The rewrite is span based. The input is tokenized with byte offsets and a
//! `*` is inserted only where two tokens touch; whitespace between tokens
//! blocks insertion. Before inserting, the boundaries that belong to operator
//! notation are marked as protected so the rewrite never corrupts them:
//!
//! - derivative heads `d/dx`, `d^2/dx^2`, `∂/∂x` and the `²` shorthand,
//! - the boundary right after a `lim(...)` point group,
//! - the boundary right after an integral bound group `∫(a,b)`,
//! - trailing differentials `dx` in inputs that contain `∫`.
//!
//! Unknown multi-letter names in front of `(` are deliberately left alone;
//! the tree builder reports them as unknown functions.

use crate::solver::SolverError;
use crate::symbolic::parse_expr::KNOWN_FUNCTIONS;
use crate::symbolic::utils::{find_matching_paren, find_top_level_comma, parens_balanced};
use itertools::Itertools;
use log::debug;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static DERIVATIVE_HEAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:d|∂)(?:\^\d+|²)?/(?:d|∂)[a-zA-Z](?:\^\d+|²)?")
        .unwrap()
});
static LIM_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"lim\s*\(").unwrap());
static DIFFERENTIAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"d[a-zA-Z]").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Number,
    Ident,
    Func,
    Open,
    Close,
    Other,
}

#[derive(Debug, Clone, Copy)]
struct Token {
    kind: TokenKind,
    start: usize,
    end: usize,
}

impl Token {
    fn is_single_char(&self) -> bool {
        self.end - self.start == 1
    }
}

/// Byte positions where inserting a `*` would corrupt operator notation.
fn protected_positions(input: &str) -> HashSet<usize> {
    let mut protected = HashSet::new();

    for m in DERIVATIVE_HEAD_RE.find_iter(input) {
        // every boundary inside the head, plus the boundary right after it
        for p in (m.start() + 1)..=m.end() {
            protected.insert(p);
        }
    }

    for m in LIM_OPEN_RE.find_iter(input) {
        if let Some(close) = find_matching_paren(input, m.end() - 1) {
            protected.insert(close + ')'.len_utf8());
        }
    }

    // integral bound groups: ∫(a,b) directly after the integral sign
    let mut rest = input;
    let mut base = 0;
    while let Some(rel) = rest.find('∫') {
        let sign_end = base + rel + '∫'.len_utf8();
        let after = &input[sign_end..];
        let skipped = after.len() - after.trim_start().len();
        let open = sign_end + skipped;
        if input[open..].starts_with('(') {
            if let Some(close) = find_matching_paren(input, open) {
                if find_top_level_comma(&input[open + 1..close]).is_some() {
                    protected.insert(close + 1);
                }
            }
        }
        base = sign_end;
        rest = &input[base..];
    }

    if input.contains('∫') {
        for m in DIFFERENTIAL_RE.find_iter(input) {
            let before_ok = input[..m.start()]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric());
            let after_ok = input[m.end()..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric());
            if before_ok && after_ok {
                for p in m.start()..=m.end() {
                    protected.insert(p);
                }
            }
        }
    }

    protected
}

fn tokenize(input: &str) -> Vec<Token> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let (start, c) = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c.is_ascii_digit() || c == '.' {
            let mut j = i + 1;
            while j < chars.len() && (chars[j].1.is_ascii_digit() || chars[j].1 == '.') {
                j += 1;
            }
            let end = if j < chars.len() { chars[j].0 } else { input.len() };
            tokens.push(Token {
                kind: TokenKind::Number,
                start,
                end,
            });
            i = j;
            continue;
        }
        if c.is_ascii_alphabetic() {
            let mut j = i + 1;
            while j < chars.len() && chars[j].1.is_ascii_alphabetic() {
                j += 1;
            }
            let end = if j < chars.len() { chars[j].0 } else { input.len() };
            let word = &input[start..end];
            let followed_by_paren = j < chars.len() && chars[j].0 == end && chars[j].1 == '(';
            if word == "lim" {
                tokens.push(Token {
                    kind: TokenKind::Func,
                    start,
                    end,
                });
            } else if word == "oo" || word == "pi" {
                // named constants behave like numbers for insertion purposes
                tokens.push(Token {
                    kind: TokenKind::Number,
                    start,
                    end,
                });
            } else if KNOWN_FUNCTIONS.contains(&word) {
                tokens.push(Token {
                    kind: TokenKind::Func,
                    start,
                    end,
                });
            } else if word.len() > 1 && followed_by_paren {
                // an unknown multi-letter name in call position stays whole
                // and surfaces later as an unknown function
                tokens.push(Token {
                    kind: TokenKind::Ident,
                    start,
                    end,
                });
            } else {
                // loose notation: a run of letters is a product of variables
                for k in i..j {
                    let s = chars[k].0;
                    tokens.push(Token {
                        kind: TokenKind::Ident,
                        start: s,
                        end: s + 1,
                    });
                }
            }
            i = j;
            continue;
        }
        let kind = match c {
            '(' => TokenKind::Open,
            ')' => TokenKind::Close,
            _ => TokenKind::Other,
        };
        tokens.push(Token {
            kind,
            start,
            end: start + c.len_utf8(),
        });
        i += 1;
    }
    tokens
}

fn needs_star(a: &Token, b: &Token) -> bool {
    use TokenKind::*;
    match (a.kind, b.kind) {
        (Number, Ident | Func | Open | Number) => true,
        (Ident, Open) => a.is_single_char(),
        (Close, Ident | Number | Open | Func) => true,
        (Ident, Ident | Func) => true,
        _ => false,
    }
}

/// Turns loose notation into strict notation. Fails on unbalanced
/// parentheses; everything else passes through for the later stages to
/// judge.
pub fn normalize(input: &str) -> Result<String, SolverError> {
    if !parens_balanced(input) {
        return Err(SolverError::malformed(format!(
            "unbalanced parentheses in '{}'",
            input.trim()
        )));
    }
    let protected = protected_positions(input);
    let tokens = tokenize(input);

    let mut inserts: Vec<usize> = Vec::new();
    for (a, b) in tokens.iter().tuple_windows() {
        if a.end != b.start || protected.contains(&b.start) {
            continue;
        }
        if needs_star(a, b) {
            inserts.push(b.start);
        }
    }

    let mut out = String::with_capacity(input.len() + inserts.len());
    let mut prev = 0;
    for pos in inserts {
        out.push_str(&input[prev..pos]);
        out.push('*');
        prev = pos;
    }
    out.push_str(&input[prev..]);
    if out != input {
        debug!("normalized '{}' into '{}'", input, out);
    }
    Ok(out)
}
