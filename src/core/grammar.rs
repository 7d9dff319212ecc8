// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Declarative PEG description of the statement grammar and its analyzer.
//!
//! The recursive-descent parser in [`crate::core::parser`] hand-implements
//! the statement grammar. This module keeps a declarative copy of the same
//! rules so that, before assembly begins, the grammar can be checked for
//! left recursion and non-progressing repetition. A failed analysis is an
//! internal logic error, not a parse error, and aborts the program.

use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    Statement,
    Label,
    Body,
    InstructionZeroOperand,
    InstructionOneOperand,
    MnemonicSuffix,
    PseudoZeroOperand,
    PseudoVariableOperand,
    PseudoAscii,
    PseudoDef,
    PseudoLink,
    ExpressionList,
    Expression,
    Term,
    Factor,
    UnaryOperator,
    Constant,
    StringConstant,
    Symbol,
    Comment,
}

/// A parsing expression. `Terminal` stands for any atom that consumes at
/// least one input byte (a literal, a character class, `plus` of either).
#[derive(Debug, Clone)]
pub enum Peg {
    Terminal,
    Empty,
    Rule(Rule),
    Seq(Vec<Peg>),
    Choice(Vec<Peg>),
    Star(Box<Peg>),
    Opt(Box<Peg>),
}

fn seq(items: Vec<Peg>) -> Peg {
    Peg::Seq(items)
}

fn choice(items: Vec<Peg>) -> Peg {
    Peg::Choice(items)
}

fn star(item: Peg) -> Peg {
    Peg::Star(Box::new(item))
}

fn opt(item: Peg) -> Peg {
    Peg::Opt(Box::new(item))
}

fn ws() -> Peg {
    Peg::Terminal
}

fn opt_ws() -> Peg {
    opt(Peg::Terminal)
}

/// The statement grammar of the dialect, one entry per rule.
pub fn rules() -> Vec<(Rule, Peg)> {
    use Peg::Terminal;
    use Rule::*;

    vec![
        (
            Statement,
            seq(vec![
                opt_ws(),
                Peg::Rule(Label),
                opt_ws(),
                Peg::Rule(Body),
                opt_ws(),
                opt(Peg::Rule(Comment)),
            ]),
        ),
        (
            Label,
            choice(vec![
                seq(vec![Peg::Rule(Symbol), Terminal]),
                Peg::Empty,
            ]),
        ),
        (
            Body,
            choice(vec![
                Peg::Rule(InstructionZeroOperand),
                Peg::Rule(InstructionOneOperand),
                Peg::Rule(PseudoZeroOperand),
                Peg::Rule(PseudoVariableOperand),
                Peg::Rule(PseudoAscii),
                Peg::Rule(PseudoDef),
                Peg::Rule(PseudoLink),
                Peg::Empty,
            ]),
        ),
        (InstructionZeroOperand, Terminal),
        (
            InstructionOneOperand,
            seq(vec![
                Terminal,
                opt(Peg::Rule(MnemonicSuffix)),
                ws(),
                Peg::Rule(Expression),
            ]),
        ),
        (MnemonicSuffix, Terminal),
        (PseudoZeroOperand, Terminal),
        (
            PseudoVariableOperand,
            seq(vec![Terminal, opt(seq(vec![ws(), Peg::Rule(ExpressionList)]))]),
        ),
        (
            PseudoAscii,
            seq(vec![Terminal, ws(), Peg::Rule(StringConstant)]),
        ),
        (
            PseudoDef,
            seq(vec![
                Terminal,
                ws(),
                Peg::Rule(Symbol),
                opt_ws(),
                Terminal,
                opt_ws(),
                Peg::Rule(Expression),
            ]),
        ),
        (PseudoLink, seq(vec![Terminal, ws(), Peg::Rule(Symbol)])),
        (
            ExpressionList,
            seq(vec![
                Peg::Rule(Expression),
                star(seq(vec![opt_ws(), Terminal, opt_ws(), Peg::Rule(Expression)])),
            ]),
        ),
        (
            Expression,
            seq(vec![
                Peg::Rule(Term),
                star(seq(vec![Terminal, Peg::Rule(Term)])),
            ]),
        ),
        (
            Term,
            seq(vec![
                Peg::Rule(Factor),
                star(seq(vec![Terminal, Peg::Rule(Factor)])),
            ]),
        ),
        (
            Factor,
            choice(vec![
                Peg::Rule(Constant),
                Peg::Rule(Symbol),
                seq(vec![Peg::Rule(UnaryOperator), Peg::Rule(Symbol)]),
                seq(vec![Terminal, Peg::Rule(Expression), Terminal]),
            ]),
        ),
        (UnaryOperator, Terminal),
        (Constant, Terminal),
        (StringConstant, Terminal),
        (Symbol, Terminal),
        (Comment, Terminal),
    ]
}

fn expr_nullable(expr: &Peg, nullable: &BTreeMap<Rule, bool>) -> bool {
    match expr {
        Peg::Terminal => false,
        Peg::Empty => true,
        Peg::Rule(rule) => nullable.get(rule).copied().unwrap_or(false),
        Peg::Seq(items) => items.iter().all(|item| expr_nullable(item, nullable)),
        Peg::Choice(items) => items.iter().any(|item| expr_nullable(item, nullable)),
        Peg::Star(_) | Peg::Opt(_) => true,
    }
}

fn nullable_fixpoint(rules: &[(Rule, Peg)]) -> BTreeMap<Rule, bool> {
    let mut nullable: BTreeMap<Rule, bool> = rules.iter().map(|(rule, _)| (*rule, false)).collect();
    loop {
        let mut changed = false;
        for (rule, body) in rules {
            let value = expr_nullable(body, &nullable);
            if value && !nullable[rule] {
                nullable.insert(*rule, true);
                changed = true;
            }
        }
        if !changed {
            return nullable;
        }
    }
}

/// Collect the rules an expression may invoke before any input is consumed.
fn first_rules(expr: &Peg, nullable: &BTreeMap<Rule, bool>, out: &mut BTreeSet<Rule>) {
    match expr {
        Peg::Terminal | Peg::Empty => {}
        Peg::Rule(rule) => {
            out.insert(*rule);
        }
        Peg::Seq(items) => {
            for item in items {
                first_rules(item, nullable, out);
                if !expr_nullable(item, nullable) {
                    break;
                }
            }
        }
        Peg::Choice(items) => {
            for item in items {
                first_rules(item, nullable, out);
            }
        }
        Peg::Star(inner) | Peg::Opt(inner) => first_rules(inner, nullable, out),
    }
}

fn collect_non_progress(rule: Rule, expr: &Peg, nullable: &BTreeMap<Rule, bool>, issues: &mut Vec<String>) {
    match expr {
        Peg::Terminal | Peg::Empty | Peg::Rule(_) => {}
        Peg::Seq(items) | Peg::Choice(items) => {
            for item in items {
                collect_non_progress(rule, item, nullable, issues);
            }
        }
        Peg::Star(inner) => {
            if expr_nullable(inner, nullable) {
                issues.push(format!(
                    "repetition of a possibly-empty expression in rule {rule:?}"
                ));
            }
            collect_non_progress(rule, inner, nullable, issues);
        }
        Peg::Opt(inner) => collect_non_progress(rule, inner, nullable, issues),
    }
}

fn reaches(
    from: Rule,
    target: Rule,
    edges: &BTreeMap<Rule, BTreeSet<Rule>>,
    visited: &mut BTreeSet<Rule>,
) -> bool {
    if !visited.insert(from) {
        return false;
    }
    if let Some(successors) = edges.get(&from) {
        for next in successors {
            if *next == target || reaches(*next, target, edges, visited) {
                return true;
            }
        }
    }
    false
}

/// Analyze a rule set; returns one message per problem found.
pub fn analyze_rules(rules: &[(Rule, Peg)]) -> Vec<String> {
    let nullable = nullable_fixpoint(rules);
    let mut issues = Vec::new();

    for (rule, body) in rules {
        collect_non_progress(*rule, body, &nullable, &mut issues);
    }

    let mut edges: BTreeMap<Rule, BTreeSet<Rule>> = BTreeMap::new();
    for (rule, body) in rules {
        let mut first = BTreeSet::new();
        first_rules(body, &nullable, &mut first);
        edges.insert(*rule, first);
    }
    for (rule, _) in rules {
        let mut visited = BTreeSet::new();
        if reaches(*rule, *rule, &edges, &mut visited) {
            issues.push(format!("left recursion detected for rule {rule:?}"));
        }
    }

    issues
}

/// Analyze the statement grammar; panics on any defect.
pub fn check_grammar() {
    let issues = analyze_rules(&rules());
    if !issues.is_empty() {
        panic!(
            "internal error: grammar analysis failed, count {}: {}",
            issues.len(),
            issues.join("; ")
        );
    }
}
