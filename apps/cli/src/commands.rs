//! Subcommand implementations
//!
//! Every command writes to a caller-supplied writer so it can be driven from
//! tests as well as from `main`.

use anyhow::Context;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use unitscalc::units::{MM_PER_INCH, PIXELS_PER_INCH, POINTS_PER_INCH};
use unitscalc::{ratios, tokenize, Calculator, Expression, Measurement, Unit};

#[derive(Debug, Serialize)]
struct EvalOutput<'a> {
    input: &'a str,
    expression: String,
    unit: Unit,
    amount: Decimal,
    result: String,
}

pub fn eval<W: Write>(
    calculator: &Calculator,
    input: &str,
    target: &str,
    json: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    let expression = calculator.analyze(input)?;
    let result = calculator.calculate(&expression, target)?;

    if json {
        let output = EvalOutput {
            input,
            expression: calculator.pretty_print(&expression),
            unit: result.unit,
            amount: result.amount,
            result: calculator.format_result(&result),
        };
        serde_json::to_writer_pretty(&mut *out, &output).context("Failed to encode result")?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", calculator.format_result(&result))?;
    }
    Ok(())
}

pub fn pretty<W: Write>(calculator: &Calculator, input: &str, out: &mut W) -> anyhow::Result<()> {
    let expression = calculator.analyze(input)?;
    writeln!(out, "{}", calculator.pretty_print(&expression))?;
    Ok(())
}

pub fn tokens<W: Write>(input: &str, out: &mut W) -> anyhow::Result<()> {
    for token in tokenize(input)? {
        writeln!(out, "{token}")?;
    }
    Ok(())
}

/// Base constants followed by the full ratio table.
pub fn units<W: Write>(calculator: &Calculator, out: &mut W) -> anyhow::Result<()> {
    let formatter = calculator.formatter();
    writeln!(
        out,
        "1in = {}mm = {}pt = {}px",
        formatter.format_decimal(&MM_PER_INCH),
        formatter.format_decimal(&POINTS_PER_INCH),
        formatter.format_decimal(&PIXELS_PER_INCH),
    )?;
    writeln!(out)?;

    write!(out, "{:>6}", "")?;
    for to in Unit::ALL {
        write!(out, "{:>12}", to.code())?;
    }
    writeln!(out)?;

    for from in Unit::ALL {
        write!(out, "{:>6}", from.code())?;
        for to in Unit::ALL {
            write!(out, "{:>12}", ratios().get(from, to).to_string())?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub input: Expression,
    pub output: Measurement,
}

/// Most recent calculations, newest first, bounded by `limit`.
#[derive(Debug)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    pub fn push(&mut self, input: Expression, output: Measurement) {
        self.entries.push_front(HistoryEntry { input, output });
        self.entries.truncate(self.limit);
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Line-oriented session: each line is evaluated, `:`-prefixed lines are
/// commands. Errors are reported and the session continues.
pub fn repl<R: BufRead, W: Write>(
    calculator: &Calculator,
    mut target: Unit,
    history_limit: usize,
    input: R,
    out: &mut W,
) -> anyhow::Result<()> {
    let mut history = History::new(history_limit);

    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix(':') {
            let (name, argument) = command
                .split_once(char::is_whitespace)
                .map(|(n, a)| (n, a.trim()))
                .unwrap_or((command, ""));
            match name {
                "quit" | "q" => break,
                "history" => {
                    for (i, entry) in history.iter().enumerate() {
                        writeln!(
                            out,
                            "{:>3}  {} = {}",
                            i + 1,
                            calculator.pretty_print(&entry.input),
                            calculator.format_result(&entry.output)
                        )?;
                    }
                }
                "to" => match argument.parse::<Unit>() {
                    Ok(unit) => {
                        target = unit;
                        writeln!(out, "target unit: {unit}")?;
                    }
                    Err(e) => writeln!(out, "error: {e}")?,
                },
                other => writeln!(out, "error: unknown command ':{other}'")?,
            }
            continue;
        }

        let evaluated = calculator.analyze(line).and_then(|expression| {
            calculator
                .calculate(&expression, target.code())
                .map(|result| (expression, result))
        });
        match evaluated {
            Ok((expression, result)) => {
                writeln!(
                    out,
                    "{} = {}",
                    calculator.pretty_print(&expression),
                    calculator.format_result(&result)
                )?;
                history.push(expression, result);
            }
            Err(e) => {
                tracing::debug!(error = %e, "evaluation failed");
                writeln!(out, "error: {e}")?;
            }
        }
    }

    tracing::debug!(entries = history.len(), "session finished");
    Ok(())
}
