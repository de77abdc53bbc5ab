//! Bundled sample assignment
//!
//! A handful of small exercises with a reference solution and a student
//! submission. Some submissions are deliberately wrong so that every kind
//! of report shows up when the suite runs.

use crate::capture::{Callable, Interrupt, Io};
use crate::executor::Suite;
use crate::models::Args;
use crate::units::DiffTest;

mod reference {
    use super::*;

    pub fn mean(_: &mut Io<'_>, args: &Args) -> Result<i64, Interrupt> {
        let values: Vec<i64> = args.get(0)?;
        let total: i64 = values.iter().sum();
        Ok(total / values.len() as i64)
    }

    pub fn fizzbuzz(io: &mut Io<'_>, args: &Args) -> Result<(), Interrupt> {
        let limit: u32 = args.get(0)?;
        for n in 1..=limit {
            match (n % 3, n % 5) {
                (0, 0) => io.println("FizzBuzz"),
                (0, _) => io.println("Fizz"),
                (_, 0) => io.println("Buzz"),
                _ => io.println(n),
            }
        }
        Ok(())
    }

    pub fn greet(io: &mut Io<'_>, _: &Args) -> Result<String, Interrupt> {
        let name = io.input("What is your name? ")?;
        io.println(format!("Hello, {name}!"));
        Ok(name)
    }

    pub fn word_count(_: &mut Io<'_>, args: &Args) -> Result<usize, Interrupt> {
        let text: String = args.get(0)?;
        Ok(text.split_whitespace().count())
    }

    pub fn parse_age(_: &mut Io<'_>, args: &Args) -> Result<u32, Interrupt> {
        let text: String = args.get(0)?;
        Ok(text.trim().parse()?)
    }

    pub fn total_of_lines(io: &mut Io<'_>, _: &Args) -> Result<i64, Interrupt> {
        let count: usize = io.input("How many numbers? ")?.trim().parse()?;
        let mut total = 0;
        for _ in 0..count {
            total += io.input("> ")?.trim().parse::<i64>()?;
        }
        io.println(format!("Total: {total}"));
        Ok(total)
    }

    pub fn checked_ratio(_: &mut Io<'_>, args: &Args) -> Result<i64, Interrupt> {
        let a: i64 = args.get(0)?;
        let b: i64 = args.get(1)?;
        if b == 0 {
            return Ok(0);
        }
        Ok(a / b)
    }
}

mod candidate {
    use super::*;

    pub fn mean(_: &mut Io<'_>, args: &Args) -> Result<i64, Interrupt> {
        let values: Vec<i64> = args.get(0)?;
        let mut total = 0;
        for v in &values {
            total += v;
        }
        Ok(total / values.len() as i64)
    }

    pub fn fizzbuzz(io: &mut Io<'_>, args: &Args) -> Result<(), Interrupt> {
        let limit: u32 = args.get(0)?;
        for n in 1..=limit {
            if n % 3 == 0 {
                io.println("Fizz");
            } else if n % 5 == 0 {
                io.println("Buzz");
            } else if n % 15 == 0 {
                io.println("FizzBuzz");
            } else {
                io.println(n);
            }
        }
        Ok(())
    }

    pub fn greet(io: &mut Io<'_>, _: &Args) -> Result<String, Interrupt> {
        let name = io.input("What is your name? ")?;
        io.println(format!("Hello, {name}!"));
        Ok(name)
    }

    pub fn word_count(_: &mut Io<'_>, args: &Args) -> Result<usize, Interrupt> {
        let text: String = args.get(0)?;
        Ok(text.split(' ').count())
    }

    pub fn parse_age(io: &mut Io<'_>, args: &Args) -> Result<u32, Interrupt> {
        let text: String = args.get(0)?;
        io.eprintln(format!("debug: parsing {text:?}"));
        Ok(text.trim().parse()?)
    }

    pub fn total_of_lines(io: &mut Io<'_>, _: &Args) -> Result<i64, Interrupt> {
        let count: usize = io.input("How many numbers? ")?.trim().parse()?;
        let mut total = 0;
        for _ in 0..count {
            let line = io.input("> ")?;
            match line.trim().parse::<i64>() {
                Ok(n) => total += n,
                Err(_) => {
                    io.println("Not a number, giving up.");
                    return Err(io.exit(1));
                }
            }
        }
        io.println(format!("Total: {total}"));
        Ok(total)
    }

    pub fn checked_ratio(_: &mut Io<'_>, args: &Args) -> Result<i64, Interrupt> {
        let a: i64 = args.get(0)?;
        let b: i64 = args.get(1)?;
        Ok(a / b)
    }
}

fn pair<R, F, G>(name: &str, student: F, solution: G) -> DiffTest<R>
where
    R: PartialEq + std::fmt::Debug,
    F: Fn(&mut Io<'_>, &Args) -> Result<R, Interrupt> + Send + Sync + 'static,
    G: Fn(&mut Io<'_>, &Args) -> Result<R, Interrupt> + Send + Sync + 'static,
{
    DiffTest::new(Callable::new(name, student), Callable::new(name, solution))
}

/// The sample suite, not yet configured for a run mode
pub fn sample_suite() -> Suite {
    let mut suite = Suite::new();
    suite
        .add_test(
            pair("mean", candidate::mean, reference::mean)
                .with_args(Args::new().arg(vec![2, 4, 9])),
        )
        .add_test(
            pair("mean", candidate::mean, reference::mean)
                .with_args(Args::new().arg(Vec::<i64>::new()))
                .with_start_msg("Testing mean of an empty list..."),
        )
        .add_test(
            pair("fizzbuzz", candidate::fizzbuzz, reference::fizzbuzz)
                .with_args(Args::new().arg(10)),
        )
        .add_test(
            pair("fizzbuzz", candidate::fizzbuzz, reference::fizzbuzz)
                .with_args(Args::new().arg(16)),
        )
        .add_test(pair("greet", candidate::greet, reference::greet).with_stdin(["Ada\n"]))
        .add_test(
            pair("word_count", candidate::word_count, reference::word_count)
                .with_args(Args::new().arg("one two three")),
        )
        .add_test(
            pair("word_count", candidate::word_count, reference::word_count)
                .with_args(Args::new().arg("spaced  out")),
        )
        .add_test(
            pair("parse_age", candidate::parse_age, reference::parse_age)
                .with_args(Args::new().arg("42")),
        )
        .add_test(
            pair("total_of_lines", candidate::total_of_lines, reference::total_of_lines)
                .with_stdin(["3\n", "10\n", "20\n", "12\n"]),
        )
        .add_test(
            pair("checked_ratio", candidate::checked_ratio, reference::checked_ratio)
                .with_args(Args::new().arg(9).arg(0)),
        );
    suite
}
