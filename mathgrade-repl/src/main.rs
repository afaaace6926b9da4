mod error;
mod telemetry;

use error::{read_file, Error};
use mathgrade_compute::symbolic::{simplify, Budget, SimplifyOptions, Statement};
use mathgrade_engine::{config::DEFAULT_BUDGET, grade, ProblemSpec, Submission};
use mathgrade_parser::{normalize::normalize, parse_expr, parser::fmt::Latex};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::io::{self, IsTerminal, Read};
use tracing::debug;

/// Separates the answers of a multi-answer problem on one interactive line.
const ANSWER_SEPARATOR: char = ';';

const USAGE: &str = "\
usage: mathgrade                                  explore expressions interactively
       mathgrade <problem.json>                   grade answers interactively
       mathgrade <problem.json> <submission.json> [problem id]
                                                  grade a submission, printing the result as JSON";

/// Normalizes, parses, and simplifies one expression, printing each stage.
fn explore(input: &str) {
    let normalized = normalize(input);
    let expr = match parse_expr(&normalized) {
        Ok(expr) => expr,
        Err(err) => {
            err.report_to_stderr("input", &normalized);
            return;
        },
    };
    let statement = match Statement::try_from(&expr) {
        Ok(statement) => statement,
        Err(err) => {
            eprintln!("{}", err);
            return;
        },
    };

    println!("normalized: {}", normalized);
    println!("parsed:     {}", statement.as_display());

    let mut budget = Budget::new(DEFAULT_BUDGET);
    let mut simplify_all = || -> Result<Statement, mathgrade_compute::EvalError> {
        Ok(match &statement {
            Statement::Scalar(expr) => Statement::Scalar(simplify(expr, &SimplifyOptions::default(), &mut budget)?),
            Statement::Relation(relation) => {
                let mut relation = relation.clone();
                relation.lhs = simplify(&relation.lhs, &SimplifyOptions::default(), &mut budget)?;
                relation.rhs = simplify(&relation.rhs, &SimplifyOptions::default(), &mut budget)?;
                Statement::Relation(relation)
            },
        })
    };
    match simplify_all() {
        Ok(simplified) => println!("simplified: {}", simplified.as_display()),
        Err(err) => eprintln!("{}", err),
    }
}

/// Grades one line of answers, separated by [`ANSWER_SEPARATOR`], and prints the verdict.
fn grade_line(spec: &ProblemSpec, input: &str) {
    let submission = Submission::new(input.split(ANSWER_SEPARATOR).map(str::trim));
    let result = grade(spec, &submission);
    let verdict = match result.valid {
        Some(true) => "correct",
        Some(false) => "incorrect",
        None => "ungraded",
    };
    println!("{}", verdict);
    for line in &result.feedback {
        println!("  {}", line);
    }
}

/// Reads lines until the end of input, handing each non-empty line to `f`.
fn interactive(prompt: &str, mut f: impl FnMut(&str)) -> Result<(), Error> {
    let mut rl = DefaultEditor::new()?;
    loop {
        let input = match rl.readline(prompt) {
            Ok(input) => input,
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => return Ok(()),
            Err(err) => return Err(err.into()),
        };
        if input.trim().is_empty() {
            continue;
        }

        rl.add_history_entry(&input)?;
        f(&input);
    }
}

fn run(args: &[String]) -> Result<(), Error> {
    match args {
        [] => interactive("> ", explore),
        [problem] => {
            let spec = ProblemSpec::from_json(&read_file(problem)?)?;
            if !io::stdin().is_terminal() {
                // one line of answers per line of stdin
                let mut input = String::new();
                io::stdin().read_to_string(&mut input).map_err(|source| Error::Read {
                    path: "stdin".to_string(),
                    source,
                })?;
                input.lines()
                    .filter(|line| !line.trim().is_empty())
                    .for_each(|line| grade_line(&spec, line));
                return Ok(());
            }

            if !spec.header.is_empty() {
                println!("{}", spec.header);
            }
            println!("format: {}", spec.format_hint());
            interactive("answer> ", |input| grade_line(&spec, input))
        },
        [problem, submission, rest @ ..] => {
            let spec = ProblemSpec::from_json(&read_file(problem)?)?;
            let problem_id = rest.first()
                .cloned()
                .or_else(|| spec.name.clone())
                .unwrap_or_else(|| "answer".to_string());
            debug!(problem = %problem, id = %problem_id, "grading submission file");
            let submission = Submission::from_json(&read_file(submission)?, &problem_id)?;
            let result = grade(&spec, &submission);
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        },
    }
}

fn main() {
    telemetry::init_tracing();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        println!("{}", USAGE);
        return;
    }

    if let Err(err) = run(&args) {
        eprintln!("error: {}", err);
        eprintln!("{}", USAGE);
        std::process::exit(1);
    }
}
