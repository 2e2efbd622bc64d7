mod error;

use error::Error;
use rustyline::{error::ReadlineError, DefaultEditor};
use std::io::{self, BufRead, IsTerminal};
use tracing_subscriber::EnvFilter;
use tutor_core::{
    apply_primitive_with_trace,
    operators,
    step_with_trace,
    AstNode,
    Bindings,
    Candidate,
    ClickKind,
    ClickTarget,
    DecisionOptions,
    DecisionOptionsBuilder,
    LocalityPolicy,
    Path,
    StepHistory,
    StepHistoryEntry,
    TracingCollector,
    REGISTRY,
};
use tutor_parser::{parse, Latex};

const HELP: &str = "\
<expression>           start over with a new expression
op <n>                 click the nth operator, counting from 0
click <kind> [path]    click a node; kind is operator, number, fractionBar, bracket, or other
apply <rule> [path]    apply a rule directly
ops                    list the operators of the expression
undo                   undo the last step
history                list the steps taken so far
rules                  list every rule";

/// Command line flags.
#[derive(Debug, Default)]
struct Flags {
    strict_locality: bool,
    trace: bool,
    latex: bool,
}

impl Flags {
    fn from_args() -> Result<Self, String> {
        let mut flags = Self::default();
        for arg in std::env::args().skip(1) {
            match arg.as_str() {
                "--strict-locality" => flags.strict_locality = true,
                "--trace" => flags.trace = true,
                "--latex" => flags.latex = true,
                other => return Err(format!("unknown flag `{}`", other)),
            }
        }
        Ok(flags)
    }
}

/// The expression being worked on, and the steps taken on it.
struct Session {
    ast: Option<AstNode>,
    history: StepHistory,
    options: DecisionOptions,
    latex: bool,
}

impl Session {
    fn new(flags: &Flags) -> Self {
        let locality = if flags.strict_locality {
            LocalityPolicy::Strict
        } else {
            LocalityPolicy::Bubbling
        };
        Self {
            ast: None,
            history: StepHistory::new(),
            options: DecisionOptionsBuilder::new().locality(locality).build(),
            latex: flags.latex,
        }
    }

    /// Prints an expression in the selected output form.
    fn show(&self, ast: &AstNode) {
        if self.latex {
            println!("{}", ast.as_display());
        } else {
            println!("{}", ast);
        }
    }

    fn current(&self) -> Result<&AstNode, Error> {
        self.ast.as_ref().ok_or(Error::Usage("enter an expression first"))
    }

    /// Runs a single line of input.
    fn run(&mut self, input: &str) -> Result<(), Error> {
        let mut words = input.split_whitespace();
        let command = words.next().unwrap_or_default();
        let args = words.collect::<Vec<_>>();

        match (command, args.as_slice()) {
            ("op", [index]) => {
                let index = index.parse().map_err(|_| Error::Usage("op <n>"))?;
                self.step(&ClickTarget::operator(index))
            },
            ("op", _) => Err(Error::Usage("op <n>")),
            ("click", [kind, rest @ ..]) if rest.len() <= 1 => {
                let kind = kind.parse::<ClickKind>()
                    .map_err(|_| Error::Usage("click <operator|number|fractionBar|bracket|other> [path]"))?;
                let path = parse_path(rest.first().copied())?;
                self.step(&ClickTarget::new(path, kind))
            },
            ("click", _) => Err(Error::Usage("click <kind> [path]")),
            ("apply", [rule_id, rest @ ..]) if rest.len() <= 1 => {
                let path = parse_path(rest.first().copied())?;
                self.apply(rule_id, path)
            },
            ("apply", _) => Err(Error::Usage("apply <rule> [path]")),
            ("ops", []) => {
                for (index, path, op) in operators(self.current()?) {
                    println!("{:>3}  {:<24} {}", index, path, op);
                }
                Ok(())
            },
            ("undo", []) => self.undo(),
            ("history", []) => {
                for entry in self.history.entries() {
                    println!(
                        "{}  {:<14} {:<28} {} -> {}",
                        entry.step_id,
                        entry.status.as_str(),
                        entry.candidate_id.as_deref().unwrap_or("-"),
                        entry.expression_before,
                        entry.expression_after.as_deref()
                            .or(entry.error_code.as_deref())
                            .unwrap_or("-"),
                    );
                }
                Ok(())
            },
            ("rules", []) => {
                for rule in REGISTRY.rules() {
                    println!("{:<24} {:<12} {:<7} {:?}", rule.id, rule.click.as_str(), rule.color.as_str(), rule.required);
                }
                Ok(())
            },
            ("help", []) => {
                println!("{}", HELP);
                Ok(())
            },
            _ => {
                let ast = parse(input).map_err(|err| Error::parse(err, input))?;
                self.show(&ast);
                self.ast = Some(ast);
                self.history = StepHistory::new();
                Ok(())
            },
        }
    }

    /// Resolves a click and applies the chosen rule.
    fn step(&mut self, click: &ClickTarget) -> Result<(), Error> {
        let ast = self.current()?.clone();
        let report = step_with_trace(&ast, click, &mut self.history, &self.options, &mut TracingCollector)?;

        let matched = report.outcome.matches.iter()
            .map(|m| format!("{}@{}", m.rule_id, m.target_path))
            .collect::<Vec<_>>();
        println!(
            "{} ({})",
            report.outcome.kind,
            if matched.is_empty() { "nothing matched".to_string() } else { matched.join(", ") },
        );

        match (report.decision.chosen_candidate_id, report.new_ast) {
            (Some(chosen), Some(new_ast)) => {
                println!("{}:", chosen);
                self.show(&new_ast);
                self.ast = Some(new_ast);
            },
            _ => println!("{}", report.decision.status),
        }
        Ok(())
    }

    /// Applies a rule directly, recording it in the history.
    fn apply(&mut self, rule_id: &str, path: Path) -> Result<(), Error> {
        let ast = self.current()?;
        let candidate = Candidate::new(rule_id, path);
        let mut entry = StepHistoryEntry::chosen(&candidate, ast.to_string());

        let result = apply_primitive_with_trace(
            rule_id,
            ast,
            &candidate.target_path,
            &Bindings::default(),
            &mut TracingCollector,
        );
        match result {
            Ok(new_ast) => {
                entry.expression_after = Some(new_ast.to_string());
                self.history.record(entry);
                self.show(&new_ast);
                self.ast = Some(new_ast);
                Ok(())
            },
            Err(err) => {
                entry.error_code = Some(err.code().to_string());
                self.history.record(entry);
                Err(err.into())
            },
        }
    }

    /// Restores the expression from before the last step.
    fn undo(&mut self) -> Result<(), Error> {
        let entry = self.history.undo().ok_or(Error::Usage("nothing to undo"))?;
        let ast = parse(&entry.expression_before)
            .map_err(|err| Error::parse(err, &entry.expression_before))?;
        self.show(&ast);
        self.ast = Some(ast);
        Ok(())
    }
}

/// Parses an optional path argument, defaulting to the root.
fn parse_path(arg: Option<&str>) -> Result<Path, Error> {
    match arg {
        Some(source) => source.parse().map_err(|err| Error::parse(err, source)),
        None => Ok(Path::root()),
    }
}

fn main() {
    let flags = match Flags::from_args() {
        Ok(flags) => flags,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("usage: tutor-repl [--strict-locality] [--trace] [--latex]");
            std::process::exit(2);
        },
    };

    let filter = if flags.trace {
        EnvFilter::new("tutor_core=trace")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    tracing::debug!(?flags, "starting session");

    let mut session = Session::new(&flags);
    let mut process = |input: &str| {
        let input = input.trim();
        if input.is_empty() {
            return;
        }
        if let Err(err) = session.run(input) {
            err.report_to_stderr();
        }
    };

    if !io::stdin().is_terminal() {
        // read commands from stdin, one per line
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => process(&line),
                Err(err) => {
                    eprintln!("{}", err);
                    break;
                },
            }
        }
        return;
    }

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(err) => {
            eprintln!("{}", err);
            return;
        },
    };

    println!("type `help` for the list of commands");
    loop {
        match rl.readline("> ") {
            Ok(input) => {
                if !input.trim().is_empty() {
                    if let Err(err) = rl.add_history_entry(&input) {
                        eprintln!("{}", err);
                    }
                }
                process(&input);
            },
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => break,
            Err(err) => {
                eprintln!("{}", err);
                break;
            },
        }
    }
}
