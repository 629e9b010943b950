#![allow(non_snake_case)]
use RustedCalcSolver::solver::solve;
use RustedCalcSolver::utils::logger::init_logger;
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut args: Vec<String> = env::args().skip(1).collect();
    let mut loglevel = "warn".to_string();
    if args.first().map(String::as_str) == Some("--log") {
        args.remove(0);
        if args.is_empty() {
            eprintln!("--log needs a level: debug, info, warn, error or off");
            return ExitCode::from(2);
        }
        loglevel = args.remove(0);
    }
    let input = args.join(" ");
    if input.trim().is_empty() {
        eprintln!("usage: RustedCalcSolver [--log LEVEL] EXPRESSION");
        eprintln!("  e.g. RustedCalcSolver \"d/dx(x^2)\"");
        eprintln!("       RustedCalcSolver \"∫(0,1)(x^2)dx\"");
        eprintln!("       RustedCalcSolver \"lim(x->0)(sin(x)/x)\"");
        return ExitCode::from(2);
    }
    init_logger(&loglevel);

    match solve(&input) {
        Ok(solution) => {
            for step in &solution.steps {
                println!("{}", step);
            }
            println!("{}", solution.result);
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{}", error);
            ExitCode::FAILURE
        }
    }
}
