//! Command-line frontend for the superoptimizer.

use clap::Parser;
use color_eyre::eyre::{bail, Result};

use boolmin::compiler::{compile, to_reverse_polish, SymbolOrder};
use boolmin::display::format_expression;
use boolmin::finder::find_equivalent_programs;
use boolmin::lexer::{tokenize, LexError, Token};
use boolmin::op::InstructionSet;
use boolmin::program::{Instruction, Program};
use boolmin::table::TruthTable;

#[derive(Parser)]
#[command(
    name = "boolmin",
    version,
    about = "Finds the shortest boolean programs realizing a truth table",
    after_help = "Truth table (regex: [10x.]+): x is \"don't care\", . is ignored"
)]
struct Args {
    /// Input expression
    #[arg(short = 'e', long = "expr", value_name = "EXPRESSION")]
    expr: Option<String>,

    /// Input truth table
    #[arg(
        short = 't',
        long = "table",
        value_name = "TABLE",
        conflicts_with = "expr"
    )]
    table: Option<String>,

    /// Symbol naming order: l/la (lexical), ld, a/aa (appearance), ad
    #[arg(short = 's', long = "symbol-order", value_name = "ORDER", default_value = "la")]
    symbol_order: String,

    /// Greedily search for all optimal programs
    #[arg(short = 'g', long = "greedy")]
    greedy: bool,

    /// Print results as expressions
    #[arg(short = 'x', long = "print-expr")]
    print_expr: bool,

    /// Print results as program listings
    #[arg(short = 'p', long = "print-program")]
    print_program: bool,

    /// Tokenize the expression, print the tokens and exit
    #[arg(short = 'Z', long = "tokenize")]
    tokenize: bool,

    /// Print the expression in reverse Polish notation and exit
    #[arg(short = 'P', long = "polish")]
    polish: bool,

    /// Print the compiled (unoptimized) program and exit
    #[arg(short = 'C', long = "compile")]
    compile: bool,

    /// Print the truth table of the expression and exit
    #[arg(short = 'B', long = "build-table")]
    build_table: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    simplelog::TermLogger::init(
        simplelog::LevelFilter::Warn,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Args::parse();
    let Some(order) = SymbolOrder::from_code(&args.symbol_order) else {
        bail!(
            "invalid symbol order {:?}, must be l, la, ld, a, aa, or ad",
            args.symbol_order
        );
    };

    if let Some(expr) = &args.expr {
        return run_with_expression(&args, expr, order);
    }
    if let Some(literal) = &args.table {
        return run_with_table(&args, literal);
    }
    bail!("no input provided (pass --expr or --table)");
}

fn lex(expr: &str) -> Result<Vec<Token>> {
    match tokenize(expr) {
        Ok(tokens) => Ok(tokens),
        Err(err @ LexError::UnexpectedCharacter { index, .. }) => {
            let indent = "        ";
            bail!("{err}\n{indent}\"{expr}\"\n{indent}{:>offset$}", "^", offset = index + 2);
        }
    }
}

fn run_with_expression(args: &Args, expr: &str, order: SymbolOrder) -> Result<()> {
    let tokens = lex(expr)?;

    if args.tokenize {
        for token in &tokens {
            println!("{token}");
        }
        return Ok(());
    }

    if args.polish {
        let polish = to_reverse_polish(&tokens)?;
        let words: Vec<&str> = polish.iter().map(|t| t.value.as_str()).collect();
        println!("{}", words.join(" "));
        return Ok(());
    }

    let program = compile(&tokens, order)?;

    if args.compile {
        print!("{program}");
        return Ok(());
    }

    let table = program.compute_truth_table();
    if args.build_table {
        print_table(&program, table.t);
        return Ok(());
    }

    run_finder(args, table, program.variables, &program.symbols);
    Ok(())
}

fn run_with_table(args: &Args, literal: &str) -> Result<()> {
    if args.tokenize || args.polish || args.compile || args.build_table {
        bail!("expression output option set but no expression was given");
    }
    let (table, variables) = TruthTable::parse(literal)?;
    run_finder(args, table, variables, &Default::default());
    Ok(())
}

fn run_finder(args: &Args, table: TruthTable, variables: usize, symbols: &[String; 6]) {
    let mut output = Program::new(variables);
    output.symbols = symbols.clone();
    let mut first = true;

    find_equivalent_programs(
        |instructions: &[Instruction]| {
            output.clear();
            for &ins in instructions {
                output.push(ins);
            }

            if !first && args.print_program {
                println!();
            }
            first = false;

            if args.print_expr || !args.print_program {
                println!("{}", format_expression(&output));
            }
            if args.print_program {
                print!("{output}");
            }
        },
        table,
        InstructionSet::C,
        variables,
        args.greedy,
    );
}

/// Prints the compact table followed by an aligned row-per-assignment view.
fn print_table(program: &Program, table: u64) {
    let rendered = TruthTable {
        f: table,
        t: table,
    };
    println!("{}", rendered.render(program.variables));
    println!();

    let names: Vec<&str> = (0..program.variables)
        .map(|v| {
            if program.symbols[v].is_empty() {
                ["A", "B", "C", "D", "E", "F"][v]
            } else {
                program.symbols[v].as_str()
            }
        })
        .collect();

    for name in &names {
        print!(" {name} |");
    }
    println!(" =");

    for row in 0..1u64 << program.variables {
        if row % 4 == 0 {
            for name in &names {
                print!("{}+", "-".repeat(name.len() + 2));
            }
            println!("---");
        }
        for (v, name) in names.iter().enumerate() {
            print!(" {:>width$} |", row >> v & 1, width = name.len());
        }
        println!(" {}", table >> row & 1);
    }
}
