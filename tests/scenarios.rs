//! End-to-end scenarios: from a table or expression to rendered results.

use boolmin::compiler::{compile, SymbolOrder};
use boolmin::display::{format_expression, format_instruction};
use boolmin::finder::find_equivalent_programs;
use boolmin::lexer::tokenize;
use boolmin::op::InstructionSet;
use boolmin::program::{test_program, Instruction, Program, VARIABLE_LIMIT};
use boolmin::table::TruthTable;

/// Runs the search and renders every reported program.
fn solve(
    table: TruthTable,
    variables: usize,
    symbols: &[&str],
    greedy: bool,
) -> Vec<(String, String)> {
    let mut output = Program::new(variables);
    for (slot, name) in output.symbols.iter_mut().zip(symbols) {
        *slot = (*name).to_string();
    }

    let mut results = Vec::new();
    find_equivalent_programs(
        |instructions: &[Instruction]| {
            output.clear();
            for &ins in instructions {
                output.push(ins);
            }
            results.push((format_expression(&output), output.to_string()));
        },
        table,
        InstructionSet::C,
        variables,
        greedy,
    );
    results
}

fn solve_literal(literal: &str) -> (String, String) {
    let (table, variables) = TruthTable::parse(literal).unwrap();
    let results = solve(table, variables, &[], false);
    assert_eq!(results.len(), 1);
    results[0].clone()
}

#[test]
fn nor_table() {
    let (expression, listing) = solve_literal("1000");
    assert_eq!(expression, "~(A or B)");
    assert_eq!(listing, "%0 = @A or @B\n%1 = ~%0\n");
}

#[test]
fn xor_table() {
    let (expression, listing) = solve_literal("0110");
    assert_eq!(expression, "(A xor B)");
    assert_eq!(listing, "%0 = @A xor @B\n");
}

#[test]
fn and_table() {
    let (expression, listing) = solve_literal("0001");
    assert_eq!(expression, "(A and B)");
    assert_eq!(listing, "%0 = @A and @B\n");
}

#[test]
fn three_input_conjunction() {
    let (expression, listing) = solve_literal("00000001");
    assert_eq!(expression, "(A and (B and C))");
    assert_eq!(listing, "%0 = @B and @C\n%1 = @A and %0\n");
}

#[test]
fn almost_tautology_collapses_to_constant() {
    // Row 7 is a don't-care, so the constant true covers every required row
    // and no variable is relevant.
    let (expression, listing) = solve_literal("1111111x");
    assert_eq!(expression, "true");
    assert_eq!(listing, "%0 = true\n");
}

#[test]
fn expression_end_to_end() {
    let tokens = tokenize("a ^ b ^ c").unwrap();
    let program = compile(&tokens, SymbolOrder::LexAscending).unwrap();
    let table = program.compute_truth_table();

    let results = solve(table, program.variables, &["a", "b", "c"], false);
    assert_eq!(results.len(), 1);
    let (expression, listing) = &results[0];
    assert_eq!(expression, "(a xor (b xor c))");
    assert_eq!(listing, "%0 = @b xor @c\n%1 = @a xor %0\n");
}

#[test]
fn expression_round_trips_through_table() {
    // evaluate(compile(e)) == table_of(e), spelled over a few operators.
    for (expr, expected) in [
        ("a * b", 0b1000u64),
        ("a + b", 0b1110),
        ("a != b", 0b0110),
        ("a == b", 0b1001),
        ("a => b", 0b1011),
        ("a andn b", 0b0010),
        ("~a", 0b0101),
    ] {
        let tokens = tokenize(expr).unwrap();
        let program = compile(&tokens, SymbolOrder::LexAscending).unwrap();
        assert_eq!(program.compute_truth_table().f, expected, "{expr}");
    }
}

#[test]
fn optimum_is_consistent_with_dont_cares() {
    let (table, variables) = TruthTable::parse("1x0x.x10x").unwrap();
    let mut checked = 0;
    find_equivalent_programs(
        |instructions: &[Instruction]| {
            assert!(test_program(instructions, variables, table));
            let computed = boolmin::program::evaluate_program(instructions, variables);
            // Required-true rows are realized, required-false rows are not.
            assert_eq!(computed & table.f, table.f);
            assert_eq!(computed & !table.t, 0);
            checked += 1;
        },
        table,
        InstructionSet::C,
        variables,
        true,
    );
    assert!(checked > 0);
}

#[test]
fn six_variable_table_is_supported() {
    let literal = format!("{}{}", "0".repeat(32), "1".repeat(32));
    let (table, variables) = TruthTable::parse(&literal).unwrap();
    assert_eq!(variables, 6);
    let results = solve(table, variables, &[], false);
    assert_eq!(results, vec![("F".to_string(), "%0 = @F\n".to_string())]);
}

#[test]
fn six_symbol_expression_is_the_upper_limit() {
    let tokens = tokenize("u + v + w + x + y + z").unwrap();
    let program = compile(&tokens, SymbolOrder::LexAscending).unwrap();
    assert_eq!(program.variables, VARIABLE_LIMIT);

    let tokens = tokenize("t + u + v + w + x + y + z").unwrap();
    assert!(compile(&tokens, SymbolOrder::LexAscending).is_err());
}

#[test]
fn zero_variable_table_is_rejected() {
    assert!(TruthTable::parse("1").is_err());
    assert!(TruthTable::parse("0").is_err());
}

#[test]
fn greedy_three_variable_run_is_minimal_and_clean() {
    // Every greedy result for majority-of-three: minimal length, correct,
    // no dead instructions, every relevant input referenced.
    let (table, variables) = TruthTable::parse("00010111").unwrap();
    let relevancy = table.relevancy(variables);

    let mut programs: Vec<Vec<Instruction>> = Vec::new();
    find_equivalent_programs(
        |instructions: &[Instruction]| programs.push(instructions.to_vec()),
        table,
        InstructionSet::C,
        variables,
        true,
    );

    assert!(!programs.is_empty());
    for program in &programs {
        assert_eq!(program.len(), programs[0].len());
        assert!(test_program(program, variables, table));

        let mut referenced = 0u64;
        for ins in program {
            referenced |= 1 << ins.a;
            if !ins.operation().is_unary() {
                referenced |= 1 << ins.b;
            }
        }
        for i in 0..program.len() - 1 {
            assert!(referenced >> (VARIABLE_LIMIT + i) & 1 != 0);
        }
        assert_eq!(referenced & relevancy, relevancy);
    }
}

#[test]
fn instruction_rendering_matches_listing() {
    let mut program = Program::new(2);
    program.push(Instruction::new(boolmin::op::Op::And, 0, 1));
    let ins = program.instructions()[0];
    assert_eq!(format_instruction(&program, ins), "@A and @B");
}
