//! Compilation of token streams into programs.
//!
//! Literals are resolved against a symbol table of at most six distinct
//! names, ordered according to a [`SymbolOrder`]. The token stream is then
//! rearranged into reverse Polish notation with a shunting-yard pass and
//! finally lowered to a straight-line [`Program`], one instruction per
//! operator.

use thiserror::Error;

use crate::lexer::{Token, TokenType};
use crate::op::Op;
use crate::program::{Instruction, Program, VARIABLE_LIMIT};

/// How variable names map to input indices.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum SymbolOrder {
    /// Alphabetical (the default).
    #[default]
    LexAscending,
    /// Reverse alphabetical.
    LexDescending,
    /// First appearance in the expression.
    AppearanceAscending,
    /// Reverse order of first appearance.
    AppearanceDescending,
}

impl SymbolOrder {
    /// Parses the CLI code for an order: `l`/`la`, `ld`, `a`/`aa`, `ad`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "l" | "la" => Some(SymbolOrder::LexAscending),
            "ld" => Some(SymbolOrder::LexDescending),
            "a" | "aa" => Some(SymbolOrder::AppearanceAscending),
            "ad" => Some(SymbolOrder::AppearanceDescending),
            _ => None,
        }
    }
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum CompileError {
    #[error("too many variables (at most {VARIABLE_LIMIT} allowed)")]
    TooManyVariables,
    #[error("expression does not contain any variables")]
    NoVariables,
    #[error("syntax error: mismatched parentheses")]
    MismatchedParentheses,
    #[error("syntax error: malformed expression")]
    Malformed,
}

/// Binding strength of each operator; lower binds tighter. Literals and
/// parentheses sit outside the operator ordering at 0.
const fn precedence(kind: TokenType) -> u32 {
    match kind {
        TokenType::Literal | TokenType::ParensOpen | TokenType::ParensClose => 0,
        TokenType::Not => 1,
        TokenType::Nxor => 2,
        TokenType::And => 3,
        TokenType::Nand => 4,
        TokenType::Andn => 5,
        TokenType::Xor => 6,
        TokenType::Or => 7,
        TokenType::Nor => 8,
        TokenType::Cons => 9,
    }
}

/// The operation an operator token lowers to.
fn operation(kind: TokenType) -> Option<Op> {
    match kind {
        TokenType::Not => Some(Op::NotA),
        TokenType::And => Some(Op::And),
        TokenType::Nand => Some(Op::Nand),
        TokenType::Or => Some(Op::Or),
        TokenType::Nor => Some(Op::Nor),
        TokenType::Xor => Some(Op::Xor),
        TokenType::Nxor => Some(Op::Nxor),
        TokenType::Cons => Some(Op::ConsAb),
        TokenType::Andn => Some(Op::AndnAb),
        _ => None,
    }
}

/// Anything token-shaped the shunting yard can reorder.
trait HasKind: Clone {
    fn kind(&self) -> TokenType;
}

impl HasKind for Token {
    fn kind(&self) -> TokenType {
        self.kind
    }
}

/// A token with its literal resolved to an input index.
#[derive(Debug, Copy, Clone)]
struct ParserToken {
    kind: TokenType,
    operand: u8,
}

impl HasKind for ParserToken {
    fn kind(&self) -> TokenType {
        self.kind
    }
}

fn shunting_yard<T: HasKind>(tokens: &[T]) -> Result<Vec<T>, CompileError> {
    let mut output: Vec<T> = Vec::with_capacity(tokens.len());
    let mut stack: Vec<T> = Vec::new();

    for token in tokens {
        match token.kind() {
            TokenType::Literal => output.push(token.clone()),
            // Prefix negation binds to the next operand; it leaves the stack
            // when its operand is complete.
            TokenType::Not | TokenType::ParensOpen => stack.push(token.clone()),
            TokenType::ParensClose => {
                loop {
                    let Some(top) = stack.pop() else {
                        return Err(CompileError::MismatchedParentheses);
                    };
                    if top.kind() == TokenType::ParensOpen {
                        break;
                    }
                    output.push(top);
                }
                if stack.last().map(T::kind) == Some(TokenType::Not) {
                    output.extend(stack.pop());
                }
            }
            _ => {
                while stack
                    .last()
                    .map(T::kind)
                    .is_some_and(|k| (1..=precedence(token.kind())).contains(&precedence(k)))
                {
                    output.extend(stack.pop());
                }
                stack.push(token.clone());
            }
        }
    }

    while let Some(top) = stack.pop() {
        if top.kind() == TokenType::ParensOpen {
            return Err(CompileError::MismatchedParentheses);
        }
        output.push(top);
    }
    Ok(output)
}

/// Reorders a token stream into reverse Polish notation.
pub fn to_reverse_polish(tokens: &[Token]) -> Result<Vec<Token>, CompileError> {
    shunting_yard(tokens)
}

fn compile_from_polish(
    program: &mut Program,
    polish: &[ParserToken],
) -> Result<(), CompileError> {
    let mut stack: Vec<u8> = Vec::new();
    for token in polish {
        if token.kind == TokenType::Literal {
            stack.push(token.operand);
            continue;
        }
        let op = operation(token.kind).ok_or(CompileError::Malformed)?;
        let result = (program.len() + VARIABLE_LIMIT) as u8;
        if op.is_unary() {
            let top = stack.last_mut().ok_or(CompileError::Malformed)?;
            let a = std::mem::replace(top, result);
            program.push(Instruction::new(op, a, 0));
        } else {
            let b = stack.pop().ok_or(CompileError::Malformed)?;
            let top = stack.last_mut().ok_or(CompileError::Malformed)?;
            let a = std::mem::replace(top, result);
            program.push(Instruction::new(op, a, b));
        }
    }

    // A bare literal compiles to an identity move so that the program is
    // never empty.
    if program.is_empty() {
        let operand = *stack.last().ok_or(CompileError::Malformed)?;
        program.push(Instruction::new(Op::A, operand, 0));
    }

    if stack.len() != 1 {
        return Err(CompileError::Malformed);
    }
    Ok(())
}

/// Compiles a token stream into a program, resolving literals according to
/// `order`.
pub fn compile(tokens: &[Token], order: SymbolOrder) -> Result<Program, CompileError> {
    let mut names: Vec<&str> = Vec::new();
    for token in tokens.iter().filter(|t| t.kind == TokenType::Literal) {
        if !names.contains(&token.value.as_str()) {
            if names.len() == VARIABLE_LIMIT {
                return Err(CompileError::TooManyVariables);
            }
            names.push(&token.value);
        }
    }
    if names.is_empty() {
        return Err(CompileError::NoVariables);
    }

    match order {
        SymbolOrder::AppearanceAscending => {}
        SymbolOrder::AppearanceDescending => names.reverse(),
        SymbolOrder::LexAscending => names.sort_unstable(),
        SymbolOrder::LexDescending => {
            names.sort_unstable();
            names.reverse();
        }
    }

    let index_of = |name: &str| {
        names
            .iter()
            .position(|&n| n == name)
            .expect("every literal was collected") as u8
    };
    let parser_tokens: Vec<ParserToken> = tokens
        .iter()
        .map(|t| ParserToken {
            kind: t.kind,
            operand: if t.kind == TokenType::Literal {
                index_of(&t.value)
            } else {
                0
            },
        })
        .collect();

    let mut program = Program::new(names.len());
    for (slot, name) in program.symbols.iter_mut().zip(&names) {
        *slot = (*name).to_string();
    }

    let polish = shunting_yard(&parser_tokens)?;
    compile_from_polish(&mut program, &polish)
        .map(|()| program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn compiled(expr: &str, order: SymbolOrder) -> Program {
        compile(&tokenize(expr).unwrap(), order).unwrap()
    }

    fn polish_of(expr: &str) -> String {
        let polish = to_reverse_polish(&tokenize(expr).unwrap()).unwrap();
        polish
            .iter()
            .map(|t| t.value.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_polish_precedence() {
        assert_eq!(polish_of("a * b + c"), "a b * c +");
        assert_eq!(polish_of("a + b * c"), "a b c * +");
        assert_eq!(polish_of("(a + b) * c"), "a b + c *");
    }

    #[test]
    fn test_polish_negation() {
        assert_eq!(polish_of("~a * b"), "a ~ b *");
        assert_eq!(polish_of("~(a + b)"), "a b + ~");
        assert_eq!(polish_of("!!a"), "a ! !");
    }

    #[test]
    fn test_polish_mismatched_parentheses() {
        let tokens = tokenize("(a + b").unwrap();
        assert_eq!(
            to_reverse_polish(&tokens),
            Err(CompileError::MismatchedParentheses)
        );
        let tokens = tokenize("a + b)").unwrap();
        assert_eq!(
            to_reverse_polish(&tokens),
            Err(CompileError::MismatchedParentheses)
        );
    }

    #[test]
    fn test_compile_and() {
        let program = compiled("a * b", SymbolOrder::LexAscending);
        assert_eq!(program.variables, 2);
        assert_eq!(program.instructions(), &[Instruction::new(Op::And, 0, 1)]);
        assert_eq!(program.compute_truth_table().f, 0b1000);
    }

    #[test]
    fn test_compile_xor_chain() {
        let program = compiled("a ^ b ^ c", SymbolOrder::LexAscending);
        assert_eq!(
            program.instructions(),
            &[
                Instruction::new(Op::Xor, 0, 1),
                Instruction::new(Op::Xor, 6, 2),
            ]
        );
        assert_eq!(program.compute_truth_table().f, 0b1001_0110);
    }

    #[test]
    fn test_compile_single_literal() {
        let program = compiled("a", SymbolOrder::LexAscending);
        assert_eq!(program.instructions(), &[Instruction::new(Op::A, 0, 0)]);
        assert_eq!(program.compute_truth_table().f, 0b10);
    }

    #[test]
    fn test_compile_negated_group() {
        let program = compiled("~(a + b)", SymbolOrder::LexAscending);
        assert_eq!(
            program.instructions(),
            &[
                Instruction::new(Op::Or, 0, 1),
                Instruction::new(Op::NotA, 6, 0),
            ]
        );
        assert_eq!(program.compute_truth_table().f, 0b0001);
    }

    #[test]
    fn test_compile_implication() {
        let program = compiled("a => b", SymbolOrder::LexAscending);
        assert_eq!(
            program.instructions(),
            &[Instruction::new(Op::ConsAb, 0, 1)]
        );
        // !a | b
        assert_eq!(program.compute_truth_table().f, 0b1011);
    }

    #[test]
    fn test_symbol_orders() {
        let lex = compiled("b + a", SymbolOrder::LexAscending);
        assert_eq!(lex.symbols[0], "a");
        assert_eq!(lex.symbols[1], "b");
        assert_eq!(lex.instructions(), &[Instruction::new(Op::Or, 1, 0)]);

        let appearance = compiled("b + a", SymbolOrder::AppearanceAscending);
        assert_eq!(appearance.symbols[0], "b");
        assert_eq!(appearance.symbols[1], "a");
        assert_eq!(appearance.instructions(), &[Instruction::new(Op::Or, 0, 1)]);

        let lex_desc = compiled("b + a", SymbolOrder::LexDescending);
        assert_eq!(lex_desc.symbols[0], "b");

        let appearance_desc = compiled("b + a", SymbolOrder::AppearanceDescending);
        assert_eq!(appearance_desc.symbols[0], "a");
    }

    #[test]
    fn test_symbol_order_does_not_change_meaning() {
        for order in [
            SymbolOrder::LexAscending,
            SymbolOrder::LexDescending,
            SymbolOrder::AppearanceAscending,
            SymbolOrder::AppearanceDescending,
        ] {
            let program = compiled("x * y + z", order);
            // Renaming inputs permutes rows but keeps their count: five
            // satisfied rows for (x & y) | z under any order.
            assert_eq!(program.compute_truth_table().f.count_ones(), 5);
        }
    }

    #[test]
    fn test_too_many_variables() {
        let tokens = tokenize("a + b + c + d + e + f + g").unwrap();
        assert_eq!(
            compile(&tokens, SymbolOrder::LexAscending),
            Err(CompileError::TooManyVariables)
        );
    }

    #[test]
    fn test_six_variables_is_the_limit() {
        let program = compiled("a + b + c + d + e + f", SymbolOrder::LexAscending);
        assert_eq!(program.variables, 6);
        assert_eq!(program.len(), 5);
    }

    #[test]
    fn test_no_variables() {
        let tokens = tokenize("()").unwrap();
        assert_eq!(
            compile(&tokens, SymbolOrder::LexAscending),
            Err(CompileError::NoVariables)
        );
    }

    #[test]
    fn test_malformed_expressions() {
        for expr in ["a b", "a +", "+ a", "a + + b"] {
            let tokens = tokenize(expr).unwrap();
            assert!(
                compile(&tokens, SymbolOrder::LexAscending).is_err(),
                "{expr:?} should not compile"
            );
        }
    }
}
