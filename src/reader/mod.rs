mod lexer;
mod parser;

pub use self::lexer::{Error as LexerError, Lexer, Number, Token};
pub use self::parser::{Error, Expr, FnDecl, HostFn, Parser, Result};

/// read parses every top-level expression in `input`.
pub fn read(input: &str) -> Result<Vec<Expr>> {
    let mut parser = Parser::new(input)?;
    let mut exprs = vec![];
    while let Some(expr) = parser.parse_next_expression()? {
        exprs.push(expr);
    }
    Ok(exprs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_read_expr() {
        let input = "(+ 2 3)";
        let exprs = read(input).unwrap();
        assert_eq!(
            exprs,
            vec![Expr::BinaryOp {
                op: '+',
                left: Box::new(Expr::Number(Number::Int(2))),
                right: Box::new(Expr::Number(Number::Int(3))),
            }]
        )
    }
}
