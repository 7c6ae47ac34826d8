//! Parser for user-written join conditions.
//!
//! Only conjunctions of column equalities are accepted:
//! `orders.user_id = users.id AND orders.shop = users.shop`. Names may be bare
//! or backtick-quoted and may carry a table prefix.

use crate::{
    error::PlanError,
    query::ast::expr::{BinaryOperator, ColumnName, Expr},
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Dot,
    Eq,
    And,
}

pub fn parse_join_condition(condition: &str) -> Result<Expr, PlanError> {
    let fail = |reason: String| PlanError::InvalidJoinCondition {
        condition: condition.to_string(),
        reason,
    };

    let tokens = tokenize(condition).map_err(fail)?;
    let mut pos = 0;
    let mut equalities = Vec::new();

    loop {
        let left = parse_column(&tokens, &mut pos).map_err(fail)?;
        match tokens.get(pos) {
            Some(Token::Eq) => pos += 1,
            other => return Err(fail(format!("expected '=' but found {}", describe(other)))),
        }
        let right = parse_column(&tokens, &mut pos).map_err(fail)?;
        equalities.push(Expr::binary(
            Expr::Column(left),
            BinaryOperator::Eq,
            Expr::Column(right),
        ));

        match tokens.get(pos) {
            None => break,
            Some(Token::And) => pos += 1,
            other => return Err(fail(format!("expected AND but found {}", describe(other)))),
        }
    }

    Expr::and_all(equalities).ok_or_else(|| fail("condition is empty".into()))
}

fn parse_column(tokens: &[Token], pos: &mut usize) -> Result<ColumnName, String> {
    let first = match tokens.get(*pos) {
        Some(Token::Ident(name)) => name.clone(),
        other => return Err(format!("expected a column but found {}", describe(other))),
    };
    *pos += 1;

    if tokens.get(*pos) != Some(&Token::Dot) {
        return Ok(ColumnName {
            table: None,
            name: first,
        });
    }
    *pos += 1;

    match tokens.get(*pos) {
        Some(Token::Ident(name)) => {
            *pos += 1;
            Ok(ColumnName {
                table: Some(first),
                name: name.clone(),
            })
        }
        other => Err(format!(
            "expected a column after '{first}.' but found {}",
            describe(other)
        )),
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '.' => {
                chars.next();
                tokens.push(Token::Dot);
            }
            '=' => {
                chars.next();
                // `==` is accepted as a synonym
                if chars.peek() == Some(&'=') {
                    chars.next();
                }
                tokens.push(Token::Eq);
            }
            '`' => {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('\\') => match chars.next() {
                            Some(escaped) => name.push(escaped),
                            None => return Err("unterminated quoted identifier".into()),
                        },
                        Some('`') => break,
                        Some(c) => name.push(c),
                        None => return Err("unterminated quoted identifier".into()),
                    }
                }
                if name.is_empty() {
                    return Err("empty quoted identifier".into());
                }
                tokens.push(Token::Ident(name));
            }
            c if c.is_alphanumeric() || c == '_' => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        word.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if word.eq_ignore_ascii_case("and") {
                    tokens.push(Token::And);
                } else {
                    tokens.push(Token::Ident(word));
                }
            }
            other => return Err(format!("unexpected character '{other}'")),
        }
    }

    Ok(tokens)
}

fn describe(token: Option<&Token>) -> String {
    match token {
        None => "end of input".to_string(),
        Some(Token::Ident(name)) => format!("'{name}'"),
        Some(Token::Dot) => "'.'".to_string(),
        Some(Token::Eq) => "'='".to_string(),
        Some(Token::And) => "AND".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{dialect::ClickHouse, renderer::Statement};

    fn render(condition: &str) -> String {
        Statement::render(&parse_join_condition(condition).unwrap(), &ClickHouse).sql
    }

    #[test]
    fn test_single_equality() {
        assert_eq!(
            render("orders.user_id = users.id"),
            "`orders`.`user_id` = `users`.`id`"
        );
    }

    #[test]
    fn test_conjunction_and_quoting() {
        assert_eq!(
            render("a.x == b.y and `a`.`weird col` = b.z"),
            "`a`.`x` = `b`.`y` AND `a`.`weird col` = `b`.`z`"
        );
    }

    #[test]
    fn test_columns_are_collected() {
        let expr = parse_join_condition("a.x = b.y AND c = d.w").unwrap();
        let names: Vec<_> = expr.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y", "c", "w"]);
    }

    #[test]
    fn test_rejects_injection_attempts() {
        assert!(parse_join_condition("a.x = b.y; DROP TABLE t").is_err());
        assert!(parse_join_condition("a.x = b.y OR 1 = 1").is_err());
        assert!(parse_join_condition("a.x = 'value'").is_err());
        assert!(parse_join_condition("a.x").is_err());
        assert!(parse_join_condition("").is_err());
        assert!(parse_join_condition("`a.x = b.y").is_err());
    }
}
