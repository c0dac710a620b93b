use thiserror::Error;

use crate::toolkit::{FunctionError, Toolkit, Value};

use super::{Expr, Scope};

/// Errors that can occur when evaluating an expression.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    #[error("text \"{0}\" cannot be used as a number")]
    TextAsNumber(String),

    #[error("`{name}` failed: {source}")]
    Function {
        name: String,
        #[source]
        source: FunctionError,
    },
}

/// Evaluates an expression against known variable values and a toolkit.
///
/// Arithmetic follows IEEE 754: dividing by zero yields an infinity and
/// invalid operations yield NaN rather than an error.
///
/// # Errors
///
/// Returns an [`EvalError`] if the expression references an unknown variable
/// or function, uses a text literal outside a function call, or a toolkit
/// function rejects its arguments.
pub fn evaluate<S: Scope + ?Sized>(
    expr: &Expr,
    scope: &S,
    toolkit: &Toolkit,
) -> Result<f64, EvalError> {
    match expr {
        Expr::Number(value) => Ok(*value),
        Expr::Text(text) => Err(EvalError::TextAsNumber(text.clone())),
        Expr::Variable(name) => scope
            .value(name)
            .ok_or_else(|| EvalError::UnknownVariable(name.clone())),
        Expr::Unary { op, operand } => Ok(op.apply(evaluate(operand, scope, toolkit)?)),
        Expr::Binary { op, lhs, rhs } => {
            let lhs = evaluate(lhs, scope, toolkit)?;
            let rhs = evaluate(rhs, scope, toolkit)?;
            Ok(op.apply(lhs, rhs))
        }
        Expr::Call { name, args } => {
            let function = toolkit
                .function(name)
                .ok_or_else(|| EvalError::UnknownFunction(name.clone()))?;

            let values = args
                .iter()
                .map(|arg| match arg {
                    Expr::Text(text) => Ok(Value::Text(text.as_str())),
                    other => evaluate(other, scope, toolkit).map(Value::Number),
                })
                .collect::<Result<Vec<_>, _>>()?;

            function(&values).map_err(|source| EvalError::Function {
                name: name.clone(),
                source,
            })
        }
    }
}
