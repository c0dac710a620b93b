use std::collections::BTreeMap;

use frees_core::{EvalError, Expr, Model, Overlay, Toolkit, evaluate};

/// One side of an equation as a function of its single unknown.
///
/// Each call binds the unknown to the candidate value on top of the known
/// values and evaluates the expression.
#[derive(Debug, Clone, Copy)]
pub struct ExprModel<'a> {
    expr: &'a Expr,
    unknown: &'a str,
    known: &'a BTreeMap<String, f64>,
    toolkit: &'a Toolkit,
}

impl<'a> ExprModel<'a> {
    #[must_use]
    pub fn new(
        expr: &'a Expr,
        unknown: &'a str,
        known: &'a BTreeMap<String, f64>,
        toolkit: &'a Toolkit,
    ) -> Self {
        Self {
            expr,
            unknown,
            known,
            toolkit,
        }
    }
}

impl Model for ExprModel<'_> {
    type Input = f64;
    type Output = f64;
    type Error = EvalError;

    fn call(&self, x: &f64) -> Result<f64, Self::Error> {
        let scope = Overlay::new(self.known, self.unknown, *x);
        evaluate(self.expr, &scope, self.toolkit)
    }
}
