use super::{FunctionError, ToolkitBuilder, UnitTable, Value};

type Unary = fn(f64) -> f64;
type Binary = fn(f64, f64) -> f64;

const UNARY: &[(&str, Unary)] = &[
    ("sin", f64::sin),
    ("cos", f64::cos),
    ("tan", f64::tan),
    ("asin", f64::asin),
    ("acos", f64::acos),
    ("atan", f64::atan),
    ("sinh", f64::sinh),
    ("cosh", f64::cosh),
    ("tanh", f64::tanh),
    ("exp", f64::exp),
    ("ln", f64::ln),
    ("log", f64::log10),
    ("log10", f64::log10),
    ("sqrt", f64::sqrt),
    ("abs", f64::abs),
    ("floor", f64::floor),
    ("ceil", f64::ceil),
    ("round", f64::round),
    ("deg", f64::to_degrees),
    ("rad", f64::to_radians),
];

/// Registers the standard math functions.
///
/// `convert` is not registered here; the builder binds it to its final unit
/// table on build.
pub(super) fn register(builder: ToolkitBuilder) -> ToolkitBuilder {
    UNARY
        .iter()
        .fold(builder, |builder, &(name, f)| builder.function(name, unary(f)))
        .function("atan2", binary(f64::atan2))
        .function("hypot", binary(f64::hypot))
        .function("min", variadic(f64::min))
        .function("max", variadic(f64::max))
}

/// `convert(value, "from", "to")`
pub(super) fn convert(units: &UnitTable, args: &[Value<'_>]) -> Result<f64, FunctionError> {
    let [value, from, to] = exact::<3>(args)?;
    units.convert(value.number(1)?, from.text(2)?, to.text(3)?)
}

fn unary(
    f: Unary,
) -> impl for<'a, 'b> Fn(&'a [Value<'b>]) -> Result<f64, FunctionError> + Send + Sync + 'static
{
    move |args: &[Value<'_>]| {
        let [x] = exact::<1>(args)?;
        Ok(f(x.number(1)?))
    }
}

fn binary(
    f: Binary,
) -> impl for<'a, 'b> Fn(&'a [Value<'b>]) -> Result<f64, FunctionError> + Send + Sync + 'static
{
    move |args: &[Value<'_>]| {
        let [a, b] = exact::<2>(args)?;
        Ok(f(a.number(1)?, b.number(2)?))
    }
}

/// Folds one or more numeric arguments with `f`.
fn variadic(
    f: Binary,
) -> impl for<'a, 'b> Fn(&'a [Value<'b>]) -> Result<f64, FunctionError> + Send + Sync + 'static
{
    move |args: &[Value<'_>]| {
        let (first, rest) = args.split_first().ok_or(FunctionError::TooFewArguments {
            minimum: 1,
            found: 0,
        })?;

        rest.iter()
            .enumerate()
            .try_fold(first.number(1)?, |acc, (i, arg)| {
                Ok(f(acc, arg.number(i + 2)?))
            })
    }
}

fn exact<'a, 'b, const N: usize>(
    args: &'a [Value<'b>],
) -> Result<&'a [Value<'b>; N], FunctionError> {
    args.try_into().map_err(|_| FunctionError::Arity {
        expected: N,
        found: args.len(),
    })
}
