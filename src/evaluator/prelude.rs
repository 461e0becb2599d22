//! Native statistics routines installed under fixed names, callable from
//! the language as `(funcall <name> (list ...))`. Each routine receives
//! the call's evaluated argument values as a flat sequence.

use std::result;

use rand::Rng;

use super::env::Env;
use crate::reader::{Expr, HostFn, Number};

type Result<T> = result::Result<T, String>;

static PRELUDE_BINDINGS: &[(&str, HostFn)] = &[
    ("sum", sum),
    ("mean", mean),
    ("median", median),
    ("quantile", quantile),
    ("sample", sample),
];

/// install binds every prelude routine into `env`.
pub fn install(env: &mut Env) {
    for (name, host_fn) in PRELUDE_BINDINGS {
        env.define(*name, Expr::Native((*name).to_string(), *host_fn));
    }
}

fn numeric_values(name: &str, values: &[Expr]) -> Result<Vec<Number>> {
    values
        .iter()
        .map(|value| match value {
            Expr::Number(n) => Ok(*n),
            other => Err(format!("{}: expected a number but found {}", name, other)),
        })
        .collect()
}

fn sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    values
}

// (funcall sum (list 1 2 3)) => 6
fn sum(args: Vec<Expr>) -> Result<Expr> {
    let numbers = numeric_values("sum", &args)?;

    // The total stays integral unless a float appears.
    let mut int_total: i64 = 0;
    let mut float_total = 0.0;
    let mut all_ints = true;
    for number in numbers {
        match number {
            Number::Int(n) => int_total = int_total.wrapping_add(n),
            Number::Float(n) => {
                all_ints = false;
                float_total += n;
            }
        }
    }
    let total = if all_ints {
        Number::Int(int_total)
    } else {
        Number::Float(float_total + int_total as f64)
    };
    Ok(Expr::Number(total))
}

fn mean(args: Vec<Expr>) -> Result<Expr> {
    let numbers = numeric_values("mean", &args)?;
    if numbers.is_empty() {
        return Err("mean: no values".into());
    }

    let total: f64 = numbers.iter().map(|n| n.as_f64()).sum();
    Ok(Expr::Number(Number::Float(total / numbers.len() as f64)))
}

fn median(args: Vec<Expr>) -> Result<Expr> {
    let numbers = numeric_values("median", &args)?;
    if numbers.is_empty() {
        return Err("median: no values".into());
    }

    let values = sorted(numbers.iter().map(|n| n.as_f64()).collect());
    let middle = values.len() / 2;
    let median = if values.len() % 2 == 1 {
        values[middle]
    } else {
        (values[middle - 1] + values[middle]) / 2.0
    };
    Ok(Expr::Number(Number::Float(median)))
}

// (funcall quantile (list (list 1 2 3 4) 0.5)) => 2.5
//
// Linear interpolation between the two nearest order statistics.
fn quantile(args: Vec<Expr>) -> Result<Expr> {
    let numbers = match args.first() {
        Some(Expr::List(elements)) => numeric_values("quantile", elements)?,
        _ => return Err("quantile: expected a list of numbers and a quantile in [0, 1]".into()),
    };
    let q = match args.get(1) {
        Some(Expr::Number(n)) => n.as_f64(),
        _ => return Err("quantile: expected a quantile in [0, 1]".into()),
    };
    if numbers.is_empty() {
        return Err("quantile: empty list".into());
    }
    if !(0.0..=1.0).contains(&q) {
        return Err(format!("quantile: {} is not in [0, 1]", q));
    }

    let values = sorted(numbers.iter().map(|n| n.as_f64()).collect());
    let position = q * (values.len() - 1) as f64;
    let low = position.floor() as usize;
    let high = position.ceil() as usize;
    let value = values[low] + (position - low as f64) * (values[high] - values[low]);
    Ok(Expr::Number(Number::Float(value)))
}

// (funcall sample (list 3)) => a list of 3 uniform draws from [0, 1)
fn sample(args: Vec<Expr>) -> Result<Expr> {
    let count = match args.first() {
        Some(Expr::Number(Number::Int(n))) if *n >= 0 => *n as usize,
        _ => return Err("sample: expected a non-negative count".into()),
    };

    let mut rng = rand::thread_rng();
    let draws = (0..count)
        .map(|_| Expr::Number(Number::Float(rng.gen::<f64>())))
        .collect();
    Ok(Expr::List(draws))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> Vec<Expr> {
        values.iter().map(|n| Expr::Number(Number::Int(*n))).collect()
    }

    #[test]
    fn sum_of_integers_stays_integral() {
        let result = sum(ints(&[1, 2, 3])).unwrap();
        assert_eq!(result, Expr::Number(Number::Int(6)));
    }

    #[test]
    fn sum_with_float_promotes() {
        let args = vec![
            Expr::Number(Number::Int(1)),
            Expr::Number(Number::Float(0.5)),
        ];
        let result = sum(args).unwrap();
        assert_eq!(result, Expr::Number(Number::Float(1.5)));
    }

    #[test]
    fn sum_of_nothing_is_zero() {
        let result = sum(vec![]).unwrap();
        assert_eq!(result, Expr::Number(Number::Int(0)));
    }

    #[test]
    fn sum_rejects_non_numbers() {
        let result = sum(vec![Expr::Str("one".into())]);
        assert!(result.is_err());
    }

    #[test]
    fn mean_of_integers() {
        let result = mean(ints(&[1, 2, 3, 4])).unwrap();
        assert_eq!(result, Expr::Number(Number::Float(2.5)));
    }

    #[test]
    fn mean_of_nothing_is_an_error() {
        assert!(mean(vec![]).is_err());
    }

    #[test]
    fn median_of_odd_count() {
        let result = median(ints(&[5, 1, 3])).unwrap();
        assert_eq!(result, Expr::Number(Number::Float(3.0)));
    }

    #[test]
    fn median_of_even_count() {
        let result = median(ints(&[4, 1, 3, 2])).unwrap();
        assert_eq!(result, Expr::Number(Number::Float(2.5)));
    }

    #[test]
    fn quantile_interpolates() {
        let args = vec![Expr::List(ints(&[1, 2, 3, 4])), Expr::Number(Number::Float(0.5))];
        let result = quantile(args).unwrap();
        assert_eq!(result, Expr::Number(Number::Float(2.5)));

        let args = vec![Expr::List(ints(&[1, 2, 3, 4])), Expr::Number(Number::Int(1))];
        let result = quantile(args).unwrap();
        assert_eq!(result, Expr::Number(Number::Float(4.0)));
    }

    #[test]
    fn quantile_rejects_out_of_range() {
        let args = vec![Expr::List(ints(&[1, 2])), Expr::Number(Number::Float(1.5))];
        assert!(quantile(args).is_err());
    }

    #[test]
    fn quantile_requires_a_list_first() {
        let args = vec![Expr::Number(Number::Int(1)), Expr::Number(Number::Float(0.5))];
        assert!(quantile(args).is_err());
    }

    #[test]
    fn sample_draws_from_unit_interval() {
        let result = sample(ints(&[4])).unwrap();
        match result {
            Expr::List(draws) => {
                assert_eq!(draws.len(), 4);
                for draw in draws {
                    match draw {
                        Expr::Number(Number::Float(v)) => assert!((0.0..1.0).contains(&v)),
                        other => panic!("unexpected draw: {:?}", other),
                    }
                }
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn sample_rejects_negative_count() {
        assert!(sample(ints(&[-1])).is_err());
    }

    #[test]
    fn install_binds_every_routine() {
        let mut env = Env::new();
        install(&mut env);
        for (name, _) in PRELUDE_BINDINGS {
            assert!(env.lookup(name).is_some(), "{} is missing", name);
        }
    }
}
