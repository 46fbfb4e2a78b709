//! Module containing miscellaneous utility functions.

use crate::imports::*;

pub fn diff(x: &Array1<f64>) -> Array1<f64> {
    ndarray::concatenate(
        ndarray::Axis(0),
        &[
            array![0.0].view(),
            (&x.slice(ndarray::s![1..]) - &x.slice(ndarray::s![..-1])).view(),
        ],
    )
    .unwrap()
}

/// return max of 2 f64
pub fn max(a: f64, b: f64) -> f64 {
    a.max(b)
}

/// return min of 2 f64
pub fn min(a: f64, b: f64) -> f64 {
    a.min(b)
}

/// return min <f64> of arr
pub fn ndarrmin(arr: &Array1<f64>) -> f64 {
    arr.to_vec().into_iter().reduce(f64::min).unwrap()
}

/// return max <f64> of arr
pub fn ndarrmax(arr: &Array1<f64>) -> f64 {
    arr.to_vec().into_iter().reduce(f64::max).unwrap()
}
