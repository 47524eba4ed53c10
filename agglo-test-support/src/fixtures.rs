//! Distance fixtures expressed as lower-triangle rows.
//!
//! Row `i` holds the distances from item `i` to items `0..=i`, the same
//! layout the text matrix format uses.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Three items with `d(A,B) = 2`, `d(A,C) = 5` and `d(B,C) = 4`.
///
/// # Examples
/// ```
/// use agglo_test_support::fixtures::three_items;
///
/// assert_eq!(three_items()[2], vec![5.0, 4.0, 0.0]);
/// ```
#[must_use]
pub fn three_items() -> Vec<Vec<f64>> {
    vec![vec![0.0], vec![2.0, 0.0], vec![5.0, 4.0, 0.0]]
}

/// The seven-item (A to G) reference matrix.
#[must_use]
pub fn seven_items() -> Vec<Vec<f64>> {
    vec![
        vec![0.0],
        vec![2.15, 0.0],
        vec![0.7, 1.53, 0.0],
        vec![1.07, 1.14, 0.43, 0.0],
        vec![0.85, 1.38, 0.21, 0.29, 0.0],
        vec![1.16, 1.01, 0.55, 0.22, 0.41, 0.0],
        vec![1.56, 2.83, 1.86, 2.04, 2.02, 2.05, 0.0],
    ]
}

/// `items` items that are all `distance` apart.
#[must_use]
pub fn uniform(items: usize, distance: f64) -> Vec<Vec<f64>> {
    (0..items)
        .map(|row| {
            let mut cells = vec![distance; row];
            cells.push(0.0);
            cells
        })
        .collect()
}

/// Seeded random distances in `[0.01, 10.0)` rounded to two decimals, so
/// ties occur now and then.
///
/// # Examples
/// ```
/// use agglo_test_support::fixtures::random_lower_triangle;
///
/// let rows = random_lower_triangle(7, 5);
/// assert_eq!(rows.len(), 5);
/// assert_eq!(rows, random_lower_triangle(7, 5));
/// ```
#[must_use]
pub fn random_lower_triangle(seed: u64, items: usize) -> Vec<Vec<f64>> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..items)
        .map(|row| {
            let mut cells: Vec<f64> = (0..row)
                .map(|_| f64::from(rng.gen_range(1_u32..1_000)) / 100.0)
                .collect();
            cells.push(0.0);
            cells
        })
        .collect()
}

/// Expands lower-triangle rows into a full symmetric matrix.
#[must_use]
pub fn to_full(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let size = rows.len();
    let mut full = vec![vec![0.0; size]; size];
    for (i, cells) in rows.iter().enumerate() {
        for (j, &value) in cells.iter().enumerate().take(i) {
            full[i][j] = value;
            full[j][i] = value;
        }
    }
    full
}

/// Renders lower-triangle rows in the text matrix format, one labelled row
/// per line.
#[must_use]
pub fn to_text(labels: &[&str], rows: &[Vec<f64>]) -> String {
    rows.iter()
        .zip(labels)
        .map(|(cells, label)| {
            let values: Vec<String> = cells.iter().map(ToString::to_string).collect();
            format!("{label} {}\n", values.join(" "))
        })
        .collect()
}
