use std::fmt::Display;

use crate::ring::*;
use crate::status::Status;
use crate::truth::Truth;

///
/// A dense matrix of ring elements, stored in row-major order.
///
/// As all containers in this crate, the matrix does not know the ring its
/// entries belong to, so it is passed to every operation that creates or combines
/// entries.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GrMat<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>
}

impl<T: Clone> GrMat<T> {

    ///
    /// Creates the `rows x cols` zero matrix.
    ///
    pub fn zero<R>(rows: usize, cols: usize, ring: R) -> Self
        where R: RingStore,
            R::Type: RingBase<Element = T>
    {
        GrMat { rows, cols, data: (0..(rows * cols)).map(|_| ring.zero()).collect() }
    }

    pub fn identity<R>(n: usize, ring: R) -> Self
        where R: RingStore,
            R::Type: RingBase<Element = T>
    {
        Self::from_fn(n, n, |i, j| if i == j { ring.one() } else { ring.zero() })
    }

    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
        where F: FnMut(usize, usize) -> T
    {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        GrMat { rows, cols, data }
    }

    ///
    /// Creates a matrix from its rows.
    ///
    /// # Panics
    ///
    /// Panics if the rows have different lengths.
    ///
    pub fn from_rows(rows: Vec<Vec<T>>) -> Self {
        let row_count = rows.len();
        let col_count = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(row_count * col_count);
        for row in rows {
            assert_eq!(col_count, row.len(), "all rows must have the same length");
            data.extend(row);
        }
        GrMat { rows: row_count, cols: col_count, data }
    }

    pub fn from_ints<R>(ring: R, rows: &[&[i64]]) -> Self
        where R: RingStore,
            R::Type: RingBase<Element = T>
    {
        Self::from_rows(rows.iter().map(|row| row.iter().map(|x| ring.int(*x)).collect()).collect())
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn col_count(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn at(&self, i: usize, j: usize) -> &T {
        assert!(i < self.rows && j < self.cols, "index ({}, {}) out of range for {}x{} matrix", i, j, self.rows, self.cols);
        &self.data[i * self.cols + j]
    }

    pub fn at_mut(&mut self, i: usize, j: usize) -> &mut T {
        assert!(i < self.rows && j < self.cols, "index ({}, {}) out of range for {}x{} matrix", i, j, self.rows, self.cols);
        &mut self.data[i * self.cols + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: T) {
        *self.at_mut(i, j) = value;
    }

    pub fn row(&self, i: usize) -> &[T] {
        &self.data[(i * self.cols)..((i + 1) * self.cols)]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        &mut self.data[(i * self.cols)..((i + 1) * self.cols)]
    }

    pub fn col(&self, j: usize) -> Vec<T> {
        (0..self.rows).map(|i| self.at(i, j).clone()).collect()
    }

    pub fn swap_rows(&mut self, i: usize, k: usize) {
        if i == k {
            return;
        }
        for j in 0..self.cols {
            self.data.swap(i * self.cols + j, k * self.cols + j);
        }
    }

    pub fn transpose(&self) -> GrMat<T> {
        Self::from_fn(self.cols, self.rows, |i, j| self.at(j, i).clone())
    }

    ///
    /// Returns the submatrix without row `i` and column `j`.
    ///
    pub fn minor(&self, i: usize, j: usize) -> GrMat<T> {
        let rows = (0..self.rows).filter(|k| *k != i).collect::<Vec<_>>();
        let cols = (0..self.cols).filter(|k| *k != j).collect::<Vec<_>>();
        Self::from_fn(rows.len(), cols.len(), |k, l| self.at(rows[k], cols[l]).clone())
    }

    pub fn format<'a, R>(&'a self, ring: R) -> MatrixDisplayWrapper<'a, R>
        where R: RingStore,
            R::Type: RingBase<Element = T>
    {
        MatrixDisplayWrapper { matrix: self, ring }
    }
}

pub struct MatrixDisplayWrapper<'a, R>
    where R: RingStore
{
    matrix: &'a GrMat<El<R>>,
    ring: R
}

impl<'a, R> Display for MatrixDisplayWrapper<'a, R>
    where R: RingStore
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let strings = self.matrix.data.iter().map(|x| format!("{}", self.ring.format(x))).collect::<Vec<_>>();
        let width = strings.iter().map(|s| s.chars().count()).max().unwrap_or(0).max(2);
        for i in 0..self.matrix.rows {
            write!(f, "|")?;
            for j in 0..self.matrix.cols {
                if j > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{:>width$}", strings[i * self.matrix.cols + j], width = width)?;
            }
            if i + 1 != self.matrix.rows {
                writeln!(f, "|")?;
            } else {
                write!(f, "|")?;
            }
        }
        return Ok(());
    }
}

fn assert_same_shape<T>(lhs: &GrMat<T>, rhs: &GrMat<T>) {
    assert!(lhs.rows == rhs.rows && lhs.cols == rhs.cols, "matrix dimensions do not match: {}x{} vs {}x{}", lhs.rows, lhs.cols, rhs.rows, rhs.cols);
}

pub fn mat_add<R>(ring: R, res: &mut GrMat<El<R>>, lhs: &GrMat<El<R>>, rhs: &GrMat<El<R>>) -> Status
    where R: RingStore
{
    assert_same_shape(lhs, rhs);
    let mut status = Status::Success;
    let data = lhs.data.iter().zip(rhs.data.iter()).map(|(l, r)| {
        let mut x = ring.zero();
        status |= ring.add(&mut x, l, r);
        x
    }).collect();
    *res = GrMat { rows: lhs.rows, cols: lhs.cols, data };
    return status;
}

pub fn mat_sub<R>(ring: R, res: &mut GrMat<El<R>>, lhs: &GrMat<El<R>>, rhs: &GrMat<El<R>>) -> Status
    where R: RingStore
{
    assert_same_shape(lhs, rhs);
    let mut status = Status::Success;
    let data = lhs.data.iter().zip(rhs.data.iter()).map(|(l, r)| {
        let mut x = ring.zero();
        status |= ring.sub(&mut x, l, r);
        x
    }).collect();
    *res = GrMat { rows: lhs.rows, cols: lhs.cols, data };
    return status;
}

pub fn mat_neg<R>(ring: R, res: &mut GrMat<El<R>>, value: &GrMat<El<R>>) -> Status
    where R: RingStore
{
    let mut result = value.clone();
    let status = result.data.iter_mut().map(|x| ring.neg_inplace(x)).sum();
    *res = result;
    return status;
}

pub fn mat_scalar_mul<R>(ring: R, res: &mut GrMat<El<R>>, value: &GrMat<El<R>>, scalar: &El<R>) -> Status
    where R: RingStore
{
    let mut result = value.clone();
    let status = result.data.iter_mut().map(|x| ring.mul_assign(x, scalar)).sum();
    *res = result;
    return status;
}

///
/// Returns whether the matrices are equal. Matrices of different shape are never
/// equal.
///
pub fn mat_equal<R>(ring: R, lhs: &GrMat<El<R>>, rhs: &GrMat<El<R>>) -> Truth
    where R: RingStore
{
    if lhs.rows != rhs.rows || lhs.cols != rhs.cols {
        return Truth::False;
    }
    Truth::all(lhs.data.iter().zip(rhs.data.iter()).map(|(l, r)| ring.equal(l, r)))
}

pub fn mat_is_zero<R>(ring: R, mat: &GrMat<El<R>>) -> Truth
    where R: RingStore
{
    Truth::all(mat.data.iter().map(|x| ring.is_zero(x)))
}

pub fn mat_is_one<R>(ring: R, mat: &GrMat<El<R>>) -> Truth
    where R: RingStore
{
    if !mat.is_square() {
        return Truth::False;
    }
    Truth::all((0..mat.rows).flat_map(|i| (0..mat.cols).map(move |j| (i, j))).map(|(i, j)| if i == j {
        ring.is_one(mat.at(i, j))
    } else {
        ring.is_zero(mat.at(i, j))
    }))
}

#[cfg(test)]
use crate::rings::integer::ZZ;
#[cfg(test)]
use crate::rings::ball::RealBallField;

#[test]
fn test_transpose_and_minor() {
    let a = GrMat::from_ints(&ZZ, &[&[1, 2, 3], &[4, 5, 6]]);
    let t = a.transpose();
    assert_eq!(3, t.row_count());
    assert_el_eq!(&ZZ, ZZ.int(6), t.at(2, 1));
    let m = GrMat::from_ints(&ZZ, &[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9]]).minor(1, 0);
    assert!(mat_equal(&ZZ, &m, &GrMat::from_ints(&ZZ, &[&[2, 3], &[8, 9]])).is_true());
}

#[test]
fn test_mat_add_sub() {
    let a = GrMat::from_ints(&ZZ, &[&[1, 2], &[3, 4]]);
    let mut b = GrMat::identity(2, &ZZ);
    assert!(mat_is_one(&ZZ, &b).is_true());
    mat_add(&ZZ, &mut b, &a, &a).must_succeed();
    assert!(mat_equal(&ZZ, &b, &GrMat::from_ints(&ZZ, &[&[2, 4], &[6, 8]])).is_true());
    let b_copy = b.clone();
    mat_sub(&ZZ, &mut b, &b_copy, &a).must_succeed();
    assert!(mat_equal(&ZZ, &b, &a).is_true());
    mat_sub(&ZZ, &mut b, &a, &a).must_succeed();
    assert!(mat_is_zero(&ZZ, &b).is_true());
    assert_eq!(Truth::False, mat_equal(&ZZ, &a, &GrMat::zero(2, 3, &ZZ)));
}

#[test]
fn test_mat_equal_unknown() {
    let RR = RealBallField::new();
    let a = GrMat::from_rows(vec![vec![RR.int(1), RR.get_ring().ball(0.0, 0.1)]]);
    let b = GrMat::from_rows(vec![vec![RR.int(1), RR.zero()]]);
    assert_eq!(Truth::Unknown, mat_equal(&RR, &a, &b));
    let c = GrMat::from_rows(vec![vec![RR.int(2), RR.zero()]]);
    assert_eq!(Truth::False, mat_equal(&RR, &a, &c));
}

#[test]
fn test_format() {
    let a = GrMat::from_ints(&ZZ, &[&[1, -2], &[3, 4]]);
    assert_eq!("| 1,-2|\n| 3, 4|", format!("{}", a.format(&ZZ)));
}
