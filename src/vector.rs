use std::ops::{Deref, DerefMut};

use crate::ring::*;
use crate::status::Status;
use crate::truth::Truth;

///
/// An owned, resizable sequence of ring elements.
///
/// The elements can only be interpreted together with the ring they belong to,
/// which is passed explicitly to all operations that create or combine elements.
/// Dereferences to a slice of elements, so that all slice-based vector operations
/// in this module apply.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GrVec<T> {
    data: Vec<T>
}

impl<T> GrVec<T> {

    pub const fn new() -> Self {
        GrVec { data: Vec::new() }
    }

    pub fn from_vec(data: Vec<T>) -> Self {
        GrVec { data }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    ///
    /// Ensures that the vector has space for at least `n` elements, without
    /// changing its length. Growth is geometric, so repeated calls with slowly
    /// increasing `n` are amortized.
    ///
    pub fn fit_capacity(&mut self, n: usize) {
        let capacity = self.data.capacity();
        if n > capacity {
            let target = std::cmp::max(n, 2 * capacity);
            self.data.reserve_exact(target - self.data.len());
        }
    }

    ///
    /// Sets the length of the vector. Newly added entries are zero; when shrinking,
    /// the excluded tail is dropped, so a later growth can never expose old values.
    ///
    pub fn set_length<R>(&mut self, n: usize, ring: R)
        where R: RingStore,
            R::Type: RingBase<Element = T>
    {
        if n <= self.data.len() {
            self.data.truncate(n);
        } else {
            self.fit_capacity(n);
            self.data.resize_with(n, || ring.zero());
        }
    }

    ///
    /// Shortens the vector to `n` elements. Does nothing if `n >= self.len()`.
    ///
    pub fn truncate(&mut self, n: usize) {
        self.data.truncate(n);
    }

    pub fn push(&mut self, value: T) {
        self.data.push(value);
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl<T> Default for GrVec<T> {

    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for GrVec<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T> DerefMut for GrVec<T> {

    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T> FromIterator<T> for GrVec<T> {

    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        GrVec { data: iter.into_iter().collect() }
    }
}

impl<T> From<Vec<T>> for GrVec<T> {

    fn from(data: Vec<T>) -> Self {
        GrVec { data }
    }
}

pub fn vec_zero<R>(ring: R, res: &mut [El<R>])
    where R: RingStore
{
    for x in res.iter_mut() {
        *x = ring.zero();
    }
}

pub fn vec_add<R>(ring: R, res: &mut [El<R>], lhs: &[El<R>], rhs: &[El<R>]) -> Status
    where R: RingStore
{
    assert_eq!(res.len(), lhs.len());
    assert_eq!(res.len(), rhs.len());
    let mut status = Status::Success;
    for i in 0..res.len() {
        status |= ring.add(&mut res[i], &lhs[i], &rhs[i]);
    }
    return status;
}

pub fn vec_sub<R>(ring: R, res: &mut [El<R>], lhs: &[El<R>], rhs: &[El<R>]) -> Status
    where R: RingStore
{
    assert_eq!(res.len(), lhs.len());
    assert_eq!(res.len(), rhs.len());
    let mut status = Status::Success;
    for i in 0..res.len() {
        status |= ring.sub(&mut res[i], &lhs[i], &rhs[i]);
    }
    return status;
}

pub fn vec_add_assign<R>(ring: R, lhs: &mut [El<R>], rhs: &[El<R>]) -> Status
    where R: RingStore
{
    assert_eq!(lhs.len(), rhs.len());
    lhs.iter_mut().zip(rhs.iter()).map(|(l, r)| ring.add_assign(l, r)).sum()
}

pub fn vec_sub_assign<R>(ring: R, lhs: &mut [El<R>], rhs: &[El<R>]) -> Status
    where R: RingStore
{
    assert_eq!(lhs.len(), rhs.len());
    lhs.iter_mut().zip(rhs.iter()).map(|(l, r)| ring.sub_assign(l, r)).sum()
}

pub fn vec_neg_inplace<R>(ring: R, values: &mut [El<R>]) -> Status
    where R: RingStore
{
    values.iter_mut().map(|x| ring.neg_inplace(x)).sum()
}

pub fn vec_scalar_mul<R>(ring: R, res: &mut [El<R>], values: &[El<R>], scalar: &El<R>) -> Status
    where R: RingStore
{
    assert_eq!(res.len(), values.len());
    let mut status = Status::Success;
    for i in 0..res.len() {
        status |= ring.mul(&mut res[i], &values[i], scalar);
    }
    return status;
}

pub fn vec_scalar_mul_inplace<R>(ring: R, values: &mut [El<R>], scalar: &El<R>) -> Status
    where R: RingStore
{
    values.iter_mut().map(|x| ring.mul_assign(x, scalar)).sum()
}

///
/// Computes `res[i] += values[i] * scalar`.
///
pub fn vec_scalar_addmul<R>(ring: R, res: &mut [El<R>], values: &[El<R>], scalar: &El<R>) -> Status
    where R: RingStore
{
    assert_eq!(res.len(), values.len());
    res.iter_mut().zip(values.iter()).map(|(r, v)| ring.addmul(r, v, scalar)).sum()
}

///
/// Computes `res[i] -= values[i] * scalar`.
///
pub fn vec_scalar_submul<R>(ring: R, res: &mut [El<R>], values: &[El<R>], scalar: &El<R>) -> Status
    where R: RingStore
{
    assert_eq!(res.len(), values.len());
    res.iter_mut().zip(values.iter()).map(|(r, v)| ring.submul(r, v, scalar)).sum()
}

pub fn vec_dot<R>(ring: R, res: &mut El<R>, lhs: &[El<R>], rhs: &[El<R>]) -> Status
    where R: RingStore
{
    ring.dot(res, None, lhs, rhs)
}

pub fn vec_is_zero<R>(ring: R, values: &[El<R>]) -> Truth
    where R: RingStore
{
    Truth::all(values.iter().map(|x| ring.is_zero(x)))
}

pub fn vec_equal<R>(ring: R, lhs: &[El<R>], rhs: &[El<R>]) -> Truth
    where R: RingStore
{
    assert_eq!(lhs.len(), rhs.len());
    Truth::all(lhs.iter().zip(rhs.iter()).map(|(l, r)| ring.equal(l, r)))
}

///
/// Returns the length of `values` after removing all trailing entries that are
/// provably zero. Entries whose zero-ness is unknown are kept.
///
pub fn vec_normalized_len<R>(ring: R, values: &[El<R>]) -> usize
    where R: RingStore
{
    let mut len = values.len();
    while len > 0 && ring.is_zero(&values[len - 1]).is_true() {
        len -= 1;
    }
    return len;
}

#[cfg(test)]
use crate::rings::integer::ZZ;
#[cfg(test)]
use crate::rings::ball::RealBallField;

#[test]
fn test_set_length_zeroes_tail() {
    let mut v = GrVec::from_vec(vec![ZZ.int(1), ZZ.int(2), ZZ.int(3)]);
    v.set_length(1, &ZZ);
    assert_eq!(1, v.len());
    v.set_length(3, &ZZ);
    assert_el_eq!(&ZZ, ZZ.int(1), v[0]);
    assert!(ZZ.is_zero(&v[1]).is_true());
    assert!(ZZ.is_zero(&v[2]).is_true());
}

#[test]
fn test_fit_capacity_geometric() {
    let mut v: GrVec<i64> = GrVec::new();
    v.fit_capacity(10);
    assert!(v.capacity() >= 10);
    let before = v.capacity();
    v.fit_capacity(before + 1);
    assert!(v.capacity() >= 2 * before);
    assert_eq!(0, v.len());
}

#[test]
fn test_vec_arithmetic() {
    let a = [ZZ.int(1), ZZ.int(2), ZZ.int(3)];
    let b = [ZZ.int(4), ZZ.int(5), ZZ.int(6)];
    let mut res = [ZZ.zero(), ZZ.zero(), ZZ.zero()];
    vec_add(&ZZ, &mut res, &a, &b).must_succeed();
    assert!(vec_equal(&ZZ, &res, &[ZZ.int(5), ZZ.int(7), ZZ.int(9)]).is_true());
    vec_sub_assign(&ZZ, &mut res, &b).must_succeed();
    assert!(vec_equal(&ZZ, &res, &a).is_true());
    let mut dot = ZZ.zero();
    vec_dot(&ZZ, &mut dot, &a, &b).must_succeed();
    assert_el_eq!(&ZZ, ZZ.int(32), dot);
    vec_scalar_submul(&ZZ, &mut res, &a, &ZZ.one()).must_succeed();
    assert!(vec_is_zero(&ZZ, &res).is_true());
}

#[test]
fn test_normalized_len_keeps_unknown() {
    let RR = RealBallField::new();
    let values = [RR.int(1), RR.get_ring().ball(0., 0.5), RR.zero(), RR.zero()];
    assert_eq!(2, vec_normalized_len(&RR, &values));
    assert_eq!(Truth::Unknown, vec_is_zero(&RR, &values[1..]));
}
