//! # ETC matrix
//! An *Estimated Time to Compute* matrix stores the expected running time of every task on every
//! resource. Rows are tasks, columns are resources, i.e. `m[(j, i)]` is the time task `j` takes
//! when it runs on resource `i`.
//!
//! An [EtcMatrix] is validated once on construction (rectangular, at least one task and one
//! resource, finite non-negative entries) and is immutable afterwards. Solvers that need to modify
//! entries during a reduction work on a private [working copy](EtcMatrix::working_copy).
use std::fmt;
use std::ops::Index;

use num_traits::Float;
use serde::de::{Deserialize, Deserializer, Error as _};
use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::error::{MatrixDefect, Result};

/// Rectangular task x resource table of non-negative running times (row-major).
#[derive(Clone, PartialEq)]
pub struct EtcMatrix<T> {
    data: Vec<T>,
    num_tasks: usize,
    num_resources: usize,
}

impl<T: Float> EtcMatrix<T> {
    /// Build a matrix from a vector of rows (see [from_rows](EtcMatrix::from_rows)).
    pub fn new(rows: Vec<Vec<T>>) -> Result<Self> {
        Self::from_rows(rows)
    }

    /// Build a matrix from any sequence of rows.
    ///
    /// Fails with [MalformedMatrix](crate::Error::MalformedMatrix) if there are no rows, the first
    /// row is empty, rows differ in length or any entry is negative or NaN.
    ///
    /// # Example
    /// ```
    /// # extern crate taskmatch;
    /// use taskmatch::EtcMatrix;
    ///
    /// let m = EtcMatrix::<f64>::from_rows([[2., 9.], [6., 1.]]).expect("valid matrix");
    /// assert_eq!((m.num_tasks(), m.num_resources()), (2, 2));
    /// assert_eq!(m[(1, 0)], 6.);
    ///
    /// assert!(EtcMatrix::<f64>::from_rows([vec![1., 2.], vec![3.]]).is_err());
    /// ```
    pub fn from_rows<I, R>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[T]>,
    {
        let mut data = Vec::new();
        let mut num_tasks = 0;
        let mut num_resources = 0;

        for (j, row) in rows.into_iter().enumerate() {
            let row = row.as_ref();

            if j == 0 {
                if row.is_empty() {
                    return Err(MatrixDefect::NoResources.into());
                }
                num_resources = row.len();
            } else if row.len() != num_resources {
                return Err(MatrixDefect::Ragged {
                    row: j,
                    expected: num_resources,
                    found: row.len(),
                }
                .into());
            }

            // NaN fails this comparison as well
            if let Some(i) = row.iter().position(|&x| !(x >= T::zero()) || x.is_infinite()) {
                return Err(MatrixDefect::InvalidEntry { row: j, col: i }.into());
            }

            data.extend_from_slice(row);
            num_tasks += 1;
        }

        if num_tasks == 0 {
            return Err(MatrixDefect::NoTasks.into());
        }

        Ok(Self {
            data,
            num_tasks,
            num_resources,
        })
    }
}

impl<T> EtcMatrix<T> {
    #[inline]
    pub fn num_tasks(&self) -> usize {
        self.num_tasks
    }

    #[inline]
    pub fn num_resources(&self) -> usize {
        self.num_resources
    }

    /// `true` iff there are as many tasks as resources.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.num_tasks == self.num_resources
    }

    /// Running times of task `j` on each resource.
    ///
    /// # Panics
    /// If `j` is not a valid task index.
    #[inline]
    pub fn row(&self, j: usize) -> &[T] {
        let start = j * self.num_resources;
        &self.data[start..start + self.num_resources]
    }

    /// Iterate rows in task order.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.data.chunks_exact(self.num_resources)
    }

    /// Flat row-major copy of all entries, used by reductions that fold loads into the matrix.
    pub(crate) fn working_copy(&self) -> Vec<T>
    where
        T: Copy,
    {
        self.data.clone()
    }

    /// Copy the matrix back into nested rows.
    pub fn to_rows(&self) -> Vec<Vec<T>>
    where
        T: Copy,
    {
        self.rows().map(<[T]>::to_vec).collect()
    }
}

/// `m[(task, resource)]`
///
/// Panics if either index is out of range. In particular a resource index equal to or larger than
/// [num_resources](EtcMatrix::num_resources) never wraps into the next row.
impl<T> Index<(usize, usize)> for EtcMatrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (task, resource): (usize, usize)) -> &T {
        &self.row(task)[resource]
    }
}

impl<T: fmt::Debug> fmt::Debug for EtcMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows()).finish()
    }
}

impl<T: Float> TryFrom<Vec<Vec<T>>> for EtcMatrix<T> {
    type Error = crate::Error;

    fn try_from(rows: Vec<Vec<T>>) -> Result<Self> {
        Self::new(rows)
    }
}

/// Serialized as a sequence of rows, e.g. `[[2.0, 9.0], [6.0, 1.0]]` in JSON.
impl<T: Serialize> Serialize for EtcMatrix<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.num_tasks))?;
        for row in self.rows() {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

/// Deserialization runs the same validation as [EtcMatrix::new].
impl<'de, T> Deserialize<'de> for EtcMatrix<T>
where
    T: Float + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let rows = Vec::<Vec<T>>::deserialize(deserializer)?;
        Self::new(rows).map_err(D::Error::custom)
    }
}
