//! Selections of the part of a variable to decode
//!
//! A selection holds one [`Extent`] per dimension of the variable,
//! outermost dimension first. Selections are resolved against the
//! lengths of the dimensions to a start and a count per dimension,
//! the form used by [`data::filtered`](crate::data::filtered).

use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

use crate::error;

/// Selection along a single dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    /// A single position
    Index(usize),
    /// Everything from `start` to the end of the dimension
    Tail {
        /// First position
        start: usize,
    },
    /// Positions `start..end`
    Range {
        /// First position
        start: usize,
        /// One past the last position
        end: usize,
    },
    /// `length` positions from `start`
    Span {
        /// First position
        start: usize,
        /// Number of positions
        length: usize,
    },
}

impl Extent {
    /// First position and number of positions in a dimension of `len`
    fn resolve(self, len: usize) -> (usize, usize) {
        match self {
            Self::Index(start) => (start, 1),
            Self::Tail { start } => (start, len.saturating_sub(start)),
            Self::Range { start, end } => (start, end.saturating_sub(start)),
            Self::Span { start, length } => (start, length),
        }
    }
}

macro_rules! extent_from {
    ($from: ty, |$x: ident| $body: expr) => {
        impl From<$from> for Extent {
            fn from($x: $from) -> Self {
                $body
            }
        }
        impl From<&$from> for Extent {
            fn from($x: &$from) -> Self {
                let $x = $x.clone();
                $body
            }
        }
    };
}

impl From<&Self> for Extent {
    fn from(e: &Self) -> Self {
        *e
    }
}

extent_from!(usize, |i| Self::Index(i));
extent_from!(RangeFull, |_r| Self::Tail { start: 0 });
extent_from!(RangeFrom<usize>, |r| Self::Tail { start: r.start });
extent_from!(Range<usize>, |r| Self::Range {
    start: r.start,
    end: r.end
});
extent_from!(RangeTo<usize>, |r| Self::Range {
    start: 0,
    end: r.end
});
extent_from!(RangeToInclusive<usize>, |r| Self::Range {
    start: 0,
    end: r.end + 1
});
extent_from!(RangeInclusive<usize>, |r| Self::Range {
    start: *r.start(),
    end: *r.end() + 1
});

/// Selection of a part of a variable
///
/// ```rust
/// use netcdf3::extent::{Extent, Extents};
/// // The whole variable
/// let _: Extents = (..).into();
/// // Rows 0 to 9 and columns 0 and 1
/// let _: Extents = [..10, ..2].into();
/// // Arrays need one kind of range, tuples can mix them
/// let _: Extents = (1..10, 2..=100, 4).try_into().unwrap();
/// // Spans given directly
/// let _: Extents = [Extent::Span { start: 0, length: 10 }, (5..).into()].into();
/// // A start array and a count array
/// let _: Extents = (&[1, 2, 3], &[3, 2, 1]).try_into().unwrap();
/// // Or a flat list of (start, length) pairs
/// let _ = Extents::from_start_length(&[14, 5, 0, 3], 2).unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Extents {
    /// The whole variable
    #[default]
    All,
    /// One extent per dimension
    Dims(Vec<Extent>),
}

impl From<RangeFull> for Extents {
    fn from(_: RangeFull) -> Self {
        Self::All
    }
}

impl From<()> for Extents {
    fn from(_: ()) -> Self {
        Self::Dims(Vec::new())
    }
}

impl From<&Self> for Extents {
    fn from(extents: &Self) -> Self {
        extents.clone()
    }
}

macro_rules! extents_from_list {
    ($($item: ty),* $(,)?) => {$(
        impl From<&'_ [$item]> for Extents {
            fn from(items: &[$item]) -> Self {
                Self::Dims(items.iter().map(Extent::from).collect())
            }
        }
        impl From<Vec<$item>> for Extents {
            fn from(items: Vec<$item>) -> Self {
                Self::from(items.as_slice())
            }
        }
        impl<const N: usize> From<[$item; N]> for Extents {
            fn from(items: [$item; N]) -> Self {
                Self::from(items.as_slice())
            }
        }
        impl<const N: usize> From<&[$item; N]> for Extents {
            fn from(items: &[$item; N]) -> Self {
                Self::from(items.as_slice())
            }
        }
    )*};
}

extents_from_list!(
    Extent,
    usize,
    RangeFull,
    RangeFrom<usize>,
    Range<usize>,
    RangeTo<usize>,
    RangeToInclusive<usize>,
    RangeInclusive<usize>,
);

// A single extent selects along a variable of one dimension
macro_rules! extents_from_single {
    ($($item: ty),* $(,)?) => {$(
        impl From<$item> for Extents {
            fn from(item: $item) -> Self {
                Self::Dims(vec![item.into()])
            }
        }
        impl From<&$item> for Extents {
            fn from(item: &$item) -> Self {
                Self::Dims(vec![item.into()])
            }
        }
    )*};
}

extents_from_single!(
    usize,
    RangeFrom<usize>,
    Range<usize>,
    RangeTo<usize>,
    RangeToInclusive<usize>,
    RangeInclusive<usize>,
);

fn to_extent<E>(e: E) -> error::Result<Extent>
where
    E: TryInto<Extent>,
    E::Error: Into<error::Error>,
{
    e.try_into().map_err(Into::into)
}

macro_rules! extents_from_tuple {
    () => {};
    ($first: ident $(, $rest: ident)*) => {
        #[allow(non_snake_case)]
        impl<$first $(, $rest)*> TryFrom<($first, $($rest,)*)> for Extents
        where
            $first: TryInto<Extent>,
            $first::Error: Into<error::Error>,
            $($rest: TryInto<Extent>, $rest::Error: Into<error::Error>,)*
        {
            type Error = error::Error;
            fn try_from(($first, $($rest,)*): ($first, $($rest,)*)) -> error::Result<Self> {
                Ok(Self::Dims(vec![to_extent($first)? $(, to_extent($rest)?)*]))
            }
        }
        extents_from_tuple!($($rest),*);
    };
}

extents_from_tuple!(A, B, C, D, E, F, G, H, I, J);

fn spans(start: &[usize], count: &[usize]) -> error::Result<Extents> {
    if start.len() != count.len() {
        return Err(format!(
            "{} starts given with {} counts",
            start.len(),
            count.len()
        )
        .into());
    }
    Ok(Extents::Dims(
        start
            .iter()
            .zip(count)
            .map(|(&start, &length)| Extent::Span { start, length })
            .collect(),
    ))
}

impl TryFrom<(&[usize], &[usize])> for Extents {
    type Error = error::Error;
    fn try_from((start, count): (&[usize], &[usize])) -> error::Result<Self> {
        spans(start, count)
    }
}

impl TryFrom<(Vec<usize>, Vec<usize>)> for Extents {
    type Error = error::Error;
    fn try_from((start, count): (Vec<usize>, Vec<usize>)) -> error::Result<Self> {
        spans(&start, &count)
    }
}

impl<const N: usize> TryFrom<([usize; N], [usize; N])> for Extents {
    type Error = error::Error;
    fn try_from((start, count): ([usize; N], [usize; N])) -> error::Result<Self> {
        spans(&start, &count)
    }
}

impl<const N: usize> TryFrom<(&[usize; N], &[usize; N])> for Extents {
    type Error = error::Error;
    fn try_from((start, count): (&[usize; N], &[usize; N])) -> error::Result<Self> {
        spans(start, count)
    }
}

pub(crate) type StartCount = (Vec<usize>, Vec<usize>);

impl Extents {
    /// Selection from a flat list of `(start, length)` pairs,
    /// one pair per dimension, outermost first
    pub fn from_start_length(values: &[i64], ndims: usize) -> error::Result<Self> {
        if values.len() != 2 * ndims {
            return Err(error::Error::InsufficientFilter {
                wanted: 2 * ndims,
                actual: values.len(),
            });
        }
        let mut dims = Vec::with_capacity(ndims);
        for pair in values.chunks_exact(2) {
            let [start, length] = [pair[0], pair[1]].map(|v| {
                usize::try_from(v).map_err(|_| {
                    error::Error::InvalidFilterValues(format!("{v} is not a valid index"))
                })
            });
            dims.push(Extent::Span {
                start: start?,
                length: length?,
            });
        }
        Ok(Self::Dims(dims))
    }

    /// Start and count along each dimension, given the length of
    /// every dimension
    pub(crate) fn start_count(&self, dims: &[usize]) -> error::Result<StartCount> {
        let extents = match self {
            Self::All => return Ok((vec![0; dims.len()], dims.to_vec())),
            Self::Dims(extents) => extents,
        };
        if extents.len() != dims.len() {
            return Err(error::Error::DimensionMismatch {
                wanted: dims.len(),
                actual: extents.len(),
            });
        }

        let mut start = Vec::with_capacity(dims.len());
        let mut count = Vec::with_capacity(dims.len());
        for (i, (&len, e)) in dims.iter().zip(extents).enumerate() {
            let (s, c) = e.resolve(len);
            match s.checked_add(c) {
                Some(end) if s <= len && end <= len => {
                    start.push(s);
                    count.push(c);
                }
                _ => {
                    return Err(error::Error::InvalidFilterValues(format!(
                        "dimension {i} has length {len}, {c} values from {s} requested"
                    )))
                }
            }
        }
        Ok((start, count))
    }
}

#[cfg(feature = "ndarray")]
mod ndarray_impl {
    use super::*;
    use ndarray::{Dimension, SliceInfo, SliceInfoElem};

    fn index(i: isize) -> error::Result<usize> {
        usize::try_from(i).map_err(|_| format!("Negative index {i} in slice").into())
    }

    fn extent(elem: SliceInfoElem) -> error::Result<Extent> {
        match elem {
            SliceInfoElem::Index(i) => Ok(Extent::Index(index(i)?)),
            SliceInfoElem::Slice { step, .. } if step != 1 => {
                Err("Strides are not supported".into())
            }
            SliceInfoElem::Slice {
                start,
                end: Some(end),
                ..
            } => Ok(Extent::Range {
                start: index(start)?,
                end: index(end)?,
            }),
            SliceInfoElem::Slice {
                start, end: None, ..
            } => Ok(Extent::Tail {
                start: index(start)?,
            }),
            SliceInfoElem::NewAxis => Err("New axes can not be read from a file".into()),
        }
    }

    impl<T, Din: Dimension, Dout: Dimension> TryFrom<&'_ SliceInfo<T, Din, Dout>> for Extents
    where
        T: AsRef<[SliceInfoElem]>,
    {
        type Error = error::Error;
        fn try_from(info: &SliceInfo<T, Din, Dout>) -> error::Result<Self> {
            let elems: &[SliceInfoElem] = info.as_ref();
            elems
                .iter()
                .map(|&e| extent(e))
                .collect::<error::Result<_>>()
                .map(Self::Dims)
        }
    }

    impl<T, Din: Dimension, Dout: Dimension> TryFrom<SliceInfo<T, Din, Dout>> for Extents
    where
        T: AsRef<[SliceInfoElem]>,
    {
        type Error = error::Error;
        fn try_from(info: SliceInfo<T, Din, Dout>) -> error::Result<Self> {
            Self::try_from(&info)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn take_extents<E>(e: E) -> error::Result<Extents>
    where
        E: TryInto<Extents>,
        E::Error: Into<error::Error>,
    {
        e.try_into().map_err(|e| e.into())
    }

    #[test]
    fn conversions() -> error::Result<()> {
        assert_eq!(take_extents(..)?, Extents::All);
        assert_eq!(take_extents(())?, Extents::Dims(vec![]));

        assert_eq!(take_extents(3)?, Extents::Dims(vec![Extent::Index(3)]));
        assert_eq!(
            take_extents(1..)?,
            Extents::Dims(vec![Extent::Tail { start: 1 }])
        );
        assert_eq!(
            take_extents(4..=5)?,
            Extents::Dims(vec![Extent::Range { start: 4, end: 6 }])
        );
        let _ = take_extents(..5)?;
        let _ = take_extents(..=5)?;

        let _ = take_extents([.., ..])?;
        let _ = take_extents([1, 2])?;
        let _ = take_extents([1..5, 2..6])?;
        let _ = take_extents([..=5, ..=6].as_slice())?;
        let _ = take_extents(vec![4..=5, 5..=6])?;

        assert_eq!(
            take_extents((2_usize, 1_usize..10, ..))?,
            Extents::Dims(vec![
                Extent::Index(2),
                Extent::Range { start: 1, end: 10 },
                Extent::Tail { start: 0 },
            ])
        );

        #[cfg(feature = "ndarray")]
        {
            assert_eq!(
                take_extents(ndarray::s![2.., 4])?,
                Extents::Dims(vec![Extent::Tail { start: 2 }, Extent::Index(4)])
            );
            assert!(take_extents(ndarray::s![2..;4, 4]).is_err());
            assert!(take_extents(ndarray::s![-1, ..]).is_err());
        }

        let spans = Extents::Dims(vec![
            Extent::Span {
                start: 1,
                length: 3,
            },
            Extent::Span {
                start: 2,
                length: 4,
            },
        ]);
        assert_eq!(take_extents(([1, 2], [3, 4]))?, spans);
        assert_eq!(take_extents(([1, 2].as_slice(), [3, 4].as_slice()))?, spans);
        assert_eq!(take_extents((&[1, 2], &[3, 4]))?, spans);
        assert_eq!(take_extents((vec![1, 2], vec![3, 4]))?, spans);
        assert!(take_extents((vec![1, 2], vec![3])).is_err());

        let e: Extents = (..).into();
        let _ = take_extents(&e)?;
        let _ = take_extents(e)?;

        Ok(())
    }

    #[test]
    fn resolve_against_dimensions() {
        let dims = [350, 6];
        let (start, count) = Extents::All.start_count(&dims).unwrap();
        assert_eq!(start, vec![0, 0]);
        assert_eq!(count, vec![350, 6]);

        let e = take_extents((14_usize, 2_usize..)).unwrap();
        assert_eq!(e.start_count(&dims).unwrap(), (vec![14, 2], vec![1, 4]));

        let e = take_extents((..=3_usize, 1_usize..3)).unwrap();
        assert_eq!(e.start_count(&dims).unwrap(), (vec![0, 1], vec![4, 2]));

        let e = take_extents(1).unwrap();
        assert_eq!(
            e.start_count(&dims).unwrap_err(),
            error::Error::DimensionMismatch {
                wanted: 2,
                actual: 1
            }
        );

        let e = take_extents((349_usize, 4_usize..7)).unwrap();
        assert!(matches!(
            e.start_count(&dims),
            Err(error::Error::InvalidFilterValues(_))
        ));
        let e = take_extents((350_usize, ..)).unwrap();
        assert!(matches!(
            e.start_count(&dims),
            Err(error::Error::InvalidFilterValues(_))
        ));
    }

    #[test]
    fn flat_start_length() {
        let e = Extents::from_start_length(&[14, 5, 0, 3], 2).unwrap();
        assert_eq!(
            e,
            Extents::Dims(vec![
                Extent::Span {
                    start: 14,
                    length: 5
                },
                Extent::Span {
                    start: 0,
                    length: 3
                },
            ])
        );
        assert_eq!(
            Extents::from_start_length(&[14, 5], 2).unwrap_err(),
            error::Error::InsufficientFilter {
                wanted: 4,
                actual: 2
            }
        );
        assert!(matches!(
            Extents::from_start_length(&[0, -1, 0, 1], 2),
            Err(error::Error::InvalidFilterValues(_))
        ));
        assert_eq!(
            Extents::from_start_length(&[], 0).unwrap(),
            Extents::Dims(vec![])
        );
    }
}
