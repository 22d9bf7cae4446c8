use super::{Rect, TLBR};
use crate::common::*;

/// Bounding box in TLHW (size) format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TLHW<T> {
    pub(crate) t: T,
    pub(crate) l: T,
    pub(crate) h: T,
    pub(crate) w: T,
}

impl<T> TLHW<T> {
    pub fn try_cast<V>(self) -> Option<TLHW<V>>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        Some(TLHW {
            t: V::from(self.t)?,
            l: V::from(self.l)?,
            h: V::from(self.h)?,
            w: V::from(self.w)?,
        })
    }

    pub fn cast<V>(self) -> TLHW<V>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        self.try_cast().unwrap()
    }
}

impl<T> Rect for TLHW<T>
where
    T: Copy + Num + PartialOrd,
{
    type Type = T;

    fn t(&self) -> Self::Type {
        self.t
    }

    fn l(&self) -> Self::Type {
        self.l
    }

    fn b(&self) -> Self::Type {
        self.t + self.h
    }

    fn r(&self) -> Self::Type {
        self.l + self.w
    }

    fn h(&self) -> Self::Type {
        self.h
    }

    fn w(&self) -> Self::Type {
        self.w
    }

    fn try_from_tlbr(tlbr: [Self::Type; 4]) -> Result<Self> {
        let [t, l, b, r] = tlbr;
        ensure!(b >= t && r >= l, "b >= t and r >= l must hold");

        Ok(Self {
            t,
            l,
            h: b - t,
            w: r - l,
        })
    }

    fn try_from_tlhw(tlhw: [Self::Type; 4]) -> Result<Self> {
        let [t, l, h, w] = tlhw;
        let zero = T::zero();
        ensure!(h >= zero && w >= zero, "h and w must be non-negative");

        Ok(Self { t, l, h, w })
    }
}

impl<T> From<TLBR<T>> for TLHW<T>
where
    T: Copy + Num + PartialOrd,
{
    fn from(from: TLBR<T>) -> Self {
        Self::from(&from)
    }
}

impl<T> From<&TLBR<T>> for TLHW<T>
where
    T: Copy + Num + PartialOrd,
{
    fn from(from: &TLBR<T>) -> Self {
        let TLBR { t, l, b, r } = *from;
        Self {
            t,
            l,
            h: b - t,
            w: r - l,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RectNum;

    #[test]
    fn tlhw_rejects_negative_extent() {
        assert!(TLHW::try_from_tlhw([0, 0, -1, 5]).is_err());
    }

    #[test]
    fn corner_size_round_trip_is_exact() {
        let orig = TLHW::from_tlhw([7i64, 13, 20, 31]);
        let back: TLHW<i64> = TLBR::from(&orig).into();
        assert_eq!(orig, back);

        let corners = TLBR::from_tlbr([3i64, 4, 9, 24]);
        let round: TLBR<i64> = TLHW::from(&corners).into();
        assert_eq!(corners, round);
    }

    #[test]
    fn float_to_int_cast_truncates() {
        let rect = TLHW::from_tlhw([1.9f64, 2.2, 10.7, 20.3]);
        let cast = rect.cast::<i64>();
        assert_eq!(cast.tlhw(), [1, 2, 10, 20]);
    }
}
