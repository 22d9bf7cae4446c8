use super::{Rect, TLHW};
use crate::common::*;

/// Bounding box in TLBR (corner) format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TLBR<T> {
    pub(crate) t: T,
    pub(crate) l: T,
    pub(crate) b: T,
    pub(crate) r: T,
}

impl<T> TLBR<T> {
    pub fn try_cast<V>(self) -> Option<TLBR<V>>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        Some(TLBR {
            t: V::from(self.t)?,
            l: V::from(self.l)?,
            b: V::from(self.b)?,
            r: V::from(self.r)?,
        })
    }

    pub fn cast<V>(self) -> TLBR<V>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        self.try_cast().unwrap()
    }
}

impl<T> Rect for TLBR<T>
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
        self.b
    }

    fn r(&self) -> Self::Type {
        self.r
    }

    fn h(&self) -> Self::Type {
        self.b - self.t
    }

    fn w(&self) -> Self::Type {
        self.r - self.l
    }

    fn try_from_tlbr(tlbr: [Self::Type; 4]) -> Result<Self> {
        let [t, l, b, r] = tlbr;
        ensure!(b >= t && r >= l, "b >= t and r >= l must hold");

        Ok(Self { t, l, b, r })
    }

    fn try_from_tlhw(tlhw: [Self::Type; 4]) -> Result<Self> {
        let [t, l, h, w] = tlhw;
        let b = t + h;
        let r = l + w;
        Self::try_from_tlbr([t, l, b, r])
    }
}

impl<T> From<TLHW<T>> for TLBR<T>
where
    T: Copy + Num + PartialOrd,
{
    fn from(from: TLHW<T>) -> Self {
        Self::from(&from)
    }
}

impl<T> From<&TLHW<T>> for TLBR<T>
where
    T: Copy + Num + PartialOrd,
{
    fn from(from: &TLHW<T>) -> Self {
        let TLHW { t, l, h, w } = *from;
        Self {
            t,
            l,
            b: t + h,
            r: l + w,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RectNum;

    #[test]
    fn tlbr_rejects_inverted_corners() {
        assert!(TLBR::try_from_tlbr([10, 10, 5, 20]).is_err());
    }

    #[test]
    fn tlbr_extent() {
        let rect = TLBR::from_tlbr([2, 3, 12, 8]);
        assert_eq!(rect.h(), 10);
        assert_eq!(rect.w(), 5);
        assert_eq!(rect.area(), 50);
    }
}
