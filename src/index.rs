use std::fmt;
use std::hash::Hash;

pub type DefaultIx = u32;

/// Integer type used to address nodes in an arena.
///
/// # Safety
///
/// `new(x).index()` must return `x` for every `x` below `max().index()`.
pub unsafe trait IndexType: Copy + Default + Hash + Ord + fmt::Debug + 'static {
    fn new(x: usize) -> Self;
    fn index(&self) -> usize;
    fn max() -> Self;
}

macro_rules! impl_index_type {
    ($($ty:ty),*) => {
        $(
            unsafe impl IndexType for $ty {
                #[inline(always)]
                fn new(x: usize) -> Self {
                    x as $ty
                }
                #[inline(always)]
                fn index(&self) -> usize {
                    *self as usize
                }
                #[inline(always)]
                fn max() -> Self {
                    <$ty>::MAX
                }
            }
        )*
    };
}

impl_index_type!(u16, u32, usize);

/// Node identifier.
///
/// Handles stay valid until the node they name is removed. A slot freed by a
/// removal may be handed out again by a later insertion.
#[derive(Copy, Clone, Default, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct NodeIndex<Ix = DefaultIx>(Ix);

impl<Ix: IndexType> NodeIndex<Ix> {
    #[inline]
    pub fn new(x: usize) -> Self {
        NodeIndex(IndexType::new(x))
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0.index()
    }
}

impl<Ix: fmt::Debug> fmt::Debug for NodeIndex<Ix> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NodeIndex({:?})", self.0)
    }
}
