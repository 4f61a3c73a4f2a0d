/// 将元组拆开作为多个参数调用函数，用于[`Stream::starmap`](crate::Stream::starmap)。
///
/// 支持1到8个元素的元组。
pub trait Unpack<F> {
    type Output;

    fn unpack(self, f: &F) -> Self::Output;
}

macro_rules! impl_unpack {
    ($($arg:ident),+) => {
        impl<F, R, $($arg),+> Unpack<F> for ($($arg,)+)
        where
            F: Fn($($arg),+) -> R,
        {
            type Output = R;

            #[allow(non_snake_case)]
            fn unpack(self, f: &F) -> R {
                let ($($arg,)+) = self;
                f($($arg),+)
            }
        }
    };
}

impl_unpack!(A);
impl_unpack!(A, B);
impl_unpack!(A, B, C);
impl_unpack!(A, B, C, D);
impl_unpack!(A, B, C, D, E);
impl_unpack!(A, B, C, D, E, G);
impl_unpack!(A, B, C, D, E, G, H);
impl_unpack!(A, B, C, D, E, G, H, I);
