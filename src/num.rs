use crate::descriptor::Precision;

/// Element precision accepted by the oracle and the harness (`f32`, `f64`).
pub trait Float:
    Copy
    + Clone
    + PartialEq
    + PartialOrd
    + core::fmt::Debug
    + core::ops::Add<Output = Self>
    + core::ops::Sub<Output = Self>
    + core::ops::Mul<Output = Self>
    + core::ops::Div<Output = Self>
    + core::ops::Neg<Output = Self>
    + Send
    + Sync
    + 'static
{
    /// Descriptor precision matching this element type.
    const PRECISION: Precision;

    fn zero() -> Self;
    /// Machine epsilon of the type, widened to `f64`.
    fn epsilon() -> f64;
    /// Narrowing (or identity) conversion from the double-precision accumulator.
    fn from_f64(x: f64) -> Self;
    fn to_f64(self) -> f64;
    fn sqrt(self) -> Self;
}

impl Float for f32 {
    const PRECISION: Precision = Precision::Single;

    fn zero() -> Self {
        0.0
    }
    fn epsilon() -> f64 {
        f32::EPSILON as f64
    }
    fn from_f64(x: f64) -> Self {
        x as f32
    }
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn sqrt(self) -> Self {
        libm::sqrtf(self)
    }
}

impl Float for f64 {
    const PRECISION: Precision = Precision::Double;

    fn zero() -> Self {
        0.0
    }
    fn epsilon() -> f64 {
        f64::EPSILON
    }
    fn from_f64(x: f64) -> Self {
        x
    }
    fn to_f64(self) -> f64 {
        self
    }
    fn sqrt(self) -> Self {
        libm::sqrt(self)
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Complex<T: Float> {
    pub re: T,
    pub im: T,
}

impl<T: Float> Complex<T> {
    pub fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
    pub fn zero() -> Self {
        Self {
            re: T::zero(),
            im: T::zero(),
        }
    }
    /// Real value promoted to a complex number with zero imaginary part.
    pub fn from_real(re: T) -> Self {
        Self { re, im: T::zero() }
    }
    #[inline(always)]
    pub fn conj(self) -> Self {
        Self {
            re: self.re,
            im: -self.im,
        }
    }
    #[inline(always)]
    pub fn scale(self, factor: T) -> Self {
        Self {
            re: self.re * factor,
            im: self.im * factor,
        }
    }
    #[inline(always)]
    pub fn norm_sqr(self) -> T {
        self.re * self.re + self.im * self.im
    }
    pub fn abs(self) -> T {
        self.norm_sqr().sqrt()
    }
    /// Widen both components to double precision.
    #[inline(always)]
    pub fn to_c64(self) -> Complex64 {
        Complex64 {
            re: self.re.to_f64(),
            im: self.im.to_f64(),
        }
    }
    /// Narrow (or copy) a double-precision value into this element type.
    #[inline(always)]
    pub fn from_c64(value: Complex64) -> Self {
        Self {
            re: T::from_f64(value.re),
            im: T::from_f64(value.im),
        }
    }
}

impl<T: Float> core::ops::Neg for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            re: -self.re,
            im: -self.im,
        }
    }
}

impl<T: Float> core::ops::Add for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Self {
            re: self.re + other.re,
            im: self.im + other.im,
        }
    }
}

impl<T: Float> core::ops::AddAssign for Complex<T> {
    #[inline(always)]
    fn add_assign(&mut self, other: Self) {
        self.re = self.re + other.re;
        self.im = self.im + other.im;
    }
}

impl<T: Float> core::ops::Sub for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        Self {
            re: self.re - other.re,
            im: self.im - other.im,
        }
    }
}

impl<T: Float> core::ops::Mul for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn mul(self, other: Self) -> Self {
        Self {
            re: self.re * other.re - self.im * other.im,
            im: self.re * other.im + self.im * other.re,
        }
    }
}

pub type Complex32 = Complex<f32>;
pub type Complex64 = Complex<f64>;
