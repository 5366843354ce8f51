/// Constructs a [`struct@Variant`] type from a list of alternative types.
///
/// # Examples
///
/// ```rust
/// use tunion::Variant;
///
/// type Number = Variant![i32, u32, f64];
/// let n: Number = Variant::new(42u32);
/// ```
#[macro_export]
macro_rules! Variant {
    [$($t:ty),* $(,)?] => [$crate::Variant::<$crate::T![$($t,)*]>];
}

/// Constructs a type list (heterogeneous list) type from a list of types.
///
/// # Examples
///
/// ```rust
/// use tunion::T;
///
/// type MyList = T![i32, u32, f64];
/// let list: MyList = (42i32, (42u32, (42.0f64, ())));
/// ```
#[macro_export]
macro_rules! T {
    [] => [()];
    [$head:ty $(, $t:ty)* $(,)?] => [($head, $crate::T!($($t,)*))];
}
