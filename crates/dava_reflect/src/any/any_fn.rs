use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use thiserror::Error;

use crate::TypeToken;
use crate::any::{Any, cast_builtin};
use crate::object::ReflectedObject;

// -----------------------------------------------------------------------------
// InvokeError

/// Failure to call an [`AnyFn`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvokeError {
    #[error("expected {expected} arguments, got {actual}")]
    ArgumentCount { expected: usize, actual: usize },
    #[error("argument {index} cannot be read as `{expected}`")]
    ArgumentType { index: usize, expected: TypeToken },
    #[error("the function needs a receiver")]
    MissingThis,
    #[error("the receiver is not a `{expected}`")]
    ThisMismatch { expected: TypeToken },
    #[error("the function needs a mutable receiver")]
    ReadonlyThis,
}

// -----------------------------------------------------------------------------
// AnyFnParams

/// Receiver of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThisParam {
    pub ty: TypeToken,
    pub is_const: bool,
}

/// Runtime signature of an [`AnyFn`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnyFnParams {
    ret: TypeToken,
    args: Vec<TypeToken>,
    this: Option<ThisParam>,
}

impl AnyFnParams {
    #[inline]
    pub fn ret(&self) -> TypeToken {
        self.ret
    }

    #[inline]
    pub fn args(&self) -> &[TypeToken] {
        &self.args
    }

    /// The receiver, `None` for free functions.
    #[inline]
    pub fn this(&self) -> Option<ThisParam> {
        self.this
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

// -----------------------------------------------------------------------------
// AnyFn

type Invoker = dyn for<'o> Fn(Option<ReflectedObject<'o>>, Vec<Any>) -> Result<Any, InvokeError>
    + Send
    + Sync;

/// A type-erased function.
///
/// Arguments are passed as [`Any`] values and moved into the call. An
/// argument of another built-in numeric type is converted first. The
/// result comes back as an `Any`, which is empty for functions returning `()`.
///
/// # Examples
///
/// ```
/// use dava_reflect::any::{Any, AnyFn, InvokeError};
///
/// let add = AnyFn::new(|a: i32, b: i32| a + b);
/// assert_eq!(add.params().arity(), 2);
///
/// let sum = add.invoke(vec![Any::new(2_i32), Any::new(3_u8)]).unwrap();
/// assert_eq!(sum.get::<i32>(), Some(&5));
///
/// assert_eq!(
///     add.invoke(vec![Any::new(2_i32)]).unwrap_err(),
///     InvokeError::ArgumentCount { expected: 2, actual: 1 },
/// );
/// ```
pub struct AnyFn {
    params: AnyFnParams,
    invoker: Box<Invoker>,
}

impl AnyFn {
    /// Wraps a free function or closure.
    #[inline]
    pub fn new<M, F: IntoAnyFn<M>>(f: F) -> Self {
        f.into_any_fn()
    }

    /// Wraps a function taking `&C` or `&mut C` as its first parameter.
    #[inline]
    pub fn method<C, M, F: IntoMethod<C, M>>(f: F) -> Self {
        f.into_method()
    }

    pub(crate) fn from_parts(
        params: AnyFnParams,
        invoker: impl for<'o> Fn(Option<ReflectedObject<'o>>, Vec<Any>) -> Result<Any, InvokeError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            params,
            invoker: Box::new(invoker),
        }
    }

    #[inline]
    pub fn params(&self) -> &AnyFnParams {
        &self.params
    }

    /// Returns `true` if the function does not take a receiver.
    #[inline]
    pub fn is_static(&self) -> bool {
        self.params.this.is_none()
    }

    /// Calls a free function.
    pub fn invoke(&self, args: Vec<Any>) -> Result<Any, InvokeError> {
        if !self.is_static() {
            return Err(InvokeError::MissingThis);
        }
        (self.invoker)(None, args)
    }

    /// Calls the function with `this` as receiver.
    ///
    /// Free functions ignore the receiver.
    pub fn invoke_with(&self, this: ReflectedObject<'_>, args: Vec<Any>) -> Result<Any, InvokeError> {
        (self.invoker)(Some(this), args)
    }
}

impl fmt::Debug for AnyFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyFn").field("params", &self.params).finish()
    }
}

// -----------------------------------------------------------------------------
// Conversion traits

/// Functions convertible into a free [`AnyFn`].
///
/// `Marker` only disambiguates the implementations for different arities.
pub trait IntoAnyFn<Marker>: Send + Sync + 'static {
    fn into_any_fn(self) -> AnyFn;
}

/// Functions convertible into a method [`AnyFn`] on receiver `C`.
pub trait IntoMethod<C, Marker>: Send + Sync + 'static {
    fn into_method(self) -> AnyFn;
}

#[doc(hidden)]
pub struct RefThis;

#[doc(hidden)]
pub struct MutThis;

fn unpack<const N: usize>(args: Vec<Any>) -> Result<[Any; N], InvokeError> {
    let actual = args.len();
    args.try_into()
        .map_err(|_| InvokeError::ArgumentCount { expected: N, actual })
}

fn take_arg<A: 'static>(index: usize, value: Any) -> Result<A, InvokeError> {
    let expected = TypeToken::of::<A>();
    match value.take::<A>() {
        Ok(v) => Ok(v),
        Err(value) => cast_builtin(&value, expected)
            .ok()
            .and_then(|v| v.take::<A>().ok())
            .ok_or(InvokeError::ArgumentType { index, expected }),
    }
}

fn into_return<R: Send + Sync + 'static>(value: R) -> Any {
    if TypeToken::of::<R>().is::<()>() {
        Any::empty()
    } else {
        Any::new_unique(value)
    }
}

macro_rules! impl_into_any_fn {
    ($count:literal $(, $idx:tt $arg:ident $val:ident)*) => {
        impl<F, R, $($arg,)*> IntoAnyFn<fn($($arg,)*) -> R> for F
        where
            F: Fn($($arg),*) -> R + Send + Sync + 'static,
            R: Send + Sync + 'static,
            $($arg: Send + Sync + 'static,)*
        {
            fn into_any_fn(self) -> AnyFn {
                let params = AnyFnParams {
                    ret: TypeToken::of::<R>(),
                    args: vec![$(TypeToken::of::<$arg>()),*],
                    this: None,
                };
                AnyFn::from_parts(params, move |_this, args| {
                    let [$($val),*] = unpack::<$count>(args)?;
                    $(let $val = take_arg::<$arg>($idx, $val)?;)*
                    Ok(into_return((self)($($val),*)))
                })
            }
        }

        impl<C, F, R, $($arg,)*> IntoMethod<C, (RefThis, fn($($arg,)*) -> R)> for F
        where
            C: 'static,
            F: Fn(&C, $($arg),*) -> R + Send + Sync + 'static,
            R: Send + Sync + 'static,
            $($arg: Send + Sync + 'static,)*
        {
            fn into_method(self) -> AnyFn {
                let expected = TypeToken::of::<C>();
                let params = AnyFnParams {
                    ret: TypeToken::of::<R>(),
                    args: vec![$(TypeToken::of::<$arg>()),*],
                    this: Some(ThisParam { ty: expected, is_const: true }),
                };
                AnyFn::from_parts(params, move |this, args| {
                    let this = this.ok_or(InvokeError::MissingThis)?;
                    let [$($val),*] = unpack::<$count>(args)?;
                    $(let $val = take_arg::<$arg>($idx, $val)?;)*
                    this.with_ref::<C, _>(|c| (self)(c, $($val),*))
                        .map(into_return)
                        .ok_or(InvokeError::ThisMismatch { expected })
                })
            }
        }

        impl<C, F, R, $($arg,)*> IntoMethod<C, (MutThis, fn($($arg,)*) -> R)> for F
        where
            C: 'static,
            F: Fn(&mut C, $($arg),*) -> R + Send + Sync + 'static,
            R: Send + Sync + 'static,
            $($arg: Send + Sync + 'static,)*
        {
            fn into_method(self) -> AnyFn {
                let expected = TypeToken::of::<C>();
                let params = AnyFnParams {
                    ret: TypeToken::of::<R>(),
                    args: vec![$(TypeToken::of::<$arg>()),*],
                    this: Some(ThisParam { ty: expected, is_const: false }),
                };
                AnyFn::from_parts(params, move |this, args| {
                    let this = this.ok_or(InvokeError::MissingThis)?;
                    if this.type_token() != expected {
                        return Err(InvokeError::ThisMismatch { expected });
                    }
                    if this.is_const() {
                        return Err(InvokeError::ReadonlyThis);
                    }
                    let [$($val),*] = unpack::<$count>(args)?;
                    $(let $val = take_arg::<$arg>($idx, $val)?;)*
                    this.with_mut::<C, _>(|c| (self)(c, $($val),*))
                        .map(into_return)
                        .ok_or(InvokeError::ThisMismatch { expected })
                })
            }
        }
    };
}

impl_into_any_fn!(0);
impl_into_any_fn!(1, 0 A0 a0);
impl_into_any_fn!(2, 0 A0 a0, 1 A1 a1);
impl_into_any_fn!(3, 0 A0 a0, 1 A1 a1, 2 A2 a2);
impl_into_any_fn!(4, 0 A0 a0, 1 A1 a1, 2 A2 a2, 3 A3 a3);
impl_into_any_fn!(5, 0 A0 a0, 1 A1 a1, 2 A2 a2, 3 A3 a3, 4 A4 a4);

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{AnyFn, InvokeError};
    use crate::TypeToken;
    use crate::any::Any;
    use crate::object::ReflectedObject;

    struct Counter {
        value: i32,
    }

    #[test]
    fn free_function_signature() {
        let f = AnyFn::new(|name: String, n: usize| name.len() * n);
        assert!(f.is_static());
        assert_eq!(f.params().ret(), TypeToken::of::<usize>());
        assert_eq!(
            f.params().args(),
            &[TypeToken::of::<String>(), TypeToken::of::<usize>()]
        );
        let out = f.invoke(vec![Any::new(String::from("ab")), Any::new(3_usize)]);
        assert_eq!(out.unwrap().get::<usize>(), Some(&6));
    }

    #[test]
    fn unit_return_is_empty() {
        let f = AnyFn::new(|| {});
        assert!(f.invoke(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn wrong_argument_type() {
        let f = AnyFn::new(|_: String| 0_i32);
        assert_eq!(
            f.invoke(vec![Any::new(1_i32)]).unwrap_err(),
            InvokeError::ArgumentType {
                index: 0,
                expected: TypeToken::of::<String>()
            }
        );
    }

    #[test]
    fn methods_check_receiver() {
        let get = AnyFn::method(|c: &Counter| c.value);
        let add = AnyFn::method(|c: &mut Counter, n: i32| c.value += n);
        assert!(!get.is_static());
        assert_eq!(get.invoke(Vec::new()).unwrap_err(), InvokeError::MissingThis);

        let mut counter = Counter { value: 1 };
        let this = ReflectedObject::typed_mut(&mut counter);
        add.invoke_with(this, vec![Any::new(4_i32)]).unwrap();
        let value = get.invoke_with(this, Vec::new()).unwrap();
        assert_eq!(value.get::<i32>(), Some(&5));

        assert_eq!(
            add.invoke_with(this.as_const(), vec![Any::new(1_i32)])
                .unwrap_err(),
            InvokeError::ReadonlyThis
        );

        let mut other = 0_u8;
        assert!(matches!(
            get.invoke_with(ReflectedObject::typed_mut(&mut other), Vec::new()),
            Err(InvokeError::ThisMismatch { .. })
        ));
    }
}
