//! Fixed-width wire encoding
//!
//! Every value exchanged on the channel has a size known to both peers at
//! build time. Scalars are little-endian; records are the concatenation of
//! their fields in declaration order with no padding, regardless of how the
//! platform would lay the struct out in memory.
//!
//! | Type            | Size | Encoding                         |
//! |-----------------|------|----------------------------------|
//! | `u8` / `i8`     | 1    | as-is                            |
//! | `u16` / `i16`   | 2    | little-endian                    |
//! | `u32` / `i32`   | 4    | little-endian                    |
//! | `u64` / `i64`   | 8    | little-endian                    |
//! | `f32` / `f64`   | 4/8  | IEEE-754 bits, little-endian     |
//! | `bool`          | 1    | `0x00`/`0x01`, non-zero is true  |
//! | `[u8; N]`       | N    | as-is                            |
//! | `()`            | 0    | nothing                          |
//! | tuples, records | Σ    | fields in order                  |

use serialcmd_hal::ByteChannel;

use crate::serializer::Serializer;

/// A value with a fixed-size wire representation
///
/// `write_to` must emit exactly `SIZE` bytes and `read_from` must consume
/// exactly `SIZE` bytes. Decoding performs no range checks.
pub trait Wire: Sized {
    /// Encoded size in bytes
    const SIZE: usize;

    /// Encode onto the channel
    fn write_to<C: ByteChannel>(&self, io: &mut Serializer<C>) -> Result<(), C::Error>;

    /// Decode from the channel, blocking until all bytes have arrived
    fn read_from<C: ByteChannel>(io: &mut Serializer<C>) -> Result<Self, C::Error>;
}

macro_rules! impl_wire_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Wire for $ty {
                const SIZE: usize = core::mem::size_of::<$ty>();

                fn write_to<C: ByteChannel>(&self, io: &mut Serializer<C>) -> Result<(), C::Error> {
                    io.write_bytes(&self.to_le_bytes())
                }

                fn read_from<C: ByteChannel>(io: &mut Serializer<C>) -> Result<Self, C::Error> {
                    let mut buf = [0u8; core::mem::size_of::<$ty>()];
                    io.read_bytes(&mut buf)?;
                    Ok(<$ty>::from_le_bytes(buf))
                }
            }
        )*
    };
}

impl_wire_scalar!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl Wire for bool {
    const SIZE: usize = 1;

    fn write_to<C: ByteChannel>(&self, io: &mut Serializer<C>) -> Result<(), C::Error> {
        io.write_bytes(&[u8::from(*self)])
    }

    fn read_from<C: ByteChannel>(io: &mut Serializer<C>) -> Result<Self, C::Error> {
        Ok(u8::read_from(io)? != 0)
    }
}

impl Wire for () {
    const SIZE: usize = 0;

    fn write_to<C: ByteChannel>(&self, _io: &mut Serializer<C>) -> Result<(), C::Error> {
        Ok(())
    }

    fn read_from<C: ByteChannel>(_io: &mut Serializer<C>) -> Result<Self, C::Error> {
        Ok(())
    }
}

impl<const N: usize> Wire for [u8; N] {
    const SIZE: usize = N;

    fn write_to<C: ByteChannel>(&self, io: &mut Serializer<C>) -> Result<(), C::Error> {
        io.write_bytes(self)
    }

    fn read_from<C: ByteChannel>(io: &mut Serializer<C>) -> Result<Self, C::Error> {
        let mut buf = [0u8; N];
        io.read_bytes(&mut buf)?;
        Ok(buf)
    }
}

macro_rules! impl_wire_tuple {
    ($($name:ident),+) => {
        impl<$($name: Wire),+> Wire for ($($name,)+) {
            const SIZE: usize = 0 $(+ $name::SIZE)+;

            #[allow(non_snake_case)]
            fn write_to<C: ByteChannel>(&self, io: &mut Serializer<C>) -> Result<(), C::Error> {
                let ($($name,)+) = self;
                $($name.write_to(io)?;)+
                Ok(())
            }

            fn read_from<C: ByteChannel>(io: &mut Serializer<C>) -> Result<Self, C::Error> {
                Ok(($($name::read_from(io)?,)+))
            }
        }
    };
}

impl_wire_tuple!(A);
impl_wire_tuple!(A, B);
impl_wire_tuple!(A, B, C0);
impl_wire_tuple!(A, B, C0, D);
impl_wire_tuple!(A, B, C0, D, E);
impl_wire_tuple!(A, B, C0, D, E, F);

/// Declare a record struct and its [`Wire`] encoding
///
/// Fields are encoded in declaration order with no padding; the record's
/// `SIZE` is the sum of its fields' sizes.
///
/// ```
/// serialcmd_protocol::wire_record! {
///     #[derive(Debug, Clone, Copy, PartialEq, Eq)]
///     pub struct Sample {
///         pub a: u32,
///         pub b: u16,
///         pub c: u8,
///     }
/// }
///
/// use serialcmd_protocol::Wire;
/// assert_eq!(Sample::SIZE, 7);
/// ```
#[macro_export]
macro_rules! wire_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::wire::Wire for $name {
            const SIZE: usize = 0 $(+ <$ty as $crate::wire::Wire>::SIZE)*;

            #[allow(unused_variables)]
            fn write_to<C: $crate::hal::ByteChannel>(
                &self,
                io: &mut $crate::Serializer<C>,
            ) -> ::core::result::Result<(), C::Error> {
                $(<$ty as $crate::wire::Wire>::write_to(&self.$field, io)?;)*
                Ok(())
            }

            #[allow(unused_variables)]
            fn read_from<C: $crate::hal::ByteChannel>(
                io: &mut $crate::Serializer<C>,
            ) -> ::core::result::Result<Self, C::Error> {
                Ok(Self {
                    $($field: <$ty as $crate::wire::Wire>::read_from(io)?,)*
                })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serialcmd_hal::{MockChannel, MockError};

    crate::wire_record! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        struct Foo {
            a: u32,
            b: u16,
            c: u8,
        }
    }

    crate::wire_record! {
        #[derive(Debug, Clone, Copy, PartialEq)]
        struct Motors {
            left: f32,
            right: f32,
            enabled: bool,
        }
    }

    crate::wire_record! {
        #[derive(Debug, Default)]
        struct Empty {}
    }

    fn encode<T: Wire>(value: &T) -> heapless::Vec<u8, 64> {
        let mut io = Serializer::new(MockChannel::<64>::new());
        io.write(value).unwrap();
        heapless::Vec::from_slice(io.channel().written()).unwrap()
    }

    fn decode<T: Wire>(bytes: &[u8]) -> Result<T, MockError> {
        let mut channel = MockChannel::<64>::new();
        channel.feed(bytes).unwrap();
        Serializer::new(channel).read()
    }

    #[test]
    fn test_u32_little_endian() {
        assert_eq!(encode(&0xA1A2A3A4u32).as_slice(), &[0xA4, 0xA3, 0xA2, 0xA1]);
        assert_eq!(decode::<u32>(&[0xA4, 0xA3, 0xA2, 0xA1]), Ok(0xA1A2A3A4));
    }

    #[test]
    fn test_record_has_no_padding() {
        let foo = Foo {
            a: 0xA1A2A3A4,
            b: 0xB1B2,
            c: 0x69,
        };

        assert_eq!(Foo::SIZE, 7);
        assert_eq!(
            encode(&foo).as_slice(),
            &[0xA4, 0xA3, 0xA2, 0xA1, 0xB2, 0xB1, 0x69]
        );
        assert_eq!(decode::<Foo>(&[0xA4, 0xA3, 0xA2, 0xA1, 0xB2, 0xB1, 0x69]), Ok(foo));
    }

    #[test]
    fn test_sizes() {
        assert_eq!(<()>::SIZE, 0);
        assert_eq!(Empty::SIZE, 0);
        assert_eq!(bool::SIZE, 1);
        assert_eq!(<[u8; 5]>::SIZE, 5);
        assert_eq!(<(u8, u32)>::SIZE, 5);
        assert_eq!(<(u8, u16, u32, u64, i8, f32)>::SIZE, 20);
        assert_eq!(Motors::SIZE, 9);
    }

    #[test]
    fn test_boundary_values() {
        assert_eq!(encode(&0u8).as_slice(), &[0x00]);
        assert_eq!(encode(&u8::MAX).as_slice(), &[0xFF]);
        assert_eq!(encode(&u16::MAX).as_slice(), &[0xFF, 0xFF]);
        assert_eq!(encode(&u32::MAX).as_slice(), &[0xFF; 4]);
        assert_eq!(encode(&-1i16).as_slice(), &[0xFF, 0xFF]);
        assert_eq!(encode(&i32::MIN).as_slice(), &[0x00, 0x00, 0x00, 0x80]);
        assert_eq!(decode::<u16>(&[0x00, 0x00]), Ok(0));
        assert_eq!(decode::<u32>(&[0xFF; 4]), Ok(u32::MAX));
    }

    #[test]
    fn test_bool_decodes_any_nonzero_as_true() {
        assert_eq!(decode::<bool>(&[0x00]), Ok(false));
        assert_eq!(decode::<bool>(&[0x01]), Ok(true));
        assert_eq!(decode::<bool>(&[0x7F]), Ok(true));
        assert_eq!(encode(&true).as_slice(), &[0x01]);
    }

    #[test]
    fn test_float_record() {
        let motors = Motors {
            left: -12.34,
            right: 56.78,
            enabled: true,
        };
        let bytes = encode(&motors);
        assert_eq!(&bytes[..4], &(-12.34f32).to_le_bytes());
        assert_eq!(decode::<Motors>(&bytes), Ok(motors));
    }

    #[test]
    fn test_tuple_order() {
        assert_eq!(encode(&(0x01u8, 0x0302u16)).as_slice(), &[0x01, 0x02, 0x03]);
        assert_eq!(decode::<(u8, u8)>(&[7, 9]), Ok((7, 9)));
    }

    #[test]
    fn test_unit_touches_nothing() {
        assert!(encode(&()).is_empty());
        assert!(encode(&Empty::default()).is_empty());
        // Decoding a zero-sized value must not wait for input
        assert_eq!(decode::<()>(&[]), Ok(()));
    }

    #[test]
    fn test_truncated_input_is_a_channel_error() {
        assert_eq!(decode::<u32>(&[0x01, 0x02]), Err(MockError::WouldBlock));
    }

    proptest! {
        #[test]
        fn prop_scalars_round_trip(a: u8, b: u16, c: u32, d: u64, e: i32) {
            prop_assert_eq!(decode::<u8>(&encode(&a)), Ok(a));
            prop_assert_eq!(decode::<u16>(&encode(&b)), Ok(b));
            prop_assert_eq!(decode::<u32>(&encode(&c)), Ok(c));
            prop_assert_eq!(decode::<u64>(&encode(&d)), Ok(d));
            prop_assert_eq!(decode::<i32>(&encode(&e)), Ok(e));
        }

        #[test]
        fn prop_record_round_trip(a: u32, b: u16, c: u8) {
            let foo = Foo { a, b, c };
            let bytes = encode(&foo);
            prop_assert_eq!(bytes.len(), Foo::SIZE);
            prop_assert_eq!(&bytes[..4], &a.to_le_bytes());
            prop_assert_eq!(decode::<Foo>(&bytes), Ok(foo));
        }

        #[test]
        fn prop_decode_consumes_exactly_size(bytes in proptest::collection::vec(any::<u8>(), 7..32)) {
            let mut channel = MockChannel::<64>::new();
            channel.feed(&bytes).unwrap();
            let mut io = Serializer::new(channel);
            let _: Foo = io.read().unwrap();
            prop_assert_eq!(io.channel().consumed(), Foo::SIZE);
            prop_assert_eq!(io.channel().pending(), bytes.len() - Foo::SIZE);
        }
    }
}
