//! `Decode` / `Encode` traits: per-type glue between Rust values and the cursor API.
//!
//! Implement these for your records by hand; the decoder and encoder drive them.
//!
//! ```rust
//! use yaml_visit::{Decode, Decoder, Encode, Encoder, Error, EventSource};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Point {
//!     x: i64,
//!     y: i64,
//! }
//!
//! impl Decode for Point {
//!     fn decode<S: EventSource>(de: &mut Decoder<S>) -> Result<Self, Error> {
//!         let mut point = Point::default();
//!         de.decode_map(|de, key| {
//!             match key {
//!                 "x" => point.x = de.decode_int()?,
//!                 "y" => point.y = de.decode_int()?,
//!                 _ => de.skip_value()?,
//!             }
//!             Ok::<(), Error>(())
//!         })?;
//!         Ok(point)
//!     }
//! }
//!
//! impl Encode for Point {
//!     fn encode(&self, enc: &mut Encoder<'_>) -> Result<(), Error> {
//!         enc.map_start()?;
//!         enc.map_key("x")?;
//!         enc.write_int(self.x)?;
//!         enc.map_key("y")?;
//!         enc.write_int(self.y)?;
//!         enc.map_end()
//!     }
//! }
//!
//! let text = yaml_visit::to_string(&Point { x: 1, y: -2 }).unwrap();
//! assert_eq!(text, "x: 1\ny: -2\n");
//! let back: Point = yaml_visit::from_str(&text).unwrap();
//! assert_eq!(back, Point { x: 1, y: -2 });
//! ```

use std::collections::BTreeMap;

use crate::de::Decoder;
use crate::error::{Error, ErrorKind};
use crate::ser::Encoder;
use crate::source::EventSource;

/// A value that can be read from a [`Decoder`].
pub trait Decode: Sized {
    fn decode<S: EventSource>(de: &mut Decoder<S>) -> Result<Self, Error>;
}

/// A value that can be written to an [`Encoder`].
pub trait Encode {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<(), Error>;
}

impl Decode for bool {
    fn decode<S: EventSource>(de: &mut Decoder<S>) -> Result<Self, Error> {
        de.decode_bool()
    }
}

impl Encode for bool {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<(), Error> {
        enc.write_bool(*self)
    }
}

macro_rules! int_codec {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Decode for $ty {
                fn decode<S: EventSource>(de: &mut Decoder<S>) -> Result<Self, Error> {
                    de.decode_int_as::<$ty>()
                }
            }

            impl Encode for $ty {
                fn encode(&self, enc: &mut Encoder<'_>) -> Result<(), Error> {
                    enc.write_int(*self)
                }
            }
        )*
    };
}

int_codec!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Decode for String {
    fn decode<S: EventSource>(de: &mut Decoder<S>) -> Result<Self, Error> {
        de.decode_string()
    }
}

impl Encode for String {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<(), Error> {
        enc.write_string(self)
    }
}

impl Encode for str {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<(), Error> {
        enc.write_string(self)
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<(), Error> {
        (**self).encode(enc)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode<S: EventSource>(de: &mut Decoder<S>) -> Result<Self, Error> {
        let mut items = Vec::new();
        de.decode_list(|de, _| {
            items.push(T::decode(de)?);
            Ok::<(), Error>(())
        })?;
        Ok(items)
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<(), Error> {
        enc.list_start()?;
        for item in self {
            item.encode(enc)?;
        }
        enc.list_end()
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<(), Error> {
        self.as_slice().encode(enc)
    }
}

/// Fixed-size arrays require exactly `N` elements.
impl<T: Decode, const N: usize> Decode for [T; N] {
    fn decode<S: EventSource>(de: &mut Decoder<S>) -> Result<Self, Error> {
        let location = de.location();
        let items: Vec<T> = Vec::decode(de)?;
        let found = items.len();
        items.try_into().map_err(|_| {
            de.fail(
                Error::with_detail(
                    ErrorKind::UnexpectedEvent,
                    format!("expected a sequence of {N} elements, found {found}"),
                )
                .at(location),
            )
        })
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<(), Error> {
        self.as_slice().encode(enc)
    }
}

impl<T: Decode> Decode for BTreeMap<String, T> {
    fn decode<S: EventSource>(de: &mut Decoder<S>) -> Result<Self, Error> {
        let mut map = BTreeMap::new();
        de.decode_map(|de, key| {
            let value = T::decode(de)?;
            map.insert(key.to_owned(), value);
            Ok::<(), Error>(())
        })?;
        Ok(map)
    }
}

impl<T: Encode> Encode for BTreeMap<String, T> {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<(), Error> {
        enc.map_start()?;
        for (key, value) in self {
            enc.map_key(key)?;
            value.encode(enc)?;
        }
        enc.map_end()
    }
}
