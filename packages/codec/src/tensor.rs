//! Self-describing dense numeric array blobs.
//!
//! The tensor payload embeds everything needed to reconstruct the array:
//!
//! ```text
//! [version: u8 = 1][dtype: u8][order: u8][ndim: u8][ndim x u64-le dims][element bytes]
//! ```
//!
//! Element bytes are little-endian, laid out in the recorded memory order.
//! The element count implied by the dims must match the remaining payload
//! length exactly, otherwise decoding fails.

use crate::error::CodecError;
use crate::tag::Tag;

const TENSOR_VERSION: u8 = 1;

/// Element type of a [`Tensor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dtype {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl Dtype {
    /// The wire code for this element type.
    pub const fn code(self) -> u8 {
        match self {
            Dtype::I8 => 0,
            Dtype::I16 => 1,
            Dtype::I32 => 2,
            Dtype::I64 => 3,
            Dtype::U8 => 4,
            Dtype::U16 => 5,
            Dtype::U32 => 6,
            Dtype::U64 => 7,
            Dtype::F32 => 8,
            Dtype::F64 => 9,
        }
    }

    fn from_code(code: u8) -> Option<Dtype> {
        Some(match code {
            0 => Dtype::I8,
            1 => Dtype::I16,
            2 => Dtype::I32,
            3 => Dtype::I64,
            4 => Dtype::U8,
            5 => Dtype::U16,
            6 => Dtype::U32,
            7 => Dtype::U64,
            8 => Dtype::F32,
            9 => Dtype::F64,
            _ => return None,
        })
    }

    /// Size of one element in bytes.
    pub const fn size(self) -> usize {
        match self {
            Dtype::I8 | Dtype::U8 => 1,
            Dtype::I16 | Dtype::U16 => 2,
            Dtype::I32 | Dtype::U32 | Dtype::F32 => 4,
            Dtype::I64 | Dtype::U64 | Dtype::F64 => 8,
        }
    }
}

/// Memory layout of the element bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryOrder {
    RowMajor,
    ColumnMajor,
}

impl MemoryOrder {
    const fn code(self) -> u8 {
        match self {
            MemoryOrder::RowMajor => 0,
            MemoryOrder::ColumnMajor => 1,
        }
    }

    fn from_code(code: u8) -> Option<MemoryOrder> {
        match code {
            0 => Some(MemoryOrder::RowMajor),
            1 => Some(MemoryOrder::ColumnMajor),
            _ => None,
        }
    }
}

/// A Rust element type that can live inside a [`Tensor`].
pub trait Element: Copy {
    /// The wire element type for this Rust type.
    const DTYPE: Dtype;

    /// Append this element's little-endian bytes to `buf`.
    fn write_le(&self, buf: &mut Vec<u8>);

    /// Read one element from a little-endian byte slice of exactly
    /// `Self::DTYPE.size()` bytes.
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_element {
    ($($ty:ty => $dtype:expr),* $(,)?) => {
        $(
            impl Element for $ty {
                const DTYPE: Dtype = $dtype;

                fn write_le(&self, buf: &mut Vec<u8>) {
                    buf.extend_from_slice(&self.to_le_bytes());
                }

                fn read_le(bytes: &[u8]) -> Self {
                    <$ty>::from_le_bytes(bytes.try_into().expect("element width checked"))
                }
            }
        )*
    };
}

impl_element! {
    i8 => Dtype::I8,
    i16 => Dtype::I16,
    i32 => Dtype::I32,
    i64 => Dtype::I64,
    u8 => Dtype::U8,
    u16 => Dtype::U16,
    u32 => Dtype::U32,
    u64 => Dtype::U64,
    f32 => Dtype::F32,
    f64 => Dtype::F64,
}

/// A dense numeric array with self-describing shape, element type, and
/// memory order.
///
/// Equality is element-wise: dtype + order + shape + raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    dtype: Dtype,
    order: MemoryOrder,
    shape: Vec<u64>,
    data: Vec<u8>,
}

impl Tensor {
    /// Build a row-major tensor from a flat element slice.
    ///
    /// Fails with an encode error when the shape's element count does not
    /// match `elems.len()`.
    pub fn from_elems<T: Element>(shape: Vec<u64>, elems: &[T]) -> Result<Tensor, CodecError> {
        Self::from_elems_ordered(shape, elems, MemoryOrder::RowMajor)
    }

    /// Build a tensor from a flat element slice laid out in `order`.
    pub fn from_elems_ordered<T: Element>(
        shape: Vec<u64>,
        elems: &[T],
        order: MemoryOrder,
    ) -> Result<Tensor, CodecError> {
        // The blob header stores ndim in one byte.
        if shape.len() > u8::MAX as usize {
            return Err(CodecError::Encode {
                tag: Tag::Tensor,
                message: format!(
                    "shape has {} dimensions, the wire format carries at most {}",
                    shape.len(),
                    u8::MAX
                ),
            });
        }
        let expected = element_count(&shape)?;
        if expected != elems.len() as u64 {
            return Err(CodecError::Encode {
                tag: Tag::Tensor,
                message: format!(
                    "shape {:?} implies {} elements, got {}",
                    shape,
                    expected,
                    elems.len()
                ),
            });
        }
        let mut data = Vec::with_capacity(elems.len() * T::DTYPE.size());
        for e in elems {
            e.write_le(&mut data);
        }
        Ok(Tensor {
            dtype: T::DTYPE,
            order,
            shape,
            data,
        })
    }

    /// Copy the elements out as a flat vector.
    ///
    /// Fails with a decode error when `T` does not match the stored dtype.
    pub fn elems<T: Element>(&self) -> Result<Vec<T>, CodecError> {
        if T::DTYPE != self.dtype {
            return Err(CodecError::Decode {
                tag: Tag::Tensor,
                message: format!("stored dtype is {:?}, requested {:?}", self.dtype, T::DTYPE),
            });
        }
        let size = self.dtype.size();
        Ok(self.data.chunks_exact(size).map(T::read_le).collect())
    }

    pub fn dtype(&self) -> Dtype {
        self.dtype
    }

    pub fn order(&self) -> MemoryOrder {
        self.order
    }

    pub fn shape(&self) -> &[u64] {
        &self.shape
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len() / self.dtype.size()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Serialize to the tensor payload (the bytes after the `n` tag).
    pub fn to_blob(&self) -> Vec<u8> {
        let mut blob =
            Vec::with_capacity(4 + self.shape.len() * 8 + self.data.len());
        blob.push(TENSOR_VERSION);
        blob.push(self.dtype.code());
        blob.push(self.order.code());
        blob.push(self.shape.len() as u8);
        for dim in &self.shape {
            blob.extend_from_slice(&dim.to_le_bytes());
        }
        blob.extend_from_slice(&self.data);
        blob
    }

    /// Parse a tensor payload (the bytes after the `n` tag).
    pub fn from_blob(payload: &[u8]) -> Result<Tensor, CodecError> {
        let decode_err = |message: String| CodecError::Decode {
            tag: Tag::Tensor,
            message,
        };

        if payload.len() < 4 {
            return Err(decode_err(format!(
                "payload is {} bytes, header needs 4",
                payload.len()
            )));
        }
        if payload[0] != TENSOR_VERSION {
            return Err(decode_err(format!("unknown version {}", payload[0])));
        }
        let dtype = Dtype::from_code(payload[1])
            .ok_or_else(|| decode_err(format!("unknown dtype code {}", payload[1])))?;
        let order = MemoryOrder::from_code(payload[2])
            .ok_or_else(|| decode_err(format!("unknown memory order {}", payload[2])))?;
        let ndim = payload[3] as usize;

        let dims_end = 4 + ndim * 8;
        if payload.len() < dims_end {
            return Err(decode_err(format!(
                "truncated header: {} dims declared, {} bytes present",
                ndim,
                payload.len()
            )));
        }
        let shape: Vec<u64> = payload[4..dims_end]
            .chunks_exact(8)
            .map(|c| u64::from_le_bytes(c.try_into().expect("chunked by 8")))
            .collect();

        let expected = element_count(&shape)?
            .checked_mul(dtype.size() as u64)
            .ok_or_else(|| decode_err("element byte count overflows".to_string()))?;
        let data = &payload[dims_end..];
        if data.len() as u64 != expected {
            return Err(decode_err(format!(
                "shape {:?} implies {} element bytes, got {}",
                shape,
                expected,
                data.len()
            )));
        }

        Ok(Tensor {
            dtype,
            order,
            shape,
            data: data.to_vec(),
        })
    }
}

fn element_count(shape: &[u64]) -> Result<u64, CodecError> {
    shape
        .iter()
        .try_fold(1u64, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| CodecError::Encode {
            tag: Tag::Tensor,
            message: format!("shape {:?} overflows the element count", shape),
        })
}
