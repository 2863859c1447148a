//! Client-side vertex attribute arrays.
//!
//! Array data is converted at the time it is set into a dense `f32` layout
//! with a fixed number of components per vertex: three for positions and
//! normals, four for colors, and two for texture coordinates. Draw calls can
//! then upload it as is.

use alloc::{format, vec::Vec};

use super::Result;
use super::enums::ClientArray;
use super::error::invalid;

/// Borrowed vertex attribute data of one of the accepted element types.
#[derive(Copy, Clone, Debug)]
pub enum ArrayData<'a> {
    Float(&'a [f32]),
    Double(&'a [f64]),
    Int(&'a [i32]),
    /// Accepted for colors only, scaled from 0..=255 to 0.0..=1.0.
    UnsignedByte(&'a [u8]),
}

/// Borrowed index data for indexed drawing.
#[derive(Copy, Clone, Debug)]
pub enum IndexData<'a> {
    U8(&'a [u8]),
    U16(&'a [u16]),
    /// Indices must still fit in 16 bits.
    U32(&'a [u32]),
}

/// The bound arrays and their enable flags.
#[derive(Clone, Debug, Default)]
pub struct ClientArrays {
    data: [Option<Vec<f32>>; 4],
    enabled: [bool; 4],
}

impl ClientArray {
    /// Returns the number of `f32` components stored per vertex.
    pub const fn size(self) -> usize {
        match self {
            ClientArray::Vertex | ClientArray::Normal => 3,
            ClientArray::Color => 4,
            ClientArray::TexCoord => 2,
        }
    }
}

impl ClientArrays {
    pub fn set(&mut self, arr: ClientArray, data: Vec<f32>) {
        self.data[arr as usize] = Some(data);
    }

    pub fn set_enabled(&mut self, arr: ClientArray, on: bool) {
        self.enabled[arr as usize] = on;
    }

    pub fn is_enabled(&self, arr: ClientArray) -> bool {
        self.enabled[arr as usize]
    }

    /// Returns the data of `arr` if it is both bound and enabled.
    pub fn active(&self, arr: ClientArray) -> Option<&[f32]> {
        self.data[arr as usize]
            .as_deref()
            .filter(|_| self.is_enabled(arr))
    }

    /// Returns the number of vertices in `arr` if it is active.
    pub fn active_len(&self, arr: ClientArray) -> Option<usize> {
        self.active(arr).map(|d| d.len() / arr.size())
    }
}

impl IndexData<'_> {
    /// Returns the number of indices.
    pub fn len(&self) -> usize {
        match self {
            IndexData::U8(d) => d.len(),
            IndexData::U16(d) => d.len(),
            IndexData::U32(d) => d.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the first `count` indices as `u16`s.
    pub(crate) fn to_u16(&self, op: &'static str, count: usize) -> Result<Vec<u16>> {
        if count > self.len() {
            return Err(invalid(
                op,
                format!("count {count} exceeds {} indices", self.len()),
            ));
        }
        Ok(match self {
            IndexData::U8(d) => d[..count].iter().map(|&i| i.into()).collect(),
            IndexData::U16(d) => d[..count].to_vec(),
            IndexData::U32(d) => d[..count]
                .iter()
                .map(|&i| {
                    u16::try_from(i).map_err(|_| {
                        invalid(op, format!("index {i} does not fit in 16 bits"))
                    })
                })
                .collect::<Result<_>>()?,
        })
    }
}

impl ArrayData<'_> {
    fn len(&self) -> usize {
        match self {
            ArrayData::Float(d) => d.len(),
            ArrayData::Double(d) => d.len(),
            ArrayData::Int(d) => d.len(),
            ArrayData::UnsignedByte(d) => d.len(),
        }
    }

    fn get(&self, i: usize) -> f32 {
        match self {
            ArrayData::Float(d) => d[i],
            ArrayData::Double(d) => d[i] as f32,
            ArrayData::Int(d) => d[i] as f32,
            ArrayData::UnsignedByte(d) => f32::from(d[i]) / 255.0,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            ArrayData::Float(_) => "float",
            ArrayData::Double(_) => "double",
            ArrayData::Int(_) => "int",
            ArrayData::UnsignedByte(_) => "unsigned byte",
        }
    }
}

/// Validates and densifies the data for `arr`.
///
/// `size` is the number of components per vertex in `data`, and `stride`
/// the distance in elements between the starts of consecutive vertices, or
/// zero if they are tightly packed. Missing components are filled in: `z`
/// of two-component positions with 0, alpha of three-component colors
/// with 1.
pub(crate) fn gather(
    op: &'static str,
    arr: ClientArray,
    size: usize,
    stride: usize,
    data: ArrayData<'_>,
) -> Result<Vec<f32>> {
    let sizes: &[usize] = match arr {
        ClientArray::Vertex => &[2, 3],
        ClientArray::Normal => &[3],
        ClientArray::Color => &[3, 4],
        ClientArray::TexCoord => &[2],
    };
    if !sizes.contains(&size) {
        return Err(invalid(op, format!("size must be one of {sizes:?}, got {size}")));
    }
    let type_ok = match data {
        ArrayData::UnsignedByte(_) => arr == ClientArray::Color,
        ArrayData::Int(_) => arr != ClientArray::Color,
        _ => true,
    };
    if !type_ok {
        return Err(invalid(op, format!("{} data is not supported", data.type_name())));
    }
    let stride = if stride == 0 { size } else { stride };
    if stride < size {
        return Err(invalid(op, format!("stride {stride} is less than size {size}")));
    }
    let len = data.len();
    if len < size {
        return Err(invalid(op, "array has no complete vertex"));
    }
    let count = (len - size) / stride + 1;

    let out_size = arr.size();
    let fill = if arr == ClientArray::Color { 1.0 } else { 0.0 };
    let mut res = Vec::with_capacity(count * out_size);
    for v in 0..count {
        let base = v * stride;
        res.extend((0..size).map(|c| data.get(base + c)));
        res.extend((size..out_size).map(|_| fill));
    }
    Ok(res)
}

macro_rules! impl_from_slices {
    ($($t:ty => $enum:ident :: $var:ident),+) => {$(
        impl<'a> From<&'a [$t]> for $enum<'a> {
            fn from(d: &'a [$t]) -> Self {
                Self::$var(d)
            }
        }
        impl<'a, const N: usize> From<&'a [$t; N]> for $enum<'a> {
            fn from(d: &'a [$t; N]) -> Self {
                Self::$var(d)
            }
        }
        impl<'a> From<&'a Vec<$t>> for $enum<'a> {
            fn from(d: &'a Vec<$t>) -> Self {
                Self::$var(d)
            }
        }
    )+};
}

impl_from_slices! {
    f32 => ArrayData::Float,
    f64 => ArrayData::Double,
    i32 => ArrayData::Int,
    u8 => ArrayData::UnsignedByte,
    u16 => IndexData::U16,
    u32 => IndexData::U32
}

impl<'a> IndexData<'a> {
    /// Interprets bytes as 8-bit indices.
    pub fn bytes(d: &'a [u8]) -> Self {
        Self::U8(d)
    }
}
