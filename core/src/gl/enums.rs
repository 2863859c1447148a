//! Enumerations of the fixed-function API.
//!
//! Each enumeration carries the numeric value of the corresponding
//! classic API constant, so that code written against raw constants can be
//! converted with `TryFrom<u32>`. Unknown values are rejected with
//! [`Error::InvalidArgument`][super::Error::InvalidArgument].

use bitflags::bitflags;

use super::error::{Error, invalid};

macro_rules! gl_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $var:ident = $val:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $var, )+
        }

        impl $name {
            /// Returns the numeric constant of `self`.
            pub const fn code(self) -> u32 {
                match self {
                    $( Self::$var => $val, )+
                }
            }
        }

        impl TryFrom<u32> for $name {
            type Error = Error;
            fn try_from(code: u32) -> Result<Self, Error> {
                match code {
                    $( $val => Ok(Self::$var), )+
                    _ => Err(invalid(
                        stringify!($name),
                        alloc::format!("unknown value {code:#06x}"),
                    )),
                }
            }
        }
    };
}

gl_enum! {
    /// The kinds of primitive accepted by `begin` and the array draws.
    pub enum PrimitiveKind {
        Points = 0x0000,
        Lines = 0x0001,
        LineLoop = 0x0002,
        LineStrip = 0x0003,
        Triangles = 0x0004,
        TriangleStrip = 0x0005,
        TriangleFan = 0x0006,
        Quads = 0x0007,
        QuadStrip = 0x0008,
        Polygon = 0x0009,
    }
}

gl_enum! {
    /// The primitive kinds the shader pipeline draws natively.
    pub enum DrawMode {
        Points = 0x0000,
        Lines = 0x0001,
        LineLoop = 0x0002,
        LineStrip = 0x0003,
        Triangles = 0x0004,
        TriangleStrip = 0x0005,
        TriangleFan = 0x0006,
    }
}

impl PrimitiveKind {
    /// Returns the native draw mode used to render `self`.
    ///
    /// Quads are drawn as triangles after expansion; a quad strip has the
    /// same vertex order as a triangle strip, and a (convex) polygon the
    /// same as a triangle fan.
    pub const fn draw_mode(self) -> DrawMode {
        use PrimitiveKind::*;
        match self {
            Points => DrawMode::Points,
            Lines => DrawMode::Lines,
            LineLoop => DrawMode::LineLoop,
            LineStrip => DrawMode::LineStrip,
            Triangles | Quads => DrawMode::Triangles,
            TriangleStrip | QuadStrip => DrawMode::TriangleStrip,
            TriangleFan | Polygon => DrawMode::TriangleFan,
        }
    }
}

/// A capability that can be enabled or disabled.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Capability {
    DepthTest,
    /// Color tracking: the current color drives a material property.
    ColorMaterial,
    Blend,
    /// Light source with the given index.
    Light(usize),
    Lighting,
    /// Normalization of transformed normals.
    Normalize,
    /// Round instead of square points.
    PointSmooth,
    PolygonOffsetFill,
    Texture2d,
}

impl Capability {
    const LIGHT0: u32 = 0x4000;

    /// Returns the numeric constant of `self`.
    pub const fn code(self) -> u32 {
        use Capability::*;
        match self {
            DepthTest => 0x0B71,
            ColorMaterial => 0x0B57,
            Blend => 0x0BE2,
            Light(i) => Self::LIGHT0 + i as u32,
            Lighting => 0x0B50,
            Normalize => 0x0BA1,
            PointSmooth => 0x0B10,
            PolygonOffsetFill => 0x8037,
            Texture2d => 0x0DE1,
        }
    }
}

impl TryFrom<u32> for Capability {
    type Error = Error;
    fn try_from(code: u32) -> Result<Self, Error> {
        use Capability::*;
        Ok(match code {
            0x0B71 => DepthTest,
            0x0B57 => ColorMaterial,
            0x0BE2 => Blend,
            0x0B50 => Lighting,
            0x0BA1 => Normalize,
            0x0B10 => PointSmooth,
            0x8037 => PolygonOffsetFill,
            0x0DE1 => Texture2d,
            c if (Self::LIGHT0..Self::LIGHT0 + 8).contains(&c) => {
                Light((c - Self::LIGHT0) as usize)
            }
            c => {
                return Err(invalid(
                    "Capability",
                    alloc::format!("unknown value {c:#06x}"),
                ));
            }
        })
    }
}

gl_enum! {
    /// Which material record(s) an operation addresses.
    pub enum Face {
        Front = 0x0404,
        Back = 0x0405,
        FrontAndBack = 0x0408,
    }
}

/// One of the two material records.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    Front,
    Back,
}

impl Face {
    /// Returns whether `self` addresses the material of `side`.
    pub const fn includes(self, side: Side) -> bool {
        matches!(
            (self, side),
            (Face::FrontAndBack, _)
                | (Face::Front, Side::Front)
                | (Face::Back, Side::Back)
        )
    }
}

gl_enum! {
    /// Material properties.
    pub enum MaterialProp {
        Ambient = 0x1200,
        Diffuse = 0x1201,
        Specular = 0x1202,
        Emission = 0x1600,
        Shininess = 0x1601,
        AmbientAndDiffuse = 0x1602,
    }
}

gl_enum! {
    /// Light source properties.
    pub enum LightProp {
        Ambient = 0x1200,
        Diffuse = 0x1201,
        Specular = 0x1202,
        Position = 0x1203,
    }
}

gl_enum! {
    /// Global lighting parameters.
    pub enum LightModelParam {
        LocalViewer = 0x0B51,
        TwoSide = 0x0B52,
        Ambient = 0x0B53,
    }
}

gl_enum! {
    /// The matrix that transform operations apply to.
    pub enum MatrixMode {
        Modelview = 0x1700,
        Projection = 0x1701,
        Texture = 0x1702,
    }
}

gl_enum! {
    /// Client-side vertex attribute arrays.
    pub enum ClientArray {
        Vertex = 0x8074,
        Normal = 0x8075,
        Color = 0x8076,
        TexCoord = 0x8078,
    }
}

gl_enum! {
    /// Texture parameters settable with `tex_parameter`.
    pub enum TexParam {
        MagFilter = 0x2800,
        MinFilter = 0x2801,
        WrapS = 0x2802,
        WrapT = 0x2803,
    }
}

gl_enum! {
    /// Values of texture parameters.
    pub enum TexValue {
        Nearest = 0x2600,
        Linear = 0x2601,
        NearestMipmapNearest = 0x2700,
        LinearMipmapNearest = 0x2701,
        NearestMipmapLinear = 0x2702,
        LinearMipmapLinear = 0x2703,
        Clamp = 0x2900,
        Repeat = 0x2901,
    }
}

impl TexParam {
    /// Returns whether `val` is a legal value for `self`.
    pub const fn accepts(self, val: TexValue) -> bool {
        use TexValue::*;
        match self {
            TexParam::WrapS | TexParam::WrapT => matches!(val, Clamp | Repeat),
            TexParam::MagFilter => matches!(val, Nearest | Linear),
            TexParam::MinFilter => !matches!(val, Clamp | Repeat),
        }
    }
}

gl_enum! {
    /// Blending factors.
    pub enum BlendFactor {
        Zero = 0x0000,
        One = 0x0001,
        SrcColor = 0x0300,
        OneMinusSrcColor = 0x0301,
        SrcAlpha = 0x0302,
        OneMinusSrcAlpha = 0x0303,
        DstAlpha = 0x0304,
        OneMinusDstAlpha = 0x0305,
        DstColor = 0x0306,
        OneMinusDstColor = 0x0307,
    }
}

gl_enum! {
    /// Which vertex winding is front-facing.
    pub enum Winding {
        Cw = 0x0900,
        Ccw = 0x0901,
    }
}

/// How the fragment stage renders points.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum PointMode {
    /// Not drawing points.
    #[default]
    Off = 0,
    /// Square points.
    Hard = 1,
    /// Round points, fragments outside the disc discarded.
    Smooth = 2,
}

bitflags! {
    /// Selects the state groups saved by `push_attrib`.
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub struct AttribMask: u32 {
        /// Current color, normal and texture coordinates.
        const CURRENT = 0x0000_0001;
        /// Materials, lights, light model, color tracking, and the
        /// lighting-related enables.
        const LIGHTING = 0x0000_0040;
        /// The viewport rectangle.
        const VIEWPORT = 0x0000_0800;
        /// Every capability enable.
        const ENABLE = 0x0000_2000;
        /// The bound texture.
        const TEXTURE = 0x0004_0000;
    }
}

bitflags! {
    /// Selects the buffers cleared by `clear`.
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub struct ClearMask: u32 {
        const DEPTH = 0x0000_0100;
        const COLOR = 0x0000_4000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_draw_modes() {
        use PrimitiveKind::*;
        assert_eq!(Quads.draw_mode(), DrawMode::Triangles);
        assert_eq!(QuadStrip.draw_mode(), DrawMode::TriangleStrip);
        assert_eq!(Polygon.draw_mode(), DrawMode::TriangleFan);
        assert_eq!(LineLoop.draw_mode(), DrawMode::LineLoop);
    }

    #[test]
    fn codes_round_trip() {
        assert_eq!(PrimitiveKind::try_from(7), Ok(PrimitiveKind::Quads));
        assert_eq!(Face::FrontAndBack.code(), 0x0408);
        assert_eq!(Capability::try_from(0x4003), Ok(Capability::Light(3)));
        assert_eq!(Capability::Light(2).code(), 0x4002);
        assert_eq!(
            MaterialProp::try_from(0x1602),
            Ok(MaterialProp::AmbientAndDiffuse)
        );
    }

    #[test]
    fn unknown_codes_rejected() {
        assert!(PrimitiveKind::try_from(10).is_err());
        assert!(Capability::try_from(0x4008).is_err());
        assert!(MatrixMode::try_from(0).is_err());
    }

    #[test]
    fn face_includes_side() {
        assert!(Face::FrontAndBack.includes(Side::Back));
        assert!(Face::Front.includes(Side::Front));
        assert!(!Face::Front.includes(Side::Back));
    }

    #[test]
    fn tex_param_values() {
        assert!(TexParam::WrapS.accepts(TexValue::Repeat));
        assert!(!TexParam::WrapT.accepts(TexValue::Linear));
        assert!(!TexParam::MagFilter.accepts(TexValue::LinearMipmapLinear));
        assert!(TexParam::MinFilter.accepts(TexValue::LinearMipmapLinear));
        assert!(!TexParam::MinFilter.accepts(TexValue::Clamp));
    }

    #[test]
    fn attrib_mask_bits() {
        let m = AttribMask::from_bits_truncate(0x2041);
        assert_eq!(
            m,
            AttribMask::CURRENT | AttribMask::LIGHTING | AttribMask::ENABLE
        );
    }
}
