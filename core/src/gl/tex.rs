//! Integer-named texture objects.

use alloc::vec::Vec;
use core::ops::Range;

use super::Result;
use super::backend::{Backend, TextureHandle};
use super::error::invalid;

/// The texture objects of a context, indexed by their integer names.
///
/// Name 0 is the default texture, created along with the context. Names
/// are never reused or deleted.
#[derive(Clone, Debug)]
pub struct Textures {
    handles: Vec<TextureHandle>,
    bound: u32,
}

impl Textures {
    /// Creates the default texture and binds it.
    pub fn new<B: Backend + ?Sized>(b: &mut B) -> Result<Self> {
        let default = b.create_texture()?;
        b.bind_texture(default);
        Ok(Self { handles: alloc::vec![default], bound: 0 })
    }

    /// Creates `n` new texture objects and returns their names.
    ///
    /// The names are consecutive, starting from the number of textures
    /// that existed before the call. If the backend fails to create one,
    /// the textures created so far are released and no names are assigned.
    pub fn r#gen<B: Backend + ?Sized>(&mut self, b: &mut B, n: u32) -> Result<Range<u32>> {
        if n == 0 {
            return Err(invalid("gen_textures", "count must be positive"));
        }
        let mut new = Vec::with_capacity(n as usize);
        for _ in 0..n {
            match b.create_texture() {
                Ok(h) => new.push(h),
                Err(e) => {
                    for h in new {
                        b.delete_texture(h);
                    }
                    return Err(e);
                }
            }
        }
        let start = self.len();
        self.handles.extend(new);
        Ok(start..self.len())
    }

    /// Binds the texture named `id`, or does nothing if there is no such
    /// texture. Returns whether the texture was bound.
    pub fn bind<B: Backend + ?Sized>(&mut self, b: &mut B, id: u32) -> bool {
        match self.handles.get(id as usize) {
            Some(&h) => {
                b.bind_texture(h);
                self.bound = id;
                true
            }
            None => {
                log::debug!("ignoring bind of unknown texture {id}");
                false
            }
        }
    }

    /// Returns the name of the bound texture.
    pub fn bound(&self) -> u32 {
        self.bound
    }

    /// Returns the number of texture names in use, including the default.
    pub fn len(&self) -> u32 {
        self.handles.len() as u32
    }

    /// Always `false`: the default texture always exists.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
