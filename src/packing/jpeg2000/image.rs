use std::ptr::NonNull;

use openjpeg_sys as opj;

use crate::error::GribError;

#[derive(Debug)]
pub(crate) struct Image(NonNull<opj::opj_image_t>);

impl Drop for Image {
    fn drop(&mut self) {
        unsafe {
            opj::opj_image_destroy(self.0.as_ptr());
        }
    }
}

impl Image {
    pub(crate) fn new(ptr: *mut opj::opj_image_t) -> Result<Self, GribError> {
        let img = NonNull::new(ptr).ok_or_else(|| {
            GribError::CompressedPayloadError(
                "initialization of the JPEG 2000 image failed".to_owned(),
            )
        })?;
        Ok(Self(img))
    }

    /// Creates a single-component unsigned grayscale image of `prec` bits.
    pub(crate) fn gray(width: u32, height: u32, prec: u32) -> Result<Self, GribError> {
        let mut param = unsafe { std::mem::zeroed::<opj::opj_image_cmptparm_t>() };
        param.dx = 1;
        param.dy = 1;
        param.w = width;
        param.h = height;
        param.prec = prec;
        param.sgnd = 0;

        let ptr = unsafe {
            opj::opj_image_create(1, &mut param, opj::OPJ_COLOR_SPACE::OPJ_CLRSPC_GRAY)
        };
        let mut img = Self::new(ptr)?;
        let inner = img.inner_mut();
        inner.x0 = 0;
        inner.y0 = 0;
        inner.x1 = width;
        inner.y1 = height;
        Ok(img)
    }

    fn inner(&self) -> &opj::opj_image_t {
        unsafe { &(*self.0.as_ptr()) }
    }

    fn inner_mut(&mut self) -> &mut opj::opj_image_t {
        unsafe { &mut (*self.0.as_ptr()) }
    }

    pub(crate) fn components(&self) -> &[ImageComponent] {
        let img = self.inner();
        if img.comps.is_null() {
            return &[];
        }
        let numcomps = img.numcomps;
        unsafe { std::slice::from_raw_parts(img.comps as *mut ImageComponent, numcomps as usize) }
    }

    pub(crate) fn components_mut(&mut self) -> &mut [ImageComponent] {
        let img = self.inner_mut();
        if img.comps.is_null() {
            return &mut [];
        }
        let numcomps = img.numcomps;
        unsafe {
            std::slice::from_raw_parts_mut(img.comps as *mut ImageComponent, numcomps as usize)
        }
    }

    pub(crate) fn as_ptr(&self) -> *mut opj::opj_image_t {
        self.0.as_ptr()
    }
}

#[repr(transparent)]
pub(crate) struct ImageComponent(opj::opj_image_comp_t);

impl ImageComponent {
    pub(crate) fn data(&self) -> &[i32] {
        if self.0.data.is_null() {
            return &[];
        }
        let len = (self.0.w * self.0.h) as usize;
        unsafe { std::slice::from_raw_parts(self.0.data, len) }
    }

    pub(crate) fn data_mut(&mut self) -> &mut [i32] {
        if self.0.data.is_null() {
            return &mut [];
        }
        let len = (self.0.w * self.0.h) as usize;
        unsafe { std::slice::from_raw_parts_mut(self.0.data, len) }
    }
}
