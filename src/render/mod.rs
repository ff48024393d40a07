pub(crate) mod caption;
pub(crate) mod frame;
pub(crate) mod raster;
pub(crate) mod wipe;
