pub(crate) mod catalog;
pub(crate) mod decode;
pub(crate) mod images;
pub(crate) mod media;
pub(crate) mod script;
