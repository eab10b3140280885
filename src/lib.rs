#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use dava_reflect as reflect;
pub use dava_utils as utils;
