// cxx-qt bridges expand to extern "C++" blocks.
#![allow(unsafe_code)]

pub mod background_model;
pub mod map_model;
pub mod page_model;
pub mod search_model;
