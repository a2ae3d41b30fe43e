pub mod facet;
pub mod raw_record;
pub mod region;
pub mod saved_search;
pub mod station;
pub mod vocabulary;
