pub mod movie_detail;
pub mod release_group;
pub mod year_index;
