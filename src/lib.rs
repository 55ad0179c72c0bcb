pub mod ken_all;
pub mod utility;
